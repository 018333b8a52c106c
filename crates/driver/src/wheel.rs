//! The device context: one [`TmxWheel`] per plugged wheel.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tmx_wheel_hid_protocol::types::Effect;

use crate::channel::CommandChannel;
use crate::error::{DriverResult, TransportError};
use crate::ffb::EffectEngine;
use crate::settings::{SettingsStore, WheelSettings};
use crate::transport::Transport;

/// Owned device context tying together the settings store, the command
/// channel, and the effect engine. Everything else holds non-owning
/// handles into it.
pub struct TmxWheel {
    settings: Arc<SettingsStore>,
    channel: CommandChannel,
    engine: Mutex<EffectEngine>,
}

impl TmxWheel {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_command_timeout(transport, crate::channel::DEFAULT_COMMAND_TIMEOUT)
    }

    pub fn with_command_timeout(transport: Arc<dyn Transport>, timeout: Duration) -> Self {
        let settings = Arc::new(SettingsStore::new());
        let channel = CommandChannel::new(Arc::clone(&transport), Arc::clone(&settings))
            .with_timeout(timeout);
        let engine = Mutex::new(EffectEngine::new(transport, Arc::clone(&settings)));
        Self {
            settings,
            channel,
            engine,
        }
    }

    /// Announce an opened input stream to the wheel.
    pub fn open(&self) -> Result<(), TransportError> {
        self.channel.open()
    }

    /// Close the input stream (purges uploaded effects on the wheel).
    pub fn close(&self) {
        self.channel.close()
    }

    /// Run the startup task: firmware version query and default settings.
    pub fn setup(&self) {
        self.channel.setup()
    }

    /// Current last-known-good device configuration.
    pub fn settings_snapshot(&self) -> WheelSettings {
        self.settings.snapshot()
    }

    /// Upload a new effect, or update slot `effect.id` when `old` carries
    /// the previously uploaded descriptor.
    pub fn upload_effect(&self, effect: &Effect, old: Option<&Effect>) -> DriverResult<()> {
        self.engine.lock().upload(effect, old)
    }

    /// Release an effect slot. Playback must already be stopped.
    pub fn erase_effect(&self, effect_id: u8) -> DriverResult<()> {
        self.engine.lock().erase(effect_id)
    }

    /// Play (`times > 0`) or stop (`times == 0`) an uploaded effect.
    pub fn play_effect(&self, effect_id: u8, times: u8) -> DriverResult<()> {
        self.engine.lock().play(effect_id, times)
    }

    /// Apply a host-side 16-bit force gain. Fire-and-forget.
    pub fn set_ff_gain(&self, gain: u16) {
        self.engine.lock().set_gain(gain)
    }

    /// Debug overrides for the upload change detection.
    pub fn set_blind_overrides(&self, blind_upload: bool, blind_compute: bool) {
        self.engine
            .lock()
            .set_blind_overrides(blind_upload, blind_compute)
    }

    /// Cancel and release all effect transfer resources. Call on device
    /// removal; also runs when the wheel is dropped.
    pub fn detach(&self) {
        self.engine.lock().detach()
    }

    pub(crate) fn channel(&self) -> &CommandChannel {
        &self.channel
    }

    pub(crate) fn settings(&self) -> &SettingsStore {
        &self.settings
    }
}
