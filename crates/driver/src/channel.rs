//! Exclusive command channel for device configuration.
//!
//! Every configuration command takes the channel guard, performs one
//! bounded synchronous write, and updates the settings store only when the
//! write succeeded — the store always reflects last-known-good device
//! state. At most one configuration command is in flight per device.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tmx_wheel_hid_protocol::commands::{self, Set40Op, firmware};

use crate::error::TransportError;
use crate::settings::SettingsStore;
use crate::transport::Transport;

/// Default bound for synchronous configuration writes.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(500);

/// Defaults applied by [`CommandChannel::setup`].
const DEFAULT_GAIN: u8 = 0x66; // ~80% of native full scale
const DEFAULT_AUTOCENTER_FORCE: u8 = 50;
const DEFAULT_RANGE: u16 = 0xFFFF;

pub struct CommandChannel {
    transport: Arc<dyn Transport>,
    settings: Arc<SettingsStore>,
    guard: Mutex<()>,
    timeout: Duration,
}

impl CommandChannel {
    pub fn new(transport: Arc<dyn Transport>, settings: Arc<SettingsStore>) -> Self {
        Self {
            transport,
            settings,
            guard: Mutex::new(()),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set force gain, native 0..=0x80.
    pub fn set_gain(&self, gain: u8) -> Result<(), TransportError> {
        let _guard = self.guard.lock();
        let packet = commands::encode_gain(gain);
        match self.transport.write_interrupt(&packet, self.timeout) {
            Ok(()) => {
                self.settings.set_gain(gain);
                Ok(())
            }
            Err(err) => {
                tracing::error!(gain, %err, "set gain failed");
                Err(err)
            }
        }
    }

    /// Set autocenter strength, 0..=100.
    pub fn set_autocenter_force(&self, force: u8) -> Result<(), TransportError> {
        let _guard = self.guard.lock();
        self.set40(Set40Op::ReturnForce, u16::from(force))?;
        self.settings.set_autocenter_force(force);
        Ok(())
    }

    /// Choose whether autocentering stays active while the input is open.
    /// The wheel always autocenters while no input is open.
    pub fn set_autocenter_enabled(&self, enabled: bool) -> Result<(), TransportError> {
        let _guard = self.guard.lock();
        self.set40(Set40Op::UseReturnForce, u16::from(enabled))?;
        self.settings.set_autocenter_enabled(enabled);
        Ok(())
    }

    /// Set rotation range, native 0..=0xFFFF.
    pub fn set_range(&self, range: u16) -> Result<(), TransportError> {
        let _guard = self.guard.lock();
        self.set40(Set40Op::Range, range)?;
        self.settings.set_range(range);
        Ok(())
    }

    /// Read the firmware version and record it in the settings store.
    pub fn query_firmware_version(&self) -> Result<u8, TransportError> {
        let _guard = self.guard.lock();
        let mut response = [0u8; firmware::RESPONSE_LEN];
        self.transport.read_control(
            firmware::REQUEST,
            firmware::REQUEST_TYPE,
            0,
            0,
            &mut response,
            self.timeout,
        )?;
        let version = response[firmware::VERSION_OFFSET];
        self.settings.set_firmware_version(version);
        Ok(version)
    }

    /// Startup task: read the firmware version, then bring the wheel to its
    /// default configuration. Each step is best-effort; a failed step is
    /// logged and the rest still run, leaving that field at its prior value.
    pub fn setup(&self) {
        if let Err(err) = self.query_firmware_version() {
            tracing::error!(%err, "firmware version query failed");
        }
        if let Err(err) = self.set_gain(DEFAULT_GAIN) {
            tracing::error!(%err, "applying default gain failed");
        }
        if let Err(err) = self.set_autocenter_enabled(false) {
            tracing::error!(%err, "disabling autocenter-on-open failed");
        }
        if let Err(err) = self.set_autocenter_force(DEFAULT_AUTOCENTER_FORCE) {
            tracing::error!(%err, "applying default autocenter force failed");
        }
        if let Err(err) = self.set_range(DEFAULT_RANGE) {
            tracing::error!(%err, "applying default range failed");
        }
        tracing::info!(
            firmware_version = self.settings.snapshot().firmware_version,
            "wheel setup complete"
        );
    }

    /// Announce an opened input stream to the wheel.
    pub fn open(&self) -> Result<(), TransportError> {
        self.transport
            .write_interrupt(&commands::INPUT_OPEN_WORD, self.timeout)
    }

    /// Close the input stream: purge uploaded effects, then the close word.
    /// Best-effort; the wheel may already be gone.
    pub fn close(&self) {
        for _ in 0..commands::CLOSE_PURGE_REPEATS {
            if let Err(err) = self
                .transport
                .write_interrupt(&commands::EFFECT_PURGE_WORD, self.timeout)
            {
                tracing::warn!(%err, "effect purge word not delivered");
            }
        }
        if let Err(err) = self
            .transport
            .write_interrupt(&commands::INPUT_CLOSE_WORD, self.timeout)
        {
            tracing::warn!(%err, "close word not delivered");
        }
    }

    fn set40(&self, op: Set40Op, argument: u16) -> Result<(), TransportError> {
        let packet = commands::encode_set40(op, argument);
        let result = self.transport.write_interrupt(&packet, self.timeout);
        if let Err(err) = &result {
            tracing::error!(op = ?op, argument, %err, "settings command failed");
        }
        result
    }
}
