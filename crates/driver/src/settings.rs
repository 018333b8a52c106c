//! Device settings shared between the configuration and effect domains.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Last-known-good device configuration.
///
/// Fields hold native units: gain 0..=0x80, range 0..=0xFFFF. A field only
/// changes when the corresponding device command succeeded, so reading this
/// always reflects what the wheel actually holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WheelSettings {
    pub gain: u8,
    pub autocenter_force: u8,
    pub autocenter_enabled: bool,
    pub range: u16,
    pub firmware_version: u8,
}

/// Guarded settings cell.
///
/// Critical sections are single field reads/writes, so the lock is safe to
/// take from both the blocking configuration path and completion-side code.
#[derive(Debug, Default)]
pub struct SettingsStore {
    inner: Mutex<WheelSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> WheelSettings {
        *self.inner.lock()
    }

    pub fn set_gain(&self, gain: u8) {
        self.inner.lock().gain = gain;
    }

    pub fn set_autocenter_force(&self, force: u8) {
        self.inner.lock().autocenter_force = force;
    }

    pub fn set_autocenter_enabled(&self, enabled: bool) {
        self.inner.lock().autocenter_enabled = enabled;
    }

    pub fn set_range(&self, range: u16) {
        self.inner.lock().range = range;
    }

    pub fn set_firmware_version(&self, version: u8) {
        self.inner.lock().firmware_version = version;
    }
}
