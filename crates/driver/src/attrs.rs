//! Attribute surface: the human/tool-facing tunables.
//!
//! Setters take the raw written string and never fail outward — malformed
//! input leaves the device untouched, command failures are logged and
//! swallowed. Getters read the settings store and convert native units back
//! to human ones.

use crate::convert;
use crate::wheel::TmxWheel;

impl TmxWheel {
    /// Autocenter strength, 0..=100. Values above 100 clamp; malformed
    /// input is ignored.
    pub fn store_autocenter(&self, input: &str) {
        let Ok(force) = input.trim().parse::<u8>() else {
            tracing::warn!(input, "ignoring malformed autocenter value");
            return;
        };
        let force = force.min(100);
        if let Err(err) = self.channel().set_autocenter_force(force) {
            tracing::warn!(%err, "autocenter force not applied");
        }
    }

    pub fn show_autocenter(&self) -> u8 {
        self.settings().snapshot().autocenter_force
    }

    /// Whether the wheel keeps autocentering while the input is open.
    pub fn store_autocenter_enabled(&self, input: &str) {
        let Some(enabled) = parse_bool(input) else {
            tracing::warn!(input, "ignoring malformed autocenter enable value");
            return;
        };
        if let Err(err) = self.channel().set_autocenter_enabled(enabled) {
            tracing::warn!(%err, "autocenter enable not applied");
        }
    }

    pub fn show_autocenter_enabled(&self) -> bool {
        self.settings().snapshot().autocenter_enabled
    }

    /// Rotation range in degrees, clamped to [270, 900].
    pub fn store_range(&self, input: &str) {
        let Ok(degrees) = input.trim().parse::<u16>() else {
            tracing::warn!(input, "ignoring malformed range value");
            return;
        };
        let native = convert::range_degrees_to_native(degrees);
        if let Err(err) = self.channel().set_range(native) {
            tracing::warn!(%err, "range not applied");
        }
    }

    /// Rotation range in degrees.
    pub fn show_range(&self) -> u16 {
        convert::range_native_to_degrees(self.settings().snapshot().range)
    }

    /// Force gain in percent, clamped to 100.
    pub fn store_gain(&self, input: &str) {
        let Ok(percent) = input.trim().parse::<u8>() else {
            tracing::warn!(input, "ignoring malformed gain value");
            return;
        };
        let native = convert::gain_percent_to_native(percent);
        if let Err(err) = self.channel().set_gain(native) {
            tracing::warn!(%err, "gain not applied");
        }
    }

    /// Force gain in percent.
    pub fn show_gain(&self) -> u8 {
        convert::gain_native_to_percent(self.settings().snapshot().gain)
    }

    /// Firmware version, read-only.
    pub fn show_firmware_version(&self) -> u8 {
        self.settings().snapshot().firmware_version
    }
}

fn parse_bool(input: &str) -> Option<bool> {
    match input.trim() {
        "1" | "y" | "Y" | "yes" | "true" | "on" => Some(true),
        "0" | "n" | "N" | "no" | "false" | "off" => Some(false),
        _ => None,
    }
}
