//! Device command packet builders.
//!
//! Everything the driver sends outside of an effect upload goes through one
//! of these: the 0x40 settings family, the single-byte gain command, the
//! effect play/stop control, and the two-byte startup words.

#![deny(static_mut_refs)]

/// Settings command prefix.
pub const CMD_SETTINGS: u8 = 0x40;
/// Effect play/stop command prefix.
pub const CMD_EFFECT_CONTROL: u8 = 0x41;
/// Gain command prefix.
pub const CMD_GAIN: u8 = 0x43;

/// Effect-control mode byte: start playback.
pub const EFFECT_MODE_PLAY: u8 = 0x41;
/// Effect-control mode byte: stop playback.
pub const EFFECT_MODE_STOP: u8 = 0x00;

/// Operation selector of the 0x40 settings family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Set40Op {
    /// Rotation range, native 0..0xFFFF (0xFFFF is the 900 degree maximum).
    Range = 0x11,
    /// Autocenter return-force strength, 0..100.
    ReturnForce = 0x12,
    /// Whether the wheel keeps autocentering while the input is open.
    UseReturnForce = 0x13,
}

impl Set40Op {
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Build a settings command: `[0x40, op, argument as LE16]`.
pub fn encode_set40(op: Set40Op, argument: u16) -> [u8; 4] {
    let [lo, hi] = argument.to_le_bytes();
    [CMD_SETTINGS, op.as_u8(), lo, hi]
}

/// Build a gain command: `[0x43, gain]`, gain in 0..=0x80.
pub fn encode_gain(gain: u8) -> [u8; 2] {
    [CMD_GAIN, gain]
}

/// Build an effect play/stop command.
///
/// `times == 0` stops the effect; the count byte is still 1 because the
/// firmware ignores it in stop mode but rejects zero.
pub fn encode_play(id: u8, times: u8) -> [u8; 4] {
    let mode = if times != 0 {
        EFFECT_MODE_PLAY
    } else {
        EFFECT_MODE_STOP
    };
    let count = if times != 0 { times } else { 1 };
    [CMD_EFFECT_CONTROL, id, mode, count]
}

/// Build an effect stop command.
pub fn encode_stop(id: u8) -> [u8; 4] {
    encode_play(id, 0)
}

/// Startup word written when the input stream is opened.
pub const INPUT_OPEN_WORD: [u8; 2] = 0x0442u16.to_le_bytes();
/// Word written while closing; observed to purge the uploaded effects.
pub const EFFECT_PURGE_WORD: [u8; 2] = 0x0542u16.to_le_bytes();
/// Startup word written last when the input stream is closed.
pub const INPUT_CLOSE_WORD: [u8; 2] = 0x0042u16.to_le_bytes();
/// How many purge words precede the close word.
pub const CLOSE_PURGE_REPEATS: usize = 2;

/// Firmware-version vendor control read.
pub mod firmware {
    /// Vendor control request number.
    pub const REQUEST: u8 = 86;
    /// Device-to-host vendor request type.
    pub const REQUEST_TYPE: u8 = 0xC1;
    /// Response buffer size.
    pub const RESPONSE_LEN: usize = 8;
    /// Offset of the version byte in the response.
    pub const VERSION_OFFSET: usize = 1;
}
