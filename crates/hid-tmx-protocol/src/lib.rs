//! Thrustmaster TMX wire protocol: effect encoding, device commands, and
//! state-report parsing.
//!
//! This crate is intentionally I/O-free and allocation-free on hot paths.
//! It provides pure functions and types that can be tested and fuzzed without
//! hardware or OS-level USB plumbing; the companion driver crate owns
//! transfers, locking, and device state.
//!
//! # Wire protocol overview
//!
//! The TMX speaks a proprietary protocol over the USB interrupt OUT endpoint.
//!
//! ## Commands
//!
//! - **Settings**: `[0x40, <op>, <u16_le>]` — rotation range (op 0x11),
//!   autocenter force, autocenter enable.
//! - **Gain**: `[0x43, <gain_u8>]` — 0x00 = no force, 0x80 = full force.
//! - **Play/stop effect**: `[0x41, <effect_id>, <mode>, <times>]` —
//!   mode 0x41 plays, 0x00 stops.
//!
//! ## Effect upload
//!
//! A slot's effect is described to the firmware as three sequential packets:
//! a *first* (header/envelope) packet, an *update* (parameter) packet whose
//! body depends on the effect class, and a *commit* packet carrying replay
//! length, delay, and the 16-bit effect-type code. See [`effect`].
//!
//! ## Startup
//!
//! Two-byte magic words open and close the input stream ([`commands`]), and
//! the firmware version is read with a vendor control request.

#![deny(static_mut_refs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod commands;
pub mod effect;
pub mod fixp;
pub mod ids;
pub mod input;
pub mod types;

pub use commands::{Set40Op, encode_gain, encode_play, encode_set40, encode_stop};
pub use effect::{
    COMMIT_PACKET_LEN, EFFECT_STAGES, EffectPackets, FIRST_PACKET_LEN, UPDATE_PACKET_LEN,
    encode_commit, encode_effect, encode_first, encode_update,
};
pub use fixp::fixp_sin16;
pub use ids::THRUSTMASTER_VENDOR_ID;
pub use input::{TmxInputState, parse_state_report};
pub use types::{Condition, Effect, EffectKind, Envelope, MAX_EFFECTS, Replay, Waveform};
