//! Userspace driver runtime for the Thrustmaster TMX force-feedback wheel.
//!
//! The wire protocol lives in `tmx-wheel-hid-protocol`; this crate owns
//! everything stateful around it: the device context ([`TmxWheel`]), the
//! settings store, the exclusive command channel, and the per-slot effect
//! transfer engine. The host's USB plumbing stays behind the
//! [`Transport`]/[`Transfer`] traits, so the whole runtime is testable
//! against [`transport::mock::MockTransport`].
//!
//! # Concurrency model
//!
//! Two execution domains never meet on the same lock:
//!
//! - **Configuration operations** (attribute writes, [`TmxWheel::setup`],
//!   explicit settings changes) serialize on the command channel's
//!   exclusive guard and perform bounded synchronous writes.
//! - **Effect traffic** (upload/play/gain) is fire-and-forget through
//!   [`Transfer`] submissions and never touches the command guard; the
//!   only state it shares with the configuration side is the settings
//!   store, a short non-blocking mutex safe from either domain.
//!
//! Effect calls for one slot are expected not to overlap (the input
//! subsystem serializes them); the engine lock in [`TmxWheel`] makes that
//! assumption safe rather than trusted.

pub mod attrs;
pub mod channel;
pub mod convert;
pub mod error;
pub mod ffb;
pub mod settings;
pub mod transport;
pub mod wheel;

pub use channel::{CommandChannel, DEFAULT_COMMAND_TIMEOUT};
pub use error::{DriverError, DriverResult, TransportError};
pub use ffb::EffectEngine;
pub use settings::{SettingsStore, WheelSettings};
pub use transport::{Transfer, Transport};
pub use wheel::TmxWheel;
