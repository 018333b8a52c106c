//! Abstract force-feedback effect descriptors.
//!
//! These are the host-side effect descriptions the input subsystem hands to
//! the driver; [`crate::effect`] turns them into wire packets. The wheel has
//! a single FFB axis, so condition effects carry one axis worth of
//! parameters.

#![deny(static_mut_refs)]

use serde::{Deserialize, Serialize};

/// Number of effect slots the wheel firmware can hold.
pub const MAX_EFFECTS: usize = 16;

/// Replay scheduling for an effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replay {
    /// Duration in milliseconds; zero means "play until stopped".
    pub length: u16,
    /// Delay before the effect starts, in milliseconds.
    pub delay: u16,
}

/// Attack/fade envelope for constant and periodic effects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub attack_length: u16,
    pub attack_level: u16,
    pub fade_length: u16,
    pub fade_level: u16,
}

/// Periodic effect waveform.
///
/// The wheel only distinguishes sine and the two sawtooths; square and
/// triangle are accepted and encoded as sine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    #[default]
    Sine,
    Square,
    Triangle,
    SawUp,
    SawDown,
}

/// Single-axis condition parameters (spring, damper, friction).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub right_coeff: i16,
    pub left_coeff: i16,
    pub right_saturation: u16,
    pub left_saturation: u16,
    pub center: i16,
    pub deadband: u16,
}

/// Effect class and its class-specific parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    Constant {
        level: i16,
        envelope: Option<Envelope>,
    },
    Periodic {
        waveform: Waveform,
        magnitude: i16,
        offset: i16,
        /// Phase in hundredths of a degree, 0..36000.
        phase: u16,
        /// Period in milliseconds.
        period: u16,
        envelope: Option<Envelope>,
    },
    Spring(Condition),
    Damper(Condition),
    /// Not supported by the wheel; takes the fallback encoding paths.
    Ramp { start_level: i16, end_level: i16 },
    /// Not supported by the wheel; takes the fallback encoding paths.
    Friction(Condition),
}

/// A complete effect descriptor bound to a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Effect {
    /// Slot index, 0..[`MAX_EFFECTS`].
    pub id: u8,
    /// Direction, 0..0xFFFF mapped onto 0..360 degrees.
    pub direction: u16,
    pub replay: Replay,
    pub kind: EffectKind,
}

impl Effect {
    pub fn new(id: u8, kind: EffectKind) -> Self {
        Self {
            id,
            direction: 0,
            replay: Replay::default(),
            kind,
        }
    }

    pub fn with_direction(mut self, direction: u16) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_replay(mut self, length: u16, delay: u16) -> Self {
        self.replay = Replay { length, delay };
        self
    }
}
