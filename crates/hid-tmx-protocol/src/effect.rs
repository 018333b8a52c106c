//! Three-stage effect packet encoding.
//!
//! Uploading an effect to the wheel takes three sequential packets:
//!
//! 1. **first** — class marker, slot tag, and the attack/fade envelope;
//! 2. **update** — class-specific parameters (periodic, constant, or
//!    condition body);
//! 3. **commit** — replay length/delay and the 16-bit effect-type code.
//!
//! All builders are pure and total: any [`Effect`] encodes to a
//! deterministic byte image, and unsupported kinds degrade to well-defined
//! placeholder codes instead of failing. The driver diffs these images to
//! skip resubmitting unchanged stages, so determinism here is load-bearing.

#![deny(static_mut_refs)]

use crate::fixp::fixp_sin16;
use crate::types::{Condition, Effect, EffectKind, Waveform};

/// Wire size of the first (header/envelope) packet.
pub const FIRST_PACKET_LEN: usize = 11;
/// Wire size of the update (parameter) packet.
pub const UPDATE_PACKET_LEN: usize = 11;
/// Wire size of the commit packet.
pub const COMMIT_PACKET_LEN: usize = 14;
/// Packets per effect upload.
pub const EFFECT_STAGES: usize = 3;

/// First-packet class markers.
pub mod first_codes {
    pub const CONSTANT: u8 = 0x42;
    pub const PERIODIC: u8 = 0x22;
    pub const CONDITION: u8 = 0x62;
}

/// Update-packet class selectors.
pub mod update_codes {
    pub const CONSTANT: u8 = 0x02;
    pub const PERIODIC: u8 = 0x04;
    pub const CONDITION: u8 = 0x06;
}

/// Commit-packet effect-type codes.
pub mod commit_codes {
    pub const CONSTANT: u16 = 0x4000;
    pub const SINE: u16 = 0x4022;
    pub const SAW_UP: u16 = 0x4023;
    pub const SAW_DOWN: u16 = 0x4024;
    pub const SPRING: u16 = 0x4040;
    pub const DAMPER: u16 = 0x4041;
    /// Placeholder for kinds the wheel has no code for.
    pub const UNKNOWN: u16 = 0x0000;
}

// Host-to-wire rescaling divisors. The envelope-level divisor quantizes
// 0..0xFFFF down to eight steps; retained as captured from the device
// traffic even though the resolution loss looks suspicious.
const PHASE_DIVISOR: u16 = (360 * 100) / 0xFF;
const DIRECTION_TO_DEGREES: u16 = 0xFFFF / 360;
const ENVELOPE_LEVEL_DIVISOR: u16 = 0x1FFF;
const COEFF_DIVISOR: i16 = 0x147;
const CENTER_DIVISOR: i16 = 0x7FFF / 0x01F4;
const DEADBAND_DIVISOR: u16 = 0xFFFF / 0x03E8;
const SPRING_SATURATION_DIVISOR: u16 = 0x030C;
const DAMPER_SATURATION_DIVISOR: u16 = 0x028F;
const CONSTANT_LEVEL_DIVISOR: i32 = 0x01FF;

/// Slot tag carried by the first and commit packets.
pub fn pk_id0(id: u8) -> u8 {
    id.wrapping_mul(0x1C).wrapping_add(0x1C)
}

/// Slot tag carried by the update and commit packets.
pub fn pk_id1(id: u8) -> u8 {
    id.wrapping_mul(0x1C).wrapping_add(0x0E)
}

/// The full three-packet image of one effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectPackets {
    pub first: [u8; FIRST_PACKET_LEN],
    pub update: [u8; UPDATE_PACKET_LEN],
    pub commit: [u8; COMMIT_PACKET_LEN],
}

impl EffectPackets {
    /// Byte image of one stage, 0 = first, 1 = update, 2 = commit.
    pub fn stage(&self, stage: usize) -> &[u8] {
        match stage {
            0 => &self.first,
            1 => &self.update,
            _ => &self.commit,
        }
    }

    /// Wire size of one stage's packet.
    pub const fn stage_len(stage: usize) -> usize {
        match stage {
            0 => FIRST_PACKET_LEN,
            1 => UPDATE_PACKET_LEN,
            _ => COMMIT_PACKET_LEN,
        }
    }
}

/// Encode all three stages of an effect.
pub fn encode_effect(effect: &Effect) -> EffectPackets {
    EffectPackets {
        first: encode_first(effect),
        update: encode_update(effect),
        commit: encode_commit(effect),
    }
}

/// Encode the first (header/envelope) packet.
pub fn encode_first(effect: &Effect) -> [u8; FIRST_PACKET_LEN] {
    let (class, envelope) = match &effect.kind {
        EffectKind::Constant { envelope, .. } => (first_codes::CONSTANT, *envelope),
        EffectKind::Periodic { envelope, .. } => (first_codes::PERIODIC, *envelope),
        EffectKind::Spring(_) | EffectKind::Damper(_) => (first_codes::CONDITION, None),
        EffectKind::Ramp { .. } | EffectKind::Friction(_) => (0x00, None),
    };

    let mut out = [0u8; FIRST_PACKET_LEN];
    out[0] = class;
    out[1] = pk_id0(effect.id);
    out[2] = 0x00;
    out[3] = 0x46;
    out[4] = 0x54;

    if let Some(env) = envelope {
        tracing::trace!(
            attack_level = env.attack_level,
            fade_level = env.fade_level,
            "envelope levels quantized to eight wire steps"
        );
        let [al_lo, al_hi] = env.attack_length.to_le_bytes();
        out[5] = al_lo;
        out[6] = al_hi;
        out[7] = (env.attack_level / ENVELOPE_LEVEL_DIVISOR) as u8;
        let [fl_lo, fl_hi] = env.fade_length.to_le_bytes();
        out[8] = fl_lo;
        out[9] = fl_hi;
        out[10] = (env.fade_level / ENVELOPE_LEVEL_DIVISOR) as u8;
    }

    out
}

/// Encode the update (parameter) packet.
pub fn encode_update(effect: &Effect) -> [u8; UPDATE_PACKET_LEN] {
    let mut out = [0u8; UPDATE_PACKET_LEN];
    out[0] = pk_id1(effect.id);
    out[1] = 0x00;

    match &effect.kind {
        EffectKind::Constant { level, .. } => {
            out[2] = update_codes::CONSTANT;
            out[3] = constant_level(*level, effect.direction);
        }
        EffectKind::Periodic {
            magnitude,
            offset,
            phase,
            period,
            ..
        } => {
            out[2] = update_codes::PERIODIC;
            out[3] = word_high(*magnitude as u16);
            out[4] = word_high(*offset as u16);
            out[5] = (phase / PHASE_DIVISOR) as u8;
            let [p_lo, p_hi] = period.to_le_bytes();
            out[6] = p_lo;
            out[7] = p_hi;
        }
        EffectKind::Spring(condition) => {
            out[2] = update_codes::CONDITION;
            encode_condition(condition, SPRING_SATURATION_DIVISOR, &mut out);
        }
        EffectKind::Damper(condition) => {
            out[2] = update_codes::CONDITION;
            encode_condition(condition, DAMPER_SATURATION_DIVISOR, &mut out);
        }
        // Unsupported kinds take the periodic layout with neutral parameters.
        EffectKind::Ramp { .. } | EffectKind::Friction(_) => {
            out[2] = update_codes::PERIODIC;
        }
    }

    out
}

/// Encode the commit packet.
pub fn encode_commit(effect: &Effect) -> [u8; COMMIT_PACKET_LEN] {
    let mut out = [0u8; COMMIT_PACKET_LEN];
    out[0] = 0x01;
    out[1] = effect.id;

    // Zero-length replay means "play until stopped" on the host side; the
    // firmware expects the 0xFFFF sentinel for that.
    let length = if effect.replay.length != 0 {
        effect.replay.length
    } else {
        0xFFFF
    };
    let [len_lo, len_hi] = length.to_le_bytes();
    out[2] = len_lo;
    out[3] = len_hi;

    out[6] = pk_id1(effect.id);
    out[8] = pk_id0(effect.id);
    out[10] = word_high(effect.replay.delay);

    let code = match &effect.kind {
        EffectKind::Constant { .. } => commit_codes::CONSTANT,
        EffectKind::Periodic { waveform, .. } => match waveform {
            Waveform::SawUp => commit_codes::SAW_UP,
            Waveform::SawDown => commit_codes::SAW_DOWN,
            Waveform::Sine | Waveform::Square | Waveform::Triangle => commit_codes::SINE,
        },
        EffectKind::Spring(_) => commit_codes::SPRING,
        EffectKind::Damper(_) => commit_codes::DAMPER,
        other => {
            tracing::error!(kind = ?other, "no effect-type code for this effect kind");
            commit_codes::UNKNOWN
        }
    };
    let [code_lo, code_hi] = code.to_le_bytes();
    out[12] = code_lo;
    out[13] = code_hi;

    out
}

fn word_high(value: u16) -> u8 {
    (value >> 8) as u8
}

/// Project a constant-force level onto the wheel axis by the effect
/// direction and compress it into the single wire byte (signed semantics).
fn constant_level(level: i16, direction: u16) -> u8 {
    let degrees = direction / DIRECTION_TO_DEGREES;
    let projected = (i32::from(level) * i32::from(fixp_sin16(degrees))) >> 15;
    ((projected / CONSTANT_LEVEL_DIVISOR) & 0xFF) as u8
}

fn encode_condition(condition: &Condition, saturation_divisor: u16, out: &mut [u8; UPDATE_PACKET_LEN]) {
    out[3] = ((condition.right_coeff / COEFF_DIVISOR) & 0xFF) as u8;
    out[4] = ((condition.left_coeff / COEFF_DIVISOR) & 0xFF) as u8;
    let [c_lo, c_hi] = ((condition.center / CENTER_DIVISOR) as u16).to_le_bytes();
    out[5] = c_lo;
    out[6] = c_hi;
    let [d_lo, d_hi] = (condition.deadband / DEADBAND_DIVISOR).to_le_bytes();
    out[7] = d_lo;
    out[8] = d_hi;
    out[9] = (condition.right_saturation / saturation_divisor) as u8;
    out[10] = (condition.left_saturation / saturation_divisor) as u8;
}
