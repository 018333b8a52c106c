//! Integer fixed-point sine for direction projection.
//!
//! The constant-force encoder projects the host's 16-bit direction onto the
//! wheel's single axis with a sine; doing that in pure integer arithmetic
//! keeps encoding deterministic across platforms. The approximation used
//! here (Bhāskara I's rational formula) is exact at 0°, 30°, 90°, 150° and
//! 180° and stays within 2 % of true sine elsewhere, which is well inside
//! the resolution the update packet can carry.

#![deny(static_mut_refs)]

/// Full-scale output magnitude, corresponding to sin = 1.
pub const SIN16_MAX: i16 = 0x7FFF;

/// Fixed-point sine.
///
/// Input is whole degrees (reduced modulo 360); output is in
/// `[-SIN16_MAX, SIN16_MAX]`.
pub fn fixp_sin16(degrees: u16) -> i16 {
    let deg = u32::from(degrees) % 360;
    let (deg, negative) = if deg >= 180 {
        (deg - 180, true)
    } else {
        (deg, false)
    };

    // Bhaskara I: sin(x) = 4x(180-x) / (40500 - x(180-x)) for x in [0, 180].
    let x = deg as i32;
    let quarter = x * (180 - x);
    let magnitude = (4 * quarter * i32::from(SIN16_MAX)) / (40_500 - quarter);

    let value = if negative { -magnitude } else { magnitude };
    value as i16
}
