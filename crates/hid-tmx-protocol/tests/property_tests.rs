use proptest::prelude::*;
use tmx_wheel_hid_protocol as tm;
use tm::{Condition, Effect, EffectKind, Envelope, Replay, Waveform};

fn arb_envelope() -> impl Strategy<Value = Option<Envelope>> {
    proptest::option::of(
        (any::<u16>(), any::<u16>(), any::<u16>(), any::<u16>()).prop_map(
            |(attack_length, attack_level, fade_length, fade_level)| Envelope {
                attack_length,
                attack_level,
                fade_length,
                fade_level,
            },
        ),
    )
}

fn arb_condition() -> impl Strategy<Value = Condition> {
    (
        any::<i16>(),
        any::<i16>(),
        any::<u16>(),
        any::<u16>(),
        any::<i16>(),
        any::<u16>(),
    )
        .prop_map(
            |(right_coeff, left_coeff, right_saturation, left_saturation, center, deadband)| {
                Condition {
                    right_coeff,
                    left_coeff,
                    right_saturation,
                    left_saturation,
                    center,
                    deadband,
                }
            },
        )
}

fn arb_waveform() -> impl Strategy<Value = Waveform> {
    prop_oneof![
        Just(Waveform::Sine),
        Just(Waveform::Square),
        Just(Waveform::Triangle),
        Just(Waveform::SawUp),
        Just(Waveform::SawDown),
    ]
}

fn arb_kind() -> impl Strategy<Value = EffectKind> {
    prop_oneof![
        (any::<i16>(), arb_envelope())
            .prop_map(|(level, envelope)| EffectKind::Constant { level, envelope }),
        (
            arb_waveform(),
            any::<i16>(),
            any::<i16>(),
            0u16..36000,
            any::<u16>(),
            arb_envelope(),
        )
            .prop_map(
                |(waveform, magnitude, offset, phase, period, envelope)| EffectKind::Periodic {
                    waveform,
                    magnitude,
                    offset,
                    phase,
                    period,
                    envelope,
                }
            ),
        arb_condition().prop_map(EffectKind::Spring),
        arb_condition().prop_map(EffectKind::Damper),
        (any::<i16>(), any::<i16>()).prop_map(|(start_level, end_level)| EffectKind::Ramp {
            start_level,
            end_level,
        }),
        arb_condition().prop_map(EffectKind::Friction),
    ]
}

fn arb_effect() -> impl Strategy<Value = Effect> {
    (
        0u8..tm::MAX_EFFECTS as u8,
        any::<u16>(),
        any::<u16>(),
        any::<u16>(),
        arb_kind(),
    )
        .prop_map(|(id, direction, length, delay, kind)| Effect {
            id,
            direction,
            replay: Replay { length, delay },
            kind,
        })
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(500))]

    // ── Encoding properties ──────────────────────────────────────────────

    #[test]
    fn prop_encoding_is_deterministic(effect in arb_effect()) {
        prop_assert_eq!(tm::encode_effect(&effect), tm::encode_effect(&effect));
    }

    #[test]
    fn prop_first_packet_fixed_bytes(effect in arb_effect()) {
        let first = tm::encode_first(&effect);
        prop_assert_eq!(first[1], tm::effect::pk_id0(effect.id));
        prop_assert_eq!(&first[2..5], &[0x00, 0x46, 0x54]);
    }

    #[test]
    fn prop_condition_and_unknown_kinds_have_empty_envelope(
        condition in arb_condition(),
        id in 0u8..16,
    ) {
        for kind in [EffectKind::Spring(condition), EffectKind::Damper(condition), EffectKind::Friction(condition)] {
            let first = tm::encode_first(&Effect::new(id, kind));
            prop_assert_eq!(&first[5..], &[0u8; 6]);
        }
    }

    #[test]
    fn prop_update_packet_header(effect in arb_effect()) {
        let update = tm::encode_update(&effect);
        prop_assert_eq!(update[0], tm::effect::pk_id1(effect.id));
        prop_assert_eq!(update[1], 0x00);
    }

    #[test]
    fn prop_condition_saturation_bytes_bounded(condition in arb_condition(), id in 0u8..16) {
        // 0xFFFF / 0x30C = 84 and 0xFFFF / 0x28F = 100 bound the wire bytes.
        let spring = tm::encode_update(&Effect::new(id, EffectKind::Spring(condition)));
        prop_assert!(spring[9] <= 84);
        prop_assert!(spring[10] <= 84);
        let damper = tm::encode_update(&Effect::new(id, EffectKind::Damper(condition)));
        prop_assert!(damper[9] <= 100);
        prop_assert!(damper[10] <= 100);
    }

    #[test]
    fn prop_commit_identity_bytes(effect in arb_effect()) {
        let commit = tm::encode_commit(&effect);
        prop_assert_eq!(commit[0], 0x01);
        prop_assert_eq!(commit[1], effect.id);
        prop_assert_eq!(commit[6], tm::effect::pk_id1(effect.id));
        prop_assert_eq!(commit[8], tm::effect::pk_id0(effect.id));
    }

    #[test]
    fn prop_commit_length_sentinel(effect in arb_effect()) {
        let commit = tm::encode_commit(&effect);
        let wire_length = u16::from_le_bytes([commit[2], commit[3]]);
        if effect.replay.length == 0 {
            prop_assert_eq!(wire_length, 0xFFFF, "zero replay length must map to the infinite sentinel");
        } else {
            prop_assert_eq!(wire_length, effect.replay.length);
        }
    }

    #[test]
    fn prop_commit_delay_is_high_byte(effect in arb_effect()) {
        let commit = tm::encode_commit(&effect);
        prop_assert_eq!(commit[10], (effect.replay.delay >> 8) as u8);
    }

    // ── Command builders ─────────────────────────────────────────────────

    #[test]
    fn prop_set40_roundtrip(argument: u16) {
        for op in [tm::Set40Op::Range, tm::Set40Op::ReturnForce, tm::Set40Op::UseReturnForce] {
            let cmd = tm::encode_set40(op, argument);
            prop_assert_eq!(cmd[0], 0x40);
            prop_assert_eq!(cmd[1], op.as_u8());
            prop_assert_eq!(u16::from_le_bytes([cmd[2], cmd[3]]), argument);
        }
    }

    #[test]
    fn prop_gain_preserves_value(gain: u8) {
        let cmd = tm::encode_gain(gain);
        prop_assert_eq!(cmd, [0x43, gain]);
    }

    #[test]
    fn prop_play_never_sends_zero_count(id: u8, times: u8) {
        let cmd = tm::encode_play(id, times);
        prop_assert_eq!(cmd[0], 0x41);
        prop_assert_eq!(cmd[1], id);
        prop_assert_ne!(cmd[3], 0, "count byte must never be zero");
        if times == 0 {
            prop_assert_eq!(cmd[2], 0x00, "zero times means stop mode");
        } else {
            prop_assert_eq!(cmd[2], 0x41);
            prop_assert_eq!(cmd[3], times);
        }
    }

    #[test]
    fn prop_stop_equals_play_zero(id: u8) {
        prop_assert_eq!(tm::encode_stop(id), tm::encode_play(id, 0));
    }

    // ── Fixed-point sine ─────────────────────────────────────────────────

    #[test]
    fn prop_sine_bounded(degrees: u16) {
        let value = i32::from(tm::fixp_sin16(degrees));
        prop_assert!((-0x7FFF..=0x7FFF).contains(&value));
    }

    #[test]
    fn prop_sine_periodic(degrees in 0u16..=0xFE97) {
        // 0xFE97 + 360 still fits in u16.
        prop_assert_eq!(tm::fixp_sin16(degrees), tm::fixp_sin16(degrees + 360));
    }

    #[test]
    fn prop_sine_odd_symmetry(degrees in 0u16..=360) {
        prop_assert_eq!(tm::fixp_sin16(degrees), -tm::fixp_sin16(360 - degrees));
    }
}
