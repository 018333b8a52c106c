//! Effect transfer engine: per-slot transfer resources, change detection,
//! and the four lifecycle operations the input subsystem calls.

use std::sync::Arc;

use tmx_wheel_hid_protocol::effect::{
    COMMIT_PACKET_LEN, EFFECT_STAGES, FIRST_PACKET_LEN, UPDATE_PACKET_LEN, encode_effect,
};
use tmx_wheel_hid_protocol::types::{Effect, MAX_EFFECTS};
use tmx_wheel_hid_protocol::commands;

use crate::convert;
use crate::error::{DriverError, DriverResult};
use crate::settings::SettingsStore;
use crate::transport::{Transfer, Transport};

const STAGE_LENS: [usize; EFFECT_STAGES] = [FIRST_PACKET_LEN, UPDATE_PACKET_LEN, COMMIT_PACKET_LEN];

/// Owns one transfer resource per (effect slot, stage) and decides which
/// stages actually need to hit the wire on each upload.
pub struct EffectEngine {
    transport: Arc<dyn Transport>,
    settings: Arc<SettingsStore>,
    slots: [[Option<Box<dyn Transfer>>; EFFECT_STAGES]; MAX_EFFECTS],
    blind_upload: bool,
    blind_compute: bool,
}

impl EffectEngine {
    pub fn new(transport: Arc<dyn Transport>, settings: Arc<SettingsStore>) -> Self {
        Self {
            transport,
            settings,
            slots: std::array::from_fn(|_| [None, None, None]),
            blind_upload: false,
            blind_compute: false,
        }
    }

    /// Debug overrides: `blind_upload` resubmits every stage regardless of
    /// change detection, `blind_compute` disables the whole-descriptor
    /// short circuit.
    pub fn set_blind_overrides(&mut self, blind_upload: bool, blind_compute: bool) {
        self.blind_upload = blind_upload;
        self.blind_compute = blind_compute;
    }

    /// Upload or update one effect.
    ///
    /// Only stages whose encoded bytes differ from `old`'s are resubmitted;
    /// skipping a stage leaves whatever the wheel currently holds for it,
    /// which is byte-identical by construction. If a stage submission fails
    /// the remaining stages are not attempted while the earlier ones stand —
    /// the device may transiently hold a mixed effect until the next upload.
    pub fn upload(&mut self, effect: &Effect, old: Option<&Effect>) -> DriverResult<()> {
        let slot = usize::from(effect.id);
        if slot >= MAX_EFFECTS {
            return Err(DriverError::SlotOutOfRange(effect.id));
        }

        // Re-uploading an unchanged descriptor is a no-op.
        if !self.blind_compute && old.is_some_and(|old| old == effect) {
            return Ok(());
        }

        // Transfers persist across uploads of the same slot; allocate only
        // what is missing, and on failure roll back exactly what this call
        // created so a prior successful upload keeps its resources.
        let mut fresh = [false; EFFECT_STAGES];
        for (stage, &len) in STAGE_LENS.iter().enumerate() {
            if self.slots[slot][stage].is_none() {
                match self.transport.alloc_transfer(len) {
                    Ok(transfer) => {
                        self.slots[slot][stage] = Some(transfer);
                        fresh[stage] = true;
                    }
                    Err(err) => {
                        for (entry, created_here) in self.slots[slot].iter_mut().zip(fresh) {
                            if created_here {
                                *entry = None;
                            }
                        }
                        return Err(err.into());
                    }
                }
            }
        }

        let new_packets = encode_effect(effect);
        let old_packets = old.map(encode_effect);

        let stage_bytes: [&[u8]; EFFECT_STAGES] =
            [&new_packets.first, &new_packets.update, &new_packets.commit];
        for (stage, &new_bytes) in stage_bytes.iter().enumerate() {
            let changed = self.blind_upload
                || old_packets
                    .as_ref()
                    .is_none_or(|old_packets| old_packets.stage(stage) != new_bytes);
            if !changed {
                continue;
            }
            if let Some(transfer) = self.slots[slot][stage].as_mut() {
                transfer.cancel();
                transfer.buffer_mut().copy_from_slice(new_bytes);
                if let Err(err) = transfer.submit() {
                    tracing::error!(slot, stage, %err, "effect stage submission failed");
                    return Err(err.into());
                }
            }
        }

        Ok(())
    }

    /// Release an effect slot.
    ///
    /// The wheel has no delete packet; callers must have stopped playback
    /// with `play(id, 0)` first. Slot transfers stay allocated for reuse by
    /// the next upload and are reclaimed at [`EffectEngine::detach`].
    pub fn erase(&mut self, _effect_id: u8) -> DriverResult<()> {
        Ok(())
    }

    /// Start (`times > 0`) or stop (`times == 0`) playback of an uploaded
    /// effect.
    pub fn play(&self, effect_id: u8, times: u8) -> DriverResult<()> {
        let packet = commands::encode_play(effect_id, times);
        if let Err(err) = self.transport.submit_transient(&packet) {
            tracing::error!(effect_id, times, %err, "effect playback submission failed");
            return Err(err.into());
        }
        Ok(())
    }

    /// Apply a host-side 16-bit gain (0xFFFF = 100 %).
    ///
    /// Fire-and-forget: the store is updated once the submission is built,
    /// and a submit failure is only logged.
    pub fn set_gain(&self, gain: u16) {
        let native = convert::host_gain_to_native(gain);
        let packet = commands::encode_gain(native);
        self.settings.set_gain(native);
        if let Err(err) = self.transport.submit_transient(&packet) {
            tracing::error!(gain, %err, "gain submission failed");
        }
    }

    /// Cancel and release every transfer resource. Called on device
    /// removal; afterwards nothing is pending for any slot.
    pub fn detach(&mut self) {
        for stages in &mut self.slots {
            for entry in stages {
                if let Some(mut transfer) = entry.take() {
                    transfer.cancel();
                }
            }
        }
    }
}

impl Drop for EffectEngine {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;
    use tmx_wheel_hid_protocol::types::EffectKind;

    fn engine() -> (EffectEngine, MockTransport) {
        let transport = MockTransport::new();
        let settings = Arc::new(SettingsStore::new());
        let engine = EffectEngine::new(Arc::new(transport.clone()), settings);
        (engine, transport)
    }

    #[test]
    fn test_slot_out_of_range() {
        let (mut engine, _transport) = engine();
        let effect = Effect::new(
            MAX_EFFECTS as u8,
            EffectKind::Constant {
                level: 0,
                envelope: None,
            },
        );
        assert_eq!(
            engine.upload(&effect, None),
            Err(DriverError::SlotOutOfRange(MAX_EFFECTS as u8))
        );
    }

    #[test]
    fn test_erase_always_succeeds() {
        let (mut engine, transport) = engine();
        assert_eq!(engine.erase(3), Ok(()));
        assert_eq!(engine.erase(200), Ok(()));
        assert!(transport.submissions().is_empty());
        assert!(transport.transient_submissions().is_empty());
    }

    #[test]
    fn test_set_gain_updates_store_even_when_submit_fails() {
        let (engine, transport) = engine();
        transport.fail_submits_after(0);
        engine.set_gain(0xFFFF);
        assert_eq!(engine.settings.snapshot().gain, 0x80);
        assert!(transport.transient_submissions().is_empty());
    }
}
