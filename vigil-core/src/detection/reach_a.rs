//! Combat range check.
//!
//! An attack is validated against where the target *was* at the client tick
//! the attack happened on, reconstructed through the entity history ring, so
//! a laggy player is judged against the world it saw rather than the
//! server's present.

use glam::Vec3;
use vigil_protocol::packets::{ClientPacket, TransactionData, GAME_TYPE_CREATIVE};
use vigil_utils::math::round;

use super::{Detection, DetectionMetadata, DetectionView, Verdict};
use crate::movement::EYE_HEIGHT;

/// Survival attack range from the eye to the target's box.
const MAX_REACH: f32 = 3.0;
/// Leniency added on top of the range for hit-box edge noise.
const REACH_EPSILON: f32 = 0.1;

/// Detects attacks beyond the survival reach distance.
pub struct ReachA {
    metadata: DetectionMetadata,
}

impl ReachA {
    /// Creates the check with its stock thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectionMetadata::new(2.0, 15.0, 20.0, 400),
        }
    }
}

impl Default for ReachA {
    fn default() -> Self {
        Self::new()
    }
}

impl Detection for ReachA {
    fn kind(&self) -> &'static str {
        "Reach"
    }

    fn sub_kind(&self) -> &'static str {
        "A"
    }

    fn description(&self) -> &'static str {
        "Checks if the player is attacking entities beyond the survival reach distance."
    }

    fn punishable(&self) -> bool {
        true
    }

    fn metadata(&self) -> &DetectionMetadata {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut DetectionMetadata {
        &mut self.metadata
    }

    fn detect(&mut self, packet: &ClientPacket, view: &DetectionView<'_>) -> Verdict {
        let ClientPacket::InventoryTransaction(tx) = packet else {
            return Verdict::None;
        };
        let TransactionData::UseItemOnEntity {
            target_entity_runtime_id,
            action_type,
            ..
        } = tx.data
        else {
            return Verdict::None;
        };
        // Only attacks are ranged-checked; creative mode extends reach.
        if action_type != 1 || view.game_type == GAME_TYPE_CREATIVE {
            return Verdict::None;
        }

        let Some(target) = view.entities.find(target_entity_runtime_id) else {
            return Verdict::None;
        };
        let Some(rewound) = view
            .entities
            .rewind_position(target_entity_runtime_id, view.client_tick)
        else {
            return Verdict::None;
        };

        let eye = view.movement.client_position + Vec3::new(0.0, EYE_HEIGHT, 0.0);
        let distance = (target.aabb_at(rewound).closest_point(eye) - eye).length();
        if distance > MAX_REACH + REACH_EPSILON {
            Verdict::Fail(vec![("distance", round(distance, 4).to_string())])
        } else {
            Verdict::Pass(0.05)
        }
    }
}
