//! Horizontal knockback check.
//!
//! One tick after the server sends a motion impulse, the client's reported
//! horizontal movement must match the simulated prediction. Anti-knockback
//! cheats reduce it (ratio below 1), a few crude ones amplify it.

use vigil_protocol::packets::ClientPacket;
use vigil_utils::math::round;

use super::{Detection, DetectionMetadata, DetectionView, Verdict};

/// Expected horizontal components below this are too small to ratio against.
const MIN_EXPECTED: f32 = 0.01;
/// Ratios at or below this count as reduced knockback.
const REDUCED_RATIO: f32 = 0.9999;
/// Ratios at or above this count as amplified knockback.
const AMPLIFIED_RATIO: f32 = 1.5;

/// Detects abnormal horizontal knockback.
pub struct VelocityB {
    metadata: DetectionMetadata,
}

impl VelocityB {
    /// Creates the check with its stock thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            // The buffer is unbounded for this check; three consecutive
            // offending inputs are required before violations accrue.
            metadata: DetectionMetadata::new(3.0, f64::INFINITY, 15.0, 400),
        }
    }
}

impl Default for VelocityB {
    fn default() -> Self {
        Self::new()
    }
}

impl Detection for VelocityB {
    fn kind(&self) -> &'static str {
        "Velocity"
    }

    fn sub_kind(&self) -> &'static str {
        "B"
    }

    fn description(&self) -> &'static str {
        "Checks if the player is taking an abnormal amount of horizontal knockback."
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
        if !matches!(packet, ClientPacket::PlayerAuthInput(_)) {
            return Verdict::None;
        }

        let m = view.movement;
        let expected = m.prev_server_movement;
        if m.motion_ticks != 1 || expected.x.abs() <= MIN_EXPECTED || expected.z.abs() <= MIN_EXPECTED {
            return Verdict::None;
        }

        let rx = m.client_movement.x / expected.x;
        let rz = m.client_movement.z / expected.z;
        let abnormal = (rx <= REDUCED_RATIO && rz <= REDUCED_RATIO)
            || rx >= AMPLIFIED_RATIO
            || rz >= AMPLIFIED_RATIO;

        if abnormal && !m.teleporting && !m.horizontally_collided {
            Verdict::Fail(vec![
                ("x", round(rx, 6).to_string()),
                ("z", round(rz, 6).to_string()),
            ])
        } else {
            Verdict::Pass(0.1)
        }
    }
}
