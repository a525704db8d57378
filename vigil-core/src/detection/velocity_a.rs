//! Vertical knockback check.

use vigil_protocol::packets::ClientPacket;
use vigil_utils::math::round;

use super::{Detection, DetectionMetadata, DetectionView, Verdict};

/// Expected vertical components below this are too small to ratio against.
const MIN_EXPECTED: f32 = 0.005;
/// Lower bound of a legitimate vertical knockback ratio.
const MIN_RATIO: f32 = 0.99;
/// Upper bound of a legitimate vertical knockback ratio.
const MAX_RATIO: f32 = 1.1;

/// Detects abnormal vertical knockback.
pub struct VelocityA {
    metadata: DetectionMetadata,
}

impl VelocityA {
    /// Creates the check with its stock thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectionMetadata::new(2.0, 10.0, 15.0, 400),
        }
    }
}

impl Default for VelocityA {
    fn default() -> Self {
        Self::new()
    }
}

impl Detection for VelocityA {
    fn kind(&self) -> &'static str {
        "Velocity"
    }

    fn sub_kind(&self) -> &'static str {
        "A"
    }

    fn description(&self) -> &'static str {
        "Checks if the player is taking an abnormal amount of vertical knockback."
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
        let expected = m.prev_server_movement.y;
        if m.motion_ticks != 1 || expected.abs() <= MIN_EXPECTED {
            return Verdict::None;
        }

        let ratio = m.client_movement.y / expected;
        if !(MIN_RATIO..=MAX_RATIO).contains(&ratio) && !m.teleporting && !m.vertically_collided {
            Verdict::Fail(vec![("y", round(ratio, 6).to_string())])
        } else {
            Verdict::Pass(0.1)
        }
    }
}
