//! Rotation sanity check.

use vigil_protocol::packets::ClientPacket;
use vigil_utils::math::round;

use super::{Detection, DetectionMetadata, DetectionView, Verdict};

/// The client clamps pitch to ±90°; anything beyond is synthesized.
const MAX_PITCH: f32 = 90.1;

/// Detects rotations a vanilla client cannot produce.
pub struct AimA {
    metadata: DetectionMetadata,
}

impl AimA {
    /// Creates the check with its stock thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectionMetadata::new(1.0, 5.0, 10.0, 0),
        }
    }
}

impl Default for AimA {
    fn default() -> Self {
        Self::new()
    }
}

impl Detection for AimA {
    fn kind(&self) -> &'static str {
        "Aim"
    }

    fn sub_kind(&self) -> &'static str {
        "A"
    }

    fn description(&self) -> &'static str {
        "Checks if the player's camera pitch is outside the range a vanilla client can produce."
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

    fn detect(&mut self, packet: &ClientPacket, _view: &DetectionView<'_>) -> Verdict {
        let ClientPacket::PlayerAuthInput(input) = packet else {
            return Verdict::None;
        };

        if input.pitch.abs() > MAX_PITCH {
            Verdict::Fail(vec![("pitch", round(input.pitch, 2).to_string())])
        } else {
            Verdict::Pass(0.01)
        }
    }
}
