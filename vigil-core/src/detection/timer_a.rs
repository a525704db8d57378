//! Packet-rate (timer) check.
//!
//! The client owes the server exactly one authoritative input every 50ms.
//! A balance accumulates the difference between real elapsed time and the
//! expected interval; clients ticking faster than real time drive it
//! negative.

use std::time::Instant;

use vigil_protocol::packets::ClientPacket;
use vigil_utils::math::round;

use super::{Detection, DetectionMetadata, DetectionView, Verdict};

/// Expected milliseconds between authoritative inputs.
const TICK_MILLIS: f64 = 50.0;
/// Balance deficit at which the client is considered to be speeding.
const MAX_DEFICIT: f64 = -250.0;
/// Credit cap, so a lag spike cannot bank unlimited fast inputs.
const MAX_CREDIT: f64 = 50.0;

/// Detects clients running their simulation faster than real time.
pub struct TimerA {
    metadata: DetectionMetadata,
    balance: f64,
    last_input: Option<Instant>,
}

impl TimerA {
    /// Creates the check with its stock thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            metadata: DetectionMetadata::new(1.0, 10.0, 25.0, 0),
            balance: 0.0,
            last_input: None,
        }
    }

    /// Feeds one input arrival time into the balance. Returns whether the
    /// deficit threshold was crossed (and resets the balance if so).
    pub fn observe(&mut self, now: Instant) -> bool {
        let Some(last) = self.last_input.replace(now) else {
            return false;
        };

        let elapsed = now.duration_since(last).as_secs_f64() * 1000.0;
        self.balance = (self.balance + elapsed - TICK_MILLIS).min(MAX_CREDIT);
        if self.balance < MAX_DEFICIT {
            self.balance = 0.0;
            return true;
        }
        false
    }
}

impl Default for TimerA {
    fn default() -> Self {
        Self::new()
    }
}

impl Detection for TimerA {
    fn kind(&self) -> &'static str {
        "Timer"
    }

    fn sub_kind(&self) -> &'static str {
        "A"
    }

    fn description(&self) -> &'static str {
        "Checks if the player is sending movement inputs faster than real time."
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
        if !matches!(packet, ClientPacket::PlayerAuthInput(_)) {
            return Verdict::None;
        }

        if self.observe(Instant::now()) {
            Verdict::Fail(vec![("balance", round(MAX_DEFICIT as f32, 0).to_string())])
        } else {
            Verdict::Pass(0.01)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn on_time_inputs_keep_the_balance_level() {
        let mut timer = TimerA::new();
        let base = Instant::now();
        for i in 0..100u64 {
            assert!(!timer.observe(base + Duration::from_millis(i * 50)));
        }
        assert!(timer.balance.abs() < 1e-6);
    }

    #[test]
    fn fast_inputs_drive_the_balance_into_deficit() {
        let mut timer = TimerA::new();
        let base = Instant::now();
        let mut tripped = false;
        // Inputs every 25ms: twice the legal rate.
        for i in 0..40u64 {
            tripped |= timer.observe(base + Duration::from_millis(i * 25));
        }
        assert!(tripped, "a 2x timer must trip the deficit threshold");
    }

    #[test]
    fn a_lag_spike_does_not_bank_unlimited_credit() {
        let mut timer = TimerA::new();
        let base = Instant::now();
        timer.observe(base);
        timer.observe(base + Duration::from_secs(10));
        assert!(timer.balance <= MAX_CREDIT);
    }
}
