//! The detection runtime.
//!
//! A detection observes the client packet stream after every handler has
//! updated the shadow state, and answers with a verdict. Suspicion first
//! accumulates in a hysteresis buffer; only once the buffer crosses the
//! detection's fail threshold do violations accrue, and only sustained
//! violations reach the punishment path. Both the flag and the punishment
//! step run through user-supplied, cancellable hooks.

pub mod aim_a;
pub mod reach_a;
pub mod timer_a;
pub mod velocity_a;
pub mod velocity_b;

use vigil_protocol::packets::ClientPacket;

use crate::entity::EntityTracker;
use crate::movement::MovementState;

/// The message shown to a player removed by the punishment path.
pub const PUNISHMENT_MESSAGE: &str =
    "§c§lCheating Detected§r\n§cSuspicious gameplay was detected and you have\n§cbeen removed from the server.";

/// Key/value pairs attached to a flag, in insertion order, for logs and the
/// upstream flag event.
pub type ExtraData = Vec<(&'static str, String)>;

/// What a detection concluded about one packet.
pub enum Verdict {
    /// Nothing relevant observed.
    None,
    /// Behavior looked legitimate; decay the buffer by the given amount.
    Pass(f64),
    /// Behavior looked abnormal.
    Fail(ExtraData),
}

/// Mutable counters shared by every detection.
#[derive(Clone, Debug)]
pub struct DetectionMetadata {
    /// Current hysteresis buffer, in `[0, max_buffer]`.
    pub buffer: f64,
    /// Buffer level that must be reached before violations accrue.
    pub fail_buffer: f64,
    /// Upper bound of the buffer; `f64::INFINITY` for unbounded checks.
    pub max_buffer: f64,
    /// Accumulated violation level.
    pub violations: f64,
    /// Violation level at which the punishment hook fires.
    pub max_violations: f64,
    /// Ticks without flags after which a full violation no longer accrues;
    /// 0 disables trust scaling.
    pub trust_duration: i64,
    /// Server tick of the last flag.
    pub last_flagged: u64,
}

impl DetectionMetadata {
    /// Creates metadata with all counters at zero.
    #[must_use]
    pub const fn new(fail_buffer: f64, max_buffer: f64, max_violations: f64, trust_duration: i64) -> Self {
        Self {
            buffer: 0.0,
            fail_buffer,
            max_buffer,
            violations: 0.0,
            max_violations,
            trust_duration,
            last_flagged: 0,
        }
    }
}

/// Read access to the session state detections judge against.
pub struct DetectionView<'a> {
    /// The movement state after this packet's handlers ran.
    pub movement: &'a MovementState,
    /// The entity tracker, for rewind lookups.
    pub entities: &'a EntityTracker,
    /// The client tick after this packet's handlers ran.
    pub client_tick: u64,
    /// The current server tick.
    pub server_tick: u64,
    /// The player's game mode.
    pub game_type: i32,
}

/// One named check with immutable identity and mutable counters.
pub trait Detection: Send {
    /// Primary detection family, e.g. `Velocity`.
    fn kind(&self) -> &'static str;
    /// Variant within the family, e.g. `B`.
    fn sub_kind(&self) -> &'static str;
    /// What the detection looks for.
    fn description(&self) -> &'static str;
    /// Whether accumulated violations may remove the player.
    fn punishable(&self) -> bool;
    /// The detection's counters.
    fn metadata(&self) -> &DetectionMetadata;
    /// The detection's counters, mutably.
    fn metadata_mut(&mut self) -> &mut DetectionMetadata;
    /// Judges one client packet against the post-handler state.
    fn detect(&mut self, packet: &ClientPacket, view: &DetectionView<'_>) -> Verdict;
}

/// A cancellation token passed to event hooks.
pub struct EventCtx {
    cancelled: bool,
}

impl EventCtx {
    pub(crate) const fn new() -> Self {
        Self { cancelled: false }
    }

    /// Cancels the surrounding action.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the hook cancelled the action.
    #[must_use]
    pub const fn cancelled(&self) -> bool {
        self.cancelled
    }
}

/// User hooks into the flag and punishment pipeline.
pub trait EventHandler: Send + Sync {
    /// Called when a detection's buffer crossed its fail threshold.
    /// Cancelling restores the violation counter.
    fn on_flagged(
        &self,
        _ctx: &mut EventCtx,
        _kind: &'static str,
        _sub_kind: &'static str,
        _violations: f64,
        _extra: &ExtraData,
    ) {
    }

    /// Called before a punishable detection removes the player. The message
    /// may be rewritten; cancelling keeps the player connected.
    fn on_punishment(&self, _ctx: &mut EventCtx, _message: &mut String) {}
}

/// The default hook set: everything proceeds unmodified.
pub struct NopEventHandler;

impl EventHandler for NopEventHandler {}

/// The stock detection set, in run order.
#[must_use]
pub fn default_detections() -> Vec<Box<dyn Detection>> {
    vec![
        Box::new(velocity_a::VelocityA::new()),
        Box::new(velocity_b::VelocityB::new()),
        Box::new(reach_a::ReachA::new()),
        Box::new(timer_a::TimerA::new()),
        Box::new(aim_a::AimA::new()),
    ]
}

/// Decays a detection's buffer by `amount`, clamping at zero.
pub fn pass(metadata: &mut DetectionMetadata, amount: f64) {
    metadata.buffer = (metadata.buffer - amount).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pass_never_drives_the_buffer_negative() {
        let mut m = DetectionMetadata::new(3.0, 10.0, 20.0, 0);
        m.buffer = 0.05;
        pass(&mut m, 0.1);
        assert_eq!(m.buffer, 0.0);
    }
}
