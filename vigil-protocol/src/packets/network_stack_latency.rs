//! Zero-payload latency probe.
//!
//! The server sends this with `needs_response` set; the client echoes the
//! same timestamp back. The proxy uses its own timestamp space (negative,
//! odd, strictly decreasing) to sequence deferred state mutations against
//! client-side packet arrival.

/// A latency probe or its echo.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkStackLatency {
    /// Probe identifier echoed verbatim by the client.
    pub timestamp: i64,
    /// Whether the receiver must echo the probe.
    pub needs_response: bool,
}
