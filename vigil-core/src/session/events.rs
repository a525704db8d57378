//! Structured events emitted to the upstream server's control channel.
//!
//! The upstream server (and any plugins on it) reacts to flags and latency
//! updates through named script-message events. The namespace is reserved:
//! clients attempting to send events under it are disconnected.

use serde_json::json;
use vigil_protocol::packets::ScriptMessage;

/// The event namespace reserved for the proxy on the control channel.
/// Inbound client script messages containing it are spoofing attempts.
pub const RESERVED_NAMESPACE: &str = "oomph:";

/// Identifier of the flag event.
pub const EVENT_FLAGGED: &str = "oomph:flagged";
/// Identifier of the latency report event.
pub const EVENT_LATENCY_UPDATE: &str = "oomph:latency_update";

/// A named JSON event for the control channel.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RemoteEvent {
    /// The namespaced event identifier.
    pub identifier: &'static str,
    /// The JSON payload.
    pub data: serde_json::Value,
}

impl RemoteEvent {
    /// Serializes the event into a script message.
    #[must_use]
    pub fn to_script_message(&self) -> ScriptMessage {
        ScriptMessage {
            identifier: self.identifier.to_string(),
            data: self.data.to_string(),
        }
    }
}

/// Builds the event emitted when a detection flags a player. The extra
/// key/value pairs ride along for plugins that want the raw numbers.
#[must_use]
pub fn flagged(
    player: &str,
    kind: &str,
    sub_kind: &str,
    violations: f64,
    extra: &[(&'static str, String)],
) -> RemoteEvent {
    let extra = extra
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(" ");
    RemoteEvent {
        identifier: EVENT_FLAGGED,
        data: json!({
            "player": player,
            "check_main": kind,
            "check_sub": sub_kind,
            "violations": (violations * 100.0).round() / 100.0,
            "extra": extra,
        }),
    }
}

/// Builds the periodic latency report event.
#[must_use]
pub fn latency_update(latency_ms: i64) -> RemoteEvent {
    RemoteEvent {
        identifier: EVENT_LATENCY_UPDATE,
        data: json!({ "latency_ms": latency_ms }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flagged_event_carries_rounded_violations() {
        let extra = vec![("x", "0.5".to_string())];
        let event = flagged("Steve", "Velocity", "B", 1.2345, &extra);
        assert_eq!(event.identifier, EVENT_FLAGGED);
        assert_eq!(event.data["violations"], 1.23);
        assert_eq!(event.data["check_main"], "Velocity");
        assert_eq!(event.data["extra"], "x=0.5");
    }

    #[test]
    fn events_serialize_under_the_reserved_namespace() {
        let msg = latency_update(42).to_script_message();
        assert!(msg.identifier.starts_with(RESERVED_NAMESPACE));
        assert!(msg.data.contains("42"));
    }
}
