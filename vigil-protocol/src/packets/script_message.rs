//! Scripting-event messages, also used as the proxy's control channel
//! towards the upstream server.

/// A named event with an arbitrary string payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptMessage {
    /// Event identifier, conventionally namespaced (`namespace:event`).
    pub identifier: String,
    /// The event payload, JSON for the proxy's own events.
    pub data: String,
}
