//! Chat and system text.

/// Plain chat message type.
pub const TEXT_TYPE_CHAT: u8 = 1;

/// A text message travelling in either direction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    /// The text type; only chat is inspected by the proxy.
    pub text_type: u8,
    /// Name of the sender, empty for system messages.
    pub source_name: String,
    /// The message body.
    pub message: String,
    /// XUID of the sender. Stripped on the way upstream so server software
    /// does not treat proxied chat as spoofed.
    pub xuid: String,
}

impl Text {
    /// Creates a system chat message addressed to the client.
    #[must_use]
    pub fn system(message: impl Into<String>) -> Self {
        Self {
            text_type: TEXT_TYPE_CHAT,
            source_name: String::new(),
            message: message.into(),
            xuid: String::new(),
        }
    }
}
