//! Connection termination.

/// Disconnects the client with a message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Disconnect {
    /// Whether the client hides the disconnection screen.
    pub hide_disconnection_screen: bool,
    /// The reason shown to the player.
    pub message: String,
}
