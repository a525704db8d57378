//! Error types for the anti-cheat core.
//!
//! Protocol violations carry a fixed disconnect reason; transient handler
//! errors are logged at the dispatch layer and processing continues with a
//! safe default.

use thiserror::Error;

/// A reason the proxy terminates a session on its own authority.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The client negotiated client-side chunk caching, which the proxy's
    /// world shadow cannot follow.
    #[error("client-side chunk caching is not supported")]
    ChunkCacheUnsupported,
    /// A chunk payload failed to decode; the world shadow would diverge.
    #[error("internal error: failed to decode chunk: {0}")]
    InternalDecodeChunk(String),
    /// The client sent a script message under the proxy's own namespace.
    /// Disconnected with a blank kick screen.
    #[error("\t")]
    ScriptMessageAbuse,
    /// A detection accumulated enough violations to punish.
    #[error("{0}")]
    Punishment(String),
    /// An unrecoverable internal error in the session's own pipeline.
    #[error("internal error: {0}")]
    Internal(String),
}

/// A recoverable error inside a single handler. Dispatch logs these and
/// keeps running the remaining handlers.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum HandlerError {
    /// A packet referenced a block runtime ID the host never registered.
    #[error("unknown block runtime ID {0}")]
    UnknownBlock(u32),
    /// A packet referenced an entity the tracker does not know.
    #[error("no tracked entity with runtime ID {0}")]
    MissingEntity(u64),
}

/// An error reported by the host's chunk codec.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{0}")]
pub struct ChunkDecodeError(pub String);
