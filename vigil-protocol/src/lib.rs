//! Typed packet values for the Bedrock game protocol.
//!
//! The proxy sits behind a transport layer that owns RakNet framing,
//! encryption and the wire codec; packets arrive here as already-decoded
//! values and leave the same way. Only the subset of the protocol the
//! anti-cheat core consumes is typed out; everything else flows through a
//! pass-through variant untouched.

pub mod packets;

pub use packets::{ClientPacket, ServerPacket};
