//! The anti-cheat core of the vigil proxy.
//!
//! A [`session::Session`] terminates one client connection. Both packet
//! directions are demultiplexed through an ordered set of handlers under the
//! session's processing lock; an acknowledgement engine defers server-side
//! state mutations until the client has confirmed receipt of the packets
//! that caused them. Per authoritative input the core runs a faithful
//! replica of the client's movement simulation, compares it against what the
//! client reported, and feeds the result through a set of detections that
//! buffer, flag and finally punish abnormal behavior.

pub mod ack;
pub mod block;
pub mod config;
pub mod detection;
pub mod entity;
pub mod error;
pub mod handler;
pub mod movement;
pub mod session;
pub mod world;

pub use config::{AuthorityMode, SessionConfig};
pub use session::Session;
