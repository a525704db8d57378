//! The packet demultiplexer and its handlers.
//!
//! Handlers are registered in a fixed order and invoked in that order for
//! every packet of both directions; all of them run under the session's
//! processing lock. A handler may consume a packet (stop it from being
//! forwarded) but never stops the remaining handlers from seeing it, and a
//! recoverable error in one handler is logged without aborting the chain.

pub mod chunks;
pub mod entities;
pub mod latency;
pub mod movement;

use indexmap::IndexMap;
use vigil_protocol::packets::{ClientPacket, ServerPacket};

use crate::error::HandlerError;
use crate::session::Player;

/// What a handler decided about a packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketVerdict {
    /// The packet keeps flowing to its original destination.
    Continue,
    /// The packet is consumed by the proxy and not forwarded.
    Consume,
}

/// One stage of the per-player pipeline.
#[allow(unused_variables)]
pub trait Handler: Send {
    /// Stable identifier, used for registry lookups and log lines.
    fn id(&self) -> &'static str;

    /// Observes a client-bound-for-server packet.
    fn handle_client(
        &mut self,
        packet: &mut ClientPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        Ok(PacketVerdict::Continue)
    }

    /// Observes a server-bound-for-client packet.
    fn handle_server(
        &mut self,
        packet: &mut ServerPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        Ok(PacketVerdict::Continue)
    }

    /// Runs once at the end of every authoritative input.
    fn on_tick(&mut self, player: &mut Player) {}

    /// Runs after the tick, for transient state that must not leak into the
    /// next input.
    fn defer(&mut self, player: &mut Player) {}
}

/// An ordered registry of handlers, keyed by their string ID. Registration
/// order is invocation order.
pub struct HandlerRegistry {
    handlers: IndexMap<&'static str, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: IndexMap::new(),
        }
    }

    /// Creates the stock pipeline: latency, chunks, entities, movement.
    #[must_use]
    pub fn stock() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(latency::LatencyHandler::new()));
        registry.register(Box::new(chunks::ChunksHandler::new()));
        registry.register(Box::new(entities::EntityHandler::new()));
        registry.register(Box::new(movement::MovementHandler::new()));
        registry
    }

    /// Appends a handler. Re-registering an ID replaces the old handler but
    /// keeps its position.
    pub fn register(&mut self, handler: Box<dyn Handler>) {
        self.handlers.insert(handler.id(), handler);
    }

    /// Runs every handler over a client packet, in order. Errors are logged
    /// and the chain continues; the verdicts are OR-ed together.
    pub fn dispatch_client(&mut self, packet: &mut ClientPacket, player: &mut Player) -> PacketVerdict {
        let mut verdict = PacketVerdict::Continue;
        for (id, handler) in &mut self.handlers {
            match handler.handle_client(packet, player) {
                Ok(PacketVerdict::Consume) => verdict = PacketVerdict::Consume,
                Ok(PacketVerdict::Continue) => {}
                Err(err) => log::warn!("handler {id} failed on {}: {err}", packet.kind()),
            }
        }
        verdict
    }

    /// Runs every handler over a server packet, in order.
    pub fn dispatch_server(&mut self, packet: &mut ServerPacket, player: &mut Player) -> PacketVerdict {
        let mut verdict = PacketVerdict::Continue;
        for (id, handler) in &mut self.handlers {
            match handler.handle_server(packet, player) {
                Ok(PacketVerdict::Consume) => verdict = PacketVerdict::Consume,
                Ok(PacketVerdict::Continue) => {}
                Err(err) => log::warn!("handler {id} failed on {}: {err}", packet.kind()),
            }
        }
        verdict
    }

    /// Runs every handler's tick hook, then every defer hook.
    pub fn tick(&mut self, player: &mut Player) {
        for handler in self.handlers.values_mut() {
            handler.on_tick(player);
        }
        for handler in self.handlers.values_mut() {
            handler.defer(player);
        }
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
