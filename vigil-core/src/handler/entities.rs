//! Entity tracking.
//!
//! Mirrors every non-self entity the client can see. In semi authority the
//! tracker must match what the client has *rendered*, so spawns and moves
//! land only after the client acks them; in complete authority moves land
//! immediately and clicks are re-validated against the rewind ring instead.

use vigil_protocol::packets::{ClientPacket, ServerPacket};

use super::{Handler, PacketVerdict};
use crate::ack::AckCommand;
use crate::config::AuthorityMode;
use crate::entity::Entity;
use crate::error::HandlerError;
use crate::session::Player;

/// Keeps the entity tracker in sync with intercepted spawn/move packets.
pub struct EntityHandler;

impl EntityHandler {
    /// Creates the handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for EntityHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for EntityHandler {
    fn id(&self) -> &'static str {
        "entities"
    }

    fn handle_client(
        &mut self,
        packet: &mut ClientPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        // In semi authority the history must sample what the client has
        // seen, which advances with its inputs rather than our tick.
        if matches!(packet, ClientPacket::PlayerAuthInput(_))
            && player.authority == AuthorityMode::Semi
        {
            let tick = player.server_tick;
            player.entities.tick(tick);
        }
        Ok(PacketVerdict::Continue)
    }

    fn handle_server(
        &mut self,
        packet: &mut ServerPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        match packet {
            ServerPacket::AddActor(add) => {
                if add.entity_runtime_id == player.runtime_id {
                    return Ok(PacketVerdict::Continue);
                }
                let mut entity = Entity::new(
                    add.position,
                    add.velocity,
                    player.entities.history_capacity(),
                    false,
                );
                apply_bounds(&mut entity, &add.metadata);
                player.acks.defer(AckCommand::AddEntity {
                    runtime_id: add.entity_runtime_id,
                    entity: Box::new(entity),
                });
            }
            ServerPacket::AddPlayer(add) => {
                if add.entity_runtime_id == player.runtime_id {
                    return Ok(PacketVerdict::Continue);
                }
                let mut entity = Entity::new(
                    add.position,
                    add.velocity,
                    player.entities.history_capacity(),
                    true,
                );
                apply_bounds(&mut entity, &add.metadata);
                player.acks.defer(AckCommand::AddEntity {
                    runtime_id: add.entity_runtime_id,
                    entity: Box::new(entity),
                });
            }
            ServerPacket::RemoveActor(remove) => {
                if remove.entity_unique_id != player.unique_id {
                    // Runtime and unique IDs coincide for the servers the
                    // proxy fronts; the tracker is keyed by runtime ID.
                    player.acks.defer(AckCommand::RemoveEntity {
                        runtime_id: remove.entity_unique_id as u64,
                    });
                }
            }
            ServerPacket::MoveActorAbsolute(mv) => {
                if mv.entity_runtime_id == player.runtime_id {
                    return Ok(PacketVerdict::Continue);
                }
                self.move_entity(player, mv.entity_runtime_id, mv.position)?;
            }
            ServerPacket::MovePlayer(mv) => {
                if mv.entity_runtime_id == player.runtime_id {
                    return Ok(PacketVerdict::Continue);
                }
                self.move_entity(player, mv.entity_runtime_id, mv.position)?;
            }
            ServerPacket::SetActorMotion(motion) => {
                if motion.entity_runtime_id == player.runtime_id {
                    return Ok(PacketVerdict::Continue);
                }
                if player.entities.find(motion.entity_runtime_id).is_none() {
                    return Err(HandlerError::MissingEntity(motion.entity_runtime_id));
                }
                player.acks.defer(AckCommand::EntityMotion {
                    runtime_id: motion.entity_runtime_id,
                    velocity: motion.velocity,
                });
            }
            ServerPacket::SetActorData(data) => {
                if data.entity_runtime_id == player.runtime_id {
                    return Ok(PacketVerdict::Continue);
                }
                player.acks.defer(AckCommand::EntityBounds {
                    runtime_id: data.entity_runtime_id,
                    width: data.metadata.bounding_box_width,
                    height: data.metadata.bounding_box_height,
                    scale: data.metadata.scale,
                });
            }
            _ => {}
        }
        Ok(PacketVerdict::Continue)
    }

    fn on_tick(&mut self, player: &mut Player) {
        if player.authority == AuthorityMode::Complete {
            let tick = player.server_tick;
            player.entities.tick(tick);
        }
    }
}

impl EntityHandler {
    /// Routes a non-self move: acked in semi authority, immediate in
    /// complete authority.
    fn move_entity(
        &self,
        player: &mut Player,
        runtime_id: u64,
        position: glam::Vec3,
    ) -> Result<(), HandlerError> {
        match player.authority {
            AuthorityMode::Semi => {
                player.acks.defer(AckCommand::MoveEntity {
                    runtime_id,
                    position,
                });
            }
            AuthorityMode::Complete => {
                let Some(entity) = player.entities.find_mut(runtime_id) else {
                    return Err(HandlerError::MissingEntity(runtime_id));
                };
                entity.move_to(position);
            }
            AuthorityMode::None => {}
        }
        Ok(())
    }
}

fn apply_bounds(entity: &mut Entity, metadata: &vigil_protocol::packets::ActorMetadata) {
    if let Some(width) = metadata.bounding_box_width {
        entity.width = width;
    }
    if let Some(height) = metadata.bounding_box_height {
        entity.height = height;
    }
    if let Some(scale) = metadata.scale {
        entity.scale = scale;
    }
}
