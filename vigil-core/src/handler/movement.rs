//! Movement input intake, simulation and correction.
//!
//! Every authoritative input refreshes the movement state from the packet
//! and runs one simulation step against the world shadow. In complete
//! authority the client is corrected whenever the prediction diverges past
//! the tolerated radius.

use glam::Vec3;
use vigil_protocol::packets::{
    input_flags, ClientPacket, CorrectPlayerMovePrediction, PlayerAuthInput, PlayerMovementMode,
    ServerPacket, UpdateBlock, ATTRIBUTE_HEALTH, ATTRIBUTE_MOVEMENT_SPEED,
    BLOCK_UPDATE_NEIGHBOURS, MOVE_PLAYER_MODE_TELEPORT, RESPAWN_STATE_READY_TO_SPAWN,
};
use vigil_utils::math::round;

use super::{Handler, PacketVerdict};
use crate::ack::AckCommand;
use crate::config::AuthorityMode;
use crate::error::HandlerError;
use crate::movement::{
    simulate, BASE_SPEED, EYE_HEIGHT, GRAVITY, JUMP_VELOCITY, LOADED_CHUNK_GRACE_TICKS,
    SPRINT_SPEED_MULTIPLIER, VOID_LEVEL,
};
use crate::session::{DebugMode, Player};
use crate::world::WorldShadow;

/// Scale applied to the raw move vector before it becomes an impulse.
const IMPULSE_SCALE: f32 = 0.98;
/// Squared divergence tolerated before a correction is sent.
const CORRECTION_THRESHOLD_SQ: f32 = 0.09;
/// Ticks between full block resyncs around a corrected player.
const BLOCK_REFRESH_INTERVAL: u32 = 30;
/// Rewind history size forced onto the client on world join.
const FORCED_REWIND_HISTORY: i32 = 100;

/// Runs the authoritative movement pipeline.
pub struct MovementHandler;

impl MovementHandler {
    /// Creates the handler.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MovementHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for MovementHandler {
    fn id(&self) -> &'static str {
        "movement"
    }

    fn handle_client(
        &mut self,
        packet: &mut ClientPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        if let ClientPacket::PlayerAuthInput(input) = packet {
            process_input(player, input);
        }
        Ok(PacketVerdict::Continue)
    }

    fn handle_server(
        &mut self,
        packet: &mut ServerPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        match packet {
            ServerPacket::StartGame(start) => {
                player.runtime_id = start.entity_runtime_id;
                player.unique_id = start.entity_unique_id;
                player.game_type = start.player_game_mode;

                // The rewind correction protocol only works in this mode;
                // whatever the upstream wanted is overridden on the way out.
                start.movement_settings.movement_type = PlayerMovementMode::ServerWithRewind;
                start.movement_settings.rewind_history_size = FORCED_REWIND_HISTORY;

                let m = &mut player.movement;
                m.server_position = start.player_position - Vec3::new(0.0, EYE_HEIGHT, 0.0);
                m.client_position = m.server_position;
                m.prev_client_position = m.server_position;
                m.on_ground = true;
                m.yaw = start.yaw;
                m.pitch = start.pitch;
            }
            ServerPacket::MovePlayer(mv) if mv.entity_runtime_id == player.runtime_id => {
                mv.tick = 0;
                player.acks.defer(AckCommand::SelfTeleport {
                    position: mv.position,
                    teleport: mv.mode == MOVE_PLAYER_MODE_TELEPORT,
                });
            }
            ServerPacket::MoveActorAbsolute(mv) if mv.entity_runtime_id == player.runtime_id => {
                let teleport = mv.is_teleport();
                player.acks.defer(AckCommand::SelfTeleport {
                    position: mv.position,
                    teleport,
                });
            }
            ServerPacket::SetActorMotion(motion)
                if motion.entity_runtime_id == player.runtime_id =>
            {
                motion.tick = 0;
                player.acks.defer(AckCommand::SelfMotion {
                    velocity: motion.velocity,
                });
            }
            ServerPacket::SetActorData(data) if data.entity_runtime_id == player.runtime_id => {
                data.tick = 0;
                player.last_actor_data = Some(*data);
                if data.metadata.flags.is_some() {
                    let immobile = data
                        .metadata
                        .has_flag(vigil_protocol::packets::DATA_FLAG_IMMOBILE);
                    player.acks.defer(AckCommand::SelfImmobile { immobile });
                }
            }
            ServerPacket::UpdateAttributes(update)
                if update.entity_runtime_id == player.runtime_id =>
            {
                update.tick = 0;
                player.last_attributes = Some(update.clone());
                player.acks.defer(AckCommand::SelfAttributes {
                    movement_speed: update.value_of(ATTRIBUTE_MOVEMENT_SPEED),
                    dead: update.value_of(ATTRIBUTE_HEALTH).map(|h| h <= 0.0),
                });
            }
            ServerPacket::UpdateAbilities(abilities)
                if abilities.entity_unique_id == player.unique_id =>
            {
                player.acks.defer(AckCommand::SelfAbilities {
                    flying: abilities.flying,
                    no_clip: abilities.no_clip,
                });
            }
            ServerPacket::SetPlayerGameType(game) => {
                player.acks.defer(AckCommand::SetGameMode {
                    game_type: game.game_type,
                });
            }
            ServerPacket::MobEffect(effect) if effect.entity_runtime_id == player.runtime_id => {
                player.acks.defer(AckCommand::Effect {
                    operation: effect.operation,
                    effect_type: effect.effect_type,
                    amplifier: effect.amplifier,
                    duration: effect.duration,
                });
            }
            ServerPacket::Respawn(respawn) if respawn.state == RESPAWN_STATE_READY_TO_SPAWN => {
                player.acks.defer(AckCommand::SelfTeleport {
                    position: respawn.position,
                    teleport: true,
                });
            }
            _ => {}
        }
        Ok(PacketVerdict::Continue)
    }

    fn defer(&mut self, player: &mut Player) {
        // Teleport exemptions last exactly one input.
        player.movement.teleporting = false;
    }
}

/// Refreshes the movement state from an input packet, steps the simulation
/// and validates the result.
fn process_input(player: &mut Player, input: &PlayerAuthInput) {
    let m = &mut player.movement;

    m.prev_client_position = m.client_position;
    m.client_position = input.position - Vec3::new(0.0, EYE_HEIGHT, 0.0);
    m.client_movement = m.client_position - m.prev_client_position;
    m.client_predicted_movement = input.delta;
    m.yaw = input.yaw;
    m.pitch = input.pitch;

    if input.has_flag(input_flags::START_SPRINTING) {
        m.sprinting = true;
    } else if input.has_flag(input_flags::STOP_SPRINTING) {
        m.sprinting = false;
    }
    if input.has_flag(input_flags::START_SNEAKING) {
        m.sneaking = true;
    } else if input.has_flag(input_flags::STOP_SNEAKING) {
        m.sneaking = false;
    }
    m.jumping = input.has_flag(input_flags::START_JUMPING);
    m.jump_bind_pressed = input.has_flag(input_flags::JUMP_DOWN);
    m.sneak_bind_pressed = input.has_flag(input_flags::SNEAK_DOWN);
    m.sprint_bind_pressed = input.has_flag(input_flags::SPRINT_DOWN);

    m.in_void = m.client_position.y <= VOID_LEVEL;

    // Attributes reset to their base every frame; effects and the speed
    // attribute re-apply on top, exactly as the client recomputes them.
    m.jump_velocity = JUMP_VELOCITY;
    m.gravity = GRAVITY;
    m.speed = player.base_speed.unwrap_or(BASE_SPEED);
    player.tick_effects();

    let m = &mut player.movement;
    if m.sprinting {
        m.speed *= SPRINT_SPEED_MULTIPLIER;
    }
    m.speed = m.speed.max(0.0);

    m.strafe_impulse = input.move_vector.x * IMPULSE_SCALE;
    m.forward_impulse = input.move_vector.y * IMPULSE_SCALE;

    let feet_chunk = WorldShadow::chunk_pos_of(m.client_position.floor().as_ivec3());
    if player.world.chunk_loaded(feet_chunk) {
        player.in_loaded_chunk_ticks += 1;
    } else {
        player.in_loaded_chunk_ticks = 0;
    }

    let eligible =
        player.ready && player.in_loaded_chunk_ticks >= LOADED_CHUNK_GRACE_TICKS && !player.dead;
    let validated = simulate::update(&mut player.movement, &player.world, eligible);
    if validated {
        validate_movement(player);
    }
}

/// Compares prediction and report; on divergence past the threshold
/// (widened by any recent step-clip) the client gets corrected.
fn validate_movement(player: &mut Player) {
    if player.authority != AuthorityMode::Complete {
        return;
    }

    let m = &player.movement;
    let pos_diff = m.server_position - m.client_position;
    if pos_diff.length_squared() <= CORRECTION_THRESHOLD_SQ + m.step_clip_offset * m.step_clip_offset
    {
        return;
    }

    if player.debug.enabled(DebugMode::Movement) {
        let text = format!(
            "got->({}, {}, {}) want->({}, {}, {})",
            round(m.client_position.x, 3),
            round(m.client_position.y, 3),
            round(m.client_position.z, 3),
            round(m.server_position.x, 3),
            round(m.server_position.y, 3),
            round(m.server_position.z, 3),
        );
        player.message(text);
    }

    correct_movement(player);
}

/// Emits the correction packet plus the state resyncs the client needs to
/// replay from the corrected position.
fn correct_movement(player: &mut Player) {
    let m = &player.movement;
    if m.can_exempt || m.teleporting || m.in_unsupported_rewind_scenario {
        return;
    }

    // Periodically resync the world immediately around the player, so a
    // correction is never fighting a stale client-side block.
    if m.refresh_block_ticks >= BLOCK_REFRESH_INTERVAL {
        let blocks = player.world.nearby_blocks(&m.aabb());
        for (position, runtime_id) in blocks {
            player.write_packet(&ServerPacket::UpdateBlock(UpdateBlock {
                position,
                new_block_runtime_id: runtime_id,
                flags: BLOCK_UPDATE_NEIGHBOURS,
                layer: 0,
            }));
        }
        player.movement.refresh_block_ticks = 0;
    }

    // Re-broadcast the latest actor data and attributes so sneak, sprint,
    // speed and health agree on both sides of the correction.
    if let Some(mut actor_data) = player.last_actor_data {
        actor_data.tick = 0;
        player.write_packet(&ServerPacket::SetActorData(actor_data));
    }
    if let Some(mut attributes) = player.last_attributes.clone() {
        attributes.tick = 0;
        player.write_packet(&ServerPacket::UpdateAttributes(attributes));
    }

    let m = &player.movement;
    let correction = CorrectPlayerMovePrediction {
        position: m.server_position + Vec3::new(0.0, EYE_HEIGHT + 1e-3, 0.0),
        delta: m.server_movement,
        on_ground: m.on_ground,
        tick: player.client_tick,
    };
    player.write_packet(&ServerPacket::CorrectPlayerMovePrediction(correction));
}
