//! The per-player session: orchestrator of handlers, acknowledgements,
//! simulation and detections.
//!
//! One session terminates one client connection. All processing, in both
//! packet directions, happens under the session's single processing lock;
//! a player runs on exactly one worker at a time and nothing inside the
//! lock suspends. Panics are caught at the packet boundary and terminate
//! only the offending session.

mod debug;
pub mod events;

pub use debug::{DebugMode, DebugState, LoggingType};

use std::collections::VecDeque;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use glam::Vec3;
use rustc_hash::FxHashMap;
use vigil_protocol::packets::{
    ClientPacket, Disconnect, MobEquipment, NetworkStackLatency, ServerPacket, SetActorData,
    Text, TransactionData, UpdateAttributes, ANIMATE_ACTION_SWING_ARM, EFFECT_JUMP_BOOST,
    EFFECT_SLOWNESS, EFFECT_SPEED, GAME_TYPE_SPECTATOR, GAME_TYPE_SURVIVAL, MOB_EFFECT_REMOVE,
    RESPAWN_STATE_CLIENT_READY_TO_SPAWN,
};
use vigil_utils::locks::SyncMutex;
use vigil_utils::pool::SCRATCH;

use crate::ack::{AckCommand, AckEngine};
use crate::block::ChunkCodec;
use crate::config::{AuthorityMode, SessionConfig};
use crate::detection::{
    self, Detection, DetectionView, EventCtx, EventHandler, ExtraData, NopEventHandler, Verdict,
    PUNISHMENT_MESSAGE,
};
use crate::entity::EntityTracker;
use crate::error::DisconnectReason;
use crate::handler::{HandlerRegistry, PacketVerdict};
use crate::movement::{MovementState, EYE_HEIGHT};
use crate::world::WorldShadow;

/// Ticks a click stays inside the clicks-per-second window.
const CLICK_WINDOW_TICKS: u64 = 20;

/// The client side of the transport, behind which all blocking I/O lives.
pub trait PacketSink: Send + Sync {
    /// Writes one packet towards the client.
    fn write_packet(&self, packet: &ServerPacket) -> io::Result<()>;
    /// The transport's current latency estimate, in milliseconds.
    fn latency_ms(&self) -> i64;
    /// Closes the underlying connection. Must be idempotent.
    fn close(&self);
}

/// The control channel towards the upstream game server.
pub trait ControlSink: Send + Sync {
    /// Delivers a structured event to the upstream server.
    fn send_remote_event(&self, event: &events::RemoteEvent);
}

/// A status effect currently applied to the player.
#[derive(Clone, Copy, Debug)]
pub struct EffectInstance {
    /// Amplifier, zero-based.
    pub amplifier: i32,
    /// Remaining duration in ticks.
    pub duration: i32,
}

/// Click bookkeeping for combat checks and the clicks debug sink.
#[derive(Clone, Debug, Default)]
pub struct ClickTracker {
    /// Whether a click happened during the current input.
    pub clicking: bool,
    ticks: VecDeque<u64>,
}

impl ClickTracker {
    /// Registers a click at `tick` and prunes the CPS window.
    pub fn click(&mut self, tick: u64) {
        self.clicking = true;
        self.ticks.push_back(tick);
        while self
            .ticks
            .front()
            .is_some_and(|t| *t + CLICK_WINDOW_TICKS < tick)
        {
            self.ticks.pop_front();
        }
    }

    /// Clicks inside the current window.
    #[must_use]
    pub fn cps(&self) -> usize {
        self.ticks.len()
    }
}

/// All state owned by one player session. Handlers receive this mutably
/// under the processing lock.
pub struct Player {
    conn: Arc<dyn PacketSink>,
    control: Arc<dyn ControlSink>,
    codec: Arc<dyn ChunkCodec>,
    event_handler: Arc<dyn EventHandler>,

    /// Display name, for logs and flag events.
    pub name: String,
    /// The player's runtime ID, learned from the world-join packet.
    pub runtime_id: u64,
    /// The player's unique ID, learned from the world-join packet.
    pub unique_id: i64,
    /// Counts authoritative inputs received.
    pub client_tick: u64,
    /// Counts orchestrator ticks.
    pub server_tick: u64,
    /// How much authority the proxy exercises.
    pub authority: AuthorityMode,
    /// The client has confirmed receipt of its first terrain.
    pub ready: bool,
    /// Consecutive inputs spent inside a loaded shadow chunk.
    pub in_loaded_chunk_ticks: u32,
    /// The player's current game mode.
    pub game_type: i32,
    /// The player is dead and awaiting respawn.
    pub dead: bool,
    /// The device input mode from the latest input.
    pub input_mode: u32,
    /// Ground speed from the movement-speed attribute, when the server has
    /// sent one.
    pub base_speed: Option<f32>,
    /// Game-stack latency measured through ack probes.
    pub stack_latency_ms: i64,
    /// A latency probe is in flight.
    pub latency_probe_pending: bool,

    /// The movement simulation state.
    pub movement: MovementState,
    /// The shadow copy of the client-visible world.
    pub world: WorldShadow,
    /// Tracked non-self entities.
    pub entities: EntityTracker,
    /// The acknowledgement engine.
    pub acks: AckEngine,
    /// Debug sink state.
    pub debug: DebugState,
    /// Click bookkeeping.
    pub clicks: ClickTracker,
    /// Active status effects by effect type.
    pub effects: FxHashMap<i32, EffectInstance>,

    /// Most recent self actor-data packet, re-sent with corrections.
    pub last_actor_data: Option<SetActorData>,
    /// Most recent self attributes packet, re-sent with corrections.
    pub last_attributes: Option<UpdateAttributes>,
    /// Most recent held-item packet, for combat context.
    pub last_equipment: Option<MobEquipment>,

    /// The session is closed; packet arrivals return immediately.
    pub closed: bool,
}

impl Player {
    fn new(
        name: String,
        conn: Arc<dyn PacketSink>,
        control: Arc<dyn ControlSink>,
        codec: Arc<dyn ChunkCodec>,
        event_handler: Arc<dyn EventHandler>,
        config: &SessionConfig,
    ) -> Self {
        Self {
            conn,
            control,
            codec,
            event_handler,
            name,
            runtime_id: 0,
            unique_id: 0,
            client_tick: 0,
            server_tick: 0,
            authority: config.authority,
            ready: false,
            in_loaded_chunk_ticks: 0,
            game_type: GAME_TYPE_SURVIVAL,
            dead: false,
            input_mode: 0,
            base_speed: None,
            stack_latency_ms: 0,
            latency_probe_pending: false,
            movement: MovementState::new(),
            world: WorldShadow::new(),
            entities: EntityTracker::new(config.entity_history_capacity),
            acks: AckEngine::new(),
            debug: DebugState::new(),
            clicks: ClickTracker::default(),
            effects: FxHashMap::default(),
            last_actor_data: None,
            last_attributes: None,
            last_equipment: None,
            closed: false,
        }
    }

    /// Writes a packet to the client. A transport failure closes the
    /// session; no recovery is attempted.
    pub fn write_packet(&mut self, packet: &ServerPacket) {
        if self.closed {
            return;
        }
        if let Err(err) = self.conn.write_packet(packet) {
            log::error!("{}: transport write failed: {err}", self.name);
            self.close();
        }
    }

    /// Sends a chat message to the player.
    pub fn message(&mut self, text: impl Into<String>) {
        let packet = ServerPacket::Text(Text::system(text));
        self.write_packet(&packet);
    }

    /// Delivers debug output for `mode`, honoring the configured sink.
    pub fn debug_message(&mut self, mode: DebugMode, text: impl Into<String>) {
        if !self.debug.enabled(mode) {
            return;
        }
        let text = text.into();
        match self.debug.logging {
            LoggingType::Message => self.message(format!("[{}] {text}", mode.name())),
            LoggingType::LogFile => log::debug!("{} [{}] {text}", self.name, mode.name()),
        }
    }

    /// Emits a structured event to the upstream server.
    pub fn send_remote_event(&self, event: &events::RemoteEvent) {
        if self.closed {
            return;
        }
        self.control.send_remote_event(event);
    }

    /// The transport's latency estimate in milliseconds.
    #[must_use]
    pub fn transport_latency_ms(&self) -> i64 {
        self.conn.latency_ms()
    }

    /// Registers a click from an attack transaction or arm swing.
    pub fn register_click(&mut self) {
        let tick = self.client_tick;
        self.clicks.click(tick);
        if self.debug.enabled(DebugMode::Clicks) {
            let cps = self.clicks.cps();
            self.message(format!("cps: {cps}"));
        }
    }

    /// Applies active effects to the per-input movement attributes and ages
    /// them by one tick.
    pub fn tick_effects(&mut self) {
        let movement = &mut self.movement;
        self.effects.retain(|effect_type, effect| {
            let level = (effect.amplifier + 1) as f32;
            match *effect_type {
                EFFECT_SPEED => movement.speed *= 1.0 + 0.2 * level,
                EFFECT_SLOWNESS => movement.speed *= (1.0 - 0.15 * level).max(0.0),
                EFFECT_JUMP_BOOST => movement.jump_velocity += 0.1 * level,
                _ => {}
            }
            effect.duration -= 1;
            effect.duration > 0
        });
    }

    /// Disconnects the player with a reason. Idempotent.
    pub fn disconnect(&mut self, reason: &DisconnectReason) {
        if self.closed {
            return;
        }
        let packet = ServerPacket::Disconnect(Disconnect {
            hide_disconnection_screen: false,
            message: reason.to_string(),
        });
        let _ = self.conn.write_packet(&packet);
        self.close();
    }

    /// Closes the session: drops all pending acknowledgements unexecuted
    /// and shuts the transport. Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.acks.drop_all();
        self.conn.close();
    }

    /// Seals and sends any pending acknowledgement batch on a fresh probe.
    pub fn flush_acks(&mut self) {
        if let Some(timestamp) = self.acks.flush() {
            self.debug_message(DebugMode::Acks, format!("probe {timestamp} sent"));
            self.write_packet(&ServerPacket::NetworkStackLatency(NetworkStackLatency {
                timestamp,
                needs_response: true,
            }));
        }
    }

    /// Executes the batch the client just acked, if the timestamp is ours.
    pub fn execute_acks(&mut self, timestamp: i64) -> bool {
        let Some(batch) = self.acks.execute(timestamp) else {
            return false;
        };
        self.debug_message(
            DebugMode::Acks,
            format!("probe {timestamp} acked ({} commands)", batch.len()),
        );
        for command in batch {
            if self.closed {
                break;
            }
            self.apply_ack(command);
        }
        true
    }

    fn apply_ack(&mut self, command: AckCommand) {
        match command {
            AckCommand::PlayerInitialized => self.ready = true,
            AckCommand::UpdateLatency { sent_at } => {
                self.stack_latency_ms = sent_at.elapsed().as_millis() as i64;
                self.latency_probe_pending = false;
                let ms = self.stack_latency_ms;
                self.debug_message(DebugMode::Latency, format!("game stack: {ms}ms"));
            }
            AckCommand::AddEntity { runtime_id, entity } => {
                self.entities.add_entity(runtime_id, *entity);
            }
            AckCommand::RemoveEntity { runtime_id } => self.entities.remove_entity(runtime_id),
            AckCommand::MoveEntity {
                runtime_id,
                position,
            } => match self.entities.find_mut(runtime_id) {
                Some(entity) => entity.move_to(position),
                None => log::debug!("{}: move for untracked entity {runtime_id}", self.name),
            },
            AckCommand::EntityMotion {
                runtime_id,
                velocity,
            } => {
                if let Some(entity) = self.entities.find_mut(runtime_id) {
                    entity.recv_velocity = velocity;
                }
            }
            AckCommand::EntityBounds {
                runtime_id,
                width,
                height,
                scale,
            } => {
                if let Some(entity) = self.entities.find_mut(runtime_id) {
                    if let Some(width) = width {
                        entity.width = width;
                    }
                    if let Some(height) = height {
                        entity.height = height;
                    }
                    if let Some(scale) = scale {
                        entity.scale = scale;
                    }
                }
            }
            AckCommand::SelfTeleport { position, teleport } => {
                self.movement.server_position = position - Vec3::new(0.0, EYE_HEIGHT, 0.0);
                if teleport {
                    self.movement.teleporting = true;
                }
            }
            AckCommand::SelfMotion { velocity } => {
                self.movement.update_server_sent_velocity(velocity);
            }
            AckCommand::SelfImmobile { immobile } => self.movement.immobile = immobile,
            AckCommand::SelfAbilities { flying, no_clip } => {
                self.movement.flying = flying;
                self.movement.no_clip = no_clip;
            }
            AckCommand::SelfAttributes {
                movement_speed,
                dead,
            } => {
                if movement_speed.is_some() {
                    self.base_speed = movement_speed;
                }
                if let Some(dead) = dead {
                    self.dead = dead;
                }
            }
            AckCommand::SetBlock {
                position,
                runtime_id,
            } => self.world.set_block(position, runtime_id),
            AckCommand::DecodeChunk {
                position,
                sub_chunk_count,
                cache_enabled,
                payload,
            } => {
                if cache_enabled {
                    self.disconnect(&DisconnectReason::ChunkCacheUnsupported);
                    return;
                }
                let mut scratch = SCRATCH.get();
                let result = self.codec.decode(&payload, sub_chunk_count, &mut scratch);
                SCRATCH.put(scratch);
                match result {
                    Ok(column) => {
                        self.world.add_chunk(position, column);
                        self.ready = true;
                        self.debug_message(DebugMode::Chunks, format!("added chunk {position:?}"));
                    }
                    Err(err) => {
                        self.disconnect(&DisconnectReason::InternalDecodeChunk(err.to_string()));
                    }
                }
            }
            AckCommand::DecodeSubChunks {
                position,
                entries,
                cache_enabled,
            } => {
                if cache_enabled {
                    self.disconnect(&DisconnectReason::ChunkCacheUnsupported);
                    return;
                }
                self.apply_sub_chunks(position, entries);
            }
            AckCommand::SetGameMode { game_type } => {
                self.game_type = game_type;
                if game_type == GAME_TYPE_SPECTATOR {
                    self.movement.flying = true;
                    self.movement.no_clip = true;
                }
            }
            AckCommand::Effect {
                operation,
                effect_type,
                amplifier,
                duration,
            } => {
                if operation == MOB_EFFECT_REMOVE {
                    self.effects.remove(&effect_type);
                } else {
                    self.effects.insert(
                        effect_type,
                        EffectInstance {
                            amplifier,
                            duration,
                        },
                    );
                }
            }
        }
    }

    fn apply_sub_chunks(
        &mut self,
        base: glam::IVec3,
        entries: Vec<([i8; 3], u8, bytes::Bytes)>,
    ) {
        use vigil_protocol::packets::{ChunkPos, SUB_CHUNK_RESULT_SUCCESS, SUB_CHUNK_RESULT_SUCCESS_ALL_AIR};

        for (offset, result, payload) in entries {
            if result != SUB_CHUNK_RESULT_SUCCESS && result != SUB_CHUNK_RESULT_SUCCESS_ALL_AIR {
                self.debug_message(
                    DebugMode::Chunks,
                    format!("unhandled sub-chunk result {result} at {base:?}"),
                );
                continue;
            }

            let chunk_pos = ChunkPos::new(
                base.x + i32::from(offset[0]),
                base.z + i32::from(offset[2]),
            );
            let y_index = (base.y + i32::from(offset[1])) as i8;
            let column = self.world.take_chunk(chunk_pos);

            let payload = if result == SUB_CHUNK_RESULT_SUCCESS_ALL_AIR {
                &[][..]
            } else {
                &payload[..]
            };

            let mut scratch = SCRATCH.get();
            let folded = self
                .codec
                .apply_sub_chunk(column, y_index, payload, &mut scratch);
            SCRATCH.put(scratch);

            match folded {
                Ok(column) => {
                    self.world.add_chunk(chunk_pos, column);
                    self.ready = true;
                }
                Err(err) => {
                    self.disconnect(&DisconnectReason::InternalDecodeChunk(err.to_string()));
                    return;
                }
            }
        }
    }

    /// Runs the fail half of the detection pipeline: buffer, violations,
    /// hooks, flag event, punishment.
    pub fn fail_detection(&mut self, detection: &mut dyn Detection, mut extra: ExtraData) {
        extra.push(("latency", format!("{}ms", self.stack_latency_ms)));

        let now = self.server_tick;
        let old_violations;
        {
            let m = detection.metadata_mut();
            m.buffer = (m.buffer + 1.0).min(m.max_buffer);
            if m.buffer < m.fail_buffer {
                return;
            }
            old_violations = m.violations;
            if m.trust_duration > 0 {
                let since = now.saturating_sub(m.last_flagged) as f64;
                m.violations += (m.trust_duration as f64 - since).max(0.0) / m.trust_duration as f64;
            } else {
                m.violations += 1.0;
            }
        }

        let mut ctx = EventCtx::new();
        let hooks = Arc::clone(&self.event_handler);
        hooks.on_flagged(
            &mut ctx,
            detection.kind(),
            detection.sub_kind(),
            detection.metadata().violations,
            &extra,
        );
        if ctx.cancelled() {
            detection.metadata_mut().violations = old_violations;
            return;
        }

        detection.metadata_mut().last_flagged = now;
        let violations = detection.metadata().violations;
        if violations >= 0.5 {
            if self.authority != AuthorityMode::None {
                self.send_remote_event(&events::flagged(
                    &self.name,
                    detection.kind(),
                    detection.sub_kind(),
                    violations,
                    &extra,
                ));
            }
            log::warn!(
                "{} flagged {} ({}) <x{violations:.2}> {extra:?}",
                self.name,
                detection.kind(),
                detection.sub_kind(),
            );
        }

        if detection.punishable()
            && violations >= detection.metadata().max_violations
            && self.authority != AuthorityMode::None
        {
            let mut ctx = EventCtx::new();
            let mut message = PUNISHMENT_MESSAGE.to_string();
            hooks.on_punishment(&mut ctx, &mut message);
            if ctx.cancelled() {
                return;
            }
            log::warn!(
                "{} was removed from the server for third-party modifications ({}-{})",
                self.name,
                detection.kind(),
                detection.sub_kind(),
            );
            self.disconnect(&DisconnectReason::Punishment(message));
        }
    }
}

struct SessionInner {
    player: Player,
    handlers: HandlerRegistry,
    detections: Vec<Box<dyn Detection>>,
}

impl SessionInner {
    #[tracing::instrument(level = "trace", skip_all, fields(kind = packet.kind()))]
    fn process_client(&mut self, packet: &mut ClientPacket) -> PacketVerdict {
        let mut verdict = PacketVerdict::Continue;
        self.player.clicks.clicking = false;

        match packet {
            ClientPacket::ScriptMessage(message) => {
                // Clients must not be able to spoof the proxy's own events.
                if message.identifier.contains(events::RESERVED_NAMESPACE) {
                    self.player.disconnect(&DisconnectReason::ScriptMessageAbuse);
                    return PacketVerdict::Consume;
                }
            }
            ClientPacket::Text(text) => {
                let mut words = text.message.split_whitespace();
                if words.next() == Some(debug::DEBUG_COMMAND) {
                    let args = words.collect::<Vec<_>>().join(" ");
                    self.handle_debug_command(&args);
                    return PacketVerdict::Consume;
                }
                // Strip the XUID so upstream software does not treat the
                // relayed message as spoofed.
                text.xuid.clear();
            }
            ClientPacket::NetworkStackLatency(echo) => {
                if self.player.execute_acks(echo.timestamp) {
                    verdict = PacketVerdict::Consume;
                }
            }
            ClientPacket::PlayerAuthInput(input) => {
                self.player.client_tick += 1;
                self.player.input_mode = input.input_mode;
            }
            ClientPacket::InventoryTransaction(tx) => {
                if matches!(tx.data, TransactionData::UseItemOnEntity { .. }) {
                    self.player.register_click();
                }
            }
            ClientPacket::Animate(animate) => {
                if animate.action_type == ANIMATE_ACTION_SWING_ARM {
                    self.player.register_click();
                }
            }
            ClientPacket::MobEquipment(equipment) => {
                self.player.last_equipment = Some(*equipment);
            }
            ClientPacket::Respawn(respawn) => {
                if respawn.state == RESPAWN_STATE_CLIENT_READY_TO_SPAWN
                    && respawn.entity_runtime_id == self.player.runtime_id
                {
                    self.player.dead = false;
                }
            }
            _ => {}
        }

        if self.player.closed {
            return verdict;
        }

        if self.handlers.dispatch_client(packet, &mut self.player) == PacketVerdict::Consume {
            verdict = PacketVerdict::Consume;
        }

        self.run_detections(packet);

        if matches!(packet, ClientPacket::PlayerAuthInput(_)) && !self.player.closed {
            self.handlers.tick(&mut self.player);
            self.player.server_tick += 1;
            self.player.flush_acks();
        }

        verdict
    }

    #[tracing::instrument(level = "trace", skip_all, fields(kind = packet.kind()))]
    fn process_server(&mut self, packet: &mut ServerPacket) -> PacketVerdict {
        let verdict = self.handlers.dispatch_server(packet, &mut self.player);
        // The session owns client-bound delivery so the ack probe is
        // guaranteed to arrive after the packet whose state change it
        // sequences.
        if verdict == PacketVerdict::Continue {
            self.player.write_packet(packet);
        }
        self.player.flush_acks();
        verdict
    }

    fn run_detections(&mut self, packet: &ClientPacket) {
        if self.player.closed {
            return;
        }

        let mut detections = std::mem::take(&mut self.detections);
        for d in detections.iter_mut() {
            let verdict = {
                let view = DetectionView {
                    movement: &self.player.movement,
                    entities: &self.player.entities,
                    client_tick: self.player.client_tick,
                    server_tick: self.player.server_tick,
                    game_type: self.player.game_type,
                };
                d.detect(packet, &view)
            };
            match verdict {
                Verdict::None => {}
                Verdict::Pass(amount) => detection::pass(d.metadata_mut(), amount),
                Verdict::Fail(extra) => self.player.fail_detection(d.as_mut(), extra),
            }
            if self.player.closed {
                break;
            }
        }
        self.detections = detections;
    }

    fn handle_debug_command(&mut self, args: &str) {
        let mode = match args.split_whitespace().next() {
            Some(mode) => mode,
            None => {
                self.player.message("Usage: !oomph_debug <mode>");
                return;
            }
        };

        match mode {
            "type:log" => {
                self.player.debug.logging = LoggingType::LogFile;
                self.player.message("Set debug logging type to log file.");
            }
            "type:message" => {
                self.player.debug.logging = LoggingType::Message;
                self.player.message("Set debug logging type to chat messages.");
            }
            other => match DebugMode::parse(other) {
                Some(debug_mode) => {
                    let enabled = self.player.debug.toggle(debug_mode);
                    let state = if enabled { "Enabled" } else { "Disabled" };
                    self.player.message(format!("{state} debug mode: {other}"));
                }
                None => {
                    self.player.message(format!("Unknown debug mode: {other}"));
                }
            },
        }
    }
}

/// One intercepted client connection.
pub struct Session {
    inner: SyncMutex<SessionInner>,
}

impl Session {
    /// Creates a session over the given transport sinks with the stock
    /// handler pipeline and detection set.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        conn: Arc<dyn PacketSink>,
        control: Arc<dyn ControlSink>,
        codec: Arc<dyn ChunkCodec>,
        config: SessionConfig,
    ) -> Self {
        Self::with_event_handler(name, conn, control, codec, config, Arc::new(NopEventHandler))
    }

    /// Creates a session with user hooks into the flag and punishment
    /// pipeline.
    #[must_use]
    pub fn with_event_handler(
        name: impl Into<String>,
        conn: Arc<dyn PacketSink>,
        control: Arc<dyn ControlSink>,
        codec: Arc<dyn ChunkCodec>,
        config: SessionConfig,
        event_handler: Arc<dyn EventHandler>,
    ) -> Self {
        Self {
            inner: SyncMutex::new(SessionInner {
                player: Player::new(name.into(), conn, control, codec, event_handler, &config),
                handlers: HandlerRegistry::stock(),
                detections: detection::default_detections(),
            }),
        }
    }

    /// Processes one client-to-server packet. Returns whether the proxy
    /// consumed it; otherwise the caller forwards the (possibly rewritten)
    /// packet upstream.
    pub fn handle_client(&self, packet: &mut ClientPacket) -> PacketVerdict {
        let mut inner = self.inner.lock();
        if inner.player.closed {
            return PacketVerdict::Continue;
        }

        match catch_unwind(AssertUnwindSafe(|| inner.process_client(packet))) {
            Ok(verdict) => verdict,
            Err(panic) => {
                inner.player.handle_panic("client", panic.as_ref());
                PacketVerdict::Consume
            }
        }
    }

    /// Processes one server-to-client packet and, unless a handler consumed
    /// it, delivers the (possibly rewritten) packet to the client together
    /// with any acknowledgement probe it produced, in that order. The
    /// caller must not forward the packet again.
    pub fn handle_server(&self, packet: &mut ServerPacket) -> PacketVerdict {
        let mut inner = self.inner.lock();
        if inner.player.closed {
            return PacketVerdict::Continue;
        }

        match catch_unwind(AssertUnwindSafe(|| inner.process_server(packet))) {
            Ok(verdict) => verdict,
            Err(panic) => {
                inner.player.handle_panic("server", panic.as_ref());
                PacketVerdict::Consume
            }
        }
    }

    /// Disconnects the session with a reason. Idempotent.
    pub fn disconnect(&self, reason: &DisconnectReason) {
        self.inner.lock().player.disconnect(reason);
    }

    /// Whether the session has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.lock().player.closed
    }

    /// Replaces the detection set. Hosts use this to tune which checks run
    /// for a session; the default is [`detection::default_detections`].
    pub fn set_detections(&self, detections: Vec<Box<dyn Detection>>) {
        self.inner.lock().detections = detections;
    }

    /// Runs `f` with exclusive access to the player state. Intended for the
    /// embedding host (inspection, configuration) and for tests.
    pub fn with_player<R>(&self, f: impl FnOnce(&mut Player) -> R) -> R {
        f(&mut self.inner.lock().player)
    }
}

impl Player {
    fn handle_panic(&mut self, direction: &str, panic: &(dyn std::any::Any + Send)) {
        let message = if let Some(s) = panic.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        log::error!(
            "{}: panic while processing {direction} packet: {message}",
            self.name
        );
        self.disconnect(&DisconnectReason::Internal(message));
    }
}
