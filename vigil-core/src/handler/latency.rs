//! Latency bookkeeping.
//!
//! Measures the game-stack round trip through the acknowledgement engine's
//! own probes and periodically reports the player's latency upstream so
//! plugins on the real server can display or act on it.

use std::time::Instant;

use vigil_protocol::packets::{ClientPacket, ServerPacket};

use super::{Handler, PacketVerdict};
use crate::ack::AckCommand;
use crate::error::HandlerError;
use crate::session::{events, Player};

/// Server ticks between upstream latency reports.
const REPORT_INTERVAL_TICKS: u64 = 5;

/// Which latency figure is reported upstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LatencyReportType {
    /// Twice the transport's RakNet latency estimate.
    Raknet,
    /// The game-stack round trip measured through ack probes.
    GameStack,
}

/// Keeps latency measurements fresh and reports them upstream.
pub struct LatencyHandler {
    report_type: LatencyReportType,
}

impl LatencyHandler {
    /// Creates the handler with RakNet reporting.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            report_type: LatencyReportType::Raknet,
        }
    }
}

impl Default for LatencyHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Handler for LatencyHandler {
    fn id(&self) -> &'static str {
        "latency"
    }

    fn handle_client(
        &mut self,
        packet: &mut ClientPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        if matches!(packet, ClientPacket::PlayerAuthInput(_))
            && player.server_tick % REPORT_INTERVAL_TICKS == 0
        {
            let latency_ms = match self.report_type {
                LatencyReportType::Raknet => player.transport_latency_ms() * 2,
                LatencyReportType::GameStack => player.stack_latency_ms,
            };
            player.send_remote_event(&events::latency_update(latency_ms));
        }
        Ok(PacketVerdict::Continue)
    }

    fn handle_server(
        &mut self,
        packet: &mut ServerPacket,
        player: &mut Player,
    ) -> Result<PacketVerdict, HandlerError> {
        // The first chunk data means the client is about to become ready;
        // start probing so the readiness ack has a ride.
        if matches!(packet, ServerPacket::LevelChunk(_) | ServerPacket::SubChunk(_))
            && !player.ready
            && !player.latency_probe_pending
        {
            player.latency_probe_pending = true;
            player.acks.defer(AckCommand::UpdateLatency {
                sent_at: Instant::now(),
            });
        }
        Ok(PacketVerdict::Continue)
    }

    fn on_tick(&mut self, player: &mut Player) {
        if !player.latency_probe_pending {
            player.latency_probe_pending = true;
            player.acks.defer(AckCommand::UpdateLatency {
                sent_at: Instant::now(),
            });
        }
    }
}
