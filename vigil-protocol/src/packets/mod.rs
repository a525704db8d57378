//! Packet definitions, one module per packet kind.

mod actor_metadata;
mod add_actor;
mod add_player;
mod animate;
mod chunk_radius_updated;
mod correct_player_move_prediction;
mod disconnect;
mod inventory_transaction;
mod level_chunk;
mod level_event;
mod mob_effect;
mod mob_equipment;
mod move_actor_absolute;
mod move_player;
mod network_stack_latency;
mod player_auth_input;
mod remove_actor;
mod request_chunk_radius;
mod respawn;
mod script_message;
mod set_actor_data;
mod set_actor_motion;
mod set_player_game_type;
mod start_game;
mod sub_chunk;
mod text;
mod update_abilities;
mod update_attributes;
mod update_block;

pub use actor_metadata::{ActorMetadata, DATA_FLAG_IMMOBILE};
pub use add_actor::AddActor;
pub use add_player::AddPlayer;
pub use animate::{Animate, ANIMATE_ACTION_SWING_ARM};
pub use chunk_radius_updated::ChunkRadiusUpdated;
pub use correct_player_move_prediction::CorrectPlayerMovePrediction;
pub use disconnect::Disconnect;
pub use inventory_transaction::{
    InventoryTransaction, TransactionData, USE_ITEM_ACTION_CLICK_AIR, USE_ITEM_ACTION_CLICK_BLOCK,
};
pub use level_chunk::{LevelChunk, SUB_CHUNK_REQUEST_MODE_LIMITED, SUB_CHUNK_REQUEST_MODE_LIMITLESS};
pub use level_event::LevelEvent;
pub use mob_effect::{
    MobEffect, EFFECT_JUMP_BOOST, EFFECT_SLOWNESS, EFFECT_SPEED, MOB_EFFECT_ADD, MOB_EFFECT_MODIFY,
    MOB_EFFECT_REMOVE,
};
pub use mob_equipment::MobEquipment;
pub use move_actor_absolute::{MoveActorAbsolute, MOVE_ACTOR_FLAG_ON_GROUND, MOVE_ACTOR_FLAG_TELEPORT};
pub use move_player::{
    MovePlayer, MOVE_PLAYER_MODE_NORMAL, MOVE_PLAYER_MODE_RESET, MOVE_PLAYER_MODE_ROTATION,
    MOVE_PLAYER_MODE_TELEPORT,
};
pub use network_stack_latency::NetworkStackLatency;
pub use player_auth_input::{input_flags, PlayerAuthInput, INPUT_MODE_TOUCH};
pub use remove_actor::RemoveActor;
pub use request_chunk_radius::RequestChunkRadius;
pub use respawn::{
    Respawn, RESPAWN_STATE_CLIENT_READY_TO_SPAWN, RESPAWN_STATE_READY_TO_SPAWN,
    RESPAWN_STATE_SEARCHING_FOR_SPAWN,
};
pub use script_message::ScriptMessage;
pub use set_actor_data::SetActorData;
pub use set_actor_motion::SetActorMotion;
pub use set_player_game_type::{
    SetPlayerGameType, GAME_TYPE_ADVENTURE, GAME_TYPE_CREATIVE, GAME_TYPE_SPECTATOR,
    GAME_TYPE_SURVIVAL,
};
pub use start_game::{PlayerMovementMode, PlayerMovementSettings, StartGame};
pub use sub_chunk::{SubChunk, SubChunkEntry, SUB_CHUNK_RESULT_SUCCESS, SUB_CHUNK_RESULT_SUCCESS_ALL_AIR};
pub use text::{Text, TEXT_TYPE_CHAT};
pub use update_abilities::UpdateAbilities;
pub use update_attributes::{Attribute, UpdateAttributes, ATTRIBUTE_HEALTH, ATTRIBUTE_MOVEMENT_SPEED};
pub use update_block::{UpdateBlock, BLOCK_UPDATE_NEIGHBOURS, BLOCK_UPDATE_NETWORK};

/// A chunk column coordinate, in chunks.
pub type ChunkPos = glam::IVec2;

/// A packet travelling from the game client towards the server.
#[derive(Clone, Debug)]
pub enum ClientPacket {
    PlayerAuthInput(PlayerAuthInput),
    NetworkStackLatency(NetworkStackLatency),
    Text(Text),
    InventoryTransaction(InventoryTransaction),
    MobEquipment(MobEquipment),
    Animate(Animate),
    RequestChunkRadius(RequestChunkRadius),
    ScriptMessage(ScriptMessage),
    Respawn(Respawn),
    /// Any packet kind the anti-cheat does not inspect; forwarded untouched.
    Unhandled,
}

/// A packet travelling from the upstream server towards the game client.
#[derive(Clone, Debug)]
pub enum ServerPacket {
    StartGame(StartGame),
    LevelChunk(LevelChunk),
    SubChunk(SubChunk),
    UpdateBlock(UpdateBlock),
    AddActor(AddActor),
    AddPlayer(AddPlayer),
    RemoveActor(RemoveActor),
    MoveActorAbsolute(MoveActorAbsolute),
    MovePlayer(MovePlayer),
    SetActorMotion(SetActorMotion),
    SetActorData(SetActorData),
    ChunkRadiusUpdated(ChunkRadiusUpdated),
    LevelEvent(LevelEvent),
    UpdateAttributes(UpdateAttributes),
    UpdateAbilities(UpdateAbilities),
    MobEffect(MobEffect),
    SetPlayerGameType(SetPlayerGameType),
    CorrectPlayerMovePrediction(CorrectPlayerMovePrediction),
    NetworkStackLatency(NetworkStackLatency),
    Respawn(Respawn),
    Text(Text),
    Disconnect(Disconnect),
    /// Any packet kind the anti-cheat does not inspect; forwarded untouched.
    Unhandled,
}

impl ClientPacket {
    /// A short name for log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PlayerAuthInput(_) => "PlayerAuthInput",
            Self::NetworkStackLatency(_) => "NetworkStackLatency",
            Self::Text(_) => "Text",
            Self::InventoryTransaction(_) => "InventoryTransaction",
            Self::MobEquipment(_) => "MobEquipment",
            Self::Animate(_) => "Animate",
            Self::RequestChunkRadius(_) => "RequestChunkRadius",
            Self::ScriptMessage(_) => "ScriptMessage",
            Self::Respawn(_) => "Respawn",
            Self::Unhandled => "Unhandled",
        }
    }
}

impl ServerPacket {
    /// A short name for log lines.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::StartGame(_) => "StartGame",
            Self::LevelChunk(_) => "LevelChunk",
            Self::SubChunk(_) => "SubChunk",
            Self::UpdateBlock(_) => "UpdateBlock",
            Self::AddActor(_) => "AddActor",
            Self::AddPlayer(_) => "AddPlayer",
            Self::RemoveActor(_) => "RemoveActor",
            Self::MoveActorAbsolute(_) => "MoveActorAbsolute",
            Self::MovePlayer(_) => "MovePlayer",
            Self::SetActorMotion(_) => "SetActorMotion",
            Self::SetActorData(_) => "SetActorData",
            Self::ChunkRadiusUpdated(_) => "ChunkRadiusUpdated",
            Self::LevelEvent(_) => "LevelEvent",
            Self::UpdateAttributes(_) => "UpdateAttributes",
            Self::UpdateAbilities(_) => "UpdateAbilities",
            Self::MobEffect(_) => "MobEffect",
            Self::SetPlayerGameType(_) => "SetPlayerGameType",
            Self::CorrectPlayerMovePrediction(_) => "CorrectPlayerMovePrediction",
            Self::NetworkStackLatency(_) => "NetworkStackLatency",
            Self::Respawn(_) => "Respawn",
            Self::Text(_) => "Text",
            Self::Disconnect(_) => "Disconnect",
            Self::Unhandled => "Unhandled",
        }
    }
}
