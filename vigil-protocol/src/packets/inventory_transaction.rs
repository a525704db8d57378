//! Inventory transactions; the proxy inspects the use-item variants for
//! combat (attacks) and world interaction.

use glam::{IVec3, Vec3};

/// The use-item action was a click on a block face.
pub const USE_ITEM_ACTION_CLICK_BLOCK: u32 = 0;
/// The use-item action was a click on air.
pub const USE_ITEM_ACTION_CLICK_AIR: u32 = 1;

/// Transaction payload variants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransactionData {
    /// A plain inventory mutation; uninspected.
    Normal,
    /// The player used the held item, possibly on a block.
    UseItem {
        /// One of the `USE_ITEM_ACTION_*` constants.
        action_type: u32,
        /// Block targeted by the click, if any.
        block_position: IVec3,
        /// Runtime ID of the block the client believes it clicked.
        block_runtime_id: u32,
    },
    /// The player used the held item on an entity (an attack or interaction).
    UseItemOnEntity {
        /// Runtime ID of the targeted entity.
        target_entity_runtime_id: u64,
        /// 0 for interact, 1 for attack.
        action_type: u32,
        /// Click location relative to the target.
        click_position: Vec3,
    },
    /// The held item was released (bows and similar); uninspected.
    ReleaseItem,
}

/// A client inventory transaction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InventoryTransaction {
    /// The typed payload of the transaction.
    pub data: TransactionData,
}
