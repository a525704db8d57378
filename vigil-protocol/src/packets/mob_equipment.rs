//! Held-item changes, kept so combat checks can see what the player attacked
//! with.

/// The player switched its held item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MobEquipment {
    /// Runtime ID of the equipping entity.
    pub entity_runtime_id: u64,
    /// Network ID of the newly held item stack.
    pub item_network_id: i32,
    /// The inventory slot of the item.
    pub inventory_slot: u8,
    /// The hotbar slot the item was placed in.
    pub hotbar_slot: u8,
    /// The window the change happened in.
    pub window_id: u8,
}
