//! Entity attribute synchronization (health, movement speed, ...).

/// Attribute name for health.
pub const ATTRIBUTE_HEALTH: &str = "minecraft:health";
/// Attribute name for ground movement speed.
pub const ATTRIBUTE_MOVEMENT_SPEED: &str = "minecraft:movement_speed";

/// One synchronized attribute value.
#[derive(Clone, Debug, PartialEq)]
pub struct Attribute {
    /// Namespaced attribute name.
    pub name: String,
    /// Current value.
    pub value: f32,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Default value.
    pub default: f32,
}

/// An entity's attributes changed.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateAttributes {
    /// Runtime ID of the affected entity.
    pub entity_runtime_id: u64,
    /// The changed attributes.
    pub attributes: Vec<Attribute>,
    /// Server tick of the change; zeroed by the proxy when re-broadcast.
    pub tick: u64,
}

impl UpdateAttributes {
    /// Returns the value of the named attribute, if present.
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<f32> {
        self.attributes.iter().find(|a| a.name == name).map(|a| a.value)
    }
}
