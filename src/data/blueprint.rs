//! Blueprints and Runtime-Binding Classification
//!
//! A blueprint names the runtime class a prototype binds to. The class name
//! decides which enum category (Entity, Inventory, Power) the prototype is
//! indexed under. Classification is resolved once when the blueprint is
//! created and stored on it, so the enum builder never scans class lists.

use super::enums::EnumCategory;
use super::ids::BlueprintId;

/// Runtime classes indexed in the Entity category.
pub const ENTITY_CLASSES: &[&str] = &[
    "EntityPrototype",
    "AgentPrototype",
    "AgentTeamUpPrototype",
    "OrbPrototype",
    "AvatarPrototype",
    "CharacterTokenPrototype",
    "HotspotPrototype",
    "MissilePrototype",
    "ItemPrototype",
    "BagItemPrototype",
    "CostumePrototype",
    "CraftingIngredientPrototype",
    "CostumeCorePrototype",
    "CraftingRecipePrototype",
    "ArmorPrototype",
    "ArtifactPrototype",
    "LegendaryPrototype",
    "MedalPrototype",
    "RelicPrototype",
    "TeamUpGearPrototype",
    "PlayerPrototype",
    "TransitionPrototype",
    "PropPrototype",
    "SmartPropPrototype",
    "WorldEntityPrototype",
    "DestructiblePropPrototype",
    "PvPPrototype",
    "MatchMetaGamePrototype",
    "MissionMetaGamePrototype",
    "MetaGamePrototype",
    "SpawnerPrototype",
    "KismetSequenceEntityPrototype",
    "InventoryStashTokenPrototype",
    "EmoteTokenPrototype",
    "DestructibleSmartPropPrototype",
];

/// Runtime classes indexed in the Inventory category.
pub const INVENTORY_CLASSES: &[&str] = &["InventoryPrototype", "PlayerStashInventoryPrototype"];

/// Runtime classes indexed in the Power category.
pub const POWER_CLASSES: &[&str] = &[
    "PowerPrototype",
    "MissilePowerPrototype",
    "SummonPowerPrototype",
    "SituationalPowerPrototype",
    "MovementPowerPrototype",
    "SpecializationPowerPrototype",
];

/// Classify a runtime-binding class name.
///
/// Returns at most one of Entity, Inventory or Power; the three class lists
/// are disjoint and checked in that order.
pub fn classify_runtime_binding(class_name: &str) -> Option<EnumCategory> {
    if ENTITY_CLASSES.contains(&class_name) {
        Some(EnumCategory::Entity)
    } else if INVENTORY_CLASSES.contains(&class_name) {
        Some(EnumCategory::Inventory)
    } else if POWER_CLASSES.contains(&class_name) {
        Some(EnumCategory::Power)
    } else {
        None
    }
}

/// Blueprint metadata for a prototype.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blueprint {
    /// Blueprint id.
    pub id: BlueprintId,
    /// Runtime class name the blueprint binds to.
    pub runtime_binding: String,
    /// Category resolved from `runtime_binding`.
    category: Option<EnumCategory>,
}

impl Blueprint {
    /// Create a blueprint and resolve its category.
    pub fn new(id: BlueprintId, runtime_binding: impl Into<String>) -> Self {
        let runtime_binding = runtime_binding.into();
        let category = classify_runtime_binding(&runtime_binding);
        Self { id, runtime_binding, category }
    }

    /// Enum category this blueprint's prototypes are indexed under, if any.
    #[inline]
    pub fn category(&self) -> Option<EnumCategory> {
        self.category
    }
}
