//! Shared trigger configuration table
//!
//! Species-to-config mappings used by the simulation rules around the
//! frame store. Built once at first use and read-only process-wide; not
//! part of the ring buffer's contract.

use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Serialize;

/// Trigger fires when an entity moves onto it.
pub const TRIGGER_MASK_BY_MOVEMENT: u32 = 1 << 0;
/// Trigger fires when hit by an attack.
pub const TRIGGER_MASK_BY_ATK: u32 = 1 << 1;

/// Collision index prefix marking trigger-typed collider slots.
pub const COLLISION_TRIGGER_INDEX_PREFIX: u32 = 1 << 16;

/// Static configuration of one trigger species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggerConfig {
    pub species_id: u32,
    pub species_name: &'static str,
    pub trigger_mask: u32,
    pub collision_type_mask: u32,
}

/// Switch flipped by walking onto it.
pub const N_SWITCH: TriggerConfig = TriggerConfig {
    species_id: 1,
    species_name: "NSwitch",
    trigger_mask: TRIGGER_MASK_BY_MOVEMENT,
    collision_type_mask: COLLISION_TRIGGER_INDEX_PREFIX,
};

/// Switch flipped by striking it.
pub const P_SWITCH: TriggerConfig = TriggerConfig {
    species_id: 2,
    species_name: "PSwitch",
    trigger_mask: TRIGGER_MASK_BY_ATK,
    collision_type_mask: COLLISION_TRIGGER_INDEX_PREFIX,
};

/// The species-id-keyed trigger table, built on first access.
pub fn trigger_configs() -> &'static IndexMap<u32, TriggerConfig> {
    static CONFIGS: OnceLock<IndexMap<u32, TriggerConfig>> = OnceLock::new();
    CONFIGS.get_or_init(|| {
        IndexMap::from([
            (N_SWITCH.species_id, N_SWITCH),
            (P_SWITCH.species_id, P_SWITCH),
        ])
    })
}

/// Look up a trigger config by species id.
pub fn trigger_config_by_species(species_id: u32) -> Option<&'static TriggerConfig> {
    trigger_configs().get(&species_id)
}
