//! Cross-table name lookups filled in after extraction

use std::collections::HashMap;

use tracing::debug;

use super::{Creature, Equipment};

/// Fill `exclusive_names` from the equipment index → name map
pub fn enrich_creatures(creatures: &mut [Creature], equipment: &[Equipment]) {
    let names: HashMap<i32, &str> = equipment
        .iter()
        .map(|eq| (eq.index, eq.name.as_str()))
        .collect();

    for creature in creatures.iter_mut() {
        creature.exclusive_names = creature
            .exclusive_ids
            .iter()
            .map(|id| names.get(id).copied().unwrap_or_default().to_string())
            .collect();
    }
    debug!(creatures = creatures.len(), "Resolved exclusive equipment names");
}

/// Fill `specialized_names` from the creature hero id → name map
pub fn enrich_equipment(equipment: &mut [Equipment], creatures: &[Creature]) {
    let names: HashMap<i32, &str> = creatures
        .iter()
        .map(|c| (c.hero_id, c.name.as_str()))
        .collect();

    for eq in equipment.iter_mut() {
        eq.specialized_names = eq
            .specialized_hero
            .iter()
            .map(|id| names.get(id).copied().unwrap_or_default().to_string())
            .collect();
    }
    debug!(equipment = equipment.len(), "Resolved specialized hero names");
}
