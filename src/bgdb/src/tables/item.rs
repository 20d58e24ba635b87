//! Skill / passive (itemBase) records

use serde::Serialize;
use tracing::info;

use super::TableReader;
use crate::effect::{EffectDescriptor, EffectResolver, Policy};
use crate::layout::TableLayout;
use crate::{round6, Result};

const TYPE_FIELDS: [&str; 3] = ["type0", "type1", "type2"];
const EFFECT_FIELDS: [&str; 3] = ["effect0", "effect1", "effect2"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub index: i32,
    pub name: String,
    pub description: String,
    pub icon: i32,
    #[serde(rename = "priceFactor")]
    pub price_factor: f64,
    #[serde(rename = "passiveType")]
    pub passive_type: i32,
    pub types: Vec<i32>,
    pub effects: Vec<f64>,
    pub effects_resolved: Vec<EffectDescriptor>,
    #[serde(rename = "randomValue")]
    pub random_value: i32,
}

/// itemBase split by how the game hands the skill out
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemGroups {
    /// `passiveType == 0 && randomValue == 0`
    pub mercenary_skills: Vec<Item>,
    /// `passiveType == 0 && randomValue > 0`
    pub random_merc_skills: Vec<Item>,
    /// Everything else
    pub sub_slot_troops: Vec<Item>,
}

pub fn extract(data: &[u8], table: &TableLayout, resolver: &EffectResolver<'_>) -> Result<Vec<Item>> {
    let reader = TableReader::new(data, table);
    let loc = resolver.localization();

    let index = reader.int32("index")?;
    let icon = reader.int32("icon")?;
    let price_factor = reader.float_bits("priceFactor")?;
    let passive_type = reader.int32("passiveType")?;
    let types = TYPE_FIELDS
        .iter()
        .map(|name| reader.int32(name))
        .collect::<Result<Vec<_>>>()?;
    let effects = EFFECT_FIELDS
        .iter()
        .map(|name| reader.float_bits(name))
        .collect::<Result<Vec<_>>>()?;
    let random_value = reader.int32("randomValue")?;

    let items: Vec<Item> = (0..reader.rows())
        .map(|i| {
            let idx = index.at(i);
            let row_types: Vec<i32> = types.iter().map(|column| column.at(i)).collect();
            let row_effects: Vec<f64> = effects.iter().map(|column| round6(column.at(i))).collect();
            let effects_resolved = resolver.resolve(&Policy::GENERAL, &row_types, &row_effects);

            Item {
                index: idx,
                name: loc.text_or_empty(&format!("sn{idx}")),
                description: loc.text_or_empty(&format!("ss{idx}")),
                icon: icon.at(i),
                price_factor: round6(price_factor.at(i)),
                passive_type: passive_type.at(i),
                types: row_types,
                effects: row_effects,
                effects_resolved,
                random_value: random_value.at(i),
            }
        })
        .collect();

    info!(table = table.name, rows = items.len(), "Extracted items");
    Ok(items)
}

/// Split items into the three published groups, keeping table order
pub fn split_items(items: Vec<Item>) -> ItemGroups {
    let mut groups = ItemGroups::default();
    for item in items {
        match (item.passive_type, item.random_value) {
            (0, 0) => groups.mercenary_skills.push(item),
            (0, rv) if rv > 0 => groups.random_merc_skills.push(item),
            _ => groups.sub_slot_troops.push(item),
        }
    }
    groups
}
