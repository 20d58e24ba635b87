//! Stage enemy records

use serde::Serialize;
use tracing::info;

use super::TableReader;
use crate::layout::TableLayout;
use crate::string_table::{NameMap, StringTable};
use crate::{round6, Result};

/// Strings per enemy row in the name map
const STRIDE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub strings: Vec<String>,
    pub model: i32,
    pub factor_hp: f64,
    pub resist_physical: f64,
    pub resist_magical: f64,
    pub factor_gold: f64,
    pub color: i32,
    pub is_runaway: bool,
    pub resist_click: f64,
    pub effect_attach: i32,
    pub block: f64,
    pub alpha: f64,
    pub cooldown: f64,
    pub chance_attack_all: f64,
    pub is_mirroring: bool,
}

/// Enemies need only the string table, not localization
pub fn extract(
    data: &[u8],
    table: &TableLayout,
    name_map: &NameMap,
    strings: &StringTable,
) -> Result<Vec<Enemy>> {
    let reader = TableReader::new(data, table);
    let row_strings = reader.strings(name_map, strings, STRIDE);

    let model = reader.int32("model")?;
    let factor_hp = reader.float32("factorHp")?;
    let resist_physical = reader.float32("resistPhysical")?;
    let resist_magical = reader.float32("resistMagical")?;
    let factor_gold = reader.float32("factorGold")?;
    let color = reader.int32("color")?;
    let is_runaway = reader.bool("isRunaway")?;
    let resist_click = reader.float32("resistClick")?;
    let effect_attach = reader.int32("effectAttach")?;
    let block = reader.float32("block")?;
    let alpha = reader.float32("alpha")?;
    let cooldown = reader.float32("cooldown")?;
    let chance_attack_all = reader.float32("chanceAttackAll")?;
    let is_mirroring = reader.bool("isMirroring")?;

    let enemies: Vec<Enemy> = row_strings
        .into_iter()
        .enumerate()
        .map(|(i, strings)| Enemy {
            strings,
            model: model.at(i),
            factor_hp: round6(factor_hp.at(i)),
            resist_physical: round6(resist_physical.at(i)),
            resist_magical: round6(resist_magical.at(i)),
            factor_gold: round6(factor_gold.at(i)),
            color: color.at(i),
            is_runaway: is_runaway.at(i),
            resist_click: round6(resist_click.at(i)),
            effect_attach: effect_attach.at(i),
            block: round6(block.at(i)),
            alpha: round6(alpha.at(i)),
            cooldown: round6(cooldown.at(i)),
            chance_attack_all: round6(chance_attack_all.at(i)),
            is_mirroring: is_mirroring.at(i),
        })
        .collect();

    info!(table = table.name, rows = enemies.len(), "Extracted enemies");
    Ok(enemies)
}
