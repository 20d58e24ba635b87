//! Boss records

use serde::Serialize;
use tracing::info;

use super::TableReader;
use crate::layout::TableLayout;
use crate::localization::Localization;
use crate::{round6, Result};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Boss {
    pub index: usize,
    pub name: String,
    pub model: i32,
    pub resist_physical: f64,
    pub resist_magical: f64,
    pub resist_click: f64,
    pub factor_hp: f64,
    pub factor_gold: f64,
    pub coin: i32,
    pub medal: i32,
    pub essence: f64,
    pub block: f64,
    pub cooldown: f64,
    pub chance_attack_all: f64,
    pub is_mirroring: bool,
    pub color: i32,
    pub effect_attach: i32,
    pub alpha: f64,
}

/// Bosses are named by row position (`bn{row}`), not by an index column
pub fn extract(data: &[u8], table: &TableLayout, loc: &Localization) -> Result<Vec<Boss>> {
    let reader = TableReader::new(data, table);

    let model = reader.int32("model")?;
    let resist_physical = reader.float32("resistPhysical")?;
    let resist_magical = reader.float32("resistMagical")?;
    let color = reader.int32("color")?;
    let coin = reader.int32("coin")?;
    let resist_click = reader.float32("resistClick")?;
    let effect_attach = reader.int32("effectAttach")?;
    let factor_hp = reader.float32("factorHp")?;
    let factor_gold = reader.float32("factorGold")?;
    let medal = reader.int32("medal")?;
    let block = reader.float32("block")?;
    let alpha = reader.float32("alpha")?;
    let cooldown = reader.float32("cooldown")?;
    let chance_attack_all = reader.float32("chanceAttackAll")?;
    let is_mirroring = reader.bool("isMirroring")?;
    let essence = reader.float32("essence")?;

    // Missing resist and factor rows default to 1.0
    let scaled = |column: &super::Column<f64>, i: usize, default: f64| round6(column.or(i, default));

    let bosses: Vec<Boss> = (0..reader.rows())
        .map(|i| Boss {
            index: i,
            name: loc.text_or_empty(&format!("bn{i}")),
            model: model.at(i),
            resist_physical: scaled(&resist_physical, i, 1.0),
            resist_magical: scaled(&resist_magical, i, 1.0),
            resist_click: scaled(&resist_click, i, 1.0),
            factor_hp: scaled(&factor_hp, i, 1.0),
            factor_gold: scaled(&factor_gold, i, 1.0),
            coin: coin.at(i),
            medal: medal.at(i),
            essence: scaled(&essence, i, 0.0),
            block: scaled(&block, i, 0.0),
            cooldown: scaled(&cooldown, i, 0.0),
            chance_attack_all: scaled(&chance_attack_all, i, 0.0),
            is_mirroring: is_mirroring.at(i),
            color: color.at(i),
            effect_attach: effect_attach.at(i),
            alpha: scaled(&alpha, i, 0.0),
        })
        .collect();

    info!(table = table.name, rows = bosses.len(), "Extracted bosses");
    Ok(bosses)
}
