//! Equipment records with enhancement projection

use serde::Serialize;
use tracing::info;

use super::TableReader;
use crate::effect::{format_value, EffectResolver, MainEffect, DEFAULT_ENHANCEMENT};
use crate::layout::TableLayout;
use crate::{round6, Result};

const HERO_FIELDS: [&str; 6] = ["hero0", "hero1", "hero2", "hero3", "hero4", "hero5"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equipment {
    pub index: i32,
    pub name: String,
    pub grade: String,
    pub icon: i32,
    #[serde(rename = "mainType")]
    pub main_type: i32,
    #[serde(rename = "mainType_name")]
    pub main_type_name: String,
    #[serde(rename = "mainEffect")]
    pub main_effect: f64,
    #[serde(rename = "mainEffect_display")]
    pub main_effect_display: f64,
    #[serde(rename = "mainEffect_desc")]
    pub main_effect_desc: String,
    /// Description at enhancement level 0
    pub effect_0: String,
    /// Description at enhancement level 20
    pub effect_20: String,
    pub effect_0_g: String,
    pub effect_20_g: String,
    /// Raw int32 word holding the G-grade value's float bits
    #[serde(rename = "mainEffectG")]
    pub main_effect_g: i32,
    pub rank: i32,
    #[serde(rename = "specializedHero")]
    pub specialized_hero: [i32; 6],
    #[serde(rename = "specializedEffect")]
    pub specialized_effect: f64,
    #[serde(rename = "isAvailableG")]
    pub is_available_g: bool,
    #[serde(rename = "cantPowerUp")]
    pub cant_power_up: bool,
    /// Creature names for `specialized_hero`, filled by enrichment
    pub specialized_names: Vec<String>,
}

/// Level 0 / level 20 projections of one main effect
#[derive(Debug, Clone, Default, PartialEq)]
struct Projection {
    effect_0: String,
    effect_20: String,
    effect_0_g: String,
    effect_20_g: String,
}

fn project(
    main: &MainEffect,
    display_value: f64,
    multiplier: Option<f64>,
    g_value: Option<f64>,
) -> Projection {
    let effect_0 = main.line(display_value);
    let effect_20 = match multiplier {
        Some(multiplier) if !format_value(display_value, main.format).is_empty() => format!(
            "{} {}",
            main.name,
            format_value(display_value * multiplier, main.format)
        ),
        _ => String::new(),
    };

    let (effect_0_g, effect_20_g) = match g_value {
        Some(value) => {
            let display_g = value * main.display_ratio;
            let level_20 = if main.name.is_empty() {
                String::new()
            } else {
                format!(
                    "{} {}",
                    main.name,
                    format_value(display_g * DEFAULT_ENHANCEMENT, main.format)
                )
            };
            (main.line(display_g), level_20)
        }
        None => Default::default(),
    };

    Projection {
        effect_0,
        effect_20,
        effect_0_g,
        effect_20_g,
    }
}

pub fn extract(
    data: &[u8],
    table: &TableLayout,
    resolver: &EffectResolver<'_>,
) -> Result<Vec<Equipment>> {
    let reader = TableReader::new(data, table);
    let loc = resolver.localization();
    let calibration = resolver.calibration();

    let index = reader.int32("index")?;
    let icon = reader.int32("icon")?;
    let main_type = reader.int32("mainType")?;
    let main_effect = reader.float32("mainEffect")?;
    let main_effect_g = reader.int32("mainEffectG")?;
    let rank = reader.rank("rank")?;
    let heroes = HERO_FIELDS
        .iter()
        .map(|name| reader.int32(name))
        .collect::<Result<Vec<_>>>()?;
    let spec_effect = reader.float32("specEffect")?;
    let available_g = reader.bool("isAvailableG")?;
    let cant_power_up = reader.bool("cantPowerUp")?;

    let grades = reader.grades("rank", "hero0")?;

    let equipment: Vec<Equipment> = (0..reader.rows())
        .map(|i| {
            let idx = index.at(i);
            let name = loc.text_or_empty(&format!("in{idx}"));
            let mt = main_type.at(i);
            let main = resolver.main_effect(mt);

            let me = round6(main_effect.at(i));
            let display_value = me * main.display_ratio;
            let value_text = format_value(display_value, main.format);
            let main_effect_desc = if !main.name.is_empty() && !value_text.is_empty() {
                format!("{} {}", main.name, value_text).trim().to_string()
            } else {
                main.name.clone()
            };

            let is_available_g = available_g.at(i);
            let cant = cant_power_up.at(i);
            let multiplier = (!cant).then(|| {
                if is_available_g {
                    DEFAULT_ENHANCEMENT
                } else {
                    calibration.enhancement_multiplier(&name, mt)
                }
            });

            let raw_g = main_effect_g.at(i);
            let g_value = (is_available_g && raw_g != 0)
                .then(|| f64::from(f32::from_bits(raw_g as u32)));

            let projection = project(&main, display_value, multiplier, g_value);

            let mut specialized_hero = [0; 6];
            for (slot, column) in specialized_hero.iter_mut().zip(&heroes) {
                *slot = column.at(i);
            }

            Equipment {
                index: idx,
                name,
                grade: grades[i].clone(),
                icon: icon.at(i),
                main_type: mt,
                main_type_name: main.name.clone(),
                main_effect: me,
                main_effect_display: round6(display_value),
                main_effect_desc,
                effect_0: projection.effect_0,
                effect_20: projection.effect_20,
                effect_0_g: projection.effect_0_g,
                effect_20_g: projection.effect_20_g,
                main_effect_g: raw_g,
                rank: rank.at(i),
                specialized_hero,
                specialized_effect: round6(spec_effect.at(i)),
                is_available_g,
                cant_power_up: cant,
                specialized_names: Vec::new(),
            }
        })
        .collect();

    info!(table = table.name, rows = equipment.len(), "Extracted equipment");
    Ok(equipment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{Calibration, ValueFormat};
    use crate::layout::V1;
    use crate::tables::testing::{table_like, Payload};
    use crate::test_support::{localization, rank_payload};

    fn damage() -> MainEffect {
        MainEffect {
            name: "데미지".to_string(),
            format: ValueFormat::Percent,
            display_ratio: 4.5,
        }
    }

    #[test]
    fn test_projection() {
        let p = project(&damage(), 0.45, Some(4.0), None);
        assert_eq!(p.effect_0, "데미지 45%");
        assert_eq!(p.effect_20, "데미지 180%");
        assert_eq!(p.effect_0_g, "");

        let locked = project(&damage(), 0.45, None, None);
        assert_eq!(locked.effect_0, "데미지 45%");
        assert_eq!(locked.effect_20, "");

        let zero = project(&damage(), 0.0, Some(6.0), None);
        assert_eq!(zero.effect_0, "");
        assert_eq!(zero.effect_20, "");

        let g = project(&damage(), 0.45, Some(6.0), Some(0.2));
        assert_eq!(g.effect_0_g, "데미지 90%");
        assert_eq!(g.effect_20_g, "데미지 540%");
    }

    #[test]
    fn test_extract_equipment() {
        let mut rank = rank_payload(&[5, 6, 2]);
        rank.extend(std::iter::repeat(b'S').take(99));
        rank.push(b'Z');
        let g_bits = 0.2f32.to_bits() as i32;

        let (data, layout) = table_like(
            &V1.equipment,
            3,
            vec![
                ("index", Payload::Int32(vec![10, 11, 12])),
                ("mainType", Payload::Int32(vec![0, 800, 6])),
                ("mainEffect", Payload::Float32(vec![0.1, 0.3, 0.05])),
                ("mainEffectG", Payload::Int32(vec![0, 0, g_bits])),
                ("rank", Payload::Raw(rank)),
                ("hero0", Payload::Int32(vec![96, 0, 0])),
                ("hero3", Payload::Int32(vec![97])),
                ("specEffect", Payload::Float32(vec![0.25])),
                ("isAvailableG", Payload::Bool(vec![false, false, true])),
                ("cantPowerUp", Payload::Bool(vec![false, true, false])),
            ],
        );
        let cal = Calibration::builtin().with_enhancement_override("룬 블레이드", 5.0);
        let loc = localization(&[("in10", "룬 블레이드"), ("sec800", "보스 데미지")]);
        let resolver = EffectResolver::new(&cal, &loc);

        let equipment = extract(&data, layout, &resolver).unwrap();
        assert_eq!(equipment.len(), 3);

        let blade = &equipment[0];
        assert_eq!(blade.name, "룬 블레이드");
        assert_eq!(blade.grade, "S");
        assert_eq!(blade.rank, 5);
        assert_eq!(blade.main_effect, 0.1);
        assert_eq!(blade.main_effect_display, 0.45);
        assert_eq!(blade.main_effect_desc, "데미지 45%");
        assert_eq!(blade.effect_0, "데미지 45%");
        assert_eq!(blade.effect_20, "데미지 225%");
        assert_eq!(blade.specialized_hero, [96, 0, 0, 97, 0, 0]);
        assert_eq!(blade.specialized_effect, 0.25);

        let locked = &equipment[1];
        assert_eq!(locked.main_type_name, "보스 데미지");
        assert_eq!(locked.main_effect_desc, "보스 데미지 0.3");
        assert_eq!(locked.effect_20, "");
        assert!(locked.cant_power_up);

        let upgradable = &equipment[2];
        assert_eq!(upgradable.grade, "S");
        assert_eq!(upgradable.effect_0, "공격 속도 5%");
        assert_eq!(upgradable.effect_20, "공격 속도 30%");
        assert_eq!(upgradable.effect_0_g, "공격 속도 20%");
        assert_eq!(upgradable.effect_20_g, "공격 속도 120%");
        assert_eq!(upgradable.main_effect_g, g_bits);

        let json = serde_json::to_value(blade).unwrap();
        assert_eq!(json["mainType_name"], "데미지");
        assert_eq!(json["mainEffect_desc"], "데미지 45%");
        assert!(json.get("isAvailableG").is_some());
    }
}
