//! Artifact records

use serde::Serialize;
use tracing::{debug, info};

use super::TableReader;
use crate::effect::{Calibration, EffectDescriptor, EffectResolver, Policy};
use crate::layout::TableLayout;
use crate::{round6, Result};

/// Grade label of premium (paid) artifacts
pub const PREMIUM_GRADE: &str = "유료";

/// Ranks whose effect values are stored doubled
const DOUBLED_RANKS: [i32; 3] = [1, 2, 3];

fn grade_label(rank: i32) -> String {
    let letter = match rank {
        0 => "E",
        1 => "D",
        2 => "C",
        3 => "B",
        4 => "A",
        5 => "S",
        6 => "G",
        7 => "X",
        8 => "H",
        9 => "O",
        10 => "P",
        11 => "Q",
        15 => PREMIUM_GRADE,
        _ => return format!("?{rank}"),
    };
    letter.to_string()
}

fn part_label(part: i32) -> String {
    match part {
        0 => "무기".to_string(),
        1 => "투구".to_string(),
        2 => "갑옷".to_string(),
        3 => "보조".to_string(),
        _ => format!("부위{part}"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub index: i32,
    pub name: String,
    pub set_id: i32,
    pub set_name: String,
    pub icon: Option<i32>,
    pub rank: i32,
    pub grade: String,
    #[serde(rename = "dropTable")]
    pub drop_table: Option<i32>,
    pub part: i32,
    pub part_name: String,
    #[serde(rename = "aType")]
    pub a_type: Vec<i32>,
    #[serde(rename = "aEffect")]
    pub a_effect: Vec<f64>,
    pub effects_resolved: Vec<EffectDescriptor>,
}

/// Extract artifacts
///
/// The nested `aType`/`aEffect` arrays are off by one row: artifact *i* takes
/// the arrays of row *i − 1* and the first artifact has none. Ranks D, C and B
/// store their effect values doubled.
pub fn extract(
    data: &[u8],
    table: &TableLayout,
    resolver: &EffectResolver<'_>,
) -> Result<Vec<Artifact>> {
    let reader = TableReader::new(data, table);
    let loc = resolver.localization();

    let index = reader.int32("index")?;
    let icon = reader.int32("icon")?;
    let rank = reader.int32("rank")?;
    let drop_table = reader.int32("dropTable")?;
    let part = reader.int32("part")?;
    let set = reader.int32("set")?;
    let type_rows = reader.nested_int32("aType")?;
    let effect_rows = reader.nested_float32("aEffect")?;

    let artifacts: Vec<Artifact> = (0..reader.rows())
        .map(|i| {
            let idx = index.at(i);
            let set_id = set.at(i);
            let part_code = part.at(i);
            let rank_code = rank.at(i);

            let (a_type, mut a_effect) = match i.checked_sub(1) {
                Some(prev) => (
                    type_rows.get(prev).cloned().unwrap_or_default(),
                    effect_rows
                        .get(prev)
                        .map(|row| row.iter().map(|&v| round6(f64::from(v))).collect())
                        .unwrap_or_default(),
                ),
                None => (Vec::new(), Vec::new()),
            };
            if DOUBLED_RANKS.contains(&rank_code) {
                a_effect = a_effect.iter().map(|v| round6(v / 2.0)).collect();
            }

            let effects_resolved = resolver.resolve(&Policy::ARTIFACT, &a_type, &a_effect);

            Artifact {
                index: idx,
                name: loc.text_or_empty(&format!("an{idx}")),
                set_id,
                set_name: if set_id != 0 {
                    loc.text_or_empty(&format!("anSet{set_id}"))
                } else {
                    String::new()
                },
                icon: icon.get(i),
                rank: rank_code,
                grade: grade_label(rank_code),
                drop_table: drop_table.get(i),
                part: part_code,
                part_name: part_label(part_code),
                a_type,
                a_effect,
                effects_resolved,
            }
        })
        .collect();

    info!(table = table.name, rows = artifacts.len(), "Extracted artifacts");
    Ok(artifacts)
}

/// Replace the effects of premium artifacts with hand-verified lines
///
/// Returns how many artifacts were rewritten.
pub fn apply_premium(artifacts: &mut [Artifact], calibration: &Calibration) -> usize {
    if !calibration.has_premium() {
        debug!("No premium effects loaded");
        return 0;
    }

    let mut count = 0;
    for artifact in artifacts.iter_mut().filter(|a| a.grade == PREMIUM_GRADE) {
        let Some(effects) = calibration
            .premium_effects(&artifact.name)
            .filter(|effects| !effects.is_empty())
        else {
            continue;
        };
        artifact.effects_resolved = effects.iter().map(EffectDescriptor::premium).collect();
        count += 1;
    }

    info!(count, "Applied premium artifact effects");
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{MainTypeEntry, PremiumEffect, ValueFormat, PREMIUM_MAIN_CODE, PREMIUM_SUB_CODE};
    use crate::layout::V1;
    use crate::tables::testing::{table_like, Payload};
    use crate::test_support::{f32_payload, i32_payload, localization, nested_payload};

    fn gold() -> Calibration {
        Calibration::default().with_main_type(
            12,
            MainTypeEntry {
                name: "골드 획득".to_string(),
                format: ValueFormat::Percent,
                display_ratio: 1.0,
            },
        )
    }

    #[test]
    fn test_labels() {
        assert_eq!(grade_label(0), "E");
        assert_eq!(grade_label(11), "Q");
        assert_eq!(grade_label(15), "유료");
        assert_eq!(grade_label(13), "?13");
        assert_eq!(part_label(2), "갑옷");
        assert_eq!(part_label(7), "부위7");
    }

    #[test]
    fn test_extract_artifacts() {
        let types = nested_payload(
            &[i32_payload(&[12]), i32_payload(&[12, 0]), i32_payload(&[12])],
            &[0, 1, 2],
        );
        let effects = nested_payload(
            &[f32_payload(&[0.5]), f32_payload(&[0.2, 0.0]), f32_payload(&[0.3])],
            &[0, 1, 2],
        );
        let (data, layout) = table_like(
            &V1.artifact,
            3,
            vec![
                ("index", Payload::Int32(vec![1, 2, 3])),
                ("icon", Payload::Int32(vec![40, 41])),
                ("rank", Payload::Int32(vec![5, 2, 15])),
                ("part", Payload::Int32(vec![0, 3, 9])),
                ("set", Payload::Int32(vec![0, 4, 0])),
                ("aType", Payload::Raw(types)),
                ("aEffect", Payload::Raw(effects)),
            ],
        );
        let cal = gold();
        let loc = localization(&[("an1", "용의 검"), ("an2", "현자의 반지"), ("anSet4", "현자 세트")]);
        let resolver = EffectResolver::new(&cal, &loc);

        let artifacts = extract(&data, layout, &resolver).unwrap();
        assert_eq!(artifacts.len(), 3);

        let first = &artifacts[0];
        assert_eq!(first.name, "용의 검");
        assert_eq!(first.grade, "S");
        assert_eq!(first.part_name, "무기");
        assert_eq!(first.set_name, "");
        assert!(first.a_type.is_empty());
        assert!(first.effects_resolved.is_empty());

        // Row 1 reads row 0's arrays, halved for rank C
        let second = &artifacts[1];
        assert_eq!(second.set_name, "현자 세트");
        assert_eq!(second.a_type, vec![12]);
        assert_eq!(second.a_effect, vec![0.25]);
        assert_eq!(second.effects_resolved[0].description, "골드 획득 25%");

        let third = &artifacts[2];
        assert_eq!(third.name, "");
        assert_eq!(third.grade, "유료");
        assert_eq!(third.part_name, "부위9");
        assert_eq!(third.icon, None);
        assert_eq!(third.a_type, vec![12, 0]);
        assert_eq!(third.a_effect, vec![0.2, 0.0]);
        assert_eq!(third.effects_resolved.len(), 1);

        let json = serde_json::to_value(third).unwrap();
        assert!(json["icon"].is_null());
        assert!(json["dropTable"].is_null());
        assert_eq!(json["aType"], serde_json::json!([12, 0]));
    }

    #[test]
    fn test_apply_premium() {
        let artifact = |name: &str, grade: &str| Artifact {
            index: 0,
            name: name.to_string(),
            set_id: 0,
            set_name: String::new(),
            icon: None,
            rank: 15,
            grade: grade.to_string(),
            drop_table: None,
            part: 0,
            part_name: "무기".to_string(),
            a_type: Vec::new(),
            a_effect: Vec::new(),
            effects_resolved: Vec::new(),
        };
        let mut artifacts = vec![
            artifact("황금 왕관", "유료"),
            artifact("황금 왕관", "S"),
            artifact("낡은 투구", "유료"),
        ];

        assert_eq!(apply_premium(&mut artifacts, &Calibration::default()), 0);

        let cal = Calibration::default().with_premium(
            "황금 왕관",
            vec![
                PremiumEffect {
                    description: "골드 획득 50%".to_string(),
                    value_display: "50%".to_string(),
                    is_sub: false,
                },
                PremiumEffect {
                    description: "치명타".to_string(),
                    value_display: String::new(),
                    is_sub: true,
                },
            ],
        );
        assert_eq!(apply_premium(&mut artifacts, &cal), 1);

        let effects = &artifacts[0].effects_resolved;
        assert_eq!(effects.len(), 2);
        assert_eq!(effects[0].type_code, PREMIUM_MAIN_CODE);
        assert_eq!(effects[0].type_name, "골드");
        assert_eq!(effects[1].type_code, PREMIUM_SUB_CODE);
        assert_eq!(effects[1].type_name, "치명타");
        assert!(artifacts[1].effects_resolved.is_empty());
        assert!(artifacts[2].effects_resolved.is_empty());

        let json = serde_json::to_value(&effects[1]).unwrap();
        assert_eq!(json["is_sub"], true);
        assert!(serde_json::to_value(&effects[0]).unwrap().get("is_sub").is_none());
    }
}
