//! Commander and commander specialty records

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use super::TableReader;
use crate::effect::CommanderName;
use crate::layout::TableLayout;
use crate::string_table::{NameMap, StringTable};
use crate::{round6, Result};

/// Strings per commander / specialty row in the name map
const STRIDE: usize = 6;

/// `targetIndex` of specialties that apply to every commander
pub const GLOBAL_TARGET: i32 = -1;

/// Columns a short table does not cover are `null`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Commander {
    pub index: Option<i32>,
    pub strings: Vec<String>,
    pub rarity: Option<i32>,
    pub icon: Option<i32>,
    pub gender: Option<i32>,
    #[serde(rename = "statStr")]
    pub stat_str: Option<i32>,
    #[serde(rename = "statInt")]
    pub stat_int: Option<i32>,
    #[serde(rename = "statLuck")]
    pub stat_luck: Option<i32>,
    #[serde(rename = "statChar")]
    pub stat_char: Option<i32>,
    /// Spreadsheet name, matched by position
    pub name_ko: String,
    pub grade: String,
    pub specialties: Vec<Specialty>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specialty {
    pub index: Option<i32>,
    pub strings: Vec<String>,
    pub icon: Option<i32>,
    #[serde(rename = "targetIndex")]
    pub target_index: Option<i32>,
    pub target: Option<i32>,
    #[serde(rename = "type")]
    pub kind: String,
    pub effect: f64,
}

/// Commanders with their specialties attached
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommandersFull {
    pub commanders: Vec<Commander>,
    pub global_specialties: Vec<Specialty>,
}

pub fn extract_commanders(
    data: &[u8],
    table: &TableLayout,
    name_map: &NameMap,
    strings: &StringTable,
) -> Result<Vec<Commander>> {
    let reader = TableReader::new(data, table);
    let row_strings = reader.strings(name_map, strings, STRIDE);

    let index = reader.int32("index")?;
    let rarity = reader.int32("rarity")?;
    let icon = reader.int32("icon")?;
    let gender = reader.int32("gender")?;
    let stat_str = reader.int32("statStr")?;
    let stat_int = reader.int32("statInt")?;
    let stat_luck = reader.int32("statLuck")?;
    let stat_char = reader.int32("statChar")?;

    let commanders: Vec<Commander> = row_strings
        .into_iter()
        .enumerate()
        .map(|(i, strings)| Commander {
            index: index.get(i),
            strings,
            rarity: rarity.get(i),
            icon: icon.get(i),
            gender: gender.get(i),
            stat_str: stat_str.get(i),
            stat_int: stat_int.get(i),
            stat_luck: stat_luck.get(i),
            stat_char: stat_char.get(i),
            name_ko: String::new(),
            grade: String::new(),
            specialties: Vec::new(),
        })
        .collect();

    info!(table = table.name, rows = commanders.len(), "Extracted commanders");
    Ok(commanders)
}

pub fn extract_specialties(
    data: &[u8],
    table: &TableLayout,
    name_map: &NameMap,
    strings: &StringTable,
) -> Result<Vec<Specialty>> {
    let reader = TableReader::new(data, table);
    let row_strings = reader.strings(name_map, strings, STRIDE);

    let index = reader.int32("index")?;
    let icon = reader.int32("icon")?;
    let target_index = reader.int32("targetIndex")?;
    let target = reader.int32("target")?;
    let kinds = reader.nested_string("type")?;
    let effect = reader.float32("effect")?;

    let specialties: Vec<Specialty> = row_strings
        .into_iter()
        .enumerate()
        .map(|(i, strings)| Specialty {
            index: index.get(i),
            strings,
            icon: icon.get(i),
            target_index: target_index.get(i),
            target: target.get(i),
            kind: kinds.get(i).cloned().unwrap_or_default(),
            effect: round6(effect.at(i)),
        })
        .collect();

    info!(table = table.name, rows = specialties.len(), "Extracted specialties");
    Ok(specialties)
}

/// Attach specialties to commanders and apply spreadsheet names
///
/// A specialty belongs to the commander whose `index` equals its
/// `targetIndex`; `targetIndex == -1` makes it global. Spreadsheet entry *i*
/// names commander *i* in extraction order.
pub fn merge_commanders(
    mut commanders: Vec<Commander>,
    specialties: Vec<Specialty>,
    names: &[CommanderName],
) -> CommandersFull {
    for (position, commander) in commanders.iter_mut().enumerate() {
        let entry = names.get(position).cloned().unwrap_or_default();
        commander.name_ko = entry.name;
        commander.grade = entry.grade;
    }
    if names.len() < commanders.len() {
        debug!(
            names = names.len(),
            commanders = commanders.len(),
            "Fewer spreadsheet names than commanders"
        );
    }

    let mut by_target: HashMap<Option<i32>, Vec<Specialty>> = HashMap::new();
    let mut global_specialties = Vec::new();
    for specialty in specialties {
        match specialty.target_index {
            Some(GLOBAL_TARGET) => global_specialties.push(specialty),
            target => by_target.entry(target).or_default().push(specialty),
        }
    }

    for commander in &mut commanders {
        commander.specialties = by_target.get(&commander.index).cloned().unwrap_or_default();
    }

    CommandersFull {
        commanders,
        global_specialties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::V1;
    use crate::tables::testing::{table_like, Payload};
    use crate::test_support::nested_payload;

    fn specialty(index: i32, target_index: i32) -> Specialty {
        Specialty {
            index: Some(index),
            strings: Vec::new(),
            icon: None,
            target_index: Some(target_index),
            target: None,
            kind: String::new(),
            effect: 0.0,
        }
    }

    #[test]
    fn test_extract_commanders() {
        let (data, layout) = table_like(
            &V1.commander,
            2,
            vec![
                ("index", Payload::Int32(vec![0, 1])),
                ("rarity", Payload::Int32(vec![3])),
                ("statStr", Payload::Int32(vec![10, 12])),
            ],
        );
        let name_map = NameMap::new(vec![(0, 0)]);
        let strings: StringTable = [(0, "아서"), (1, "왕")]
            .into_iter()
            .map(|(id, s)| (id, s.to_string()))
            .collect();

        let commanders = extract_commanders(&data, layout, &name_map, &strings).unwrap();
        assert_eq!(commanders[0].strings, vec!["아서", "왕", "", "", "", ""]);
        assert_eq!(commanders[0].rarity, Some(3));
        assert_eq!(commanders[1].rarity, None);
        assert_eq!(commanders[1].stat_str, Some(12));
        assert!(commanders[1].strings.is_empty());

        let json = serde_json::to_value(&commanders[1]).unwrap();
        assert!(json["rarity"].is_null());
        assert_eq!(json["statStr"], 12);
    }

    #[test]
    fn test_extract_specialties() {
        let kinds = nested_payload(&[b"gold".to_vec(), b"damage".to_vec()], &[1, 0]);
        let (data, layout) = table_like(
            &V1.specialty,
            3,
            vec![
                ("index", Payload::Int32(vec![0, 1, 2])),
                ("targetIndex", Payload::Int32(vec![-1, 0, 0])),
                ("type", Payload::Raw(kinds)),
                ("effect", Payload::Float32(vec![0.1, 0.25])),
            ],
        );
        let specialties =
            extract_specialties(&data, layout, &NameMap::default(), &StringTable::default()).unwrap();
        assert_eq!(specialties[0].kind, "gold");
        assert_eq!(specialties[1].kind, "damage");
        assert_eq!(specialties[2].kind, "");
        assert_eq!(specialties[0].effect, 0.1);
        assert_eq!(specialties[2].effect, 0.0);
        assert_eq!(specialties[1].target_index, Some(0));

        let json = serde_json::to_value(&specialties[0]).unwrap();
        assert_eq!(json["type"], "gold");
        assert_eq!(json["targetIndex"], -1);
    }

    #[test]
    fn test_merge_commanders() {
        let commander = |index: i32| Commander {
            index: Some(index),
            strings: Vec::new(),
            rarity: None,
            icon: None,
            gender: None,
            stat_str: None,
            stat_int: None,
            stat_luck: None,
            stat_char: None,
            name_ko: String::new(),
            grade: String::new(),
            specialties: Vec::new(),
        };
        let names = vec![CommanderName {
            name: "아서".to_string(),
            grade: "S".to_string(),
        }];

        let full = merge_commanders(
            vec![commander(5), commander(7)],
            vec![specialty(0, -1), specialty(1, 7), specialty(2, 7), specialty(3, 9)],
            &names,
        );

        assert_eq!(full.commanders[0].name_ko, "아서");
        assert_eq!(full.commanders[0].grade, "S");
        assert_eq!(full.commanders[1].name_ko, "");
        assert!(full.commanders[0].specialties.is_empty());

        let attached: Vec<_> = full.commanders[1].specialties.iter().map(|s| s.index).collect();
        assert_eq!(attached, vec![Some(1), Some(2)]);
        assert_eq!(full.global_specialties.len(), 1);
        assert_eq!(full.global_specialties[0].index, Some(0));
    }
}
