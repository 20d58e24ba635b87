//! Whole-file extraction
//!
//! Decodes the shared string pool and name map, locates localization, then
//! runs every table extractor. A bounds violation anywhere aborts the run.
//! A localization miss only skips the tables that need localized text.

use tracing::{info, warn};

use crate::effect::{Calibration, EffectResolver};
use crate::layout::{Layout, V1};
use crate::localization::Localization;
use crate::string_table::{parse_name_map, parse_strings};
use crate::tables::{
    self, apply_premium, enrich_creatures, enrich_equipment, Artifact, Boss, CommandersFull,
    Creature, Enemy, Equipment, ItemGroups, MercenariesByGrade,
};
use crate::{Result, LOCALIZATION_MIN_COUNT};

const MISSING_LOCALIZATION: &str = "localization blocks not found";

/// Result of one table: its records, or why it was skipped
#[derive(Debug, Clone, PartialEq)]
pub enum TableOutcome<T> {
    Extracted(T),
    Skipped { reason: String },
}

impl<T> TableOutcome<T> {
    pub fn extracted(&self) -> Option<&T> {
        match self {
            TableOutcome::Extracted(value) => Some(value),
            TableOutcome::Skipped { .. } => None,
        }
    }

    pub fn is_extracted(&self) -> bool {
        matches!(self, TableOutcome::Extracted(_))
    }

    fn skipped(reason: &str) -> Self {
        TableOutcome::Skipped {
            reason: reason.to_string(),
        }
    }
}

/// Everything decoded from one database file
#[derive(Debug, Clone)]
pub struct Extraction {
    pub string_count: usize,
    pub name_map_len: usize,
    /// Localization key count, `None` when the blocks were not found
    pub localization_keys: Option<usize>,
    pub creatures: TableOutcome<Vec<Creature>>,
    pub items: TableOutcome<ItemGroups>,
    pub enemies: TableOutcome<Vec<Enemy>>,
    pub bosses: TableOutcome<Vec<Boss>>,
    pub equipment: TableOutcome<Vec<Equipment>>,
    pub commanders: TableOutcome<CommandersFull>,
    pub artifacts: TableOutcome<Vec<Artifact>>,
    pub by_grade: TableOutcome<MercenariesByGrade>,
    /// Premium artifacts whose effects were replaced
    pub premium_applied: usize,
}

impl Extraction {
    /// Names of the outputs that were skipped, with the reason
    pub fn skipped(&self) -> Vec<(&'static str, &str)> {
        let outcomes: [(&'static str, Option<&str>); 8] = [
            ("creatures", reason(&self.creatures)),
            ("items", reason(&self.items)),
            ("enemies", reason(&self.enemies)),
            ("bosses", reason(&self.bosses)),
            ("equipment", reason(&self.equipment)),
            ("commanders", reason(&self.commanders)),
            ("artifacts", reason(&self.artifacts)),
            ("mercenaries_by_grade", reason(&self.by_grade)),
        ];
        outcomes
            .into_iter()
            .filter_map(|(name, reason)| reason.map(|r| (name, r)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.skipped().is_empty()
    }
}

fn reason<T>(outcome: &TableOutcome<T>) -> Option<&str> {
    match outcome {
        TableOutcome::Extracted(_) => None,
        TableOutcome::Skipped { reason } => Some(reason),
    }
}

/// Tables that need localized text
struct Localized {
    creatures: Vec<Creature>,
    items: ItemGroups,
    bosses: Vec<Boss>,
    equipment: Vec<Equipment>,
    artifacts: Vec<Artifact>,
    by_grade: MercenariesByGrade,
    premium_applied: usize,
}

/// Runs the full extraction over one buffer
#[derive(Debug, Clone, Copy)]
pub struct Extractor<'a> {
    data: &'a [u8],
    layout: &'a Layout,
    calibration: &'a Calibration,
    min_localization_count: usize,
}

impl<'a> Extractor<'a> {
    pub fn new(data: &'a [u8], calibration: &'a Calibration) -> Self {
        Self {
            data,
            layout: &V1,
            calibration,
            min_localization_count: LOCALIZATION_MIN_COUNT as usize,
        }
    }

    pub fn with_layout(mut self, layout: &'a Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_min_localization_count(mut self, min_count: usize) -> Self {
        self.min_localization_count = min_count;
        self
    }

    pub fn run(&self) -> Result<Extraction> {
        let layout = self.layout;
        info!(version = layout.version, bytes = self.data.len(), "Extracting");

        let strings = parse_strings(self.data, layout.string_table_offset)?;
        let name_map = parse_name_map(self.data, layout.name_map_offset)?;
        info!(strings = strings.len(), name_map = name_map.len(), "Decoded string pool");

        let localization = match Localization::locate(self.data, self.min_localization_count) {
            Ok(loc) => Some(loc),
            Err(err) if err.is_heuristic_miss() => {
                warn!(error = %err, "Localization not found; skipping localized tables");
                None
            }
            Err(err) => return Err(err),
        };

        let enemies = tables::extract_enemies(self.data, &layout.enemy, &name_map, &strings)?;
        let commanders =
            tables::extract_commanders(self.data, &layout.commander, &name_map, &strings)?;
        let specialties =
            tables::extract_specialties(self.data, &layout.specialty, &name_map, &strings)?;
        let commanders = tables::merge_commanders(
            commanders,
            specialties,
            self.calibration.commander_names(),
        );

        let localized = localization
            .as_ref()
            .map(|loc| self.localized(loc))
            .transpose()?;

        let mut extraction = Extraction {
            string_count: strings.len(),
            name_map_len: name_map.len(),
            localization_keys: localization.as_ref().map(Localization::key_count),
            creatures: TableOutcome::skipped(MISSING_LOCALIZATION),
            items: TableOutcome::skipped(MISSING_LOCALIZATION),
            enemies: TableOutcome::Extracted(enemies),
            bosses: TableOutcome::skipped(MISSING_LOCALIZATION),
            equipment: TableOutcome::skipped(MISSING_LOCALIZATION),
            commanders: TableOutcome::Extracted(commanders),
            artifacts: TableOutcome::skipped(MISSING_LOCALIZATION),
            by_grade: TableOutcome::skipped(MISSING_LOCALIZATION),
            premium_applied: 0,
        };

        if let Some(localized) = localized {
            extraction.creatures = TableOutcome::Extracted(localized.creatures);
            extraction.items = TableOutcome::Extracted(localized.items);
            extraction.bosses = TableOutcome::Extracted(localized.bosses);
            extraction.equipment = TableOutcome::Extracted(localized.equipment);
            extraction.artifacts = TableOutcome::Extracted(localized.artifacts);
            extraction.by_grade = TableOutcome::Extracted(localized.by_grade);
            extraction.premium_applied = localized.premium_applied;
        }

        Ok(extraction)
    }

    fn localized(&self, loc: &Localization) -> Result<Localized> {
        let layout = self.layout;
        let resolver = EffectResolver::new(self.calibration, loc);

        let mut creatures = tables::extract_creatures(self.data, &layout.creature, loc)?;
        let items = tables::split_items(tables::extract_items(self.data, &layout.item, &resolver)?);
        let bosses = tables::extract_bosses(self.data, &layout.boss, loc)?;
        let mut equipment = tables::extract_equipment(self.data, &layout.equipment, &resolver)?;
        let mut artifacts = tables::extract_artifacts(self.data, &layout.artifact, &resolver)?;
        let premium_applied = apply_premium(&mut artifacts, self.calibration);

        enrich_creatures(&mut creatures, &equipment);
        enrich_equipment(&mut equipment, &creatures);
        let by_grade = tables::mercenaries_by_grade(&creatures);

        Ok(Localized {
            creatures,
            items,
            bosses,
            equipment,
            artifacts,
            by_grade,
            premium_applied,
        })
    }
}
