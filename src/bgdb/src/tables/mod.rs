//! Per-table extractors
//!
//! Each table module turns the columns listed in [`crate::layout`] into serde
//! records. Columns are read through a [`TableReader`], which checks every
//! read against the buffer and substitutes defaults for rows a short column
//! does not cover.

mod artifact;
mod boss;
mod by_grade;
mod commander;
mod creature;
mod enemy;
mod enrich;
mod equipment;
mod item;

pub use artifact::{apply_premium, extract as extract_artifacts, Artifact};
pub use boss::{extract as extract_bosses, Boss};
pub use by_grade::{build as mercenaries_by_grade, MercenariesByGrade, MercenaryRecord, MercenarySkill, Meta};
pub use commander::{
    extract_commanders, extract_specialties, merge_commanders, Commander, CommandersFull, Specialty,
};
pub use creature::{
    extract as extract_creatures, Creature, CreatureTypes, DamageRaw, DamageRawG, SheetStats, Skill,
};
pub use enemy::{extract as extract_enemies, Enemy};
pub use enrich::{enrich_creatures, enrich_equipment};
pub use equipment::{extract as extract_equipment, Equipment};
pub use item::{extract as extract_items, split_items, Item, ItemGroups};

use tracing::warn;

use crate::field::Field;
use crate::grade::scan_grade_codes;
use crate::layout::TableLayout;
use crate::nested::NestedArray;
use crate::string_table::{table_strings, NameMap, StringTable};
use crate::Result;

/// One decoded column with per-row defaulting
#[derive(Debug, Clone, PartialEq)]
pub struct Column<T> {
    values: Vec<T>,
}

impl<T: Copy> Column<T> {
    pub fn get(&self, row: usize) -> Option<T> {
        self.values.get(row).copied()
    }

    /// Value for `row`, or `default` past the end of the column
    pub fn or(&self, row: usize, default: T) -> T {
        self.get(row).unwrap_or(default)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<T: Copy + Default> Column<T> {
    /// Value for `row`, or the type's zero value
    pub fn at(&self, row: usize) -> T {
        self.or(row, T::default())
    }
}

/// Column reader bound to one table's layout
#[derive(Debug, Clone, Copy)]
pub struct TableReader<'a> {
    data: &'a [u8],
    table: &'a TableLayout,
}

impl<'a> TableReader<'a> {
    pub fn new(data: &'a [u8], table: &'a TableLayout) -> Self {
        Self { data, table }
    }

    pub fn rows(&self) -> usize {
        self.table.rows
    }

    pub fn table(&self) -> &'a TableLayout {
        self.table
    }

    fn field(&self, name: &str) -> Result<Field<'a>> {
        Field::at(self.data, self.table.offset(name)?)
    }

    fn column<T>(&self, name: &str, values: Vec<T>) -> Column<T> {
        if values.len() < self.table.rows {
            warn!(
                table = self.table.name,
                field = name,
                len = values.len(),
                rows = self.table.rows,
                "Column shorter than table, missing rows use defaults"
            );
        }
        Column { values }
    }

    pub fn int32(&self, name: &str) -> Result<Column<i32>> {
        let values = self.field(name)?.int32();
        Ok(self.column(name, values))
    }

    /// float32 column widened to f64 (exact)
    pub fn float32(&self, name: &str) -> Result<Column<f64>> {
        let values = self.field(name)?.float32().into_iter().map(f64::from).collect();
        Ok(self.column(name, values))
    }

    /// int32 column holding float32 bit patterns, widened to f64
    pub fn float_bits(&self, name: &str) -> Result<Column<f64>> {
        let values = self
            .field(name)?
            .int32_as_float32()
            .into_iter()
            .map(f64::from)
            .collect();
        Ok(self.column(name, values))
    }

    pub fn bool(&self, name: &str) -> Result<Column<bool>> {
        let values = self.field(name)?.bool();
        Ok(self.column(name, values))
    }

    /// Rank column, always exactly one value per table row
    pub fn rank(&self, name: &str) -> Result<Column<i32>> {
        let values = self.field(name)?.rank(self.table.rows);
        Ok(Column { values })
    }

    pub fn nested_int32(&self, name: &str) -> Result<Vec<Vec<i32>>> {
        Ok(NestedArray::from_field(&self.field(name)?)?.int32_rows())
    }

    pub fn nested_float32(&self, name: &str) -> Result<Vec<Vec<f32>>> {
        Ok(NestedArray::from_field(&self.field(name)?)?.float32_rows())
    }

    pub fn nested_string(&self, name: &str) -> Result<Vec<String>> {
        Ok(NestedArray::from_field(&self.field(name)?)?.string_rows())
    }

    /// Grade letters stored between `rank_field` and `next_field`
    pub fn grades(&self, rank_field: &str, next_field: &str) -> Result<Vec<String>> {
        let start = self.table.offset(rank_field)?;
        let end = self.table.offset(next_field)?;
        Ok(scan_grade_codes(self.data, start, end, self.table.rows))
    }

    /// This table's slice of the name map, `stride` strings per row
    pub fn strings(&self, name_map: &NameMap, strings: &StringTable, stride: usize) -> Vec<Vec<String>> {
        table_strings(
            name_map,
            strings,
            self.table.map_start,
            self.table.rows,
            stride,
        )
    }
}
