//! Fixed byte offsets of every known table column
//!
//! The blob has no schema, so each column is addressed by the offset of its
//! name-length prefix. All offsets belong to one build of the database; a new
//! build invalidates the whole layout at once, which is why they live in a
//! single versioned constant instead of next to the extractors.

use serde::Serialize;

use crate::string_table::{NAME_MAP_OFFSET, STRING_TABLE_OFFSET};
use crate::{Error, Result};

/// How a column's payload is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Int32,
    Float32,
    Bool,
    /// Embedded count followed by `(filler, rank)` pairs
    Rank,
    /// int32 words holding float32 bit patterns
    FloatBits,
    NestedInt32,
    NestedFloat32,
    NestedString,
    /// Row labels; text is resolved through localization keys instead
    Label,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub offset: usize,
    pub kind: FieldKind,
}

/// One table: row count, name-map slice and column offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableLayout {
    pub name: &'static str,
    pub rows: usize,
    /// First name-map entry owned by this table
    pub map_start: usize,
    pub fields: &'static [FieldSpec],
}

impl TableLayout {
    pub fn field(&self, name: &str) -> Result<&FieldSpec> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| Error::UnknownField {
                table: self.name,
                field: name.to_string(),
            })
    }

    pub fn offset(&self, name: &str) -> Result<usize> {
        self.field(name).map(|f| f.offset)
    }
}

/// Complete layout of one database build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub version: &'static str,
    pub string_table_offset: usize,
    pub name_map_offset: usize,
    pub creature: TableLayout,
    pub item: TableLayout,
    pub enemy: TableLayout,
    pub boss: TableLayout,
    pub stage: TableLayout,
    pub equipment: TableLayout,
    pub commander: TableLayout,
    pub specialty: TableLayout,
    pub artifact: TableLayout,
}

impl Layout {
    /// All tables in name-map order
    pub fn tables(&self) -> [&TableLayout; 9] {
        [
            &self.creature,
            &self.item,
            &self.enemy,
            &self.boss,
            &self.stage,
            &self.equipment,
            &self.commander,
            &self.specialty,
            &self.artifact,
        ]
    }

    pub fn table(&self, name: &str) -> Option<&TableLayout> {
        self.tables().into_iter().find(|t| t.name == name)
    }

    /// Table and column whose field prefix sits exactly at `offset`
    pub fn field_at(&self, offset: usize) -> Option<(&TableLayout, &FieldSpec)> {
        self.tables().into_iter().find_map(|table| {
            table
                .fields
                .iter()
                .find(|f| f.offset == offset)
                .map(|f| (table, f))
        })
    }
}

const fn spec(name: &'static str, offset: usize, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, offset, kind }
}

use FieldKind::{
    Bool, Float32, FloatBits, Int32, Label, NestedFloat32, NestedInt32, NestedString, Rank,
};

const CREATURE_FIELDS: &[FieldSpec] = &[
    spec("index", 9070, Int32),
    spec("model", 11292, Int32),
    spec("rank", 13514, Rank),
    spec("attackType", 18434, Int32),
    spec("canG", 20661, Bool),
    spec("canAwaken", 21265, Bool),
    spec("skill0", 21874, Int32),
    spec("skill1", 24097, Int32),
    spec("skill2", 26320, Int32),
    spec("skill3", 28543, Int32),
    spec("skill4", 30766, Int32),
    spec("damageUp", 32989, Int32),
    spec("damage", 35214, Int32),
    spec("damageClickUp", 37437, Int32),
    spec("damageClick", 39667, Int32),
    spec("attackCooldown", 41895, Float32),
    spec("damageUpG", 44126, Int32),
    spec("damageG", 46352, Int32),
    spec("damageClickUpG", 48576, Int32),
    spec("damageClickG", 50807, Int32),
    spec("attackCooldownG", 53036, Float32),
    spec("exclusiveID0", 55268, Int32),
    spec("exclusiveID1", 57497, Int32),
    spec("exclusiveID2", 59726, Int32),
    spec("effectAttack", 61955, Int32),
    spec("requireOrb", 64184, Int32),
    spec("requireParticle", 66411, Int32),
    spec("typeRaceTop", 68643, Int32),
    spec("typeRace", 70871, Int32),
    spec("typeLocation", 73096, Int32),
    spec("typeGender", 75325, Int32),
    spec("typeIndividuality", 77552, Int32),
    spec("typeHouse", 79786, Int32),
    spec("typeReligion", 82012, Int32),
];

const ITEM_FIELDS: &[FieldSpec] = &[
    spec("name", 105434, Label),
    spec("index", 105503, Int32),
    spec("icon", 110849, Int32),
    spec("priceFactor", 116194, FloatBits),
    spec("passiveType", 121546, Int32),
    spec("type0", 126898, Int32),
    spec("effect0", 132244, FloatBits),
    spec("type1", 137592, Int32),
    spec("effect1", 142938, FloatBits),
    spec("type2", 148286, Int32),
    spec("effect2", 153632, FloatBits),
    spec("randomValue", 158980, Int32),
];

const ENEMY_FIELDS: &[FieldSpec] = &[
    spec("name", 170596, Label),
    spec("model", 170665, Int32),
    spec("factorHp", 172279, Float32),
    spec("resistPhysical", 173896, Float32),
    spec("resistMagical", 175519, Float32),
    spec("factorGold", 177141, Float32),
    spec("color", 178760, Int32),
    spec("isRunaway", 180374, Bool),
    spec("resistClick", 180831, Float32),
    spec("effectAttach", 182451, Int32),
    spec("block", 184072, Float32),
    spec("alpha", 185686, Float32),
    spec("cooldown", 187300, Float32),
    spec("chanceAttackAll", 188917, Float32),
    spec("isMirroring", 190541, Bool),
];

const BOSS_FIELDS: &[FieldSpec] = &[
    spec("name", 192831, Label),
    spec("model", 192900, Int32),
    spec("resistPhysical", 193406, Float32),
    spec("resistMagical", 193921, Float32),
    spec("color", 194435, Int32),
    spec("coin", 194941, Int32),
    spec("resistClick", 195446, Float32),
    spec("effectAttach", 195958, Int32),
    spec("factorHp", 196471, Float32),
    spec("factorGold", 196980, Float32),
    spec("medal", 197491, Int32),
    spec("block", 197997, Float32),
    spec("alpha", 198503, Float32),
    spec("cooldown", 199009, Float32),
    spec("chanceAttackAll", 199518, Float32),
    spec("isMirroring", 200034, Bool),
    spec("essence", 200216, Float32),
];

const EQUIPMENT_FIELDS: &[FieldSpec] = &[
    spec("name", 245888, Label),
    spec("index", 245957, Int32),
    spec("icon", 248155, Int32),
    spec("mainType", 250352, Int32),
    spec("mainEffect", 252553, Float32),
    spec("mainEffectG", 254756, FloatBits),
    spec("rank", 256960, Rank),
    spec("hero0", 261826, Int32),
    spec("hero1", 264035, Int32),
    spec("hero2", 266244, Int32),
    spec("hero3", 268453, Int32),
    spec("hero4", 270662, Int32),
    spec("hero5", 272871, Int32),
    spec("specEffect", 275080, Float32),
    spec("isAvailableG", 277290, Bool),
    spec("cantPowerUp", 277896, Bool),
];

const COMMANDER_FIELDS: &[FieldSpec] = &[
    spec("name", 279137, Label),
    spec("index", 279206, Int32),
    spec("rarity", 279412, Int32),
    spec("icon", 279619, Int32),
    spec("gender", 279824, Int32),
    spec("statStr", 280031, Int32),
    spec("statInt", 280239, Int32),
    spec("statLuck", 280447, Int32),
    spec("statChar", 280656, Int32),
];

const SPECIALTY_FIELDS: &[FieldSpec] = &[
    spec("name", 281510, Label),
    spec("index", 281579, Int32),
    spec("icon", 281785, Int32),
    spec("targetIndex", 281990, Int32),
    spec("target", 282202, Int32),
    spec("type", 282409, NestedString),
    spec("effect", 283082, Float32),
];

const ARTIFACT_FIELDS: &[FieldSpec] = &[
    spec("name", 292276, Label),
    spec("index", 292345, Int32),
    spec("icon", 294639, Int32),
    spec("rank", 296932, Int32),
    spec("dropTable", 299225, Int32),
    spec("part", 301523, Int32),
    spec("set", 303816, Int32),
    spec("aType", 306108, NestedInt32),
    spec("aEffect", 317958, NestedFloat32),
];

/// Layout of the known database build
pub const V1: Layout = Layout {
    version: "v1",
    string_table_offset: STRING_TABLE_OFFSET,
    name_map_offset: NAME_MAP_OFFSET,
    creature: TableLayout {
        name: "creatureBase",
        rows: 539,
        map_start: 0,
        fields: CREATURE_FIELDS,
    },
    item: TableLayout {
        name: "itemBase",
        rows: 1320,
        map_start: 539,
        fields: ITEM_FIELDS,
    },
    enemy: TableLayout {
        name: "enemy",
        rows: 387,
        map_start: 1859,
        fields: ENEMY_FIELDS,
    },
    boss: TableLayout {
        name: "boss",
        rows: 110,
        map_start: 2246,
        fields: BOSS_FIELDS,
    },
    stage: TableLayout {
        name: "stage",
        rows: 500,
        map_start: 2356,
        fields: &[],
    },
    equipment: TableLayout {
        name: "equipment",
        rows: 533,
        map_start: 2856,
        fields: EQUIPMENT_FIELDS,
    },
    commander: TableLayout {
        name: "commander",
        rows: 35,
        map_start: 3389,
        fields: COMMANDER_FIELDS,
    },
    specialty: TableLayout {
        name: "commanderSpecialty",
        rows: 35,
        map_start: 3424,
        fields: SPECIALTY_FIELDS,
    },
    artifact: TableLayout {
        name: "artifact",
        rows: 557,
        map_start: 3459,
        fields: ARTIFACT_FIELDS,
    },
};
