//! Calibration tables for effect resolution
//!
//! The calibrated tables were built by cross-referencing binary values against
//! the game's own display. They ship as built-in defaults; a calibration
//! directory can override or extend them:
//!
//! | file | shape |
//! |---|---|
//! | `main_type_overrides.json` | `{"code": {"name", "format", "display_ratio"}}` |
//! | `artifact_code_mapping.json` | `{"code": "name"}` |
//! | `sec_korean_mapping.json` | `{"code": "template"}` |
//! | `premium_effects.json` | `{"artifact name": [{"description", "value_display", "is_sub"}]}` |
//! | `enhancement_overrides.json` | `{"equipment name": multiplier}` |
//! | `additional_strings.json` | `{"tables": {"commanders": {"entries": [{"name", "grade"}]}}}` |
//!
//! Every file is optional.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::format::ValueFormat;
use crate::{Error, Result};

pub const MAIN_TYPE_FILE: &str = "main_type_overrides.json";
pub const ARTIFACT_CODE_FILE: &str = "artifact_code_mapping.json";
pub const SEC_TEMPLATE_FILE: &str = "sec_korean_mapping.json";
pub const PREMIUM_FILE: &str = "premium_effects.json";
pub const ENHANCEMENT_FILE: &str = "enhancement_overrides.json";
pub const ADDITIONAL_STRINGS_FILE: &str = "additional_strings.json";

/// Calibrated display rule for one effect code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainTypeEntry {
    pub name: String,
    pub format: ValueFormat,
    /// Binary value × ratio = displayed base value
    #[serde(default = "unit_ratio")]
    pub display_ratio: f64,
}

fn unit_ratio() -> f64 {
    1.0
}

/// One hand-verified effect line of a premium artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumEffect {
    pub description: String,
    #[serde(default)]
    pub value_display: String,
    #[serde(default)]
    pub is_sub: bool,
}

/// Spreadsheet name for a commander, matched by position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommanderName {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grade: String,
}

use ValueFormat::{Integer as I, Percent as P, Raw as R};

/// Built-in calibrated main-type table: `(code, name, format, display_ratio)`
const MAIN_TYPES: &[(i32, &str, ValueFormat, f64)] = &[
    (0, "데미지", P, 4.5),
    // Stored at 1/1000 of code 0's scale; artifacts rescale it
    (90, "데미지", P, 1.0),
    (1, "추가 데미지", I, 3.0),
    (2, "모든 용병의 데미지", P, 5.0),
    (3, "클릭 데미지", P, 4.5),
    (5, "모든 용병의 클릭 데미지", P, 3.0),
    (6, "공격 속도", P, 1.0),
    (7, "모든 용병의 공격 속도", P, 1.0),
    (8, "골드 획득량", P, 1.0),
    (9, "적들의 물리 저항력 감소", P, 1.0),
    (10, "적들의 마법 저항력 감소", P, 1.0),
    (11, "적들의 최대 체력 감소", P, 1.0),
    (12, "적들의 클릭 저항력 감소", P, 1.0),
    (13, "골드 저장량", P, 1.0),
    (14, "클릭 크리티컬 확률", P, 1.0),
    (15, "아이템 획득 확률", P, 1.0),
    (16, "강타 확률", P, 1.0),
    (17, "강타 배수", R, 0.5),
    (20, "모든 용병의 강타 확률", P, 1.0),
    (21, "모든 용병의 강타 배수", R, 1.0),
    (24, "소울 클릭 확률", P, 1.0),
    (25, "클릭 크리티컬 배수", R, 1.0),
    (26, "베이스 데미지", P, 3.0),
    (28, "적들의 부활 감소", P, 1.0),
    (29, "모든 용병의 최대 레벨", I, 1.0),
    (30, "최대 레벨", I, 1.0),
    (31, "적들의 카오스 취약성", P, 1.0),
    (32, "모든 용병의 레벨업 및 스킬학습 비용감소", P, 1.0),
    (33, "모든 용병의 베이스 데미지", P, 3.0),
    (34, "모든 혼합 용병의 공격 속도", P, 1.0),
    (35, "모든 용병의 추가 데미지", I, 2.5),
    (36, "소울번", P, 1.0),
    (39, "신성 데미지", I, 2.0),
    (40, "물리 최종 데미지", P, 0.316),
    (41, "마법 최종 데미지", P, 0.316),
    (42, "카오스 최종 데미지", P, 0.316),
    (43, "소울 클릭배수", P, 1.0),
    (45, "모든 용병의 피격 지속시간 감소", P, 1.0),
    (46, "뿔레정수 획득 확률", P, 1.0),
    (47, "적들의 회피 확률 감소", P, 1.0),
    (48, "순수 데미지", I, 1.0),
    (49, "침략자에게 추가 데미지", P, 1.0),
    (52, "모든 용병의 행운 확률", P, 1.0),
    (53, "모든 용병의 행운 배수", R, 1.0),
    (54, "모든 용병의 최종 데미지", P, 0.327),
    (55, "모든 용병의 성장 데미지", R, 2.552),
    (56, "뿔레 조각 드랍 확률", P, 1.0),
    (57, "모든 용병의 공포 극복 확률", P, 1.0),
    (59, "모든 용병의 클릭 성장 데미지", R, 0.7),
    (60, "모든 용병의 시작 레벨", I, 1.0),
    (62, "적 흡수 확률 감소", P, 1.0),
    (65, "뿔레오브 획득 확률", P, 1.0),
    (66, "피격 보호 확률", P, 1.0),
    (67, "적 약화 감소", P, 1.0),
    (68, "적 둔화 감소", P, 1.0),
    (69, "뿔레토큰획득 확률", P, 1.0),
    (70, "쥬얼 드랍 확률", P, 1.0),
    (76, "아티팩트 드랍률 증가", P, 1.0),
    (77, "더블어택 확률", P, 1.0),
    (87, "치명타 확률", P, 1.0),
    (88, "치명타 배수", R, 0.5),
    (89, "모용 치명타 배수", R, 0.5),
    (197, "모든 트리니티 용병의 강타배수", R, 1.0),
    (264, "최종 데미지", P, 1.0),
    (314, "적 방어막 효과 감소", P, 1.0),
    (315, "적 부활 확률 감소", P, 1.0),
    (538, "적 피해 면제 효과 감소", P, 1.0),
    (539, "적 반사 효과 감소", P, 1.0),
    // Not verified against the game display
    (18, "연타 확률", P, 1.0),
    (19, "모든 용병의 연타 확률", P, 1.0),
    (22, "자동 클릭 확률", P, 1.0),
    (23, "자동 클릭 속도", P, 1.0),
    (27, "추가 클릭 확률", P, 1.0),
    (64, "모든 용병의 연타 데미지", P, 1.0),
    (71, "루비 드랍 확률", P, 1.25),
    (72, "토파즈 드랍 확률", P, 1.25),
    (73, "사파이어 드랍 확률", P, 1.25),
    (74, "에메랄드 드랍 확률", P, 1.25),
    (75, "자수정 드랍 확률", P, 1.25),
    (368, "모든 용병의 추가 클릭 데미지", P, 1.0),
    (375, "자동 클릭 데미지", P, 1.0),
    (431, "모든 용병의 추가 클릭 확률", P, 1.0),
    (1013, "모든 물리용병의 성장 데미지", P, 1.0),
    (1014, "모든 마법용병의 성장 데미지", P, 1.0),
    (1015, "모든 혼합용병의 성장 데미지", P, 1.0),
    (1019, "물리 강타배수 증폭", R, 1.0),
    (1020, "마법 강타배수 증폭", R, 1.0),
    (1021, "혼합 강타배수 증폭", R, 1.0),
    (1168, "모든 용병의 연타 간격 감소", P, 0.8),
    (1169, "모든 용병의 연타 데미지 증폭", P, 1.0),
    (1171, "즉시 공격 확률", P, 1.0),
    (1172, "즉시 공격 데미지", P, 1.0),
    (1173, "즉시 공격 속도", P, 1.0),
];

/// Effect names whose format is known even without a calibrated code
const EXTRA_NAME_FORMATS: &[(&str, ValueFormat)] = &[
    ("성장 데미지", R),
    ("클릭 성장 데미지", R),
    ("모든 용병의 클릭 성장 데미지", R),
    ("데미지 중첩", P),
    ("흡수 확률", P),
    ("선제공격 확률", P),
    ("축복 확률", P),
    ("저주 확률", P),
    ("봉인 확률", P),
    ("공포 확률", P),
    ("즉사 확률", P),
    ("방어막 확률", P),
    ("반사 확률", P),
    ("둔화 확률", P),
    ("약화 확률", P),
    ("부활 확률", P),
    ("피해 면제", P),
    ("절대명중 확률", P),
    ("입자 확률", P),
    ("즉시 공격", P),
    ("조각확", P),
    ("모용공극", P),
    ("소울번 확률", P),
    ("토큰 획득 확률", P),
    ("회복 데미지 증가", P),
    ("피격시 데미지 증가", P),
    ("즉시 공격 속도", P),
    ("즉시 공격 확률", P),
    ("즉시 공격 데미지", P),
    ("방어력 감소", P),
    ("치명타 딜레이 감소", P),
    ("피격 회피 확률", P),
    ("연타 배수", R),
    ("모든 용병의 소환 속도", P),
    ("연타 데미지", P),
    ("모든 용병의 연타 데미지", P),
    ("추클뎀", P),
    ("모용 추클뎀", P),
];

/// Enhancement multiplier for main type 0 (damage) equipment
pub const DAMAGE_ENHANCEMENT: f64 = 4.0;

/// Enhancement multiplier for everything else
pub const DEFAULT_ENHANCEMENT: f64 = 6.0;

/// Read-only calibration data passed to the resolver
#[derive(Debug, Clone, Default)]
pub struct Calibration {
    main_types: BTreeMap<i32, MainTypeEntry>,
    name_formats: HashMap<String, ValueFormat>,
    artifact_names: HashMap<i32, String>,
    sec_templates: HashMap<i32, String>,
    premium: HashMap<String, Vec<PremiumEffect>>,
    enhancement_overrides: HashMap<String, f64>,
    commander_names: Vec<CommanderName>,
}

impl Calibration {
    /// Built-in tables only
    pub fn builtin() -> Self {
        let mut calibration = Self::default();
        for &(code, name, format, display_ratio) in MAIN_TYPES {
            calibration.main_types.insert(
                code,
                MainTypeEntry {
                    name: name.to_string(),
                    format,
                    display_ratio,
                },
            );
        }
        calibration.rebuild_name_formats();
        calibration
    }

    /// Built-in tables plus whatever files exist in `dir`
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut calibration = Self::builtin();

        if let Some(overrides) = read_optional::<HashMap<String, MainTypeEntry>>(dir, MAIN_TYPE_FILE)? {
            for (code, entry) in overrides {
                calibration
                    .main_types
                    .insert(parse_code(MAIN_TYPE_FILE, &code)?, entry);
            }
            calibration.rebuild_name_formats();
        }

        if let Some(names) = read_optional::<HashMap<String, String>>(dir, ARTIFACT_CODE_FILE)? {
            calibration.artifact_names = parse_code_map(ARTIFACT_CODE_FILE, names)?;
        }

        if let Some(templates) = read_optional::<HashMap<String, String>>(dir, SEC_TEMPLATE_FILE)? {
            calibration.sec_templates = parse_code_map(SEC_TEMPLATE_FILE, templates)?;
        }

        if let Some(premium) = read_optional(dir, PREMIUM_FILE)? {
            calibration.premium = premium;
        }

        if let Some(overrides) = read_optional(dir, ENHANCEMENT_FILE)? {
            calibration.enhancement_overrides = overrides;
        }

        if let Some(strings) = read_optional::<AdditionalStrings>(dir, ADDITIONAL_STRINGS_FILE)? {
            calibration.commander_names = strings.tables.commanders.entries;
        }

        info!(
            dir = %dir.display(),
            main_types = calibration.main_types.len(),
            artifact_names = calibration.artifact_names.len(),
            sec_templates = calibration.sec_templates.len(),
            premium = calibration.premium.len(),
            "Loaded calibration"
        );
        Ok(calibration)
    }

    /// First name in code order decides; extra names override
    fn rebuild_name_formats(&mut self) {
        self.name_formats.clear();
        for entry in self.main_types.values() {
            self.name_formats
                .entry(entry.name.clone())
                .or_insert(entry.format);
        }
        for &(name, format) in EXTRA_NAME_FORMATS {
            self.name_formats.insert(name.to_string(), format);
        }
    }

    pub fn main_type(&self, code: i32) -> Option<&MainTypeEntry> {
        self.main_types.get(&code)
    }

    pub fn name_format(&self, name: &str) -> Option<ValueFormat> {
        self.name_formats.get(name).copied()
    }

    pub fn artifact_name(&self, code: i32) -> Option<&str> {
        self.artifact_names.get(&code).map(String::as_str)
    }

    pub fn sec_template(&self, code: i32) -> Option<&str> {
        self.sec_templates.get(&code).map(String::as_str)
    }

    pub fn premium_effects(&self, artifact_name: &str) -> Option<&[PremiumEffect]> {
        self.premium.get(artifact_name).map(Vec::as_slice)
    }

    pub fn has_premium(&self) -> bool {
        !self.premium.is_empty()
    }

    pub fn commander_names(&self) -> &[CommanderName] {
        &self.commander_names
    }

    /// 0 → 20 enhancement multiplier for a piece of equipment
    pub fn enhancement_multiplier(&self, name: &str, main_type: i32) -> f64 {
        if let Some(&multiplier) = self.enhancement_overrides.get(name) {
            return multiplier;
        }
        if main_type == 0 {
            DAMAGE_ENHANCEMENT
        } else {
            DEFAULT_ENHANCEMENT
        }
    }

    pub fn with_main_type(mut self, code: i32, entry: MainTypeEntry) -> Self {
        self.main_types.insert(code, entry);
        self.rebuild_name_formats();
        self
    }

    pub fn with_artifact_name(mut self, code: i32, name: impl Into<String>) -> Self {
        self.artifact_names.insert(code, name.into());
        self
    }

    pub fn with_sec_template(mut self, code: i32, template: impl Into<String>) -> Self {
        self.sec_templates.insert(code, template.into());
        self
    }

    pub fn with_premium(mut self, name: impl Into<String>, effects: Vec<PremiumEffect>) -> Self {
        self.premium.insert(name.into(), effects);
        self
    }

    pub fn with_enhancement_override(mut self, name: impl Into<String>, multiplier: f64) -> Self {
        self.enhancement_overrides.insert(name.into(), multiplier);
        self
    }

    pub fn with_commander_names(mut self, names: Vec<CommanderName>) -> Self {
        self.commander_names = names;
        self
    }
}

#[derive(Deserialize)]
struct AdditionalStrings {
    tables: AdditionalTables,
}

#[derive(Deserialize)]
struct AdditionalTables {
    commanders: CommanderEntries,
}

#[derive(Deserialize)]
struct CommanderEntries {
    entries: Vec<CommanderName>,
}

fn read_optional<T: DeserializeOwned>(dir: &Path, file: &str) -> Result<Option<T>> {
    let path = dir.join(file);
    if !path.exists() {
        debug!(path = %path.display(), "Calibration file not present");
        return Ok(None);
    }
    let text = fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&text)?))
}

/// Codes are decimal keys, optionally with a `sec` prefix
fn parse_code(file: &str, key: &str) -> Result<i32> {
    let digits = key.strip_prefix("sec").unwrap_or(key);
    digits.trim().parse().map_err(|_| Error::InvalidCalibration {
        key: key.to_string(),
        reason: format!("not a numeric code in {file}"),
    })
}

fn parse_code_map(file: &str, raw: HashMap<String, String>) -> Result<HashMap<i32, String>> {
    raw.into_iter()
        .map(|(key, value)| Ok((parse_code(file, &key)?, value)))
        .collect()
}
