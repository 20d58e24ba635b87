//! Mercenary (creatureBase) records

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::info;

use super::TableReader;
use crate::layout::TableLayout;
use crate::localization::Localization;
use crate::{round6, round_to, Result};

/// Binary damage × this = displayed damage
pub const DAMAGE_SCALE: f64 = 4.0;

/// Binary click damage × this = displayed click damage
pub const CLICK_SCALE: f64 = 0.7;

/// Leading name in a story such as `제리의 ...`
static STORY_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([가-힣A-Za-z0-9 _-]+?)의").expect("valid story name pattern"));

const SKILL_FIELDS: [&str; 5] = ["skill0", "skill1", "skill2", "skill3", "skill4"];

/// Attack type label shown in the game
pub fn attack_type_label(code: i32) -> &'static str {
    match code {
        0 => "물리",
        1 => "마법",
        2 => "혼합",
        3 => "카오스",
        6 => "트리니티",
        _ => "없음",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skill {
    pub slot: u8,
    pub id: i32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRaw {
    pub damage: i32,
    pub damage_up: i32,
    pub damage_click: i32,
    pub damage_click_up: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRawG {
    pub damage_g: i32,
    pub damage_up_g: i32,
    pub damage_click_g: i32,
    pub damage_click_up_g: i32,
}

/// Display-scale stats as listed in the community spreadsheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SheetStats {
    /// `None` when the cooldown is zero
    pub base_dps: Option<f64>,
    pub attack_cooldown: f64,
    pub growth_dps: Option<f64>,
    pub base_click_damage: f64,
    pub base_damage: f64,
    pub growth_click_damage: f64,
    pub growth_damage: f64,
}

impl SheetStats {
    fn new(raw: &DamageRaw, cooldown: f64) -> Self {
        let base_damage = round_to(f64::from(raw.damage) * DAMAGE_SCALE, 1);
        let growth_damage = round_to(f64::from(raw.damage_up) * DAMAGE_SCALE, 1);
        let dps = |damage: f64| (cooldown != 0.0).then(|| round_to(damage / cooldown, 1));

        Self {
            base_dps: dps(base_damage),
            attack_cooldown: cooldown,
            growth_dps: dps(growth_damage),
            base_click_damage: round_to(f64::from(raw.damage_click) * CLICK_SCALE, 1),
            base_damage,
            growth_click_damage: round_to(f64::from(raw.damage_click_up) * CLICK_SCALE, 1),
            growth_damage,
        }
    }
}

/// Type codes with their localized labels
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreatureTypes {
    pub race_top_code: i32,
    pub race_top: String,
    pub race_code: i32,
    pub race: String,
    pub location_code: i32,
    pub location: String,
    pub gender_code: i32,
    pub gender: String,
    pub house_code: i32,
    pub house: String,
    pub religion_code: i32,
    pub religion: String,
    pub individuality_code: i32,
    pub individuality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Creature {
    pub hero_id: i32,
    pub name: String,
    pub grade: String,
    pub subtitle: String,
    pub subtitle_grade: String,
    pub story: String,
    pub model: i32,
    pub rank: i32,
    #[serde(rename = "attackType")]
    pub attack_type: i32,
    #[serde(rename = "attackType_kr")]
    pub attack_type_kr: String,
    #[serde(rename = "canG")]
    pub can_g: bool,
    #[serde(rename = "canAwaken")]
    pub can_awaken: bool,
    pub skills: Vec<Skill>,
    pub damage_raw: DamageRaw,
    #[serde(rename = "damageG_raw")]
    pub damage_g_raw: DamageRawG,
    #[serde(rename = "attackCooldown")]
    pub attack_cooldown: f64,
    #[serde(rename = "attackCooldownG")]
    pub attack_cooldown_g: f64,
    pub sheet_stats: SheetStats,
    #[serde(rename = "exclusiveIDs")]
    pub exclusive_ids: [i32; 3],
    #[serde(rename = "effectAttack")]
    pub effect_attack: i32,
    #[serde(rename = "requireOrb")]
    pub require_orb: i32,
    #[serde(rename = "requireParticle")]
    pub require_particle: i32,
    pub types: CreatureTypes,
    /// Equipment names for `exclusive_ids`, filled by enrichment
    pub exclusive_names: Vec<String>,
}

/// Name taken from the start of a story, for heroes without an `hn` key
fn name_from_story(story: &str) -> Option<String> {
    STORY_NAME
        .captures(story)
        .map(|caps| caps[1].trim().to_string())
}

/// Cooldown shown with two decimals; non-positive means none
fn display_cooldown(raw: f64) -> f64 {
    if raw > 0.0 {
        round_to(raw, 2)
    } else {
        0.0
    }
}

pub fn extract(data: &[u8], table: &TableLayout, loc: &Localization) -> Result<Vec<Creature>> {
    let reader = TableReader::new(data, table);

    let index = reader.int32("index")?;
    let model = reader.int32("model")?;
    let rank = reader.rank("rank")?;
    let attack_type = reader.int32("attackType")?;
    let can_g = reader.bool("canG")?;
    let can_awaken = reader.bool("canAwaken")?;
    let skills = SKILL_FIELDS
        .iter()
        .map(|name| reader.int32(name))
        .collect::<Result<Vec<_>>>()?;
    let damage_up = reader.int32("damageUp")?;
    let damage = reader.int32("damage")?;
    let damage_click_up = reader.int32("damageClickUp")?;
    let damage_click = reader.int32("damageClick")?;
    let cooldown = reader.float32("attackCooldown")?;
    let damage_up_g = reader.int32("damageUpG")?;
    let damage_g = reader.int32("damageG")?;
    let damage_click_up_g = reader.int32("damageClickUpG")?;
    let damage_click_g = reader.int32("damageClickG")?;
    let cooldown_g = reader.float32("attackCooldownG")?;
    let exclusive = [
        reader.int32("exclusiveID0")?,
        reader.int32("exclusiveID1")?,
        reader.int32("exclusiveID2")?,
    ];
    let effect_attack = reader.int32("effectAttack")?;
    let require_orb = reader.int32("requireOrb")?;
    let require_particle = reader.int32("requireParticle")?;
    let race_top = reader.int32("typeRaceTop")?;
    let race = reader.int32("typeRace")?;
    let location = reader.int32("typeLocation")?;
    let gender = reader.int32("typeGender")?;
    let individuality = reader.int32("typeIndividuality")?;
    let house = reader.int32("typeHouse")?;
    let religion = reader.int32("typeReligion")?;

    let grades = reader.grades("rank", "attackType")?;
    let text = |key: String| loc.text_or_empty(&key);

    let creatures: Vec<Creature> = (0..reader.rows())
        .map(|i| {
            let hero_id = index.at(i);
            let story = text(format!("hs{hero_id}"));
            let mut name = text(format!("hn{hero_id}"));
            if name.is_empty() {
                name = name_from_story(&story).unwrap_or_default();
            }

            let skills = skills
                .iter()
                .zip(1u8..)
                .map(|(column, slot)| {
                    let id = column.at(i);
                    Skill {
                        slot,
                        id,
                        name: text(format!("sn{id}")),
                        description: text(format!("ss{id}")),
                    }
                })
                .collect();

            let damage_raw = DamageRaw {
                damage: damage.at(i),
                damage_up: damage_up.at(i),
                damage_click: damage_click.at(i),
                damage_click_up: damage_click_up.at(i),
            };
            let attack_cooldown = display_cooldown(cooldown.at(i));

            let code = |column: &super::Column<i32>| column.at(i);
            let types = CreatureTypes {
                race_top_code: code(&race_top),
                race_top: text(format!("RaceTop{}", code(&race_top))),
                race_code: code(&race),
                race: text(format!("Race{}", code(&race))),
                location_code: code(&location),
                location: text(format!("Location{}", code(&location))),
                gender_code: code(&gender),
                gender: text(format!("Gender{}", code(&gender))),
                house_code: code(&house),
                house: text(format!("House{}", code(&house))),
                religion_code: code(&religion),
                religion: text(format!("Religion{}", code(&religion))),
                individuality_code: code(&individuality),
                individuality: text(format!("Individuality{}", code(&individuality))),
            };

            Creature {
                hero_id,
                name,
                grade: grades[i].clone(),
                subtitle: text(format!("hc{hero_id}")),
                subtitle_grade: text(format!("hcg{hero_id}")),
                story,
                model: model.at(i),
                rank: rank.at(i),
                attack_type: attack_type.at(i),
                attack_type_kr: attack_type_label(attack_type.at(i)).to_string(),
                can_g: can_g.at(i),
                can_awaken: can_awaken.at(i),
                skills,
                sheet_stats: SheetStats::new(&damage_raw, attack_cooldown),
                damage_raw,
                damage_g_raw: DamageRawG {
                    damage_g: damage_g.at(i),
                    damage_up_g: damage_up_g.at(i),
                    damage_click_g: damage_click_g.at(i),
                    damage_click_up_g: damage_click_up_g.at(i),
                },
                attack_cooldown,
                attack_cooldown_g: round6(cooldown_g.at(i)),
                exclusive_ids: exclusive.each_ref().map(|column| column.at(i)),
                effect_attack: effect_attack.at(i),
                require_orb: require_orb.at(i),
                require_particle: require_particle.at(i),
                types,
                exclusive_names: Vec::new(),
            }
        })
        .collect();

    info!(table = table.name, rows = creatures.len(), "Extracted creatures");
    Ok(creatures)
}
