//! Mercenary view keyed the way the community spreadsheet is

use std::collections::BTreeMap;

use serde::Serialize;

use super::creature::{CLICK_SCALE, DAMAGE_SCALE};
use super::Creature;

const NONE_LABEL: &str = "없음";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meta {
    pub record_rule: String,
    pub grade_normalization: BTreeMap<String, String>,
    pub damage_scaling: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MercenarySkill {
    pub slot: u8,
    #[serde(rename = "이름")]
    pub name: String,
    #[serde(rename = "설명")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MercenaryRecord {
    #[serde(rename = "이름")]
    pub name: String,
    #[serde(rename = "등급")]
    pub grade: String,
    #[serde(rename = "부제")]
    pub subtitle: String,
    #[serde(rename = "스킬")]
    pub skills: Vec<MercenarySkill>,
    #[serde(rename = "종족")]
    pub race: String,
    #[serde(rename = "가문")]
    pub house: String,
    #[serde(rename = "지역")]
    pub location: String,
    #[serde(rename = "성별")]
    pub gender: String,
    #[serde(rename = "종교")]
    pub religion: String,
    #[serde(rename = "개성")]
    pub individuality: String,
    #[serde(rename = "데미지타입")]
    pub damage_type: String,
    #[serde(rename = "기본 DPS")]
    pub base_dps: Option<f64>,
    #[serde(rename = "공격 쿨다운")]
    pub attack_cooldown: f64,
    #[serde(rename = "성장 DPS")]
    pub growth_dps: Option<f64>,
    #[serde(rename = "기본 클릭 데미지")]
    pub base_click_damage: f64,
    #[serde(rename = "기본 데미지")]
    pub base_damage: f64,
    #[serde(rename = "성장 클릭 데미지")]
    pub growth_click_damage: f64,
    #[serde(rename = "성장 데미지")]
    pub growth_damage: f64,
    pub hero_id: i32,
    pub model_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MercenariesByGrade {
    pub meta: Meta,
    pub records: Vec<MercenaryRecord>,
}

fn or_none(label: &str) -> String {
    if label.is_empty() {
        NONE_LABEL.to_string()
    } else {
        label.to_string()
    }
}

impl From<&Creature> for MercenaryRecord {
    fn from(c: &Creature) -> Self {
        let stats = &c.sheet_stats;
        Self {
            name: if c.name.is_empty() {
                "UNKNOWN".to_string()
            } else {
                c.name.clone()
            },
            grade: c.grade.clone(),
            subtitle: c.subtitle.clone(),
            skills: c
                .skills
                .iter()
                .map(|skill| MercenarySkill {
                    slot: skill.slot,
                    name: or_none(&skill.name),
                    description: skill.description.clone(),
                })
                .collect(),
            race: or_none(&c.types.race),
            house: or_none(&c.types.house),
            location: or_none(&c.types.location),
            gender: or_none(&c.types.gender),
            religion: or_none(&c.types.religion),
            individuality: or_none(&c.types.individuality),
            damage_type: or_none(&c.attack_type_kr),
            base_dps: stats.base_dps,
            attack_cooldown: stats.attack_cooldown,
            growth_dps: stats.growth_dps,
            base_click_damage: stats.base_click_damage,
            base_damage: stats.base_damage,
            growth_click_damage: stats.growth_click_damage,
            growth_damage: stats.growth_damage,
            hero_id: c.hero_id,
            model_id: c.model,
        }
    }
}

/// One record per creature; same-named creatures of different grades stay separate
pub fn build(creatures: &[Creature]) -> MercenariesByGrade {
    let records: Vec<MercenaryRecord> = creatures.iter().map(MercenaryRecord::from).collect();

    MercenariesByGrade {
        meta: Meta {
            record_rule: "같은 이름이라도 등급별 독립 객체".to_string(),
            grade_normalization: BTreeMap::from([("Z".to_string(), "H".to_string())]),
            damage_scaling: format!(
                "base/growth_damage = raw*{DAMAGE_SCALE:?}, click = raw*{CLICK_SCALE:?}"
            ),
            count: records.len(),
        },
        records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::testing::sample_creature;
    use crate::tables::Skill;

    #[test]
    fn test_build_by_grade() {
        let mut jerry = sample_creature(96, "제리");
        jerry.subtitle = "칼라무쉬 백정".to_string();
        jerry.types.race = "인간".to_string();
        jerry.sheet_stats.base_damage = 40.0;
        jerry.sheet_stats.base_dps = Some(20.0);
        jerry.skills = vec![
            Skill {
                slot: 1,
                id: 7,
                name: "발목 공격".to_string(),
                description: "적의 발목을 노린다".to_string(),
            },
            Skill {
                slot: 2,
                id: 0,
                name: String::new(),
                description: String::new(),
            },
        ];
        let mut nameless = sample_creature(97, "");
        nameless.attack_type_kr = String::new();

        let view = build(&[jerry, nameless]);
        assert_eq!(view.meta.count, 2);
        assert_eq!(
            view.meta.damage_scaling,
            "base/growth_damage = raw*4.0, click = raw*0.7"
        );

        let first = &view.records[0];
        assert_eq!(first.name, "제리");
        assert_eq!(first.race, "인간");
        assert_eq!(first.house, "없음");
        assert_eq!(first.skills[1].name, "없음");
        assert_eq!(first.model_id, 1096);

        let second = &view.records[1];
        assert_eq!(second.name, "UNKNOWN");
        assert_eq!(second.damage_type, "없음");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["meta"]["grade_normalization"]["Z"], "H");
        assert_eq!(json["meta"]["record_rule"], "같은 이름이라도 등급별 독립 객체");
        let record = &json["records"][0];
        assert_eq!(record["이름"], "제리");
        assert_eq!(record["부제"], "칼라무쉬 백정");
        assert_eq!(record["스킬"][0]["이름"], "발목 공격");
        assert_eq!(record["기본 DPS"], 20.0);
        assert_eq!(record["기본 데미지"], 40.0);
        assert!(json["records"][1]["성장 DPS"].is_null());
        assert_eq!(record["hero_id"], 96);
    }
}
