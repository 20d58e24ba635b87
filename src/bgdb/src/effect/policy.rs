//! Per-table correction policies
//!
//! All tables share the formatter; they differ in where effect names come
//! from, how a format is picked for uncalibrated names, and whether values
//! are rescaled first.

use super::calibration::Calibration;
use super::format::ValueFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    /// Items: localized `sec{code}` templates, keyword-inferred format
    General,
    /// Equipment: display ratio applied, uncalibrated codes shown raw
    Equipment,
    /// Artifacts: artifact code names, name-table and keyword format
    Artifact,
}

/// Correction policy supplied to the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    pub kind: PolicyKind,
    /// Multiply values by the calibrated display ratio
    pub apply_display_ratio: bool,
    /// Codes stored at a different scale: `(code, factor)`
    pub rescale: &'static [(i32, f64)],
}

impl Policy {
    pub const GENERAL: Policy = Policy {
        kind: PolicyKind::General,
        apply_display_ratio: false,
        rescale: &[],
    };

    pub const EQUIPMENT: Policy = Policy {
        kind: PolicyKind::Equipment,
        apply_display_ratio: true,
        rescale: &[],
    };

    /// Code 90 is stored at 1/1000 of code 0's damage scale
    pub const ARTIFACT: Policy = Policy {
        kind: PolicyKind::Artifact,
        apply_display_ratio: false,
        rescale: &[(90, 1000.0)],
    };

    /// Value after the policy's fixed rescale
    pub fn rescaled(&self, code: i32, value: f64) -> f64 {
        self.rescale
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(value, |(_, factor)| value * factor)
    }

    /// Placeholder name for a code nothing maps
    pub fn placeholder(&self, code: i32) -> String {
        match self.kind {
            PolicyKind::Artifact => format!("코드 {code}"),
            PolicyKind::General | PolicyKind::Equipment => format!("효과{code}"),
        }
    }

    /// Format for a name that has no calibrated code
    pub fn infer_format(&self, calibration: &Calibration, name: &str, value: f64) -> ValueFormat {
        match self.kind {
            PolicyKind::General => infer_general(name, value),
            PolicyKind::Equipment => ValueFormat::Raw,
            PolicyKind::Artifact => infer_artifact(calibration, name),
        }
    }
}

const GENERAL_PERCENT_KEYWORDS: &[&str] = &["확률", "속도", "데미지", "감소", "증폭"];

const ARTIFACT_PERCENT_KEYWORDS: &[&str] = &[
    "확률", "속도", "데미지", "감소", "증폭", "획득", "저장", "증가", "추클뎀", "중첩", "관통", "체감",
];

fn contains_any(name: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| name.contains(k))
}

/// Keyword sniffing for localized templates
///
/// Multipliers (`배수`) are raw; large damage values are counts; rate-like
/// words are percentages.
pub fn infer_general(name: &str, value: f64) -> ValueFormat {
    if name.contains("배수") {
        ValueFormat::Raw
    } else if name.contains("데미지") && value.abs() >= 100.0 {
        ValueFormat::Integer
    } else if contains_any(name, GENERAL_PERCENT_KEYWORDS) {
        ValueFormat::Percent
    } else {
        ValueFormat::Raw
    }
}

/// Strip one leading `[...]` or `(...)` tag such as `[세트] ` or `(아티 장착시) `
fn strip_leading_tag(name: &str) -> &str {
    let Some(open) = name.chars().next().filter(|c| matches!(c, '[' | '(')) else {
        return name;
    };
    let rest = &name[open.len_utf8()..];
    match rest.find([']', ')']) {
        Some(close) => rest[close + 1..].trim_start(),
        None => name,
    }
}

/// Name-table lookup, then keyword sniffing for artifact effect names
pub fn infer_artifact(calibration: &Calibration, name: &str) -> ValueFormat {
    if let Some(format) = calibration.name_format(name) {
        return format;
    }
    if let Some(format) = calibration.name_format(strip_leading_tag(name)) {
        return format;
    }
    if name.contains("배수") && !name.contains("증폭") {
        ValueFormat::Raw
    } else if name.contains("성장") {
        ValueFormat::Raw
    } else if name.contains("레벨") {
        ValueFormat::Integer
    } else if contains_any(name, ARTIFACT_PERCENT_KEYWORDS) {
        ValueFormat::Percent
    } else {
        ValueFormat::Raw
    }
}
