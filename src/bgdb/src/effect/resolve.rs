//! Effect code → description resolution

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::calibration::{Calibration, PremiumEffect};
use super::format::{format_value, ValueFormat};
use super::policy::{Policy, PolicyKind};
use crate::localization::Localization;
use crate::round6;

/// `{0}`-style placeholders and the whitespace before them
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\{[0-9]\}").expect("valid placeholder pattern"));

/// Type code of a premium artifact's main effect line
pub const PREMIUM_MAIN_CODE: i32 = -1;

/// Type code of a premium artifact's secondary effect line
pub const PREMIUM_SUB_CODE: i32 = -3;

/// One resolved effect
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectDescriptor {
    pub type_code: i32,
    pub type_name: String,
    pub value: f64,
    pub value_display: String,
    pub description: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_sub: bool,
}

impl EffectDescriptor {
    /// Build from a hand-verified premium effect line
    pub fn premium(effect: &PremiumEffect) -> Self {
        let type_name = effect
            .description
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_string();
        Self {
            type_code: if effect.is_sub {
                PREMIUM_SUB_CODE
            } else {
                PREMIUM_MAIN_CODE
            },
            type_name,
            value: 0.0,
            value_display: effect.value_display.clone(),
            description: effect.description.clone(),
            is_sub: effect.is_sub,
        }
    }
}

/// Name, format and scale chosen for an equipment main effect
#[derive(Debug, Clone, PartialEq)]
pub struct MainEffect {
    pub name: String,
    pub format: ValueFormat,
    pub display_ratio: f64,
}

impl MainEffect {
    /// `"name value"`, or `""` when either part is empty
    pub fn line(&self, display_value: f64) -> String {
        let value = format_value(display_value, self.format);
        if self.name.is_empty() || value.is_empty() {
            String::new()
        } else {
            format!("{} {}", self.name, value)
        }
    }
}

/// Substitute `value` into a template
///
/// Returns `(clean name, description)`. Templates without `{0}` get the value
/// appended.
pub fn describe(template: &str, value: &str) -> (String, String) {
    if template.contains("{0}") {
        let description = template
            .replace("{0}", value)
            .replace("{1}", "")
            .trim()
            .to_string();
        let name = PLACEHOLDER.replace_all(template, "").trim().to_string();
        (name, description)
    } else if value.is_empty() {
        (template.to_string(), template.to_string())
    } else {
        let description = format!("{template} {value}").trim().to_string();
        (template.to_string(), description)
    }
}

fn single_line(text: &str) -> String {
    text.replace('\n', " ").replace('\r', "")
}

/// Resolves `(code, value)` pairs against calibration and localization
///
/// Stateless: the same inputs always give the same descriptors.
#[derive(Debug, Clone, Copy)]
pub struct EffectResolver<'a> {
    calibration: &'a Calibration,
    localization: &'a Localization,
}

impl<'a> EffectResolver<'a> {
    pub fn new(calibration: &'a Calibration, localization: &'a Localization) -> Self {
        Self {
            calibration,
            localization,
        }
    }

    pub fn calibration(&self) -> &'a Calibration {
        self.calibration
    }

    pub fn localization(&self) -> &'a Localization {
        self.localization
    }

    /// Resolve parallel code/value lists; `(0, 0.0)` slots are skipped
    pub fn resolve(&self, policy: &Policy, codes: &[i32], values: &[f64]) -> Vec<EffectDescriptor> {
        codes
            .iter()
            .zip(values)
            .filter_map(|(&code, &value)| self.resolve_one(policy, code, value))
            .collect()
    }

    /// Resolve one slot, `None` for the empty sentinel
    pub fn resolve_one(&self, policy: &Policy, code: i32, value: f64) -> Option<EffectDescriptor> {
        if code == 0 && value == 0.0 {
            return None;
        }

        let mut value = policy.rescaled(code, value);
        let (template, format) = match self.calibration.main_type(code) {
            Some(entry) => {
                if policy.apply_display_ratio {
                    value *= entry.display_ratio;
                }
                (entry.name.clone(), entry.format)
            }
            None => {
                let template = self.uncalibrated_name(policy, code);
                let format = policy.infer_format(self.calibration, &template, value);
                (template, format)
            }
        };

        let value_display = format_value(value, format);
        let (type_name, description) = describe(&template, &value_display);
        Some(EffectDescriptor {
            type_code: code,
            type_name,
            value: round6(value),
            value_display,
            description,
            is_sub: false,
        })
    }

    /// Name for a code missing from the calibrated table
    fn uncalibrated_name(&self, policy: &Policy, code: i32) -> String {
        let primary = match policy.kind {
            PolicyKind::Artifact => self.calibration.artifact_name(code).map(str::to_string),
            PolicyKind::General | PolicyKind::Equipment => {
                self.localization.text(&format!("sec{code}"))
            }
        };

        primary
            .filter(|name| !name.is_empty())
            .or_else(|| self.calibration.sec_template(code).map(str::to_string))
            .map(|name| single_line(&name))
            .unwrap_or_else(|| policy.placeholder(code))
    }

    /// Name, format and display ratio for an equipment main type
    pub fn main_effect(&self, code: i32) -> MainEffect {
        match self.calibration.main_type(code) {
            Some(entry) => MainEffect {
                name: entry.name.clone(),
                format: entry.format,
                display_ratio: entry.display_ratio,
            },
            None => MainEffect {
                name: self.uncalibrated_name(&Policy::EQUIPMENT, code),
                format: ValueFormat::Raw,
                display_ratio: 1.0,
            },
        }
    }
}
