//! Effect value display formatting

use std::fmt;

use serde::{Deserialize, Serialize};

/// How an effect value is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueFormat {
    /// `v * 100` with a `%` suffix
    #[serde(rename = "pct")]
    Percent,
    /// Plain decimal (multipliers)
    #[serde(rename = "raw")]
    Raw,
    /// Whole number (counts)
    #[serde(rename = "int")]
    Integer,
    /// Signed flat amount, `+240` or `+2.5`
    #[serde(rename = "abs")]
    Absolute,
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Percent => "pct",
            Self::Raw => "raw",
            Self::Integer => "int",
            Self::Absolute => "abs",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for ValueFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pct" => Ok(Self::Percent),
            "raw" => Ok(Self::Raw),
            "int" => Ok(Self::Integer),
            "abs" => Ok(Self::Absolute),
            other => Err(format!("unknown value format '{other}'")),
        }
    }
}

/// Tolerance for treating a scaled value as whole
const WHOLE_EPSILON: f64 = 0.01;

/// Format a value for display; zero renders as `""`
///
/// ```
/// use bgdb::effect::format_value;
/// use bgdb::ValueFormat;
///
/// assert_eq!(format_value(0.125, ValueFormat::Percent), "12.5%");
/// assert_eq!(format_value(0.05, ValueFormat::Raw), "0.05");
/// assert_eq!(format_value(2.5, ValueFormat::Integer), "2");
/// ```
pub fn format_value(value: f64, format: ValueFormat) -> String {
    if value == 0.0 {
        return String::new();
    }

    match format {
        ValueFormat::Percent => {
            let pct = value * 100.0;
            if (pct - pct.round_ties_even()).abs() < WHOLE_EPSILON {
                format!("{}%", pct.round_ties_even() as i64)
            } else if (pct * 10.0 - (pct * 10.0).round_ties_even()).abs() < WHOLE_EPSILON {
                format!("{pct:.1}%")
            } else {
                format!("{pct:.2}%")
            }
        }
        ValueFormat::Integer => (value.round_ties_even() as i64).to_string(),
        ValueFormat::Absolute => {
            if value == value.trunc() {
                format!("+{}", value as i64)
            } else {
                format!("+{value:.1}")
            }
        }
        ValueFormat::Raw => {
            if value == value.trunc() && value.abs() >= 1.0 {
                (value as i64).to_string()
            } else {
                let fixed = format!("{value:.6}");
                fixed.trim_end_matches('0').trim_end_matches('.').to_string()
            }
        }
    }
}
