//! Effect resolution
//!
//! Items, equipment and artifacts store effects as `(type code, value)`
//! pairs. Resolution turns a pair into a display name, a formatted value and
//! a description. The calibrated table wins when it knows a code; otherwise
//! the table's [`Policy`] decides where the name comes from and how the value
//! is formatted.

mod calibration;
mod format;
mod policy;
mod resolve;

pub use calibration::{
    Calibration, CommanderName, MainTypeEntry, PremiumEffect, DAMAGE_ENHANCEMENT,
    DEFAULT_ENHANCEMENT,
};
pub use format::{format_value, ValueFormat};
pub use policy::{infer_artifact, infer_general, Policy, PolicyKind};
pub use resolve::{
    describe, EffectDescriptor, EffectResolver, MainEffect, PREMIUM_MAIN_CODE, PREMIUM_SUB_CODE,
};
