//! Command handlers for the bgdb CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod configure;
pub mod extract;
pub mod inspect;
