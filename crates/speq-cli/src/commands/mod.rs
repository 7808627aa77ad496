//! Subcommand implementations.

pub mod analyze;
pub mod common;
pub mod params;
pub mod response;
pub mod state;
