//! CLI command implementations

pub mod compare;
pub mod json_output;
pub mod params;
pub mod process;
