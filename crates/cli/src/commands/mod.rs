//! CLI command implementations

pub mod courses;
pub mod filter;
pub mod predict;
pub mod status;
