//! Utility modules shared by the export stages.

pub mod exec;
pub mod path;
pub mod plural;
