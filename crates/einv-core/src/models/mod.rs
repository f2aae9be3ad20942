//! Configuration and report models.

pub mod config;
pub mod report;
