//! Job application tracking: per-user job records, filtered listings, and statistics.

pub mod config;
pub mod error;
pub mod jobs;
pub mod telemetry;
