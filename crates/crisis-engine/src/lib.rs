pub mod community;
pub mod config;
pub mod coordination;
pub mod error;
pub mod telemetry;
pub mod triage;
