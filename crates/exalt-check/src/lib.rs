pub mod config;
pub mod error;
pub mod requirements;
pub mod telemetry;
