pub mod community;
pub mod config;
pub mod error;
pub mod registration;
pub mod telemetry;
pub mod voting;
