pub mod config;
pub mod drafts;
pub mod error;
pub mod pipeline;
pub mod telemetry;
