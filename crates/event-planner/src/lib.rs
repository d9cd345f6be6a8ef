//! Strategic event planning artifacts built on a shared multi-criteria
//! scoring and classification engine.

pub mod config;
pub mod engine;
pub mod envelope;
pub mod error;
pub mod import;
pub mod planning;
pub mod store;
pub mod telemetry;

pub use error::AppError;
