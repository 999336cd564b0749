//! Application layer: services and use cases
//!
//! This layer orchestrates domain logic and owns dataset loading.

pub mod dataset;
pub mod error;
pub mod services;

pub use dataset::{load_dataset, parse_dataset};
pub use error::{ApplicationError, ApplicationResult};
