//! Error module orchestrator following the crate module convention.

mod types;

pub use types::{GridError, Result};
