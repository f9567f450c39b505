//! kvconf - named key-value configuration stores
//!
//! Heterogeneous, optionally frozen config stores with type-checked
//! accessors, JSON import/export, a name registry, and validation of
//! mandatory fields for specialized configs.

pub mod cli;
pub mod config;
pub mod error;
pub mod registry;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigBuilder, FieldRequirement, LoginConfig};
pub use error::{KvconfError, Result};
pub use registry::ConfigRegistry;
pub use store::{Value, ValueStore, ValueType};
