//! Config value store module
//!
//! This module provides the named key-value container at the heart of
//! kvconf, its value model, and the JSON structural conversion used for
//! import and export.

pub mod convert;
pub mod value;
pub mod value_store;

pub use value::{FromValue, Value, ValueType};
pub use value_store::{split_envelope, PreviousValues, ValueStore};
