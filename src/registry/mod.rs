//! Named config registry module
//!
//! This module provides the registry that maps config names to shared
//! [`ValueStore`](crate::store::ValueStore) instances.

pub mod manager;

pub use manager::*;
