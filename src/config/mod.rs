//! Specialized configuration module
//!
//! This module provides the generic recipe for building named configs with
//! mandatory fields, and the configs built on it.

pub mod login;
pub mod required;

pub use login::*;
pub use required::*;
