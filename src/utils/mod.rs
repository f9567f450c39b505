//! Utility functions module
//!
//! This module contains output formatting helpers for the command-line tool.

pub mod format;

pub use format::*;
