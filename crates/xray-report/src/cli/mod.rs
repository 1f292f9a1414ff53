//! CLI functionality for the report converter
//!
//! This module contains all CLI-related functionality including:
//! - Conversion commands
//! - Output formatting

#[cfg(feature = "cli")]
pub mod convert;
#[cfg(feature = "cli")]
pub mod output;
