//! Report conversion diagnostics and error handling
//!
//! This crate provides the error handling infrastructure shared by the report
//! readers, transformers and serializer, including error codes, source
//! locations, and diagnostic reporting.

mod error;
mod error_code;
mod span;

pub use error::*;
pub use error_code::*;
pub use span::*;

/// Result type for report conversion
pub type Result<T> = std::result::Result<T, ConvertError>;
