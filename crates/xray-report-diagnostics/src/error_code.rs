//! Report conversion error codes following a structured numbering system
//!
//! Error code ranges:
//! - XRP0001-XRP0099: Input errors (markers, XML syntax, CSV structure)
//! - XRP0100-XRP0199: Schema errors (columns, attributes, numbers)
//! - XRP0400-XRP0499: System errors (I/O, missing files)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Check if this is an input error (0001-0099)
    pub const fn is_input_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    /// Check if this is a schema error (0100-0199)
    pub const fn is_schema_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    /// Check if this is a system error (0400-0499)
    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XRP{:04}", self.0)
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Detailed help text
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Input errors (0001-0099)
    map.insert(
        1,
        ErrorInfo::new("Missing root element")
            .with_help("The report must contain a <testsuites> element"),
    );
    map.insert(2, ErrorInfo::new("Malformed XML"));
    map.insert(3, ErrorInfo::new("Malformed CSV record"));

    // Schema errors (0100-0199)
    map.insert(
        101,
        ErrorInfo::new("Missing CSV column").with_help(
            "Required columns: requestName, executed, failed, totalAssertions, failedCount",
        ),
    );
    map.insert(102, ErrorInfo::new("Malformed number"));
    map.insert(103, ErrorInfo::new("Missing required attribute"));

    // System errors (0400-0499)
    map.insert(401, ErrorInfo::new("I/O error"));
    map.insert(404, ErrorInfo::new("Input file not found"));

    map
});

// Input errors
pub const XRP0001: ErrorCode = ErrorCode::new(1);
pub const XRP0002: ErrorCode = ErrorCode::new(2);
pub const XRP0003: ErrorCode = ErrorCode::new(3);

// Schema errors
pub const XRP0101: ErrorCode = ErrorCode::new(101);
pub const XRP0102: ErrorCode = ErrorCode::new(102);
pub const XRP0103: ErrorCode = ErrorCode::new(103);

// System errors
pub const XRP0401: ErrorCode = ErrorCode::new(401);
pub const XRP0404: ErrorCode = ErrorCode::new(404);
