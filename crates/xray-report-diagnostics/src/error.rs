//! Report conversion error types

use crate::{
    ErrorCode, SourceLocation, XRP0001, XRP0002, XRP0003, XRP0101, XRP0102, XRP0103, XRP0401,
    XRP0404,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A diagnostic message with location and context
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Source location
    pub location: Option<SourceLocation>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            location: None,
            help: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set help text
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Render the diagnostic with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self) -> String {
        use colored::Colorize;

        let mut out = format!("{}[{}]: {}", "error".red().bold(), self.code, self.message);
        if let Some(loc) = &self.location {
            out.push_str(&format!(" at {}", loc.to_string().cyan()));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {}", "help:".green(), help));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {} - {}", self.code, self.message)?;
        if let Some(loc) = &self.location {
            write!(f, " at {}", loc)?;
        }
        Ok(())
    }
}

/// Main report conversion error type
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    /// Source report file does not exist
    #[error("{}: input file not found: {}", XRP0404, .path.display())]
    InputNotFound { path: PathBuf },

    /// The expected root marker is absent from the XML input
    #[error("{}: no {marker} element found in the XML file", XRP0001)]
    MissingRootElement { marker: String },

    /// The XML input is not well-formed
    #[error("{}: {message}", XRP0002)]
    XmlSyntax {
        message: String,
        location: Option<SourceLocation>,
    },

    /// A CSV record could not be read
    #[error("{}: {message}", XRP0003)]
    Csv { message: String, row: Option<usize> },

    /// A required CSV column is absent from the header
    #[error("{}: missing required column '{column}'", XRP0101)]
    MissingColumn { column: String },

    /// A numeric field did not hold a number
    #[error("{}: field '{field}' is not a valid number: '{value}'", XRP0102)]
    MalformedNumber {
        field: String,
        value: String,
        row: Option<usize>,
    },

    /// A required XML attribute is absent
    #[error("{}: <{element}> is missing required attribute '{attribute}'", XRP0103)]
    MissingAttribute { element: String, attribute: String },

    /// Reading or writing a file failed
    #[error("{}: {message}", XRP0401)]
    Io { message: String },
}

impl ConvertError {
    /// Create an input-not-found error
    pub fn input_not_found(path: impl Into<PathBuf>) -> Self {
        Self::InputNotFound { path: path.into() }
    }

    /// Create a missing-root-element error
    pub fn missing_root(marker: impl Into<String>) -> Self {
        Self::MissingRootElement {
            marker: marker.into(),
        }
    }

    /// Create an XML syntax error with location
    pub fn xml_syntax_at(message: impl Into<String>, location: SourceLocation) -> Self {
        Self::XmlSyntax {
            message: message.into(),
            location: Some(location),
        }
    }

    /// Create a missing-column error
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create a malformed-number error
    pub fn malformed_number(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::MalformedNumber {
            field: field.into(),
            value: value.into(),
            row: None,
        }
    }

    /// Create a missing-attribute error
    pub fn missing_attribute(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Attach a 1-based data row number to row-scoped errors
    pub fn at_row(self, row: usize) -> Self {
        match self {
            Self::MalformedNumber { field, value, .. } => Self::MalformedNumber {
                field,
                value,
                row: Some(row),
            },
            Self::Csv { message, .. } => Self::Csv {
                message,
                row: Some(row),
            },
            other => other,
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InputNotFound { .. } => XRP0404,
            Self::MissingRootElement { .. } => XRP0001,
            Self::XmlSyntax { .. } => XRP0002,
            Self::Csv { .. } => XRP0003,
            Self::MissingColumn { .. } => XRP0101,
            Self::MalformedNumber { .. } => XRP0102,
            Self::MissingAttribute { .. } => XRP0103,
            Self::Io { .. } => XRP0401,
        }
    }

    /// Get the location if available
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Self::XmlSyntax { location, .. } => location.as_ref(),
            _ => None,
        }
    }

    /// Convert to a diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic {
        let message = match self {
            Self::InputNotFound { path } => format!("input file not found: {}", path.display()),
            Self::MissingRootElement { marker } => {
                format!("no {marker} element found in the XML file")
            }
            Self::XmlSyntax { message, .. } | Self::Io { message } => message.clone(),
            Self::Csv { message, row } => match row {
                Some(row) => format!("{message} (row {row})"),
                None => message.clone(),
            },
            Self::MissingColumn { column } => format!("missing required column '{column}'"),
            Self::MalformedNumber { field, value, row } => match row {
                Some(row) => format!("field '{field}' is not a valid number: '{value}' (row {row})"),
                None => format!("field '{field}' is not a valid number: '{value}'"),
            },
            Self::MissingAttribute { element, attribute } => {
                format!("<{element}> is missing required attribute '{attribute}'")
            }
        };

        let code = self.code();
        let mut diag = Diagnostic::error(code, message);
        if let Some(loc) = self.location() {
            diag = diag.with_location(loc.clone());
        }
        if let Some(help) = code.info().help {
            diag = diag.with_help(help);
        }
        diag
    }
}

impl From<std::io::Error> for ConvertError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ConvertError::missing_root("<testsuites>").code(), XRP0001);
        assert_eq!(ConvertError::missing_column("failedCount").code(), XRP0101);
        assert_eq!(ConvertError::input_not_found("a.csv").code(), XRP0404);
    }

    #[test]
    fn test_error_display_carries_code() {
        let err = ConvertError::malformed_number("failedCount", "two");
        assert_eq!(
            err.to_string(),
            "XRP0102: field 'failedCount' is not a valid number: 'two'"
        );
    }

    #[test]
    fn test_at_row_only_touches_row_scoped_errors() {
        let err = ConvertError::malformed_number("totalAssertions", "x").at_row(3);
        assert!(matches!(err, ConvertError::MalformedNumber { row: Some(3), .. }));

        let err = ConvertError::missing_column("executed").at_row(3);
        assert!(matches!(err, ConvertError::MissingColumn { .. }));
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = ConvertError::xml_syntax_at("unexpected end", SourceLocation::new(4, 2, 31))
            .to_diagnostic();

        assert!(diag.to_string().contains("XRP0002"));
        assert!(diag.to_string().contains("4:2"));
    }

    #[test]
    fn test_diagnostic_picks_up_help() {
        let diag = ConvertError::missing_column("requestName").to_diagnostic();
        assert!(diag.help.is_some());
        assert!(diag.to_string().starts_with("error: XRP0101"));
    }
}
