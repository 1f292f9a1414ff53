//! Conversion configuration
//!
//! File names, labels and layout choices are carried here instead of in
//! module-level constants so that tests and the CLI can substitute them.

use std::path::PathBuf;

/// Default CSV run report read by the CSV converter
pub const DEFAULT_CSV_INPUT: &str = "csv-report.csv";
/// Default output of the CSV converter
pub const DEFAULT_CSV_OUTPUT: &str = "xray_report.xml";
/// Default Newman report read by the Newman converter
pub const DEFAULT_NEWMAN_INPUT: &str = "newman_report.xml";
/// Default output of the Newman converter
pub const DEFAULT_NEWMAN_OUTPUT: &str = "xray_compatible_report.xml";
/// Name of the single suite emitted for CSV reports
pub const DEFAULT_CSV_SUITE_NAME: &str = "CSV Test Results";

/// Which source format a conversion reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Csv,
    Newman,
}

impl ReportKind {
    /// Indentation used by the pretty-printer for this report kind
    pub const fn default_indent(&self) -> usize {
        match self {
            ReportKind::Csv => 2,
            ReportKind::Newman => 4,
        }
    }
}

/// Switches selecting the Newman normalizer variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformOptions {
    /// Duplicate the root `name` into a root `classname` attribute
    pub include_root_classname: bool,
    /// Rewrite test case classnames as `"<LETTERS> <digits>"`
    pub format_classname: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            include_root_classname: true,
            format_classname: true,
        }
    }
}

impl TransformOptions {
    /// Copy root and case attributes verbatim
    pub const fn verbatim() -> Self {
        Self {
            include_root_classname: false,
            format_classname: false,
        }
    }
}

/// Configuration for a single conversion run
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    pub kind: ReportKind,
    pub input: PathBuf,
    pub output: PathBuf,
    /// Spaces per nesting level in the written XML
    pub indent: usize,
    /// Suite label for CSV reports
    pub suite_name: String,
    pub options: TransformOptions,
}

impl ConvertConfig {
    /// CSV conversion reading `csv-report.csv` into `xray_report.xml`
    pub fn csv() -> Self {
        Self {
            kind: ReportKind::Csv,
            input: PathBuf::from(DEFAULT_CSV_INPUT),
            output: PathBuf::from(DEFAULT_CSV_OUTPUT),
            indent: ReportKind::Csv.default_indent(),
            suite_name: DEFAULT_CSV_SUITE_NAME.to_string(),
            options: TransformOptions::default(),
        }
    }

    /// Newman conversion reading `newman_report.xml` into
    /// `xray_compatible_report.xml`
    pub fn newman() -> Self {
        Self {
            kind: ReportKind::Newman,
            input: PathBuf::from(DEFAULT_NEWMAN_INPUT),
            output: PathBuf::from(DEFAULT_NEWMAN_OUTPUT),
            indent: ReportKind::Newman.default_indent(),
            suite_name: DEFAULT_CSV_SUITE_NAME.to_string(),
            options: TransformOptions::default(),
        }
    }

    pub fn with_input(mut self, input: impl Into<PathBuf>) -> Self {
        self.input = input.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_suite_name(mut self, suite_name: impl Into<String>) -> Self {
        self.suite_name = suite_name.into();
        self
    }

    pub fn with_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_fixed_file_names() {
        let csv = ConvertConfig::csv();
        assert_eq!(csv.input, PathBuf::from("csv-report.csv"));
        assert_eq!(csv.output, PathBuf::from("xray_report.xml"));
        assert_eq!(csv.indent, 2);

        let newman = ConvertConfig::newman();
        assert_eq!(newman.input, PathBuf::from("newman_report.xml"));
        assert_eq!(newman.output, PathBuf::from("xray_compatible_report.xml"));
        assert_eq!(newman.indent, 4);
        assert_eq!(newman.options, TransformOptions::default());
    }

    #[test]
    fn test_builders_override_paths() {
        let config = ConvertConfig::csv()
            .with_input("in.csv")
            .with_output("out.xml")
            .with_suite_name("Nightly");

        assert_eq!(config.input, PathBuf::from("in.csv"));
        assert_eq!(config.output, PathBuf::from("out.xml"));
        assert_eq!(config.suite_name, "Nightly");
    }
}
