//! Test report conversion for the Xray JUnit importer
//!
//! This crate converts two kinds of test-execution reports into the JUnit
//! dialect accepted by Xray, with `test_key`/`status` properties on every
//! test case:
//! - CSV run reports, one row per request execution
//! - Newman JUnit XML reports, possibly preceded by console preamble
//!
//! # Example
//!
//! ```no_run
//! use xray_report::{ConvertConfig, convert_newman};
//!
//! let summary = convert_newman(&ConvertConfig::newman())?;
//! println!("{} test cases written to {}", summary.cases, summary.output.display());
//! # Ok::<(), xray_report::ConvertError>(())
//! ```

pub mod classname;
pub mod config;
pub mod csv_report;
pub mod newman;
pub mod pipeline;
pub mod transform;

// Re-export the model and diagnostics crates
pub use xray_report_diagnostics as diagnostics;
pub use xray_report_model as model;

// Convenience re-exports
pub use config::{ConvertConfig, ReportKind, TransformOptions};
pub use pipeline::{ConvertSummary, convert, convert_csv, convert_newman, csv_to_report, newman_to_report};
pub use xray_report_diagnostics::{ConvertError, Result};

// CLI module (only available with cli feature)
#[cfg(feature = "cli")]
pub mod cli;
