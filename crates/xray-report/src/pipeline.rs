//! Read → parse → transform → serialize → write
//!
//! The output file is only created once the whole report has been built and
//! serialized in memory, so a failed conversion never leaves a partial file.

use crate::config::{ConvertConfig, ReportKind, TransformOptions};
use crate::csv_report::{group_by_request, parse_csv_report};
use crate::newman::parse_newman_report;
use crate::transform::{transform_csv, transform_newman};
use std::fs;
use std::path::{Path, PathBuf};
use xray_report_diagnostics::{ConvertError, Result};
use xray_report_model::{OutputReport, ReportSerializer, Status, XmlSerializer};

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertSummary {
    /// File the report was written to
    pub output: PathBuf,
    pub suites: usize,
    pub cases: usize,
    /// Number of cases with status FAIL
    pub failed: usize,
}

impl ConvertSummary {
    fn from_report(report: &OutputReport, output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            suites: report.suites.len(),
            cases: report.cases().count(),
            failed: report
                .cases()
                .filter(|c| c.status() == Status::Fail)
                .count(),
        }
    }
}

/// Build the output report for CSV report content
pub fn csv_to_report(content: &str, config: &ConvertConfig) -> Result<OutputReport> {
    let executions = parse_csv_report(content)?;
    let groups = group_by_request(executions);
    log::debug!("Grouped CSV executions into {} requests", groups.len());
    Ok(transform_csv(&groups, &config.suite_name))
}

/// Build the output report for Newman report content
pub fn newman_to_report(content: &str, options: &TransformOptions) -> Result<OutputReport> {
    let report = parse_newman_report(content)?;
    Ok(transform_newman(&report, options))
}

/// Convert a CSV run report
pub fn convert_csv(config: &ConvertConfig) -> Result<ConvertSummary> {
    let content = read_input(&config.input)?;
    let report = csv_to_report(&content, config)?;
    write_report(&report, config)
}

/// Convert a Newman JUnit report
pub fn convert_newman(config: &ConvertConfig) -> Result<ConvertSummary> {
    let content = read_input(&config.input)?;
    let report = newman_to_report(&content, &config.options)?;
    write_report(&report, config)
}

/// Convert according to `config.kind`
pub fn convert(config: &ConvertConfig) -> Result<ConvertSummary> {
    match config.kind {
        ReportKind::Csv => convert_csv(config),
        ReportKind::Newman => convert_newman(config),
    }
}

fn read_input(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ConvertError::input_not_found(path));
    }
    log::info!("Reading {}", path.display());
    Ok(fs::read_to_string(path)?)
}

fn write_report(report: &OutputReport, config: &ConvertConfig) -> Result<ConvertSummary> {
    let xml = XmlSerializer::with_indent(config.indent)
        .serialize(report)
        .map_err(|e| ConvertError::Io {
            message: e.to_string(),
        })?;

    fs::write(&config.output, xml)?;

    let summary = ConvertSummary::from_report(report, &config.output);
    log::info!(
        "Wrote {} test cases ({} failed) to {}",
        summary.cases,
        summary.failed,
        summary.output.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_input_is_reported_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConvertConfig::csv()
            .with_input(dir.path().join("absent.csv"))
            .with_output(dir.path().join("out.xml"));

        let err = convert_csv(&config).unwrap_err();
        assert!(matches!(err, ConvertError::InputNotFound { .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_summary_counts_failures() {
        let report = csv_to_report(
            "requestName,executed,failed,totalAssertions,failedCount\nA,ok,,1,0\nA,ok,x,1,4\n",
            &ConvertConfig::csv(),
        )
        .unwrap();

        let summary = ConvertSummary::from_report(&report, Path::new("out.xml"));
        assert_eq!((summary.suites, summary.cases, summary.failed), (1, 2, 1));
    }
}
