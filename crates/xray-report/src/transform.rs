//! Mapping of source records onto the Xray output tree

use crate::classname::format_classname;
use crate::config::TransformOptions;
use crate::csv_report::ExecutionGroups;
use xray_report_model::{
    CaseOutcome, CsvExecution, FailureDetail, NewmanCase, NewmanReport, NewmanSuite, OutputCase,
    OutputReport, OutputSuite, SuccessMessage,
};

/// `type` attribute of failures derived from CSV rows
pub const CSV_FAILURE_TYPE: &str = "AssertionFailure";
/// Text of the success message on passing CSV executions
pub const CSV_SUCCESS_TEXT: &str = "Validation passed successfully.";

/// Build the output report for grouped CSV executions.
///
/// Every execution becomes its own test case; `example` numbers the
/// executions of a request starting at 1.
pub fn transform_csv(groups: &ExecutionGroups, suite_name: &str) -> OutputReport {
    let cases = groups
        .iter()
        .flat_map(|(request_name, executions)| {
            executions
                .iter()
                .enumerate()
                .map(move |(index, execution)| csv_case(request_name, execution, index + 1))
        })
        .collect();

    OutputReport {
        attributes: Vec::new(),
        suites: vec![
            OutputSuite::new()
                .with_attribute("name", suite_name)
                .with_cases(cases),
        ],
    }
}

fn csv_case(request_name: &str, execution: &CsvExecution, example: usize) -> OutputCase {
    let outcome = if execution.is_failed() {
        CaseOutcome::Failures(vec![FailureDetail {
            kind: Some(CSV_FAILURE_TYPE.to_string()),
            message: Some(execution.failed.clone()),
            text: format!("Failed {} times.", execution.failed_count),
        }])
    } else {
        CaseOutcome::Success(SuccessMessage {
            message: Some(execution.executed.clone()),
            text: CSV_SUCCESS_TEXT.to_string(),
        })
    };

    OutputCase::new(request_name, request_name, request_name, outcome).with_example(example)
}

/// Build the output report for a Newman report.
///
/// The root `tests` attribute counts suites and `time` is the sum of the
/// suite times.
pub fn transform_newman(report: &NewmanReport, options: &TransformOptions) -> OutputReport {
    let mut output = OutputReport::new();
    if let Some(name) = &report.name {
        output = output.with_attribute("name", name);
    }
    output = output
        .with_attribute("tests", report.suites.len().to_string())
        .with_attribute("time", format_seconds(0.0));
    if let Some(name) = report.name.as_ref().filter(|_| options.include_root_classname) {
        output = output.with_attribute("classname", name);
    }

    let mut total_time = 0.0;
    for suite in &report.suites {
        total_time += suite.time;
        output.suites.push(newman_suite(suite, options));
    }
    output.set_attribute("time", format_seconds(total_time));

    output
}

fn newman_suite(suite: &NewmanSuite, options: &TransformOptions) -> OutputSuite {
    let mut output = OutputSuite::new();
    for (key, value) in [
        ("name", &suite.name),
        ("id", &suite.id),
        ("timestamp", &suite.timestamp),
    ] {
        if let Some(value) = value {
            output = output.with_attribute(key, value);
        }
    }

    let test_key = suite.name.as_deref().unwrap_or_default();
    let cases = suite
        .cases
        .iter()
        .map(|case| newman_case(case, test_key, options))
        .collect();

    output
        .with_attribute("tests", suite.tests.to_string())
        .with_attribute("failures", suite.failures.to_string())
        .with_attribute("errors", suite.errors.to_string())
        .with_attribute("time", format_seconds(suite.time))
        .with_cases(cases)
}

fn newman_case(case: &NewmanCase, test_key: &str, options: &TransformOptions) -> OutputCase {
    let classname = if options.format_classname {
        format_classname(&case.classname)
    } else {
        case.classname.clone()
    };

    let outcome = if case.failures.is_empty() {
        CaseOutcome::Success(SuccessMessage {
            message: None,
            text: format!("Test validation: \"{}\" passed successfully.", case.name),
        })
    } else {
        CaseOutcome::Failures(
            case.failures
                .iter()
                .map(|failure| FailureDetail {
                    kind: failure.kind.clone(),
                    message: failure.message.clone(),
                    text: first_line(&failure.text).to_string(),
                })
                .collect(),
        )
    };

    OutputCase::new(classname, &case.name, test_key, outcome).with_time(case.time.clone())
}

/// First line of `text` after stripping surrounding whitespace
pub fn first_line(text: &str) -> &str {
    text.trim().split(is_line_break).next().unwrap_or_default()
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// Render seconds the way report consumers expect: whole values keep one
/// decimal (`3.0`), others use the shortest round-trip form (`0.123`)
pub fn format_seconds(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}
