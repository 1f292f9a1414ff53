//! CSV run report reader
//!
//! Reads a header-driven CSV report with one row per request execution.
//! Columns may appear in any order and extra columns or trailing fields are
//! ignored.

use indexmap::IndexMap;
use serde::Deserialize;
use xray_report_diagnostics::{ConvertError, Result};
use xray_report_model::CsvExecution;

/// Columns every CSV run report must provide
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "requestName",
    "executed",
    "failed",
    "totalAssertions",
    "failedCount",
];

/// Executions grouped by request name, in first-seen order
pub type ExecutionGroups = IndexMap<String, Vec<CsvExecution>>;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "requestName")]
    request_name: String,
    executed: String,
    failed: String,
    #[serde(rename = "totalAssertions")]
    total_assertions: String,
    #[serde(rename = "failedCount")]
    failed_count: String,
}

impl CsvRow {
    fn into_execution(self) -> Result<CsvExecution> {
        Ok(CsvExecution {
            total_assertions: parse_count("totalAssertions", &self.total_assertions)?,
            failed_count: parse_count("failedCount", &self.failed_count)?,
            request_name: self.request_name,
            executed: self.executed,
            failed: self.failed,
        })
    }
}

fn parse_count(field: &str, value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ConvertError::malformed_number(field, value))
}

fn csv_error(err: csv::Error) -> ConvertError {
    ConvertError::Csv {
        message: err.to_string(),
        row: None,
    }
}

/// Parse a CSV run report into executions, in file order
pub fn parse_csv_report(content: &str) -> Result<Vec<CsvExecution>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().map_err(csv_error)?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(ConvertError::missing_column(*missing));
    }

    let mut executions = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row_number = index + 1;
        let execution = row
            .map_err(csv_error)
            .and_then(CsvRow::into_execution)
            .map_err(|e| e.at_row(row_number))?;
        executions.push(execution);
    }

    log::debug!("Read {} CSV executions", executions.len());
    Ok(executions)
}

/// Group executions by request name.
///
/// Distinct names keep the order they were first seen in; executions within a
/// group keep input order.
pub fn group_by_request(executions: Vec<CsvExecution>) -> ExecutionGroups {
    let mut groups = ExecutionGroups::new();
    for execution in executions {
        groups
            .entry(execution.request_name.clone())
            .or_default()
            .push(execution);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "requestName,executed,failed,totalAssertions,failedCount";

    #[test]
    fn test_parse_single_row() {
        let content = format!("{HEADER}\nLogin,OK,,3,0\n");
        let executions = parse_csv_report(&content).unwrap();

        assert_eq!(
            executions,
            vec![CsvExecution {
                request_name: "Login".into(),
                executed: "OK".into(),
                failed: String::new(),
                total_assertions: 3,
                failed_count: 0,
            }]
        );
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let content = "iteration,failedCount,requestName,failed,executed,totalAssertions\n\
                       1,2,Search,timeout,ran,5\n";
        let executions = parse_csv_report(content).unwrap();

        assert_eq!(executions[0].request_name, "Search");
        assert_eq!(executions[0].failed, "timeout");
        assert_eq!(executions[0].failed_count, 2);
    }

    #[test]
    fn test_missing_column() {
        let content = "requestName,executed,failed,totalAssertions\nLogin,OK,,3\n";
        let err = parse_csv_report(content).unwrap_err();

        assert!(matches!(
            err,
            ConvertError::MissingColumn { ref column } if column == "failedCount"
        ));
    }

    #[test]
    fn test_malformed_number_reports_row() {
        let content = format!("{HEADER}\nLogin,OK,,3,0\nLogout,OK,,three,0\n");
        let err = parse_csv_report(&content).unwrap_err();

        match err {
            ConvertError::MalformedNumber { field, value, row } => {
                assert_eq!(field, "totalAssertions");
                assert_eq!(value, "three");
                assert_eq!(row, Some(2));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_negative_count_is_not_a_failure() {
        let content = format!("{HEADER}\nLogin,OK,,3,-1\n");
        let executions = parse_csv_report(&content).unwrap();

        assert_eq!(executions[0].failed_count, -1);
        assert!(!executions[0].is_failed());
    }

    #[test]
    fn test_trailing_extra_field_is_ignored() {
        let content = format!("{HEADER}\nA,ok,,3,0,extra\nB,ok,bad,2,1\n");
        let executions = parse_csv_report(&content).unwrap();

        assert_eq!(executions.len(), 2);
        assert_eq!(executions[0].request_name, "A");
        assert_eq!(executions[0].failed_count, 0);
        assert_eq!(executions[1].failed, "bad");
    }

    #[test]
    fn test_short_row_is_csv_error() {
        let content = format!("{HEADER}\nLogin,OK\n");
        assert!(matches!(
            parse_csv_report(&content),
            Err(ConvertError::Csv { row: Some(1), .. })
        ));
    }

    #[test]
    fn test_group_preserves_first_seen_order() {
        let content = format!(
            "{HEADER}\nB,ok,,1,0\nA,ok,,1,0\nB,ok,bad,1,1\nC,ok,,1,0\nA,ok,,2,0\n"
        );
        let groups = group_by_request(parse_csv_report(&content).unwrap());

        let names: Vec<_> = groups.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["B", "A", "C"]);
        assert_eq!(groups["B"].len(), 2);
        assert_eq!(groups["B"][1].failed_count, 1);
        assert_eq!(groups["A"][1].total_assertions, 2);
    }
}
