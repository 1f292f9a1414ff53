//! Report structures
//!
//! Source records are what the readers produce from a CSV run report or a
//! Newman JUnit report. The output tree is the Xray-compatible JUnit dialect:
//! `testsuites` → `testsuite` → `testcase` → (`properties`, `failure`* |
//! `success_message`).

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Source Records
// ============================================================================

/// One row of a CSV run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvExecution {
    /// Request name, the grouping key
    pub request_name: String,
    /// Message reported for the executed request
    pub executed: String,
    /// Failure message, empty when nothing failed
    pub failed: String,
    /// Number of assertions evaluated
    pub total_assertions: i64,
    /// Number of failed assertions
    pub failed_count: i64,
}

impl CsvExecution {
    pub fn is_failed(&self) -> bool {
        self.failed_count > 0
    }
}

/// Root of a Newman JUnit report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewmanReport {
    pub name: Option<String>,
    pub suites: Vec<NewmanSuite>,
}

/// A `testsuite` element of a Newman report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewmanSuite {
    pub name: Option<String>,
    pub id: Option<String>,
    pub timestamp: Option<String>,
    pub tests: i64,
    pub failures: i64,
    pub errors: i64,
    /// Elapsed seconds
    pub time: f64,
    pub cases: Vec<NewmanCase>,
}

/// A `testcase` element of a Newman report
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewmanCase {
    pub name: String,
    pub classname: String,
    pub time: Option<String>,
    pub failures: Vec<NewmanFailure>,
}

/// A `failure` element of a Newman test case
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewmanFailure {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    /// Concatenated inner text, unmodified
    pub text: String,
}

// ============================================================================
// Output Tree
// ============================================================================

/// Derived PASS/FAIL marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    /// FAIL iff the source reported at least one failure
    pub fn from_failure(failed: bool) -> Self {
        if failed { Status::Fail } else { Status::Pass }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `<property name=".." value=".."/>` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A `<failure>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    /// `type` attribute
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub message: Option<String>,
    pub text: String,
}

/// A `<success_message>` element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub message: Option<String>,
    pub text: String,
}

/// What follows the properties block of a test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseOutcome {
    Failures(Vec<FailureDetail>),
    Success(SuccessMessage),
}

/// A `testcase` element of the output report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputCase {
    pub classname: String,
    pub name: String,
    /// 1-based index among executions sharing the same name
    pub example: Option<usize>,
    pub time: Option<String>,
    pub properties: Vec<Property>,
    pub outcome: CaseOutcome,
}

impl OutputCase {
    /// Create a test case whose properties carry `test_key` and the status
    /// derived from `outcome`
    pub fn new(
        classname: impl Into<String>,
        name: impl Into<String>,
        test_key: impl Into<String>,
        outcome: CaseOutcome,
    ) -> Self {
        let status = match &outcome {
            CaseOutcome::Failures(failures) => Status::from_failure(!failures.is_empty()),
            CaseOutcome::Success(_) => Status::Pass,
        };
        Self {
            classname: classname.into(),
            name: name.into(),
            example: None,
            time: None,
            properties: vec![
                Property::new("test_key", test_key),
                Property::new("status", status.as_str()),
            ],
            outcome,
        }
    }

    pub fn with_example(mut self, example: usize) -> Self {
        self.example = Some(example);
        self
    }

    pub fn with_time(mut self, time: Option<String>) -> Self {
        self.time = time;
        self
    }

    /// Get the value of a named property
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    pub fn status(&self) -> Status {
        match self.property("status") {
            Some("FAIL") => Status::Fail,
            _ => Status::Pass,
        }
    }
}

/// A `testsuite` element of the output report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputSuite {
    /// Attributes in emission order
    pub attributes: Vec<(String, String)>,
    pub cases: Vec<OutputCase>,
}

impl OutputSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_cases(mut self, cases: Vec<OutputCase>) -> Self {
        self.cases = cases;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }
}

/// The `testsuites` root of the output report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputReport {
    /// Attributes in emission order
    pub attributes: Vec<(String, String)>,
    pub suites: Vec<OutputSuite>,
}

impl OutputReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Replace an attribute in place, or append it when absent
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name.to_string(), value)),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        find_attribute(&self.attributes, name)
    }

    /// Iterate over every test case in suite order
    pub fn cases(&self) -> impl Iterator<Item = &OutputCase> {
        self.suites.iter().flat_map(|s| s.cases.iter())
    }
}

fn find_attribute<'a>(attributes: &'a [(String, String)], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_str())
}
