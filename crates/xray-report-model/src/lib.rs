//! Report models and serialization
//!
//! This crate provides:
//! - Source record structures for CSV run reports and Newman JUnit reports
//! - The Xray-compatible output tree (`testsuites` / `testsuite` / `testcase`)
//! - Pretty-printed XML serialization of the output tree

pub mod model;
pub mod serialize;

pub use model::*;
pub use serialize::{ReportSerializer, SerializeError, XmlSerializer};
