//! Report Serialization
//!
//! This module renders an [`OutputReport`] as pretty-printed, UTF-8 encoded
//! XML in the dialect understood by the Xray JUnit importer.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::model::{CaseOutcome, OutputCase, OutputReport, OutputSuite};

/// Errors that can occur during serialization
#[derive(Debug, thiserror::Error)]
pub enum SerializeError {
    /// XML serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn xml_err(e: impl std::fmt::Display) -> SerializeError {
    SerializeError::Xml(e.to_string())
}

/// Trait for report serializers
pub trait ReportSerializer {
    /// Serialize a report to a string
    fn serialize(&self, report: &OutputReport) -> Result<String, SerializeError>;

    /// Serialize a report to a writer
    fn serialize_to_writer<W: Write>(
        &self,
        report: &OutputReport,
        writer: W,
    ) -> Result<(), SerializeError>;
}

/// XML serializer for Xray reports
///
/// Elements are indented by `indent` spaces per nesting level. Elements that
/// carry text are kept on a single line and childless elements are
/// self-closed.
#[derive(Debug, Clone)]
pub struct XmlSerializer {
    /// Spaces per nesting level
    pub indent: usize,
    /// Whether to emit the `<?xml ...?>` declaration
    pub declaration: bool,
}

impl Default for XmlSerializer {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: true,
        }
    }
}

impl XmlSerializer {
    /// Create a new XML serializer with 2-space indentation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new XML serializer with the given indentation width
    pub fn with_indent(indent: usize) -> Self {
        Self {
            indent,
            ..Self::default()
        }
    }

    fn write_report<W: Write>(
        &self,
        writer: &mut Writer<W>,
        report: &OutputReport,
    ) -> Result<(), SerializeError> {
        if self.declaration {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
                .map_err(xml_err)?;
        }

        let root = start_with_attributes("testsuites", &report.attributes);
        if report.suites.is_empty() {
            return writer.write_event(Event::Empty(root)).map_err(xml_err);
        }

        writer.write_event(Event::Start(root)).map_err(xml_err)?;
        for suite in &report.suites {
            self.write_suite(writer, suite)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("testsuites")))
            .map_err(xml_err)
    }

    fn write_suite<W: Write>(
        &self,
        writer: &mut Writer<W>,
        suite: &OutputSuite,
    ) -> Result<(), SerializeError> {
        let start = start_with_attributes("testsuite", &suite.attributes);
        if suite.cases.is_empty() {
            return writer.write_event(Event::Empty(start)).map_err(xml_err);
        }

        writer.write_event(Event::Start(start)).map_err(xml_err)?;
        for case in &suite.cases {
            self.write_case(writer, case)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("testsuite")))
            .map_err(xml_err)
    }

    fn write_case<W: Write>(
        &self,
        writer: &mut Writer<W>,
        case: &OutputCase,
    ) -> Result<(), SerializeError> {
        let mut start = BytesStart::new("testcase");
        push_attr(&mut start, "classname", case.classname.as_str());
        push_attr(&mut start, "name", case.name.as_str());
        let example = case.example.map(|e| e.to_string());
        if let Some(example) = &example {
            push_attr(&mut start, "example", example.as_str());
        }
        if let Some(time) = &case.time {
            push_attr(&mut start, "time", time.as_str());
        }
        writer.write_event(Event::Start(start)).map_err(xml_err)?;

        writer
            .write_event(Event::Start(BytesStart::new("properties")))
            .map_err(xml_err)?;
        for property in &case.properties {
            let mut elem = BytesStart::new("property");
            push_attr(&mut elem, "name", property.name.as_str());
            push_attr(&mut elem, "value", property.value.as_str());
            writer.write_event(Event::Empty(elem)).map_err(xml_err)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("properties")))
            .map_err(xml_err)?;

        match &case.outcome {
            CaseOutcome::Failures(failures) => {
                for failure in failures {
                    let mut elem = BytesStart::new("failure");
                    if let Some(kind) = &failure.kind {
                        push_attr(&mut elem, "type", kind.as_str());
                    }
                    if let Some(message) = &failure.message {
                        push_attr(&mut elem, "message", message.as_str());
                    }
                    write_text_element(writer, elem, &failure.text)?;
                }
            }
            CaseOutcome::Success(success) => {
                let mut elem = BytesStart::new("success_message");
                if let Some(message) = &success.message {
                    push_attr(&mut elem, "message", message.as_str());
                }
                write_text_element(writer, elem, &success.text)?;
            }
        }

        writer
            .write_event(Event::End(BytesEnd::new("testcase")))
            .map_err(xml_err)
    }
}

impl ReportSerializer for XmlSerializer {
    fn serialize(&self, report: &OutputReport) -> Result<String, SerializeError> {
        let mut buf = Vec::new();
        self.serialize_to_writer(report, &mut buf)?;
        String::from_utf8(buf).map_err(xml_err)
    }

    fn serialize_to_writer<W: Write>(
        &self,
        report: &OutputReport,
        writer: W,
    ) -> Result<(), SerializeError> {
        let mut xml = Writer::new_with_indent(writer, b' ', self.indent);
        self.write_report(&mut xml, report)?;
        xml.get_mut().write_all(b"\n")?;
        Ok(())
    }
}

fn start_with_attributes<'a>(name: &'a str, attributes: &'a [(String, String)]) -> BytesStart<'a> {
    let mut start = BytesStart::new(name);
    for (key, value) in attributes {
        push_attr(&mut start, key, value);
    }
    start
}

/// Add an attribute, escaping only what XML requires inside double quotes
fn push_attr(start: &mut BytesStart<'_>, key: &str, value: &str) {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\n' => escaped.push_str("&#10;"),
            '\r' => escaped.push_str("&#13;"),
            '\t' => escaped.push_str("&#9;"),
            c => escaped.push(c),
        }
    }
    start.push_attribute((key.as_bytes(), escaped.as_bytes()));
}

/// Write `<name ...>text</name>` on one line, or a self-closed element when
/// there is no text
fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    start: BytesStart<'_>,
    text: &str,
) -> Result<(), SerializeError> {
    if text.is_empty() {
        return writer.write_event(Event::Empty(start)).map_err(xml_err);
    }

    let end = start.to_end().into_owned();
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
        .map_err(xml_err)?;
    writer.write_event(Event::End(end)).map_err(xml_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FailureDetail, SuccessMessage};
    use pretty_assertions::assert_eq;

    fn passing_case() -> OutputCase {
        OutputCase::new(
            "Login",
            "Login",
            "Login",
            CaseOutcome::Success(SuccessMessage {
                message: Some("OK".into()),
                text: "Validation passed successfully.".into(),
            }),
        )
        .with_example(1)
    }

    #[test]
    fn test_pretty_prints_with_two_spaces() {
        let report = OutputReport {
            attributes: vec![],
            suites: vec![OutputSuite::new()
                .with_attribute("name", "CSV Test Results")
                .with_cases(vec![passing_case()])],
        };

        let xml = XmlSerializer::new().serialize(&report).unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<testsuites>
  <testsuite name="CSV Test Results">
    <testcase classname="Login" name="Login" example="1">
      <properties>
        <property name="test_key" value="Login"/>
        <property name="status" value="PASS"/>
      </properties>
      <success_message message="OK">Validation passed successfully.</success_message>
    </testcase>
  </testsuite>
</testsuites>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_empty_report_is_self_closed() {
        let report = OutputReport::new()
            .with_attribute("name", "run")
            .with_attribute("tests", "0")
            .with_attribute("time", "0.0");

        let xml = XmlSerializer::with_indent(4).serialize(&report).unwrap();
        assert_eq!(
            xml,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<testsuites name=\"run\" tests=\"0\" time=\"0.0\"/>\n"
        );
    }

    #[test]
    fn test_escapes_attribute_and_text() {
        let case = OutputCase::new(
            "A",
            "a<b",
            "s",
            CaseOutcome::Failures(vec![
                FailureDetail {
                    kind: Some("AssertionFailure".into()),
                    message: Some("expected \"1\" & got 2".into()),
                    text: "1 < 2".into(),
                },
                FailureDetail {
                    kind: None,
                    message: Some("line one\nline two\r\n\tindented".into()),
                    text: "multi".into(),
                },
            ]),
        );
        let report = OutputReport {
            attributes: vec![],
            suites: vec![OutputSuite::new().with_cases(vec![case])],
        };

        let xml = XmlSerializer::new().serialize(&report).unwrap();
        assert!(xml.contains(r#"name="a&lt;b""#));
        assert!(xml.contains(r#"message="expected &quot;1&quot; &amp; got 2""#));
        assert!(xml.contains(">1 &lt; 2</failure>"));
        assert!(xml.contains(
            r#"<failure message="line one&#10;line two&#13;&#10;&#9;indented">multi</failure>"#
        ));
    }

    #[test]
    fn test_without_declaration() {
        let serializer = XmlSerializer {
            indent: 2,
            declaration: false,
        };
        let xml = serializer.serialize(&OutputReport::new()).unwrap();
        assert_eq!(xml, "<testsuites/>\n");
    }
}
