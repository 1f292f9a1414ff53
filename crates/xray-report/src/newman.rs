//! Newman JUnit report reader
//!
//! Newman writes its JUnit report after whatever the console reporter printed,
//! so parsing starts at the first `<testsuites` marker. Only direct children
//! are read: `testsuites/testsuite`, `testsuite/testcase` and
//! `testcase/failure`. Anything else is skipped.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use std::fmt::Display;
use std::str::FromStr;
use xray_report_diagnostics::{ConvertError, Result, SourceLocation};
use xray_report_model::{NewmanCase, NewmanFailure, NewmanReport, NewmanSuite};

/// Marker that starts the XML document inside a Newman report
pub const ROOT_MARKER: &str = "<testsuites";

const TESTSUITE_TAG: &[u8] = b"testsuite";
const TESTCASE_TAG: &[u8] = b"testcase";
const FAILURE_TAG: &[u8] = b"failure";

/// Parse a Newman report, ignoring any preamble before the root marker
pub fn parse_newman_report(content: &str) -> Result<NewmanReport> {
    let start = content
        .find(ROOT_MARKER)
        .ok_or_else(|| ConvertError::missing_root("<testsuites>"))?;
    if start > 0 {
        log::debug!("Skipping {start} bytes of preamble before {ROOT_MARKER}");
    }

    let mut parser = NewmanParser::new(content, start);
    parser.parse()
}

type Attributes = Vec<(String, String)>;

struct NewmanParser<'a> {
    source: &'a str,
    base: usize,
    reader: Reader<&'a [u8]>,
}

impl<'a> NewmanParser<'a> {
    fn new(source: &'a str, base: usize) -> Self {
        Self {
            source,
            base,
            reader: Reader::from_str(&source[base..]),
        }
    }

    fn parse(&mut self) -> Result<NewmanReport> {
        let (root, is_empty) = loop {
            match self.next_event()? {
                Event::Start(e) => break (e, false),
                Event::Empty(e) => break (e, true),
                Event::Eof => return Err(self.syntax_error("no root element found")),
                _ => {}
            }
        };

        let attrs = self.attributes(&root)?;
        let mut report = NewmanReport {
            name: attr(&attrs, "name").map(str::to_string),
            suites: Vec::new(),
        };

        if !is_empty {
            loop {
                match self.next_event()? {
                    Event::Start(e) if e.name().as_ref() == TESTSUITE_TAG => {
                        report.suites.push(self.parse_suite(&e, false)?);
                    }
                    Event::Empty(e) if e.name().as_ref() == TESTSUITE_TAG => {
                        report.suites.push(self.parse_suite(&e, true)?);
                    }
                    Event::Start(e) => self.skip(&e)?,
                    Event::End(_) => break,
                    Event::Eof => return Err(self.syntax_error("unclosed root element")),
                    _ => {}
                }
            }
        }

        self.expect_document_end()?;
        log::debug!("Parsed {} Newman test suites", report.suites.len());
        Ok(report)
    }

    fn parse_suite(&mut self, start: &BytesStart<'_>, is_empty: bool) -> Result<NewmanSuite> {
        let attrs = self.attributes(start)?;
        let mut suite = NewmanSuite {
            name: attr(&attrs, "name").map(str::to_string),
            id: attr(&attrs, "id").map(str::to_string),
            timestamp: attr(&attrs, "timestamp").map(str::to_string),
            tests: required_number(&attrs, "testsuite", "tests")?,
            failures: required_number(&attrs, "testsuite", "failures")?,
            errors: required_number(&attrs, "testsuite", "errors")?,
            time: required_number(&attrs, "testsuite", "time")?,
            cases: Vec::new(),
        };

        if is_empty {
            return Ok(suite);
        }

        loop {
            match self.next_event()? {
                Event::Start(e) if e.name().as_ref() == TESTCASE_TAG => {
                    suite.cases.push(self.parse_case(&e, false)?);
                }
                Event::Empty(e) if e.name().as_ref() == TESTCASE_TAG => {
                    suite.cases.push(self.parse_case(&e, true)?);
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(_) => break,
                Event::Eof => return Err(self.syntax_error("unclosed <testsuite> element")),
                _ => {}
            }
        }

        Ok(suite)
    }

    fn parse_case(&mut self, start: &BytesStart<'_>, is_empty: bool) -> Result<NewmanCase> {
        let attrs = self.attributes(start)?;
        let mut case = NewmanCase {
            name: attr(&attrs, "name").unwrap_or_default().to_string(),
            classname: attr(&attrs, "classname").unwrap_or_default().to_string(),
            time: attr(&attrs, "time").map(str::to_string),
            failures: Vec::new(),
        };

        if is_empty {
            return Ok(case);
        }

        loop {
            match self.next_event()? {
                Event::Start(e) if e.name().as_ref() == FAILURE_TAG => {
                    let attrs = self.attributes(&e)?;
                    let text = self.read_inner_text()?;
                    case.failures.push(failure_from(&attrs, text));
                }
                Event::Empty(e) if e.name().as_ref() == FAILURE_TAG => {
                    let attrs = self.attributes(&e)?;
                    case.failures.push(failure_from(&attrs, String::new()));
                }
                Event::Start(e) => self.skip(&e)?,
                Event::End(_) => break,
                Event::Eof => return Err(self.syntax_error("unclosed <testcase> element")),
                _ => {}
            }
        }

        Ok(case)
    }

    /// Concatenate every piece of text up to the end of the current element,
    /// including text of nested elements
    fn read_inner_text(&mut self) -> Result<String> {
        let mut text = String::new();
        let mut depth = 0usize;

        loop {
            match self.next_event()? {
                Event::Text(e) => {
                    let decoded = e.decode().map_err(|err| self.syntax_error(err))?;
                    text.push_str(&decoded);
                }
                Event::CData(e) => {
                    let decoded = e.decode().map_err(|err| self.syntax_error(err))?;
                    text.push_str(&decoded);
                }
                Event::GeneralRef(e) => {
                    if let Some(ch) = e.resolve_char_ref().map_err(|err| self.syntax_error(err))? {
                        text.push(ch);
                    } else {
                        let name = e.decode().map_err(|err| self.syntax_error(err))?;
                        match resolve_predefined_entity(&name) {
                            Some(value) => text.push_str(value),
                            None => {
                                return Err(self.syntax_error(format!("undefined entity &{name};")));
                            }
                        }
                    }
                }
                Event::Start(_) => depth += 1,
                Event::End(_) if depth == 0 => break,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(self.syntax_error("unclosed <failure> element")),
                _ => {}
            }
        }

        Ok(text)
    }

    fn skip(&mut self, start: &BytesStart<'_>) -> Result<()> {
        log::warn!(
            "Skipping <{}> element",
            String::from_utf8_lossy(start.name().as_ref())
        );
        self.reader
            .read_to_end(start.name())
            .map_err(|err| self.reader_error(err))?;
        Ok(())
    }

    /// Only whitespace, comments and processing instructions may follow the
    /// root element
    fn expect_document_end(&mut self) -> Result<()> {
        loop {
            match self.next_event()? {
                Event::Eof => return Ok(()),
                Event::Text(e) if e.iter().all(u8::is_ascii_whitespace) => {}
                Event::Comment(_) | Event::PI(_) => {}
                _ => return Err(self.syntax_error("junk after document element")),
            }
        }
    }

    fn attributes(&self, start: &BytesStart<'_>) -> Result<Attributes> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.syntax_error(err))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|err| self.syntax_error(err))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| self.syntax_error(err))?
                .to_string();
            attrs.push((key, value));
        }
        Ok(attrs)
    }

    fn next_event(&mut self) -> Result<Event<'a>> {
        self.reader
            .read_event()
            .map_err(|err| self.reader_error(err))
    }

    fn reader_error(&self, err: quick_xml::Error) -> ConvertError {
        self.error_at(self.reader.error_position() as usize, err)
    }

    fn syntax_error(&self, message: impl Display) -> ConvertError {
        self.error_at(self.reader.buffer_position() as usize, message)
    }

    fn error_at(&self, position: usize, message: impl Display) -> ConvertError {
        let location = SourceLocation::from_offset(self.base + position, self.source);
        ConvertError::xml_syntax_at(message.to_string(), location)
    }
}

fn attr<'b>(attrs: &'b Attributes, name: &str) -> Option<&'b str> {
    attrs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

fn required_number<T: FromStr>(attrs: &Attributes, element: &str, name: &str) -> Result<T> {
    let value = attr(attrs, name).ok_or_else(|| ConvertError::missing_attribute(element, name))?;
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ConvertError::malformed_number(format!("{element}.{name}"), value))
}

fn failure_from(attrs: &Attributes, text: String) -> NewmanFailure {
    NewmanFailure {
        kind: attr(attrs, "type").map(str::to_string),
        message: attr(attrs, "message").map(str::to_string),
        text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const REPORT: &str = r#"newman

→ Login
  POST https://example.test/login [200 OK]
<?xml version="1.0" encoding="UTF-8"?>
<testsuites name="Shop API" tests="2" time="1.5">
  <testsuite name="Login" id="a1" timestamp="2024-05-01T10:00:00.000Z" tests="2" failures="1" errors="0" time="1.5">
    <testcase name="Status code is 200" time="0.5" classname="LOGIN123"/>
    <testcase name="Token present" time="1.0" classname="LOGIN123">
      <failure type="AssertionFailure" message="expected token"><![CDATA[Failed 1 times.]]>
        at assertion:1</failure>
      <system-out>ignored</system-out>
    </testcase>
  </testsuite>
</testsuites>
"#;

    #[test]
    fn test_parses_after_preamble() {
        let report = parse_newman_report(REPORT).unwrap();

        assert_eq!(report.name.as_deref(), Some("Shop API"));
        assert_eq!(report.suites.len(), 1);

        let suite = &report.suites[0];
        assert_eq!(suite.name.as_deref(), Some("Login"));
        assert_eq!(suite.id.as_deref(), Some("a1"));
        assert_eq!((suite.tests, suite.failures, suite.errors), (2, 1, 0));
        assert_eq!(suite.time, 1.5);
        assert_eq!(suite.cases.len(), 2);
        assert!(suite.cases[0].failures.is_empty());

        let failure = &suite.cases[1].failures[0];
        assert_eq!(failure.kind.as_deref(), Some("AssertionFailure"));
        assert_eq!(failure.message.as_deref(), Some("expected token"));
        assert_eq!(failure.text, "Failed 1 times.\n        at assertion:1");
    }

    #[test]
    fn test_missing_marker() {
        let err = parse_newman_report("<?xml version=\"1.0\"?><report/>").unwrap_err();
        assert!(matches!(err, ConvertError::MissingRootElement { .. }));
    }

    #[test]
    fn test_entities_in_failure_text() {
        let xml = r#"<testsuites><testsuite tests="1" failures="1" errors="0" time="0"><testcase name="a" classname="b"><failure>a &lt; b &amp;&#32;c</failure></testcase></testsuite></testsuites>"#;
        let report = parse_newman_report(xml).unwrap();

        assert_eq!(report.suites[0].cases[0].failures[0].text, "a < b & c");
    }

    #[test]
    fn test_nested_text_is_concatenated() {
        let xml = r#"<testsuites><testsuite tests="1" failures="1" errors="0" time="0"><testcase name="a"><failure>one <b>two</b> three</failure></testcase></testsuite></testsuites>"#;
        let report = parse_newman_report(xml).unwrap();

        assert_eq!(report.suites[0].cases[0].failures[0].text, "one two three");
    }

    #[test]
    fn test_grandchildren_are_not_collected() {
        let xml = r#"<testsuites><group><testsuite tests="1" failures="0" errors="0" time="1"/></group></testsuites>"#;
        let report = parse_newman_report(xml).unwrap();

        assert!(report.suites.is_empty());
    }

    #[test]
    fn test_missing_suite_attribute() {
        let xml = r#"<testsuites><testsuite name="s" tests="1" failures="0" time="1"/></testsuites>"#;
        let err = parse_newman_report(xml).unwrap_err();

        assert!(matches!(
            err,
            ConvertError::MissingAttribute { ref attribute, .. } if attribute == "errors"
        ));
    }

    #[test]
    fn test_non_numeric_suite_attribute() {
        let xml = r#"<testsuites><testsuite tests="1" failures="0" errors="0" time="soon"/></testsuites>"#;
        let err = parse_newman_report(xml).unwrap_err();

        assert!(matches!(
            err,
            ConvertError::MalformedNumber { ref value, .. } if value == "soon"
        ));
    }

    #[test]
    fn test_mismatched_tags_report_location() {
        let content = "preamble\n<testsuites>\n  <testsuite tests=\"0\" failures=\"0\" errors=\"0\" time=\"0\">\n</testsuites>";
        let err = parse_newman_report(content).unwrap_err();

        match err {
            ConvertError::XmlSyntax { location, .. } => {
                let location = location.expect("syntax errors carry a location");
                assert!(location.line >= 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_root() {
        let err = parse_newman_report("<testsuites name=\"x\">").unwrap_err();
        assert!(matches!(err, ConvertError::XmlSyntax { .. }));
    }

    #[test]
    fn test_junk_after_root() {
        let err = parse_newman_report("<testsuites/><extra/>").unwrap_err();
        assert!(matches!(err, ConvertError::XmlSyntax { .. }));
    }
}
