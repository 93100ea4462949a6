// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsers for JUnit and Google Test XML reports.
//!
//! Each report file is parsed on its own into a [`ParsedReport`]. Parsing is all-or-nothing: if
//! anything about a file is invalid, the whole file is rejected with a [`ReportParseError`] and
//! none of its test cases are kept.

mod gtest;
mod junit;

use crate::{
    errors::ReportParseError,
    source_index::SourceIndex,
    xml_tree::{XmlElement, read_document},
};
use camino::{Utf8Path, Utf8PathBuf};
use generic_test_report::{TestCase, TestMessage, TestOutcome};
use indexmap::IndexMap;
use std::time::Duration;

/// The test cases found in a single report file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedReport {
    /// The path to the report file.
    pub path: Utf8PathBuf,

    /// Test cases grouped by the path of the source file they belong to, in the order each source
    /// file was first seen.
    pub groups: IndexMap<String, Vec<TestCase>>,

    /// Qualified names of test cases that couldn't be attributed to a source file and were
    /// dropped.
    ///
    /// Only Google Test reports produce these.
    pub unresolved_tests: Vec<String>,
}

impl ParsedReport {
    fn new(path: &Utf8Path) -> Self {
        Self {
            path: path.to_owned(),
            groups: IndexMap::new(),
            unresolved_tests: Vec::new(),
        }
    }

    fn add_test_case(&mut self, source_path: &str, test_case: TestCase) {
        self.groups
            .entry(source_path.to_owned())
            .or_default()
            .push(test_case);
    }

    /// Returns the number of test cases kept from this report.
    pub fn test_case_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Parses report files of one type.
#[derive(Clone, Copy, Debug)]
pub enum ReportParser<'a> {
    /// JUnit XML, where each `<testcase>` names its source file in the `file` attribute.
    Junit,

    /// Google Test XML, where source files are looked up by test name.
    Gtest {
        /// Where the tests are declared.
        source_index: &'a SourceIndex,
    },
}

impl ReportParser<'_> {
    /// Reads and parses the report file at `path`.
    ///
    /// The file is read in full and closed before parsing starts.
    pub fn parse_file(&self, path: &Utf8Path) -> Result<ParsedReport, ReportParseError> {
        let contents = std::fs::read_to_string(path).map_err(|error| ReportParseError::Read {
            path: path.to_owned(),
            error,
        })?;
        self.parse_str(path, &contents)
    }

    /// Parses report `contents` that were read from `path`.
    pub fn parse_str(
        &self,
        path: &Utf8Path,
        contents: &str,
    ) -> Result<ParsedReport, ReportParseError> {
        let root = read_document(contents).map_err(|error| ReportParseError::Xml {
            path: path.to_owned(),
            error,
        })?;

        match self {
            ReportParser::Junit => junit::parse_junit(path, &root),
            ReportParser::Gtest { source_index } => gtest::parse_gtest(path, &root, source_index),
        }
    }
}

fn required_attribute<'a>(
    path: &Utf8Path,
    element: &'a XmlElement,
    element_name: &'static str,
    attribute: &'static str,
) -> Result<&'a str, ReportParseError> {
    element
        .attribute(attribute)
        .ok_or_else(|| ReportParseError::MissingAttribute {
            path: path.to_owned(),
            element: element_name,
            attribute,
        })
}

/// Converts a `time` attribute in seconds to a duration, truncated to whole milliseconds.
fn parse_duration(
    path: &Utf8Path,
    test_name: &str,
    time: &str,
) -> Result<Duration, ReportParseError> {
    let seconds = time
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .ok_or_else(|| ReportParseError::InvalidTime {
            path: path.to_owned(),
            test_name: test_name.to_owned(),
            time: time.to_owned(),
        })?;

    // The float-to-int cast saturates, so absurdly large values clamp rather than wrap.
    let millis = (seconds * 1000.0).trunc() as u64;
    Ok(Duration::from_millis(millis))
}

/// Returns the message from the first `<failure>`, `<error>` or `<skipped>` child, if any.
fn parse_message(test_case: &XmlElement) -> Option<TestMessage> {
    test_case.children.iter().find_map(|child| {
        let outcome = TestOutcome::from_tag(&child.name)?;
        Some(TestMessage::new(
            outcome,
            child.attribute("message").unwrap_or_default(),
            &child.text,
        ))
    })
}

fn test_case_from_element(
    path: &Utf8Path,
    name: String,
    element: &XmlElement,
) -> Result<TestCase, ReportParseError> {
    let time = required_attribute(path, element, "testcase", "time")?;
    let duration = parse_duration(path, &name, time)?;
    let mut test_case = TestCase::new(name, duration);
    if let Some(message) = parse_message(element) {
        test_case.set_message(message);
    }
    Ok(test_case)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("0.125", Some(125) ; "fractional seconds")]
    #[test_case("1", Some(1000) ; "whole seconds")]
    #[test_case("0.0009", Some(0) ; "sub-millisecond truncates to zero")]
    #[test_case("2.5e-3", Some(2) ; "exponent notation")]
    #[test_case(" 0.25 ", Some(250) ; "surrounding whitespace")]
    #[test_case("12.3456", Some(12345) ; "truncates rather than rounds")]
    #[test_case("", None ; "empty time")]
    #[test_case("-1", None ; "negative time")]
    #[test_case("NaN", None ; "not a number")]
    #[test_case("inf", None ; "infinite")]
    #[test_case("1,5", None ; "comma decimal separator")]
    fn durations(time: &str, expected_millis: Option<u64>) {
        let result = parse_duration(Utf8Path::new("report.xml"), "Foo.bar", time);
        match expected_millis {
            Some(millis) => assert_eq!(result.unwrap(), Duration::from_millis(millis)),
            None => assert!(
                matches!(result, Err(ReportParseError::InvalidTime { .. })),
                "expected invalid time for {time:?}, got {result:?}"
            ),
        }
    }
}
