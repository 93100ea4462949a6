// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::SerializeError, serialize::serialize_report};
use indexmap::map::IndexMap;
use std::{fmt, io, time::Duration};

/// The schema version written to the root element of every report.
pub const SCHEMA_VERSION: u32 = 1;

/// The root element of a generic test execution report.
///
/// Test cases are grouped by source file path. Each path appears at most once: adding test cases
/// for a path that is already present appends to the existing group.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestExecutions {
    /// The source files in this report, keyed by path, in the order they were first added.
    pub files: IndexMap<String, FileExecution>,
}

impl TestExecutions {
    /// Creates a new, empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a test case to the group for `path`, creating the group if necessary.
    pub fn add_test_case(&mut self, path: impl Into<String>, test_case: TestCase) -> &mut Self {
        self.file_mut(path).add_test_case(test_case);
        self
    }

    /// Adds several test cases to the group for `path`, creating the group if necessary.
    ///
    /// The group is created even if `test_cases` is empty.
    pub fn add_test_cases(
        &mut self,
        path: impl Into<String>,
        test_cases: impl IntoIterator<Item = TestCase>,
    ) -> &mut Self {
        self.file_mut(path).add_test_cases(test_cases);
        self
    }

    /// Returns the group for `path`, if any test cases were added for it.
    pub fn file(&self, path: &str) -> Option<&FileExecution> {
        self.files.get(path)
    }

    /// Returns the total number of test cases across all files.
    pub fn test_case_count(&self) -> usize {
        self.files.values().map(|file| file.test_cases.len()).sum()
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer).map_err(SerializeError::from)
    }

    /// Serialize this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|utf8_err| quick_xml::Error::NonDecodable(Some(utf8_err.utf8_error())).into())
    }

    fn file_mut(&mut self, path: impl Into<String>) -> &mut FileExecution {
        let path = path.into();
        self.files
            .entry(path)
            .or_insert_with_key(|path| FileExecution::new(path.clone()))
    }
}

/// All test cases attributed to a single source file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileExecution {
    /// The path to the source file, as written to the `path` attribute.
    pub path: String,

    /// The test cases in this file, in the order they were discovered.
    pub test_cases: Vec<TestCase>,
}

impl FileExecution {
    /// Creates a new `FileExecution` with no test cases.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            test_cases: vec![],
        }
    }

    /// Adds a test case to this file.
    pub fn add_test_case(&mut self, test_case: TestCase) -> &mut Self {
        self.test_cases.push(test_case);
        self
    }

    /// Adds several test cases to this file.
    ///
    /// Test cases are never deduplicated: a test that ran twice shows up twice.
    pub fn add_test_cases(&mut self, test_cases: impl IntoIterator<Item = TestCase>) -> &mut Self {
        self.test_cases.extend(test_cases);
        self
    }
}

/// Represents a single executed test.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    /// The fully qualified name of the test, typically `Suite.Case`.
    pub name: String,

    /// The time it took to execute this test.
    ///
    /// This is serialized as a whole number of milliseconds.
    pub duration: Duration,

    /// Set if the test did not pass.
    pub message: Option<TestMessage>,
}

impl TestCase {
    /// Creates a new passing test case.
    pub fn new(name: impl Into<String>, duration: Duration) -> Self {
        Self {
            name: name.into(),
            duration,
            message: None,
        }
    }

    /// Attaches a failure, error or skip message to this test case.
    pub fn set_message(&mut self, message: TestMessage) -> &mut Self {
        self.message = Some(message);
        self
    }

    /// Returns the outcome of this test case, or `None` if it passed.
    pub fn outcome(&self) -> Option<TestOutcome> {
        self.message.as_ref().map(TestMessage::outcome)
    }
}

/// The reason a test case did not pass.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TestOutcome {
    /// An expected failure, such as an assertion. Serialized as `failure`.
    Failure,

    /// An unexpected error. Serialized as `error`.
    Error,

    /// The test was not run. Serialized as `skipped`.
    Skipped,
}

impl TestOutcome {
    /// Returns the element name used for this outcome, in both JUnit-style inputs and the generic
    /// test execution output.
    pub fn tag_name(self) -> &'static str {
        match self {
            TestOutcome::Failure => "failure",
            TestOutcome::Error => "error",
            TestOutcome::Skipped => "skipped",
        }
    }

    /// Looks up the outcome corresponding to an element name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "failure" => Some(TestOutcome::Failure),
            "error" => Some(TestOutcome::Error),
            "skipped" => Some(TestOutcome::Skipped),
            _ => None,
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// The message attached to a test case that failed, errored out or was skipped.
///
/// # Encoding
///
/// XML 1.0 cannot represent most ASCII control characters, even escaped. They are removed from
/// both messages on construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestMessage {
    outcome: TestOutcome,
    short_message: String,
    long_message: String,
}

impl TestMessage {
    /// Creates a new message.
    ///
    /// `short_message` is serialized as the `message` attribute, and `long_message` as the text of
    /// the element. Either may be empty.
    pub fn new(
        outcome: TestOutcome,
        short_message: impl AsRef<str>,
        long_message: impl AsRef<str>,
    ) -> Self {
        Self {
            outcome,
            short_message: strip_control_chars(short_message.as_ref()),
            long_message: strip_control_chars(long_message.as_ref()),
        }
    }

    /// Returns the outcome this message describes.
    pub fn outcome(&self) -> TestOutcome {
        self.outcome
    }

    /// Returns the summary line, e.g. the `message` attribute of a JUnit `<failure>`.
    pub fn short_message(&self) -> &str {
        &self.short_message
    }

    /// Returns the detailed text, e.g. a stack trace.
    pub fn long_message(&self) -> &str {
        &self.long_message
    }
}

fn strip_control_chars(input: &str) -> String {
    input.replace(
        |c| matches!(c, '\x00'..='\x08' | '\x0b' | '\x0c' | '\x0e'..='\x1f'),
        "",
    )
}
