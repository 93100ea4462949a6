// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `TestExecutions` report.

use crate::{FileExecution, SCHEMA_VERSION, TestCase, TestExecutions, TestMessage};
use quick_xml::{
    Writer,
    escape::escape,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::Attribute},
    name::QName,
};
use std::{borrow::Cow, io, time::Duration};

static TEST_EXECUTIONS_TAG: &str = "testExecutions";
static FILE_TAG: &str = "file";
static TEST_CASE_TAG: &str = "testCase";

pub(crate) fn serialize_report(
    report: &TestExecutions,
    writer: impl io::Write,
) -> quick_xml::Result<()> {
    let mut writer = Writer::new_with_indent(writer, b' ', 4);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()
}

fn serialize_report_impl(
    report: &TestExecutions,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let TestExecutions { files } = report;

    let version = SCHEMA_VERSION.to_string();
    let mut root_tag = BytesStart::new(TEST_EXECUTIONS_TAG);
    root_tag.push_attribute(("version", version.as_str()));

    if files.is_empty() {
        writer.write_event(Event::Empty(root_tag))?;
    } else {
        writer.write_event(Event::Start(root_tag))?;
        for file in files.values() {
            serialize_file(file, writer)?;
        }
        serialize_end_tag(TEST_EXECUTIONS_TAG, writer)?;
    }

    writer.write_event(Event::Eof)
}

fn serialize_file(
    file: &FileExecution,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let FileExecution { path, test_cases } = file;

    let mut file_tag = BytesStart::new(FILE_TAG);
    push_attribute(&mut file_tag, "path", path);

    if test_cases.is_empty() {
        return writer.write_event(Event::Empty(file_tag));
    }

    writer.write_event(Event::Start(file_tag))?;
    for test_case in test_cases {
        serialize_test_case(test_case, writer)?;
    }
    serialize_end_tag(FILE_TAG, writer)
}

fn serialize_test_case(
    test_case: &TestCase,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let TestCase {
        name,
        duration,
        message,
    } = test_case;

    let duration = serialize_duration(duration);
    let mut test_case_tag = BytesStart::new(TEST_CASE_TAG);
    push_attribute(&mut test_case_tag, "name", name);
    test_case_tag.push_attribute(("duration", duration.as_str()));

    match message {
        Some(message) => {
            writer.write_event(Event::Start(test_case_tag))?;
            serialize_message(message, writer)?;
            serialize_end_tag(TEST_CASE_TAG, writer)
        }
        None => writer.write_event(Event::Empty(test_case_tag)),
    }
}

fn serialize_message(
    message: &TestMessage,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let tag_name = message.outcome().tag_name();

    // The message attribute is mandatory in the generic format, even when empty.
    let mut tag = BytesStart::new(tag_name);
    push_attribute(&mut tag, "message", message.short_message());

    match message.long_message() {
        "" => writer.write_event(Event::Empty(tag)),
        long_message => {
            writer.write_event(Event::Start(tag))?;
            writer.write_event(Event::Text(BytesText::new(long_message)))?;
            serialize_end_tag(tag_name, writer)
        }
    }
}

fn serialize_end_tag(
    tag_name: &'static str,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    writer.write_event(Event::End(BytesEnd::new(tag_name)))
}

fn push_attribute(tag: &mut BytesStart<'_>, key: &str, value: &str) {
    let value = escape_attribute_value(value);
    tag.push_attribute(Attribute {
        key: QName(key.as_bytes()),
        value: Cow::Borrowed(value.as_bytes()),
    });
}

/// Escapes an attribute value, including the whitespace characters that attribute value
/// normalization would otherwise turn into spaces when the document is read back.
fn escape_attribute_value(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(['\n', '\r', '\t']) {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

// Serialize durations as whole milliseconds, truncating any remainder.
fn serialize_duration(duration: &Duration) -> String {
    duration.as_millis().to_string()
}
