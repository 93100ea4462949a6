// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{ParsedReport, required_attribute, test_case_from_element};
use crate::{errors::ReportParseError, source_index::SourceIndex, xml_tree::XmlElement};
use camino::Utf8Path;
use tracing::debug;

pub(super) fn parse_gtest(
    path: &Utf8Path,
    root: &XmlElement,
    source_index: &SourceIndex,
) -> Result<ParsedReport, ReportParseError> {
    if root.name != "testsuites" {
        return Err(ReportParseError::UnexpectedRoot {
            path: path.to_owned(),
            found: root.name.clone(),
            expected: "`<testsuites>`",
        });
    }

    let mut report = ParsedReport::new(path);

    for suite in root.children_named("testsuite") {
        let suite_name = required_attribute(path, suite, "testsuite", "name")?;

        for element in suite.children_named("testcase") {
            let case_name = required_attribute(path, element, "testcase", "name")?;
            let qualified_name = format!("{suite_name}.{case_name}");

            // The lookup comes first: a test that can't be attributed is dropped without looking
            // at anything else about it.
            let Some(source_path) = source_index.get(&qualified_name) else {
                debug!("in report file `{path}`, no source file declares `{qualified_name}`");
                report.unresolved_tests.push(qualified_name);
                continue;
            };

            let test_case = test_case_from_element(path, qualified_name, element)?;
            report.add_test_case(source_path.as_str(), test_case);
        }
    }

    Ok(report)
}
