// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merging parsed reports by source file.

use crate::parse::ParsedReport;
use generic_test_report::TestExecutions;

/// Merges parsed reports into a single generic test execution report.
///
/// Test cases for the same source file are appended to one group, even when they come from
/// different report files. Nothing is deduplicated: a test that appears twice, for example because
/// it was retried, is recorded twice.
#[derive(Clone, Debug, Default)]
pub struct TestExecutionAggregator {
    report: TestExecutions,
    merged_reports: usize,
}

impl TestExecutionAggregator {
    /// Creates an aggregator with no test cases.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every test case from `parsed` to the report.
    pub fn merge(&mut self, parsed: ParsedReport) {
        for (source_path, test_cases) in parsed.groups {
            self.report.add_test_cases(source_path, test_cases);
        }
        self.merged_reports += 1;
    }

    /// Returns the number of reports merged so far.
    pub fn merged_reports(&self) -> usize {
        self.merged_reports
    }

    /// Consumes the aggregator, returning the merged report.
    pub fn into_report(self) -> TestExecutions {
        self.report
    }
}
