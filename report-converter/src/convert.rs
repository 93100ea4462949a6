// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversion pipeline: scan, parse, aggregate.

use crate::{
    aggregator::TestExecutionAggregator,
    config::ConverterConfig,
    errors::DisplayErrorChain,
    parse::ReportParser,
    scan::find_matching_files,
    source_index::SourceIndex,
};
use generic_test_report::TestExecutions;
use std::fmt;
use tracing::{debug, info, warn};

/// Runs a conversion for a resolved configuration.
#[derive(Clone, Copy, Debug)]
pub struct ReportConverter<'cfg> {
    config: &'cfg ConverterConfig,
}

impl<'cfg> ReportConverter<'cfg> {
    /// Creates a new converter.
    pub fn new(config: &'cfg ConverterConfig) -> Self {
        Self { config }
    }

    /// Finds, parses and merges every matching report file.
    ///
    /// Report files that can't be read or parsed are logged and skipped, so this never fails.
    /// Writing the result is left to the caller.
    pub fn convert(&self) -> ConvertOutcome {
        let config = self.config;

        // Built once, before any report is parsed.
        let source_index = config
            .gtest
            .as_ref()
            .map(|gtest| SourceIndex::build(&gtest.src_folder, &gtest.src_pattern));
        let parser = match &source_index {
            Some(source_index) => ReportParser::Gtest { source_index },
            None => ReportParser::Junit,
        };

        if !config.search_folder.is_dir() {
            warn!(
                "search folder `{}` does not exist or is not a directory",
                config.search_folder
            );
        }

        let mut aggregator = TestExecutionAggregator::new();
        let mut summary = ConvertSummary::default();

        for path in find_matching_files(&config.search_folder, &config.report_pattern) {
            summary.reports_found += 1;
            debug!("parsing {} report file `{path}`", config.report_type);

            let parsed = match parser.parse_file(&path) {
                Ok(parsed) => parsed,
                Err(error) => {
                    warn!(
                        "can't parse report file `{}`, skipping it: {}",
                        error.path(),
                        DisplayErrorChain::new(&error)
                    );
                    summary.reports_skipped += 1;
                    continue;
                }
            };

            for name in &parsed.unresolved_tests {
                warn!("couldn't find test case `{name}` in source code, skipping it");
            }
            summary.unresolved_tests += parsed.unresolved_tests.len();
            summary.test_cases += parsed.test_case_count();
            aggregator.merge(parsed);
        }

        summary.reports_parsed = aggregator.merged_reports();
        if summary.reports_found == 0 {
            warn!(
                "no report files matching `{}` found under `{}`",
                config.report_pattern, config.search_folder
            );
        }
        info!("{summary}");

        ConvertOutcome {
            report: aggregator.into_report(),
            summary,
        }
    }
}

/// The result of a conversion.
#[derive(Clone, Debug)]
pub struct ConvertOutcome {
    /// The merged report, ready to be written.
    pub report: TestExecutions,

    /// Counts describing the run.
    pub summary: ConvertSummary,
}

/// Counts describing a conversion run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConvertSummary {
    /// Report files whose names matched the pattern.
    pub reports_found: usize,

    /// Report files that were parsed and merged.
    pub reports_parsed: usize,

    /// Report files that couldn't be read or parsed.
    pub reports_skipped: usize,

    /// Test cases written to the output.
    pub test_cases: usize,

    /// Google Test test cases dropped because no source file declares them.
    pub unresolved_tests: usize,
}

impl fmt::Display for ConvertSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "converted {} test cases from {} of {} report files",
            self.test_cases, self.reports_parsed, self.reports_found
        )?;
        if self.reports_skipped > 0 {
            write!(f, " ({} skipped)", self.reports_skipped)?;
        }
        if self.unresolved_tests > 0 {
            write!(
                f,
                ", {} test cases not found in source code",
                self.unresolved_tests
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GtestSourceConfig, ReportType};
    use camino::Utf8Path;
    use camino_tempfile::{Utf8TempDir, tempdir};
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use regex::Regex;

    fn write(root: &Utf8Path, rel_path: &str, contents: &str) {
        let path = root.join(rel_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn junit_config(dir: &Utf8TempDir) -> ConverterConfig {
        ConverterConfig {
            report_type: ReportType::Junit,
            search_folder: dir.path().join("reports"),
            report_pattern: Regex::new(r"^TEST-.*\.xml$").unwrap(),
            output: dir.path().join("out.xml"),
            gtest: None,
        }
    }

    #[test]
    fn malformed_report_is_skipped() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "reports/TEST-a.xml",
            indoc! {r#"
                <testsuite name="A">
                    <testcase name="t1" classname="A" file="a.cpp" time="0.5"/>
                </testsuite>
            "#},
        );
        write(dir.path(), "reports/TEST-b.xml", "<testsuite><testcase");
        write(
            dir.path(),
            "reports/nested/TEST-c.xml",
            indoc! {r#"
                <testsuite name="C">
                    <testcase name="t2" classname="A" file="a.cpp" time="0.25">
                        <skipped/>
                    </testcase>
                </testsuite>
            "#},
        );
        write(dir.path(), "reports/ignored.xml", "<not-a-report/>");

        let config = junit_config(&dir);
        let outcome = ReportConverter::new(&config).convert();

        assert_eq!(
            outcome.summary,
            ConvertSummary {
                reports_found: 3,
                reports_parsed: 2,
                reports_skipped: 1,
                test_cases: 2,
                unresolved_tests: 0,
            }
        );
        let names: Vec<_> = outcome.report.files["a.cpp"]
            .test_cases
            .iter()
            .map(|test_case| test_case.name.as_str())
            .collect();
        assert_eq!(names, ["A.t1", "A.t2"]);
        assert_eq!(
            outcome.summary.to_string(),
            "converted 2 test cases from 2 of 3 report files (1 skipped)"
        );
    }

    #[test]
    fn missing_search_folder_yields_empty_report() {
        let dir = tempdir().unwrap();
        let config = junit_config(&dir);

        let outcome = ReportConverter::new(&config).convert();
        assert_eq!(outcome.summary, ConvertSummary::default());
        assert_eq!(outcome.report, TestExecutions::new());
    }

    #[test]
    fn gtest_reports_are_resolved_against_sources() {
        let dir = tempdir().unwrap();
        write(
            dir.path(),
            "src/foo_test.cpp",
            indoc! {"
                TEST(Foo, t1) {
                  EXPECT_TRUE(true);
                }
            "},
        );
        write(
            dir.path(),
            "reports/test_detail.xml",
            indoc! {r#"
                <testsuites>
                    <testsuite name="Foo">
                        <testcase name="t1" time="0.002"/>
                        <testcase name="gone" time="0.003"/>
                    </testsuite>
                </testsuites>
            "#},
        );

        let config = ConverterConfig {
            report_type: ReportType::Gtest,
            search_folder: dir.path().join("reports"),
            report_pattern: Regex::new(r"^test_detail.*\.xml$").unwrap(),
            output: dir.path().join("out.xml"),
            gtest: Some(GtestSourceConfig {
                src_folder: dir.path().join("src"),
                src_pattern: Regex::new(r"_test\.cpp$").unwrap(),
            }),
        };
        let outcome = ReportConverter::new(&config).convert();

        assert_eq!(outcome.summary.test_cases, 1);
        assert_eq!(outcome.summary.unresolved_tests, 1);

        let source_path = dir.path().join("src/foo_test.cpp");
        let file = outcome
            .report
            .file(source_path.as_str())
            .expect("test case grouped under its source file");
        assert_eq!(file.test_cases.len(), 1);
        assert_eq!(file.test_cases[0].name, "Foo.t1");
        assert_eq!(file.test_cases[0].duration.as_millis(), 2);
    }

    #[test]
    fn converting_twice_gives_the_same_report() {
        let dir = tempdir().unwrap();
        // Bar.t2 is declared in two files; the one scanned last wins every time.
        write(dir.path(), "src/a_test.cpp", "TEST(Foo, t1) {}\nTEST(Bar, t2) {}\n");
        write(dir.path(), "src/b_test.cpp", "TEST_F(Bar, t2) {}\n");
        write(
            dir.path(),
            "reports/test_detail_1.xml",
            indoc! {r#"
                <testsuites>
                    <testsuite name="Foo">
                        <testcase name="t1" time="0.001"/>
                    </testsuite>
                    <testsuite name="Bar">
                        <testcase name="t2" time="0.002">
                            <failure message="a&#10;b">details</failure>
                        </testcase>
                    </testsuite>
                </testsuites>
            "#},
        );
        write(
            dir.path(),
            "reports/nested/test_detail_2.xml",
            indoc! {r#"
                <testsuites>
                    <testsuite name="Bar">
                        <testcase name="t2" time="0.003"/>
                        <testcase name="missing" time="0.004"/>
                    </testsuite>
                </testsuites>
            "#},
        );

        let config = ConverterConfig {
            report_type: ReportType::Gtest,
            search_folder: dir.path().join("reports"),
            report_pattern: Regex::new("^test_detail").unwrap(),
            output: dir.path().join("out.xml"),
            gtest: Some(GtestSourceConfig {
                src_folder: dir.path().join("src"),
                src_pattern: Regex::new(r"_test\.cpp$").unwrap(),
            }),
        };
        let first = ReportConverter::new(&config).convert();
        let second = ReportConverter::new(&config).convert();

        assert_eq!(first.report, second.report);
        assert_eq!(first.summary, second.summary);
        assert_eq!(
            first.report.to_string().unwrap(),
            second.report.to_string().unwrap()
        );

        let b_test = dir.path().join("src/b_test.cpp");
        assert_eq!(first.report.files.len(), 2);
        assert_eq!(
            first
                .report
                .file(b_test.as_str())
                .map(|file| file.test_cases.len()),
            Some(2)
        );
        assert_eq!(first.summary.unresolved_tests, 1);
    }
}
