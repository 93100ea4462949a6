// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    exit_codes::ConverterExitCode,
    output::{OutputContext, OutputOpts, clap_styles},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, ValueEnum};
use report_converter::{
    config::{ConfigOverrides, ConverterConfig, ReportType},
    convert::ReportConverter,
    write::write_report,
};
use tracing::{debug, info};

/// Convert JUnit or Google Test XML reports into a generic test execution report.
///
/// Every report file under the search folder whose name matches the report pattern is parsed, and
/// the test cases from all of them are merged by source file into a single XML report in
/// SonarQube's generic test execution format. Report files that can't be parsed are skipped with a
/// warning.
///
/// Options not given on the command line are read from the config file, if one is specified.
#[derive(Debug, Parser)]
#[command(version, styles = clap_styles::style())]
pub struct TestReportConverterApp {
    #[command(flatten)]
    report_opts: ReportOpts,

    #[command(flatten)]
    gtest_opts: GtestOpts,

    /// TOML file to read unspecified options from
    #[arg(long, value_name = "PATH", env = "TEST_REPORT_CONVERTER_CONFIG")]
    config_file: Option<Utf8PathBuf>,

    #[command(flatten)]
    output: OutputOpts,
}

impl TestReportConverterApp {
    /// Initializes logging and colors for the rest of the run.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code on success.
    pub fn exec(self) -> Result<i32, ExpectedError> {
        let overrides = ConfigOverrides {
            report_type: self.report_opts.report_type.map(ReportType::from),
            search_folder: self.report_opts.search_folder,
            report_pattern: self.report_opts.report_pattern,
            output: self.report_opts.output,
            gtest_src_folder: self.gtest_opts.gtest_src_folder,
            gtest_src_pattern: self.gtest_opts.gtest_src_pattern,
        };
        let config = ConverterConfig::resolve(&overrides, self.config_file.as_deref())?;
        debug!("resolved configuration: {config:?}");

        let outcome = ReportConverter::new(&config).convert();

        write_report(&config.output, &outcome.report)?;
        info!(
            "wrote {} test cases for {} source files to `{}`",
            outcome.report.test_case_count(),
            outcome.report.files.len(),
            config.output
        );

        Ok(ConverterExitCode::OK)
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "REPORT OPTIONS")]
struct ReportOpts {
    /// Format of the input report files [required]
    #[arg(
        short = 't',
        long = "report_type",
        visible_alias = "report-type",
        value_enum,
        value_name = "TYPE"
    )]
    report_type: Option<ReportTypeOpt>,

    /// Directory to search recursively for report files [required]
    #[arg(
        short = 'D',
        long = "search_folder",
        visible_alias = "search-folder",
        value_name = "DIR"
    )]
    search_folder: Option<Utf8PathBuf>,

    /// Regex searched for in the file name of each candidate report file [required]
    #[arg(
        short = 'P',
        long = "report_pattern",
        visible_alias = "report-pattern",
        value_name = "REGEX"
    )]
    report_pattern: Option<String>,

    /// Path to write the converted report to [required]
    #[arg(short = 'o', long, value_name = "PATH")]
    output: Option<Utf8PathBuf>,
}

#[derive(Debug, Args)]
#[command(next_help_heading = "GTEST OPTIONS")]
struct GtestOpts {
    /// Root of the source tree declaring the tests [required for gtest]
    #[arg(
        long = "gtest_src_folder",
        visible_alias = "gtest-src-folder",
        value_name = "DIR"
    )]
    gtest_src_folder: Option<Utf8PathBuf>,

    /// Regex searched for in the file name of each candidate source file [required for gtest]
    #[arg(
        long = "gtest_src_pattern",
        visible_alias = "gtest-src-pattern",
        value_name = "REGEX"
    )]
    gtest_src_pattern: Option<String>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ReportTypeOpt {
    /// JUnit XML; each test case names its source file
    Junit,

    /// Google Test XML; source files are found by scanning for test declarations
    Gtest,
}

impl From<ReportTypeOpt> for ReportType {
    fn from(opt: ReportTypeOpt) -> Self {
        match opt {
            ReportTypeOpt::Junit => ReportType::Junit,
            ReportTypeOpt::Gtest => ReportType::Gtest,
        }
    }
}
