// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for converting JUnit and Google Test XML reports into a single generic test
//! execution report.
//!
//! The basic flow is:
//!
//! 1. Resolve a [`ConverterConfig`](config::ConverterConfig) from explicit options and an
//!    optional config file.
//! 2. Run a [`ReportConverter`](convert::ReportConverter), which scans for report files, parses
//!    each one independently and merges the results by source file.
//! 3. Write the merged report with [`write_report`](write::write_report).

pub mod aggregator;
pub mod config;
pub mod convert;
pub mod errors;
pub mod parse;
pub mod scan;
pub mod source_index;
pub mod write;
mod xml_tree;
