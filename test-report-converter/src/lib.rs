// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Convert JUnit and Google Test XML reports into a single generic test execution report, as
//! consumed by SonarQube.
//!
//! The conversion itself lives in the `report-converter` crate. This crate is the command-line
//! front end.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod exit_codes;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
pub use exit_codes::ConverterExitCode;
