// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    exit_codes::ConverterExitCode,
    output::{NO_HEADING_TARGET, StderrStyles},
};
use owo_colors::OwoColorize;
use report_converter::errors::{ConfigError, WriteReportError};
use std::error::Error;
use thiserror::Error;
use tracing::error;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that stops a conversion before the converted report is written.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("invalid configuration")]
    Config {
        #[from]
        err: ConfigError,
    },
    #[error("failed to write converted report")]
    WriteReport {
        #[from]
        err: WriteReportError,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::Config { .. } => ConverterExitCode::SETUP_ERROR,
            Self::WriteReport { .. } => ConverterExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match self {
            Self::Config { err } => {
                match err {
                    ConfigError::Read { path, .. } => {
                        error!("failed to read config file `{}`", path.style(styles.bold));
                    }
                    ConfigError::Parse { path, .. } => {
                        error!("failed to parse config file `{}`", path.style(styles.bold));
                    }
                    ConfigError::MissingOption { name } => {
                        error!(
                            "missing required option `{}` (set it on the command line or in a \
                             config file)",
                            name.style(styles.bold)
                        );
                    }
                    ConfigError::InvalidPattern { name, pattern, .. } => {
                        error!(
                            "invalid regex `{}` for `{}`",
                            pattern.style(styles.bold),
                            name.style(styles.bold)
                        );
                    }
                    other => error!("{other}"),
                }
                err.source()
            }
            Self::WriteReport { err } => {
                match err {
                    WriteReportError::Io { path, .. } => {
                        error!("failed to write report to `{}`", path.style(styles.bold));
                    }
                    other => error!("{other}"),
                }
                err.source()
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
