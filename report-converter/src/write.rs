// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Writing the converted report to disk.

use crate::errors::WriteReportError;
use atomicwrites::{AtomicFile, OverwriteBehavior};
use camino::Utf8Path;
use generic_test_report::TestExecutions;

/// Writes `report` to `path`, replacing any existing file.
///
/// The report is written to a temporary file in the same directory and then renamed over `path`,
/// so a failed write leaves any previous file in place. The parent directory must already exist.
pub fn write_report(path: &Utf8Path, report: &TestExecutions) -> Result<(), WriteReportError> {
    // The temporary file is created next to the output, so a bare file name needs a directory.
    let absolute_path = std::path::absolute(path).map_err(|error| WriteReportError::Io {
        path: path.to_owned(),
        error,
    })?;

    AtomicFile::new(absolute_path, OverwriteBehavior::AllowOverwrite)
        .write(|file| report.serialize(file))
        .map_err(|error| match error {
            atomicwrites::Error::Internal(error) => WriteReportError::Io {
                path: path.to_owned(),
                error,
            },
            atomicwrites::Error::User(error) => WriteReportError::Serialize {
                path: path.to_owned(),
                error,
            },
        })
}
