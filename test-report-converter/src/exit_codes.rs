// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `test-report-converter`.
///
/// Report files that fail to parse are skipped and don't affect the exit code. Command-line usage
/// errors exit with code 2, and unknown/unexpected failures will always result in exit code 1.
pub enum ConverterExitCode {}

impl ConverterExitCode {
    /// The converted report was written.
    pub const OK: i32 = 0;

    /// The options were incomplete or invalid, so no conversion was attempted.
    pub const SETUP_ERROR: i32 = 96;

    /// The converted report could not be written.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
