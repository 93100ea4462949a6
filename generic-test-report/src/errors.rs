// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use thiserror::Error;

/// An error that occurs while serializing a [`TestExecutions`](crate::TestExecutions) report.
///
/// Returned by [`TestExecutions::serialize`](crate::TestExecutions::serialize) and
/// [`TestExecutions::to_string`](crate::TestExecutions::to_string).
#[derive(Debug, Error)]
#[error("error serializing test execution report")]
pub struct SerializeError {
    #[from]
    inner: quick_xml::Error,
}
