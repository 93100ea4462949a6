// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by the report converter.

use camino::{Utf8Path, Utf8PathBuf};
use generic_test_report::SerializeError;
use std::{error::Error, fmt, io};
use thiserror::Error;

/// An error that occurred while reading an XML document into an element tree.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum XmlReadError {
    /// The XML tokenizer rejected the input.
    #[error("malformed XML")]
    Syntax(#[from] quick_xml::Error),

    /// The document contains no elements at all.
    #[error("document has no root element")]
    NoRootElement,

    /// A second top-level element was found after the root element was closed.
    #[error("document has more than one root element (found `<{name}>` after the root)")]
    MultipleRootElements {
        /// The name of the extra element.
        name: String,
    },

    /// The document ended while an element was still open.
    #[error("element `<{name}>` is never closed")]
    UnclosedElement {
        /// The name of the innermost open element.
        name: String,
    },

    /// A closing tag was found with no matching opening tag.
    #[error("unexpected closing tag `</{name}>`")]
    UnexpectedEndTag {
        /// The name in the closing tag.
        name: String,
    },
}

/// An error that occurred while parsing a single report file.
///
/// A report file that fails to parse contributes nothing to the converted output.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportParseError {
    /// The report file could not be read.
    #[error("error reading report file `{path}`")]
    Read {
        /// The path to the report file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The report file is not well-formed XML.
    #[error("report file `{path}` is not well-formed XML")]
    Xml {
        /// The path to the report file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: XmlReadError,
    },

    /// The root element is not one this report type understands.
    #[error("report file `{path}` has root element `<{found}>`, expected {expected}")]
    UnexpectedRoot {
        /// The path to the report file.
        path: Utf8PathBuf,

        /// The root element that was found.
        found: String,

        /// A description of the accepted root elements.
        expected: &'static str,
    },

    /// An element is missing an attribute required to identify a test.
    #[error("in report file `{path}`, a `<{element}>` element is missing the `{attribute}` attribute")]
    MissingAttribute {
        /// The path to the report file.
        path: Utf8PathBuf,

        /// The element missing the attribute.
        element: &'static str,

        /// The missing attribute.
        attribute: &'static str,
    },

    /// A test case's `time` attribute isn't a non-negative number of seconds.
    #[error("in report file `{path}`, test case `{test_name}` has invalid time `{time}`")]
    InvalidTime {
        /// The path to the report file.
        path: Utf8PathBuf,

        /// The qualified name of the test case.
        test_name: String,

        /// The value of the `time` attribute.
        time: String,
    },
}

impl ReportParseError {
    /// Returns the path to the report file that failed to parse.
    pub fn path(&self) -> &Utf8Path {
        match self {
            Self::Read { path, .. }
            | Self::Xml { path, .. }
            | Self::UnexpectedRoot { path, .. }
            | Self::MissingAttribute { path, .. }
            | Self::InvalidTime { path, .. } => path,
        }
    }
}

/// An error that occurred while resolving the converter configuration.
///
/// All of these are detected before any report is scanned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("error reading config file `{path}`")]
    Read {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The config file is not valid TOML, or has values of the wrong type.
    #[error("failed to parse config file `{path}`")]
    Parse {
        /// The path to the config file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },

    /// A required option was set neither on the command line nor in the config file.
    #[error("missing required option `{name}`")]
    MissingOption {
        /// The command-line name of the option.
        name: &'static str,
    },

    /// The report type is gtest, but the source tree to cross-reference wasn't specified.
    #[error(
        "for gtest reports, the gtest source folder and gtest source file name pattern are \
         required (missing: {})",
        .missing.join(", ")
    )]
    MissingGtestOptions {
        /// The command-line names of the missing options.
        missing: Vec<&'static str>,
    },

    /// A file name pattern is not a valid regular expression.
    #[error("invalid regex `{pattern}` for `{name}`")]
    InvalidPattern {
        /// The command-line name of the option.
        name: &'static str,

        /// The pattern as specified.
        pattern: String,

        /// The underlying error.
        #[source]
        error: Box<regex::Error>,
    },
}

/// An error that occurred while writing the converted report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteReportError {
    /// The output file could not be created or replaced.
    #[error("error writing report to `{path}`")]
    Io {
        /// The output path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The report could not be serialized.
    #[error("error serializing report for `{path}`")]
    Serialize {
        /// The output path.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: SerializeError,
    },
}

/// Displays an error along with its chain of causes.
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: Error> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let Some(mut cause) = self.error.source() else {
            return Ok(());
        };

        write!(f, "\n  caused by:")?;
        loop {
            write!(f, "\n  - {cause}")?;
            match cause.source() {
                Some(next) => cause = next,
                None => return Ok(()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_error_chain() {
        let error = ReportParseError::Xml {
            path: "reports/a.xml".into(),
            error: XmlReadError::UnclosedElement {
                name: "testsuite".to_owned(),
            },
        };
        assert_eq!(
            DisplayErrorChain::new(&error).to_string(),
            "report file `reports/a.xml` is not well-formed XML\n  \
             caused by:\n  \
             - element `<testsuite>` is never closed"
        );
        assert_eq!(error.path(), Utf8Path::new("reports/a.xml"));

        let error = ConfigError::MissingOption {
            name: "--report_type",
        };
        assert_eq!(
            DisplayErrorChain::new(&error).to_string(),
            "missing required option `--report_type`"
        );
    }
}
