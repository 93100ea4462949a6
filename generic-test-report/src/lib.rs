// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Build and write generic test execution reports.
//!
//! The generic test execution format is a small XML dialect understood by code-quality platforms
//! such as SonarQube. A report groups test cases by the source file that declares them:
//!
//! ```xml
//! <testExecutions version="1">
//!     <file path="src/foo_test.cpp">
//!         <testCase name="Foo.bar" duration="5"/>
//!     </file>
//! </testExecutions>
//! ```

mod errors;
mod report;
mod serialize;

pub use errors::*;
pub use report::*;
