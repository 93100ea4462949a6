// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Locate Google Test declarations in source code.
//!
//! Google Test's XML output doesn't record which source file a test came from, so the file has to
//! be recovered by looking for `TEST(Suite, Case)`-style macro invocations in the source tree.

use crate::scan::find_matching_files;
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::{collections::HashMap, sync::LazyLock};
use tracing::{debug, warn};

/// Matches `TEST(Suite, Case)`, `TEST_F(Fixture, Case)`, `TEST_P(...)` and similar.
///
/// The match isn't anchored, so declarations in comments or after other code on the same line are
/// picked up too. Macro invocations that span several lines are not recognized.
static GTEST_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"TEST.*\((.+),(.+)\)").expect("gtest declaration regex is valid")
});

/// A map from qualified test names (`Suite.Case`) to the source file declaring them.
#[derive(Clone, Debug, Default)]
pub struct SourceIndex {
    tests: HashMap<String, Utf8PathBuf>,
}

impl SourceIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans every file under `src_root` whose name matches `file_name_pattern`.
    ///
    /// Files that can't be read are skipped with a warning. If the same test is declared in more
    /// than one file, the file scanned last wins.
    pub fn build(src_root: &Utf8Path, file_name_pattern: &Regex) -> Self {
        let mut index = Self::new();
        let mut file_count = 0;

        for path in find_matching_files(src_root, file_name_pattern) {
            match std::fs::read(&path) {
                Ok(contents) => {
                    index.add_source(&path, &String::from_utf8_lossy(&contents));
                    file_count += 1;
                }
                Err(error) => {
                    warn!("error reading source file `{path}`, skipping it: {error}");
                }
            }
        }

        debug!(
            "indexed {} gtest declarations in {file_count} source files under `{src_root}`",
            index.len()
        );
        index
    }

    /// Records every test declared in `contents`, as found in the file at `path`.
    pub fn add_source(&mut self, path: &Utf8Path, contents: &str) {
        for line in contents.lines() {
            let Some(captures) = GTEST_DECLARATION.captures(line) else {
                continue;
            };
            let name = format!("{}.{}", captures[1].trim(), captures[2].trim());

            if let Some(previous) = self.tests.get(&name)
                && previous != path
            {
                debug!(
                    "test `{name}` is declared in both `{previous}` and `{path}`, using the latter"
                );
            }
            self.tests.insert(name, path.to_owned());
        }
    }

    /// Returns the source file declaring the test with the given qualified name.
    pub fn get(&self, name: &str) -> Option<&Utf8Path> {
        self.tests.get(name).map(Utf8PathBuf::as_path)
    }

    /// Returns the number of distinct tests in the index.
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// Returns true if no tests were found.
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }
}
