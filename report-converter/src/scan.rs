// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recursive file discovery by file name.

use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Returns every file under `root` whose file name matches `file_name_pattern`.
///
/// The pattern is searched for anywhere in the file name, not matched against the whole name or
/// against the rest of the path. Paths are absolute: a relative `root` is resolved against the
/// current directory, without resolving symlinks.
///
/// Entries are walked in file name order so that repeated runs over the same tree agree, but
/// callers must not rely on any particular order. A `root` that doesn't exist yields nothing.
pub fn find_matching_files<'a>(
    root: &Utf8Path,
    file_name_pattern: &'a Regex,
) -> impl Iterator<Item = Utf8PathBuf> + 'a {
    let root = absolute_root(root);

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(move |entry| {
            let entry = match entry {
                Ok(entry) => entry,
                Err(error) => {
                    debug!("skipping directory entry: {error}");
                    return None;
                }
            };

            // Symlinks aren't followed while walking, but a symlink to a file is still a file.
            let is_file = entry.file_type().is_file()
                || (entry.path_is_symlink() && entry.path().is_file());
            if !is_file {
                return None;
            }

            let path = match Utf8PathBuf::from_path_buf(entry.into_path()) {
                Ok(path) => path,
                Err(path) => {
                    warn!("skipping non-UTF-8 path `{}`", path.display());
                    return None;
                }
            };

            let file_name = path.file_name()?;
            file_name_pattern.is_match(file_name).then_some(path)
        })
}

fn absolute_root(root: &Utf8Path) -> Utf8PathBuf {
    match std::path::absolute(root).map(Utf8PathBuf::try_from) {
        Ok(Ok(absolute)) => absolute,
        _ => {
            debug!("could not make `{root}` absolute, walking it as is");
            root.to_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::tempdir;
    use pretty_assertions::assert_eq;

    fn touch(root: &Utf8Path, rel_path: &str) {
        let path = root.join(rel_path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "").unwrap();
    }

    #[test]
    fn finds_files_recursively_by_name() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "TEST-a.xml");
        touch(dir.path(), "nested/deeper/TEST-b.xml");
        touch(dir.path(), "nested/notes.txt");
        touch(dir.path(), "TEST-dir.xml/inner.txt");

        let pattern = Regex::new(r"^TEST-.*\.xml$").unwrap();
        let found: Vec<_> = find_matching_files(dir.path(), &pattern).collect();

        assert_eq!(
            found,
            vec![
                dir.path().join("TEST-a.xml"),
                dir.path().join("nested/deeper/TEST-b.xml"),
            ],
            "directories are not yielded even if their name matches"
        );
        assert!(found.iter().all(|path| path.is_absolute()));
    }

    #[test]
    fn pattern_is_searched_in_file_name_only() {
        let dir = tempdir().unwrap();
        touch(dir.path(), "reports/summary.json");
        touch(dir.path(), "other/reports.xml");

        let pattern = Regex::new("reports").unwrap();
        let found: Vec<_> = find_matching_files(dir.path(), &pattern).collect();

        assert_eq!(found, vec![dir.path().join("other/reports.xml")]);
    }

    #[test]
    fn missing_root_yields_nothing() {
        let dir = tempdir().unwrap();
        let pattern = Regex::new(".*").unwrap();

        let found: Vec<_> = find_matching_files(&dir.path().join("missing"), &pattern).collect();
        assert_eq!(found, Vec::<Utf8PathBuf>::new());
    }
}
