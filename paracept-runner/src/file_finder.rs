// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Discovery of whole test files, for splitting by file rather than by test.

use crate::{
    errors::TestFileFinderError,
    helpers::convert_rel_path_to_forward_slash,
    test_id::TestId,
};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::debug;
use walkdir::WalkDir;

/// Finds test files under a directory by file name pattern.
#[derive(Clone, Debug)]
pub struct TestFileFinder {
    project_root: Utf8PathBuf,
    tests_path: Utf8PathBuf,
    patterns: Vec<String>,
    exclude_path: Option<String>,
}

impl TestFileFinder {
    /// The file name patterns used if none are given.
    pub const DEFAULT_PATTERNS: &'static [&'static str] =
        &["*Cept.php", "*Cest.php", "*Test.php", "*.feature"];

    /// The directory name excluded if none is given.
    pub const DEFAULT_EXCLUDE_PATH: &'static str = "vendor";

    /// Creates a new finder for files under `project_root/tests_path`, with the default patterns
    /// and exclusion.
    pub fn new(project_root: impl Into<Utf8PathBuf>, tests_path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            tests_path: tests_path.into(),
            patterns: Self::DEFAULT_PATTERNS
                .iter()
                .map(|p| (*p).to_owned())
                .collect(),
            exclude_path: Some(Self::DEFAULT_EXCLUDE_PATH.to_owned()),
        }
    }

    /// Replaces the file name patterns.
    pub fn set_patterns(
        &mut self,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> &mut Self {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the directory name to skip. An empty name skips nothing.
    pub fn set_exclude_path(&mut self, exclude_path: impl Into<String>) -> &mut Self {
        let exclude_path = exclude_path.into();
        self.exclude_path = (!exclude_path.is_empty()).then_some(exclude_path);
        self
    }

    /// Returns matching files as paths relative to the project root, with forward slashes, sorted.
    pub fn find(&self) -> Result<Vec<TestId>, TestFileFinderError> {
        let patterns = self.build_glob_set()?;
        let root = self.project_root.join(&self.tests_path);

        let mut found = Vec::new();
        for entry in WalkDir::new(&root).follow_links(true) {
            let entry = entry.map_err(|error| TestFileFinderError::Walk {
                path: root.clone(),
                error,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = Utf8Path::from_path(entry.path()).ok_or_else(|| {
                TestFileFinderError::NonUtf8Path {
                    path: entry.path().to_string_lossy().into_owned(),
                }
            })?;
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if !patterns.is_match(file_name) {
                continue;
            }

            let rel_path = path.strip_prefix(&self.project_root).unwrap_or(path);
            if self.is_excluded(rel_path) {
                debug!("skipping excluded test file {rel_path}");
                continue;
            }
            found.push(convert_rel_path_to_forward_slash(rel_path));
        }

        found.sort();
        Ok(found.into_iter().map(|path| TestId::new(path.as_str())).collect())
    }

    fn build_glob_set(&self) -> Result<GlobSet, TestFileFinderError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.patterns {
            let glob = Glob::new(pattern).map_err(|error| TestFileFinderError::InvalidPattern {
                pattern: pattern.clone(),
                error,
            })?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|error| TestFileFinderError::PatternSet { error })
    }

    fn is_excluded(&self, rel_path: &Utf8Path) -> bool {
        let Some(exclude_path) = &self.exclude_path else {
            return false;
        };
        rel_path
            .parent()
            .is_some_and(|parent| parent.components().any(|c| c.as_str() == exclude_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino_tempfile::Utf8TempDir;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn touch(root: &Utf8Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().expect("has parent")).expect("created dirs");
        fs::write(&path, "").expect("created file");
    }

    #[test]
    fn finds_default_patterns() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        for rel in [
            "tests/unit/FooTest.php",
            "tests/acceptance/LoginCest.php",
            "tests/acceptance/SignupCept.php",
            "tests/features/checkout.feature",
            "tests/unit/Helper.php",
            "tests/vendor/lib/VendorTest.php",
            "tests/_support/AcceptanceTester.php",
        ] {
            touch(dir.path(), rel);
        }

        let finder = TestFileFinder::new(dir.path(), "tests");
        let found = finder.find().expect("walk succeeds");
        assert_eq!(
            found,
            vec![
                TestId::from("tests/acceptance/LoginCest.php"),
                TestId::from("tests/acceptance/SignupCept.php"),
                TestId::from("tests/features/checkout.feature"),
                TestId::from("tests/unit/FooTest.php"),
            ]
        );
    }

    #[test]
    fn custom_patterns_and_no_exclusion() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        touch(dir.path(), "tests/vendor/VendorSpec.php");
        touch(dir.path(), "tests/unit/FooTest.php");

        let mut finder = TestFileFinder::new(dir.path(), "tests");
        finder.set_patterns(["*Spec.php"]).set_exclude_path("");
        assert_eq!(
            finder.find().expect("walk succeeds"),
            vec![TestId::from("tests/vendor/VendorSpec.php")]
        );
    }

    #[test]
    fn invalid_pattern() {
        let dir = Utf8TempDir::new().expect("created temp dir");
        let mut finder = TestFileFinder::new(dir.path(), "");
        finder.set_patterns(["[unclosed"]);
        let err = finder.find().expect_err("invalid glob");
        assert!(
            matches!(err, TestFileFinderError::InvalidPattern { .. }),
            "{err:?}"
        );
    }
}
