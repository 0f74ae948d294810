// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test identifiers, and the sources they come from.

use crate::errors::TestManifestError;
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{borrow::Borrow, fmt, fs};

/// The identifier of a single test: `<file-or-class>:<method>`.
///
/// Identifiers are opaque apart from [`Self::file`] and [`Self::method`], which split on the last
/// `:` and are only used to normalize dependency names.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TestId(SmolStr);

impl TestId {
    /// Creates a new test identifier.
    pub fn new(id: impl Into<SmolStr>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The part before the last `:`, if there is one.
    pub fn file(&self) -> Option<&str> {
        self.0.rsplit_once(':').map(|(file, _)| file)
    }

    /// The part after the last `:`, or the whole identifier if there is no `:`.
    pub fn method(&self) -> &str {
        match self.0.rsplit_once(':') {
            Some((_, method)) => method,
            None => &self.0,
        }
    }
}

impl fmt::Display for TestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TestId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl Borrow<str> for TestId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A source of tests, along with their tags and declared dependencies.
///
/// This is the seam between paracept and whatever loads tests: a manifest file, a directory
/// walk, or a test framework.
pub trait TestSource {
    /// Returns every test identifier, in declaration order.
    fn test_ids(&self) -> Vec<TestId>;

    /// Returns the group tags for a test. Unknown tests have no tags.
    fn tags(&self, id: &TestId) -> &[SmolStr];

    /// Returns the dependencies a test declares, as written. These may be shorthand and are
    /// normalized by the [`DependencyResolver`](crate::resolver::DependencyResolver).
    fn dependencies(&self, id: &TestId) -> &[SmolStr];
}

/// An in-memory [`TestSource`], usually loaded from a file.
///
/// Two on-disk forms are understood:
///
/// * `.json` files hold an array of `{ "id": ..., "groups": [...], "depends": [...] }` objects,
///   where `groups` and `depends` are optional.
/// * Any other file is a plain list with one identifier per line. Blank lines are skipped.
#[derive(Clone, Debug, Default)]
pub struct TestManifest {
    entries: IndexMap<TestId, ManifestEntry>,
}

#[derive(Clone, Debug, Default)]
struct ManifestEntry {
    groups: Vec<SmolStr>,
    depends: Vec<SmolStr>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestRecord {
    id: TestId,
    #[serde(default)]
    groups: Vec<SmolStr>,
    #[serde(default)]
    depends: Vec<SmolStr>,
}

impl TestManifest {
    /// Creates a new, empty manifest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a manifest from disk. The format is chosen based on the extension.
    pub fn from_path(path: &Utf8Path) -> Result<Self, TestManifestError> {
        let contents = fs::read_to_string(path).map_err(|error| TestManifestError::Read {
            path: path.to_owned(),
            error,
        })?;

        if path.extension() == Some("json") {
            Self::from_json_str(&contents).map_err(|error| TestManifestError::Parse {
                path: path.to_owned(),
                error,
            })
        } else {
            Ok(Self::from_lines(&contents))
        }
    }

    /// Parses the JSON form of a manifest.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<ManifestRecord> = serde_json::from_str(input)?;
        let mut manifest = Self::new();
        for record in records {
            manifest.add_test(record.id, record.groups, record.depends);
        }
        Ok(manifest)
    }

    /// Parses the plain form of a manifest: one identifier per line.
    pub fn from_lines(input: &str) -> Self {
        Self::from_ids(
            input
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(TestId::from),
        )
    }

    /// Creates a manifest of tests with no tags and no dependencies.
    pub fn from_ids(ids: impl IntoIterator<Item = TestId>) -> Self {
        let mut manifest = Self::new();
        for id in ids {
            manifest.add_test(id, Vec::<SmolStr>::new(), Vec::<SmolStr>::new());
        }
        manifest
    }

    /// Adds a test. Adding the same identifier twice replaces its tags and dependencies but keeps
    /// its original position.
    pub fn add_test(
        &mut self,
        id: impl Into<TestId>,
        groups: impl IntoIterator<Item = impl Into<SmolStr>>,
        depends: impl IntoIterator<Item = impl Into<SmolStr>>,
    ) -> &mut Self {
        let entry = ManifestEntry {
            groups: groups.into_iter().map(Into::into).collect(),
            depends: depends.into_iter().map(Into::into).collect(),
        };
        self.entries.insert(id.into(), entry);
        self
    }

    /// The number of tests in this manifest.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if this manifest has no tests.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TestSource for TestManifest {
    fn test_ids(&self) -> Vec<TestId> {
        self.entries.keys().cloned().collect()
    }

    fn tags(&self, id: &TestId) -> &[SmolStr] {
        self.entries
            .get(id)
            .map(|entry| entry.groups.as_slice())
            .unwrap_or_default()
    }

    fn dependencies(&self, id: &TestId) -> &[SmolStr] {
        self.entries
            .get(id)
            .map(|entry| entry.depends.as_slice())
            .unwrap_or_default()
    }
}
