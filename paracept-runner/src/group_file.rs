// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Group files: one file per group, one test identifier per line.
//!
//! Group files are named `<prefix><index>`, with indexes counting up from 1. A group with no
//! tests is still written, as an empty file, so that every worker finds its file.

use crate::{
    errors::GroupFileError,
    helpers::{create_parent_dir, format_seconds, plural, write_atomic},
    partition::Groups,
    test_id::TestId,
};
use camino::{Utf8Path, Utf8PathBuf};
use itertools::Itertools;
use std::fs;
use tracing::info;

/// Writes and locates group files sharing a common prefix.
#[derive(Clone, Debug)]
pub struct GroupFiles {
    prefix: Utf8PathBuf,
}

impl GroupFiles {
    /// The default prefix, relative to the project root.
    pub const DEFAULT_PREFIX: &'static str = "tests/_data/paracept_";

    /// Creates a new `GroupFiles` with the given prefix. The prefix may contain directories.
    pub fn new(prefix: impl Into<Utf8PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Returns the path to the group file with the given 1-based index.
    pub fn path_for(&self, index: usize) -> Utf8PathBuf {
        Utf8PathBuf::from(format!("{}{index}", self.prefix))
    }

    /// Writes one file per group and returns their paths, in order.
    pub fn write(&self, groups: &Groups) -> Result<Vec<Utf8PathBuf>, GroupFileError> {
        let mut written = Vec::with_capacity(groups.len());
        for (i, group) in groups.iter().enumerate() {
            let path = self.path_for(i + 1);
            match group.expected_time() {
                Some(time) => info!(
                    "Writing {path}: {} {} with {} seconds",
                    group.len(),
                    plural::tests_str(group.len()),
                    format_seconds(time),
                ),
                None => info!(
                    "Writing {path}: {} {}",
                    group.len(),
                    plural::tests_str(group.len())
                ),
            }

            write_group_file(&path, group.tests())?;
            written.push(path);
        }
        Ok(written)
    }

    /// Reads a group file, skipping blank lines.
    pub fn read(path: &Utf8Path) -> Result<Vec<TestId>, GroupFileError> {
        let contents = fs::read_to_string(path).map_err(|error| GroupFileError::Read {
            path: path.to_owned(),
            error,
        })?;
        Ok(contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(TestId::from)
            .collect())
    }
}

fn write_group_file(path: &Utf8Path, tests: &[TestId]) -> Result<(), GroupFileError> {
    create_parent_dir(path).map_err(|(path, error)| GroupFileError::CreateDir { path, error })?;

    let contents = tests.iter().join("\n");
    write_atomic(path, contents.as_bytes()).map_err(|error| GroupFileError::Write {
        path: path.to_owned(),
        error,
    })
}
