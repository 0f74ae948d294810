// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for paracept-runner.

use camino::{Utf8Path, Utf8PathBuf};
use std::{fs, io, io::Write};

/// Utilities for pluralizing various words based on count or plurality.
pub mod plural {
    /// Returns "test" if `count` is 1, otherwise "tests".
    pub fn tests_str(count: usize) -> &'static str {
        if count == 1 { "test" } else { "tests" }
    }

    /// Returns "report" if `count` is 1, otherwise "reports".
    pub fn reports_str(count: usize) -> &'static str {
        if count == 1 { "report" } else { "reports" }
    }
}

/// Creates the parent directory of `path`, if it has one.
///
/// On failure, returns the directory that couldn't be created.
pub(crate) fn create_parent_dir(path: &Utf8Path) -> Result<(), (Utf8PathBuf, io::Error)> {
    match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|error| (parent.to_owned(), error))
        }
        _ => Ok(()),
    }
}

/// Replaces the contents of `path` with `contents`, via a temporary file and a rename.
pub(crate) fn write_atomic(
    path: &Utf8Path,
    contents: &[u8],
) -> Result<(), atomicwrites::Error<io::Error>> {
    atomicwrites::AtomicFile::new(path, atomicwrites::AllowOverwrite)
        .write(|file| file.write_all(contents))
}

#[cfg(windows)]
pub(crate) fn convert_rel_path_to_forward_slash(rel_path: &Utf8Path) -> Utf8PathBuf {
    if !rel_path.is_relative() {
        panic!("path for conversion to forward slash '{rel_path}' is not relative");
    }
    rel_path.as_str().replace('\\', "/").into()
}

#[cfg(not(windows))]
pub(crate) fn convert_rel_path_to_forward_slash(rel_path: &Utf8Path) -> Utf8PathBuf {
    rel_path.to_path_buf()
}

/// Formats a number of seconds for logs, e.g. `12.50`.
pub(crate) fn format_seconds(secs: f64) -> String {
    format!("{secs:.2}")
}
