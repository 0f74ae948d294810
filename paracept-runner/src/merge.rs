// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Combining the reports of parallel workers into one.
//!
//! Each merger reads all of its sources before writing anything, and the destination is written
//! atomically. Problems with individual sources are logged and skipped: only a missing
//! destination or a failed write stops a merge.

mod failed;
mod html;
mod xml;

pub use failed::*;
pub use html::*;
pub use xml::*;

use crate::{
    errors::MergeError,
    helpers::{create_parent_dir, write_atomic},
};
use camino::Utf8Path;

/// How the times of merged entries are combined.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum TimePolicy {
    /// Add times together. Suitable when workers ran one after another.
    #[default]
    Sum,

    /// Take the largest time. Suitable when workers ran in parallel.
    Max,
}

impl TimePolicy {
    pub(crate) fn combine(self, acc: f64, time: f64) -> f64 {
        match self {
            Self::Sum => acc + time,
            Self::Max => acc.max(time),
        }
    }
}

fn write_destination(path: &Utf8Path, contents: &[u8]) -> Result<(), MergeError> {
    create_parent_dir(path).map_err(|(path, error)| MergeError::CreateDir { path, error })?;
    write_atomic(path, contents).map_err(|error| MergeError::Write {
        path: path.to_owned(),
        error,
    })
}
