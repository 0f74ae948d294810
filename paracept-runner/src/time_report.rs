// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage and retrieval of historical test durations.
//!
//! The time report is a JSON object mapping test identifiers to seconds.

use crate::{
    errors::TimeReportError,
    helpers::{create_parent_dir, write_atomic},
    test_id::TestId,
};
use camino::Utf8Path;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fs, io};

/// Historical durations for tests, in seconds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeReport {
    times: IndexMap<TestId, f64>,
}

impl TimeReport {
    /// The default location of the time report, relative to the project root.
    pub const DEFAULT_PATH: &'static str = "tests/_output/timeReport.json";

    /// Creates a new, empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a report from disk. A missing file is an error.
    pub fn load(path: &Utf8Path) -> Result<Self, TimeReportError> {
        match Self::load_if_exists(path)? {
            Some(report) => Ok(report),
            None => Err(TimeReportError::NotFound {
                path: path.to_owned(),
            }),
        }
    }

    /// Loads a report from disk, returning `None` if the file doesn't exist.
    pub fn load_if_exists(path: &Utf8Path) -> Result<Option<Self>, TimeReportError> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let report = serde_json::from_str(&contents).map_err(|error| {
                    TimeReportError::Parse {
                        path: path.to_owned(),
                        error,
                    }
                })?;
                Ok(Some(report))
            }
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(TimeReportError::Read {
                path: path.to_owned(),
                error,
            }),
        }
    }

    /// Writes the report to disk as pretty-printed JSON, creating parent directories as needed.
    pub fn save(&self, path: &Utf8Path) -> Result<(), TimeReportError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|error| TimeReportError::Serialize { error })?;

        create_parent_dir(path)
            .map_err(|(path, error)| TimeReportError::CreateDir { path, error })?;
        write_atomic(path, contents.as_bytes()).map_err(|error| TimeReportError::Write {
            path: path.to_owned(),
            error,
        })
    }

    /// Returns the time for a test, or 0 if the test isn't in the report.
    pub fn get(&self, id: &TestId) -> f64 {
        self.times.get(id).copied().unwrap_or(0.0)
    }

    /// Sets the time for a test. An existing test keeps its position.
    pub fn insert(&mut self, id: TestId, secs: f64) -> &mut Self {
        self.times.insert(id, secs);
        self
    }

    /// Copies every entry of `other` into this report, replacing existing entries.
    pub fn merge(&mut self, other: TimeReport) -> &mut Self {
        self.times.extend(other.times);
        self
    }

    /// Iterates over `(test, seconds)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&TestId, f64)> + '_ {
        self.times.iter().map(|(id, secs)| (id, *secs))
    }

    /// The number of tests in the report.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Returns true if the report has no tests.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
