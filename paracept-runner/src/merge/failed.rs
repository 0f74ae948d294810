// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::write_destination;
use crate::{errors::MergeError, helpers::plural};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::{fs, sync::LazyLock};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(FailedTestsMerger::DEFAULT_PATTERN).expect("default pattern is valid")
});

/// Concatenates failed-tests reports written by parallel workers.
#[derive(Clone, Debug)]
pub struct FailedTestsMerger {
    sources: Vec<Utf8PathBuf>,
    source_dirs: Vec<Utf8PathBuf>,
    pattern: Regex,
    destination: Option<Utf8PathBuf>,
}

impl Default for FailedTestsMerger {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            source_dirs: Vec::new(),
            pattern: DEFAULT_PATTERN.clone(),
            destination: None,
        }
    }
}

impl FailedTestsMerger {
    /// File names picked up from source directories if no other pattern is set.
    pub const DEFAULT_PATTERN: &'static str = r"^failedTests_\w+\.\w+\.txt$";

    /// Creates a new merger with no sources or destination.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an explicit source report. Missing files are skipped.
    pub fn add_source(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.sources.push(path.into());
        self
    }

    /// Adds several explicit source reports.
    pub fn add_sources(
        &mut self,
        paths: impl IntoIterator<Item = impl Into<Utf8PathBuf>>,
    ) -> &mut Self {
        self.sources.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Adds a directory searched recursively for reports whose file name matches the pattern.
    pub fn add_source_dir(&mut self, dir: impl Into<Utf8PathBuf>) -> &mut Self {
        self.source_dirs.push(dir.into());
        self
    }

    /// Sets the file name pattern for reports found in source directories.
    pub fn set_pattern(&mut self, pattern: Regex) -> &mut Self {
        self.pattern = pattern;
        self
    }

    /// Sets the path the merged report is written to.
    pub fn set_destination(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.destination = Some(path.into());
        self
    }

    /// Collects the report files to read: explicit sources first, then matches from each source
    /// directory in sorted order.
    pub fn collect_sources(&self) -> Result<Vec<Utf8PathBuf>, MergeError> {
        let mut sources = Vec::new();
        for source in &self.sources {
            if source.is_file() {
                sources.push(source.clone());
            } else {
                warn!("failed-tests report {source} does not exist, skipping");
            }
        }

        for dir in &self.source_dirs {
            let mut found = Vec::new();
            for entry in WalkDir::new(dir) {
                let entry = entry.map_err(|error| MergeError::WalkSources {
                    path: dir.clone(),
                    error,
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let Some(path) = Utf8Path::from_path(entry.path()) else {
                    debug!("skipping non-UTF-8 path {}", entry.path().display());
                    continue;
                };
                if path
                    .file_name()
                    .is_some_and(|name| self.pattern.is_match(name))
                {
                    found.push(path.to_owned());
                }
            }
            found.sort();
            sources.extend(found);
        }

        Ok(sources)
    }

    /// Reads all sources and writes their concatenated contents to the destination.
    ///
    /// Returns the number of reports that contributed. The destination is only written if at
    /// least one report had contents.
    pub fn run(&self) -> Result<usize, MergeError> {
        let destination = self
            .destination
            .as_deref()
            .ok_or(MergeError::MissingDestination)?;

        let sources = self.collect_sources()?;
        info!(
            "Merging {} failed-tests {} into {destination}",
            sources.len(),
            plural::reports_str(sources.len())
        );

        let mut contents = Vec::new();
        for source in &sources {
            let text = fs::read_to_string(source).map_err(|error| MergeError::ReadSource {
                path: source.clone(),
                error,
            })?;
            let text = text.trim_end_matches(['\r', '\n']);
            if text.trim().is_empty() {
                debug!("failed-tests report {source} is empty");
                continue;
            }
            contents.push(text.to_owned());
        }

        if contents.is_empty() {
            info!("No failed tests found, {destination} not written");
            return Ok(0);
        }

        write_destination(destination, contents.join("\n").as_bytes())?;
        Ok(contents.len())
    }
}
