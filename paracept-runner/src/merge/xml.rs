// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{TimePolicy, write_destination};
use crate::{errors::MergeError, helpers::plural};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use paracept_junit::{Element, Report, Testsuite};
use std::fs;
use tracing::{info, warn};

/// Merges JUnit XML reports.
///
/// Entries are grouped by the name of the suite they appear in. Suites are emitted in the order
/// their names were first seen, and their statistics are recomputed from the entries.
#[derive(Clone, Debug, Default)]
pub struct XmlReportMerger {
    sources: Vec<Utf8PathBuf>,
    destination: Option<Utf8PathBuf>,
    rewrite: bool,
    time_policy: TimePolicy,
}

impl XmlReportMerger {
    /// Creates a new merger with no sources or destination, in append mode with summed times.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source report.
    pub fn add_source(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.sources.push(path.into());
        self
    }

    /// Adds several source reports.
    pub fn add_sources(
        &mut self,
        paths: impl IntoIterator<Item = impl Into<Utf8PathBuf>>,
    ) -> &mut Self {
        self.sources.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the path the merged report is written to.
    pub fn set_destination(&mut self, path: impl Into<Utf8PathBuf>) -> &mut Self {
        self.destination = Some(path.into());
        self
    }

    /// In rewrite mode, a later entry with the same `<class>::<name>` replaces an earlier one.
    /// Otherwise every entry is kept.
    pub fn set_rewrite(&mut self, rewrite: bool) -> &mut Self {
        self.rewrite = rewrite;
        self
    }

    /// Sets how entry times are combined into the suite time.
    pub fn set_time_policy(&mut self, time_policy: TimePolicy) -> &mut Self {
        self.time_policy = time_policy;
        self
    }

    /// Reads every source and merges them into a report, without writing it.
    pub fn merge(&self) -> Report {
        let mut suites = SuiteEntries::new(self.rewrite);
        for source in &self.sources {
            info!("Processing {source}");
            let Some(report) = read_source(source) else {
                continue;
            };
            for testsuite in report.testsuites {
                suites.add(testsuite);
            }
        }
        suites.into_report(self.time_policy)
    }

    /// Merges the sources and writes the result to the destination.
    pub fn run(&self) -> Result<Report, MergeError> {
        let destination = self
            .destination
            .as_deref()
            .ok_or(MergeError::MissingDestination)?;

        info!("Merging JUnit XML reports into {destination}");
        let report = self.merge();
        let contents = report
            .to_string()
            .map_err(|error| MergeError::Serialize { error })?;
        write_destination(destination, contents.as_bytes())?;

        let count = report.testsuites.len();
        info!(
            "File {destination} saved. {count} {} added",
            if count == 1 { "suite" } else { "suites" }
        );
        Ok(report)
    }

    /// The number of sources added so far.
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}

fn read_source(path: &Utf8Path) -> Option<Report> {
    let input = match fs::read_to_string(path) {
        Ok(input) => input,
        Err(error) => {
            warn!("File {path} did not exist or is not readable: {error}");
            return None;
        }
    };
    match Report::deserialize_from_str(&input) {
        Ok(report) => Some(report),
        Err(error) => {
            warn!("File {path} can't be loaded as XML: {error}");
            None
        }
    }
}

#[derive(Debug)]
enum Entries {
    Append(Vec<Element>),
    Rewrite(IndexMap<String, Element>),
}

#[derive(Debug)]
struct SuiteEntries {
    rewrite: bool,
    suites: IndexMap<String, Entries>,
}

impl SuiteEntries {
    fn new(rewrite: bool) -> Self {
        Self {
            rewrite,
            suites: IndexMap::new(),
        }
    }

    fn add(&mut self, testsuite: Testsuite) {
        let rewrite = self.rewrite;
        let entries = self.suites.entry(testsuite.name).or_insert_with(|| {
            if rewrite {
                Entries::Rewrite(IndexMap::new())
            } else {
                Entries::Append(Vec::new())
            }
        });
        match entries {
            Entries::Append(list) => list.extend(testsuite.entries),
            Entries::Rewrite(map) => {
                for entry in testsuite.entries {
                    // IndexMap::insert keeps the position of an existing key.
                    map.insert(entry.merge_key(), entry);
                }
            }
        }
    }

    fn into_report(self, time_policy: TimePolicy) -> Report {
        let mut report = Report::new();
        for (name, entries) in self.suites {
            let entries = match entries {
                Entries::Append(list) => list,
                Entries::Rewrite(map) => map.into_values().collect(),
            };

            let time = entries
                .iter()
                .fold(0.0, |acc, entry| time_policy.combine(acc, entry.time()));
            let mut testsuite = Testsuite::new(name);
            testsuite.add_entries(entries).set_time(time);
            info!(
                "Suite {}: {} {}",
                testsuite.name,
                testsuite.tests,
                plural::tests_str(testsuite.tests)
            );
            report.add_testsuite(testsuite);
        }
        report
    }
}
