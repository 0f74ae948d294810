// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Recording the results of a test run, for use by later splits.
//!
//! Two recorders are provided:
//!
//! * [`FailedTestsRecorder`] writes the identifiers of failed tests, one per line. That list can
//!   then be split with [`read_failed_tests`].
//! * [`TimeRecorder`] accumulates per-test durations into the [`TimeReport`] used by
//!   time-weighted splitting.
//!
//! [`record_junit_report`] replays a finished JUnit report through recorders.

use crate::{
    errors::{FailedTestsReportError, RecorderError},
    helpers::{convert_rel_path_to_forward_slash, create_parent_dir, plural, write_atomic},
    test_id::TestId,
    time_report::TimeReport,
};
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexMap;
use itertools::Itertools;
use paracept_junit::{Element, Report};
use std::{fs, io, time::Duration};
use tracing::{debug, info};

/// The outcome of a single test.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TestOutcome {
    /// The test passed.
    Passed,

    /// The test failed an assertion.
    Failed,

    /// The test errored out.
    Errored,

    /// The test was skipped.
    Skipped,

    /// The test was marked incomplete.
    Incomplete,
}

impl TestOutcome {
    /// Returns true if this outcome should be rerun.
    pub fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Errored)
    }
}

/// Receives events from a test run.
pub trait Recorder {
    /// Called once per finished test.
    fn on_test_finished(&mut self, id: &TestId, outcome: TestOutcome, duration: Duration);

    /// Called once at the end of the run.
    fn on_run_finished(&mut self) -> Result<(), RecorderError>;
}

/// Records the identifiers of failed tests.
#[derive(Clone, Debug)]
pub struct FailedTestsRecorder {
    path: Utf8PathBuf,
    failed: Vec<TestId>,
}

impl FailedTestsRecorder {
    /// The default file name for the failed-tests report.
    pub const DEFAULT_FILE_NAME: &'static str = "failedTests.txt";

    /// Creates a new recorder writing to `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            failed: Vec::new(),
        }
    }

    /// The tests recorded as failed so far.
    pub fn failed(&self) -> &[TestId] {
        &self.failed
    }
}

impl Recorder for FailedTestsRecorder {
    fn on_test_finished(&mut self, id: &TestId, outcome: TestOutcome, _duration: Duration) {
        if outcome.is_failure() {
            self.failed.push(id.clone());
        }
    }

    /// Replaces the report with the failed tests. If no tests failed, nothing is written and an
    /// existing report is left alone.
    fn on_run_finished(&mut self) -> Result<(), RecorderError> {
        if self.failed.is_empty() {
            debug!("no failed tests, not writing {}", self.path);
            return Ok(());
        }

        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(error) if error.kind() == io::ErrorKind::NotFound => {}
            Err(error) => {
                return Err(RecorderError::Remove {
                    path: self.path.clone(),
                    error,
                });
            }
        }

        create_parent_dir(&self.path)
            .map_err(|(path, error)| RecorderError::CreateDir { path, error })?;
        let contents = self.failed.iter().join("\n");
        write_atomic(&self.path, contents.as_bytes()).map_err(|error| RecorderError::Write {
            path: self.path.clone(),
            error,
        })?;

        info!(
            "Writing {}: {} failed {}",
            self.path,
            self.failed.len(),
            plural::tests_str(self.failed.len())
        );
        Ok(())
    }
}

/// Records how long each test took.
#[derive(Clone, Debug)]
pub struct TimeRecorder {
    path: Utf8PathBuf,
    times: IndexMap<TestId, f64>,
}

impl TimeRecorder {
    /// Creates a new recorder that merges into the time report at `path`.
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            path: path.into(),
            times: IndexMap::new(),
        }
    }
}

impl Recorder for TimeRecorder {
    /// Durations for the same test are added together.
    fn on_test_finished(&mut self, id: &TestId, _outcome: TestOutcome, duration: Duration) {
        *self.times.entry(id.clone()).or_insert(0.0) += duration.as_secs_f64();
    }

    /// Merges the recorded times over the existing report, replacing entries for tests that ran.
    fn on_run_finished(&mut self) -> Result<(), RecorderError> {
        let mut report = TimeReport::load_if_exists(&self.path)?.unwrap_or_default();
        let mut recorded = TimeReport::new();
        for (id, secs) in &self.times {
            recorded.insert(id.clone(), *secs);
        }
        report.merge(recorded);
        report.save(&self.path)?;

        info!(
            "Writing {}: {} {}",
            self.path,
            report.len(),
            plural::tests_str(report.len())
        );
        Ok(())
    }
}

/// Reads a failed-tests report written by [`FailedTestsRecorder`].
///
/// Unlike a time report, a missing failed-tests report is an error.
pub fn read_failed_tests(path: &Utf8Path) -> Result<Vec<TestId>, FailedTestsReportError> {
    if path.as_str().is_empty() {
        return Err(FailedTestsReportError::EmptyPath);
    }
    let contents = fs::read_to_string(path).map_err(|error| {
        if error.kind() == io::ErrorKind::NotFound {
            FailedTestsReportError::NotFound {
                path: path.to_owned(),
            }
        } else {
            FailedTestsReportError::Read {
                path: path.to_owned(),
                error,
            }
        }
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(TestId::from)
        .collect())
}

/// Replays every `testcase` in a JUnit report through `recorders`, then finishes the run for each
/// of them. Returns the number of test cases replayed.
///
/// A test is identified as `<file>:<name>`, with `file` relative to `project_root`. Test cases
/// without a `file` attribute fall back to their class.
pub fn record_junit_report(
    report: &Report,
    project_root: &Utf8Path,
    recorders: &mut [&mut dyn Recorder],
) -> Result<usize, RecorderError> {
    let mut count = 0;
    let testcases = report
        .testsuites
        .iter()
        .flat_map(|testsuite| &testsuite.entries)
        .filter(|entry| entry.name() == "testcase");
    for testcase in testcases {
        let id = junit_test_id(testcase, project_root);
        let outcome = junit_outcome(testcase);
        // Times too large for a Duration saturate.
        let duration =
            Duration::try_from_secs_f64(testcase.time().max(0.0)).unwrap_or(Duration::MAX);
        for recorder in recorders.iter_mut() {
            recorder.on_test_finished(&id, outcome, duration);
        }
        count += 1;
    }

    debug!("replayed {count} {} from JUnit report", plural::tests_str(count));
    for recorder in recorders.iter_mut() {
        recorder.on_run_finished()?;
    }
    Ok(count)
}

fn junit_test_id(testcase: &Element, project_root: &Utf8Path) -> TestId {
    let name = testcase.attribute("name").unwrap_or_default();
    let file = testcase.attribute("file").map(|file| {
        let file = Utf8Path::new(file);
        match file.strip_prefix(project_root) {
            Ok(rel_path) => convert_rel_path_to_forward_slash(rel_path).into_string(),
            Err(_) => file.as_str().to_owned(),
        }
    });
    let prefix = file
        .or_else(|| {
            testcase
                .attribute("class")
                .or_else(|| testcase.attribute("classname"))
                .map(str::to_owned)
        })
        .unwrap_or_default();
    TestId::new(format!("{prefix}:{name}"))
}

fn junit_outcome(testcase: &Element) -> TestOutcome {
    let mut outcome = TestOutcome::Passed;
    for element in testcase.descendants() {
        match element.name() {
            "failure" => return TestOutcome::Failed,
            "error" => outcome = TestOutcome::Errored,
            "skipped" if outcome == TestOutcome::Passed => outcome = TestOutcome::Skipped,
            _ => {}
        }
    }
    outcome
}
