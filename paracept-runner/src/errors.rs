// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by paracept.

use crate::test_id::TestId;
use camino::Utf8PathBuf;
use config::ConfigError;
use smol_str::SmolStr;
use std::{borrow::Cow, fmt, io};
use thiserror::Error;

/// An error that occurred while parsing the config.
#[derive(Debug, Error)]
#[error("failed to parse paracept config at `{config_file}`")]
#[non_exhaustive]
pub struct ConfigParseError {
    config_file: Utf8PathBuf,
    #[source]
    err: ConfigError,
}

impl ConfigParseError {
    pub(crate) fn new(config_file: impl Into<Utf8PathBuf>, err: ConfigError) -> Self {
        Self {
            config_file: config_file.into(),
            err,
        }
    }

    /// Returns the config file for this error.
    pub fn config_file(&self) -> &Utf8PathBuf {
        &self.config_file
    }
}

/// An error that occurs while parsing a [`GroupCount`](crate::partition::GroupCount) input.
#[derive(Clone, Debug, Error)]
pub struct GroupCountParseError {
    input: String,
    message: Cow<'static, str>,
}

impl GroupCountParseError {
    pub(crate) fn new(input: impl Into<String>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            input: input.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for GroupCountParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "group count must be a positive integer, found '{}': {}",
            self.input, self.message
        )
    }
}

/// Whether a group tag was requested to be included or excluded.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupFilterKind {
    /// The tag must be present.
    Include,

    /// The tag must be absent.
    Exclude,
}

impl fmt::Display for GroupFilterKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Include => write!(f, "included"),
            Self::Exclude => write!(f, "excluded"),
        }
    }
}

/// A tag was marked as both included and excluded in a
/// [`GroupFilter`](crate::test_filter::GroupFilter).
#[derive(Clone, Debug, Error)]
#[error("group `{tag}` can be marked only as included or excluded (requested {requested}, already {existing})")]
pub struct GroupFilterError {
    tag: SmolStr,
    requested: GroupFilterKind,
    existing: GroupFilterKind,
}

impl GroupFilterError {
    pub(crate) fn new(tag: SmolStr, requested: GroupFilterKind) -> Self {
        let existing = match requested {
            GroupFilterKind::Include => GroupFilterKind::Exclude,
            GroupFilterKind::Exclude => GroupFilterKind::Include,
        };
        Self {
            tag,
            requested,
            existing,
        }
    }

    /// Returns the tag that was rejected.
    pub fn tag(&self) -> &str {
        &self.tag
    }
}

/// An error that occurs while resolving test dependencies.
///
/// All of these are fatal: no group files are written once one is returned.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum DependencyResolveError {
    /// A dependency cycle was found.
    #[error("circular dependency: `{from}` -> `{to}`")]
    Cycle {
        /// The test being resolved when the cycle was detected.
        from: TestId,

        /// The dependency that is still being resolved further up the stack.
        to: TestId,
    },

    /// A dependency target did not match any known test.
    #[error("test `{test}` depends on `{target}`, which was not found")]
    MissingDependency {
        /// The test that declared the dependency.
        test: TestId,

        /// The dependency as written.
        target: SmolStr,
    },

    /// A dependency target could not be interpreted.
    #[error("test `{test}` has malformed dependency `{target}`: {reason}")]
    MalformedDependency {
        /// The test that declared the dependency.
        test: TestId,

        /// The dependency as written.
        target: SmolStr,

        /// Why the target is malformed.
        reason: &'static str,
    },
}

/// An error that occurs while loading a [`TestManifest`](crate::test_id::TestManifest).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestManifestError {
    /// The manifest could not be read.
    #[error("error reading test manifest from `{path}`")]
    Read {
        /// The path that was read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The manifest is not valid JSON of the expected shape.
    #[error("error parsing test manifest at `{path}`")]
    Parse {
        /// The path that was read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },
}

/// An error that occurs while reading or writing group files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GroupFileError {
    /// A directory for group files could not be created.
    #[error("error creating directory `{path}` for group files")]
    CreateDir {
        /// The directory that could not be created.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// A group file could not be written.
    #[error("error writing group file `{path}`")]
    Write {
        /// The group file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: atomicwrites::Error<io::Error>,
    },

    /// A group file could not be read.
    #[error("error reading group file `{path}`")]
    Read {
        /// The group file.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },
}

/// An error that occurs while loading or saving a [`TimeReport`](crate::time_report::TimeReport).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TimeReportError {
    /// The time report does not exist.
    #[error("time report `{path}` not found")]
    NotFound {
        /// The expected path.
        path: Utf8PathBuf,
    },

    /// The time report could not be read.
    #[error("error reading time report `{path}`")]
    Read {
        /// The time report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The time report is not a JSON map of test identifiers to seconds.
    #[error("error parsing time report `{path}`")]
    Parse {
        /// The time report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// The directory for the time report could not be created.
    #[error("error creating directory `{path}` for time report")]
    CreateDir {
        /// The directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The time report could not be serialized.
    #[error("error serializing time report")]
    Serialize {
        /// The underlying error.
        #[source]
        error: serde_json::Error,
    },

    /// The time report could not be written.
    #[error("error writing time report `{path}`")]
    Write {
        /// The time report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: atomicwrites::Error<io::Error>,
    },
}

/// An error that occurs while reading a failed-tests report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FailedTestsReportError {
    /// No path was given for the report.
    #[error("failed-tests report path is empty")]
    EmptyPath,

    /// The report does not exist.
    #[error("failed-tests report `{path}` not found")]
    NotFound {
        /// The expected path.
        path: Utf8PathBuf,
    },

    /// The report could not be read.
    #[error("error reading failed-tests report `{path}`")]
    Read {
        /// The report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },
}

/// An error that occurs while discovering test files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TestFileFinderError {
    /// A file pattern is not a valid glob.
    #[error("invalid test file pattern `{pattern}`")]
    InvalidPattern {
        /// The pattern as written.
        pattern: String,

        /// The underlying error.
        #[source]
        error: globset::Error,
    },

    /// The patterns could not be compiled into a set.
    #[error("error building test file pattern set")]
    PatternSet {
        /// The underlying error.
        #[source]
        error: globset::Error,
    },

    /// The tests directory could not be walked.
    #[error("error walking test directory `{path}`")]
    Walk {
        /// The directory being walked.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: walkdir::Error,
    },

    /// A discovered path is not valid UTF-8.
    #[error("test file path `{path}` is not valid UTF-8")]
    NonUtf8Path {
        /// The lossy form of the path.
        path: String,
    },
}

/// An error that occurs while recording test results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecorderError {
    /// An old failed-tests report could not be removed.
    #[error("error removing old failed-tests report `{path}`")]
    Remove {
        /// The report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// A report directory could not be created.
    #[error("error creating directory `{path}`")]
    CreateDir {
        /// The directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The failed-tests report could not be written.
    #[error("error writing failed-tests report `{path}`")]
    Write {
        /// The report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: atomicwrites::Error<io::Error>,
    },

    /// The time report could not be read or written.
    #[error(transparent)]
    TimeReport(#[from] TimeReportError),
}

/// An error that occurs while merging reports.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    /// No destination was configured.
    #[error("no destination set for merged report")]
    MissingDestination,

    /// None of the sources exist.
    #[error("none of the {count} source reports exist")]
    NoSources {
        /// The number of sources that were given.
        count: usize,
    },

    /// A source could not be read.
    #[error("error reading source report `{path}`")]
    ReadSource {
        /// The source report.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// A source could not be understood.
    #[error("error parsing source report `{path}`: {message}")]
    ParseSource {
        /// The source report.
        path: Utf8PathBuf,

        /// What went wrong.
        message: String,
    },

    /// A source directory could not be walked.
    #[error("error walking source directory `{path}`")]
    WalkSources {
        /// The directory being walked.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: walkdir::Error,
    },

    /// The merged JUnit report could not be serialized.
    #[error("error serializing merged report")]
    Serialize {
        /// The underlying error.
        #[source]
        error: paracept_junit::SerializeError,
    },

    /// The directory for the merged report could not be created.
    #[error("error creating directory `{path}` for merged report")]
    CreateDir {
        /// The directory.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: io::Error,
    },

    /// The merged report could not be written.
    #[error("error writing merged report `{path}`")]
    Write {
        /// The destination.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: atomicwrites::Error<io::Error>,
    },
}
