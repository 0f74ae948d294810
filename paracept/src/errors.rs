// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING, StderrStyles};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use paracept_metadata::ParaceptExitCode;
use paracept_runner::errors::*;
use std::{error::Error, path::PathBuf};
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholders: errors are meant to be printed with display_to_stderr,
// which colorizes them.

/// An error that paracept expects to happen, and knows how to report.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("could not determine current directory")]
    CurrentDirFailed {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 { path: PathBuf },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("group filter error")]
    GroupFilterError {
        #[from]
        err: GroupFilterError,
    },
    #[error("invalid failed-tests report pattern")]
    InvalidReportPattern {
        pattern: String,
        #[source]
        err: regex::Error,
    },
    #[error("test manifest error")]
    TestManifestError {
        #[from]
        err: TestManifestError,
    },
    #[error("test file finder error")]
    TestFileFinderError {
        #[from]
        err: TestFileFinderError,
    },
    #[error("time report error")]
    TimeReportError {
        #[from]
        err: TimeReportError,
    },
    #[error("failed-tests report error")]
    FailedTestsReportError {
        #[from]
        err: FailedTestsReportError,
    },
    #[error("JUnit report read error")]
    JunitReadError {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("JUnit report parse error")]
    JunitParseError {
        path: Utf8PathBuf,
        #[source]
        err: paracept_junit::DeserializeError,
    },
    #[error("dependency resolve error")]
    DependencyResolveError {
        #[from]
        err: DependencyResolveError,
    },
    #[error("group file error")]
    GroupFileError {
        #[from]
        err: GroupFileError,
    },
    #[error("merge error")]
    MergeError {
        #[from]
        err: MergeError,
    },
    #[error("recorder error")]
    RecorderError {
        #[from]
        err: RecorderError,
    },
}

impl ExpectedError {
    pub(crate) fn current_dir_failed(err: std::io::Error) -> Self {
        Self::CurrentDirFailed { err }
    }

    pub(crate) fn invalid_report_pattern(pattern: impl Into<String>, err: regex::Error) -> Self {
        Self::InvalidReportPattern {
            pattern: pattern.into(),
            err,
        }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirFailed { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. }
            | Self::GroupFilterError { .. }
            | Self::InvalidReportPattern { .. } => ParaceptExitCode::SETUP_ERROR,
            Self::FailedTestsReportError {
                err: FailedTestsReportError::EmptyPath,
            } => ParaceptExitCode::SETUP_ERROR,
            Self::TestManifestError { .. }
            | Self::TestFileFinderError { .. }
            | Self::TimeReportError { .. }
            | Self::FailedTestsReportError { .. }
            | Self::JunitReadError { .. }
            | Self::JunitParseError { .. } => ParaceptExitCode::INPUT_READ_ERROR,
            Self::DependencyResolveError { .. } => ParaceptExitCode::DEPENDENCY_RESOLUTION_FAILED,
            Self::GroupFileError { .. } | Self::RecorderError { .. } => {
                ParaceptExitCode::WRITE_OUTPUT_ERROR
            }
            Self::MergeError { err } => match err {
                MergeError::MissingDestination => ParaceptExitCode::SETUP_ERROR,
                MergeError::Serialize { .. }
                | MergeError::CreateDir { .. }
                | MergeError::Write { .. } => ParaceptExitCode::WRITE_OUTPUT_ERROR,
                _ => ParaceptExitCode::MERGE_FAILED,
            },
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirFailed { err } => {
                error!("could not determine current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { path } => {
                error!(
                    "current directory `{}` is not valid UTF-8 (hint: pass in --project-root)",
                    path.display().style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse config file `{}`",
                    err.config_file().style(styles.bold)
                );
                err.source()
            }
            Self::GroupFilterError { err } => {
                error!("{err}");
                err.source()
            }
            Self::InvalidReportPattern { pattern, err } => {
                error!(
                    "failed-tests report pattern `{}` is not a valid regex",
                    pattern.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::TestManifestError { err } => {
                error!("{err}");
                err.source()
            }
            Self::TestFileFinderError { err } => {
                error!("{err}");
                err.source()
            }
            Self::TimeReportError { err } => {
                match err {
                    TimeReportError::NotFound { path } => {
                        error!(
                            "time report `{}` not found (hint: run `paracept record` with \
                             --time-report after a test run to create it)",
                            path.style(styles.bold)
                        );
                    }
                    _ => error!("{err}"),
                }
                err.source()
            }
            Self::FailedTestsReportError { err } => {
                error!("{err}");
                err.source()
            }
            Self::JunitReadError { path, err } => {
                error!(
                    "failed to read JUnit report `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::JunitParseError { path, err } => {
                error!(
                    "failed to parse JUnit report `{}`",
                    path.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::DependencyResolveError { err } => {
                error!("{err}");
                error!(target: NO_HEADING, "(no group files were written)");
                err.source()
            }
            Self::GroupFileError { err } => {
                error!("{err}");
                err.source()
            }
            Self::MergeError { err } => {
                error!("{err}");
                err.source()
            }
            Self::RecorderError { err } => {
                error!("{err}");
                err.source()
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
