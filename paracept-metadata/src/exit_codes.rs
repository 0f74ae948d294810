// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `paracept` failures.
///
/// `paracept` invocations may fail for a variety of reasons. This structure documents the exit
/// codes that may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum ParaceptExitCode {}

impl ParaceptExitCode {
    /// No errors occurred and paracept exited normally.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a paracept invocation: an invalid config file, a
    /// contradictory group filter, a missing destination, or similar.
    pub const SETUP_ERROR: i32 = 96;

    /// Reading an input (a test manifest, time report or failed-tests report) produced an error.
    pub const INPUT_READ_ERROR: i32 = 97;

    /// Test dependencies could not be resolved: a dependency was missing, malformed, or part of a
    /// cycle. No group files are written in this case.
    pub const DEPENDENCY_RESOLUTION_FAILED: i32 = 98;

    /// Merging reports produced an error, e.g. none of the given sources existed.
    pub const MERGE_FAILED: i32 = 99;

    /// Writing group files or a merged report produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
