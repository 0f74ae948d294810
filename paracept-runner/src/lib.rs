// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for [paracept](https://crates.io/crates/paracept): splitting a test suite
//! into groups for parallel workers, and merging the reports those workers produce.
//!
//! The basic flow for splitting is:
//!
//! 1. Load tests from a [`TestSource`](test_id::TestSource), such as a
//!    [`TestManifest`](test_id::TestManifest).
//! 2. Narrow them down with a [`FilterChain`](test_filter::FilterChain).
//! 3. Order them with the [`DependencyResolver`](resolver::DependencyResolver), or weigh them with
//!    a [`TimeReport`](time_report::TimeReport).
//! 4. Split them with a [`GroupPartitioner`](partition::GroupPartitioner) or a
//!    [`TimeWeightedPartitioner`](partition::TimeWeightedPartitioner), and write the result with
//!    [`GroupFiles`](group_file::GroupFiles).
//!
//! After the workers finish, the [`merge`] module combines their reports.

pub mod config;
pub mod errors;
pub mod file_finder;
pub mod group_file;
pub mod helpers;
pub mod merge;
pub mod partition;
pub mod recorder;
pub mod resolver;
pub mod test_filter;
pub mod test_id;
pub mod time_report;
