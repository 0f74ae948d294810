// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read, merge and write JUnit reports in Rust.
//!
//! Unlike a typed JUnit model, testcases are kept as [`Element`] trees so that a report read from
//! disk can be written back out with every attribute and child intact. The model is lossless up
//! to insignificant whitespace: whitespace-only text between elements is dropped, and the
//! serializer re-indents. Only the `testsuites > testsuite` skeleton is interpreted.

mod deserialize;
mod errors;
mod report;
mod serialize;

pub use errors::*;
pub use report::*;
