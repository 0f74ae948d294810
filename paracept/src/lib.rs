// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Split a test suite into groups for parallel workers, and merge the reports they produce.
//!
//! This crate is the `paracept` command-line tool. The splitting and merging logic lives in
//! [paracept-runner](https://crates.io/crates/paracept-runner).

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::{OutputContext, StderrStyles};
