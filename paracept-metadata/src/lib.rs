// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Machine-readable metadata for [paracept](https://crates.io/crates/paracept).
//!
//! Currently this only documents the process exit codes `paracept` can return.

mod exit_codes;

pub use exit_codes::*;
