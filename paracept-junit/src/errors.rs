// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::string::FromUtf8Error;
use thiserror::Error;

/// An error that occurs while serializing a [`Report`](crate::Report).
///
/// Returned by [`Report::serialize`](crate::Report::serialize) and
/// [`Report::to_string`](crate::Report::to_string).
#[derive(Debug, Error)]
#[error("error serializing JUnit report")]
pub struct SerializeError {
    #[source]
    inner: SerializeErrorKind,
}

impl SerializeError {
    pub(crate) fn from_utf8(err: FromUtf8Error) -> Self {
        Self {
            inner: SerializeErrorKind::Utf8(err),
        }
    }
}

impl From<quick_xml::Error> for SerializeError {
    fn from(err: quick_xml::Error) -> Self {
        Self {
            inner: SerializeErrorKind::Xml(err),
        }
    }
}

#[derive(Debug, Error)]
enum SerializeErrorKind {
    #[error(transparent)]
    Xml(quick_xml::Error),
    #[error("serialized report is not valid UTF-8")]
    Utf8(#[source] FromUtf8Error),
}

/// An error that occurs while reading a [`Report`](crate::Report).
///
/// Returned by [`Report::deserialize_from_str`](crate::Report::deserialize_from_str).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeserializeError {
    /// The input is not well-formed XML.
    #[error("malformed XML at byte {position}")]
    Xml {
        /// The byte offset at which the error was detected.
        position: usize,

        /// The underlying error.
        #[source]
        err: quick_xml::Error,
    },

    /// The input ended while an element was still open.
    #[error("unexpected end of input: element `{name}` is not closed")]
    UnclosedElement {
        /// The name of the innermost unclosed element.
        name: String,
    },

    /// The input contains no root element.
    #[error("input does not contain a root element")]
    NoRootElement,
}
