// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read a `Report`.

use crate::{DeserializeError, Element, Node, Report, Testsuite};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";

pub(crate) fn deserialize_report(input: &str) -> Result<Report, DeserializeError> {
    let root = parse_document(input)?;

    let mut report = Report::new();
    for element in std::iter::once(&root).chain(root.descendants()) {
        if element.name() != TESTSUITES_TAG {
            continue;
        }
        report.add_testsuites(
            element
                .child_elements()
                .filter(|child| child.name() == TESTSUITE_TAG)
                .map(deserialize_testsuite),
        );
    }

    Ok(report)
}

fn deserialize_testsuite(element: &Element) -> Testsuite {
    let mut testsuite = Testsuite::new(element.attribute("name").unwrap_or_default());
    testsuite.tests = count_attribute(element, "tests");
    testsuite.assertions = count_attribute(element, "assertions");
    testsuite.failures = count_attribute(element, "failures");
    testsuite.errors = count_attribute(element, "errors");
    testsuite.time = element.time();
    testsuite.entries = element.child_elements().cloned().collect();
    testsuite
}

fn count_attribute(element: &Element, key: &str) -> usize {
    element
        .attribute(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(0)
}

/// Parses a document into its root element.
///
/// Whitespace-only text is dropped, since the serializer re-indents. Declarations, processing
/// instructions and doctypes are dropped as well.
fn parse_document(input: &str) -> Result<Element, DeserializeError> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(false);

    let mut stack: Vec<Element> = vec![];
    let mut root = None;

    loop {
        let event = reader
            .read_event()
            .map_err(|err| DeserializeError::Xml {
                position: reader.buffer_position(),
                err,
            })?;
        let xml_err = |err| DeserializeError::Xml {
            position: reader.buffer_position(),
            err,
        };

        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start).map_err(xml_err)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start).map_err(xml_err)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // The reader checks that end names match, so this is always the element being
                // closed.
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_err)?;
                if let Some(parent) = stack.last_mut()
                    && !text.trim().is_empty()
                {
                    parent.add_text(text);
                }
            }
            Event::CData(cdata) => {
                if let Some(parent) = stack.last_mut() {
                    parent.add_child(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent.add_child(Node::Comment(
                        String::from_utf8_lossy(&comment).into_owned(),
                    ));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.pop() {
        return Err(DeserializeError::UnclosedElement {
            name: open.name().to_owned(),
        });
    }

    root.ok_or(DeserializeError::NoRootElement)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element, quick_xml::Error> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        let value = attr.unescape_value()?;
        element.set_attribute(String::from_utf8_lossy(attr.key.as_ref()), value);
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => {
            parent.add_child(element);
        }
        None => {
            // Only the first top-level element counts as the root.
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}
