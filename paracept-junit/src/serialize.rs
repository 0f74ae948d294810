// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialize a `Report`.

use crate::{Element, Node, Report, SerializeError, Testsuite};
use quick_xml::{
    Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::io;

static TESTSUITES_TAG: &str = "testsuites";
static TESTSUITE_TAG: &str = "testsuite";

pub(crate) fn serialize_report(
    report: &Report,
    writer: impl io::Write,
) -> Result<(), SerializeError> {
    let mut writer = Writer::new_with_indent(writer, b' ', 4);

    let decl = BytesDecl::new("1.0", Some("UTF-8"), None);
    writer.write_event(Event::Decl(decl))?;

    serialize_report_impl(report, &mut writer)?;

    // Add a trailing newline.
    writer.write_indent()?;
    Ok(())
}

fn serialize_report_impl(
    report: &Report,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    // Use the destructuring syntax to ensure that all fields are handled.
    let Report { testsuites } = report;

    if testsuites.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(TESTSUITES_TAG)))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new(TESTSUITES_TAG)))?;
    for testsuite in testsuites {
        serialize_testsuite(testsuite, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(TESTSUITES_TAG)))?;

    Ok(())
}

fn serialize_testsuite(
    testsuite: &Testsuite,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let Testsuite {
        name,
        tests,
        assertions,
        failures,
        errors,
        time,
        entries,
    } = testsuite;

    let mut testsuite_tag = BytesStart::new(TESTSUITE_TAG);
    testsuite_tag.extend_attributes([
        ("name", name.as_str()),
        ("tests", tests.to_string().as_str()),
        ("assertions", assertions.to_string().as_str()),
        ("failures", failures.to_string().as_str()),
        ("errors", errors.to_string().as_str()),
        ("time", serialize_time(*time).as_str()),
    ]);

    if entries.is_empty() {
        writer.write_event(Event::Empty(testsuite_tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(testsuite_tag))?;
    for entry in entries {
        serialize_element(entry, writer)?;
    }
    writer.write_event(Event::End(BytesEnd::new(TESTSUITE_TAG)))?;

    Ok(())
}

fn serialize_element(
    element: &Element,
    writer: &mut Writer<impl io::Write>,
) -> quick_xml::Result<()> {
    let mut tag = BytesStart::new(element.name());
    for attribute in element.attributes() {
        tag.push_attribute(attribute);
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(tag))?;
        return Ok(());
    }

    writer.write_event(Event::Start(tag))?;
    for child in element.children() {
        match child {
            Node::Element(child) => serialize_element(child, writer)?,
            Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
            Node::CData(data) => writer.write_event(Event::CData(BytesCData::new(data)))?,
            Node::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment)))?
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;

    Ok(())
}

/// Formats a time in seconds with at most six decimal places and no trailing zeroes.
fn serialize_time(secs: f64) -> String {
    let formatted = format!("{secs:.6}");
    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_owned()
    } else {
        formatted
    }
}
