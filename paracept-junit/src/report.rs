// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    DeserializeError, SerializeError, deserialize::deserialize_report,
    serialize::serialize_report,
};
use indexmap::IndexMap;
use std::io;

/// The root element of a JUnit report.
///
/// Serialized as a bare `<testsuites>` element: every summary statistic lives on the individual
/// [`Testsuite`] instances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Report {
    /// The test suites contained in this report, in document order.
    pub testsuites: Vec<Testsuite>,
}

impl Report {
    /// Creates a new, empty `Report`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new testsuite.
    pub fn add_testsuite(&mut self, testsuite: Testsuite) -> &mut Self {
        self.testsuites.push(testsuite);
        self
    }

    /// Adds several testsuites.
    pub fn add_testsuites(&mut self, testsuites: impl IntoIterator<Item = Testsuite>) -> &mut Self {
        self.testsuites.extend(testsuites);
        self
    }

    /// Reads a report from a string.
    ///
    /// Every `testsuite` element that is a direct child of a `testsuites` element is picked up,
    /// wherever the `testsuites` element sits in the document. All direct child elements of a
    /// suite become its entries.
    pub fn deserialize_from_str(input: &str) -> Result<Self, DeserializeError> {
        deserialize_report(input)
    }

    /// Serialize this report to the given writer.
    pub fn serialize(&self, writer: impl io::Write) -> Result<(), SerializeError> {
        serialize_report(self, writer)
    }

    /// Serialize this report to a string.
    pub fn to_string(&self) -> Result<String, SerializeError> {
        let mut buf: Vec<u8> = vec![];
        self.serialize(&mut buf)?;
        String::from_utf8(buf).map_err(SerializeError::from_utf8)
    }
}

/// Represents a single testsuite.
///
/// A `Testsuite` groups together several entries, which are usually `testcase` elements.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct Testsuite {
    /// The name of this testsuite. Suites with the same name are merged together.
    pub name: String,

    /// The total number of entries in this testsuite.
    pub tests: usize,

    /// The total number of assertions made by entries in this testsuite.
    pub assertions: usize,

    /// The total number of `failure` elements found under this testsuite's entries.
    pub failures: usize,

    /// The total number of `error` elements found under this testsuite's entries.
    pub errors: usize,

    /// The time taken by the testsuite, in seconds.
    pub time: f64,

    /// The entries of this testsuite, kept as-is.
    pub entries: Vec<Element>,
}

impl Testsuite {
    /// Creates a new `Testsuite` with no entries.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tests: 0,
            assertions: 0,
            failures: 0,
            errors: 0,
            time: 0.0,
            entries: vec![],
        }
    }

    /// Adds an entry, updating the `tests`, `assertions`, `failures` and `errors` counts.
    ///
    /// The time is left alone: callers decide how entry times combine. See
    /// [`Self::set_time`].
    pub fn add_entry(&mut self, entry: Element) -> &mut Self {
        self.tests += 1;
        self.assertions += entry.assertions();
        self.failures += entry.failure_count();
        self.errors += entry.error_count();
        self.entries.push(entry);
        self
    }

    /// Adds several entries. See [`Self::add_entry`].
    pub fn add_entries(&mut self, entries: impl IntoIterator<Item = Element>) -> &mut Self {
        for entry in entries {
            self.add_entry(entry);
        }
        self
    }

    /// Sets the time taken by this testsuite, in seconds.
    pub fn set_time(&mut self, time: f64) -> &mut Self {
        self.time = time;
        self
    }
}

/// A node within an [`Element`].
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// A nested element.
    Element(Element),

    /// Unescaped character data.
    Text(String),

    /// The contents of a `<![CDATA[...]]>` section.
    CData(String),

    /// The contents of a `<!-- ... -->` comment.
    Comment(String),
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A generic XML element.
///
/// Attribute order is preserved. Attribute values and text are stored unescaped.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    /// Creates a new element with the given tag name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: vec![],
        }
    }

    /// Returns the tag name of this element.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the value of the given attribute, if present.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|v| v.as_str())
    }

    /// Iterates over the attributes of this element, in order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Sets an attribute. An existing attribute keeps its position.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Returns the child nodes of this element.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Appends a child node.
    pub fn add_child(&mut self, child: impl Into<Node>) -> &mut Self {
        self.children.push(child.into());
        self
    }

    /// Appends a text node.
    pub fn add_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Iterates over the direct child elements of this element.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Iterates over all elements below this one, in document order. This element is not
    /// included.
    pub fn descendants(&self) -> Descendants<'_> {
        let mut stack: Vec<_> = self.child_elements().collect();
        stack.reverse();
        Descendants { stack }
    }

    /// The `assertions` attribute, or 0 if missing or not a number.
    pub fn assertions(&self) -> usize {
        self.attribute("assertions")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    /// The `time` attribute in seconds, or 0 if missing or not a number.
    pub fn time(&self) -> f64 {
        self.attribute("time")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
            .unwrap_or(0.0)
    }

    /// The number of `failure` elements below this one.
    pub fn failure_count(&self) -> usize {
        self.descendants().filter(|e| e.name == "failure").count()
    }

    /// The number of `error` elements below this one.
    pub fn error_count(&self) -> usize {
        self.descendants().filter(|e| e.name == "error").count()
    }

    /// The identity used to deduplicate reruns: `<class>::<name>`.
    ///
    /// `class` falls back to `classname` when absent.
    pub fn merge_key(&self) -> String {
        let class = self
            .attribute("class")
            .or_else(|| self.attribute("classname"))
            .unwrap_or_default();
        let name = self.attribute("name").unwrap_or_default();
        format!("{class}::{name}")
    }
}

/// Iterator returned by [`Element::descendants`].
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        let len = self.stack.len();
        self.stack.extend(next.child_elements());
        self.stack[len..].reverse();
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn testcase(class: &str, name: &str) -> Element {
        let mut element = Element::new("testcase");
        element.set_attribute("class", class).set_attribute("name", name);
        element
    }

    #[test]
    fn descendants_in_document_order() {
        let mut outer = Element::new("a");
        let mut b = Element::new("b");
        b.add_child(Element::new("c"));
        outer.add_child(b).add_text("x").add_child(Element::new("d"));

        let names: Vec<_> = outer.descendants().map(|e| e.name()).collect();
        assert_eq!(names, vec!["b", "c", "d"]);
    }

    #[test]
    fn add_entry_updates_counts() {
        let mut failing = testcase("Foo", "bar");
        failing.set_attribute("assertions", "3");
        let mut failure = Element::new("failure");
        failure.add_text("boom");
        failing.add_child(failure);

        let mut erroring = testcase("Foo", "baz");
        erroring.set_attribute("assertions", "not-a-number");
        erroring.add_child(Element::new("error"));

        let mut suite = Testsuite::new("unit");
        suite.add_entries([failing, erroring, testcase("Foo", "qux")]);

        assert_eq!(suite.tests, 3);
        assert_eq!(suite.assertions, 3);
        assert_eq!(suite.failures, 1);
        assert_eq!(suite.errors, 1);
        assert_eq!(suite.time, 0.0);
    }

    #[test]
    fn merge_key_falls_back_to_classname() {
        assert_eq!(testcase("Foo", "bar").merge_key(), "Foo::bar");

        let mut element = Element::new("testcase");
        element
            .set_attribute("classname", "Baz")
            .set_attribute("name", "qux");
        assert_eq!(element.merge_key(), "Baz::qux");
    }

    #[test]
    fn time_is_lenient() {
        let mut element = Element::new("testcase");
        assert_eq!(element.time(), 0.0);
        element.set_attribute("time", " 1.25 ");
        assert_eq!(element.time(), 1.25);
        element.set_attribute("time", "NaN");
        assert_eq!(element.time(), 0.0);
    }
}
