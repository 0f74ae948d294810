// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A small, lenient tree for report pages.
//!
//! Text, comments and attribute values are kept exactly as written (still escaped), so that a
//! page survives a parse and serialize cycle unchanged apart from normalized tag syntax.

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};
use swrite::{SWrite, swrite};

/// Elements that never have children or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Elements whose contents are read without looking for markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

/// An error that occurred while parsing a page.
#[derive(Debug)]
pub(crate) struct DomParseError {
    pub(crate) position: usize,
    pub(crate) error: quick_xml::Error,
}

/// A parsed page: a list of top-level nodes.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct HtmlDocument {
    pub(crate) nodes: Vec<HtmlNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum HtmlNode {
    Element(HtmlElement),
    /// Raw, still-escaped text.
    Text(String),
    Comment(String),
    CData(String),
    Doctype(String),
    ProcessingInstruction(String),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct HtmlElement {
    pub(crate) name: String,
    /// Raw, still-escaped attribute values, in document order.
    pub(crate) attributes: Vec<(String, String)>,
    pub(crate) children: Vec<HtmlNode>,
}

impl HtmlDocument {
    pub(crate) fn parse(input: &str) -> Result<Self, DomParseError> {
        // Byte offset of the reader's input within `input`. The reader restarts after each
        // raw-text element.
        let mut offset = 0;
        let mut reader = page_reader(input);

        // The bottom of the stack collects top-level nodes.
        let mut stack = vec![HtmlElement::new("")];
        loop {
            let event = reader.read_event().map_err(|error| DomParseError {
                position: offset + reader.buffer_position(),
                error,
            })?;
            let parent = stack.last_mut().expect("stack always has the root");
            match event {
                Event::Start(start) => {
                    let element = HtmlElement::from_start(&start);
                    if is_void(&element.name) {
                        parent.children.push(HtmlNode::Element(element));
                    } else if is_raw_text(&element.name) {
                        let mut element = element;
                        offset += reader.buffer_position();
                        let (text, consumed) = split_raw_text(&input[offset..], &element.name);
                        if !text.is_empty() {
                            element.children.push(HtmlNode::Text(text.to_owned()));
                        }
                        parent.children.push(HtmlNode::Element(element));
                        offset += consumed;
                        reader = page_reader(&input[offset..]);
                    } else {
                        stack.push(element);
                    }
                }
                Event::Empty(start) => {
                    parent
                        .children
                        .push(HtmlNode::Element(HtmlElement::from_start(&start)));
                }
                Event::End(end) => {
                    let name = String::from_utf8_lossy(end.name().as_ref()).into_owned();
                    // Close up to the matching element. A stray end tag is dropped.
                    if let Some(pos) = stack
                        .iter()
                        .skip(1)
                        .rposition(|e| e.name.eq_ignore_ascii_case(&name))
                    {
                        close_to(&mut stack, pos + 1);
                    }
                }
                Event::Text(text) => {
                    parent
                        .children
                        .push(HtmlNode::Text(String::from_utf8_lossy(&text).into_owned()));
                }
                Event::CData(data) => {
                    parent
                        .children
                        .push(HtmlNode::CData(String::from_utf8_lossy(&data).into_owned()));
                }
                Event::Comment(comment) => {
                    parent.children.push(HtmlNode::Comment(
                        String::from_utf8_lossy(&comment).into_owned(),
                    ));
                }
                Event::DocType(doctype) => {
                    parent.children.push(HtmlNode::Doctype(
                        String::from_utf8_lossy(&doctype).trim().to_owned(),
                    ));
                }
                Event::PI(pi) => {
                    parent.children.push(HtmlNode::ProcessingInstruction(
                        String::from_utf8_lossy(&pi).into_owned(),
                    ));
                }
                // Pages are written without an XML declaration.
                Event::Decl(_) => {}
                Event::Eof => break,
            }
        }

        // Unclosed elements are closed at the end of input.
        close_to(&mut stack, 1);
        let root = stack.pop().expect("stack always has the root");
        Ok(Self {
            nodes: root.children,
        })
    }

    pub(crate) fn to_html(&self) -> String {
        let mut out = String::new();
        for node in &self.nodes {
            node.write_html(&mut out);
        }
        out
    }

    pub(crate) fn elements(&self) -> impl Iterator<Item = &HtmlElement> + '_ {
        self.nodes.iter().filter_map(HtmlNode::as_element)
    }

    /// The first element in document order matching `pred`.
    pub(crate) fn find(&self, pred: impl Fn(&HtmlElement) -> bool + Copy) -> Option<&HtmlElement> {
        self.elements().find_map(|e| e.find(pred))
    }

    /// The first element in document order matching `pred`.
    pub(crate) fn find_mut(
        &mut self,
        pred: impl Fn(&HtmlElement) -> bool + Copy,
    ) -> Option<&mut HtmlElement> {
        self.nodes
            .iter_mut()
            .filter_map(HtmlNode::as_element_mut)
            .find_map(|e| e.find_mut(pred))
    }

    /// The table inside `div.layout` that holds the scenario rows.
    pub(crate) fn layout_table(&self) -> Option<&HtmlElement> {
        self.find(|e| e.is("div") && e.attr("class") == Some("layout"))?
            .child_element("table")
    }

    pub(crate) fn layout_table_mut(&mut self) -> Option<&mut HtmlElement> {
        self.find_mut(|e| e.is("div") && e.attr("class") == Some("layout"))?
            .child_element_mut("table")
    }
}

fn page_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    reader.trim_text(false);
    reader.check_end_names(false);
    reader
}

/// Splits the contents of a raw-text element `name` off the start of `rest`.
///
/// Returns the contents and the number of bytes consumed, end tag included. Without an end tag
/// the element runs to the end of input.
fn split_raw_text<'a>(rest: &'a str, name: &str) -> (&'a str, usize) {
    let bytes = rest.as_bytes();
    let mut from = 0;
    while let Some(pos) = rest[from..].find("</") {
        let start = from + pos;
        let name_end = start + 2 + name.len();
        if bytes
            .get(start + 2..name_end)
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()))
            && bytes
                .get(name_end)
                .is_none_or(|&b| b == b'>' || b == b'/' || b.is_ascii_whitespace())
        {
            let consumed = rest[name_end..]
                .find('>')
                .map_or(rest.len(), |close| name_end + close + 1);
            return (&rest[..start], consumed);
        }
        from = start + 2;
    }
    (rest, rest.len())
}

fn close_to(stack: &mut Vec<HtmlElement>, len: usize) {
    while stack.len() > len {
        let element = stack.pop().expect("stack is longer than len");
        stack
            .last_mut()
            .expect("stack always has the root")
            .children
            .push(HtmlNode::Element(element));
    }
}

impl HtmlNode {
    pub(crate) fn as_element(&self) -> Option<&HtmlElement> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn as_element_mut(&mut self) -> Option<&mut HtmlElement> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_html(out),
            Self::Text(text) => out.push_str(text),
            Self::Comment(comment) => swrite!(out, "<!--{comment}-->"),
            Self::CData(data) => swrite!(out, "<![CDATA[{data}]]>"),
            Self::Doctype(doctype) => swrite!(out, "<!DOCTYPE {doctype}>"),
            Self::ProcessingInstruction(pi) => swrite!(out, "<?{pi}?>"),
        }
    }
}

impl HtmlElement {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> Self {
        let mut element = Self::new(String::from_utf8_lossy(start.name().as_ref()));
        // Attributes that can't be read are dropped.
        for attr in start.html_attributes().flatten() {
            element.attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                String::from_utf8_lossy(&attr.value).into_owned(),
            ));
        }
        element
    }

    pub(crate) fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub(crate) fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute. An existing attribute keeps its position.
    pub(crate) fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
        {
            Some((_, v)) => *v = value,
            None => self.attributes.push((key.to_owned(), value)),
        }
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    pub(crate) fn child_elements(&self) -> impl Iterator<Item = &HtmlElement> + '_ {
        self.children.iter().filter_map(HtmlNode::as_element)
    }

    pub(crate) fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut HtmlElement> + '_ {
        self.children.iter_mut().filter_map(HtmlNode::as_element_mut)
    }

    pub(crate) fn child_element(&self, name: &str) -> Option<&HtmlElement> {
        self.child_elements().find(|e| e.is(name))
    }

    pub(crate) fn child_element_mut(&mut self, name: &str) -> Option<&mut HtmlElement> {
        self.child_elements_mut().find(|e| e.is(name))
    }

    /// Depth-first search, including this element.
    pub(crate) fn find(&self, pred: impl Fn(&HtmlElement) -> bool + Copy) -> Option<&HtmlElement> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(pred))
    }

    /// Depth-first search, including this element.
    pub(crate) fn find_mut(
        &mut self,
        pred: impl Fn(&HtmlElement) -> bool + Copy,
    ) -> Option<&mut HtmlElement> {
        if pred(self) {
            return Some(self);
        }
        self.child_elements_mut()
            .find_map(|child| child.find_mut(pred))
    }

    /// Collects every matching element at or below this one, in document order.
    pub(crate) fn find_all<'a>(
        &'a self,
        pred: impl Fn(&HtmlElement) -> bool + Copy,
        out: &mut Vec<&'a HtmlElement>,
    ) {
        if pred(self) {
            out.push(self);
        }
        for child in self.child_elements() {
            child.find_all(pred, out);
        }
    }

    /// The concatenated raw text of this element and its descendants.
    pub(crate) fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                HtmlNode::Element(element) => element.collect_text(out),
                HtmlNode::Text(text) | HtmlNode::CData(text) => out.push_str(text),
                _ => {}
            }
        }
    }

    /// Replaces all children with a single text node. `text` is escaped.
    pub(crate) fn set_text(&mut self, text: &str) {
        self.children = vec![HtmlNode::Text(escape_text(text))];
    }

    fn write_html(&self, out: &mut String) {
        swrite!(out, "<{}", self.name);
        for (key, value) in &self.attributes {
            swrite!(out, " {key}=\"{}\"", value.replace('"', "&quot;"));
        }
        out.push('>');
        if is_void(&self.name) {
            return;
        }
        for child in &self.children {
            child.write_html(out);
        }
        swrite!(out, "</{}>", self.name);
    }
}

pub(crate) fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn lenient_round_trip() {
        let input = indoc! {r#"
            <!DOCTYPE html>
            <html>
            <head>
              <meta charset="utf-8">
              <script>if (a < b && c) { show(); }</script>
            </head>
            <body>
              <!-- toolbar -->
              <p class=note hidden>Tom &amp; Jerry<br>next</p>
            </body>
            </html>
        "#};

        let document = HtmlDocument::parse(input).expect("page parses");
        let expected = indoc! {r#"
            <!DOCTYPE html>
            <html>
            <head>
              <meta charset="utf-8">
              <script>if (a < b && c) { show(); }</script>
            </head>
            <body>
              <!-- toolbar -->
              <p class="note" hidden="">Tom &amp; Jerry<br>next</p>
            </body>
            </html>
        "#};
        assert_eq!(document.to_html(), expected);
    }

    #[test_case(
        "<script>if (a < b) { x = '</div>'; }</script><p>after</p>",
        "<script>if (a < b) { x = '</div>'; }</script><p>after</p>"
        ; "markup inside script"
    )]
    #[test_case(
        "<STYLE>a < b {}</style ><p>after</p>",
        "<STYLE>a < b {}</STYLE><p>after</p>"
        ; "case-insensitive end tag"
    )]
    #[test_case(
        "<script>x = '</scripts>';</script>",
        "<script>x = '</scripts>';</script>"
        ; "longer tag name is text"
    )]
    #[test_case(
        "<div><script>if (a < b)",
        "<div><script>if (a < b)</script></div>"
        ; "unterminated script"
    )]
    fn raw_text_elements(input: &str, expected: &str) {
        let document = HtmlDocument::parse(input).expect("page parses");
        assert_eq!(document.to_html(), expected);
    }

    #[test]
    fn mismatched_end_tags() {
        let document =
            HtmlDocument::parse("<div><span>a</div><b>c</i></b>").expect("page parses");
        assert_eq!(
            document.to_html(),
            "<div><span>a</span></div><b>c</b>",
            "unmatched end tags close open elements or are dropped"
        );
    }

    #[test]
    fn find_and_edit() {
        let mut document = HtmlDocument::parse(
            r#"<div class="layout"><table><tr class="scenarioRow scenarioSuccess"><td>x</td></tr></table></div>"#,
        )
        .expect("page parses");

        let table = document.layout_table().expect("layout table present");
        let row = table.child_element("tr").expect("row present");
        assert!(row.has_class("scenarioSuccess"));
        assert!(!row.has_class("scenario"));

        let cell = document
            .find_mut(|e| e.is("td"))
            .expect("cell present");
        cell.set_text("a < b");
        cell.set_attr("class", "value");
        assert_eq!(
            document.to_html(),
            r#"<div class="layout"><table><tr class="scenarioRow scenarioSuccess"><td class="value">a &lt; b</td></tr></table></div>"#
        );
    }
}
