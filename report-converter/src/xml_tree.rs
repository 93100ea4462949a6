// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A minimal owned element tree, read with `quick-xml`.
//!
//! Test reports are small enough to hold in memory, and both report formats only need
//! parent/child selection and attribute lookup.

use crate::errors::XmlReadError;
use indexmap::IndexMap;
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

/// An XML element with its attributes, child elements and direct text content.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct XmlElement {
    pub(crate) name: String,
    pub(crate) attributes: IndexMap<String, String>,
    pub(crate) children: Vec<XmlElement>,
    /// Text and CDATA sections directly inside this element, concatenated.
    pub(crate) text: String,
}

impl XmlElement {
    /// Returns the value of an attribute, unescaped.
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Returns the child elements with the given name, in document order.
    pub(crate) fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Reads a complete document and returns its root element.
///
/// Comments, processing instructions, the XML declaration and the doctype are skipped.
pub(crate) fn read_document(input: &str) -> Result<XmlElement, XmlReadError> {
    let mut reader = Reader::from_str(input);

    // Elements that have been opened but not yet closed, innermost last.
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = element_from_start(&reader, &start)?;
                check_single_root(root.is_some(), &stack, &element)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let element = element_from_start(&reader, &start)?;
                check_single_root(root.is_some(), &stack, &element)?;
                close_element(element, &mut stack, &mut root);
            }
            Event::End(end) => {
                let end_name = end.name();
                let name = reader.decoder().decode(end_name.as_ref())?;
                match stack.pop() {
                    Some(element) => close_element(element, &mut stack, &mut root),
                    None => {
                        return Err(XmlReadError::UnexpectedEndTag {
                            name: name.into_owned(),
                        });
                    }
                }
            }
            Event::Text(text) => {
                // Text outside the root element can only be whitespace in a valid document, and
                // carries no information either way.
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&reader.decoder().decode(&cdata)?);
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) | Event::Comment(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlReadError::UnclosedElement { name: open.name });
    }
    root.ok_or(XmlReadError::NoRootElement)
}

fn element_from_start(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<XmlElement, XmlReadError> {
    let decoder = reader.decoder();
    let name = decoder.decode(start.name().as_ref())?.into_owned();

    let mut attributes = IndexMap::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::from)?;
        let key = decoder.decode(attribute.key.as_ref())?.into_owned();
        let value = attribute.unescape_value()?.into_owned();
        attributes.insert(key, value);
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn check_single_root(
    root_closed: bool,
    stack: &[XmlElement],
    element: &XmlElement,
) -> Result<(), XmlReadError> {
    if root_closed && stack.is_empty() {
        return Err(XmlReadError::MultipleRootElements {
            name: element.name.clone(),
        });
    }
    Ok(())
}

fn close_element(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}
