//! Lossless XML element tree for WordprocessingML parts.
//!
//! `document.xml` is parsed into an explicit tree, mutated in place, and
//! serialized back. Elements and attributes the merger does not understand
//! are carried through untouched, so template styling survives a round trip.
//!
//! Attribute values are kept exactly as they appear in the source (still
//! escaped) and re-emitted verbatim; text content is unescaped on read and
//! re-escaped on write.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use std::borrow::Cow;
use std::io::Cursor;

/// A node in the element tree.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    /// An element with attributes and children
    Element(XmlElement),
    /// Unescaped character data
    Text(String),
    /// A comment, carried through verbatim
    Comment(String),
}

/// An XML element with its qualified name, raw attributes, and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    /// Qualified element name, e.g. `w:p`
    pub name: String,
    /// Attribute pairs; values are raw (source-escaped) text
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element with the given qualified name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The name without its namespace prefix (`w:tbl` -> `tbl`).
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    /// Whether this element has the given local name.
    #[inline]
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Get a raw attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    /// Iterate over child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Iterate mutably over child elements.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(el) => Some(el),
            _ => None,
        })
    }

    /// Iterate over child elements with the given local name.
    pub fn children_named<'a, 'b>(
        &'a self,
        local: &'b str,
    ) -> impl Iterator<Item = &'a XmlElement> + use<'a, 'b> {
        self.child_elements().filter(move |el| el.is(local))
    }

    /// Iterate mutably over child elements with the given local name.
    pub fn children_named_mut<'a, 'b>(
        &'a mut self,
        local: &'b str,
    ) -> impl Iterator<Item = &'a mut XmlElement> + use<'a, 'b> {
        self.child_elements_mut().filter(move |el| el.is(local))
    }

    /// First child element with the given local name.
    pub fn first_child(&self, local: &str) -> Option<&XmlElement> {
        self.children_named(local).next()
    }

    /// First child element with the given local name, mutable.
    pub fn first_child_mut(&mut self, local: &str) -> Option<&mut XmlElement> {
        self.children_named_mut(local).next()
    }

    /// Append a child element.
    pub fn push_element(&mut self, el: XmlElement) {
        self.children.push(XmlNode::Element(el));
    }

    /// Concatenated text of all direct text children.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                out.push_str(t);
            }
        }
        out
    }
}

/// A parsed XML part: the optional declaration plus the root element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlPart {
    /// Whether the source had an XML declaration
    has_decl: bool,
    /// The document root element
    pub root: XmlElement,
}

impl XmlPart {
    /// Parse an XML part into an element tree.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        let mut has_decl = false;
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root = None;
        let mut buf = Vec::with_capacity(1024);

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf) {
                Ok(Event::Decl(_)) => {
                    has_decl = true;
                },
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e));
                },
                Ok(Event::Empty(e)) => {
                    let el = element_from_start(&e);
                    attach(&mut stack, &mut root, XmlNode::Element(el))?;
                },
                Ok(Event::End(_)) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unbalanced end tag".to_string()))?;
                    attach(&mut stack, &mut root, XmlNode::Element(el))?;
                },
                Ok(Event::Text(t)) => {
                    // Text outside the root is insignificant whitespace
                    if let Some(parent) = stack.last_mut() {
                        let decoded = t.decode().map_err(|e| Error::Xml(e.to_string()))?;
                        let text = quick_xml::escape::unescape(&decoded)
                            .map_err(|e| Error::Xml(e.to_string()))?
                            .into_owned();
                        parent.children.push(XmlNode::Text(text));
                    }
                },
                Ok(Event::GeneralRef(r)) => {
                    // quick-xml emits entity references (`&amp;`, `&#65;`) as a
                    // separate event; resolve it and fold it into the surrounding
                    // text run so the parent sees one unescaped text node.
                    if let Some(parent) = stack.last_mut() {
                        let name = r.decode().map_err(|e| Error::Xml(e.to_string()))?;
                        let raw = format!("&{};", name);
                        let resolved = quick_xml::escape::unescape(&raw)
                            .map_err(|e| Error::Xml(e.to_string()))?
                            .into_owned();
                        if let Some(XmlNode::Text(last)) = parent.children.last_mut() {
                            last.push_str(&resolved);
                        } else {
                            parent.children.push(XmlNode::Text(resolved));
                        }
                    }
                },
                Ok(Event::CData(c)) => {
                    if let Some(parent) = stack.last_mut() {
                        let text = String::from_utf8_lossy(&c.into_inner()).into_owned();
                        parent.children.push(XmlNode::Text(text));
                    }
                },
                Ok(Event::Comment(c)) => {
                    let text = String::from_utf8_lossy(c.as_ref()).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Comment(text));
                    }
                },
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => return Err(Error::Xml(e.to_string())),
            }
        }

        if !stack.is_empty() {
            return Err(Error::Xml("unclosed element at end of input".to_string()));
        }

        match root {
            Some(root) => Ok(Self { has_decl, root }),
            None => Err(Error::Xml("no root element".to_string())),
        }
    }

    /// Serialize the tree back to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = Writer::new(Cursor::new(Vec::with_capacity(4096)));
        if self.has_decl {
            writer
                .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
                .map_err(|e| Error::Xml(e.to_string()))?;
        }
        write_element(&mut writer, &self.root)?;
        Ok(writer.into_inner().into_inner())
    }
}

fn element_from_start(e: &BytesStart) -> XmlElement {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    // Values stay raw: they are re-emitted verbatim, never interpreted
    for attr in e.attributes().with_checks(false).flatten() {
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = String::from_utf8_lossy(&attr.value).into_owned();
        attrs.push((key, value));
    }
    XmlElement {
        name,
        attrs,
        children: Vec::new(),
    }
}

fn attach(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, node: XmlNode) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(node);
            Ok(())
        },
        None => match node {
            XmlNode::Element(el) => {
                if root.is_some() {
                    return Err(Error::Xml("multiple root elements".to_string()));
                }
                *root = Some(el);
                Ok(())
            },
            // Comments outside the root are dropped
            _ => Ok(()),
        },
    }
}

fn write_element<W: std::io::Write>(writer: &mut Writer<W>, el: &XmlElement) -> Result<()> {
    let mut start = BytesStart::new(el.name.as_str());
    for (key, value) in &el.attrs {
        // Raw value passthrough; the (&str, &str) conversion would re-escape
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Borrowed(value.as_bytes()),
        });
    }

    if el.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| Error::Xml(e.to_string()))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| Error::Xml(e.to_string()))?;
    for child in &el.children {
        match child {
            XmlNode::Element(el) => write_element(writer, el)?,
            XmlNode::Text(t) => {
                writer
                    .write_event(Event::Text(BytesText::new(t)))
                    .map_err(|e| Error::Xml(e.to_string()))?;
            },
            XmlNode::Comment(c) => {
                writer
                    .write_event(Event::Comment(BytesText::from_escaped(c.as_str())))
                    .map_err(|e| Error::Xml(e.to_string()))?;
            },
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(el.name.as_str())))
        .map_err(|e| Error::Xml(e.to_string()))?;
    Ok(())
}
