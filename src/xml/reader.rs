//! Streaming element reader.
//!
//! Wraps the quick-xml event stream and reassembles one owned [`RawNode`]
//! subtree per depth-1 element of the document (each `<node>`, `<way>`,
//! `<relation>`, `<bounds>`, ... directly under the root). The root element
//! itself is never materialized, so memory stays bounded by a single
//! element's subtree on arbitrarily large exports.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;
use crate::xml::RawNode;

/// Streaming reader yielding one element subtree at a time.
pub struct ElementReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Open elements inside the root, outermost first.
    stack: Vec<RawNode>,
    /// Whether the start tag of the document root has been consumed.
    root_open: bool,
}

impl ElementReader<BufReader<File>> {
    /// Open a file for streaming element reads.
    ///
    /// # Arguments
    /// * `path` - Path to the XML file
    pub fn from_path(path: &Path) -> Result<Self> {
        let reader = Reader::from_file(path)?;
        Ok(Self::new(reader))
    }
}

impl<'a> ElementReader<&'a [u8]> {
    /// Read elements from an in-memory XML string.
    #[must_use]
    pub fn from_str(xml: &'a str) -> Self {
        Self::new(Reader::from_reader(xml.as_bytes()))
    }
}

impl<R: BufRead> ElementReader<R> {
    fn new(reader: Reader<R>) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            stack: Vec::new(),
            root_open: false,
        }
    }

    /// Read the next complete depth-1 element subtree.
    ///
    /// # Returns
    /// * `Ok(Some(node))` - the next element, with its full subtree attached
    /// * `Ok(None)` - end of input
    /// * `Err(_)` - the document is not well-formed XML
    pub fn next_element(&mut self) -> Result<Option<RawNode>> {
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Start(start) => {
                    let node = node_from_start(&start)?;
                    if self.root_open {
                        self.stack.push(node);
                    } else {
                        // The document root: remember it is open but do not
                        // build a tree for it.
                        self.root_open = true;
                    }
                }
                Event::Empty(start) => {
                    let node = node_from_start(&start)?;
                    if !self.root_open {
                        // Degenerate document with an empty root element.
                        return Ok(None);
                    }
                    match self.stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(Some(node)),
                    }
                }
                Event::End(_) => {
                    let Some(node) = self.stack.pop() else {
                        // Closing tag of the document root.
                        self.root_open = false;
                        continue;
                    };
                    match self.stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => return Ok(Some(node)),
                    }
                }
                Event::Eof => return Ok(None),
                // Text, comments, declarations and processing instructions
                // carry no element data in a map export.
                _ => {}
            }
        }
    }
}

/// Build a childless `RawNode` from a start (or empty) tag.
fn node_from_start(start: &BytesStart<'_>) -> Result<RawNode> {
    let kind = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut node = RawNode::new(kind);
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attribute.value);
        let value = unescape(&raw)?.into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}
