use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::errors::{BackupError, BackupResult};

/// A parsed XML element. Attribute values are entity-decoded; text is kept
/// exactly as it appears in the document so callers decide how to unescape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parse a whole document. The returned node is a nameless document
    /// root whose children are the top-level elements.
    pub fn parse(bytes: &[u8]) -> BackupResult<XmlNode> {
        let source = String::from_utf8_lossy(bytes);
        let mut reader = Reader::from_str(&source);

        let mut stack = vec![XmlNode::default()];

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let node = Self::from_start(&start)?;
                    Self::current(&mut stack)?.children.push(node);
                }
                Event::End(_) => {
                    if stack.len() < 2 {
                        return Err(BackupError::MalformedFeed(
                            "unexpected closing tag".to_string(),
                        ));
                    }
                    if let Some(node) = stack.pop() {
                        Self::current(&mut stack)?.children.push(node);
                    }
                }
                Event::Text(text) => {
                    let raw = text.into_inner();
                    Self::current(&mut stack)?
                        .text
                        .push_str(&String::from_utf8_lossy(&raw));
                }
                Event::CData(data) => {
                    let raw = data.into_inner();
                    Self::current(&mut stack)?
                        .text
                        .push_str(&String::from_utf8_lossy(&raw));
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions, doctype
                _ => {}
            }
        }

        match stack.pop() {
            Some(root) if stack.is_empty() => Ok(root),
            _ => Err(BackupError::MalformedFeed(
                "document ended inside an element".to_string(),
            )),
        }
    }

    fn from_start(start: &BytesStart<'_>) -> BackupResult<XmlNode> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }

        Ok(XmlNode {
            name,
            attributes,
            ..Default::default()
        })
    }

    fn current(stack: &mut [XmlNode]) -> BackupResult<&mut XmlNode> {
        stack
            .last_mut()
            .ok_or_else(|| BackupError::MalformedFeed("unbalanced document".to_string()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn find_child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Depth-first search, document order.
    pub fn find_descendant(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find_map(|c| {
            if c.name == name {
                Some(c)
            } else {
                c.find_descendant(name)
            }
        })
    }

    /// Every element called `name` below this node, in document order.
    /// Matches are not searched further.
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlNode>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            } else {
                child.collect_named(name, found);
            }
        }
    }
}
