//! Owned SVG element tree on top of quick-xml.
//!
//! Only what the exporter needs: elements with ordered attributes, and every
//! other event (text, comments, CDATA) kept verbatim so it round-trips.
//! Whitespace-only text is dropped on read and the output is re-indented.

use quick_xml::{
    Reader, Writer,
    escape::{EscapeError, unescape},
    events::{BytesEnd, BytesStart, Event, attributes::AttrError},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SvgError {
    #[error("XML parse error at position {position}")]
    Parse {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    #[error("document has no root element")]
    NoRoot,

    #[error("unbalanced or misplaced element `{0}`")]
    Unbalanced(String),

    #[error("no element with id `{0}`")]
    Missing(String),

    #[error("transformed size {0} is too large")]
    TooLarge(f64),

    #[error("malformed attribute")]
    Attribute(#[from] AttrError),

    #[error("malformed entity in attribute value")]
    Escape(#[from] EscapeError),

    #[error("document is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("serialized document is not valid UTF-8")]
    FromUtf8(#[from] std::string::FromUtf8Error),

    #[error("failed to serialize document")]
    Xml(#[from] quick_xml::Error),

    #[error("failed to serialize document")]
    Write(#[from] std::io::Error),
}

/// A child of an element.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Text, comment, CDATA, processing instruction or entity reference.
    Other(Event<'static>),
}

#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Element name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Replace an attribute in place, or append it.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    #[cfg(test)]
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Other(_) => None,
        })
    }

    /// Pre-order search; returns child indexes leading to the first match.
    fn locate(&self, pred: &impl Fn(&Element) -> bool, path: &mut Vec<usize>) -> bool {
        for (index, node) in self.children.iter().enumerate() {
            let Node::Element(child) = node else {
                continue;
            };
            path.push(index);
            if pred(child) || child.locate(pred, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, SvgError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let raw = std::str::from_utf8(&attr.value)?;
            attrs.push((key, unescape(raw)?.into_owned()));
        }
        Ok(Self {
            name,
            attrs,
            children: Vec::new(),
        })
    }

    fn write<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<(), SvgError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attrs {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.children.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for child in &self.children {
            match child {
                Node::Element(element) => element.write(writer)?,
                Node::Other(event) => writer.write_event(event.clone())?,
            }
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// Child-index path from the root to a descendant.
pub type NodePath = Vec<usize>;

/// Parsed SVG document.
#[derive(Debug, Clone)]
pub struct Document {
    /// XML declaration, doctype and comments before the root.
    pub prolog: Vec<Event<'static>>,
    pub root: Element,
}

impl Document {
    pub fn parse(markup: &str) -> Result<Self, SvgError> {
        let mut reader = Reader::from_str(markup);

        let mut prolog = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root = None;

        loop {
            let event = reader.read_event().map_err(|source| SvgError::Parse {
                position: reader.error_position(),
                source,
            })?;
            match event {
                Event::Start(start) => stack.push(Element::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Element::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        SvgError::Unbalanced(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                    })?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Eof => break,
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => {}
                other => match stack.last_mut() {
                    Some(parent) => parent.children.push(Node::Other(other.into_owned())),
                    None if root.is_none() => prolog.push(other.into_owned()),
                    // trailing comments after the root are dropped
                    None => {}
                },
            }
        }

        if let Some(open) = stack.pop() {
            return Err(SvgError::Unbalanced(open.name));
        }
        let root = root.ok_or(SvgError::NoRoot)?;
        Ok(Self { prolog, root })
    }

    /// Serialize with two-space indentation.
    pub fn to_markup(&self) -> Result<String, SvgError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        for event in &self.prolog {
            writer.write_event(event.clone())?;
        }
        self.root.write(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Path to the first descendant of the root matching `pred`.
    pub fn locate(&self, pred: impl Fn(&Element) -> bool) -> Option<NodePath> {
        let mut path = Vec::new();
        self.root.locate(&pred, &mut path).then_some(path)
    }

    /// Path to the first descendant with the given `id`.
    #[cfg(test)]
    pub fn locate_id(&self, id: &str) -> Option<NodePath> {
        self.locate(|element| element.id() == Some(id))
    }

    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        path.iter().try_fold(&self.root, |element, &index| {
            match element.children.get(index)? {
                Node::Element(child) => Some(child),
                Node::Other(_) => None,
            }
        })
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        path.iter().try_fold(&mut self.root, |element, &index| {
            match element.children.get_mut(index)? {
                Node::Element(child) => Some(child),
                Node::Other(_) => None,
            }
        })
    }

    /// Insert `element` as a sibling of the node at `path`.
    ///
    /// `after = false` places it immediately before, `true` immediately after.
    /// Returns the path of the inserted element.
    pub fn insert_sibling(
        &mut self,
        path: &[usize],
        element: Element,
        after: bool,
    ) -> Option<NodePath> {
        let (&index, parent_path) = path.split_last()?;
        let parent = self.element_mut(parent_path)?;
        let at = if after { index + 1 } else { index };
        parent.children.insert(at, Node::Element(element));

        let mut inserted = parent_path.to_vec();
        inserted.push(at);
        Some(inserted)
    }

    /// Detach the element at `path`.
    pub fn remove(&mut self, path: &[usize]) -> Option<Element> {
        let (&index, parent_path) = path.split_last()?;
        let parent = self.element_mut(parent_path)?;
        if !matches!(parent.children.get(index), Some(Node::Element(_))) {
            return None;
        }
        match parent.children.remove(index) {
            Node::Element(element) => Some(element),
            Node::Other(_) => None,
        }
    }
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), SvgError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None if root.is_none() => *root = Some(element),
        None => return Err(SvgError::Unbalanced(element.name)),
    }
    Ok(())
}

// ============================================================================
// tests
// ============================================================================
