//! Pull-based XML event sources feeding [`XmlReader`](crate::XmlReader).
//!
//! The reader never looks at raw XML. It pulls one [`XmlEvent`] at a time from
//! an [`XmlEventSource`]; [`QuickXmlSource`] is the implementation backed by
//! `quick-xml`, and tests or embedders may supply their own.

mod quick;

use alloc::{string::String, vec::Vec};

pub use quick::{QuickXmlSource, XmlSourceError};

/// The name of an element or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlName {
    /// Local part of the name.
    pub local: String,
    /// Prefix, present only when it binds the node to a non-empty namespace.
    pub prefix: Option<String>,
}

impl XmlName {
    /// An unprefixed name.
    pub fn new(local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            prefix: None,
        }
    }

    /// A name bound to a namespace through `prefix`.
    pub fn prefixed(prefix: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            local: local.into(),
            prefix: Some(prefix.into()),
        }
    }

    /// Writes the name as it appears in field names: `<prefix>local` when
    /// namespaces are honoured and a prefix is bound, `local` otherwise.
    pub fn write_qualified(&self, namespaces: bool, out: &mut String) {
        if namespaces {
            if let Some(prefix) = self.prefix.as_deref().filter(|p| !p.is_empty()) {
                out.push('<');
                out.push_str(prefix);
                out.push('>');
            }
        }
        out.push_str(&self.local);
    }

    /// See [`write_qualified`](Self::write_qualified).
    #[must_use]
    pub fn qualified(&self, namespaces: bool) -> String {
        let mut out = String::new();
        self.write_qualified(namespaces, &mut out);
        out
    }
}

/// One attribute of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    pub name: XmlName,
    /// Unescaped value.
    pub value: String,
}

/// A start tag with its attributes in source order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartTag {
    pub name: XmlName,
    pub attributes: Vec<XmlAttribute>,
}

/// One event of an XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    Start(StartTag),
    End(XmlName),
    /// All character data up to the next tag, trimmed once. Whitespace-only
    /// text arrives as an empty string.
    Text(String),
    Eof,
}

/// A pull-based XML tokenizer.
///
/// After returning [`XmlEvent::Eof`] a source keeps returning it.
pub trait XmlEventSource {
    type Error: core::error::Error + Send + Sync + 'static;

    /// Pulls the next event.
    ///
    /// # Errors
    ///
    /// Returns the source's error when the document is malformed or cannot
    /// be read.
    fn next_event(&mut self) -> Result<XmlEvent, Self::Error>;
}

impl<S: XmlEventSource + ?Sized> XmlEventSource for &mut S {
    type Error = S::Error;

    fn next_event(&mut self) -> Result<XmlEvent, Self::Error> {
        (**self).next_event()
    }
}

/// An in-memory source replaying a prepared list of events.
///
/// Handy for tests and for embedders that already tokenized a document.
#[derive(Debug, Clone, Default)]
pub struct EventList {
    events: alloc::collections::VecDeque<XmlEvent>,
}

impl EventList {
    pub fn new(events: impl IntoIterator<Item = XmlEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl XmlEventSource for EventList {
    type Error = core::convert::Infallible;

    fn next_event(&mut self) -> Result<XmlEvent, Self::Error> {
        Ok(self.events.pop_front().unwrap_or(XmlEvent::Eof))
    }
}
