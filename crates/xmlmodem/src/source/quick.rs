use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use std::io::BufRead;

use log::trace;
use quick_xml::{
    NsReader,
    events::{Event, attributes::AttrError},
    name::{QName, ResolveResult},
};
use thiserror::Error;

use super::{StartTag, XmlAttribute, XmlEvent, XmlEventSource, XmlName};

/// Errors raised while tokenizing a document with [`QuickXmlSource`].
#[derive(Error, Debug)]
pub enum XmlSourceError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error("malformed attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("invalid UTF-8: {0}")]
    Utf8(#[from] core::str::Utf8Error),
    #[error("document ended inside {0} open element(s)")]
    UnclosedElements(usize),
}

/// [`XmlEventSource`] backed by `quick_xml::NsReader`.
///
/// Empty elements are reported as a start tag immediately followed by its end
/// tag. Comments, processing instructions, the XML declaration and DOCTYPE are
/// skipped, and namespace declarations never show up as attributes.
pub struct QuickXmlSource<R> {
    reader: NsReader<R>,
    buf: Vec<u8>,
    /// Markup event read while collecting the text before it.
    pending: Option<XmlEvent>,
    depth: usize,
    finished: bool,
}

impl<'a> QuickXmlSource<&'a [u8]> {
    /// Reads a document held in memory.
    #[allow(clippy::should_implement_trait)]
    #[must_use]
    pub fn from_str(xml: &'a str) -> Self {
        Self::with_reader(NsReader::from_str(xml))
    }
}

impl<R: BufRead> QuickXmlSource<R> {
    /// Reads a document from any buffered reader.
    pub fn from_reader(reader: R) -> Self {
        Self::with_reader(NsReader::from_reader(reader))
    }
}

impl<R> QuickXmlSource<R> {
    fn with_reader(mut reader: NsReader<R>) -> Self {
        let config = reader.config_mut();
        config.expand_empty_elements = true;
        config.trim_text(false);
        Self {
            reader,
            buf: Vec::new(),
            pending: None,
            depth: 0,
            finished: false,
        }
    }
}

fn is_bound(resolved: &ResolveResult<'_>) -> bool {
    match resolved {
        ResolveResult::Bound(ns) => {
            let ns: &[u8] = ns.as_ref();
            !ns.is_empty()
        }
        _ => false,
    }
}

fn utf8(bytes: &[u8]) -> Result<String, XmlSourceError> {
    Ok(core::str::from_utf8(bytes)?.to_string())
}

fn to_name(name: QName<'_>, bound: bool) -> Result<XmlName, XmlSourceError> {
    let prefix = match name.prefix() {
        Some(prefix) if bound => Some(utf8(prefix.as_ref())?),
        _ => None,
    };
    Ok(XmlName {
        local: utf8(name.local_name().as_ref())?,
        prefix,
    })
}

impl<R: BufRead> QuickXmlSource<R> {
    /// Reads until the next markup event, appending any character data met on
    /// the way to `text`. Comments and processing instructions do not
    /// interrupt character data.
    fn next_markup(&mut self, text: &mut Option<String>) -> Result<XmlEvent, XmlSourceError> {
        loop {
            if self.finished {
                return Ok(XmlEvent::Eof);
            }
            self.buf.clear();
            let (resolved, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
            let bound = is_bound(&resolved);

            match event {
                Event::Start(start) => {
                    self.depth += 1;
                    let name = to_name(start.name(), bound)?;
                    let mut attributes = Vec::new();
                    for attr in start.attributes() {
                        let attr = attr?;
                        if attr.key.as_namespace_binding().is_some() {
                            continue;
                        }
                        let (attr_ns, _) = self.reader.resolve_attribute(attr.key);
                        let name = to_name(attr.key, is_bound(&attr_ns))?;
                        let value = attr.unescape_value()?.into_owned();
                        attributes.push(XmlAttribute { name, value });
                    }
                    return Ok(XmlEvent::Start(StartTag { name, attributes }));
                }
                Event::End(end) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(XmlEvent::End(to_name(end.name(), bound)?));
                }
                Event::Text(fragment) => {
                    let fragment = fragment.unescape()?;
                    text.get_or_insert_with(String::new).push_str(&fragment);
                }
                Event::CData(cdata) => {
                    let fragment = core::str::from_utf8(&cdata)?;
                    text.get_or_insert_with(String::new).push_str(fragment);
                }
                Event::Eof => {
                    self.finished = true;
                    if self.depth > 0 {
                        return Err(XmlSourceError::UnclosedElements(self.depth));
                    }
                    return Ok(XmlEvent::Eof);
                }
                other => trace!("skipping {other:?}"),
            }
        }
    }
}

impl<R: BufRead> XmlEventSource for QuickXmlSource<R> {
    type Error = XmlSourceError;

    fn next_event(&mut self) -> Result<XmlEvent, Self::Error> {
        if let Some(event) = self.pending.take() {
            return Ok(event);
        }
        let mut text = None;
        let markup = self.next_markup(&mut text)?;
        match text {
            Some(text) => {
                self.pending = Some(markup);
                Ok(XmlEvent::Text(text.trim().to_string()))
            }
            None => Ok(markup),
        }
    }
}
