//! The XML-to-token translator.
//!
//! Overview
//! - [`XmlReader`] pulls [`XmlEvent`]s from an [`XmlEventSource`] one at a time
//!   and translates them into [`Token`]s shaped like the output of a JSON pull
//!   reader: elements become fields, attributes become `@name` fields, loose
//!   text becomes `$`, `$2`, ... fields, and the document root is wrapped in
//!   an object unless `skip_root` is set.
//! - Translated tokens wait in a FIFO ([`TokenQueue`]) together with their
//!   payloads until the consumer asks for them. The reader only pulls more
//!   events when that FIFO runs dry, so it never buffers more than one start
//!   tag's worth of tokens ahead of the consumer.
//!
//! Lists
//! - XML has no array syntax. A field read as an ordinary object or string
//!   may turn out to be the first element of a list once the consumer asks for
//!   an array at that position. Because the first element's tokens are still
//!   pending in the FIFO, the reader rewrites them and the tail of the scope
//!   stack in place (see `adapt.rs`). Tokens already handed out are never
//!   touched.
//! - With `same_name_list`, adjacent siblings sharing a name keep appending
//!   to the list opened for the first of them, and a sibling with a different
//!   name closes it. The [`ClosedTags`] tracker remembers the last sibling
//!   closed at each depth for that purpose.

mod adapt;

use alloc::{
    format,
    string::{String, ToString},
};
use core::str::FromStr;
use std::io::BufRead;

use log::{debug, trace};

use crate::{
    closed_tags::ClosedTags,
    error::{ReaderError, SyntaxError},
    options::ReaderOptions,
    queue::TokenQueue,
    scope::{Scope, ScopeStack},
    source::{QuickXmlSource, StartTag, XmlAttribute, XmlEvent, XmlEventSource, XmlName},
    token::Token,
};

/// Field name given to the first loose text node of an object.
pub const TEXT_FIELD: &str = "$";
/// Prefix of field names produced from attributes.
pub const ATTRIBUTE_PREFIX: char = '@';

/// Reads an XML document as a stream of JSON-shaped [`Token`]s.
///
/// The API follows the usual pull-reader contract: [`peek`](Self::peek) looks
/// at the next token without consuming it, and each `begin_*`, `end_*` and
/// `next_*` method consumes exactly one token of its kind or fails with
/// [`SyntaxError::StateMismatch`].
///
/// ```rust
/// use xmlmodem::{ReaderOptions, XmlReader};
///
/// let options = ReaderOptions { skip_root: true, ..Default::default() };
/// let mut reader = XmlReader::from_str(r#"<a id="9"><x>v</x></a>"#, options)?;
/// reader.begin_object()?;
/// assert_eq!(reader.next_field_name()?, "@id");
/// assert_eq!(reader.next_number::<u32>()?, 9);
/// assert_eq!(reader.next_field_name()?, "x");
/// assert_eq!(reader.next_string()?, "v");
/// reader.end_object()?;
/// # Ok::<(), xmlmodem::ReaderError>(())
/// ```
pub struct XmlReader<S: XmlEventSource> {
    source: S,
    options: ReaderOptions,

    queue: TokenQueue,
    scopes: ScopeStack,
    closed_tags: ClosedTags,

    /// Token returned by the last `peek`, not consumed yet.
    current: Option<Token>,
    /// What the consumer is about to ask for, if it said so.
    expected: Option<Token>,
    /// Whether `current` is the first token of the document.
    current_is_root: bool,
    tokens_taken: bool,

    first_start: bool,
    end_reached: bool,
    /// Whether the element owning the innermost pending value has produced
    /// text yet.
    element_has_text: bool,
    depth: usize,
}

impl<'a> XmlReader<QuickXmlSource<&'a [u8]>> {
    /// Creates a reader over a document held in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Config`] if `options` are inconsistent.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &'a str, options: ReaderOptions) -> Result<Self, ReaderError> {
        Self::new(QuickXmlSource::from_str(xml), options)
    }
}

impl<R: BufRead> XmlReader<QuickXmlSource<R>> {
    /// Creates a reader over a buffered byte stream.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Config`] if `options` are inconsistent.
    pub fn from_reader(reader: R, options: ReaderOptions) -> Result<Self, ReaderError> {
        Self::new(QuickXmlSource::from_reader(reader), options)
    }
}

impl<S: XmlEventSource> XmlReader<S> {
    /// Creates a reader pulling events from `source`.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Config`] if `options` are inconsistent.
    pub fn new(source: S, options: ReaderOptions) -> Result<Self, ReaderError> {
        options.validate()?;
        Ok(Self {
            source,
            options,
            queue: TokenQueue::new(options.value_pool_capacity),
            scopes: ScopeStack::new(),
            closed_tags: ClosedTags::new(),
            current: None,
            expected: None,
            current_is_root: false,
            tokens_taken: false,
            first_start: true,
            end_reached: false,
            element_has_text: false,
            depth: 0,
        })
    }

    /// The options this reader was created with.
    pub fn options(&self) -> &ReaderOptions {
        &self.options
    }

    /// Renders the reader's internal state for diagnostics.
    #[must_use]
    pub fn dump(&self) -> String {
        format!(
            "Scopes: {}\nClosed tags: {}\nToken: {:?}\n{}\n",
            self.scopes, self.closed_tags, self.current, self.queue
        )
    }

    #[cfg(any(test, feature = "fuzzing"))]
    /// Current scope stack, bottom first.
    pub fn scopes(&self) -> alloc::vec::Vec<Scope> {
        self.scopes.scopes().collect()
    }

    // ------------------------------------------------------------------------
    // Token-stream contract
    // ------------------------------------------------------------------------

    /// Returns the next token without consuming it.
    ///
    /// Before the consumer has stated whether the document is an object or an
    /// array, a fresh reader answers [`Token::BeginObject`] without reading
    /// anything.
    ///
    /// # Errors
    ///
    /// Fails if the source reports malformed XML or the document cannot be
    /// translated.
    pub fn peek(&mut self) -> Result<Token, ReaderError> {
        if self.expected.is_none() && self.first_start {
            return Ok(Token::BeginObject);
        }

        if self.current.is_none() {
            self.fill_queues(false)?;
            self.current = Some(self.take_token());
        }
        self.adapt_current_token()?;
        self.expected = None;

        Ok(self.current.unwrap_or(Token::EndOfStream))
    }

    /// Consumes a [`Token::BeginObject`].
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token is anything else.
    pub fn begin_object(&mut self) -> Result<(), ReaderError> {
        self.expected = Some(Token::BeginObject);
        self.expect(Token::BeginObject)
    }

    /// Consumes a [`Token::EndObject`].
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token is anything else.
    pub fn end_object(&mut self) -> Result<(), ReaderError> {
        self.expected = Some(Token::EndObject);
        self.expect(Token::EndObject)
    }

    /// Consumes a [`Token::BeginArray`], reinterpreting the pending field as
    /// the first element of a list if the document has not shown an array
    /// yet.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token cannot start an array.
    pub fn begin_array(&mut self) -> Result<(), ReaderError> {
        self.expected = Some(Token::BeginArray);
        self.expect(Token::BeginArray)
    }

    /// Consumes a [`Token::EndArray`].
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token is anything else.
    pub fn end_array(&mut self) -> Result<(), ReaderError> {
        self.expected = Some(Token::EndArray);
        self.expect(Token::EndArray)
    }

    /// Whether the current object or array has more entries.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`peek`](Self::peek).
    pub fn has_next(&mut self) -> Result<bool, ReaderError> {
        Ok(!self.peek()?.is_end())
    }

    /// Consumes a [`Token::FieldName`] and returns the name.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token is not a field name.
    pub fn next_field_name(&mut self) -> Result<String, ReaderError> {
        self.expected = Some(Token::FieldName);
        self.expect(Token::FieldName)?;
        self.take_value()
    }

    /// Consumes a [`Token::StringValue`] and returns its text.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token is not a string.
    pub fn next_string(&mut self) -> Result<String, ReaderError> {
        self.expect(Token::StringValue)?;
        self.take_value()
    }

    /// Consumes a string token and interprets it as a boolean, ignoring ASCII
    /// case.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token is not a string,
    /// [`ReaderError::InvalidValue`] if it is neither `true` nor `false`.
    pub fn next_bool(&mut self) -> Result<bool, ReaderError> {
        let value = self.next_scalar(Token::Boolean)?;
        let parsed = if value.eq_ignore_ascii_case("true") {
            true
        } else if value.eq_ignore_ascii_case("false") {
            false
        } else {
            return Err(ReaderError::InvalidValue {
                target: "boolean",
                value,
            });
        };
        self.queue.release(value);
        Ok(parsed)
    }

    /// Consumes a string token and parses it as a number of type `N`.
    ///
    /// # Errors
    ///
    /// [`SyntaxError::StateMismatch`] if the next token is not a string,
    /// [`ReaderError::InvalidValue`] if the text does not parse.
    pub fn next_number<N: FromStr>(&mut self) -> Result<N, ReaderError> {
        let value = self.next_scalar(Token::Number)?;
        match value.parse::<N>() {
            Ok(n) => {
                self.queue.release(value);
                Ok(n)
            }
            Err(_) => Err(ReaderError::InvalidValue {
                target: core::any::type_name::<N>(),
                value,
            }),
        }
    }

    /// Payload of the next token if it carries one, without consuming it.
    ///
    /// # Errors
    ///
    /// Propagates failures from [`peek`](Self::peek).
    pub fn peek_value(&mut self) -> Result<Option<&str>, ReaderError> {
        let token = self.peek()?;
        Ok(if token.carries_value() {
            self.queue.head_value()
        } else {
            None
        })
    }

    /// Consumes the next value entirely: a scalar, or an object or array with
    /// everything nested inside it.
    ///
    /// # Errors
    ///
    /// Fails when the next token closes a container, or the document ends
    /// before the skipped value does.
    pub fn skip_value(&mut self) -> Result<(), ReaderError> {
        let mut open = 0usize;
        loop {
            let token = self.peek()?;
            match token {
                Token::BeginArray | Token::BeginObject => open += 1,
                Token::EndArray | Token::EndObject => {
                    if open == 0 {
                        return Err(self.mismatch(Token::StringValue, token));
                    }
                    open -= 1;
                }
                Token::EndOfStream => {
                    let expected = if open == 0 {
                        Token::StringValue
                    } else {
                        Token::EndObject
                    };
                    return Err(self.mismatch(expected, token));
                }
                _ if token.carries_value() => self.queue.discard_value(),
                _ => {}
            }
            self.current = None;
            if open == 0 {
                return Ok(());
            }
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ReaderError> {
        let actual = self.peek()?;
        self.current = None;
        if actual != expected {
            return Err(self.mismatch(expected, actual));
        }
        Ok(())
    }

    fn next_scalar(&mut self, kind: Token) -> Result<String, ReaderError> {
        let actual = self.peek()?;
        self.current = None;
        if actual != Token::StringValue {
            return Err(self.mismatch(kind, actual));
        }
        self.take_value()
    }

    fn mismatch(&self, expected: Token, actual: Token) -> ReaderError {
        debug!("{expected} expected, but met {actual}\n{}", self.dump());
        ReaderError::mismatch(expected, actual)
    }

    fn take_token(&mut self) -> Token {
        match self.queue.pop() {
            Some(token) => {
                self.current_is_root = !self.tokens_taken;
                self.tokens_taken = true;
                token
            }
            None => {
                self.current_is_root = false;
                Token::EndOfStream
            }
        }
    }

    fn take_value(&mut self) -> Result<String, ReaderError> {
        self.queue.pop_value().ok_or_else(|| {
            SyntaxError::UnsupportedShape {
                what: "a token without its value".to_string(),
                scope: self.scopes.peek(),
            }
            .into()
        })
    }

    // ------------------------------------------------------------------------
    // Event translation
    // ------------------------------------------------------------------------

    /// Translates events until a token is queued or the document ends. With
    /// `force`, at least one event is translated even if tokens are pending.
    fn fill_queues(&mut self, force: bool) -> Result<(), ReaderError> {
        let mut must_repeat = force;

        while (self.queue.is_empty() && !self.end_reached) || must_repeat {
            if self.end_reached {
                break;
            }
            let event = self.source.next_event().map_err(ReaderError::malformed)?;
            trace!("xml {event:?}");

            match event {
                XmlEvent::Eof => {
                    self.end_reached = true;
                    if self.first_start {
                        return Err(SyntaxError::UnsupportedShape {
                            what: "a document without a root element".to_string(),
                            scope: None,
                        }
                        .into());
                    }
                    if !self.options.skip_root {
                        self.queue.push(Token::EndObject);
                    }
                }
                XmlEvent::Text(text) if text.is_empty() => {}
                XmlEvent::Text(text) => must_repeat = self.process_text(&text)?,
                XmlEvent::Start(tag) => {
                    must_repeat = false;
                    self.depth += 1;
                    if self.first_start {
                        self.first_start = false;
                        self.process_root(&tag)?;
                    } else {
                        self.process_start(&tag)?;
                    }
                }
                XmlEvent::End(name) => {
                    must_repeat = false;
                    self.process_end(&name);
                    self.depth = self.depth.saturating_sub(1);
                }
            }
        }
        trace!("{}", self.queue);
        Ok(())
    }

    fn qualify(&self, name: &XmlName) -> String {
        name.qualified(self.options.namespaces)
    }

    fn process_root(&mut self, tag: &StartTag) -> Result<(), ReaderError> {
        if !self.options.skip_root {
            self.queue.push(Token::BeginObject);
            self.scopes.push(Scope::InsideObject);
            return self.process_start(tag);
        }

        if !tag.attributes.is_empty() {
            self.queue.push(Token::BeginObject);
            self.scopes.push(Scope::InsideObject);
            self.queue_attributes(&tag.attributes);
            return Ok(());
        }

        match self.expected {
            None | Some(Token::BeginObject) => {
                self.queue.push(Token::BeginObject);
                self.scopes.push(Scope::InsideObject);
            }
            Some(Token::BeginArray) => {
                self.queue.push(Token::BeginArray);
                self.scopes.push(if self.options.root_array_primitive {
                    Scope::InsidePrimitiveArray
                } else {
                    Scope::InsideArray
                });
            }
            Some(other) => return Err(self.mismatch(other, Token::BeginObject)),
        }
        Ok(())
    }

    fn process_start(&mut self, tag: &StartTag) -> Result<(), ReaderError> {
        let name = self.qualify(&tag.name);
        let mut last = self.scopes.peek();

        if self.options.same_name_list && last.is_some_and(Scope::inside_array) {
            let name_changed = self
                .closed_tags
                .last_at(self.depth)
                .is_some_and(|previous| previous != name);
            if name_changed {
                debug!("<{name}> ends the run of its previous siblings");
                self.queue.push(Token::EndArray);
                self.scopes.fix();
                last = self.scopes.peek();
            }
        }

        let mut process_name = true;
        match last {
            Some(Scope::InsidePrimitiveArray | Scope::InsidePrimitiveEmbeddedArray) => {
                process_name = false;
                self.scopes.push(Scope::PrimitiveValue);
                self.element_has_text = false;
            }
            Some(Scope::InsideArray | Scope::InsideEmbeddedArray) => {
                process_name = false;
                self.queue.push(Token::BeginObject);
                self.scopes.push(Scope::InsideObject);
            }
            Some(Scope::Name) => {
                self.queue.push(Token::BeginObject);
                self.scopes.push(Scope::InsideObject);
            }
            _ => {}
        }

        if process_name {
            self.scopes.push(Scope::Name);
            self.queue.push_name(&name);
            self.element_has_text = false;
        }

        if !tag.attributes.is_empty() {
            match self.scopes.peek() {
                Some(Scope::PrimitiveValue) => {
                    return Err(SyntaxError::UnsupportedShape {
                        what: format!("attributes of <{name}>"),
                        scope: Some(Scope::PrimitiveValue),
                    }
                    .into());
                }
                Some(Scope::Name) => {
                    self.queue.push(Token::BeginObject);
                    self.scopes.push(Scope::InsideObject);
                }
                _ => {}
            }
            self.queue_attributes(&tag.attributes);
        }
        Ok(())
    }

    fn queue_attributes(&mut self, attributes: &[XmlAttribute]) {
        let mut field = String::new();
        for attribute in attributes {
            field.clear();
            field.push(ATTRIBUTE_PREFIX);
            attribute
                .name
                .write_qualified(self.options.namespaces, &mut field);
            self.queue.push_name(&field);
            self.queue.push_string(&attribute.value);
        }
    }

    /// Returns whether translation must continue before yielding, so that
    /// adjoining text fragments end up in one value.
    fn process_text(&mut self, text: &str) -> Result<bool, ReaderError> {
        match self.scopes.peek() {
            Some(Scope::Name | Scope::PrimitiveValue) => {
                self.add_text(text);
                Ok(true)
            }
            Some(Scope::InsideObject) => {
                let ordinal = self.scopes.next_text_ordinal();
                let field = if ordinal == 1 {
                    TEXT_FIELD.to_string()
                } else {
                    format!("{TEXT_FIELD}{ordinal}")
                };
                self.queue.push_name(&field);
                self.queue.push_string(text);
                Ok(false)
            }
            scope => Err(SyntaxError::UnsupportedShape {
                what: format!("text '{text}'"),
                scope,
            }
            .into()),
        }
    }

    fn add_text(&mut self, text: &str) {
        if self.element_has_text && self.queue.tail() == Some(Token::StringValue) {
            if !text.is_empty() {
                self.queue.append_to_last_value(text);
            }
        } else {
            self.queue.push_string(text);
        }
        self.element_has_text = true;
    }

    fn process_end(&mut self, name: &XmlName) {
        match self.scopes.peek() {
            Some(Scope::InsideObject) => {
                self.queue.push(Token::EndObject);
                self.scopes.fix();
            }
            Some(Scope::PrimitiveValue) => {
                if !self.element_has_text {
                    self.add_text("");
                }
                self.scopes.pop();
            }
            Some(Scope::InsidePrimitiveEmbeddedArray | Scope::InsideEmbeddedArray) => {
                self.queue.push(Token::EndArray);
                self.queue.push(Token::EndObject);
                // the synthesized array, then the object that owned it
                self.scopes.fix();
                self.scopes.fix();
            }
            Some(Scope::InsidePrimitiveArray | Scope::InsideArray) => {
                self.queue.push(Token::EndArray);
                self.scopes.fix();
            }
            Some(Scope::Name) => {
                // an empty element still has a value
                if !self.element_has_text {
                    self.add_text("");
                }
                self.scopes.fix();
            }
            None => {}
        }

        if self.options.same_name_list {
            let name = self.qualify(name);
            self.closed_tags.record(self.depth, &name);
        }
    }
}
