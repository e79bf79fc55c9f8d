//! Retroactive list detection.
//!
//! When the consumer asks for an array but the pending token is an object or
//! a string, the field being read is really the first element of a list. The
//! pending tokens have not been handed out yet, so they are rewritten in
//! place: the head of the queue gains or loses tokens and the top of the
//! scope stack is replaced by the matching array scope.

use log::debug;

use super::{TEXT_FIELD, XmlReader};
use crate::{error::ReaderError, scope::Scope, source::XmlEventSource, token::Token};

impl<S: XmlEventSource> XmlReader<S> {
    pub(super) fn adapt_current_token(&mut self) -> Result<(), ReaderError> {
        let Some(token) = self.current else {
            return Ok(());
        };
        if self.expected != Some(Token::BeginArray)
            || token == Token::BeginArray
            || self.current_is_root
        {
            return Ok(());
        }

        match token {
            Token::BeginObject => self.adapt_object(),
            Token::StringValue => {
                self.adapt_string();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// `<list><item>..</item>..</list>` or, with `same_name_list`,
    /// `<item>..</item><item>..</item>`, where the first element has children
    /// or attributes.
    fn adapt_object(&mut self) -> Result<(), ReaderError> {
        self.current = Some(Token::BeginArray);
        if self.queue.head() != Some(Token::FieldName) {
            return Ok(());
        }
        let last = self.scopes.peek();

        if self.options.same_name_list {
            // The object opened for the element stays, but now as the first
            // element of the list. Its frame, and the pending child field if
            // there is one, are rebuilt above an embedded-array frame.
            let child_pending = last == Some(Scope::Name);
            self.scopes
                .cleanup_top(if child_pending { 2 } else { 1 });
            self.queue.push_front(Token::BeginObject);
            self.scopes.push(Scope::InsideEmbeddedArray);
            self.scopes.push(Scope::InsideObject);
            if child_pending {
                self.scopes.push(Scope::Name);
            }
            debug!("sibling run opened as an embedded list: {}", self.scopes);
            return Ok(());
        }

        // array elements carry no field name
        self.queue.pop();
        self.queue.discard_value();

        let remembered = self.scopes.len();
        if self.options.primitive_arrays && self.queue.is_empty() {
            self.fill_queues(true)?;
        }
        let at = self.scopes.cleanup(3, remembered);

        if self.options.primitive_arrays && self.queue.head() == Some(Token::StringValue) {
            self.scopes.push_at(at, Scope::InsidePrimitiveArray);
        } else {
            self.scopes.push_at(at, Scope::InsideArray);
            if self.scopes.get(at + 1) != Some(Scope::InsideObject) {
                self.scopes.push_at(at + 1, Scope::InsideObject);
            }
            if self.queue.head() != Some(Token::BeginObject) {
                self.queue.push_front(Token::BeginObject);
            }
        }
        debug!("wrapper element opened as a list: {}", self.scopes);
        Ok(())
    }

    /// A field whose value turned out to be text is a one-element list, or
    /// with `same_name_list` the first of a run of text siblings.
    fn adapt_string(&mut self) {
        self.current = Some(Token::BeginArray);
        let empty = self.queue.head_value().is_some_and(str::is_empty);

        if self.options.same_name_list {
            if self.options.primitive_arrays {
                self.queue.push_front(Token::StringValue);
                self.scopes.push(Scope::InsidePrimitiveEmbeddedArray);
            } else if empty {
                self.queue.discard_value();
                self.queue.push_front(Token::EndObject);
                self.queue.push_front(Token::BeginObject);
                self.scopes.push(Scope::InsideEmbeddedArray);
            } else {
                self.push_text_object();
                self.scopes.push(Scope::InsideEmbeddedArray);
            }
            debug!("text sibling opened an embedded list: {}", self.scopes);
            return;
        }

        if empty {
            // `<list></list>`: nothing inside
            self.queue.discard_value();
            self.queue.push_front(Token::EndArray);
        } else if self.options.primitive_arrays {
            self.queue.push_front(Token::EndArray);
            self.queue.push_front(Token::StringValue);
        } else {
            self.queue.push_front(Token::EndArray);
            self.push_text_object();
        }
    }

    /// Turns the text value at the head of the value queue into `{"$": text}`.
    fn push_text_object(&mut self) {
        self.queue.push_front(Token::EndObject);
        self.queue.push_front(Token::StringValue);
        self.queue.push_front(Token::FieldName);
        self.queue.push_front(Token::BeginObject);
        self.queue.push_value_front(TEXT_FIELD);
    }
}
