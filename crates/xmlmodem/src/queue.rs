use alloc::{collections::VecDeque, string::String};
use core::fmt;

use crate::{pool::StringPool, token::Token};

/// Parallel FIFOs of pending tokens and their payloads.
///
/// Every [`Token::FieldName`] and [`Token::StringValue`] in `tokens` owns one
/// entry in `values`, in the same order. Pending entries have not been handed
/// to the consumer yet, so the reader is free to rewrite the head of both
/// queues.
#[derive(Debug)]
pub(crate) struct TokenQueue {
    tokens: VecDeque<Token>,
    values: VecDeque<String>,
    pool: StringPool,
}

impl TokenQueue {
    pub(crate) fn new(pool_capacity: usize) -> Self {
        Self {
            tokens: VecDeque::new(),
            values: VecDeque::new(),
            pool: StringPool::new(pool_capacity),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub(crate) fn head(&self) -> Option<Token> {
        self.tokens.front().copied()
    }

    pub(crate) fn tail(&self) -> Option<Token> {
        self.tokens.back().copied()
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push_back(token);
    }

    pub(crate) fn push_front(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    pub(crate) fn pop(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    pub(crate) fn push_value(&mut self, value: &str) {
        let value = self.pool.get(value.trim());
        self.values.push_back(value);
    }

    pub(crate) fn push_value_front(&mut self, value: &str) {
        let value = self.pool.get(value);
        self.values.push_front(value);
    }

    /// Queues a field name with its payload.
    pub(crate) fn push_name(&mut self, name: &str) {
        self.push(Token::FieldName);
        self.push_value(name);
    }

    /// Queues a string value with its payload.
    pub(crate) fn push_string(&mut self, value: &str) {
        self.push(Token::StringValue);
        self.push_value(value);
    }

    pub(crate) fn pop_value(&mut self) -> Option<String> {
        self.values.pop_front()
    }

    pub(crate) fn head_value(&self) -> Option<&str> {
        self.values.front().map(String::as_str)
    }

    /// Drops the value at the head, recycling its buffer.
    pub(crate) fn discard_value(&mut self) {
        if let Some(value) = self.values.pop_front() {
            self.pool.release(value);
        }
    }

    /// Appends `fragment` to the most recent value.
    pub(crate) fn append_to_last_value(&mut self, fragment: &str) {
        if let Some(last) = self.values.back_mut() {
            last.push_str(fragment);
        }
    }

    pub(crate) fn release(&mut self, value: String) {
        self.pool.release(value);
    }
}

impl fmt::Display for TokenQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Tokens queue: ")?;
        for token in &self.tokens {
            write!(f, "{token}, ")?;
        }
        f.write_str("\nValues queue: ")?;
        for value in &self.values {
            write!(f, "{value:?}, ")?;
        }
        Ok(())
    }
}
