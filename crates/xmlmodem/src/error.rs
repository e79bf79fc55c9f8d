use alloc::{boxed::Box, string::String};

use thiserror::Error;

use crate::{scope::Scope, token::Token};

/// Boxed error reported by an [`XmlEventSource`](crate::XmlEventSource).
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Any failure surfaced by [`XmlReader`](crate::XmlReader).
#[derive(Error, Debug)]
pub enum ReaderError {
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
    #[error("cannot parse <{value}> as {target}")]
    InvalidValue { target: &'static str, value: String },
    #[error("configuration error: {0}")]
    Config(&'static str),
    #[error("document was not fully consumed, next token is {0}")]
    TrailingTokens(Token),
    #[error("{0}")]
    Custom(String),
}

/// The document shape disagrees with what the consumer asked for, or the
/// underlying XML could not be read.
///
/// Consumers are not expected to tell these apart; all of them abort the
/// parse.
#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("{expected} expected, but met {actual}")]
    StateMismatch { expected: Token, actual: Token },
    #[error("XML parsing exception: {0}")]
    MalformedSource(#[source] BoxError),
    #[error("cannot process {what} inside scope {scope:?}")]
    UnsupportedShape { what: String, scope: Option<Scope> },
}

impl ReaderError {
    /// Whether this error belongs to the syntax category.
    #[must_use]
    pub fn is_syntax(&self) -> bool {
        matches!(self, ReaderError::Syntax(_))
    }

    pub(crate) fn mismatch(expected: Token, actual: Token) -> Self {
        SyntaxError::StateMismatch { expected, actual }.into()
    }

    pub(crate) fn malformed<E>(err: E) -> Self
    where
        E: core::error::Error + Send + Sync + 'static,
    {
        SyntaxError::MalformedSource(Box::new(err)).into()
    }
}

#[cfg(feature = "serde")]
impl serde::de::Error for ReaderError {
    fn custom<T: core::fmt::Display>(msg: T) -> Self {
        use alloc::string::ToString;
        ReaderError::Custom(msg.to_string())
    }
}
