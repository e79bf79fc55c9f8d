//! Tokens of the JSON-shaped stream produced by [`XmlReader`](crate::XmlReader).

use core::fmt;

/// One unit of the structured output stream.
///
/// The vocabulary matches a conventional JSON pull reader. `FieldName` and
/// `StringValue` carry a payload in the reader's value queue; every other
/// token is purely structural.
///
/// `Boolean` and `Number` belong to the vocabulary so that consumers can state
/// which scalar they asked for, but XML has no typed scalars: the reader always
/// surfaces text as `StringValue` and interprets it on demand in
/// [`next_bool`](crate::XmlReader::next_bool) and
/// [`next_number`](crate::XmlReader::next_number).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    FieldName,
    StringValue,
    Boolean,
    Number,
    EndOfStream,
}

impl Token {
    /// Whether this token closes a container.
    #[must_use]
    pub fn is_end(self) -> bool {
        matches!(self, Token::EndObject | Token::EndArray)
    }

    /// Whether this token is paired with an entry in the value queue.
    #[must_use]
    pub fn carries_value(self) -> bool {
        matches!(self, Token::FieldName | Token::StringValue)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Token::BeginObject => "BEGIN_OBJECT",
            Token::EndObject => "END_OBJECT",
            Token::BeginArray => "BEGIN_ARRAY",
            Token::EndArray => "END_ARRAY",
            Token::FieldName => "NAME",
            Token::StringValue => "STRING",
            Token::Boolean => "BOOLEAN",
            Token::Number => "NUMBER",
            Token::EndOfStream => "END_DOCUMENT",
        };
        f.write_str(name)
    }
}
