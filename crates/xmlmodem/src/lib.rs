//! A pull reader that presents an XML document as the token stream of a JSON
//! document.
//!
//! Elements become fields, attributes become `@name` fields and loose text
//! becomes `$` fields. Lists are recognised when the consumer asks for an
//! array where the document shows an object or a string, so the same XML can
//! be read into a `Vec<T>` or a single `T` depending on the target type.
//!
//! ```rust
//! use xmlmodem::{ReaderOptions, Token, XmlReader};
//!
//! let xml = "<list><item>a</item><item>b</item></list>";
//! let options = ReaderOptions { skip_root: true, ..Default::default() };
//! let mut reader = XmlReader::from_str(xml, options)?;
//!
//! reader.begin_array()?;
//! let mut items = Vec::new();
//! while reader.has_next()? {
//!     reader.begin_object()?;
//!     reader.next_field_name()?;
//!     items.push(reader.next_string()?);
//!     reader.end_object()?;
//! }
//! reader.end_array()?;
//! assert_eq!(reader.peek()?, Token::EndOfStream);
//! assert_eq!(items, ["a", "b"]);
//! # Ok::<(), xmlmodem::ReaderError>(())
//! ```

#![allow(missing_docs)]
extern crate alloc;

mod closed_tags;
mod pool;
mod queue;

mod error;
mod options;
mod reader;
mod scope;
pub mod source;
mod token;

#[cfg(feature = "serde")]
pub mod de;

#[cfg(test)]
mod tests;

pub use error::{BoxError, ReaderError, SyntaxError};
pub use options::{DEFAULT_VALUE_POOL_CAPACITY, ReaderOptions};
pub use reader::{ATTRIBUTE_PREFIX, TEXT_FIELD, XmlReader};
pub use scope::Scope;
pub use source::{
    EventList, QuickXmlSource, StartTag, XmlAttribute, XmlEvent, XmlEventSource, XmlName,
    XmlSourceError,
};
pub use token::Token;

#[cfg(feature = "serde")]
pub use de::{Deserializer, from_reader, from_str};
