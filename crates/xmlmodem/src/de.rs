//! `serde` binding: deserialize Rust types straight from XML.
//!
//! Types are read through [`XmlReader`], so lists are discovered as the
//! target type asks for them: a `Vec<T>` field makes the reader treat the
//! element under it as a list.
//!
//! ```rust
//! use serde::Deserialize;
//! use xmlmodem::ReaderOptions;
//!
//! #[derive(Deserialize)]
//! struct Feed {
//!     title: String,
//!     entry: Vec<String>,
//! }
//!
//! let options = ReaderOptions {
//!     skip_root: true,
//!     same_name_list: true,
//!     primitive_arrays: true,
//!     ..Default::default()
//! };
//! let feed: Feed = xmlmodem::from_str(
//!     "<feed><title>t</title><entry>a</entry><entry>b</entry></feed>",
//!     options,
//! )?;
//! assert_eq!(feed.title, "t");
//! assert_eq!(feed.entry, ["a", "b"]);
//! # Ok::<(), xmlmodem::ReaderError>(())
//! ```
//!
//! Untyped targets such as `serde_json::Value` only see what the document
//! shows on its own. Repeated elements are not merged into lists there, since
//! nothing asked for an array.

use alloc::string::String;
use std::io::BufRead;

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, VariantAccess,
    Visitor, value::StringDeserializer,
};

use crate::{
    error::ReaderError,
    options::ReaderOptions,
    reader::XmlReader,
    source::{QuickXmlSource, XmlEventSource},
    token::Token,
};

/// Deserializes a `T` from an XML document held in memory.
///
/// # Errors
///
/// Fails if the document is malformed, does not fit `T`, or has tokens left
/// after `T` was read.
pub fn from_str<T: DeserializeOwned>(xml: &str, options: ReaderOptions) -> Result<T, ReaderError> {
    let mut de = Deserializer::from_str(xml, options)?;
    let value = T::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// Deserializes a `T` from a buffered byte stream.
///
/// # Errors
///
/// Same as [`from_str`], plus I/O failures of `reader`.
pub fn from_reader<R: BufRead, T: DeserializeOwned>(
    reader: R,
    options: ReaderOptions,
) -> Result<T, ReaderError> {
    let mut de = Deserializer::from_reader(reader, options)?;
    let value = T::deserialize(&mut de)?;
    de.end()?;
    Ok(value)
}

/// A `serde` deserializer pulling tokens from an [`XmlReader`].
pub struct Deserializer<S: XmlEventSource> {
    reader: XmlReader<S>,
}

impl<'a> Deserializer<QuickXmlSource<&'a [u8]>> {
    /// # Errors
    ///
    /// Returns [`ReaderError::Config`] if `options` are inconsistent.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(xml: &'a str, options: ReaderOptions) -> Result<Self, ReaderError> {
        Ok(Self::new(XmlReader::from_str(xml, options)?))
    }
}

impl<R: BufRead> Deserializer<QuickXmlSource<R>> {
    /// # Errors
    ///
    /// Returns [`ReaderError::Config`] if `options` are inconsistent.
    pub fn from_reader(reader: R, options: ReaderOptions) -> Result<Self, ReaderError> {
        Ok(Self::new(XmlReader::from_reader(reader, options)?))
    }
}

impl<S: XmlEventSource> Deserializer<S> {
    /// Wraps a reader that has not handed out any token yet.
    pub fn new(reader: XmlReader<S>) -> Self {
        Self { reader }
    }

    /// Checks that the whole document was consumed.
    ///
    /// # Errors
    ///
    /// [`ReaderError::TrailingTokens`] if anything but the end of the stream
    /// is pending.
    pub fn end(&mut self) -> Result<(), ReaderError> {
        match self.reader.peek()? {
            Token::EndOfStream => Ok(()),
            token => Err(ReaderError::TrailingTokens(token)),
        }
    }

    /// Gives the underlying reader back, positioned after the last value read.
    pub fn into_inner(self) -> XmlReader<S> {
        self.reader
    }

    /// An empty element is read as a blank string, which stands for an empty
    /// object when a map is wanted.
    fn take_empty_element(&mut self) -> Result<bool, ReaderError> {
        if self.reader.peek()? == Token::StringValue && self.reader.peek_value()? == Some("") {
            self.reader.skip_value()?;
            return Ok(true);
        }
        Ok(false)
    }
}

macro_rules! deserialize_number {
    ($($method:ident => $visit:ident($ty:ty),)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
                visitor.$visit(self.reader.next_number::<$ty>()?)
            }
        )*
    };
}

impl<'de, S: XmlEventSource> de::Deserializer<'de> for &mut Deserializer<S> {
    type Error = ReaderError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        match self.reader.peek()? {
            Token::BeginObject => self.deserialize_map(visitor),
            Token::BeginArray => self.deserialize_seq(visitor),
            Token::StringValue => visitor.visit_string(self.reader.next_string()?),
            token => Err(ReaderError::mismatch(Token::StringValue, token)),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        visitor.visit_bool(self.reader.next_bool()?)
    }

    deserialize_number! {
        deserialize_i8 => visit_i8(i8),
        deserialize_i16 => visit_i16(i16),
        deserialize_i32 => visit_i32(i32),
        deserialize_i64 => visit_i64(i64),
        deserialize_i128 => visit_i128(i128),
        deserialize_u8 => visit_u8(u8),
        deserialize_u16 => visit_u16(u16),
        deserialize_u32 => visit_u32(u32),
        deserialize_u64 => visit_u64(u64),
        deserialize_u128 => visit_u128(u128),
        deserialize_f32 => visit_f32(f32),
        deserialize_f64 => visit_f64(f64),
    }

    fn deserialize_char<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        let value = self.reader.next_string()?;
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => visitor.visit_char(c),
            _ => Err(ReaderError::InvalidValue {
                target: "char",
                value,
            }),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        visitor.visit_string(self.reader.next_string()?)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        visitor.visit_byte_buf(self.reader.next_string()?.into_bytes())
    }

    fn deserialize_byte_buf<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        self.deserialize_bytes(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        // absent elements are handled by serde's missing-field logic
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        self.reader.skip_value()?;
        visitor.visit_unit()
    }

    fn deserialize_unit_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        self.reader.begin_array()?;
        let value = visitor.visit_seq(Elements { de: &mut *self })?;
        self.reader.end_array()?;
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(
        self,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        if self.take_empty_element()? {
            return visitor.visit_map(Fields {
                de: &mut *self,
                done: true,
            });
        }
        self.reader.begin_object()?;
        let value = visitor.visit_map(Fields {
            de: &mut *self,
            done: false,
        })?;
        self.reader.end_object()?;
        Ok(value)
    }

    fn deserialize_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        match self.reader.peek()? {
            Token::StringValue => {
                let variant = self.reader.next_string()?;
                visitor.visit_enum(StringDeserializer::<ReaderError>::new(variant))
            }
            Token::BeginObject => {
                self.reader.begin_object()?;
                let value = visitor.visit_enum(Variant { de: &mut *self })?;
                self.reader.end_object()?;
                Ok(value)
            }
            token => Err(ReaderError::mismatch(Token::BeginObject, token)),
        }
    }

    fn deserialize_identifier<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, ReaderError> {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(
        self,
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        self.reader.skip_value()?;
        visitor.visit_unit()
    }
}

struct Elements<'a, S: XmlEventSource> {
    de: &'a mut Deserializer<S>,
}

impl<'de, S: XmlEventSource> SeqAccess<'de> for Elements<'_, S> {
    type Error = ReaderError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, ReaderError> {
        if !self.de.reader.has_next()? {
            return Ok(None);
        }
        seed.deserialize(&mut *self.de).map(Some)
    }
}

struct Fields<'a, S: XmlEventSource> {
    de: &'a mut Deserializer<S>,
    done: bool,
}

impl<'de, S: XmlEventSource> MapAccess<'de> for Fields<'_, S> {
    type Error = ReaderError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, ReaderError> {
        if self.done || !self.de.reader.has_next()? {
            self.done = true;
            return Ok(None);
        }
        let name = self.de.reader.next_field_name()?;
        seed.deserialize(StringDeserializer::<ReaderError>::new(name)).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(
        &mut self,
        seed: V,
    ) -> Result<V::Value, ReaderError> {
        seed.deserialize(&mut *self.de)
    }
}

/// `{"variant": value}`, the object form of an enum.
struct Variant<'a, S: XmlEventSource> {
    de: &'a mut Deserializer<S>,
}

impl<'de, S: XmlEventSource> EnumAccess<'de> for Variant<'_, S> {
    type Error = ReaderError;
    type Variant = Self;

    fn variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<(T::Value, Self), ReaderError> {
        let name = self.de.reader.next_field_name()?;
        let value = seed.deserialize(StringDeserializer::<ReaderError>::new(name))?;
        Ok((value, self))
    }
}

impl<'de, S: XmlEventSource> VariantAccess<'de> for Variant<'_, S> {
    type Error = ReaderError;

    fn unit_variant(self) -> Result<(), ReaderError> {
        self.de.reader.skip_value()
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(
        self,
        seed: T,
    ) -> Result<T::Value, ReaderError> {
        seed.deserialize(&mut *self.de)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, ReaderError> {
        de::Deserializer::deserialize_seq(&mut *self.de, visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, ReaderError> {
        de::Deserializer::deserialize_map(&mut *self.de, visitor)
    }
}
