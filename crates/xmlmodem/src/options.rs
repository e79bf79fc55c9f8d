#![allow(clippy::struct_excessive_bools)]

use crate::error::ReaderError;

/// Default number of value buffers kept for reuse by a reader.
pub const DEFAULT_VALUE_POOL_CAPACITY: usize = 32;

/// Configuration options for the XML token reader.
///
/// Options are fixed when a reader is constructed and never change during a
/// parse, so one value may be shared by any number of readers.
///
/// # Examples
///
/// ```rust
/// use xmlmodem::{ReaderOptions, XmlReader};
///
/// let options = ReaderOptions {
///     skip_root: true,
///     same_name_list: true,
///     ..Default::default()
/// };
/// let reader = XmlReader::from_str("<a><b>1</b></a>", options).unwrap();
/// ```
///
/// # Default
///
/// All flags default to `false`; the value pool keeps up to
/// [`DEFAULT_VALUE_POOL_CAPACITY`] buffers.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Whether to omit the wrapper object synthesized for the outermost
    /// element.
    ///
    /// With `skip_root` off, `<root><name>v</name></root>` reads as
    /// `{"root": {"name": "v"}}`; with it on, as `{"name": "v"}`.
    ///
    /// # Default
    ///
    /// `false`
    pub skip_root: bool,

    /// Whether to qualify names bound to a namespace prefix.
    ///
    /// When enabled, `<ns:name>` becomes the field `<ns>name` and the
    /// attribute `ns:id` becomes `@<ns>id`. When disabled, only local names
    /// are used.
    ///
    /// # Default
    ///
    /// `false`
    pub namespaces: bool,

    /// Whether adjacent sibling elements sharing a name form a list without a
    /// dedicated wrapper element.
    ///
    /// ```xml
    /// <root><item>1</item><item>2</item></root>
    /// ```
    ///
    /// reads as `{"item": ["1", "2"]}` when the consumer asks for an array at
    /// `item`.
    ///
    /// # Default
    ///
    /// `false`
    pub same_name_list: bool,

    /// Whether array elements may be bare text instead of objects.
    ///
    /// # Default
    ///
    /// `false`
    pub primitive_arrays: bool,

    /// Whether the top-level elements of a document requested as an array are
    /// primitives. Requires [`skip_root`](Self::skip_root).
    ///
    /// # Default
    ///
    /// `false`
    pub root_array_primitive: bool,

    /// How many value buffers a reader keeps for reuse. `0` disables pooling.
    ///
    /// Pooling never changes the produced stream.
    ///
    /// # Default
    ///
    /// [`DEFAULT_VALUE_POOL_CAPACITY`]
    pub value_pool_capacity: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            skip_root: false,
            namespaces: false,
            same_name_list: false,
            primitive_arrays: false,
            root_array_primitive: false,
            value_pool_capacity: DEFAULT_VALUE_POOL_CAPACITY,
        }
    }
}

impl ReaderOptions {
    /// Checks that the flags describe a supported combination.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::Config`] when `root_array_primitive` is set
    /// without `skip_root`: a wrapped root is always an object.
    pub fn validate(&self) -> Result<(), ReaderError> {
        if self.root_array_primitive && !self.skip_root {
            return Err(ReaderError::Config(
                "root_array_primitive requires skip_root",
            ));
        }
        Ok(())
    }
}
