//! Protocol Buffers wire-format parsing on top of the combinator algebra
//!
//! The layer decodes the standard binary encoding: little-endian base-128
//! varints, tags packed as `(field << 3) | wire_type`, ZigZag for the
//! signed `sint` types, and length-delimited fields. Build a [`FieldMap`]
//! describing the fields you care about, wrap it in a [`message`], and
//! drive it with a [`Driver`][crate::Driver]; unknown fields are skipped
//! according to their wire type.
//!
//! Groups (wire types 3 and 4) are deprecated and unsupported; packed
//! repeated fields are out of scope.

mod field_map;
mod message;
#[cfg(test)]
mod tests;
mod varint;

pub use field_map::FieldMap;
pub use message::{message, Message};
pub use varint::{
    decode_zigzag32, decode_zigzag64, encode_varint, encode_zigzag32, encode_zigzag64,
    varint32, varint64, varint_len, varint_size, Varint32, Varint64, VarintSize,
};

use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::HwmBuffer;
use crate::combinator::Compose;
use crate::error::{ErrorKind, ParseError};
use crate::primitive::{hwm_string, skip, HwmString, Skip};
use crate::Callback;

/// A protobuf field number
pub type FieldNumber = u32;

/// The 3-bit encoding class carried in a field tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    /// Wire type 0: base-128 varint
    Varint,
    /// Wire type 1: 8 bytes, little-endian
    Fixed64,
    /// Wire type 2: varint length, then that many bytes
    LengthDelimited,
    /// Wire type 5: 4 bytes, little-endian
    Fixed32,
}

impl WireType {
    fn bits(self) -> u64 {
        match self {
            WireType::Varint => 0,
            WireType::Fixed64 => 1,
            WireType::LengthDelimited => 2,
            WireType::Fixed32 => 5,
        }
    }
}

/// A decoded field tag: `(field << 3) | wire_type`
///
/// # Example
///
/// ```rust
/// use pushparse::protobuf::{Tag, WireType};
///
/// let tag = Tag::unpack(0x08).unwrap();
/// assert_eq!(tag.field, 1);
/// assert_eq!(tag.wire_type, WireType::Varint);
/// assert_eq!(tag.pack(), 0x08);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// Field number; zero is invalid
    pub field: FieldNumber,
    /// How the field value is encoded
    pub wire_type: WireType,
}

impl Tag {
    /// Split a raw tag varint into field number and wire type
    ///
    /// Field number zero and wire values 6/7 are malformed; the deprecated
    /// group wire types 3/4 are reported as [`ErrorKind::Group`].
    pub fn unpack(raw: u64) -> Result<Self, ParseError> {
        let wire_type = match raw & 0x7 {
            0 => WireType::Varint,
            1 => WireType::Fixed64,
            2 => WireType::LengthDelimited,
            5 => WireType::Fixed32,
            3 | 4 => return Err(ParseError::new("tag", ErrorKind::Group)),
            _ => return Err(ParseError::new("tag", ErrorKind::Tag)),
        };
        let field = match FieldNumber::try_from(raw >> 3) {
            Ok(field) if field != 0 => field,
            _ => return Err(ParseError::new("tag", ErrorKind::Tag)),
        };
        Ok(Self { field, wire_type })
    }

    /// The raw tag varint
    pub fn pack(&self) -> u64 {
        (u64::from(self.field) << 3) | self.wire_type.bits()
    }
}

/// Skip over a length-prefixed field
pub fn length_prefixed_skip() -> Compose<VarintSize, Skip> {
    varint_size().then(skip())
}

/// Read a length-prefixed string into a shared [`HwmBuffer`]
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use pushparse::buffer::HwmBuffer;
/// use pushparse::protobuf::length_prefixed_string;
/// use pushparse::Callback;
///
/// let buf = Rc::new(RefCell::new(HwmBuffer::new()));
/// let mut string = length_prefixed_string(Rc::clone(&buf));
/// string.activate(());
///
/// let mut chunk: &[u8] = b"\x05abcde";
/// assert_eq!(string.feed(&mut chunk), Ok(()));
/// assert_eq!(buf.borrow().as_bytes(), b"abcde");
/// ```
pub fn length_prefixed_string(buf: Rc<RefCell<HwmBuffer>>) -> Compose<VarintSize, HwmString> {
    varint_size().then(hwm_string(buf))
}
