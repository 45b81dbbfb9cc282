//! Field-number-keyed dispatch table used by the message parser

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::buffer::HwmBuffer;
use crate::combinator::dynamic_max_bytes;
use crate::protobuf::message::Message;
use crate::protobuf::varint::{
    decode_zigzag32, decode_zigzag64, varint32, varint64, varint_size,
};
use crate::protobuf::{length_prefixed_string, FieldNumber, WireType};
use crate::Callback;

pub(crate) struct FieldEntry {
    pub(crate) field: FieldNumber,
    pub(crate) wire_type: WireType,
    pub(crate) value: Box<dyn Callback<Input = (), Output = ()>>,
}

/// Maps field numbers to the callbacks that read them
///
/// Populate the map, then hand it to [`message`][crate::protobuf::message];
/// it is immutable from the message's point of view afterwards. Each value
/// callback stores its result through a shared destination handle the
/// caller keeps a clone of; a later occurrence of a scalar field overwrites
/// the earlier value, per protobuf semantics.
///
/// # Example
///
/// ```rust
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// use pushparse::protobuf::{message, FieldMap};
/// use pushparse::{Driver, Status};
///
/// let int1 = Rc::new(Cell::new(0u32));
/// let mut map = FieldMap::new();
/// map.assign_uint32(1, Rc::clone(&int1));
///
/// let mut driver = Driver::new(message(map), ());
/// assert_eq!(driver.submit(&[0x08, 0xac, 0x02]), Ok(Status::Incomplete));
/// driver.eof()?;
/// assert_eq!(int1.get(), 300);
/// # Ok::<(), pushparse::error::ParseError>(())
/// ```
#[derive(Default)]
pub struct FieldMap {
    pub(crate) entries: Vec<FieldEntry>,
}

impl FieldMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Tests if no fields are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register a value callback for `field`
    ///
    /// The callback runs whenever a tag with this field number is read; a
    /// tag carrying a different wire type than `wire_type` is a parse
    /// error. The typed helpers below cover the scalar protobuf types.
    pub fn add_field(
        &mut self,
        field: FieldNumber,
        wire_type: WireType,
        value: impl Callback<Input = (), Output = ()> + 'static,
    ) {
        debug_assert!(
            self.find(field).is_none(),
            "field {field} registered twice"
        );
        self.entries.push(FieldEntry {
            field,
            wire_type,
            value: Box::new(value),
        });
    }

    /// Read field `field` as a `uint32` into `dest`
    pub fn assign_uint32(&mut self, field: FieldNumber, dest: Rc<Cell<u32>>) {
        self.add_field(field, WireType::Varint, varint32().map(move |v| dest.set(v)));
    }

    /// Read field `field` as a `uint64` into `dest`
    pub fn assign_uint64(&mut self, field: FieldNumber, dest: Rc<Cell<u64>>) {
        self.add_field(field, WireType::Varint, varint64().map(move |v| dest.set(v)));
    }

    /// Read field `field` as an `int32` into `dest`
    ///
    /// Negative values arrive sign-extended to 64 bits (ten wire bytes) and
    /// are truncated back to 32.
    pub fn assign_int32(&mut self, field: FieldNumber, dest: Rc<Cell<i32>>) {
        self.add_field(
            field,
            WireType::Varint,
            varint64().map(move |v| dest.set(v as i32)),
        );
    }

    /// Read field `field` as an `int64` into `dest`
    pub fn assign_int64(&mut self, field: FieldNumber, dest: Rc<Cell<i64>>) {
        self.add_field(
            field,
            WireType::Varint,
            varint64().map(move |v| dest.set(v as i64)),
        );
    }

    /// Read field `field` as a ZigZag-encoded `sint32` into `dest`
    pub fn assign_sint32(&mut self, field: FieldNumber, dest: Rc<Cell<i32>>) {
        self.add_field(
            field,
            WireType::Varint,
            varint32().map(move |v| dest.set(decode_zigzag32(v))),
        );
    }

    /// Read field `field` as a ZigZag-encoded `sint64` into `dest`
    pub fn assign_sint64(&mut self, field: FieldNumber, dest: Rc<Cell<i64>>) {
        self.add_field(
            field,
            WireType::Varint,
            varint64().map(move |v| dest.set(decode_zigzag64(v))),
        );
    }

    /// Read field `field` as a length-prefixed string into `dest`
    pub fn add_hwm_string(&mut self, field: FieldNumber, dest: Rc<RefCell<HwmBuffer>>) {
        self.add_field(
            field,
            WireType::LengthDelimited,
            length_prefixed_string(dest),
        );
    }

    /// Read field `field` as a length-delimited submessage
    ///
    /// The inner message parses exactly the bytes promised by the length
    /// prefix; it must reach a tag boundary when they run out.
    pub fn add_submessage(&mut self, field: FieldNumber, message: Message) {
        self.add_field(
            field,
            WireType::LengthDelimited,
            varint_size()
                .map(|n| (n, ()))
                .then(dynamic_max_bytes(message)),
        );
    }

    pub(crate) fn find(&self, field: FieldNumber) -> Option<usize> {
        self.entries.iter().position(|e| e.field == field)
    }
}
