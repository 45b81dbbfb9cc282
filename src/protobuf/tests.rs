use super::*;

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{ErrMode, ErrorKind, ParseError};
use crate::{Callback, Driver, Status};

#[test]
fn varint64_single_byte() {
    let mut v = varint64();
    v.activate(());
    let mut chunk: &[u8] = &[0x2a, 0xff];
    assert_eq!(v.feed(&mut chunk), Ok(42));
    assert_eq!(chunk, &[0xff]);
}

#[test]
fn varint64_multi_byte() {
    let mut v = varint64();
    v.activate(());
    assert_eq!(v.feed(&mut &[0xac, 0x02][..]), Ok(300));
}

#[test]
fn varint64_resumes_between_every_byte() {
    let encoded = [0x80, 0xe4, 0x97, 0xd0, 0x12];
    let mut v = varint64();
    v.activate(());
    for &byte in &encoded[..4] {
        assert_eq!(v.feed(&mut &[byte][..]), Err(ErrMode::Incomplete));
    }
    assert_eq!(v.feed(&mut &encoded[4..]), Ok(5_000_000_000));
}

#[test]
fn varint64_sign_extended_negative() {
    // -500 as an int64: ten bytes on the wire
    let mut v = varint64();
    v.activate(());
    let bytes = [0x8c, 0xfc, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
    assert_eq!(v.feed(&mut &bytes[..]).map(|n| n as i64), Ok(-500));
}

#[test]
fn varint64_rejects_an_eleventh_byte() {
    let mut v = varint64();
    v.activate(());
    assert_eq!(
        v.feed(&mut &[0xff; 10][..]),
        Err(ErrMode::Cut(ParseError::new("varint64", ErrorKind::Varint)))
    );
}

#[test]
fn varint64_eof_mid_value_is_permanent() {
    let mut v = varint64();
    v.activate(());
    assert_eq!(v.feed(&mut &[0x80][..]), Err(ErrMode::Incomplete));
    assert_eq!(
        v.feed(&mut &b""[..]),
        Err(ErrMode::Cut(ParseError::new("varint64", ErrorKind::Eof)))
    );
}

#[test]
fn varint64_eof_before_any_byte_backtracks() {
    let mut v = varint64();
    v.activate(());
    assert_eq!(
        v.feed(&mut &b""[..]),
        Err(ErrMode::Backtrack(ParseError::new(
            "varint64",
            ErrorKind::Eof
        )))
    );
}

#[test]
fn varint32_truncates_sign_extended_values() {
    // -1 as an int64; the low 32 bits survive
    let mut v = varint32();
    v.activate(());
    let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
    assert_eq!(v.feed(&mut &bytes[..]), Ok(u32::MAX));
}

#[test]
fn varint_size_reads_a_length() {
    let mut v = varint_size();
    v.activate(());
    assert_eq!(v.feed(&mut &[0x96, 0x01][..]), Ok(150));
}

#[test]
fn encode_decode_mirror() {
    for value in [0u64, 1, 127, 128, 300, 5_000_000_000, u64::MAX] {
        let mut wire = Vec::new();
        encode_varint(value, &mut wire);
        assert_eq!(wire.len(), varint_len(value));

        let mut v = varint64();
        v.activate(());
        assert_eq!(v.feed(&mut &wire[..]), Ok(value));
    }
}

#[test]
fn zigzag_reference_vectors() {
    assert_eq!(decode_zigzag32(0), 0);
    assert_eq!(decode_zigzag32(1), -1);
    assert_eq!(decode_zigzag32(2), 1);
    assert_eq!(decode_zigzag32(999), -500);
    assert_eq!(decode_zigzag32(u32::MAX), i32::MIN);
    assert_eq!(encode_zigzag32(-500), 999);
    assert_eq!(decode_zigzag64(9_999_999_999), -5_000_000_000);
    assert_eq!(encode_zigzag64(-5_000_000_000), 9_999_999_999);
}

#[test]
fn tag_unpack_reference_vectors() {
    let tag = Tag::unpack(0x08).unwrap();
    assert_eq!((tag.field, tag.wire_type), (1, WireType::Varint));
    let tag = Tag::unpack(0x1a).unwrap();
    assert_eq!((tag.field, tag.wire_type), (3, WireType::LengthDelimited));
    assert_eq!(tag.pack(), 0x1a);
}

#[test]
fn tag_rejects_groups_and_junk() {
    // field 1, wire type 3 (start group)
    assert_eq!(
        Tag::unpack(0x0b),
        Err(ParseError::new("tag", ErrorKind::Group))
    );
    // field 1, wire type 6
    assert_eq!(
        Tag::unpack(0x0e),
        Err(ParseError::new("tag", ErrorKind::Tag))
    );
    // field 0 is reserved
    assert_eq!(
        Tag::unpack(0x00),
        Err(ParseError::new("tag", ErrorKind::Tag))
    );
}

#[test]
fn message_rejects_wire_type_mismatch() {
    let dest = Rc::new(Cell::new(0u32));
    let mut map = FieldMap::new();
    map.assign_uint32(1, dest);

    let mut driver = Driver::new(message(map), ());
    // field 1 arrives length-delimited instead of as a varint
    let err = driver.submit(&[0x0a, 0x00]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Tag);
}

#[test]
fn message_rejects_group_wire_types() {
    let mut driver = Driver::new(message(FieldMap::new()), ());
    let err = driver.submit(&[0x0b]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Group);
}

#[test]
fn message_skips_unknown_fixed_width_fields() {
    let int1 = Rc::new(Cell::new(0u32));
    let mut map = FieldMap::new();
    map.assign_uint32(1, Rc::clone(&int1));

    let mut driver = Driver::new(message(map), ());
    let bytes = [
        0x49, 1, 2, 3, 4, 5, 6, 7, 8, // field 9, wire type 1: 8 bytes
        0x55, 1, 2, 3, 4, // field 10, wire type 5: 4 bytes
        0x08, 0xac, 0x02, // field 1 = 300
    ];
    assert_eq!(driver.submit(&bytes), Ok(Status::Incomplete));
    driver.eof().unwrap();
    assert_eq!(int1.get(), 300);
}

#[test]
fn nested_submessage_is_bounded_by_its_length() {
    let inner_int = Rc::new(Cell::new(0u32));
    let outer_int = Rc::new(Cell::new(0u32));

    let mut inner = FieldMap::new();
    inner.assign_uint32(1, Rc::clone(&inner_int));

    let mut outer = FieldMap::new();
    outer.add_submessage(1, message(inner));
    outer.assign_uint32(2, Rc::clone(&outer_int));

    let mut driver = Driver::new(message(outer), ());
    // field 1: 3-byte submessage { field 1 = 300 }, then field 2 = 7,
    // split inside the submessage
    assert_eq!(driver.submit(&[0x0a, 0x03, 0x08]), Ok(Status::Incomplete));
    assert_eq!(driver.submit(&[0xac, 0x02, 0x10, 0x07]), Ok(Status::Incomplete));
    driver.eof().unwrap();
    assert_eq!(inner_int.get(), 300);
    assert_eq!(outer_int.get(), 7);
}

#[test]
fn truncated_submessage_is_an_error() {
    let inner_int = Rc::new(Cell::new(0u32));
    let mut inner = FieldMap::new();
    inner.assign_uint32(1, Rc::clone(&inner_int));

    let mut outer = FieldMap::new();
    outer.add_submessage(1, message(inner));

    let mut driver = Driver::new(message(outer), ());
    // the submessage claims 2 bytes but its varint value needs a third
    let err = driver.submit(&[0x0a, 0x02, 0x08, 0xac]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Eof);
}

#[test]
fn field_map_lookup() {
    let mut map = FieldMap::new();
    assert!(map.is_empty());
    map.assign_uint32(4, Rc::new(Cell::new(0)));
    map.assign_uint64(2, Rc::new(Cell::new(0)));
    assert_eq!(map.len(), 2);
    assert_eq!(map.find(4), Some(0));
    assert_eq!(map.find(2), Some(1));
    assert_eq!(map.find(3), None);
}
