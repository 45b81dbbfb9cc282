//! Base-128 varint decoding, ZigZag, and the write-side mirror

use crate::error::{ErrMode, ErrorKind, FeedResult, ParseError};
use crate::Callback;

/// Decoder state shared by the varint callbacks
///
/// Little-endian 7-bit groups; a set MSB means another byte follows. Ten
/// bytes carry up to 70 payload bits, so the tenth continuation bit is
/// malformed. Decoding suspends between any two bytes.
#[derive(Default)]
struct RawVarint {
    value: u64,
    count: u8,
}

impl RawVarint {
    fn reset(&mut self) {
        self.value = 0;
        self.count = 0;
    }

    fn feed(&mut self, chunk: &mut &[u8], name: &'static str) -> FeedResult<u64> {
        let mut cur = *chunk;
        if cur.is_empty() {
            let e = ParseError::new(name, ErrorKind::Eof);
            return Err(if self.count == 0 { e.backtrack() } else { e.cut() });
        }
        while let Some((&byte, rest)) = cur.split_first() {
            cur = rest;
            *chunk = cur;
            // bits past the 64th are dropped, like the reference decoder
            self.value |= u64::from(byte & 0x7f) << (7 * u32::from(self.count));
            self.count += 1;
            if byte & 0x80 == 0 {
                return Ok(self.value);
            }
            if self.count == 10 {
                return Err(ParseError::new(name, ErrorKind::Varint).cut());
            }
        }
        Err(ErrMode::Incomplete)
    }
}

/// Read a varint-encoded integer of up to 64 bits
///
/// # Example
///
/// ```rust
/// use pushparse::error::ErrMode;
/// use pushparse::protobuf::varint64;
/// use pushparse::Callback;
///
/// let mut v = varint64();
/// v.activate(());
/// // 5_000_000_000, split mid-varint
/// assert_eq!(v.feed(&mut &[0x80, 0xe4][..]), Err(ErrMode::Incomplete));
/// assert_eq!(v.feed(&mut &[0x97, 0xd0, 0x12][..]), Ok(5_000_000_000));
/// ```
pub fn varint64() -> Varint64 {
    Varint64 {
        raw: RawVarint::default(),
    }
}

/// Implementation of [`varint64`]
pub struct Varint64 {
    raw: RawVarint,
}

impl Callback for Varint64 {
    type Input = ();
    type Output = u64;

    fn name(&self) -> &'static str {
        "varint64"
    }

    fn activate(&mut self, _input: ()) {
        self.raw.reset();
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<u64> {
        self.raw.feed(chunk, self.name())
    }
}

/// Read a varint-encoded integer, truncated to 32 bits
///
/// The wire value may still be up to ten bytes long: the reference `int32`
/// format sign-extends negative values to 64 bits before encoding, so
/// `-500` arrives as a 10-byte varint. The decoder accepts the full width
/// and keeps the low 32 bits.
pub fn varint32() -> Varint32 {
    Varint32 {
        raw: RawVarint::default(),
    }
}

/// Implementation of [`varint32`]
pub struct Varint32 {
    raw: RawVarint,
}

impl Callback for Varint32 {
    type Input = ();
    type Output = u32;

    fn name(&self) -> &'static str {
        "varint32"
    }

    fn activate(&mut self, _input: ()) {
        self.raw.reset();
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<u32> {
        self.raw.feed(chunk, self.name()).map(|v| v as u32)
    }
}

/// Read a varint-encoded integer used as a size
///
/// Fails if the decoded value does not fit the native size type.
pub fn varint_size() -> VarintSize {
    VarintSize {
        raw: RawVarint::default(),
    }
}

/// Implementation of [`varint_size`]
pub struct VarintSize {
    raw: RawVarint,
}

impl Callback for VarintSize {
    type Input = ();
    type Output = usize;

    fn name(&self) -> &'static str {
        "varint-size"
    }

    fn activate(&mut self, _input: ()) {
        self.raw.reset();
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<usize> {
        let value = self.raw.feed(chunk, self.name())?;
        usize::try_from(value)
            .map_err(|_| ParseError::new(self.name(), ErrorKind::Varint).cut())
    }
}

/// Append the varint encoding of `value` to `out`
///
/// The write-side mirror of [`varint64`]; signed types sign-extend to 64
/// bits first (so negative `int32` values encode as ten bytes), `sint`
/// types ZigZag first.
///
/// # Example
///
/// ```rust
/// use pushparse::protobuf::encode_varint;
///
/// let mut out = Vec::new();
/// encode_varint(300, &mut out);
/// assert_eq!(out, [0xac, 0x02]);
/// ```
pub fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Number of bytes [`encode_varint`] emits for `value`
pub fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Map a ZigZag-encoded `sint32` wire value back to a signed integer
///
/// # Example
///
/// ```rust
/// use pushparse::protobuf::{decode_zigzag32, encode_zigzag32};
///
/// assert_eq!(decode_zigzag32(999), -500);
/// assert_eq!(encode_zigzag32(-500), 999);
/// ```
pub fn decode_zigzag32(n: u32) -> i32 {
    ((n >> 1) as i32) ^ -((n & 1) as i32)
}

/// Map a signed integer to its ZigZag `sint32` wire value
pub fn encode_zigzag32(n: i32) -> u32 {
    ((n << 1) ^ (n >> 31)) as u32
}

/// Map a ZigZag-encoded `sint64` wire value back to a signed integer
pub fn decode_zigzag64(n: u64) -> i64 {
    ((n >> 1) as i64) ^ -((n & 1) as i64)
}

/// Map a signed integer to its ZigZag `sint64` wire value
pub fn encode_zigzag64(n: i64) -> u64 {
    ((n << 1) ^ (n >> 63)) as u64
}
