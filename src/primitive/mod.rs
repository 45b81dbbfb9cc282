//! Leaf callbacks that read bytes on their own, without wrapping another node


use std::cell::RefCell;
use std::rc::Rc;

use crate::buffer::HwmBuffer;
use crate::error::{ErrMode, ErrorKind, FeedResult, ParseError};
use crate::Callback;

/// Do nothing: parse no data and copy the input to the output
///
/// # Example
///
/// ```rust
/// use pushparse::primitive::noop;
/// use pushparse::Callback;
///
/// let mut id = noop();
/// id.activate(42u32);
///
/// let mut chunk: &[u8] = b"untouched";
/// assert_eq!(id.feed(&mut chunk), Ok(42));
/// assert_eq!(chunk, b"untouched");
/// ```
pub fn noop<T>() -> Noop<T> {
    Noop { input: None }
}

/// Implementation of [`noop`]
pub struct Noop<T> {
    input: Option<T>,
}

impl<T> Callback for Noop<T> {
    type Input = T;
    type Output = T;

    fn name(&self) -> &'static str {
        "noop"
    }

    fn activate(&mut self, input: T) {
        self.input = Some(input);
    }

    fn feed(&mut self, _chunk: &mut &[u8]) -> FeedResult<T> {
        Ok(self.input.take().expect("`noop` fed outside activation"))
    }
}

/// Require the end of the stream
///
/// Succeeds with its input on the end-of-stream signal; any pending byte is a
/// parse error.
///
/// # Example
///
/// ```rust
/// use pushparse::error::{ErrMode, ErrorKind, ParseError};
/// use pushparse::primitive::eof;
/// use pushparse::Callback;
///
/// let mut end = eof();
/// end.activate(());
/// let mut trailing: &[u8] = b"x";
/// assert_eq!(
///     end.feed(&mut trailing),
///     Err(ErrMode::Backtrack(ParseError::new("eof", ErrorKind::ExpectedEof)))
/// );
///
/// let mut end = eof();
/// end.activate(());
/// assert_eq!(end.feed(&mut &b""[..]), Ok(()));
/// ```
pub fn eof<T>() -> Eof<T> {
    Eof { input: None }
}

/// Implementation of [`eof`]
pub struct Eof<T> {
    input: Option<T>,
}

impl<T> Callback for Eof<T> {
    type Input = T;
    type Output = T;

    fn name(&self) -> &'static str {
        "eof"
    }

    fn activate(&mut self, input: T) {
        self.input = Some(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<T> {
        if chunk.is_empty() {
            Ok(self.input.take().expect("`eof` fed outside activation"))
        } else {
            Err(ParseError::new(self.name(), ErrorKind::ExpectedEof).backtrack())
        }
    }
}

/// Accumulate exactly `size` bytes and map them through `f`
///
/// When all `size` bytes are contiguous in one chunk, `f` borrows them
/// straight out of the caller's chunk with no copy made. Only when the value
/// straddles a chunk boundary are the bytes staged in an internal buffer
/// first. Either way the slice handed to `f` is only valid for that call;
/// `f` must copy whatever it needs to keep.
///
/// # Example
///
/// ```rust
/// use pushparse::error::ErrMode;
/// use pushparse::primitive::fixed;
/// use pushparse::Callback;
///
/// let mut le_u32 = fixed(4, |b: &[u8]| u32::from_le_bytes(b.try_into().unwrap()));
/// le_u32.activate(());
///
/// // the value may arrive a byte at a time
/// assert_eq!(le_u32.feed(&mut &[0x07, 0x01][..]), Err(ErrMode::Incomplete));
/// assert_eq!(le_u32.feed(&mut &[0x00, 0x00][..]), Ok(0x107));
/// ```
pub fn fixed<F, O>(size: usize, f: F) -> Fixed<F>
where
    F: FnMut(&[u8]) -> O,
{
    Fixed {
        size,
        buf: Vec::new(),
        f,
    }
}

/// Implementation of [`fixed`]
pub struct Fixed<F> {
    size: usize,
    buf: Vec<u8>,
    f: F,
}

impl<F, O> Callback for Fixed<F>
where
    F: FnMut(&[u8]) -> O,
{
    type Input = ();
    type Output = O;

    fn name(&self) -> &'static str {
        "fixed"
    }

    fn activate(&mut self, _input: ()) {
        // keeps its allocation for the next value
        self.buf.clear();
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<O> {
        let cur = *chunk;
        if self.buf.is_empty() && cur.len() >= self.size {
            // zero-copy fast path: the whole value sits in this chunk
            let out = (self.f)(&cur[..self.size]);
            *chunk = &cur[self.size..];
            return Ok(out);
        }
        if cur.is_empty() {
            let e = ParseError::new(self.name(), ErrorKind::Eof);
            return Err(if self.buf.is_empty() {
                e.backtrack()
            } else {
                e.cut()
            });
        }
        let take = cur.len().min(self.size - self.buf.len());
        self.buf.extend_from_slice(&cur[..take]);
        *chunk = &cur[take..];
        if self.buf.len() == self.size {
            Ok((self.f)(&self.buf))
        } else {
            Err(ErrMode::Incomplete)
        }
    }
}

/// Skip as many bytes as the activation input says, preserving the input
///
/// # Example
///
/// ```rust
/// use pushparse::primitive::skip;
/// use pushparse::Callback;
///
/// let mut hop = skip();
/// hop.activate(3);
///
/// let mut chunk: &[u8] = &[1, 2, 3, 4];
/// assert_eq!(hop.feed(&mut chunk), Ok(3));
/// assert_eq!(chunk, &[4]);
/// ```
pub fn skip() -> Skip {
    Skip {
        total: 0,
        remaining: 0,
    }
}

/// Implementation of [`skip`]
pub struct Skip {
    total: usize,
    remaining: usize,
}

impl Callback for Skip {
    type Input = usize;
    type Output = usize;

    fn name(&self) -> &'static str {
        "skip"
    }

    fn activate(&mut self, input: usize) {
        self.total = input;
        self.remaining = input;
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<usize> {
        if self.remaining == 0 {
            return Ok(self.total);
        }
        let cur = *chunk;
        if cur.is_empty() {
            let e = ParseError::new(self.name(), ErrorKind::Eof);
            return Err(if self.remaining == self.total {
                e.backtrack()
            } else {
                e.cut()
            });
        }
        let take = cur.len().min(self.remaining);
        *chunk = &cur[take..];
        self.remaining -= take;
        if self.remaining == 0 {
            Ok(self.total)
        } else {
            Err(ErrMode::Incomplete)
        }
    }
}

/// Copy as many bytes as the activation input says into a shared
/// [`HwmBuffer`], NUL-terminating the result
///
/// The callback does nothing to determine the length of the string; the
/// length arrives as its input (typically from a length-prefix parser, see
/// [`length_prefixed_string`][crate::protobuf::length_prefixed_string]). On
/// success the buffer holds the payload plus a trailing NUL outside the
/// logical length.
///
/// The caller keeps a clone of the `Rc` handle and must not hold a borrow of
/// the buffer while the parse is running.
///
/// # Example
///
/// ```rust
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use pushparse::buffer::HwmBuffer;
/// use pushparse::primitive::hwm_string;
/// use pushparse::Callback;
///
/// let buf = Rc::new(RefCell::new(HwmBuffer::new()));
/// let mut string = hwm_string(Rc::clone(&buf));
/// string.activate(5);
///
/// let mut chunk: &[u8] = b"abcde!";
/// assert_eq!(string.feed(&mut chunk), Ok(()));
/// assert_eq!(chunk, b"!");
/// assert_eq!(buf.borrow().as_bytes(), b"abcde");
/// assert_eq!(buf.borrow().as_bytes_with_nul(), b"abcde\0");
/// ```
pub fn hwm_string(buf: Rc<RefCell<HwmBuffer>>) -> HwmString {
    HwmString {
        buf,
        total: 0,
        remaining: 0,
    }
}

/// Implementation of [`hwm_string`]
pub struct HwmString {
    buf: Rc<RefCell<HwmBuffer>>,
    total: usize,
    remaining: usize,
}

impl Callback for HwmString {
    type Input = usize;
    type Output = ();

    fn name(&self) -> &'static str {
        "hwm-string"
    }

    fn activate(&mut self, input: usize) {
        self.total = input;
        self.remaining = input;
        self.buf.borrow_mut().reset(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<()> {
        let cur = *chunk;
        if self.remaining > 0 {
            if cur.is_empty() {
                let e = ParseError::new(self.name(), ErrorKind::Eof);
                return Err(if self.remaining == self.total {
                    e.backtrack()
                } else {
                    e.cut()
                });
            }
            let take = cur.len().min(self.remaining);
            self.buf.borrow_mut().push_slice(&cur[..take]);
            *chunk = &cur[take..];
            self.remaining -= take;
        }
        if self.remaining == 0 {
            self.buf.borrow_mut().terminate();
            Ok(())
        } else {
            Err(ErrMode::Incomplete)
        }
    }
}
