//! # Error management
//!
//! Every [`Callback::feed`][crate::Callback::feed] call resolves to a
//! [`FeedResult`]:
//! - `Ok(output)`: the callback completed; unconsumed bytes are left on the
//!   cursor for the next node
//! - `Err(ErrMode::Incomplete)`: the whole chunk was consumed; feed the next
//!   chunk to the same callback to resume
//! - `Err(ErrMode::Backtrack(_))` / `Err(ErrMode::Cut(_))`: the parse failed,
//!   without or after consuming input
//!
//! The `Backtrack`/`Cut` split is what [`choice`][crate::combinator::choice]
//! keys on: a branch that failed without consuming bytes can be swapped for
//! the other branch, while an error after consumption is permanent.

use std::fmt;

/// Holds the outcome of [`Callback::feed`][crate::Callback::feed]
///
/// - `Ok(O)` is the completed value
/// - [`Err(ErrMode)`][ErrMode] is a suspension or an error
pub type FeedResult<O> = Result<O, ErrMode>;

/// How a [`feed`][crate::Callback::feed] call stopped short of completing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrMode {
    /// Every byte of the chunk was consumed and more are needed
    ///
    /// Feed the next chunk to the same callback to resume. Feeding an empty
    /// chunk instead signals end-of-stream.
    Incomplete,
    /// The parse failed without consuming input
    ///
    /// [`choice`][crate::combinator::choice] catches this from its first
    /// branch and tries the second.
    Backtrack(ParseError),
    /// The parse failed after consuming input
    ///
    /// No other branch may run; the error surfaces to the driver.
    Cut(ParseError),
}

impl ErrMode {
    /// Tests if the outcome is a suspension
    #[inline]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ErrMode::Incomplete)
    }

    /// Prevent branch switching, bubbling the error up to the driver
    #[inline]
    pub fn cut(self) -> Self {
        match self {
            ErrMode::Backtrack(e) => ErrMode::Cut(e),
            rest => rest,
        }
    }

    /// Re-enable branch switching
    #[inline]
    pub fn backtrack(self) -> Self {
        match self {
            ErrMode::Cut(e) => ErrMode::Backtrack(e),
            rest => rest,
        }
    }

    /// Unwrap the mode, returning the underlying error
    ///
    /// Returns `None` for [`ErrMode::Incomplete`]
    #[inline]
    pub fn into_inner(self) -> Option<ParseError> {
        match self {
            ErrMode::Backtrack(e) | ErrMode::Cut(e) => Some(e),
            ErrMode::Incomplete => None,
        }
    }
}

impl fmt::Display for ErrMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrMode::Incomplete => write!(f, "parsing requires more data"),
            ErrMode::Backtrack(e) => write!(f, "parsing error: {e}"),
            ErrMode::Cut(e) => write!(f, "parsing failure: {e}"),
        }
    }
}

/// A parse failure, tagged with the name of the callback that raised it
///
/// # Example
///
/// ```rust
/// use pushparse::error::{ErrorKind, ParseError};
///
/// let e = ParseError::new("varint64", ErrorKind::Varint);
/// assert_eq!(e.callback(), "varint64");
/// assert_eq!(e.to_string(), "`varint64`: malformed varint");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    callback: &'static str,
    kind: ErrorKind,
}

impl ParseError {
    /// Creates a new error raised by `callback`
    #[inline]
    pub fn new(callback: &'static str, kind: ErrorKind) -> Self {
        Self { callback, kind }
    }

    /// The [`name`][crate::Callback::name] of the callback that failed
    #[inline]
    pub fn callback(&self) -> &'static str {
        self.callback
    }

    /// What went wrong
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Wrap as a [`Backtrack`][ErrMode::Backtrack] error
    #[inline]
    pub fn backtrack(self) -> ErrMode {
        ErrMode::Backtrack(self)
    }

    /// Wrap as a [`Cut`][ErrMode::Cut] error
    #[inline]
    pub fn cut(self) -> ErrMode {
        ErrMode::Cut(self)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}`: {}", self.callback, self.kind)
    }
}

impl std::error::Error for ParseError {}

/// A rudimentary error category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The stream ended in the middle of a value
    Eof,
    /// [`eof`][crate::primitive::eof] saw bytes where the stream should end
    ExpectedEof,
    /// A varint ran past its maximum width
    Varint,
    /// A field tag was malformed or carried an unexpected wire type
    Tag,
    /// A deprecated group wire type was encountered
    Group,
    /// The wrapped callback finished before its byte floor
    TooShort,
    /// A repetition succeeded without consuming bytes
    Loop,
    /// A predicate rejected the input
    Verify,
}

impl ErrorKind {
    /// Converts the kind to a human readable description
    pub fn description(&self) -> &'static str {
        match self {
            ErrorKind::Eof => "unexpected end of stream",
            ErrorKind::ExpectedEof => "expected end of stream",
            ErrorKind::Varint => "malformed varint",
            ErrorKind::Tag => "malformed tag or wire type mismatch",
            ErrorKind::Group => "deprecated group wire type",
            ErrorKind::TooShort => "finished before byte floor",
            ErrorKind::Loop => "repetition consumed no bytes",
            ErrorKind::Verify => "predicate rejected the input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}
