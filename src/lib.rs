//! # `pushparse`, parsing byte streams as they arrive
//!
//! `pushparse` is a push-driven parser combinator library:
//! - The caller feeds bytes in chunks of whatever size the transport
//!   produced; the parser suspends after any byte and resumes on the next
//!   chunk
//! - Parsers are small reusable [callbacks][Callback] wired together with
//!   [combinators][combinator]
//! - A [Protocol Buffers layer][protobuf] decodes varints, field maps, and
//!   messages on top of the same algebra
//!
//! Where a pull parser asks a source for more input, a push parser is a
//! state machine the I/O loop pushes into: the same graph works under
//! blocking reads, an async reactor, or a packet capture callback, because
//! it never blocks and never rewinds.
//!
//! ## Example
//!
//! Parse `message { uint32 int1 = 1; uint64 int2 = 2; }` from two chunks
//! split in the middle of a varint:
//!
//! ```rust
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! use pushparse::protobuf::{message, FieldMap};
//! use pushparse::{Driver, Status};
//!
//! let int1 = Rc::new(Cell::new(0u32));
//! let int2 = Rc::new(Cell::new(0u64));
//!
//! let mut map = FieldMap::new();
//! map.assign_uint32(1, Rc::clone(&int1));
//! map.assign_uint64(2, Rc::clone(&int2));
//!
//! let mut driver = Driver::new(message(map), ());
//! assert_eq!(driver.submit(&[0x08, 0xac, 0x02, 0x10]), Ok(Status::Incomplete));
//! assert_eq!(driver.submit(&[0x80, 0xe4, 0x97, 0xd0, 0x12]), Ok(Status::Incomplete));
//! driver.eof()?;
//!
//! assert_eq!(int1.get(), 300);
//! assert_eq!(int2.get(), 5_000_000_000);
//! # Ok::<(), pushparse::error::ParseError>(())
//! ```
//!
//! ## Graph shape
//!
//! A parser graph is built once and owned by its [`Driver`]; each composite
//! node owns its children, so dropping the driver frees the graph
//! atomically. Nodes hold their own suspension state; there is no call
//! stack to unwind when input runs out, which is what makes resuming
//! possible (see the [callback contract][Callback]).
//!
//! ## Debugging
//!
//! Wrap any node in [`trace::trace`] and enable the `debug` cargo feature
//! to watch activations, feeds, and outcomes on stderr.

pub mod buffer;
mod callback;
pub mod combinator;
mod driver;
pub mod error;
pub mod primitive;
pub mod protobuf;
pub mod trace;

pub use callback::Callback;
pub use driver::{Driver, Status};

/// Core concepts available for glob import
///
/// ## Example
///
/// ```rust
/// use pushparse::prelude::*;
///
/// let mut driver = Driver::new(pushparse::protobuf::varint64(), ());
/// assert_eq!(driver.submit(&[0x2a]), Ok(Status::Complete { unused: 0 }));
/// assert_eq!(driver.finish(), Ok(42));
/// ```
pub mod prelude {
    pub use crate::error::{ErrMode, FeedResult, ParseError};
    pub use crate::Callback;
    pub use crate::{Driver, Status};
}
