//! The top-level object that owns the root callback and routes bytes

use crate::error::{ErrMode, ErrorKind, ParseError};
use crate::Callback;

/// What a [`submit`][Driver::submit] call observed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The root callback is suspended, waiting for more bytes
    Incomplete,
    /// The root callback completed; the last `unused` bytes of the chunk
    /// were not consumed
    Complete {
        /// Unconsumed suffix length of the submitted chunk
        unused: usize,
    },
}

/// Drives a parser graph by pushing byte chunks at its root callback
///
/// The driver owns the root node; dropping the driver drops the whole
/// graph. It latches the first terminal outcome: after completion further
/// [`submit`][Driver::submit]s report the whole chunk unused, after a
/// failure they repeat the stored error.
///
/// # Example
///
/// ```rust
/// use pushparse::protobuf::varint64;
/// use pushparse::{Driver, Status};
///
/// let mut driver = Driver::new(varint64(), ());
/// // 300, split inside the varint
/// assert_eq!(driver.submit(&[0xac]), Ok(Status::Incomplete));
/// assert_eq!(driver.submit(&[0x02]), Ok(Status::Complete { unused: 0 }));
/// assert_eq!(driver.finish(), Ok(300));
/// ```
pub struct Driver<P: Callback> {
    root: P,
    state: State<P::Output>,
}

enum State<O> {
    Running,
    Complete(O),
    Failed(ParseError),
}

impl<P: Callback> Driver<P> {
    /// Creates a driver and activates `root` with `input`
    pub fn new(mut root: P, input: P::Input) -> Self {
        root.activate(input);
        Self {
            root,
            state: State::Running,
        }
    }

    /// Feed `chunk` to the graph
    ///
    /// A single call may drive any number of nodes to completion; control
    /// returns once the chunk is consumed, the root completes, or the parse
    /// fails.
    pub fn submit(&mut self, mut chunk: &[u8]) -> Result<Status, ParseError> {
        match &self.state {
            State::Complete(_) => return Ok(Status::Complete { unused: chunk.len() }),
            State::Failed(e) => return Err(*e),
            State::Running => {}
        }
        match self.root.feed(&mut chunk) {
            Ok(value) => {
                self.state = State::Complete(value);
                Ok(Status::Complete {
                    unused: chunk.len(),
                })
            }
            Err(ErrMode::Incomplete) => Ok(Status::Incomplete),
            Err(ErrMode::Backtrack(e)) | Err(ErrMode::Cut(e)) => {
                self.state = State::Failed(e);
                Err(e)
            }
        }
    }

    /// Signal end-of-stream
    ///
    /// A root still waiting for bytes turns into a premature-EOF parse
    /// error.
    pub fn eof(&mut self) -> Result<(), ParseError> {
        match self.submit(&[]) {
            Ok(Status::Complete { .. }) => Ok(()),
            Ok(Status::Incomplete) => {
                let e = ParseError::new(self.root.name(), ErrorKind::Eof);
                self.state = State::Failed(e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// The root's output, if the parse has completed
    pub fn result(&self) -> Option<&P::Output> {
        match &self.state {
            State::Complete(value) => Some(value),
            _ => None,
        }
    }

    /// Consume the driver, yielding the root's output
    ///
    /// A parse that never completed reports a premature-EOF error.
    pub fn finish(self) -> Result<P::Output, ParseError> {
        match self.state {
            State::Complete(value) => Ok(value),
            State::Failed(e) => Err(e),
            State::Running => Err(ParseError::new(self.root.name(), ErrorKind::Eof)),
        }
    }
}
