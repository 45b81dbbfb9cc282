//! The uniform contract every parser node implements

use crate::combinator::{compose, pure, Compose, Pure};
use crate::error::FeedResult;

/// A single parser node in a push-driven graph
///
/// A callback is a suspendable state machine: the caller pushes byte chunks
/// into it with [`feed`][Callback::feed] and the callback reports one of
/// three outcomes (see [`FeedResult`]). Because all state lives in the node,
/// a parse can stop after any byte and resume with the next chunk.
///
/// # Protocol
///
/// - [`activate`][Callback::activate] fully resets the node and hands it its
///   input value. It never consumes bytes. A node may be activated many times
///   in succession (e.g. inside [`fold`][crate::combinator::fold]), never
///   concurrently.
/// - [`feed`][Callback::feed] is only called between activation and the first
///   outcome other than [`Incomplete`][crate::error::ErrMode::Incomplete].
///   Consumed bytes are reported by advancing the cursor; the unconsumed
///   suffix is left for the next node. `Incomplete` implies the whole chunk
///   was consumed.
/// - Feeding an **empty chunk signals end-of-stream**. A callback that still
///   needs bytes must fail with [`ErrorKind::Eof`][crate::error::ErrorKind];
///   one that happens to be complete may succeed.
/// - A failure is [`Backtrack`][crate::error::ErrMode::Backtrack] when the
///   node has consumed nothing since activation and
///   [`Cut`][crate::error::ErrMode::Cut] otherwise, so that
///   [`choice`][crate::combinator::choice] can tell a clean rejection from a
///   mid-value failure.
///
/// Values handed between nodes are owned. When a node exposes borrowed bytes
/// (see [`fixed`][crate::primitive::fixed]), the borrow is only valid for the
/// duration of the call that produced it; a downstream node that needs the
/// bytes later must copy them into its own storage.
///
/// # Example
///
/// ```rust
/// use pushparse::primitive::fixed;
/// use pushparse::Callback;
///
/// let mut le_u32 = fixed(4, |b: &[u8]| u32::from_le_bytes(b.try_into().unwrap()));
/// le_u32.activate(());
///
/// let mut chunk: &[u8] = &[7, 0, 0, 0, 99];
/// assert_eq!(le_u32.feed(&mut chunk), Ok(7));
/// assert_eq!(chunk, &[99]); // the suffix stays on the cursor
/// ```
pub trait Callback {
    /// Value handed to [`activate`][Callback::activate]
    type Input;
    /// Value produced on completion
    type Output;

    /// Stable human-readable name, used in diagnostics and errors
    fn name(&self) -> &'static str;

    /// Reset internal state and store the input for later use
    fn activate(&mut self, input: Self::Input);

    /// Consume bytes from the front of `chunk` and report an outcome
    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<Self::Output>;

    /// Run `next` on this callback's output, as
    /// [`compose`][crate::combinator::compose]
    ///
    /// # Example
    ///
    /// ```rust
    /// use pushparse::primitive::{fixed, skip};
    /// use pushparse::Callback;
    ///
    /// // read a length byte, then skip that many bytes
    /// let mut jump = fixed(1, |b: &[u8]| b[0] as usize).then(skip());
    /// jump.activate(());
    ///
    /// let mut chunk: &[u8] = &[2, 0xaa, 0xbb, 0xcc];
    /// assert_eq!(jump.feed(&mut chunk), Ok(2));
    /// assert_eq!(chunk, &[0xcc]);
    /// ```
    fn then<G>(self, next: G) -> Compose<Self, G>
    where
        Self: Sized,
        G: Callback<Input = Self::Output>,
    {
        compose(self, next)
    }

    /// Apply a pure function to this callback's output, as
    /// `compose(self, pure(f))`
    fn map<O, F>(self, f: F) -> Compose<Self, Pure<F, Self::Output>>
    where
        Self: Sized,
        F: FnMut(Self::Output) -> O,
    {
        compose(self, pure(f))
    }
}

impl<P: Callback + ?Sized> Callback for Box<P> {
    type Input = P::Input;
    type Output = P::Output;

    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn activate(&mut self, input: Self::Input) {
        (**self).activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<Self::Output> {
        (**self).feed(chunk)
    }
}
