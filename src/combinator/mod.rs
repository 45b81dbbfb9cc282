//! # List of combinators
//!
//! Combinators compose other callbacks but read no bytes themselves.
//!
//! | combinator | input | output | comment |
//! |---|---|---|---|
//! | [`compose(f, g)`][compose] | `f`'s input | `g`'s output | `g` runs on `f`'s output and the rest of the bytes |
//! | [`pure(f)`][pure] | `I` | `f(I)` | lifts a pure function; consumes nothing |
//! | [`first(f)`][first] | `(a, s)` | `(f(a), s)` | runs `f` on the first component |
//! | [`second(f)`][second] | `(s, b)` | `(s, f(b))` | runs `f` on the second component |
//! | [`par(a, b)`][par] | `(x, y)` | `(a(x), b(y))` | `compose(first(a), second(b))` |
//! | [`both(a, b)`][both] | `x` | `(a(x), b(x))` | `compose(dup(), par(a, b))` |
//! | [`choice(a, b)`][choice] | shared | shared | tries `b` if `a` fails cleanly |
//! | [`fold(body)`][fold] | accumulator | accumulator | reruns `body`, threading the accumulator |
//! | [`min_bytes(n, f)`][min_bytes] | `f`'s input | `f`'s output | fails if `f` finishes before `n` bytes |
//! | [`max_bytes(n, f)`][max_bytes] | `f`'s input | `f`'s output | `f` never sees more than `n` bytes |
//! | [`dynamic_max_bytes(f)`][dynamic_max_bytes] | `(n, input)` | `f`'s output | ceiling decided at activation |

#[cfg(test)]
mod tests;

use crate::error::{ErrMode, ErrorKind, FeedResult, ParseError};
use crate::Callback;

/// Feed bytes to `f`, then feed the rest and `f`'s output to `g`
///
/// The hand-off happens inside a single [`feed`][Callback::feed] call: one
/// chunk can drive both nodes to completion. If the chunk runs out exactly
/// when `f` completes, the compose suspends and `g` starts on the next
/// chunk.
///
/// Also available as [`Callback::then`].
///
/// # Example
///
/// ```rust
/// use pushparse::combinator::compose;
/// use pushparse::primitive::{fixed, skip};
/// use pushparse::Callback;
///
/// // length byte, then that many bytes skipped
/// let mut jump = compose(fixed(1, |b: &[u8]| b[0] as usize), skip());
/// jump.activate(());
///
/// let mut chunk: &[u8] = &[3, 10, 20, 30, 40];
/// assert_eq!(jump.feed(&mut chunk), Ok(3));
/// assert_eq!(chunk, &[40]);
/// ```
pub fn compose<F, G>(first: F, second: G) -> Compose<F, G>
where
    F: Callback,
    G: Callback<Input = F::Output>,
{
    Compose {
        first,
        second,
        in_second: false,
        consumed: false,
    }
}

/// Implementation of [`compose`]
pub struct Compose<F, G> {
    first: F,
    second: G,
    in_second: bool,
    consumed: bool,
}

impl<F, G> Callback for Compose<F, G>
where
    F: Callback,
    G: Callback<Input = F::Output>,
{
    type Input = F::Input;
    type Output = G::Output;

    fn name(&self) -> &'static str {
        "compose"
    }

    fn activate(&mut self, input: F::Input) {
        self.in_second = false;
        self.consumed = false;
        self.first.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<G::Output> {
        let at_eof = chunk.is_empty();
        if !self.in_second {
            let before = chunk.len();
            match self.first.feed(chunk) {
                Ok(value) => {
                    self.consumed |= chunk.len() != before;
                    self.second.activate(value);
                    self.in_second = true;
                    // an exhausted cursor is not the end-of-stream signal
                    if chunk.is_empty() && !at_eof {
                        return Err(ErrMode::Incomplete);
                    }
                }
                Err(ErrMode::Incomplete) => {
                    self.consumed |= before != 0;
                    return Err(ErrMode::Incomplete);
                }
                Err(e) => {
                    self.consumed |= chunk.len() != before;
                    return Err(if self.consumed { e.cut() } else { e });
                }
            }
        }
        let before = chunk.len();
        match self.second.feed(chunk) {
            Ok(value) => Ok(value),
            Err(ErrMode::Incomplete) => {
                self.consumed |= before != 0;
                Err(ErrMode::Incomplete)
            }
            Err(e) => {
                self.consumed |= chunk.len() != before;
                Err(if self.consumed { e.cut() } else { e })
            }
        }
    }
}

/// Lift a pure function into a callback that consumes no bytes
///
/// The function runs on the activation input; the node completes on its
/// first [`feed`][Callback::feed], including the end-of-stream signal.
///
/// # Example
///
/// ```rust
/// use pushparse::combinator::pure;
/// use pushparse::Callback;
///
/// let mut double = pure(|x: u32| x * 2);
/// double.activate(21);
/// assert_eq!(double.feed(&mut &b""[..]), Ok(42));
/// ```
pub fn pure<F, I, O>(f: F) -> Pure<F, I>
where
    F: FnMut(I) -> O,
{
    Pure { f, input: None }
}

/// Implementation of [`pure`]
pub struct Pure<F, I> {
    f: F,
    input: Option<I>,
}

impl<F, I, O> Callback for Pure<F, I>
where
    F: FnMut(I) -> O,
{
    type Input = I;
    type Output = O;

    fn name(&self) -> &'static str {
        "pure"
    }

    fn activate(&mut self, input: I) {
        self.input = Some(input);
    }

    fn feed(&mut self, _chunk: &mut &[u8]) -> FeedResult<O> {
        Ok((self.f)(self
            .input
            .take()
            .expect("`pure` fed outside activation")))
    }
}

/// Run `inner` on the first component of a pair, carrying the second through
pub fn first<P, S>(inner: P) -> First<P, S>
where
    P: Callback,
{
    First { inner, carry: None }
}

/// Implementation of [`first`]
pub struct First<P, S> {
    inner: P,
    carry: Option<S>,
}

impl<P, S> Callback for First<P, S>
where
    P: Callback,
{
    type Input = (P::Input, S);
    type Output = (P::Output, S);

    fn name(&self) -> &'static str {
        "first"
    }

    fn activate(&mut self, (input, carry): (P::Input, S)) {
        self.carry = Some(carry);
        self.inner.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<(P::Output, S)> {
        let out = self.inner.feed(chunk)?;
        Ok((
            out,
            self.carry.take().expect("`first` fed outside activation"),
        ))
    }
}

/// Run `inner` on the second component of a pair, carrying the first through
pub fn second<P, S>(inner: P) -> Second<P, S>
where
    P: Callback,
{
    Second { inner, carry: None }
}

/// Implementation of [`second`]
pub struct Second<P, S> {
    inner: P,
    carry: Option<S>,
}

impl<P, S> Callback for Second<P, S>
where
    P: Callback,
{
    type Input = (S, P::Input);
    type Output = (S, P::Output);

    fn name(&self) -> &'static str {
        "second"
    }

    fn activate(&mut self, (carry, input): (S, P::Input)) {
        self.carry = Some(carry);
        self.inner.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<(S, P::Output)> {
        let out = self.inner.feed(chunk)?;
        Ok((
            self.carry.take().expect("`second` fed outside activation"),
            out,
        ))
    }
}

/// [`compose`] of [`first`] and [`second`]
pub type Par<A, B> =
    Compose<First<A, <B as Callback>::Input>, Second<B, <A as Callback>::Output>>;

/// Run `a` on the first component, then `b` on the second
///
/// The bytes are a stream, so this is sequential: `a` consumes its prefix
/// before `b` starts where `a` left off.
pub fn par<A, B>(a: A, b: B) -> Par<A, B>
where
    A: Callback,
    B: Callback,
{
    compose(first(a), second(b))
}

/// Pair the input with itself
pub fn dup<T: Clone>() -> impl Callback<Input = T, Output = (T, T)> {
    pure(|x: T| (x.clone(), x))
}

/// Run `a` and then `b`, both seeded with the same input
///
/// The arrow law `a &&& b = arr (\x -> (x, x)) >>> (a *** b)`: both nodes
/// get the same activation input, while the bytes flow sequentially from
/// `a` into `b`.
pub fn both<A, B>(a: A, b: B) -> impl Callback<Input = A::Input, Output = (A::Output, B::Output)>
where
    A: Callback,
    A::Input: Clone,
    B: Callback<Input = A::Input>,
{
    compose(dup(), par(a, b))
}

/// Try `a`; if it fails without consuming bytes, run `b` instead
///
/// There is no backtracking: once `a` has consumed anything, its error is
/// permanent and surfaces as [`Cut`][ErrMode::Cut].
///
/// # Example
///
/// ```rust
/// use pushparse::combinator::choice;
/// use pushparse::primitive::{eof, skip};
/// use pushparse::Callback;
///
/// // skip the advertised count, or accept a stream that already ended
/// let mut lenient = choice(eof(), skip());
/// lenient.activate(3);
/// let mut chunk: &[u8] = b"abcd";
/// assert_eq!(lenient.feed(&mut chunk), Ok(3));
/// assert_eq!(chunk, b"d");
///
/// let mut lenient = choice(eof(), skip());
/// lenient.activate(3);
/// assert_eq!(lenient.feed(&mut &b""[..]), Ok(3));
/// ```
pub fn choice<A, B>(a: A, b: B) -> Choice<A, B>
where
    A: Callback,
    A::Input: Clone,
    B: Callback<Input = A::Input, Output = A::Output>,
{
    Choice {
        a,
        b,
        input: None,
        in_b: false,
        consumed: false,
    }
}

/// Implementation of [`choice`]
pub struct Choice<A: Callback, B> {
    a: A,
    b: B,
    input: Option<A::Input>,
    in_b: bool,
    consumed: bool,
}

impl<A, B> Callback for Choice<A, B>
where
    A: Callback,
    A::Input: Clone,
    B: Callback<Input = A::Input, Output = A::Output>,
{
    type Input = A::Input;
    type Output = A::Output;

    fn name(&self) -> &'static str {
        "choice"
    }

    fn activate(&mut self, input: A::Input) {
        self.input = Some(input.clone());
        self.in_b = false;
        self.consumed = false;
        self.a.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<A::Output> {
        if !self.in_b {
            let before = chunk.len();
            match self.a.feed(chunk) {
                Ok(value) => return Ok(value),
                Err(ErrMode::Incomplete) => {
                    self.consumed |= before != 0;
                    return Err(ErrMode::Incomplete);
                }
                Err(e) => {
                    let moved = chunk.len() != before;
                    if self.consumed || moved {
                        self.consumed |= moved;
                        return Err(e.cut());
                    }
                    let input = self
                        .input
                        .take()
                        .expect("`choice` fed outside activation");
                    self.b.activate(input);
                    self.in_b = true;
                }
            }
        }
        let before = chunk.len();
        match self.b.feed(chunk) {
            Ok(value) => Ok(value),
            Err(ErrMode::Incomplete) => {
                self.consumed |= before != 0;
                Err(ErrMode::Incomplete)
            }
            Err(e) => {
                self.consumed |= chunk.len() != before;
                Err(if self.consumed { e.cut() } else { e })
            }
        }
    }
}

/// Rerun `body`, threading an accumulator through each pass
///
/// Each time `body` completes, its output becomes the accumulator for the
/// next activation. The fold itself completes when `body` rejects the next
/// item at an iteration boundary (fails having consumed zero bytes since
/// its activation), or when the stream ends between items. On a stream with
/// zero bytes the initial accumulator comes back unchanged.
///
/// A `body` that completes without consuming any bytes would rerun forever;
/// that is reported as [`ErrorKind::Loop`].
///
/// # Example
///
/// ```rust
/// use pushparse::combinator::{compose, first, fold, pure};
/// use pushparse::primitive::fixed;
/// use pushparse::{Callback, Driver, Status};
///
/// // sum little-endian u32s, however the chunks land
/// let step = pure(|acc: u32| ((), acc)).then(compose(
///     first(fixed(4, |b: &[u8]| u32::from_le_bytes(b.try_into().unwrap()))),
///     pure(|(item, acc): (u32, u32)| acc + item),
/// ));
///
/// let mut driver = Driver::new(fold(step), 0);
/// assert_eq!(driver.submit(&[1, 0, 0, 0, 2, 0]), Ok(Status::Incomplete));
/// assert_eq!(driver.submit(&[0, 0]), Ok(Status::Incomplete));
/// driver.eof()?;
/// assert_eq!(driver.finish(), Ok(3));
/// # Ok::<(), pushparse::error::ParseError>(())
/// ```
pub fn fold<B, A>(body: B) -> Fold<B, A>
where
    B: Callback<Input = A, Output = A>,
    A: Clone,
{
    Fold {
        body,
        acc: None,
        body_active: false,
        consumed: false,
    }
}

/// Implementation of [`fold`]
pub struct Fold<B, A> {
    body: B,
    acc: Option<A>,
    body_active: bool,
    /// bytes consumed since the body was last activated
    consumed: bool,
}

impl<B, A> Callback for Fold<B, A>
where
    B: Callback<Input = A, Output = A>,
    A: Clone,
{
    type Input = A;
    type Output = A;

    fn name(&self) -> &'static str {
        "fold"
    }

    fn activate(&mut self, input: A) {
        self.acc = Some(input);
        self.body_active = false;
        self.consumed = false;
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<A> {
        let at_eof = chunk.is_empty();
        loop {
            if !self.body_active {
                if at_eof {
                    return Ok(self.acc.take().expect("`fold` fed outside activation"));
                }
                if chunk.is_empty() {
                    return Err(ErrMode::Incomplete);
                }
                let seed = self
                    .acc
                    .as_ref()
                    .expect("`fold` fed outside activation")
                    .clone();
                self.body.activate(seed);
                self.body_active = true;
                self.consumed = false;
            }
            let before = chunk.len();
            match self.body.feed(chunk) {
                Ok(next) => {
                    self.consumed |= chunk.len() != before;
                    if !self.consumed {
                        return Err(ParseError::new(self.name(), ErrorKind::Loop).cut());
                    }
                    self.acc = Some(next);
                    self.body_active = false;
                }
                Err(ErrMode::Incomplete) => {
                    self.consumed |= before != 0;
                    return Err(ErrMode::Incomplete);
                }
                Err(e) => {
                    if self.consumed || chunk.len() != before {
                        return Err(e.cut());
                    }
                    // rejected at an iteration boundary: the fold is done
                    // and the rejected bytes stay on the cursor
                    self.body_active = false;
                    return Ok(self.acc.take().expect("`fold` fed outside activation"));
                }
            }
        }
    }
}

/// Fail unless `inner` consumes at least `floor` bytes
pub fn min_bytes<P: Callback>(floor: usize, inner: P) -> MinBytes<P> {
    MinBytes {
        inner,
        floor,
        taken: 0,
    }
}

/// Implementation of [`min_bytes`]
pub struct MinBytes<P> {
    inner: P,
    floor: usize,
    taken: usize,
}

impl<P: Callback> Callback for MinBytes<P> {
    type Input = P::Input;
    type Output = P::Output;

    fn name(&self) -> &'static str {
        "min-bytes"
    }

    fn activate(&mut self, input: P::Input) {
        self.taken = 0;
        self.inner.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<P::Output> {
        let before = chunk.len();
        let res = self.inner.feed(chunk);
        self.taken += before - chunk.len();
        match res {
            Ok(value) => {
                if self.taken < self.floor {
                    let e = ParseError::new(self.name(), ErrorKind::TooShort);
                    Err(if self.taken == 0 { e.backtrack() } else { e.cut() })
                } else {
                    Ok(value)
                }
            }
            Err(ErrMode::Incomplete) => Err(ErrMode::Incomplete),
            Err(e) => Err(if self.taken > 0 { e.cut() } else { e }),
        }
    }
}

/// Let `inner` see at most `ceiling` bytes
///
/// Succeeds when `inner` succeeds naturally or when the ceiling is reached,
/// whichever happens first. At the ceiling `inner` is handed the
/// end-of-stream signal, so nodes that terminate at end of input (a
/// [`fold`], a message body) finish cleanly; anything still mid-value is a
/// parse error. Withheld bytes stay on the cursor for the next node.
///
/// # Example
///
/// ```rust
/// use pushparse::combinator::max_bytes;
/// use pushparse::primitive::fixed;
/// use pushparse::Callback;
///
/// let mut capped = max_bytes(4, fixed(2, |b: &[u8]| b.to_vec()));
/// capped.activate(());
///
/// let mut chunk: &[u8] = b"abcdef";
/// assert_eq!(capped.feed(&mut chunk), Ok(b"ab".to_vec()));
/// assert_eq!(chunk, b"cdef");
/// ```
pub fn max_bytes<P: Callback>(ceiling: usize, inner: P) -> MaxBytes<P> {
    MaxBytes {
        inner,
        ceiling,
        remaining: 0,
        consumed: false,
    }
}

/// Implementation of [`max_bytes`]
pub struct MaxBytes<P> {
    inner: P,
    ceiling: usize,
    remaining: usize,
    consumed: bool,
}

impl<P: Callback> Callback for MaxBytes<P> {
    type Input = P::Input;
    type Output = P::Output;

    fn name(&self) -> &'static str {
        "max-bytes"
    }

    fn activate(&mut self, input: P::Input) {
        self.remaining = self.ceiling;
        self.consumed = false;
        self.inner.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<P::Output> {
        bounded_feed(
            &mut self.inner,
            &mut self.remaining,
            &mut self.consumed,
            "max-bytes",
            chunk,
        )
    }
}

/// [`max_bytes`] with the ceiling decided at activation
///
/// The input is `(ceiling, inner_input)`. This is how a length-delimited
/// region is bounded when the length is itself parsed from the stream, e.g.
/// a protobuf submessage:
/// `varint_size().map(|n| (n, ())).then(dynamic_max_bytes(message))`.
pub fn dynamic_max_bytes<P: Callback>(inner: P) -> DynamicMaxBytes<P> {
    DynamicMaxBytes {
        inner,
        remaining: 0,
        consumed: false,
    }
}

/// Implementation of [`dynamic_max_bytes`]
pub struct DynamicMaxBytes<P> {
    inner: P,
    remaining: usize,
    consumed: bool,
}

impl<P: Callback> Callback for DynamicMaxBytes<P> {
    type Input = (usize, P::Input);
    type Output = P::Output;

    fn name(&self) -> &'static str {
        "dynamic-max-bytes"
    }

    fn activate(&mut self, (ceiling, input): (usize, P::Input)) {
        self.remaining = ceiling;
        self.consumed = false;
        self.inner.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<P::Output> {
        bounded_feed(
            &mut self.inner,
            &mut self.remaining,
            &mut self.consumed,
            "dynamic-max-bytes",
            chunk,
        )
    }
}

/// Clamp the cursor to `remaining` bytes, feed `inner`, and settle the
/// budget; at an exhausted budget `inner` gets the end-of-stream signal.
fn bounded_feed<P: Callback>(
    inner: &mut P,
    remaining: &mut usize,
    consumed: &mut bool,
    name: &'static str,
    chunk: &mut &[u8],
) -> FeedResult<P::Output> {
    let cur = *chunk;
    let take = cur.len().min(*remaining);
    let mut sub: &[u8] = &cur[..take];
    let res = inner.feed(&mut sub);
    let used = take - sub.len();
    *chunk = &cur[used..];
    *remaining -= used;
    *consumed |= used != 0;
    match res {
        Ok(value) => Ok(value),
        Err(ErrMode::Incomplete) => {
            if *remaining == 0 {
                let mut end: &[u8] = &[];
                match inner.feed(&mut end) {
                    Ok(value) => Ok(value),
                    Err(ErrMode::Incomplete) => {
                        Err(ParseError::new(name, ErrorKind::Eof).cut())
                    }
                    Err(e) => Err(if *consumed { e.cut() } else { e }),
                }
            } else {
                Err(ErrMode::Incomplete)
            }
        }
        Err(e) => {
            let e = if *consumed { e.cut() } else { e };
            Err(e)
        }
    }
}
