//! Callback execution tracing

#[cfg(feature = "debug")]
mod internals;

use crate::error::FeedResult;
use crate::Callback;

/// Trace the execution of a callback
///
/// With the `debug` cargo feature enabled, every activation and feed of the
/// wrapped callback is logged to stderr, tagged with `name` and colored by
/// outcome; without the feature this is a zero-cost passthrough. The name
/// also replaces the wrapped callback's own in diagnostics.
///
/// ```rust
/// use pushparse::protobuf::varint64;
/// use pushparse::trace::trace;
/// use pushparse::{Callback, Driver};
///
/// let mut driver = Driver::new(trace("frame-length", varint64()), ());
/// driver.submit(&[0x90, 0x03]).unwrap();
/// assert_eq!(driver.result(), Some(&400));
/// ```
#[cfg_attr(not(feature = "debug"), allow(unused_variables))]
pub fn trace<P: Callback>(name: &'static str, inner: P) -> Trace<P> {
    Trace {
        name,
        inner,
        #[cfg(feature = "debug")]
        call_count: 0,
    }
}

/// Implementation of [`trace`]
pub struct Trace<P> {
    name: &'static str,
    inner: P,
    #[cfg(feature = "debug")]
    call_count: usize,
}

impl<P: Callback> Callback for Trace<P> {
    type Input = P::Input;
    type Output = P::Output;

    fn name(&self) -> &'static str {
        self.name
    }

    fn activate(&mut self, input: P::Input) {
        #[cfg(feature = "debug")]
        {
            internals::activate(self.name);
            self.call_count = 0;
        }
        self.inner.activate(input);
    }

    fn feed(&mut self, chunk: &mut &[u8]) -> FeedResult<P::Output> {
        #[cfg(feature = "debug")]
        {
            let depth = internals::Depth::new();
            internals::start(*depth, self.name, self.call_count, chunk);

            let before = chunk.len();
            let res = self.inner.feed(chunk);

            let consumed = before - chunk.len();
            let severity = internals::Severity::with_result(&res);
            internals::end(*depth, self.name, self.call_count, consumed, severity);
            self.call_count += 1;

            res
        }
        #[cfg(not(feature = "debug"))]
        {
            self.inner.feed(chunk)
        }
    }
}
