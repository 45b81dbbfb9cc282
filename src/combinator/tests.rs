use super::*;

use crate::error::{ErrMode, ErrorKind, ParseError};
use crate::primitive::{eof, fixed, noop, skip};
use crate::Callback;

fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes(b.try_into().unwrap())
}

#[test]
fn compose_drives_both_nodes_in_one_chunk() {
    let mut jump = compose(fixed(1, |b: &[u8]| b[0] as usize), skip());
    jump.activate(());
    let mut chunk: &[u8] = &[3, 10, 20, 30, 40];
    assert_eq!(jump.feed(&mut chunk), Ok(3));
    assert_eq!(chunk, &[40]);
}

#[test]
fn compose_suspends_between_stages() {
    let mut jump = compose(fixed(2, |b: &[u8]| b.len()), skip());
    jump.activate(());
    // the chunk ends exactly when the first stage completes
    assert_eq!(jump.feed(&mut &[9, 9][..]), Err(ErrMode::Incomplete));
    let mut chunk: &[u8] = &[1, 2, 3];
    assert_eq!(jump.feed(&mut chunk), Ok(2));
    assert_eq!(chunk, &[3]);
}

#[test]
fn compose_passes_end_of_stream_through() {
    // both stages can complete on the end-of-stream signal
    let mut both_idle = compose(noop(), pure(|v: u32| v + 1));
    both_idle.activate(1);
    assert_eq!(both_idle.feed(&mut &b""[..]), Ok(2));
}

#[test]
fn compose_error_after_consumption_is_cut() {
    let mut short = compose(fixed(1, |b: &[u8]| b[0]), eof());
    short.activate(());
    let mut chunk: &[u8] = b"ab";
    assert_eq!(
        short.feed(&mut chunk),
        Err(ErrMode::Cut(ParseError::new("eof", ErrorKind::ExpectedEof)))
    );
}

#[test]
fn pure_completes_without_bytes() {
    let mut double = pure(|x: u32| x * 2);
    double.activate(21);
    assert_eq!(double.feed(&mut &b""[..]), Ok(42));
}

#[test]
fn first_runs_on_the_left_component() {
    let mut f = first(fixed(1, |b: &[u8]| b[0]));
    f.activate(((), "carried"));
    let mut chunk: &[u8] = &[7, 8];
    assert_eq!(f.feed(&mut chunk), Ok((7, "carried")));
    assert_eq!(chunk, &[8]);
}

#[test]
fn second_runs_on_the_right_component() {
    let mut s = second(fixed(1, |b: &[u8]| b[0]));
    s.activate(("carried", ()));
    let mut chunk: &[u8] = &[7, 8];
    assert_eq!(s.feed(&mut chunk), Ok(("carried", 7)));
    assert_eq!(chunk, &[8]);
}

#[test]
fn par_feeds_the_components_in_sequence() {
    let mut p = par(fixed(1, |b: &[u8]| b[0]), fixed(2, <[u8]>::to_vec));
    p.activate(((), ()));
    let mut chunk: &[u8] = &[1, 2, 3, 4];
    assert_eq!(p.feed(&mut chunk), Ok((1, vec![2, 3])));
    assert_eq!(chunk, &[4]);
}

#[test]
fn both_seeds_both_nodes_with_the_same_input() {
    // noop keeps the input; skip consumes that many bytes
    let mut b = both(noop(), skip());
    b.activate(2usize);
    let mut chunk: &[u8] = b"abcd";
    assert_eq!(b.feed(&mut chunk), Ok((2, 2)));
    assert_eq!(chunk, b"cd");
}

#[test]
fn choice_falls_back_on_clean_rejection() {
    let mut lenient = choice(eof(), skip());
    lenient.activate(3);
    let mut chunk: &[u8] = b"abcd";
    assert_eq!(lenient.feed(&mut chunk), Ok(3));
    assert_eq!(chunk, b"d");
}

#[test]
fn choice_takes_the_first_branch_when_it_succeeds() {
    let mut lenient = choice(eof(), skip());
    lenient.activate(3);
    assert_eq!(lenient.feed(&mut &b""[..]), Ok(3));
}

#[test]
fn choice_error_after_consumption_is_permanent() {
    // the first branch consumes a byte before failing; no fallback
    let mut c = choice(fixed(1, |b: &[u8]| b[0]).then(eof()), fixed(1, |b: &[u8]| b[0]));
    c.activate(());
    let mut chunk: &[u8] = b"ab";
    assert_eq!(
        c.feed(&mut chunk),
        Err(ErrMode::Cut(ParseError::new("eof", ErrorKind::ExpectedEof)))
    );
}

#[test]
fn choice_suspension_counts_as_consumption() {
    let mut c = choice(fixed(3, <[u8]>::to_vec), fixed(1, <[u8]>::to_vec));
    c.activate(());
    assert_eq!(c.feed(&mut &[1][..]), Err(ErrMode::Incomplete));
    // the first branch dies at EOF mid-value; the second must not run
    assert_eq!(
        c.feed(&mut &b""[..]),
        Err(ErrMode::Cut(ParseError::new("fixed", ErrorKind::Eof)))
    );
}

#[test]
fn choice_second_branch_failure_surfaces() {
    let mut c = choice(
        eof().map(|()| 0usize),
        fixed(2, |b: &[u8]| b.len()).then(eof()),
    );
    c.activate(());
    let mut chunk: &[u8] = b"abc";
    assert_eq!(
        c.feed(&mut chunk),
        Err(ErrMode::Cut(ParseError::new("eof", ErrorKind::ExpectedEof)))
    );
}

fn sum_step() -> impl Callback<Input = u32, Output = u32> {
    pure(|acc: u32| ((), acc)).then(compose(
        first(fixed(4, le_u32)),
        pure(|(item, acc): (u32, u32)| acc + item),
    ))
}

#[test]
fn fold_threads_the_accumulator() {
    let mut sum = fold(sum_step());
    sum.activate(0);
    assert_eq!(sum.feed(&mut &[1, 0, 0, 0, 2, 0][..]), Err(ErrMode::Incomplete));
    assert_eq!(sum.feed(&mut &[0, 0][..]), Err(ErrMode::Incomplete));
    assert_eq!(sum.feed(&mut &b""[..]), Ok(3));
}

#[test]
fn fold_on_zero_bytes_returns_the_accumulator() {
    let mut sum = fold(sum_step());
    sum.activate(41);
    assert_eq!(sum.feed(&mut &b""[..]), Ok(41));
}

#[test]
fn fold_stops_at_a_clean_boundary_rejection() {
    // the body rejects any pending byte without consuming it
    let mut stopped = fold(eof());
    stopped.activate(5u32);
    let mut chunk: &[u8] = b"rest";
    assert_eq!(stopped.feed(&mut chunk), Ok(5));
    assert_eq!(chunk, b"rest");
}

#[test]
fn fold_rejects_zero_byte_iterations() {
    let mut spin = fold(noop());
    spin.activate(0u32);
    let mut chunk: &[u8] = b"ab";
    assert_eq!(
        spin.feed(&mut chunk),
        Err(ErrMode::Cut(ParseError::new("fold", ErrorKind::Loop)))
    );
}

#[test]
fn fold_mid_item_eof_is_an_error() {
    let mut sum = fold(sum_step());
    sum.activate(0);
    assert_eq!(sum.feed(&mut &[1, 0][..]), Err(ErrMode::Incomplete));
    assert_eq!(
        sum.feed(&mut &b""[..]),
        Err(ErrMode::Cut(ParseError::new("fixed", ErrorKind::Eof)))
    );
}

#[test]
fn min_bytes_passes_a_long_enough_parse() {
    let mut floored = min_bytes(4, fixed(4, le_u32));
    floored.activate(());
    let mut chunk: &[u8] = &[1, 0, 0, 0];
    assert_eq!(floored.feed(&mut chunk), Ok(1));
}

#[test]
fn min_bytes_rejects_an_early_finish() {
    let mut floored = min_bytes(8, fixed(4, le_u32));
    floored.activate(());
    let mut chunk: &[u8] = &[1, 0, 0, 0, 9, 9, 9, 9];
    assert_eq!(
        floored.feed(&mut chunk),
        Err(ErrMode::Cut(ParseError::new("min-bytes", ErrorKind::TooShort)))
    );
}

#[test]
fn min_bytes_zero_consumption_backtracks() {
    let mut floored = min_bytes(1, pure(|x: u32| x));
    floored.activate(3);
    let mut chunk: &[u8] = b"x";
    assert_eq!(
        floored.feed(&mut chunk),
        Err(ErrMode::Backtrack(ParseError::new(
            "min-bytes",
            ErrorKind::TooShort
        )))
    );
}

#[test]
fn max_bytes_lets_an_early_success_through() {
    let mut capped = max_bytes(4, fixed(2, <[u8]>::to_vec));
    capped.activate(());
    let mut chunk: &[u8] = b"abcdef";
    assert_eq!(capped.feed(&mut chunk), Ok(b"ab".to_vec()));
    assert_eq!(chunk, b"cdef");
}

#[test]
fn max_bytes_signals_end_of_stream_at_the_ceiling() {
    let mut capped = max_bytes(3, fixed(4, <[u8]>::to_vec));
    capped.activate(());
    let mut chunk: &[u8] = b"abcdef";
    assert_eq!(
        capped.feed(&mut chunk),
        Err(ErrMode::Cut(ParseError::new("fixed", ErrorKind::Eof)))
    );
    // exactly the ceiling was consumed
    assert_eq!(chunk, b"def");
}

#[test]
fn max_bytes_ceiling_spans_chunks() {
    let mut capped = max_bytes(4, fixed(4, le_u32));
    capped.activate(());
    assert_eq!(capped.feed(&mut &[1, 0][..]), Err(ErrMode::Incomplete));
    let mut chunk: &[u8] = &[0, 0, 99];
    assert_eq!(capped.feed(&mut chunk), Ok(1));
    assert_eq!(chunk, &[99]);
}

#[test]
fn dynamic_max_bytes_takes_the_ceiling_from_its_input() {
    let mut capped = dynamic_max_bytes(fold(sum_step()));
    capped.activate((8, 0));
    let mut chunk: &[u8] = &[1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0];
    assert_eq!(capped.feed(&mut chunk), Ok(3));
    assert_eq!(chunk, &[3, 0, 0, 0]);
}
