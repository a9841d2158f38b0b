//! E2E tests for the container's public contract
//!
//! Walks through the documented scenarios using only the public API: edits
//! steered by returned positions, deep copies, comparison and the space
//! guarantees after long runs of edits.

use crate::common::harness::{chunk_lens, nth};
use chunky::{ChunkyError, ChunkyString, DEFAULT_CHUNK_CAPACITY};

/// push_back, insert before 'b', then erase the inserted byte
#[test]
fn test_push_insert_erase_walkthrough() {
    let mut s: ChunkyString = ChunkyString::new();
    s.push_back(b'a');
    s.push_back(b'b');
    assert_eq!(s.iter().collect::<Vec<_>>(), b"ab");
    assert_eq!(s.len(), 2);

    let c = s.insert(nth(&s, 1), b'c').unwrap();
    assert_eq!(s.to_string(), "acb");
    assert_eq!(s.get(c), Ok(b'c'));

    let b = s.erase(c).unwrap();
    assert_eq!(s.to_string(), "ab");
    assert_eq!(s.get(b), Ok(b'b'));
}

/// Erasing every other byte of 3*C bytes never drops utilization below 1/4
#[test]
fn test_every_other_erase_default_capacity() {
    const C: usize = DEFAULT_CHUNK_CAPACITY;
    let text: Vec<u8> = (0..3 * C).map(|i| b"etaoinshrdlu"[i % 12]).collect();
    let mut s: ChunkyString = text.iter().copied().collect();
    let expected: Vec<u8> = text.iter().copied().skip(1).step_by(2).collect();

    let mut pos = s.begin();
    while pos != s.end() {
        pos = s.erase(pos).unwrap();
        assert!(s.utilization().unwrap() >= 0.25);
        if pos != s.end() {
            pos = s.next_position(pos).unwrap();
        }
    }

    assert_eq!(s.to_bytes(), expected);
    assert_eq!(s.len(), s.iter().count());
}

/// Copies never share storage, in either direction
#[test]
fn test_copy_and_original_are_independent() {
    let mut original: ChunkyString<5> = ChunkyString::from("independent");
    let mut copy = original.clone();

    *copy.get_mut(nth(&copy, 3)).unwrap() = b'E';
    assert_eq!(original.to_string(), "independent");

    *original.get_mut(nth(&original, 0)).unwrap() = b'I';
    assert_eq!(copy.to_string(), "indEpendent");
    assert_eq!(original.to_string(), "Independent");
}

/// `+=` appends a copy and leaves the right-hand side alone
#[test]
fn test_append_operator() {
    let mut greeting: ChunkyString = ChunkyString::from("hello, ");
    let name: ChunkyString = ChunkyString::from("world");
    greeting += &name;
    assert_eq!(greeting.to_string(), "hello, world");
    assert_eq!(name.to_string(), "world");

    let snapshot = greeting.clone();
    greeting += &snapshot;
    assert_eq!(greeting.to_string(), "hello, worldhello, world");
}

/// Positions taken before a mutation are refused afterwards
#[test]
fn test_positions_invalidated_by_mutation() {
    let mut s: ChunkyString<4> = ChunkyString::from("abcdefgh");
    let early = nth(&s, 5);
    let returned = s.insert(nth(&s, 2), b'X').unwrap();

    assert!(matches!(
        s.erase(early),
        Err(ChunkyError::StalePosition { .. })
    ));
    assert_eq!(s.to_string(), "abXcdefgh");

    // The returned position is still good
    assert_eq!(s.get(returned), Ok(b'X'));
}

/// Inserting at the front over and over keeps interior chunks half full
#[test]
fn test_front_inserts_stay_dense() {
    let mut s: ChunkyString<8> = ChunkyString::new();
    for i in 0..200u8 {
        let _ = s.insert(s.begin(), i).unwrap();
    }
    let lens = chunk_lens(&s);
    for len in &lens[1..lens.len() - 1] {
        assert!(*len >= 4, "chunk lengths {:?}", lens);
    }
    let expected: Vec<u8> = (0..200u8).rev().collect();
    assert_eq!(s.to_bytes(), expected);
}

/// Erasing back to front through a cursor leaves an empty string
#[test]
fn test_cursor_drains_from_back() {
    let mut s: ChunkyString<3> = ChunkyString::from("drain me");
    let mut cursor = s.cursor_mut();
    cursor.seek_end();
    let mut erased = Vec::new();
    while cursor.move_prev().is_ok() {
        erased.push(cursor.erase().unwrap());
        cursor.seek_end();
    }
    erased.reverse();
    assert_eq!(erased, b"drain me");
    assert!(s.is_empty());
}
