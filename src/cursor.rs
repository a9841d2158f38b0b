//! Positions, cursors and byte iterators over a [`ChunkyString`].
//!
//! A [`Position`] is a copyable handle with no borrow attached. Any mutation
//! of the string invalidates every position except the one the mutating call
//! returned, and the string rejects stale ones.
//!
//! A [`Cursor`] bundles a position with a reference to the string. The same
//! type serves read-only and mutable use: `CursorRef` holds a
//! `&ChunkyString`, `CursorMut` holds a `&mut ChunkyString` and additionally
//! offers `insert` and `erase`. Because the mutable cursor owns the only
//! borrow, it always steers by the position its last edit returned.

use std::ops::Deref;

use crate::chunk::{ArenaIter, ChunkId};
use crate::chunky_string::{ChunkyString, DEFAULT_CHUNK_CAPACITY};
use crate::error::Result;

/// A chunk and an offset inside it, or `end()`.
#[derive(Debug, Clone, Copy)]
pub struct Position {
    pub(crate) chunk: Option<ChunkId>,
    pub(crate) offset: usize,
    pub(crate) owner: u64,
    pub(crate) generation: u64,
}

impl Position {
    pub fn is_end(&self) -> bool {
        self.chunk.is_none()
    }
}

/// Compares owner, chunk identity and offset; the generation stamp is ignored.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.owner == other.owner && self.chunk == other.chunk && self.offset == other.offset
    }
}

impl Eq for Position {}

#[derive(Debug)]
pub struct Cursor<S> {
    string: S,
    pos: Position,
}

pub type CursorRef<'a, const N: usize = DEFAULT_CHUNK_CAPACITY> = Cursor<&'a ChunkyString<N>>;
pub type CursorMut<'a, const N: usize = DEFAULT_CHUNK_CAPACITY> = Cursor<&'a mut ChunkyString<N>>;

impl<S, const N: usize> Cursor<S>
where
    S: Deref<Target = ChunkyString<N>>,
{
    /// Starts at `begin()`.
    pub fn new(string: S) -> Self {
        let pos = string.begin();
        Self { string, pos }
    }

    /// Starts at `pos`, which must be current for `string`.
    pub fn at(string: S, pos: Position) -> Result<Self> {
        string.resolve(pos)?;
        Ok(Self { string, pos })
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn is_end(&self) -> bool {
        self.pos.is_end()
    }

    /// The byte under the cursor, `None` at the end.
    pub fn current(&self) -> Option<u8> {
        self.string.get(self.pos).ok()
    }

    pub fn move_next(&mut self) -> Result<()> {
        self.pos = self.string.next_position(self.pos)?;
        Ok(())
    }

    pub fn move_prev(&mut self) -> Result<()> {
        self.pos = self.string.prev_position(self.pos)?;
        Ok(())
    }

    pub fn seek_begin(&mut self) {
        self.pos = self.string.begin();
    }

    pub fn seek_end(&mut self) {
        self.pos = self.string.end();
    }
}

impl<'a, const N: usize> Cursor<&'a mut ChunkyString<N>> {
    pub fn current_mut(&mut self) -> Option<&mut u8> {
        self.string.get_mut(self.pos).ok()
    }

    /// Inserts `c` before the cursor and leaves the cursor on `c`.
    pub fn insert(&mut self, c: u8) -> Result<()> {
        self.pos = self.string.insert(self.pos, c)?;
        Ok(())
    }

    /// Erases the byte under the cursor and moves onto the byte that
    /// followed it. Returns the erased byte.
    pub fn erase(&mut self) -> Result<u8> {
        let erased = self.string.get(self.pos)?;
        self.pos = self.string.erase(self.pos)?;
        Ok(erased)
    }
}

impl<'a, const N: usize> From<CursorMut<'a, N>> for CursorRef<'a, N> {
    fn from(cursor: CursorMut<'a, N>) -> Self {
        let string: &'a ChunkyString<N> = cursor.string;
        Cursor {
            string,
            pos: cursor.pos,
        }
    }
}

/// Iterator over the bytes of a [`ChunkyString`], front to back.
pub struct Iter<'a, const N: usize> {
    chunks: ArenaIter<'a, N>,
    current: &'a [u8],
    remaining: usize,
}

impl<'a, const N: usize> Iter<'a, N> {
    pub(crate) fn new(chunks: ArenaIter<'a, N>, len: usize) -> Self {
        Self {
            chunks,
            current: &[],
            remaining: len,
        }
    }
}

impl<'a, const N: usize> Iterator for Iter<'a, N> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        loop {
            if let Some((&c, rest)) = self.current.split_first() {
                self.current = rest;
                self.remaining -= 1;
                return Some(c);
            }
            let (_, chunk) = self.chunks.next()?;
            self.current = chunk.as_slice();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, const N: usize> ExactSizeIterator for Iter<'a, N> {}
