//! A mutable byte string stored as a linked list of fixed-capacity chunks.
//!
//! # Overview
//! `ChunkyString` sits between a flat `Vec<u8>` (O(n) shifts on every edit)
//! and a per-byte linked list (huge per-element overhead). Bytes live in
//! chunks of capacity `N`; an insert or erase only ever shifts bytes inside
//! one chunk, and chunks are spliced in and out of the list in O(1).
//!
//! # Type Parameters
//! - `N`: const generic chunk capacity, 12 by default. Must be positive.
//!
//! # Examples
//! ```
//! use chunky::ChunkyString;
//!
//! let mut s: ChunkyString = ChunkyString::new();
//! s.push_back(b'a');
//! s.push_back(b'b');
//! let b = s.prev_position(s.end()).unwrap();
//! let c = s.insert(b, b'c').unwrap();
//! assert_eq!(s.to_string(), "acb");
//!
//! let after = s.erase(c).unwrap();
//! assert_eq!(s.get(after), Ok(b'b'));
//! assert_eq!(s.to_string(), "ab");
//! ```
//!
//! # Implementation Details
//! The string maintains the following invariants between operations:
//! - Every chunk holds between 1 and `N` bytes
//! - The cached length equals the sum of chunk lengths
//! - Utilization (`len / (chunks * N)`) stays at or above 1/4 after erases
//! - A split leaves both halves of a full chunk at least `N/2` full
//!
//! # Positions
//! A [`Position`] names a chunk and an offset inside it. Every mutation
//! bumps a generation counter and invalidates all positions except the one
//! the call returns; using an older one is reported as
//! [`ChunkyError::StalePosition`] instead of reading a moved byte.
//!
//! # Performance
//! - push_back: O(1)
//! - insert / erase: O(1) amortized
//! - len: O(1)
//! - Collection to contiguous bytes: O(n)

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Write};
use std::ops::AddAssign;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tracing::trace;

use crate::chunk::{ChunkArena, ChunkId};
use crate::cursor::{Cursor, CursorMut, CursorRef, Iter, Position};
use crate::error::{ChunkyError, Result};

/// Chunk capacity used when none is given.
pub const DEFAULT_CHUNK_CAPACITY: usize = 12;

/// Source of owner ids, so positions from one string are rejected by another.
static NEXT_OWNER: AtomicU64 = AtomicU64::new(1);

pub struct ChunkyString<const N: usize = DEFAULT_CHUNK_CAPACITY> {
    chunks: ChunkArena<N>,
    size: usize,
    owner: u64,
    generation: u64,
}

impl<const N: usize> ChunkyString<N> {
    pub const CAPACITY: usize = N;

    /// Panics if N = 0
    pub fn new() -> Self {
        assert!(N > 0, "chunk capacity must be positive");
        Self {
            chunks: ChunkArena::new(),
            size: 0,
            owner: NEXT_OWNER.fetch_add(1, AtomicOrdering::Relaxed),
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.live()
    }

    /// Fraction of allocated byte slots in use: `len / (chunk_count * N)`.
    /// `None` for an empty string, which has no chunks.
    pub fn utilization(&self) -> Option<f64> {
        if self.size == 0 {
            return None;
        }
        Some(self.size as f64 / (self.chunks.live() * N) as f64)
    }

    pub fn begin(&self) -> Position {
        self.position(self.chunks.head(), 0)
    }

    pub fn end(&self) -> Position {
        self.position(None, 0)
    }

    pub fn iter(&self) -> Iter<'_, N> {
        Iter::new(self.chunks.iter(), self.size)
    }

    /// The stored bytes chunk by chunk, in order.
    pub fn chunks(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.chunks.iter().map(|(_, chunk)| chunk.as_slice())
    }

    pub fn cursor(&self) -> CursorRef<'_, N> {
        Cursor::new(self)
    }

    pub fn cursor_mut(&mut self) -> CursorMut<'_, N> {
        Cursor::new(self)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.size);
        for chunk in self.chunks() {
            bytes.extend_from_slice(chunk);
        }
        bytes
    }

    /// Writes the flattened bytes without building an intermediate buffer.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for chunk in self.chunks() {
            out.write_all(chunk)?;
        }
        Ok(())
    }

    pub fn get(&self, pos: Position) -> Result<u8> {
        let (id, offset) = self.resolve_char(pos)?;
        Ok(self.chunks.chunk(id).get(offset))
    }

    /// Overwriting a byte in place moves nothing, so positions stay valid.
    pub fn get_mut(&mut self, pos: Position) -> Result<&mut u8> {
        let (id, offset) = self.resolve_char(pos)?;
        Ok(self.chunks.chunk_mut(id).get_mut(offset))
    }

    pub fn next_position(&self, pos: Position) -> Result<Position> {
        let (id, offset) = self.resolve(pos)?.ok_or(ChunkyError::PastEnd)?;
        if offset + 1 < self.chunks.chunk(id).len() {
            Ok(self.position(Some(id), offset + 1))
        } else {
            Ok(self.position(self.chunks.next(id), 0))
        }
    }

    /// `prev_position(end())` is the last byte.
    pub fn prev_position(&self, pos: Position) -> Result<Position> {
        let prev = match self.resolve(pos)? {
            Some((id, offset)) if offset > 0 => return Ok(self.position(Some(id), offset - 1)),
            Some((id, _)) => self.chunks.prev(id),
            None => self.chunks.tail(),
        };
        let id = prev.ok_or(ChunkyError::BeforeBegin)?;
        Ok(self.position(Some(id), self.chunks.chunk(id).len() - 1))
    }

    pub fn push_back(&mut self, c: u8) {
        self.append_byte(c);
        self.bump_generation();
    }

    /// Inserts `c` before the byte at `pos` and returns the position of `c`.
    /// Inserting at `end()` appends.
    ///
    /// Invalidates every other position.
    pub fn insert(&mut self, pos: Position, c: u8) -> Result<Position> {
        let (id, offset) = match self.resolve(pos)? {
            Some(target) => target,
            None => {
                let (id, offset) = self.append_byte(c);
                self.bump_generation();
                return Ok(self.position(Some(id), offset));
            }
        };

        let (id, offset) = if self.chunks.chunk(id).is_full() {
            self.split(id, offset)
        } else {
            (id, offset)
        };

        self.chunks.chunk_mut(id).insert_at(offset, c);
        self.size += 1;
        self.bump_generation();
        Ok(self.position(Some(id), offset))
    }

    /// Removes the byte at `pos` and returns the position of the byte that
    /// followed it, or `end()`. Erasing `end()` is an error and changes nothing.
    ///
    /// Invalidates every other position.
    pub fn erase(&mut self, pos: Position) -> Result<Position> {
        let (id, offset) = self.resolve_char(pos)?;

        let following = if self.chunks.chunk(id).len() == 1 {
            let next = self.chunks.next(id);
            self.chunks.remove(id);
            next.map(|next| (next, 0))
        } else {
            let chunk = self.chunks.chunk_mut(id);
            chunk.remove_at(offset);
            if offset < chunk.len() {
                Some((id, offset))
            } else {
                self.chunks.next(id).map(|next| (next, 0))
            }
        };
        self.size -= 1;

        let following = if self.is_underfull() {
            self.reflow(following)
        } else {
            following
        };

        self.bump_generation();
        Ok(match following {
            Some((id, offset)) => self.position(Some(id), offset),
            None => self.end(),
        })
    }

    /// Appends a copy of every byte of `other`.
    pub fn append(&mut self, other: &Self) {
        for chunk in other.chunks() {
            for &c in chunk {
                self.append_byte(c);
            }
        }
        self.bump_generation();
    }

    pub fn extend_from_slice(&mut self, bytes: &[u8]) {
        for &c in bytes {
            self.append_byte(c);
        }
        self.bump_generation();
    }

    fn position(&self, chunk: Option<ChunkId>, offset: usize) -> Position {
        Position {
            chunk,
            offset,
            owner: self.owner,
            generation: self.generation,
        }
    }

    fn bump_generation(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Checks that `pos` was issued by this string since its last mutation
    /// and still names a live byte; `Ok(None)` means `end()`.
    pub(crate) fn resolve(&self, pos: Position) -> Result<Option<(ChunkId, usize)>> {
        if pos.owner != self.owner {
            return Err(ChunkyError::ForeignPosition);
        }
        if pos.generation != self.generation {
            return Err(ChunkyError::StalePosition {
                issued: pos.generation,
                current: self.generation,
            });
        }
        match pos.chunk {
            None if pos.offset == 0 => Ok(None),
            Some(id) if self.chunks.contains(id) && pos.offset < self.chunks.chunk(id).len() => {
                Ok(Some((id, pos.offset)))
            }
            _ => Err(ChunkyError::ForeignPosition),
        }
    }

    fn resolve_char(&self, pos: Position) -> Result<(ChunkId, usize)> {
        self.resolve(pos)?.ok_or(ChunkyError::EndPosition)
    }

    /// Appends without touching the generation; callers bump it once.
    fn append_byte(&mut self, c: u8) -> (ChunkId, usize) {
        let id = match self.chunks.tail() {
            Some(tail) if !self.chunks.chunk(tail).is_full() => tail,
            _ => self.chunks.push_back(),
        };
        let chunk = self.chunks.chunk_mut(id);
        chunk.push(c);
        self.size += 1;
        (id, chunk.len() - 1)
    }

    fn is_underfull(&self) -> bool {
        self.size * 4 < self.chunks.live() * N
    }

    /// Makes room in the full chunk `id` for an insert at `offset`. Returns
    /// where that insert must now happen; the returned chunk has a free slot.
    fn split(&mut self, id: ChunkId, offset: usize) -> (ChunkId, usize) {
        let half = N / 2;
        let can_absorb = |neighbor: Option<ChunkId>| -> Option<(ChunkId, usize)> {
            let neighbor = neighbor?;
            let len = self.chunks.chunk(neighbor).len();
            (half > 0 && len + half < N).then_some((neighbor, len))
        };
        let prev = can_absorb(self.chunks.prev(id));
        let next = can_absorb(self.chunks.next(id));

        match (prev, next) {
            (Some((prev, prev_len)), Some((_, next_len))) if prev_len <= next_len => {
                self.spill_to_prev(id, prev, offset)
            }
            (Some((prev, _)), None) => self.spill_to_prev(id, prev, offset),
            (_, Some((next, _))) => self.spill_to_next(id, next, offset),
            (None, None) => self.split_into_new(id, offset),
        }
    }

    /// Moves the first `N/2` bytes of `id` onto the end of `prev`.
    fn spill_to_prev(&mut self, id: ChunkId, prev: ChunkId, offset: usize) -> (ChunkId, usize) {
        let half = N / 2;
        let (chunk, prev_chunk) = self.chunks.pair_mut(id, prev);
        let prev_len = prev_chunk.len();
        prev_chunk.append_from(&chunk.as_slice()[..half]);
        chunk.drain_front(half);
        trace!(moved = half, prev_len, "split: spilled into previous chunk");

        if offset < half {
            (prev, prev_len + offset)
        } else {
            (id, offset - half)
        }
    }

    /// Moves the last `N/2` bytes of `id` onto the front of `next`.
    fn spill_to_next(&mut self, id: ChunkId, next: ChunkId, offset: usize) -> (ChunkId, usize) {
        let keep = N - N / 2;
        let (chunk, next_chunk) = self.chunks.pair_mut(id, next);
        let next_len = next_chunk.len();
        next_chunk.prepend_from(&chunk.as_slice()[keep..]);
        chunk.truncate(keep);
        trace!(moved = N - keep, next_len, "split: spilled into next chunk");

        if offset > keep {
            (next, offset - keep)
        } else {
            (id, offset)
        }
    }

    /// Moves the second half of `id` into a fresh chunk linked right after it.
    fn split_into_new(&mut self, id: ChunkId, offset: usize) -> (ChunkId, usize) {
        let keep = N / 2;
        let new = self.chunks.insert_after(Some(id));
        let (chunk, new_chunk) = self.chunks.pair_mut(id, new);
        new_chunk.append_from(&chunk.as_slice()[keep..]);
        chunk.truncate(keep);
        trace!(moved = N - keep, chunks = self.chunks.live(), "split: new chunk");

        if offset > keep {
            (new, offset - keep)
        } else {
            (id, offset)
        }
    }

    /// Merges every adjacent pair that fits in one chunk, front to back.
    ///
    /// After a full pass every adjacent pair holds more than `N` bytes, so
    /// utilization ends above 1/2 and the next reflow is Θ(n) erases away.
    /// `carry` is remapped if the chunk it points into is merged away.
    fn reflow(&mut self, mut carry: Option<(ChunkId, usize)>) -> Option<(ChunkId, usize)> {
        let before = self.chunks.live();
        let mut current = self.chunks.head();

        while let Some(first) = current {
            let Some(second) = self.chunks.next(first) else {
                break;
            };
            let first_len = self.chunks.chunk(first).len();
            if first_len + self.chunks.chunk(second).len() > N {
                current = Some(second);
                continue;
            }

            let (first_chunk, second_chunk) = self.chunks.pair_mut(first, second);
            first_chunk.append_from(second_chunk.as_slice());
            self.chunks.remove(second);

            if let Some((id, offset)) = carry {
                if id == second {
                    carry = Some((first, first_len + offset));
                }
            }
        }

        trace!(
            before,
            after = self.chunks.live(),
            size = self.size,
            "reflow: merged under-full chunks"
        );
        carry
    }

    #[cfg(test)]
    pub(crate) fn assert_invariants(&self) {
        let mut total = 0;
        let mut count = 0;
        for chunk in self.chunks() {
            assert!(
                !chunk.is_empty() && chunk.len() <= N,
                "chunk length {} outside 1..={}",
                chunk.len(),
                N
            );
            total += chunk.len();
            count += 1;
        }
        assert_eq!(total, self.size, "cached size out of sync");
        assert_eq!(count, self.chunks.live(), "live chunk count out of sync");
    }
}

impl<const N: usize> Default for ChunkyString<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Clone for ChunkyString<N> {
    /// Deep copy into freshly packed chunks, with a new owner id.
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        copy.append(self);
        copy
    }

    /// Copy then swap, so a failure while copying leaves `self` untouched.
    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        std::mem::swap(self, &mut copy);
    }
}

impl<const N: usize> PartialEq for ChunkyString<N> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter().eq(other.iter())
    }
}

impl<const N: usize> Eq for ChunkyString<N> {}

impl<const N: usize> PartialOrd for ChunkyString<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<const N: usize> Ord for ChunkyString<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other.iter())
    }
}

impl<const N: usize> Hash for ChunkyString<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Byte at a time so the chunk layout never reaches the hasher
        state.write_usize(self.size);
        for c in self.iter() {
            state.write_u8(c);
        }
    }
}

impl<const N: usize> AddAssign<&ChunkyString<N>> for ChunkyString<N> {
    fn add_assign(&mut self, rhs: &ChunkyString<N>) {
        self.append(rhs);
    }
}

impl<const N: usize> Extend<u8> for ChunkyString<N> {
    fn extend<I: IntoIterator<Item = u8>>(&mut self, iter: I) {
        for c in iter {
            self.append_byte(c);
        }
        self.bump_generation();
    }
}

impl<'a, const N: usize> Extend<&'a u8> for ChunkyString<N> {
    fn extend<I: IntoIterator<Item = &'a u8>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<const N: usize> FromIterator<u8> for ChunkyString<N> {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> Self {
        let mut string = Self::new();
        string.extend(iter);
        string
    }
}

impl<const N: usize> From<&[u8]> for ChunkyString<N> {
    fn from(bytes: &[u8]) -> Self {
        let mut string = Self::new();
        string.extend_from_slice(bytes);
        string
    }
}

impl<const N: usize> From<&str> for ChunkyString<N> {
    fn from(s: &str) -> Self {
        Self::from(s.as_bytes())
    }
}

impl<'a, const N: usize> IntoIterator for &'a ChunkyString<N> {
    type Item = u8;
    type IntoIter = Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lossy UTF-8 rendering of the flattened bytes.
impl<const N: usize> fmt::Display for ChunkyString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.to_bytes()))
    }
}

impl<const N: usize> fmt::Debug for ChunkyString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chunks: Vec<_> = self.chunks().map(String::from_utf8_lossy).collect();
        f.debug_struct("ChunkyString")
            .field("len", &self.size)
            .field("chunks", &chunks)
            .finish()
    }
}
