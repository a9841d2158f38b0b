//! Fixed-capacity chunks and the arena that links them into a list.
//!
//! A [`Chunk`] is a plain `[u8; N]` buffer with an active length. The
//! [`ChunkArena`] stores chunks in index-addressed slots, threads them into a
//! doubly linked list through `prev`/`next` ids, and recycles freed slots
//! through a free list. Splicing a chunk in or out is O(1) and never moves
//! the bytes of any other chunk.

/// Identifies a live slot in a [`ChunkArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct ChunkId(usize);

/// A contiguous run of up to `N` bytes. Only `chars[..len]` is meaningful.
#[derive(Clone)]
pub(crate) struct Chunk<const N: usize> {
    len: usize,
    chars: [u8; N],
}

impl<const N: usize> Chunk<N> {
    fn new() -> Self {
        Self {
            len: 0,
            chars: [0; N],
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_full(&self) -> bool {
        self.len == N
    }

    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.chars[..self.len]
    }

    pub(crate) fn get(&self, offset: usize) -> u8 {
        self.chars[offset]
    }

    pub(crate) fn get_mut(&mut self, offset: usize) -> &mut u8 {
        &mut self.chars[offset]
    }

    pub(crate) fn push(&mut self, c: u8) {
        debug_assert!(!self.is_full());
        self.chars[self.len] = c;
        self.len += 1;
    }

    /// Shifts `chars[offset..len]` right by one and writes `c` at `offset`.
    pub(crate) fn insert_at(&mut self, offset: usize, c: u8) {
        debug_assert!(offset <= self.len && !self.is_full());
        self.chars.copy_within(offset..self.len, offset + 1);
        self.chars[offset] = c;
        self.len += 1;
    }

    /// Shifts `chars[offset + 1..len]` left by one, dropping the byte at `offset`.
    pub(crate) fn remove_at(&mut self, offset: usize) -> u8 {
        debug_assert!(offset < self.len);
        let removed = self.chars[offset];
        self.chars.copy_within(offset + 1..self.len, offset);
        self.len -= 1;
        removed
    }

    pub(crate) fn append_from(&mut self, bytes: &[u8]) {
        debug_assert!(self.len + bytes.len() <= N);
        self.chars[self.len..self.len + bytes.len()].copy_from_slice(bytes);
        self.len += bytes.len();
    }

    pub(crate) fn prepend_from(&mut self, bytes: &[u8]) {
        let count = bytes.len();
        debug_assert!(self.len + count <= N);
        self.chars.copy_within(0..self.len, count);
        self.chars[..count].copy_from_slice(bytes);
        self.len += count;
    }

    /// Removes the first `count` bytes, shifting the rest to the front.
    pub(crate) fn drain_front(&mut self, count: usize) {
        debug_assert!(count <= self.len);
        self.chars.copy_within(count..self.len, 0);
        self.len -= count;
    }

    /// Truncates to `at` bytes; the caller reads the tail first via `as_slice`.
    pub(crate) fn truncate(&mut self, at: usize) {
        debug_assert!(at <= self.len);
        self.len = at;
    }
}

struct Slot<const N: usize> {
    chunk: Chunk<N>,
    prev: Option<ChunkId>,
    next: Option<ChunkId>,
}

/// Owns every chunk of one sequence and links them in order.
pub(crate) struct ChunkArena<const N: usize> {
    slots: Vec<Option<Slot<N>>>,
    free: Vec<usize>,
    head: Option<ChunkId>,
    tail: Option<ChunkId>,
    live: usize,
}

impl<const N: usize> ChunkArena<N> {
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            live: 0,
        }
    }

    pub(crate) fn head(&self) -> Option<ChunkId> {
        self.head
    }

    pub(crate) fn tail(&self) -> Option<ChunkId> {
        self.tail
    }

    /// Number of linked chunks.
    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn contains(&self, id: ChunkId) -> bool {
        matches!(self.slots.get(id.0), Some(Some(_)))
    }

    fn slot(&self, id: ChunkId) -> &Slot<N> {
        match self.slots.get(id.0) {
            Some(Some(slot)) => slot,
            _ => panic!("bug: chunk {:?} is not live", id),
        }
    }

    fn slot_mut(&mut self, id: ChunkId) -> &mut Slot<N> {
        match self.slots.get_mut(id.0) {
            Some(Some(slot)) => slot,
            _ => panic!("bug: chunk {:?} is not live", id),
        }
    }

    pub(crate) fn chunk(&self, id: ChunkId) -> &Chunk<N> {
        &self.slot(id).chunk
    }

    pub(crate) fn chunk_mut(&mut self, id: ChunkId) -> &mut Chunk<N> {
        &mut self.slot_mut(id).chunk
    }

    pub(crate) fn prev(&self, id: ChunkId) -> Option<ChunkId> {
        self.slot(id).prev
    }

    pub(crate) fn next(&self, id: ChunkId) -> Option<ChunkId> {
        self.slot(id).next
    }

    /// Mutable access to two distinct chunks at once.
    pub(crate) fn pair_mut(&mut self, a: ChunkId, b: ChunkId) -> (&mut Chunk<N>, &mut Chunk<N>) {
        assert_ne!(a, b, "bug: pair_mut on the same chunk");
        let (low, high, swapped) = if a.0 < b.0 {
            (a.0, b.0, false)
        } else {
            (b.0, a.0, true)
        };
        let (left, right) = self.slots.split_at_mut(high);
        let low_chunk = match left[low].as_mut() {
            Some(slot) => &mut slot.chunk,
            None => panic!("bug: chunk {} is not live", low),
        };
        let high_chunk = match right[0].as_mut() {
            Some(slot) => &mut slot.chunk,
            None => panic!("bug: chunk {} is not live", high),
        };
        if swapped {
            (high_chunk, low_chunk)
        } else {
            (low_chunk, high_chunk)
        }
    }

    /// Allocates an empty chunk and links it right after `after`, or at the
    /// front of the list when `after` is `None`.
    pub(crate) fn insert_after(&mut self, after: Option<ChunkId>) -> ChunkId {
        let next = match after {
            Some(id) => self.next(id),
            None => self.head,
        };
        let slot = Slot {
            chunk: Chunk::new(),
            prev: after,
            next,
        };
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(slot);
                ChunkId(index)
            }
            None => {
                self.slots.push(Some(slot));
                ChunkId(self.slots.len() - 1)
            }
        };

        match after {
            Some(prev) => self.slot_mut(prev).next = Some(id),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.slot_mut(next).prev = Some(id),
            None => self.tail = Some(id),
        }
        self.live += 1;
        id
    }

    pub(crate) fn push_back(&mut self) -> ChunkId {
        self.insert_after(self.tail)
    }

    /// Unlinks `id` and returns its slot to the free list.
    pub(crate) fn remove(&mut self, id: ChunkId) {
        let slot = match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(slot) => slot,
            None => panic!("bug: removing dead chunk {:?}", id),
        };
        match slot.prev {
            Some(prev) => self.slot_mut(prev).next = slot.next,
            None => self.head = slot.next,
        }
        match slot.next {
            Some(next) => self.slot_mut(next).prev = slot.prev,
            None => self.tail = slot.prev,
        }
        self.free.push(id.0);
        self.live -= 1;
    }

    /// Chunks in list order.
    pub(crate) fn iter(&self) -> ArenaIter<'_, N> {
        ArenaIter {
            arena: self,
            next: self.head,
        }
    }
}

pub(crate) struct ArenaIter<'a, const N: usize> {
    arena: &'a ChunkArena<N>,
    next: Option<ChunkId>,
}

impl<'a, const N: usize> Iterator for ArenaIter<'a, N> {
    type Item = (ChunkId, &'a Chunk<N>);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let slot = self.arena.slot(id);
        self.next = slot.next;
        Some((id, &slot.chunk))
    }
}
