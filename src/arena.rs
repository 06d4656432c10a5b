//! Chunked slot allocator with generational handles.

use std::mem;
use std::ops::{Index, IndexMut};
use std::vec::Vec;

/// A handle to an object stored in a `TypedArena<T>`.
///
/// Every slot carries a generation that is bumped when the slot is freed, so a handle to a freed
/// object never resolves to whatever object later reuses the slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Entry {
    chunk_index: usize,
    block_index: usize,
    generation: u32,
}

enum Block<T> {
    Occupied(u32, T),
    Vacant(Option<Entry>),
}

/// A fast, but limited allocator that only allocates a single type of object.
///
/// Objects are stored in fixed-size chunks so that growing the arena never moves existing
/// objects. Freed slots are kept on an intrusive free list and are reused before a new chunk is
/// allocated.
///
/// # Examples
///
/// ```
/// use avl_collections::arena::TypedArena;
///
/// let mut arena = TypedArena::new(1024);
///
/// let x = arena.allocate(1);
/// assert_eq!(arena[x], 1);
///
/// arena[x] += 1;
/// assert_eq!(arena[x], 2);
///
/// assert_eq!(arena.free(&x), 2);
/// assert_eq!(arena.get(&x), None);
/// ```
pub struct TypedArena<T> {
    head: Option<Entry>,
    chunks: Vec<Vec<Block<T>>>,
    chunk_size: usize,
    size: usize,
    capacity: usize,
}

impl<T> TypedArena<T> {
    fn block(&self, entry: &Entry) -> Option<&Block<T>> {
        self.chunks
            .get(entry.chunk_index)
            .and_then(|chunk| chunk.get(entry.block_index))
    }

    /// Constructs a new, empty `TypedArena<T>` with a specific number of objects per chunk. A
    /// `chunk_size` of zero is treated as one.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_collections::arena::TypedArena;
    ///
    /// let arena: TypedArena<u32> = TypedArena::new(1024);
    /// assert!(arena.is_empty());
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        TypedArena {
            head: None,
            chunks: Vec::new(),
            chunk_size: chunk_size.max(1),
            size: 0,
            capacity: 0,
        }
    }

    /// Allocates an object in the typed arena and returns an `Entry` that can later be used to
    /// retrieve or deallocate the object.
    pub fn allocate(&mut self, value: T) -> Entry {
        self.size += 1;

        match self.head.take() {
            None => {
                if self.chunks.last().map_or(true, |chunk| chunk.len() == self.chunk_size) {
                    self.chunks.push(Vec::with_capacity(self.chunk_size));
                    self.capacity += self.chunk_size;
                }
                let chunk_count = self.chunks.len();
                let last_chunk = &mut self.chunks[chunk_count - 1];
                last_chunk.push(Block::Occupied(0, value));
                Entry {
                    chunk_index: chunk_count - 1,
                    block_index: last_chunk.len() - 1,
                    generation: 0,
                }
            },
            Some(entry) => {
                let slot = &mut self.chunks[entry.chunk_index][entry.block_index];
                let vacant_block = mem::replace(slot, Block::Occupied(entry.generation, value));
                match vacant_block {
                    Block::Vacant(next_entry) => {
                        self.head = next_entry;
                        entry
                    },
                    Block::Occupied(..) => panic!("Expected a vacant block."),
                }
            },
        }
    }

    /// Deallocates an object in the typed arena and returns the object.
    ///
    /// # Panics
    ///
    /// Panics if entry corresponds to an invalid, stale or vacant value.
    pub fn free(&mut self, entry: &Entry) -> T {
        if !self.contains(entry) {
            panic!("Error: attempting to free invalid block.");
        }
        let next_generation = entry.generation.wrapping_add(1);
        let old_block = mem::replace(
            &mut self.chunks[entry.chunk_index][entry.block_index],
            Block::Vacant(self.head.take()),
        );
        match old_block {
            Block::Vacant(_) => unreachable!(),
            Block::Occupied(_, value) => {
                self.size -= 1;
                self.head = Some(Entry {
                    chunk_index: entry.chunk_index,
                    block_index: entry.block_index,
                    generation: next_generation,
                });
                value
            },
        }
    }

    /// Returns `true` if the entry refers to a live object of this arena.
    pub fn contains(&self, entry: &Entry) -> bool {
        match self.block(entry) {
            Some(Block::Occupied(generation, _)) => *generation == entry.generation,
            _ => false,
        }
    }

    /// Returns an immutable reference to an object in the typed arena. Returns `None` if the entry
    /// does not correspond to a live object.
    pub fn get(&self, entry: &Entry) -> Option<&T> {
        match self.block(entry) {
            Some(Block::Occupied(generation, value)) if *generation == entry.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns a mutable reference to an object in the typed arena. Returns `None` if the entry
    /// does not correspond to a live object.
    pub fn get_mut(&mut self, entry: &Entry) -> Option<&mut T> {
        let block = self
            .chunks
            .get_mut(entry.chunk_index)
            .and_then(|chunk| chunk.get_mut(entry.block_index));
        match block {
            Some(Block::Occupied(generation, value)) if *generation == entry.generation => {
                Some(value)
            },
            _ => None,
        }
    }

    /// Returns the number of live objects in the arena.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns `true` if the arena holds no live objects.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Returns the number of slots reserved across all chunks.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drops every object and releases all chunks. Entries handed out before the call must not be
    /// used afterwards.
    pub fn clear(&mut self) {
        self.head = None;
        self.chunks.clear();
        self.size = 0;
        self.capacity = 0;
    }
}

impl<T> Index<Entry> for TypedArena<T> {
    type Output = T;

    fn index(&self, entry: Entry) -> &Self::Output {
        self.get(&entry).expect("Error: entry out of bounds.")
    }
}

impl<T> IndexMut<Entry> for TypedArena<T> {
    fn index_mut(&mut self, entry: Entry) -> &mut Self::Output {
        self.get_mut(&entry).expect("Error: entry out of bounds.")
    }
}
