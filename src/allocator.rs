use std::{cell::Cell, fmt::Debug, rc::Rc};

const DEFAULT_BLOCK_SIZE: usize = 64;

struct Arena {
    block_size: usize,
    records: Cell<usize>,
}

/// Handle to the backing store of a triangulation.
///
/// Nodes, triangles and links are stored in growable buffers. The allocator
/// decides how these buffers grow: they are always extended by whole blocks of
/// `block_size` records. It also keeps count of the records currently
/// reserved by all the triangulations sharing it, which is handy when
/// comparing the footprint of different meshes.
///
/// Cloning the handle shares the same arena. Use
/// [`CoherentTriangulation::clone_in`](crate::CoherentTriangulation::clone_in)
/// to copy a triangulation into a different arena.
#[derive(Clone)]
pub struct Allocator {
    arena: Rc<Arena>,
}

impl Default for Allocator {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Allocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Allocator")
            .field("block_size", &self.arena.block_size)
            .field("records", &self.arena.records.get())
            .finish()
    }
}

impl Allocator {
    pub fn new() -> Self {
        Self::with_block_size(DEFAULT_BLOCK_SIZE)
    }

    /// Create an allocator that grows buffers by `block_size` records at a
    /// time. A block size of zero is treated as one.
    pub fn with_block_size(block_size: usize) -> Self {
        Allocator {
            arena: Rc::new(Arena {
                block_size: block_size.max(1),
                records: Cell::new(0),
            }),
        }
    }

    pub fn block_size(&self) -> usize {
        self.arena.block_size
    }

    /// Number of records currently reserved through this allocator.
    pub fn records(&self) -> usize {
        self.arena.records.get()
    }

    /// Check if both handles refer to the same arena.
    pub fn is_same(&self, other: &Allocator) -> bool {
        Rc::ptr_eq(&self.arena, &other.arena)
    }

    /// Make room for at least `additional` more records in `buf`.
    pub(crate) fn reserve<T>(&self, buf: &mut Vec<T>, additional: usize) {
        let required = buf.len() + additional;
        if required <= buf.capacity() {
            return;
        }
        let block = self.arena.block_size;
        let target = required.div_ceil(block) * block;
        let before = buf.capacity();
        buf.reserve_exact(target - buf.len());
        self.arena
            .records
            .set(self.arena.records.get() + (buf.capacity() - before));
    }

    /// Push a record, growing the buffer by a block if it is full.
    pub(crate) fn push<T>(&self, buf: &mut Vec<T>, value: T) {
        self.reserve(buf, 1);
        buf.push(value);
    }

    /// Give back the storage of a buffer that is about to be dropped.
    pub(crate) fn release<T>(&self, buf: &Vec<T>) {
        self.arena
            .records
            .set(self.arena.records.get().saturating_sub(buf.capacity()));
    }
}
