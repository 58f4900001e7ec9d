mod slab;

use std::sync::atomic::{AtomicU32, Ordering};

pub use slab::Slab;

use crate::doc::node::{ArrayNode, NamedEntry, ObjectNode, UnnamedEntry, ValueNode};
use crate::error::{Error, Result};
use crate::options::{GrowthPolicy, DEFAULT_ARENA_CAPACITY};

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId {
    arena: u32,
    index: u32,
}

impl BlockId {
    pub fn index(self) -> usize {
        self.index as usize
    }
}

/// What a disposed arena released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArenaStats {
    pub objects: usize,
    pub arrays: usize,
    pub values: usize,
    pub named_entries: usize,
    pub unnamed_entries: usize,
    pub raw_blocks: usize,
    pub raw_bytes: usize,
}

impl ArenaStats {
    pub fn blocks(&self) -> usize {
        self.objects
            + self.arrays
            + self.values
            + self.named_entries
            + self.unnamed_entries
            + self.raw_blocks
    }
}

/// Bulk owner of every node of one document.
///
/// Nodes live in append-only slabs and are addressed by index; nothing is
/// released individually. Dropping or [disposing](Arena::dispose) the arena
/// releases all of it in one pass.
#[derive(Debug)]
pub struct Arena {
    id: u32,
    growth: GrowthPolicy,
    blocks: Slab<Box<[u8]>>,
    block_bytes: usize,
    pub(crate) objects: Slab<ObjectNode>,
    pub(crate) arrays: Slab<ArrayNode>,
    pub(crate) values: Slab<ValueNode>,
    pub(crate) named: Slab<NamedEntry>,
    pub(crate) unnamed: Slab<UnnamedEntry>,
}

impl Arena {
    pub fn new() -> Result<Self> {
        Self::with_growth(GrowthPolicy::default())
    }

    pub fn with_growth(growth: GrowthPolicy) -> Result<Self> {
        Ok(Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            growth,
            blocks: Slab::new(0, growth)?,
            block_bytes: 0,
            objects: Slab::new(DEFAULT_ARENA_CAPACITY, growth)?,
            arrays: Slab::new(DEFAULT_ARENA_CAPACITY, growth)?,
            values: Slab::new(DEFAULT_ARENA_CAPACITY, growth)?,
            named: Slab::new(DEFAULT_ARENA_CAPACITY, growth)?,
            unnamed: Slab::new(DEFAULT_ARENA_CAPACITY, growth)?,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn growth(&self) -> GrowthPolicy {
        self.growth
    }

    /// Allocate a zeroed raw block registered for bulk release.
    pub fn alloc(&mut self, size: usize) -> Result<BlockId> {
        if size == 0 {
            return Err(Error::illegal_argument("block size must be non-zero"));
        }
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(size)
            .map_err(|_| Error::AllocationFailure { requested: size })?;
        bytes.resize(size, 0u8);
        let index = self.blocks.push(bytes.into_boxed_slice())?;
        self.block_bytes += size;
        Ok(BlockId {
            arena: self.id,
            index: index as u32,
        })
    }

    pub fn block(&self, id: BlockId) -> Result<&[u8]> {
        self.check_block(id)?;
        self.blocks
            .get(id.index())
            .map(|block| &block[..])
            .ok_or(Error::UnknownHandle {
                what: "block",
                index: id.index(),
            })
    }

    pub fn block_mut(&mut self, id: BlockId) -> Result<&mut [u8]> {
        self.check_block(id)?;
        self.blocks
            .get_mut(id.index())
            .map(|block| &mut block[..])
            .ok_or(Error::UnknownHandle {
                what: "block",
                index: id.index(),
            })
    }

    pub fn stats(&self) -> ArenaStats {
        ArenaStats {
            objects: self.objects.len(),
            arrays: self.arrays.len(),
            values: self.values.len(),
            named_entries: self.named.len(),
            unnamed_entries: self.unnamed.len(),
            raw_blocks: self.blocks.len(),
            raw_bytes: self.block_bytes,
        }
    }

    /// Release every block this arena handed out.
    pub fn dispose(self) -> ArenaStats {
        let stats = self.stats();
        tracing::debug!(
            arena = self.id,
            blocks = stats.blocks(),
            raw_bytes = stats.raw_bytes,
            "disposing arena"
        );
        drop(self);
        stats
    }

    fn check_block(&self, id: BlockId) -> Result<()> {
        if id.arena != self.id {
            return Err(Error::ForeignHandle {
                expected: self.id,
                found: id.arena,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_alloc_registers_zeroed_blocks() {
        let mut arena = Arena::new().unwrap();
        let first = arena.alloc(16).unwrap();
        let second = arena.alloc(4).unwrap();
        arena.block_mut(second).unwrap()[0] = 7;
        assert_eq!(arena.block(first).unwrap(), &[0u8; 16]);
        assert_eq!(arena.block(second).unwrap(), &[7, 0, 0, 0]);

        let stats = arena.dispose();
        assert_eq!(stats.raw_blocks, 2);
        assert_eq!(stats.raw_bytes, 20);
        assert_eq!(stats.blocks(), 2);
    }

    #[rstest]
    fn test_zero_sized_alloc_is_illegal() {
        let mut arena = Arena::new().unwrap();
        let err = arena.alloc(0).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::IllegalArgument);
    }

    #[rstest]
    fn test_block_from_other_arena_is_rejected() {
        let mut left = Arena::new().unwrap();
        let right = Arena::new().unwrap();
        let block = left.alloc(1).unwrap();
        assert_ne!(left.id(), right.id());
        assert_eq!(
            right.block(block).unwrap_err().kind(),
            crate::ErrorKind::NullArgument
        );
    }
}
