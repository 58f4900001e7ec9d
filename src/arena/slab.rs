use crate::error::{Error, Result};
use crate::options::GrowthPolicy;

/// Append-only storage whose capacity follows a [`GrowthPolicy`].
///
/// Items are never removed; an index handed out by [`Slab::push_reserved`]
/// stays valid until the slab is dropped.
#[derive(Debug)]
pub struct Slab<T> {
    items: Vec<T>,
    growth: GrowthPolicy,
}

impl<T> Slab<T> {
    pub fn new(capacity: usize, growth: GrowthPolicy) -> Result<Self> {
        let mut items = Vec::new();
        items
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailure {
                requested: capacity,
            })?;
        Ok(Self { items, growth })
    }

    /// Make room for `additional` pushes without reallocating in between.
    pub fn reserve(&mut self, additional: usize) -> Result<()> {
        let needed = self.items.len() + additional;
        if needed <= self.items.capacity() {
            return Ok(());
        }
        let target = self.growth.grow(self.items.capacity(), needed);
        self.items
            .try_reserve_exact(target - self.items.len())
            .map_err(|_| Error::AllocationFailure { requested: target })
    }

    /// Push into space made by [`Slab::reserve`].
    pub fn push_reserved(&mut self, item: T) -> usize {
        debug_assert!(self.items.len() < self.items.capacity());
        let index = self.items.len();
        self.items.push(item);
        index
    }

    pub fn push(&mut self, item: T) -> Result<usize> {
        self.reserve(1)?;
        Ok(self.push_reserved(item))
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.items.capacity()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}
