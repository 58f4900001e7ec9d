use crate::doc::ValueId;
use crate::error::{Error, Result};
use crate::options::GrowthPolicy;

/// Reusable batch of value handles produced by one scan step.
#[derive(Debug)]
pub struct Cursor {
    values: Vec<ValueId>,
    growth: GrowthPolicy,
}

impl Cursor {
    pub fn new(capacity: usize, growth: GrowthPolicy) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::illegal_argument("cursor capacity must be non-zero"));
        }
        let mut values = Vec::new();
        values
            .try_reserve_exact(capacity)
            .map_err(|_| Error::AllocationFailure {
                requested: capacity,
            })?;
        Ok(Self { values, growth })
    }

    pub fn append(&mut self, values: &[ValueId]) -> Result<()> {
        let needed = self.values.len() + values.len();
        if needed > self.values.capacity() {
            let target = self.growth.grow(self.values.capacity(), needed);
            self.values
                .try_reserve_exact(target - self.values.len())
                .map_err(|_| Error::AllocationFailure { requested: target })?;
        }
        self.values.extend_from_slice(values);
        Ok(())
    }

    /// Forget the current batch but keep the storage.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    pub fn read(&self) -> &[ValueId] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.values.capacity()
    }

    pub fn dispose(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{Document, ValueType};
    use rstest::rstest;

    fn handles(n: i64) -> Vec<ValueId> {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let array = doc.add_array(root, "xs", ValueType::Integer).unwrap();
        (0..n).map(|i| doc.array_add_value(array, i).unwrap()).collect()
    }

    #[rstest]
    fn test_clear_never_leaks_prior_entries() {
        let ids = handles(5);
        let mut cursor = Cursor::new(2, GrowthPolicy::default()).unwrap();
        cursor.append(&ids[..3]).unwrap();
        let capacity = cursor.capacity();
        cursor.clear();
        assert_eq!(cursor.capacity(), capacity);
        cursor.append(&ids[3..]).unwrap();
        assert_eq!(cursor.read(), &ids[3..]);
    }

    #[rstest]
    fn test_append_grows() {
        let ids = handles(20);
        let mut cursor = Cursor::new(1, GrowthPolicy::default()).unwrap();
        for id in &ids {
            cursor.append(std::slice::from_ref(id)).unwrap();
        }
        assert_eq!(cursor.len(), 20);
        assert_eq!(cursor.read(), ids.as_slice());
    }

    #[rstest]
    fn test_zero_capacity_is_illegal() {
        let err = Cursor::new(0, GrowthPolicy::default()).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::IllegalArgument);
    }
}
