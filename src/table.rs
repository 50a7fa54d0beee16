//! Unique table used for hash-consing diagram nodes.
//!
//! Values live in a growable arena and are chained into buckets selected by
//! [`MyHash`]. Index 0 is a sentry, so `0` doubles as the "end of chain" marker
//! and every live index is non-zero.

use log::debug;

use crate::utils::MyHash;

#[derive(Clone)]
struct Entry<T> {
    value: T,
    next: usize,
}

pub struct Table<T> {
    data: Vec<Entry<T>>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let buckets_size = 1usize << bits;
        let data = vec![Entry {
            value: T::default(),
            next: 0,
        }];

        Self {
            data,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
        }
    }
}

impl<T> Table<T> {
    /// Get the number of stored values.
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }
    /// Get the number of buckets.
    pub fn num_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Get the reference to the value at the given index.
    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }

    /// Get the index of the next cell in the same bucket.
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }
}

impl<T> Table<T>
where
    T: MyHash,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Find the index of an existing value.
    pub fn find(&self, value: &T) -> Option<usize>
    where
        T: Eq,
    {
        let mut index = self.buckets[self.bucket_index(value)];
        while index != 0 {
            if value == self.value(index) {
                return Some(index);
            }
            index = self.next(index);
        }
        None
    }

    /// Put a value into the table and return its index.
    ///
    /// If an equal value is already stored, its index is returned instead.
    pub fn put(&mut self, value: T) -> usize
    where
        T: Eq,
    {
        if let Some(index) = self.find(&value) {
            return index;
        }

        if self.size() >= 2 * self.num_buckets() {
            self.grow();
        }

        let bucket_index = self.bucket_index(&value);
        let index = self.data.len();
        self.data.push(Entry {
            value,
            next: self.buckets[bucket_index],
        });
        self.buckets[bucket_index] = index;
        index
    }

    /// Double the number of buckets and relink every chain.
    fn grow(&mut self) {
        let size = self.num_buckets() * 2;
        debug!("table: growing to {} buckets", size);
        self.buckets = vec![0; size];
        self.bitmask = (size - 1) as u64;
        for index in 1..self.data.len() {
            let bucket_index = self.bucket_index(&self.data[index].value);
            self.data[index].next = self.buckets[bucket_index];
            self.buckets[bucket_index] = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_put() {
        let mut table = Table::new(2);
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(-5));
        assert_ne!(index1, index2);
        assert_eq!(*table.value(index1), Item(5));
        assert_eq!(*table.value(index2), Item(-5));
        // Same bucket: the newest value heads the chain.
        assert_eq!(table.next(index2), index1);
    }

    #[test]
    fn test_put_existing() {
        let mut table = Table::new(2);
        let index1 = table.put(Item(7));
        let index2 = table.put(Item(7));
        assert_eq!(index1, index2);
        assert_eq!(table.size(), 1);
    }

    #[test]
    fn test_grow_keeps_values() {
        let mut table = Table::new(1);
        let indices: Vec<usize> = (0..100).map(|i| table.put(Item(i))).collect();
        assert!(table.num_buckets() > 2);
        for (i, &index) in indices.iter().enumerate() {
            assert_eq!(table.find(&Item(i as i32)), Some(index));
        }
        assert_eq!(table.size(), 100);
    }

    #[test]
    #[should_panic(expected = "Index is 0")]
    fn test_sentry_is_not_a_value() {
        let table = Table::<Item>::new(2);
        table.value(0);
    }
}
