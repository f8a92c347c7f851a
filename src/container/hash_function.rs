use crate::common::config::BucketId;

/// Maps string keys onto the buckets of a fixed-size table.
///
/// The hash is the sum of the Unicode scalar values of the key, accumulated in
/// 64 bits, reduced modulo the bucket count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashFunction {
    bucket_count: usize,
}

impl HashFunction {
    /// Creates a new `HashFunction` for `bucket_count` buckets.
    ///
    /// # Returns
    /// `None` when `bucket_count` is zero.
    pub fn new(bucket_count: usize) -> Option<Self> {
        (bucket_count > 0).then_some(Self { bucket_count })
    }

    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    /// Returns the raw character sum of the key.
    ///
    /// # Parameters
    /// - `key`: The key to be hashed.
    pub fn get_hash(&self, key: &str) -> u64 {
        key.chars().map(|c| u64::from(u32::from(c))).sum()
    }

    /// Returns the bucket index of the key, always in `0..bucket_count`.
    pub fn bucket_index(&self, key: &str) -> BucketId {
        (self.get_hash(key) % self.bucket_count as u64) as BucketId
    }
}

/// One-shot form of [`HashFunction::bucket_index`].
pub fn hash(bucket_count: usize, key: &str) -> Option<BucketId> {
    HashFunction::new(bucket_count).map(|f| f.bucket_index(key))
}
