use crate::common::config::{BucketId, ChainPosition, TableConfig};
use crate::common::debug::DebugTrace;
use crate::common::exception::HashTableError;
use crate::container::hash_function::HashFunction;
use crate::container::record::{truncate_key, Payload, Record};
use crate::trace_op;
use log::warn;

/// Result of a successful call to [`ChainedHashTable::insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// Location of a key found by [`ChainedHashTable::search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub bucket: BucketId,
    pub position: ChainPosition,
}

/// A non-empty record produced while enumerating the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    pub bucket: BucketId,
    pub position: ChainPosition,
    pub payload: &'a str,
}

/**
 * ChainedHashTable stores string records in a fixed number of buckets.
 *
 * Every bucket owns a permanent head record. Colliding records are appended to
 * the head's chain, each one owned by its predecessor. Deleting the head's data
 * clears it to the empty sentinel and leaves the rest of the chain in place; a
 * later insert into that bucket reuses the head before allocating a new node.
 *
 * The table has no interior locking. Callers sharing it between threads wrap
 * the whole table in one mutex.
 */
#[derive(Debug)]
pub struct ChainedHashTable {
    buckets: Vec<Record>,
    hash_fn: HashFunction,
    payload_capacity: usize,
    max_records: Option<usize>,
    live_records: usize,
    trace: DebugTrace,
}

impl ChainedHashTable {
    /// Builds a table with `bucket_count` buckets and default settings.
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` when `bucket_count` is not positive,
    /// `AllocationFailure` when the bucket array cannot be allocated.
    pub fn build(bucket_count: i64) -> Result<Self, HashTableError> {
        Self::new(TableConfig::new(bucket_count))
    }

    pub fn new(config: TableConfig) -> Result<Self, HashTableError> {
        let trace = DebugTrace::new();
        Self::with_trace(config, trace)
    }

    /// Builds a table that reports through an existing debug switch.
    ///
    /// The switch is latched with `config.debug`; if it was latched earlier
    /// its previous state is kept.
    pub fn with_trace(config: TableConfig, trace: DebugTrace) -> Result<Self, HashTableError> {
        let bucket_count = config.validate()?;
        let hash_fn = HashFunction::new(bucket_count).ok_or_else(|| {
            HashTableError::InvalidConfiguration("bucket count must be positive".to_string())
        })?;

        let mut buckets = Vec::new();
        buckets
            .try_reserve_exact(bucket_count)
            .map_err(|_| HashTableError::AllocationFailure {
                requested: bucket_count,
            })?;
        buckets.resize_with(bucket_count, Record::anchor);

        trace.latch(config.debug);
        trace_op!(
            trace,
            "Hash size: {}; Debug: {}.",
            bucket_count,
            if trace.enabled() { "On" } else { "Off" }
        );

        Ok(Self {
            buckets,
            hash_fn,
            payload_capacity: config.payload_buffer_size - 1,
            max_records: config.max_records,
            live_records: 0,
            trace,
        })
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Maximum number of bytes a payload can hold.
    pub fn payload_capacity(&self) -> usize {
        self.payload_capacity
    }

    /// Number of records currently holding data.
    pub fn len(&self) -> usize {
        self.live_records
    }

    pub fn is_empty(&self) -> bool {
        self.live_records == 0
    }

    pub fn trace(&self) -> &DebugTrace {
        &self.trace
    }

    pub fn hash_function(&self) -> &HashFunction {
        &self.hash_fn
    }

    /// Returns the bucket a key is stored in.
    pub fn bucket_of(&self, key: &str) -> BucketId {
        trace_op!(self.trace, "Inside bucket_of()");
        self.hash_fn.bucket_index(key)
    }

    /// Inserts `key` unless it is already stored.
    ///
    /// Keys longer than the payload capacity are truncated before hashing and
    /// comparison. The whole chain is checked for duplicates; the data goes
    /// into the bucket head if it is empty, otherwise into a new node appended
    /// after the last record.
    ///
    /// # Errors
    ///
    /// `EmptyKey` for a zero-length key and `AllocationFailure` when the record
    /// limit is reached. The table is unchanged in both cases.
    pub fn insert(&mut self, key: &str) -> Result<InsertOutcome, HashTableError> {
        trace_op!(self.trace, "Inside insert()");

        let key = truncate_key(key, self.payload_capacity);
        if key.is_empty() {
            return Err(HashTableError::EmptyKey);
        }

        let index = self.bucket_of(key);
        trace_op!(self.trace, "Hash index for [{}] is bucket [{}]", key, index);

        if self.chain_iter(index).any(|record| record.payload.matches(key)) {
            trace_op!(self.trace, "Data [{}] already exists in bucket [{}]", key, index);
            return Ok(InsertOutcome::AlreadyExists);
        }

        if let Some(limit) = self.max_records {
            if self.live_records >= limit {
                warn!(
                    "Record limit {} reached, cannot insert [{}] into bucket [{}]",
                    limit, key, index
                );
                return Err(HashTableError::AllocationFailure { requested: 1 });
            }
        }

        let payload = Payload::new(key, self.payload_capacity);
        let head = &mut self.buckets[index];
        if head.is_empty() {
            trace_op!(self.trace, "Reusing head of bucket [{}]", index);
            head.payload = payload;
        } else {
            let mut link = &mut head.next;
            while let Some(node) = link {
                link = &mut node.next;
            }
            *link = Some(Box::new(Record::new(payload)));
        }

        self.live_records += 1;
        Ok(InsertOutcome::Inserted)
    }

    /// Removes `key` from the table.
    ///
    /// A match in the bucket head clears the head's payload and keeps its
    /// chain; a match further down is unlinked and freed.
    pub fn delete(&mut self, key: &str) -> DeleteOutcome {
        trace_op!(self.trace, "Inside delete()");

        let Some(hit) = self.search(key) else {
            return DeleteOutcome::NotFound;
        };
        trace_op!(self.trace, "Found [{}] in bucket [{}]", key, hit.bucket);

        let head = &mut self.buckets[hit.bucket];
        if hit.position == 0 {
            head.payload.clear();
        } else {
            let Some(prev) = record_at_mut(head, hit.position - 1) else {
                return DeleteOutcome::NotFound;
            };
            if let Some(mut removed) = prev.next.take() {
                prev.next = removed.next.take();
            }
        }

        self.live_records -= 1;
        DeleteOutcome::Deleted
    }

    /// Finds the bucket and 0-based chain position of `key`.
    ///
    /// The empty head of a bucket still counts as position 0.
    pub fn search(&self, key: &str) -> Option<SearchHit> {
        trace_op!(self.trace, "Inside search()");

        if key.is_empty() {
            return None;
        }

        let bucket = self.bucket_of(key);
        self.chain_iter(bucket)
            .enumerate()
            .find(|(_, record)| {
                trace_op!(self.trace, "Comparing [{}] with [{}]", record.payload, key);
                record.payload.matches(key)
            })
            .map(|(position, _)| SearchHit { bucket, position })
    }

    pub fn contains(&self, key: &str) -> bool {
        self.search(key).is_some()
    }

    /// Visits every non-empty record, buckets in index order and each chain
    /// from head to tail. Returns the number of records visited.
    pub fn enumerate<F>(&self, mut visit: F) -> usize
    where
        F: FnMut(&Entry<'_>),
    {
        trace_op!(self.trace, "Inside enumerate()");
        let mut count = 0;
        for entry in self.iter() {
            visit(&entry);
            count += 1;
        }
        count
    }

    pub fn iter(&self) -> Entries<'_> {
        Entries {
            table: self,
            bucket: 0,
            current: self.buckets.first(),
            position: 0,
        }
    }

    /// Records of one bucket in chain order, including an empty head.
    pub fn chain(&self, bucket: BucketId) -> Option<ChainIter<'_>> {
        self.buckets.get(bucket).map(|head| ChainIter {
            current: Some(head),
        })
    }

    /// Number of records reachable from a bucket head, the head included.
    pub fn chain_len(&self, bucket: BucketId) -> Option<usize> {
        self.chain(bucket).map(Iterator::count)
    }

    fn chain_iter(&self, bucket: BucketId) -> ChainIter<'_> {
        ChainIter {
            current: self.buckets.get(bucket),
        }
    }
}

impl Drop for ChainedHashTable {
    fn drop(&mut self) {
        let mut released = 0usize;
        for head in &mut self.buckets {
            // Unlink iteratively so a long chain does not recurse in Box's drop.
            let mut link = head.next.take();
            while let Some(mut node) = link {
                link = node.next.take();
                released += 1;
            }
        }
        trace_op!(self.trace, "Released {} chained record(s)", released);
    }
}

fn record_at_mut(head: &mut Record, position: ChainPosition) -> Option<&mut Record> {
    let mut current = head;
    for _ in 0..position {
        current = current.next.as_deref_mut()?;
    }
    Some(current)
}

/// Iterator over the records of a single chain.
pub struct ChainIter<'a> {
    current: Option<&'a Record>,
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.current?;
        self.current = record.next();
        Some(record)
    }
}

/// Iterator over all non-empty records of a table.
pub struct Entries<'a> {
    table: &'a ChainedHashTable,
    bucket: BucketId,
    current: Option<&'a Record>,
    position: ChainPosition,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.current {
                Some(record) => {
                    let position = self.position;
                    self.current = record.next();
                    self.position += 1;
                    if !record.is_empty() {
                        return Some(Entry {
                            bucket: self.bucket,
                            position,
                            payload: record.payload.as_str(),
                        });
                    }
                }
                None => {
                    self.bucket += 1;
                    self.position = 0;
                    self.current = Some(self.table.buckets.get(self.bucket)?);
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a ChainedHashTable {
    type Item = Entry<'a>;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
