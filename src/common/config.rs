use crate::common::exception::HashTableError;

/** Size of a record's payload buffer in bytes, one byte is reserved so a terminator always fits. */
pub const PAYLOAD_BUFFER_SIZE: usize = 8193;

/** Number of buckets used when a caller asks for a default table. */
pub const DEFAULT_BUCKET_COUNT: i64 = 26;

pub const MENU_ENTER: u32 = 1;
pub const MENU_LIST: u32 = 2;
pub const MENU_SEARCH: u32 = 3;
pub const MENU_DELETE: u32 = 4;
pub const MENU_QUIT: u32 = 5;

pub type BucketId = usize; // bucket index type
pub type ChainPosition = usize; // 0-based position inside a chain

/// Construction parameters of a `ChainedHashTable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConfig {
    /// Requested number of buckets. Kept signed so that non-positive input
    /// coming from the command line is rejected here rather than wrapped.
    pub bucket_count: i64,
    /// Size of each payload buffer; payloads hold at most `payload_buffer_size - 1` bytes.
    pub payload_buffer_size: usize,
    /// Upper bound on live records. `None` means unbounded.
    pub max_records: Option<usize>,
    pub debug: bool,
}

impl TableConfig {
    pub fn new(bucket_count: i64) -> Self {
        Self {
            bucket_count,
            ..Default::default()
        }
    }

    pub fn with_payload_buffer_size(mut self, size: usize) -> Self {
        self.payload_buffer_size = size;
        self
    }

    pub fn with_max_records(mut self, max_records: usize) -> Self {
        self.max_records = Some(max_records);
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Checks the configuration and returns the bucket count as an index type.
    pub fn validate(&self) -> Result<BucketId, HashTableError> {
        if self.bucket_count <= 0 {
            return Err(HashTableError::InvalidConfiguration(format!(
                "bucket count must be positive, got {}",
                self.bucket_count
            )));
        }
        if self.payload_buffer_size == 0 {
            return Err(HashTableError::InvalidConfiguration(
                "payload buffer size must be at least 1".to_string(),
            ));
        }
        usize::try_from(self.bucket_count).map_err(|_| {
            HashTableError::InvalidConfiguration(format!(
                "bucket count {} does not fit in memory",
                self.bucket_count
            ))
        })
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            bucket_count: DEFAULT_BUCKET_COUNT,
            payload_buffer_size: PAYLOAD_BUFFER_SIZE,
            max_records: None,
            debug: false,
        }
    }
}
