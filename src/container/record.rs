use std::fmt;

/// Returns the longest prefix of `key` that fits in `max_len` bytes without
/// splitting a character.
pub fn truncate_key(key: &str, max_len: usize) -> &str {
    if key.len() <= max_len {
        return key;
    }
    let mut end = max_len;
    while !key.is_char_boundary(end) {
        end -= 1;
    }
    &key[..end]
}

/// Bounded string stored in a record. The zero-length payload is the empty
/// sentinel that marks a head record carrying no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Payload {
    data: String,
}

impl Payload {
    /// Creates a payload holding at most `max_len` bytes of `key`.
    pub fn new(key: &str, max_len: usize) -> Self {
        Self {
            data: truncate_key(key, max_len).to_string(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Resets the payload to the empty sentinel.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Overwrites the payload in place.
    pub fn set(&mut self, key: &str, max_len: usize) {
        self.data.clear();
        self.data.push_str(truncate_key(key, max_len));
    }

    pub fn matches(&self, key: &str) -> bool {
        self.data == key
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.data)
    }
}

/// One node of a bucket chain. A record exclusively owns the rest of its chain.
#[derive(Debug, Default)]
pub struct Record {
    pub(crate) payload: Payload,
    pub(crate) next: Option<Box<Record>>,
}

impl Record {
    /// Creates a head record with the empty sentinel and no successor.
    pub fn anchor() -> Self {
        Self::default()
    }

    pub fn new(payload: Payload) -> Self {
        Self {
            payload,
            next: None,
        }
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn next(&self) -> Option<&Record> {
        self.next.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
