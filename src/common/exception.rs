use rustyline::error::ReadlineError;
use thiserror::Error;

/// Failures reported by the hash table layer. Duplicate keys and missing keys
/// are ordinary outcomes and are not represented here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HashTableError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Unable to allocate {requested} record(s)")]
    AllocationFailure { requested: usize },
    #[error("Empty data cannot be stored")]
    EmptyKey,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    HashTable(#[from] HashTableError),
    #[error("Readline error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
