use chainhash::common::config::{TableConfig, PAYLOAD_BUFFER_SIZE};
use chainhash::common::exception::HashTableError;
use chainhash::container::chained_hash_table::{
    ChainedHashTable, DeleteOutcome, InsertOutcome, SearchHit,
};
use chainhash::container::hash_function::hash;

use crate::common::logger::init_test_logger;
use crate::common::tables::{chain_payloads, colliding_keys, new_table};
use crate::{assert_err, assert_ok};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apple_banana_scenario() {
        let mut table = new_table(5);

        assert_eq!(assert_ok!(table.insert("apple")), InsertOutcome::Inserted);
        assert_eq!(assert_ok!(table.insert("banana")), InsertOutcome::Inserted);
        assert_eq!(assert_ok!(table.insert("apple")), InsertOutcome::AlreadyExists);
        assert_eq!(table.enumerate(|_| {}), 2);

        assert!(table.search("banana").is_some());
        assert_eq!(table.delete("apple"), DeleteOutcome::Deleted);
        assert!(table.search("apple").is_none());
        assert_eq!(table.enumerate(|_| {}), 1);
    }

    #[test]
    fn test_collisions_remain_retrievable() {
        let mut table = new_table(7);
        let (bucket, keys) = colliding_keys(&table, 4);

        for key in &keys {
            assert_eq!(assert_ok!(table.insert(key)), InsertOutcome::Inserted);
        }
        for (position, key) in keys.iter().enumerate() {
            assert_eq!(table.search(key), Some(SearchHit { bucket, position }));
        }
        assert_eq!(table.chain_len(bucket), Some(4));
    }

    #[test]
    fn test_rejected_duplicate_grows_by_one() {
        let mut table = new_table(3);
        let before = table.len();
        assert_eq!(assert_ok!(table.insert("dup")), InsertOutcome::Inserted);
        assert_eq!(assert_ok!(table.insert("dup")), InsertOutcome::AlreadyExists);
        assert_eq!(table.len(), before + 1);
        assert_eq!(table.iter().count(), 1);
    }

    #[test]
    fn test_round_trip_matches_hash() {
        let mut table = new_table(11);
        for key in ["alpha", "beta", "gamma", "delta"] {
            assert_ok!(table.insert(key));
            let hit = table.search(key).expect("inserted key must be found");
            assert_eq!(Some(hit.bucket), hash(11, key));
        }
        for key in ["alpha", "beta", "gamma", "delta"] {
            assert_eq!(table.delete(key), DeleteOutcome::Deleted);
            assert!(table.search(key).is_none());
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_head_anchor_persists_and_is_reused() {
        let mut table = new_table(4);
        let bucket = table.bucket_of("solo");

        assert_ok!(table.insert("solo"));
        assert_eq!(table.delete("solo"), DeleteOutcome::Deleted);
        assert_eq!(table.chain_len(bucket), Some(1));
        assert_eq!(table.iter().filter(|e| e.bucket == bucket).count(), 0);

        // Repeated insert/delete cycles never grow the chain.
        for _ in 0..50 {
            assert_ok!(table.insert("solo"));
            assert_eq!(table.chain_len(bucket), Some(1));
            table.delete("solo");
        }
        assert_eq!(chain_payloads(&table, bucket), vec![""]);
    }

    #[test]
    fn test_chain_integrity_under_deletion() {
        let mut table = new_table(1);
        for key in ["A", "B", "C"] {
            assert_ok!(table.insert(key));
        }

        assert_eq!(table.delete("B"), DeleteOutcome::Deleted);
        assert_eq!(chain_payloads(&table, 0), vec!["A", "C"]);

        assert_eq!(table.delete("A"), DeleteOutcome::Deleted);
        assert_eq!(chain_payloads(&table, 0), vec!["", "C"]);
        assert_eq!(table.search("C"), Some(SearchHit { bucket: 0, position: 1 }));

        assert_eq!(table.delete("C"), DeleteOutcome::Deleted);
        assert_eq!(chain_payloads(&table, 0), vec![""]);
        assert!(table.is_empty());
    }

    #[test]
    fn test_head_delete_keeps_all_followers_searchable() {
        let mut table = new_table(1);
        for key in ["A", "B", "C"] {
            assert_ok!(table.insert(key));
        }
        table.delete("A");
        assert!(table.contains("B"));
        assert!(table.contains("C"));
        assert_eq!(assert_ok!(table.insert("C")), InsertOutcome::AlreadyExists);
        assert_eq!(assert_ok!(table.insert("E")), InsertOutcome::Inserted);
        assert_eq!(chain_payloads(&table, 0), vec!["E", "B", "C"]);
    }

    #[test]
    fn test_no_empty_links_after_mixed_operations() {
        let mut table = new_table(3);
        let keys: Vec<String> = (0..60).map(|i| format!("item{}", i)).collect();
        for key in &keys {
            assert_ok!(table.insert(key));
        }
        for key in keys.iter().step_by(2) {
            assert_eq!(table.delete(key), DeleteOutcome::Deleted);
        }
        for bucket in 0..table.bucket_count() {
            let chain = chain_payloads(&table, bucket);
            assert!(chain.iter().skip(1).all(|p| !p.is_empty()));
        }
        assert_eq!(table.len(), 30);
        assert_eq!(table.iter().count(), 30);
    }

    #[test]
    fn test_default_truncation_capacity() {
        init_test_logger();
        let mut table = assert_ok!(ChainedHashTable::build(5));
        assert_eq!(table.payload_capacity(), PAYLOAD_BUFFER_SIZE - 1);

        let long = "x".repeat(PAYLOAD_BUFFER_SIZE + 10);
        assert_ok!(table.insert(&long));
        let stored = &long[..PAYLOAD_BUFFER_SIZE - 1];
        assert!(table.contains(stored));
        assert!(!table.contains(&long));
        assert_eq!(table.iter().next().map(|e| e.payload.len()), Some(PAYLOAD_BUFFER_SIZE - 1));
    }

    #[test]
    fn test_truncated_keys_compare_after_truncation() {
        init_test_logger();
        let config = TableConfig::new(4).with_payload_buffer_size(6);
        let mut table = assert_ok!(ChainedHashTable::new(config));
        assert_eq!(assert_ok!(table.insert("prefix-one")), InsertOutcome::Inserted);
        assert_eq!(assert_ok!(table.insert("prefix-two")), InsertOutcome::AlreadyExists);
        assert_eq!(table.delete("prefi"), DeleteOutcome::Deleted);
    }

    #[test]
    fn test_invalid_configuration() {
        init_test_logger();
        assert_err!(ChainedHashTable::build(0));
        assert_err!(ChainedHashTable::build(-1));
        assert!(matches!(
            ChainedHashTable::new(TableConfig::new(3).with_payload_buffer_size(0)),
            Err(HashTableError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_allocation_failure_leaves_table_unchanged() {
        init_test_logger();
        let mut table = assert_ok!(ChainedHashTable::new(TableConfig::new(1).with_max_records(2)));
        assert_ok!(table.insert("a"));
        assert_ok!(table.insert("b"));
        let before = chain_payloads(&table, 0);

        assert_eq!(table.insert("c"), Err(HashTableError::AllocationFailure { requested: 1 }));
        assert_eq!(chain_payloads(&table, 0), before);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_enumerate_is_restartable() {
        let mut table = new_table(6);
        for key in ["one", "two", "three", "four"] {
            assert_ok!(table.insert(key));
        }
        let first: Vec<_> = table.iter().map(|e| (e.bucket, e.payload.to_string())).collect();
        let second: Vec<_> = (&table).into_iter().map(|e| (e.bucket, e.payload.to_string())).collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }
}
