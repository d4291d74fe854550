//! Scavenge and Commit Stores
//!
//! Key-value registries keyed by hex hash. Records are held bincode-encoded,
//! the way a keeper marshals values into a KV store; iteration is in key
//! order (BTreeMap).

use std::collections::BTreeMap;
use std::marker::PhantomData;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::scavenge::types::{Commit, Scavenge};

/// Store failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record under this key.
    #[error("record not found: {0}")]
    NotFound(String),
    /// Record could not be encoded.
    #[error("failed to encode record {key}: {reason}")]
    Encode {
        /// Record key.
        key: String,
        /// Codec message.
        reason: String,
    },
    /// Stored bytes could not be decoded.
    #[error("failed to decode record {key}: {reason}")]
    Decode {
        /// Record key.
        key: String,
        /// Codec message.
        reason: String,
    },
}

/// Registry of scavenges keyed by solution hash.
pub trait ScavengeStore {
    /// Fetch by solution hash.
    fn get(&self, solution_hash: &str) -> Result<Scavenge, StoreError>;
    /// Insert or overwrite under `scavenge.solution_hash`.
    fn set(&mut self, scavenge: Scavenge) -> Result<(), StoreError>;
    /// Whether a record exists, without decoding it.
    fn has(&self, solution_hash: &str) -> bool;
    /// All records in key order.
    fn list(&self) -> Result<Vec<Scavenge>, StoreError>;
}

/// Registry of commits keyed by commit hash.
pub trait CommitStore {
    /// Fetch by commit hash.
    fn get(&self, commit_hash: &str) -> Result<Commit, StoreError>;
    /// Insert or overwrite under `commit.commit_hash`.
    fn set(&mut self, commit: Commit) -> Result<(), StoreError>;
    /// Whether a record exists, without decoding it.
    fn has(&self, commit_hash: &str) -> bool;
    /// All records in key order.
    fn list(&self) -> Result<Vec<Commit>, StoreError>;
}

/// A value that knows its own store key.
pub trait Record: Serialize + DeserializeOwned {
    /// Primary key.
    fn key(&self) -> &str;
}

impl Record for Scavenge {
    fn key(&self) -> &str {
        &self.solution_hash
    }
}

impl Record for Commit {
    fn key(&self) -> &str {
        &self.commit_hash
    }
}

/// In-memory store of encoded records.
#[derive(Debug)]
pub struct RecordStore<T> {
    entries: BTreeMap<String, Vec<u8>>,
    _record: PhantomData<T>,
}

/// In-memory scavenge registry.
pub type MemoryScavengeStore = RecordStore<Scavenge>;

/// In-memory commit registry.
pub type MemoryCommitStore = RecordStore<Commit>;

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            _record: PhantomData,
        }
    }
}

impl<T> Clone for RecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            _record: PhantomData,
        }
    }
}

impl<T: Record> RecordStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no records are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn get_record(&self, key: &str) -> Result<T, StoreError> {
        let bytes = self
            .entries
            .get(key)
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        decode(key, bytes)
    }

    fn set_record(&mut self, record: T) -> Result<(), StoreError> {
        let key = record.key().to_string();
        let bytes = bincode::serialize(&record).map_err(|e| StoreError::Encode {
            key: key.clone(),
            reason: e.to_string(),
        })?;
        self.entries.insert(key, bytes);
        Ok(())
    }

    fn list_records(&self) -> Result<Vec<T>, StoreError> {
        self.entries
            .iter()
            .map(|(key, bytes)| decode(key, bytes))
            .collect()
    }
}

fn decode<T: Record>(key: &str, bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Decode {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

impl ScavengeStore for RecordStore<Scavenge> {
    fn get(&self, solution_hash: &str) -> Result<Scavenge, StoreError> {
        self.get_record(solution_hash)
    }

    fn set(&mut self, scavenge: Scavenge) -> Result<(), StoreError> {
        self.set_record(scavenge)
    }

    fn has(&self, solution_hash: &str) -> bool {
        self.entries.contains_key(solution_hash)
    }

    fn list(&self) -> Result<Vec<Scavenge>, StoreError> {
        self.list_records()
    }
}

impl CommitStore for RecordStore<Commit> {
    fn get(&self, commit_hash: &str) -> Result<Commit, StoreError> {
        self.get_record(commit_hash)
    }

    fn set(&mut self, commit: Commit) -> Result<(), StoreError> {
        self.set_record(commit)
    }

    fn has(&self, commit_hash: &str) -> bool {
        self.entries.contains_key(commit_hash)
    }

    fn list(&self) -> Result<Vec<Commit>, StoreError> {
        self.list_records()
    }
}

/// Write buffer over a parent store.
///
/// Reads see buffered writes first, then the parent. The parent is never
/// written; the host takes the buffered records with
/// [`into_writes`](Self::into_writes) once the operation has succeeded.
pub struct StoreCache<'a, P: ?Sized, T> {
    parent: &'a P,
    writes: BTreeMap<String, T>,
}

impl<'a, P: ?Sized, T: Record + Clone> StoreCache<'a, P, T> {
    /// Start an empty buffer over `parent`.
    pub fn new(parent: &'a P) -> Self {
        Self {
            parent,
            writes: BTreeMap::new(),
        }
    }

    /// Buffered records in key order.
    pub fn into_writes(self) -> Vec<T> {
        self.writes.into_values().collect()
    }

    fn buffer(&mut self, record: T) {
        self.writes.insert(record.key().to_string(), record);
    }

    fn merged(&self, base: Vec<T>) -> Vec<T> {
        let mut merged: BTreeMap<String, T> = base
            .into_iter()
            .map(|record| (record.key().to_string(), record))
            .collect();
        for (key, record) in &self.writes {
            merged.insert(key.clone(), record.clone());
        }
        merged.into_values().collect()
    }
}

impl<P: ScavengeStore + ?Sized> ScavengeStore for StoreCache<'_, P, Scavenge> {
    fn get(&self, solution_hash: &str) -> Result<Scavenge, StoreError> {
        match self.writes.get(solution_hash) {
            Some(scavenge) => Ok(scavenge.clone()),
            None => self.parent.get(solution_hash),
        }
    }

    fn set(&mut self, scavenge: Scavenge) -> Result<(), StoreError> {
        self.buffer(scavenge);
        Ok(())
    }

    fn has(&self, solution_hash: &str) -> bool {
        self.writes.contains_key(solution_hash) || self.parent.has(solution_hash)
    }

    fn list(&self) -> Result<Vec<Scavenge>, StoreError> {
        Ok(self.merged(self.parent.list()?))
    }
}

impl<P: CommitStore + ?Sized> CommitStore for StoreCache<'_, P, Commit> {
    fn get(&self, commit_hash: &str) -> Result<Commit, StoreError> {
        match self.writes.get(commit_hash) {
            Some(commit) => Ok(commit.clone()),
            None => self.parent.get(commit_hash),
        }
    }

    fn set(&mut self, commit: Commit) -> Result<(), StoreError> {
        self.buffer(commit);
        Ok(())
    }

    fn has(&self, commit_hash: &str) -> bool {
        self.writes.contains_key(commit_hash) || self.parent.has(commit_hash)
    }

    fn list(&self) -> Result<Vec<Commit>, StoreError> {
        Ok(self.merged(self.parent.list()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{solution_hash, Address, Coins};

    fn scavenge(solution: &str) -> Scavenge {
        Scavenge::new(
            Address::new("alice"),
            format!("find {}", solution),
            solution_hash(solution),
            Coins::single("token", 10).unwrap(),
        )
    }

    #[test]
    fn test_get_missing() {
        let store = MemoryScavengeStore::new();
        assert_eq!(
            ScavengeStore::get(&store, "nope"),
            Err(StoreError::NotFound("nope".into()))
        );
    }

    #[test]
    fn test_set_then_get() {
        let mut store = MemoryScavengeStore::new();
        let record = scavenge("4");
        ScavengeStore::set(&mut store, record.clone()).unwrap();

        assert!(ScavengeStore::has(&store, &record.solution_hash));
        assert_eq!(ScavengeStore::get(&store, &record.solution_hash).unwrap(), record);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_list_in_key_order() {
        let mut store = MemoryScavengeStore::new();
        for s in ["a", "b", "c", "d"] {
            ScavengeStore::set(&mut store, scavenge(s)).unwrap();
        }

        let keys: Vec<String> = ScavengeStore::list(&store)
            .unwrap()
            .into_iter()
            .map(|s| s.solution_hash)
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_commit_store() {
        let mut store = MemoryCommitStore::new();
        let commit = Commit::new(Address::new("bob"), "aa".into(), "bb".into());
        CommitStore::set(&mut store, commit.clone()).unwrap();

        assert_eq!(CommitStore::get(&store, "bb").unwrap(), commit);
        assert!(!CommitStore::has(&store, "aa"));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut store = MemoryCommitStore::new();
        let snapshot = store.clone();
        CommitStore::set(&mut store, Commit::new(Address::new("bob"), "aa".into(), "bb".into()))
            .unwrap();

        assert_eq!(store.len(), 1);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_cache_reads_through_and_buffers_writes() {
        let mut parent = MemoryScavengeStore::new();
        ScavengeStore::set(&mut parent, scavenge("a")).unwrap();

        let mut cache: StoreCache<_, Scavenge> = StoreCache::new(&parent);
        assert!(ScavengeStore::has(&cache, &solution_hash("a")));

        let mut solved = scavenge("a");
        solved.mark_solved(Address::new("bob"), "a".into()).unwrap();
        ScavengeStore::set(&mut cache, solved).unwrap();
        ScavengeStore::set(&mut cache, scavenge("b")).unwrap();

        assert!(ScavengeStore::get(&cache, &solution_hash("a")).unwrap().is_solved());
        assert_eq!(ScavengeStore::list(&cache).unwrap().len(), 2);

        let writes = cache.into_writes();
        assert_eq!(writes.len(), 2);
        assert!(!ScavengeStore::get(&parent, &solution_hash("a")).unwrap().is_solved());
        assert!(!ScavengeStore::has(&parent, &solution_hash("b")));
    }

    #[test]
    fn test_cache_over_commit_store() {
        let parent = MemoryCommitStore::new();
        let mut cache: StoreCache<_, Commit> = StoreCache::new(&parent);
        CommitStore::set(&mut cache, Commit::new(Address::new("bob"), "aa".into(), "bb".into()))
            .unwrap();

        assert!(CommitStore::has(&cache, "bb"));
        assert_eq!(
            CommitStore::get(&cache, "cc"),
            Err(StoreError::NotFound("cc".into()))
        );
        assert!(parent.is_empty());
    }
}
