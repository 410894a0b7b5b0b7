// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Two-tier cache of completed search responses.
//!
//! ```text
//! get ──► memory tier (FIFO, bounded) ──miss──► CacheStore ──miss──► None
//! put ──► CacheStore + memory tier   (only if fast enough and not present)
//! ```
//!
//! Entries are keyed by the SHA-256 of `normalized phrase | engine | strict`,
//! so the same phrase searched in different modes never shares a payload. The
//! payload is the JSON-serialized response plus a CRC32 checked on every read.
//! A read bumps `hit_count` and `last_accessed` and writes that metadata back
//! in one locked step, so concurrent hits in a process are never lost;
//! the payload itself is never rewritten.
//!
//! Every cache failure is logged and treated as a miss.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::SearchConfig;
use crate::error::StoreError;
use crate::types::{Engine, SearchResponse};
use crate::utils::prepare_phrase;

/// External key/value store behind the cache.
pub trait CacheStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// One cached response with its bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub phrase_hash: String,
    pub phrase: String,
    pub serialized_response: Vec<u8>,
    /// CRC32 of `serialized_response`.
    pub checksum: u32,
    /// Unix seconds.
    pub created_at: u64,
    pub expires_at: u64,
    pub last_accessed: u64,
    pub hit_count: u64,
    pub search_time_seconds: f64,
}

impl CacheEntry {
    fn is_expired(&self, now: u64) -> bool {
        now >= self.expires_at
    }

    fn verify(&self) -> Result<(), StoreError> {
        let actual = crc32fast::hash(&self.serialized_response);
        if actual != self.checksum {
            return Err(StoreError::Corrupt(format!(
                "checksum mismatch for {}: stored {:08x}, computed {:08x}",
                self.phrase_hash, self.checksum, actual
            )));
        }
        Ok(())
    }

    fn ttl_left(&self, now: u64) -> Duration {
        Duration::from_secs(self.expires_at.saturating_sub(now))
    }
}

/// Cache key for a phrase searched with the given engine and boundary mode.
pub fn cache_key(phrase: &str, engine: Engine, strict: bool) -> String {
    let material = format!("{}|{}|{}", prepare_phrase(phrase), engine.as_str(), strict);
    hex::encode(Sha256::digest(material.as_bytes()))
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process [`CacheStore`] with per-key TTL.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, (Vec<u8>, u64)>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((_, expires)) if *expires <= unix_now() => {
                entries.remove(key);
                Ok(None)
            }
            Some((bytes, _)) => Ok(Some(bytes.clone())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), StoreError> {
        let expires = unix_now().saturating_add(ttl.as_secs());
        self.entries
            .lock()
            .insert(key.to_string(), (value.to_vec(), expires));
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

// =============================================================================
// SEARCH CACHE
// =============================================================================

struct MemoryTier {
    capacity: usize,
    order: VecDeque<String>,
    entries: HashMap<String, CacheEntry>,
}

impl MemoryTier {
    fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            order: VecDeque::new(),
            entries: HashMap::new(),
        }
    }

    /// Insert or replace. A replaced key keeps its place in the FIFO order.
    fn insert(&mut self, key: String, entry: CacheEntry) {
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = entry;
            return;
        }
        while self.order.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
        self.order.push_back(key.clone());
        self.entries.insert(key, entry);
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }

    fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }
}

/// Response cache shared by search invocations.
pub struct SearchCache {
    store: Arc<dyn CacheStore>,
    memory: Mutex<MemoryTier>,
    /// Serializes hit-count read-modify-write cycles.
    hits: Mutex<()>,
    ttl: Duration,
    write_threshold_secs: f64,
}

impl SearchCache {
    pub fn new(store: Arc<dyn CacheStore>, config: &SearchConfig) -> Self {
        Self {
            store,
            memory: Mutex::new(MemoryTier::new(config.memory_cache_capacity)),
            hits: Mutex::new(()),
            ttl: config.cache_ttl(),
            write_threshold_secs: config.cache_write_threshold_secs,
        }
    }

    /// A cache over a fresh [`MemoryCacheStore`].
    pub fn in_memory(config: &SearchConfig) -> Self {
        Self::new(Arc::new(MemoryCacheStore::new()), config)
    }

    pub fn memory_len(&self) -> usize {
        self.memory.lock().entries.len()
    }

    /// Look up a response, counting a hit. The returned response has `cached` set.
    pub fn get(&self, phrase: &str, engine: Engine, strict: bool) -> Option<SearchResponse> {
        let key = cache_key(phrase, engine, strict);
        let now = unix_now();
        let entry = {
            let _guard = self.hits.lock();
            let mut entry = self.load(&key, now)?;
            entry.hit_count += 1;
            entry.last_accessed = now;
            self.write_metadata(&key, &entry, now);
            entry
        };

        let mut response: SearchResponse = match serde_json::from_slice(&entry.serialized_response) {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache_payload_unreadable");
                self.evict(&key);
                return None;
            }
        };
        response.cached = true;
        tracing::info!(phrase = %entry.phrase, hits = entry.hit_count, "cache_hit");
        Some(response)
    }

    /// Store a response. Skipped when the search was too slow or the key is
    /// already cached. Returns whether an entry was written.
    pub fn put(
        &self,
        phrase: &str,
        engine: Engine,
        strict: bool,
        response: &SearchResponse,
        search_time_seconds: f64,
    ) -> bool {
        if search_time_seconds >= self.write_threshold_secs {
            tracing::debug!(search_time_seconds, threshold = self.write_threshold_secs, "cache_write_skipped_slow");
            return false;
        }
        let key = cache_key(phrase, engine, strict);
        let now = unix_now();
        if self.load(&key, now).is_some() {
            return false;
        }

        let payload = match serde_json::to_vec(response) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache_serialize_failed");
                return false;
            }
        };
        let entry = CacheEntry {
            phrase_hash: key.clone(),
            phrase: prepare_phrase(phrase),
            checksum: crc32fast::hash(&payload),
            serialized_response: payload,
            created_at: now,
            expires_at: now.saturating_add(self.ttl.as_secs()),
            last_accessed: now,
            hit_count: 0,
            search_time_seconds,
        };

        match serde_json::to_vec(&entry) {
            Ok(bytes) => {
                if let Err(e) = self.store.set(&key, &bytes, self.ttl) {
                    tracing::warn!(key = %key, error = %e, "cache_write_failed");
                }
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "cache_serialize_failed"),
        }
        self.memory.lock().insert(key, entry);
        true
    }

    /// Inspect an entry without counting a hit.
    pub fn entry(&self, phrase: &str, engine: Engine, strict: bool) -> Option<CacheEntry> {
        self.load(&cache_key(phrase, engine, strict), unix_now())
    }

    /// Remove an entry from both tiers.
    pub fn purge(&self, phrase: &str, engine: Engine, strict: bool) {
        self.evict(&cache_key(phrase, engine, strict));
    }

    /// Drop the in-process tier; the store is untouched.
    pub fn clear_memory(&self) {
        self.memory.lock().clear();
    }

    fn load(&self, key: &str, now: u64) -> Option<CacheEntry> {
        let in_memory = self.memory.lock().entries.get(key).cloned();
        if let Some(entry) = in_memory {
            if entry.is_expired(now) {
                self.evict(key);
                return None;
            }
            return Some(entry);
        }

        let bytes = match self.store.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache_read_failed");
                return None;
            }
        };
        let entry = match serde_json::from_slice::<CacheEntry>(&bytes)
            .map_err(StoreError::from)
            .and_then(|entry| entry.verify().map(|_| entry))
        {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "cache_entry_corrupt");
                self.evict(key);
                return None;
            }
        };
        if entry.is_expired(now) {
            self.evict(key);
            return None;
        }
        self.memory.lock().insert(key.to_string(), entry.clone());
        Some(entry)
    }

    fn write_metadata(&self, key: &str, entry: &CacheEntry, now: u64) {
        self.memory.lock().insert(key.to_string(), entry.clone());
        let result = serde_json::to_vec(entry)
            .map_err(StoreError::from)
            .and_then(|bytes| self.store.set(key, &bytes, entry.ttl_left(now)));
        if let Err(e) = result {
            tracing::warn!(key = %key, error = %e, "cache_metadata_write_failed");
        }
    }

    fn evict(&self, key: &str) {
        self.memory.lock().remove(key);
        if let Err(e) = self.store.delete(key) {
            tracing::warn!(key = %key, error = %e, "cache_delete_failed");
        }
    }
}
