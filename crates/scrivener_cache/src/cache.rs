//! Expiring, capacity-bounded cache keyed by genre-like strings.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Settings for a [`TtlCache`].
///
/// Every field has a serde default, so an empty `[cache]` table is valid.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_")]
pub struct TtlCacheConfig {
    /// Lifetime of an entry inserted without an explicit one, in seconds
    #[serde(default = "default_ttl_secs")]
    ttl_secs: u64,

    /// Entries kept before the least recently used one is dropped
    #[serde(default = "default_capacity")]
    capacity: usize,

    /// A disabled cache never holds anything
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl_secs() -> u64 {
    86_400
}

fn default_capacity() -> usize {
    64
}

fn default_enabled() -> bool {
    true
}

impl Default for TtlCacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            capacity: default_capacity(),
            enabled: default_enabled(),
        }
    }
}

#[derive(Debug)]
struct Slot<V> {
    value: V,
    expires_at: Instant,
    last_used: u64,
}

impl<V> Slot<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// String-keyed cache with per-entry expiry and least-recently-used eviction.
///
/// Keys pass through [`TtlCache::key_for`], so `"Fantasy"` and `" fantasy"`
/// name the same entry. Reads hand out clones.
///
/// # Example
///
/// ```
/// use scrivener_cache::{TtlCache, TtlCacheConfig};
///
/// let mut cache = TtlCache::new(TtlCacheConfig::default());
/// cache.insert("Fantasy", "GENRE STYLE GUIDE: ...".to_string());
///
/// let guide = cache.get("fantasy").unwrap();
/// assert!(guide.starts_with("GENRE STYLE GUIDE"));
/// ```
#[derive(Debug)]
pub struct TtlCache<V> {
    config: TtlCacheConfig,
    slots: HashMap<String, Slot<V>>,
    clock: u64,
}

impl<V: Clone> TtlCache<V> {
    /// Empty cache.
    pub fn new(config: TtlCacheConfig) -> Self {
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            capacity = config.capacity,
            enabled = config.enabled,
            "Creating style cache"
        );
        Self {
            config,
            slots: HashMap::new(),
            clock: 0,
        }
    }

    /// Canonical key: trimmed and lowercased.
    pub fn key_for(key: &str) -> String {
        key.trim().to_lowercase()
    }

    /// Store `value` for the configured lifetime.
    pub fn insert(&mut self, key: &str, value: V) {
        let ttl = Duration::from_secs(self.config.ttl_secs);
        self.insert_expiring(key, value, ttl);
    }

    /// Store `value` for `ttl`, replacing any previous entry.
    #[tracing::instrument(skip(self, value), fields(entries = self.slots.len()))]
    pub fn insert_expiring(&mut self, key: &str, value: V, ttl: Duration) {
        if !self.config.enabled || self.config.capacity == 0 {
            return;
        }

        let key = Self::key_for(key);
        if !self.slots.contains_key(&key) {
            while self.slots.len() >= self.config.capacity {
                self.evict_least_recent();
            }
        }

        let last_used = self.tick();
        self.slots.insert(
            key,
            Slot {
                value,
                expires_at: Instant::now() + ttl,
                last_used,
            },
        );
        tracing::debug!(ttl = ?ttl, "Cached entry");
    }

    /// Live value for `key`. Expired entries are dropped on the way out.
    pub fn get(&mut self, key: &str) -> Option<V> {
        if !self.config.enabled {
            return None;
        }

        let key = Self::key_for(key);
        let live = self.slots.get(&key)?.is_live(Instant::now());
        if !live {
            tracing::debug!(key = %key, "Cache entry expired");
            self.slots.remove(&key);
            return None;
        }

        let now = self.tick();
        let slot = self.slots.get_mut(&key)?;
        slot.last_used = now;
        Some(slot.value.clone())
    }

    /// Drop every expired entry, returning how many went.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.slots.len();
        self.slots.retain(|_, slot| slot.is_live(now));
        let purged = before - self.slots.len();
        if purged > 0 {
            tracing::debug!(purged, remaining = self.slots.len(), "Purged expired entries");
        }
        purged
    }

    /// Entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether nothing is held.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .slots
            .iter()
            .min_by_key(|(_, slot)| slot.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            tracing::debug!(key = %key, "Evicting least recently used entry");
            self.slots.remove(&key);
        }
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(TtlCacheConfig::default())
    }
}
