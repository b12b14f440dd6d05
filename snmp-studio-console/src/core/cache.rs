//! Memoized view fragments keyed by route name.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use snmp_studio_config::CachePolicySetting;
use tokio::time::Instant;

/// Retention policy for cached fragments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// First fetched copy is kept for the session and never replaced.
    #[default]
    NoEviction,
    /// Entries older than the given age read as absent.
    TimeToLive(Duration),
    /// Kept until [`FragmentCache::invalidate`] or [`FragmentCache::clear`].
    Manual,
}

impl From<CachePolicySetting> for CachePolicy {
    fn from(setting: CachePolicySetting) -> Self {
        match setting {
            CachePolicySetting::NoEviction => CachePolicy::NoEviction,
            CachePolicySetting::TimeToLive(ttl) => CachePolicy::TimeToLive(ttl),
            CachePolicySetting::Manual => CachePolicy::Manual,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    markup: Arc<str>,
    stored_at: Instant,
}

#[derive(Debug, Default)]
pub struct FragmentCache {
    policy: CachePolicy,
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

impl FragmentCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the cached fragment, dropping it first if its TTL has lapsed.
    pub fn get(&mut self, name: &str) -> Option<Arc<str>> {
        if let CachePolicy::TimeToLive(ttl) = self.policy
            && self
                .entries
                .get(name)
                .is_some_and(|entry| entry.stored_at.elapsed() >= ttl)
        {
            log::debug!("[FragmentCache] '{name}' expired");
            self.entries.remove(name);
        }

        match self.entries.get(name) {
            Some(entry) => {
                self.hits += 1;
                Some(Arc::clone(&entry.markup))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Stores a fragment. Under the session policies an existing entry is
    /// immutable and the new copy is discarded.
    pub fn put(&mut self, name: &str, markup: impl Into<Arc<str>>) -> Arc<str> {
        if !matches!(self.policy, CachePolicy::TimeToLive(_))
            && let Some(existing) = self.entries.get(name)
        {
            return Arc::clone(&existing.markup);
        }

        let markup = markup.into();
        self.entries.insert(
            name.to_string(),
            CacheEntry {
                markup: Arc::clone(&markup),
                stored_at: Instant::now(),
            },
        );
        markup
    }

    /// Removes one entry. Refused under [`CachePolicy::NoEviction`].
    pub fn invalidate(&mut self, name: &str) -> bool {
        if self.policy == CachePolicy::NoEviction {
            log::warn!("[FragmentCache] invalidate('{name}') ignored under no-eviction policy");
            return false;
        }
        self.entries.remove(name).is_some()
    }

    /// Removes every entry. Refused under [`CachePolicy::NoEviction`].
    pub fn clear(&mut self) -> bool {
        if self.policy == CachePolicy::NoEviction {
            return false;
        }
        self.entries.clear();
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
