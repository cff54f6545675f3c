//! Fill-on-miss memo tier.

use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;

/// One keyed memo tier.
///
/// Fill errors are returned to the caller and never stored, so a later call
/// retries. Concurrent misses for the same key may both run their fill; the
/// first value stored wins.
pub struct MemoTier<K, V> {
    name: &'static str,
    entries: DashMap<K, V>,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

/// Counters for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierStats {
    pub name: &'static str,
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

impl fmt::Display for TierStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} entries, {} hits, {} misses",
            self.name, self.entries, self.hits, self.misses
        )
    }
}

impl<K, V> MemoTier<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: DashMap::new(),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Cached value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Return the cached value, or run `fill` and store its result.
    ///
    /// No map guard is held while `fill` runs.
    pub async fn get_or_fill<F, Fut, E>(&self, key: K, fill: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        crate::debug!("cache"; "{} miss", self.name);

        let value = fill().await?;
        let stored = self.entries.entry(key).or_insert(value);
        Ok(stored.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TierStats {
        TierStats {
            name: self.name,
            entries: self.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fill_runs_once_per_key() {
        let tier: MemoTier<&str, u32> = MemoTier::new("test");
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let value = tier
                .get_or_fill("a", || async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, ()>(7)
                })
                .await;
            assert_eq!(value, Ok(7));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = tier.stats();
        assert_eq!((stats.entries, stats.hits, stats.misses), (1, 2, 1));
    }

    #[tokio::test]
    async fn test_failure_not_stored() {
        let tier: MemoTier<&str, u32> = MemoTier::new("test");

        let first = tier.get_or_fill("a", || async { Err("boom") }).await;
        assert_eq!(first, Err("boom"));
        assert!(tier.is_empty());

        let second = tier.get_or_fill("a", || async { Ok::<_, &str>(1) }).await;
        assert_eq!(second, Ok(1));
        assert_eq!(tier.get(&"a"), Some(1));
    }

    #[tokio::test]
    async fn test_populated_entry_not_overwritten() {
        let tier: MemoTier<&str, u32> = MemoTier::new("test");
        tier.get_or_fill("a", || async { Ok::<_, ()>(1) }).await.unwrap();

        // A later fill for the same key is never consulted.
        let value = tier
            .get_or_fill("a", || async { Ok::<_, ()>(2) })
            .await
            .unwrap();
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let tier: MemoTier<(String, String), u32> = MemoTier::new("test");
        let a = ("o/r:a".to_string(), "b".to_string());
        let b = ("o/r".to_string(), "a:b".to_string());

        tier.get_or_fill(a.clone(), || async { Ok::<_, ()>(1) }).await.unwrap();
        tier.get_or_fill(b.clone(), || async { Ok::<_, ()>(2) }).await.unwrap();

        assert_eq!(tier.get(&a), Some(1));
        assert_eq!(tier.get(&b), Some(2));
    }
}
