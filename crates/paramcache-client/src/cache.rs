//! Per-client cache record.

use paramcache_core::ParameterMap;
use std::time::Duration;
use tokio::time::Instant;

/// Expiration plus the values from the last successful load.
///
/// A fresh record has no expiration, which counts as already expired, so the
/// first lookup always reloads.
#[derive(Debug, Default)]
pub(crate) struct CacheRecord {
    expiration: Option<Instant>,
    items: ParameterMap,
}

impl CacheRecord {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// Fresh means `now` is at or before the expiration.
    pub(crate) fn is_fresh(&self, now: Instant) -> bool {
        self.expiration.is_some_and(|expiration| now <= expiration)
    }

    /// Whether a load has ever succeeded.
    pub(crate) fn is_loaded(&self) -> bool {
        self.expiration.is_some()
    }

    pub(crate) fn expiration(&self) -> Option<Instant> {
        self.expiration
    }

    pub(crate) fn value(&self, key: &str) -> Option<&String> {
        self.items.get(key)
    }

    pub(crate) fn items(&self) -> &ParameterMap {
        &self.items
    }

    /// Swaps in a freshly loaded mapping.
    pub(crate) fn replace(&mut self, items: ParameterMap, now: Instant, lifetime: Duration) {
        self.expiration = Some(now + lifetime);
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_is_stale() {
        let record = CacheRecord::empty();
        assert!(!record.is_fresh(Instant::now()));
        assert!(!record.is_loaded());
    }

    #[test]
    fn test_fresh_until_expiration_inclusive() {
        let mut record = CacheRecord::empty();
        let now = Instant::now();
        let lifetime = Duration::from_secs(10);

        record.replace(ParameterMap::from([("A".into(), "1".into())]), now, lifetime);

        assert!(record.is_fresh(now));
        assert!(record.is_fresh(now + lifetime));
        assert!(!record.is_fresh(now + lifetime + Duration::from_millis(1)));
        assert_eq!(record.value("A").map(String::as_str), Some("1"));
    }

    #[test]
    fn test_replace_is_wholesale() {
        let mut record = CacheRecord::empty();
        let now = Instant::now();
        record.replace(ParameterMap::from([("A".into(), "1".into())]), now, Duration::from_secs(1));
        record.replace(ParameterMap::from([("B".into(), "2".into())]), now, Duration::from_secs(1));

        assert!(record.value("A").is_none());
        assert_eq!(record.items().len(), 1);
    }
}
