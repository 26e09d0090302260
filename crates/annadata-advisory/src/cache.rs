//! Content-addressed cache of successful advisory outputs.

use std::sync::Arc;
use std::time::Duration;

use annadata_core::config::AdvisoryConfig;
use moka::sync::Cache;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

/// TTL-bounded cache keyed by `sha256(variant name + input JSON)`.
///
/// Cloning is cheap and shares the same underlying cache. Only model
/// outputs are stored, never fallback payloads.
#[derive(Clone)]
pub struct AdvisoryCache {
    inner: Arc<Cache<String, Value>>,
}

impl AdvisoryCache {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self {
            inner: Arc::new(cache),
        }
    }

    /// Build from config, or `None` when caching is disabled.
    pub fn from_config(config: &AdvisoryConfig) -> Option<Self> {
        config.cache_enabled.then(|| {
            Self::new(
                config.cache_max_entries,
                Duration::from_secs(config.cache_ttl_secs),
            )
        })
    }

    /// Cache key for a variant input. `None` if the input cannot be serialized.
    pub fn key<I: Serialize>(variant: &str, input: &I) -> Option<String> {
        let body = serde_json::to_vec(input).ok()?;
        let mut hasher = Sha256::new();
        hasher.update(variant.as_bytes());
        hasher.update([0u8]);
        hasher.update(&body);
        Some(hex::encode(hasher.finalize()))
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.inner.get(key)?;
        match serde_json::from_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                debug!("advisory cache: dropping undecodable entry {key}: {e}");
                self.inner.invalidate(key);
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&self, key: String, output: &T) {
        if let Ok(value) = serde_json::to_value(output) {
            self.inner.insert(key, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Q {
        region: String,
    }

    #[test]
    fn test_key_depends_on_variant_and_input() {
        let a = AdvisoryCache::key("crop_advisory", &Q { region: "Goa".into() }).unwrap();
        let b = AdvisoryCache::key("crop_advisory", &Q { region: "Goa".into() }).unwrap();
        let c = AdvisoryCache::key("weather_advisory", &Q { region: "Goa".into() }).unwrap();
        let d = AdvisoryCache::key("crop_advisory", &Q { region: "Assam".into() }).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_insert_and_get() {
        let cache = AdvisoryCache::new(10, Duration::from_secs(60));
        cache.insert("k".into(), &Q { region: "Goa".into() });
        assert_eq!(cache.get::<Q>("k"), Some(Q { region: "Goa".into() }));
        assert_eq!(cache.get::<Q>("missing"), None);
    }

    #[test]
    fn test_disabled_by_default() {
        assert!(AdvisoryCache::from_config(&AdvisoryConfig::default()).is_none());
        let enabled = AdvisoryConfig {
            cache_enabled: true,
            ..Default::default()
        };
        assert!(AdvisoryCache::from_config(&enabled).is_some());
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let cache = AdvisoryCache::new(10, Duration::from_millis(50));
        cache.insert("k".into(), &Q { region: "Goa".into() });
        std::thread::sleep(Duration::from_millis(120));
        assert_eq!(cache.get::<Q>("k"), None);
    }
}
