use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use reqwest::Client;
use reqwest::Url;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::error::Result;
use crate::key::PublicKey;
use crate::key::SigningKeySet;

/// Decoded keys plus one freshness stamp for the whole set
#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, Arc<PublicKey>>,
    last_refreshed: Option<Instant>,
}

impl KeyCache {
    fn is_stale(&self, ttl: Duration) -> bool {
        match self.last_refreshed {
            Some(refreshed) => refreshed.elapsed() > ttl,
            None => true,
        }
    }
}

/// Cache of public keys fetched from a provider's key endpoint
///
/// Once the freshness window has passed every entry is discarded together,
/// even one that is still being asked for.
pub struct JwksCache {
    cache: RwLock<KeyCache>,
    endpoint: Url,
    ttl: Duration,
    client: Client,
}

impl JwksCache {
    /// Create a new key cache for the given endpoint, TTL and HTTP client
    pub fn new(endpoint: Url, ttl: Duration, client: Client) -> Self {
        Self {
            cache: RwLock::new(KeyCache::default()),
            endpoint,
            ttl,
            client,
        }
    }

    /// Resolve a key id, fetching the key set from the network on a miss or
    /// once the cached set has gone stale
    pub async fn resolve(&self, key_id: &str) -> Result<Arc<PublicKey>> {
        if let Some(key) = self.try_get_cached(key_id).await {
            tracing::debug!(kid = %key_id, "JWKS cache hit");
            return Ok(key);
        }

        self.refresh(key_id).await
    }

    /// Number of keys currently held, counting a stale set as empty
    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        if cache.is_stale(self.ttl) {
            return 0;
        }
        cache.keys.len()
    }

    /// Whether no fresh keys are held
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Try to get a key from cache if the set is still fresh
    async fn try_get_cached(&self, key_id: &str) -> Option<Arc<PublicKey>> {
        let cache = self.cache.read().await;

        if cache.is_stale(self.ttl) {
            return None;
        }

        cache.keys.get(key_id).cloned()
    }

    /// Fetch the key set, decode the matching record and store it
    ///
    /// The fetch runs without holding the lock; two concurrent misses may
    /// both fetch.
    async fn refresh(&self, key_id: &str) -> Result<Arc<PublicKey>> {
        let set = self.fetch_key_set().await?;

        let record = set
            .find(key_id)
            .ok_or_else(|| Error::KeyNotFound(key_id.to_string()))?;
        let key = Arc::new(PublicKey::decode(record)?);

        let mut cache = self.cache.write().await;
        if cache.is_stale(self.ttl) {
            if !cache.keys.is_empty() {
                tracing::debug!(discarded_keys = cache.keys.len(), "Discarding stale JWKS cache");
            }
            *cache = KeyCache::default();
        }
        cache.keys.insert(record.key_id.clone(), Arc::clone(&key));
        cache.last_refreshed = Some(Instant::now());

        tracing::info!(kid = %key_id, cached_keys = cache.keys.len(), "Cached signing key");

        Ok(key)
    }

    /// Fetch the key set from the provider's key endpoint
    async fn fetch_key_set(&self) -> Result<SigningKeySet> {
        tracing::debug!(endpoint = %self.endpoint, "Fetching JWKS");

        let body = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(serde_json::from_slice(&body)?)
    }
}
