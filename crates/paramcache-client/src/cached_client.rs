//! Cached, self-refreshing view over a fixed set of parameters.

use crate::cache::CacheRecord;
use crate::events::{RefreshEvent, RefreshEvents, SubscriptionId};
use crate::{fetch_parameters, validate};
use paramcache_config::Settings;
use paramcache_core::{ParamError, ParamResult, ParameterMap, ParameterStore};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock, RwLockReadGuard};
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Default cache lifetime (3 minutes).
pub const DEFAULT_CACHE_LIFETIME: Duration = Duration::from_millis(180_000);

/// Cached client for a fixed key set.
///
/// Values are served from an in-process cache until it expires. The first
/// lookup after expiry reloads every key; if that reload fails and an earlier
/// load succeeded, the stale values are served and a refresh-error event is
/// emitted instead of failing the lookup.
///
/// Each instance owns its cache, so independent clients never see each
/// other's values.
pub struct CachedConfig {
    store: Arc<dyn ParameterStore>,
    keys: Vec<String>,
    prefix: Option<String>,
    lifetime: Duration,
    cache: RwLock<CacheRecord>,
    /// Serializes reloads; holds the error of the last attempt, if it failed.
    reload_lock: Mutex<Option<ParamError>>,
    /// Count of finished reload attempts.
    attempts: AtomicU64,
    events: RefreshEvents,
}

/// Result of a reload plus whether this caller ran it or joined another.
struct ReloadOutcome {
    result: ParamResult<()>,
    shared: bool,
}

impl CachedConfig {
    /// Creates a cached client.
    ///
    /// `cache_lifetime` defaults to [`DEFAULT_CACHE_LIFETIME`].
    ///
    /// # Errors
    ///
    /// Returns [`ParamError::InvalidKeys`] when `keys` is empty and
    /// [`ParamError::InvalidCacheLifetime`] when the lifetime is zero.
    pub fn new<I, S>(store: Arc<dyn ParameterStore>, keys: I, cache_lifetime: Option<Duration>) -> ParamResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        if keys.is_empty() {
            return Err(ParamError::InvalidKeys);
        }

        let lifetime = cache_lifetime.unwrap_or(DEFAULT_CACHE_LIFETIME);
        if lifetime.is_zero() {
            return Err(ParamError::InvalidCacheLifetime);
        }

        Ok(Self {
            store,
            keys,
            prefix: None,
            lifetime,
            cache: RwLock::new(CacheRecord::empty()),
            reload_lock: Mutex::new(None),
            attempts: AtomicU64::new(0),
            events: RefreshEvents::new(),
        })
    }

    /// Creates a cached client from loaded settings.
    ///
    /// # Errors
    ///
    /// Same as [`CachedConfig::new`].
    pub fn from_settings(store: Arc<dyn ParameterStore>, settings: &Settings) -> ParamResult<Self> {
        let client = Self::new(store, settings.cache.keys.clone(), Some(settings.cache.lifetime()))?;
        Ok(match &settings.store.prefix {
            Some(prefix) => client.with_prefix(prefix.clone()),
            None => client,
        })
    }

    /// Prepends `prefix` to every key sent to the store.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Returns the configured keys, in order.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the cache lifetime.
    #[must_use]
    pub const fn cache_lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Returns when the cache expires, or `None` before the first load.
    pub async fn expires_at(&self) -> Option<Instant> {
        self.cache.read().await.expiration()
    }

    /// Returns the value for `key`, reloading first if the cache is stale.
    ///
    /// # Errors
    ///
    /// [`ParamError::UnknownKey`] for keys outside the client's key set, or
    /// the reload error when no earlier load succeeded.
    pub async fn get(&self, key: &str) -> ParamResult<String> {
        if !self.keys.iter().any(|k| k == key) {
            return Err(ParamError::UnknownKey(key.to_string()));
        }

        let cache = self.current().await?;
        // A loaded record always holds every configured key, so this only
        // guards the type, not a reachable state.
        cache
            .value(key)
            .cloned()
            .ok_or_else(|| ParamError::missing_keys([key]))
    }

    /// Returns every cached value, reloading first if the cache is stale.
    ///
    /// # Errors
    ///
    /// The reload error when no earlier load succeeded.
    pub async fn get_all(&self) -> ParamResult<ParameterMap> {
        let cache = self.current().await?;
        Ok(cache.items().clone())
    }

    /// Reloads unconditionally.
    ///
    /// Unlike [`CachedConfig::get`], a failure is returned as-is and the
    /// existing cache is left untouched.
    ///
    /// # Errors
    ///
    /// Any fetch or validation error.
    pub async fn refresh(&self) -> ParamResult<()> {
        let mut last_error = self.reload_lock.lock().await;
        self.attempt_reload(&mut last_error).await
    }

    /// Registers a listener called after every successful reload.
    pub fn on_refresh<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.events.on_refresh(Arc::new(listener))
    }

    /// Registers a listener called when a reload fails and stale values are served.
    pub fn on_refresh_error<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&ParamError) + Send + Sync + 'static,
    {
        self.events.on_refresh_error(Arc::new(listener))
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Returns a receiver of refresh events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<RefreshEvent> {
        self.events.subscribe()
    }

    /// Returns a read guard on a usable cache record, reloading if stale.
    async fn current(&self) -> ParamResult<RwLockReadGuard<'_, CacheRecord>> {
        let seen = self.attempts.load(Ordering::Acquire);
        {
            let cache = self.cache.read().await;
            if cache.is_fresh(Instant::now()) {
                debug!("Serving parameters from cache");
                return Ok(cache);
            }
        }

        let ReloadOutcome { result, shared } = self.reload_if_stale(seen).await;
        match result {
            Ok(()) => Ok(self.cache.read().await),
            Err(err) => {
                let cache = self.cache.read().await;
                if cache.is_loaded() {
                    if shared {
                        debug!(error = %err, "Joined a failed reload, serving stale values");
                    } else {
                        warn!(
                            error = %err,
                            store_error = err.is_retriable(),
                            "Swallowing error from parameter store, serving stale values"
                        );
                        self.events.emit_refresh_error(&err);
                    }
                    return Ok(cache);
                }

                if !shared {
                    error!(keys = ?self.keys, error = %err, "Couldn't fetch the initial configs");
                }
                Err(err)
            }
        }
    }

    /// Single-flight reload. `seen` is the attempt count observed before the
    /// cache was found stale; if another caller finished an attempt since,
    /// its outcome is reused instead of issuing another fetch.
    async fn reload_if_stale(&self, seen: u64) -> ReloadOutcome {
        let mut last_error = self.reload_lock.lock().await;

        if self.cache.read().await.is_fresh(Instant::now()) {
            return ReloadOutcome {
                result: Ok(()),
                shared: true,
            };
        }

        if self.attempts.load(Ordering::Acquire) != seen {
            if let Some(err) = last_error.clone() {
                return ReloadOutcome {
                    result: Err(err),
                    shared: true,
                };
            }
        }

        ReloadOutcome {
            result: self.attempt_reload(&mut last_error).await,
            shared: false,
        }
    }

    /// Runs one reload and records its outcome. `last_error` is the guarded
    /// contents of `reload_lock`.
    async fn attempt_reload(&self, last_error: &mut Option<ParamError>) -> ParamResult<()> {
        let result = self.reload().await;
        *last_error = result.clone().err();
        self.attempts.fetch_add(1, Ordering::AcqRel);
        result
    }

    /// Caller must hold `reload_lock`.
    async fn reload(&self) -> ParamResult<()> {
        info!(keys = ?self.keys, "Loading cache keys");

        let items = fetch_parameters(self.store.as_ref(), &self.keys, self.prefix.as_deref()).await?;
        validate(&self.keys, &items)?;

        {
            let mut cache = self.cache.write().await;
            cache.replace(items, Instant::now(), self.lifetime);
        }

        info!(keys = ?self.keys, "Successfully loaded cache keys");
        self.events.emit_refresh(self.keys.len());
        Ok(())
    }
}

impl std::fmt::Debug for CachedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedConfig")
            .field("keys", &self.keys)
            .field("prefix", &self.prefix)
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}
