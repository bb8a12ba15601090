//! Cached catalog lookups of class progression data.
//!
//! The [`ProgressionResolver`] asks the catalog for a class record at most
//! once per `(name, source)` for its lifetime. Concurrent requests for the
//! same key share one in-flight lookup. Whatever goes wrong, callers get
//! `None` and the derivers fall back to the built-in tables.

use crate::character::ClassLevel;
use crate::progression::{CatalogKey, ClassProgression, ProgressionOverrides};
use catalog::{Catalog, EntityKind};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

const DEFAULT_FETCH_TIMEOUT_MS: u64 = 10_000;

/// Why a catalog lookup produced no override.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] catalog::Error),

    #[error("Catalog lookup timed out after {0:?}")]
    Timeout(Duration),

    #[error("Unparsable class record: {0}")]
    Parse(String),
}

impl ResolveError {
    /// Whether retrying later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ResolveError::Catalog(_) | ResolveError::Timeout(_))
    }
}

/// Resolver configuration.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Upper bound on a single catalog lookup.
    pub fetch_timeout: Duration,
    /// Cache "no override" after a failed or timed-out lookup instead of
    /// retrying on the next request.
    pub cache_failures: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_millis(DEFAULT_FETCH_TIMEOUT_MS),
            cache_failures: false,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `SHEET_CATALOG_TIMEOUT_MS` and `SHEET_CATALOG_CACHE_FAILURES`,
    /// keeping defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(ms) = std::env::var("SHEET_CATALOG_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config.fetch_timeout = Duration::from_millis(ms);
        }
        if let Ok(value) = std::env::var("SHEET_CATALOG_CACHE_FAILURES") {
            config.cache_failures = matches!(
                value.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        config
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    pub fn with_cache_failures(mut self, cache_failures: bool) -> Self {
        self.cache_failures = cache_failures;
        self
    }
}

/// The settled answer for one key.
#[derive(Debug, Clone)]
struct Resolution {
    progression: Option<ClassProgression>,
    /// Settled by a transient failure; the key is evicted so a later request
    /// asks the catalog again.
    retry: bool,
}

type Slot = Arc<OnceCell<Resolution>>;

/// Memoizing, single-flight resolver for class progression overrides.
pub struct ProgressionResolver {
    catalog: Arc<dyn Catalog>,
    config: ResolverConfig,
    cache: Mutex<HashMap<CatalogKey, Slot>>,
}

impl ProgressionResolver {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self::with_config(catalog, ResolverConfig::default())
    }

    pub fn with_config(catalog: Arc<dyn Catalog>, config: ResolverConfig) -> Self {
        Self {
            catalog,
            config,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Progression overrides for a class, or `None` to use built-in tables.
    ///
    /// Every caller waiting on the same key gets the answer of one catalog
    /// lookup, failed or not.
    pub async fn resolve_class_progression(
        &self,
        name: &str,
        source: &str,
    ) -> Option<ClassProgression> {
        let key = CatalogKey::new(name.trim(), source.trim());
        let slot = self.slot(&key).await;

        if let Some(cached) = slot.get() {
            tracing::debug!(
                %key,
                found = cached.progression.is_some(),
                "progression cache hit"
            );
            return cached.progression.clone();
        }

        let resolution = slot.get_or_init(|| self.load(&key)).await;
        if resolution.retry {
            self.evict(&key, &slot).await;
        }
        resolution.progression.clone()
    }

    /// Resolve overrides for every distinct class concurrently.
    pub async fn resolve_for_classes(&self, classes: &[ClassLevel]) -> ProgressionOverrides {
        let mut seen = HashSet::new();
        let keys: Vec<CatalogKey> = classes
            .iter()
            .map(CatalogKey::for_class)
            .filter(|key| seen.insert(key.clone()))
            .collect();

        let resolved = join_all(keys.iter().map(|key| async move {
            let progression = self
                .resolve_class_progression(&key.name, &key.source)
                .await;
            (key.clone(), progression)
        }))
        .await;

        let mut overrides = ProgressionOverrides::new();
        for (key, progression) in resolved {
            if let Some(progression) = progression {
                overrides.insert(key, progression);
            }
        }
        overrides
    }

    /// Number of keys with a settled cached answer.
    pub async fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .await
            .values()
            .filter(|slot| slot.get().is_some_and(|r| !r.retry))
            .count()
    }

    /// Fetch-or-insert the cell for a key. The map lock is released before
    /// any catalog call.
    async fn slot(&self, key: &CatalogKey) -> Slot {
        let mut cache = self.cache.lock().await;
        cache.entry(key.clone()).or_default().clone()
    }

    /// Drop a settled cell, unless a newer cell already replaced it.
    async fn evict(&self, key: &CatalogKey, slot: &Slot) {
        let mut cache = self.cache.lock().await;
        if cache.get(key).is_some_and(|current| Arc::ptr_eq(current, slot)) {
            cache.remove(key);
        }
    }

    /// Look up a key on a cache miss. Runs once per cell.
    async fn load(&self, key: &CatalogKey) -> Resolution {
        tracing::debug!(%key, "progression cache miss");
        match self.fetch(key).await {
            Ok(progression) => Resolution {
                progression,
                retry: false,
            },
            Err(e) if !e.is_transient() || self.config.cache_failures => {
                tracing::warn!(%key, error = %e, "no catalog override, caching");
                Resolution {
                    progression: None,
                    retry: false,
                }
            }
            Err(e) => {
                tracing::warn!(%key, error = %e, "no catalog override, will retry");
                Resolution {
                    progression: None,
                    retry: true,
                }
            }
        }
    }

    async fn fetch(&self, key: &CatalogKey) -> Result<Option<ClassProgression>, ResolveError> {
        let lookup = self
            .catalog
            .lookup(EntityKind::Class, &key.name, &key.source);
        let record = tokio::time::timeout(self.config.fetch_timeout, lookup)
            .await
            .map_err(|_| ResolveError::Timeout(self.config.fetch_timeout))??;

        record
            .map(|value| {
                ClassProgression::from_record(&value)
                    .map_err(|e| ResolveError::Parse(e.to_string()))
            })
            .transpose()
    }
}
