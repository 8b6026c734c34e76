//! Memoized detail lookups with shared in-flight requests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

use crate::api::{ApiError, PokeApi};
use crate::state::PokemonDetail;

/// Where cache misses are fetched from.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, key: &str) -> Result<PokemonDetail, ApiError>;
}

#[async_trait]
impl DetailSource for PokeApi {
    async fn fetch_detail(&self, key: &str) -> Result<PokemonDetail, ApiError> {
        self.fetch_pokemon(key).await
    }
}

type Slot = Arc<OnceCell<PokemonDetail>>;

/// Unbounded, never-evicted cache keyed by id or name.
///
/// Each key owns a `OnceCell`: concurrent callers of the same key await one
/// fetch. A failed fetch leaves the cell empty so the next call retries.
pub struct DetailCache<S> {
    source: S,
    slots: Mutex<HashMap<String, Slot>>,
}

impl<S: DetailSource> DetailCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn get(&self, key: &str) -> Result<PokemonDetail, ApiError> {
        let key = normalize_key(key);
        let slot = self.slot(&key);
        if let Some(detail) = slot.get() {
            trace!(%key, "detail cache hit");
            return Ok(detail.clone());
        }
        let detail = slot
            .get_or_try_init(|| async {
                debug!(%key, "detail cache miss");
                self.source.fetch_detail(&key).await
            })
            .await?
            .clone();
        self.alias(&detail);
        Ok(detail)
    }

    /// Cached value without fetching.
    pub fn peek(&self, key: &str) -> Option<PokemonDetail> {
        let key = normalize_key(key);
        let slots = self.lock();
        slots.get(&key).and_then(|slot| slot.get().cloned())
    }

    /// Number of keys holding a value.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot(&self, key: &str) -> Slot {
        let mut slots = self.lock();
        slots
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }

    /// Records the detail under its id and name so either spelling hits.
    fn alias(&self, detail: &PokemonDetail) {
        let mut slots = self.lock();
        for key in [detail.id.to_string(), normalize_key(&detail.name)] {
            let slot = slots
                .entry(key)
                .or_insert_with(|| Arc::new(OnceCell::new()));
            let _ = slot.set(detail.clone());
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Slot>> {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
