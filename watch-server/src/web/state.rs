//! Application state for the web layer.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::card::{CardConfig, CardHandle, CardView};
use crate::config::{Language, Theme};
use crate::i18n::Catalog;
use crate::irail::{FetchError, IrailClient};

/// Station names for the autocomplete list.
///
/// Fetched lazily on first use and kept for the life of the process;
/// a failed fetch leaves the directory empty so the next request tries
/// again.
#[derive(Clone, Default)]
pub struct StationDirectory {
    inner: Arc<RwLock<Vec<String>>>,
}

impl StationDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current station list, fetching it on first use.
    pub async fn get_or_fetch(&self, client: &IrailClient) -> Result<Vec<String>, FetchError> {
        {
            let guard = self.inner.read().await;
            if !guard.is_empty() {
                return Ok(guard.clone());
            }
        }

        let stations = client.get_stations().await?;

        let mut guard = self.inner.write().await;
        *guard = stations.clone();
        Ok(stations)
    }

    /// Number of stations currently held.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether the directory is still empty.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// The live set of train-watch cards, keyed by id.
///
/// Each card owns its own state and timers; the registry only maps ids
/// to handles so the web layer can address them.
#[derive(Clone, Default)]
pub struct CardRegistry {
    inner: Arc<RwLock<BTreeMap<u64, CardHandle>>>,
    next_id: Arc<AtomicU64>,
}

impl CardRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card and return its id.
    pub async fn insert(&self, handle: CardHandle) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.inner.write().await.insert(id, handle);
        id
    }

    /// Look up a card by id.
    pub async fn get(&self, id: u64) -> Option<CardHandle> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Remove a card by id, returning its handle for disposal.
    pub async fn remove(&self, id: u64) -> Option<CardHandle> {
        self.inner.write().await.remove(&id)
    }

    /// Latest view of every card, in insertion (id) order.
    pub async fn views(&self) -> Vec<(u64, CardView)> {
        self.inner
            .read()
            .await
            .iter()
            .map(|(id, handle)| (*id, handle.view()))
            .collect()
    }

    /// Number of registered cards.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Whether any cards are registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// iRail API client.
    pub irail: IrailClient,

    /// Localized message catalog.
    pub i18n: Arc<Catalog>,

    /// Active interface language.
    pub language: Language,

    /// Current theme; toggled through the web layer.
    pub theme: Arc<RwLock<Theme>>,

    /// Station autocomplete directory.
    pub stations: StationDirectory,

    /// Live cards.
    pub cards: CardRegistry,

    /// Configuration applied to newly created cards.
    pub card_config: CardConfig,
}

impl AppState {
    /// Create a new app state.
    pub fn new(
        irail: IrailClient,
        catalog: Catalog,
        language: Language,
        theme: Theme,
        card_config: CardConfig,
    ) -> Self {
        Self {
            irail,
            i18n: Arc::new(catalog),
            language,
            theme: Arc::new(RwLock::new(theme)),
            stations: StationDirectory::new(),
            cards: CardRegistry::new(),
            card_config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrainId;
    use crate::irail::mock::{MockVehicleSource, vehicle_with_stops};

    fn spawn_mock_card() -> CardHandle {
        let source = MockVehicleSource::new();
        source.push_vehicle(vehicle_with_stops(1));
        CardHandle::spawn(
            source,
            Arc::new(Catalog::builtin()),
            Language::En,
            CardConfig::default(),
            TrainId::parse("IC 538").unwrap(),
            "Leuven",
        )
    }

    #[tokio::test]
    async fn registry_insert_get_remove() {
        let registry = CardRegistry::new();
        assert!(registry.is_empty().await);

        let id = registry.insert(spawn_mock_card()).await;
        assert_eq!(registry.len().await, 1);
        assert!(registry.get(id).await.is_some());

        let removed = registry.remove(id).await;
        assert!(removed.is_some());
        assert!(registry.is_empty().await);
        assert!(registry.get(id).await.is_none());
    }

    #[tokio::test]
    async fn registry_ids_are_unique_and_ordered() {
        let registry = CardRegistry::new();
        let a = registry.insert(spawn_mock_card()).await;
        let b = registry.insert(spawn_mock_card()).await;
        assert!(b > a);

        let views = registry.views().await;
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].0, a);
        assert_eq!(views[1].0, b);
    }
}
