//! Index catalog refresh

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::catalog::{CatalogSnapshot, IndexCatalog};
use crate::config::QueryConfig;
use crate::observability::{log_event_with_fields, metrics, Event};
use crate::store::{StoreClient, StoreResult};

/// Rebuilds the catalog from the store's index list
pub struct IndexRefresher {
    client: Arc<dyn StoreClient>,
    namespace: String,
    catalog: Arc<IndexCatalog>,
}

impl IndexRefresher {
    pub fn new(
        client: Arc<dyn StoreClient>,
        namespace: impl Into<String>,
        catalog: Arc<IndexCatalog>,
    ) -> Self {
        Self {
            client,
            namespace: namespace.into(),
            catalog,
        }
    }

    pub fn catalog(&self) -> &Arc<IndexCatalog> {
        &self.catalog
    }

    /// Reads the index list and swaps in a new snapshot. On failure the
    /// previous snapshot stays in place.
    pub fn refresh_indexes(&self) -> StoreResult<usize> {
        let indexes = match self.client.list_indexes(&self.namespace) {
            Ok(indexes) => indexes,
            Err(e) => {
                log_event_with_fields(
                    Event::IndexCatalogRefreshFailed,
                    &[("namespace", &self.namespace), ("error", &e.to_string())],
                );
                return Err(e);
            }
        };

        let snapshot = CatalogSnapshot::new(indexes);
        let count = snapshot.len();
        self.catalog.replace(snapshot);
        metrics().increment_catalog_refreshes();
        log_event_with_fields(
            Event::IndexCatalogRefreshed,
            &[("namespace", &self.namespace), ("indexes", &count.to_string())],
        );
        Ok(count)
    }

    /// Refreshes every `period` on the tokio runtime until the handle is
    /// aborted. Failed refreshes are logged and retried on the next tick.
    pub fn spawn_periodic(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let refresher = Arc::clone(&self);
                // store calls block; keep them off the async workers
                let _ = tokio::task::spawn_blocking(move || refresher.refresh_indexes()).await;
            }
        })
    }

    /// Starts the periodic refresh at the configured interval. Returns
    /// `None` without spawning when the interval is 0.
    pub fn spawn_configured(self: Arc<Self>, config: &QueryConfig) -> Option<JoinHandle<()>> {
        let period = config.index_refresh_interval()?;
        log_event_with_fields(
            Event::IndexRefresherStarted,
            &[
                ("namespace", &self.namespace),
                ("interval_secs", &period.as_secs().to_string()),
            ],
        );
        Some(self.spawn_periodic(period))
    }
}
