use std::sync::Arc;

use tracing::{info, warn};

use super::{
    config::{Config, StoreKind},
    sheets::SheetsStore,
    store::{CatalogStore, MemoryStore, OrderStore, StoreError},
};

pub struct State {
    pub config: Config,
    pub catalog: Arc<dyn CatalogStore>,
    pub orders: Arc<dyn OrderStore>,
}

impl State {
    pub fn new(config: Config) -> Result<Arc<Self>, StoreError> {
        let state = match config.store {
            StoreKind::Sheets => {
                info!("Connecting to spreadsheet {}", config.spreadsheet_id);
                let store = Arc::new(SheetsStore::new(&config)?);

                Self::with_store(config, store)
            }
            StoreKind::Memory => {
                warn!("Using in-memory store, orders are lost on shutdown");
                Self::with_store(config, Arc::new(MemoryStore::new()))
            }
        };

        Ok(state)
    }

    /// One store serving both the catalogs and the order log.
    pub fn with_store<S: OrderStore>(config: Config, store: Arc<S>) -> Arc<Self> {
        Arc::new(Self {
            config,
            catalog: store.clone(),
            orders: store,
        })
    }
}
