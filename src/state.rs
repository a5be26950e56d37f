//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::extract::ExtractionStrategy;
use crate::storage::BlobStore;

/// Shared application state
///
/// Read-only process-wide state: the config, blob store, and active
/// extraction strategy are initialized once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    blob_store: Arc<dyn BlobStore>,
    extractor: Arc<dyn ExtractionStrategy>,
}

impl AppState {
    pub fn new(
        config: Config,
        blob_store: Arc<dyn BlobStore>,
        extractor: Arc<dyn ExtractionStrategy>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                blob_store,
                extractor,
            }),
        }
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn blob_store(&self) -> &dyn BlobStore {
        self.inner.blob_store.as_ref()
    }

    pub fn extractor(&self) -> &dyn ExtractionStrategy {
        self.inner.extractor.as_ref()
    }
}
