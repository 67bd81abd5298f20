use std::sync::Arc;

use tracing::error;

use crate::api::ApiError;
use crate::config::AppConfig;
use crate::storage::{ClubStore, StoreResult};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ClubStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: ClubStore, config: AppConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }

    /// Length of the ranking and top-rating lists.
    pub fn top_n(&self) -> usize {
        self.config.stats.top_n
    }

    /// Run store work on the blocking pool. The store does file I/O and
    /// waits on its write lock, neither of which may stall a runtime worker.
    pub async fn with_store<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&ClubStore) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let result = tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| {
                error!("Store task failed: {}", e);
                ApiError::Internal(format!("store task failed: {}", e))
            })?;
        Ok(result?)
    }
}
