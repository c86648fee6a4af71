//! Resolution of the habits database's data source, cached for the process lifetime.

use shared::{Error, NotionApi, Result};
use tokio::sync::RwLock;
use tracing::info;

/// Single-slot cache for the data source id.
///
/// Once filled it is never refreshed. Two cold requests racing on an empty slot
/// both fetch and store the same id.
#[derive(Debug, Default)]
pub struct DataSourceCache {
    slot: RwLock<Option<String>>,
}

impl DataSourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently cached id, if any.
    pub async fn get(&self) -> Option<String> {
        self.slot.read().await.clone()
    }

    /// Clear the cached id (useful for testing).
    #[cfg(test)]
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }

    /// Return the cached data source id, fetching the database descriptor on a miss.
    pub async fn resolve(&self, notion: &dyn NotionApi, database_id: &str) -> Result<String> {
        // Check cache first
        if let Some(id) = self.get().await {
            return Ok(id);
        }

        let database = notion.retrieve_database(database_id).await?;

        let id = database
            .data_sources
            .first()
            .ok_or_else(|| {
                Error::Config(format!("Database {} has no data sources", database_id))
            })?
            .id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                Error::Config(format!(
                    "First data source of database {} has no id",
                    database_id
                ))
            })?;

        info!(database_id, data_source_id = %id, "Resolved habits data source");

        *self.slot.write().await = Some(id.clone());
        Ok(id)
    }
}
