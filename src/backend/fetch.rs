use async_trait::async_trait;
use tracing::{info, warn};

use crate::backend::{Backend, BackendKind, LoadOutcome};
use crate::error::{StoreError, StoreResult};
use crate::models::Snapshot;
use crate::storage::{SharedKeyValueStore, slots};

/// Reads a static JSON resource, falling back to local key-value storage
/// when it is unavailable. Writes only ever go to local storage; the
/// resource is read-only.
pub struct FetchBackend {
    client: reqwest::Client,
    url: String,
    kv: SharedKeyValueStore,
}

impl FetchBackend {
    pub fn new(client: reqwest::Client, url: impl Into<String>, kv: SharedKeyValueStore) -> Self {
        Self {
            client,
            url: url.into(),
            kv,
        }
    }

    async fn fetch_resource(&self) -> StoreResult<Snapshot> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::status(&self.url, status));
        }
        let body = response.text().await?;
        Snapshot::from_json(&body)
    }
}

#[async_trait]
impl Backend for FetchBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Fetch
    }

    async fn load(&self) -> LoadOutcome {
        match self.fetch_resource().await {
            Ok(snapshot) => {
                info!(url = %self.url, "snapshot loaded from static resource");
                LoadOutcome::Loaded(snapshot)
            }
            Err(error) => {
                warn!(url = %self.url, %error, "static resource unavailable, using local storage");
                LoadOutcome::Loaded(slots::read_snapshot(self.kv.as_ref()))
            }
        }
    }

    async fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        slots::write_snapshot(self.kv.as_ref(), snapshot)
    }
}
