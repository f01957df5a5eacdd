use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::backend::{Backend, BackendKind, DocumentHost, LoadOutcome};
use crate::error::StoreResult;
use crate::models::Snapshot;
use crate::storage::{SharedKeyValueStore, keys};

/// Snapshot kept in a hosted document whose id is cached in local
/// key-value storage.
pub struct RemoteBackend {
    host: Arc<dyn DocumentHost>,
    kv: SharedKeyValueStore,
    // Id of a document this process created but could not cache.
    uncached_id: Mutex<Option<String>>,
}

impl RemoteBackend {
    pub fn new(host: Arc<dyn DocumentHost>, kv: SharedKeyValueStore) -> Self {
        Self {
            host,
            kv,
            uncached_id: Mutex::new(None),
        }
    }

    /// The cached document id, or the one created by this process when it
    /// could not be cached. Unreadable storage counts as no cached id.
    pub fn document_id(&self) -> Option<String> {
        let cached = match self.kv.get(keys::DOCUMENT_ID) {
            Ok(id) => id.filter(|id| !id.is_empty()),
            Err(error) => {
                warn!(%error, "failed to read cached document id");
                None
            }
        };
        cached.or_else(|| self.uncached().clone())
    }

    fn uncached(&self) -> MutexGuard<'_, Option<String>> {
        self.uncached_id
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Backend for RemoteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Remote
    }

    async fn load(&self) -> LoadOutcome {
        if let Some(id) = self.document_id() {
            match self.host.read_latest(&id).await {
                Ok(snapshot) => {
                    info!(document = %id, "snapshot loaded from document host");
                    return LoadOutcome::Loaded(snapshot);
                }
                Err(error) => warn!(document = %id, %error, "failed to read hosted document"),
            }
        }

        info!("starting a new hosted snapshot");
        LoadOutcome::Seeded(Snapshot::with_admin_account())
    }

    async fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        match self.document_id() {
            Some(id) => {
                self.host.replace(&id, snapshot).await?;
                info!(document = %id, "snapshot saved to document host");
            }
            None => {
                let id = self.host.create(snapshot).await?;
                info!(document = %id, "created hosted document");
                // The document exists now; keep addressing it even if the id
                // can't be stored, so later saves replace instead of creating.
                if let Err(cache_error) = self.kv.set(keys::DOCUMENT_ID, &id) {
                    error!(document = %id, error = %cache_error, "failed to cache document id");
                    *self.uncached() = Some(id);
                }
            }
        }
        Ok(())
    }
}
