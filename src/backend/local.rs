use async_trait::async_trait;
use tracing::info;

use crate::backend::{Backend, BackendKind, LoadOutcome};
use crate::error::StoreResult;
use crate::models::Snapshot;
use crate::storage::{SharedKeyValueStore, slots};

/// Snapshot kept in local key-value storage only.
pub struct LocalBackend {
    kv: SharedKeyValueStore,
}

impl LocalBackend {
    pub fn new(kv: SharedKeyValueStore) -> Self {
        Self { kv }
    }
}

#[async_trait]
impl Backend for LocalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    async fn load(&self) -> LoadOutcome {
        let mut snapshot = slots::read_snapshot(self.kv.as_ref());
        if snapshot.users.is_empty() {
            info!("no users in local storage, installing default accounts");
            snapshot.users = Snapshot::default_accounts();
            return LoadOutcome::Seeded(snapshot);
        }

        info!(
            users = snapshot.users.len(),
            cards = snapshot.cards.len(),
            "snapshot loaded from local storage"
        );
        LoadOutcome::Loaded(snapshot)
    }

    async fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        slots::write_snapshot(self.kv.as_ref(), snapshot)
    }
}
