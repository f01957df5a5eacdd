pub mod fetch;
pub mod jsonbin;
pub mod local;
pub mod remote;

#[cfg(test)]
pub(crate) mod test_support;

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::config::StoreConfig;
use crate::error::StoreResult;
use crate::models::Snapshot;
use crate::storage::{FileKvStore, SharedKeyValueStore};

pub use fetch::FetchBackend;
pub use jsonbin::{DocumentHost, JsonBinClient};
pub use local::LocalBackend;
pub use remote::RemoteBackend;

/// Which backing strategy a store persists through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Fetch,
    Remote,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BackendKind::Local => "local",
            BackendKind::Fetch => "fetch",
            BackendKind::Remote => "remote",
        };
        f.write_str(name)
    }
}

/// Result of loading from a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// Snapshot read from the backing store (or its fallback).
    Loaded(Snapshot),
    /// Snapshot manufactured with default accounts; it has to be saved.
    Seeded(Snapshot),
}

impl LoadOutcome {
    pub fn is_seeded(&self) -> bool {
        matches!(self, LoadOutcome::Seeded(_))
    }

    pub fn into_snapshot(self) -> Snapshot {
        match self {
            LoadOutcome::Loaded(snapshot) | LoadOutcome::Seeded(snapshot) => snapshot,
        }
    }
}

/// A persistence target for whole snapshots.
///
/// `load` never fails: every error is logged and replaced by a fallback.
/// `save` reports errors so the caller can decide to log and absorb them.
#[async_trait]
pub trait Backend: Send + Sync {
    fn kind(&self) -> BackendKind;
    async fn load(&self) -> LoadOutcome;
    async fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;
}

/// Build the backend selected by `config`, with key-value storage under
/// `<data_dir>/storage`.
pub fn open_backend(config: &StoreConfig) -> Result<Arc<dyn Backend>> {
    let storage_dir = config.resolve_data_dir()?.join("storage");
    let kv: SharedKeyValueStore = Arc::new(
        FileKvStore::open(&storage_dir)
            .with_context(|| format!("Failed to open storage at {}", storage_dir.display()))?,
    );

    let backend: Arc<dyn Backend> = match config.backend {
        BackendKind::Local => Arc::new(LocalBackend::new(kv)),
        BackendKind::Fetch => Arc::new(FetchBackend::new(http_client()?, &config.fetch.url, kv)),
        BackendKind::Remote => {
            let client = JsonBinClient::new(
                http_client()?,
                &config.remote.api_url,
                &config.remote.master_key,
            )
            .with_bin_name(&config.remote.bin_name);
            Arc::new(RemoteBackend::new(Arc::new(client), kv))
        }
    };
    Ok(backend)
}

fn http_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(concat!("classroom-store/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")
}
