use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::backend::{Backend, BackendKind};
use crate::error::StoreResult;
use crate::models::export::read_import_file;
use crate::models::{Card, CardId, ExportArtifact, Record, Snapshot, SystemStatus, User};

/// Owns the in-memory snapshot and mediates every read and write of it.
///
/// Every mutation persists the whole snapshot before returning. Writes go
/// through a single gate, so at most one backend write is in flight; a save
/// requested while another is queued is skipped once a write that started
/// after the request has succeeded, since that write already carried the
/// requested state.
pub struct DataStore {
    backend: Arc<dyn Backend>,
    snapshot: RwLock<Option<Snapshot>>,
    writes_started: AtomicU64,
    writer: Mutex<WriterState>,
}

#[derive(Debug, Default)]
struct WriterState {
    /// Sequence number of the most recent successful write.
    last_success: Option<u64>,
}

impl DataStore {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            snapshot: RwLock::new(None),
            writes_started: AtomicU64::new(0),
            writer: Mutex::new(WriterState::default()),
        }
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    /// Load the snapshot from the backend. Never fails; a freshly seeded
    /// snapshot is persisted before this returns.
    pub async fn load(&self) -> Snapshot {
        let outcome = self.backend.load().await;
        let seeded = outcome.is_seeded();
        let snapshot = outcome.into_snapshot();
        *self.snapshot.write().await = Some(snapshot.clone());

        if seeded {
            self.save().await;
        }
        snapshot
    }

    pub async fn is_loaded(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    pub async fn snapshot(&self) -> Option<Snapshot> {
        self.snapshot.read().await.clone()
    }

    /// Persist the whole snapshot. A no-op when nothing is loaded. Failures
    /// are logged and absorbed.
    pub async fn save(&self) {
        let requested_after = self.writes_started.load(Ordering::SeqCst);
        let mut writer = self.writer.lock().await;

        if writer.last_success.is_some_and(|seq| seq > requested_after) {
            debug!("save covered by a later write");
            return;
        }

        // Claim a sequence number before reading, so the copy includes every
        // mutation made before a request that this write may satisfy.
        let seq = self.writes_started.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(snapshot) = self.snapshot.read().await.clone() else {
            return;
        };

        match self.backend.save(&snapshot).await {
            Ok(()) => {
                writer.last_success = Some(seq);
                debug!(seq, backend = %self.backend.kind(), "snapshot saved");
            }
            Err(error) => {
                warn!(seq, backend = %self.backend.kind(), %error, "failed to save snapshot");
            }
        }
    }

    pub async fn users(&self) -> BTreeMap<String, User> {
        self.read(|snapshot| snapshot.users.clone()).await
    }

    pub async fn user(&self, login: &str) -> Option<User> {
        self.read(|snapshot| snapshot.users.get(login).cloned()).await
    }

    /// The user for `login` if `password` matches exactly.
    pub async fn authenticate(&self, login: &str, password: &str) -> Option<User> {
        self.user(login)
            .await
            .filter(|user| user.password_matches(password))
    }

    /// Insert or replace the user stored under `login`.
    pub async fn set_user(&self, login: impl Into<String>, user: User) {
        let login = login.into();
        self.mutate(move |snapshot| {
            snapshot.users.insert(login, user);
        })
        .await;
    }

    pub async fn cards(&self) -> Vec<Card> {
        self.read(|snapshot| snapshot.cards.clone()).await
    }

    pub async fn add_card(&self, card: Card) {
        self.mutate(move |snapshot| snapshot.cards.push(card)).await;
    }

    /// Remove every card with this id and return how many went. Nothing is
    /// saved when no snapshot is loaded.
    pub async fn delete_card(&self, id: &CardId) -> usize {
        let removed = {
            let mut guard = self.snapshot.write().await;
            let Some(snapshot) = guard.as_mut() else {
                return 0;
            };
            snapshot.remove_cards(id)
        };
        self.save().await;
        removed
    }

    pub async fn tests(&self) -> Vec<Record> {
        self.read(|snapshot| snapshot.tests.clone()).await
    }

    pub async fn add_test(&self, test: Record) {
        self.mutate(move |snapshot| snapshot.tests.push(test)).await;
    }

    pub async fn chat_messages(&self) -> Vec<Record> {
        self.read(|snapshot| snapshot.chat_messages.clone()).await
    }

    pub async fn add_chat_message(&self, message: Record) {
        self.mutate(move |snapshot| snapshot.chat_messages.push(message))
            .await;
    }

    pub async fn system_status(&self) -> SystemStatus {
        self.read(|snapshot| snapshot.system_status).await
    }

    pub async fn set_system_status(&self, status: SystemStatus) {
        self.mutate(move |snapshot| snapshot.system_status = status)
            .await;
    }

    pub async fn logs(&self) -> Vec<Record> {
        self.read(|snapshot| snapshot.logs.clone()).await
    }

    pub async fn add_log(&self, log: Record) {
        self.mutate(move |snapshot| snapshot.logs.push(log)).await;
    }

    /// Render the snapshot as `data_backup_<date>.json`. An unloaded store
    /// exports an empty snapshot.
    pub async fn export(&self) -> StoreResult<ExportArtifact> {
        let snapshot = self.snapshot().await.unwrap_or_default();
        ExportArtifact::from_snapshot(&snapshot, Utc::now().date_naive())
    }

    /// Write a timestamped backup into `dir`.
    pub async fn backup_to(&self, dir: &Path) -> StoreResult<PathBuf> {
        let snapshot = self.snapshot().await.unwrap_or_default();
        ExportArtifact::backup(&snapshot, Utc::now())?.write_to(dir)
    }

    /// Replace the snapshot with the contents of a JSON file and save it.
    /// On a read or decode error the current snapshot is left untouched.
    pub async fn import_file(&self, path: impl AsRef<Path>) -> StoreResult<Snapshot> {
        let path = path.as_ref();
        let snapshot = read_import_file(path).await.inspect_err(|error| {
            warn!(path = %path.display(), %error, "import rejected");
        })?;
        Ok(self.replace(snapshot).await)
    }

    pub async fn import_str(&self, text: &str) -> StoreResult<Snapshot> {
        let snapshot = Snapshot::from_json(text)?;
        Ok(self.replace(snapshot).await)
    }

    /// Save every `period`, starting one period from now, until the returned
    /// handle is aborted. A zero or unrepresentable period starts nothing.
    pub fn spawn_autosync(self: Arc<Self>, period: Duration) -> JoinHandle<()> {
        info!(?period, backend = %self.backend.kind(), "autosync started");
        tokio::spawn(async move {
            let start = time::Instant::now().checked_add(period);
            let Some(start) = start.filter(|_| !period.is_zero()) else {
                warn!(?period, "autosync period out of range, not flushing");
                return;
            };
            let mut ticker = time::interval_at(start, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.save().await;
            }
        })
    }

    async fn replace(&self, snapshot: Snapshot) -> Snapshot {
        *self.snapshot.write().await = Some(snapshot.clone());
        info!(
            users = snapshot.users.len(),
            cards = snapshot.cards.len(),
            "snapshot imported"
        );
        self.save().await;
        snapshot
    }

    async fn read<T: Default>(&self, f: impl FnOnce(&Snapshot) -> T) -> T {
        self.snapshot.read().await.as_ref().map(f).unwrap_or_default()
    }

    /// Apply a change, initializing an absent snapshot to empty defaults,
    /// then save.
    async fn mutate<F>(&self, apply: F)
    where
        F: FnOnce(&mut Snapshot) + Send,
    {
        {
            let mut guard = self.snapshot.write().await;
            apply(guard.get_or_insert_with(Snapshot::default));
        }
        self.save().await;
    }
}
