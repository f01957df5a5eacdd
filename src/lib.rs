//! classroom-store - persistence layer for a small classroom app
//!
//! Keeps one in-memory [`Snapshot`] of users, flashcards, tests, chat
//! messages, the system status pair and logs, and writes the whole snapshot
//! back through a pluggable [`Backend`] after every change:
//! - local key-value storage, seeding default accounts on first run
//! - a static JSON resource with key-value fallback
//! - a hosted JSON document with periodic background flush
//!
//! JSON export/import gives a manual backup path on top of any backend.

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod storage;
pub mod store;

pub use backend::{Backend, BackendKind, LoadOutcome, open_backend};
pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use models::{Card, CardId, ExportArtifact, Record, Role, Snapshot, SystemStatus, User};
pub use store::DataStore;
