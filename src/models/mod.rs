pub mod card;
pub mod export;
pub mod snapshot;
pub mod user;

pub use card::{Card, CardId};
pub use export::ExportArtifact;
pub use snapshot::{Snapshot, SystemStatus};
pub use user::{Role, User};

/// Opaque JSON value used for tests, chat messages and log entries. Usually
/// an object, but any JSON value is carried as-is.
pub type Record = serde_json::Value;

/// Named fields carried alongside the typed parts of a card or user.
pub type Fields = serde_json::Map<String, serde_json::Value>;
