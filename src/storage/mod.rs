pub mod file;
pub mod memory;
pub mod slots;

use std::sync::Arc;

use crate::error::StoreResult;

pub use file::FileKvStore;
pub use memory::MemoryKvStore;

/// Slot names in key-value storage.
pub mod keys {
    pub const USERS: &str = "users";
    pub const CARDS: &str = "cards";
    pub const TESTS: &str = "tests";
    pub const CHAT_MESSAGES: &str = "chatMessages";
    pub const SYSTEM_STATUS: &str = "systemStatus";
    pub const LOGS: &str = "logs";
    /// Id of the hosted document, stored as a raw string.
    pub const DOCUMENT_ID: &str = "binId";
}

/// Synchronous string key-value storage, the local persistence primitive.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

pub type SharedKeyValueStore = Arc<dyn KeyValueStore>;
