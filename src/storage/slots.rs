//! Mapping between a [`Snapshot`] and its six key-value slots.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::StoreResult;
use crate::models::Snapshot;
use crate::storage::{KeyValueStore, keys};

/// Read every slot, substituting the field's empty default for anything
/// missing, unreadable or undecodable. Never fails.
pub fn read_snapshot(kv: &dyn KeyValueStore) -> Snapshot {
    Snapshot {
        users: read_slot(kv, keys::USERS),
        cards: read_slot(kv, keys::CARDS),
        tests: read_slot(kv, keys::TESTS),
        chat_messages: read_slot(kv, keys::CHAT_MESSAGES),
        system_status: read_slot(kv, keys::SYSTEM_STATUS),
        logs: read_slot(kv, keys::LOGS),
    }
}

/// Write each field into its own slot.
pub fn write_snapshot(kv: &dyn KeyValueStore, snapshot: &Snapshot) -> StoreResult<()> {
    write_slot(kv, keys::USERS, &snapshot.users)?;
    write_slot(kv, keys::CARDS, &snapshot.cards)?;
    write_slot(kv, keys::TESTS, &snapshot.tests)?;
    write_slot(kv, keys::CHAT_MESSAGES, &snapshot.chat_messages)?;
    write_slot(kv, keys::SYSTEM_STATUS, &snapshot.system_status)?;
    write_slot(kv, keys::LOGS, &snapshot.logs)?;
    Ok(())
}

fn read_slot<T: DeserializeOwned + Default>(kv: &dyn KeyValueStore, key: &str) -> T {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(error) => {
            warn!(key, %error, "failed to read storage slot, using default");
            return T::default();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|error| {
        warn!(key, %error, "malformed storage slot, using default");
        T::default()
    })
}

fn write_slot<T: Serialize>(kv: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()> {
    let encoded = serde_json::to_string(value)?;
    kv.set(key, &encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, SystemStatus};
    use crate::storage::MemoryKvStore;
    use serde_json::json;

    #[test]
    fn empty_storage_yields_defaults() {
        let kv = MemoryKvStore::new();
        assert_eq!(read_snapshot(&kv), Snapshot::default());
    }

    #[test]
    fn each_field_lands_in_its_own_slot() {
        let kv = MemoryKvStore::new();
        let mut snapshot = Snapshot::with_default_accounts();
        snapshot.cards.push(Card::new(1).with_field("front", "a"));
        snapshot.system_status = SystemStatus {
            teachers: false,
            students: true,
        };
        write_snapshot(&kv, &snapshot).unwrap();

        let mut stored = kv.keys();
        stored.sort();
        assert_eq!(
            stored,
            vec!["cards", "chatMessages", "logs", "systemStatus", "tests", "users"]
        );
        assert_eq!(
            kv.get(keys::CARDS).unwrap().as_deref(),
            Some(r#"[{"id":1,"front":"a"}]"#)
        );
        assert_eq!(read_snapshot(&kv), snapshot);
    }

    #[test]
    fn corrupt_slot_falls_back_without_touching_others() {
        let kv = MemoryKvStore::new();
        kv.set(keys::CARDS, "[{").unwrap();
        kv.set(keys::LOGS, &json!([{"action": "login"}]).to_string()).unwrap();
        kv.set(keys::SYSTEM_STATUS, "42").unwrap();

        let snapshot = read_snapshot(&kv);
        assert!(snapshot.cards.is_empty());
        assert_eq!(snapshot.logs.len(), 1);
        assert_eq!(snapshot.system_status, SystemStatus::default());
    }
}
