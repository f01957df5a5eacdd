use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StoreResult;
use crate::models::{Card, CardId, Record, Role, User};

/// Global feature toggles for teacher and student access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub teachers: bool,
    pub students: bool,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            teachers: true,
            students: true,
        }
    }
}

/// The full application state, loaded and saved as a unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub users: BTreeMap<String, User>,
    #[serde(default)]
    pub cards: Vec<Card>,
    #[serde(default)]
    pub tests: Vec<Record>,
    #[serde(default)]
    pub chat_messages: Vec<Record>,
    #[serde(default)]
    pub system_status: SystemStatus,
    #[serde(default)]
    pub logs: Vec<Record>,
}

impl Snapshot {
    /// Decode a whole snapshot. Missing fields take their defaults; only a
    /// document that is not an object, or a card without a string or number
    /// id, is rejected.
    pub fn from_json(text: &str) -> StoreResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_pretty_json(&self) -> StoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Accounts installed when local storage holds no users.
    pub fn default_accounts() -> BTreeMap<String, User> {
        let mut users = BTreeMap::new();
        users.insert("admin".to_string(), admin_account());
        users.insert(
            "teacher1".to_string(),
            User::new("teacher123", "Мария Ивановна", Role::Teacher, "teacher@uchis.ru"),
        );
        users.insert(
            "student1".to_string(),
            User::student("student123", "Иван Петров", "student@uchis.ru", "4А"),
        );
        users
    }

    /// Snapshot with the three default accounts and nothing else.
    pub fn with_default_accounts() -> Self {
        Self {
            users: Self::default_accounts(),
            ..Self::default()
        }
    }

    /// Snapshot a fresh hosted document starts from: one admin account.
    pub fn with_admin_account() -> Self {
        let mut users = BTreeMap::new();
        users.insert("admin".to_string(), admin_account());
        Self {
            users,
            ..Self::default()
        }
    }

    /// Remove every card with the given id. Returns how many were removed.
    pub fn remove_cards(&mut self, id: &CardId) -> usize {
        let before = self.cards.len();
        self.cards.retain(|card| &card.id != id);
        before - self.cards.len()
    }
}

fn admin_account() -> User {
    User::new("admin123", "Администратор", Role::Admin, "admin@uchis.ru")
}
