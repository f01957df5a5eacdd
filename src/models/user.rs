use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::models::{CardId, Fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// An account keyed by login in [`crate::Snapshot::users`].
///
/// Passwords are stored and compared in plaintext. Fields this layer does
/// not know about are kept in `extra` so they survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub password: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_cards: Option<BTreeSet<CardId>>,
    #[serde(flatten)]
    pub extra: Fields,
}

impl User {
    pub fn new(
        password: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        email: impl Into<String>,
    ) -> Self {
        Self {
            password: password.into(),
            name: name.into(),
            role,
            email: email.into(),
            class: None,
            points: None,
            completed_cards: None,
            extra: Fields::new(),
        }
    }

    /// A student starts with zero points and no completed cards.
    pub fn student(
        password: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        let mut user = Self::new(password, name, Role::Student, email);
        user.class = Some(class.into());
        user.points = Some(0);
        user.completed_cards = Some(BTreeSet::new());
        user
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password == candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_uses_lowercase_wire_names() {
        assert_eq!(serde_json::to_value(Role::Teacher).unwrap(), json!("teacher"));
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("janitor".parse::<Role>().is_err());
    }

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let user = User::new("pw", "Ann", Role::Admin, "ann@example.com");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            json!({"password": "pw", "name": "Ann", "role": "admin", "email": "ann@example.com"})
        );
    }

    #[test]
    fn student_fields_use_camel_case() {
        let user = User::student("pw", "Ivan", "ivan@example.com", "4А");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["class"], json!("4А"));
        assert_eq!(value["points"], json!(0));
        assert_eq!(value["completedCards"], json!([]));
    }

    #[test]
    fn unknown_fields_survive_round_trip() {
        let raw = json!({
            "password": "pw",
            "name": "Bob",
            "role": "student",
            "email": "bob@example.com",
            "completedCards": [3, "x"],
            "avatar": "cat.png"
        });
        let user: User = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(user.extra.get("avatar"), Some(&json!("cat.png")));
        assert!(user.completed_cards.as_ref().unwrap().contains(&CardId::from(3)));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn password_comparison_is_exact() {
        let user = User::new("Secret", "Ann", Role::Admin, "a@b.c");
        assert!(user.password_matches("Secret"));
        assert!(!user.password_matches("secret"));
    }
}
