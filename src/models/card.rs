use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::Fields;

/// Card identifier, any JSON number or a string.
///
/// Equality follows the JSON value: `1` and `"1"` are different ids, and so
/// are `1` and `1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CardId {
    Number(Number),
    Text(String),
}

impl From<i64> for CardId {
    fn from(id: i64) -> Self {
        CardId::Number(id.into())
    }
}

impl From<i32> for CardId {
    fn from(id: i32) -> Self {
        CardId::Number(id.into())
    }
}

impl From<Number> for CardId {
    fn from(id: Number) -> Self {
        CardId::Number(id)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        CardId::Text(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        CardId::Text(id)
    }
}

impl FromStr for CardId {
    type Err = std::convert::Infallible;

    /// Anything that reads as a JSON number is a numeric id, the rest is text.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<Number>()
            .map(CardId::Number)
            .unwrap_or_else(|_| CardId::Text(s.to_string())))
    }
}

impl Ord for CardId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CardId::Number(a), CardId::Number(b)) => compare_numbers(a, b),
            (CardId::Number(_), CardId::Text(_)) => Ordering::Less,
            (CardId::Text(_), CardId::Number(_)) => Ordering::Greater,
            (CardId::Text(a), CardId::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for CardId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Integers compare exactly; anything else by value, then by its JSON text so
// that `1` and `1.0` stay distinct.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.total_cmp(&y)
        .then_with(|| a.to_string().cmp(&b.to_string()))
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CardId::Number(id) => write!(f, "{id}"),
            CardId::Text(id) => f.write_str(id),
        }
    }
}

/// A flashcard. Only `id` is interpreted here; front/back content, owner and
/// the rest are carried as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Card {
    pub fn new(id: impl Into<CardId>) -> Self {
        Self {
            id: id.into(),
            fields: Fields::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String content of a field, if present and a string.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_and_text_ids_are_distinct() {
        assert_ne!(CardId::from(1), CardId::from("1"));
        assert_eq!("42".parse::<CardId>().unwrap(), CardId::from(42));
        assert_eq!(
            "1.5".parse::<CardId>().unwrap(),
            CardId::Number(Number::from_f64(1.5).unwrap())
        );
        assert_eq!("c-1".parse::<CardId>().unwrap(), CardId::from("c-1"));
    }

    #[test]
    fn card_keeps_extra_fields_flat() {
        let raw = json!({"id": 7, "front": "2+2", "back": "4", "owner": "teacher1"});
        let card: Card = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(card.id, CardId::from(7));
        assert_eq!(card.text("front"), Some("2+2"));
        assert_eq!(serde_json::to_value(&card).unwrap(), raw);
    }

    #[test]
    fn card_without_id_is_rejected() {
        let result: Result<Card, _> = serde_json::from_value(json!({"front": "a"}));
        assert!(result.is_err());
    }

    #[test]
    fn fractional_and_large_ids_keep_their_value() {
        let raw = json!([
            {"id": 1712345678901.5_f64, "front": "a"},
            {"id": 9223372036854775808_u64},
            {"id": -3},
        ]);
        let cards: Vec<Card> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(cards[0].id.to_string(), "1712345678901.5");
        assert_eq!(cards[1].id.to_string(), "9223372036854775808");
        assert_eq!(serde_json::to_value(&cards).unwrap(), raw);
    }

    #[test]
    fn integer_and_float_ids_are_distinct_but_ordered() {
        let one = CardId::from(1);
        let one_float = CardId::Number(Number::from_f64(1.0).unwrap());
        let half = CardId::Number(Number::from_f64(0.5).unwrap());
        assert_ne!(one, one_float);
        assert_ne!(one.cmp(&one_float), Ordering::Equal);

        let mut ids = vec![CardId::from("a"), one.clone(), half.clone(), CardId::from(-2)];
        ids.sort();
        assert_eq!(ids, vec![CardId::from(-2), half, one, CardId::from("a")]);
    }

    #[test]
    fn card_with_boolean_id_is_rejected() {
        let result: Result<Card, _> = serde_json::from_value(json!({"id": true}));
        assert!(result.is_err());
    }
}
