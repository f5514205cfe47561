use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Name given to placeholder entities whose id could not be resolved.
pub const UNKNOWN_NAME: &str = "(unknown)";

/// Base ingredient. Energy and macros are per 100g.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Food {
    pub id: Uuid,
    pub name: String,
    pub kcal: f64,
    pub carbs: f64,
    pub sugar: f64,
    pub fat: f64,
    pub protein: f64,
    pub state: String,
    pub cultivation: String,
    pub recommendation: String,
    pub note: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Validated food payload, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewFood {
    pub name: String,
    pub kcal: f64,
    pub carbs: f64,
    pub sugar: f64,
    pub fat: f64,
    pub protein: f64,
    pub state: String,
    pub cultivation: String,
    pub recommendation: String,
    pub note: String,
}

impl Food {
    pub fn create(new: NewFood, now: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            kcal: new.kcal,
            carbs: new.carbs,
            sugar: new.sugar,
            fat: new.fat,
            protein: new.protein,
            state: new.state,
            cultivation: new.cultivation,
            recommendation: new.recommendation,
            note: new.note,
            created_at: now,
            updated_at: now,
        }
    }

    /// Zeroed stand-in for a food that no longer exists. Keeps the id.
    pub fn placeholder(id: Uuid) -> Self {
        Self {
            id,
            name: UNKNOWN_NAME.to_string(),
            kcal: 0.0,
            carbs: 0.0,
            sugar: 0.0,
            fat: 0.0,
            protein: 0.0,
            state: String::new(),
            cultivation: String::new(),
            recommendation: String::new(),
            note: String::new(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_is_zeroed_and_keeps_id() {
        let id = Uuid::new_v4();
        let f = Food::placeholder(id);
        assert_eq!(f.id, id);
        assert_eq!(f.name, UNKNOWN_NAME);
        assert_eq!(f.kcal, 0.0);
        assert_eq!(f.protein, 0.0);
    }

    #[test]
    fn serializes_camel_case_with_rfc3339_timestamps() {
        let f = Food::create(
            NewFood {
                name: "Apfel".into(),
                kcal: 52.0,
                ..Default::default()
            },
            OffsetDateTime::UNIX_EPOCH,
        );
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["name"], "Apfel");
        assert_eq!(json["kcal"], 52.0);
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(json["createdAt"], json["updatedAt"]);
    }
}
