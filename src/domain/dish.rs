use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{TimeOfDay, UNKNOWN_NAME};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: Uuid,
    pub name: String,
    pub time_of_day: TimeOfDay,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// A food inside a dish, with its quantity in grams.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DishPortion {
    pub id: Uuid,
    pub dish_id: Uuid,
    pub food_id: Uuid,
    pub amount_grams: f64,
}

/// Reference plus amount, as accepted on creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewPortion {
    pub target_id: Uuid,
    pub amount_grams: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDish {
    pub name: String,
    pub time_of_day: TimeOfDay,
    pub description: Option<String>,
    pub portions: Vec<NewPortion>,
}

impl Dish {
    /// Builds the dish row and its portion rows.
    pub fn create(new: NewDish, now: OffsetDateTime) -> (Self, Vec<DishPortion>) {
        let dish = Self {
            id: Uuid::new_v4(),
            name: new.name,
            time_of_day: new.time_of_day,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        let portions = new
            .portions
            .into_iter()
            .map(|p| DishPortion {
                id: Uuid::new_v4(),
                dish_id: dish.id,
                food_id: p.target_id,
                amount_grams: p.amount_grams,
            })
            .collect();
        (dish, portions)
    }

    pub fn placeholder(id: Uuid) -> Self {
        Self {
            id,
            name: UNKNOWN_NAME.to_string(),
            time_of_day: TimeOfDay::Unspecified,
            description: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: OffsetDateTime::UNIX_EPOCH,
        }
    }
}
