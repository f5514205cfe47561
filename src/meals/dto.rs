use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::TimeOfDay;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDishPortionRequest {
    #[serde(alias = "gerichtId")]
    pub dish_id: Option<String>,
    #[serde(alias = "menge")]
    pub amount_grams: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealFoodPortionRequest {
    #[serde(alias = "lebensmittelId")]
    pub food_id: Option<String>,
    #[serde(alias = "menge")]
    pub amount_grams: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    #[serde(alias = "tageszeit")]
    pub time_of_day: Option<String>,
    #[serde(default, alias = "mengeProGericht")]
    pub dish_portions: Vec<MealDishPortionRequest>,
    #[serde(default, alias = "mengeProLebensmittel")]
    pub food_portions: Vec<MealFoodPortionRequest>,
}

/// One row of `GET /meals`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealSummary {
    pub id: Uuid,
    pub time_of_day: TimeOfDay,
    pub kcal_from_dishes: f64,
    pub kcal_from_foods: f64,
    pub kcal_total: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub total: usize,
    pub by_time_of_day: BTreeMap<TimeOfDay, usize>,
    pub kcal_by_time_of_day: BTreeMap<TimeOfDay, f64>,
}
