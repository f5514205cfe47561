use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Dish, DishPortion};
use crate::nutrition::ExpandedDish;
use crate::validation::ValidationIssue;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DishPortionRequest {
    #[serde(alias = "lebensmittelId")]
    pub food_id: Option<String>,
    #[serde(alias = "menge")]
    pub amount_grams: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDishRequest {
    pub name: Option<String>,
    #[serde(alias = "tageszeit")]
    pub time_of_day: Option<String>,
    #[serde(alias = "beschreibung")]
    pub description: Option<String>,
    #[serde(default, alias = "lebensmittelProGericht")]
    pub portions: Vec<DishPortionRequest>,
}

#[derive(Debug, Serialize)]
pub struct CreatedDishResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ValidationIssue>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DishQuery {
    pub expand: Option<String>,
}

impl DishQuery {
    /// `expand=food`, also accepted inside a comma separated list.
    pub fn expand_food(&self) -> bool {
        self.expand
            .as_deref()
            .map(|e| e.split(',').any(|part| part.trim().eq_ignore_ascii_case("food")))
            .unwrap_or(false)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DishPortionView {
    pub id: Uuid,
    pub food_id: Uuid,
    pub amount_grams: f64,
}

impl From<DishPortion> for DishPortionView {
    fn from(p: DishPortion) -> Self {
        Self {
            id: p.id,
            food_id: p.food_id,
            amount_grams: p.amount_grams,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DishView {
    #[serde(flatten)]
    pub dish: Dish,
    pub portions: Vec<DishPortionView>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DishResponse {
    Plain(DishView),
    Expanded(ExpandedDish),
}
