use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::dishes::repo_types::stored_time_of_day;
use crate::domain::{Meal, MealKcalRow};

#[derive(Debug, FromRow)]
pub struct MealRow {
    pub id: Uuid,
    pub time_of_day: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<MealRow> for Meal {
    fn from(r: MealRow) -> Self {
        Self {
            time_of_day: stored_time_of_day(&r.time_of_day, r.id),
            id: r.id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Row of the `v_meal_kcal` view.
#[derive(Debug, FromRow)]
pub struct MealKcalViewRow {
    pub id: Uuid,
    pub time_of_day: String,
    pub created_at: OffsetDateTime,
    pub kcal_from_dishes: f64,
    pub kcal_from_foods: f64,
}

impl From<MealKcalViewRow> for MealKcalRow {
    fn from(r: MealKcalViewRow) -> Self {
        Self {
            time_of_day: stored_time_of_day(&r.time_of_day, r.id),
            id: r.id,
            created_at: r.created_at,
            kcal_from_dishes: r.kcal_from_dishes,
            kcal_from_foods: r.kcal_from_foods,
        }
    }
}
