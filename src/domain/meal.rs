use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::{NewPortion, TimeOfDay};

#[derive(Debug, Clone, PartialEq)]
pub struct Meal {
    pub id: Uuid,
    pub time_of_day: TimeOfDay,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A dish eaten as part of a meal.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MealDishPortion {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub dish_id: Uuid,
    pub amount_grams: f64,
}

/// A food eaten directly as part of a meal.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MealFoodPortion {
    pub id: Uuid,
    pub meal_id: Uuid,
    pub food_id: Uuid,
    pub amount_grams: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMeal {
    pub time_of_day: TimeOfDay,
    pub dish_portions: Vec<NewPortion>,
    pub food_portions: Vec<NewPortion>,
}

/// Unrounded kcal sums of one meal, as produced by the listing view.
#[derive(Debug, Clone, PartialEq)]
pub struct MealKcalRow {
    pub id: Uuid,
    pub time_of_day: TimeOfDay,
    pub created_at: OffsetDateTime,
    pub kcal_from_dishes: f64,
    pub kcal_from_foods: f64,
}

impl Meal {
    pub fn create(
        new: NewMeal,
        now: OffsetDateTime,
    ) -> (Self, Vec<MealDishPortion>, Vec<MealFoodPortion>) {
        let meal = Self {
            id: Uuid::new_v4(),
            time_of_day: new.time_of_day,
            created_at: now,
            updated_at: now,
        };
        let dish_portions = new
            .dish_portions
            .into_iter()
            .map(|p| MealDishPortion {
                id: Uuid::new_v4(),
                meal_id: meal.id,
                dish_id: p.target_id,
                amount_grams: p.amount_grams,
            })
            .collect();
        let food_portions = new
            .food_portions
            .into_iter()
            .map(|p| MealFoodPortion {
                id: Uuid::new_v4(),
                meal_id: meal.id,
                food_id: p.target_id,
                amount_grams: p.amount_grams,
            })
            .collect();
        (meal, dish_portions, food_portions)
    }
}
