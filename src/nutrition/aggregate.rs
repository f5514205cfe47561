//! Assembles a meal with its dishes, their ingredients and its direct foods
//! from flat rows. Unresolvable references become placeholders so a meal with
//! a dangling reference still renders and sums.

use std::collections::HashMap;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::calories::{dish_kcal_per_100g, kcal_for_amount, KcalBreakdown, KcalSummary, DETAIL_PRECISION};
use crate::domain::{Dish, DishPortion, Food, Meal, MealDishPortion, MealFoodPortion, TimeOfDay};

/// Flat rows needed to build one [`MealDetail`]. `dishes`, `dish_ingredients`
/// and `foods` may contain more or fewer rows than referenced.
#[derive(Debug, Clone)]
pub struct MealGraph {
    pub meal: Meal,
    pub dish_portions: Vec<MealDishPortion>,
    pub food_portions: Vec<MealFoodPortion>,
    pub dishes: Vec<Dish>,
    pub dish_ingredients: Vec<DishPortion>,
    pub foods: Vec<Food>,
}

impl MealGraph {
    pub fn new(meal: Meal) -> Self {
        Self {
            meal,
            dish_portions: Vec::new(),
            food_portions: Vec::new(),
            dishes: Vec::new(),
            dish_ingredients: Vec::new(),
            foods: Vec::new(),
        }
    }

    /// Ids of dishes referenced by the meal.
    pub fn dish_ids(&self) -> Vec<Uuid> {
        dedup(self.dish_portions.iter().map(|p| p.dish_id))
    }

    /// Ids of foods referenced either directly or through a dish ingredient.
    pub fn food_ids(&self) -> Vec<Uuid> {
        dedup(
            self.food_portions
                .iter()
                .map(|p| p.food_id)
                .chain(self.dish_ingredients.iter().map(|p| p.food_id)),
        )
    }
}

fn dedup(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = ids.collect();
    ids.sort();
    ids.dedup();
    ids
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedDishPortion {
    pub id: Uuid,
    pub food_id: Uuid,
    pub amount_grams: f64,
    pub food: Food,
    /// Rounded to detail precision; sums use the raw figures.
    pub kcal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedDish {
    #[serde(flatten)]
    pub dish: Dish,
    pub portions: Vec<ExpandedDishPortion>,
    pub kcal_per_100g: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedMealDishPortion {
    pub id: Uuid,
    pub dish_id: Uuid,
    pub amount_grams: f64,
    pub dish: ExpandedDish,
    pub kcal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedMealFoodPortion {
    pub id: Uuid,
    pub food_id: Uuid,
    pub amount_grams: f64,
    pub food: Food,
    pub kcal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetail {
    pub id: Uuid,
    pub time_of_day: TimeOfDay,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub dish_portions: Vec<ExpandedMealDishPortion>,
    pub food_portions: Vec<ExpandedMealFoodPortion>,
    pub kcal: KcalSummary,
}

fn food_or_placeholder(foods: &HashMap<Uuid, Food>, id: Uuid) -> Food {
    foods.get(&id).cloned().unwrap_or_else(|| Food::placeholder(id))
}

/// Expands a dish's portions with their foods, ordered by portion id.
pub fn expand_dish(
    dish: Dish,
    mut portions: Vec<DishPortion>,
    foods: &HashMap<Uuid, Food>,
) -> ExpandedDish {
    portions.sort_by_key(|p| p.id);
    let portions: Vec<ExpandedDishPortion> = portions
        .into_iter()
        .map(|p| {
            let food = food_or_placeholder(foods, p.food_id);
            ExpandedDishPortion {
                kcal: kcal_for_amount(food.kcal, p.amount_grams, DETAIL_PRECISION),
                id: p.id,
                food_id: p.food_id,
                amount_grams: p.amount_grams,
                food,
            }
        })
        .collect();
    let kcal_per_100g = dish_kcal_per_100g(&portions);
    ExpandedDish {
        dish,
        portions,
        kcal_per_100g,
    }
}

pub fn assemble_meal(graph: MealGraph) -> MealDetail {
    let MealGraph {
        meal,
        mut dish_portions,
        mut food_portions,
        dishes,
        dish_ingredients,
        foods,
    } = graph;

    let foods: HashMap<Uuid, Food> = foods.into_iter().map(|f| (f.id, f)).collect();
    let dishes: HashMap<Uuid, Dish> = dishes.into_iter().map(|d| (d.id, d)).collect();
    let mut ingredients: HashMap<Uuid, Vec<DishPortion>> = HashMap::new();
    for p in dish_ingredients {
        ingredients.entry(p.dish_id).or_default().push(p);
    }

    dish_portions.sort_by_key(|p| p.id);
    food_portions.sort_by_key(|p| p.id);

    let dish_portions = dish_portions
        .into_iter()
        .map(|p| {
            let dish = match dishes.get(&p.dish_id) {
                Some(d) => expand_dish(
                    d.clone(),
                    ingredients.get(&p.dish_id).cloned().unwrap_or_default(),
                    &foods,
                ),
                None => expand_dish(Dish::placeholder(p.dish_id), Vec::new(), &foods),
            };
            ExpandedMealDishPortion {
                kcal: kcal_for_amount(dish.kcal_per_100g, p.amount_grams, DETAIL_PRECISION),
                id: p.id,
                dish_id: p.dish_id,
                amount_grams: p.amount_grams,
                dish,
            }
        })
        .collect();

    let food_portions = food_portions
        .into_iter()
        .map(|p| {
            let food = food_or_placeholder(&foods, p.food_id);
            ExpandedMealFoodPortion {
                kcal: kcal_for_amount(food.kcal, p.amount_grams, DETAIL_PRECISION),
                id: p.id,
                food_id: p.food_id,
                amount_grams: p.amount_grams,
                food,
            }
        })
        .collect();

    let mut detail = MealDetail {
        id: meal.id,
        time_of_day: meal.time_of_day,
        created_at: meal.created_at,
        updated_at: meal.updated_at,
        dish_portions,
        food_portions,
        kcal: KcalBreakdown::default().rounded(DETAIL_PRECISION),
    };
    detail.kcal = KcalBreakdown::of_meal(&detail).rounded(DETAIL_PRECISION);
    detail
}
