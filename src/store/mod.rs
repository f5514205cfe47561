use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Dish, DishPortion, Food, Meal, MealDishPortion, MealFoodPortion, MealKcalRow};
use crate::nutrition::MealGraph;

mod memory;
mod pg;

pub use memory::MemoryStore;
pub use pg::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A delete was blocked because other rows still reference the target.
    #[error("{0}")]
    Conflict(String),

    /// An insert referenced a row that does not exist.
    #[error("missing reference in {0}")]
    MissingReference(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence for foods, dishes and meals.
///
/// Multi-row writes (`insert_dish`, `insert_meal`) are atomic: either every row
/// is visible afterwards or none is.
#[async_trait]
pub trait NutritionStore: Send + Sync {
    /// All foods ordered by name, then id.
    async fn list_foods(&self) -> Result<Vec<Food>, StoreError>;
    async fn foods_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Food>, StoreError>;
    async fn insert_food(&self, food: &Food) -> Result<(), StoreError>;
    /// Fails with `NotFound` or, if a portion references the food, `Conflict`.
    async fn delete_food(&self, id: Uuid) -> Result<(), StoreError>;

    /// All dishes ordered by name, then id. Portions are not loaded.
    async fn list_dishes(&self) -> Result<Vec<Dish>, StoreError>;
    async fn dishes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Dish>, StoreError>;
    async fn get_dish(&self, id: Uuid) -> Result<Option<(Dish, Vec<DishPortion>)>, StoreError>;
    async fn insert_dish(&self, dish: &Dish, portions: &[DishPortion]) -> Result<(), StoreError>;

    async fn insert_meal(
        &self,
        meal: &Meal,
        dish_portions: &[MealDishPortion],
        food_portions: &[MealFoodPortion],
    ) -> Result<(), StoreError>;
    /// Every row needed to assemble one meal, read consistently.
    async fn load_meal_graph(&self, id: Uuid) -> Result<Option<MealGraph>, StoreError>;
    /// Unrounded kcal sums per meal ordered by creation time, then id.
    async fn list_meal_kcal(&self) -> Result<Vec<MealKcalRow>, StoreError>;

    /// Releases the underlying connections. Called once at shutdown.
    async fn close(&self);
}
