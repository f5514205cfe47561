use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use super::{NutritionStore, StoreError};
use crate::domain::{Dish, DishPortion, Food, Meal, MealDishPortion, MealFoodPortion, MealKcalRow};
use crate::nutrition::MealGraph;
use crate::{dishes, foods, meals};

const FOREIGN_KEY_VIOLATION: &str = "23503";

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}

/// Maps a failed insert; a foreign-key violation means a referenced row is gone.
fn insert_error(e: sqlx::Error, what: &str) -> StoreError {
    if is_foreign_key_violation(&e) {
        warn!(error = %e, what, "insert references missing row");
        StoreError::MissingReference(what.to_string())
    } else {
        StoreError::Database(e)
    }
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("run migrations")?;
        info!("migrations applied");
        Ok(())
    }
}

#[async_trait]
impl NutritionStore for PgStore {
    async fn list_foods(&self) -> Result<Vec<Food>, StoreError> {
        Ok(foods::repo::list(&self.pool).await?)
    }

    async fn foods_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Food>, StoreError> {
        Ok(foods::repo::by_ids(&self.pool, ids).await?)
    }

    async fn insert_food(&self, food: &Food) -> Result<(), StoreError> {
        Ok(foods::repo::insert(&self.pool, food).await?)
    }

    async fn delete_food(&self, id: Uuid) -> Result<(), StoreError> {
        match foods::repo::delete(&self.pool, id).await {
            Ok(0) => Err(StoreError::NotFound("food")),
            Ok(_) => Ok(()),
            Err(e) if is_foreign_key_violation(&e) => Err(StoreError::Conflict(
                "food is still used by a dish or meal".into(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_dishes(&self) -> Result<Vec<Dish>, StoreError> {
        Ok(dishes::repo::list(&self.pool).await?)
    }

    async fn dishes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Dish>, StoreError> {
        Ok(dishes::repo::by_ids(&self.pool, ids).await?)
    }

    async fn get_dish(&self, id: Uuid) -> Result<Option<(Dish, Vec<DishPortion>)>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let Some(dish) = dishes::repo::by_ids(&mut *tx, &[id]).await?.into_iter().next() else {
            return Ok(None);
        };
        let portions = dishes::repo::portions_of(&mut *tx, &[id]).await?;
        tx.commit().await?;
        Ok(Some((dish, portions)))
    }

    async fn insert_dish(&self, dish: &Dish, portions: &[DishPortion]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        dishes::repo::insert_tx(&mut tx, dish, portions)
            .await
            .map_err(|e| insert_error(e, "portions"))?;
        tx.commit().await?;
        Ok(())
    }

    async fn insert_meal(
        &self,
        meal: &Meal,
        dish_portions: &[MealDishPortion],
        food_portions: &[MealFoodPortion],
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        meals::repo::insert_tx(&mut tx, meal, dish_portions, food_portions)
            .await
            .map_err(|e| insert_error(e, "portions"))?;
        tx.commit().await?;
        Ok(())
    }

    async fn load_meal_graph(&self, id: Uuid) -> Result<Option<MealGraph>, StoreError> {
        Ok(meals::repo::load_graph(&self.pool, id).await?)
    }

    async fn list_meal_kcal(&self) -> Result<Vec<MealKcalRow>, StoreError> {
        Ok(meals::repo::list_kcal(&self.pool).await?)
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}
