use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{MealKcalViewRow, MealRow};
use crate::domain::{Meal, MealDishPortion, MealFoodPortion, MealKcalRow};
use crate::nutrition::MealGraph;
use crate::{dishes, foods};

/// Insert a meal and both kinds of portions within a transaction.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    meal: &Meal,
    dish_portions: &[MealDishPortion],
    food_portions: &[MealFoodPortion],
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO meals (id, time_of_day, created_at, updated_at)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(meal.id)
    .bind(meal.time_of_day.as_str())
    .bind(meal.created_at)
    .bind(meal.updated_at)
    .execute(&mut **tx)
    .await?;

    for p in dish_portions {
        sqlx::query(
            r#"
            INSERT INTO meal_dish_portions (id, meal_id, dish_id, amount_grams)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(p.id)
        .bind(p.meal_id)
        .bind(p.dish_id)
        .bind(p.amount_grams)
        .execute(&mut **tx)
        .await?;
    }

    for p in food_portions {
        sqlx::query(
            r#"
            INSERT INTO meal_food_portions (id, meal_id, food_id, amount_grams)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(p.id)
        .bind(p.meal_id)
        .bind(p.food_id)
        .bind(p.amount_grams)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Read a meal and everything it references inside one transaction, so the
/// in-memory join sees a single snapshot.
pub async fn load_graph(db: &PgPool, meal_id: Uuid) -> sqlx::Result<Option<MealGraph>> {
    let mut tx = db.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let Some(meal) = sqlx::query_as::<_, MealRow>(
        r#"
        SELECT id, time_of_day, created_at, updated_at
          FROM meals
         WHERE id = $1
        "#,
    )
    .bind(meal_id)
    .fetch_optional(&mut *tx)
    .await?
    else {
        return Ok(None);
    };

    let mut graph = MealGraph::new(meal.into());
    graph.dish_portions = sqlx::query_as::<_, MealDishPortion>(
        r#"
        SELECT id, meal_id, dish_id, amount_grams
          FROM meal_dish_portions
         WHERE meal_id = $1
         ORDER BY id ASC
        "#,
    )
    .bind(meal_id)
    .fetch_all(&mut *tx)
    .await?;
    graph.food_portions = sqlx::query_as::<_, MealFoodPortion>(
        r#"
        SELECT id, meal_id, food_id, amount_grams
          FROM meal_food_portions
         WHERE meal_id = $1
         ORDER BY id ASC
        "#,
    )
    .bind(meal_id)
    .fetch_all(&mut *tx)
    .await?;

    let dish_ids = graph.dish_ids();
    graph.dishes = dishes::repo::by_ids(&mut *tx, &dish_ids).await?;
    graph.dish_ingredients = dishes::repo::portions_of(&mut *tx, &dish_ids).await?;
    let food_ids = graph.food_ids();
    graph.foods = foods::repo::by_ids(&mut *tx, &food_ids).await?;

    tx.commit().await?;
    Ok(Some(graph))
}

pub async fn list_kcal(db: &PgPool) -> sqlx::Result<Vec<MealKcalRow>> {
    let rows = sqlx::query_as::<_, MealKcalViewRow>(
        r#"
        SELECT id, time_of_day, created_at, kcal_from_dishes, kcal_from_foods
          FROM v_meal_kcal
         ORDER BY created_at ASC, id ASC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(MealKcalRow::from).collect())
}
