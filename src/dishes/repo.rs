use sqlx::{PgExecutor, PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::DishRow;
use crate::domain::{Dish, DishPortion};

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Dish>> {
    let rows = sqlx::query_as::<_, DishRow>(
        r#"
        SELECT id, name, time_of_day, description, created_at, updated_at
        FROM dishes
        ORDER BY name COLLATE "C" ASC, id ASC
        "#,
    )
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(Dish::from).collect())
}

pub async fn by_ids<'c>(db: impl PgExecutor<'c>, ids: &[Uuid]) -> sqlx::Result<Vec<Dish>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, DishRow>(
        r#"
        SELECT id, name, time_of_day, description, created_at, updated_at
        FROM dishes
        WHERE id = ANY($1)
        "#,
    )
    .bind(ids)
    .fetch_all(db)
    .await?;
    Ok(rows.into_iter().map(Dish::from).collect())
}

/// Portions of all given dishes, ordered by portion id.
pub async fn portions_of<'c>(
    db: impl PgExecutor<'c>,
    dish_ids: &[Uuid],
) -> sqlx::Result<Vec<DishPortion>> {
    if dish_ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, DishPortion>(
        r#"
        SELECT id, dish_id, food_id, amount_grams
          FROM dish_portions
         WHERE dish_id = ANY($1)
         ORDER BY id ASC
        "#,
    )
    .bind(dish_ids)
    .fetch_all(db)
    .await
}

/// Insert a dish and its portions within a transaction.
pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    dish: &Dish,
    portions: &[DishPortion],
) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO dishes (id, name, time_of_day, description, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(dish.id)
    .bind(&dish.name)
    .bind(dish.time_of_day.as_str())
    .bind(dish.description.as_deref())
    .bind(dish.created_at)
    .bind(dish.updated_at)
    .execute(&mut **tx)
    .await?;

    for p in portions {
        sqlx::query(
            r#"
            INSERT INTO dish_portions (id, dish_id, food_id, amount_grams)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(p.id)
        .bind(p.dish_id)
        .bind(p.food_id)
        .bind(p.amount_grams)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
