use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::domain::Food;

const FOOD_COLUMNS: &str = r#"
    id, name, kcal, carbs, sugar, fat, protein,
    state, cultivation, recommendation, note, created_at, updated_at
"#;

/// List all foods ordered by name in byte order, matching the memory store.
pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Food>> {
    sqlx::query_as::<_, Food>(&format!(
        r#"SELECT {FOOD_COLUMNS} FROM foods ORDER BY name COLLATE "C" ASC, id ASC"#
    ))
    .fetch_all(db)
    .await
}

/// Fetch the foods whose id is in `ids`. Unknown ids are skipped.
pub async fn by_ids<'c>(db: impl PgExecutor<'c>, ids: &[Uuid]) -> sqlx::Result<Vec<Food>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    sqlx::query_as::<_, Food>(&format!(
        "SELECT {FOOD_COLUMNS} FROM foods WHERE id = ANY($1)"
    ))
    .bind(ids)
    .fetch_all(db)
    .await
}

pub async fn insert(db: &PgPool, food: &Food) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO foods (id, name, kcal, carbs, sugar, fat, protein,
                           state, cultivation, recommendation, note, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        "#,
    )
    .bind(food.id)
    .bind(&food.name)
    .bind(food.kcal)
    .bind(food.carbs)
    .bind(food.sugar)
    .bind(food.fat)
    .bind(food.protein)
    .bind(&food.state)
    .bind(&food.cultivation)
    .bind(&food.recommendation)
    .bind(&food.note)
    .bind(food.created_at)
    .bind(food.updated_at)
    .execute(db)
    .await?;
    Ok(())
}

/// Delete a food. Returns the number of deleted rows (0 or 1).
pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM foods WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
