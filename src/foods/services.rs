use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::dto::CreateFoodRequest;
use crate::{domain::Food, error::AppError, state::AppState, validation};

pub async fn create_food(st: &AppState, req: CreateFoodRequest) -> Result<Food, AppError> {
    let new = validation::validate_food(req).map_err(AppError::Validation)?;
    let food = Food::create(new, OffsetDateTime::now_utc());
    st.store.insert_food(&food).await?;
    info!(food_id = %food.id, name = %food.name, "food created");
    Ok(food)
}

pub async fn delete_food(st: &AppState, id: Uuid) -> Result<(), AppError> {
    st.store.delete_food(id).await?;
    info!(food_id = %id, "food deleted");
    Ok(())
}
