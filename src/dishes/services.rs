use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{CreateDishRequest, CreatedDishResponse, DishResponse, DishView};
use crate::{
    domain::{Dish, Food},
    error::AppError,
    nutrition::expand_dish,
    state::AppState,
    validation::{self, ValidDish},
};

/// Validates, checks that every food exists, then writes the dish and its
/// portions in one transaction.
pub async fn create_dish(
    st: &AppState,
    req: CreateDishRequest,
) -> Result<CreatedDishResponse, AppError> {
    let ValidDish { dish: new, warnings } =
        validation::validate_dish(req).map_err(AppError::Validation)?;

    let wanted: Vec<Uuid> = new.portions.iter().map(|p| p.target_id).collect();
    let found: HashSet<Uuid> = st
        .store
        .foods_by_ids(&wanted)
        .await?
        .into_iter()
        .map(|f| f.id)
        .collect();
    let missing = validation::unresolved(
        &new.portions,
        &found,
        |i| format!("portions[{i}].foodId"),
        "food",
    );
    if !missing.is_empty() {
        return Err(AppError::Validation(missing));
    }

    if !warnings.is_empty() {
        warn!(?warnings, "dish created with warnings");
    }
    let (dish, portions) = Dish::create(new, OffsetDateTime::now_utc());
    st.store.insert_dish(&dish, &portions).await?;
    info!(dish_id = %dish.id, name = %dish.name, portions = portions.len(), "dish created");

    Ok(CreatedDishResponse {
        id: dish.id,
        warnings,
    })
}

pub async fn get_dish(st: &AppState, id: Uuid, expand_food: bool) -> Result<DishResponse, AppError> {
    let (dish, portions) = st.store.get_dish(id).await?.ok_or(AppError::NotFound("dish"))?;

    if !expand_food {
        return Ok(DishResponse::Plain(DishView {
            dish,
            portions: portions.into_iter().map(Into::into).collect(),
        }));
    }

    let mut food_ids: Vec<Uuid> = portions.iter().map(|p| p.food_id).collect();
    food_ids.sort();
    food_ids.dedup();
    let foods: HashMap<Uuid, Food> = st
        .store
        .foods_by_ids(&food_ids)
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();
    Ok(DishResponse::Expanded(expand_dish(dish, portions, &foods)))
}
