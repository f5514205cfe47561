use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{header, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateDishRequest, CreatedDishResponse, DishQuery, DishResponse};
use super::services;
use crate::{
    domain::Dish,
    error::{parse_id, AppError},
    state::AppState,
};

pub fn dish_routes() -> Router<AppState> {
    Router::new()
        .route("/dishes", get(list_dishes).post(create_dish))
        .route("/dishes/:id", get(get_dish))
}

#[instrument(skip(state))]
pub async fn list_dishes(State(state): State<AppState>) -> Result<Json<Vec<Dish>>, AppError> {
    Ok(Json(state.store.list_dishes().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_dish(
    State(state): State<AppState>,
    payload: Result<Json<CreateDishRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<CreatedDishResponse>), AppError> {
    let Json(body) = payload?;
    let created = services::create_dish(&state, body).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/dishes/{}", created.id))],
        Json(created),
    ))
}

/// GET /dishes/:id[?expand=food]
#[instrument(skip(state))]
pub async fn get_dish(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(q): Query<DishQuery>,
) -> Result<Json<DishResponse>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(services::get_dish(&state, id, q.expand_food()).await?))
}
