use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    routing::{delete, get},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateFoodRequest, CreatedResponse};
use super::services;
use crate::{
    domain::Food,
    error::{parse_id, AppError},
    state::AppState,
};

pub fn food_routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", delete(delete_food))
}

#[instrument(skip(state))]
pub async fn list_foods(State(state): State<AppState>) -> Result<Json<Vec<Food>>, AppError> {
    Ok(Json(state.store.list_foods().await?))
}

#[instrument(skip(state, payload))]
pub async fn create_food(
    State(state): State<AppState>,
    payload: Result<Json<CreateFoodRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<CreatedResponse>), AppError> {
    let Json(body) = payload?;
    let food = services::create_food(&state, body).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/foods/{}", food.id))],
        Json(CreatedResponse { id: food.id }),
    ))
}

#[instrument(skip(state))]
pub async fn delete_food(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let id = parse_id(&id)?;
    services::delete_food(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::test_support::{send, TestRequest};
    use crate::state::AppState;

    #[tokio::test]
    async fn create_then_list_orders_by_name() {
        let state = AppState::fake();
        for name in ["Zucchini", "Apfel", "Mango"] {
            let (status, _) = send(&state, TestRequest::post("/api/v1/foods").json(json!({"name": name, "kcal": "10"}))).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&state, TestRequest::get("/api/v1/foods")).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body.as_array().unwrap().iter().map(|f| f["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Apfel", "Mango", "Zucchini"]);
        assert_eq!(body[0]["kcal"], 10.0);
        assert_eq!(body[0]["carbs"], 0.0);

        let (_, again) = send(&state, TestRequest::get("/api/v1/foods")).await;
        assert_eq!(body, again);
    }

    #[tokio::test]
    async fn create_rejects_empty_name_with_issues() {
        let state = AppState::fake();
        let (status, body) = send(&state, TestRequest::post("/api/v1/foods").json(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["issues"][0]["field"], "name");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let state = AppState::fake();
        let (status, body) = send(&state, TestRequest::post("/api/v1/foods").raw_json("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["issues"][0]["field"], "body");
    }

    #[tokio::test]
    async fn delete_status_codes() {
        let state = AppState::fake();
        let (_, created) = send(&state, TestRequest::post("/api/v1/foods").json(json!({"name": "Reis", "kcal": 350}))).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (status, _) = send(&state, TestRequest::delete("/api/v1/foods/not-a-uuid")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&state, TestRequest::delete(&format!("/api/v1/foods/{id}"))).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&state, TestRequest::delete(&format!("/api/v1/foods/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_referenced_food_conflicts_and_keeps_it() {
        let state = AppState::fake();
        let (_, created) = send(&state, TestRequest::post("/api/v1/foods").json(json!({"name": "Nudeln", "kcal": 360}))).await;
        let food_id = created["id"].as_str().unwrap().to_string();
        let (status, _) = send(
            &state,
            TestRequest::post("/api/v1/dishes").json(json!({
                "name": "Pasta",
                "timeOfDay": "noon",
                "portions": [{"foodId": food_id, "amountGrams": 125}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&state, TestRequest::delete(&format!("/api/v1/foods/{food_id}"))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("still used"));

        let (_, foods) = send(&state, TestRequest::get("/api/v1/foods")).await;
        assert_eq!(foods.as_array().unwrap().len(), 1);
        assert_eq!(foods[0]["id"], food_id);
    }
}
