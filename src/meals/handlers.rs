use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{CreateMealRequest, Evaluation, MealSummary};
use super::services;
use crate::{
    error::{parse_id, AppError},
    foods::dto::CreatedResponse,
    nutrition::MealDetail,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(list_meals))
        .route("/meals/:id", get(get_meal))
        .route("/evaluation", get(evaluation))
}

pub fn write_routes() -> Router<AppState> {
    // "/meals/new" is matched before "/meals/:id" because static segments win
    Router::new().route("/meals/new", post(create_meal))
}

#[instrument(skip(state))]
pub async fn list_meals(State(state): State<AppState>) -> Result<Json<Vec<MealSummary>>, AppError> {
    Ok(Json(services::list_meals(&state).await?))
}

#[instrument(skip(state))]
pub async fn get_meal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MealDetail>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(services::get_meal(&state, id).await?))
}

#[instrument(skip(state, payload))]
pub async fn create_meal(
    State(state): State<AppState>,
    payload: Result<Json<CreateMealRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<CreatedResponse>), AppError> {
    let Json(body) = payload?;
    let id = services::create_meal(&state, body).await?;
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/v1/meals/{id}"))],
        Json(CreatedResponse { id }),
    ))
}

#[instrument(skip(state))]
pub async fn evaluation(State(state): State<AppState>) -> Result<Json<Evaluation>, AppError> {
    Ok(Json(services::evaluation(&state).await?))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use uuid::Uuid;

    use crate::state::AppState;
    use crate::test_support::{send, TestRequest};

    async fn create(state: &AppState, uri: &str, body: Value) -> String {
        let (status, created) = send(state, TestRequest::post(uri).json(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        created["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn food_portion_counts_towards_foods_only() {
        let state = AppState::fake();
        let food = create(&state, "/api/v1/foods", json!({"name": "Joghurt", "kcal": 80})).await;
        let meal = create(
            &state,
            "/api/v1/meals/new",
            json!({"timeOfDay": "morning", "foodPortions": [{"foodId": food, "amountGrams": 250}]}),
        )
        .await;

        let (status, list) = send(&state, TestRequest::get("/api/v1/meals")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list[0]["id"], Value::String(meal.clone()));
        assert_eq!(list[0]["kcalFromFoods"], 200.0);
        assert_eq!(list[0]["kcalFromDishes"], 0.0);
        assert_eq!(list[0]["kcalTotal"], 200.0);

        let (status, detail) = send(&state, TestRequest::get(&format!("/api/v1/meals/{meal}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(detail["timeOfDay"], "morning");
        assert_eq!(detail["foodPortions"][0]["food"]["name"], "Joghurt");
        assert_eq!(detail["kcal"]["total"], 200.0);
    }

    #[tokio::test]
    async fn dish_portion_scales_dish_kcal_per_100g() {
        let state = AppState::fake();
        let oats = create(&state, "/api/v1/foods", json!({"name": "Haferflocken", "kcal": 370})).await;
        let milk = create(&state, "/api/v1/foods", json!({"name": "Milch", "kcal": "64"})).await;
        let porridge = create(
            &state,
            "/api/v1/dishes",
            json!({
                "name": "Porridge",
                "timeOfDay": "morning",
                "portions": [
                    {"foodId": oats, "amountGrams": 50},
                    {"foodId": milk, "amountGrams": 200}
                ]
            }),
        )
        .await;
        // 185 + 128 = 313 kcal per 100g of dish
        let meal = create(
            &state,
            "/api/v1/meals/new",
            json!({"tageszeit": "Morgen", "mengeProGericht": [{"gerichtId": porridge, "menge": 150}]}),
        )
        .await;

        let (_, detail) = send(&state, TestRequest::get(&format!("/api/v1/meals/{meal}"))).await;
        let portion = &detail["dishPortions"][0];
        assert_eq!(portion["dish"]["name"], "Porridge");
        assert_eq!(portion["dish"]["kcalPer100g"], 313.0);
        assert_eq!(portion["kcal"], 469.5);
        let ingredient_kcal: f64 = portion["dish"]["portions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["kcal"].as_f64().unwrap())
            .sum();
        assert_eq!(ingredient_kcal, 313.0);
        assert_eq!(portion["dish"]["portions"].as_array().unwrap().len(), 2);
        assert_eq!(detail["kcal"]["fromDishes"], 469.5);

        let (_, list) = send(&state, TestRequest::get("/api/v1/meals")).await;
        assert_eq!(list[0]["kcalFromDishes"], 470.0);
        assert_eq!(list[0]["kcalTotal"], 470.0);
    }

    #[tokio::test]
    async fn meals_are_listed_in_creation_order() {
        let state = AppState::fake();
        let food = create(&state, "/api/v1/foods", json!({"name": "Banane", "kcal": 89})).await;
        let mut ids = Vec::new();
        for t in ["morning", "noon", "night"] {
            ids.push(
                create(
                    &state,
                    "/api/v1/meals/new",
                    json!({"timeOfDay": t, "foodPortions": [{"foodId": food, "amountGrams": 100}]}),
                )
                .await,
            );
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }

        let (_, first) = send(&state, TestRequest::get("/api/v1/meals")).await;
        let (_, second) = send(&state, TestRequest::get("/api/v1/meals")).await;
        assert_eq!(first, second);
        let listed: Vec<&str> = first.as_array().unwrap().iter().map(|m| m["id"].as_str().unwrap()).collect();
        assert_eq!(listed, ids.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn meal_without_portions_is_rejected() {
        let state = AppState::fake();
        let (status, body) =
            send(&state, TestRequest::post("/api/v1/meals/new").json(json!({"timeOfDay": "noon"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["issues"][0]["field"], "portions");

        let (_, list) = send(&state, TestRequest::get("/api/v1/meals")).await;
        assert_eq!(list, json!([]));
    }

    #[tokio::test]
    async fn meal_with_unknown_dish_is_rejected() {
        let state = AppState::fake();
        let (status, body) = send(
            &state,
            TestRequest::post("/api/v1/meals/new").json(json!({
                "timeOfDay": "noon",
                "dishPortions": [{"dishId": Uuid::new_v4(), "amountGrams": 100}]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["issues"][0]["field"], "dishPortions[0].dishId");
    }

    #[tokio::test]
    async fn unknown_and_malformed_meal_ids() {
        let state = AppState::fake();
        let (status, _) = send(&state, TestRequest::get(&format!("/api/v1/meals/{}", Uuid::new_v4()))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&state, TestRequest::get("/api/v1/meals/not-an-id")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn evaluation_counts_meals_per_time_of_day() {
        let state = AppState::fake();
        let food = create(&state, "/api/v1/foods", json!({"name": "Apfel", "kcal": 52})).await;
        for t in ["noon", "noon", "evening"] {
            create(
                &state,
                "/api/v1/meals/new",
                json!({"timeOfDay": t, "foodPortions": [{"foodId": food, "amountGrams": 200}]}),
            )
            .await;
        }

        let (status, e) = send(&state, TestRequest::get("/api/v1/evaluation")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(e["total"], 3);
        assert_eq!(e["byTimeOfDay"]["noon"], 2);
        assert_eq!(e["byTimeOfDay"]["evening"], 1);
        assert_eq!(e["byTimeOfDay"]["morning"], 0);
        assert_eq!(e["kcalByTimeOfDay"]["noon"], 208.0);
    }
}
