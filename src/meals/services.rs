use std::collections::{BTreeMap, HashSet};

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::dto::{CreateMealRequest, Evaluation, MealSummary};
use crate::{
    domain::{Meal, MealKcalRow, NewPortion, TimeOfDay},
    error::AppError,
    nutrition::{assemble_meal, round_half_up, KcalBreakdown, MealDetail, LIST_PRECISION},
    state::AppState,
    validation::{self, ValidationIssue},
};

fn breakdown(row: &MealKcalRow) -> KcalBreakdown {
    KcalBreakdown {
        from_dishes: row.kcal_from_dishes,
        from_foods: row.kcal_from_foods,
    }
}

pub async fn list_meals(st: &AppState) -> Result<Vec<MealSummary>, AppError> {
    let rows = st.store.list_meal_kcal().await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let kcal = breakdown(&row).rounded(LIST_PRECISION);
            MealSummary {
                id: row.id,
                time_of_day: row.time_of_day,
                kcal_from_dishes: kcal.from_dishes,
                kcal_from_foods: kcal.from_foods,
                kcal_total: kcal.total,
                created_at: row.created_at,
            }
        })
        .collect())
}

pub async fn get_meal(st: &AppState, id: Uuid) -> Result<MealDetail, AppError> {
    let graph = st
        .store
        .load_meal_graph(id)
        .await?
        .ok_or(AppError::NotFound("meal"))?;
    Ok(assemble_meal(graph))
}

async fn unresolved_dishes(st: &AppState, wanted: &[NewPortion]) -> Result<Vec<ValidationIssue>, AppError> {
    if wanted.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = wanted.iter().map(|p| p.target_id).collect();
    let found: HashSet<Uuid> = st.store.dishes_by_ids(&ids).await?.into_iter().map(|d| d.id).collect();
    Ok(validation::unresolved(wanted, &found, |i| format!("dishPortions[{i}].dishId"), "dish"))
}

async fn unresolved_foods(st: &AppState, wanted: &[NewPortion]) -> Result<Vec<ValidationIssue>, AppError> {
    if wanted.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = wanted.iter().map(|p| p.target_id).collect();
    let found: HashSet<Uuid> = st.store.foods_by_ids(&ids).await?.into_iter().map(|f| f.id).collect();
    Ok(validation::unresolved(wanted, &found, |i| format!("foodPortions[{i}].foodId"), "food"))
}

pub async fn create_meal(st: &AppState, req: CreateMealRequest) -> Result<Uuid, AppError> {
    let new = validation::validate_meal(req).map_err(AppError::Validation)?;

    let mut missing = unresolved_dishes(st, &new.dish_portions).await?;
    missing.extend(unresolved_foods(st, &new.food_portions).await?);
    if !missing.is_empty() {
        return Err(AppError::Validation(missing));
    }

    let (meal, dish_portions, food_portions) = Meal::create(new, OffsetDateTime::now_utc());
    st.store.insert_meal(&meal, &dish_portions, &food_portions).await?;
    info!(
        meal_id = %meal.id,
        time_of_day = %meal.time_of_day,
        dishes = dish_portions.len(),
        foods = food_portions.len(),
        "meal created"
    );
    Ok(meal.id)
}

/// Counts and kcal per time of day over all meals. Every time of day is
/// present, with zeros where no meal was recorded.
pub fn evaluate(rows: &[MealKcalRow]) -> Evaluation {
    let mut by_time_of_day: BTreeMap<TimeOfDay, usize> = TimeOfDay::ALL.iter().map(|t| (*t, 0)).collect();
    let mut raw_kcal: BTreeMap<TimeOfDay, f64> = TimeOfDay::ALL.iter().map(|t| (*t, 0.0)).collect();
    for row in rows {
        *by_time_of_day.entry(row.time_of_day).or_default() += 1;
        *raw_kcal.entry(row.time_of_day).or_default() += breakdown(row).total();
    }
    Evaluation {
        total: rows.len(),
        by_time_of_day,
        kcal_by_time_of_day: raw_kcal
            .into_iter()
            .map(|(t, kcal)| (t, round_half_up(kcal, LIST_PRECISION)))
            .collect(),
    }
}

pub async fn evaluation(st: &AppState) -> Result<Evaluation, AppError> {
    Ok(evaluate(&st.store.list_meal_kcal().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(time_of_day: TimeOfDay, dishes: f64, foods: f64) -> MealKcalRow {
        MealKcalRow {
            id: Uuid::new_v4(),
            time_of_day,
            created_at: OffsetDateTime::now_utc(),
            kcal_from_dishes: dishes,
            kcal_from_foods: foods,
        }
    }

    #[test]
    fn evaluation_of_nothing_lists_every_time_of_day() {
        let e = evaluate(&[]);
        assert_eq!(e.total, 0);
        assert_eq!(e.by_time_of_day.len(), TimeOfDay::ALL.len());
        assert!(e.by_time_of_day.values().all(|n| *n == 0));
        assert!(e.kcal_by_time_of_day.values().all(|k| *k == 0.0));
    }

    #[test]
    fn evaluation_groups_by_time_of_day() {
        let e = evaluate(&[
            row(TimeOfDay::Morning, 300.2, 0.0),
            row(TimeOfDay::Morning, 0.0, 100.4),
            row(TimeOfDay::Night, 50.0, 0.0),
        ]);
        assert_eq!(e.total, 3);
        assert_eq!(e.by_time_of_day[&TimeOfDay::Morning], 2);
        assert_eq!(e.by_time_of_day[&TimeOfDay::Night], 1);
        assert_eq!(e.by_time_of_day[&TimeOfDay::Noon], 0);
        assert_eq!(e.kcal_by_time_of_day[&TimeOfDay::Morning], 401.0);
        assert_eq!(e.kcal_by_time_of_day[&TimeOfDay::Night], 50.0);
    }
}
