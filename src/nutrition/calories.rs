use serde::Serialize;

use super::aggregate::{ExpandedDishPortion, MealDetail};

/// Decimal places used in list views.
pub const LIST_PRECISION: u32 = 0;
/// Decimal places used in detail views.
pub const DETAIL_PRECISION: u32 = 1;

/// kcal contributed by `grams` of a food with `kcal_per_100g`, rounded half-up
/// to `precision` decimal places.
pub fn kcal_for_amount(kcal_per_100g: f64, grams: f64, precision: u32) -> f64 {
    round_half_up(raw_kcal(kcal_per_100g, grams), precision)
}

pub(crate) fn raw_kcal(kcal_per_100g: f64, grams: f64) -> f64 {
    kcal_per_100g * grams / 100.0
}

/// Rounds half-up for non-negative values. The nudge is relative to the scaled
/// value so decimal halves stored just below the midpoint (8.05 as 8.0499..)
/// still round up at any magnitude.
pub fn round_half_up(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    (scaled + scaled.abs() * MIDPOINT_TOLERANCE).round() / factor
}

/// Relative slack for f64 products of decimal inputs that land next to a half.
const MIDPOINT_TOLERANCE: f64 = 1e-9;

/// Summed kcal of all ingredients of a dish. This is the dish's kcal per 100g
/// when it is portioned into a meal.
pub fn dish_kcal_per_100g(portions: &[ExpandedDishPortion]) -> f64 {
    portions
        .iter()
        .map(|p| raw_kcal(p.food.kcal, p.amount_grams))
        .sum()
}

/// Unrounded kcal sums of one meal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KcalBreakdown {
    pub from_dishes: f64,
    pub from_foods: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KcalSummary {
    pub from_dishes: f64,
    pub from_foods: f64,
    pub total: f64,
}

impl KcalBreakdown {
    pub fn of_meal(meal: &MealDetail) -> Self {
        Self {
            from_dishes: kcal_from_dishes(meal),
            from_foods: kcal_from_foods(meal),
        }
    }

    pub fn total(&self) -> f64 {
        self.from_dishes + self.from_foods
    }

    /// Rounds each figure independently; the total is rounded from the raw sum.
    pub fn rounded(&self, precision: u32) -> KcalSummary {
        KcalSummary {
            from_dishes: round_half_up(self.from_dishes, precision),
            from_foods: round_half_up(self.from_foods, precision),
            total: round_half_up(self.total(), precision),
        }
    }
}

pub fn kcal_from_dishes(meal: &MealDetail) -> f64 {
    meal.dish_portions
        .iter()
        .map(|p| raw_kcal(p.dish.kcal_per_100g, p.amount_grams))
        .sum()
}

pub fn kcal_from_foods(meal: &MealDetail) -> f64 {
    meal.food_portions
        .iter()
        .map(|p| raw_kcal(p.food.kcal, p.amount_grams))
        .sum()
}
