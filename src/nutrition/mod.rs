pub mod aggregate;
pub mod calories;

pub use aggregate::{
    assemble_meal, expand_dish, ExpandedDish, ExpandedDishPortion, ExpandedMealDishPortion,
    ExpandedMealFoodPortion, MealDetail, MealGraph,
};
pub use calories::{kcal_for_amount, round_half_up, KcalBreakdown, KcalSummary, DETAIL_PRECISION, LIST_PRECISION};
