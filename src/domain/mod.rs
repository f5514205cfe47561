mod dish;
mod food;
mod meal;
mod time_of_day;

pub use dish::{Dish, DishPortion, NewDish, NewPortion};
pub use food::{Food, NewFood, UNKNOWN_NAME};
pub use meal::{Meal, MealDishPortion, MealFoodPortion, MealKcalRow, NewMeal};
pub use time_of_day::TimeOfDay;
