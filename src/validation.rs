//! Boundary validation: turns loosely typed request bodies into typed,
//! defaulted domain inputs, or a list of field-level issues.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::dishes::dto::CreateDishRequest;
use crate::domain::{NewDish, NewFood, NewMeal, NewPortion, TimeOfDay};
use crate::foods::dto::CreateFoodRequest;
use crate::meals::dto::CreateMealRequest;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Issues(Vec<ValidationIssue>);

impl Issues {
    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationIssue::new(field, message));
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<ValidationIssue>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}

/// Replaces non-breaking spaces, collapses whitespace runs and trims.
pub fn sanitize(raw: &str) -> String {
    lazy_static! {
        static ref WHITESPACE_RE: Regex = Regex::new(r"\s+").unwrap();
    }
    WHITESPACE_RE.replace_all(raw, " ").trim().to_string()
}

fn optional_text(raw: Option<String>) -> String {
    raw.as_deref().map(sanitize).unwrap_or_default()
}

fn required_text(raw: Option<String>, field: &str, issues: &mut Issues) -> String {
    let value = optional_text(raw);
    if value.is_empty() {
        issues.push(field, "is required");
    }
    value
}

fn time_of_day(raw: Option<String>, field: &str, issues: &mut Issues) -> TimeOfDay {
    match raw.as_deref().map(sanitize) {
        None => {
            issues.push(field, "is required");
            TimeOfDay::Unspecified
        }
        Some(s) if s.is_empty() => {
            issues.push(field, "is required");
            TimeOfDay::Unspecified
        }
        Some(s) => s.parse().unwrap_or_else(|_| {
            issues.push(field, format!("unknown time of day '{s}'"));
            TimeOfDay::Unspecified
        }),
    }
}

/// Absent, null and empty strings become 0; numeric strings are parsed.
fn number(raw: Option<&Value>, field: &str, issues: &mut Issues) -> f64 {
    let parsed = match raw {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = sanitize(s);
            if s.is_empty() {
                Some(0.0)
            } else {
                s.replace(',', ".").parse::<f64>().ok()
            }
        }
        Some(_) => None,
    };
    match parsed {
        Some(v) if v.is_finite() => v,
        _ => {
            issues.push(field, "must be a number");
            0.0
        }
    }
}

fn nutrient(raw: Option<&Value>, field: &str, issues: &mut Issues) -> f64 {
    let v = number(raw, field, issues);
    if v < 0.0 {
        issues.push(field, "must not be negative");
    }
    v
}

fn portion(
    id: Option<&str>,
    amount: Option<&Value>,
    id_field: String,
    amount_field: String,
    issues: &mut Issues,
) -> Option<NewPortion> {
    let target_id = match id.map(str::trim) {
        None | Some("") => {
            issues.push(id_field, "is required");
            None
        }
        Some(s) => match Uuid::parse_str(s) {
            Ok(id) => Some(id),
            Err(_) => {
                issues.push(id_field, "not a valid id");
                None
            }
        },
    };
    let amount_grams = match amount {
        None | Some(Value::Null) => {
            issues.push(amount_field.clone(), "is required");
            0.0
        }
        some => number(some, &amount_field, issues),
    };
    if amount.is_some() && amount_grams <= 0.0 {
        issues.push(amount_field, "must be greater than 0");
    }
    target_id.map(|target_id| NewPortion {
        target_id,
        amount_grams,
    })
}

pub fn validate_food(req: CreateFoodRequest) -> Result<NewFood, Vec<ValidationIssue>> {
    let mut issues = Issues::default();
    let food = NewFood {
        name: required_text(req.name, "name", &mut issues),
        kcal: nutrient(req.kcal.as_ref(), "kcal", &mut issues),
        carbs: nutrient(req.carbs.as_ref(), "carbs", &mut issues),
        sugar: nutrient(req.sugar.as_ref(), "sugar", &mut issues),
        fat: nutrient(req.fat.as_ref(), "fat", &mut issues),
        protein: nutrient(req.protein.as_ref(), "protein", &mut issues),
        state: optional_text(req.state),
        cultivation: optional_text(req.cultivation),
        recommendation: optional_text(req.recommendation),
        note: optional_text(req.note),
    };
    issues.finish(food)
}

/// Validated dish plus non-fatal findings.
#[derive(Debug)]
pub struct ValidDish {
    pub dish: NewDish,
    pub warnings: Vec<ValidationIssue>,
}

pub fn validate_dish(req: CreateDishRequest) -> Result<ValidDish, Vec<ValidationIssue>> {
    let mut issues = Issues::default();
    let name = required_text(req.name, "name", &mut issues);
    let time_of_day = time_of_day(req.time_of_day, "timeOfDay", &mut issues);
    let description = Some(optional_text(req.description)).filter(|d| !d.is_empty());

    if req.portions.is_empty() {
        issues.push("portions", "at least one portion is required");
    }
    let portions: Vec<NewPortion> = req
        .portions
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            portion(
                p.food_id.as_deref(),
                p.amount_grams.as_ref(),
                format!("portions[{i}].foodId"),
                format!("portions[{i}].amountGrams"),
                &mut issues,
            )
        })
        .collect();

    let mut seen = HashSet::new();
    let warnings = portions
        .iter()
        .enumerate()
        .filter(|(_, p)| !seen.insert(p.target_id))
        .map(|(i, p)| {
            ValidationIssue::new(
                format!("portions[{i}].foodId"),
                format!("food {} appears more than once", p.target_id),
            )
        })
        .collect();

    issues.finish(ValidDish {
        dish: NewDish {
            name,
            time_of_day,
            description,
            portions,
        },
        warnings,
    })
}

pub fn validate_meal(req: CreateMealRequest) -> Result<NewMeal, Vec<ValidationIssue>> {
    let mut issues = Issues::default();
    let time_of_day = time_of_day(req.time_of_day, "timeOfDay", &mut issues);

    if req.dish_portions.is_empty() && req.food_portions.is_empty() {
        issues.push("portions", "at least one dish or food portion is required");
    }
    let dish_portions = req
        .dish_portions
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            portion(
                p.dish_id.as_deref(),
                p.amount_grams.as_ref(),
                format!("dishPortions[{i}].dishId"),
                format!("dishPortions[{i}].amountGrams"),
                &mut issues,
            )
        })
        .collect();
    let food_portions = req
        .food_portions
        .iter()
        .enumerate()
        .filter_map(|(i, p)| {
            portion(
                p.food_id.as_deref(),
                p.amount_grams.as_ref(),
                format!("foodPortions[{i}].foodId"),
                format!("foodPortions[{i}].amountGrams"),
                &mut issues,
            )
        })
        .collect();

    issues.finish(NewMeal {
        time_of_day,
        dish_portions,
        food_portions,
    })
}

/// Issues for every id in `wanted` that is not in `found`. `field` receives
/// the index of the offending entry.
pub fn unresolved(
    wanted: &[NewPortion],
    found: &HashSet<Uuid>,
    field: impl Fn(usize) -> String,
    what: &str,
) -> Vec<ValidationIssue> {
    wanted
        .iter()
        .enumerate()
        .filter(|(_, p)| !found.contains(&p.target_id))
        .map(|(i, p)| ValidationIssue::new(field(i), format!("unknown {what} {}", p.target_id)))
        .collect()
}
