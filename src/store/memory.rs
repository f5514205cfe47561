use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{NutritionStore, StoreError};
use crate::domain::{Dish, DishPortion, Food, Meal, MealDishPortion, MealFoodPortion, MealKcalRow};
use crate::nutrition::{assemble_meal, KcalBreakdown, MealGraph};

#[derive(Default)]
struct Tables {
    foods: HashMap<Uuid, Food>,
    dishes: HashMap<Uuid, Dish>,
    dish_portions: Vec<DishPortion>,
    meals: HashMap<Uuid, Meal>,
    meal_dish_portions: Vec<MealDishPortion>,
    meal_food_portions: Vec<MealFoodPortion>,
}

impl Tables {
    fn food_referenced(&self, id: Uuid) -> bool {
        self.dish_portions.iter().any(|p| p.food_id == id)
            || self.meal_food_portions.iter().any(|p| p.food_id == id)
    }

    fn graph(&self, meal: &Meal) -> MealGraph {
        let mut graph = MealGraph::new(meal.clone());
        graph.dish_portions = self
            .meal_dish_portions
            .iter()
            .filter(|p| p.meal_id == meal.id)
            .cloned()
            .collect();
        graph.food_portions = self
            .meal_food_portions
            .iter()
            .filter(|p| p.meal_id == meal.id)
            .cloned()
            .collect();
        let dish_ids = graph.dish_ids();
        graph.dishes = dish_ids
            .iter()
            .filter_map(|id| self.dishes.get(id).cloned())
            .collect();
        graph.dish_ingredients = self
            .dish_portions
            .iter()
            .filter(|p| dish_ids.contains(&p.dish_id))
            .cloned()
            .collect();
        graph.foods = graph
            .food_ids()
            .iter()
            .filter_map(|id| self.foods.get(id).cloned())
            .collect();
        graph
    }
}

/// Volatile store with the same referential rules as the Postgres schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Byte-wise name order; the Postgres queries use `COLLATE "C"` to agree.
fn sorted_by_name<T>(mut rows: Vec<T>, key: impl Fn(&T) -> (&str, Uuid)) -> Vec<T> {
    rows.sort_by(|a, b| key(a).cmp(&key(b)));
    rows
}

#[async_trait]
impl NutritionStore for MemoryStore {
    async fn list_foods(&self) -> Result<Vec<Food>, StoreError> {
        let t = self.tables.read().await;
        Ok(sorted_by_name(t.foods.values().cloned().collect(), |f| {
            (f.name.as_str(), f.id)
        }))
    }

    async fn foods_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Food>, StoreError> {
        let t = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| t.foods.get(id).cloned()).collect())
    }

    async fn insert_food(&self, food: &Food) -> Result<(), StoreError> {
        self.tables.write().await.foods.insert(food.id, food.clone());
        Ok(())
    }

    async fn delete_food(&self, id: Uuid) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if !t.foods.contains_key(&id) {
            return Err(StoreError::NotFound("food"));
        }
        if t.food_referenced(id) {
            return Err(StoreError::Conflict("food is still used by a dish or meal".into()));
        }
        t.foods.remove(&id);
        Ok(())
    }

    async fn list_dishes(&self) -> Result<Vec<Dish>, StoreError> {
        let t = self.tables.read().await;
        Ok(sorted_by_name(t.dishes.values().cloned().collect(), |d| {
            (d.name.as_str(), d.id)
        }))
    }

    async fn dishes_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Dish>, StoreError> {
        let t = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| t.dishes.get(id).cloned()).collect())
    }

    async fn get_dish(&self, id: Uuid) -> Result<Option<(Dish, Vec<DishPortion>)>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.dishes.get(&id).map(|d| {
            let mut portions: Vec<DishPortion> = t
                .dish_portions
                .iter()
                .filter(|p| p.dish_id == id)
                .cloned()
                .collect();
            portions.sort_by_key(|p| p.id);
            (d.clone(), portions)
        }))
    }

    async fn insert_dish(&self, dish: &Dish, portions: &[DishPortion]) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        // all checks before the first mutation
        if let Some(p) = portions.iter().find(|p| !t.foods.contains_key(&p.food_id)) {
            return Err(StoreError::MissingReference(format!("dish portion {}", p.id)));
        }
        t.dishes.insert(dish.id, dish.clone());
        t.dish_portions.extend_from_slice(portions);
        debug!(dish_id = %dish.id, portions = portions.len(), "dish stored");
        Ok(())
    }

    async fn insert_meal(
        &self,
        meal: &Meal,
        dish_portions: &[MealDishPortion],
        food_portions: &[MealFoodPortion],
    ) -> Result<(), StoreError> {
        let mut t = self.tables.write().await;
        if let Some(p) = dish_portions.iter().find(|p| !t.dishes.contains_key(&p.dish_id)) {
            return Err(StoreError::MissingReference(format!("meal dish portion {}", p.id)));
        }
        if let Some(p) = food_portions.iter().find(|p| !t.foods.contains_key(&p.food_id)) {
            return Err(StoreError::MissingReference(format!("meal food portion {}", p.id)));
        }
        t.meals.insert(meal.id, meal.clone());
        t.meal_dish_portions.extend_from_slice(dish_portions);
        t.meal_food_portions.extend_from_slice(food_portions);
        debug!(meal_id = %meal.id, "meal stored");
        Ok(())
    }

    async fn load_meal_graph(&self, id: Uuid) -> Result<Option<MealGraph>, StoreError> {
        let t = self.tables.read().await;
        Ok(t.meals.get(&id).map(|m| t.graph(m)))
    }

    async fn list_meal_kcal(&self) -> Result<Vec<MealKcalRow>, StoreError> {
        let t = self.tables.read().await;
        let mut rows: Vec<MealKcalRow> = t
            .meals
            .values()
            .map(|m| {
                let kcal = KcalBreakdown::of_meal(&assemble_meal(t.graph(m)));
                MealKcalRow {
                    id: m.id,
                    time_of_day: m.time_of_day,
                    created_at: m.created_at,
                    kcal_from_dishes: kcal.from_dishes,
                    kcal_from_foods: kcal.from_foods,
                }
            })
            .collect();
        rows.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(rows)
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use time::OffsetDateTime;

    use super::*;
    use crate::domain::{NewDish, NewFood, NewMeal, NewPortion, TimeOfDay};

    async fn seed_food(store: &MemoryStore, name: &str, kcal: f64) -> Food {
        let food = Food::create(
            NewFood {
                name: name.into(),
                kcal,
                ..Default::default()
            },
            OffsetDateTime::now_utc(),
        );
        store.insert_food(&food).await.unwrap();
        food
    }

    fn dish_of(food: Uuid, grams: f64) -> (Dish, Vec<DishPortion>) {
        Dish::create(
            NewDish {
                name: "Brotzeit".into(),
                time_of_day: TimeOfDay::Evening,
                description: None,
                portions: vec![NewPortion { target_id: food, amount_grams: grams }],
            },
            OffsetDateTime::now_utc(),
        )
    }

    #[tokio::test]
    async fn foods_are_listed_by_name() {
        let store = MemoryStore::new();
        seed_food(&store, "Zwiebel", 40.0).await;
        seed_food(&store, "Apfel", 52.0).await;
        seed_food(&store, "Karotte", 41.0).await;
        let names: Vec<String> = store.list_foods().await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Apfel", "Karotte", "Zwiebel"]);
    }

    #[tokio::test]
    async fn names_sort_by_bytes_like_collate_c() {
        let store = MemoryStore::new();
        for name in ["apfel", "Zucchini", "Äpfel", "Birne"] {
            seed_food(&store, name, 1.0).await;
        }
        let names: Vec<String> = store.list_foods().await.unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["Birne", "Zucchini", "apfel", "Äpfel"]);

        for name in ["eintopf", "Auflauf"] {
            let food = store.list_foods().await.unwrap()[0].id;
            let (mut dish, portions) = dish_of(food, 10.0);
            dish.name = name.into();
            store.insert_dish(&dish, &portions).await.unwrap();
        }
        let dishes: Vec<String> = store.list_dishes().await.unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(dishes, vec!["Auflauf", "eintopf"]);
    }

    #[tokio::test]
    async fn deleting_referenced_food_conflicts_and_keeps_it() {
        let store = MemoryStore::new();
        let food = seed_food(&store, "Käse", 350.0).await;
        let (dish, portions) = dish_of(food.id, 30.0);
        store.insert_dish(&dish, &portions).await.unwrap();

        let err = store.delete_food(food.id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
        assert_eq!(store.foods_by_ids(&[food.id]).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn deleting_unknown_food_is_not_found() {
        let store = MemoryStore::new();
        let err = store.delete_food(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound("food")));
    }

    #[tokio::test]
    async fn dish_with_unknown_food_writes_nothing() {
        let store = MemoryStore::new();
        let (dish, portions) = dish_of(Uuid::new_v4(), 30.0);
        let err = store.insert_dish(&dish, &portions).await.unwrap_err();
        assert!(matches!(err, StoreError::MissingReference(_)));
        assert!(store.list_dishes().await.unwrap().is_empty());
        assert!(store.get_dish(dish.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn meal_kcal_rows_follow_creation_order() {
        let store = MemoryStore::new();
        let bread = seed_food(&store, "Brot", 250.0).await;
        let (dish, portions) = dish_of(bread.id, 100.0);
        store.insert_dish(&dish, &portions).await.unwrap();

        let t0 = OffsetDateTime::now_utc();
        for (i, grams) in [200.0, 50.0].into_iter().enumerate() {
            let (mut meal, dps, fps) = Meal::create(
                NewMeal {
                    time_of_day: TimeOfDay::Noon,
                    dish_portions: vec![NewPortion { target_id: dish.id, amount_grams: grams }],
                    food_portions: vec![NewPortion { target_id: bread.id, amount_grams: 10.0 }],
                },
                t0,
            );
            meal.created_at = t0 + time::Duration::seconds(i as i64);
            store.insert_meal(&meal, &dps, &fps).await.unwrap();
        }

        let rows = store.list_meal_kcal().await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].created_at < rows[1].created_at);
        assert_eq!(rows[0].kcal_from_dishes, 500.0);
        assert_eq!(rows[0].kcal_from_foods, 25.0);
        assert_eq!(rows[1].kcal_from_dishes, 125.0);
        assert_eq!(store.list_meal_kcal().await.unwrap(), rows);
    }
}
