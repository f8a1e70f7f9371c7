use std::collections::BTreeMap;

use time::Date;
use tracing::warn;
use uuid::Uuid;

use super::model::PlannedMeal;
use super::store::{PlanQuery, PlanStore};
use crate::error::{AppError, AppResult};
use crate::planner::{aggregate_by_date, NutritionTotals};

/// Local copy of a user's schedule with optimistic mutations.
///
/// Every mutation is applied locally first and rolled back if the store call
/// fails, so the view never silently diverges from the store.
#[derive(Debug, Clone)]
pub struct PlanView {
    user_id: Uuid,
    meals: Vec<PlannedMeal>,
}

impl PlanView {
    pub async fn load(store: &dyn PlanStore, query: PlanQuery) -> AppResult<Self> {
        let meals = store.list(&query).await.map_err(AppError::store)?;
        Ok(Self {
            user_id: query.user_id,
            meals,
        })
    }

    pub fn meals(&self) -> &[PlannedMeal] {
        &self.meals
    }

    pub fn get(&self, id: Uuid) -> Option<&PlannedMeal> {
        self.meals.iter().find(|m| m.meal.id == id)
    }

    pub fn totals(&self) -> BTreeMap<Date, NutritionTotals> {
        aggregate_by_date(&self.meals)
    }

    fn position(&self, id: Uuid) -> AppResult<usize> {
        self.meals
            .iter()
            .position(|m| m.meal.id == id)
            .ok_or_else(|| AppError::NotFound("Meal not found".into()))
    }

    /// Flips the completion flag and returns the new value.
    pub async fn toggle_completed(&mut self, store: &dyn PlanStore, id: Uuid) -> AppResult<bool> {
        let idx = self.position(id)?;
        let previous = self.meals[idx].meal.is_completed;
        self.meals[idx].meal.is_completed = !previous;

        match store.set_completed(self.user_id, id, !previous).await {
            Ok(Some(saved)) => {
                self.meals[idx].meal = saved;
                Ok(!previous)
            }
            Ok(None) => {
                self.meals.remove(idx);
                Err(AppError::NotFound("Meal not found".into()))
            }
            Err(e) => {
                warn!(meal_id = %id, "completion toggle failed, reverting");
                self.meals[idx].meal.is_completed = previous;
                Err(AppError::store(e))
            }
        }
    }

    /// Removes a meal, restoring it in place if the store refuses.
    pub async fn remove(&mut self, store: &dyn PlanStore, id: Uuid) -> AppResult<()> {
        let idx = self.position(id)?;
        let removed = self.meals.remove(idx);

        match store.delete(self.user_id, id).await {
            Ok(_) => Ok(()),
            Err(e) => {
                warn!(meal_id = %id, "delete failed, restoring meal");
                self.meals.insert(idx, removed);
                Err(AppError::store(e))
            }
        }
    }
}
