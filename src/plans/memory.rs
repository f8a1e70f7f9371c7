use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{NewScheduledMeal, PlannedMeal, ScheduledMeal};
use super::store::{PlanOrder, PlanQuery, PlanStore, UnknownFood};
use crate::catalog::store::CatalogStore;

/// Plan store held in process memory. Joins against the given catalog and
/// rejects references to unknown foods like the foreign key does in Postgres.
pub struct InMemoryPlanStore {
    catalog: Arc<dyn CatalogStore>,
    // insertion order doubles as creation order
    meals: Mutex<Vec<ScheduledMeal>>,
}

impl InMemoryPlanStore {
    pub fn new(catalog: Arc<dyn CatalogStore>) -> Self {
        Self {
            catalog,
            meals: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Vec<ScheduledMeal>>> {
        self.meals
            .lock()
            .map_err(|_| anyhow::anyhow!("plan store lock poisoned"))
    }
}

#[async_trait]
impl PlanStore for InMemoryPlanStore {
    async fn list(&self, query: &PlanQuery) -> anyhow::Result<Vec<PlannedMeal>> {
        let mut meals: Vec<ScheduledMeal> = self
            .lock()?
            .iter()
            .filter(|m| m.user_id == query.user_id)
            .filter(|m| query.date.map_or(true, |d| m.date == d))
            .cloned()
            .collect();
        match query.order {
            PlanOrder::Chronological => meals.sort_by_key(|m| m.date),
            PlanOrder::NewestFirst => meals.reverse(),
        }

        let mut planned = Vec::with_capacity(meals.len());
        for meal in meals {
            let food = self.catalog.get(meal.food_id).await?;
            planned.push(PlannedMeal { meal, food });
        }
        Ok(planned)
    }

    async fn insert_batch(&self, meals: &[NewScheduledMeal]) -> anyhow::Result<Vec<ScheduledMeal>> {
        for m in meals {
            if self.catalog.get(m.food_id).await?.is_none() {
                return Err(UnknownFood(Some(m.food_id)).into());
            }
        }

        let now = OffsetDateTime::now_utc();
        let created: Vec<ScheduledMeal> = meals
            .iter()
            .cloned()
            .map(|m| m.into_meal(Uuid::new_v4(), now))
            .collect();
        self.lock()?.extend(created.iter().cloned());
        Ok(created)
    }

    async fn set_completed(
        &self,
        user_id: Uuid,
        id: Uuid,
        completed: bool,
    ) -> anyhow::Result<Option<ScheduledMeal>> {
        let mut meals = self.lock()?;
        Ok(meals
            .iter_mut()
            .find(|m| m.id == id && m.user_id == user_id)
            .map(|m| {
                m.is_completed = completed;
                m.clone()
            }))
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let mut meals = self.lock()?;
        let before = meals.len();
        meals.retain(|m| !(m.id == id && m.user_id == user_id));
        Ok(meals.len() != before)
    }
}
