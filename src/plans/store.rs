use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::model::{NewScheduledMeal, PlannedMeal, ScheduledMeal};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanOrder {
    /// Date ascending, then creation order.
    #[default]
    Chronological,
    /// Most recently created first.
    NewestFirst,
}

#[derive(Debug, Clone)]
pub struct PlanQuery {
    pub user_id: Uuid,
    pub date: Option<Date>,
    pub order: PlanOrder,
}

impl PlanQuery {
    pub fn for_user(user_id: Uuid) -> Self {
        Self {
            user_id,
            date: None,
            order: PlanOrder::Chronological,
        }
    }

    pub fn on(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.order = PlanOrder::NewestFirst;
        self
    }
}

/// A record points at a food that is not in the catalog. Stores return it
/// inside their `anyhow::Error` so callers can tell it from an outage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("meal references an unknown food")]
pub struct UnknownFood(pub Option<Uuid>);

/// Per-user scheduled meals. Mutations only touch rows owned by `user_id`.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn list(&self, query: &PlanQuery) -> anyhow::Result<Vec<PlannedMeal>>;
    /// Inserts every record or none of them.
    async fn insert_batch(&self, meals: &[NewScheduledMeal]) -> anyhow::Result<Vec<ScheduledMeal>>;
    async fn set_completed(
        &self,
        user_id: Uuid,
        id: Uuid,
        completed: bool,
    ) -> anyhow::Result<Option<ScheduledMeal>>;
    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool>;
}
