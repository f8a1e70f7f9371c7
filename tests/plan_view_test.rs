mod common;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use time::macros::date;
use uuid::Uuid;

use common::sample_catalog;
use mealplanner::catalog::{Category, InMemoryCatalog};
use mealplanner::error::AppError;
use mealplanner::plans::model::{NewScheduledMeal, PlannedMeal, ScheduledMeal};
use mealplanner::plans::{InMemoryPlanStore, PlanQuery, PlanStore, PlanView};

/// Delegates to an in-memory store, failing writes while `offline` is set.
struct FlakyStore {
    inner: InMemoryPlanStore,
    offline: AtomicBool,
}

impl FlakyStore {
    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl PlanStore for FlakyStore {
    async fn list(&self, query: &PlanQuery) -> anyhow::Result<Vec<PlannedMeal>> {
        self.inner.list(query).await
    }

    async fn insert_batch(&self, meals: &[NewScheduledMeal]) -> anyhow::Result<Vec<ScheduledMeal>> {
        self.check()?;
        self.inner.insert_batch(meals).await
    }

    async fn set_completed(
        &self,
        user_id: Uuid,
        id: Uuid,
        completed: bool,
    ) -> anyhow::Result<Option<ScheduledMeal>> {
        self.check()?;
        self.inner.set_completed(user_id, id, completed).await
    }

    async fn delete(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        self.inner.delete(user_id, id).await
    }
}

async fn seeded(user_id: Uuid) -> (FlakyStore, Vec<ScheduledMeal>) {
    let foods = sample_catalog();
    let records = vec![
        NewScheduledMeal {
            user_id,
            date: date!(2025 - 03 - 10),
            meal_type: Category::Breakfast,
            food_id: foods[0].id,
        },
        NewScheduledMeal {
            user_id,
            date: date!(2025 - 03 - 10),
            meal_type: Category::Snack,
            food_id: foods[9].id,
        },
    ];
    let store = FlakyStore {
        inner: InMemoryPlanStore::new(Arc::new(InMemoryCatalog::with_foods(foods))),
        offline: AtomicBool::new(false),
    };
    let created = store.insert_batch(&records).await.unwrap();
    (store, created)
}

#[tokio::test]
async fn toggle_persists_when_store_accepts() {
    let user = Uuid::new_v4();
    let (store, created) = seeded(user).await;
    let mut view = PlanView::load(&store, PlanQuery::for_user(user)).await.unwrap();

    let now_completed = view.toggle_completed(&store, created[0].id).await.unwrap();
    assert!(now_completed);
    assert!(view.get(created[0].id).unwrap().meal.is_completed);

    let stored = store.list(&PlanQuery::for_user(user)).await.unwrap();
    assert!(stored[0].meal.is_completed);
}

#[tokio::test]
async fn toggle_reverts_when_store_fails() {
    let user = Uuid::new_v4();
    let (store, created) = seeded(user).await;
    let mut view = PlanView::load(&store, PlanQuery::for_user(user)).await.unwrap();
    store.go_offline();

    let err = view.toggle_completed(&store, created[0].id).await.unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));
    assert!(!view.get(created[0].id).unwrap().meal.is_completed);
}

#[tokio::test]
async fn remove_restores_meal_in_place_when_store_fails() {
    let user = Uuid::new_v4();
    let (store, created) = seeded(user).await;
    let mut view = PlanView::load(&store, PlanQuery::for_user(user)).await.unwrap();
    let before: Vec<Uuid> = view.meals().iter().map(|m| m.meal.id).collect();
    store.go_offline();

    let err = view.remove(&store, created[0].id).await.unwrap_err();
    assert!(matches!(err, AppError::StoreUnavailable(_)));
    let after: Vec<Uuid> = view.meals().iter().map(|m| m.meal.id).collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn remove_updates_totals_on_success() {
    let user = Uuid::new_v4();
    let (store, created) = seeded(user).await;
    let mut view = PlanView::load(&store, PlanQuery::for_user(user)).await.unwrap();
    assert_eq!(view.totals()[&date!(2025 - 03 - 10)].calories, 350 + 95);

    view.remove(&store, created[1].id).await.unwrap();
    assert_eq!(view.meals().len(), 1);
    assert_eq!(view.totals()[&date!(2025 - 03 - 10)].calories, 350);
    assert_eq!(store.list(&PlanQuery::for_user(user)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn toggle_of_a_meal_deleted_elsewhere_drops_it() {
    let user = Uuid::new_v4();
    let (store, created) = seeded(user).await;
    let mut view = PlanView::load(&store, PlanQuery::for_user(user)).await.unwrap();
    store.delete(user, created[0].id).await.unwrap();

    let err = view.toggle_completed(&store, created[0].id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert!(view.get(created[0].id).is_none());

    let err = view.toggle_completed(&store, Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}
