use std::collections::BTreeSet;
use std::num::NonZeroU32;

use rand::{rngs::StdRng, SeedableRng};
use time::{Date, OffsetDateTime};
use tracing::info;
use uuid::Uuid;

use super::dto::{AddMealRequest, DailySummary, PlanDay};
use super::model::{NewScheduledMeal, PlannedMeal, ScheduledMeal};
use super::store::{PlanQuery, PlanStore, UnknownFood};
use crate::auth::Identity;
use crate::catalog::store::CatalogStore;
use crate::error::{AppError, AppResult};
use crate::planner::{aggregate_by_date, confirm, CandidateDay, DailyTargets, GeneratedPlan, PlanGenerator};

/// Calendar day in UTC; the service does no timezone normalization.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

pub fn parse_target(target_calories: i64) -> AppResult<NonZeroU32> {
    u32::try_from(target_calories)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or_else(|| AppError::Validation("target_calories must be a positive number".into()))
}

/// Runs the generator over a fresh catalog snapshot, starting the day after `today`.
pub async fn generate_plan(
    catalog: &dyn CatalogStore,
    generator: &PlanGenerator,
    target_calories: i64,
    today: Date,
) -> AppResult<GeneratedPlan> {
    let target = parse_target(target_calories)?;
    let start = today
        .next_day()
        .ok_or_else(|| AppError::Validation("date out of range".into()))?;
    let foods = catalog.snapshot().await.map_err(AppError::store)?;

    let mut rng = StdRng::from_entropy();
    let plan = generator.generate(&foods, target, start, &mut rng)?;
    Ok(plan)
}

/// Maps a failed plan write; a dangling food reference is the caller's fault.
fn write_error(e: anyhow::Error) -> AppError {
    match e.downcast_ref::<UnknownFood>() {
        Some(UnknownFood(Some(id))) => AppError::Validation(format!("unknown food {id}")),
        Some(UnknownFood(None)) => AppError::Validation("plan references an unknown food".into()),
        None => AppError::store(e),
    }
}

/// Saves confirmed candidate days as one batch. Every referenced food must
/// exist; otherwise nothing is written.
pub async fn confirm_plan(
    catalog: &dyn CatalogStore,
    plans: &dyn PlanStore,
    user: Option<&Identity>,
    days: &[CandidateDay],
) -> AppResult<Vec<ScheduledMeal>> {
    let records = confirm(days, user.map(|u| u.user_id))?;
    if records.is_empty() {
        return Err(AppError::Validation(
            "nothing to confirm: every slot is empty".into(),
        ));
    }

    let food_ids: BTreeSet<Uuid> = records.iter().map(|r| r.food_id).collect();
    for id in food_ids {
        if catalog.get(id).await.map_err(AppError::store)?.is_none() {
            return Err(AppError::Validation(format!("unknown food {id}")));
        }
    }

    let created = plans.insert_batch(&records).await.map_err(write_error)?;
    info!(count = created.len(), days = days.len(), "meal plan confirmed");
    Ok(created)
}

pub async fn add_to_plan(
    catalog: &dyn CatalogStore,
    plans: &dyn PlanStore,
    user_id: Uuid,
    req: AddMealRequest,
) -> AppResult<PlannedMeal> {
    let food = catalog
        .get(req.food_id)
        .await
        .map_err(AppError::store)?
        .ok_or_else(|| AppError::NotFound("Food not found".into()))?;

    let record = NewScheduledMeal {
        user_id,
        date: req.date,
        meal_type: req.meal_type,
        food_id: food.id,
    };
    let meal = plans
        .insert_batch(std::slice::from_ref(&record))
        .await
        .map_err(write_error)?
        .pop()
        .ok_or_else(|| AppError::store(anyhow::anyhow!("insert returned no rows")))?;

    info!(%user_id, meal_id = %meal.id, slot = %meal.meal_type, "meal added to plan");
    Ok(PlannedMeal {
        meal,
        food: Some(food),
    })
}

pub async fn set_completed(
    plans: &dyn PlanStore,
    user_id: Uuid,
    id: Uuid,
    completed: bool,
) -> AppResult<ScheduledMeal> {
    plans
        .set_completed(user_id, id, completed)
        .await
        .map_err(AppError::store)?
        .ok_or_else(|| AppError::NotFound("Meal not found".into()))
}

pub async fn delete_meal(plans: &dyn PlanStore, user_id: Uuid, id: Uuid) -> AppResult<()> {
    if plans.delete(user_id, id).await.map_err(AppError::store)? {
        info!(%user_id, meal_id = %id, "meal removed from plan");
        Ok(())
    } else {
        Err(AppError::NotFound("Meal not found".into()))
    }
}

/// The user's schedule grouped by date, oldest date first.
pub async fn plan_days(
    plans: &dyn PlanStore,
    user_id: Uuid,
    date: Option<Date>,
) -> AppResult<Vec<PlanDay>> {
    let mut query = PlanQuery::for_user(user_id);
    query.date = date;
    let meals = plans.list(&query).await.map_err(AppError::store)?;
    let totals = aggregate_by_date(&meals);

    let mut days: Vec<PlanDay> = Vec::new();
    for meal in meals {
        match days.last_mut() {
            Some(day) if day.date == meal.meal.date => day.meals.push(meal),
            _ => days.push(PlanDay {
                date: meal.meal.date,
                totals: totals.get(&meal.meal.date).copied().unwrap_or_default(),
                meals: vec![meal],
            }),
        }
    }
    Ok(days)
}

/// Dashboard view of one day: newest meals first, totals and progress.
pub async fn daily_summary(
    plans: &dyn PlanStore,
    targets: DailyTargets,
    user_id: Uuid,
    date: Date,
) -> AppResult<DailySummary> {
    let meals = plans
        .list(&PlanQuery::for_user(user_id).on(date).newest_first())
        .await
        .map_err(AppError::store)?;
    let totals = aggregate_by_date(&meals)
        .remove(&date)
        .unwrap_or_default();

    Ok(DailySummary {
        date,
        totals,
        targets,
        progress: totals.progress(&targets),
        meals,
    })
}
