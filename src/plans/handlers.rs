use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::dto::{
    AddMealRequest, ConfirmRequest, DailySummary, DateQuery, GenerateRequest, PlanDay,
    UpdateMealRequest,
};
use super::model::{PlannedMeal, ScheduledMeal};
use super::services;
use crate::{
    auth::{AuthUser, MaybeUser},
    error::AppResult,
    planner::GeneratedPlan,
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans).post(add_meal))
        .route("/plans/generate", post(generate))
        .route("/plans/confirm", post(confirm))
        .route("/plans/summary", get(summary))
        .route("/plans/:id", patch(update_meal).delete(delete_meal))
}

#[instrument(skip(state))]
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> AppResult<Json<GeneratedPlan>> {
    let plan = services::generate_plan(
        state.catalog.as_ref(),
        &state.generator,
        body.target_calories,
        services::today(),
    )
    .await?;
    Ok(Json(plan))
}

#[instrument(skip_all)]
pub async fn confirm(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
    Json(body): Json<ConfirmRequest>,
) -> AppResult<(StatusCode, Json<Vec<ScheduledMeal>>)> {
    let created = services::confirm_plan(
        state.catalog.as_ref(),
        state.plans.as_ref(),
        user.as_ref(),
        &body.days,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state, user))]
pub async fn list_plans(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<Vec<PlanDay>>> {
    let days = services::plan_days(state.plans.as_ref(), user.user_id, q.date).await?;
    Ok(Json(days))
}

#[instrument(skip(state, user))]
pub async fn add_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<AddMealRequest>,
) -> AppResult<(StatusCode, Json<PlannedMeal>)> {
    let meal = services::add_to_plan(
        state.catalog.as_ref(),
        state.plans.as_ref(),
        user.user_id,
        body,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(meal)))
}

#[instrument(skip(state, user))]
pub async fn update_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMealRequest>,
) -> AppResult<Json<ScheduledMeal>> {
    let meal =
        services::set_completed(state.plans.as_ref(), user.user_id, id, body.is_completed).await?;
    Ok(Json(meal))
}

#[instrument(skip(state, user))]
pub async fn delete_meal(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    services::delete_meal(state.plans.as_ref(), user.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, user))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(q): Query<DateQuery>,
) -> AppResult<Json<DailySummary>> {
    let date = q.date.unwrap_or_else(services::today);
    let summary = services::daily_summary(
        state.plans.as_ref(),
        state.config.planner.targets,
        user.user_id,
        date,
    )
    .await?;
    Ok(Json(summary))
}
