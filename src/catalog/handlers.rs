use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateFoodRequest, FoodListQuery};
use super::model::FoodItem;
use super::store::CatalogQuery;
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

const MAX_PAGE_SIZE: i64 = 100;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/foods", get(list_foods).post(create_food))
        .route("/foods/:id", get(get_food))
}

#[instrument(skip(state))]
pub async fn list_foods(
    State(state): State<AppState>,
    Query(q): Query<FoodListQuery>,
) -> AppResult<Json<Vec<FoodItem>>> {
    let query = CatalogQuery {
        category: q.category,
        search: q.search,
        offset: q.offset.max(0),
        limit: q
            .limit
            .unwrap_or(state.config.catalog_page_size)
            .clamp(1, MAX_PAGE_SIZE),
    };
    let foods = state.catalog.list(&query).await.map_err(AppError::store)?;
    Ok(Json(foods))
}

#[instrument(skip(state))]
pub async fn get_food(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FoodItem>> {
    state
        .catalog
        .get(id)
        .await
        .map_err(AppError::store)?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Food not found".into()))
}

#[instrument(skip(state, user, body))]
pub async fn create_food(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(body): Json<CreateFoodRequest>,
) -> AppResult<(StatusCode, HeaderMap, Json<FoodItem>)> {
    let new_food = body.into_new_food()?;
    let food = state
        .catalog
        .insert(new_food)
        .await
        .map_err(AppError::store)?;
    info!(user_id = %user.user_id, food_id = %food.id, "food added to catalog");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/foods/{}", food.id).parse::<axum::http::HeaderValue>() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(food)))
}
