pub mod dto;
pub mod handlers;
pub mod memory;
pub mod model;
pub mod repo;
pub(crate) mod repo_types;
pub mod store;

use crate::state::AppState;
use axum::Router;

pub use memory::InMemoryCatalog;
pub use model::{Category, FoodItem, NewFoodItem};
pub use repo::PgCatalogStore;
pub use store::{CatalogQuery, CatalogStore};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
