pub mod dto;
pub mod handlers;
pub mod memory;
pub mod model;
pub mod repo;
mod repo_types;
pub mod services;
pub mod store;
pub mod view;

use crate::state::AppState;
use axum::Router;

pub use memory::InMemoryPlanStore;
pub use repo::PgPlanStore;
pub use store::{PlanQuery, PlanStore};
pub use view::PlanView;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
