use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::planner::PlanError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not enough food items to build a plan: found {available}, need at least {required}; add more food items to the catalog")]
    InsufficientCatalog { available: usize, required: usize },

    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Store unavailable: {0}")]
    StoreUnavailable(#[source] anyhow::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InsufficientCatalog { .. } => "insufficient_catalog",
            AppError::NotAuthenticated => "not_authenticated",
            AppError::StoreUnavailable(_) => "store_unavailable",
            AppError::NotFound(_) => "not_found",
            AppError::Validation(_) => "validation",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InsufficientCatalog { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Wraps a failed store call, logging it once at the boundary.
    pub fn store(e: anyhow::Error) -> Self {
        tracing::error!(error = %e, "store call failed");
        AppError::StoreUnavailable(e)
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::InsufficientCatalog {
                available,
                required,
            } => AppError::InsufficientCatalog {
                available,
                required,
            },
            PlanError::NotAuthenticated => AppError::NotAuthenticated,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::StoreUnavailable(_) => "Service temporarily unavailable".to_string(),
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            other => other.to_string(),
        };

        let body = json!({
            "error": {
                "code": self.code(),
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_catalog_message_asks_for_more_food() {
        let err = AppError::from(PlanError::InsufficientCatalog {
            available: 0,
            required: 1,
        });
        assert_eq!(err.code(), "insufficient_catalog");
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(err.to_string().contains("add more food items"));
    }

    #[test]
    fn store_errors_hide_details_from_clients() {
        let err = AppError::StoreUnavailable(anyhow::anyhow!("connection refused"));
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("connection refused"));
    }
}
