use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Envelope used by every JSON response of this service.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct StdResponse<T, M> {
    pub data: Option<T>,
    pub message: Option<M>,
}

impl<T: Serialize, M: Serialize> IntoResponse for StdResponse<T, M> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Rejected locally, before any collaborator was called.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Order submission failed: {0}")]
    Submission(String),

    #[error("Status update failed: {0}")]
    Transition(String),

    #[error("Update failed: {0}")]
    Mutation(String),

    #[error("Backend request failed: {0}")]
    Upstream(String),

    #[error("{0} is unreachable")]
    ServiceUnreachable(String),

    #[error("Missing or invalid session")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Submission(_)
            | AppError::Transition(_)
            | AppError::Mutation(_)
            | AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::ServiceUnreachable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{:#}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body: StdResponse<(), String> = StdResponse {
            data: None,
            message: Some(self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
