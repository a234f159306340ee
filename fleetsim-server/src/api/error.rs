use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use crate::chat::ErrorBody;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Vehicle '{0}' not found")]
    NotFound(String),
    #[error("Fleet ticker is not running")]
    Unavailable,
    #[error("{0}")]
    Internal(String),
}

impl From<fleetsim_core::Error> for ApiError {
    fn from(err: fleetsim_core::Error) -> Self {
        match err {
            fleetsim_core::Error::UnknownVehicle(id) => Self::NotFound(id),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(msg) => {
                error!("Internal error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
