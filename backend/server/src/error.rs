use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kitchen::form::FieldError;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload(#[from] JsonRejection),

    #[error("Missing required fields")]
    InvalidOrder(Vec<FieldError>),

    #[error("Error fetching {sheet} sheet")]
    StoreUnavailable {
        sheet: &'static str,
        #[source]
        source: StoreError,
    },

    #[error("Failed to add order")]
    IntakeFailure(#[source] StoreError),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload { .. } => StatusCode::BAD_REQUEST,
            AppError::InvalidOrder { .. } => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::IntakeFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match &self {
            AppError::MalformedPayload(rejection) => warn!("Rejected order payload: {rejection}"),
            AppError::InvalidOrder(errors) => warn!("Rejected order, {} missing fields", errors.len()),
            AppError::StoreUnavailable { sheet, source } => {
                error!("Error fetching {sheet} sheet: {source}")
            }
            AppError::IntakeFailure(source) => error!("Error adding order: {source}"),
        }

        let message = self.to_string();
        let errors = match self {
            AppError::InvalidOrder(errors) => errors,
            _ => Vec::new(),
        };

        (status, Json(ErrorBody { message, errors })).into_response()
    }
}
