//! Error types for txdesk-web

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use txdesk_core::{CoreError, ErrorCode};
use txdesk_utils::escape_html;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Core(error) => match error.code() {
                ErrorCode::TransactionNotFound => StatusCode::NOT_FOUND,
                ErrorCode::NotEditing | ErrorCode::EditorClosed => StatusCode::CONFLICT,
                ErrorCode::RemoteError => StatusCode::BAD_GATEWAY,
                ErrorCode::SchemaError | ErrorCode::ConfigError => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                _ => StatusCode::BAD_REQUEST,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        log::warn!("{} {}", status, self);
        let body = format!(
            "<div class='bg-red-50 border border-red-200 rounded-lg p-4 text-sm text-red-700'>{}</div>",
            escape_html(&self.to_string())
        );
        (status, Html(body)).into_response()
    }
}
