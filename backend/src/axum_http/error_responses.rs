use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::config::{config_loader, stage::Stage};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
}

pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        error: message.into(),
    });

    (status, body).into_response()
}

/// Maps a use-case error onto the wire. 500s keep their detail locally but
/// turn into a generic message in production.
pub fn usecase_error_response(status: StatusCode, err: impl std::fmt::Display) -> Response {
    let message = if status == StatusCode::INTERNAL_SERVER_ERROR
        && config_loader::get_stage() == Stage::Production
    {
        "Internal server error".to_string()
    } else {
        err.to_string()
    };

    error_response(status, message)
}
