use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run, run_with_listener, spawn_with_listener};

pub mod auth;

mod admin;
mod auth_routes;
mod catalog;
mod consumer;
mod seller;
mod server;

pub enum ServerError {
    Engine(EngineError),
    Unauthorized(String),
    Generic(String),
}

//TODO: Find a better solution
#[derive(Serialize)]
struct Error {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidRole(_)
        | EngineError::EmptyCart
        | EngineError::InsufficientFunds { .. }
        | EngineError::InsufficientStock { .. } => StatusCode::BAD_REQUEST,
    }
}

fn details_for_engine_error(err: &EngineError) -> Option<serde_json::Value> {
    match err {
        EngineError::InsufficientFunds {
            required,
            available,
        } => Some(serde_json::json!({ "required": required, "available": available })),
        EngineError::InsufficientStock { available } => {
            Some(serde_json::json!({ "available": available }))
        }
        _ => None,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error, details) = match self {
            ServerError::Engine(err) => {
                let details = details_for_engine_error(&err);
                (
                    status_for_engine_error(&err),
                    message_for_engine_error(err),
                    details,
                )
            }
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err, None),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err, None),
        };

        (status, Json(Error { error, details })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
