use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use std::error::Error as StdError;
use std::fmt;

use crate::gateway::GatewayError;

#[derive(Debug)]
pub enum ServiceError {
    ValidationError(String),
    /// Non-2xx answer from the upstream directory service; the status code
    /// is passed through to the caller.
    GatewayError { status: u16, message: String },
    TransportError(String),
    BatchInFlight,
    PipelineError(String),
    InternalError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::GatewayError { status, message } => {
                write!(f, "Gateway error ({}): {}", status, message)
            }
            ServiceError::TransportError(msg) => write!(f, "Transport error: {}", msg),
            ServiceError::BatchInFlight => write!(f, "A batch operation is already running"),
            ServiceError::PipelineError(msg) => write!(f, "Import pipeline error: {}", msg),
            ServiceError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl StdError for ServiceError {}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::ValidationError(msg) => HttpResponse::BadRequest().json(json!({
                "success": false,
                "message": msg
            })),
            ServiceError::GatewayError { status, message } => {
                let status =
                    StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY);
                HttpResponse::build(status).json(json!({
                    "success": false,
                    "message": message
                }))
            }
            ServiceError::TransportError(msg) => {
                tracing::error!("gateway unreachable: {}", msg);
                HttpResponse::BadGateway().json(json!({
                    "success": false,
                    "message": "Directory gateway unreachable"
                }))
            }
            ServiceError::BatchInFlight => HttpResponse::Conflict().json(json!({
                "success": false,
                "message": "A batch operation is already running"
            })),
            ServiceError::PipelineError(msg) => HttpResponse::InternalServerError().json(json!({
                "success": false,
                "message": msg
            })),
            ServiceError::InternalError(msg) => {
                tracing::error!("internal error: {}", msg);
                HttpResponse::InternalServerError().json(json!({
                    "success": false,
                    "message": "Internal server error"
                }))
            }
        }
    }
}

impl From<GatewayError> for ServiceError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Transport(e) => ServiceError::TransportError(e.to_string()),
            GatewayError::Upstream { status, message } => {
                ServiceError::GatewayError { status, message }
            }
        }
    }
}
