// task-analytics/src/error.rs

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Too many requests: {message}")]
    TooManyRequests {
        message: String,
        retry_after_secs: u64,
    },

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::DbErr(_) => "database_error",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationError(_) => "validation_error",
            AppError::ValidationFailure(_) => "validation_errors",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::TooManyRequests { .. } => "too_many_requests",
            AppError::InternalServerError(_) => "internal_server_error",
        }
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_type = self.error_type().to_string();
        let mut retry_after = None;

        let (status, message, details, validation_errors) = match self {
            AppError::DbErr(db_err) => {
                // サーバーログには詳細を出し、クライアントには汎用メッセージのみ返す
                tracing::error!(error = ?db_err, "Database error");
                match db_err {
                    DbErr::RecordNotFound(_) => (
                        StatusCode::NOT_FOUND,
                        "The requested resource was not found".to_string(),
                        None,
                        None,
                    ),
                    _ => (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "A database error occurred".to_string(),
                        None,
                        None,
                    ),
                }
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message, None, None),
            AppError::ValidationError(message) => (StatusCode::BAD_REQUEST, message, None, None),
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    "Validation failed".to_string(),
                    None,
                    Some(field_errors),
                )
            }
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message, None, None),
            AppError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None, None),
            AppError::TooManyRequests {
                message,
                retry_after_secs,
            } => {
                retry_after = Some(retry_after_secs);
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    message,
                    Some(json!({ "retry_after_secs": retry_after_secs })),
                    None,
                )
            }
            AppError::InternalServerError(message) => {
                tracing::error!(error = %message, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                    None,
                    None,
                )
            }
        };

        let body = ErrorResponse {
            success: false,
            error: message.clone(),
            message,
            details,
            validation_errors,
            error_type,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(secs) = retry_after {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    pub error_type: String,
}
