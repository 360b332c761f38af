use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("GEMINI_API_KEY not found in environment variables.")]
    ConfigurationMissing,

    #[error("Error generating recommendations: {0}")]
    Service(#[from] LlmError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::ConfigurationMissing => {
                (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_MISSING")
            }
            AppError::Service(e) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR")
            }
        };

        // Message includes the underlying cause text.
        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_missing_is_service_unavailable() {
        let response = AppError::ConfigurationMissing.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_service_error_message_carries_cause() {
        let err = AppError::from(LlmError::Api {
            status: 403,
            message: "API key not valid".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Error generating recommendations: API error (status 403): API key not valid"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
