use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use speech_application::ApplicationError;

/// Stable error token returned for every provider-side failure.
pub const TTS_FAILED: &str = "TTS failed";

#[derive(Debug)]
pub enum HttpError {
    Validation { message: String },
    Internal { message: String },
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            HttpError::Validation { message } => (StatusCode::UNPROCESSABLE_ENTITY, message),
            HttpError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        (
            status,
            Json(json!({
                "error": message,
            })),
        )
            .into_response()
    }
}

// Provider detail stays in the server log; callers only see the stable token.
pub fn error_mapper(error: ApplicationError) -> HttpError {
    if error.is_client_error() {
        HttpError::Validation {
            message: error.to_string(),
        }
    } else {
        HttpError::Internal {
            message: TTS_FAILED.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use speech_domain::DomainError;

    use super::*;

    async fn render(error: HttpError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[tokio::test]
    async fn provider_failure_maps_to_stable_500() {
        let error = ApplicationError::Domain(DomainError::external_service_error(
            "tts",
            "provider returned 503 Service Unavailable",
        ));

        let (status, body) = render(error_mapper(error)).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "TTS failed" }));
    }

    #[tokio::test]
    async fn invalid_language_maps_to_422() {
        let error = ApplicationError::Domain(DomainError::invalid_input("language", "bad tag"));

        let (status, body) = render(error_mapper(error)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].as_str().unwrap().contains("language"));
    }
}
