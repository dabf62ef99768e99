use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use speech_application::{SynthesizeSpeechCommand, SynthesizeSpeechRequest};
use speech_domain::AUDIO_MPEG;

use crate::{
    error::{error_mapper, HttpError},
    AppState,
};

pub async fn synthesize_speech(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Response, HttpError> {
    let Query(pairs) = query.map_err(|rejection| {
        tracing::info!(error = %rejection, "rejected malformed tts query");
        HttpError::Validation {
            message: rejection.body_text(),
        }
    })?;
    let request = SynthesizeSpeechRequest::from_query_pairs(pairs);

    tracing::info!(
        text_chars = request.text.as_deref().map_or(0, |t| t.chars().count()),
        language = request.language.as_deref().unwrap_or("default"),
        "received tts request"
    );

    let command = SynthesizeSpeechCommand::new(request);
    match state.command_handler.handle(command).await {
        Ok(result) => {
            tracing::info!(
                request_id = %result.request_id,
                audio_bytes = result.audio.len(),
                "tts request completed"
            );
            let content_type = HeaderValue::from_str(&result.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static(AUDIO_MPEG));
            Ok((
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CACHE_CONTROL, HeaderValue::from_static("no-store")),
                ],
                result.audio,
            )
                .into_response())
        }
        Err(error) if error.is_client_error() => {
            tracing::warn!(error = %error, "tts request rejected");
            Err(error_mapper(error))
        }
        Err(error) => {
            tracing::error!(error = %error, "TTS fetch failed");
            Err(error_mapper(error))
        }
    }
}
