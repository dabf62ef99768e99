use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use speech_domain::{
    DomainError, LanguageCode, SpeechRequest, SpeechSynthesisPort, DEFAULT_SPEECH_TEXT,
};

use crate::{ApplicationError, SynthesizeSpeechRequest, SynthesizeSpeechResponse};

#[async_trait]
pub trait SynthesizeSpeechUseCase: Send + Sync {
    async fn synthesize(
        &self,
        request: SynthesizeSpeechRequest,
    ) -> Result<SynthesizeSpeechResponse, ApplicationError>;
}

/// Values substituted when the caller leaves a field out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechDefaults {
    pub text: String,
    pub language: LanguageCode,
}

impl Default for SpeechDefaults {
    fn default() -> Self {
        Self {
            text: DEFAULT_SPEECH_TEXT.to_string(),
            language: LanguageCode::english(),
        }
    }
}

pub struct SynthesizeSpeechUseCaseImpl {
    synthesizer: Arc<dyn SpeechSynthesisPort>,
    defaults: SpeechDefaults,
}

impl SynthesizeSpeechUseCaseImpl {
    pub fn new(synthesizer: Arc<dyn SpeechSynthesisPort>, defaults: SpeechDefaults) -> Self {
        Self {
            synthesizer,
            defaults,
        }
    }

    fn resolve_text(&self, text: Option<String>) -> String {
        match text {
            Some(text) if !text.trim().is_empty() => text,
            _ => self.defaults.text.clone(),
        }
    }

    fn resolve_language(&self, language: Option<String>) -> Result<LanguageCode, DomainError> {
        match language.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => LanguageCode::parse(code),
            _ => Ok(self.defaults.language.clone()),
        }
    }
}

#[async_trait]
impl SynthesizeSpeechUseCase for SynthesizeSpeechUseCaseImpl {
    async fn synthesize(
        &self,
        request: SynthesizeSpeechRequest,
    ) -> Result<SynthesizeSpeechResponse, ApplicationError> {
        let request_id = Uuid::new_v4().to_string();
        let used_default = request.text.as_deref().map_or(true, |t| t.trim().is_empty());
        let text = self.resolve_text(request.text);
        let language = self.resolve_language(request.language)?;

        tracing::debug!(
            request_id = %request_id,
            text_chars = text.chars().count(),
            language = %language,
            used_default,
            "starting speech synthesis"
        );

        let speech = self
            .synthesizer
            .synthesize(SpeechRequest { text, language })
            .await?;

        if speech.is_empty() {
            return Err(DomainError::external_service_error(
                "tts",
                "provider returned an empty audio body",
            )
            .into());
        }

        tracing::debug!(
            request_id = %request_id,
            audio_bytes = speech.len(),
            "speech synthesis completed"
        );

        Ok(SynthesizeSpeechResponse {
            request_id,
            audio: speech.audio,
            content_type: speech.mime_type,
        })
    }
}
