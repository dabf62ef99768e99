use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::DomainError;

/// MIME type declared for every audio payload handed back to callers.
pub const AUDIO_MPEG: &str = "audio/mpeg";

/// Phrase synthesized when a caller sends no text at all.
pub const DEFAULT_SPEECH_TEXT: &str = "Hello there!";

const MAX_LANGUAGE_CODE_LEN: usize = 16;

/// Spoken-language tag understood by the speech provider (`en`, `fr`, `pt-BR`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(code: &str) -> Result<Self, DomainError> {
        let code = code.trim();
        if code.is_empty() || code.len() > MAX_LANGUAGE_CODE_LEN {
            return Err(DomainError::invalid_input(
                "language",
                &format!("must be 1 to {MAX_LANGUAGE_CODE_LEN} characters"),
            ));
        }
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return Err(DomainError::invalid_input(
                "language",
                "may only contain ASCII letters, digits and '-'",
            ));
        }
        Ok(Self(code.to_string()))
    }

    pub fn english() -> Self {
        Self("en".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LanguageCode {
    fn default() -> Self {
        Self::english()
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(value: LanguageCode) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechRequest {
    pub text: String,
    pub language: LanguageCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedSpeech {
    pub audio: Bytes,
    pub mime_type: String,
}

impl SynthesizedSpeech {
    pub fn mpeg(audio: Bytes) -> Self {
        Self {
            audio,
            mime_type: AUDIO_MPEG.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.audio.len()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}
