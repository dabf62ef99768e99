use bytes::Bytes;
use validator::Validate;

#[derive(Debug, Clone, Default, Validate)]
pub struct SynthesizeSpeechRequest {
    pub text: Option<String>,
    #[validate(length(max = 16))]
    pub language: Option<String>,
}

impl SynthesizeSpeechRequest {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            language: None,
        }
    }

    /// Builds a request from raw query pairs. The first occurrence of a key wins;
    /// `lang` and `language` name the same field.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "text" => &mut request.text,
                "lang" | "language" => &mut request.language,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        request
    }
}

#[derive(Debug, Clone)]
pub struct SynthesizeSpeechResponse {
    pub request_id: String,
    pub audio: Bytes,
    pub content_type: String,
}
