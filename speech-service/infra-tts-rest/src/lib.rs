use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, USER_AGENT};
use reqwest::Client;
use speech_domain::{DomainError, SpeechRequest, SpeechSynthesisPort, SynthesizedSpeech};
use url::Url;

const SERVICE: &str = "tts";

#[derive(Debug, Clone)]
pub struct RestSpeechSynthesizerSettings {
    pub base_url: String,
    pub client_id: String,
    pub user_agent: String,
    pub request_timeout: Option<Duration>,
}

/// Calls a public `translate_tts`-style endpoint: one GET per synthesis, no retries.
pub struct RestSpeechSynthesizer {
    client: Client,
    endpoint: Url,
    client_id: String,
    user_agent: HeaderValue,
}

impl RestSpeechSynthesizer {
    pub fn new(settings: RestSpeechSynthesizerSettings) -> Result<Self, DomainError> {
        let endpoint = Url::parse(&settings.base_url).map_err(|err| {
            DomainError::internal_error(&format!(
                "invalid tts endpoint `{}`: {err}",
                settings.base_url
            ))
        })?;
        let user_agent = HeaderValue::from_str(&settings.user_agent).map_err(|err| {
            DomainError::internal_error(&format!("invalid tts user agent: {err}"))
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|err| {
            DomainError::internal_error(&format!("failed to build tts http client: {err}"))
        })?;

        Ok(Self {
            client,
            endpoint,
            client_id: settings.client_id,
            user_agent,
        })
    }

    pub fn request_url(&self, request: &SpeechRequest) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", &request.text)
            .append_pair("tl", request.language.as_str())
            .append_pair("client", &self.client_id);
        url
    }
}

#[async_trait]
impl SpeechSynthesisPort for RestSpeechSynthesizer {
    async fn synthesize(&self, request: SpeechRequest) -> Result<SynthesizedSpeech, DomainError> {
        let url = self.request_url(&request);
        tracing::debug!(
            host = url.host_str().unwrap_or("unknown"),
            language = %request.language,
            "calling tts provider"
        );

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, self.user_agent.clone())
            .send()
            .await
            .map_err(|err| {
                DomainError::external_service_error(SERVICE, &format!("request failed: {err}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::external_service_error(
                SERVICE,
                &format!("provider returned {status}"),
            ));
        }

        let audio = response.bytes().await.map_err(|err| {
            DomainError::external_service_error(SERVICE, &format!("failed to read body: {err}"))
        })?;

        tracing::debug!(audio_bytes = audio.len(), "tts provider responded");
        Ok(SynthesizedSpeech::mpeg(audio))
    }
}

#[cfg(test)]
mod tests {
    use speech_domain::{LanguageCode, AUDIO_MPEG};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn synthesizer(base_url: String) -> RestSpeechSynthesizer {
        RestSpeechSynthesizer::new(RestSpeechSynthesizerSettings {
            base_url,
            client_id: "tw-ob".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout: Some(Duration::from_secs(5)),
        })
        .expect("synthesizer builds")
    }

    fn request(text: &str) -> SpeechRequest {
        SpeechRequest {
            text: text.to_string(),
            language: LanguageCode::english(),
        }
    }

    #[test]
    fn request_url_percent_encodes_text() {
        let tts = synthesizer("https://provider.test/translate_tts".to_string());
        let url = tts.request_url(&request("Ça va? 100% & more"));

        assert_eq!(url.path(), "/translate_tts");
        assert!(!url.as_str().contains(' '));
        assert!(!url.as_str().contains("& more"));
        let q = url
            .query_pairs()
            .find(|(k, _)| k == "q")
            .map(|(_, v)| v.into_owned());
        assert_eq!(q.as_deref(), Some("Ça va? 100% & more"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = RestSpeechSynthesizer::new(RestSpeechSynthesizerSettings {
            base_url: "not a url".to_string(),
            client_id: "tw-ob".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            request_timeout: None,
        });
        assert!(matches!(result, Err(DomainError::Internal { .. })));
    }

    #[tokio::test]
    async fn forwards_text_language_client_and_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_tts"))
            .and(query_param("ie", "UTF-8"))
            .and(query_param("q", "Héllo, wörld!"))
            .and(query_param("tl", "en"))
            .and(query_param("client", "tw-ob"))
            .and(header("user-agent", "Mozilla/5.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "audio/mpeg")
                    .set_body_bytes(vec![0x49, 0x44, 0x33, 0x04]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let tts = synthesizer(format!("{}/translate_tts", server.uri()));
        let speech = tts
            .synthesize(request("Héllo, wörld!"))
            .await
            .expect("synthesis succeeds");

        assert_eq!(speech.mime_type, AUDIO_MPEG);
        assert_eq!(speech.audio.as_ref(), &[0x49, 0x44, 0x33, 0x04]);
    }

    #[tokio::test]
    async fn non_success_status_is_an_external_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
            .mount(&server)
            .await;

        let tts = synthesizer(format!("{}/translate_tts", server.uri()));
        let err = tts
            .synthesize(request("Hello"))
            .await
            .expect_err("503 fails");

        assert!(matches!(err, DomainError::ExternalService { .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn unreachable_provider_is_an_external_service_error() {
        let tts = synthesizer("http://127.0.0.1:1/translate_tts".to_string());
        let err = tts
            .synthesize(request("Hello"))
            .await
            .expect_err("connection refused");

        assert!(matches!(err, DomainError::ExternalService { .. }));
    }
}
