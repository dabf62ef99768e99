use std::sync::Arc;

use anyhow::{anyhow, Error};
use speech_application::{
    SpeechDefaults, SynthesizeSpeechCommandHandler, SynthesizeSpeechUseCase,
    SynthesizeSpeechUseCaseImpl,
};
use speech_configuration::{AppConfig, ProviderConfig, ServerConfig};
use speech_domain::SpeechSynthesisPort;
use speech_http_server::{create_app_routes, AppState};
use speech_infra_tts_rest::{RestSpeechSynthesizer, RestSpeechSynthesizerSettings};

pub async fn build_and_run(config: AppConfig, server_config: ServerConfig) -> Result<(), Error> {
    let app = Application::new(config).await?;
    app.run(server_config).await
}

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

impl Application {
    pub async fn new(config: AppConfig) -> Result<Self, Error> {
        let provider = &config.service.provider;
        tracing::info!(
            base_url = %provider.base_url,
            language = %provider.language,
            request_timeout_ms = provider.request_timeout_ms,
            "initializing speech synthesis proxy"
        );

        let synthesizer: Arc<dyn SpeechSynthesisPort> =
            Arc::new(RestSpeechSynthesizer::new(synthesizer_settings(provider))?);
        let usecase: Arc<dyn SynthesizeSpeechUseCase> = Arc::new(
            SynthesizeSpeechUseCaseImpl::new(synthesizer, speech_defaults(provider)),
        );
        let handler = Arc::new(SynthesizeSpeechCommandHandler::new(usecase));
        let state = AppState::new(handler);

        Ok(Self { config, state })
    }

    pub async fn run(self, server_config: ServerConfig) -> Result<(), Error> {
        tracing::info!(
            host = %server_config.host,
            port = server_config.port,
            "starting speech http server"
        );

        create_app_routes(self.state, server_config)
            .await
            .map_err(|err| anyhow!("speech http server failed: {err}"))
    }
}

fn synthesizer_settings(provider: &ProviderConfig) -> RestSpeechSynthesizerSettings {
    RestSpeechSynthesizerSettings {
        base_url: provider.base_url.clone(),
        client_id: provider.client_id.clone(),
        user_agent: provider.user_agent.clone(),
        request_timeout: provider.request_timeout(),
    }
}

fn speech_defaults(provider: &ProviderConfig) -> SpeechDefaults {
    SpeechDefaults {
        text: provider.default_text.clone(),
        language: provider.language.clone(),
    }
}

#[cfg(test)]
mod tests {
    use speech_domain::LanguageCode;

    use super::*;

    #[test]
    fn defaults_follow_provider_config() {
        let provider = ProviderConfig {
            language: LanguageCode::parse("fr").unwrap(),
            default_text: "Salut".to_string(),
            ..ProviderConfig::default()
        };

        let defaults = speech_defaults(&provider);

        assert_eq!(defaults.text, "Salut");
        assert_eq!(defaults.language.as_str(), "fr");
    }

    #[tokio::test]
    async fn invalid_provider_url_fails_initialization() {
        let mut config = AppConfig::default();
        config.service.provider.base_url = "::nope::".to_string();
        assert!(Application::new(config).await.is_err());
    }
}
