use std::net::TcpListener;
use std::time::Duration;

use reqwest::Client;
use speech_configuration::AppConfig;
use speech_setup::build_and_run;
use tokio::task::JoinHandle;
use url::Url;

pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub fn tts_url(&self, params: &[(&str, &str)]) -> Url {
        Url::parse_with_params(&format!("{}/api/tts", self.base_url), params)
            .expect("valid tts url")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Starts the proxy on a free local port, pointed at `provider_url`.
pub async fn setup_test_server(provider_url: String) -> Result<TestServer, Box<dyn std::error::Error>> {
    let port = pick_free_port();
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = port;
    config.service.provider.base_url = provider_url;
    config.service.provider.request_timeout_ms = Some(5_000);

    let server_config = config.server.clone();
    let handle = tokio::spawn(async move {
        if let Err(err) = build_and_run(config, server_config).await {
            eprintln!("test server exited: {err}");
        }
    });

    let base_url = format!("http://127.0.0.1:{port}");
    let client = Client::new();
    for _ in 0..50 {
        if client
            .get(format!("{base_url}/health"))
            .send()
            .await
            .is_ok()
        {
            return Ok(TestServer {
                base_url,
                client,
                handle,
            });
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    handle.abort();
    Err("speech service did not become ready".into())
}

fn pick_free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("bind ephemeral port")
        .local_addr()
        .expect("extract local address")
        .port()
}
