use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{de, Deserialize, Deserializer, Serialize};
use thiserror::Error;
use toml::{Table, Value};
use tracing_subscriber::EnvFilter;

use speech_domain::{LanguageCode, DEFAULT_SPEECH_TEXT};

pub type AppConfig = SpeechConfig;

pub const CONFIG_PREFIX: &str = "SPEECH_SERVICE";
const CONFIG_DIR_VAR: &str = "SPEECH_SERVICE_CONFIG_DIR";
const RUN_ENV_VAR: &str = "RUN_ENV";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(#[from] toml::de::Error),

    #[error("environment override {key} conflicts with a non-table value")]
    EnvConflict { key: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port", deserialize_with = "from_str_or_native")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, deserialize_with = "from_str_or_native")]
    pub json: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
}

/// Outbound speech provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: LanguageCode,
    #[serde(default = "default_client_id")]
    pub client_id: String,
    /// Browser-like identifier; some providers reject requests without one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_text")]
    pub default_text: String,
    /// Unset keeps the HTTP client's own timeout behavior.
    #[serde(default, deserialize_with = "optional_from_str_or_native")]
    pub request_timeout_ms: Option<u64>,
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms
            .map(|ms| Duration::from_millis(ms.max(1)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_provider_base_url(),
            language: default_language(),
            client_id: default_client_id(),
            user_agent: default_user_agent(),
            default_text: default_text(),
            request_timeout_ms: None,
        }
    }
}

/// Loads `default.toml`, then `{RUN_ENV}.toml`, then `SPEECH_SERVICE__*` variables.
pub fn load_config() -> Result<SpeechConfig, ConfigError> {
    let config_dir = std::env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| "config".to_string());
    let run_env = std::env::var(RUN_ENV_VAR).unwrap_or_else(|_| "development".to_string());
    load_config_from(Path::new(&config_dir), &run_env, std::env::vars())
}

pub fn load_config_from<I>(
    config_dir: &Path,
    run_env: &str,
    env_vars: I,
) -> Result<SpeechConfig, ConfigError>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut merged = Table::new();
    for name in ["default", run_env] {
        let path = config_dir.join(format!("{name}.toml"));
        if let Some(layer) = read_layer(&path)? {
            merge_tables(&mut merged, layer);
        }
    }

    let env_prefix = format!("{CONFIG_PREFIX}__");
    for (key, raw) in env_vars {
        let Some(path) = key.strip_prefix(&env_prefix) else {
            continue;
        };
        let segments: Vec<String> = path
            .split("__")
            .filter(|s| !s.is_empty())
            .map(str::to_ascii_lowercase)
            .collect();
        if segments.is_empty() {
            continue;
        }
        insert_path(&mut merged, &segments, Value::String(raw))
            .map_err(|_| ConfigError::EnvConflict { key: key.clone() })?;
    }

    Ok(Value::Table(merged).try_into()?)
}

fn read_layer(path: &Path) -> Result<Option<Table>, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    toml::from_str::<Table>(&raw)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn merge_tables(base: &mut Table, overlay: Table) {
    for (key, value) in overlay {
        if let Value::Table(incoming) = value {
            if let Some(Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}

fn insert_path(table: &mut Table, segments: &[String], value: Value) -> Result<(), ()> {
    let (last, parents) = segments.split_last().ok_or(())?;
    let mut current = table;
    for segment in parents {
        let entry = current
            .entry(segment.clone())
            .or_insert(Value::Table(Table::new()));
        current = match entry {
            Value::Table(inner) => inner,
            _ => return Err(()),
        };
    }
    current.insert(last.clone(), value);
    Ok(())
}

// Environment overrides always arrive as strings; typed fields accept either form.
#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrNative<T> {
    Native(T),
    Text(String),
}

impl<T> StrOrNative<T>
where
    T: FromStr,
    T::Err: Display,
{
    fn into_value<E: de::Error>(self) -> Result<T, E> {
        match self {
            StrOrNative::Native(value) => Ok(value),
            StrOrNative::Text(raw) => raw.trim().parse().map_err(E::custom),
        }
    }
}

fn from_str_or_native<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    StrOrNative::<T>::deserialize(deserializer)?.into_value()
}

fn optional_from_str_or_native<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + FromStr,
    T::Err: Display,
{
    Option::<StrOrNative<T>>::deserialize(deserializer)?
        .map(StrOrNative::into_value)
        .transpose()
}

/// Installs the global tracing subscriber. `RUST_LOG` wins over `logging.level`.
pub fn setup_logging(config: &SpeechConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_provider_base_url() -> String {
    "https://translate.google.com/translate_tts".to_string()
}

fn default_language() -> LanguageCode {
    LanguageCode::english()
}

fn default_client_id() -> String {
    "tw-ob".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0".to_string()
}

fn default_text() -> String {
    DEFAULT_SPEECH_TEXT.to_string()
}
