use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

use recipebook_core::auth::{DEFAULT_AUTH_URL, DEFAULT_TOKEN_URL};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Source of a configuration value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigSource {
    Default,
    File,
    Environment,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::File => write!(f, "file"),
            ConfigSource::Environment => write!(f, "environment"),
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }
}

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Root URL of the remote database
    pub database_url: ConfigValue<Option<String>>,
    /// Web API key for the auth service
    #[serde(serialize_with = "serialize_masked")]
    pub api_key: ConfigValue<Option<String>>,
    pub auth_url: ConfigValue<String>,
    pub token_url: ConfigValue<String>,
    /// Request timeout for remote calls, in seconds
    pub timeout_secs: ConfigValue<u64>,
    /// Where the signed-in session is kept between runs
    pub session_path: ConfigValue<PathBuf>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// `remote:` section of the config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RemoteSection {
    database_url: Option<String>,
    api_key: Option<String>,
    auth_url: Option<String>,
    token_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    remote: RemoteSection,
    session_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut database_url = ConfigValue::new(None, ConfigSource::Default);
        let mut api_key = ConfigValue::new(None, ConfigSource::Default);
        let mut auth_url = ConfigValue::new(DEFAULT_AUTH_URL.to_string(), ConfigSource::Default);
        let mut token_url = ConfigValue::new(DEFAULT_TOKEN_URL.to_string(), ConfigSource::Default);
        let mut timeout_secs = ConfigValue::new(DEFAULT_TIMEOUT_SECS, ConfigSource::Default);
        let mut session_path = ConfigValue::new(
            Self::default_data_dir().join("session.yaml"),
            ConfigSource::Default,
        );
        let mut config_file = None;

        // Try to load from config file
        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            config_file = Some(path.clone());

            let remote = file_config.remote;
            if let Some(url) = remote.database_url {
                database_url = ConfigValue::new(Some(url), ConfigSource::File);
            }
            if let Some(key) = remote.api_key {
                api_key = ConfigValue::new(Some(key), ConfigSource::File);
            }
            if let Some(url) = remote.auth_url {
                auth_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(url) = remote.token_url {
                token_url = ConfigValue::new(url, ConfigSource::File);
            }
            if let Some(secs) = remote.timeout_secs {
                timeout_secs = ConfigValue::new(secs, ConfigSource::File);
            }
            if let Some(session) = file_config.session_path {
                // Resolve relative paths against config file's directory
                let resolved = if session.is_relative() {
                    path.parent().map(|p| p.join(&session)).unwrap_or(session)
                } else {
                    session
                };
                session_path = ConfigValue::new(resolved, ConfigSource::File);
            }
        }

        // Apply environment variable overrides
        if let Ok(url) = std::env::var("RECIPEBOOK_DATABASE_URL") {
            database_url = ConfigValue::new(Some(url), ConfigSource::Environment);
        }
        if let Ok(key) = std::env::var("RECIPEBOOK_API_KEY") {
            api_key = ConfigValue::new(Some(key), ConfigSource::Environment);
        }
        if let Ok(session) = std::env::var("RECIPEBOOK_SESSION_PATH") {
            session_path = ConfigValue::new(PathBuf::from(session), ConfigSource::Environment);
        }

        Ok(Self {
            database_url,
            api_key,
            auth_url,
            token_url,
            timeout_secs,
            session_path,
            config_file,
        })
    }

    /// Database URL, or an error naming the missing setting.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .value
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: "remote.database_url",
                env: "RECIPEBOOK_DATABASE_URL",
            })
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key
            .value
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: "remote.api_key",
                env: "RECIPEBOOK_API_KEY",
            })
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/recipebook/
    /// - macOS: ~/Library/Application Support/recipebook/
    /// - Windows: %APPDATA%/recipebook/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebook")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/recipebook/
    /// - macOS: ~/Library/Application Support/recipebook/
    /// - Windows: %APPDATA%/recipebook/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebook")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

/// Show only the ends of a secret.
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}

fn serialize_masked<S: Serializer>(
    value: &ConfigValue<Option<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    ConfigValue::new(value.value.as_deref().map(mask), value.source.clone()).serialize(serializer)
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    Missing { key: &'static str, env: &'static str },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError(path, e) => {
                write!(f, "Failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::Missing { key, env } => {
                write!(f, "{} is not configured. Set it in the config file or via {}.", key, env)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
