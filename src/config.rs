use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

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

    fn set(&mut self, value: T, source: ConfigSource) {
        self.value = value;
        self.source = source;
    }
}

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// Application configuration with source tracking
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    /// Base URL of the recipe API (without the `/api` suffix)
    pub api_url: ConfigValue<String>,
    /// Directory holding the persisted cart and session
    pub data_dir: ConfigValue<PathBuf>,
    pub request_timeout_secs: ConfigValue<u64>,
    /// How long a fetched value is served before it is refetched
    pub stale_time_secs: ConfigValue<u64>,
    /// Config file path used (if any)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

/// Internal struct for deserializing config file
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ConfigFile {
    api_url: Option<String>,
    data_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
    stale_time_secs: Option<u64>,
}

impl Config {
    /// Load configuration with priority: env vars > config file > defaults
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::defaults();

        let path = config_path.unwrap_or_else(Self::default_config_path);
        if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| ConfigError::ReadError(path.clone(), e))?;
            let file_config: ConfigFile = serde_yaml::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(path.clone(), e))?;

            if let Some(url) = file_config.api_url {
                config.api_url.set(url, ConfigSource::File);
            }
            if let Some(dir) = file_config.data_dir {
                // Resolve relative paths against config file's directory
                let resolved = if dir.is_relative() {
                    path.parent().map(|p| p.join(&dir)).unwrap_or(dir)
                } else {
                    dir
                };
                config.data_dir.set(resolved, ConfigSource::File);
            }
            if let Some(secs) = file_config.request_timeout_secs {
                config.request_timeout_secs.set(secs, ConfigSource::File);
            }
            if let Some(secs) = file_config.stale_time_secs {
                config.stale_time_secs.set(secs, ConfigSource::File);
            }

            config.config_file = Some(path);
        }

        if let Ok(url) = std::env::var("RECIPEBOX_API_URL") {
            config.api_url.set(url, ConfigSource::Environment);
        }
        if let Ok(dir) = std::env::var("RECIPEBOX_DATA_DIR") {
            config
                .data_dir
                .set(PathBuf::from(dir), ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("RECIPEBOX_REQUEST_TIMEOUT_SECS") {
            let secs = parse_secs("RECIPEBOX_REQUEST_TIMEOUT_SECS", &raw)?;
            config
                .request_timeout_secs
                .set(secs, ConfigSource::Environment);
        }
        if let Ok(raw) = std::env::var("RECIPEBOX_STALE_TIME_SECS") {
            let secs = parse_secs("RECIPEBOX_STALE_TIME_SECS", &raw)?;
            config.stale_time_secs.set(secs, ConfigSource::Environment);
        }

        if config.request_timeout_secs.value == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    fn defaults() -> Self {
        Self {
            api_url: ConfigValue::new(DEFAULT_API_URL.to_string(), ConfigSource::Default),
            data_dir: ConfigValue::new(Self::default_data_dir(), ConfigSource::Default),
            request_timeout_secs: ConfigValue::new(10, ConfigSource::Default),
            stale_time_secs: ConfigValue::new(30, ConfigSource::Default),
            config_file: None,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.value)
    }

    pub fn stale_time(&self) -> Duration {
        Duration::from_secs(self.stale_time_secs.value)
    }

    /// Default config directory (platform-specific):
    /// - Linux: ~/.config/recipebox/
    /// - macOS: ~/Library/Application Support/recipebox/
    /// - Windows: %APPDATA%/recipebox/
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebox")
    }

    /// Default data directory (platform-specific):
    /// - Linux: ~/.local/share/recipebox/
    /// - macOS: ~/Library/Application Support/recipebox/
    /// - Windows: %APPDATA%/recipebox/
    pub fn default_data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recipebox")
    }

    /// Default config file path (platform-specific config dir + config.yaml)
    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join("config.yaml")
    }
}

fn parse_secs(name: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string(), raw.to_string()))
}

#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, std::io::Error),
    ParseError(PathBuf, serde_yaml::Error),
    InvalidValue(String, String),
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
            ConfigError::InvalidValue(key, value) => {
                write!(f, "Invalid value for {}: {}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nonexistent.yaml");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.value, "http://localhost:3000");
        assert_eq!(config.api_url.source, ConfigSource::Default);
        assert!(config.data_dir.value.ends_with("recipebox"));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.stale_time(), Duration::from_secs(30));
        assert!(config.config_file.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: https://recipes.example.com").unwrap();
        writeln!(file, "data_dir: /var/lib/recipebox").unwrap();
        writeln!(file, "stale_time_secs: 5").unwrap();

        let config = Config::load(Some(config_path.clone())).unwrap();
        assert_eq!(config.api_url.value, "https://recipes.example.com");
        assert_eq!(config.api_url.source, ConfigSource::File);
        assert_eq!(config.data_dir.value, PathBuf::from("/var/lib/recipebox"));
        assert_eq!(config.stale_time_secs.value, 5);
        assert_eq!(config.stale_time_secs.source, ConfigSource::File);
        assert_eq!(config.request_timeout_secs.source, ConfigSource::Default);
        assert_eq!(config.config_file, Some(config_path));
    }

    #[test]
    fn test_relative_data_dir_resolves_against_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "data_dir: state").unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.data_dir.value, temp_dir.path().join("state"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "request_timeout_secs: 0").unwrap();

        let err = Config::load(Some(config_path)).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    #[ignore] // Run with --ignored; env vars can pollute parallel tests
    fn test_env_var_overrides_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "api_url: http://fromfile").unwrap();

        std::env::set_var("RECIPEBOX_API_URL", "http://fromenv");

        let config = Config::load(Some(config_path)).unwrap();
        assert_eq!(config.api_url.value, "http://fromenv");
        assert_eq!(config.api_url.source, ConfigSource::Environment);

        std::env::remove_var("RECIPEBOX_API_URL");
    }

    #[test]
    fn test_invalid_yaml_error() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "invalid: yaml: content: [").unwrap();

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
