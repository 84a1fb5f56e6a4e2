//! Configuration file parser for ~/.config/deep-report/config.toml.
//!
//! The file is optional; a missing or empty file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use crate::feed::DEFAULT_LOAD_MORE_THRESHOLD;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// API base used when neither the config file nor the CLI names one.
/// Can be replaced at build time with `DEEP_REPORT_API_BASE`.
pub const DEFAULT_API_BASE: &str = match option_env!("DEEP_REPORT_API_BASE") {
    Some(base) => base,
    None => "http://127.0.0.1:8000",
};

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Top-level configuration. Any subset of keys may be given.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the article API. `None` uses [`DEFAULT_API_BASE`].
    pub api_base_url: Option<String>,

    /// Theme variant name ("dark" or "light").
    pub theme: String,

    /// How close to the end of the feed, in lines, scrolling triggers the
    /// next page. Also the offset past which the scroll indicator shows.
    pub load_more_threshold: u16,

    /// Per-request timeout for the JSON endpoints, in seconds.
    pub request_timeout_secs: u64,

    /// Keybinding overrides: action name to key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: None,
            theme: "dark".to_string(),
            load_more_threshold: DEFAULT_LOAD_MORE_THRESHOLD,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] = [
        "api_base_url",
        "theme",
        "load_more_threshold",
        "request_timeout_secs",
        "keybindings",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or blank file → `Ok(Config::default())`
    /// - Over 1 MB → `Err(ConfigError::TooLarge)`
    /// - Invalid TOML or wrong value types → `Err(ConfigError::Parse)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse TOML text. Blank input yields the defaults.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            theme = %config.theme,
            api_base_url = ?config.api_base_url,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Pick the API base: CLI flag, then config file, then the built-in default.
    /// Blank values are skipped rather than shadowing the next source.
    pub fn api_base<'a>(&'a self, cli_override: Option<&'a str>) -> &'a str {
        let given = |s: &'a str| Some(s.trim()).filter(|s| !s.is_empty());
        cli_override
            .and_then(given)
            .or_else(|| self.api_base_url.as_deref().and_then(given))
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// Request timeout, never below one second.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("deep_report_config_{}", name));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "dark");
        assert_eq!(config.api_base_url, None);
        assert_eq!(config.load_more_threshold, 5);
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
        assert!(config.keybindings.is_empty());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/deep_report_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_whitespace_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.load_more_threshold, 5);
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let path = write_config(
            "full",
            r#"
api_base_url = "http://172.30.1.59:8000"
theme = "light"
load_more_threshold = 8
request_timeout_secs = 45

[keybindings]
quit = "Ctrl+q"
refresh = "F5"
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api_base_url.as_deref(), Some("http://172.30.1.59:8000"));
        assert_eq!(config.theme, "light");
        assert_eq!(config.load_more_threshold, 8);
        assert_eq!(config.request_timeout(), Duration::from_secs(45));
        assert_eq!(
            config.keybindings.get("refresh").map(String::as_str),
            Some("F5")
        );
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = Config::parse("theme = \"light\"\n").unwrap();
        assert_eq!(config.theme, "light");
        assert_eq!(config.load_more_threshold, 5);
        assert_eq!(config.api_base_url, None);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let err = Config::parse("this is not [valid toml").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::parse("load_more_threshold = \"five\"\n").is_err());
        assert!(Config::parse("load_more_threshold = -1\n").is_err());
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let config = Config::parse("theme = \"dark\"\nrefresh_secs = 30\n").unwrap();
        assert_eq!(config.theme, "dark");
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        cleanup(&path);
    }

    #[test]
    fn test_api_base_precedence() {
        let mut config = Config::default();
        assert_eq!(config.api_base(None), DEFAULT_API_BASE);

        config.api_base_url = Some("http://from-config:8000".into());
        assert_eq!(config.api_base(None), "http://from-config:8000");
        assert_eq!(
            config.api_base(Some("http://from-cli:9000")),
            "http://from-cli:9000"
        );

        // Blank values fall through to the default
        config.api_base_url = Some("  ".into());
        assert_eq!(config.api_base(None), DEFAULT_API_BASE);
    }

    #[test]
    fn test_blank_cli_api_base_defers_to_config() {
        let config = Config {
            api_base_url: Some(" http://from-config:8000 ".into()),
            ..Config::default()
        };
        assert_eq!(config.api_base(Some("   ")), "http://from-config:8000");
        assert_eq!(config.api_base(Some("")), "http://from-config:8000");
        assert_eq!(
            config.api_base(Some(" http://from-cli:9000")),
            "http://from-cli:9000"
        );
    }

    #[test]
    fn test_zero_timeout_clamped() {
        let config = Config::parse("request_timeout_secs = 0\n").unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
    }
}
