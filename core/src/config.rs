//! Client configuration.
//!
//! # Design
//! `Config` is built once (defaults, then an optional file, then
//! environment overrides) and handed to `RequestExecutor::new` by value.
//! Nothing reads configuration lazily or globally after that point.
//!
//! Files are either `key=value` properties (`#` and `!` start comments) or a
//! JSON object. Both use the dotted keys `base.url`, `request.timeout`,
//! `response.timeout` and `log.level`. A document whose first non-blank
//! character is `{` is read as JSON.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::{Error, Result};

pub const DEFAULT_BASE_URL: &str = "https://petstore.swagger.io/v2";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "INFO";

/// Names the config file read by `Config::load`.
pub const CONFIG_PATH_ENV: &str = "PETSTORE_CONFIG";

/// Read by `Config::load` from the working directory when `PETSTORE_CONFIG`
/// is unset.
pub const DEFAULT_CONFIG_FILE: &str = "config.properties";

const BASE_URL_ENV: &str = "PETSTORE_BASE_URL";
const REQUEST_TIMEOUT_ENV: &str = "PETSTORE_REQUEST_TIMEOUT";
const RESPONSE_TIMEOUT_ENV: &str = "PETSTORE_RESPONSE_TIMEOUT";
const LOG_LEVEL_ENV: &str = "PETSTORE_LOG_LEVEL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    /// Connect timeout.
    pub request_timeout: Duration,
    /// Time allowed between sending a request and receiving the response head.
    pub response_timeout: Duration,
    pub log_level: String,
}

/// On-disk shape. Keys mirror the dotted property names of the service docs.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "base.url")]
    base_url: Option<String>,
    #[serde(rename = "request.timeout")]
    request_timeout: Option<u64>,
    #[serde(rename = "response.timeout")]
    response_timeout: Option<u64>,
    #[serde(rename = "log.level")]
    log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            response_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Defaults pointed at another base URL. Mostly useful in tests.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Load from the file named by `PETSTORE_CONFIG`, or `config.properties`
    /// in the working directory when present, then apply `PETSTORE_*`
    /// environment overrides.
    pub fn load() -> Result<Self> {
        let config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if raw.trim_start().starts_with('{') {
            Self::from_json(&raw)
        } else {
            Self::from_properties(&raw)
        }
    }

    /// Parse a JSON document. Missing keys keep their defaults and unknown
    /// keys are ignored.
    pub fn from_json(raw: &str) -> Result<Self> {
        let file: ConfigFile =
            serde_json::from_str(raw).map_err(|e| Error::Config(e.to_string()))?;
        Ok(file.into_config())
    }

    /// Parse `key=value` (or `key: value`) lines. Unknown keys are ignored.
    pub fn from_properties(raw: &str) -> Result<Self> {
        let mut file = ConfigFile::default();
        for (n, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }
            let Some((key, value)) = line.split_once(['=', ':']) else {
                return Err(Error::Config(format!("line {}: expected key=value", n + 1)));
            };
            let (key, value) = (key.trim(), value.trim());
            match key {
                "base.url" => file.base_url = Some(value.to_string()),
                "request.timeout" => file.request_timeout = Some(parse_ms(key, value)?),
                "response.timeout" => file.response_timeout = Some(parse_ms(key, value)?),
                "log.level" => file.log_level = Some(value.to_string()),
                _ => {}
            }
        }
        Ok(file.into_config())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(REQUEST_TIMEOUT_ENV) {
            self.request_timeout = parse_millis(REQUEST_TIMEOUT_ENV, &raw)?;
        }
        if let Some(raw) = lookup(RESPONSE_TIMEOUT_ENV) {
            self.response_timeout = parse_millis(RESPONSE_TIMEOUT_ENV, &raw)?;
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
        if self.base_url.trim().is_empty() {
            warn!("empty base URL configured, falling back to {DEFAULT_BASE_URL}");
            self.base_url = DEFAULT_BASE_URL.to_string();
        }
        Ok(self)
    }
}

impl ConfigFile {
    fn into_config(self) -> Config {
        let mut config = Config::default();
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(ms) = self.request_timeout {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = self.response_timeout {
            config.response_timeout = Duration::from_millis(ms);
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

fn parse_ms(key: &str, raw: &str) -> Result<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| Error::Config(format!("{key}={raw:?}: {e}")))
}

fn parse_millis(key: &str, raw: &str) -> Result<Duration> {
    parse_ms(key, raw).map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_demo_service() {
        let config = Config::default();
        assert_eq!(config.base_url, "https://petstore.swagger.io/v2");
        assert_eq!(config.request_timeout, Duration::from_millis(5000));
        assert_eq!(config.response_timeout, Duration::from_millis(5000));
        assert_eq!(config.log_level, "INFO");
    }

    #[test]
    fn json_uses_dotted_keys_and_keeps_defaults() {
        let config = Config::from_json(
            r#"{"base.url":"http://localhost:8080/v2","request.timeout":250,"unknown":true}"#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.request_timeout, Duration::from_millis(250));
        assert_eq!(config.response_timeout, Duration::from_millis(5000));
        assert_eq!(config.log_level, "INFO");
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = Config::from_json("{\"base.url\": ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn properties_use_dotted_keys_and_skip_comments() {
        let config = Config::from_properties(
            "# petstore\n\nbase.url = http://localhost:8080/v2\nresponse.timeout=750\n! note\nextra=1\n",
        )
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:8080/v2");
        assert_eq!(config.request_timeout, Duration::from_millis(5000));
        assert_eq!(config.response_timeout, Duration::from_millis(750));
        assert_eq!(config.log_level, "INFO");
    }

    #[test]
    fn properties_reject_lines_without_separator() {
        let err = Config::from_properties("base.url=http://x\njunk\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn properties_reject_non_numeric_timeout() {
        let err = Config::from_properties("request.timeout=soon").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn from_file_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let props = dir.path().join("config.properties");
        std::fs::write(&props, "base.url=http://props/v2\nlog.level=DEBUG\n").unwrap();
        let json = dir.path().join("config.json");
        std::fs::write(&json, r#"{"base.url":"http://json/v2"}"#).unwrap();

        let from_props = Config::from_file(&props).unwrap();
        assert_eq!(from_props.base_url, "http://props/v2");
        assert_eq!(from_props.log_level, "DEBUG");
        assert_eq!(Config::from_file(&json).unwrap().base_url, "http://json/v2");
    }

    #[test]
    fn env_overrides_file_values() {
        let config = Config::from_json(r#"{"base.url":"http://file/v2","log.level":"WARN"}"#)
            .unwrap()
            .with_overrides(env(&[
                ("PETSTORE_BASE_URL", "http://env/v2"),
                ("PETSTORE_RESPONSE_TIMEOUT", "1200"),
            ]))
            .unwrap();
        assert_eq!(config.base_url, "http://env/v2");
        assert_eq!(config.response_timeout, Duration::from_millis(1200));
        assert_eq!(config.log_level, "WARN");
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = Config::default()
            .with_overrides(env(&[("PETSTORE_REQUEST_TIMEOUT", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("PETSTORE_REQUEST_TIMEOUT"));
    }

    #[test]
    fn blank_base_url_falls_back_to_default() {
        let config = Config::default()
            .with_overrides(env(&[("PETSTORE_BASE_URL", "  ")]))
            .unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Config::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
