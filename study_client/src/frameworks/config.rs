use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, io};
use thiserror::Error;
use url::Url;

// Client settings: optional TOML file first, environment variables on top.

pub const DEFAULT_API_URL: &str = "http://localhost:4000";
pub const DEFAULT_SESSION_FILE: &str = ".study_session.json";
pub const DEFAULT_CONFIG_FILE: &str = "study_client.toml";

pub const API_URL_VAR: &str = "STUDY_API_URL";
pub const SESSION_FILE_VAR: &str = "STUDY_SESSION_FILE";
pub const TIMEOUT_VAR: &str = "STUDY_REQUEST_TIMEOUT_MS";
pub const CONFIG_FILE_VAR: &str = "STUDY_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid API base URL {value:?}: {source}")]
    InvalidUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("API base URL must use http or https, got {0:?}")]
    UnsupportedScheme(String),
}

// Keys accepted in the TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    session_file: Option<PathBuf>,
    request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_url: Url,
    pub session_file: PathBuf,
    // None leaves the transport default in place.
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let (path, required) = match env::var(CONFIG_FILE_VAR) {
            Ok(path) => (PathBuf::from(path), true),
            Err(_) => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };
        let file = read_file(&path, required)?;
        Self::resolve(file, |key| env::var(key).ok())
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let file = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        Self::resolve(file, |_| None)
    }

    pub fn with_api_url(mut self, value: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(value)?;
        Ok(self)
    }

    // Base URL without the trailing slash `Url` always adds.
    pub fn base_url(&self) -> &str {
        self.api_url.as_str().trim_end_matches('/')
    }

    fn resolve(
        file: FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .or(file.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_file = lookup(SESSION_FILE_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .or(file.session_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        let timeout_ms = lookup(TIMEOUT_VAR)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .or(file.request_timeout_ms)
            .filter(|millis| *millis > 0);

        Ok(Self {
            api_url: parse_api_url(&api_url)?,
            session_file,
            request_timeout: timeout_ms.map(Duration::from_millis),
        })
    }
}

fn read_file(path: &Path, required: bool) -> Result<FileConfig, ConfigError> {
    match fs::read_to_string(path) {
        Ok(contents) => toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => Ok(FileConfig::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_api_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl {
        value: value.to_string(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn when_nothing_is_configured_then_local_defaults_apply() {
        let config =
            ClientConfig::resolve(FileConfig::default(), env_of(&[])).expect("config should load");

        assert_eq!(config.base_url(), DEFAULT_API_URL);
        assert_eq!(config.session_file, PathBuf::from(DEFAULT_SESSION_FILE));
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn when_env_and_file_disagree_then_env_wins() {
        let file = FileConfig {
            api_url: Some("http://file.example:4000".into()),
            session_file: Some(PathBuf::from("/tmp/file-session.json")),
            request_timeout_ms: Some(2_000),
        };

        let config = ClientConfig::resolve(
            file,
            env_of(&[
                (API_URL_VAR, "https://api.example.edu/"),
                (TIMEOUT_VAR, "500"),
            ]),
        )
        .expect("config should load");

        assert_eq!(config.base_url(), "https://api.example.edu");
        assert_eq!(config.session_file, PathBuf::from("/tmp/file-session.json"));
        assert_eq!(config.request_timeout, Some(Duration::from_millis(500)));
    }

    #[test]
    fn when_url_is_not_http_then_config_is_rejected() {
        let result = ClientConfig::resolve(
            FileConfig::default(),
            env_of(&[(API_URL_VAR, "ftp://files.example")]),
        );

        assert!(matches!(result, Err(ConfigError::UnsupportedScheme(_))));
    }

    #[test]
    fn when_url_is_garbage_then_config_is_rejected() {
        let result =
            ClientConfig::resolve(FileConfig::default(), env_of(&[(API_URL_VAR, "not a url")]));

        assert!(matches!(result, Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn when_toml_has_all_keys_then_they_are_used() {
        let config = ClientConfig::from_toml(
            r#"
            api_url = "https://studypro.example"
            session_file = "/var/tmp/study.json"
            request_timeout_ms = 1500
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.base_url(), "https://studypro.example");
        assert_eq!(config.session_file, PathBuf::from("/var/tmp/study.json"));
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
    }

    #[test]
    fn when_toml_has_unknown_key_then_parse_fails() {
        let result = ClientConfig::from_toml("api_host = \"x\"");

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn when_timeout_is_zero_then_no_timeout_is_set() {
        let config =
            ClientConfig::resolve(FileConfig::default(), env_of(&[(TIMEOUT_VAR, "0")]))
                .expect("config should load");

        assert_eq!(config.request_timeout, None);
    }
}
