//! Configuration for orcid-work
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::http::{HttpClient, HttpError};

pub const DEFAULT_USER_AGENT: &str = concat!("orcid-work/", env!("CARGO_PKG_VERSION"));

/// The member API sandbox; production use must opt in explicitly.
pub const DEFAULT_ORCID_API_URL: &str = "https://api.sandbox.orcid.org";
pub const DEFAULT_METADATA_URL: &str = "https://doi.org";

pub const ENV_ORCID_API_URL: &str = "ORCID_API_URL";
pub const ENV_METADATA_URL: &str = "ORCID_METADATA_URL";
pub const ENV_SCHEMA_DIR: &str = "ORCID_SCHEMA_DIR";

/// Container environment dump written by phusion/baseimage style images
pub const CONTAINER_ENVIRONMENT_FILE: &str = "/etc/container_environment.json";

/// Service endpoints and local resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkConfig {
    /// Base URL of the registry write API
    pub orcid_api_url: String,
    /// Base URL of the DOI metadata resolver
    pub metadata_url: String,
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Directory holding `record_<version>/` schema folders
    pub schema_dir: PathBuf,
}

impl Default for WorkConfig {
    fn default() -> Self {
        Self {
            orcid_api_url: DEFAULT_ORCID_API_URL.to_string(),
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: 30,
            schema_dir: default_schema_dir(),
        }
    }
}

/// The `resources/` directory shipped with this crate
pub fn default_schema_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/resources"))
}

impl WorkConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overlaid with the config file and then the environment.
    ///
    /// An explicit `path` must exist; the per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// `<config dir>/orcid-work/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("orcid-work").join("config.toml"))
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Override fields from the process environment
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Override fields from an arbitrary variable source; empty values are ignored
    pub fn apply_env_with(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = var(ENV_ORCID_API_URL) {
            self.orcid_api_url = url;
        }
        if let Some(url) = var(ENV_METADATA_URL) {
            self.metadata_url = url;
        }
        if let Some(dir) = var(ENV_SCHEMA_DIR) {
            self.schema_dir = PathBuf::from(dir);
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.orcid_api_url()?;
        self.metadata_url()?;
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "timeout_secs",
                message: "must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn orcid_api_url(&self) -> Result<Url, ConfigError> {
        parse_http_url("orcid_api_url", &self.orcid_api_url)
    }

    pub fn metadata_url(&self) -> Result<Url, ConfigError> {
        parse_http_url("metadata_url", &self.metadata_url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP client with this configuration's user agent and timeout
    pub fn http_client(&self) -> Result<HttpClient, HttpError> {
        HttpClient::new(&self.user_agent, self.timeout())
    }
}

fn parse_http_url(key: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        key,
        value: value.to_string(),
    };
    let url = Url::parse(value).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

/// Populate the process environment from a `.env` file and from the
/// container environment dump, if either exists. `.env` never overwrites a
/// variable that is already set; the container dump always does.
pub fn load_environment() -> Result<(), ConfigError> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => {
            return Err(ConfigError::Parse {
                path: PathBuf::from(".env"),
                message: e.to_string(),
            })
        }
    }

    let container = Path::new(CONTAINER_ENVIRONMENT_FILE);
    if container.is_file() {
        let count = load_container_environment(container)?;
        tracing::debug!(count, "loaded container environment");
    }
    Ok(())
}

/// Set variables from a JSON object of scalar values, replacing any existing
/// value; returns how many were set.
pub fn load_container_environment(path: &Path) -> Result<usize, ConfigError> {
    let vars = read_container_environment(path)?;
    let count = vars.len();
    for (key, value) in vars {
        std::env::set_var(&key, value);
    }
    Ok(count)
}

fn read_container_environment(path: &Path) -> Result<Vec<(String, String)>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    };
    let value: serde_json::Value =
        serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))?;
    let object = value
        .as_object()
        .ok_or_else(|| parse_error("expected a JSON object".to_string()))?;

    Ok(object
        .iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(s) => Some((key.clone(), s.clone())),
            serde_json::Value::Number(n) => Some((key.clone(), n.to_string())),
            serde_json::Value::Bool(b) => Some((key.clone(), b.to_string())),
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = WorkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.orcid_api_url, "https://api.sandbox.orcid.org");
        assert_eq!(config.metadata_url, "https://doi.org");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.schema_dir.ends_with("resources"));
    }

    #[test]
    fn test_toml_partial_keeps_defaults() {
        let config = WorkConfig::from_toml("orcid_api_url = \"https://api.orcid.org\"\n").unwrap();
        assert_eq!(config.orcid_api_url, "https://api.orcid.org");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = WorkConfig::default();
        let parsed = WorkConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_env_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "metadata_url = \"https://data.crossref.org\"").unwrap();
        let mut config = WorkConfig::from_file(file.path()).unwrap();

        let env: HashMap<&str, &str> = [
            (ENV_ORCID_API_URL, "https://api.orcid.org"),
            (ENV_SCHEMA_DIR, ""),
        ]
        .into_iter()
        .collect();
        config.apply_env_with(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.orcid_api_url, "https://api.orcid.org");
        assert_eq!(config.metadata_url, "https://data.crossref.org");
        assert_eq!(config.schema_dir, default_schema_dir());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let mut config = WorkConfig::default();
        config.metadata_url = "doi.org".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidUrl { key: "metadata_url", .. })
        ));

        config.metadata_url = "mailto:someone@example.org".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = WorkConfig::default();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = WorkConfig::load(Some(Path::new("/nonexistent/orcid-work.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_container_environment_parsing() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"ORCID_WORK_TEST_A": "x", "ORCID_WORK_TEST_PORT": 8080, "NESTED": {{"a": 1}}}}"#
        )
        .unwrap();

        let mut vars = read_container_environment(file.path()).unwrap();
        vars.sort();
        assert_eq!(
            vars,
            vec![
                ("ORCID_WORK_TEST_A".to_string(), "x".to_string()),
                ("ORCID_WORK_TEST_PORT".to_string(), "8080".to_string()),
            ]
        );
    }

    #[test]
    fn test_container_environment_overrides_existing() {
        std::env::set_var("ORCID_WORK_TEST_PRESET", "kept");
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"ORCID_WORK_TEST_PRESET": "replaced", "ORCID_WORK_TEST_FRESH": "new"}}"#
        )
        .unwrap();

        let count = load_container_environment(file.path()).unwrap();
        assert_eq!(count, 2);
        assert_eq!(std::env::var("ORCID_WORK_TEST_PRESET").unwrap(), "replaced");
        assert_eq!(std::env::var("ORCID_WORK_TEST_FRESH").unwrap(), "new");
    }

    #[test]
    fn test_container_environment_must_be_object() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2]").unwrap();
        assert!(matches!(
            read_container_environment(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
