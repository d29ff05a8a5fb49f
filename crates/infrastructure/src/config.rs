//! Run configuration.
//!
//! Values are layered, lowest precedence first: built-in defaults, a YAML
//! file, `APIPROBE_*` environment variables and finally command-line
//! overrides. [`ProbeConfig::validate`] runs once all layers are applied.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use apiprobe_application::ScenarioSettings;
use apiprobe_domain::PageProbe;
use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable overriding [`ProbeConfig::base_url`].
pub const ENV_BASE_URL: &str = "APIPROBE_BASE_URL";
/// Environment variable overriding [`ProbeConfig::timeout_secs`].
pub const ENV_TIMEOUT_SECS: &str = "APIPROBE_TIMEOUT_SECS";

/// Errors that can occur while loading or validating the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file {}: {source}", path.display())]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for [`ProbeConfig`].
    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        /// Path of the file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A value is out of range or malformed.
    #[error("invalid value for {field}: {message}")]
    Invalid {
        /// Offending setting.
        field: &'static str,
        /// What is wrong with it.
        message: String,
    },
}

/// Overrides given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Replaces the base URL.
    pub base_url: Option<String>,
    /// Replaces the request timeout.
    pub timeout_secs: Option<u64>,
}

/// Settings of one test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProbeConfig {
    /// Base address of the API under test.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Domain of the generated registration email.
    pub email_domain: String,
    /// Password of the generated test user.
    pub password: String,
    /// Base address of the public site; the API base when absent.
    pub pages_base_url: Option<String>,
    /// Pages probed when page checks are enabled.
    pub pages: Vec<PageProbe>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_secs: 10,
            user_agent: concat!("apiprobe/", env!("CARGO_PKG_VERSION")).to_string(),
            email_domain: "doxa.test".to_string(),
            password: "TestPass123!".to_string(),
            pages_base_url: None,
            pages: PageProbe::defaults(),
        }
    }
}

impl ProbeConfig {
    /// Reads a YAML config file. Absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not a valid config.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses a YAML document.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed YAML or unknown keys.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Loads defaults, then the file at `path` if given.
    ///
    /// # Errors
    ///
    /// See [`ProbeConfig::from_file`].
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Applies `APIPROBE_*` variables from the process environment.
    ///
    /// # Errors
    ///
    /// See [`ProbeConfig::apply_env_with`].
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Applies `APIPROBE_*` variables obtained through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the timeout is not a number.
    pub fn apply_env_with(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            self.base_url = base_url;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw.trim().parse().map_err(|e| ConfigError::Invalid {
                field: ENV_TIMEOUT_SECS,
                message: format!("{e}: {raw:?}"),
            })?;
        }
        Ok(())
    }

    /// Applies command-line overrides.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(base_url) = overrides.base_url {
            self.base_url = base_url;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }

    /// Checks the final values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a base URL that is not an
    /// absolute `http(s)` URL, a zero timeout or an empty email domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("base_url", &self.base_url)?;
        if let Some(pages_base_url) = &self.pages_base_url {
            validate_http_url("pages_base_url", pages_base_url)?;
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "timeout_secs",
                message: "must be at least 1".to_string(),
            });
        }
        if self.email_domain.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "email_domain",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Returns the knobs of the scenario procedures.
    #[must_use]
    pub fn scenario_settings(&self) -> ScenarioSettings {
        ScenarioSettings {
            email_domain: self.email_domain.clone(),
            password: self.password.clone(),
            pages_base_url: self.pages_base_url.clone(),
            pages: self.pages.clone(),
        }
    }
}

fn validate_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value).map_err(|e| ConfigError::Invalid {
        field,
        message: format!("{e}: {value:?}"),
    })?;
    if matches!(url.scheme(), "http" | "https") {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            message: format!("unsupported scheme '{}'", url.scheme()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.email_domain, "doxa.test");
        assert_eq!(config.password, "TestPass123!");
        assert!(config.user_agent.starts_with("apiprobe/"));
        assert_eq!(config.pages.len(), 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_overrides_only_given_keys() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "base_url: https://staging.example.com\n\
             timeout_secs: 3\n\
             pages:\n  \
               - name: Home\n    \
                 path: /\n    \
                 expected_keywords: [DOXA]"
        )
        .unwrap();

        let config = ProbeConfig::load(Some(file.path())).unwrap();

        assert_eq!(config.base_url, "https://staging.example.com");
        assert_eq!(config.timeout_secs, 3);
        assert_eq!(config.password, "TestPass123!");
        assert_eq!(config.pages, vec![PageProbe::new("Home", "/", &["DOXA"])]);
    }

    #[test]
    fn test_unknown_key_is_a_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "base_uri: https://typo.example.com").unwrap();

        let err = ProbeConfig::from_file(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::Parse { .. }), "{err}");
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProbeConfig::from_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }), "{err}");
    }

    #[test]
    fn test_empty_file_means_defaults() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(
            ProbeConfig::from_file(file.path()).unwrap(),
            ProbeConfig::default()
        );
    }

    #[test]
    fn test_layering_precedence() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "https://env.example.com"),
            (ENV_TIMEOUT_SECS, "7"),
        ]);
        let mut config = ProbeConfig::default();

        config
            .apply_env_with(|key| env.get(key).map(ToString::to_string))
            .unwrap();
        assert_eq!(config.base_url, "https://env.example.com");
        assert_eq!(config.timeout_secs, 7);

        config.apply_overrides(ConfigOverrides {
            base_url: Some("https://cli.example.com".to_string()),
            timeout_secs: None,
        });
        assert_eq!(config.base_url, "https://cli.example.com");
        assert_eq!(config.timeout_secs, 7);
    }

    #[test]
    fn test_bad_env_timeout() {
        let mut config = ProbeConfig::default();
        let err = config
            .apply_env_with(|key| (key == ENV_TIMEOUT_SECS).then(|| "soon".to_string()))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: ENV_TIMEOUT_SECS,
                ..
            }
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ProbeConfig {
            base_url: "localhost:8000".to_string(),
            ..ProbeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "base_url",
                ..
            })
        ));

        let config = ProbeConfig {
            timeout_secs: 0,
            ..ProbeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "timeout_secs",
                ..
            })
        ));

        let config = ProbeConfig {
            pages_base_url: Some("ftp://files.example.com".to_string()),
            ..ProbeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "pages_base_url",
                ..
            })
        ));
    }

    #[test]
    fn test_scenario_settings() {
        let config = ProbeConfig {
            email_domain: "qa.example.com".to_string(),
            ..ProbeConfig::default()
        };
        let settings = config.scenario_settings();
        assert_eq!(settings.email_domain, "qa.example.com");
        assert_eq!(settings.pages, PageProbe::defaults());
    }
}
