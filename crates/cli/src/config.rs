//! Configuration loading from fetch.toml.

use fetch::ClientConfig;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::probe::TcpProbe;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// HTTP client settings.
    #[serde(default)]
    pub client: ClientSection,

    /// Connectivity probe settings, used with `--probe`.
    #[serde(default)]
    pub probe: ProbeConfig,
}

/// The `[client]` table. Every field may be overridden on the command line.
#[derive(Debug, Default, Deserialize)]
pub struct ClientSection {
    pub base_url: Option<String>,
    pub call_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

/// The `[probe]` table.
#[derive(Debug, Deserialize)]
pub struct ProbeConfig {
    /// Address a TCP connection is attempted against.
    #[serde(default = "default_probe_address")]
    pub address: String,

    #[serde(default = "default_probe_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            address: default_probe_address(),
            timeout_ms: default_probe_timeout_ms(),
        }
    }
}

fn default_probe_address() -> String {
    "1.1.1.1:53".to_string()
}

fn default_probe_timeout_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Load `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Merge the `[client]` table with command-line overrides.
    pub fn client_config(
        &self,
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
    ) -> Result<ClientConfig, ConfigError> {
        let base_url = base_url
            .map(str::to_string)
            .or_else(|| self.client.base_url.clone())
            .ok_or(ConfigError::MissingBaseUrl)?;

        let mut config = ClientConfig::new(base_url);
        if let Some(secs) = timeout_secs.or(self.client.call_timeout_secs) {
            config.call_timeout_secs = secs;
        }
        config.user_agent = self.client.user_agent.clone();
        Ok(config)
    }

    /// Build the TCP connectivity probe from the `[probe]` table.
    pub fn tcp_probe(&self) -> Result<TcpProbe, ConfigError> {
        let address = self
            .probe
            .address
            .parse()
            .map_err(|_| ConfigError::InvalidProbeAddress(self.probe.address.clone()))?;
        Ok(TcpProbe::new(
            address,
            Duration::from_millis(self.probe.timeout_ms),
        ))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("base url not configured: set client.base_url or pass --base-url")]
    MissingBaseUrl,

    #[error("invalid probe address '{0}': expected host:port with an IP address")]
    InvalidProbeAddress(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parses_full_config() {
        let config = Config::parse(
            r#"
            [client]
            base_url = "https://api.example.test/v1/"
            call_timeout_secs = 5
            user_agent = "tests/1.0"

            [probe]
            address = "127.0.0.1:9"
            timeout_ms = 250
            "#,
        )
        .unwrap();

        let client = config.client_config(None, None).unwrap();
        assert_eq!(client.base_url, "https://api.example.test/v1/");
        assert_eq!(client.call_timeout_secs, 5);
        assert_eq!(client.user_agent.as_deref(), Some("tests/1.0"));
        assert_eq!(config.probe.timeout_ms, 250);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.probe.address, "1.1.1.1:53");
        assert_eq!(config.probe.timeout_ms, 1000);
        assert!(matches!(
            config.client_config(None, None),
            Err(ConfigError::MissingBaseUrl)
        ));
    }

    #[test]
    fn command_line_overrides_file() {
        let config = Config::parse(
            r#"
            [client]
            base_url = "https://file.example.test/"
            call_timeout_secs = 5
            "#,
        )
        .unwrap();

        let client = config
            .client_config(Some("https://flag.example.test/"), Some(9))
            .unwrap();
        assert_eq!(client.base_url, "https://flag.example.test/");
        assert_eq!(client.call_timeout_secs, 9);
    }

    #[test]
    fn rejects_unparseable_toml() {
        assert!(matches!(
            Config::parse("[client\nbase_url = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_hostname_probe_address() {
        let config = Config::parse("[probe]\naddress = \"one.one.one.one:53\"").unwrap();
        assert!(matches!(
            config.tcp_probe(),
            Err(ConfigError::InvalidProbeAddress(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[client]\nbase_url = \"http://localhost:8080/\"").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(
            config.client.base_url.as_deref(),
            Some("http://localhost:8080/")
        );
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(dir.path().join("fetch.toml")).unwrap();
        assert!(config.client.base_url.is_none());

        assert!(matches!(
            Config::load(dir.path().join("fetch.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
