//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.orgstats.toml` files.

use crate::analysis::{AggregateOptions, PollPolicy};
use crate::forge::ClientOptions;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default configuration file name.
pub const CONFIG_FILE: &str = ".orgstats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Forge API settings.
    #[serde(default)]
    pub forge: ForgeConfig,

    /// Statistics polling settings.
    #[serde(default)]
    pub poll: PollConfig,

    /// Profile lookup settings.
    #[serde(default)]
    pub lookup: LookupConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Forge API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForgeConfig {
    /// REST API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User-Agent header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    concat!("orgstats/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Statistics polling settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    /// Seconds between polls while statistics are being computed.
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,

    /// Maximum polls before giving up; 0 polls forever.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            max_attempts: default_max_attempts(),
        }
    }
}

fn default_interval() -> u64 {
    3
}

fn default_max_attempts() -> u32 {
    100 // ~5 min at the default interval
}

/// Profile lookup settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Profile requests in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `.orgstats.toml` in `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(CONFIG_FILE);

        if path.exists() {
            Ok(Some(Self::load(&path)?))
        } else {
            Ok(None)
        }
    }

    /// Try to load configuration from the current directory.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.forge.api_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.forge.timeout_seconds = timeout;
        }
        if let Some(interval) = args.poll_interval {
            self.poll.interval_seconds = interval;
        }
        if let Some(max_attempts) = args.max_attempts {
            self.poll.max_attempts = max_attempts;
        }
        if let Some(concurrency) = args.concurrency {
            self.lookup.concurrency = concurrency;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Client settings for the forge API.
    pub fn client_options(&self, token: Option<String>) -> ClientOptions {
        ClientOptions {
            api_url: self.forge.api_url.clone(),
            user_agent: self.forge.user_agent.clone(),
            timeout: Duration::from_secs(self.forge.timeout_seconds.max(1)),
            token,
        }
    }

    /// Retry policy for the statistics endpoint.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            interval: Duration::from_secs(self.poll.interval_seconds),
            max_attempts: (self.poll.max_attempts > 0).then_some(self.poll.max_attempts),
        }
    }

    /// Options for the profile lookup pass.
    pub fn aggregate_options(&self, show_progress: bool) -> AggregateOptions {
        AggregateOptions {
            concurrency: self.lookup.concurrency.max(1),
            show_progress,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.forge.api_url, "https://api.github.com");
        assert_eq!(config.poll.interval_seconds, 3);
        assert_eq!(config.poll.max_attempts, 100);
        assert_eq!(config.lookup.concurrency, 1);
        assert!(!config.general.verbose);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
verbose = true

[forge]
api_url = "https://ghe.example.com/api/v3"

[poll]
max_attempts = 0

[lookup]
concurrency = 6
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.forge.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(config.forge.timeout_seconds, 30);
        assert_eq!(config.poll.interval_seconds, 3);
        assert_eq!(config.poll.max_attempts, 0);
        assert_eq!(config.lookup.concurrency, 6);
    }

    #[test]
    fn test_poll_policy() {
        let mut config = Config::default();
        let policy = config.poll_policy();
        assert_eq!(policy.interval, Duration::from_secs(3));
        assert_eq!(policy.max_attempts, Some(100));

        config.poll.max_attempts = 0;
        assert_eq!(config.poll_policy().max_attempts, None);
    }

    #[test]
    fn test_merge_with_args() {
        let args = Args::try_parse_from([
            "orgstats",
            "github.com/golang/go",
            "--api-url",
            "http://localhost:8080",
            "--concurrency",
            "4",
            "--max-attempts",
            "10",
            "--verbose",
        ])
        .unwrap();

        let mut config = Config::default();
        config.poll.interval_seconds = 7;
        config.merge_with_args(&args);

        assert_eq!(config.forge.api_url, "http://localhost:8080");
        assert_eq!(config.lookup.concurrency, 4);
        assert_eq!(config.poll.max_attempts, 10);
        // Not given on the command line, so the file value survives.
        assert_eq!(config.poll.interval_seconds, 7);
        assert!(config.general.verbose);
    }

    #[test]
    fn test_client_options() {
        let config = Config::default();
        let options = config.client_options(Some("ghp_example".to_string()));
        assert_eq!(options.api_url, "https://api.github.com");
        assert!(options.user_agent.starts_with("orgstats/"));
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert_eq!(options.token.as_deref(), Some("ghp_example"));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(dir.path().join(CONFIG_FILE), "[lookup]\nconcurrency = 3\n").unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.lookup.concurrency, 3);

        std::fs::write(dir.path().join(CONFIG_FILE), "[lookup\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_roundtrip() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[forge]"));
        assert!(toml_str.contains("[poll]"));
        assert!(toml_str.contains("[lookup]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
