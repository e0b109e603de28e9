//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// orgstats - who is behind a GitHub repository?
///
/// Fetches per-contributor commit statistics for a repository, resolves each
/// contributor's declared company and ranks organizations by contributions.
///
/// Examples:
///   orgstats github.com/golang/go
///   orgstats https://github.com/golang/go --concurrency 8
///   GITHUB_TOKEN=ghp_... orgstats github.com/rust-lang/cargo
///   orgstats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Repository to analyze
    ///
    /// Either host/owner/repo (e.g. github.com/golang/go) or
    /// scheme://host/owner/repo (e.g. https://github.com/golang/go).
    #[arg(value_name = "REPO", required_unless_present = "init_config")]
    pub repo: Option<String>,

    /// GitHub access token
    ///
    /// Without a token requests are anonymous and heavily rate limited.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// GitHub REST API base URL
    #[arg(long, value_name = "URL", env = "ORGSTATS_API_URL")]
    pub api_url: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .orgstats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Seconds to wait between polls while GitHub computes statistics
    #[arg(long, value_name = "SECS")]
    pub poll_interval: Option<u64>,

    /// Give up after this many polls (0 polls until GitHub answers)
    #[arg(long, value_name = "COUNT")]
    pub max_attempts: Option<u32>,

    /// Number of profile lookups in flight
    #[arg(long, value_name = "NUM")]
    pub concurrency: Option<usize>,

    /// HTTP request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not show a progress bar during profile lookups
    #[arg(long)]
    pub no_progress: bool,

    /// Generate a default .orgstats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the repository identifier (empty if not set).
    pub fn repo_identifier(&self) -> &str {
        self.repo.as_deref().unwrap_or("")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.api_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("API URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if self.poll_interval == Some(0) {
            return Err("Poll interval must be at least 1 second".to_string());
        }

        if self.concurrency == Some(0) {
            return Err("Concurrency must be at least 1".to_string());
        }

        if self.timeout == Some(0) {
            return Err("Timeout must be at least 1 second".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether to draw a progress bar.
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.no_progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            repo: Some("github.com/golang/go".to_string()),
            token: None,
            api_url: None,
            config: None,
            poll_interval: None,
            max_attempts: None,
            concurrency: None,
            timeout: None,
            verbose: false,
            quiet: false,
            no_progress: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_positional_repo() {
        let args = Args::try_parse_from(["orgstats", "https://github.com/golang/go"]).unwrap();
        assert_eq!(args.repo_identifier(), "https://github.com/golang/go");
    }

    #[test]
    fn test_repo_required() {
        assert!(Args::try_parse_from(["orgstats"]).is_err());
        assert!(Args::try_parse_from(["orgstats", "--init-config"]).is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "orgstats",
            "github.com/golang/go",
            "--concurrency",
            "8",
            "--max-attempts",
            "0",
            "--poll-interval",
            "5",
            "-v",
        ])
        .unwrap();

        assert_eq!(args.concurrency, Some(8));
        assert_eq!(args.max_attempts, Some(0));
        assert_eq!(args.poll_interval, Some(5));
        assert!(args.verbose);
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut args = make_args();
        args.api_url = Some("api.github.com".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_values() {
        let mut args = make_args();
        args.concurrency = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.timeout = Some(0);
        assert!(args.validate().is_err());

        let mut args = make_args();
        args.poll_interval = Some(0);
        assert_eq!(
            args.validate().unwrap_err(),
            "Poll interval must be at least 1 second"
        );

        let mut args = make_args();
        args.poll_interval = Some(1);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_show_progress() {
        let mut args = make_args();
        assert!(args.show_progress());

        args.no_progress = true;
        assert!(!args.show_progress());

        args.no_progress = false;
        args.quiet = true;
        assert!(!args.show_progress());
    }
}
