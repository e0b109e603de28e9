//! orgstats - contributor affiliation report for GitHub repositories
//!
//! Fetches per-contributor commit statistics for one repository, looks up
//! each contributor's declared company and prints organizations ranked by
//! total contributions.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad identifier, API failure, config error, etc.)
//!   2 - Command-line usage error

mod analysis;
mod cli;
mod config;
mod forge;
mod models;
mod repo;
mod report;

use analysis::{aggregate_by_organization, poll_contributor_stats, AggregateOptions, PollPolicy};
use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE};
use forge::{ForgeApi, GithubClient};
use models::{RepoId, Report};
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // The config file can raise the log level, so read it first and
    // report what happened once logging is up.
    let loaded = load_config(&args);
    let verbose = matches!(&loaded, Ok((config, _)) if config.general.verbose);
    init_logging(&args, verbose);

    info!("orgstats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args.repo);

    let result = match loaded {
        Ok((mut config, source)) => {
            source.log();
            config.merge_with_args(&args);
            run(&args, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Report failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .orgstats.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!("{} already exists. Remove it first or edit it manually.", CONFIG_FILE);
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG`
/// overrides the level chosen by flags.
fn init_logging(args: &Args, config_verbose: bool) {
    let level = if config_verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Where the configuration came from.
enum ConfigSource {
    File(PathBuf),
    Defaults,
    /// The default file exists but could not be used.
    Ignored(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Defaults => debug!("No config file found, using defaults"),
            ConfigSource::Ignored(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // An explicit config path must be usable
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::File(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::File(PathBuf::from(CONFIG_FILE)))),
        Ok(None) => Ok((Config::default(), ConfigSource::Defaults)),
        Err(e) => Ok((Config::default(), ConfigSource::Ignored(e))),
    }
}

/// Run the complete report workflow.
async fn run(args: &Args, config: Config) -> Result<()> {
    let repo = repo::parse_repo_identifier(args.repo_identifier())?;

    let client = GithubClient::new(config.client_options(args.token.clone()))
        .context("Failed to set up GitHub client")?;

    if client.is_authenticated() {
        info!("Using token for GitHub API access");
    } else {
        warn!("No GITHUB_TOKEN found in environment, you might get rate limited!");
    }

    let report = build_report(
        &client,
        &repo,
        &config.poll_policy(),
        &config.aggregate_options(args.show_progress()),
    )
    .await?;

    print!("{}", report::generate_text_report(&report));

    Ok(())
}

/// Fetch statistics, resolve affiliations and rank the organizations.
async fn build_report<C: ForgeApi>(
    client: &C,
    repo: &RepoId,
    policy: &PollPolicy,
    options: &AggregateOptions,
) -> Result<Report> {
    info!("Fetching contributor statistics for {}", repo);

    let stats = poll_contributor_stats(client, repo, policy)
        .await
        .with_context(|| format!("Failed to fetch contributor statistics for {}", repo))?;

    let organizations = aggregate_by_organization(client, &stats, options)
        .await
        .context("Failed to resolve contributor affiliations")?;

    debug!(
        "Attributed {} contributions",
        analysis::total_contributions(&organizations)
    );

    Ok(Report {
        repo: repo.clone(),
        total_contributors: stats.len(),
        organizations: report::rank_organizations(organizations),
    })
}
