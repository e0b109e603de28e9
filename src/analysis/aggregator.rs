//! Affiliation aggregation.
//!
//! Each contributor's public profile is fetched, the company field is
//! normalized, and commit totals are accumulated per organization.

use crate::forge::{ForgeApi, ForgeError};
use crate::models::{ContributorStat, OrganizationStats, GHOST_LOGIN, NO_COMPANY};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use tracing::{debug, info};

/// Options for the profile lookup pass.
#[derive(Debug, Clone)]
pub struct AggregateOptions {
    /// Maximum number of profile requests in flight.
    pub concurrency: usize,
    /// Whether to show a progress bar.
    pub show_progress: bool,
}

impl Default for AggregateOptions {
    fn default() -> Self {
        Self {
            concurrency: 1,
            show_progress: false,
        }
    }
}

/// Normalize a free-text company field into an organization name.
///
/// Missing or blank companies map to [`NO_COMPANY`]; a leading `@`
/// (the forge convention for tagging an organization) is stripped.
pub fn normalize_company(company: Option<&str>) -> String {
    let company = company.map(str::trim).unwrap_or_default();
    let company = company.strip_prefix('@').unwrap_or(company).trim();

    if company.is_empty() {
        NO_COMPANY.to_string()
    } else {
        company.to_string()
    }
}

/// Group contributor statistics by declared organization.
///
/// Profile lookups run with up to `options.concurrency` requests in flight,
/// but results are folded in input order, so the outcome is the same as a
/// sequential pass. The first failed lookup aborts the aggregation.
pub async fn aggregate_by_organization<C: ForgeApi>(
    client: &C,
    stats: &[ContributorStat],
    options: &AggregateOptions,
) -> Result<HashMap<String, OrganizationStats>, ForgeError> {
    info!(
        "Resolving affiliations for {} contributors ({} at a time)",
        stats.len(),
        options.concurrency.max(1)
    );

    let progress = options.show_progress.then(|| lookup_progress_bar(stats.len()));

    let lookups = stream::iter(stats)
        .map(|stat| async move {
            let company = match stat.login() {
                Some(login) => {
                    let profile = client.user_profile(login).await?;
                    debug!("{} declares company {:?}", profile.login, profile.company);
                    profile.company
                }
                // Deleted accounts have no profile to look up.
                None => None,
            };
            Ok::<_, ForgeError>((stat, company))
        })
        .buffered(options.concurrency.max(1));
    let mut lookups = std::pin::pin!(lookups);

    let mut organizations: HashMap<String, OrganizationStats> = HashMap::new();

    while let Some(result) = lookups.next().await {
        let (stat, company) = match result {
            Ok(found) => found,
            Err(e) => {
                if let Some(ref pb) = progress {
                    pb.abandon();
                }
                return Err(e);
            }
        };

        let name = normalize_company(company.as_deref());
        debug!(
            "{} -> {} ({} contributions)",
            stat.login().unwrap_or(GHOST_LOGIN),
            name,
            stat.total
        );

        organizations
            .entry(name.clone())
            .or_insert_with(|| OrganizationStats::new(name))
            .record(stat.login().unwrap_or(GHOST_LOGIN), stat.total);

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    info!("Found {} distinct organizations", organizations.len());

    Ok(organizations)
}

/// Total contributions across all organizations.
pub fn total_contributions(organizations: &HashMap<String, OrganizationStats>) -> u64 {
    organizations.values().map(|o| o.contributions).sum()
}

fn lookup_progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} profiles",
    ) {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
