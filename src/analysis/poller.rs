//! Waiting for the forge to finish computing contributor statistics.
//!
//! GitHub answers the statistics endpoint with `202 Accepted` until the
//! numbers are cached. The poller sleeps a fixed interval between attempts
//! and gives up after a configurable number of attempts.

use crate::forge::{ForgeApi, ForgeError};
use crate::models::{ContributorStat, RepoId};
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info};

/// How the poller retries while statistics are pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Fixed delay between attempts.
    pub interval: Duration,
    /// Maximum number of attempts; `None` polls until the forge answers.
    pub max_attempts: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            max_attempts: Some(100),
        }
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error("contributor statistics for {repo} were still being computed after {attempts} attempts")]
    TimedOut { repo: RepoId, attempts: u32 },

    #[error(transparent)]
    Forge(#[from] ForgeError),
}

/// Fetch contributor statistics, retrying while the forge is computing them.
pub async fn poll_contributor_stats<C: ForgeApi>(
    client: &C,
    repo: &RepoId,
    policy: &PollPolicy,
) -> Result<Vec<ContributorStat>, PollError> {
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        debug!("Requesting contributor statistics for {} (attempt {})", repo, attempt);

        match client.contributor_stats(repo).await {
            Ok(stats) => {
                info!("Received statistics for {} contributors", stats.len());
                return Ok(stats);
            }
            Err(e) if e.is_pending() => {
                if policy.max_attempts.is_some_and(|max| attempt >= max) {
                    return Err(PollError::TimedOut {
                        repo: repo.clone(),
                        attempts: attempt,
                    });
                }
                info!(
                    "Statistics scheduled on GitHub side, retrying in {}s",
                    policy.interval.as_secs_f64()
                );
                sleep(policy.interval).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
