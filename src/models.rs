//! Data models for the affiliation report.
//!
//! This module contains the forge payloads the tool consumes and the
//! aggregated structures built from them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel organization for contributors without a declared company.
pub const NO_COMPANY: &str = "No company";

/// Login the forge uses for deleted accounts.
pub const GHOST_LOGIN: &str = "ghost";

/// Repository coordinates on the forge.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    /// Owning user or organization.
    pub owner: String,
    /// Repository name.
    pub name: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Author reference embedded in a contributor statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub login: String,
}

/// Commit statistics for one contributor, as reported by the forge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorStat {
    /// `None` when the account behind the commits has been deleted.
    #[serde(default)]
    pub author: Option<Author>,
    /// Total number of commits authored by the contributor.
    pub total: u64,
}

impl ContributorStat {
    /// Creates a statistic for a known login.
    #[cfg(test)]
    pub fn new(login: &str, total: u64) -> Self {
        Self {
            author: Some(Author {
                login: login.to_string(),
            }),
            total,
        }
    }

    /// Login of the contributor, if the account still exists.
    pub fn login(&self) -> Option<&str> {
        self.author.as_ref().map(|a| a.login.as_str())
    }
}

/// Public profile of a forge user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub login: String,
    /// Free-text company field; often `@org` for forge organizations.
    #[serde(default)]
    pub company: Option<String>,
}

/// Contributions attributed to a single organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationStats {
    /// Normalized organization name.
    pub name: String,
    /// Contributor logins in the order they were seen.
    pub contributors: Vec<String>,
    /// Sum of the contributors' commit totals.
    pub contributions: u64,
}

impl OrganizationStats {
    /// Creates an empty entry for an organization.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            contributors: Vec::new(),
            contributions: 0,
        }
    }

    /// Attributes a contributor and their commits to this organization.
    pub fn record(&mut self, login: impl Into<String>, total: u64) {
        self.contributors.push(login.into());
        self.contributions = self.contributions.saturating_add(total);
    }
}

impl fmt::Display for OrganizationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Contributors: [{}], Contributions: {}",
            self.name,
            self.contributors.join(" "),
            self.contributions
        )
    }
}

/// The complete affiliation report.
#[derive(Debug, Clone)]
pub struct Report {
    /// Repository the statistics belong to.
    pub repo: RepoId,
    /// Number of contributor statistics returned by the forge.
    pub total_contributors: usize,
    /// Organizations, ranked by contributions.
    pub organizations: Vec<OrganizationStats>,
}
