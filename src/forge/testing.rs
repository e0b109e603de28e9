//! In-memory forge used by tests.

use crate::forge::{ForgeApi, ForgeError};
use crate::models::{ContributorStat, RepoId, UserProfile};
use std::collections::HashMap;
use std::sync::Mutex;

/// Forge with fixed statistics and profiles.
#[derive(Default)]
pub struct StaticForge {
    stats: Vec<ContributorStat>,
    profiles: HashMap<String, UserProfile>,
    lookups: Mutex<Vec<String>>,
}

impl StaticForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a contributor with the given commit total and company field.
    pub fn contributor(mut self, login: &str, total: u64, company: Option<&str>) -> Self {
        self.stats.push(ContributorStat::new(login, total));
        self.profiles.insert(
            login.to_string(),
            UserProfile {
                login: login.to_string(),
                company: company.map(String::from),
            },
        );
        self
    }

    /// Adds a contributor whose profile lookup will fail.
    pub fn contributor_without_profile(mut self, login: &str, total: u64) -> Self {
        self.stats.push(ContributorStat::new(login, total));
        self
    }

    /// Adds commits from a deleted account.
    pub fn deleted_contributor(mut self, total: u64) -> Self {
        self.stats.push(ContributorStat {
            author: None,
            total,
        });
        self
    }

    pub fn stats(&self) -> &[ContributorStat] {
        &self.stats
    }

    /// Logins looked up so far, in request order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl ForgeApi for StaticForge {
    async fn contributor_stats(&self, _repo: &RepoId) -> Result<Vec<ContributorStat>, ForgeError> {
        Ok(self.stats.clone())
    }

    async fn user_profile(&self, login: &str) -> Result<UserProfile, ForgeError> {
        self.lookups.lock().unwrap().push(login.to_string());
        self.profiles
            .get(login)
            .cloned()
            .ok_or_else(|| ForgeError::NotFound(format!("user {login}")))
    }
}
