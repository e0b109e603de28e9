//! GitHub REST client for contributor statistics and user profiles.

use crate::forge::error::{describe_reset, ForgeError};
use crate::models::{ContributorStat, RepoId, UserProfile};
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Remaining-request count below which a warning is logged.
const RATE_LIMIT_WARN_THRESHOLD: u64 = 10;

/// Read operations the report needs from a forge.
#[allow(async_fn_in_trait)]
pub trait ForgeApi {
    /// Contributor commit statistics for a repository.
    ///
    /// Returns [`ForgeError::StatsPending`] while the forge is still
    /// computing them.
    async fn contributor_stats(&self, repo: &RepoId) -> Result<Vec<ContributorStat>, ForgeError>;

    /// Public profile of a user.
    async fn user_profile(&self, login: &str) -> Result<UserProfile, ForgeError>;
}

/// Settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the REST API.
    pub api_url: String,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Access token; requests are anonymous when `None`.
    pub token: Option<String>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.com".to_string(),
            user_agent: concat!("orgstats/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }
}

/// GitHub REST API client.
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl GithubClient {
    /// Create a client from options.
    pub fn new(options: ClientOptions) -> Result<Self, ForgeError> {
        let http = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(ForgeError::Client)?;

        Ok(Self {
            http,
            api_url: options.api_url.trim_end_matches('/').to_string(),
            token: options.token.filter(|t| !t.is_empty()),
        })
    }

    /// Whether requests carry an access token.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Send an authenticated (when possible) GET request.
    async fn get(&self, url: &str) -> Result<Response, ForgeError> {
        let mut request = self
            .http
            .get(url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        debug!("GET {}", url);

        let response = request.send().await.map_err(|e| ForgeError::Network {
            url: url.to_string(),
            source: e,
        })?;

        if let Some(limit) = RateLimit::from_headers(response.headers()) {
            if limit.remaining < RATE_LIMIT_WARN_THRESHOLD {
                warn!(
                    "Only {} GitHub API requests left (resets {})",
                    limit.remaining,
                    describe_reset(&limit.reset)
                );
            }
        }

        Ok(response)
    }

    /// Turn a non-success response into an error.
    async fn fail(response: Response, resource: &str) -> ForgeError {
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await.unwrap_or_default();
        classify_failure(status, &headers, &body, resource)
    }

    async fn decode<T: DeserializeOwned>(response: Response, url: &str) -> Result<T, ForgeError> {
        response.json().await.map_err(|e| ForgeError::Decode {
            url: url.to_string(),
            source: e,
        })
    }
}

impl ForgeApi for GithubClient {
    async fn contributor_stats(&self, repo: &RepoId) -> Result<Vec<ContributorStat>, ForgeError> {
        let url = format!(
            "{}/repos/{}/{}/stats/contributors",
            self.api_url, repo.owner, repo.name
        );

        let response = self.get(&url).await?;

        match response.status() {
            StatusCode::ACCEPTED => Err(ForgeError::StatsPending),
            // Empty repositories have no statistics at all.
            StatusCode::NO_CONTENT => Ok(Vec::new()),
            status if status.is_success() => Self::decode(response, &url).await,
            _ => Err(Self::fail(response, &format!("repository {}", repo)).await),
        }
    }

    async fn user_profile(&self, login: &str) -> Result<UserProfile, ForgeError> {
        let url = format!("{}/users/{}", self.api_url, login);

        let response = self.get(&url).await?;

        if response.status().is_success() {
            Self::decode(response, &url).await
        } else {
            Err(Self::fail(response, &format!("user {}", login)).await)
        }
    }
}

/// Rate-limit state reported in response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: u64,
    pub reset: Option<DateTime<Utc>>,
}

impl RateLimit {
    /// Read `x-ratelimit-remaining` / `x-ratelimit-reset`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let remaining = header_u64(headers, "x-ratelimit-remaining")?;
        let reset = header_u64(headers, "x-ratelimit-reset")
            .and_then(|secs| i64::try_from(secs).ok())
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0));

        Some(Self { remaining, reset })
    }
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Map a failed response onto a [`ForgeError`].
pub(crate) fn classify_failure(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    resource: &str,
) -> ForgeError {
    if status == StatusCode::NOT_FOUND {
        return ForgeError::NotFound(resource.to_string());
    }

    if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
        if let Some(limit) = RateLimit::from_headers(headers) {
            if limit.remaining == 0 {
                return ForgeError::RateLimited { reset: limit.reset };
            }
        }
    }

    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());

    let message = if message.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        message
    };

    ForgeError::Api {
        status: status.as_u16(),
        message,
    }
}
