//! GitHub API client.
//!
//! Provides HTTP client for the GitHub REST API with token authentication
//! and `Link` header pagination, scoped to a single pull request.

use crate::error::AppError;
use crate::models::{CommitSummary, FileChange, FileStatus};
use crate::services::repository::{PullRequestContext, RepositoryApi};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Default API root for github.com.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Largest page size the API accepts.
const MAX_PER_PAGE: u32 = 100;

/// GitHub API client configuration.
#[derive(Debug, Clone)]
pub struct GitHubClientConfig {
    /// API root (e.g., `https://api.github.com` or `https://ghe.example.com/api/v3`).
    pub base_url: String,

    /// Access token for authentication.
    pub token: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            token: String::new(),
            timeout_secs: 30,
        }
    }
}

/// GitHub API client bound to one pull request.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    config: GitHubClientConfig,
    context: PullRequestContext,
}

/// Paginated response from GitHub API.
#[derive(Debug)]
pub struct PaginatedResponse<T> {
    /// The response data.
    pub data: Vec<T>,

    /// URL of the next page, from the `Link` header.
    pub next_url: Option<String>,
}

/// Query parameters for listing pull requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PullRequestsQuery {
    /// Filter by state: `open`, `closed`, `all`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    /// Sort field: `created`, `updated`, `popularity`, `long-running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,

    /// Sort direction: `asc` or `desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// Number of items per page (max 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,

    /// Page number for pagination.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Query parameters for listing commits.
#[derive(Debug, Clone, Serialize)]
pub struct CommitsQuery<'a> {
    pub path: &'a str,
    /// ISO 8601 timestamp.
    pub since: String,
    pub per_page: u32,
}

/// GitHub user from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// GitHub pull request from API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullRequest {
    pub number: u64,
    #[serde(default)]
    pub requested_reviewers: Vec<GitHubUser>,
}

/// Review on a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubReview {
    pub user: Option<GitHubUser>,
}

/// Conversation comment on a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubComment {
    pub user: Option<GitHubUser>,
}

/// File changed by a pull request.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubPullFile {
    pub filename: String,
    pub status: String,
}

/// Commit from the repository commits listing.
///
/// `author` is the linked account and is `null` for unknown emails.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubCommit {
    pub author: Option<GitHubUser>,
}

impl GitHubClient {
    /// Create a new GitHub client for the pull request in `context`.
    pub fn new(config: GitHubClientConfig, context: PullRequestContext) -> Result<Self, AppError> {
        let mut headers = header::HeaderMap::new();

        let mut token_value = header::HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| AppError::authentication("Invalid token format"))?;
        token_value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, token_value);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static("2022-11-28"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("smart-reviewers/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            context,
        })
    }

    /// Build the full URL for an API path.
    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Path prefix for the repository, with owner and name URL-encoded.
    fn repo_path(&self) -> String {
        format!(
            "/repos/{}/{}",
            urlencoding::encode(&self.context.owner),
            urlencoding::encode(&self.context.repo)
        )
    }

    /// Extract the `rel="next"` URL from the `Link` header.
    fn parse_next_link(response: &Response) -> Option<String> {
        response
            .headers()
            .get(header::LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_link)
    }

    /// Handle API response errors.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
        endpoint: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| AppError::internal(format!("Failed to parse response: {}", e)))
        } else {
            Err(Self::error_from_response(response, endpoint).await)
        }
    }

    /// Turn an unsuccessful response into an [`AppError`].
    async fn error_from_response(response: Response, endpoint: &str) -> AppError {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return AppError::authentication("GitHub token is invalid or expired");
        }

        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        // GitHub returns errors as {"message": "...", "documentation_url": "..."}
        let body_message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("message")?.as_str().map(String::from));

        let message = match (status, &body_message) {
            (StatusCode::FORBIDDEN, _) => "Access denied".to_string(),
            (StatusCode::NOT_FOUND, _) => "Resource not found".to_string(),
            (StatusCode::TOO_MANY_REQUESTS, _) => "Rate limit exceeded".to_string(),
            (_, Some(msg)) => msg.clone(),
            _ => format!("Request failed ({}): {}", status_code, body),
        };

        AppError::github_api_full(&message, status_code, endpoint)
    }

    /// Make a GET request for one page.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&impl Serialize>,
    ) -> Result<PaginatedResponse<T>, AppError> {
        let url = self.api_url(endpoint);

        let mut request = self.client.get(&url);
        if let Some(q) = query {
            request = request.query(q);
        }

        let response = request.send().await?;
        let next_url = Self::parse_next_link(&response);
        let data = self.handle_response::<Vec<T>>(response, endpoint).await?;

        Ok(PaginatedResponse { data, next_url })
    }

    /// Fetch all pages of a paginated endpoint.
    pub async fn get_all_pages<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, AppError> {
        let mut all_data = Vec::new();

        // The `Link` header carries the full URL, query included.
        let mut next = Some(self.api_url(endpoint));
        let mut first = true;

        while let Some(url) = next.take() {
            let mut request = self.client.get(&url);
            if first {
                request = request.query(&[("per_page", MAX_PER_PAGE)]);
                first = false;
            }

            let response = request.send().await?;
            let next_url = Self::parse_next_link(&response);
            let data = self.handle_response::<Vec<T>>(response, endpoint).await?;

            all_data.extend(data);
            next = next_url;
        }

        Ok(all_data)
    }

    /// Get the pull request this client is bound to.
    pub async fn get_pull_request(&self) -> Result<GitHubPullRequest, AppError> {
        let pr_number = self.context.require_pr_number()?;
        let endpoint = format!("{}/pulls/{}", self.repo_path(), pr_number);
        let url = self.api_url(&endpoint);
        let response = self.client.get(&url).send().await?;
        self.handle_response(response, &endpoint).await
    }

    /// List closed pull requests, most recently updated first, up to `limit`.
    pub async fn closed_pull_requests(
        &self,
        limit: u32,
    ) -> Result<Vec<GitHubPullRequest>, AppError> {
        let endpoint = format!("{}/pulls", self.repo_path());
        let mut collected = Vec::new();
        let mut page = 1u32;

        while (collected.len() as u32) < limit {
            let wanted = limit - collected.len() as u32;
            let query = PullRequestsQuery {
                state: Some("closed".to_string()),
                sort: Some("updated".to_string()),
                direction: Some("desc".to_string()),
                per_page: Some(limit.min(MAX_PER_PAGE)),
                page: Some(page),
            };

            let response = self
                .get_paginated::<GitHubPullRequest>(&endpoint, Some(&query))
                .await?;
            let exhausted = response.next_url.is_none();
            collected.extend(response.data.into_iter().take(wanted as usize));

            if exhausted {
                break;
            }
            page += 1;
        }

        Ok(collected)
    }
}

#[async_trait]
impl RepositoryApi for GitHubClient {
    async fn current_reviewers(&self) -> Result<Vec<String>, AppError> {
        let pr = self.get_pull_request().await?;
        Ok(pr
            .requested_reviewers
            .into_iter()
            .map(|user| user.login)
            .collect())
    }

    fn pr_author(&self) -> Result<String, AppError> {
        self.context.require_author()
    }

    async fn add_reviewers(&self, reviewers: &[String]) -> Result<(), AppError> {
        let pr_number = self.context.require_pr_number()?;

        if reviewers.is_empty() {
            log::info!("No reviewers to add");
            return Ok(());
        }

        let endpoint = format!("{}/pulls/{}/requested_reviewers", self.repo_path(), pr_number);
        let url = self.api_url(&endpoint);

        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({ "reviewers": reviewers }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response, &endpoint).await);
        }

        log::info!("Added reviewers: {}", reviewers.join(", "));
        Ok(())
    }

    async fn list_changed_files(&self) -> Result<Vec<FileChange>, AppError> {
        let pr_number = self.context.require_pr_number()?;
        let endpoint = format!("{}/pulls/{}/files", self.repo_path(), pr_number);
        let files: Vec<GitHubPullFile> = self.get_all_pages(&endpoint).await?;

        Ok(files
            .into_iter()
            .map(|f| FileChange::new(f.filename, FileStatus::from(f.status.as_str())))
            .collect())
    }

    async fn list_commits(
        &self,
        path: &str,
        since: DateTime<Utc>,
        max_count: u32,
    ) -> Result<Vec<CommitSummary>, AppError> {
        let endpoint = format!("{}/commits", self.repo_path());
        let query = CommitsQuery {
            path,
            since: since.to_rfc3339_opts(SecondsFormat::Secs, true),
            per_page: max_count.min(MAX_PER_PAGE),
        };

        let response = self
            .get_paginated::<GitHubCommit>(&endpoint, Some(&query))
            .await?;

        Ok(response
            .data
            .into_iter()
            .take(max_count as usize)
            .map(|c| CommitSummary {
                author: c.author.map(|u| u.login),
            })
            .collect())
    }

    async fn list_closed_pull_requests(&self, max_count: u32) -> Result<Vec<u64>, AppError> {
        let prs = self.closed_pull_requests(max_count).await?;
        Ok(prs.into_iter().map(|pr| pr.number).collect())
    }

    async fn list_reviewers(&self, pr_number: u64) -> Result<Vec<String>, AppError> {
        let endpoint = format!("{}/pulls/{}/reviews", self.repo_path(), pr_number);
        let reviews: Vec<GitHubReview> = self.get_all_pages(&endpoint).await?;
        Ok(logins(reviews.into_iter().map(|r| r.user)))
    }

    async fn list_commenters(&self, pr_number: u64) -> Result<Vec<String>, AppError> {
        let endpoint = format!("{}/issues/{}/comments", self.repo_path(), pr_number);
        let comments: Vec<GitHubComment> = self.get_all_pages(&endpoint).await?;
        Ok(logins(comments.into_iter().map(|c| c.user)))
    }
}

/// Logins of present users, each once, in first-seen order.
fn logins(users: impl Iterator<Item = Option<GitHubUser>>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for login in users.flatten().map(|u| u.login) {
        if !login.is_empty() && !out.contains(&login) {
            out.push(login);
        }
    }
    out
}

/// Find the `rel="next"` target in a `Link` header value.
///
/// Format: `<https://api.github.com/...&page=2>; rel="next", <...>; rel="last"`.
fn next_link(header_value: &str) -> Option<String> {
    header_value.split(',').find_map(|part| {
        let mut pieces = part.split(';');
        let target = pieces.next()?.trim();
        let is_next = pieces.any(|p| p.trim() == "rel=\"next\"");
        if is_next && target.starts_with('<') && target.ends_with('>') {
            Some(target[1..target.len() - 1].to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_link_parsing() {
        let header = "<https://api.github.com/repositories/1/pulls?page=2>; rel=\"next\", \
                      <https://api.github.com/repositories/1/pulls?page=5>; rel=\"last\"";
        assert_eq!(
            next_link(header).as_deref(),
            Some("https://api.github.com/repositories/1/pulls?page=2")
        );

        let last_page = "<https://api.github.com/repositories/1/pulls?page=1>; rel=\"first\", \
                         <https://api.github.com/repositories/1/pulls?page=4>; rel=\"prev\"";
        assert_eq!(next_link(last_page), None);
        assert_eq!(next_link(""), None);
    }

    #[test]
    fn test_logins_skip_ghosts_and_duplicates() {
        let users = vec![
            Some(GitHubUser { login: "alice".into() }),
            None,
            Some(GitHubUser { login: "bob".into() }),
            Some(GitHubUser { login: "alice".into() }),
        ];
        assert_eq!(logins(users.into_iter()), vec!["alice", "bob"]);
    }

    #[test]
    fn test_pull_requests_query_serialization() {
        let query = PullRequestsQuery {
            state: Some("closed".to_string()),
            sort: Some("updated".to_string()),
            per_page: Some(10),
            ..Default::default()
        };

        let json = serde_json::to_string(&query).unwrap();
        assert!(json.contains("\"state\":\"closed\""));
        assert!(json.contains("\"sort\":\"updated\""));
        assert!(json.contains("\"per_page\":10"));
        // direction should not be present (None)
        assert!(!json.contains("direction"));
    }

    #[test]
    fn test_repo_path_is_encoded() {
        let client = GitHubClient::new(
            GitHubClientConfig {
                base_url: "https://api.github.com/".to_string(),
                token: "test-token".to_string(),
                timeout_secs: 30,
            },
            PullRequestContext {
                owner: "octo org".into(),
                repo: "app".into(),
                pr_number: Some(1),
                author: Some("octocat".into()),
            },
        )
        .unwrap();

        assert_eq!(client.repo_path(), "/repos/octo%20org/app");
        assert_eq!(
            client.api_url("/repos/o/r"),
            "https://api.github.com/repos/o/r"
        );
    }

    #[test]
    fn test_invalid_token_is_rejected() {
        let config = GitHubClientConfig {
            token: "bad\ntoken".to_string(),
            ..Default::default()
        };
        let err = GitHubClient::new(config, PullRequestContext::default()).unwrap_err();
        assert!(matches!(err, AppError::Authentication { .. }));
    }
}
