//! Repository capability used by the selection engine.
//!
//! The engine only ever talks to the hosting service through this trait, so
//! any adapter (the GitHub REST client, an in-memory fake) can drive it.

use crate::error::AppError;
use crate::models::{CommitSummary, FileChange};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Operations the selection engine needs from the hosting service.
///
/// All calls are scoped to the pull request the adapter was created for.
#[async_trait]
pub trait RepositoryApi: Send + Sync {
    /// Users whose review is currently requested on the pull request.
    ///
    /// Fails when there is no pull request context.
    async fn current_reviewers(&self) -> Result<Vec<String>, AppError>;

    /// Login of the pull request author.
    fn pr_author(&self) -> Result<String, AppError>;

    /// Request reviews from `reviewers`. Empty input is a logged no-op.
    async fn add_reviewers(&self, reviewers: &[String]) -> Result<(), AppError>;

    /// Files changed by the pull request.
    async fn list_changed_files(&self) -> Result<Vec<FileChange>, AppError>;

    /// Up to `max_count` commits touching `path` since `since`, most recent first.
    async fn list_commits(
        &self,
        path: &str,
        since: DateTime<Utc>,
        max_count: u32,
    ) -> Result<Vec<CommitSummary>, AppError>;

    /// Numbers of up to `max_count` closed pull requests, most recently updated first.
    async fn list_closed_pull_requests(&self, max_count: u32) -> Result<Vec<u64>, AppError>;

    /// Logins that submitted a review on pull request `pr_number`.
    async fn list_reviewers(&self, pr_number: u64) -> Result<Vec<String>, AppError>;

    /// Logins that commented on pull request `pr_number`.
    async fn list_commenters(&self, pr_number: u64) -> Result<Vec<String>, AppError>;
}

/// Repository and pull request the run is working on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestContext {
    pub owner: String,
    pub repo: String,
    /// `None` when the triggering event is not a pull request event.
    pub pr_number: Option<u64>,
    pub author: Option<String>,
}

impl PullRequestContext {
    /// PR number, or the fatal error used when the event has none.
    pub fn require_pr_number(&self) -> Result<u64, AppError> {
        self.pr_number.ok_or_else(|| {
            AppError::missing_context("This action can only be run on pull request events")
        })
    }

    /// PR author, or the fatal error used when it cannot be determined.
    pub fn require_author(&self) -> Result<String, AppError> {
        self.author
            .clone()
            .filter(|a| !a.is_empty())
            .ok_or_else(|| AppError::missing_context("Unable to determine PR author"))
    }
}
