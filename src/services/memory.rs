//! In-memory repository for tests and dry runs.
//!
//! [`InMemoryRepository`] serves canned pull request data through the
//! [`RepositoryApi`] trait and can be told to fail individual calls, which
//! makes the fallback paths of the selection engine easy to exercise.
//! Nothing is shared across processes or persisted.

use crate::error::AppError;
use crate::models::{CommitSummary, FileChange};
use crate::services::repository::{PullRequestContext, RepositoryApi};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;

/// A recorded `list_commits` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitQuery {
    pub path: String,
    pub since: DateTime<Utc>,
    pub max_count: u32,
}

/// Canned repository state served through [`RepositoryApi`].
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    context: PullRequestContext,
    requested_reviewers: Vec<String>,
    files: Vec<FileChange>,
    commits: HashMap<String, Vec<CommitSummary>>,
    closed_prs: Vec<u64>,
    reviews: HashMap<u64, Vec<String>>,
    comments: HashMap<u64, Vec<String>>,

    fail_closed_prs: bool,
    fail_files: bool,
    failing_reviews: HashSet<u64>,
    failing_comments: HashSet<u64>,
    failing_commits: HashSet<String>,

    added: Mutex<Vec<Vec<String>>>,
    commit_queries: Mutex<Vec<CommitQuery>>,
}

impl InMemoryRepository {
    /// Repository with an open pull request `pr_number` authored by `author`.
    pub fn for_pull_request(pr_number: u64, author: impl Into<String>) -> Self {
        Self {
            context: PullRequestContext {
                owner: "octo".into(),
                repo: "app".into(),
                pr_number: Some(pr_number),
                author: Some(author.into()),
            },
            ..Default::default()
        }
    }

    /// Repository whose triggering event has no pull request.
    pub fn without_pull_request() -> Self {
        Self::default()
    }

    pub fn with_requested_reviewers(mut self, reviewers: &[&str]) -> Self {
        self.requested_reviewers = owned(reviewers);
        self
    }

    pub fn with_file(mut self, file: FileChange) -> Self {
        self.files.push(file);
        self
    }

    /// Commit authors for `path`, most recent first. `None` marks an unlinked author.
    pub fn with_commits(mut self, path: &str, authors: &[Option<&str>]) -> Self {
        let commits = authors
            .iter()
            .map(|a| match a {
                Some(login) => CommitSummary::by(*login),
                None => CommitSummary::unlinked(),
            })
            .collect();
        self.commits.insert(path.to_string(), commits);
        self
    }

    /// Add a closed pull request with its reviewers and commenters.
    ///
    /// Pull requests are listed in the order they were added.
    pub fn with_closed_pr(mut self, pr_number: u64, reviewers: &[&str], commenters: &[&str]) -> Self {
        self.closed_prs.push(pr_number);
        self.reviews.insert(pr_number, owned(reviewers));
        self.comments.insert(pr_number, owned(commenters));
        self
    }

    pub fn failing_closed_prs(mut self) -> Self {
        self.fail_closed_prs = true;
        self
    }

    pub fn failing_files(mut self) -> Self {
        self.fail_files = true;
        self
    }

    pub fn failing_reviews(mut self, pr_number: u64) -> Self {
        self.failing_reviews.insert(pr_number);
        self
    }

    pub fn failing_comments(mut self, pr_number: u64) -> Self {
        self.failing_comments.insert(pr_number);
        self
    }

    pub fn failing_commits(mut self, path: &str) -> Self {
        self.failing_commits.insert(path.to_string());
        self
    }

    /// Every non-empty `add_reviewers` call, in order.
    pub async fn added_reviewers(&self) -> Vec<Vec<String>> {
        self.added.lock().await.clone()
    }

    /// Every `list_commits` call, in order.
    pub async fn commit_queries(&self) -> Vec<CommitQuery> {
        self.commit_queries.lock().await.clone()
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn unavailable(endpoint: impl Into<String>) -> AppError {
    AppError::github_api_full("Service unavailable", 503, endpoint)
}

#[async_trait]
impl RepositoryApi for InMemoryRepository {
    async fn current_reviewers(&self) -> Result<Vec<String>, AppError> {
        self.context.require_pr_number()?;
        Ok(self.requested_reviewers.clone())
    }

    fn pr_author(&self) -> Result<String, AppError> {
        self.context.require_author()
    }

    async fn add_reviewers(&self, reviewers: &[String]) -> Result<(), AppError> {
        self.context.require_pr_number()?;
        if reviewers.is_empty() {
            log::info!("No reviewers to add");
            return Ok(());
        }
        self.added.lock().await.push(reviewers.to_vec());
        Ok(())
    }

    async fn list_changed_files(&self) -> Result<Vec<FileChange>, AppError> {
        let pr_number = self.context.require_pr_number()?;
        if self.fail_files {
            return Err(unavailable(format!("/pulls/{}/files", pr_number)));
        }
        Ok(self.files.clone())
    }

    async fn list_commits(
        &self,
        path: &str,
        since: DateTime<Utc>,
        max_count: u32,
    ) -> Result<Vec<CommitSummary>, AppError> {
        self.commit_queries.lock().await.push(CommitQuery {
            path: path.to_string(),
            since,
            max_count,
        });

        if self.failing_commits.contains(path) {
            return Err(unavailable("/commits"));
        }

        let mut commits = self.commits.get(path).cloned().unwrap_or_default();
        commits.truncate(max_count as usize);
        Ok(commits)
    }

    async fn list_closed_pull_requests(&self, max_count: u32) -> Result<Vec<u64>, AppError> {
        if self.fail_closed_prs {
            return Err(unavailable("/pulls"));
        }
        Ok(self
            .closed_prs
            .iter()
            .take(max_count as usize)
            .copied()
            .collect())
    }

    async fn list_reviewers(&self, pr_number: u64) -> Result<Vec<String>, AppError> {
        if self.failing_reviews.contains(&pr_number) {
            return Err(unavailable(format!("/pulls/{}/reviews", pr_number)));
        }
        Ok(self.reviews.get(&pr_number).cloned().unwrap_or_default())
    }

    async fn list_commenters(&self, pr_number: u64) -> Result<Vec<String>, AppError> {
        if self.failing_comments.contains(&pr_number) {
            return Err(unavailable(format!("/issues/{}/comments", pr_number)));
        }
        Ok(self.comments.get(&pr_number).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_reviewers_records_calls() {
        let repo = InMemoryRepository::for_pull_request(1, "octocat");
        repo.add_reviewers(&[]).await.unwrap();
        repo.add_reviewers(&["alice".to_string()]).await.unwrap();

        assert_eq!(repo.added_reviewers().await, vec![vec!["alice".to_string()]]);
    }

    #[tokio::test]
    async fn test_without_pull_request_fails_context_calls() {
        let repo = InMemoryRepository::without_pull_request();
        assert!(repo.current_reviewers().await.unwrap_err().is_missing_context());
        assert!(repo.pr_author().unwrap_err().is_missing_context());
    }

    #[tokio::test]
    async fn test_closed_prs_respect_max_count() {
        let repo = InMemoryRepository::for_pull_request(9, "octocat")
            .with_closed_pr(8, &[], &[])
            .with_closed_pr(7, &[], &[])
            .with_closed_pr(6, &[], &[]);

        assert_eq!(repo.list_closed_pull_requests(2).await.unwrap(), vec![8, 7]);
    }
}
