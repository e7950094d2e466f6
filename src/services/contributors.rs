//! Code contributor ranking.
//!
//! Suggests the person who has been working on the changed files most
//! recently and most often. Each file's last [`MAX_COMMITS_PER_FILE`] commits
//! from the last [`LOOKBACK_MONTHS`] months are weighted by recency and the
//! weights are summed across all files of the pull request.

use crate::error::AppError;
use crate::models::{CommitSummary, FileStatus};
use crate::services::repository::RepositoryApi;
use chrono::{DateTime, Months, Utc};
use std::collections::HashMap;

/// Commits fetched per file.
pub const MAX_COMMITS_PER_FILE: u32 = 30;

/// How far back commit history is considered.
pub const LOOKBACK_MONTHS: u32 = 6;

/// Accumulated contributor weights in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributorWeights {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl ContributorWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file's commit list, most recent first.
    ///
    /// The commit at position `i` weighs `max(1, 30 - i)`. Unlinked commits
    /// keep their position but add nothing.
    pub fn add_file_commits(&mut self, commits: &[CommitSummary]) {
        for (i, commit) in commits.iter().enumerate() {
            if let Some(author) = &commit.author {
                self.add(author, commit_weight(i));
            }
        }
    }

    fn add(&mut self, author: &str, weight: u64) {
        match self.index.get(author) {
            Some(&i) => self.entries[i].1 += weight,
            None => {
                self.index.insert(author.to_string(), self.entries.len());
                self.entries.push((author.to_string(), weight));
            }
        }
    }

    pub fn get(&self, author: &str) -> Option<u64> {
        self.index.get(author).map(|&i| self.entries[i].1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Authors by weight, highest first; equal weights keep first-seen order.
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }
}

/// Weight of the commit at recency position `index` (0 = newest).
pub fn commit_weight(index: usize) -> u64 {
    (MAX_COMMITS_PER_FILE as u64)
        .saturating_sub(index as u64)
        .max(1)
}

/// First author in `ranked` that is not `exclude`.
pub fn pick_top_contributor(ranked: &[(String, u64)], exclude: &str) -> Option<String> {
    ranked
        .iter()
        .find(|(author, _)| author != exclude)
        .map(|(author, _)| author.clone())
}

/// Start of the commit history window relative to `now`.
///
/// Month ends clamp to the shorter month (Aug 31 minus six months is Feb 29
/// in a leap year), never rolling over into the next month.
pub fn history_since(now: DateTime<Utc>) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(LOOKBACK_MONTHS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Find the top code contributor for the pull request's changed files.
///
/// Never fails: any error is logged and reported as no contributor.
pub async fn top_contributor(
    api: &dyn RepositoryApi,
    author_to_exclude: &str,
    now: DateTime<Utc>,
) -> Option<String> {
    match collect_weights(api, now).await {
        Ok(weights) => choose(&weights, author_to_exclude),
        Err(e) => {
            log::warn!("Failed to analyze code contributors: {}", e);
            None
        }
    }
}

async fn collect_weights(
    api: &dyn RepositoryApi,
    now: DateTime<Utc>,
) -> Result<ContributorWeights, AppError> {
    let files = api.list_changed_files().await?;
    let since = history_since(now);
    let mut weights = ContributorWeights::new();

    for file in files {
        if file.status == FileStatus::Removed {
            continue;
        }

        match api.list_commits(&file.path, since, MAX_COMMITS_PER_FILE).await {
            Ok(commits) => weights.add_file_commits(&commits),
            Err(e) => log::warn!("Failed to get commits for file {}: {}", file.path, e),
        }
    }

    Ok(weights)
}

fn choose(weights: &ContributorWeights, author_to_exclude: &str) -> Option<String> {
    if weights.is_empty() {
        log::info!("No recent contributors found for modified files");
        return None;
    }

    let ranked = weights.ranked();

    log::info!("Code contributors for modified files:");
    for (position, (contributor, score)) in ranked.iter().enumerate() {
        let note = if contributor == author_to_exclude {
            " (PR author - skipped)"
        } else {
            ""
        };
        log::info!("  {}. {}: {}{}", position + 1, contributor, score, note);
    }

    match pick_top_contributor(&ranked, author_to_exclude) {
        Some(contributor) => {
            log::info!(
                "Selected top contributor: {} (score: {})",
                contributor,
                weights.get(&contributor).unwrap_or_default()
            );
            Some(contributor)
        }
        None => {
            log::info!("No suitable code contributor found (all contributors are the PR author)");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FileChange;
    use crate::services::memory::InMemoryRepository;
    use chrono::TimeZone;

    fn commits(authors: &[&str]) -> Vec<CommitSummary> {
        authors.iter().map(|a| CommitSummary::by(*a)).collect()
    }

    #[test]
    fn test_commit_weight_floor() {
        assert_eq!(commit_weight(0), 30);
        assert_eq!(commit_weight(2), 28);
        assert_eq!(commit_weight(29), 1);
        assert_eq!(commit_weight(30), 1);
        assert_eq!(commit_weight(500), 1);
    }

    #[test]
    fn test_weights_from_single_file() {
        let mut weights = ContributorWeights::new();
        weights.add_file_commits(&commits(&["alice", "bob", "alice"]));

        assert_eq!(weights.get("alice"), Some(58));
        assert_eq!(weights.get("bob"), Some(29));
        assert_eq!(pick_top_contributor(&weights.ranked(), "bob"), Some("alice".into()));
    }

    #[test]
    fn test_weights_are_additive_across_files() {
        let mut weights = ContributorWeights::new();
        weights.add_file_commits(&commits(&["alice"]));
        weights.add_file_commits(&commits(&["bob", "alice"]));

        assert_eq!(weights.get("alice"), Some(59));
        assert_eq!(weights.get("bob"), Some(30));
    }

    #[test]
    fn test_unlinked_commits_keep_their_position() {
        let mut weights = ContributorWeights::new();
        weights.add_file_commits(&[CommitSummary::unlinked(), CommitSummary::by("carol")]);

        assert_eq!(weights.get("carol"), Some(29));
    }

    #[test]
    fn test_ranking_ties_keep_first_seen_order() {
        let mut weights = ContributorWeights::new();
        weights.add_file_commits(&commits(&["zed"]));
        weights.add_file_commits(&commits(&["amy"]));

        let ranked = weights.ranked();
        assert_eq!(ranked[0].0, "zed");
        assert_eq!(ranked[1].0, "amy");
    }

    #[test]
    fn test_pick_skips_only_the_author() {
        let ranked = vec![("octocat".to_string(), 90), ("alice".to_string(), 10)];
        assert_eq!(pick_top_contributor(&ranked, "octocat"), Some("alice".into()));
        assert_eq!(pick_top_contributor(&ranked[..1], "octocat"), None);
        assert_eq!(pick_top_contributor(&[], "octocat"), None);
    }

    #[test]
    fn test_history_since_is_six_months_back() {
        let now = Utc.with_ymd_and_hms(2024, 8, 31, 12, 0, 0).unwrap();
        assert_eq!(
            history_since(now),
            Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_removed_files_are_skipped() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        let repo = InMemoryRepository::for_pull_request(12, "bob")
            .with_file(FileChange::new("f1", FileStatus::Modified))
            .with_file(FileChange::new("f2", FileStatus::Removed))
            .with_commits("f1", &[Some("alice"), Some("bob"), Some("alice")])
            .with_commits("f2", &[Some("carol"), Some("carol")]);

        assert_eq!(top_contributor(&repo, "bob", now).await, Some("alice".into()));

        let queries = repo.commit_queries().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].path, "f1");
        assert_eq!(queries[0].max_count, MAX_COMMITS_PER_FILE);
        assert_eq!(queries[0].since, Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_failing_file_is_skipped() {
        let repo = InMemoryRepository::for_pull_request(12, "bob")
            .with_file(FileChange::new("broken.rs", FileStatus::Modified))
            .with_file(FileChange::new("ok.rs", FileStatus::Added))
            .with_commits("broken.rs", &[Some("mallory")])
            .with_commits("ok.rs", &[Some("dave")])
            .failing_commits("broken.rs");

        assert_eq!(top_contributor(&repo, "bob", Utc::now()).await, Some("dave".into()));
    }

    #[tokio::test]
    async fn test_listing_failure_yields_none() {
        let repo = InMemoryRepository::for_pull_request(12, "bob").failing_files();
        assert_eq!(top_contributor(&repo, "bob", Utc::now()).await, None);
    }

    #[tokio::test]
    async fn test_only_author_committed() {
        let repo = InMemoryRepository::for_pull_request(12, "bob")
            .with_file(FileChange::new("lib.rs", FileStatus::Modified))
            .with_commits("lib.rs", &[Some("bob"), Some("bob")]);

        assert_eq!(top_contributor(&repo, "bob", Utc::now()).await, None);
    }
}
