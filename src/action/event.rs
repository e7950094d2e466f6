//! Pull request context from the workflow runner environment.

use crate::error::AppError;
use crate::services::repository::PullRequestContext;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
}

#[derive(Debug, Deserialize)]
struct EventPullRequest {
    number: u64,
    user: Option<EventUser>,
}

#[derive(Debug, Deserialize)]
struct EventUser {
    login: String,
}

/// Build the context from `GITHUB_REPOSITORY` and the event payload file.
pub fn context_from_env() -> Result<PullRequestContext, AppError> {
    let repository = std::env::var("GITHUB_REPOSITORY").map_err(|_| {
        AppError::invalid_input_field("GITHUB_REPOSITORY is not set", "GITHUB_REPOSITORY")
    })?;

    let payload = match std::env::var("GITHUB_EVENT_PATH") {
        Ok(path) if !path.is_empty() => Some(std::fs::read_to_string(Path::new(&path))?),
        _ => None,
    };

    build_context(&repository, payload.as_deref())
}

/// Build the context from an `owner/repo` slug and an optional event payload.
///
/// A payload without a `pull_request` object yields a context with no PR.
pub fn build_context(repository: &str, payload: Option<&str>) -> Result<PullRequestContext, AppError> {
    let (owner, repo) = repository
        .split_once('/')
        .filter(|(o, r)| !o.is_empty() && !r.is_empty())
        .ok_or_else(|| {
            AppError::invalid_input(format!(
                "Expected GITHUB_REPOSITORY as owner/repo, got '{}'",
                repository
            ))
        })?;

    let pull_request = match payload {
        Some(json) => serde_json::from_str::<EventPayload>(json)?.pull_request,
        None => None,
    };

    Ok(PullRequestContext {
        owner: owner.to_string(),
        repo: repo.to_string(),
        pr_number: pull_request.as_ref().map(|pr| pr.number),
        author: pull_request.and_then(|pr| pr.user).map(|u| u.login),
    })
}
