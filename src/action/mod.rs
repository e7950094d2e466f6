//! Workflow runner integration.
//!
//! Wires the selection engine to the runner: inputs from `INPUT_*`
//! variables, pull request context from the event payload, logging as
//! workflow commands and results as step outputs.

pub mod event;
pub mod logger;
pub mod outputs;

use crate::config::ActionInputs;
use crate::error::AppError;
use crate::models::{ParticipationCheck, SelectionMode, SelectionResult};
use crate::services::github_client::{GitHubClient, GitHubClientConfig, DEFAULT_API_URL};
use crate::services::repository::RepositoryApi;
use crate::services::reviewer_service::ReviewerService;
use rand::Rng;

/// Run the action against the live environment.
pub async fn run() -> Result<(), AppError> {
    let inputs = ActionInputs::from_env()?;
    log_inputs(&inputs);

    let context = event::context_from_env()?;
    let config = GitHubClientConfig {
        base_url: std::env::var("GITHUB_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
        token: inputs.github_token.clone(),
        ..Default::default()
    };
    let client = GitHubClient::new(config, context)?;

    let mut rng = rand::thread_rng();
    if let Some(result) = assign_reviewers(&client, &inputs, &mut rng).await? {
        outputs::set_outputs(&outputs::selection_outputs(&result))?;
    }

    Ok(())
}

/// Select reviewers and request them on the pull request.
///
/// Returns `None` when there was nobody to add.
pub async fn assign_reviewers<R: Rng + ?Sized>(
    api: &dyn RepositoryApi,
    inputs: &ActionInputs,
    rng: &mut R,
) -> Result<Option<SelectionResult>, AppError> {
    let result = ReviewerService::new(api).select_reviewers(inputs, rng).await?;

    if result.selected_reviewers.is_empty() {
        log::info!("No additional reviewers to add");
        return Ok(None);
    }

    api.add_reviewers(&result.selected_reviewers).await?;

    log::info!(
        "Successfully added {} reviewers using {}",
        result.selected_reviewers.len(),
        result.selection_method
    );
    if let Some(contributor) = &result.code_contributor {
        log::info!("Added top contributor: {}", contributor);
    }

    Ok(Some(result))
}

fn log_inputs(inputs: &ActionInputs) {
    log::info!("Smart Reviewer Assignment started");
    log::info!("Reviewer list: {}", inputs.reviewer_list.join(", "));
    log::info!(
        "Always add: {}",
        if inputs.always_add.is_empty() {
            "none".to_string()
        } else {
            inputs.always_add.join(", ")
        }
    );
    log::info!("Min reviewers: {}", inputs.min_reviewers);
    log::info!("Selection mode: {}", inputs.selection_mode);
    log::info!(
        "Add top contributor: {}",
        if inputs.add_top_contributor { "enabled" } else { "disabled" }
    );

    if inputs.selection_mode == SelectionMode::Balanced {
        log::info!("Balanced lookback: {} PRs", inputs.balanced_lookback);
        log::info!(
            "Participation checks: {}",
            ParticipationCheck::join(&inputs.participation_checks, ", ")
        );
    }
}
