//! Reviewer selection orchestration.
//!
//! Combines the always-add list, a random or balanced fill up to the
//! minimum reviewer count, and an optional top code contributor into one
//! ordered list of reviewers to request.

use crate::config::ActionInputs;
use crate::error::AppError;
use crate::models::participation::dedup_preserving_order;
use crate::models::{ParticipationCheck, SelectionMode, SelectionResult};
use crate::services::repository::RepositoryApi;
use crate::services::{contributors, pr_history, random_selector};
use chrono::{DateTime, Utc};
use rand::Rng;

/// Selects reviewers for the pull request behind `api`.
pub struct ReviewerService<'a> {
    api: &'a dyn RepositoryApi,
    now: DateTime<Utc>,
}

impl<'a> ReviewerService<'a> {
    pub fn new(api: &'a dyn RepositoryApi) -> Self {
        Self {
            api,
            now: Utc::now(),
        }
    }

    /// Use `now` as the reference time for the commit history window.
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Run the full selection.
    ///
    /// Only resolving the current reviewers or the author can fail; history
    /// and contributor lookups degrade to fallbacks.
    pub async fn select_reviewers<R: Rng + ?Sized>(
        &self,
        inputs: &ActionInputs,
        rng: &mut R,
    ) -> Result<SelectionResult, AppError> {
        let current_reviewers = self.api.current_reviewers().await?;
        let pr_author = self.api.pr_author()?;

        log::info!(
            "Current reviewers: {}",
            join_or_none(&current_reviewers)
        );
        log::info!("PR Author: {}", pr_author);
        log::info!("Selection mode: {}", inputs.selection_mode);

        let mut already_assigned = current_reviewers;
        already_assigned.push(pr_author.clone());
        let already_assigned = dedup_preserving_order(already_assigned);

        let mut reviewers_to_add = dedup_preserving_order(
            inputs
                .always_add
                .iter()
                .filter(|reviewer| !already_assigned.contains(reviewer))
                .cloned(),
        );

        let mut selection_method = inputs.selection_mode.to_string();
        let remaining_slots = inputs.min_reviewers.saturating_sub(reviewers_to_add.len());

        if remaining_slots > 0 {
            let excluded: Vec<String> = already_assigned
                .iter()
                .chain(reviewers_to_add.iter())
                .cloned()
                .collect();

            let selected = match inputs.selection_mode {
                SelectionMode::Balanced => {
                    selection_method = balanced_label(inputs);
                    self.select_balanced_reviewers(inputs, &excluded, remaining_slots, rng)
                        .await
                }
                SelectionMode::Random => random_selector::select_random(
                    &inputs.reviewer_list,
                    &excluded,
                    remaining_slots,
                    rng,
                ),
            };

            reviewers_to_add.extend(selected);
        }

        let mut code_contributor = None;
        if inputs.add_top_contributor {
            let contributor =
                contributors::top_contributor(self.api, &pr_author, self.now).await;
            if let Some(contributor) = contributor {
                if !already_assigned.contains(&contributor)
                    && !reviewers_to_add.contains(&contributor)
                {
                    reviewers_to_add.push(contributor.clone());
                    code_contributor = Some(contributor);
                }
            }
        }

        Ok(SelectionResult {
            selected_reviewers: reviewers_to_add,
            already_assigned,
            code_contributor,
            selection_method,
        })
    }

    async fn select_balanced_reviewers<R: Rng + ?Sized>(
        &self,
        inputs: &ActionInputs,
        excluded: &[String],
        count: usize,
        rng: &mut R,
    ) -> Vec<String> {
        log::info!("Analyzing PR history for balanced selection...");

        let history = pr_history::analyze_history(
            self.api,
            inputs.balanced_lookback,
            &inputs.participation_checks,
        )
        .await;

        if history.is_empty() {
            log::warn!("No PR history found, falling back to random selection");
            return random_selector::select_random(&inputs.reviewer_list, excluded, count, rng);
        }

        let scores = pr_history::score_participation(&history, &inputs.reviewer_list);

        log::info!("Balanced selection participation scores:");
        for score in scores.iter().filter(|s| !excluded.contains(&s.username)) {
            match score.last_participated_pr {
                Some(pr) => log::info!(
                    "  {}: {} participations (last: PR #{})",
                    score.username,
                    score.participation_count,
                    pr
                ),
                None => log::info!(
                    "  {}: {} participations (never participated)",
                    score.username,
                    score.participation_count
                ),
            }
        }

        pr_history::select_balanced(&scores, excluded, count)
    }
}

/// Method label for balanced selection, e.g. `balanced (lookback: 10, checks: reviewers,comments)`.
pub fn balanced_label(inputs: &ActionInputs) -> String {
    format!(
        "balanced (lookback: {}, checks: {})",
        inputs.balanced_lookback,
        ParticipationCheck::join(&inputs.participation_checks, ",")
    )
}

fn join_or_none(list: &[String]) -> String {
    if list.is_empty() {
        "none".to_string()
    } else {
        list.join(", ")
    }
}
