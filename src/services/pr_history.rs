//! Participation history analysis for balanced reviewer selection.
//!
//! Recent closed pull requests are turned into per-user participation
//! counts so that the least active reviewers can be asked first.

use crate::models::participation::dedup_preserving_order;
use crate::models::{ParticipationCheck, ParticipationRecord, ParticipationScore};
use crate::services::repository::RepositoryApi;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Collect participation for the last `lookback` closed pull requests.
///
/// Records come back in the order the API lists them, most recently updated
/// first. A failed review or comment lookup for one PR leaves that category
/// empty; a failure to list PRs at all yields no history.
pub async fn analyze_history(
    api: &dyn RepositoryApi,
    lookback: u32,
    checks: &[ParticipationCheck],
) -> Vec<ParticipationRecord> {
    log::info!("Analyzing last {} PRs for participation history", lookback);

    let prs = match api.list_closed_pull_requests(lookback).await {
        Ok(prs) => prs,
        Err(e) => {
            log::warn!("Failed to analyze PR history: {}", e);
            return Vec::new();
        }
    };

    let mut history = Vec::with_capacity(prs.len());

    for pr_number in prs {
        let mut reviewers = Vec::new();
        let mut commenters = Vec::new();

        if checks.contains(&ParticipationCheck::Reviewers) {
            match api.list_reviewers(pr_number).await {
                Ok(list) => reviewers = list,
                Err(e) => log::warn!("Failed to get reviews for PR #{}: {}", pr_number, e),
            }
        }

        if checks.contains(&ParticipationCheck::Comments) {
            match api.list_commenters(pr_number).await {
                Ok(list) => commenters = list,
                Err(e) => log::warn!("Failed to get comments for PR #{}: {}", pr_number, e),
            }
        }

        let record = ParticipationRecord::new(pr_number, reviewers, commenters);
        log::debug!(
            "PR #{}: {} participants",
            pr_number,
            record.participants.len()
        );
        history.push(record);
    }

    history
}

/// Tally participation for every eligible reviewer and sort least active first.
///
/// `history` must be ordered most recent first: the first record a user is
/// seen in becomes their `last_participated_pr`, and ties on count are broken
/// by that number ascending. Users who never took part sort ahead of users
/// with the same count who did. Handles outside `eligible` are ignored.
pub fn score_participation(
    history: &[ParticipationRecord],
    eligible: &[String],
) -> Vec<ParticipationScore> {
    let eligible = dedup_preserving_order(eligible.iter().cloned());

    let mut scores: Vec<ParticipationScore> =
        eligible.iter().map(|name| ParticipationScore::new(name.as_str())).collect();
    let index: HashMap<&str, usize> = eligible
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    for record in history {
        for participant in &record.participants {
            if let Some(&i) = index.get(participant.as_str()) {
                let score = &mut scores[i];
                score.participation_count += 1;
                if score.last_participated_pr.is_none() {
                    score.last_participated_pr = Some(record.pr_number);
                }
            }
        }
    }

    // `sort_by` is stable, so full ties keep the eligible list order.
    scores.sort_by(compare_scores);
    scores
}

fn compare_scores(a: &ParticipationScore, b: &ParticipationScore) -> Ordering {
    a.participation_count
        .cmp(&b.participation_count)
        .then_with(|| match (a.last_participated_pr, b.last_participated_pr) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Greater,
            (None, Some(_)) => Ordering::Less,
            (None, None) => Ordering::Equal,
        })
}

/// Take the first `count` scored reviewers that are not excluded.
pub fn select_balanced(
    scores: &[ParticipationScore],
    excluded: &[String],
    count: usize,
) -> Vec<String> {
    scores
        .iter()
        .filter(|score| !excluded.contains(&score.username))
        .take(count)
        .map(|score| score.username.clone())
        .collect()
}
