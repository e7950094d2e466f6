//! Action inputs.
//!
//! Inputs arrive the way the workflow runner passes them to an action: one
//! `INPUT_<NAME>` environment variable per input, name upper-cased with
//! spaces turned into underscores (`reviewer-list` → `INPUT_REVIEWER-LIST`).
//! Optional values that do not parse fall back to their defaults; only the
//! reviewer list and the token are required.

use crate::error::AppError;
use crate::models::{ParticipationCheck, SelectionMode};

/// Default minimum number of reviewers.
pub const DEFAULT_MIN_REVIEWERS: usize = 2;

/// Default number of closed pull requests inspected in balanced mode.
pub const DEFAULT_BALANCED_LOOKBACK: u32 = 10;

/// Parsed action configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInputs {
    /// Pool of reviewers to choose from.
    pub reviewer_list: Vec<String>,

    /// Reviewers requested on every pull request.
    pub always_add: Vec<String>,

    /// Minimum number of reviewers to add (always-add included).
    pub min_reviewers: usize,

    /// Also request the top recent contributor of the changed files.
    pub add_top_contributor: bool,

    pub selection_mode: SelectionMode,

    /// Closed pull requests inspected in balanced mode.
    pub balanced_lookback: u32,

    /// Activities that count as participation in balanced mode.
    pub participation_checks: Vec<ParticipationCheck>,

    pub github_token: String,
}

impl ActionInputs {
    /// Read inputs from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(input_env_name(name)).ok())
    }

    /// Read inputs through `lookup`, which maps an input name to its raw value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &str| {
            get(name).ok_or_else(|| {
                AppError::invalid_input_field(
                    format!("Input required and not supplied: {}", name),
                    name,
                )
            })
        };

        let reviewer_list = split_list(&required("reviewer-list")?);
        let github_token = required("github-token")?;

        let always_add = get("always-add")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let min_reviewers = get("min-reviewers")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MIN_REVIEWERS);

        let add_top_contributor = get("add-top-contributor")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(true);

        let selection_mode = get("selection-mode")
            .map(|v| SelectionMode::from(v.as_str()))
            .unwrap_or_default();

        let balanced_lookback = get("balanced-lookback")
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_BALANCED_LOOKBACK);

        let participation_checks = get("participation-checks")
            .map(|v| parse_checks(&v))
            .unwrap_or_else(ParticipationCheck::all);

        Ok(Self {
            reviewer_list,
            always_add,
            min_reviewers,
            add_top_contributor,
            selection_mode,
            balanced_lookback,
            participation_checks,
            github_token,
        })
    }
}

/// Environment variable the runner uses for input `name`.
pub fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Parse participation checks, keeping recognized tokens once each.
///
/// Falls back to both checks when nothing recognizable remains.
fn parse_checks(value: &str) -> Vec<ParticipationCheck> {
    let mut checks = Vec::new();
    for check in value.split(',').filter_map(|s| ParticipationCheck::parse(s.trim())) {
        if !checks.contains(&check) {
            checks.push(check);
        }
    }

    if checks.is_empty() {
        ParticipationCheck::all()
    } else {
        checks
    }
}
