//! Participation history models.

/// Kind of activity that counts as taking part in a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParticipationCheck {
    /// Submitted a review.
    Reviewers,
    /// Left a conversation comment.
    Comments,
}

impl ParticipationCheck {
    /// Parse a single token, returning `None` for anything unrecognized.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "reviewers" => Some(Self::Reviewers),
            "comments" => Some(Self::Comments),
            _ => None,
        }
    }

    /// Both checks, in their canonical order.
    pub fn all() -> Vec<Self> {
        vec![Self::Reviewers, Self::Comments]
    }

    /// Join a list of checks with `sep` for display.
    pub fn join(checks: &[Self], sep: &str) -> String {
        checks
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

impl std::fmt::Display for ParticipationCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reviewers => write!(f, "reviewers"),
            Self::Comments => write!(f, "comments"),
        }
    }
}

/// Who took part in one closed pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipationRecord {
    pub pr_number: u64,
    pub reviewers: Vec<String>,
    pub commenters: Vec<String>,
    /// Reviewers followed by commenters, each handle once.
    pub participants: Vec<String>,
}

impl ParticipationRecord {
    /// Build a record, deriving `participants` from the two sets.
    pub fn new(pr_number: u64, reviewers: Vec<String>, commenters: Vec<String>) -> Self {
        let reviewers = dedup_preserving_order(reviewers);
        let commenters = dedup_preserving_order(commenters);
        let participants =
            dedup_preserving_order(reviewers.iter().chain(commenters.iter()).cloned());

        Self {
            pr_number,
            reviewers,
            commenters,
            participants,
        }
    }
}

/// Participation tally for one eligible reviewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipationScore {
    pub username: String,
    pub participation_count: u32,
    /// PR number of the first record (in history order) the user appeared in.
    pub last_participated_pr: Option<u64>,
}

impl ParticipationScore {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            participation_count: 0,
            last_participated_pr: None,
        }
    }
}

/// Remove repeated handles, keeping the first occurrence of each.
pub(crate) fn dedup_preserving_order<I>(handles: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    handles
        .into_iter()
        .filter(|h| seen.insert(h.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_participants_union_is_deduplicated() {
        let record = ParticipationRecord::new(
            7,
            names(&["alice", "bob", "alice"]),
            names(&["bob", "carol"]),
        );

        assert_eq!(record.reviewers, names(&["alice", "bob"]));
        assert_eq!(record.commenters, names(&["bob", "carol"]));
        assert_eq!(record.participants, names(&["alice", "bob", "carol"]));
    }

    #[test]
    fn test_handles_are_case_sensitive() {
        let record = ParticipationRecord::new(1, names(&["Alice"]), names(&["alice"]));
        assert_eq!(record.participants, names(&["Alice", "alice"]));
    }

    #[test]
    fn test_parse_check() {
        assert_eq!(ParticipationCheck::parse("reviewers"), Some(ParticipationCheck::Reviewers));
        assert_eq!(ParticipationCheck::parse("comments"), Some(ParticipationCheck::Comments));
        assert_eq!(ParticipationCheck::parse("Reviewers"), None);
        assert_eq!(ParticipationCheck::parse("approvals"), None);
    }

    #[test]
    fn test_join_checks() {
        assert_eq!(
            ParticipationCheck::join(&ParticipationCheck::all(), ","),
            "reviewers,comments"
        );
    }
}
