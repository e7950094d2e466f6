//! Reviewer selection mode and result.

/// Strategy used to fill the remaining reviewer slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Uniformly random among eligible reviewers.
    #[default]
    Random,
    /// Least-active reviewers first, based on recent PR history.
    Balanced,
}

impl From<&str> for SelectionMode {
    fn from(s: &str) -> Self {
        match s {
            "balanced" => Self::Balanced,
            _ => Self::Random,
        }
    }
}

impl std::fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Random => write!(f, "random"),
            Self::Balanced => write!(f, "balanced"),
        }
    }
}

/// Outcome of a selection run.
///
/// `selected_reviewers` never repeats a handle and never contains a member
/// of `already_assigned`. When `code_contributor` is set it is also the last
/// entry of `selected_reviewers`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult {
    pub selected_reviewers: Vec<String>,
    pub already_assigned: Vec<String>,
    pub code_contributor: Option<String>,
    pub selection_method: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_mode_from_str() {
        assert_eq!(SelectionMode::from("balanced"), SelectionMode::Balanced);
        assert_eq!(SelectionMode::from("random"), SelectionMode::Random);
        assert_eq!(SelectionMode::from("Balanced"), SelectionMode::Random);
        assert_eq!(SelectionMode::from(""), SelectionMode::Random);
    }
}
