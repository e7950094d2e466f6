//! Changed-file and commit models used for code ownership ranking.

use serde::{Deserialize, Serialize};

/// Status of a file in a pull request diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
}

impl From<&str> for FileStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "added" => Self::Added,
            "removed" => Self::Removed,
            "renamed" => Self::Renamed,
            "copied" => Self::Copied,
            "changed" => Self::Changed,
            "unchanged" => Self::Unchanged,
            _ => Self::Modified,
        }
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Removed => write!(f, "removed"),
            Self::Renamed => write!(f, "renamed"),
            Self::Copied => write!(f, "copied"),
            Self::Changed => write!(f, "changed"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// A file touched by the pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    /// Repository-relative path (the new path for renames).
    pub path: String,

    pub status: FileStatus,
}

impl FileChange {
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}

/// One commit from a file's history, most recent first.
///
/// `author` is `None` when the commit email is not linked to an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub author: Option<String>,
}

impl CommitSummary {
    pub fn by(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
        }
    }

    pub fn unlinked() -> Self {
        Self { author: None }
    }
}
