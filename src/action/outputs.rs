//! Step outputs.
//!
//! Outputs are appended to the file named by `GITHUB_OUTPUT` using the
//! runner's `name=value` format, or the heredoc form when a value spans
//! several lines.

use crate::error::AppError;
use crate::models::SelectionResult;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

/// Delimiter for multi-line output values.
const MULTILINE_DELIMITER: &str = "ghadelimiter_smart_reviewers";

/// Output names and values for a selection.
pub fn selection_outputs(result: &SelectionResult) -> Vec<(&'static str, String)> {
    vec![
        ("reviewers-added", result.selected_reviewers.join(",")),
        (
            "code-contributor",
            result.code_contributor.clone().unwrap_or_default(),
        ),
        ("selection-method", result.selection_method.clone()),
    ]
}

/// Append outputs to `path`.
pub fn write_outputs(path: &Path, outputs: &[(&str, String)]) -> Result<(), AppError> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in outputs {
        file.write_all(format_output(name, value).as_bytes())?;
    }
    Ok(())
}

/// Write outputs to `GITHUB_OUTPUT`, logging them instead when it is unset.
pub fn set_outputs(outputs: &[(&str, String)]) -> Result<(), AppError> {
    match std::env::var("GITHUB_OUTPUT") {
        Ok(path) if !path.is_empty() => write_outputs(Path::new(&path), outputs),
        _ => {
            for (name, value) in outputs {
                log::info!("Output {}: {}", name, value);
            }
            Ok(())
        }
    }
}

fn format_output(name: &str, value: &str) -> String {
    if value.contains('\n') {
        format!(
            "{name}<<{d}\n{value}\n{d}\n",
            name = name,
            d = MULTILINE_DELIMITER,
            value = value
        )
    } else {
        format!("{}={}\n", name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_selection_outputs() {
        let result = SelectionResult {
            selected_reviewers: vec!["alice".into(), "erin".into()],
            already_assigned: vec!["octocat".into()],
            code_contributor: Some("erin".into()),
            selection_method: "random".into(),
        };

        assert_eq!(
            selection_outputs(&result),
            vec![
                ("reviewers-added", "alice,erin".to_string()),
                ("code-contributor", "erin".to_string()),
                ("selection-method", "random".to_string()),
            ]
        );
    }

    #[test]
    fn test_write_outputs_appends() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("output.txt");
        std::fs::write(&path, "earlier=1\n").unwrap();

        write_outputs(
            &path,
            &[("reviewers-added", "alice,bob".to_string()), ("code-contributor", String::new())],
        )
        .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "earlier=1\nreviewers-added=alice,bob\ncode-contributor=\n"
        );
    }

    #[test]
    fn test_multiline_value_uses_delimiter() {
        assert_eq!(
            format_output("notes", "a\nb"),
            "notes<<ghadelimiter_smart_reviewers\na\nb\nghadelimiter_smart_reviewers\n"
        );
    }
}
