//! Loading issue records from JSON text

use crate::Issue;
use super::CliError;

/// Parses a JSON array of issues, or JSON Lines with one issue per line.
///
/// Blank lines in JSON Lines input are skipped.
pub fn parse_issues(text: &str) -> Result<Vec<Issue>, CliError> {
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }

    let mut issues = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let issue = serde_json::from_str(line).map_err(|source| CliError::JsonLine {
            line: index + 1,
            source,
        })?;
        issues.push(issue);
    }
    tracing::debug!(count = issues.len(), "loaded JSON Lines records");
    Ok(issues)
}
