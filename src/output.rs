//! Rendering of query results.
//!
//! Results can be printed as JSON, compact or pretty, through `serde_json`, or
//! as a plain-text table with one issue per line.
//!
//! # Examples
//!
//! ```
//! use issue_query::{Issue, output::to_table};
//!
//! let issue = Issue::new("bd-1", "Fix login");
//! assert_eq!(to_table(&[&issue]), "bd-1  open         P2  task     Fix login\n");
//! ```

use serde::Serialize;

use crate::record::Issue;

/// Compact JSON array of the given records.
pub fn to_json<T: Serialize>(records: &[&T]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Indented JSON array of the given records.
pub fn to_json_pretty<T: Serialize>(records: &[&T]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// One line per issue: id, status, priority, type, title and labels.
pub fn to_table(issues: &[&Issue]) -> String {
    let id_width = issues.iter().map(|i| i.id.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    for issue in issues {
        out.push_str(&format!(
            "{:<id_width$}  {:<11}  P{:<2} {:<8} {}",
            issue.id,
            issue.status.as_str(),
            issue.priority,
            issue.issue_type,
            issue.title,
            id_width = id_width,
        ));
        if !issue.labels.is_empty() {
            out.push_str(&format!("  [{}]", issue.labels.join(", ")));
        }
        out.push('\n');
    }
    out
}
