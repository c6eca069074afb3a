//! Run a query against issue records

use chrono::DateTime;

use crate::{Evaluator, FixedClock, Issue, Query, output, parse};
use super::{CliError, OutputFormat, parse_issues};

/// Options for the filter command
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    /// The query text
    pub query: String,
    /// JSON array or JSON Lines of issues
    pub input: Option<String>,
    pub format: OutputFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// RFC 3339 timestamp used instead of the system clock
    pub now: Option<String>,
    /// Sort keys used when the query has no `sort by` clause, e.g. `"priority, updated desc"`
    pub default_sort: Option<String>,
}

/// Parse the query, filter the input records and render the result.
pub fn execute_filter(options: &FilterOptions) -> Result<String, CliError> {
    let query = build_query(&options.query, options.default_sort.as_deref())?;

    let text = options.input.as_ref().ok_or(CliError::NoInput)?;
    let issues = parse_issues(text)?;

    let matched = match &options.now {
        Some(now) => {
            let now = DateTime::parse_from_rfc3339(now)
                .map_err(|_| CliError::InvalidNow(now.clone()))?;
            Evaluator::with_clock(FixedClock::new(now)).filter(&issues, &query)
        }
        None => Evaluator::new().filter(&issues, &query),
    };

    render(&matched, options.format, options.pretty)
}

fn build_query(text: &str, default_sort: Option<&str>) -> Result<Query, CliError> {
    let query = parse(text)?;
    match default_sort {
        Some(sort) if query.sort.is_empty() => {
            let defaults = parse(&format!("sort by: {sort}"))?;
            Ok(Query::new(query.filter, defaults.sort))
        }
        _ => Ok(query),
    }
}

fn render(issues: &[&Issue], format: OutputFormat, pretty: bool) -> Result<String, CliError> {
    let out = match format {
        OutputFormat::Table => output::to_table(issues),
        OutputFormat::Json if pretty => output::to_json_pretty(issues)?,
        OutputFormat::Json => output::to_json(issues)?,
    };
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INPUT: &str = r#"[
        {"id": "a", "title": "First", "priority": 2,
         "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z"},
        {"id": "b", "title": "Second", "priority": 0,
         "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-03T00:00:00Z"}
    ]"#;

    #[test]
    fn default_sort_applies_without_sort_clause() {
        let query = build_query("", Some("priority")).unwrap();
        assert_eq!(query.sort.len(), 1);

        let query = build_query("status:open", Some("priority, updated desc")).unwrap();
        assert_eq!(query.to_string(), "status:open sort by: priority asc, updated desc");

        let query = build_query("sort by: id desc", Some("priority")).unwrap();
        assert_eq!(query.to_string(), "sort by: id desc");
    }

    #[test]
    fn table_output() {
        let options = FilterOptions {
            query: "sort by: priority".into(),
            input: Some(INPUT.into()),
            format: OutputFormat::Table,
            ..Default::default()
        };
        let out = execute_filter(&options).unwrap();
        let ids: Vec<&str> = out.lines().map(|l| &l[..1]).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn rejects_bad_now() {
        let options = FilterOptions {
            query: "due:today".into(),
            input: Some(INPUT.into()),
            now: Some("yesterday".into()),
            ..Default::default()
        };
        assert!(matches!(execute_filter(&options), Err(CliError::InvalidNow(_))));
    }
}
