use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ast::QueryField;

/// A field value read from a record, borrowed where possible.
///
/// # Examples
///
/// ```
/// use issue_query::{FieldValue, Issue, QueryField, Record};
///
/// let issue = Issue::new("bd-1", "Fix login");
/// assert_eq!(issue.field(QueryField::Title), FieldValue::Text("Fix login"));
/// assert_eq!(issue.field(QueryField::Assignee), FieldValue::Null);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Absent value of a nullable field
    Null,

    /// Text, including enum names
    Text(&'a str),

    Integer(i64),

    Timestamp(DateTime<Utc>),

    /// Multi-valued text field
    List(&'a [String]),
}

impl FieldValue<'_> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// Typed, by-name field access: the only thing the evaluator needs from a record.
pub trait Record {
    fn field(&self, field: QueryField) -> FieldValue<'_>;
}

/// Workflow state of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Blocked,
    Deferred,
    Closed,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Blocked => "blocked",
            Status::Deferred => "deferred",
            Status::Closed => "closed",
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(Status::Open),
            "in_progress" => Ok(Status::InProgress),
            "blocked" => Ok(Status::Blocked),
            "deferred" => Ok(Status::Deferred),
            "closed" => Ok(Status::Closed),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issue as stored by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub priority: i64,
    #[serde(default = "default_issue_type")]
    pub issue_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_minutes: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_issue_type() -> String {
    "task".to_string()
}

impl Issue {
    /// An open priority-2 task created at the Unix epoch; adjust fields as needed.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Issue {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            status: Status::Open,
            priority: 2,
            issue_type: default_issue_type(),
            assignee: None,
            created_at: DateTime::<Utc>::default(),
            updated_at: DateTime::<Utc>::default(),
            due_date: None,
            closed_at: None,
            labels: Vec::new(),
            estimated_minutes: None,
            external_ref: None,
            source_repo: None,
            design: None,
            acceptance_criteria: None,
            notes: None,
        }
    }
}

fn optional_text(value: &Option<String>) -> FieldValue<'_> {
    value.as_deref().map_or(FieldValue::Null, FieldValue::Text)
}

fn optional_timestamp(value: &Option<DateTime<Utc>>) -> FieldValue<'_> {
    value.map_or(FieldValue::Null, FieldValue::Timestamp)
}

impl Record for Issue {
    fn field(&self, field: QueryField) -> FieldValue<'_> {
        match field {
            QueryField::Id => FieldValue::Text(&self.id),
            QueryField::Title => FieldValue::Text(&self.title),
            QueryField::Description => FieldValue::Text(&self.description),
            QueryField::Status => FieldValue::Text(self.status.as_str()),
            QueryField::Priority => FieldValue::Integer(self.priority),
            QueryField::IssueType => FieldValue::Text(&self.issue_type),
            QueryField::Assignee => optional_text(&self.assignee),
            QueryField::CreatedAt => FieldValue::Timestamp(self.created_at),
            QueryField::UpdatedAt => FieldValue::Timestamp(self.updated_at),
            QueryField::DueDate => optional_timestamp(&self.due_date),
            QueryField::ClosedAt => optional_timestamp(&self.closed_at),
            QueryField::Labels => FieldValue::List(&self.labels),
            QueryField::EstimatedMinutes => {
                self.estimated_minutes.map_or(FieldValue::Null, FieldValue::Integer)
            }
            QueryField::ExternalRef => optional_text(&self.external_ref),
            QueryField::SourceRepo => optional_text(&self.source_repo),
            QueryField::Design => optional_text(&self.design),
            QueryField::AcceptanceCriteria => optional_text(&self.acceptance_criteria),
            QueryField::Notes => optional_text(&self.notes),
        }
    }
}
