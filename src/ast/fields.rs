use std::{collections::HashMap, fmt, sync::LazyLock};

/// Declared type of a queryable field.
///
/// Drives value coercion in the parser and comparison rules in the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    String,
    NullableString,
    StringList,
    Integer,
    NullableInteger,
    Timestamp,
    NullableTimestamp,
    EnumStatus,
    EnumIssueType,
}

impl FieldType {
    pub fn is_nullable(self) -> bool {
        matches!(
            self,
            FieldType::NullableString | FieldType::NullableInteger | FieldType::NullableTimestamp
        )
    }

    /// String, nullable string and string list.
    pub fn is_text(self) -> bool {
        matches!(
            self,
            FieldType::String | FieldType::NullableString | FieldType::StringList
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(self, FieldType::Integer | FieldType::NullableInteger)
    }

    pub fn is_timestamp(self) -> bool {
        matches!(self, FieldType::Timestamp | FieldType::NullableTimestamp)
    }

    pub fn is_enum(self) -> bool {
        matches!(self, FieldType::EnumStatus | FieldType::EnumIssueType)
    }

    /// Integer and timestamp fields accept `min..max` ranges.
    pub fn is_orderable(self) -> bool {
        self.is_integer() || self.is_timestamp()
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::NullableString => "nullable string",
            FieldType::StringList => "string list",
            FieldType::Integer => "integer",
            FieldType::NullableInteger => "nullable integer",
            FieldType::Timestamp => "timestamp",
            FieldType::NullableTimestamp => "nullable timestamp",
            FieldType::EnumStatus => "status",
            FieldType::EnumIssueType => "issue type",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A queryable attribute of an issue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryField {
    Id,
    Title,
    Description,
    Status,
    Priority,
    IssueType,
    Assignee,
    CreatedAt,
    UpdatedAt,
    DueDate,
    ClosedAt,
    Labels,
    EstimatedMinutes,
    ExternalRef,
    SourceRepo,
    Design,
    AcceptanceCriteria,
    Notes,
}

/// Static descriptor of a field: canonical name, type and aliases.
#[derive(Debug)]
pub struct FieldInfo {
    pub field: QueryField,
    pub name: &'static str,
    pub field_type: FieldType,
    pub aliases: &'static [&'static str],
}

impl FieldInfo {
    /// Canonical name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        let aliases: &'static [&'static str] = self.aliases;
        std::iter::once(self.name).chain(aliases.iter().copied())
    }
}

/// Every queryable field, in declaration order.
pub static FIELDS: [FieldInfo; 18] = [
    FieldInfo {
        field: QueryField::Id,
        name: "id",
        field_type: FieldType::String,
        aliases: &["issue-id", "issue_id", "key"],
    },
    FieldInfo {
        field: QueryField::Title,
        name: "title",
        field_type: FieldType::String,
        aliases: &["summary", "name"],
    },
    FieldInfo {
        field: QueryField::Description,
        name: "description",
        field_type: FieldType::String,
        aliases: &["body", "text"],
    },
    FieldInfo {
        field: QueryField::Status,
        name: "status",
        field_type: FieldType::EnumStatus,
        aliases: &["state", "s"],
    },
    FieldInfo {
        field: QueryField::Priority,
        name: "priority",
        field_type: FieldType::Integer,
        aliases: &["prio", "pri", "p"],
    },
    FieldInfo {
        field: QueryField::IssueType,
        name: "type",
        field_type: FieldType::EnumIssueType,
        aliases: &["issuetype", "issue-type", "issue_type", "kind", "t"],
    },
    FieldInfo {
        field: QueryField::Assignee,
        name: "assignee",
        field_type: FieldType::NullableString,
        aliases: &["assigned", "owner", "a"],
    },
    FieldInfo {
        field: QueryField::CreatedAt,
        name: "created",
        field_type: FieldType::Timestamp,
        aliases: &["createdat", "created-at", "created_at"],
    },
    FieldInfo {
        field: QueryField::UpdatedAt,
        name: "updated",
        field_type: FieldType::Timestamp,
        aliases: &["updatedat", "updated-at", "updated_at", "modified"],
    },
    FieldInfo {
        field: QueryField::DueDate,
        name: "due",
        field_type: FieldType::NullableTimestamp,
        aliases: &["duedate", "due-date", "due_date"],
    },
    FieldInfo {
        field: QueryField::ClosedAt,
        name: "closed",
        field_type: FieldType::NullableTimestamp,
        aliases: &["closedat", "closed-at", "closed_at"],
    },
    FieldInfo {
        field: QueryField::Labels,
        name: "label",
        field_type: FieldType::StringList,
        aliases: &["labels", "tag", "tags", "l"],
    },
    FieldInfo {
        field: QueryField::EstimatedMinutes,
        name: "estimate",
        field_type: FieldType::NullableInteger,
        aliases: &["estimated", "estimatedminutes", "estimated-minutes", "estimated_minutes"],
    },
    FieldInfo {
        field: QueryField::ExternalRef,
        name: "external-ref",
        field_type: FieldType::NullableString,
        aliases: &["externalref", "external_ref", "ref"],
    },
    FieldInfo {
        field: QueryField::SourceRepo,
        name: "source-repo",
        field_type: FieldType::NullableString,
        aliases: &["sourcerepo", "source_repo", "repo"],
    },
    FieldInfo {
        field: QueryField::Design,
        name: "design",
        field_type: FieldType::NullableString,
        aliases: &[],
    },
    FieldInfo {
        field: QueryField::AcceptanceCriteria,
        name: "acceptance",
        field_type: FieldType::NullableString,
        aliases: &[
            "acceptancecriteria",
            "acceptance-criteria",
            "acceptance_criteria",
            "criteria",
        ],
    },
    FieldInfo {
        field: QueryField::Notes,
        name: "notes",
        field_type: FieldType::NullableString,
        aliases: &["note"],
    },
];

/// Fields searched by a bare term with no `field:` prefix.
pub const TEXT_SEARCH_FIELDS: [QueryField; 6] = [
    QueryField::Id,
    QueryField::Title,
    QueryField::Description,
    QueryField::Design,
    QueryField::AcceptanceCriteria,
    QueryField::Notes,
];

static BY_NAME: LazyLock<HashMap<&'static str, QueryField>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for info in &FIELDS {
        map.insert(info.name, info.field);
        for alias in info.aliases {
            map.insert(*alias, info.field);
        }
    }
    map
});

impl QueryField {
    /// Case-insensitive lookup by canonical name or alias.
    pub fn from_name(name: &str) -> Option<QueryField> {
        BY_NAME.get(name.to_lowercase().as_str()).copied()
    }

    /// Field names resembling `name`, for "did you mean" messages.
    ///
    /// Prefix matches on the canonical name or any alias come first; substring
    /// matches are only consulted when there are fewer than `max` prefix matches.
    pub fn suggestions(name: &str, max: usize) -> Vec<&'static str> {
        let query = name.to_lowercase();
        if query.is_empty() || max == 0 {
            return Vec::new();
        }

        let mut result: Vec<&'static str> = FIELDS
            .iter()
            .filter(|info| info.names().any(|n| n.starts_with(&query)))
            .map(|info| info.name)
            .collect();

        if result.len() < max {
            for info in &FIELDS {
                if info.names().any(|n| n.contains(&query)) && !result.contains(&info.name) {
                    result.push(info.name);
                }
            }
        }

        result.truncate(max);
        result
    }

    pub fn info(self) -> &'static FieldInfo {
        &FIELDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn field_type(self) -> FieldType {
        self.info().field_type
    }

    pub fn aliases(self) -> &'static [&'static str] {
        self.info().aliases
    }

    /// Long-form text fields where `field:value` means substring search.
    pub fn is_free_text(self) -> bool {
        matches!(
            self,
            QueryField::Title
                | QueryField::Description
                | QueryField::Design
                | QueryField::AcceptanceCriteria
                | QueryField::Notes
        )
    }

    pub fn all() -> impl Iterator<Item = QueryField> {
        FIELDS.iter().map(|info| info.field)
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}
