// tests/parser_tests.rs

use chrono::NaiveDate;
use issue_query::{
    ParseError, Query, QueryError, QueryField, QueryNode, QueryValue, RelativeDate,
    SortDirective, Timestamp, parse,
};
use pretty_assertions::assert_eq;

fn filter(input: &str) -> QueryNode {
    parse(input)
        .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", input, e))
        .filter
        .expect("query has no filter")
}

fn parse_error(input: &str) -> ParseError {
    match parse(input) {
        Err(QueryError::Parse(e)) => e,
        other => panic!("expected parse error for {:?}, got {:?}", input, other),
    }
}

fn text(value: &str) -> QueryNode {
    QueryNode::contains(None, value)
}

fn eq(field: QueryField, value: QueryValue) -> QueryNode {
    QueryNode::Equals { field, value }
}

fn string(s: &str) -> QueryValue {
    QueryValue::String(s.to_string())
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_not_binds_tighter_than_implicit_and() {
    assert_eq!(
        filter("NOT a b"),
        QueryNode::and(QueryNode::not(text("a")), text("b"))
    );
}

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(
        filter("a b OR c"),
        QueryNode::or(QueryNode::and(text("a"), text("b")), text("c"))
    );
    assert_eq!(
        filter("a OR b AND c"),
        QueryNode::or(text("a"), QueryNode::and(text("b"), text("c")))
    );
}

#[test]
fn test_explicit_and_matches_implicit() {
    assert_eq!(filter("a AND b"), filter("a b"));
}

#[test]
fn test_operators_are_left_associative() {
    assert_eq!(
        filter("a OR b OR c"),
        QueryNode::or(QueryNode::or(text("a"), text("b")), text("c"))
    );
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(
        filter("a (b OR c)"),
        QueryNode::and(text("a"), QueryNode::or(text("b"), text("c")))
    );
}

#[test]
fn test_double_negation() {
    assert_eq!(
        filter("NOT NOT a"),
        QueryNode::not(QueryNode::not(text("a")))
    );
}

// ============================================================================
// Field terms
// ============================================================================

#[test]
fn test_field_names_and_aliases_are_case_insensitive() {
    let expected = eq(QueryField::Priority, QueryValue::Int(1));
    assert_eq!(filter("priority:1"), expected);
    assert_eq!(filter("Priority:1"), expected);
    assert_eq!(filter("P:1"), expected);
}

#[test]
fn test_enum_field_is_equals() {
    assert_eq!(filter("status:open"), eq(QueryField::Status, string("open")));
    assert_eq!(filter("type:bug"), eq(QueryField::IssueType, string("bug")));
}

#[test]
fn test_value_list_is_in() {
    assert_eq!(
        filter("status:open,in_progress"),
        QueryNode::In {
            field: QueryField::Status,
            values: vec![string("open"), string("in_progress")],
        }
    );
}

#[test]
fn test_numeric_range() {
    assert_eq!(
        filter("priority:0..2"),
        QueryNode::Range {
            field: QueryField::Priority,
            min: QueryValue::Int(0),
            max: QueryValue::Int(2),
        }
    );
}

#[test]
fn test_date_range() {
    let date = |d: &str| {
        QueryValue::Timestamp(Timestamp::Date(
            NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap(),
        ))
    };
    assert_eq!(
        filter("created:2024-01-01..2024-01-31"),
        QueryNode::Range {
            field: QueryField::CreatedAt,
            min: date("2024-01-01"),
            max: date("2024-01-31"),
        }
    );
}

#[test]
fn test_relative_date() {
    assert_eq!(
        filter("due:today"),
        eq(QueryField::DueDate, QueryValue::RelativeDate(RelativeDate::Today))
    );
    assert_eq!(
        filter("updated:LAST_WEEK"),
        eq(QueryField::UpdatedAt, QueryValue::RelativeDate(RelativeDate::LastWeek))
    );
}

#[test]
fn test_quoted_instant() {
    let node = filter(r#"updated:"2024-01-15T10:30:00Z""#);
    let QueryNode::Equals {
        value: QueryValue::Timestamp(Timestamp::Instant(instant)),
        ..
    } = &node
    else {
        panic!("expected an instant, got {:?}", node);
    };
    assert_eq!(instant.to_rfc3339(), "2024-01-15T10:30:00+00:00");
}

#[test]
fn test_label_is_has() {
    assert_eq!(
        filter("label:frontend"),
        QueryNode::Has {
            field: QueryField::Labels,
            value: string("frontend"),
        }
    );
}

#[test]
fn test_free_text_field_is_contains() {
    assert_eq!(
        filter(r#"title:"login bug""#),
        QueryNode::contains(Some(QueryField::Title), "login bug")
    );
}

#[test]
fn test_null_values() {
    assert_eq!(filter("assignee:unassigned"), eq(QueryField::Assignee, QueryValue::Null));
    assert_eq!(filter("estimate:none"), eq(QueryField::EstimatedMinutes, QueryValue::Null));
    // Quoted keywords are plain text
    assert_eq!(
        filter(r#"assignee:"unassigned""#),
        eq(QueryField::Assignee, string("unassigned"))
    );
}

#[test]
fn test_numeric_string_coerced_to_integer() {
    assert_eq!(filter(r#"priority:"1""#), eq(QueryField::Priority, QueryValue::Int(1)));
}

#[test]
fn test_number_coerced_to_text() {
    assert_eq!(filter("id:42"), eq(QueryField::Id, string("42")));
}

#[test]
fn test_leading_zeros_kept_on_text_fields() {
    assert_eq!(filter("id:007"), eq(QueryField::Id, string("007")));
    assert_eq!(
        filter("label:007"),
        QueryNode::Has {
            field: QueryField::Labels,
            value: string("007"),
        }
    );
    assert_eq!(parse("id:007").unwrap().to_string(), "id:\"007\"");
    assert_eq!(filter("priority:007"), eq(QueryField::Priority, QueryValue::Int(7)));
}

#[test]
fn test_calendar_edge_date_parses() {
    assert_eq!(
        parse("due:-262143-01-01").unwrap().to_string(),
        "due:-262143-01-01"
    );
}

// ============================================================================
// Sort clause
// ============================================================================

#[test]
fn test_sort_only_query() {
    let query = parse("sort by: priority").unwrap();
    assert_eq!(query.filter, None);
    assert_eq!(query.sort, vec![SortDirective::asc(QueryField::Priority)]);
}

#[test]
fn test_multi_key_sort() {
    let query = parse("status:open sort by: priority asc, updated desc, id").unwrap();
    assert_eq!(
        query.sort,
        vec![
            SortDirective::asc(QueryField::Priority),
            SortDirective::desc(QueryField::UpdatedAt),
            SortDirective::asc(QueryField::Id),
        ]
    );
}

#[test]
fn test_empty_query() {
    assert_eq!(parse("").unwrap(), Query::default());
    assert!(parse("  \t ").unwrap().is_empty());
}

// ============================================================================
// Canonical rendering
// ============================================================================

#[test]
fn test_display_is_canonical() {
    let query = parse("NOT s:open p:1 sort by: modified desc").unwrap();
    assert_eq!(
        query.to_string(),
        "(NOT status:open AND priority:1) sort by: updated desc"
    );
}

#[test]
fn test_display_reparses_to_same_query() {
    let inputs = [
        r#"title:"two words" OR label:ui,"needs review""#,
        "priority:0..1 NOT assignee:unassigned",
        r#"created:"2024-01-15T10:30:00Z" due:this-week"#,
    ];
    for input in inputs {
        let query = parse(input).unwrap();
        assert_eq!(parse(&query.to_string()).unwrap(), query, "input: {}", input);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_field_suggests_alternatives() {
    let err = parse_error("priorit:0");
    assert_eq!(
        err,
        ParseError::UnknownField {
            name: "priorit".into(),
            position: 0,
            suggestions: vec!["priority"],
        }
    );
    assert_eq!(
        err.to_string(),
        "Unknown field 'priorit' at position 0. Did you mean: priority?"
    );
}

#[test]
fn test_unknown_field_without_suggestions() {
    let err = parse_error("zzz:1");
    assert_eq!(err.to_string(), "Unknown field 'zzz' at position 0");
}

#[test]
fn test_unknown_sort_field() {
    assert!(matches!(
        parse_error("sort by: prioirty"),
        ParseError::UnknownField { position: 9, .. }
    ));
}

#[test]
fn test_missing_value() {
    assert_eq!(
        parse_error("status:"),
        ParseError::MissingValue {
            field: "status".into(),
            position: 7,
        }
    );
    assert!(matches!(
        parse_error("status: OR x"),
        ParseError::MissingValue { position: 8, .. }
    ));
}

#[test]
fn test_unterminated_group() {
    assert_eq!(
        parse_error("a (b OR c"),
        ParseError::UnterminatedGroup { position: 2 }
    );
    assert_eq!(
        parse_error("(a sort by: id"),
        ParseError::UnterminatedGroup { position: 0 }
    );
}

#[test]
fn test_trailing_tokens_after_sort() {
    assert_eq!(
        parse_error("a sort by: priority desc extra"),
        ParseError::UnexpectedToken {
            lexeme: "extra".into(),
            position: 25,
        }
    );
}

#[test]
fn test_stray_tokens() {
    assert_eq!(
        parse_error("a )"),
        ParseError::UnexpectedToken {
            lexeme: ")".into(),
            position: 2,
        }
    );
    assert!(matches!(parse_error("a *"), ParseError::UnexpectedToken { .. }));
    assert!(matches!(parse_error("a AND"), ParseError::UnexpectedEnd { .. }));
}

#[test]
fn test_non_numeric_priority() {
    let err = parse_error("priority:high");
    assert_eq!(
        err,
        ParseError::InvalidValue {
            field: QueryField::Priority,
            message: "field 'priority' expects an integer, got text 'high'".into(),
            position: 9,
        }
    );
}

#[test]
fn test_enum_fields_reject_integers() {
    assert_eq!(
        parse_error("status:1"),
        ParseError::InvalidValue {
            field: QueryField::Status,
            message: "field 'status' expects a status name, got integer '1'".into(),
            position: 7,
        }
    );
    assert!(matches!(
        parse_error("type:3"),
        ParseError::InvalidValue {
            field: QueryField::IssueType,
            ..
        }
    ));
}

#[test]
fn test_date_fields_reject_integers() {
    let err = parse_error("created:2024");
    let ParseError::InvalidValue {
        field,
        message,
        position,
    } = err
    else {
        panic!("expected an invalid value, got {:?}", err);
    };
    assert_eq!(field, QueryField::CreatedAt);
    assert_eq!(position, 8);
    assert!(message.ends_with("got integer '2024'"), "{}", message);
}

#[test]
fn test_invalid_date() {
    assert!(matches!(
        parse_error("due:someday"),
        ParseError::InvalidValue {
            field: QueryField::DueDate,
            ..
        }
    ));
}

#[test]
fn test_range_on_unordered_field() {
    assert_eq!(
        parse_error("title:a..b"),
        ParseError::InvalidRange {
            field: QueryField::Title,
            position: 7,
        }
    );
}

#[test]
fn test_lex_errors_pass_through() {
    assert!(matches!(parse("title:\"open"), Err(QueryError::Lex(_))));
}
