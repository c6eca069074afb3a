use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset};

use crate::{
    ast::{
        Query, QueryField, QueryNode, QueryValue, QueryVisitor, SortDirection,
        SortDirective, TEXT_SEARCH_FIELDS,
    },
    clock::{Clock, SystemClock},
    record::{FieldValue, Record},
};

/// Matches one record against a filter tree.
///
/// `now` is read once per [`Evaluator::filter`] call so every relative date in
/// the tree resolves against the same instant.
struct RecordMatcher<'a, R> {
    record: &'a R,
    now: &'a DateTime<FixedOffset>,
}

impl<R: Record> RecordMatcher<'_, R> {
    fn equals(&self, field: QueryField, expected: &QueryValue) -> bool {
        let actual = self.record.field(field);
        let is_enum = field.field_type().is_enum();

        match (actual, expected) {
            (FieldValue::Null, QueryValue::Null) => true,
            (FieldValue::List(items), QueryValue::Null) => items.is_empty(),
            (FieldValue::Null, _) | (_, QueryValue::Null) => false,
            (FieldValue::Text(text), QueryValue::String(s)) => text_equals(text, s, is_enum),
            (FieldValue::Integer(n), QueryValue::Int(m)) => n == *m,
            (FieldValue::Timestamp(t), value) => value
                .interval(self.now)
                .is_some_and(|interval| interval.contains(&t)),
            (FieldValue::List(items), QueryValue::String(s)) => {
                items.iter().any(|item| text_equals(item, s, false))
            }
            _ => false,
        }
    }
}

impl<R: Record> QueryVisitor for RecordMatcher<'_, R> {
    type Output = bool;

    fn visit_and(&mut self, left: &QueryNode, right: &QueryNode) -> bool {
        left.accept(self) && right.accept(self)
    }

    fn visit_or(&mut self, left: &QueryNode, right: &QueryNode) -> bool {
        left.accept(self) || right.accept(self)
    }

    fn visit_not(&mut self, child: &QueryNode) -> bool {
        !child.accept(self)
    }

    fn visit_equals(&mut self, field: QueryField, value: &QueryValue) -> bool {
        self.equals(field, value)
    }

    fn visit_in(&mut self, field: QueryField, values: &[QueryValue]) -> bool {
        values.iter().any(|value| self.equals(field, value))
    }

    fn visit_range(&mut self, field: QueryField, min: &QueryValue, max: &QueryValue) -> bool {
        match self.record.field(field) {
            FieldValue::Integer(n) => match (min, max) {
                (QueryValue::Int(lo), QueryValue::Int(hi)) => *lo <= n && n <= *hi,
                _ => false,
            },
            FieldValue::Timestamp(t) => match (min.interval(self.now), max.interval(self.now)) {
                // Inclusive of the whole span named by each bound
                (Some(lo), Some(hi)) => lo.start <= t && t < hi.end,
                _ => false,
            },
            _ => false,
        }
    }

    fn visit_contains(
        &mut self,
        field: Option<QueryField>,
        value: &str,
        case_sensitive: bool,
    ) -> bool {
        let needle = if case_sensitive {
            value.to_string()
        } else {
            value.to_lowercase()
        };
        let found = |haystack: &str| {
            if case_sensitive {
                haystack.contains(&needle)
            } else {
                haystack.to_lowercase().contains(&needle)
            }
        };

        let fields: &[QueryField] = match field {
            Some(ref field) => std::slice::from_ref(field),
            None => &TEXT_SEARCH_FIELDS,
        };

        fields.iter().any(|f| match self.record.field(*f) {
            FieldValue::Text(text) => found(text),
            FieldValue::List(items) => items.iter().any(|item| found(item)),
            FieldValue::Integer(n) => found(&n.to_string()),
            FieldValue::Timestamp(_) | FieldValue::Null => false,
        })
    }

    fn visit_has(&mut self, field: QueryField, value: &QueryValue) -> bool {
        self.equals(field, value)
    }
}

/// Case-insensitive text equality; enum names also treat `-` and `_` alike.
fn text_equals(actual: &str, expected: &str, is_enum: bool) -> bool {
    if is_enum {
        let fold = |s: &str| s.to_lowercase().replace('-', "_");
        fold(actual) == fold(expected)
    } else {
        actual.to_lowercase() == expected.to_lowercase()
    }
}

/// Orders two values of the same field; nulls sort after everything else.
fn compare_values(a: FieldValue<'_>, b: FieldValue<'_>) -> Ordering {
    fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
        s.chars().flat_map(char::to_lowercase)
    }

    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    match (a, b) {
        (FieldValue::Integer(x), FieldValue::Integer(y)) => x.cmp(&y),
        (FieldValue::Timestamp(x), FieldValue::Timestamp(y)) => x.cmp(&y),
        (FieldValue::Text(x), FieldValue::Text(y)) => folded(x).cmp(folded(y)),
        (FieldValue::List(xs), FieldValue::List(ys)) => xs
            .iter()
            .map(|s| folded(s).collect::<String>())
            .cmp(ys.iter().map(|s| folded(s).collect::<String>())),
        _ => Ordering::Equal,
    }
}

fn compare_records<R: Record>(a: &R, b: &R, sort: &[SortDirective]) -> Ordering {
    for directive in sort {
        let ordering = compare_values(a.field(directive.field), b.field(directive.field));
        let ordering = match directive.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// The query evaluator.
///
/// Applies a parsed [`Query`] to a slice of records: keeps the records the
/// filter accepts, then stably sorts them by the query's sort keys. The
/// evaluator never mutates or retains the records it is given.
#[derive(Debug, Clone, Default)]
pub struct Evaluator<C = SystemClock> {
    clock: C,
}

impl Evaluator {
    /// Creates an evaluator reading the system clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> Evaluator<C> {
    /// Creates an evaluator resolving relative dates against `clock`.
    pub fn with_clock(clock: C) -> Self {
        Evaluator { clock }
    }

    /// Filters and sorts `records` according to `query`.
    ///
    /// # Examples
    ///
    /// ```
    /// use issue_query::{Evaluator, Issue, parse};
    ///
    /// let mut urgent = Issue::new("bd-1", "Outage");
    /// urgent.priority = 0;
    /// let routine = Issue::new("bd-2", "Typo");
    /// let records = vec![routine, urgent];
    ///
    /// let query = parse("priority:0..1").unwrap();
    /// let result = Evaluator::new().filter(&records, &query);
    /// assert_eq!(result.len(), 1);
    /// assert_eq!(result[0].id, "bd-1");
    /// ```
    pub fn filter<'a, R: Record>(&self, records: &'a [R], query: &Query) -> Vec<&'a R> {
        let now = self.clock.now();

        let mut result: Vec<&'a R> = match &query.filter {
            Some(node) => records
                .iter()
                .filter(|record| node.accept(&mut RecordMatcher { record: *record, now: &now }))
                .collect(),
            None => records.iter().collect(),
        };

        if !query.sort.is_empty() {
            result.sort_by(|a, b| compare_records(*a, *b, &query.sort));
        }

        tracing::debug!(
            input = records.len(),
            matched = result.len(),
            sort_keys = query.sort.len(),
            "evaluated query"
        );
        result
    }

    /// Tests a single record against a filter tree.
    pub fn matches<R: Record>(&self, record: &R, node: &QueryNode) -> bool {
        let now = self.clock.now();
        node.accept(&mut RecordMatcher { record, now: &now })
    }
}

/// Filters and sorts `records` with an evaluator reading the system clock.
pub fn filter<'a, R: Record>(records: &'a [R], query: &Query) -> Vec<&'a R> {
    Evaluator::new().filter(records, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nulls_sort_last_ascending() {
        assert_eq!(
            compare_values(FieldValue::Null, FieldValue::Integer(1)),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(FieldValue::Text("b"), FieldValue::Text("A")),
            Ordering::Greater
        );
    }

    #[test]
    fn enum_names_fold_separators() {
        assert!(text_equals("in_progress", "IN-PROGRESS", true));
        assert!(!text_equals("in_progress", "in-progress", false));
    }
}
