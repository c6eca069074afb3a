use std::fmt;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveTime, TimeDelta, Utc,
};

use crate::ast::{FieldType, QueryField};

/// A half-open span of time, `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// Symbolic date, resolved against the evaluator's clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelativeDate {
    Today,
    Yesterday,
    Tomorrow,
    ThisWeek,
    LastWeek,
    NextWeek,
    ThisMonth,
    LastMonth,
    NextMonth,
}

impl RelativeDate {
    pub const ALL: [RelativeDate; 9] = [
        RelativeDate::Today,
        RelativeDate::Yesterday,
        RelativeDate::Tomorrow,
        RelativeDate::ThisWeek,
        RelativeDate::LastWeek,
        RelativeDate::NextWeek,
        RelativeDate::ThisMonth,
        RelativeDate::LastMonth,
        RelativeDate::NextMonth,
    ];

    pub fn from_name(name: &str) -> Option<RelativeDate> {
        match name.to_lowercase().replace('_', "-").as_str() {
            "today" => Some(RelativeDate::Today),
            "yesterday" => Some(RelativeDate::Yesterday),
            "tomorrow" => Some(RelativeDate::Tomorrow),
            "this-week" => Some(RelativeDate::ThisWeek),
            "last-week" => Some(RelativeDate::LastWeek),
            "next-week" => Some(RelativeDate::NextWeek),
            "this-month" => Some(RelativeDate::ThisMonth),
            "last-month" => Some(RelativeDate::LastMonth),
            "next-month" => Some(RelativeDate::NextMonth),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RelativeDate::Today => "today",
            RelativeDate::Yesterday => "yesterday",
            RelativeDate::Tomorrow => "tomorrow",
            RelativeDate::ThisWeek => "this-week",
            RelativeDate::LastWeek => "last-week",
            RelativeDate::NextWeek => "next-week",
            RelativeDate::ThisMonth => "this-month",
            RelativeDate::LastMonth => "last-month",
            RelativeDate::NextMonth => "next-month",
        }
    }

    /// Resolves to the calendar span this date names, as seen from `now`.
    ///
    /// Day boundaries follow `now`'s UTC offset; weeks start on Monday.
    /// Returns `None` when the span falls outside the representable range.
    pub fn resolve(self, now: &DateTime<FixedOffset>) -> Option<Interval> {
        let today = now.date_naive();
        let monday =
            today.checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_monday())))?;
        let first_of_month = today.checked_sub_days(Days::new(u64::from(today.day0())))?;
        let days = |date: NaiveDate, n: u64| date.checked_add_days(Days::new(n));
        let months = |date: NaiveDate, n: u32| date.checked_add_months(Months::new(n));

        let (start, end) = match self {
            RelativeDate::Today => (today, days(today, 1)?),
            RelativeDate::Yesterday => (today.checked_sub_days(Days::new(1))?, today),
            RelativeDate::Tomorrow => (days(today, 1)?, days(today, 2)?),
            RelativeDate::ThisWeek => (monday, days(monday, 7)?),
            RelativeDate::LastWeek => (monday.checked_sub_days(Days::new(7))?, monday),
            RelativeDate::NextWeek => (days(monday, 7)?, days(monday, 14)?),
            RelativeDate::ThisMonth => (first_of_month, months(first_of_month, 1)?),
            RelativeDate::LastMonth => (
                first_of_month.checked_sub_months(Months::new(1))?,
                first_of_month,
            ),
            RelativeDate::NextMonth => (months(first_of_month, 1)?, months(first_of_month, 2)?),
        };

        Some(Interval {
            start: local_midnight(start, now.offset())?,
            end: local_midnight(end, now.offset())?,
        })
    }
}

impl fmt::Display for RelativeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An absolute point in time written in a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timestamp {
    /// A calendar date (`2024-01-15`), covering the whole day
    Date(NaiveDate),
    /// An RFC 3339 instant, compared to the second
    Instant(DateTime<Utc>),
}

impl Timestamp {
    /// Parses `YYYY-MM-DD` or an RFC 3339 date-time.
    pub fn parse(text: &str) -> Option<Timestamp> {
        if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Some(Timestamp::Date(date));
        }
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|dt| Timestamp::Instant(dt.with_timezone(&Utc)))
    }

    /// The span of time this timestamp denotes; dates use `now`'s UTC offset.
    ///
    /// Returns `None` for dates at the edge of the calendar whose span cannot
    /// be represented.
    pub fn resolve(&self, now: &DateTime<FixedOffset>) -> Option<Interval> {
        match self {
            Timestamp::Date(date) => Some(Interval {
                start: local_midnight(*date, now.offset())?,
                end: local_midnight(date.checked_add_days(Days::new(1))?, now.offset())?,
            }),
            Timestamp::Instant(instant) => {
                let subsec = TimeDelta::nanoseconds(i64::from(instant.timestamp_subsec_nanos()));
                let start = instant.checked_sub_signed(subsec)?;
                Some(Interval {
                    start,
                    end: start.checked_add_signed(TimeDelta::seconds(1))?,
                })
            }
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Timestamp::Instant(instant) => write!(f, "\"{}\"", instant.to_rfc3339()),
        }
    }
}

fn local_midnight(date: NaiveDate, offset: &FixedOffset) -> Option<DateTime<Utc>> {
    let local = date.and_time(NaiveTime::MIN);
    local
        .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))
        .map(|utc| utc.and_utc())
}

/// A literal value appearing in a query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryValue {
    String(String),
    Int(i64),
    Timestamp(Timestamp),
    RelativeDate(RelativeDate),
    Null,
}

/// Why a value could not be converted to a field's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionError {
    pub field: QueryField,
    pub message: String,
}

impl QueryValue {
    /// Converts this value to the representation `field` requires.
    ///
    /// | target                    | accepts                        |
    /// |---------------------------|--------------------------------|
    /// | string, nullable string   | anything (stringified)         |
    /// | string list               | string, int, null              |
    /// | integer, nullable integer | int, numeric string            |
    /// | timestamp                 | timestamp, relative date, null |
    /// | status, issue type        | string, null                   |
    pub fn coerce_to_field_type(&self, field: QueryField) -> Result<QueryValue, CoercionError> {
        let field_type = field.field_type();
        let fail = |expected: &str| CoercionError {
            field,
            message: format!(
                "field '{}' expects {}, got {} '{}'",
                field.name(),
                expected,
                self.kind(),
                self
            ),
        };

        match (field_type, self) {
            (_, QueryValue::Null) if field_type.is_nullable() || !field_type.is_integer() => {
                Ok(QueryValue::Null)
            }

            (FieldType::String | FieldType::NullableString, QueryValue::String(_)) => Ok(self.clone()),
            (FieldType::String | FieldType::NullableString, other) => {
                Ok(QueryValue::String(other.text()))
            }

            (FieldType::StringList, QueryValue::String(_)) => Ok(self.clone()),
            (FieldType::StringList, QueryValue::Int(n)) => Ok(QueryValue::String(n.to_string())),
            (FieldType::StringList, _) => Err(fail("a text value")),

            (FieldType::Integer | FieldType::NullableInteger, QueryValue::Int(_)) => Ok(self.clone()),
            (FieldType::Integer | FieldType::NullableInteger, QueryValue::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(QueryValue::Int)
                .map_err(|_| fail("an integer")),
            (FieldType::Integer | FieldType::NullableInteger, _) => Err(fail("an integer")),

            (
                FieldType::Timestamp | FieldType::NullableTimestamp,
                QueryValue::Timestamp(_) | QueryValue::RelativeDate(_),
            ) => Ok(self.clone()),
            (FieldType::Timestamp | FieldType::NullableTimestamp, _) => {
                Err(fail("a date (YYYY-MM-DD, RFC 3339, or a relative date such as 'today')"))
            }

            (FieldType::EnumStatus | FieldType::EnumIssueType, QueryValue::String(_)) => {
                Ok(self.clone())
            }
            (FieldType::EnumStatus, _) => Err(fail("a status name")),
            (FieldType::EnumIssueType, _) => Err(fail("an issue type name")),
        }
    }

    /// The value as plain text, without quoting.
    pub fn text(&self) -> String {
        match self {
            QueryValue::String(s) => s.clone(),
            QueryValue::Int(n) => n.to_string(),
            QueryValue::Timestamp(Timestamp::Date(date)) => date.format("%Y-%m-%d").to_string(),
            QueryValue::Timestamp(Timestamp::Instant(instant)) => instant.to_rfc3339(),
            QueryValue::RelativeDate(date) => date.name().to_string(),
            QueryValue::Null => "null".to_string(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            QueryValue::String(_) => "text",
            QueryValue::Int(_) => "integer",
            QueryValue::Timestamp(_) => "timestamp",
            QueryValue::RelativeDate(_) => "relative date",
            QueryValue::Null => "null",
        }
    }

    /// The time span a date-like value covers, resolved against `now`.
    pub fn interval(&self, now: &DateTime<FixedOffset>) -> Option<Interval> {
        match self {
            QueryValue::Timestamp(ts) => ts.resolve(now),
            QueryValue::RelativeDate(date) => date.resolve(now),
            _ => None,
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::String(s) if needs_quotes(s) => {
                write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
            }
            QueryValue::String(s) => f.write_str(s),
            QueryValue::Int(n) => write!(f, "{}", n),
            QueryValue::Timestamp(ts) => write!(f, "{}", ts),
            QueryValue::RelativeDate(date) => write!(f, "{}", date),
            QueryValue::Null => f.write_str("null"),
        }
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || !s.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        || s.starts_with('-')
        || matches!(
            s.to_lowercase().as_str(),
            "and" | "or" | "not" | "asc" | "desc" | "null" | "none" | "unassigned" | "sort"
        )
        || s.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<FixedOffset> {
        // Wednesday
        DateTime::parse_from_rfc3339("2024-03-13T15:30:00+00:00").unwrap()
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn today_covers_the_calendar_day() {
        let interval = RelativeDate::Today.resolve(&now()).unwrap();
        assert_eq!(interval.start, utc("2024-03-13T00:00:00Z"));
        assert_eq!(interval.end, utc("2024-03-14T00:00:00Z"));
    }

    #[test]
    fn weeks_start_on_monday() {
        let interval = RelativeDate::LastWeek.resolve(&now()).unwrap();
        assert_eq!(interval.start, utc("2024-03-04T00:00:00Z"));
        assert_eq!(interval.end, utc("2024-03-11T00:00:00Z"));
    }

    #[test]
    fn months_follow_the_calendar() {
        let interval = RelativeDate::LastMonth.resolve(&now()).unwrap();
        assert_eq!(interval.start, utc("2024-02-01T00:00:00Z"));
        assert_eq!(interval.end, utc("2024-03-01T00:00:00Z"));
    }

    #[test]
    fn day_boundaries_follow_the_clock_offset() {
        let now = DateTime::parse_from_rfc3339("2024-03-13T01:00:00+05:00").unwrap();
        let interval = RelativeDate::Today.resolve(&now).unwrap();
        assert_eq!(interval.start, utc("2024-03-12T19:00:00Z"));
    }

    #[test]
    fn instants_cover_one_second() {
        let ts = Timestamp::parse("2024-03-13T10:00:00.250Z").unwrap();
        let interval = ts.resolve(&now()).unwrap();
        assert!(interval.contains(&utc("2024-03-13T10:00:00.900Z")));
        assert!(!interval.contains(&utc("2024-03-13T10:00:01Z")));
    }

    #[test]
    fn calendar_edges_do_not_resolve() {
        let east = DateTime::parse_from_rfc3339("2024-03-13T01:00:00+05:00").unwrap();
        assert_eq!(Timestamp::Date(NaiveDate::MIN).resolve(&east), None);
        assert_eq!(Timestamp::Date(NaiveDate::MAX).resolve(&now()), None);
        assert!(Timestamp::Date(NaiveDate::MAX - Days::new(1)).resolve(&now()).is_some());
    }

    #[test]
    fn numeric_strings_coerce_to_integers() {
        let value = QueryValue::String("3".into());
        assert_eq!(
            value.coerce_to_field_type(QueryField::Priority),
            Ok(QueryValue::Int(3))
        );
        assert!(QueryValue::String("high".into())
            .coerce_to_field_type(QueryField::Priority)
            .is_err());
    }

    #[test]
    fn timestamps_reject_text() {
        let err = QueryValue::String("soon".into())
            .coerce_to_field_type(QueryField::DueDate)
            .unwrap_err();
        assert!(err.message.contains("'due' expects a date"));
    }
}
