use std::fmt;

use crate::ast::{QueryField, QueryNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One key of a multi-key sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortDirective {
    pub field: QueryField,
    pub direction: SortDirection,
}

impl SortDirective {
    pub fn new(field: QueryField, direction: SortDirection) -> Self {
        SortDirective { field, direction }
    }

    pub fn asc(field: QueryField) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: QueryField) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// Complete parsed query: an optional filter followed by sort keys.
///
/// A query with no filter and no sort keys matches every record in its
/// original order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Query {
    /// Predicate each record must satisfy (all records when `None`)
    pub filter: Option<QueryNode>,

    /// Sort keys, most significant first (original order when empty)
    pub sort: Vec<SortDirective>,
}

impl Query {
    pub fn new(filter: Option<QueryNode>, sort: Vec<SortDirective>) -> Self {
        Query { filter, sort }
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_none() && self.sort.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(filter) = &self.filter {
            write!(f, "{}", filter)?;
            if !self.sort.is_empty() {
                f.write_str(" ")?;
            }
        }
        if !self.sort.is_empty() {
            f.write_str("sort by:")?;
            for (i, directive) in self.sort.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                let direction = match directive.direction {
                    SortDirection::Asc => "asc",
                    SortDirection::Desc => "desc",
                };
                write!(f, "{}{} {}", sep, directive.field, direction)?;
            }
        }
        Ok(())
    }
}
