use std::fmt;

use crate::ast::{QueryField, QueryValue};

/// Abstract Syntax Tree node of a filter expression.
///
/// The tree is owned, immutable once built and free of back-references, so a
/// single parsed filter can be evaluated from several threads at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    // Logical composition
    /// Both sides must match
    ///
    /// # Example
    /// ```text
    /// status:open AND priority:1
    /// status:open priority:1
    /// ```
    And(Box<QueryNode>, Box<QueryNode>),

    /// Either side must match
    ///
    /// # Example
    /// ```text
    /// status:open OR status:blocked
    /// ```
    Or(Box<QueryNode>, Box<QueryNode>),

    /// Child must not match
    ///
    /// # Example
    /// ```text
    /// NOT status:closed
    /// ```
    Not(Box<QueryNode>),

    // Field predicates
    /// Exact match
    ///
    /// # Example
    /// ```text
    /// priority:1
    /// assignee:null
    /// ```
    Equals {
        field: QueryField,
        value: QueryValue,
    },

    /// Matches any of the listed values
    ///
    /// # Example
    /// ```text
    /// status:open,in_progress
    /// ```
    In {
        field: QueryField,
        values: Vec<QueryValue>,
    },

    /// Inclusive bounds
    ///
    /// # Example
    /// ```text
    /// priority:0..2
    /// created:last-week..today
    /// ```
    Range {
        field: QueryField,
        min: QueryValue,
        max: QueryValue,
    },

    /// Substring search; `field: None` searches every text-searchable field
    ///
    /// # Example
    /// ```text
    /// login
    /// title:"login page"
    /// ```
    Contains {
        field: Option<QueryField>,
        value: String,
        case_sensitive: bool,
    },

    /// List membership
    ///
    /// # Example
    /// ```text
    /// label:frontend
    /// ```
    Has {
        field: QueryField,
        value: QueryValue,
    },
}

/// One method per [`QueryNode`] variant; see [`QueryNode::accept`].
pub trait QueryVisitor {
    type Output;

    fn visit_and(&mut self, left: &QueryNode, right: &QueryNode) -> Self::Output;
    fn visit_or(&mut self, left: &QueryNode, right: &QueryNode) -> Self::Output;
    fn visit_not(&mut self, child: &QueryNode) -> Self::Output;
    fn visit_equals(&mut self, field: QueryField, value: &QueryValue) -> Self::Output;
    fn visit_in(&mut self, field: QueryField, values: &[QueryValue]) -> Self::Output;
    fn visit_range(&mut self, field: QueryField, min: &QueryValue, max: &QueryValue)
    -> Self::Output;
    fn visit_contains(
        &mut self,
        field: Option<QueryField>,
        value: &str,
        case_sensitive: bool,
    ) -> Self::Output;
    fn visit_has(&mut self, field: QueryField, value: &QueryValue) -> Self::Output;
}

impl QueryNode {
    pub fn and(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: QueryNode, right: QueryNode) -> Self {
        QueryNode::Or(Box::new(left), Box::new(right))
    }

    pub fn not(child: QueryNode) -> Self {
        QueryNode::Not(Box::new(child))
    }

    /// Case-insensitive substring search.
    pub fn contains(field: Option<QueryField>, value: impl Into<String>) -> Self {
        QueryNode::Contains {
            field,
            value: value.into(),
            case_sensitive: false,
        }
    }

    /// Dispatches to the visitor method matching this node's variant.
    pub fn accept<V: QueryVisitor>(&self, visitor: &mut V) -> V::Output {
        match self {
            QueryNode::And(left, right) => visitor.visit_and(left, right),
            QueryNode::Or(left, right) => visitor.visit_or(left, right),
            QueryNode::Not(child) => visitor.visit_not(child),
            QueryNode::Equals { field, value } => visitor.visit_equals(*field, value),
            QueryNode::In { field, values } => visitor.visit_in(*field, values),
            QueryNode::Range { field, min, max } => visitor.visit_range(*field, min, max),
            QueryNode::Contains {
                field,
                value,
                case_sensitive,
            } => visitor.visit_contains(*field, value, *case_sensitive),
            QueryNode::Has { field, value } => visitor.visit_has(*field, value),
        }
    }
}

/// Renders a node back to query text, parenthesizing every composite.
struct QueryPrinter<'a, 'f> {
    out: &'a mut fmt::Formatter<'f>,
}

impl QueryPrinter<'_, '_> {
    fn binary(&mut self, left: &QueryNode, op: &str, right: &QueryNode) -> fmt::Result {
        self.out.write_str("(")?;
        left.accept(self)?;
        write!(self.out, " {} ", op)?;
        right.accept(self)?;
        self.out.write_str(")")
    }
}

impl QueryVisitor for QueryPrinter<'_, '_> {
    type Output = fmt::Result;

    fn visit_and(&mut self, left: &QueryNode, right: &QueryNode) -> fmt::Result {
        self.binary(left, "AND", right)
    }

    fn visit_or(&mut self, left: &QueryNode, right: &QueryNode) -> fmt::Result {
        self.binary(left, "OR", right)
    }

    fn visit_not(&mut self, child: &QueryNode) -> fmt::Result {
        self.out.write_str("NOT ")?;
        child.accept(self)
    }

    fn visit_equals(&mut self, field: QueryField, value: &QueryValue) -> fmt::Result {
        write!(self.out, "{}:{}", field, value)
    }

    fn visit_in(&mut self, field: QueryField, values: &[QueryValue]) -> fmt::Result {
        write!(self.out, "{}:", field)?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.out.write_str(",")?;
            }
            write!(self.out, "{}", value)?;
        }
        Ok(())
    }

    fn visit_range(&mut self, field: QueryField, min: &QueryValue, max: &QueryValue) -> fmt::Result {
        write!(self.out, "{}:{}..{}", field, min, max)
    }

    fn visit_contains(
        &mut self,
        field: Option<QueryField>,
        value: &str,
        _case_sensitive: bool,
    ) -> fmt::Result {
        let value = QueryValue::String(value.to_string());
        match field {
            Some(field) => write!(self.out, "{}:{}", field, value),
            None => write!(self.out, "{}", value),
        }
    }

    fn visit_has(&mut self, field: QueryField, value: &QueryValue) -> fmt::Result {
        write!(self.out, "{}:{}", field, value)
    }
}

impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.accept(&mut QueryPrinter { out: f })
    }
}
