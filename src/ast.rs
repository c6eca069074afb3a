//! # Issue Query Language - Abstract Syntax Tree
//!
//! This module defines the data model shared by the lexer, parser and evaluator
//! of the issue query language, a compact filter-and-sort language over issue
//! records.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[fields]** - The queryable fields, their types and aliases
//! - **[values]** - Literal values, dates and type coercion
//! - **[nodes]** - Filter expression nodes and the visitor contract
//! - **[query]** - Complete query structure with sort keys
//!
//! ## Quick Start
//!
//! ```text
//! status:open priority:0..1 sort by: updated desc
//! ```
//!
//! This query keeps open issues with priority 0 or 1, most recently updated first.
//!
//! ## Core Concepts
//!
//! ### Terms
//!
//! - **Field terms** `field:value` - match one field (`status:open`, `label:ui`)
//! - **Lists** `field:a,b,c` - match any of several values
//! - **Ranges** `field:min..max` - inclusive bounds on integer and date fields
//! - **Bare terms** `word` or `"some words"` - search every text field
//!
//! ### Operators
//!
//! `NOT` binds tightest, then `AND`, then `OR`. Terms written next to each
//! other with no operator are joined with `AND`. Parentheses group.
//!
//! ### Dates
//!
//! Date fields accept `YYYY-MM-DD`, quoted RFC 3339 instants and relative
//! dates (`today`, `last-week`, `this-month`, ...). Relative dates are resolved
//! when the query is evaluated, not when it is parsed.
//!
//! ## Examples
//!
//! ### Grouping
//!
//! ```text
//! (status:open OR status:in_progress) AND priority:0..1
//! ```
//!
//! ### Unassigned work due this week
//!
//! ```text
//! assignee:unassigned due:this-week
//! ```
//!
//! ### Free text with sorting
//!
//! ```text
//! "login page" NOT label:wontfix sort by: priority, created desc
//! ```
pub mod tokens;
pub mod fields;
pub mod values;
pub mod nodes;
pub mod query;

pub use tokens::{Literal, Token, TokenType};
pub use fields::{FieldInfo, FieldType, QueryField, FIELDS, TEXT_SEARCH_FIELDS};
pub use values::{CoercionError, Interval, QueryValue, RelativeDate, Timestamp};
pub use nodes::{QueryNode, QueryVisitor};
pub use query::{Query, SortDirection, SortDirective};
