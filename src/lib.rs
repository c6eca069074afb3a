pub mod ast;
pub mod clock;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod record;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{
    FieldType, Query, QueryField, QueryNode, QueryValue, QueryVisitor, RelativeDate,
    SortDirection, SortDirective, Timestamp, Token, TokenType,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use evaluator::{Evaluator, filter};
pub use lexer::{LexError, Lexer, tokenize};
pub use output::{to_json, to_json_pretty, to_table};
pub use parser::{ParseError, Parser, QueryError, parse, parse_tokens};
pub use record::{FieldValue, Issue, Record, Status};
