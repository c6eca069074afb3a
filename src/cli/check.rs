//! Validate queries and inspect their tokens

use std::fmt::Write as _;

use crate::{Lexer, parse};
use super::CliError;

/// Parse a query and return its canonical rendering.
///
/// Precedence is made explicit with parentheses, field aliases are replaced
/// by canonical names and the sort clause is written out in full.
pub fn execute_check(query: &str) -> Result<String, CliError> {
    let parsed = parse(query)?;
    if parsed.is_empty() {
        return Ok("(matches everything)".to_string());
    }
    Ok(parsed.to_string())
}

/// Tokenize a query and list one token per line: type, position, lexeme.
pub fn execute_tokens(query: &str) -> Result<String, CliError> {
    let tokens = Lexer::new(query).tokenize().map_err(crate::QueryError::from)?;

    let mut out = String::new();
    for token in &tokens {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{token}");
    }
    Ok(out)
}
