use thiserror::Error;

use crate::{
    ast::{
        FieldType, Literal, Query, QueryField, QueryNode, QueryValue, RelativeDate, SortDirection,
        SortDirective, Timestamp, Token, TokenType,
    },
    lexer::{LexError, tokenize},
};

/// Errors raised while building a [`Query`] from tokens.
///
/// The parser stops at the first error; no partial query is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown field '{name}' at position {position}{hint}", hint = did_you_mean(.suggestions))]
    UnknownField {
        name: String,
        position: usize,
        suggestions: Vec<&'static str>,
    },

    #[error("Missing value after '{field}:' at position {position}")]
    MissingValue { field: String, position: usize },

    #[error("Unterminated group: missing ')' for '(' at position {position}")]
    UnterminatedGroup { position: usize },

    #[error("Unexpected token '{lexeme}' at position {position}")]
    UnexpectedToken { lexeme: String, position: usize },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    #[error("Invalid value at position {position}: {message}")]
    InvalidValue {
        field: QueryField,
        message: String,
        position: usize,
    },

    #[error("Field '{field}' does not support ranges (at position {position})")]
    InvalidRange { field: QueryField, position: usize },

    #[error("Unexpected character '{lexeme}' at position {position}")]
    InvalidCharacter { lexeme: String, position: usize },
}

fn did_you_mean(suggestions: &[&str]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(". Did you mean: {}?", suggestions.join(", "))
    }
}

/// Either failure of the text-to-query pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

const MAX_SUGGESTIONS: usize = 3;

/// Recursive-descent parser over a token stream.
///
/// ```text
/// query    := [ or ] [ "sort by" ":" item ("," item)* ]
/// or       := and ( "OR" and )*
/// and      := not ( [ "AND" ] not )*
/// not      := "NOT" not | primary
/// primary  := "(" or ")" | FIELD ":" values | term
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Takes ownership of `tokens`; an EOF token is appended if missing.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.is(TokenType::Eof)) {
            let end = tokens
                .last()
                .map_or(0, |t| t.position + t.lexeme.chars().count());
            tokens.push(Token::new(TokenType::Eof, "", end));
        }
        Parser { tokens, current: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.current + 1).min(last)]
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().is(token_type)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if !token.is(TokenType::Eof) {
            self.current += 1;
        }
        token
    }

    /// Error for the current token appearing where `expected` was required.
    fn unexpected(&self, expected: &'static str) -> ParseError {
        let token = self.peek();
        match token.token_type {
            TokenType::Eof => ParseError::UnexpectedEnd { expected },
            TokenType::Error => ParseError::InvalidCharacter {
                lexeme: token.lexeme.clone(),
                position: token.position,
            },
            _ => ParseError::UnexpectedToken {
                lexeme: token.lexeme.clone(),
                position: token.position,
            },
        }
    }

    /// Parse a complete query; every token up to EOF must be consumed.
    pub fn parse(mut self) -> Result<Query, ParseError> {
        let filter = if self.check(TokenType::SortBy) || self.check(TokenType::Eof) {
            None
        } else {
            Some(self.parse_expression()?)
        };

        let sort = if self.check(TokenType::SortBy) {
            self.parse_sort_clause()?
        } else {
            Vec::new()
        };

        if !self.check(TokenType::Eof) {
            return Err(self.unexpected("end of input"));
        }

        let query = Query { filter, sort };
        tracing::debug!(query = %query, "parsed query");
        Ok(query)
    }

    pub fn parse_expression(&mut self) -> Result<QueryNode, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<QueryNode, ParseError> {
        let mut left = self.parse_and()?;

        while self.check(TokenType::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = QueryNode::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<QueryNode, ParseError> {
        let mut left = self.parse_not()?;

        loop {
            if self.check(TokenType::And) {
                self.advance();
            } else if !self.starts_term() {
                break;
            }
            // Adjacent terms with no operator are joined with AND
            let right = self.parse_not()?;
            left = QueryNode::and(left, right);
        }
        Ok(left)
    }

    fn starts_term(&self) -> bool {
        let token_type = self.peek().token_type;
        token_type.is_value() || matches!(token_type, TokenType::Not | TokenType::LeftParen)
    }

    fn parse_not(&mut self) -> Result<QueryNode, ParseError> {
        if self.check(TokenType::Not) {
            self.advance();
            let child = self.parse_not()?;
            return Ok(QueryNode::not(child));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<QueryNode, ParseError> {
        match self.peek().token_type {
            TokenType::LeftParen => {
                let open = self.advance();
                let expr = self.parse_expression()?;
                match self.peek().token_type {
                    TokenType::RightParen => {
                        self.advance();
                        Ok(expr)
                    }
                    TokenType::Eof | TokenType::SortBy => Err(ParseError::UnterminatedGroup {
                        position: open.position,
                    }),
                    _ => Err(self.unexpected("')'")),
                }
            }
            TokenType::Identifier if self.peek_next().is(TokenType::Colon) => {
                self.parse_field_term()
            }
            token_type if token_type.is_value() => {
                let term = self.advance();
                Ok(QueryNode::contains(None, term.text()))
            }
            _ => Err(self.unexpected("a search term or field:value")),
        }
    }

    fn resolve_field(token: &Token) -> Result<QueryField, ParseError> {
        QueryField::from_name(&token.lexeme).ok_or_else(|| ParseError::UnknownField {
            name: token.lexeme.clone(),
            position: token.position,
            suggestions: QueryField::suggestions(&token.lexeme, MAX_SUGGESTIONS),
        })
    }

    /// Parse `field:value`, `field:a,b,c` or `field:min..max`.
    fn parse_field_term(&mut self) -> Result<QueryNode, ParseError> {
        let name = self.advance();
        let field = Self::resolve_field(&name)?;
        self.advance(); // Consume ':'

        let first = self.parse_value(field, &name)?;

        if self.check(TokenType::DotDot) {
            let dots = self.advance();
            if !field.field_type().is_orderable() {
                return Err(ParseError::InvalidRange {
                    field,
                    position: dots.position,
                });
            }
            let max = self.parse_value(field, &name)?;
            return Ok(QueryNode::Range {
                field,
                min: first,
                max,
            });
        }

        if self.check(TokenType::Comma) {
            let mut values = vec![first];
            while self.check(TokenType::Comma) {
                self.advance();
                values.push(self.parse_value(field, &name)?);
            }
            return Ok(QueryNode::In { field, values });
        }

        Ok(match (field.field_type(), first) {
            (FieldType::StringList, value) => QueryNode::Has { field, value },
            (_, QueryValue::String(text)) if field.is_free_text() => {
                QueryNode::contains(Some(field), text)
            }
            (_, value) => QueryNode::Equals { field, value },
        })
    }

    /// Parse one value token and coerce it to `field`'s type.
    fn parse_value(&mut self, field: QueryField, name: &Token) -> Result<QueryValue, ParseError> {
        if !self.peek().token_type.is_value() {
            return Err(ParseError::MissingValue {
                field: name.lexeme.clone(),
                position: self.peek().position,
            });
        }

        let token = self.advance();
        let raw = match (&token.token_type, &token.literal) {
            // Text fields keep the digits as written, leading zeros included
            (TokenType::Number, _) if field.field_type().is_text() => {
                QueryValue::String(token.lexeme.clone())
            }
            (TokenType::Number, Some(Literal::Integer(n))) => QueryValue::Int(*n),
            (TokenType::String, _) => literal_value(field, token.text(), true),
            _ => literal_value(field, &token.lexeme, false),
        };

        raw.coerce_to_field_type(field)
            .map_err(|e| ParseError::InvalidValue {
                field,
                message: e.message,
                position: token.position,
            })
    }

    /// Parse `sort by: field [asc|desc], ...`.
    fn parse_sort_clause(&mut self) -> Result<Vec<SortDirective>, ParseError> {
        self.advance(); // Consume 'sort by'
        if !self.check(TokenType::Colon) {
            return Err(self.unexpected("':' after 'sort by'"));
        }
        self.advance();

        let mut directives = Vec::new();
        loop {
            if !self.check(TokenType::Identifier) {
                return Err(self.unexpected("a field name to sort by"));
            }
            let name = self.advance();
            let field = Self::resolve_field(&name)?;

            let direction = match self.peek().token_type {
                TokenType::Asc => {
                    self.advance();
                    SortDirection::Asc
                }
                TokenType::Desc => {
                    self.advance();
                    SortDirection::Desc
                }
                _ => SortDirection::Asc,
            };
            directives.push(SortDirective::new(field, direction));

            if !self.check(TokenType::Comma) {
                break;
            }
            self.advance();
        }
        Ok(directives)
    }
}

/// Interprets value text in the context of `field`, before coercion.
fn literal_value(field: QueryField, text: &str, quoted: bool) -> QueryValue {
    let field_type = field.field_type();

    if !quoted {
        match text.to_lowercase().as_str() {
            "null" | "none" => return QueryValue::Null,
            "unassigned" if field_type == FieldType::NullableString => return QueryValue::Null,
            _ => {}
        }
    }

    if field_type.is_timestamp() {
        if let Some(date) = RelativeDate::from_name(text) {
            return QueryValue::RelativeDate(date);
        }
        if let Some(ts) = Timestamp::parse(text) {
            return QueryValue::Timestamp(ts);
        }
    }

    QueryValue::String(text.to_string())
}

/// Builds a [`Query`] from a token stream.
pub fn parse_tokens(tokens: Vec<Token>) -> Result<Query, ParseError> {
    Parser::new(tokens).parse()
}

/// Tokenizes and parses query text.
///
/// # Examples
///
/// ```
/// use issue_query::{QueryField, QueryNode, QueryValue, parse};
///
/// let query = parse("priority:1").unwrap();
/// assert_eq!(
///     query.filter,
///     Some(QueryNode::Equals { field: QueryField::Priority, value: QueryValue::Int(1) })
/// );
/// assert!(parse("").unwrap().is_empty());
/// ```
pub fn parse(input: &str) -> Result<Query, QueryError> {
    let tokens = tokenize(input)?;
    Ok(parse_tokens(tokens)?)
}
