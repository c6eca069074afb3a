use thiserror::Error;

use crate::ast::{Literal, Token, TokenType};

/// Errors raised while splitting query text into tokens.
///
/// Every variant carries the 0-indexed character offset of the offending input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("Unterminated string: missing closing '\"' for quote at position {position}")]
    UnterminatedString { position: usize },

    #[error("Unterminated string: missing closing '}}' for '{{' at position {position}")]
    UnterminatedBrace { position: usize },

    #[error("Expected digits after '-' at position {position}")]
    DanglingSign { position: usize },

    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },
}

impl LexError {
    pub fn position(&self) -> usize {
        match self {
            LexError::UnterminatedString { position }
            | LexError::UnterminatedBrace { position }
            | LexError::DanglingSign { position }
            | LexError::UnexpectedCharacter { position, .. } => *position,
        }
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '-'
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn slice(&self, start: usize) -> String {
        self.input[start..self.position].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if is_identifier_char(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads `"..."`; `\"` and `\\` are unescaped, other backslashes are kept.
    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    self.advance();
                    return Ok(Token::new(TokenType::String, self.slice(start), start)
                        .with_literal(Literal::Text(result)));
                }
                '\\' => {
                    self.advance();
                    match self.current_char() {
                        Some(escaped @ ('"' | '\\')) => result.push(escaped),
                        Some(other) => {
                            result.push('\\');
                            result.push(other);
                        }
                        None => break,
                    }
                    self.advance();
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    /// Reads `{...}` as a single string token.
    fn read_braced(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume '{'

        while let Some(ch) = self.current_char() {
            self.advance();
            if ch == '}' {
                return Ok(Token::new(TokenType::String, self.slice(start), start)
                    .with_literal(Literal::Text(result)));
            }
            result.push(ch);
        }

        Err(LexError::UnterminatedBrace { position: start })
    }

    /// Reads a word starting with a digit or `-`.
    ///
    /// All-digit words (with an optional leading `-`) are numbers; anything
    /// else, such as `2024-01-15`, is an identifier.
    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        if self.current_char() == Some('-') {
            if !self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                return Err(LexError::DanglingSign { position: start });
            }
            self.advance();
        }

        let digits = self.read_identifier();
        let lexeme = self.slice(start);

        if digits.chars().all(|c| c.is_ascii_digit())
            && let Ok(n) = lexeme.parse::<i64>()
        {
            return Ok(Token::new(TokenType::Number, lexeme, start).with_literal(Literal::Integer(n)));
        }
        Ok(Token::new(TokenType::Identifier, lexeme, start))
    }

    /// Reads a word and folds keywords, including the two-word `sort by`.
    fn read_word(&mut self) -> Token {
        let start = self.position;
        let word = self.read_identifier();

        let token_type = match word.to_lowercase().as_str() {
            "and" => TokenType::And,
            "or" => TokenType::Or,
            "not" => TokenType::Not,
            "asc" => TokenType::Asc,
            "desc" => TokenType::Desc,
            "sort" => {
                if self.try_consume_by() {
                    TokenType::SortBy
                } else {
                    TokenType::Identifier
                }
            }
            _ => TokenType::Identifier,
        };

        Token::new(token_type, self.slice(start), start)
    }

    /// Consumes whitespace followed by the word `by`, or nothing at all.
    fn try_consume_by(&mut self) -> bool {
        let saved = self.position;
        self.skip_whitespace();
        if self.position > saved && self.read_identifier().eq_ignore_ascii_case("by") {
            return true;
        }
        self.position = saved;
        false
    }

    /// Returns the next token; unrecognized characters come back as
    /// [`TokenType::Error`] tokens rather than errors.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let start = self.position;

        let single = |lexer: &mut Lexer, token_type: TokenType, ch: char| -> Result<Token, LexError> {
            lexer.advance();
            Ok(Token::new(token_type, ch, start))
        };

        match self.current_char() {
            None => Ok(Token::new(TokenType::Eof, "", start)),
            Some(ch @ ':') => single(self, TokenType::Colon, ch),
            Some(ch @ ',') => single(self, TokenType::Comma, ch),
            Some(ch @ '*') => single(self, TokenType::Star, ch),
            Some(ch @ '(') => single(self, TokenType::LeftParen, ch),
            Some(ch @ ')') => single(self, TokenType::RightParen, ch),
            Some(ch @ '}') => single(self, TokenType::RightBrace, ch),
            Some('.') => {
                if self.peek_char(1) == Some('.') {
                    self.advance();
                    self.advance();
                    Ok(Token::new(TokenType::DotDot, "..", start))
                } else {
                    single(self, TokenType::Error, '.')
                }
            }
            Some('"') => self.read_string(),
            Some('{') => self.read_braced(),
            Some(ch) if ch == '-' || ch.is_ascii_digit() => self.read_number(),
            Some(ch) if is_identifier_char(ch) => Ok(self.read_word()),
            Some(ch) => single(self, TokenType::Error, ch),
        }
    }

    /// Lexes the whole input, ending with a single EOF token.
    ///
    /// The first ERROR token becomes [`LexError::UnexpectedCharacter`].
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            match token.token_type {
                TokenType::Error => {
                    return Err(LexError::UnexpectedCharacter {
                        ch: token.lexeme.chars().next().unwrap_or_default(),
                        position: token.position,
                    });
                }
                TokenType::Eof => {
                    tokens.push(token);
                    break;
                }
                _ => tokens.push(token),
            }
        }
        tracing::trace!(count = tokens.len(), "tokenized query");
        Ok(tokens)
    }
}

/// Splits query text into tokens.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and OR Not asc DESC");
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::And);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Or);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Not);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Asc);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Desc);
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Eof);
}

#[test]
fn test_field_term() {
    let mut lexer = Lexer::new("priority:0..2");
    let token = lexer.next_token().unwrap();
    assert_eq!(token.token_type, TokenType::Identifier);
    assert_eq!(token.lexeme, "priority");
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Colon);
    let token = lexer.next_token().unwrap();
    assert_eq!(token.literal, Some(Literal::Integer(0)));
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::DotDot);
    assert_eq!(lexer.next_token().unwrap().position, 12);
}
