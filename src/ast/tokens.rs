use std::fmt;

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Literals
    /// Bare word: field names, enum values, dates, search terms
    ///
    /// # Examples
    /// ```text
    /// status
    /// in_progress
    /// 2024-01-15
    /// last-week
    /// ```
    Identifier,

    /// Quoted (`"..."`) or brace-delimited (`{...}`) text
    ///
    /// # Examples
    /// ```text
    /// "login page"
    /// {multi word value}
    /// ```
    String,

    /// Integer, optionally negative
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -1
    /// ```
    Number,

    // Punctuation
    /// Separates a field from its value (`:`)
    Colon,
    /// Separates list items (`,`)
    Comma,
    /// Range operator (`..`)
    DotDot,
    /// Reserved (`*`)
    Star,
    LeftParen,
    RightParen,
    /// Reserved: `{` always opens a braced string, so the lexer never emits this
    LeftBrace,
    RightBrace,

    // Keywords (matched case-insensitively)
    And,
    Or,
    Not,
    /// The two-word compound `sort by`
    SortBy,
    Asc,
    Desc,

    /// End of input
    Eof,

    /// Unrecognized character
    Error,
}

impl TokenType {
    /// Whether a token of this type can stand for a value or a bare search term.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            TokenType::Identifier
                | TokenType::String
                | TokenType::Number
                | TokenType::Asc
                | TokenType::Desc
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenType::Identifier => "IDENTIFIER",
            TokenType::String => "STRING",
            TokenType::Number => "NUMBER",
            TokenType::Colon => "COLON",
            TokenType::Comma => "COMMA",
            TokenType::DotDot => "DOT_DOT",
            TokenType::Star => "STAR",
            TokenType::LeftParen => "LEFT_PAREN",
            TokenType::RightParen => "RIGHT_PAREN",
            TokenType::LeftBrace => "LEFT_BRACE",
            TokenType::RightBrace => "RIGHT_BRACE",
            TokenType::And => "AND",
            TokenType::Or => "OR",
            TokenType::Not => "NOT",
            TokenType::SortBy => "SORT_BY",
            TokenType::Asc => "ASC",
            TokenType::Desc => "DESC",
            TokenType::Eof => "EOF",
            TokenType::Error => "ERROR",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Parsed payload of a literal token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Decoded text of a string token (quotes, braces and escapes removed)
    Text(String),
    /// Value of a number token
    Integer(i64),
}

/// A token produced by the lexer.
///
/// `position` is the 0-indexed character offset of the token's first character
/// in the query text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub position: usize,
    pub literal: Option<Literal>,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, position: usize) -> Self {
        Token {
            token_type,
            lexeme: lexeme.into(),
            position,
            literal: None,
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }

    /// The text a value token stands for: decoded text for strings, the lexeme otherwise.
    pub fn text(&self) -> &str {
        match &self.literal {
            Some(Literal::Text(s)) => s,
            _ => &self.lexeme,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {:>4}  {}", self.token_type, self.position, self.lexeme)
    }
}
