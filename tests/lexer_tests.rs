// tests/lexer_tests.rs

use issue_query::ast::{Literal, TokenType};
use issue_query::lexer::{LexError, Lexer, tokenize};

fn types(input: &str) -> Vec<TokenType> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| t.token_type)
        .collect()
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        (":", TokenType::Colon),
        (",", TokenType::Comma),
        ("*", TokenType::Star),
        ("(", TokenType::LeftParen),
        (")", TokenType::RightParen),
        ("}", TokenType::RightBrace),
        ("..", TokenType::DotDot),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token.token_type, expected, "Failed for input: {}", input);
        assert_eq!(token.position, 0);
        assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Eof);
    }
}

#[test]
fn test_lone_dot_is_error_token() {
    let mut lexer = Lexer::new(".");
    assert_eq!(lexer.next_token().unwrap().token_type, TokenType::Error);
}

// ============================================================================
// Words and keywords
// ============================================================================

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(
        types("AND and Or NOT not"),
        vec![
            TokenType::And,
            TokenType::And,
            TokenType::Or,
            TokenType::Not,
            TokenType::Not,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_sort_by_is_one_token() {
    let tokens = tokenize("status:open SORT   By: priority").unwrap();
    let sort = &tokens[3];
    assert_eq!(sort.token_type, TokenType::SortBy);
    assert_eq!(sort.position, 12);
    assert_eq!(tokens[4].token_type, TokenType::Colon);
}

#[test]
fn test_sort_alone_is_identifier() {
    assert_eq!(types("sort"), vec![TokenType::Identifier, TokenType::Eof]);
    assert_eq!(
        types("sort bypass"),
        vec![TokenType::Identifier, TokenType::Identifier, TokenType::Eof]
    );
}

#[test]
fn test_identifiers_allow_dash_and_underscore() {
    let tokens = tokenize("in_progress last-week").unwrap();
    assert_eq!(tokens[0].lexeme, "in_progress");
    assert_eq!(tokens[1].lexeme, "last-week");
    assert_eq!(tokens[1].position, 12);
}

// ============================================================================
// Numbers and dates
// ============================================================================

#[test]
fn test_numbers() {
    let tokens = tokenize("42 -7").unwrap();
    assert_eq!(tokens[0].token_type, TokenType::Number);
    assert_eq!(tokens[0].literal, Some(Literal::Integer(42)));
    assert_eq!(tokens[1].literal, Some(Literal::Integer(-7)));
}

#[test]
fn test_dates_are_identifiers() {
    let tokens = tokenize("2024-01-15").unwrap();
    assert_eq!(tokens[0].token_type, TokenType::Identifier);
    assert_eq!(tokens[0].lexeme, "2024-01-15");
}

#[test]
fn test_range_splits_numbers() {
    assert_eq!(
        types("0..2"),
        vec![
            TokenType::Number,
            TokenType::DotDot,
            TokenType::Number,
            TokenType::Eof,
        ]
    );
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_quoted_string() {
    let tokens = tokenize(r#"title:"login \"bug\"""#).unwrap();
    let string = &tokens[2];
    assert_eq!(string.token_type, TokenType::String);
    assert_eq!(string.position, 6);
    assert_eq!(string.literal, Some(Literal::Text(r#"login "bug""#.to_string())));
    assert_eq!(string.text(), r#"login "bug""#);
}

#[test]
fn test_braced_string() {
    let tokens = tokenize("{two words} x").unwrap();
    assert_eq!(tokens[0].token_type, TokenType::String);
    assert_eq!(tokens[0].lexeme, "{two words}");
    assert_eq!(tokens[0].text(), "two words");
    assert_eq!(tokens[1].position, 12);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    let err = tokenize("title:\"oops").unwrap_err();
    assert_eq!(err, LexError::UnterminatedString { position: 6 });
    assert_eq!(err.position(), 6);
}

#[test]
fn test_unterminated_brace() {
    assert_eq!(
        tokenize("a {open").unwrap_err(),
        LexError::UnterminatedBrace { position: 2 }
    );
}

#[test]
fn test_dangling_minus() {
    assert_eq!(
        tokenize("priority:-").unwrap_err(),
        LexError::DanglingSign { position: 9 }
    );
}

#[test]
fn test_unexpected_character() {
    let err = tokenize("status:open & x").unwrap_err();
    assert_eq!(err, LexError::UnexpectedCharacter { ch: '&', position: 12 });
    assert_eq!(err.to_string(), "Unexpected character '&' at position 12");
}

#[test]
fn test_empty_input() {
    assert_eq!(types("   "), vec![TokenType::Eof]);
}
