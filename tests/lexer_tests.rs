//! Lexer tests for Penguin.
//!
//! These tests verify correct tokenization of every language construct:
//! keywords, identifiers, literals, comments, and the operator set with
//! maximal munch.

use penguin::lexer::{tokenize, Lexer, TokenKind};
use penguin::LexError;

/// Helper to collect all tokens from input as (kind, lexeme) pairs.
fn lex(input: &str) -> Vec<(TokenKind, String)> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|t| (t.kind, t.lexeme))
        .collect()
}

/// Helper to get just token kinds (without the trailing Eof).
fn kinds(input: &str) -> Vec<TokenKind> {
    let mut all: Vec<_> = tokenize(input).unwrap().into_iter().map(|t| t.kind).collect();
    assert_eq!(all.pop(), Some(TokenKind::Eof));
    all
}

// ============================================
// 1. Keywords and identifiers
// ============================================

#[test]
fn test_all_reserved_words() {
    let tokens = lex("if else while return func true false break continue");
    for (kind, lexeme) in &tokens[..tokens.len() - 1] {
        assert_eq!(*kind, TokenKind::Keyword, "'{}' should be reserved", lexeme);
    }
}

#[test]
fn test_keyword_identity_in_lexeme() {
    let tokens = tokenize("while").unwrap();
    assert!(tokens[0].is_keyword("while"));
    assert!(!tokens[0].is_keyword("if"));
}

#[test]
fn test_print_println_for_ref_are_identifiers() {
    // matched by lexeme in the parser, not reserved by the lexer
    assert_eq!(
        kinds("print println for ref"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_identifier_shapes() {
    let tokens = lex("_x abc1 snake_case ifx");
    assert_eq!(tokens[0], (TokenKind::Identifier, "_x".to_string()));
    assert_eq!(tokens[1], (TokenKind::Identifier, "abc1".to_string()));
    assert_eq!(tokens[2], (TokenKind::Identifier, "snake_case".to_string()));
    // a keyword prefix does not make an identifier a keyword
    assert_eq!(tokens[3], (TokenKind::Identifier, "ifx".to_string()));
}

// ============================================
// 2. Numbers
// ============================================

#[test]
fn test_integer_literal_keeps_text() {
    let tokens = lex("0 007 123456789");
    assert_eq!(tokens[0].1, "0");
    assert_eq!(tokens[1].1, "007");
    assert_eq!(tokens[2].1, "123456789");
}

#[test]
fn test_decimal_literal_single_dot() {
    let tokens = lex("1.5 0.25");
    assert_eq!(tokens[0], (TokenKind::Number, "1.5".to_string()));
    assert_eq!(tokens[1], (TokenKind::Number, "0.25".to_string()));
}

#[test]
fn test_dot_not_followed_by_digit_is_dot_token() {
    assert_eq!(
        kinds("1.x"),
        vec![TokenKind::Number, TokenKind::Dot, TokenKind::Identifier]
    );
}

#[test]
fn test_second_dot_ends_the_number() {
    assert_eq!(
        kinds("1.2.3"),
        vec![TokenKind::Number, TokenKind::Dot, TokenKind::Number]
    );
}

// ============================================
// 3. Strings
// ============================================

#[test]
fn test_string_excludes_quotes() {
    let tokens = lex(r#""hello world""#);
    assert_eq!(tokens[0], (TokenKind::Str, "hello world".to_string()));
}

#[test]
fn test_string_no_escape_processing() {
    let tokens = lex(r#""a\nb""#);
    assert_eq!(tokens[0].1, r"a\nb");
}

#[test]
fn test_string_keeps_interpolation_markers() {
    let tokens = lex(r#""x = {x}""#);
    assert_eq!(tokens[0].1, "x = {x}");
}

#[test]
fn test_empty_string() {
    let tokens = lex(r#""""#);
    assert_eq!(tokens[0], (TokenKind::Str, String::new()));
}

#[test]
fn test_unterminated_string_halts() {
    let err = tokenize("\"abc").unwrap_err();
    assert!(matches!(err, LexError::UnterminatedString { .. }));
}

// ============================================
// 4. Operators and maximal munch
// ============================================

#[test]
fn test_single_character_operators() {
    assert_eq!(
        kinds("+ - * / % & | ^ < > = !"),
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Amp,
            TokenKind::Bar,
            TokenKind::Caret,
            TokenKind::Lt,
            TokenKind::Gt,
            TokenKind::Equal,
            TokenKind::Bang,
        ]
    );
}

#[test]
fn test_two_character_operators() {
    assert_eq!(
        kinds("== != <= >= << >> && ||"),
        vec![
            TokenKind::Eq,
            TokenKind::Ne,
            TokenKind::Le,
            TokenKind::Ge,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::And,
            TokenKind::Or,
        ]
    );
}

#[test]
fn test_compound_assignments() {
    assert_eq!(
        kinds("+= -= *= /= %= &= |= ^="),
        vec![
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::StarEquals,
            TokenKind::SlashEquals,
            TokenKind::PercentEquals,
            TokenKind::AmpEquals,
            TokenKind::BarEquals,
            TokenKind::CaretEquals,
        ]
    );
}

#[test]
fn test_adjacent_operators_munch_greedily() {
    // <<= is << then =, not a shift-assign
    assert_eq!(kinds("<<="), vec![TokenKind::Shl, TokenKind::Equal]);
    // === is == then =
    assert_eq!(kinds("==="), vec![TokenKind::Eq, TokenKind::Equal]);
    // &&& is && then &
    assert_eq!(kinds("&&&"), vec![TokenKind::And, TokenKind::Amp]);
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("( ) [ ] { } ; , : ."),
        vec![
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Dot,
        ]
    );
}

// ============================================
// 5. Whitespace, comments, errors
// ============================================

#[test]
fn test_whitespace_variants_skipped() {
    assert_eq!(
        kinds("a\tb\r\nc d"),
        vec![
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_comment_runs_to_end_of_line() {
    assert_eq!(
        kinds("x // all of this \"ignored\" == junk\ny"),
        vec![TokenKind::Identifier, TokenKind::Identifier]
    );
}

#[test]
fn test_comment_at_end_of_input() {
    assert_eq!(kinds("x // trailing"), vec![TokenKind::Identifier]);
}

#[test]
fn test_slash_alone_is_division() {
    assert_eq!(
        kinds("a / b"),
        vec![
            TokenKind::Identifier,
            TokenKind::Slash,
            TokenKind::Identifier,
        ]
    );
}

#[test]
fn test_unknown_character_reports_position() {
    let err = tokenize("x = $;").unwrap_err();
    match err {
        LexError::UnexpectedChar { ch, span } => {
            assert_eq!(ch, '$');
            assert_eq!(span.line, 1);
            assert_eq!(span.column, 5);
        }
        other => panic!("expected UnexpectedChar, got {:?}", other),
    }
}

#[test]
fn test_stream_always_ends_with_eof() {
    let tokens = tokenize("").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn test_iterator_interface_matches_tokenize() {
    let from_iter: Vec<_> = Lexer::new("a + 1")
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    let from_fn = tokenize("a + 1").unwrap();
    assert_eq!(from_iter, from_fn);
}

// ============================================
// 6. Whole-program smoke
// ============================================

#[test]
fn test_small_program_token_stream() {
    let source = r#"
{
  func main() {
    // say hello
    msg = "hi";
    println(msg);
  }
}
"#;
    let tokens = lex(source);
    let words: Vec<_> = tokens.iter().map(|(_, l)| l.as_str()).collect();
    assert_eq!(
        words,
        vec![
            "{", "func", "main", "(", ")", "{", "msg", "=", "hi", ";", "println", "(", "msg",
            ")", ";", "}", "}", "",
        ]
    );
}
