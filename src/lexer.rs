//! Lexical analysis for Penguin.
//!
//! This module provides tokenization of Penguin source text into a stream of
//! tokens that can be consumed by the parser. The lexer handles identifiers,
//! keyword recognition, numeric and string literals, comments, and the full
//! operator set including compound assignments.
//!
//! # Example
//!
//! ```rust
//! use penguin::lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("x = 42;");
//!
//! assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
//! assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Equal);
//! assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Number);
//! assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Semicolon);
//! assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
//! ```
//!
//! # Failure mode
//!
//! The first lexical error (unknown character or unterminated string) halts
//! the scan: [`Lexer::next_token`] returns the error and [`tokenize`] stops
//! there. Errors carry the offending position.

use crate::ast::Span;
use crate::error::LexError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reserved words of the language.
///
/// Any identifier matching one of these becomes a [`TokenKind::Keyword`]
/// token carrying the word as its lexeme. `print`, `println`, `for` and
/// `ref` are deliberately absent; the parser matches them by lexeme, and
/// they stay usable as ordinary identifiers.
pub const KEYWORDS: &[&str] = &[
    "if", "else", "while", "return", "func", "true", "false", "break", "continue",
];

/// A lexical token produced by the lexer.
///
/// Tokens carry their kind, the original source text (lexeme), and
/// source location information for error reporting.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Token {
    /// The category of this token
    pub kind: TokenKind,

    /// The original source text that produced this token. For string
    /// literals this is the content without the surrounding quotes; for
    /// keywords it is the keyword itself.
    pub lexeme: String,

    /// Source location for error reporting
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            span,
        }
    }

    /// Returns true if this token is the given keyword.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == TokenKind::Keyword && self.lexeme == word
    }
}

impl Default for Token {
    fn default() -> Self {
        Self {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            span: Span::default(),
        }
    }
}

/// The category of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TokenKind {
    // === Literals and names ===
    /// An identifier
    Identifier,
    /// An integer or decimal numeric literal, kept in textual form
    Number,
    /// A double-quoted string literal (lexeme excludes the quotes)
    Str,
    /// A reserved word; the lexeme carries the keyword identity
    Keyword,

    // === Punctuation ===
    /// Left parenthesis `(`
    LeftParen,
    /// Right parenthesis `)`
    RightParen,
    /// Left bracket `[`
    LeftBracket,
    /// Right bracket `]`
    RightBracket,
    /// Left brace `{`
    LeftBrace,
    /// Right brace `}`
    RightBrace,
    /// Comma `,`
    Comma,
    /// Semicolon `;`
    Semicolon,
    /// Colon `:`
    Colon,
    /// Member access `.`
    Dot,

    // === Arithmetic operators ===
    /// Plus `+`
    Plus,
    /// Minus `-`
    Minus,
    /// Star `*`
    Star,
    /// Slash `/`
    Slash,
    /// Percent `%`
    Percent,

    // === Bitwise operators ===
    /// Ampersand `&`
    Amp,
    /// Bar `|`
    Bar,
    /// Caret `^`
    Caret,
    /// Left shift `<<`
    Shl,
    /// Right shift `>>`
    Shr,

    // === Comparison operators ===
    /// Equality `==`
    Eq,
    /// Inequality `!=`
    Ne,
    /// Less than `<`
    Lt,
    /// Less than or equal `<=`
    Le,
    /// Greater than `>`
    Gt,
    /// Greater than or equal `>=`
    Ge,

    // === Logical operators ===
    /// Logical and `&&`
    And,
    /// Logical or `||`
    Or,
    /// Logical not `!`
    Bang,

    // === Assignment operators ===
    /// Plain assignment `=`
    Equal,
    /// `+=`
    PlusEquals,
    /// `-=`
    MinusEquals,
    /// `*=`
    StarEquals,
    /// `/=`
    SlashEquals,
    /// `%=`
    PercentEquals,
    /// `&=`
    AmpEquals,
    /// `|=`
    BarEquals,
    /// `^=`
    CaretEquals,

    // === Special ===
    /// End of input sentinel
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Number => "number",
            TokenKind::Str => "string",
            TokenKind::Keyword => "keyword",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Semicolon => "';'",
            TokenKind::Colon => "':'",
            TokenKind::Dot => "'.'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Amp => "'&'",
            TokenKind::Bar => "'|'",
            TokenKind::Caret => "'^'",
            TokenKind::Shl => "'<<'",
            TokenKind::Shr => "'>>'",
            TokenKind::Eq => "'=='",
            TokenKind::Ne => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Equal => "'='",
            TokenKind::PlusEquals => "'+='",
            TokenKind::MinusEquals => "'-='",
            TokenKind::StarEquals => "'*='",
            TokenKind::SlashEquals => "'/='",
            TokenKind::PercentEquals => "'%='",
            TokenKind::AmpEquals => "'&='",
            TokenKind::BarEquals => "'|='",
            TokenKind::CaretEquals => "'^='",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", s)
    }
}

/// Tokenizes an entire source string.
///
/// This is the primary lexing entry point: it consumes the whole source and
/// yields a token list terminated by a single [`TokenKind::Eof`] token, or
/// the first lexical error encountered.
///
/// # Example
///
/// ```rust
/// use penguin::lexer::{tokenize, TokenKind};
///
/// let tokens = tokenize("a += 1;").unwrap();
/// assert_eq!(tokens[1].kind, TokenKind::PlusEquals);
/// assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }

    Ok(tokens)
}

/// A single-pass scanner over Penguin source text.
///
/// The source is treated as ASCII; multi-character operators are resolved
/// with maximal munch.
pub struct Lexer<'a> {
    /// Remaining source to process
    remaining: &'a str,

    /// Current byte position in source
    position: usize,

    /// Current line number (1-indexed)
    line: usize,

    /// Current column number (1-indexed)
    column: usize,

    /// Set once the iterator has delivered `Eof` or an error
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer positioned at the start of the source.
    pub fn new(source: &'a str) -> Self {
        Lexer {
            remaining: source,
            position: 0,
            line: 1,
            column: 1,
            finished: false,
        }
    }

    /// Produces the next token from the source.
    ///
    /// Returns `TokenKind::Eof` when the source is exhausted, and keeps
    /// returning it on further calls. The first unknown character or
    /// unterminated string yields an error instead of a token.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        if self.remaining.is_empty() {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                Span::new(self.position, self.position, self.line, self.column),
            ));
        }

        if let Some(token) = self.try_string()? {
            return Ok(token);
        }

        if let Some(token) = self.try_number() {
            return Ok(token);
        }

        if let Some(token) = self.try_keyword_or_identifier() {
            return Ok(token);
        }

        if let Some(token) = self.try_operator() {
            return Ok(token);
        }

        // Unknown character - halt with a diagnostic
        let ch = self.remaining.chars().next().unwrap();
        let span = Span::new(
            self.position,
            self.position + ch.len_utf8(),
            self.line,
            self.column,
        );
        Err(LexError::UnexpectedChar { ch, span })
    }

    /// Skips whitespace and `//` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            let before = self.remaining.len();
            self.skip_whitespace();

            if self.remaining.starts_with("//") {
                self.skip_line_comment();
            }

            if self.remaining.len() == before {
                break;
            }
        }
    }

    /// Skips space, tab, CR and LF.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.remaining.chars().next() {
            if matches!(ch, ' ' | '\t' | '\r' | '\n') {
                self.advance(1);
            } else {
                break;
            }
        }
    }

    /// Skips a line comment up to (and including) the next newline.
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.remaining.chars().next() {
            self.advance(ch.len_utf8());
            if ch == '\n' {
                break;
            }
        }
    }

    /// Tries to lex a string literal.
    ///
    /// No escape processing is applied; the content between the quotes is
    /// taken verbatim. Interpolation markers inside the content are left for
    /// the print statements to resolve.
    fn try_string(&mut self) -> Result<Option<Token>, LexError> {
        if !self.remaining.starts_with('"') {
            return Ok(None);
        }

        let start_pos = self.position;
        let start_line = self.line;
        let start_col = self.column;

        self.advance(1); // opening quote

        let mut content = String::new();
        while let Some(ch) = self.remaining.chars().next() {
            if ch == '"' {
                self.advance(1); // closing quote
                return Ok(Some(Token::new(
                    TokenKind::Str,
                    content,
                    Span::new(start_pos, self.position, start_line, start_col),
                )));
            }
            content.push(ch);
            self.advance(ch.len_utf8());
        }

        Err(LexError::UnterminatedString {
            span: Span::new(start_pos, self.position, start_line, start_col),
        })
    }

    /// Tries to lex a numeric literal.
    ///
    /// One or more digits, optionally containing exactly one `.` - the dot
    /// joins the number only when the next byte is a digit, otherwise it is
    /// left for the operator scanner to yield as `Dot`.
    fn try_number(&mut self) -> Option<Token> {
        let first = self.remaining.chars().next()?;
        if !first.is_ascii_digit() {
            return None;
        }

        let start_pos = self.position;
        let start_line = self.line;
        let start_col = self.column;

        let mut lexeme = String::new();
        let mut seen_dot = false;

        while let Some(ch) = self.remaining.chars().next() {
            if ch.is_ascii_digit() {
                lexeme.push(ch);
                self.advance(1);
            } else if ch == '.' && !seen_dot && self.peek_byte(1).is_some_and(|b| b.is_ascii_digit())
            {
                seen_dot = true;
                lexeme.push('.');
                self.advance(1);
            } else {
                break;
            }
        }

        Some(Token::new(
            TokenKind::Number,
            lexeme,
            Span::new(start_pos, self.position, start_line, start_col),
        ))
    }

    /// Tries to lex a keyword or identifier.
    fn try_keyword_or_identifier(&mut self) -> Option<Token> {
        let first = self.remaining.chars().next()?;
        if !first.is_ascii_alphabetic() && first != '_' {
            return None;
        }

        let start_pos = self.position;
        let start_line = self.line;
        let start_col = self.column;

        let mut lexeme = String::new();
        while let Some(ch) = self.remaining.chars().next() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                lexeme.push(ch);
                self.advance(1);
            } else {
                break;
            }
        }

        let kind = if KEYWORDS.contains(&lexeme.as_str()) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };

        Some(Token::new(
            kind,
            lexeme,
            Span::new(start_pos, self.position, start_line, start_col),
        ))
    }

    /// Tries to lex an operator or punctuation token.
    ///
    /// Two-character forms are checked before their one-character prefixes
    /// (maximal munch).
    fn try_operator(&mut self) -> Option<Token> {
        let start_pos = self.position;
        let start_line = self.line;
        let start_col = self.column;

        let (kind, len) = if self.remaining.starts_with("==") {
            (TokenKind::Eq, 2)
        } else if self.remaining.starts_with("!=") {
            (TokenKind::Ne, 2)
        } else if self.remaining.starts_with("<=") {
            (TokenKind::Le, 2)
        } else if self.remaining.starts_with("<<") {
            (TokenKind::Shl, 2)
        } else if self.remaining.starts_with(">=") {
            (TokenKind::Ge, 2)
        } else if self.remaining.starts_with(">>") {
            (TokenKind::Shr, 2)
        } else if self.remaining.starts_with("&&") {
            (TokenKind::And, 2)
        } else if self.remaining.starts_with("||") {
            (TokenKind::Or, 2)
        } else if self.remaining.starts_with("+=") {
            (TokenKind::PlusEquals, 2)
        } else if self.remaining.starts_with("-=") {
            (TokenKind::MinusEquals, 2)
        } else if self.remaining.starts_with("*=") {
            (TokenKind::StarEquals, 2)
        } else if self.remaining.starts_with("/=") {
            (TokenKind::SlashEquals, 2)
        } else if self.remaining.starts_with("%=") {
            (TokenKind::PercentEquals, 2)
        } else if self.remaining.starts_with("&=") {
            (TokenKind::AmpEquals, 2)
        } else if self.remaining.starts_with("|=") {
            (TokenKind::BarEquals, 2)
        } else if self.remaining.starts_with("^=") {
            (TokenKind::CaretEquals, 2)
        } else if self.remaining.starts_with('=') {
            (TokenKind::Equal, 1)
        } else if self.remaining.starts_with('!') {
            (TokenKind::Bang, 1)
        } else if self.remaining.starts_with('<') {
            (TokenKind::Lt, 1)
        } else if self.remaining.starts_with('>') {
            (TokenKind::Gt, 1)
        } else if self.remaining.starts_with('&') {
            (TokenKind::Amp, 1)
        } else if self.remaining.starts_with('|') {
            (TokenKind::Bar, 1)
        } else if self.remaining.starts_with('^') {
            (TokenKind::Caret, 1)
        } else if self.remaining.starts_with('+') {
            (TokenKind::Plus, 1)
        } else if self.remaining.starts_with('-') {
            (TokenKind::Minus, 1)
        } else if self.remaining.starts_with('*') {
            (TokenKind::Star, 1)
        } else if self.remaining.starts_with('/') {
            (TokenKind::Slash, 1)
        } else if self.remaining.starts_with('%') {
            (TokenKind::Percent, 1)
        } else if self.remaining.starts_with('(') {
            (TokenKind::LeftParen, 1)
        } else if self.remaining.starts_with(')') {
            (TokenKind::RightParen, 1)
        } else if self.remaining.starts_with('[') {
            (TokenKind::LeftBracket, 1)
        } else if self.remaining.starts_with(']') {
            (TokenKind::RightBracket, 1)
        } else if self.remaining.starts_with('{') {
            (TokenKind::LeftBrace, 1)
        } else if self.remaining.starts_with('}') {
            (TokenKind::RightBrace, 1)
        } else if self.remaining.starts_with(';') {
            (TokenKind::Semicolon, 1)
        } else if self.remaining.starts_with(',') {
            (TokenKind::Comma, 1)
        } else if self.remaining.starts_with(':') {
            (TokenKind::Colon, 1)
        } else if self.remaining.starts_with('.') {
            (TokenKind::Dot, 1)
        } else {
            return None;
        };

        let lexeme = self.remaining[..len].to_string();
        self.advance(len);

        Some(Token::new(
            kind,
            lexeme,
            Span::new(start_pos, self.position, start_line, start_col),
        ))
    }

    /// Peeks the byte `offset` positions ahead of the current one.
    fn peek_byte(&self, offset: usize) -> Option<u8> {
        self.remaining.as_bytes().get(offset).copied()
    }

    /// Advances the position by the given number of bytes, tracking
    /// line/column.
    fn advance(&mut self, bytes: usize) {
        let consumed = &self.remaining[..bytes];
        for ch in consumed.chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.position += bytes;
        self.remaining = &self.remaining[bytes..];
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    /// Yields tokens up to and including `Eof`, or stops after the first
    /// error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) => {
                if token.kind == TokenKind::Eof {
                    self.finished = true;
                }
                Some(Ok(token))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_empty_source_yields_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_keywords_carry_lexeme() {
        let tokens = tokenize("if else while return").unwrap();
        assert!(tokens[0].is_keyword("if"));
        assert!(tokens[1].is_keyword("else"));
        assert!(tokens[2].is_keyword("while"));
        assert!(tokens[3].is_keyword("return"));
    }

    #[test]
    fn test_print_println_for_ref_are_not_keywords() {
        let tokens = tokenize("print println for ref").unwrap();
        for token in &tokens[..4] {
            assert_eq!(
                token.kind,
                TokenKind::Identifier,
                "'{}' should not be reserved",
                token.lexeme
            );
        }
    }

    #[test]
    fn test_number_with_trailing_dot_yields_dot_token() {
        let tokens = tokenize("123.push").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "123");
        assert_eq!(tokens[1].kind, TokenKind::Dot);
        assert_eq!(tokens[2].lexeme, "push");
    }

    #[test]
    fn test_decimal_number() {
        let tokens = tokenize("3.14").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "3.14");
    }

    #[test]
    fn test_maximal_munch_shifts_and_compounds() {
        assert_eq!(
            kinds("<< <= < >> >= > == = != !"),
            vec![
                TokenKind::Shl,
                TokenKind::Le,
                TokenKind::Lt,
                TokenKind::Shr,
                TokenKind::Ge,
                TokenKind::Gt,
                TokenKind::Eq,
                TokenKind::Equal,
                TokenKind::Ne,
                TokenKind::Bang,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_compound_assignment_operators() {
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
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_line_comment_skipped() {
        assert_eq!(
            kinds("a // comment + * /\nb"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_string_literal_content() {
        let tokens = tokenize(r#""hello {name}""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str);
        assert_eq!(tokens[0].lexeme, "hello {name}");
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize(r#""oops"#).unwrap_err();
        assert!(matches!(err, LexError::UnterminatedString { .. }));
    }

    #[test]
    fn test_unknown_character_is_error() {
        let err = tokenize("a @ b").unwrap_err();
        match err {
            LexError::UnexpectedChar { ch, span } => {
                assert_eq!(ch, '@');
                assert_eq!(span.column, 3);
            }
            other => panic!("expected UnexpectedChar, got {:?}", other),
        }
    }

    #[test]
    fn test_span_tracking_across_lines() {
        let tokens = tokenize("a\n  b").unwrap();
        assert_eq!(tokens[0].span.line, 1);
        assert_eq!(tokens[1].span.line, 2);
        assert_eq!(tokens[1].span.column, 3);
    }

    #[test]
    fn test_iterator_fuses_after_eof() {
        let tokens: Vec<_> = Lexer::new("x").collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[1].as_ref().unwrap().kind, TokenKind::Eof);
    }
}
