//! Scans source text into [`Token`]s.

use crate::token::{Literal, Token, TokenType};
use logos::Logos;
use sprig_source::{LineIndex, Position, Report, ReportKind, ToReport};
use thiserror::Error;

/// Raw lexemes recognized by the automaton.
/// Identifiers and keywords share a single variant; keywords are resolved afterwards with [`TokenType::keyword`].
#[derive(Debug, Logos, Clone, Copy, PartialEq)]
enum RawToken {
    // punctuation
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(";")]
    Semicolon,

    // operators
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token("*")]
    Star,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEqual,
    #[token("=")]
    Equal,
    #[token("==")]
    EqualEquals,
    #[token(">")]
    Greater,
    #[token(">=")]
    GreaterEqual,
    #[token("<")]
    Less,
    #[token("<=")]
    LessEqual,

    // literals
    #[regex(r"[0-9]+")]
    #[regex(r"[0-9]+\.[0-9]+")]
    Number,
    #[regex(r#""[^"]*""#)]
    Str,
    /// A string literal that reaches the end of input without a closing quote.
    #[regex(r#""[^"]*"#)]
    UnterminatedStr,

    // identifiers and keywords
    #[regex("[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Error,
}

impl RawToken {
    /// Returns the [`TokenType`] for punctuation and operators.
    /// Literals, identifiers and errors need the lexeme and return `None`.
    fn punctuation(self) -> Option<TokenType> {
        let ty = match self {
            RawToken::LeftParen => TokenType::LeftParen,
            RawToken::RightParen => TokenType::RightParen,
            RawToken::LeftBrace => TokenType::LeftBrace,
            RawToken::RightBrace => TokenType::RightBrace,
            RawToken::Comma => TokenType::Comma,
            RawToken::Dot => TokenType::Dot,
            RawToken::Semicolon => TokenType::Semicolon,
            RawToken::Minus => TokenType::Minus,
            RawToken::Plus => TokenType::Plus,
            RawToken::Slash => TokenType::Slash,
            RawToken::Star => TokenType::Star,
            RawToken::Percent => TokenType::Percent,
            RawToken::Bang => TokenType::Bang,
            RawToken::BangEqual => TokenType::BangEqual,
            RawToken::Equal => TokenType::Equal,
            RawToken::EqualEquals => TokenType::EqualEqual,
            RawToken::Greater => TokenType::Greater,
            RawToken::GreaterEqual => TokenType::GreaterEqual,
            RawToken::Less => TokenType::Less,
            RawToken::LessEqual => TokenType::LessEqual,
            RawToken::Number
            | RawToken::Str
            | RawToken::UnterminatedStr
            | RawToken::Identifier
            | RawToken::Error => return None,
        };
        Some(ty)
    }
}

/// Represents a lexical error (unrecognized character or unterminated string).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[Lexer Error] Line {line}:{column} - {message}")]
pub struct LexerError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl LexerError {
    fn new(message: impl ToString, position: Position) -> Self {
        Self {
            message: message.to_string(),
            line: position.line,
            column: position.column,
        }
    }
}

impl ToReport for LexerError {
    fn to_report(&self) -> Report {
        Report::new(ReportKind::Lexer, self.line, &self.message).with_column(self.column)
    }
}

/// Scans `source` into a sequence of [`Token`]s terminated by [`TokenType::Eof`].
///
/// Scanning never stops at the first fault: every unrecognized character and unterminated string is
/// recorded as a [`LexerError`] and scanning resumes after it.
///
/// # Example
/// ```
/// use sprig_parser::lexer::scan;
/// use sprig_parser::token::TokenType;
/// let (tokens, errors) = scan("let x = 1;");
/// assert!(errors.is_empty());
/// assert_eq!(tokens.len(), 6);
/// assert_eq!(tokens[0].ty, TokenType::Let);
/// assert_eq!(tokens[5].ty, TokenType::Eof);
/// ```
pub fn scan(source: &str) -> (Vec<Token>, Vec<LexerError>) {
    let index = LineIndex::new(source);
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut errors = Vec::new();

    while let Some(raw) = lexer.next() {
        let lexeme = lexer.slice();
        let position = index.position(lexer.span().start);

        let (ty, literal) = match raw {
            RawToken::Error => {
                errors.push(LexerError::new(
                    format!("Unexpected character '{}'.", lexeme),
                    position,
                ));
                continue;
            }
            RawToken::UnterminatedStr => {
                errors.push(LexerError::new("Unterminated string.", position));
                continue;
            }
            RawToken::Identifier => (
                TokenType::keyword(lexeme).unwrap_or(TokenType::Identifier),
                None,
            ),
            RawToken::Number => (
                TokenType::Number,
                lexeme.parse().ok().map(Literal::Number),
            ),
            RawToken::Str => {
                let contents = lexeme
                    .strip_prefix('"')
                    .and_then(|rest| rest.strip_suffix('"'))
                    .unwrap_or_default();
                (TokenType::Str, Some(Literal::Str(contents.to_string())))
            }
            punctuation => match punctuation.punctuation() {
                Some(ty) => (ty, None),
                None => continue,
            },
        };

        tokens.push(Token::new(
            ty,
            lexeme,
            literal,
            position.line,
            position.column,
        ));
    }

    let end = index.end();
    tokens.push(Token::new(TokenType::Eof, "", None, end.line, end.column));

    log::trace!(
        "scanned {} tokens with {} errors",
        tokens.len(),
        errors.len()
    );
    (tokens, errors)
}
