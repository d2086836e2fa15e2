//! Definitions for [`Token`] and [`TokenType`].

use std::fmt;

/// The category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // single-character punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,
    Percent,

    // one or two character operators
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // literals
    Identifier,
    Str,
    Number,

    // keywords
    And,
    Class,
    Const,
    Else,
    False,
    For,
    Fun,
    If,
    Let,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    While,

    Eof,
}

/// Reserved words. Matching is case-sensitive and exact.
const KEYWORDS: &[(&str, TokenType)] = &[
    ("and", TokenType::And),
    ("class", TokenType::Class),
    ("const", TokenType::Const),
    ("else", TokenType::Else),
    ("false", TokenType::False),
    ("for", TokenType::For),
    ("fun", TokenType::Fun),
    ("function", TokenType::Fun),
    ("if", TokenType::If),
    ("let", TokenType::Let),
    ("nil", TokenType::Nil),
    ("null", TokenType::Nil),
    ("or", TokenType::Or),
    ("print", TokenType::Print),
    ("return", TokenType::Return),
    ("super", TokenType::Super),
    ("this", TokenType::This),
    ("true", TokenType::True),
    ("var", TokenType::Let),
    ("while", TokenType::While),
];

impl TokenType {
    /// Looks up `ident` in the keyword table.
    /// Returns `None` if `ident` is not a reserved word.
    ///
    /// # Example
    /// ```
    /// use sprig_parser::token::TokenType;
    /// assert_eq!(TokenType::keyword("function"), Some(TokenType::Fun));
    /// assert_eq!(TokenType::keyword("Function"), None);
    /// ```
    pub fn keyword(ident: &str) -> Option<TokenType> {
        KEYWORDS
            .iter()
            .find(|(keyword, _)| *keyword == ident)
            .map(|(_, ty)| *ty)
    }

    /// Returns `true` if a token of this type begins a statement.
    /// Used as a synchronization point after a parse error.
    pub fn starts_statement(self) -> bool {
        matches!(
            self,
            TokenType::Class
                | TokenType::Fun
                | TokenType::Let
                | TokenType::Const
                | TokenType::For
                | TokenType::If
                | TokenType::While
                | TokenType::Print
                | TokenType::Return
        )
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenType::LeftParen => "LEFT_PAREN",
            TokenType::RightParen => "RIGHT_PAREN",
            TokenType::LeftBrace => "LEFT_BRACE",
            TokenType::RightBrace => "RIGHT_BRACE",
            TokenType::Comma => "COMMA",
            TokenType::Dot => "DOT",
            TokenType::Minus => "MINUS",
            TokenType::Plus => "PLUS",
            TokenType::Semicolon => "SEMICOLON",
            TokenType::Slash => "SLASH",
            TokenType::Star => "STAR",
            TokenType::Percent => "PERCENT",
            TokenType::Bang => "BANG",
            TokenType::BangEqual => "BANG_EQUAL",
            TokenType::Equal => "EQUAL",
            TokenType::EqualEqual => "EQUAL_EQUAL",
            TokenType::Greater => "GREATER",
            TokenType::GreaterEqual => "GREATER_EQUAL",
            TokenType::Less => "LESS",
            TokenType::LessEqual => "LESS_EQUAL",
            TokenType::Identifier => "IDENTIFIER",
            TokenType::Str => "STRING",
            TokenType::Number => "NUMBER",
            TokenType::And => "AND",
            TokenType::Class => "CLASS",
            TokenType::Const => "CONST",
            TokenType::Else => "ELSE",
            TokenType::False => "FALSE",
            TokenType::For => "FOR",
            TokenType::Fun => "FUN",
            TokenType::If => "IF",
            TokenType::Let => "LET",
            TokenType::Nil => "NIL",
            TokenType::Or => "OR",
            TokenType::Print => "PRINT",
            TokenType::Return => "RETURN",
            TokenType::Super => "SUPER",
            TokenType::This => "THIS",
            TokenType::True => "TRUE",
            TokenType::While => "WHILE",
            TokenType::Eof => "EOF",
        };
        f.write_str(name)
    }
}

/// The value carried by a literal token.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    /// String contents, without the surrounding quotes.
    Str(String),
}

/// A lexical unit. Never mutated once produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ty: TokenType,
    /// The exact source text this token was scanned from.
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(
        ty: TokenType,
        lexeme: impl Into<String>,
        literal: Option<Literal>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            ty,
            lexeme: lexeme.into(),
            literal,
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            TokenType::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.lexeme),
        }
    }
}
