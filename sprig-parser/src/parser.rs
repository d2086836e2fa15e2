//! Recursive descent parser.
//!
//! The parser is split into cursor utilities ([`utils`]), expression parsing ([`expr`]) and statement parsing
//! ([`stmt`]). This module holds the shared state and the top-level loop.

use crate::ast::{Expr, FunctionDecl, LiteralValue, Program, Stmt};
use crate::token::{Literal, Token, TokenType};
use sprig_source::{Report, ReportKind, ToReport};
use std::rc::Rc;
use thiserror::Error;

mod expr;
mod stmt;
mod utils;

/// Maximum number of arguments in a call and parameters in a function declaration.
pub const MAX_ARGUMENTS: usize = 255;

/// Maximum depth of nested statements and expressions. Deeper input is rejected with a parse error.
pub const MAX_NESTING: usize = 64;

/// Represents a syntax error. Carries the token at which the error was detected.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[Parse Error] Line {}:{} - {message}", .token.line, .token.column)]
pub struct ParseError {
    pub message: String,
    pub token: Token,
}

impl ParseError {
    pub fn new(message: impl ToString, token: Token) -> Self {
        Self {
            message: message.to_string(),
            token,
        }
    }
}

impl ToReport for ParseError {
    fn to_report(&self) -> Report {
        Report::new(ReportKind::Parse, self.token.line, &self.message).with_column(self.token.column)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    /// Index of the next token to be consumed.
    current: usize,
    /// Errors recorded so far. Parsing resumes at the next statement boundary after each error.
    errors: Vec<ParseError>,
    /// Number of function bodies enclosing the current position. `0` is top-level code.
    function_depth: usize,
    /// Number of statements and expressions enclosing the current position.
    nesting: usize,
}

impl Parser {
    /// Create a new parser over `tokens`.
    /// An [`TokenType::Eof`] token is appended if `tokens` does not already end with one.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|token| token.ty) != Some(TokenType::Eof) {
            let (line, column) = tokens
                .last()
                .map_or((1, 1), |token| (token.line, token.column + token.lexeme.chars().count()));
            tokens.push(Token::new(TokenType::Eof, "", None, line, column));
        }
        Self {
            tokens,
            current: 0,
            errors: Vec::new(),
            function_depth: 0,
            nesting: 0,
        }
    }

    /// Parses the whole token stream.
    ///
    /// On a syntax error the parser synchronizes to the next statement boundary and keeps going, so a single call
    /// reports every error it can find. A [`Program`] is only returned when there were no errors.
    pub fn parse_program(mut self) -> Result<Program, Vec<ParseError>> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            match self.parse_declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        log::debug!(
            "parsed {} top-level statements with {} errors",
            statements.len(),
            self.errors.len()
        );
        if self.errors.is_empty() {
            Ok(Program { statements })
        } else {
            Err(self.errors)
        }
    }

    /// Parses a single expression followed by end of input.
    /// Mainly useful for tools and tests.
    pub fn parse_expression(mut self) -> Result<Expr, Vec<ParseError>> {
        let expr = match self.parse_expr() {
            Ok(expr) => expr,
            Err(err) => {
                self.errors.push(err);
                return Err(self.errors);
            }
        };
        if !self.is_at_end() {
            let token = self.peek().clone();
            self.errors
                .push(ParseError::new("Expect end of expression.", token));
        }
        if self.errors.is_empty() {
            Ok(expr)
        } else {
            Err(self.errors)
        }
    }

    /// Discards tokens until a likely statement boundary: just after a `;` or before a keyword that starts a
    /// statement.
    fn synchronize(&mut self) {
        self.advance();
        while !self.is_at_end() {
            if self.previous().ty == TokenType::Semicolon || self.peek().ty.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    /// Like [`Parser::synchronize`] but never skips the `}` that closes the enclosing block.
    fn synchronize_in_block(&mut self) {
        while !self.is_at_end() && !self.check(TokenType::RightBrace) {
            self.advance();
            if self.previous().ty == TokenType::Semicolon || self.peek().ty.starts_statement() {
                return;
            }
        }
    }

    /// Runs `parse` one nesting level deeper. Fails once [`MAX_NESTING`] levels are open.
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.nesting >= MAX_NESTING {
            return Err(self.error_at_peek("Too much nesting."));
        }
        self.nesting += 1;
        let result = parse(self);
        self.nesting -= 1;
        result
    }

    /// Records a non-fatal error. Parsing continues as if nothing happened.
    fn report(&mut self, err: ParseError) {
        self.errors.push(err);
    }
}

impl LiteralValue {
    /// Converts a literal token into a [`LiteralValue`].
    fn from_token(token: &Token) -> Option<Self> {
        match (&token.ty, &token.literal) {
            (TokenType::Number, Some(Literal::Number(value))) => Some(LiteralValue::Number(*value)),
            (TokenType::Str, Some(Literal::Str(value))) => Some(LiteralValue::Str(value.clone())),
            (TokenType::True, _) => Some(LiteralValue::Bool(true)),
            (TokenType::False, _) => Some(LiteralValue::Bool(false)),
            (TokenType::Nil, _) => Some(LiteralValue::Nil),
            _ => None,
        }
    }
}

impl FunctionDecl {
    fn into_stmt(self) -> Stmt {
        Stmt::Function(Rc::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::scan;
    use crate::printer::print_program;

    fn parse(source: &str) -> Result<Program, Vec<ParseError>> {
        let (tokens, errors) = scan(source);
        assert!(errors.is_empty());
        Parser::new(tokens).parse_program()
    }

    fn errors(source: &str) -> Vec<String> {
        parse(source)
            .expect_err("expected parse errors")
            .iter()
            .map(|err| err.to_string())
            .collect()
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(parse("").unwrap(), Program::default());
        assert_eq!(Parser::new(Vec::new()).parse_program().unwrap(), Program::default());
    }

    #[test]
    fn test_synchronize_collects_every_error() {
        assert_eq!(
            errors("let = 1;\nprint 2;\nlet y = ;\nprint (3;"),
            vec![
                "[Parse Error] Line 1:5 - Expect variable name.",
                "[Parse Error] Line 3:9 - Expect expression.",
                "[Parse Error] Line 4:9 - Expect ')' after expression.",
            ]
        );
    }

    #[test]
    fn test_synchronize_at_statement_keyword() {
        // no semicolon between the broken expression and the next statement
        assert_eq!(
            errors("1 + ) while (x) print x;\nprint ;"),
            vec![
                "[Parse Error] Line 1:5 - Expect expression.",
                "[Parse Error] Line 2:7 - Expect expression.",
            ]
        );
    }

    #[test]
    fn test_too_much_nesting() {
        let depth = 20_000;
        let source = format!("print {}1{};", "(".repeat(depth), ")".repeat(depth));
        // the statement and the printed expression take two levels, so the 64th `(` is rejected
        assert_eq!(
            errors(&source),
            vec!["[Parse Error] Line 1:70 - Too much nesting."]
        );

        let blocks = format!("{}{}", "{".repeat(depth), "}".repeat(depth));
        assert_eq!(errors(&blocks)[0], "[Parse Error] Line 1:65 - Too much nesting.");

        let functions = "fun f() { ".repeat(depth) + &"}".repeat(depth);
        assert_eq!(errors(&functions)[0], "[Parse Error] Line 1:651 - Too much nesting.");

        let unary = format!("print {}1;", "-".repeat(depth));
        assert!(parse(&unary).is_err());
    }

    #[test]
    fn test_nesting_below_limit() {
        let source = format!("print {}1{};", "(".repeat(60), ")".repeat(60));
        assert!(parse(&source).is_ok());
    }

    #[test]
    fn test_missing_closing_brace() {
        assert_eq!(
            errors("function f() {\n  print 1;\n"),
            vec!["[Parse Error] Line 3:1 - Expect '}' after block."]
        );
    }

    #[test]
    fn test_unsupported_keywords() {
        assert_eq!(
            errors("class Foo {}"),
            vec!["[Parse Error] Line 1:1 - Expect expression."]
        );
    }

    #[test]
    fn test_deterministic() {
        let source = "let a = 1; function f(x) { if (x) return a; else return -x; } print f(a) * 2;";
        assert_eq!(parse(source).unwrap(), parse(source).unwrap());
    }

    #[test]
    fn test_round_trip() {
        let source = r#"
            const greeting = "hi";
            var count;
            function fib(n) {
                if (n < 2) return n;
                return fib(n - 1) + fib(n - 2);
            }
            for (let i = 0; i < 10; i = i + 1) print fib(i);
            for (;;) { }
            while (!(count == nil) and count >= 0 or false) count = count - 1;
            { let shadow = greeting; print shadow % 3; }
            print -(1.5 + 2) * 3 / 4 != 5 <= 6;
        "#;
        let printed = print_program(&parse(source).unwrap());
        let reprinted = print_program(&parse(&printed).unwrap());
        assert_eq!(printed, reprinted);
    }
}
