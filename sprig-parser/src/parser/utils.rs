//! Parse utilities: cursor primitives over the token list.

use super::*;

impl Parser {
    /// Returns the next token without consuming it.
    pub(super) fn peek(&self) -> &Token {
        // `Parser::new` guarantees a trailing EOF token and `advance` never moves past it.
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    /// Returns the most recently consumed token.
    pub(super) fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    pub(super) fn is_at_end(&self) -> bool {
        self.peek().ty == TokenType::Eof
    }

    /// Consumes the next token and returns it. Stays on the EOF token once it is reached.
    pub(super) fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous().clone()
    }

    /// Predicate that tests whether the next token has type `ty`.
    pub(super) fn check(&self, ty: TokenType) -> bool {
        self.peek().ty == ty
    }

    /// Predicate that tests whether the next token has one of the `types` and eats the next token if yes as a side
    /// effect.
    pub(super) fn matches(&mut self, types: &[TokenType]) -> bool {
        if types.iter().any(|ty| self.check(*ty)) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the next token if it has type `ty`. Raises an error with `message` otherwise.
    pub(super) fn consume(&mut self, ty: TokenType, message: &str) -> ParseResult<Token> {
        if self.check(ty) {
            Ok(self.advance())
        } else {
            Err(self.error_at_peek(message))
        }
    }

    /// Creates an error at the next token.
    pub(super) fn error_at_peek(&self, message: &str) -> ParseError {
        ParseError::new(message, self.peek().clone())
    }
}
