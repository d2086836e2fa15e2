//! Runtime errors.

use sprig_parser::token::Token;
use sprig_source::{Report, ReportKind, ToReport};
use thiserror::Error;

/// An error raised while evaluating a program. Carries the token closest to the fault for line reporting.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("[Runtime Error] Line {}:{} - {message}", .token.line, .token.column)]
pub struct RuntimeError {
    pub message: String,
    pub token: Token,
}

impl RuntimeError {
    pub fn new(token: &Token, message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            token: token.clone(),
        }
    }

    pub fn undefined_variable(name: &Token) -> Self {
        Self::new(name, format!("Undefined variable '{}'.", name.lexeme))
    }

    pub fn line(&self) -> usize {
        self.token.line
    }
}

impl ToReport for RuntimeError {
    fn to_report(&self) -> Report {
        Report::new(ReportKind::Runtime, self.token.line, &self.message).with_column(self.token.column)
    }
}
