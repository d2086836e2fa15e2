//! Lexer, abstract syntax tree and parser for the Sprig language.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod token;
pub mod visitor;
