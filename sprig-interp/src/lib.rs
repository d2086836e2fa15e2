//! Evaluates parsed programs by walking the syntax tree.

pub mod callable;
pub mod config;
pub mod interpreter;

pub use callable::Callable;
pub use config::Config;
pub use interpreter::{Flow, Interpreter};
