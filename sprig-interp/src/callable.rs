//! The call protocol.

use crate::interpreter::{Flow, Interpreter};
use sprig_parser::token::Token;
use sprig_value::{Environment, NativeFn, RuntimeError, ScriptFunction, Value};
use std::io::Write;
use std::rc::Rc;

/// A value that can be applied to arguments.
///
/// The caller checks the argument count against [`Callable::arity`] before invoking [`Callable::call`].
pub trait Callable {
    /// Number of arguments the callable expects.
    fn arity(&self) -> usize;

    /// Invokes the callable. `paren` is the closing parenthesis of the call expression and positions errors raised
    /// by the callee itself.
    fn call<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError>;
}

impl Callable for ScriptFunction {
    fn arity(&self) -> usize {
        ScriptFunction::arity(self)
    }

    /// Runs the body in a fresh child of the closure (not of the caller), which gives lexical scoping.
    fn call<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
        _paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let mut environment = Environment::new_enclosed(Rc::clone(self.closure()));
        for (param, argument) in self.declaration().params.iter().zip(arguments) {
            environment.define(param.lexeme.clone(), argument);
        }

        match interpreter.execute_block(&self.declaration().body, environment.into_ref())? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

impl Callable for NativeFn {
    fn arity(&self) -> usize {
        self.arity
    }

    fn call<W: Write>(
        &self,
        _interpreter: &mut Interpreter<W>,
        paren: &Token,
        arguments: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        (self.func)(&arguments).map_err(|message| RuntimeError::new(paren, message))
    }
}
