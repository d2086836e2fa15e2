//! Function objects.

use crate::environment::EnvRef;
use crate::Value;
use sprig_parser::ast::FunctionDecl;
use std::fmt;
use std::rc::Rc;

/// Signature of a host function. An `Err` is reported as a runtime error at the call site.
pub type NativeFnPtr = fn(&[Value]) -> Result<Value, String>;

#[derive(Clone)]
pub struct NativeFn {
    pub ident: &'static str,
    /// Number of arguments that the function accepts.
    pub arity: usize,
    pub func: NativeFnPtr,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<native fn {}>", self.ident)
    }
}

/// A function declared in source code, together with the environment it was declared in.
pub struct ScriptFunction {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
}

impl ScriptFunction {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef) -> Self {
        Self {
            declaration,
            closure,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.lexeme
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    pub fn declaration(&self) -> &FunctionDecl {
        &self.declaration
    }

    /// The environment active where the function was declared.
    pub fn closure(&self) -> &EnvRef {
        &self.closure
    }
}

impl fmt::Debug for ScriptFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}
