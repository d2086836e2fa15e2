pub mod environment;
pub mod error;
pub mod object;

use std::fmt;
use std::rc::Rc;

pub use environment::{EnvRef, Environment};
pub use error::RuntimeError;
pub use object::{NativeFn, NativeFnPtr, ScriptFunction};

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Function(Rc<ScriptFunction>),
    Native(Rc<NativeFn>),
}

impl Value {
    /// Only `nil` and `false` are falsy. Everything else, including `0` and `""`, is truthy.
    ///
    /// # Example
    /// ```
    /// use sprig_value::Value;
    /// assert!(!Value::Nil.is_truthy());
    /// assert!(!Value::Bool(false).is_truthy());
    /// assert!(Value::Number(0.0).is_truthy());
    /// assert!(Value::from("").is_truthy());
    /// ```
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Attempts to cast the `Value` into a `&str` or `None` if wrong type.
    pub fn cast_to_str(&self) -> Option<&str> {
        match self {
            Self::Str(string) => Some(string.as_ref()),
            _ => None,
        }
    }

    pub fn cast_to_number(&self) -> Option<f64> {
        match self {
            Self::Number(val) => Some(*val),
            _ => None,
        }
    }

    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Function(_) | Value::Native(_) => "function",
        }
    }
}

impl PartialEq for Value {
    /// Values of different types are never equal. Functions are equal only to themselves.
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(l), Value::Bool(r)) => l == r,
            (Value::Number(l), Value::Number(r)) => l == r,
            (Value::Str(l), Value::Str(r)) => l == r,
            (Value::Function(l), Value::Function(r)) => Rc::ptr_eq(l, r),
            (Value::Native(l), Value::Native(r)) => Rc::ptr_eq(l, r),
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(val) => write!(f, "{}", val),
            // integral numbers print without a fractional part
            Value::Number(val) => write!(f, "{}", val),
            Value::Str(val) => write!(f, "{}", val),
            Value::Function(function) => write!(f, "<fn {}>", function.name()),
            Value::Native(native) => write!(f, "<native fn {}>", native.ident),
        }
    }
}

/// Functions capture their environment, which may contain the function itself. Printing the closure would never
/// terminate, so `Debug` is the same as `Display`.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(val) => write!(f, "{:?}", val),
            _ => fmt::Display::fmt(self, f),
        }
    }
}

/// Host-provided values installed into the global scope before a program runs.
#[derive(Clone, Default)]
pub struct BuiltinVars {
    pub values: Vec<(String, Value)>,
}

impl BuiltinVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_native_fn(&mut self, ident: &'static str, func: NativeFnPtr, arity: usize) {
        self.values.push((
            ident.to_string(),
            Value::Native(Rc::new(NativeFn { ident, arity, func })),
        ));
    }

    pub fn add_value(&mut self, ident: impl Into<String>, value: Value) {
        self.values.push((ident.into(), value));
    }

    /// Returns `true` if `ident` is one of the builtins.
    pub fn contains(&self, ident: &str) -> bool {
        self.values.iter().any(|(name, _)| name == ident)
    }

    /// Defines every builtin in `env`.
    pub fn install(&self, env: &mut Environment) {
        for (ident, value) in &self.values {
            env.define(ident.clone(), value.clone());
        }
    }
}
