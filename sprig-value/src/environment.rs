//! Scope frames.

use crate::{RuntimeError, Value};
use sprig_parser::token::Token;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to an [`Environment`]. Closures and child scopes keep their enclosing frame alive through it.
pub type EnvRef = Rc<RefCell<Environment>>;

#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    is_const: bool,
}

/// A scope frame mapping names to values, chained to an enclosing frame.
///
/// Lookup and assignment walk outward through the chain; definition always happens in this frame.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Binding>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    /// Create a root (global) environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an environment nested inside `enclosing`.
    pub fn new_enclosed(enclosing: EnvRef) -> Self {
        Self {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Wraps `self` into a shareable [`EnvRef`].
    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Creates or overwrites a binding in this frame.
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(
            name.into(),
            Binding {
                value,
                is_const: false,
            },
        );
    }

    /// Creates or overwrites a binding in this frame that can not be assigned to afterwards.
    pub fn define_const(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(
            name.into(),
            Binding {
                value,
                is_const: true,
            },
        );
    }

    /// Returns `true` if `name` is bound in this frame, ignoring enclosing frames.
    pub fn is_defined_locally(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Looks up `name` through the chain. Fails if no frame defines it.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        self.get_by_name(&name.lexeme)
            .ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    /// Looks up `name` through the chain without a source token. Returns `None` if no frame defines it.
    pub fn get_by_name(&self, name: &str) -> Option<Value> {
        match self.values.get(name) {
            Some(binding) => Some(binding.value.clone()),
            None => self.enclosing.as_ref()?.borrow().get_by_name(name),
        }
    }

    /// Mutates the nearest binding of `name`. Never creates a new binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(binding) = self.values.get_mut(&name.lexeme) {
            if binding.is_const {
                return Err(RuntimeError::new(
                    name,
                    format!("Cannot assign to constant '{}'.", name.lexeme),
                ));
            }
            binding.value = value;
            return Ok(());
        }

        match &self.enclosing {
            Some(enclosing) => enclosing.borrow_mut().assign(name, value),
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }
}
