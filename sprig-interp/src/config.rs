//! Interpreter configuration.

use serde::{Deserialize, Serialize};

/// Read-only settings for one [`Interpreter`](crate::Interpreter). Built once by the host and passed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of iterations of a single loop execution. `0` disables the limit.
    pub max_loop_iterations: usize,
    /// Maximum depth of nested calls. Deep recursion also stops once the native stack budget is spent.
    pub max_call_depth: usize,
    /// Whether top-level declarations may reuse the name of a builtin.
    pub allow_builtin_shadowing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_loop_iterations: 10_000,
            max_call_depth: 64,
            allow_builtin_shadowing: false,
        }
    }
}

impl Config {
    pub fn with_max_loop_iterations(self, max_loop_iterations: usize) -> Self {
        Self {
            max_loop_iterations,
            ..self
        }
    }

    pub fn with_max_call_depth(self, max_call_depth: usize) -> Self {
        Self {
            max_call_depth,
            ..self
        }
    }

    pub fn with_builtin_shadowing(self, allow_builtin_shadowing: bool) -> Self {
        Self {
            allow_builtin_shadowing,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{ "max_loop_iterations": 5 }"#).unwrap();
        assert_eq!(config, Config::default().with_max_loop_iterations(5));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.max_loop_iterations, 10_000);
        assert_eq!(config.max_call_depth, 64);
        assert!(!config.allow_builtin_shadowing);
    }

    #[test]
    fn test_deserialize_empty() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_unknown_field_is_ignored() {
        let config: Config =
            serde_json::from_str(r#"{ "allow_builtin_shadowing": true, "theme": "dark" }"#).unwrap();
        assert!(config.allow_builtin_shadowing);
    }
}
