//! Scoped environments for name resolution.
//!
//! Environments form a chain through parent references. Blocks, loops and
//! function calls each acquire a child scope; name resolution walks the
//! chain outward. Scopes are shared (`Rc`) so a child keeps its parent
//! alive for as long as the child exists, including while control-flow
//! signals unwind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::RuntimeError;
use crate::eval::value::Value;

/// A scoped name-to-value mapping with an optional parent.
///
/// Cloning an `Environment` clones the handle, not the bindings; the clone
/// refers to the same scope.
#[derive(Debug, Clone)]
pub struct Environment {
    inner: Rc<RefCell<Scope>>,
}

#[derive(Debug)]
struct Scope {
    bindings: HashMap<String, Value>,
    parent: Option<Environment>,
}

impl Environment {
    /// Creates a new root environment.
    pub fn new() -> Self {
        Environment {
            inner: Rc::new(RefCell::new(Scope {
                bindings: HashMap::new(),
                parent: None,
            })),
        }
    }

    /// Creates a child environment with this scope as parent.
    pub fn child(&self) -> Self {
        Environment {
            inner: Rc::new(RefCell::new(Scope {
                bindings: HashMap::new(),
                parent: Some(self.clone()),
            })),
        }
    }

    /// Binds a name in this innermost scope, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.inner.borrow_mut().bindings.insert(name.into(), value);
    }

    /// Updates the nearest enclosing binding of `name`.
    ///
    /// Fails when no scope in the chain holds the name; compound
    /// assignments rely on that failure, while plain `=` falls back to
    /// [`define`](Self::define).
    pub fn assign(&self, name: &str, value: Value) -> Result<(), RuntimeError> {
        let mut scope = self.inner.borrow_mut();
        if let Some(slot) = scope.bindings.get_mut(name) {
            *slot = value;
            return Ok(());
        }
        match &scope.parent {
            Some(parent) => parent.assign(name, value),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }

    /// Resolves `name` against the nearest enclosing scope that holds it.
    pub fn get(&self, name: &str) -> Result<Value, RuntimeError> {
        let scope = self.inner.borrow();
        if let Some(value) = scope.bindings.get(name) {
            return Ok(value.clone());
        }
        match &scope.parent {
            Some(parent) => parent.get(name),
            None => Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
            }),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_get() {
        let env = Environment::new();
        env.define("x", Value::Int(42));
        assert_eq!(env.get("x").unwrap(), Value::Int(42));
        assert!(env.get("y").is_err());
    }

    #[test]
    fn test_child_sees_parent_bindings() {
        let parent = Environment::new();
        parent.define("x", Value::Int(1));

        let child = parent.child();
        child.define("y", Value::Int(2));

        assert_eq!(child.get("x").unwrap(), Value::Int(1));
        assert_eq!(child.get("y").unwrap(), Value::Int(2));
        assert!(parent.get("y").is_err());
    }

    #[test]
    fn test_shadowing_in_inner_scope() {
        let parent = Environment::new();
        parent.define("x", Value::Int(1));

        let child = parent.child();
        child.define("x", Value::Int(2));

        assert_eq!(child.get("x").unwrap(), Value::Int(2));
        assert_eq!(parent.get("x").unwrap(), Value::Int(1));
    }

    #[test]
    fn test_assign_updates_nearest_enclosing_scope() {
        let parent = Environment::new();
        parent.define("x", Value::Int(1));

        let child = parent.child();
        child.assign("x", Value::Int(5)).unwrap();

        // the write landed in the parent, not a new child binding
        assert_eq!(parent.get("x").unwrap(), Value::Int(5));
        assert_eq!(child.get("x").unwrap(), Value::Int(5));
    }

    #[test]
    fn test_assign_unbound_name_fails() {
        let env = Environment::new();
        let err = env.assign("missing", Value::Int(1)).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedVariable { .. }));
    }

    #[test]
    fn test_get_returns_latest_write() {
        let env = Environment::new();
        env.define("x", Value::Int(1));
        env.assign("x", Value::Int(2)).unwrap();
        assert_eq!(env.get("x").unwrap(), Value::Int(2));
    }
}
