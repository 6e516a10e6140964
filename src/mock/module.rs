//! Collaborator objects exposing named capabilities.
//!
//! A [`Module`] maps capability names to a stack of bindings. The bottom of
//! each stack is the capability as defined; overrides are pushed on top and
//! popped off again by [`Module::restore`]. Every holder of a module handle
//! calls through the top of the stack, so replacing a capability is visible
//! to code that captured the module earlier.
//!
//! ```rust
//! use testkit_mock::{args, Callable, Module, Value};
//!
//! let functions = Module::new("functions")
//!     .with_fn("foo", |args| Value::from(format!("{} foo", args[0])));
//!
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("2 foo")));
//!
//! functions
//!     .override_capability("foo", Callable::new(|_| Value::from("stub")))
//!     .unwrap();
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("stub")));
//!
//! functions.restore("foo").unwrap();
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("2 foo")));
//! ```

use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tracing::debug;

use super::function::MockFunction;
use crate::error::{Error, Result};
use crate::value::{Callable, Outcome, Value};

/// One entry of a capability's binding stack.
#[derive(Clone)]
pub(crate) struct Binding {
    pub(crate) callable: Callable,
    pub(crate) mock: Option<MockFunction>,
}

impl Binding {
    pub(crate) fn real(callable: Callable) -> Self {
        Self {
            callable,
            mock: None,
        }
    }

    pub(crate) fn mocked(mock: &MockFunction) -> Self {
        Self {
            callable: mock.as_callable(),
            mock: Some(mock.clone()),
        }
    }
}

struct ModuleInner {
    name: String,
    bindings: RwLock<BTreeMap<String, Vec<Binding>>>,
}

/// A named set of capabilities with per-capability override stacks.
///
/// Cloning yields another handle to the same module.
#[derive(Clone)]
pub struct Module {
    inner: Arc<ModuleInner>,
}

/// Non-owning handle to a module, held by spies for restoring.
#[derive(Clone)]
pub(crate) struct WeakModule {
    inner: Weak<ModuleInner>,
}

impl WeakModule {
    pub(crate) fn upgrade(&self) -> Option<Module> {
        self.inner.upgrade().map(|inner| Module { inner })
    }
}

impl Module {
    /// Create an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ModuleInner {
                name: name.into(),
                bindings: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Add a capability while building the module.
    #[must_use]
    pub fn with_capability(self, name: impl Into<String>, callable: Callable) -> Self {
        self.define(name, callable);
        self
    }

    /// Add a capability from an infallible closure while building the module.
    #[must_use]
    pub fn with_fn<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        let callable = Callable::named(name.clone(), func);
        self.with_capability(name, callable)
    }

    /// Define a capability, discarding any existing binding stack for it.
    pub fn define(&self, name: impl Into<String>, callable: Callable) {
        self.define_binding(name.into(), Binding::real(callable));
    }

    pub(crate) fn define_binding(&self, name: String, binding: Binding) {
        self.inner.bindings.write().insert(name, vec![binding]);
    }

    /// The module's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Names of all capabilities, sorted.
    #[must_use]
    pub fn capabilities(&self) -> Vec<String> {
        self.inner.bindings.read().keys().cloned().collect()
    }

    /// Whether a capability with this name exists.
    #[must_use]
    pub fn has_capability(&self, name: &str) -> bool {
        self.inner.bindings.read().contains_key(name)
    }

    /// The callable currently bound under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Callable> {
        self.binding(name).map(|binding| binding.callable)
    }

    /// The mock currently bound under `name`, if the binding is a mock.
    #[must_use]
    pub fn mock(&self, name: &str) -> Option<MockFunction> {
        self.binding(name).and_then(|binding| binding.mock)
    }

    pub(crate) fn binding(&self, name: &str) -> Option<Binding> {
        self.inner
            .bindings
            .read()
            .get(name)
            .and_then(|stack| stack.last().cloned())
    }

    /// Call the capability currently bound under `name`.
    ///
    /// Calling a capability that does not exist throws a `TypeError` string,
    /// the same way calling a missing member of an object would.
    pub fn call(&self, name: &str, args: &[Value]) -> Outcome {
        // Released before the call so capabilities can reach back into the module.
        let callable = self.get(name);
        match callable {
            Some(callable) => callable.call(args),
            None => Err(Value::from(format!(
                "TypeError: {}.{name} is not a function",
                self.inner.name
            ))),
        }
    }

    /// Push an override for an existing capability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the capability does not exist.
    pub fn override_capability(&self, name: &str, callable: Callable) -> Result<()> {
        self.push_override(name, Binding::real(callable))
    }

    /// Push a mock as the override for an existing capability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the capability does not exist.
    pub fn override_with_mock(&self, name: &str, mock: &MockFunction) -> Result<()> {
        self.push_override(name, Binding::mocked(mock))
    }

    fn push_override(&self, name: &str, binding: Binding) -> Result<()> {
        let mut bindings = self.inner.bindings.write();
        let stack = bindings
            .get_mut(name)
            .ok_or_else(|| Error::missing_capability(&self.inner.name, name))?;
        stack.push(binding);
        debug!(
            module = %self.inner.name,
            capability = name,
            depth = stack.len() - 1,
            "override pushed"
        );
        Ok(())
    }

    /// Pop the most recent override of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the capability does not exist and
    /// [`Error::NotOverridden`] if it has no override to pop.
    pub fn restore(&self, name: &str) -> Result<()> {
        let mut bindings = self.inner.bindings.write();
        let stack = bindings
            .get_mut(name)
            .ok_or_else(|| Error::missing_capability(&self.inner.name, name))?;
        if stack.len() < 2 {
            return Err(Error::not_overridden(name));
        }
        stack.pop();
        debug!(module = %self.inner.name, capability = name, "override popped");
        Ok(())
    }

    /// Drop every override, leaving each capability as defined.
    pub fn restore_all(&self) {
        let mut bindings = self.inner.bindings.write();
        for stack in bindings.values_mut() {
            stack.truncate(1);
        }
        debug!(module = %self.inner.name, "all overrides dropped");
    }

    /// Whether `name` currently has at least one override.
    #[must_use]
    pub fn is_overridden(&self, name: &str) -> bool {
        self.inner
            .bindings
            .read()
            .get(name)
            .is_some_and(|stack| stack.len() > 1)
    }

    /// Remove the override bound to exactly `callable`, wherever it sits.
    pub(crate) fn detach(&self, name: &str, callable: &Callable) -> bool {
        let mut bindings = self.inner.bindings.write();
        let Some(stack) = bindings.get_mut(name) else {
            return false;
        };
        let position = stack
            .iter()
            .skip(1)
            .position(|binding| binding.callable.ptr_eq(callable));
        match position {
            Some(i) => {
                stack.remove(i + 1);
                true
            }
            None => false,
        }
    }

    pub(crate) fn downgrade(&self) -> WeakModule {
        WeakModule {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bindings = self.inner.bindings.read();
        let overrides: BTreeMap<_, _> = bindings
            .iter()
            .map(|(name, stack)| (name.as_str(), stack.len() - 1))
            .collect();
        f.debug_struct("Module")
            .field("name", &self.inner.name)
            .field("overrides", &overrides)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn functions() -> Module {
        Module::new("functions")
            .with_fn("foo", |args| Value::from(format!("{} foo", args[0])))
            .with_fn("bar", |args| Value::from(format!("{} bar", args[0])))
    }

    #[test]
    fn test_call_defined_capability() {
        let module = functions();
        assert_eq!(module.call("foo", &args![2]), Ok(Value::from("2 foo")));
        assert_eq!(module.capabilities(), vec!["bar", "foo"]);
    }

    #[test]
    fn test_call_missing_capability_throws() {
        let module = functions();
        assert_eq!(
            module.call("baz", &[]),
            Err(Value::from("TypeError: functions.baz is not a function"))
        );
    }

    #[test]
    fn test_override_is_visible_to_clones() {
        let module = functions();
        let holder = module.clone();

        module
            .override_capability("bar", Callable::new(|_| Value::from("stub")))
            .unwrap();

        assert!(holder.is_overridden("bar"));
        assert_eq!(holder.call("bar", &args![3]), Ok(Value::from("stub")));
    }

    #[test]
    fn test_override_stack_pops_in_order() {
        let module = functions();
        module
            .override_capability("foo", Callable::new(|_| Value::from("first")))
            .unwrap();
        module
            .override_capability("foo", Callable::new(|_| Value::from("second")))
            .unwrap();

        assert_eq!(module.call("foo", &[]), Ok(Value::from("second")));
        module.restore("foo").unwrap();
        assert_eq!(module.call("foo", &[]), Ok(Value::from("first")));
        module.restore("foo").unwrap();
        assert_eq!(module.call("foo", &args![1]), Ok(Value::from("1 foo")));

        assert_eq!(module.restore("foo"), Err(Error::not_overridden("foo")));
    }

    #[test]
    fn test_override_unknown_capability() {
        let module = functions();
        let err = module
            .override_capability("nope", Callable::new(|_| Value::Null))
            .unwrap_err();
        assert_eq!(err, Error::missing_capability("functions", "nope"));
    }

    #[test]
    fn test_override_with_mock_exposes_handle() {
        let module = functions();
        let mock = MockFunction::named("foo");
        module.override_with_mock("foo", &mock).unwrap();

        module.call("foo", &args![2]).unwrap();

        assert!(module.mock("foo").unwrap().was_called_with(&args![2]));
        assert!(module.mock("bar").is_none());
    }

    #[test]
    fn test_restore_all() {
        let module = functions();
        module
            .override_capability("foo", Callable::new(|_| Value::Null))
            .unwrap();
        module
            .override_capability("bar", Callable::new(|_| Value::Null))
            .unwrap();

        module.restore_all();

        assert!(!module.is_overridden("foo"));
        assert!(!module.is_overridden("bar"));
        assert_eq!(module.call("bar", &args![3]), Ok(Value::from("3 bar")));
    }

    #[test]
    fn test_detach_removes_specific_override() {
        let module = functions();
        let lower = Callable::new(|_| Value::from("lower"));
        let upper = Callable::new(|_| Value::from("upper"));
        module.override_capability("foo", lower.clone()).unwrap();
        module.override_capability("foo", upper).unwrap();

        assert!(module.detach("foo", &lower));
        assert!(!module.detach("foo", &lower));
        assert_eq!(module.call("foo", &[]), Ok(Value::from("upper")));
    }

    #[test]
    fn test_define_replaces_stack() {
        let module = functions();
        module
            .override_capability("foo", Callable::new(|_| Value::Null))
            .unwrap();
        module.define("foo", Callable::new(|_| Value::from("redefined")));

        assert!(!module.is_overridden("foo"));
        assert_eq!(module.call("foo", &[]), Ok(Value::from("redefined")));
    }

    #[test]
    fn test_module_debug() {
        let debug = format!("{:?}", functions());
        assert!(debug.contains("Module"));
        assert!(debug.contains("functions"));
    }
}
