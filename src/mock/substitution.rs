//! Whole-module substitution.
//!
//! A [`Substitution`] describes a replacement for a [`Module`]: which
//! capabilities become mocks, spies or plain replacements, and whether the
//! capabilities it does not mention are dropped ([`SubstitutionMode::Total`])
//! or copied through from the source ([`SubstitutionMode::Partial`]).
//!
//! # Example
//!
//! ```rust
//! use testkit_mock::{args, Module, Substitution, Value};
//!
//! let functions = Module::new("functions")
//!     .with_fn("foo", |args| Value::from(format!("{} foo", args[0])))
//!     .with_fn("bar", |args| Value::from(format!("{} bar", args[0])));
//!
//! let mocked = Substitution::partial().mock("bar").apply(&functions).unwrap();
//!
//! assert_eq!(mocked.call("foo", &args![2]), Ok(Value::from("2 foo")));
//! assert_eq!(mocked.call("bar", &args![3]), Ok(Value::Undefined));
//! assert!(mocked.mock("bar").unwrap().was_called_with(&args![3]));
//! ```

use std::collections::HashSet;

use tracing::debug;

use super::function::MockFunction;
use super::module::{Binding, Module};
use super::spy::spy_on;
use crate::error::{Error, Result};
use crate::value::{Callable, Value};

/// What happens to capabilities a substitution does not name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubstitutionMode {
    /// The substitution is the complete capability set; unnamed ones are absent.
    #[default]
    Total,
    /// Unnamed capabilities are copied through from the source unchanged.
    Partial,
}

#[derive(Clone)]
enum Replacement {
    /// A fresh mock, created when the substitution is applied.
    FreshMock,
    /// A caller-supplied, possibly pre-configured mock.
    Mock(MockFunction),
    /// A mock delegating to the source capability.
    Spy,
    /// A plain callable; calls are not recorded.
    Callable(Callable),
}

/// Builder for a replacement module.
///
/// Entries are applied in the order they were added. Applying validates
/// every entry first, so an error never leaves a half-built module behind.
#[derive(Clone)]
pub struct Substitution {
    mode: SubstitutionMode,
    entries: Vec<(String, Replacement)>,
}

impl Substitution {
    /// Create an empty substitution with the given mode.
    #[must_use]
    pub fn new(mode: SubstitutionMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    /// A substitution supplying the complete capability set.
    #[must_use]
    pub fn total() -> Self {
        Self::new(SubstitutionMode::Total)
    }

    /// A substitution keeping every capability it does not name.
    #[must_use]
    pub fn partial() -> Self {
        Self::new(SubstitutionMode::Partial)
    }

    /// The substitution's mode.
    #[must_use]
    pub fn mode(&self) -> SubstitutionMode {
        self.mode
    }

    /// Bind a fresh mock, named after the capability.
    #[must_use]
    pub fn mock(self, name: impl Into<String>) -> Self {
        self.entry(name, Replacement::FreshMock)
    }

    /// Bind the given mock. Behaviors already installed on it stay in effect.
    #[must_use]
    pub fn mock_with(self, name: impl Into<String>, mock: MockFunction) -> Self {
        self.entry(name, Replacement::Mock(mock))
    }

    /// Bind the source's capability and spy on it. Restoring the spy puts the
    /// capability back.
    #[must_use]
    pub fn spy(self, name: impl Into<String>) -> Self {
        self.entry(name, Replacement::Spy)
    }

    /// Bind a plain replacement callable.
    #[must_use]
    pub fn replace(self, name: impl Into<String>, callable: Callable) -> Self {
        self.entry(name, Replacement::Callable(callable))
    }

    /// Bind a plain replacement built from an infallible closure.
    #[must_use]
    pub fn replace_fn<F>(self, name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        let callable = Callable::named(name.clone(), func);
        self.replace(name, callable)
    }

    fn entry(mut self, name: impl Into<String>, replacement: Replacement) -> Self {
        self.entries.push((name.into(), replacement));
        self
    }

    /// Build the replacement module for `source`.
    ///
    /// The source module is not modified.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if a capability is named twice, if a
    /// partial substitution names a capability the source lacks, or if a spy
    /// is requested for a capability the source lacks.
    pub fn apply(&self, source: &Module) -> Result<Module> {
        let mut named = HashSet::new();
        for (name, replacement) in &self.entries {
            if !named.insert(name.as_str()) {
                return Err(Error::duplicate_capability(name));
            }
            let needs_source = self.mode == SubstitutionMode::Partial
                || matches!(replacement, Replacement::Spy);
            if needs_source && !source.has_capability(name) {
                return Err(Error::missing_capability(source.name(), name));
            }
        }

        let target = Module::new(source.name());

        if self.mode == SubstitutionMode::Partial {
            for name in source.capabilities() {
                if named.contains(name.as_str()) {
                    continue;
                }
                if let Some(binding) = source.binding(&name) {
                    target.define_binding(name, binding);
                }
            }
        }

        for (name, replacement) in &self.entries {
            let binding = match replacement {
                Replacement::FreshMock => Binding::mocked(&MockFunction::named(name.as_str())),
                Replacement::Mock(mock) => Binding::mocked(mock),
                Replacement::Spy => {
                    let real = source
                        .binding(name)
                        .ok_or_else(|| Error::missing_capability(source.name(), name))?;
                    target.define_binding(name.clone(), real);
                    spy_on(&target, name)?;
                    continue;
                }
                Replacement::Callable(callable) => Binding::real(callable.clone()),
            };
            target.define_binding(name.clone(), binding);
        }

        debug!(
            module = source.name(),
            mode = ?self.mode,
            replaced = self.entries.len(),
            "substitution applied"
        );
        Ok(target)
    }
}

impl Default for Substitution {
    fn default() -> Self {
        Self::total()
    }
}

/// Replace every capability of `source` with a fresh mock of the same name.
///
/// ```rust
/// use testkit_mock::{args, automock, Module, Value};
///
/// let functions = Module::new("functions").with_fn("foo", |_| Value::from("real"));
/// let mocked = automock(&functions);
///
/// assert_eq!(mocked.call("foo", &args![2]), Ok(Value::Undefined));
/// assert_eq!(mocked.mock("foo").unwrap().call_count(), 1);
/// ```
#[must_use]
pub fn automock(source: &Module) -> Module {
    let target = Module::new(source.name());
    for name in source.capabilities() {
        let mock = MockFunction::named(name.as_str());
        target.define_binding(name, Binding::mocked(&mock));
    }
    debug!(module = source.name(), "module automocked");
    target
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;

    fn functions() -> Module {
        Module::new("functions")
            .with_fn("foo", |args| Value::from(format!("{} foo", args[0])))
            .with_fn("bar", |args| Value::from(format!("{} bar", args[0])))
            .with_fn("foobar", |_| Value::from("foobar"))
    }

    #[test]
    fn test_total_drops_unnamed() {
        let mocked = Substitution::total()
            .replace_fn("foo", |args| Value::from(format!("{} mocked foo", args[0])))
            .mock("bar")
            .apply(&functions())
            .unwrap();

        assert_eq!(mocked.capabilities(), vec!["bar", "foo"]);
        assert_eq!(mocked.call("foo", &args![2]), Ok(Value::from("2 mocked foo")));
        assert_eq!(mocked.call("bar", &args![3]), Ok(Value::Undefined));
        assert!(mocked.call("foobar", &[]).is_err());
        assert!(mocked.mock("foo").is_none());
    }

    #[test]
    fn test_total_allows_new_names() {
        let mocked = Substitution::total()
            .replace_fn("default", |_| Value::from("mocked main"))
            .apply(&Module::new("main"))
            .unwrap();

        assert_eq!(mocked.call("default", &[]), Ok(Value::from("mocked main")));
    }

    #[test]
    fn test_partial_copies_through() {
        let source = functions();
        let mocked = Substitution::partial()
            .replace_fn("bar", |args| Value::from(format!("{} mocked bar", args[0])))
            .apply(&source)
            .unwrap();

        assert_eq!(mocked.call("foo", &args![2]), Ok(Value::from("2 foo")));
        assert_eq!(mocked.call("bar", &args![3]), Ok(Value::from("3 mocked bar")));
        assert_eq!(mocked.get("foo"), source.get("foo"));
        assert_eq!(source.call("bar", &args![3]), Ok(Value::from("3 bar")));
    }

    #[test]
    fn test_partial_missing_capability() {
        let err = Substitution::partial()
            .mock("bar")
            .mock("baz")
            .apply(&functions())
            .unwrap_err();

        assert_eq!(err, Error::missing_capability("functions", "baz"));
    }

    #[test]
    fn test_duplicate_capability() {
        let err = Substitution::total()
            .mock("bar")
            .replace_fn("bar", |_| Value::Null)
            .apply(&functions())
            .unwrap_err();

        assert_eq!(err, Error::duplicate_capability("bar"));
    }

    #[test]
    fn test_spy_needs_source() {
        let err = Substitution::total()
            .spy("missing")
            .apply(&functions())
            .unwrap_err();

        assert_eq!(err.capability(), "missing");
    }

    #[test]
    fn test_spy_entry_delegates() {
        let mocked = Substitution::partial()
            .spy("foo")
            .apply(&functions())
            .unwrap();

        assert_eq!(mocked.call("foo", &args![2]), Ok(Value::from("2 foo")));
        let spy = mocked.mock("foo").unwrap();
        assert!(spy.is_spy());
        assert!(spy.was_called_with(&args![2]));

        spy.restore();
        assert!(mocked.mock("foo").is_none());
        assert!(!mocked.is_overridden("foo"));
        assert_eq!(mocked.call("foo", &args![2]), Ok(Value::from("2 foo")));
        assert_eq!(spy.call_count(), 0);
    }

    #[test]
    fn test_preconfigured_mock() {
        let bar = MockFunction::named("bar");
        bar.mock_return_value("99 bars");

        let mocked = Substitution::partial()
            .mock_with("bar", bar.clone())
            .apply(&functions())
            .unwrap();

        assert_eq!(mocked.call("bar", &args![3]), Ok(Value::from("99 bars")));
        assert_eq!(bar.call_count(), 1);
    }

    #[test]
    fn test_fresh_mocks_per_apply() {
        let substitution = Substitution::total().mock("bar");
        let first = substitution.apply(&functions()).unwrap();
        let second = substitution.apply(&functions()).unwrap();

        first.call("bar", &[]).unwrap();

        assert_eq!(first.mock("bar").unwrap().call_count(), 1);
        assert_eq!(second.mock("bar").unwrap().call_count(), 0);
    }

    #[test]
    fn test_automock_every_capability() {
        let mocked = automock(&functions());

        for name in ["foo", "bar", "foobar"] {
            assert_eq!(mocked.call(name, &args![1]), Ok(Value::Undefined));
            let mock = mocked.mock(name).unwrap();
            assert_eq!(mock.name(), name);
            assert!(mock.was_called_times(1));
        }
    }

    #[test]
    fn test_default_mode_is_total() {
        assert_eq!(Substitution::default().mode(), SubstitutionMode::Total);
    }
}
