//! Spies over module capabilities.
//!
//! [`spy_on`] wraps a capability of a [`Module`] in a [`MockFunction`] that
//! delegates to the original until a behavior is installed, and binds the
//! spy in its place so every holder of the module goes through it.
//!
//! # Example
//!
//! ```rust
//! use testkit_mock::{args, spy_on, Module, Value};
//!
//! let functions = Module::new("functions")
//!     .with_fn("foo", |args| Value::from(format!("{} foo", args[0])));
//!
//! let spy = spy_on(&functions, "foo").unwrap();
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("2 foo")));
//! assert!(spy.was_called_with(&args![2]));
//!
//! spy.mock_implementation_once(|args| Value::from(format!("{} mocked foo", args[0])));
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("2 mocked foo")));
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("2 foo")));
//!
//! spy.restore();
//! assert!(!functions.is_overridden("foo"));
//! ```

use tracing::debug;

use super::function::MockFunction;
use super::module::{Module, WeakModule};
use crate::error::{Error, Result};
use crate::value::Callable;

/// Where a spy is bound, so restoring can unbind it.
pub(crate) struct Attachment {
    module: WeakModule,
    capability: String,
}

impl Attachment {
    pub(crate) fn new(module: &Module, capability: impl Into<String>) -> Self {
        Self {
            module: module.downgrade(),
            capability: capability.into(),
        }
    }

    /// Unbind `callable` from the module, if the module is still alive.
    pub(crate) fn detach(&self, callable: &Callable) -> bool {
        self.module
            .upgrade()
            .is_some_and(|module| module.detach(&self.capability, callable))
    }
}

/// Spy on the capability currently bound under `capability`.
///
/// The spy's real target is whatever `module` binds under that name right
/// now, including an earlier override. Calling [`MockFunction::restore`]
/// on the spy puts the previous binding back.
///
/// # Errors
///
/// Returns [`Error::Configuration`] naming the capability if the module
/// does not have it.
pub fn spy_on(module: &Module, capability: &str) -> Result<MockFunction> {
    let target = module
        .get(capability)
        .ok_or_else(|| Error::missing_capability(module.name(), capability))?;

    let spy = MockFunction::spying(target, capability);
    module.override_with_mock(capability, &spy)?;
    spy.attach(Attachment::new(module, capability));

    debug!(module = module.name(), capability, "spy installed");
    Ok(spy)
}
