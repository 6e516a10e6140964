//! # testkit-mock 🧰
//!
//! > Mock functions, spies and module substitution for Rust tests
//!
//! **testkit-mock** provides stand-in callables that record how they were
//! called and answer from a programmable behavior chain, spies that wrap a
//! real capability while watching it, and whole-module substitution.
//!
//! ## Quick Start
//!
//! ```rust
//! use testkit_mock::prelude::*;
//!
//! let functions = Module::new("functions")
//!     .with_fn("foo", |args| Value::from(format!("{} foo", args[0])));
//!
//! let foo = spy_on(&functions, "foo").unwrap();
//! foo.mock_implementation_once(|args| Value::from(format!("{} mocked foo", args[0])));
//!
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("2 mocked foo")));
//! assert_eq!(functions.call("foo", &args![2]), Ok(Value::from("2 foo")));
//! assert_that!(foo, called_times(2));
//! ```
//!
//! ## Features
//!
//! - 🎭 **Mock Functions** - Record calls, stack once-behaviors, swap defaults
//! - 🔍 **Spies** - Observe a real capability, override it when needed
//! - 📦 **Module Substitution** - Mock a whole module, totally or partially
//! - ✅ **Assertions** - Matchers over call logs and values

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod assertions;
pub mod error;
pub mod mock;
pub mod value;

/// Prelude for convenient imports
///
/// ```rust
/// use testkit_mock::prelude::*;
/// ```
pub mod prelude {
    pub use crate::assertions::matcher::{contains_str, eq, Matcher};
    pub use crate::assertions::{called, called_times, called_with, last_called_with};
    pub use crate::error::{Error, Result};
    pub use crate::mock::{
        automock, spy_on, Behavior, CallRecord, CallResult, MockFunction, Module, Substitution,
        SubstitutionMode,
    };
    pub use crate::value::{Callable, Outcome, Value};
    pub use crate::{args, assert_that};
}

// Re-exports
pub use error::{Error, Result};
pub use mock::{
    automock, spy_on, Behavior, CallRecord, CallResult, MockFunction, Module, Substitution,
    SubstitutionMode,
};
pub use value::{Callable, Invoke, Outcome, Value};
