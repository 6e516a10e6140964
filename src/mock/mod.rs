//! Mock functions, spies and module substitution.
//!
//! This module provides the pieces a test composes its doubles from:
//!
//! - [`MockFunction`] - Stand-in callable with a call log and behavior chain
//! - [`Module`] - Named capabilities with per-capability override stacks
//! - [`spy_on`] - Wrap a module capability in a delegating mock
//! - [`Substitution`] / [`automock`] - Replace a whole module, totally or partially
//!
//! # Mock Functions
//!
//! ```rust
//! use testkit_mock::{args, MockFunction, Value};
//!
//! let mock = MockFunction::new();
//! assert_eq!(mock.call(&args![10]), Ok(Value::Undefined));
//!
//! mock.mock_return_value("stubbed");
//! assert_eq!(mock.call(&args![10]), Ok(Value::from("stubbed")));
//! assert_eq!(mock.call_count(), 2);
//! ```
//!
//! # Module Substitution
//!
//! ```rust
//! use testkit_mock::{args, Module, Substitution, Value};
//!
//! let functions = Module::new("functions")
//!     .with_fn("foo", |args| Value::from(format!("{} foo", args[0])))
//!     .with_fn("bar", |args| Value::from(format!("{} bar", args[0])));
//!
//! let mocked = Substitution::total()
//!     .replace_fn("foo", |args| Value::from(format!("{} mocked foo", args[0])))
//!     .mock("bar")
//!     .apply(&functions)
//!     .unwrap();
//!
//! assert_eq!(mocked.call("foo", &args![2]), Ok(Value::from("2 mocked foo")));
//! assert_eq!(mocked.call("bar", &args![3]), Ok(Value::Undefined));
//! ```

mod function;
mod module;
mod spy;
mod substitution;

pub use function::{Behavior, CallRecord, CallResult, MockFunction};
pub use module::Module;
pub use spy::spy_on;
pub use substitution::{automock, Substitution, SubstitutionMode};
