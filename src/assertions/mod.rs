//! Fluent assertions for mocks and values.
//!
//! This module provides assertion utilities built on a small matcher system:
//!
//! - [`assert_that!`](crate::assert_that) - Assert a value matches a matcher
//! - [`matcher`] - Matcher trait, value matchers and combinators
//! - [`called`], [`called_times`], [`called_with`], ... - Matchers over a mock's call log
//!
//! # Mock Assertions
//!
//! ```rust
//! use testkit_mock::{args, assert_that, MockFunction};
//! use testkit_mock::assertions::{called_times, called_with, last_called_with};
//!
//! let mock = MockFunction::named("foo");
//! mock.call(&args![2]).unwrap();
//! mock.call(&args![10]).unwrap();
//!
//! assert_that!(mock, called_times(2));
//! assert_that!(mock, called_with(args![2]));
//! assert_that!(mock, last_called_with(args![10]));
//! ```
//!
//! # Value Assertions
//!
//! ```rust
//! use testkit_mock::{assert_that, assertions::matcher::contains_str, Value};
//!
//! assert_that!(Value::from("In main function: 2 mocked foo"), contains_str("2 mocked foo"));
//! ```

pub mod matcher;
mod mock;

pub use mock::{
    called, called_times, called_with, last_called_with, nth_called_with, returned_with, threw,
    CalledMatcher, CalledTimesMatcher, CalledWithMatcher, ReturnedWithMatcher, ThrewMatcher,
};
