// Allow must_use_candidate for matcher factory functions since returning the matcher
// without using it is the common pattern for test setup
#![allow(clippy::must_use_candidate)]

//! Custom matcher system for flexible assertions.
//!
//! This module provides the matcher core shared by value and mock assertions:
//!
//! - [`Matcher`] trait for custom matchers
//! - Built-in matchers: [`eq`], [`contains_str`]
//! - Inversion with [`not`]
//!
//! # Example
//!
//! ```rust
//! use testkit_mock::assertions::matcher::{contains_str, eq, not, Matcher};
//! use testkit_mock::Value;
//!
//! let m = eq(Value::from("2 foo"));
//! assert!(m.matches(&Value::from("2 foo")));
//!
//! let m = contains_str("mocked foo");
//! assert!(m.matches(&Value::from("In main function: 2 mocked foo")));
//!
//! let m = not(eq(0));
//! assert!(m.matches(&1));
//! ```

use std::fmt::Debug;

use crate::value::Value;

/// A matcher for testing values.
///
/// Any matcher can be inverted with [`not`].
///
/// # Implementing Custom Matchers
///
/// ```rust
/// use testkit_mock::assertions::matcher::Matcher;
///
/// struct IsEven;
///
/// impl Matcher<i32> for IsEven {
///     fn matches(&self, value: &i32) -> bool {
///         value % 2 == 0
///     }
///
///     fn describe(&self) -> String {
///         "is even".to_string()
///     }
///
///     fn describe_mismatch(&self, value: &i32) -> String {
///         format!("{} is not even", value)
///     }
/// }
///
/// let m = IsEven;
/// assert!(m.matches(&4));
/// assert!(!m.matches(&3));
/// ```
pub trait Matcher<T: ?Sized> {
    /// Check if the value matches.
    fn matches(&self, value: &T) -> bool;

    /// Describe what this matcher expects.
    fn describe(&self) -> String;

    /// Describe why a value didn't match.
    fn describe_mismatch(&self, value: &T) -> String;
}

/// Assert that a value matches a matcher.
///
/// # Panics
///
/// Panics with a descriptive message if the value doesn't match.
///
/// # Example
///
/// ```rust
/// use testkit_mock::{assert_that, assertions::called_with, args, MockFunction};
///
/// let mock = MockFunction::new();
/// mock.call(&args![10]).unwrap();
///
/// assert_that!(mock, called_with(args![10]));
/// ```
#[macro_export]
macro_rules! assert_that {
    ($value:expr, $matcher:expr) => {{
        let value = &$value;
        let matcher = &$matcher;
        fn describe_for<T: ?Sized, M: $crate::assertions::matcher::Matcher<T> + ?Sized>(
            matcher: &M,
            _value: &T,
        ) -> String {
            matcher.describe()
        }
        if !$crate::assertions::matcher::Matcher::matches(matcher, value) {
            panic!(
                "assertion failed: {}\n  expected: {}\n  got: {:?}",
                $crate::assertions::matcher::Matcher::describe_mismatch(matcher, value),
                describe_for(matcher, value),
                value
            );
        }
    }};
    ($value:expr, $matcher:expr, $($arg:tt)+) => {{
        let value = &$value;
        let matcher = &$matcher;
        fn describe_for<T: ?Sized, M: $crate::assertions::matcher::Matcher<T> + ?Sized>(
            matcher: &M,
            _value: &T,
        ) -> String {
            matcher.describe()
        }
        if !$crate::assertions::matcher::Matcher::matches(matcher, value) {
            panic!(
                "assertion failed: {}\n  expected: {}\n  got: {:?}\n  message: {}",
                $crate::assertions::matcher::Matcher::describe_mismatch(matcher, value),
                describe_for(matcher, value),
                value,
                format_args!($($arg)+)
            );
        }
    }};
}

// =============================================================================
// Built-in Matchers
// =============================================================================

/// Create an equality matcher.
///
/// # Example
///
/// ```rust
/// use testkit_mock::assertions::matcher::{Matcher, eq};
///
/// let m = eq(42);
/// assert!(m.matches(&42));
/// assert!(!m.matches(&0));
/// ```
pub fn eq<T: PartialEq + Debug>(expected: T) -> EqMatcher<T> {
    EqMatcher { expected }
}

/// Matcher for equality.
pub struct EqMatcher<T> {
    expected: T,
}

impl<T: PartialEq + Debug> Matcher<T> for EqMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        value == &self.expected
    }

    fn describe(&self) -> String {
        format!("equals {:?}", self.expected)
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{:?} does not equal {:?}", value, self.expected)
    }
}

/// Create a matcher for text containing a substring.
///
/// Applies to `String`, `str`, and to [`Value`]s by their rendered text.
///
/// # Example
///
/// ```rust
/// use testkit_mock::assertions::matcher::{Matcher, contains_str};
///
/// let m = contains_str("world");
/// assert!(m.matches(&"hello world".to_string()));
/// assert!(!m.matches(&"hello".to_string()));
/// ```
pub fn contains_str(substring: &str) -> ContainsStrMatcher {
    ContainsStrMatcher {
        substring: substring.to_string(),
    }
}

/// Matcher for text containing a substring.
pub struct ContainsStrMatcher {
    substring: String,
}

impl Matcher<String> for ContainsStrMatcher {
    fn matches(&self, value: &String) -> bool {
        value.contains(&self.substring)
    }

    fn describe(&self) -> String {
        format!("contains {:?}", self.substring)
    }

    fn describe_mismatch(&self, value: &String) -> String {
        format!("{:?} does not contain {:?}", value, self.substring)
    }
}

impl Matcher<str> for ContainsStrMatcher {
    fn matches(&self, value: &str) -> bool {
        value.contains(&self.substring)
    }

    fn describe(&self) -> String {
        format!("contains {:?}", self.substring)
    }

    fn describe_mismatch(&self, value: &str) -> String {
        format!("{:?} does not contain {:?}", value, self.substring)
    }
}

impl Matcher<Value> for ContainsStrMatcher {
    fn matches(&self, value: &Value) -> bool {
        value.to_string().contains(&self.substring)
    }

    fn describe(&self) -> String {
        format!("renders containing {:?}", self.substring)
    }

    fn describe_mismatch(&self, value: &Value) -> String {
        format!("{:?} does not contain {:?}", value.to_string(), self.substring)
    }
}

/// Create a matcher that inverts another matcher.
///
/// # Example
///
/// ```rust
/// use testkit_mock::assertions::matcher::{Matcher, not, eq};
///
/// let m = not(eq(0));
/// assert!(m.matches(&1));
/// assert!(!m.matches(&0));
/// ```
pub fn not<T: ?Sized, M: Matcher<T> + 'static>(matcher: M) -> NotMatcher<T> {
    NotMatcher {
        inner: Box::new(matcher),
    }
}

/// Matcher that inverts another matcher.
pub struct NotMatcher<T: ?Sized> {
    inner: Box<dyn Matcher<T>>,
}

impl<T: Debug + ?Sized> Matcher<T> for NotMatcher<T> {
    fn matches(&self, value: &T) -> bool {
        !self.inner.matches(value)
    }

    fn describe(&self) -> String {
        format!("not {}", self.inner.describe())
    }

    fn describe_mismatch(&self, value: &T) -> String {
        format!("{value:?} unexpectedly {}", self.inner.describe())
    }
}
