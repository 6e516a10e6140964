// Matcher factories are meant to be passed straight into `assert_that!`
#![allow(clippy::must_use_candidate)]

//! Matchers over a mock's call log.

use crate::mock::{CallResult, MockFunction};
use crate::value::Value;

use super::matcher::Matcher;

fn render_args(args: &[Value]) -> String {
    let rendered: Vec<_> = args.iter().map(|arg| format!("{arg:?}")).collect();
    format!("({})", rendered.join(", "))
}

fn render_calls(mock: &MockFunction) -> String {
    let calls = mock.calls();
    if calls.is_empty() {
        return "no calls".to_string();
    }
    let rendered: Vec<_> = calls.iter().map(|args| render_args(args)).collect();
    format!("calls {}", rendered.join(", "))
}

/// Matches a mock that was called at least once.
///
/// ```rust
/// use testkit_mock::assertions::{called, matcher::Matcher};
/// use testkit_mock::MockFunction;
///
/// let mock = MockFunction::new();
/// assert!(!called().matches(&mock));
/// mock.call(&[]).unwrap();
/// assert!(called().matches(&mock));
/// ```
pub fn called() -> CalledMatcher {
    CalledMatcher
}

/// Matcher for [`called`].
pub struct CalledMatcher;

impl Matcher<MockFunction> for CalledMatcher {
    fn matches(&self, mock: &MockFunction) -> bool {
        mock.was_called()
    }

    fn describe(&self) -> String {
        "to have been called".to_string()
    }

    fn describe_mismatch(&self, mock: &MockFunction) -> String {
        format!("{} was never called", mock.name())
    }
}

/// Matches a mock called exactly `n` times.
pub fn called_times(n: usize) -> CalledTimesMatcher {
    CalledTimesMatcher { expected: n }
}

/// Matcher for [`called_times`].
pub struct CalledTimesMatcher {
    expected: usize,
}

impl Matcher<MockFunction> for CalledTimesMatcher {
    fn matches(&self, mock: &MockFunction) -> bool {
        mock.was_called_times(self.expected)
    }

    fn describe(&self) -> String {
        format!("to have been called {} times", self.expected)
    }

    fn describe_mismatch(&self, mock: &MockFunction) -> String {
        format!("{} was called {} times", mock.name(), mock.call_count())
    }
}

/// Which recorded call an arguments matcher inspects.
#[derive(Clone, Copy, Debug)]
enum CallSelector {
    Any,
    Last,
    Nth(usize),
}

/// Matches a mock with a recorded call taking exactly `args`.
///
/// ```rust
/// use testkit_mock::assertions::{called_with, matcher::Matcher};
/// use testkit_mock::{args, MockFunction};
///
/// let mock = MockFunction::new();
/// mock.call(&args![10]).unwrap();
/// assert!(called_with(args![10]).matches(&mock));
/// assert!(!called_with(args![11]).matches(&mock));
/// ```
pub fn called_with(args: Vec<Value>) -> CalledWithMatcher {
    CalledWithMatcher {
        expected: args,
        selector: CallSelector::Any,
    }
}

/// Matches a mock whose most recent call took exactly `args`.
pub fn last_called_with(args: Vec<Value>) -> CalledWithMatcher {
    CalledWithMatcher {
        expected: args,
        selector: CallSelector::Last,
    }
}

/// Matches a mock whose `n`th call (0-indexed) took exactly `args`.
pub fn nth_called_with(n: usize, args: Vec<Value>) -> CalledWithMatcher {
    CalledWithMatcher {
        expected: args,
        selector: CallSelector::Nth(n),
    }
}

/// Matcher for [`called_with`], [`last_called_with`] and [`nth_called_with`].
pub struct CalledWithMatcher {
    expected: Vec<Value>,
    selector: CallSelector,
}

impl Matcher<MockFunction> for CalledWithMatcher {
    fn matches(&self, mock: &MockFunction) -> bool {
        match self.selector {
            CallSelector::Any => mock.was_called_with(&self.expected),
            CallSelector::Last => mock.last_called_with(&self.expected),
            CallSelector::Nth(n) => mock.nth_called_with(n, &self.expected),
        }
    }

    fn describe(&self) -> String {
        let args = render_args(&self.expected);
        match self.selector {
            CallSelector::Any => format!("to have been called with {args}"),
            CallSelector::Last => format!("to have been last called with {args}"),
            CallSelector::Nth(n) => format!("call {n} to have been made with {args}"),
        }
    }

    fn describe_mismatch(&self, mock: &MockFunction) -> String {
        format!("{} received {}", mock.name(), render_calls(mock))
    }
}

/// Matches a mock with a call that returned `value`.
pub fn returned_with(value: impl Into<Value>) -> ReturnedWithMatcher {
    ReturnedWithMatcher {
        expected: CallResult::Returned(value.into()),
    }
}

/// Matcher for [`returned_with`].
pub struct ReturnedWithMatcher {
    expected: CallResult,
}

impl Matcher<MockFunction> for ReturnedWithMatcher {
    fn matches(&self, mock: &MockFunction) -> bool {
        mock.results().contains(&self.expected)
    }

    fn describe(&self) -> String {
        format!("to have returned {:?}", self.expected.value())
    }

    fn describe_mismatch(&self, mock: &MockFunction) -> String {
        format!("{} produced {:?}", mock.name(), mock.results())
    }
}

/// Matches a mock with at least one call that threw.
pub fn threw() -> ThrewMatcher {
    ThrewMatcher
}

/// Matcher for [`threw`].
pub struct ThrewMatcher;

impl Matcher<MockFunction> for ThrewMatcher {
    fn matches(&self, mock: &MockFunction) -> bool {
        mock.results().iter().any(CallResult::is_thrown)
    }

    fn describe(&self) -> String {
        "to have thrown".to_string()
    }

    fn describe_mismatch(&self, mock: &MockFunction) -> String {
        format!("{} never threw", mock.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args;
    use crate::assertions::matcher::not;
    use crate::mock::Behavior;
    use crate::value::Callable;

    #[test]
    fn test_called_and_times() {
        let mock = MockFunction::named("foo");
        assert!(!called().matches(&mock));
        assert_eq!(called().describe_mismatch(&mock), "foo was never called");

        mock.call(&[]).unwrap();
        mock.call(&[]).unwrap();

        assert!(called().matches(&mock));
        assert!(called_times(2).matches(&mock));
        assert!(!called_times(1).matches(&mock));
        assert_eq!(
            called_times(1).describe_mismatch(&mock),
            "foo was called 2 times"
        );
    }

    #[test]
    fn test_called_with_selectors() {
        let mock = MockFunction::named("bar");
        mock.call(&args![1]).unwrap();
        mock.call(&args![2]).unwrap();

        assert!(called_with(args![1]).matches(&mock));
        assert!(last_called_with(args![2]).matches(&mock));
        assert!(!last_called_with(args![1]).matches(&mock));
        assert!(nth_called_with(0, args![1]).matches(&mock));
        assert!(!nth_called_with(5, args![1]).matches(&mock));
    }

    #[test]
    fn test_called_with_mismatch_lists_calls() {
        let mock = MockFunction::named("bar");
        mock.call(&args![3]).unwrap();

        let mismatch = called_with(args![4]).describe_mismatch(&mock);
        assert_eq!(mismatch, "bar received calls (Number(3.0))");

        let fresh = MockFunction::named("idle");
        assert_eq!(
            called_with(args![]).describe_mismatch(&fresh),
            "idle received no calls"
        );
    }

    #[test]
    fn test_returned_with() {
        let mock = MockFunction::new();
        mock.mock_return_value_once("first");
        mock.call(&[]).unwrap();

        assert!(returned_with("first").matches(&mock));
        assert!(!returned_with("second").matches(&mock));
    }

    #[test]
    fn test_nan_arguments_and_results_match() {
        let mock = MockFunction::new();
        mock.mock_implementation(|args| args[0].clone());
        mock.call(&args![f64::NAN]).unwrap();

        assert!(called_with(args![f64::NAN]).matches(&mock));
        assert!(returned_with(f64::NAN).matches(&mock));
    }

    #[test]
    fn test_threw() {
        let mock = MockFunction::new();
        assert!(!threw().matches(&mock));

        mock.mock_behavior_once(Behavior::Implementation(Callable::fallible(|_| {
            Err(Value::from("boom"))
        })));
        let _ = mock.call(&[]);

        assert!(threw().matches(&mock));
        assert!(not(returned_with(Value::Undefined)).matches(&mock));
    }

    #[test]
    fn test_assert_that_with_mock_matchers() {
        let mock = MockFunction::new();
        mock.call(&args![10]).unwrap();

        crate::assert_that!(mock, called_with(args![10]));
        crate::assert_that!(mock, called_times(1), "mock should run once");
    }
}
