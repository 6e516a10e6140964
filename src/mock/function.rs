// Allow must_use_candidate since behavior setters are called for their side effects
#![allow(clippy::must_use_candidate)]

//! Mock functions that record calls and resolve programmable behaviors.
//!
//! This module provides [`MockFunction`], a stand-in callable with a call log
//! and a layered behavior chain.
//!
//! # Example
//!
//! ```rust
//! use testkit_mock::{args, MockFunction, Value};
//!
//! let mock = MockFunction::named("foo");
//! mock.mock_implementation_once(|args| Value::from(format!("{}-1", args[0])))
//!     .mock_implementation(|args| Value::from(format!("{}-default", args[0])));
//!
//! assert_eq!(mock.call(&args!["a"]), Ok(Value::from("a-1")));
//! assert_eq!(mock.call(&args!["b"]), Ok(Value::from("b-default")));
//!
//! assert!(mock.was_called_with(&args!["a"]));
//! assert_eq!(mock.call_count(), 2);
//! ```

use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use super::spy::Attachment;
use crate::value::{Callable, Invoke, Outcome, Value};

/// How a mock produces the result of one invocation.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// Run the callable with the invocation's arguments.
    Implementation(Callable),
    /// Return the stored value without looking at the arguments.
    ReturnValue(Value),
}

impl Behavior {
    /// Behavior running an infallible closure.
    pub fn implementation<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::Implementation(Callable::new(func))
    }

    /// Behavior returning a fixed value.
    pub fn return_value(value: impl Into<Value>) -> Self {
        Self::ReturnValue(value.into())
    }

    fn execute(&self, args: &[Value]) -> Outcome {
        match self {
            Self::Implementation(callable) => callable.call(args),
            Self::ReturnValue(value) => Ok(value.clone()),
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self::ReturnValue(Value::Undefined)
    }
}

/// Outcome stored for a recorded call.
#[derive(Clone, Debug, PartialEq)]
pub enum CallResult {
    /// The call returned this value.
    Returned(Value),
    /// The call threw this value.
    Thrown(Value),
    /// The call has not finished yet.
    Incomplete,
}

impl CallResult {
    /// The returned or thrown value, if the call finished.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Returned(v) | Self::Thrown(v) => Some(v),
            Self::Incomplete => None,
        }
    }

    /// Whether the call threw.
    #[must_use]
    pub fn is_thrown(&self) -> bool {
        matches!(self, Self::Thrown(_))
    }

    /// Whether the call returned normally.
    #[must_use]
    pub fn is_returned(&self) -> bool {
        matches!(self, Self::Returned(_))
    }

    fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Ok(v) => Self::Returned(v.clone()),
            Err(e) => Self::Thrown(e.clone()),
        }
    }
}

/// A record of a single mock invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct CallRecord {
    /// The arguments passed to the call.
    pub args: Vec<Value>,
    /// What the call produced.
    pub result: CallResult,
}

/// Where an invocation's behavior came from.
enum Resolved {
    Once(Behavior),
    Default(Behavior),
    Real(Callable),
    Fallback,
}

impl Resolved {
    fn source(&self) -> &'static str {
        match self {
            Self::Once(_) => "once",
            Self::Default(_) => "default",
            Self::Real(_) => "real",
            Self::Fallback => "fallback",
        }
    }

    fn execute(&self, args: &[Value]) -> Outcome {
        match self {
            Self::Once(behavior) | Self::Default(behavior) => behavior.execute(args),
            Self::Real(target) => target.call(args),
            Self::Fallback => Ok(Value::Undefined),
        }
    }
}

#[derive(Default)]
struct MockState {
    records: Vec<CallRecord>,
    once: VecDeque<Behavior>,
    /// Installed default override; `None` falls through to the real target.
    default: Option<Behavior>,
    /// Bumped by clear and reset so in-flight calls don't write into a new log.
    session: u64,
}

pub(crate) struct MockInner {
    name: RwLock<Option<String>>,
    state: Mutex<MockState>,
    real_target: Option<Callable>,
    attachment: Mutex<Option<Attachment>>,
}

impl MockInner {
    fn display_name(&self) -> String {
        self.name.read().clone().unwrap_or_else(|| "mock".to_string())
    }
}

impl Invoke for MockInner {
    fn invoke(&self, args: &[Value]) -> Outcome {
        let (index, session, resolved) = {
            let mut state = self.state.lock();
            let index = state.records.len();
            state.records.push(CallRecord {
                args: args.to_vec(),
                result: CallResult::Incomplete,
            });

            let resolved = if let Some(behavior) = state.once.pop_front() {
                Resolved::Once(behavior)
            } else if let Some(behavior) = &state.default {
                Resolved::Default(behavior.clone())
            } else if let Some(target) = &self.real_target {
                Resolved::Real(target.clone())
            } else {
                Resolved::Fallback
            };

            (index, state.session, resolved)
        };

        trace!(
            mock = %self.display_name(),
            call = index,
            behavior = resolved.source(),
            "mock invoked"
        );

        // No lock held here: behaviors may call back into this mock.
        let outcome = resolved.execute(args);

        let mut state = self.state.lock();
        if state.session == session {
            if let Some(record) = state.records.get_mut(index) {
                record.result = CallResult::from_outcome(&outcome);
            }
        }

        outcome
    }

    fn name(&self) -> Option<String> {
        Some(self.display_name())
    }
}

/// A stand-in callable that records calls and returns programmable results.
///
/// Behavior is resolved per call in priority order:
///
/// 1. the front of the once-queue ([`mock_implementation_once`](Self::mock_implementation_once),
///    [`mock_return_value_once`](Self::mock_return_value_once)), consumed FIFO
/// 2. the default override ([`mock_implementation`](Self::mock_implementation),
///    [`mock_return_value`](Self::mock_return_value))
/// 3. the real target, for spies
/// 4. returning [`Value::Undefined`]
///
/// Cloning produces another handle to the same mock, so a clone bound into a
/// [`Module`](crate::mock::Module) and the one held by a test observe the same
/// call log.
#[derive(Clone)]
pub struct MockFunction {
    inner: Arc<MockInner>,
}

impl MockFunction {
    /// Create an unnamed mock returning `undefined`.
    pub fn new() -> Self {
        Self::build(None, None)
    }

    /// Create a named mock returning `undefined`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::build(Some(name.into()), None)
    }

    /// Create a mock that delegates to `target` until an override is installed.
    pub(crate) fn spying(target: Callable, name: impl Into<String>) -> Self {
        Self::build(Some(name.into()), Some(target))
    }

    fn build(name: Option<String>, real_target: Option<Callable>) -> Self {
        Self {
            inner: Arc::new(MockInner {
                name: RwLock::new(name),
                state: Mutex::new(MockState::default()),
                real_target,
                attachment: Mutex::new(None),
            }),
        }
    }

    /// Invoke the mock.
    ///
    /// The call is recorded before its behavior runs. A thrown value is
    /// recorded as [`CallResult::Thrown`] and returned as `Err` unchanged.
    pub fn call(&self, args: &[Value]) -> Outcome {
        self.inner.invoke(args)
    }

    /// A callable handle to this mock, identical for every call.
    pub fn as_callable(&self) -> Callable {
        Callable::from_invoke(Arc::clone(&self.inner) as Arc<dyn Invoke>)
    }

    // ---------------------------------------------------------------------
    // Behavior
    // ---------------------------------------------------------------------

    /// Queue an implementation for the next unclaimed call.
    pub fn mock_implementation_once<F>(&self, func: F) -> &Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.mock_behavior_once(Behavior::implementation(func))
    }

    /// Queue a return value for the next unclaimed call.
    pub fn mock_return_value_once(&self, value: impl Into<Value>) -> &Self {
        self.mock_behavior_once(Behavior::return_value(value))
    }

    /// Queue any behavior for the next unclaimed call.
    pub fn mock_behavior_once(&self, behavior: Behavior) -> &Self {
        let mut state = self.inner.state.lock();
        state.once.push_back(behavior);
        debug!(mock = %self.name(), queued = state.once.len(), "once behavior queued");
        self
    }

    /// Replace the default implementation.
    pub fn mock_implementation<F>(&self, func: F) -> &Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.mock_behavior(Behavior::implementation(func))
    }

    /// Replace the default with a fixed return value.
    pub fn mock_return_value(&self, value: impl Into<Value>) -> &Self {
        self.mock_behavior(Behavior::return_value(value))
    }

    /// Replace the default behavior. The once-queue is left alone.
    pub fn mock_behavior(&self, behavior: Behavior) -> &Self {
        self.inner.state.lock().default = Some(behavior);
        debug!(mock = %self.name(), "default behavior replaced");
        self
    }

    /// Set the name reported in logs and debug output.
    pub fn mock_name(&self, name: impl Into<String>) -> &Self {
        *self.inner.name.write() = Some(name.into());
        self
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Forget recorded calls. Behaviors stay installed.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        state.records.clear();
        state.session += 1;
        debug!(mock = %self.name(), "mock cleared");
    }

    /// Forget recorded calls and every installed behavior.
    ///
    /// A spy keeps its real target and delegates to it again.
    pub fn reset(&self) {
        let mut state = self.inner.state.lock();
        state.records.clear();
        state.once.clear();
        state.default = None;
        state.session += 1;
        debug!(mock = %self.name(), "mock reset");
    }

    /// Reset, and for a spy put the original capability back on its module.
    ///
    /// Has no further effect on plain mocks.
    pub fn restore(&self) {
        self.reset();
        let attachment = self.inner.attachment.lock().take();
        if let Some(attachment) = attachment {
            let detached = attachment.detach(&self.as_callable());
            debug!(mock = %self.name(), detached, "spy restored");
        }
    }

    pub(crate) fn attach(&self, attachment: Attachment) {
        *self.inner.attachment.lock() = Some(attachment);
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// The mock's name, `"mock"` when none was given.
    pub fn name(&self) -> String {
        self.inner.display_name()
    }

    /// Whether this mock wraps a real capability.
    #[must_use]
    pub fn is_spy(&self) -> bool {
        self.inner.real_target.is_some()
    }

    /// Get the number of times the mock was called.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.inner.state.lock().records.len()
    }

    /// Check if the mock was called at least once.
    #[must_use]
    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    /// Check if the mock was called exactly N times.
    #[must_use]
    pub fn was_called_times(&self, n: usize) -> bool {
        self.call_count() == n
    }

    /// Check if any recorded call had exactly these arguments.
    pub fn was_called_with(&self, args: &[Value]) -> bool {
        self.inner
            .state
            .lock()
            .records
            .iter()
            .any(|record| record.args == args)
    }

    /// Get all recorded calls.
    pub fn records(&self) -> Vec<CallRecord> {
        self.inner.state.lock().records.clone()
    }

    /// Arguments of every recorded call, in call order.
    pub fn calls(&self) -> Vec<Vec<Value>> {
        self.inner
            .state
            .lock()
            .records
            .iter()
            .map(|record| record.args.clone())
            .collect()
    }

    /// Results of every recorded call, in call order.
    pub fn results(&self) -> Vec<CallResult> {
        self.inner
            .state
            .lock()
            .records
            .iter()
            .map(|record| record.result.clone())
            .collect()
    }

    /// Get the Nth call record (0-indexed).
    pub fn nth_call(&self, n: usize) -> Option<CallRecord> {
        self.inner.state.lock().records.get(n).cloned()
    }

    /// Get the most recent call record.
    pub fn last_call(&self) -> Option<CallRecord> {
        self.inner.state.lock().records.last().cloned()
    }

    /// Check if the most recent call had exactly these arguments.
    pub fn last_called_with(&self, args: &[Value]) -> bool {
        self.last_call().is_some_and(|record| record.args == args)
    }

    /// Check if the Nth call (0-indexed) had exactly these arguments.
    pub fn nth_called_with(&self, n: usize, args: &[Value]) -> bool {
        self.nth_call(n).is_some_and(|record| record.args == args)
    }

    /// Number of once-behaviors still queued.
    #[must_use]
    pub fn pending_once(&self) -> usize {
        self.inner.state.lock().once.len()
    }
}

impl Default for MockFunction {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&MockFunction> for Callable {
    fn from(mock: &MockFunction) -> Self {
        mock.as_callable()
    }
}

impl From<MockFunction> for Callable {
    fn from(mock: MockFunction) -> Self {
        mock.as_callable()
    }
}

impl From<&MockFunction> for Value {
    fn from(mock: &MockFunction) -> Self {
        Value::Function(mock.as_callable())
    }
}

impl From<MockFunction> for Value {
    fn from(mock: MockFunction) -> Self {
        Value::Function(mock.as_callable())
    }
}

impl Debug for MockFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("MockFunction")
            .field("name", &self.inner.display_name())
            .field("spy", &self.inner.real_target.is_some())
            .field("call_count", &state.records.len())
            .field("calls", &state.records)
            .finish()
    }
}
