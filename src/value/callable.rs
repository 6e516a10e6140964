//! Shared callable handles.

use std::fmt::{self, Debug};
use std::sync::Arc;

use super::Value;

/// Result of invoking a callable: `Err` carries a thrown value.
///
/// A thrown value is propagated exactly as produced; nothing in this crate
/// wraps or converts it.
pub type Outcome = std::result::Result<Value, Value>;

/// Something that can be invoked with a list of argument values.
///
/// Implemented for plain closures (through [`Callable::new`] and
/// [`Callable::fallible`]) and by mock functions themselves.
pub trait Invoke: Send + Sync {
    /// Invoke with the given arguments.
    fn invoke(&self, args: &[Value]) -> Outcome;

    /// Name used in debug output, if any.
    fn name(&self) -> Option<String> {
        None
    }
}

struct FnInvoke<F> {
    name: Option<String>,
    func: F,
}

impl<F> Invoke for FnInvoke<F>
where
    F: Fn(&[Value]) -> Outcome + Send + Sync,
{
    fn invoke(&self, args: &[Value]) -> Outcome {
        (self.func)(args)
    }

    fn name(&self) -> Option<String> {
        self.name.clone()
    }
}

fn infallible<F>(func: F) -> impl Fn(&[Value]) -> Outcome + Send + Sync + 'static
where
    F: Fn(&[Value]) -> Value + Send + Sync + 'static,
{
    move |args| Ok(func(args))
}

/// A cheaply clonable handle to something invocable.
///
/// Clones share the same underlying callable, and equality between
/// callables is identity of that shared target.
///
/// # Example
///
/// ```rust
/// use testkit_mock::{Callable, Value};
///
/// let foo = Callable::named("foo", |args| Value::from(format!("{} foo", args[0])));
/// assert_eq!(foo.call(&[Value::from(2)]), Ok(Value::from("2 foo")));
/// ```
#[derive(Clone)]
pub struct Callable {
    inner: Arc<dyn Invoke>,
}

impl Callable {
    /// Create a callable from a closure that always returns.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::fallible(infallible(func))
    }

    /// Create a named callable from a closure that always returns.
    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self::from_invoke(Arc::new(FnInvoke {
            name: Some(name.into()),
            func: infallible(func),
        }))
    }

    /// Create a callable from a closure that may throw by returning `Err`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use testkit_mock::{Callable, Value};
    ///
    /// let boom = Callable::fallible(|_| Err(Value::from("boom")));
    /// assert_eq!(boom.call(&[]), Err(Value::from("boom")));
    /// ```
    pub fn fallible<F>(func: F) -> Self
    where
        F: Fn(&[Value]) -> Outcome + Send + Sync + 'static,
    {
        Self::from_invoke(Arc::new(FnInvoke { name: None, func }))
    }

    /// Wrap an existing shared invocable.
    pub fn from_invoke(inner: Arc<dyn Invoke>) -> Self {
        Self { inner }
    }

    /// Invoke the callable.
    pub fn call(&self, args: &[Value]) -> Outcome {
        self.inner.invoke(args)
    }

    /// The callable's name, if it has one.
    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.inner.name()
    }

    /// Whether both handles point at the same callable.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::as_ptr(&self.inner).cast::<()>() == Arc::as_ptr(&other.inner).cast::<()>()
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "[Function {name}]"),
            None => f.write_str("[Function (anonymous)]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callable_returns() {
        let double = Callable::new(|args| match args.first() {
            Some(Value::Number(n)) => Value::Number(n * 2.0),
            _ => Value::Undefined,
        });

        assert_eq!(double.call(&[Value::from(21)]), Ok(Value::from(42)));
        assert_eq!(double.call(&[]), Ok(Value::Undefined));
    }

    #[test]
    fn test_callable_throws() {
        let failing = Callable::fallible(|args| Err(args[0].clone()));
        assert_eq!(failing.call(&[Value::from("nope")]), Err(Value::from("nope")));
    }

    #[test]
    fn test_callable_identity() {
        let a = Callable::new(|_| Value::Null);
        let b = Callable::new(|_| Value::Null);
        let a2 = a.clone();

        assert_eq!(a, a2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_callable_debug() {
        let named = Callable::named("foo", |_| Value::Undefined);
        let anonymous = Callable::new(|_| Value::Undefined);

        assert_eq!(format!("{named:?}"), "[Function foo]");
        assert_eq!(format!("{anonymous:?}"), "[Function (anonymous)]");
    }
}
