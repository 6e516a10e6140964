//! Fixture modules shared by the integration tests.
//!
//! `functions` holds three small string builders and `main` stitches their
//! results together, always calling through whatever the `functions`
//! module binds at that moment.

#![allow(dead_code)]

use testkit_mock::{args, Callable, Module, Outcome, Value};

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// `foo(n) = "n foo"`, `bar(n) = "n bar"`, `foobar(cb) = cb(10) + " foobar"`.
pub fn functions() -> Module {
    Module::new("functions")
        .with_fn("foo", |args| Value::from(format!("{} foo", arg(args, 0))))
        .with_fn("bar", |args| Value::from(format!("{} bar", arg(args, 0))))
        .with_capability(
            "foobar",
            Callable::fallible(|args| {
                let callback = arg(args, 0);
                let callback = callback
                    .as_callable()
                    .ok_or_else(|| Value::from("TypeError: callback is not a function"))?;
                let inner = callback.call(&args![10])?;
                Ok(Value::from(format!("{inner} foobar")))
            }),
        )
}

/// `"In main function: " + foo(2) + " " + bar(3) + " " + foobar(foo)`.
pub fn run_main(functions: &Module) -> Outcome {
    let foo = functions.call("foo", &args![2])?;
    let bar = functions.call("bar", &args![3])?;
    let callback = functions.get("foo").map_or(Value::Undefined, Value::from);
    let foobar = functions.call("foobar", &[callback])?;
    Ok(Value::from(format!("In main function: {foo} {bar} {foobar}")))
}

/// A module whose `default` capability runs [`run_main`] over `functions`.
pub fn main_module(functions: &Module) -> Module {
    let functions = functions.clone();
    Module::new("main").with_capability(
        "default",
        Callable::fallible(move |_| run_main(&functions)),
    )
}

/// `"In superMain function: " + main()`.
pub fn run_super_main(main: &Module) -> Outcome {
    let inner = main.call("default", &[])?;
    Ok(Value::from(format!("In superMain function: {inner}")))
}

/// `foobar` as a free function taking the callback directly.
pub fn foobar(functions: &Module, callback: impl Into<Value>) -> Outcome {
    functions.call("foobar", &[callback.into()])
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}
