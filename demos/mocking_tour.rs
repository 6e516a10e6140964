//! Example: Mock functions, spies and module substitution
//!
//! This example walks through testkit-mock's building blocks using a small
//! `functions` module and a `main` that calls through it.

use testkit_mock::prelude::*;

fn main() {
    println!("🧰 testkit-mock - Mocking Tour\n");

    example_mock_function();
    example_spies();
    example_module_substitution();
    example_clear_and_reset();

    println!("\n✅ All mocking examples completed!");
}

fn functions() -> Module {
    Module::new("functions")
        .with_fn("foo", |args| Value::from(format!("{} foo", args[0])))
        .with_fn("bar", |args| Value::from(format!("{} bar", args[0])))
}

fn run_main(functions: &Module) -> Outcome {
    let foo = functions.call("foo", &args![2])?;
    let bar = functions.call("bar", &args![3])?;
    Ok(Value::from(format!("In main function: {foo} {bar}")))
}

fn show(label: &str, outcome: &Outcome) {
    match outcome {
        Ok(value) => println!("   {label}: {value}"),
        Err(thrown) => println!("   {label}: ❌ threw {thrown}"),
    }
}

/// Once-behaviors stack in front of the default
fn example_mock_function() {
    println!("📌 Example 1: Mock Function - Stacking Behaviors");

    let mock = MockFunction::named("foo");
    mock.mock_implementation_once(|args| Value::from(format!("{} mocked foo", args[0])))
        .mock_implementation_once(|args| Value::from(format!("{} mocked again foo", args[0])))
        .mock_implementation(|args| Value::from(format!("{} mocked infinitely foo", args[0])));

    for i in 1..=4 {
        show(&format!("Call {i}"), &mock.call(&args![10]));
    }

    println!("   📊 Calls recorded: {}", mock.call_count());
    println!();
}

/// A spy watches the real function and can override it for a call
fn example_spies() {
    println!("📌 Example 2: Spies - Watching Real Functions");

    let functions = functions();
    let foo = match spy_on(&functions, "foo") {
        Ok(spy) => spy,
        Err(err) => {
            println!("   ❌ {err}");
            return;
        }
    };

    show("Real", &run_main(&functions));
    foo.mock_implementation_once(|args| Value::from(format!("{} mocked foo", args[0])));
    show("Mocked once", &run_main(&functions));
    show("Back to real", &run_main(&functions));

    println!("   Called with 2: {}", foo.was_called_with(&args![2]));
    foo.restore();
    println!("   Restored, still overridden: {}", functions.is_overridden("foo"));
    println!();
}

/// Replacing a module totally or partially
fn example_module_substitution() {
    println!("📌 Example 3: Module Substitution - Total and Partial");

    let source = functions();

    show("Automocked", &run_main(&automock(&source)));

    let partial = Substitution::partial()
        .replace_fn("bar", |args| Value::from(format!("{} mocked bar", args[0])))
        .apply(&source);
    match partial {
        Ok(module) => show("Partial", &run_main(&module)),
        Err(err) => println!("   ❌ {err}"),
    }

    match Substitution::partial().mock("baz").apply(&source) {
        Ok(_) => println!("   Unexpectedly accepted an unknown capability"),
        Err(err) => println!("   Unknown capability rejected: {err}"),
    }
    println!();
}

/// Clear forgets calls, reset forgets behaviors too
fn example_clear_and_reset() {
    println!("📌 Example 4: Clear and Reset");

    let bar = MockFunction::named("bar");
    bar.mock_return_value("99 bars");
    let _ = bar.call(&args![3]);
    let _ = bar.call(&args![3]);
    println!("   Calls before clear: {}", bar.call_count());

    bar.clear();
    show("After clear", &bar.call(&args![3]));

    bar.reset();
    show("After reset", &bar.call(&args![3]));
    println!("   Calls after reset: {}", bar.call_count());
}
