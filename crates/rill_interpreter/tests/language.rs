//! End-to-end tests driving the whole pipeline through the public API, the
//! way the REPL and the script runner do.

use std::cell::RefCell;
use std::rc::Rc;

use rill_interpreter::{Environment, Evaluator};
use rill_parser::{lexer::Lexer, parser::Parser};

/// Run a source string in a fresh environment and return the inspection of
/// the resulting value. Panics on parse errors.
fn run(src: &str) -> String {
    let lexer = Lexer::new(src);
    let mut parser = Parser::new(lexer);

    match parser.parse_program() {
        Ok(prog) => Evaluator::new().eval(prog).to_string(),
        Err(errors) => {
            for error in &errors {
                eprintln!("parser error: {}", error);
            }
            panic!("unexpected parse errors for '{}'", src)
        }
    }
}

/// Parse a source string and return the rendered error list (empty when the
/// parse succeeded).
fn parse_errors(src: &str) -> Vec<String> {
    let lexer = Lexer::new(src);
    let mut parser = Parser::new(lexer);

    match parser.parse_program() {
        Ok(_) => Vec::new(),
        Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
    }
}

/// Feed lines one at a time into a shared environment, like a REPL session,
/// and return the inspection of each line's value.
fn session(lines: &[&str]) -> Vec<String> {
    let env = Rc::new(RefCell::new(Environment::new()));
    let mut results = Vec::new();

    for line in lines {
        let lexer = Lexer::new(line);
        let mut parser = Parser::new(lexer);

        let prog = match parser.parse_program() {
            Ok(prog) => prog,
            Err(_) => panic!("unexpected parse errors for '{}'", line),
        };

        let mut evaluator = Evaluator::new_with_env(Rc::clone(&env));
        results.push(evaluator.eval(prog).to_string());
    }

    results
}

#[test]
fn recursion() {
    let factorial = "
        let factorial = fn(n) {
          if (n < 2) { 1 } else { n * factorial(n - 1) }
        };
        factorial(5);
    ";
    assert_eq!(run(factorial), "120");

    let fibonacci = "
        let fib = fn(n) {
          if (n < 2) { n } else { fib(n - 1) + fib(n - 2) }
        };
        fib(10);
    ";
    assert_eq!(run(fibonacci), "55");
}

#[test]
fn higher_order_functions() {
    let apply = "
        let apply = fn(f, x) { f(x) };
        let double = fn(x) { x * 2 };
        apply(double, 21);
    ";
    assert_eq!(run(apply), "42");

    let compose = "
        let compose = fn(f, g) { fn(x) { g(f(x)) } };
        let inc = fn(x) { x + 1 };
        let double = fn(x) { x * 2 };
        let incThenDouble = compose(inc, double);
        incThenDouble(4);
    ";
    assert_eq!(run(compose), "10");
}

#[test]
fn closures_keep_their_environment() {
    let input = "
        let newAdder = fn(x) { fn(y) { x + y } };
        let addTwo = newAdder(2);
        let addTen = newAdder(10);
        addTwo(3) + addTen(3);
    ";
    assert_eq!(run(input), "18");
}

#[test]
fn return_stops_the_function_body() {
    assert_eq!(run("let f = fn() { return 1; 2 }; f();"), "1");
    assert_eq!(
        run("let f = fn(x) { if (x) { return 1; } return 2; }; f(true) + f(false);"),
        "3"
    );
}

#[test]
fn truthiness_in_conditionals() {
    let input = "
        let classify = fn(x) { if (x) { \"truthy\" } else { \"falsy\" } };
        classify(0) + \" \" + classify(false) + \" \" + classify(\"\");
    ";
    assert_eq!(run(input), "truthy falsy truthy");
}

#[test]
fn errors_propagate_through_call_chains() {
    let input = "
        let boom = fn() { 1 / 0 };
        let f = fn() { boom() + 1 };
        f();
    ";
    assert_eq!(run(input), "ERROR: division by zero");

    assert_eq!(
        run("let f = fn(x) { x + 1 }; f(true);"),
        "ERROR: type mismatch: Boolean + Integer"
    );
}

#[test]
fn session_state_persists_across_lines() {
    let results = session(&[
        "let counter = 0;",
        "let bump = fn(n) { n + 1 };",
        "let counter = bump(counter);",
        "let counter = bump(counter);",
        "counter",
    ]);

    assert_eq!(results, vec!["null", "null", "null", "null", "2"]);
}

#[test]
fn closures_see_later_bindings_in_their_scope() {
    let results = session(&[
        "let shout = fn() { greeting + \"!\" };",
        "let greeting = \"hello\";",
        "shout()",
    ]);

    assert_eq!(results[2], "hello!");
}

#[test]
fn parse_errors_leave_nothing_to_evaluate() {
    let errors = parse_errors("let x = ;");
    assert!(!errors.is_empty());
    assert_eq!(errors[0], "No prefix parse function for token ;");

    // Several malformed statements surface in one pass
    let errors = parse_errors("let 5 = 3; return 1");
    assert!(errors.len() >= 2, "expected multiple errors, got {:?}", errors);

    assert!(parse_errors("let x = 5; x + 1;").is_empty());
}

#[test]
fn rendered_programs_evaluate_identically() {
    let sources = vec![
        "5 + 5 * 2;",
        "let add = fn(a, b) { a + b }; add(1, add(2, 3));",
        "let x = 2 * (3 + 4); x - 5;",
    ];

    for src in sources {
        let lexer = Lexer::new(src);
        let mut parser = Parser::new(lexer);
        let prog = parser.parse_program().expect("parse failed");
        let rendered = prog.to_string();

        let original = Evaluator::new().eval(prog).to_string();
        assert_eq!(
            run(&rendered),
            original,
            "rendering of '{}' changed its value",
            src
        );
    }
}
