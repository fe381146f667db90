use std::env;
use std::fs;
use std::process;

mod repl;
mod session;

use session::{Outcome, Session};

fn main() {
    let args: Vec<String> = env::args().collect();

    match args.len() {
        1 => repl::repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("usage: rill [script]");
            process::exit(1);
        }
    }
}

/// Run a source file in a fresh session and print the inspection of the
/// program's value.
fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading '{}': {}", path, err);
            process::exit(1);
        }
    };

    match Session::new().run(&source) {
        Outcome::Value(value) => {
            println!("{}", value);

            if value.is_error() {
                process::exit(1);
            }
        }
        Outcome::ParseErrors(errors) => {
            eprintln!("Parser errors:");
            for error in errors {
                eprintln!("\t{}", error);
            }
            process::exit(1);
        }
    }
}
