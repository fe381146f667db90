use rustyline::error::ReadlineError;
use rustyline::Editor;

use crate::session::{Outcome, Session};

const PROMPT: &str = ">>> ";

/// Interactive prompt. All lines run in a single session, so bindings
/// survive from line to line.
pub fn repl() {
    println!("rill v{}", env!("CARGO_PKG_VERSION"));

    let session = Session::new();

    // `()` can be used when no completer is required
    let mut rl = Editor::<()>::new();

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(line) => line,
            // Ctrl-C and Ctrl-D both end the session
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {:?}", err);
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "exit" || input == "quit" {
            break;
        }

        rl.add_history_entry(input);

        match session.run(input) {
            // Runtime errors are values and print through the same arm,
            // as `ERROR: ...`
            Outcome::Value(value) => println!("{}", value),
            Outcome::ParseErrors(errors) => {
                println!("Parser errors:");
                for error in errors {
                    println!("\t{}", error);
                }
            }
        }
    }
}
