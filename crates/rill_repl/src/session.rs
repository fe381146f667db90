use std::cell::RefCell;
use std::rc::Rc;

use rill_interpreter::{object::Object, Environment, Evaluator};
use rill_parser::{lexer::Lexer, parser::Parser};

/// What came out of running one piece of source.
pub enum Outcome {
    /// The program's value. Runtime errors travel in-band as `Object::Error`,
    /// so this arm covers them too.
    Value(Rc<Object>),
    /// Rendered parse errors, in the order the parser recorded them.
    /// Nothing was evaluated.
    ParseErrors(Vec<String>),
}

/// A driver session: one environment that successive sources run against,
/// so each REPL line sees the bindings of the lines before it.
pub struct Session {
    env: Rc<RefCell<Environment>>,
}

impl Session {
    pub fn new() -> Self {
        Session {
            env: Rc::new(RefCell::new(Environment::new())),
        }
    }

    /// Feed one source string through lexer, parser and evaluator.
    /// Evaluation is skipped entirely when the parser reported anything.
    pub fn run(&self, source: &str) -> Outcome {
        let mut parser = Parser::new(Lexer::new(source));

        match parser.parse_program() {
            Ok(prog) => {
                let mut evaluator = Evaluator::new_with_env(Rc::clone(&self.env));
                Outcome::Value(evaluator.eval(prog))
            }
            Err(errors) => {
                Outcome::ParseErrors(errors.iter().map(|error| error.to_string()).collect())
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
