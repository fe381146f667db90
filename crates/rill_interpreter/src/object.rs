use std::{cell::RefCell, fmt::Display, rc::Rc};

use crate::environment::Environment;
use crate::error::RuntimeError;

use rill_parser::ast::{Block, IdentifierLiteral};

/// A first-class runtime value.
#[derive(Debug, PartialEq)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    Function(Function),
    /// Special object that carries a return-ed value up the scope chain.
    /// This is never seen by the user.
    ReturnValue(Rc<Object>),
    Error(RuntimeError),
}

impl Object {
    pub fn typename(&self) -> &'static str {
        use Object::*;

        match self {
            Integer(_) => "Integer",
            Boolean(_) => "Boolean",
            String(_) => "String",
            Null => "Null",
            Function(_) => "Function",
            ReturnValue(obj) => obj.typename(),
            Error(_) => "Error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl Display for Object {
    /// The inspection rendering shown by the REPL and asserted by tests.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Object::*;

        match self {
            Integer(value) => write!(f, "{}", value),
            Boolean(value) => write!(f, "{}", value),
            String(value) => write!(f, "{}", value),
            Null => write!(f, "null"),
            Function(func) => write!(f, "{}", func),
            ReturnValue(obj) => write!(f, "{}", obj),
            Error(err) => write!(f, "ERROR: {}", err),
        }
    }
}

/// A function value: parameters, a body shared with the AST literal that
/// produced it, and the environment captured at the definition site.
#[derive(Debug)]
pub struct Function {
    pub parameters: Vec<IdentifierLiteral>,
    pub body: Rc<Block>,
    pub env: Rc<RefCell<Environment>>,
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let params: Vec<String> = self.parameters.iter().map(|p| p.to_string()).collect();

        write!(f, "fn({}) {{ {} }}", params.join(", "), self.body)
    }
}

impl PartialEq for Function {
    fn eq(&self, _: &Function) -> bool {
        // Function values have no language-level equality
        panic!("PartialEq is not implemented for `Function`");
    }
}

#[cfg(test)]
mod tests {
    use crate::object::Object;

    #[test]
    fn inspect_primitives() {
        assert_eq!(Object::Integer(5).to_string(), "5");
        assert_eq!(Object::Integer(-42).to_string(), "-42");
        assert_eq!(Object::Boolean(true).to_string(), "true");
        assert_eq!(Object::Boolean(false).to_string(), "false");
        assert_eq!(Object::String("hello world".to_owned()).to_string(), "hello world");
        assert_eq!(Object::Null.to_string(), "null");
    }

    #[test]
    fn typenames() {
        assert_eq!(Object::Integer(1).typename(), "Integer");
        assert_eq!(Object::Boolean(true).typename(), "Boolean");
        assert_eq!(Object::String("".to_owned()).typename(), "String");
        assert_eq!(Object::Null.typename(), "Null");
    }

    #[test]
    fn return_value_is_transparent() {
        use std::rc::Rc;

        let wrapped = Object::ReturnValue(Rc::new(Object::Integer(7)));
        assert_eq!(wrapped.to_string(), "7");
        assert_eq!(wrapped.typename(), "Integer");
    }
}
