use std::{fmt::Display, rc::Rc};

use crate::object::Object;
use rill_parser::token::Token;

/// A dynamic evaluation failure. Runtime errors travel in-band as
/// `Object::Error` and short-circuit every enclosing expression; there is no
/// catch construct in the language.
#[derive(Debug, PartialEq)]
pub enum RuntimeError {
    /// When an infix operation is applied to operands of different types
    /// (e.g. `5 + true`)
    TypeMismatch(Token, Rc<Object>, Rc<Object>),
    /// When a prefix operator is applied to a type it is not defined for
    /// (e.g. `-true`)
    UnknownPrefixOperator(Token, Rc<Object>),
    /// When an infix operator is not defined for matching operand types
    /// (e.g. `true + false`)
    UnknownInfixOperator(Token, Rc<Object>, Rc<Object>),
    /// When referencing an identifier that has not been bound
    IdentifierNotFound(String),
    /// When an object that is not a function is used with call syntax
    NotAFunction(Rc<Object>),
    /// When a call's argument count does not match the function's parameter count
    WrongNumberOfArguments,
    /// Integer division with a zero divisor
    DivisionByZero,
}

impl Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use RuntimeError::*;

        match self {
            TypeMismatch(operator, left, right) => write!(
                f,
                "type mismatch: {} {} {}",
                left.typename(),
                operator,
                right.typename()
            ),
            UnknownPrefixOperator(operator, right) => {
                write!(f, "unknown operator: {}{}", operator, right.typename())
            }
            UnknownInfixOperator(operator, left, right) => write!(
                f,
                "unknown operator: {} {} {}",
                left.typename(),
                operator,
                right.typename()
            ),
            IdentifierNotFound(name) => write!(f, "identifier not found: {}", name),
            NotAFunction(obj) => write!(f, "not a function: {}", obj.typename()),
            WrongNumberOfArguments => write!(f, "wrong number of arguments"),
            DivisionByZero => write!(f, "division by zero"),
        }
    }
}
