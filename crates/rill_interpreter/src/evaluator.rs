use std::{cell::RefCell, rc::Rc};

use crate::{
    environment::Environment,
    error::RuntimeError,
    object::{Function, Object},
};

use rill_parser::{
    ast::{Block, Expression, IdentifierLiteral, Program, Statement},
    token::Token,
};

/// Tree-walking evaluator. Never panics: every dynamic failure becomes an
/// `Object::Error` that short-circuits the enclosing expressions.
pub struct Evaluator {
    env: Rc<RefCell<Environment>>,

    // Shared singletons; every boolean or null result is a clone of one of
    // these, so no literal allocates
    true_obj: Rc<Object>,
    false_obj: Rc<Object>,
    null_obj: Rc<Object>,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::new_with_env(Rc::new(RefCell::new(Environment::new())))
    }

    pub fn new_with_env(env: Rc<RefCell<Environment>>) -> Self {
        Evaluator {
            env,
            true_obj: Rc::new(Object::Boolean(true)),
            false_obj: Rc::new(Object::Boolean(false)),
            null_obj: Rc::new(Object::Null),
        }
    }

    pub fn eval(&mut self, prog: Program) -> Rc<Object> {
        let mut result = Rc::clone(&self.null_obj);

        for stmt in &prog.statements {
            let val = self.eval_statement(stmt);

            match val.as_ref() {
                // A return value stops evaluation; unwrap it into the final
                // value so the program can use it
                Object::ReturnValue(inner_value) => return Rc::clone(inner_value),
                Object::Error(_) => return val,
                _ => result = val,
            }
        }

        result
    }

    // Similar to eval (for programs) but doesn't unwrap return values: a
    // `return` in a nested block must exit the enclosing function, not
    // merely the block
    fn eval_block(&mut self, block: &Block) -> Rc<Object> {
        let mut result = Rc::clone(&self.null_obj);

        for stmt in &block.statements {
            let val = self.eval_statement(stmt);

            match val.as_ref() {
                Object::ReturnValue(_) => return val,
                Object::Error(_) => return val,
                _ => result = val,
            }
        }

        result
    }

    fn eval_statement(&mut self, stmt: &Statement) -> Rc<Object> {
        match stmt {
            Statement::Expression { expression } => self.eval_expression(expression),
            Statement::Return { value } => {
                let obj = self.eval_expression(value);

                // No need to wrap an Error in a ReturnValue since they both
                // bubble up the same way
                if obj.is_error() {
                    return obj;
                }

                Rc::new(Object::ReturnValue(obj))
            }
            Statement::Let { name, value } => {
                let obj = self.eval_expression(value);
                // Early return the first error received
                if obj.is_error() {
                    return obj;
                }

                // Bind the variable in the innermost environment
                self.env.borrow_mut().set(name.to_owned(), obj);

                Rc::clone(&self.null_obj)
            }
        }
    }

    fn eval_expression(&mut self, expr: &Expression) -> Rc<Object> {
        match expr {
            Expression::Integer(value) => Rc::new(Object::Integer(*value)),
            Expression::Boolean(value) => self.native_bool(*value),
            Expression::String(value) => Rc::new(Object::String(value.clone())),
            Expression::Identifier(identifier) => self.eval_identifier_expression(identifier),

            Expression::Prefix(prefix) => {
                let right = self.eval_expression(&prefix.right);
                // Early return the first error received
                if right.is_error() {
                    return right;
                }
                self.eval_prefix_expression(&prefix.operator, right)
            }
            Expression::Infix(infix) => {
                let left = self.eval_expression(&infix.left);
                // Early return the first error received
                if left.is_error() {
                    return left;
                }
                let right = self.eval_expression(&infix.right);
                if right.is_error() {
                    return right;
                }
                self.eval_infix_expression(&infix.operator, left, right)
            }

            Expression::If(if_expr) => self.eval_if_expression(
                &if_expr.condition,
                &if_expr.consequence,
                &if_expr.alternative,
            ),

            Expression::Function(func) => Rc::new(Object::Function(Function {
                parameters: func.parameters.clone(),
                body: Rc::clone(&func.body),
                env: Rc::clone(&self.env),
            })),
            Expression::Call(call) => {
                let func = self.eval_expression(&call.function);
                // Early return the first error received
                if func.is_error() {
                    return func;
                }
                let args = self.eval_expressions(&call.arguments);
                if args.len() == 1 && args.first().unwrap().is_error() {
                    return Rc::clone(args.first().unwrap());
                }

                self.apply_function(func, args)
            }
        }
    }

    /// Evaluate expressions left to right; the first error aborts the list
    /// and comes back as its only element.
    fn eval_expressions(&mut self, exprs: &[Expression]) -> Vec<Rc<Object>> {
        let mut result = Vec::new();
        for expr in exprs {
            let evaluated = self.eval_expression(expr);
            if evaluated.is_error() {
                return vec![evaluated];
            }
            result.push(evaluated);
        }
        result
    }

    fn eval_identifier_expression(&self, identifier: &IdentifierLiteral) -> Rc<Object> {
        match self.env.borrow().get(&identifier.name) {
            Some(obj) => obj,
            None => Rc::new(Object::Error(RuntimeError::IdentifierNotFound(
                identifier.name.clone(),
            ))),
        }
    }

    fn eval_prefix_expression(&self, operator: &Token, right: Rc<Object>) -> Rc<Object> {
        match operator {
            Token::Bang => self.eval_bang_operator_expression(right),
            Token::Minus => self.eval_minus_prefix_operator_expression(right),
            _ => Rc::new(Object::Error(RuntimeError::UnknownPrefixOperator(
                operator.clone(),
                right,
            ))),
        }
    }

    fn eval_bang_operator_expression(&self, right: Rc<Object>) -> Rc<Object> {
        match right.as_ref() {
            Object::Boolean(true) => Rc::clone(&self.false_obj),
            Object::Boolean(false) => Rc::clone(&self.true_obj),
            Object::Null => Rc::clone(&self.true_obj),
            _ => Rc::clone(&self.false_obj),
        }
    }

    fn eval_minus_prefix_operator_expression(&self, right: Rc<Object>) -> Rc<Object> {
        match right.as_ref() {
            Object::Integer(value) => Rc::new(Object::Integer(value.wrapping_neg())),
            _ => Rc::new(Object::Error(RuntimeError::UnknownPrefixOperator(
                Token::Minus,
                right,
            ))),
        }
    }

    fn eval_infix_expression(
        &self,
        operator: &Token,
        left: Rc<Object>,
        right: Rc<Object>,
    ) -> Rc<Object> {
        match (left.as_ref(), right.as_ref()) {
            (Object::Integer(left_value), Object::Integer(right_value)) => {
                self.eval_integer_infix_expression(operator, *left_value, *right_value)
            }

            (Object::Boolean(left_value), Object::Boolean(right_value)) => {
                self.eval_boolean_infix_expression(operator, *left_value, *right_value)
            }

            (Object::String(left_value), Object::String(right_value)) => {
                self.eval_string_infix_expression(operator, left_value, right_value)
            }

            // Mismatched operand types are reported differently from a
            // defined type with an undefined operator
            _ if left.typename() != right.typename() => Rc::new(Object::Error(
                RuntimeError::TypeMismatch(operator.clone(), left, right),
            )),
            _ => Rc::new(Object::Error(RuntimeError::UnknownInfixOperator(
                operator.clone(),
                left,
                right,
            ))),
        }
    }

    fn eval_integer_infix_expression(
        &self,
        operator: &Token,
        left_value: i64,
        right_value: i64,
    ) -> Rc<Object> {
        match operator {
            // Arithmetic wraps on overflow
            Token::Plus => Rc::new(Object::Integer(left_value.wrapping_add(right_value))),
            Token::Minus => Rc::new(Object::Integer(left_value.wrapping_sub(right_value))),
            Token::Star => Rc::new(Object::Integer(left_value.wrapping_mul(right_value))),
            Token::Slash => {
                if right_value == 0 {
                    Rc::new(Object::Error(RuntimeError::DivisionByZero))
                } else {
                    Rc::new(Object::Integer(left_value.wrapping_div(right_value)))
                }
            }

            Token::LessThan => self.native_bool(left_value < right_value),
            Token::GreaterThan => self.native_bool(left_value > right_value),
            Token::EqualEqual => self.native_bool(left_value == right_value),
            Token::BangEqual => self.native_bool(left_value != right_value),

            operator => Rc::new(Object::Error(RuntimeError::UnknownInfixOperator(
                operator.clone(),
                Rc::new(Object::Integer(left_value)),
                Rc::new(Object::Integer(right_value)),
            ))),
        }
    }

    fn eval_boolean_infix_expression(
        &self,
        operator: &Token,
        left_value: bool,
        right_value: bool,
    ) -> Rc<Object> {
        match operator {
            Token::EqualEqual => self.native_bool(left_value == right_value),
            Token::BangEqual => self.native_bool(left_value != right_value),

            operator => Rc::new(Object::Error(RuntimeError::UnknownInfixOperator(
                operator.clone(),
                self.native_bool(left_value),
                self.native_bool(right_value),
            ))),
        }
    }

    fn eval_string_infix_expression(
        &self,
        operator: &Token,
        left_value: &str,
        right_value: &str,
    ) -> Rc<Object> {
        match operator {
            Token::Plus => Rc::new(Object::String(left_value.to_owned() + right_value)),

            operator => Rc::new(Object::Error(RuntimeError::UnknownInfixOperator(
                operator.clone(),
                Rc::new(Object::String(left_value.to_owned())),
                Rc::new(Object::String(right_value.to_owned())),
            ))),
        }
    }

    fn eval_if_expression(
        &mut self,
        condition: &Expression,
        consequence: &Block,
        alternative: &Option<Block>,
    ) -> Rc<Object> {
        let evaluated_condition = self.eval_expression(condition);
        // Early return the first error received
        if evaluated_condition.is_error() {
            return evaluated_condition;
        }

        if is_truthy(&evaluated_condition) {
            self.eval_block(consequence)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative)
        } else {
            Rc::clone(&self.null_obj)
        }
    }

    fn apply_function(&mut self, func: Rc<Object>, args: Vec<Rc<Object>>) -> Rc<Object> {
        match func.as_ref() {
            Object::Function(func) => {
                if args.len() != func.parameters.len() {
                    return Rc::new(Object::Error(RuntimeError::WrongNumberOfArguments));
                }

                // Remember the caller environment for when the call exits
                let current_env = Rc::clone(&self.env);
                // The call scope encloses the captured environment, not the
                // caller's: lexical scoping
                let mut scoped_env = Environment::new_enclosed(Rc::clone(&func.env));

                // Bind arguments to parameters by position
                for (ident, obj) in func.parameters.iter().zip(args.iter()) {
                    scoped_env.set(ident.name.clone(), Rc::clone(obj));
                }

                self.env = Rc::new(RefCell::new(scoped_env));

                let result = self.eval_block(&func.body);

                self.env = current_env;

                // Unwrap a single ReturnValue at the call boundary
                match result.as_ref() {
                    Object::ReturnValue(inner) => Rc::clone(inner),
                    _ => result,
                }
            }
            _ => Rc::new(Object::Error(RuntimeError::NotAFunction(func))),
        }
    }

    fn native_bool(&self, value: bool) -> Rc<Object> {
        if value {
            Rc::clone(&self.true_obj)
        } else {
            Rc::clone(&self.false_obj)
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new()
    }
}

/// Only `false` and `null` are falsy; everything else, including `0` and the
/// empty string, is truthy.
fn is_truthy(obj: &Object) -> bool {
    !matches!(obj, Object::Boolean(false) | Object::Null)
}
