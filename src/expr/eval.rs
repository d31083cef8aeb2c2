//! Tree-walking evaluator.

use super::error::EvalError;
use super::parser::{Ast, BinaryOp, Statement, UnaryOp};
use super::value::{Scope, Value};
use std::cmp::Ordering;

pub(crate) fn evaluate<S: Scope + ?Sized>(ast: &Ast, scope: &S) -> Result<Value, EvalError> {
    match ast {
        Ast::Literal(value) => Ok(*value),
        Ast::Var(name) => scope
            .lookup(name)
            .ok_or_else(|| EvalError::UnknownVariable { name: name.clone() }),
        Ast::Unary(op, operand) => unary(*op, evaluate(operand, scope)?),
        Ast::Binary(BinaryOp::And, lhs, rhs) => {
            if !logical_operand(BinaryOp::And, evaluate(lhs, scope)?)? {
                return Ok(Value::Bool(false));
            }
            logical_operand(BinaryOp::And, evaluate(rhs, scope)?).map(Value::Bool)
        }
        Ast::Binary(BinaryOp::Or, lhs, rhs) => {
            if logical_operand(BinaryOp::Or, evaluate(lhs, scope)?)? {
                return Ok(Value::Bool(true));
            }
            logical_operand(BinaryOp::Or, evaluate(rhs, scope)?).map(Value::Bool)
        }
        Ast::Binary(op, lhs, rhs) => binary(*op, evaluate(lhs, scope)?, evaluate(rhs, scope)?),
    }
}

pub(crate) fn execute<S: Scope + ?Sized>(
    statements: &[Statement],
    scope: &mut S,
) -> Result<(), EvalError> {
    for statement in statements {
        match statement {
            Statement::Assign(name, ast) => {
                let value = evaluate(ast, scope)?;
                scope.assign(name, value)?;
            }
            Statement::Eval(ast) => {
                evaluate(ast, scope)?;
            }
        }
    }
    Ok(())
}

fn logical_operand(op: BinaryOp, value: Value) -> Result<bool, EvalError> {
    value.as_bool().ok_or_else(|| EvalError::TypeMismatch {
        op: op.symbol().to_string(),
        operands: value.type_name().to_string(),
    })
}

fn unary(op: UnaryOp, value: Value) -> Result<Value, EvalError> {
    match (op, value) {
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        (UnaryOp::Neg, Value::Int(i)) => i
            .checked_neg()
            .map(Value::Int)
            .ok_or_else(|| EvalError::Overflow { op: "-".to_string() }),
        (UnaryOp::Neg, Value::Float(x)) => Ok(Value::Float(-x)),
        (op, value) => Err(EvalError::TypeMismatch {
            op: match op {
                UnaryOp::Not => "not".to_string(),
                UnaryOp::Neg => "-".to_string(),
            },
            operands: value.type_name().to_string(),
        }),
    }
}

fn binary(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = equals(op, lhs, rhs)?;
            Ok(Value::Bool(if op == BinaryOp::Eq { equal } else { !equal }))
        }
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
            // Unordered operands (NaN) fail every comparison.
            let holds = compare(op, lhs, rhs)?.is_some_and(|ordering| match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::Le => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            });
            Ok(Value::Bool(holds))
        }
        _ => arithmetic(op, lhs, rhs),
    }
}

fn mismatch(op: BinaryOp, lhs: Value, rhs: Value) -> EvalError {
    EvalError::TypeMismatch {
        op: op.symbol().to_string(),
        operands: format!("{} and {}", lhs.type_name(), rhs.type_name()),
    }
}

fn equals(op: BinaryOp, lhs: Value, rhs: Value) -> Result<bool, EvalError> {
    match (lhs, rhs) {
        (Value::Bool(a), Value::Bool(b)) => Ok(a == b),
        (Value::Int(a), Value::Int(b)) => Ok(a == b),
        (Value::Bool(_), _) | (_, Value::Bool(_)) => Err(mismatch(op, lhs, rhs)),
        _ => {
            let (a, b) = numeric(op, lhs, rhs)?;
            Ok(a == b)
        }
    }
}

fn compare(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Option<Ordering>, EvalError> {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        return Ok(Some(a.cmp(&b)));
    }
    let (a, b) = numeric(op, lhs, rhs)?;
    Ok(a.partial_cmp(&b))
}

fn numeric(op: BinaryOp, lhs: Value, rhs: Value) -> Result<(f64, f64), EvalError> {
    match (lhs.as_f64(), rhs.as_f64()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(mismatch(op, lhs, rhs)),
    }
}

fn arithmetic(op: BinaryOp, lhs: Value, rhs: Value) -> Result<Value, EvalError> {
    if let (Value::Int(a), Value::Int(b)) = (lhs, rhs) {
        let overflow = || EvalError::Overflow {
            op: op.symbol().to_string(),
        };
        return match op {
            BinaryOp::Add => a.checked_add(b).map(Value::Int).ok_or_else(overflow),
            BinaryOp::Sub => a.checked_sub(b).map(Value::Int).ok_or_else(overflow),
            BinaryOp::Mul => a.checked_mul(b).map(Value::Int).ok_or_else(overflow),
            BinaryOp::Rem if b == 0 => Err(EvalError::DivisionByZero),
            BinaryOp::Rem => a.checked_rem_euclid(b).map(Value::Int).ok_or_else(overflow),
            BinaryOp::Div if b == 0 => Err(EvalError::DivisionByZero),
            _ => Ok(Value::Float(a as f64 / b as f64)),
        };
    }

    let (a, b) = numeric(op, lhs, rhs)?;
    match op {
        BinaryOp::Add => Ok(Value::Float(a + b)),
        BinaryOp::Sub => Ok(Value::Float(a - b)),
        BinaryOp::Mul => Ok(Value::Float(a * b)),
        BinaryOp::Div | BinaryOp::Rem if b == 0.0 => Err(EvalError::DivisionByZero),
        BinaryOp::Div => Ok(Value::Float(a / b)),
        _ => Ok(Value::Float(a.rem_euclid(b))),
    }
}
