//! String built-ins: `Stem`, `Stern`, `Conc`, `ItoS` (§4.6).

use std::rc::Rc;

use crate::common::span::Span;
use crate::common::value::Value;
use crate::vm::trace::{RuntimeKind, Trace};

fn expect_str(value: &Value, span: &Span) -> Result<Rc<str>, Trace> {
    match value {
        Value::Str(s) => Ok(Rc::clone(s)),
        other => Err(Trace::error(
            RuntimeKind::TypeMismatch,
            format!("expected a string, found a {}", other.type_name()),
            span.clone(),
        )),
    }
}

/// The first character of a non-empty string.
pub fn stem(operand: &Value, span: &Span) -> Result<Value, Trace> {
    let s = expect_str(operand, span)?;
    let first = s.chars().next().map(|c| c.to_string()).unwrap_or_default();
    Ok(Value::Str(Rc::from(first.as_str())))
}

/// Every character after the first.
pub fn stern(operand: &Value, span: &Span) -> Result<Value, Trace> {
    let s = expect_str(operand, span)?;
    let rest: String = s.chars().skip(1).collect();
    Ok(Value::Str(Rc::from(rest.as_str())))
}

pub fn conc(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    let left = expect_str(left, span)?;
    let right = expect_str(right, span)?;
    Ok(Value::Str(Rc::from(format!("{}{}", left, right).as_str())))
}

pub fn ito_s(operand: &Value, span: &Span) -> Result<Value, Trace> {
    match operand {
        Value::Integer(n) => Ok(Value::Str(Rc::from(n.to_string().as_str()))),
        other => Err(Trace::error(
            RuntimeKind::TypeMismatch,
            format!("expected an integer, found a {}", other.type_name()),
            span.clone(),
        )),
    }
}
