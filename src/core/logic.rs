//! Comparison and logical built-ins: `gr ge ls le eq ne`, `or`, `&`,
//! `not` (§4.6).

use crate::common::span::Span;
use crate::common::value::Value;
use crate::vm::trace::{RuntimeKind, Trace};

fn expect_bool(value: &Value, span: &Span) -> Result<bool, Trace> {
    match value {
        Value::Bool(b) => Ok(*b),
        other => Err(Trace::error(
            RuntimeKind::TypeMismatch,
            format!("expected a truth value, found a {}", other.type_name()),
            span.clone(),
        )),
    }
}

/// `gr`/`ge`/`ls`/`le` order integers and strings; any other pairing,
/// or a mismatched pairing, is a type error.
fn ordering(left: &Value, right: &Value, span: &Span) -> Result<std::cmp::Ordering, Trace> {
    match (left, right) {
        (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Ok(a.cmp(b)),
        _ => Err(Trace::error(
            RuntimeKind::TypeMismatch,
            format!("cannot order a {} against a {}", left.type_name(), right.type_name()),
            span.clone(),
        )),
    }
}

pub fn gr(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(ordering(left, right, span)?.is_gt()))
}

pub fn ge(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(ordering(left, right, span)?.is_ge()))
}

pub fn ls(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(ordering(left, right, span)?.is_lt()))
}

pub fn le(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(ordering(left, right, span)?.is_le()))
}

/// `eq`/`ne` compare any two values of the same type structurally;
/// values of different types are never equal.
pub fn eq(left: &Value, right: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(left == right))
}

pub fn ne(left: &Value, right: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(left != right))
}

pub fn or(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(expect_bool(left, span)? || expect_bool(right, span)?))
}

pub fn and(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(expect_bool(left, span)? && expect_bool(right, span)?))
}

pub fn not(operand: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(!expect_bool(operand, span)?))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use num_bigint::BigInt;
    use std::rc::Rc;

    fn span() -> Span {
        let source = Rc::new(Source::source("x"));
        Span::new(&source, 0, 1)
    }

    #[test]
    fn gr_orders_integers() {
        let result = gr(&Value::Integer(BigInt::from(5)), &Value::Integer(BigInt::from(3)), &span());
        assert_eq!(result.unwrap(), Value::Bool(true));
    }

    #[test]
    fn eq_is_type_sensitive() {
        let result = eq(&Value::Integer(BigInt::from(1)), &Value::Bool(true), &span());
        assert_eq!(result.unwrap(), Value::Bool(false));
    }

    #[test]
    fn not_negates() {
        assert_eq!(not(&Value::Bool(false), &span()).unwrap(), Value::Bool(true));
    }
}
