//! Type-predicate and tuple built-ins: `Isinteger`, `Isstring`,
//! `Istruthvalue`, `Isfunction`, `Istuple`, `Isdummy`, `Order`, `Null`
//! (§4.6, §4.6's tuple-indexing invariant).

use crate::common::span::Span;
use crate::common::value::Value;
use crate::vm::trace::{RuntimeKind, Trace};

pub fn is_integer(operand: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(matches!(operand, Value::Integer(_))))
}

pub fn is_string(operand: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(matches!(operand, Value::Str(_))))
}

pub fn is_truthvalue(operand: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(matches!(operand, Value::Bool(_))))
}

pub fn is_function(operand: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(operand.is_function()))
}

pub fn is_tuple(operand: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(matches!(operand, Value::Tuple(_) | Value::Nil)))
}

pub fn is_dummy(operand: &Value, _span: &Span) -> Result<Value, Trace> {
    Ok(Value::Bool(matches!(operand, Value::Dummy)))
}

/// `Order T` is the arity of tuple `T`; `Order nil` is `0`.
pub fn order(operand: &Value, span: &Span) -> Result<Value, Trace> {
    match operand {
        Value::Tuple(items) => Ok(Value::Integer(items.len().into())),
        Value::Nil => Ok(Value::Integer(0.into())),
        other => Err(Trace::error(
            RuntimeKind::TypeMismatch,
            format!("expected a tuple, found a {}", other.type_name()),
            span.clone(),
        )),
    }
}

/// `Null T` is true for `nil` and the empty tuple, false otherwise.
pub fn null(operand: &Value, span: &Span) -> Result<Value, Trace> {
    match operand {
        Value::Nil => Ok(Value::Bool(true)),
        Value::Tuple(items) => Ok(Value::Bool(items.is_empty())),
        other => Err(Trace::error(
            RuntimeKind::TypeMismatch,
            format!("expected a tuple, found a {}", other.type_name()),
            span.clone(),
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use std::rc::Rc;

    fn span() -> Span {
        let source = Rc::new(Source::source("x"));
        Span::new(&source, 0, 1)
    }

    #[test]
    fn order_counts_tuple_elements() {
        let tuple = Value::Tuple(Rc::new(vec![Value::Nil, Value::Nil, Value::Nil]));
        assert_eq!(order(&tuple, &span()).unwrap(), Value::Integer(3.into()));
    }

    #[test]
    fn null_is_true_for_nil() {
        assert_eq!(null(&Value::Nil, &span()).unwrap(), Value::Bool(true));
    }

    #[test]
    fn is_function_covers_builtins_and_closures() {
        assert_eq!(is_function(&Value::Builtin("Print"), &span()).unwrap(), Value::Bool(true));
        assert_eq!(is_function(&Value::Integer(0.into()), &span()).unwrap(), Value::Bool(false));
    }
}
