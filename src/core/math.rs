//! Arithmetic built-ins: `+ - * / **` and unary `neg` (§4.6).

use num_traits::Zero;

use crate::common::span::Span;
use crate::common::value::Value;
use crate::vm::trace::{RuntimeKind, Trace};

fn expect_integer(value: &Value, span: &Span) -> Result<num_bigint::BigInt, Trace> {
    match value {
        Value::Integer(n) => Ok(n.clone()),
        other => Err(Trace::error(
            RuntimeKind::TypeMismatch,
            format!("expected an integer, found a {}", other.type_name()),
            span.clone(),
        )),
    }
}

pub fn add(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Integer(expect_integer(left, span)? + expect_integer(right, span)?))
}

pub fn sub(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Integer(expect_integer(left, span)? - expect_integer(right, span)?))
}

pub fn mul(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Integer(expect_integer(left, span)? * expect_integer(right, span)?))
}

pub fn div(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    let divisor = expect_integer(right, span)?;
    if divisor.is_zero() {
        return Err(Trace::error(RuntimeKind::DivisionByZero, "division by zero", span.clone()));
    }
    Ok(Value::Integer(expect_integer(left, span)? / divisor))
}

pub fn pow(left: &Value, right: &Value, span: &Span) -> Result<Value, Trace> {
    let base = expect_integer(left, span)?;
    let exponent = expect_integer(right, span)?;
    let exponent: u32 = exponent.try_into().map_err(|_| {
        Trace::error(RuntimeKind::TypeMismatch, "exponent out of range", span.clone())
    })?;
    Ok(Value::Integer(num_traits::Pow::pow(base, exponent)))
}

pub fn neg(operand: &Value, span: &Span) -> Result<Value, Trace> {
    Ok(Value::Integer(-expect_integer(operand, span)?))
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
    fn add_adds() {
        let result = add(&Value::Integer(BigInt::from(2)), &Value::Integer(BigInt::from(3)), &span());
        assert_eq!(result.unwrap(), Value::Integer(BigInt::from(5)));
    }

    #[test]
    fn div_by_zero_is_runtime_error() {
        let err = div(&Value::Integer(BigInt::from(1)), &Value::Integer(BigInt::from(0)), &span());
        assert_eq!(err.unwrap_err().kind, RuntimeKind::DivisionByZero);
    }

    #[test]
    fn pow_raises_to_power() {
        let result = pow(&Value::Integer(BigInt::from(2)), &Value::Integer(BigInt::from(10)), &span());
        assert_eq!(result.unwrap(), Value::Integer(BigInt::from(1024)));
    }
}
