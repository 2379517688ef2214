//! §6 `Print` value rendering: integers in decimal, strings verbatim,
//! truth values as `true`/`false`, tuples as `(v1, v2, …)` rendered
//! recursively, functions as `[lambda closure: bv]`, `dummy` as
//! `dummy`, `nil` as `nil`.

use crate::common::value::Value;

pub fn render(value: &Value) -> String {
    match value {
        Value::Integer(n) => n.to_string(),
        Value::Str(s) => s.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Nil => "nil".to_string(),
        Value::Dummy => "dummy".to_string(),
        Value::Tuple(items) => {
            let rendered: Vec<String> = items.iter().map(render).collect();
            format!("({})", rendered.join(", "))
        }
        Value::Closure(closure) | Value::EtaClosure(closure) => {
            format!("[lambda closure: {}]", closure.bound.label())
        }
        Value::Builtin(_) | Value::Partial { .. } => "[lambda closure: bv]".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use num_bigint::BigInt;
    use std::rc::Rc;

    #[test]
    fn tuple_renders_recursively() {
        let tuple = Value::Tuple(Rc::new(vec![
            Value::Integer(BigInt::from(1)),
            Value::Str(Rc::from("x")),
            Value::Bool(true),
        ]));
        assert_eq!(render(&tuple), "(1, x, true)");
    }

    #[test]
    fn leaf_values_render_plainly() {
        assert_eq!(render(&Value::Nil), "nil");
        assert_eq!(render(&Value::Dummy), "dummy");
        assert_eq!(render(&Value::Bool(false)), "false");
    }
}
