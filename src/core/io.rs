//! The sole built-in with an observable external effect: `Print`
//! (§4.6, §6 stdout rendering rules).

use crate::common::span::Span;
use crate::common::value::Value;
use crate::utils::render;
use crate::vm::trace::Trace;

pub fn print(operand: &Value, _span: &Span) -> Result<Value, Trace> {
    let rendered = render::render(operand);
    log::debug!("Print: {}", rendered);
    println!("{}", rendered);
    Ok(Value::Dummy)
}
