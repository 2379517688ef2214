//! §4.5 CSE Machine — the Control/Stack/Environment triple and its
//! eight numbered rules. Grounded on the teacher's `vm/vm.rs` step-loop
//! shape (`step()` dispatches on the next control element, `run()`
//! drives `step()` to completion), replacing the byte-indexed
//! instruction pointer with a control queue of [`CtrlElem`]s, since
//! elements here are not byte-encoded.

use std::collections::VecDeque;
use std::rc::Rc;

use num_traits::ToPrimitive;

use crate::common::control::{CtrlElem, Delta, Program};
use crate::common::env::{EnvId, EnvTable};
use crate::common::source::Source;
use crate::common::span::{Span, Spanned};
use crate::common::value::{Closure, Value};
use crate::construct::standard::BoundVar;
use crate::core;
use crate::vm::trace::{RuntimeKind, Trace};

/// An item on the CSE machine's stack: either a value, or a marker
/// recording the environment active when a closure's body was entered,
/// so rule 8 knows where to unwind back to.
#[derive(Debug, Clone)]
enum StackItem {
    Value(Value),
    EnvMarker(EnvId),
}

pub struct Machine {
    control: VecDeque<Spanned<CtrlElem>>,
    stack: Vec<StackItem>,
    env: EnvId,
    env_stack: Vec<EnvId>,
    table: EnvTable,
    program: Program,
    eof: Span,
}

impl Machine {
    /// Runs a flattened program to completion, returning its single
    /// final value or the first runtime fault encountered.
    pub fn run(source: Rc<Source>, program: Program) -> Result<Value, Trace> {
        let mut table = EnvTable::new();
        core::install(&mut table);
        let eof = Span::point(&source, source.contents.len());
        let root_delta = program.delta(0).clone();

        let mut machine = Machine {
            control: VecDeque::from(root_delta),
            stack: Vec::new(),
            env: table.root(),
            env_stack: Vec::new(),
            table,
            program,
            eof,
        };
        machine.run_to_completion()
    }

    fn run_to_completion(&mut self) -> Result<Value, Trace> {
        while let Some(elem) = self.control.pop_front() {
            self.step(elem)?;
        }

        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(StackItem::Value(value)), true) => Ok(value),
            _ => Err(Trace::error(
                RuntimeKind::TypeMismatch,
                "machine halted without exactly one result value on the stack",
                self.eof.clone(),
            )),
        }
    }

    fn step(&mut self, elem: Spanned<CtrlElem>) -> Result<(), Trace> {
        let span = elem.span.clone();
        match elem.item {
            CtrlElem::Integer(n) => self.push(Value::Integer(n)),
            CtrlElem::Str(s) => self.push(Value::Str(Rc::from(s.as_str()))),
            CtrlElem::Bool(b) => self.push(Value::Bool(b)),
            CtrlElem::Nil => self.push(Value::Nil),
            CtrlElem::Dummy => self.push(Value::Dummy),
            CtrlElem::YStar => self.push(Value::Builtin("Y*")),
            CtrlElem::Name(name) => {
                let value = self
                    .table
                    .lookup(self.env, &name)
                    .cloned()
                    .ok_or_else(|| Trace::error(RuntimeKind::UnboundIdentifier, format!("'{}' is not bound", name), span))?;
                self.push(value);
            }
            CtrlElem::Lambda { delta, bound } => {
                self.push(Value::Closure(Rc::new(Closure { delta, bound, env: self.env })));
            }
            CtrlElem::Gamma => self.apply_gamma(span)?,
            CtrlElem::Tau(n) => {
                let mut items = Vec::with_capacity(n);
                for _ in 0..n {
                    items.push(self.pop_value(&span)?);
                }
                items.reverse();
                self.push(Value::Tuple(Rc::new(items)));
            }
            CtrlElem::Aug => {
                let right = self.pop_value(&span)?;
                let left = self.pop_value(&span)?;
                let result = self.augment(left, right, &span)?;
                self.push(result);
            }
            CtrlElem::Beta { then_delta, else_delta } => {
                let cond = self.pop_value(&span)?;
                let truth = match cond {
                    Value::Bool(b) => b,
                    other => {
                        return Err(Trace::error(
                            RuntimeKind::InvalidConditional,
                            format!("expected a truth value, found a {}", other.type_name()),
                            span,
                        ))
                    }
                };
                let target = if truth { then_delta } else { else_delta };
                let branch = self.program.delta(target).clone();
                self.splice_front(branch);
            }
            CtrlElem::EnvMarker(expected) => self.exit_env(expected, &span)?,
            CtrlElem::PushValue(value) => self.push(value),
        }
        Ok(())
    }

    fn push(&mut self, value: Value) {
        self.stack.push(StackItem::Value(value));
    }

    fn pop_value(&mut self, span: &Span) -> Result<Value, Trace> {
        match self.stack.pop() {
            Some(StackItem::Value(value)) => Ok(value),
            _ => Err(Trace::error(
                RuntimeKind::TypeMismatch,
                "the machine's stack underflowed (internal error)",
                span.clone(),
            )),
        }
    }

    fn splice_front(&mut self, elements: Delta) {
        for elem in elements.into_iter().rev() {
            self.control.push_front(elem);
        }
    }

    // -- rule 3: apply --------------------------------------------------

    fn apply_gamma(&mut self, span: Span) -> Result<(), Trace> {
        let rand = self.pop_value(&span)?;
        let rator = self.pop_value(&span)?;
        self.apply(rator, rand, span)
    }

    fn apply(&mut self, rator: Value, rand: Value, span: Span) -> Result<(), Trace> {
        match rator {
            Value::Closure(closure) => self.enter_closure(closure, rand, Vec::new(), span),

            // Y* applied to a closure produces an eta-closure: a
            // deferred unrolling of the fixed point, not yet called.
            Value::Builtin("Y*") => match rand {
                Value::Closure(closure) => {
                    self.push(Value::EtaClosure(closure));
                    Ok(())
                }
                other => Err(Trace::error(
                    RuntimeKind::TypeMismatch,
                    format!("Y* expects a closure, found a {}", other.type_name()),
                    span,
                )),
            },

            // An eta-closure applied to its real argument unwinds into
            // its underlying closure, with the eta-closure itself bound
            // in place of the recursive variable, then re-applies the
            // resulting closure to the original argument — the explicit
            // fixed-point unrolling. `rand` must not reach the stack
            // until *after* the unrolling's own environment has exited,
            // or it ends up underneath the unrolled closure instead of
            // on top of it, and the trailing `gamma` below pops the two
            // the wrong way round. So `rand` rides along as part of the
            // continuation, as a `PushValue` queued after the unrolling's
            // `EnvMarker` exit, landing on the stack only once the
            // unrolled closure is already sitting there waiting for it.
            Value::EtaClosure(closure) => {
                let continuation = vec![
                    Spanned::new(CtrlElem::PushValue(rand), span.clone()),
                    Spanned::new(CtrlElem::Gamma, span.clone()),
                ];
                self.enter_closure(Rc::clone(&closure), Value::EtaClosure(closure), continuation, span)
            }

            Value::Builtin(name) => match core::arity(name) {
                Some(1) => {
                    let result = core::apply(name, &[rand], &span)?;
                    self.push(result);
                    Ok(())
                }
                Some(2) => {
                    self.push(Value::Partial { name, arg: Box::new(rand) });
                    Ok(())
                }
                _ => Err(Trace::error(
                    RuntimeKind::ArityMismatch,
                    format!("'{}' is not a callable built-in", name),
                    span,
                )),
            },

            Value::Partial { name, arg } => {
                let result = core::apply(name, &[*arg, rand], &span)?;
                self.push(result);
                Ok(())
            }

            Value::Tuple(items) => {
                let index = match &rand {
                    Value::Integer(n) => n.to_i64(),
                    other => {
                        return Err(Trace::error(
                            RuntimeKind::TypeMismatch,
                            format!("tuple index must be an integer, found a {}", other.type_name()),
                            span,
                        ))
                    }
                };
                match index.filter(|i| *i >= 1 && (*i as usize) <= items.len()) {
                    Some(i) => {
                        self.push(items[(i - 1) as usize].clone());
                        Ok(())
                    }
                    None => Err(Trace::error(
                        RuntimeKind::IndexOutOfRange,
                        format!("index out of range for a tuple of order {}", items.len()),
                        span,
                    )),
                }
            }

            Value::Nil => Err(Trace::error(
                RuntimeKind::IndexOutOfRange,
                "index into the empty tuple 'nil' is always out of range",
                span,
            )),

            other => Err(Trace::error(
                RuntimeKind::TypeMismatch,
                format!("cannot apply a {} as a function", other.type_name()),
                span,
            )),
        }
    }

    fn enter_closure(
        &mut self,
        closure: Rc<Closure>,
        bind_value: Value,
        continuation: Vec<Spanned<CtrlElem>>,
        span: Span,
    ) -> Result<(), Trace> {
        self.env_stack.push(self.env);
        let new_env = self.table.child(closure.env);
        self.bind_var(new_env, &closure.bound, bind_value, &span)?;
        self.env = new_env;
        self.stack.push(StackItem::EnvMarker(new_env));

        let body = self.program.delta(closure.delta).clone();
        let mut prepend = Vec::with_capacity(body.len() + 1 + continuation.len());
        prepend.extend(body);
        prepend.push(Spanned::new(CtrlElem::EnvMarker(new_env), span));
        prepend.extend(continuation);
        self.splice_front(prepend);
        Ok(())
    }

    fn bind_var(&mut self, env: EnvId, bound: &BoundVar, value: Value, span: &Span) -> Result<(), Trace> {
        match bound {
            BoundVar::Ident(name) => {
                self.table.bind(env, name.clone(), value);
                Ok(())
            }
            BoundVar::Unit => Ok(()),
            BoundVar::Tuple(names) => {
                let items = match value {
                    Value::Tuple(items) => items,
                    other => {
                        return Err(Trace::error(
                            RuntimeKind::ArityMismatch,
                            format!("expected a {}-tuple argument, found a {}", names.len(), other.type_name()),
                            span.clone(),
                        ))
                    }
                };
                if items.len() != names.len() {
                    return Err(Trace::error(
                        RuntimeKind::ArityMismatch,
                        format!("expected {} arguments, found {}", names.len(), items.len()),
                        span.clone(),
                    ));
                }
                for (name, value) in names.iter().zip(items.iter()) {
                    self.table.bind(env, name.clone(), value.clone());
                }
                Ok(())
            }
        }
    }

    // -- rule 8: environment exit ----------------------------------------

    fn exit_env(&mut self, expected: EnvId, span: &Span) -> Result<(), Trace> {
        let value = self.pop_value(span)?;
        match self.stack.pop() {
            Some(StackItem::EnvMarker(id)) if id == expected => {}
            _ => {
                return Err(Trace::error(
                    RuntimeKind::TypeMismatch,
                    "environment marker mismatch (internal error)",
                    span.clone(),
                ))
            }
        }
        self.push(value);
        self.env = self.env_stack.pop().unwrap_or_else(|| self.table.root());
        Ok(())
    }

    // -- rule "aug" ------------------------------------------------------

    fn augment(&self, left: Value, right: Value, span: &Span) -> Result<Value, Trace> {
        match left {
            Value::Nil => Ok(Value::Tuple(Rc::new(vec![right]))),
            Value::Tuple(items) => {
                let mut items = (*items).clone();
                items.push(right);
                Ok(Value::Tuple(Rc::new(items)))
            }
            other => Err(Trace::error(
                RuntimeKind::TypeMismatch,
                format!("'aug' expects a tuple on its left, found a {}", other.type_name()),
                span.clone(),
            )),
        }
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::compiler::compile;
    use num_bigint::BigInt;

    fn run(src: &str) -> Value {
        let source = Rc::new(Source::source(src));
        let program = compile(Rc::clone(&source)).expect("compile failed");
        Machine::run(source, program).expect("run failed")
    }

    #[test]
    fn arithmetic_and_let() {
        assert_eq!(run("let x = 5 in x + 3"), Value::Integer(BigInt::from(8)));
    }

    #[test]
    fn recursive_factorial() {
        let result = run("let rec fact n = n eq 0 -> 1 | n * fact(n-1) in fact 5");
        assert_eq!(result, Value::Integer(BigInt::from(120)));
    }

    #[test]
    fn tuple_construction_and_indexing() {
        let result = run("let t = 1, 2, 3 in t 2");
        assert_eq!(result, Value::Integer(BigInt::from(2)));
    }

    #[test]
    fn tuple_patterned_lambda() {
        let result = run("let f (x,y) = x + y in f(3,4)");
        assert_eq!(result, Value::Integer(BigInt::from(7)));
    }

    #[test]
    fn string_reversal_via_stem_and_stern() {
        let result = run("let rec rev S = S eq '' -> '' | (rev (Stern S)) @Conc (Stem S) in rev 'Hello'");
        match result {
            Value::Str(s) => assert_eq!(&*s, "olleH"),
            other => panic!("expected a string, got {:?}", other),
        }
    }

    #[test]
    fn aug_appends_to_a_tuple() {
        let result = run("(1,2,3) aug 4");
        match result {
            Value::Tuple(items) => assert_eq!(items.len(), 4),
            other => panic!("expected a tuple, got {:?}", other),
        }
    }

    #[test]
    fn division_by_zero_is_a_runtime_error() {
        let source = Rc::new(Source::source("1 / 0"));
        let program = compile(Rc::clone(&source)).unwrap();
        let err = Machine::run(source, program).unwrap_err();
        assert_eq!(err.kind, RuntimeKind::DivisionByZero);
    }

    #[test]
    fn unbound_identifier_is_a_runtime_error() {
        let source = Rc::new(Source::source("undefined_name"));
        let program = compile(Rc::clone(&source)).unwrap();
        let err = Machine::run(source, program).unwrap_err();
        assert_eq!(err.kind, RuntimeKind::UnboundIdentifier);
    }
}
