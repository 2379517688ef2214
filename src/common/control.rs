//! Control-structure element types (§3 "Control structures"), produced
//! by the flattener and consumed by the CSE machine. A `Program` is the
//! ordered list δ₀, δ₁, … δₙ; each `Delta` is one control structure
//! (one per lambda body, plus δ₀ for the top level).

use num_bigint::BigInt;

use crate::common::span::Spanned;
use crate::common::value::Value;
use crate::construct::standard::BoundVar;

#[derive(Debug, Clone, PartialEq)]
pub enum CtrlElem {
    Integer(BigInt),
    Str(String),
    Bool(bool),
    Nil,
    Dummy,
    /// A name reference — resolved against the environment chain,
    /// whether it names a user binding or a built-in (built-ins live in
    /// the frame-0 primitive environment, so no separate control-element
    /// kind is needed for them).
    Name(String),
    Gamma,
    Lambda { delta: usize, bound: BoundVar },
    /// Build an n-tuple from the top `n` stack elements.
    Tau(usize),
    Aug,
    /// A conditional marker: pop a truth value, then prepend either the
    /// `then` or `else` delta onto the control.
    Beta { then_delta: usize, else_delta: usize },
    /// Explicit fixed-point combinator marker, used to realize `rec`.
    YStar,
    /// An environment marker, pushed onto both control and stack when a
    /// closure is applied. Never produced by the flattener — the
    /// machine constructs these dynamically at application time — but
    /// represented here since it is, like every other element, a thing
    /// that can occupy a slot in the control sequence.
    EnvMarker(crate::common::env::EnvId),
    /// Pushes an already-computed runtime value onto the stack. Never
    /// produced by the flattener — the machine splices this into an
    /// injected continuation (e.g. to hand the eta-closure's real
    /// argument back to the unrolled fixed-point closure only after the
    /// unrolling's own environment has exited) when the value to push
    /// isn't a literal the flattener could have emitted as one of the
    /// kinds above.
    PushValue(Value),
}

/// Each element keeps the span of the standard-tree node it was
/// flattened from, so a runtime fault can be reported against a source
/// position the same way a compile-time one is (§6 "Stderr").
pub type Delta = Vec<Spanned<CtrlElem>>;

/// The full set of control structures produced by flattening one
/// program: δ₀ is the top level, every other entry is one lambda body.
#[derive(Debug, Clone)]
pub struct Program(pub Vec<Delta>);

impl Program {
    pub fn delta(&self, index: usize) -> &Delta {
        &self.0[index]
    }
}
