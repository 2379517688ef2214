//! `Trace`: a runtime error, i.e. everything that can go wrong once the
//! CSE machine starts stepping (§7 "RuntimeError" subcategories).

use std::fmt;

use crate::common::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeKind {
    UnboundIdentifier,
    TypeMismatch,
    ArityMismatch,
    IndexOutOfRange,
    DivisionByZero,
    InvalidConditional,
}

impl fmt::Display for RuntimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RuntimeKind::UnboundIdentifier => "Unbound Identifier",
            RuntimeKind::TypeMismatch => "Type Mismatch",
            RuntimeKind::ArityMismatch => "Arity Mismatch",
            RuntimeKind::IndexOutOfRange => "Index Out Of Range",
            RuntimeKind::DivisionByZero => "Division By Zero",
            RuntimeKind::InvalidConditional => "Invalid Conditional",
        };
        write!(f, "{}", name)
    }
}

/// A runtime traceback: the kind of fault, a message, and the span
/// responsible. The machine carries only the offending span rather than
/// a full call stack, since RPAL's CSE machine has no notion of a
/// return address distinct from its control/stack/environment triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    pub kind: RuntimeKind,
    pub message: String,
    pub span: Span,
}

impl Trace {
    pub fn error(kind: RuntimeKind, message: impl Into<String>, span: Span) -> Trace {
        Trace { kind, message: message.into(), span }
    }
}

impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.span.start_line_col();
        write!(f, "RuntimeError: {} at line {} column {}", self.message, line, col)
    }
}

impl std::error::Error for Trace {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::common::source::Source;
    use std::rc::Rc;

    #[test]
    fn display_matches_the_pinned_stderr_format() {
        let source = Rc::new(Source::source("x + 1"));
        let span = Span::new(&source, 0, 1);
        let trace = Trace::error(RuntimeKind::UnboundIdentifier, "'x' is not bound", span);
        assert_eq!(trace.to_string(), "RuntimeError: 'x' is not bound at line 1 column 1");
    }
}
