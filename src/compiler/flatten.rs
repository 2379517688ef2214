//! §4.4 Flattener — linearizes the standardized tree into an ordered
//! list of control structures, one per lambda body plus δ₀ for the top
//! level. Operands are emitted before the operator that consumes them,
//! so a machine reading a δ left to right can simply push values and
//! apply operators as it goes. Every emitted element keeps the span of
//! the standard-tree node it came from, so the CSE machine can report a
//! runtime fault against a source position.

use crate::common::control::{CtrlElem, Delta, Program};
use crate::common::span::Spanned;
use crate::construct::standard::StdNode;

pub struct Flattener {
    program: Vec<Delta>,
}

impl Flattener {
    /// Flattens a standardized tree into a [`Program`], with the tree's
    /// own control structure at index 0.
    pub fn flatten(tree: &Spanned<StdNode>) -> Program {
        let mut flattener = Flattener { program: vec![Vec::new()] };
        let root = flattener.flatten_node(tree);
        flattener.program[0] = root;
        Program(flattener.program)
    }

    fn alloc_delta(&mut self) -> usize {
        self.program.push(Vec::new());
        self.program.len() - 1
    }

    fn elem(node: &Spanned<StdNode>, item: CtrlElem) -> Spanned<CtrlElem> {
        Spanned::new(item, node.span.clone())
    }

    fn flatten_node(&mut self, node: &Spanned<StdNode>) -> Delta {
        match &node.item {
            StdNode::Lambda { bound, body } => {
                let index = self.alloc_delta();
                let body_ctrl = self.flatten_node(body);
                self.program[index] = body_ctrl;
                vec![Self::elem(node, CtrlElem::Lambda { delta: index, bound: bound.clone() })]
            }
            StdNode::Conditional(cond, then_branch, else_branch) => {
                let then_index = self.alloc_delta();
                let then_ctrl = self.flatten_node(then_branch);
                self.program[then_index] = then_ctrl;

                let else_index = self.alloc_delta();
                let else_ctrl = self.flatten_node(else_branch);
                self.program[else_index] = else_ctrl;

                let mut out = self.flatten_node(cond);
                out.push(Self::elem(
                    node,
                    CtrlElem::Beta { then_delta: then_index, else_delta: else_index },
                ));
                out
            }
            StdNode::Gamma(func, arg) => {
                let mut out = self.flatten_node(func);
                out.extend(self.flatten_node(arg));
                out.push(Self::elem(node, CtrlElem::Gamma));
                out
            }
            StdNode::Tau(items) => {
                let mut out = Vec::new();
                for item in items {
                    out.extend(self.flatten_node(item));
                }
                out.push(Self::elem(node, CtrlElem::Tau(items.len())));
                out
            }
            StdNode::Aug(left, right) => {
                let mut out = self.flatten_node(left);
                out.extend(self.flatten_node(right));
                out.push(Self::elem(node, CtrlElem::Aug));
                out
            }
            StdNode::Identifier(name) => vec![Self::elem(node, CtrlElem::Name(name.clone()))],
            StdNode::Integer(n) => vec![Self::elem(node, CtrlElem::Integer(n.clone()))],
            StdNode::Str(s) => vec![Self::elem(node, CtrlElem::Str(s.clone()))],
            StdNode::True => vec![Self::elem(node, CtrlElem::Bool(true))],
            StdNode::False => vec![Self::elem(node, CtrlElem::Bool(false))],
            StdNode::Nil => vec![Self::elem(node, CtrlElem::Nil)],
            StdNode::Dummy => vec![Self::elem(node, CtrlElem::Dummy)],
            StdNode::YStar => vec![Self::elem(node, CtrlElem::YStar)],
        }
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::common::source::Source;
    use crate::compiler::{lex::Lexer, parse::Parser, standardize::Standardizer};

    fn flatten(src: &str) -> Program {
        let tokens = Lexer::lex(Rc::new(Source::source(src))).unwrap();
        let ast = Parser::parse(tokens).unwrap();
        let std_tree = Standardizer::standardize(ast).unwrap();
        Flattener::flatten(&std_tree)
    }

    #[test]
    fn simple_application_ends_in_gamma() {
        let program = flatten("let x = 5 in Print x");
        let root = program.delta(0);
        assert!(matches!(root.last().map(|e| &e.item), Some(CtrlElem::Gamma)));
    }

    #[test]
    fn lambda_allocates_a_fresh_delta() {
        let program = flatten("fn x . x + 1");
        assert_eq!(program.0.len(), 2);
        match &program.delta(0)[0].item {
            CtrlElem::Lambda { delta, .. } => assert_eq!(*delta, 1),
            other => panic!("expected Lambda element, got {:?}", other),
        }
    }

    #[test]
    fn conditional_allocates_two_branch_deltas() {
        let program = flatten("1 eq 1 -> 2 | 3");
        // root delta, then-branch delta, else-branch delta
        assert_eq!(program.0.len(), 3);
        assert!(matches!(program.delta(0).last().map(|e| &e.item), Some(CtrlElem::Beta { .. })));
    }
}
