//! §4.3 Standardizer — rewrites the RPAL parse tree into the
//! standardized binary tree of `gamma`/`lambda` per the rewrite table in
//! the spec. This is a post-order traversal: every source form is
//! reduced to `gamma`, `lambda`, `tau`, `aug`, `->`, identifiers, and
//! literals, with every operator (arithmetic, comparison, logical, `@`)
//! rewritten into an application of a built-in name.

use crate::common::span::Spanned;
use crate::compiler::syntax::Syntax;
use crate::construct::ast::AstNode;
use crate::construct::standard::{BoundVar, StdNode};

pub struct Standardizer;

impl Standardizer {
    pub fn standardize(ast: Spanned<AstNode>) -> Result<Spanned<StdNode>, Syntax> {
        standardize_expr(ast)
    }
}

fn gamma(func: Spanned<StdNode>, arg: Spanned<StdNode>) -> Spanned<StdNode> {
    let span = crate::common::span::Span::combine(&func.span, &arg.span);
    Spanned::new(StdNode::Gamma(Box::new(func), Box::new(arg)), span)
}

fn builtin(name: &str, span: &crate::common::span::Span) -> Spanned<StdNode> {
    Spanned::new(StdNode::Identifier(name.to_string()), span.clone())
}

fn builtin_call1(name: &str, arg: Spanned<AstNode>) -> Result<Spanned<StdNode>, Syntax> {
    let span = arg.span.clone();
    let arg = standardize_expr(arg)?;
    Ok(gamma(builtin(name, &span), arg))
}

fn builtin_call2(name: &str, left: Spanned<AstNode>, right: Spanned<AstNode>) -> Result<Spanned<StdNode>, Syntax> {
    let span = left.span.clone();
    let left = standardize_expr(left)?;
    let right = standardize_expr(right)?;
    Ok(gamma(gamma(builtin(name, &span), left), right))
}

fn lambda(bound: BoundVar, body: Spanned<StdNode>, span: crate::common::span::Span) -> Spanned<StdNode> {
    Spanned::new(StdNode::Lambda { bound, body: Box::new(body) }, span)
}

fn to_bound_var(node: &Spanned<AstNode>) -> Result<BoundVar, Syntax> {
    match &node.item {
        AstNode::Identifier(name) => Ok(BoundVar::Ident(name.clone())),
        AstNode::EmptyParen => Ok(BoundVar::Unit),
        AstNode::Comma(items) => {
            let mut names = Vec::with_capacity(items.len());
            for item in items {
                match &item.item {
                    AstNode::Identifier(name) => names.push(name.clone()),
                    _ => {
                        return Err(Syntax::standardization(
                            "expected a plain identifier inside a tuple pattern".to_string(),
                            item.span.clone(),
                        ))
                    }
                }
            }
            Ok(BoundVar::Tuple(names))
        }
        _ => Err(Syntax::standardization(
            "expected a bound-variable pattern (identifier, tuple, or '()')".to_string(),
            node.span.clone(),
        )),
    }
}

/// Standardizes a definition (the right side of `let`/`where`, or a
/// standalone `D`), returning the bound-variable descriptor it
/// introduces together with the standardized value expression it binds
/// that descriptor to.
fn standardize_def(def: Spanned<AstNode>) -> Result<(BoundVar, Spanned<StdNode>), Syntax> {
    let span = def.span.clone();
    match def.item {
        AstNode::Equal { pattern, value } => {
            let bound = to_bound_var(&pattern)?;
            let value = standardize_expr(*value)?;
            Ok((bound, value))
        }
        AstNode::FunctionForm { name, params, body } => {
            let value = standardize_lambda_chain(params, *body)?;
            Ok((BoundVar::Ident(name), value))
        }
        AstNode::Rec(inner) => {
            let (bound, value) = standardize_def(*inner)?;
            let wrapped_lambda = lambda(bound.clone(), value, span.clone());
            let y_star = Spanned::new(StdNode::YStar, span.clone());
            Ok((bound, gamma(y_star, wrapped_lambda)))
        }
        AstNode::And(defs) => {
            let mut names = Vec::with_capacity(defs.len());
            let mut values = Vec::with_capacity(defs.len());
            for def in defs {
                let (bound, value) = standardize_def(def)?;
                match bound {
                    BoundVar::Ident(name) => names.push(name),
                    BoundVar::Tuple(ns) => names.extend(ns),
                    BoundVar::Unit => {
                        return Err(Syntax::standardization(
                            "'()' cannot appear in a simultaneous 'and' definition".to_string(),
                            span.clone(),
                        ))
                    }
                }
                values.push(value);
            }
            let tuple_span = crate::common::span::Span::join(
                &values.iter().map(|v| v.span.clone()).collect::<Vec<_>>(),
            );
            Ok((BoundVar::Tuple(names), Spanned::new(StdNode::Tau(values), tuple_span)))
        }
        AstNode::Within { left, right } => {
            let (outer_bound, outer_value) = standardize_def(*left)?;
            let (inner_bound, inner_value) = standardize_def(*right)?;
            let wrapper = lambda(outer_bound, inner_value, span.clone());
            Ok((inner_bound, gamma(wrapper, outer_value)))
        }
        other => Err(Syntax::standardization(
            format!("{:?} cannot appear as a definition", other),
            span,
        )),
    }
}

fn standardize_lambda_chain(
    params: Vec<Spanned<AstNode>>,
    body: Spanned<AstNode>,
) -> Result<Spanned<StdNode>, Syntax> {
    let span = body.span.clone();
    let mut acc = standardize_expr(body)?;
    for param in params.into_iter().rev() {
        let bound = to_bound_var(&param)?;
        acc = lambda(bound, acc, span.clone());
    }
    Ok(acc)
}

fn standardize_expr(node: Spanned<AstNode>) -> Result<Spanned<StdNode>, Syntax> {
    let span = node.span.clone();
    match node.item {
        AstNode::Let { defs, body } => {
            let (bound, value) = standardize_def(*defs)?;
            let body = standardize_expr(*body)?;
            Ok(gamma(lambda(bound, body, span), value))
        }
        AstNode::Where { body, defs } => {
            let (bound, value) = standardize_def(*defs)?;
            let body = standardize_expr(*body)?;
            Ok(gamma(lambda(bound, body, span), value))
        }
        AstNode::Lambda { params, body } => standardize_lambda_chain(params, *body),
        AstNode::Tau(items) => {
            let items = items.into_iter().map(standardize_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(Spanned::new(StdNode::Tau(items), span))
        }
        AstNode::Aug { left, right } => {
            let left = standardize_expr(*left)?;
            let right = standardize_expr(*right)?;
            Ok(Spanned::new(StdNode::Aug(Box::new(left), Box::new(right)), span))
        }
        AstNode::Conditional { cond, then_branch, else_branch } => {
            let cond = standardize_expr(*cond)?;
            let then_branch = standardize_expr(*then_branch)?;
            let else_branch = standardize_expr(*else_branch)?;
            Ok(Spanned::new(
                StdNode::Conditional(Box::new(cond), Box::new(then_branch), Box::new(else_branch)),
                span,
            ))
        }
        AstNode::Or { left, right } => builtin_call2("or", *left, *right),
        AstNode::LogicalAnd { left, right } => builtin_call2("&", *left, *right),
        AstNode::Not(inner) => builtin_call1("not", *inner),
        AstNode::Compare { op, left, right } => builtin_call2(op.label(), *left, *right),
        AstNode::Arith { op, left, right } => builtin_call2(op.label(), *left, *right),
        AstNode::Neg(inner) => builtin_call1("neg", *inner),
        AstNode::At { left, ident, right } => {
            let name = match ident.item {
                AstNode::Identifier(name) => name,
                other => {
                    return Err(Syntax::standardization(
                        format!("expected identifier after '@', found {:?}", other),
                        ident.span,
                    ))
                }
            };
            builtin_call2(&name, *left, *right)
        }
        AstNode::Gamma { func, arg } => {
            let func = standardize_expr(*func)?;
            let arg = standardize_expr(*arg)?;
            Ok(gamma(func, arg))
        }
        AstNode::Identifier(name) => Ok(Spanned::new(StdNode::Identifier(name), span)),
        AstNode::Integer(n) => Ok(Spanned::new(StdNode::Integer(n), span)),
        AstNode::Str(s) => Ok(Spanned::new(StdNode::Str(s), span)),
        AstNode::True => Ok(Spanned::new(StdNode::True, span)),
        AstNode::False => Ok(Spanned::new(StdNode::False, span)),
        AstNode::Nil => Ok(Spanned::new(StdNode::Nil, span)),
        AstNode::Dummy => Ok(Spanned::new(StdNode::Dummy, span)),
        other => Err(Syntax::standardization(
            format!("{:?} cannot appear as an expression", other),
            span,
        )),
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::Lexer;
    use crate::compiler::parse::Parser;

    fn standardize(src: &str) -> Spanned<StdNode> {
        let tokens = Lexer::lex(Rc::new(Source::source(src))).unwrap();
        let ast = Parser::parse(tokens).unwrap();
        Standardizer::standardize(ast).unwrap()
    }

    #[test]
    fn let_becomes_gamma_lambda() {
        let std_tree = standardize("let x = 5 in x");
        match std_tree.item {
            StdNode::Gamma(func, arg) => {
                assert!(matches!(func.item, StdNode::Lambda { bound: BoundVar::Ident(ref n), .. } if n == "x"));
                assert!(matches!(arg.item, StdNode::Integer(_)));
            }
            other => panic!("expected gamma(lambda, value), got {:?}", other),
        }
    }

    #[test]
    fn rec_introduces_y_star() {
        let std_tree = standardize("let rec f x = x in f");
        match std_tree.item {
            StdNode::Gamma(func, arg) => {
                assert!(matches!(func.item, StdNode::Lambda { .. }));
                match arg.item {
                    StdNode::Gamma(y, _lambda) => assert!(matches!(y.item, StdNode::YStar)),
                    other => panic!("expected gamma(Y*, lambda), got {:?}", other),
                }
            }
            other => panic!("expected outer gamma, got {:?}", other),
        }
    }

    #[test]
    fn arithmetic_becomes_builtin_application() {
        let std_tree = standardize("1 + 2");
        match std_tree.item {
            StdNode::Gamma(func, _right) => match func.item {
                StdNode::Gamma(op, _left) => {
                    assert!(matches!(op.item, StdNode::Identifier(ref n) if n == "+"));
                }
                other => panic!("expected nested gamma, got {:?}", other),
            },
            other => panic!("expected gamma chain, got {:?}", other),
        }
    }

    #[test]
    fn multi_param_lambda_right_nests() {
        let std_tree = standardize("fn x y . x");
        match std_tree.item {
            StdNode::Lambda { bound: BoundVar::Ident(ref n), body } => {
                assert_eq!(n, "x");
                assert!(matches!(body.item, StdNode::Lambda { bound: BoundVar::Ident(ref n2), .. } if n2 == "y"));
            }
            other => panic!("expected right-nested lambda, got {:?}", other),
        }
    }

    #[test]
    fn idempotent_on_already_standard_shapes() {
        // `fn x . x` is already expressed purely in gamma/lambda terms;
        // standardizing it changes nothing about its shape.
        let once = standardize("fn x . x");
        let tokens = Lexer::lex(Rc::new(Source::source("fn x . x"))).unwrap();
        let ast = Parser::parse(tokens).unwrap();
        let twice = Standardizer::standardize(ast).unwrap();
        assert_eq!(once.item, twice.item);
    }
}
