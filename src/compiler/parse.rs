//! §4.2 Parser — recursive-descent construction of the RPAL parse tree.
//!
//! Left-associative productions (`T`, `Ta`, `A`, `At`, `R`) are parsed
//! with an iterative accumulate-and-fold loop rather than left
//! recursion, per the "recursive descent without unbounded stack
//! growth" design note: a long chain of `a + b + c + ...` folds in a
//! loop instead of growing the Rust call stack one frame per operand.

use num_bigint::BigInt;

use crate::common::span::{Span, Spanned};
use crate::compiler::syntax::Syntax;
use crate::construct::ast::{ArithOp, AstNode, CompOp};
use crate::construct::token::{Token, Tokens};

pub struct Parser {
    tokens: Tokens,
    index: usize,
}

type PResult = Result<Spanned<AstNode>, Syntax>;

impl Parser {
    /// Parses a full token stream into the root expression of the parse
    /// tree. The whole token stream must be consumed; anything left over
    /// is a syntax error.
    pub fn parse(tokens: Tokens) -> PResult {
        let mut parser = Parser { tokens, index: 0 };
        let tree = parser.parse_e()?;
        parser.expect_eof()?;
        Ok(tree)
    }

    // -- token stream primitives --------------------------------------

    fn peek(&self) -> &Token {
        &self.tokens[self.index].item
    }

    fn span(&self) -> Span {
        self.tokens[self.index].span.clone()
    }

    fn advance(&mut self) -> Spanned<Token> {
        let tok = self.tokens[self.index].clone();
        if self.index + 1 < self.tokens.len() {
            self.index += 1;
        }
        tok
    }

    fn at_keyword(&self, kw: &str) -> bool {
        matches!(self.peek(), Token::Keyword(k) if k == kw)
    }

    fn at_operator(&self, op: &str) -> bool {
        matches!(self.peek(), Token::Operator(o) if o == op)
    }

    fn at_punct(&self, c: char) -> bool {
        matches!(self.peek(), Token::Punction(p) if *p == c)
    }

    fn eat_keyword(&mut self, kw: &str) -> Result<(), Syntax> {
        if self.at_keyword(kw) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(format!("expected keyword '{}'", kw)))
        }
    }

    fn eat_operator(&mut self, op: &str) -> Result<(), Syntax> {
        if self.at_operator(op) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(format!("expected operator '{}'", op)))
        }
    }

    fn eat_punct(&mut self, c: char) -> Result<(), Syntax> {
        if self.at_punct(c) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(format!("expected '{}'", c)))
        }
    }

    fn expect_eof(&mut self) -> Result<(), Syntax> {
        if matches!(self.peek(), Token::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("expected end of input".to_string()))
        }
    }

    fn unexpected(&self, expected: String) -> Syntax {
        Syntax::syntax(format!("{}, found {}", expected, self.peek()), self.span())
    }

    fn expect_identifier(&mut self) -> Result<Spanned<String>, Syntax> {
        let span = self.span();
        match self.peek().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(Spanned::new(name, span))
            }
            _ => Err(self.unexpected("expected identifier".to_string())),
        }
    }

    // -- grammar: E -----------------------------------------------------

    fn parse_e(&mut self) -> PResult {
        if self.at_keyword("let") {
            let start = self.span();
            self.advance();
            let defs = self.parse_d()?;
            self.eat_keyword("in")?;
            let body = self.parse_e()?;
            let span = Span::combine(&start, &body.span);
            Ok(Spanned::new(
                AstNode::Let { defs: Box::new(defs), body: Box::new(body) },
                span,
            ))
        } else if self.at_keyword("fn") {
            let start = self.span();
            self.advance();
            let mut params = vec![self.parse_vb()?];
            while self.at_vb_start() {
                params.push(self.parse_vb()?);
            }
            self.eat_operator(".")?;
            let body = self.parse_e()?;
            let span = Span::combine(&start, &body.span);
            Ok(Spanned::new(AstNode::Lambda { params, body: Box::new(body) }, span))
        } else {
            self.parse_ew()
        }
    }

    fn at_vb_start(&self) -> bool {
        matches!(self.peek(), Token::Identifier(_)) || self.at_punct('(')
    }

    fn parse_ew(&mut self) -> PResult {
        let t = self.parse_t()?;
        if self.at_keyword("where") {
            self.advance();
            let defs = self.parse_dr()?;
            let span = Span::combine(&t.span, &defs.span);
            Ok(Spanned::new(AstNode::Where { body: Box::new(t), defs: Box::new(defs) }, span))
        } else {
            Ok(t)
        }
    }

    // -- grammar: T, Ta (left-assoc, folded iteratively) ----------------

    fn parse_t(&mut self) -> PResult {
        let first = self.parse_ta()?;
        if !self.at_punct(',') {
            return Ok(first);
        }

        let mut items = vec![first];
        while self.at_punct(',') {
            self.advance();
            items.push(self.parse_ta()?);
        }
        let span = Span::join(&items.iter().map(|i| i.span.clone()).collect::<Vec<_>>());
        Ok(Spanned::new(AstNode::Tau(items), span))
    }

    fn parse_ta(&mut self) -> PResult {
        let mut acc = self.parse_tc()?;
        while self.at_keyword("aug") {
            self.advance();
            let right = self.parse_tc()?;
            let span = Span::combine(&acc.span, &right.span);
            acc = Spanned::new(AstNode::Aug { left: Box::new(acc), right: Box::new(right) }, span);
        }
        Ok(acc)
    }

    // -- grammar: Tc (conditional, right-nestable as written) -----------

    fn parse_tc(&mut self) -> PResult {
        let cond = self.parse_b()?;
        if self.at_operator("->") {
            self.advance();
            let then_branch = self.parse_tc()?;
            self.eat_operator("|")?;
            let else_branch = self.parse_tc()?;
            let span = Span::combine(&cond.span, &else_branch.span);
            Ok(Spanned::new(
                AstNode::Conditional {
                    cond: Box::new(cond),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                },
                span,
            ))
        } else {
            Ok(cond)
        }
    }

    // -- grammar: B, Bt, Bs, Bp ------------------------------------------

    fn parse_b(&mut self) -> PResult {
        let mut acc = self.parse_bt()?;
        while self.at_keyword("or") {
            self.advance();
            let right = self.parse_bt()?;
            let span = Span::combine(&acc.span, &right.span);
            acc = Spanned::new(AstNode::Or { left: Box::new(acc), right: Box::new(right) }, span);
        }
        Ok(acc)
    }

    fn parse_bt(&mut self) -> PResult {
        let mut acc = self.parse_bs()?;
        while self.at_operator("&") {
            self.advance();
            let right = self.parse_bs()?;
            let span = Span::combine(&acc.span, &right.span);
            acc = Spanned::new(AstNode::LogicalAnd { left: Box::new(acc), right: Box::new(right) }, span);
        }
        Ok(acc)
    }

    fn parse_bs(&mut self) -> PResult {
        if self.at_keyword("not") {
            let start = self.span();
            self.advance();
            let inner = self.parse_bp()?;
            let span = Span::combine(&start, &inner.span);
            Ok(Spanned::new(AstNode::Not(Box::new(inner)), span))
        } else {
            self.parse_bp()
        }
    }

    fn comparison_op(&self) -> Option<CompOp> {
        match self.peek() {
            Token::Keyword(k) => match k.as_str() {
                "gr" => Some(CompOp::Gr),
                "ge" => Some(CompOp::Ge),
                "ls" => Some(CompOp::Ls),
                "le" => Some(CompOp::Le),
                "eq" => Some(CompOp::Eq),
                "ne" => Some(CompOp::Ne),
                _ => None,
            },
            Token::Operator(o) => match o.as_str() {
                ">" => Some(CompOp::Gr),
                ">=" => Some(CompOp::Ge),
                "<" => Some(CompOp::Ls),
                "<=" => Some(CompOp::Le),
                "=" => Some(CompOp::Eq),
                "><" => Some(CompOp::Ne),
                _ => None,
            },
            _ => None,
        }
    }

    fn parse_bp(&mut self) -> PResult {
        let left = self.parse_a()?;
        if let Some(op) = self.comparison_op() {
            self.advance();
            let right = self.parse_a()?;
            let span = Span::combine(&left.span, &right.span);
            Ok(Spanned::new(AstNode::Compare { op, left: Box::new(left), right: Box::new(right) }, span))
        } else {
            Ok(left)
        }
    }

    // -- grammar: A, At (left-assoc arithmetic, iteratively folded) -----

    fn parse_a(&mut self) -> PResult {
        let mut acc = if self.at_operator("+") {
            self.advance();
            self.parse_at()?
        } else if self.at_operator("-") {
            let start = self.span();
            self.advance();
            let inner = self.parse_at()?;
            let span = Span::combine(&start, &inner.span);
            Spanned::new(AstNode::Neg(Box::new(inner)), span)
        } else {
            self.parse_at()?
        };

        loop {
            let op = if self.at_operator("+") {
                ArithOp::Add
            } else if self.at_operator("-") {
                ArithOp::Sub
            } else {
                break;
            };
            self.advance();
            let right = self.parse_at()?;
            let span = Span::combine(&acc.span, &right.span);
            acc = Spanned::new(AstNode::Arith { op, left: Box::new(acc), right: Box::new(right) }, span);
        }
        Ok(acc)
    }

    fn parse_at(&mut self) -> PResult {
        let mut acc = self.parse_af()?;
        loop {
            let op = if self.at_operator("*") {
                ArithOp::Mul
            } else if self.at_operator("/") {
                ArithOp::Div
            } else {
                break;
            };
            self.advance();
            let right = self.parse_af()?;
            let span = Span::combine(&acc.span, &right.span);
            acc = Spanned::new(AstNode::Arith { op, left: Box::new(acc), right: Box::new(right) }, span);
        }
        Ok(acc)
    }

    // -- grammar: Af (right-assoc power) ---------------------------------

    fn parse_af(&mut self) -> PResult {
        let base = self.parse_ap()?;
        if self.at_operator("**") {
            self.advance();
            let exp = self.parse_af()?; // right-recursive: right-associative
            let span = Span::combine(&base.span, &exp.span);
            Ok(Spanned::new(AstNode::Arith { op: ArithOp::Pow, left: Box::new(base), right: Box::new(exp) }, span))
        } else {
            Ok(base)
        }
    }

    // -- grammar: Ap (infix @) -------------------------------------------

    fn parse_ap(&mut self) -> PResult {
        let mut acc = self.parse_r()?;
        while self.at_operator("@") {
            self.advance();
            let ident = self.expect_identifier()?;
            let ident_span = ident.span.clone();
            let ident_node = Spanned::new(AstNode::Identifier(ident.item), ident_span);
            let right = self.parse_r()?;
            let span = Span::combine(&acc.span, &right.span);
            acc = Spanned::new(
                AstNode::At { left: Box::new(acc), ident: Box::new(ident_node), right: Box::new(right) },
                span,
            );
        }
        Ok(acc)
    }

    // -- grammar: R (left-assoc application) ------------------------------

    fn parse_r(&mut self) -> PResult {
        let mut acc = self.parse_rn()?;
        while self.at_rn_start() {
            let arg = self.parse_rn()?;
            let span = Span::combine(&acc.span, &arg.span);
            acc = Spanned::new(AstNode::Gamma { func: Box::new(acc), arg: Box::new(arg) }, span);
        }
        Ok(acc)
    }

    fn at_rn_start(&self) -> bool {
        match self.peek() {
            Token::Identifier(_) | Token::Integer(_) | Token::Str(_) => true,
            Token::Keyword(k) => matches!(k.as_str(), "true" | "false" | "nil" | "dummy"),
            Token::Punction('(') => true,
            _ => false,
        }
    }

    fn parse_rn(&mut self) -> PResult {
        let span = self.span();
        match self.peek().clone() {
            Token::Identifier(name) => {
                self.advance();
                Ok(Spanned::new(AstNode::Identifier(name), span))
            }
            Token::Integer(digits) => {
                self.advance();
                let value: BigInt = digits.parse().expect("lexer only produces digit runs");
                Ok(Spanned::new(AstNode::Integer(value), span))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Spanned::new(AstNode::Str(s), span))
            }
            Token::Keyword(k) if k == "true" => {
                self.advance();
                Ok(Spanned::new(AstNode::True, span))
            }
            Token::Keyword(k) if k == "false" => {
                self.advance();
                Ok(Spanned::new(AstNode::False, span))
            }
            Token::Keyword(k) if k == "nil" => {
                self.advance();
                Ok(Spanned::new(AstNode::Nil, span))
            }
            Token::Keyword(k) if k == "dummy" => {
                self.advance();
                Ok(Spanned::new(AstNode::Dummy, span))
            }
            Token::Punction('(') => {
                self.advance();
                let inner = self.parse_e()?;
                self.eat_punct(')')?;
                Ok(inner)
            }
            _ => Err(self.unexpected("expected an expression".to_string())),
        }
    }

    // -- grammar: D, Da, Dr, Db -------------------------------------------

    fn parse_d(&mut self) -> PResult {
        let da = self.parse_da()?;
        if self.at_keyword("within") {
            self.advance();
            let inner = self.parse_d()?;
            let span = Span::combine(&da.span, &inner.span);
            Ok(Spanned::new(AstNode::Within { left: Box::new(da), right: Box::new(inner) }, span))
        } else {
            Ok(da)
        }
    }

    fn parse_da(&mut self) -> PResult {
        let first = self.parse_dr()?;
        if !self.at_keyword("and") {
            return Ok(first);
        }

        let mut defs = vec![first];
        while self.at_keyword("and") {
            self.advance();
            defs.push(self.parse_dr()?);
        }
        let span = Span::join(&defs.iter().map(|d| d.span.clone()).collect::<Vec<_>>());
        Ok(Spanned::new(AstNode::And(defs), span))
    }

    fn parse_dr(&mut self) -> PResult {
        if self.at_keyword("rec") {
            let start = self.span();
            self.advance();
            let inner = self.parse_db()?;
            let span = Span::combine(&start, &inner.span);
            Ok(Spanned::new(AstNode::Rec(Box::new(inner)), span))
        } else {
            self.parse_db()
        }
    }

    fn parse_db(&mut self) -> PResult {
        if self.at_punct('(') {
            self.advance();
            let inner = self.parse_d()?;
            self.eat_punct(')')?;
            return Ok(inner);
        }

        // Both remaining alternatives start with an identifier; look
        // ahead past the variable list to tell `Vl '=' E` (a pattern
        // equation) apart from `<ID> Vb+ '=' E` (a function form).
        let start_index = self.index;
        let start = self.span();
        let first = self.expect_identifier()?;

        if self.at_vb_start() && !self.at_operator("=") {
            // <ID> Vb+ '=' E
            let mut params = vec![self.parse_vb()?];
            while self.at_vb_start() {
                params.push(self.parse_vb()?);
            }
            self.eat_operator("=")?;
            let body = self.parse_e()?;
            let span = Span::combine(&start, &body.span);
            return Ok(Spanned::new(
                AstNode::FunctionForm { name: first.item, params, body: Box::new(body) },
                span,
            ));
        }

        // Vl '=' E, where Vl = <ID> (',' <ID>)*
        self.index = start_index;
        let vl = self.parse_vl()?;
        self.eat_operator("=")?;
        let body = self.parse_e()?;
        let span = Span::combine(&vl.span, &body.span);
        Ok(Spanned::new(AstNode::Equal { pattern: Box::new(vl), value: Box::new(body) }, span))
    }

    // -- grammar: Vb, Vl ----------------------------------------------------

    fn parse_vb(&mut self) -> PResult {
        let span = self.span();
        if self.at_punct('(') {
            self.advance();
            if self.at_punct(')') {
                self.advance();
                return Ok(Spanned::new(AstNode::EmptyParen, span));
            }
            let vl = self.parse_vl()?;
            self.eat_punct(')')?;
            return Ok(vl);
        }

        let ident = self.expect_identifier()?;
        Ok(Spanned::new(AstNode::Identifier(ident.item), ident.span))
    }

    fn parse_vl(&mut self) -> PResult {
        let first = self.expect_identifier()?;
        let mut names = vec![Spanned::new(AstNode::Identifier(first.item), first.span.clone())];
        let mut end_span = first.span;

        while self.at_punct(',') {
            self.advance();
            let next = self.expect_identifier()?;
            end_span = next.span.clone();
            names.push(Spanned::new(AstNode::Identifier(next.item), next.span));
        }

        if names.len() == 1 {
            Ok(names.into_iter().next().unwrap())
        } else {
            let span = Span::combine(&names[0].span, &end_span);
            Ok(Spanned::new(AstNode::Comma(names), span))
        }
    }
}

#[cfg(test)]
mod test {
    use std::rc::Rc;

    use super::*;
    use crate::common::source::Source;
    use crate::compiler::lex::Lexer;

    fn parse(src: &str) -> Spanned<AstNode> {
        let tokens = Lexer::lex(Rc::new(Source::source(src))).expect("lex failed");
        Parser::parse(tokens).expect("parse failed")
    }

    #[test]
    fn let_in() {
        let tree = parse("let x = 5 in x");
        match tree.item {
            AstNode::Let { .. } => (),
            other => panic!("expected Let, got {:?}", other),
        }
    }

    #[test]
    fn function_form() {
        let tree = parse("let f x = x in f");
        match tree.item {
            AstNode::Let { defs, .. } => match defs.item {
                AstNode::FunctionForm { ref name, .. } => assert_eq!(name, "f"),
                other => panic!("expected FunctionForm, got {:?}", other),
            },
            other => panic!("expected Let, got {:?}", other),
        }
    }

    #[test]
    fn left_associative_application_is_gamma_chain() {
        let tree = parse("f x y");
        match tree.item {
            AstNode::Gamma { func, arg } => {
                assert!(matches!(arg.item, AstNode::Identifier(ref n) if n == "y"));
                assert!(matches!(func.item, AstNode::Gamma { .. }));
            }
            other => panic!("expected nested gamma, got {:?}", other),
        }
    }

    #[test]
    fn power_is_right_associative() {
        let tree = parse("2 ** 3 ** 2");
        match tree.item {
            AstNode::Arith { op: ArithOp::Pow, left, right } => {
                assert!(matches!(left.item, AstNode::Integer(_)));
                assert!(matches!(right.item, AstNode::Arith { op: ArithOp::Pow, .. }));
            }
            other => panic!("expected right-nested power, got {:?}", other),
        }
    }

    #[test]
    fn tuple_construction() {
        let tree = parse("1, 2, 3");
        match tree.item {
            AstNode::Tau(items) => assert_eq!(items.len(), 3),
            other => panic!("expected Tau, got {:?}", other),
        }
    }

    #[test]
    fn syntax_error_reports_position() {
        let tokens = Lexer::lex(Rc::new(Source::source("let x = in x"))).unwrap();
        let err = Parser::parse(tokens).unwrap_err();
        assert_eq!(err.stage, crate::compiler::syntax::Stage::Syntax);
    }
}
