//! Property tests exercising invariants the snippet tests in
//! `tests/fledgling.rs` only sample: lexer round-tripping, parser/
//! standardizer determinism, and machine semantics (arithmetic, tuple
//! indexing, the `Y*` fixed point, closure capture) across a spread of
//! generated inputs rather than a handful of fixed ones. Kept alongside
//! `fledgling.rs` rather than folded into it, matching the teacher's
//! separate `proptest`-driven test file next to its snippet harness.

use std::rc::Rc;

use num_bigint::BigInt;
use proptest::prelude::*;

use rpal::common::source::Source;
use rpal::compiler::{lex::Lexer, parse::Parser, standardize::Standardizer};
use rpal::construct::token::Token;
use rpal::Value;

/// Identifiers that are guaranteed not to collide with an RPAL keyword:
/// every generated identifier is prefixed with `v`, so `let`, `in`,
/// `fn`, etc. can never come out of the generator.
fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,6}".prop_map(|s| format!("v{}", s))
}

fn small_int() -> impl Strategy<Value = i64> {
    0i64..1000
}

/// One of the three arithmetic operators `arithmetic_matches_native`
/// checks against native `i64` arithmetic, generated the way the
/// teacher generates its `Token`/`Lit` enums — via
/// `#[derive(proptest_derive::Arbitrary)]` rather than a hand-rolled
/// `prop_oneof!` — so proptest picks (and shrinks) one for free.
#[derive(Debug, Clone, Copy, proptest_derive::Arbitrary)]
enum ArithOp {
    Add,
    Sub,
    Mul,
}

impl ArithOp {
    fn rpal_symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
        }
    }

    fn native(self, a: i64, b: i64) -> i64 {
        match self {
            ArithOp::Add => a + b,
            ArithOp::Sub => a - b,
            ArithOp::Mul => a * b,
        }
    }
}

fn run_value(source: &str) -> Value {
    rpal::run(Rc::new(Source::source(source))).expect("program should run to completion")
}

proptest! {
    #[test]
    fn lexer_roundtrips_identifiers(name in ident_strategy()) {
        let tokens = Lexer::lex(Rc::new(Source::source(&name))).unwrap();
        prop_assert_eq!(tokens.len(), 2); // identifier + Eof
        prop_assert_eq!(tokens[0].item.clone(), Token::Identifier(name));
    }

    #[test]
    fn lexer_roundtrips_integers(n in small_int()) {
        let text = n.to_string();
        let tokens = Lexer::lex(Rc::new(Source::source(&text))).unwrap();
        prop_assert_eq!(tokens.len(), 2);
        prop_assert_eq!(tokens[0].item.clone(), Token::Integer(text));
    }

    /// Parsing the same source twice must produce structurally equal
    /// parse trees: the parser holds no hidden mutable state that could
    /// make two runs over identical input diverge.
    #[test]
    fn parser_is_deterministic(a in small_int(), b in small_int(), name in ident_strategy()) {
        let source = format!("let {} = {} in {} + {}", name, a, name, b);
        let ast_1 = Parser::parse(Lexer::lex(Rc::new(Source::source(&source))).unwrap()).unwrap();
        let ast_2 = Parser::parse(Lexer::lex(Rc::new(Source::source(&source))).unwrap()).unwrap();
        prop_assert_eq!(ast_1.item, ast_2.item);
    }

    /// Standardizing the same parse tree twice must produce structurally
    /// equal standardized trees, for the same reason.
    #[test]
    fn standardization_is_deterministic(a in small_int(), b in small_int()) {
        let source = format!("let x = {} in x + {}", a, b);
        let parse_once = || {
            let tokens = Lexer::lex(Rc::new(Source::source(&source))).unwrap();
            Parser::parse(tokens).unwrap()
        };
        let std_1 = Standardizer::standardize(parse_once()).unwrap();
        let std_2 = Standardizer::standardize(parse_once()).unwrap();
        prop_assert_eq!(std_1.item, std_2.item);
    }

    /// `+`, `-`, `*` run through the full pipeline match native i64
    /// arithmetic over the bounded range the generator produces (well
    /// clear of `BigInt` overflow concerns, which is its own feature).
    #[test]
    fn arithmetic_matches_native(a in small_int(), b in small_int(), op in any::<ArithOp>()) {
        let source = format!("let x = {} in let y = {} in x {} y", a, b, op.rpal_symbol());
        match run_value(&source) {
            Value::Integer(n) => prop_assert_eq!(n, BigInt::from(op.native(a, b))),
            other => prop_assert!(false, "expected Integer, got {:?}", other),
        }
    }

    /// Every slot of a literal tuple comes back out through 1-indexed
    /// application, in the order it was written.
    #[test]
    fn tuple_indexing_is_1_indexed_and_in_order(values in prop::collection::vec(small_int(), 1..6)) {
        let literal = values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ");
        let tuple = format!("({})", literal);
        for (zero_based, expected) in values.iter().enumerate() {
            let index = zero_based + 1;
            let source = format!("{} {}", tuple, index);
            match run_value(&source) {
                Value::Integer(n) => prop_assert_eq!(n, BigInt::from(*expected)),
                other => prop_assert!(false, "expected Integer, got {:?}", other),
            }
        }
    }

    /// `rec`-defined factorial, realized through `Y*`/eta-closure
    /// unwinding, matches the native factorial for every small `n` the
    /// generator produces.
    #[test]
    fn fixed_point_factorial_matches_native(n in 0i64..9) {
        let source = format!(
            "let rec fact k = k eq 0 -> 1 | k * fact(k-1) in fact {}",
            n
        );
        let expected: i64 = (1..=n).product();
        match run_value(&source) {
            Value::Integer(got) => prop_assert_eq!(got, BigInt::from(expected)),
            other => prop_assert!(false, "expected Integer, got {:?}", other),
        }
    }

    /// A closure's capture of its defining environment is by value at
    /// closure-creation time: calling the same closure with the same
    /// argument is deterministic regardless of how many times it has
    /// already been applied.
    #[test]
    fn closure_capture_is_deterministic(n in small_int(), calls in 1usize..5) {
        let source = format!("let adder = fn x . x + {} in adder 1", n);
        let first = match run_value(&source) {
            Value::Integer(v) => v,
            other => panic!("expected Integer, got {:?}", other),
        };
        for _ in 0..calls {
            let repeat = match run_value(&source) {
                Value::Integer(v) => v,
                other => panic!("expected Integer, got {:?}", other),
            };
            prop_assert_eq!(&repeat, &first);
        }
    }
}
