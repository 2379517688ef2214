//! Each step in the compiler pipeline turns one datatype into another:
//!
//! ~> Source (string)
//! -> Tokens             : lex.rs
//! -> AST                : parse.rs
//! -> Standardized tree   : standardize.rs
//! -> Program (control structures) : flatten.rs
//! ~> Run (result)        : crate::vm

use std::rc::Rc;

use crate::common::control::Program;
use crate::common::source::Source;

pub mod flatten;
pub mod lex;
pub mod parse;
pub mod standardize;
pub mod syntax;

pub use syntax::Syntax;

/// Runs the full front end: lex, parse, standardize, flatten. Chained
/// the way the teacher's `lex -> parse -> gen` pipeline is, so each
/// stage only has to know the one before it.
pub fn compile(source: Rc<Source>) -> Result<Program, Syntax> {
    let tokens = lex::Lexer::lex(source)?;
    let ast = parse::Parser::parse(tokens)?;
    let standard = standardize::Standardizer::standardize(ast)?;
    Ok(flatten::Flattener::flatten(&standard))
}
