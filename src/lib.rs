//! # rpal
//! An interpreter for RPAL (Right-reference Pedagogic Algorithmic
//! Language): a small, purely functional teaching language evaluated by
//! a Control/Stack/Environment (CSE) abstract machine.
//!
//! ## Overview of the compilation process
//! Source text passes through four stages before anything runs:
//!
//! - [`compiler::lex`] turns source into a token stream.
//! - [`compiler::parse`] builds the parse tree ([`construct::ast`]).
//! - [`compiler::standardize`] rewrites the parse tree into the
//!   standardized binary tree of `gamma`/`lambda` applications
//!   ([`construct::standard`]).
//! - [`compiler::flatten`] linearizes the standardized tree into a
//!   [`common::control::Program`] — an ordered list of control
//!   structures, one per lambda body.
//!
//! [`vm::machine::Machine`] then steps that program to completion,
//! driven by the eight CSE rules, producing either a final [`Value`] or
//! a [`vm::trace::Trace`] runtime fault.
//!
//! Errors before the machine starts running ([`compiler::Syntax`]) and
//! errors the machine raises while running ([`vm::trace::Trace`]) both
//! carry a [`common::span::Span`] into the original source, so every
//! diagnostic this crate produces can point at the line and column
//! responsible.

pub mod common;
pub mod compiler;
pub mod construct;
pub mod core;
pub mod utils;
pub mod vm;

pub use common::source::Source;
pub use common::value::Value;
pub use compiler::Syntax;
pub use vm::trace::Trace;

use std::rc::Rc;

/// The result of a full run: either the program's final value, a
/// compile-time error, or a runtime fault.
#[derive(Debug)]
pub enum RunError {
    Syntax(Syntax),
    Trace(Trace),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunError::Syntax(e) => write!(f, "{}", e),
            RunError::Trace(e) => write!(f, "{}", e),
        }
    }
}

impl From<Syntax> for RunError {
    fn from(e: Syntax) -> RunError {
        RunError::Syntax(e)
    }
}

impl From<Trace> for RunError {
    fn from(e: Trace) -> RunError {
        RunError::Trace(e)
    }
}

/// Lexes, parses, standardizes, and flattens `source`, stopping at the
/// first compile-time error.
pub fn compile(source: Rc<Source>) -> Result<common::control::Program, Syntax> {
    compiler::compile(source)
}

/// Compiles and runs `source` to completion.
pub fn run(source: Rc<Source>) -> Result<Value, RunError> {
    let program = compile(Rc::clone(&source))?;
    let value = vm::machine::Machine::run(source, program)?;
    Ok(value)
}
