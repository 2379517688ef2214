//! `Syntax` covers everything that can go wrong before the CSE machine
//! starts running: lexical errors, parse errors, and (should they ever
//! be reachable, which would indicate an internal bug) standardization
//! errors.

use std::fmt;

use crate::common::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexical,
    Syntax,
    Standardization,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Lexical => "Lexical",
            Stage::Syntax => "Syntax",
            Stage::Standardization => "Standardization",
        };
        write!(f, "{}", name)
    }
}

/// A compile-time error, carrying the stage it occurred at, a message,
/// and the [`Span`] of source responsible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    pub stage: Stage,
    pub message: String,
    pub span: Span,
}

impl Syntax {
    pub fn lexical(message: String, span: Span) -> Syntax {
        Syntax { stage: Stage::Lexical, message, span }
    }

    pub fn syntax(message: String, span: Span) -> Syntax {
        Syntax { stage: Stage::Syntax, message, span }
    }

    pub fn standardization(message: String, span: Span) -> Syntax {
        Syntax { stage: Stage::Standardization, message, span }
    }
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, col) = self.span.start_line_col();
        write!(f, "{}Error: {} at line {} column {}", self.stage, self.message, line, col)
    }
}

impl std::error::Error for Syntax {}
