//! Represents a loaded piece of RPAL source code.

use std::{fmt, fs, io, path::PathBuf};

/// A single piece of RPAL source, either loaded from a file or
/// constructed in-memory (e.g. for tests). Kept around for the lifetime
/// of a compile/run so that [`crate::common::span::Span`]s can index
/// back into it for error rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub contents: String,
    pub path: Option<PathBuf>,
}

impl Source {
    /// Loads a source file from disk.
    pub fn path(path: impl Into<PathBuf>) -> io::Result<Source> {
        let path = path.into();
        let contents = fs::read_to_string(&path)?;
        Ok(Source { contents, path: Some(path) })
    }

    /// Builds a source directly from a string, with no backing file.
    /// Used by tests and by anything that builds RPAL text in-memory.
    pub fn source(contents: impl Into<String>) -> Source {
        Source { contents: contents.into(), path: None }
    }

    /// A human-readable name for this source, used in diagnostics.
    pub fn name(&self) -> String {
        match &self.path {
            Some(p) => p.display().to_string(),
            None => "<source>".to_string(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
