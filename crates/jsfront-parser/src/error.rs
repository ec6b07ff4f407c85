//! Parse errors.
//!
//! `ParseError` is the only failure that leaves the parser. Internally every
//! grammar routine returns `PResult`, whose error side also carries the two
//! control-flow signals used for speculative parsing: aborting a syntax-only
//! attempt and restarting a function after a directive changed its mode.

use std::fmt;

use jsfront_common::Diagnostic;
use jsfront_common::diagnostics::diagnostic_codes;
use serde::Serialize;

/// Category of a fatal parse error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// Lexical, syntax or early (static semantic) error.
    Syntax,
    OutOfMemory,
    TooMuchRecursion,
}

/// A fatal parse error. Parsing stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub diagnostic: Diagnostic,
}

impl ParseError {
    pub fn syntax(diagnostic: Diagnostic) -> Self {
        ParseError {
            kind: ParseErrorKind::Syntax,
            diagnostic,
        }
    }

    pub fn too_much_recursion(pos: u32) -> Self {
        ParseError {
            kind: ParseErrorKind::TooMuchRecursion,
            diagnostic: Diagnostic::error(diagnostic_codes::OVER_RECURSED, pos, 0, &[]),
        }
    }

    pub fn out_of_memory(pos: u32) -> Self {
        ParseError {
            kind: ParseErrorKind::OutOfMemory,
            diagnostic: Diagnostic::error(diagnostic_codes::OUT_OF_MEMORY, pos, 0, &[]),
        }
    }

    /// Message code of the underlying diagnostic.
    pub fn code(&self) -> u32 {
        self.diagnostic.code
    }

    pub fn message(&self) -> &str {
        &self.diagnostic.message_text
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (at offset {})",
            self.diagnostic.message_text, self.diagnostic.start
        )
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        ParseError::syntax(diagnostic)
    }
}

/// Internal failure of a grammar routine.
#[derive(Clone, Debug, PartialEq)]
pub enum ParseFailure {
    Error(ParseError),
    /// The syntax-only parser met a construct it cannot summarise; the full
    /// parser rewinds and parses the enclosing inner function for real.
    AbortSyntaxParse,
    /// A directive changed the function's mode; the enclosing function
    /// definition rewinds and parses again with the new directives.
    Reparse,
}

impl From<ParseError> for ParseFailure {
    fn from(error: ParseError) -> Self {
        ParseFailure::Error(error)
    }
}

impl From<Diagnostic> for ParseFailure {
    fn from(diagnostic: Diagnostic) -> Self {
        ParseFailure::Error(ParseError::syntax(diagnostic))
    }
}

pub type PResult<T> = Result<T, ParseFailure>;
