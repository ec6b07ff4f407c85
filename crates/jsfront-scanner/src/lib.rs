//! JavaScript token stream for the jsfront parser.
//!
//! This crate provides the lexical analysis phase:
//! - `TokenKind` - Token categories, keyword table and operator precedence
//! - `Token` / `TokenValue` / `TokenFlags` - Immutable tokens with byte spans
//! - `Lexer` - Raw scanning of one token under a `LexMode`
//! - `TokenStream` - Lookahead, pushback and save/seek checkpoints

pub mod token_kind;
pub use token_kind::{LexMode, TokenKind};

pub mod token;
pub use token::{Token, TokenFlags, TokenValue};

pub mod lexer;
pub use lexer::Lexer;

pub mod token_stream;
pub use token_stream::{TokenStream, TokenStreamPosition};

pub mod char_codes;

/// Result of a lexing operation; lexical errors are fatal diagnostics.
pub type LexResult<T> = Result<T, jsfront_common::Diagnostic>;
