//! Tokens produced by the lexer.

use bitflags::bitflags;
use jsfront_common::{Atom, Span};
use serde::Serialize;

use crate::token_kind::{LexMode, TokenKind};

bitflags! {
    /// Per-token facts the parser consults after lexing.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u8 {
        /// A line terminator appeared between the previous token and this one.
        const NEWLINE_BEFORE = 1 << 0;
        /// An identifier or keyword was spelled with a unicode escape.
        const HAS_ESCAPE = 1 << 1;
        /// A legacy octal (`017`) or leading-zero decimal (`08`) number.
        const LEGACY_OCTAL = 1 << 2;
        /// A string containing a legacy octal escape (`"\1"`) or `\8`/`\9`.
        const OCTAL_ESCAPE = 1 << 3;
        /// A template chunk that continues after a substitution's `}`.
        const TEMPLATE_TAIL = 1 << 4;
        /// Synthesized by `TokenStream::advance_to`, not lexed.
        const SYNTHETIC = 1 << 5;
    }
}

/// Payload of a token. Every variant is `Copy`: strings are interned.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Default)]
pub enum TokenValue {
    #[default]
    None,
    /// Identifier or private name (without `#`), escapes decoded.
    Name(Atom),
    Number(f64),
    /// BigInt digits (prefix kept, separators and `n` removed).
    BigInt(Atom),
    /// Cooked string literal value.
    String(Atom),
    RegExp { pattern: Atom, flags: Atom },
    /// `cooked` is `None` when the chunk has an invalid escape, which is only
    /// legal in tagged templates.
    Template { cooked: Option<Atom>, raw: Atom },
}

/// An immutable lexed token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    pub flags: TokenFlags,
    pub value: TokenValue,
    /// Mode the token was lexed under.
    pub mode: LexMode,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, mode: LexMode) -> Self {
        Token {
            kind,
            span,
            flags: TokenFlags::empty(),
            value: TokenValue::None,
            mode,
        }
    }

    /// End-of-input token at `pos`.
    pub fn eof(pos: u32) -> Self {
        Token::new(TokenKind::Eof, Span::at(pos), LexMode::Operand)
    }

    #[inline]
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    #[inline]
    pub fn newline_before(&self) -> bool {
        self.flags.contains(TokenFlags::NEWLINE_BEFORE)
    }

    #[inline]
    pub fn has_escape(&self) -> bool {
        self.flags.contains(TokenFlags::HAS_ESCAPE)
    }

    /// The name atom of a `Name` or `PrivateName` token.
    pub fn name(&self) -> Option<Atom> {
        match self.value {
            TokenValue::Name(atom) => Some(atom),
            _ => None,
        }
    }

    /// True for an unescaped `Name` token spelling `atom`. Contextual
    /// keywords only count when written literally.
    #[inline]
    pub fn is_contextual(&self, atom: Atom) -> bool {
        self.kind == TokenKind::Name && !self.has_escape() && self.value == TokenValue::Name(atom)
    }

    pub fn number(&self) -> Option<f64> {
        match self.value {
            TokenValue::Number(value) => Some(value),
            _ => None,
        }
    }

    pub fn string_atom(&self) -> Option<Atom> {
        match self.value {
            TokenValue::String(atom) => Some(atom),
            _ => None,
        }
    }

    /// Whether this token must be lexed again before being handed out under
    /// `mode`: `/` versus a regular expression, `}` versus a template tail.
    pub fn needs_relex(&self, mode: LexMode) -> bool {
        match self.kind {
            TokenKind::Div | TokenKind::DivAssign | TokenKind::RegExp => {
                (self.mode == LexMode::Operand) != (mode == LexMode::Operand)
            }
            TokenKind::RightCurly => self.mode != LexMode::TemplateTail && mode == LexMode::TemplateTail,
            TokenKind::TemplateHead | TokenKind::NoSubsTemplate => {
                self.flags.contains(TokenFlags::TEMPLATE_TAIL) && mode != LexMode::TemplateTail
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_relex() {
        let div = Token::new(TokenKind::Div, Span::new(0, 1), LexMode::Operator);
        assert!(div.needs_relex(LexMode::Operand));
        assert!(!div.needs_relex(LexMode::TemplateTail));

        let curly = Token::new(TokenKind::RightCurly, Span::new(0, 1), LexMode::Operand);
        assert!(curly.needs_relex(LexMode::TemplateTail));
        assert!(!curly.needs_relex(LexMode::Operator));

        let name = Token::new(TokenKind::Name, Span::new(0, 1), LexMode::Operand);
        assert!(!name.needs_relex(LexMode::Operator));
    }
}
