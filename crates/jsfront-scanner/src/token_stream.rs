//! Token stream with lookahead, pushback and checkpoints.
//!
//! The parser pulls tokens with an explicit `LexMode`. A token that was
//! peeked under one mode and is then requested under a mode that lexes it
//! differently (`/` versus a regular expression, `}` versus a template tail)
//! is lexed again from its start offset.

use jsfront_common::{Atom, Interner, Span};
use smallvec::SmallVec;

use crate::LexResult;
use crate::lexer::Lexer;
use crate::token::{Token, TokenFlags};
use crate::token_kind::{LexMode, TokenKind};

/// Number of already-consumed tokens remembered for `unget_token`.
const HISTORY_LEN: usize = 4;

/// A saved stream position; restoring it with `TokenStream::seek` replays
/// the same tokens.
#[derive(Clone, Debug)]
pub struct TokenStreamPosition {
    lexer_pos: u32,
    history: SmallVec<[Token; HISTORY_LEN]>,
    lookahead: SmallVec<[Token; 2]>,
}

impl TokenStreamPosition {
    /// Offset just past the current token.
    pub fn offset(&self) -> u32 {
        self.history.last().map_or(0, |token| token.span.end)
    }
}

pub struct TokenStream<'s> {
    lexer: Lexer<'s>,
    interner: Interner,
    /// Consumed tokens, most recent last. The last one is the current token.
    history: SmallVec<[Token; HISTORY_LEN]>,
    /// Tokens lexed ahead of the current one; the next token is last.
    lookahead: SmallVec<[Token; 2]>,
}

impl<'s> TokenStream<'s> {
    pub fn new(source: &'s str, interner: Interner) -> Self {
        TokenStream {
            lexer: Lexer::new(source),
            interner,
            history: SmallVec::new(),
            lookahead: SmallVec::new(),
        }
    }

    #[inline]
    pub fn source(&self) -> &'s str {
        self.lexer.source()
    }

    #[inline]
    pub fn source_len(&self) -> u32 {
        self.source().len() as u32
    }

    /// Source text covered by `span`.
    pub fn text(&self, span: Span) -> &'s str {
        self.source().get(span.start as usize..span.end as usize).unwrap_or("")
    }

    #[inline]
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    #[inline]
    pub fn interner_mut(&mut self) -> &mut Interner {
        &mut self.interner
    }

    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn into_interner(self) -> Interner {
        self.interner
    }

    pub fn source_map_url(&self) -> Option<&str> {
        self.lexer.source_map_url()
    }

    /// The most recently consumed token.
    #[inline]
    pub fn current(&self) -> Token {
        self.history.last().copied().unwrap_or_else(|| Token::eof(0))
    }

    /// Consume and return the next token, lexed under `mode`.
    pub fn get_token(&mut self, mode: LexMode) -> LexResult<Token> {
        let token = match self.lookahead.pop() {
            Some(token) if !token.needs_relex(mode) => token,
            Some(stale) => {
                self.lookahead.clear();
                self.lexer.seek(stale.span.start);
                let mut token = self.lexer.lex(mode, &mut self.interner)?;
                token.flags |= stale.flags & TokenFlags::NEWLINE_BEFORE;
                token
            }
            None => self.lexer.lex(mode, &mut self.interner)?,
        };
        self.push_history(token);
        Ok(token)
    }

    /// Return the next token without consuming it.
    pub fn peek_token(&mut self, mode: LexMode) -> LexResult<Token> {
        let token = self.get_token(mode)?;
        self.unget_token();
        Ok(token)
    }

    /// Peek the next token, or `None` if a line terminator precedes it.
    pub fn peek_token_same_line(&mut self, mode: LexMode) -> LexResult<Option<Token>> {
        let token = self.peek_token(mode)?;
        Ok((!token.newline_before()).then_some(token))
    }

    /// Push the current token back so the next `get_token` returns it again.
    pub fn unget_token(&mut self) {
        match self.history.pop() {
            Some(token) => self.lookahead.push(token),
            None => debug_assert!(false, "unget_token with no current token"),
        }
    }

    /// Consume the next token if it is `kind`.
    pub fn match_token(&mut self, kind: TokenKind, mode: LexMode) -> LexResult<bool> {
        let token = self.get_token(mode)?;
        if token.kind == kind {
            return Ok(true);
        }
        self.unget_token();
        Ok(false)
    }

    /// Consume the next token if it is the unescaped contextual keyword `atom`.
    pub fn match_contextual(&mut self, atom: Atom, mode: LexMode) -> LexResult<bool> {
        let token = self.get_token(mode)?;
        if token.is_contextual(atom) {
            return Ok(true);
        }
        self.unget_token();
        Ok(false)
    }

    /// Save the current position.
    pub fn position(&self) -> TokenStreamPosition {
        TokenStreamPosition {
            lexer_pos: self.lexer.pos(),
            history: self.history.clone(),
            lookahead: self.lookahead.clone(),
        }
    }

    /// Restore a position saved by `position`.
    pub fn seek(&mut self, position: &TokenStreamPosition) {
        self.lexer.seek(position.lexer_pos);
        self.history = position.history.clone();
        self.lookahead = position.lookahead.clone();
    }

    /// Jump to `offset`, which must be the end of a skipped function. The
    /// current token becomes a synthetic `}` ending at `offset`.
    pub fn advance_to(&mut self, offset: u32) {
        self.lookahead.clear();
        self.lexer.seek(offset);
        let mut token = Token::new(
            TokenKind::RightCurly,
            Span::new(offset.saturating_sub(1), offset),
            LexMode::Operand,
        );
        token.flags |= TokenFlags::SYNTHETIC;
        self.push_history(token);
    }

    fn push_history(&mut self, token: Token) {
        if self.history.len() == HISTORY_LEN {
            self.history.remove(0);
        }
        self.history.push(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unget_then_get_returns_same_token() {
        let mut stream = TokenStream::new("a b", Interner::new());
        let a = stream.get_token(LexMode::Operand).expect("lexes");
        stream.unget_token();
        let again = stream.get_token(LexMode::Operand).expect("lexes");
        assert_eq!(a, again);
        assert_eq!(stream.current(), a);
    }
}
