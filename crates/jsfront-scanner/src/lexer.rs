//! Raw lexer: turns source bytes into one token at a time.
//!
//! The lexer is stateless between tokens apart from its byte offset, which
//! lets the token stream rewind it with `seek` and lex a token again under a
//! different `LexMode`.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Diagnostic, Interner, Span};
use memchr::{memchr3, memmem};
use tracing::trace;

use crate::LexResult;
use crate::char_codes::{
    BACKSLASH, CARRIAGE_RETURN, LINE_FEED, digit_value, hex_value, is_ascii_id_continue,
    is_ascii_id_start, is_id_continue, is_id_start, is_line_terminator, is_white_space,
};
use crate::token::{Token, TokenFlags, TokenValue};
use crate::token_kind::{LexMode, TokenKind};

/// Regular expression flags accepted after the closing `/`.
const REGEXP_FLAGS: &str = "dgimsuy";

/// Problem found while decoding an escape sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EscapeError {
    /// Input ended right after the backslash.
    Eof,
    /// Malformed escape; the payload names its family for the message.
    Malformed(&'static str),
}

pub struct Lexer<'s> {
    source: &'s str,
    bytes: &'s [u8],
    pos: usize,
    /// URL from a `//# sourceMappingURL=` comment, last one wins.
    source_map_url: Option<String>,
}

impl<'s> Lexer<'s> {
    /// Create a lexer positioned at the start of `source`. A leading `#!`
    /// line is skipped.
    pub fn new(source: &'s str) -> Self {
        let mut lexer = Lexer {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            source_map_url: None,
        };
        if source.starts_with("#!") {
            lexer.pos = lexer.find_line_end(2);
        }
        lexer
    }

    #[inline]
    pub fn source(&self) -> &'s str {
        self.source
    }

    /// Current byte offset.
    #[inline]
    pub fn pos(&self) -> u32 {
        self.pos as u32
    }

    /// Reposition the lexer. `pos` must be a token boundary.
    pub fn seek(&mut self, pos: u32) {
        self.pos = (pos as usize).min(self.bytes.len());
    }

    pub fn source_map_url(&self) -> Option<&str> {
        self.source_map_url.as_deref()
    }

    /// Lex the next token under `mode`.
    pub fn lex(&mut self, mode: LexMode, interner: &mut Interner) -> LexResult<Token> {
        let newline = self.skip_trivia()?;
        let start = self.pos;
        let mut token = self.lex_token(start, mode, interner)?;
        if newline {
            token.flags |= TokenFlags::NEWLINE_BEFORE;
        }
        trace!(kind = ?token.kind, start = token.span.start, end = token.span.end, "lex");
        Ok(token)
    }

    // =========================================================================
    // Character helpers
    // =========================================================================

    #[inline]
    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    #[inline]
    fn char_at(&self, pos: usize) -> Option<char> {
        self.source.get(pos..).and_then(|rest| rest.chars().next())
    }

    fn error(&self, code: u32, start: usize, end: usize, args: &[&str]) -> Diagnostic {
        Diagnostic::error(code, start as u32, end.saturating_sub(start) as u32, args)
    }

    fn make(&self, kind: TokenKind, start: usize, mode: LexMode) -> Token {
        Token::new(kind, Span::new(start as u32, self.pos as u32), mode)
    }

    /// Consume a `len`-byte punctuator.
    fn punct(&mut self, kind: TokenKind, len: usize, start: usize, mode: LexMode) -> Token {
        self.pos = start + len;
        self.make(kind, start, mode)
    }

    /// Offset of the next line terminator at or after `from` (or the end).
    fn find_line_end(&self, from: usize) -> usize {
        let mut at = from;
        while at < self.bytes.len() {
            match memchr3(LINE_FEED, CARRIAGE_RETURN, 0xE2, &self.bytes[at..]) {
                None => return self.bytes.len(),
                Some(offset) => {
                    let hit = at + offset;
                    if self.bytes[hit] != 0xE2 {
                        return hit;
                    }
                    if self.char_at(hit).is_some_and(is_line_terminator) {
                        return hit;
                    }
                    at = hit + 1;
                }
            }
        }
        self.bytes.len()
    }

    // =========================================================================
    // Trivia
    // =========================================================================

    /// Skip whitespace and comments. Returns whether a line terminator was
    /// crossed.
    fn skip_trivia(&mut self) -> LexResult<bool> {
        let mut newline = false;
        while let Some(b) = self.peek_byte() {
            match b {
                b' ' | b'\t' | 0x0B | 0x0C => self.pos += 1,
                LINE_FEED | CARRIAGE_RETURN => {
                    newline = true;
                    self.pos += 1;
                }
                b'/' if self.byte_at(self.pos + 1) == Some(b'/') => {
                    let body_start = self.pos + 2;
                    let end = self.find_line_end(body_start);
                    self.note_source_map_comment(body_start, end);
                    self.pos = end;
                }
                b'/' if self.byte_at(self.pos + 1) == Some(b'*') => {
                    let start = self.pos;
                    let body_start = start + 2;
                    let Some(offset) = memmem::find(&self.bytes[body_start..], b"*/") else {
                        return Err(self.error(
                            diagnostic_codes::UNTERMINATED_COMMENT,
                            start,
                            self.bytes.len(),
                            &[],
                        ));
                    };
                    let body_end = body_start + offset;
                    if self.find_line_end(body_start) < body_end {
                        newline = true;
                    }
                    self.pos = body_end + 2;
                }
                b if b < 0x80 => break,
                _ => match self.char_at(self.pos) {
                    Some(c) if is_line_terminator(c) => {
                        newline = true;
                        self.pos += c.len_utf8();
                    }
                    Some(c) if is_white_space(c) => self.pos += c.len_utf8(),
                    _ => break,
                },
            }
        }
        Ok(newline)
    }

    /// Record `//# sourceMappingURL=<url>` (or the older `//@` form).
    fn note_source_map_comment(&mut self, body_start: usize, end: usize) {
        let body = &self.source[body_start..end];
        let Some(rest) = body.strip_prefix('#').or_else(|| body.strip_prefix('@')) else {
            return;
        };
        let Some(url) = rest.trim_start_matches([' ', '\t']).strip_prefix("sourceMappingURL=") else {
            return;
        };
        let url: String = url.chars().take_while(|c| !c.is_whitespace()).collect();
        if !url.is_empty() {
            self.source_map_url = Some(url);
        }
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    fn lex_token(&mut self, start: usize, mode: LexMode, interner: &mut Interner) -> LexResult<Token> {
        use TokenKind as K;

        let Some(b) = self.peek_byte() else {
            return Ok(Token::eof(start as u32));
        };
        let next = self.byte_at(start + 1);
        let next2 = self.byte_at(start + 2);
        let next3 = self.byte_at(start + 3);

        let token = match b {
            b'(' => self.punct(K::LeftParen, 1, start, mode),
            b')' => self.punct(K::RightParen, 1, start, mode),
            b'[' => self.punct(K::LeftBracket, 1, start, mode),
            b']' => self.punct(K::RightBracket, 1, start, mode),
            b'{' => self.punct(K::LeftCurly, 1, start, mode),
            b'}' if mode == LexMode::TemplateTail => {
                self.pos = start + 1;
                return self.lex_template(start, true, mode, interner);
            }
            b'}' => self.punct(K::RightCurly, 1, start, mode),
            b';' => self.punct(K::Semi, 1, start, mode),
            b',' => self.punct(K::Comma, 1, start, mode),
            b':' => self.punct(K::Colon, 1, start, mode),
            b'~' => self.punct(K::BitNot, 1, start, mode),
            b'@' => self.punct(K::At, 1, start, mode),
            b'?' => match (next, next2) {
                (Some(b'?'), Some(b'=')) => self.punct(K::CoalesceAssign, 3, start, mode),
                (Some(b'?'), _) => self.punct(K::Coalesce, 2, start, mode),
                // `a?.5:b` is a conditional, not an optional chain.
                (Some(b'.'), next2) if !next2.is_some_and(|c| c.is_ascii_digit()) => {
                    self.punct(K::OptionalChain, 2, start, mode)
                }
                _ => self.punct(K::Hook, 1, start, mode),
            },
            b'.' => match (next, next2) {
                (Some(b'.'), Some(b'.')) => self.punct(K::TripleDot, 3, start, mode),
                (Some(d), _) if d.is_ascii_digit() => return self.lex_number(start, mode, interner),
                _ => self.punct(K::Dot, 1, start, mode),
            },
            b'=' => match (next, next2) {
                (Some(b'='), Some(b'=')) => self.punct(K::StrictEq, 3, start, mode),
                (Some(b'='), _) => self.punct(K::Eq, 2, start, mode),
                (Some(b'>'), _) => self.punct(K::Arrow, 2, start, mode),
                _ => self.punct(K::Assign, 1, start, mode),
            },
            b'!' => match (next, next2) {
                (Some(b'='), Some(b'=')) => self.punct(K::StrictNe, 3, start, mode),
                (Some(b'='), _) => self.punct(K::Ne, 2, start, mode),
                _ => self.punct(K::Not, 1, start, mode),
            },
            b'<' => match (next, next2) {
                (Some(b'<'), Some(b'=')) => self.punct(K::LshAssign, 3, start, mode),
                (Some(b'<'), _) => self.punct(K::Lsh, 2, start, mode),
                (Some(b'='), _) => self.punct(K::Le, 2, start, mode),
                _ => self.punct(K::Lt, 1, start, mode),
            },
            b'>' => match (next, next2, next3) {
                (Some(b'>'), Some(b'>'), Some(b'=')) => self.punct(K::UrshAssign, 4, start, mode),
                (Some(b'>'), Some(b'>'), _) => self.punct(K::Ursh, 3, start, mode),
                (Some(b'>'), Some(b'='), _) => self.punct(K::RshAssign, 3, start, mode),
                (Some(b'>'), _, _) => self.punct(K::Rsh, 2, start, mode),
                (Some(b'='), _, _) => self.punct(K::Ge, 2, start, mode),
                _ => self.punct(K::Gt, 1, start, mode),
            },
            b'+' => match next {
                Some(b'+') => self.punct(K::Inc, 2, start, mode),
                Some(b'=') => self.punct(K::AddAssign, 2, start, mode),
                _ => self.punct(K::Add, 1, start, mode),
            },
            b'-' => match next {
                Some(b'-') => self.punct(K::Dec, 2, start, mode),
                Some(b'=') => self.punct(K::SubAssign, 2, start, mode),
                _ => self.punct(K::Sub, 1, start, mode),
            },
            b'*' => match (next, next2) {
                (Some(b'*'), Some(b'=')) => self.punct(K::PowAssign, 3, start, mode),
                (Some(b'*'), _) => self.punct(K::Pow, 2, start, mode),
                (Some(b'='), _) => self.punct(K::MulAssign, 2, start, mode),
                _ => self.punct(K::Mul, 1, start, mode),
            },
            b'%' => match next {
                Some(b'=') => self.punct(K::ModAssign, 2, start, mode),
                _ => self.punct(K::Mod, 1, start, mode),
            },
            b'&' => match (next, next2) {
                (Some(b'&'), Some(b'=')) => self.punct(K::AndAssign, 3, start, mode),
                (Some(b'&'), _) => self.punct(K::And, 2, start, mode),
                (Some(b'='), _) => self.punct(K::BitAndAssign, 2, start, mode),
                _ => self.punct(K::BitAnd, 1, start, mode),
            },
            b'|' => match (next, next2) {
                (Some(b'|'), Some(b'=')) => self.punct(K::OrAssign, 3, start, mode),
                (Some(b'|'), _) => self.punct(K::Or, 2, start, mode),
                (Some(b'='), _) => self.punct(K::BitOrAssign, 2, start, mode),
                _ => self.punct(K::BitOr, 1, start, mode),
            },
            b'^' => match next {
                Some(b'=') => self.punct(K::BitXorAssign, 2, start, mode),
                _ => self.punct(K::BitXor, 1, start, mode),
            },
            b'/' if mode == LexMode::Operand => return self.lex_regexp(start, mode, interner),
            b'/' => match next {
                Some(b'=') => self.punct(K::DivAssign, 2, start, mode),
                _ => self.punct(K::Div, 1, start, mode),
            },
            b'"' | b'\'' => return self.lex_string(start, b, mode, interner),
            b'`' => {
                self.pos = start + 1;
                return self.lex_template(start, false, mode, interner);
            }
            b'#' => {
                self.pos = start + 1;
                let starts_name = match self.peek_byte() {
                    Some(c) if c < 0x80 => is_ascii_id_start(c) || c == BACKSLASH,
                    Some(_) => self.char_at(self.pos).is_some_and(is_id_start),
                    None => false,
                };
                if !starts_name {
                    return Err(self.error(diagnostic_codes::ILLEGAL_CHARACTER, start, start + 1, &[]));
                }
                return self.lex_identifier(start, self.pos, true, mode, interner);
            }
            b'0'..=b'9' => return self.lex_number(start, mode, interner),
            b if is_ascii_id_start(b) || b == BACKSLASH => {
                return self.lex_identifier(start, start, false, mode, interner);
            }
            b if b >= 0x80 => match self.char_at(start) {
                Some(c) if is_id_start(c) => return self.lex_identifier(start, start, false, mode, interner),
                Some(c) => {
                    return Err(self.error(
                        diagnostic_codes::ILLEGAL_CHARACTER,
                        start,
                        start + c.len_utf8(),
                        &[],
                    ));
                }
                None => return Err(self.error(diagnostic_codes::ILLEGAL_CHARACTER, start, start + 1, &[])),
            },
            _ => return Err(self.error(diagnostic_codes::ILLEGAL_CHARACTER, start, start + 1, &[])),
        };
        Ok(token)
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Lex an identifier (or private name when `private`) whose text starts
    /// at `name_start`.
    fn lex_identifier(
        &mut self,
        start: usize,
        name_start: usize,
        private: bool,
        mode: LexMode,
        interner: &mut Interner,
    ) -> LexResult<Token> {
        self.pos = name_start;
        let mut cooked: Option<String> = None;
        loop {
            let Some(b) = self.peek_byte() else { break };
            let first = self.pos == name_start;
            if b < 0x80 && b != BACKSLASH {
                let ok = if first { is_ascii_id_start(b) } else { is_ascii_id_continue(b) };
                if !ok {
                    break;
                }
                if let Some(text) = cooked.as_mut() {
                    text.push(char::from(b));
                }
                self.pos += 1;
            } else if b == BACKSLASH {
                let escape_start = self.pos;
                if self.byte_at(self.pos + 1) != Some(b'u') {
                    return Err(self.error(
                        diagnostic_codes::MALFORMED_ESCAPE,
                        escape_start,
                        escape_start + 1,
                        &["Unicode"],
                    ));
                }
                self.pos += 2;
                let c = self
                    .lex_unicode_escape()
                    .ok()
                    .and_then(char::from_u32)
                    .filter(|&c| if first { is_id_start(c) } else { is_id_continue(c) })
                    .ok_or_else(|| {
                        self.error(diagnostic_codes::MALFORMED_ESCAPE, escape_start, self.pos, &["Unicode"])
                    })?;
                cooked
                    .get_or_insert_with(|| self.source[name_start..escape_start].to_string())
                    .push(c);
            } else {
                let Some(c) = self.char_at(self.pos) else { break };
                let ok = if first { is_id_start(c) } else { is_id_continue(c) };
                if !ok {
                    break;
                }
                if let Some(text) = cooked.as_mut() {
                    text.push(c);
                }
                self.pos += c.len_utf8();
            }
        }

        let has_escape = cooked.is_some();
        let atom = match cooked {
            Some(text) => interner.intern_owned(text),
            None => interner.intern(&self.source[name_start..self.pos]),
        };
        let kind = if private {
            TokenKind::PrivateName
        } else if has_escape {
            TokenKind::Name
        } else {
            TokenKind::keyword(interner.resolve(atom)).unwrap_or(TokenKind::Name)
        };
        let mut token = self.make(kind, start, mode);
        token.value = TokenValue::Name(atom);
        if has_escape {
            token.flags |= TokenFlags::HAS_ESCAPE;
        }
        Ok(token)
    }

    /// Decode the part of a `\u` escape after the `u`: either `XXXX` or
    /// `{X...}`. Returns the code point.
    fn lex_unicode_escape(&mut self) -> Result<u32, EscapeError> {
        if self.peek_byte() == Some(b'{') {
            self.pos += 1;
            let mut value: u32 = 0;
            let mut digits = 0;
            while let Some(d) = self.peek_byte().and_then(hex_value) {
                value = value.saturating_mul(16).saturating_add(d);
                digits += 1;
                self.pos += 1;
            }
            if digits == 0 || value > 0x10FFFF || self.peek_byte() != Some(b'}') {
                return Err(EscapeError::Malformed("Unicode"));
            }
            self.pos += 1;
            return Ok(value);
        }
        let mut value = 0;
        for _ in 0..4 {
            let Some(d) = self.peek_byte().and_then(hex_value) else {
                return Err(EscapeError::Malformed("Unicode"));
            };
            value = value * 16 + d;
            self.pos += 1;
        }
        Ok(value)
    }

    // =========================================================================
    // Numbers
    // =========================================================================

    /// Scan digits of `radix`, with numeric separators if allowed. Returns
    /// the digit count and their value.
    fn scan_digits(&mut self, radix: u32, separators: bool) -> LexResult<(usize, f64)> {
        let mut count = 0;
        let mut value = 0.0f64;
        let mut last_separator = false;
        while let Some(b) = self.peek_byte() {
            if b == b'_' && separators {
                if count == 0 || last_separator {
                    return Err(self.error(diagnostic_codes::NUMERIC_SEPARATOR, self.pos, self.pos + 1, &[]));
                }
                last_separator = true;
            } else if let Some(d) = digit_value(b, radix) {
                value = value * f64::from(radix) + f64::from(d);
                count += 1;
                last_separator = false;
            } else {
                break;
            }
            self.pos += 1;
        }
        if last_separator {
            return Err(self.error(diagnostic_codes::NUMERIC_SEPARATOR, self.pos - 1, self.pos, &[]));
        }
        Ok((count, value))
    }

    fn lex_number(&mut self, start: usize, mode: LexMode, interner: &mut Interner) -> LexResult<Token> {
        self.pos = start;
        let mut flags = TokenFlags::empty();
        let first = self.bytes[start];
        let radix_prefix = match (first, self.byte_at(start + 1)) {
            (b'0', Some(b'x' | b'X')) => Some(16),
            (b'0', Some(b'o' | b'O')) => Some(8),
            (b'0', Some(b'b' | b'B')) => Some(2),
            _ => None,
        };

        let mut is_integer = true;
        let value = if let Some(radix) = radix_prefix {
            self.pos += 2;
            let (count, value) = self.scan_digits(radix, true)?;
            if count == 0 {
                let prefix = &self.source[start..start + 2];
                return Err(self.error(diagnostic_codes::MISSING_DIGITS, start, self.pos, &[prefix]));
            }
            value
        } else if first == b'0' && self.byte_at(start + 1).is_some_and(|b| b.is_ascii_digit()) {
            // Legacy `017` octal, or `089` decimal with a leading zero.
            flags |= TokenFlags::LEGACY_OCTAL;
            self.pos += 1;
            let digits_start = self.pos;
            while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            let digits = &self.bytes[digits_start..self.pos];
            if digits.iter().all(|&b| b < b'8') {
                digits
                    .iter()
                    .fold(0.0, |acc, &b| acc * 8.0 + f64::from(b - b'0'))
            } else {
                is_integer = self.scan_fraction_and_exponent()?;
                self.parse_decimal(start)?
            }
        } else {
            if first != b'.' {
                self.scan_digits(10, true)?;
            }
            is_integer = self.scan_fraction_and_exponent()?;
            self.parse_decimal(start)?
        };

        if is_integer && !flags.contains(TokenFlags::LEGACY_OCTAL) && self.peek_byte() == Some(b'n') {
            let digits: String = self.source[start..self.pos].chars().filter(|&c| c != '_').collect();
            self.pos += 1;
            self.check_no_identifier_after_number()?;
            let mut token = self.make(TokenKind::BigInt, start, mode);
            token.value = TokenValue::BigInt(interner.intern_owned(digits));
            return Ok(token);
        }

        self.check_no_identifier_after_number()?;
        let mut token = self.make(TokenKind::Number, start, mode);
        token.flags = flags;
        token.value = TokenValue::Number(value);
        Ok(token)
    }

    /// Scan an optional `.digits` and exponent. Returns whether the literal
    /// is still an integer literal.
    fn scan_fraction_and_exponent(&mut self) -> LexResult<bool> {
        let mut is_integer = true;
        if self.peek_byte() == Some(b'.') {
            is_integer = false;
            self.pos += 1;
            if self.peek_byte() == Some(b'_') {
                return Err(self.error(diagnostic_codes::NUMERIC_SEPARATOR, self.pos, self.pos + 1, &[]));
            }
            self.scan_digits(10, true)?;
        }
        if matches!(self.peek_byte(), Some(b'e' | b'E')) {
            is_integer = false;
            let exponent_start = self.pos;
            self.pos += 1;
            if matches!(self.peek_byte(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            let (count, _) = self.scan_digits(10, true)?;
            if count == 0 {
                return Err(self.error(
                    diagnostic_codes::MISSING_DIGITS,
                    exponent_start,
                    self.pos,
                    &["exponent"],
                ));
            }
        }
        Ok(is_integer)
    }

    fn parse_decimal(&self, start: usize) -> LexResult<f64> {
        let text: String = self.source[start..self.pos].chars().filter(|&c| c != '_').collect();
        text.parse::<f64>()
            .map_err(|_| self.error(diagnostic_codes::MISSING_DIGITS, start, self.pos, &["number"]))
    }

    fn check_no_identifier_after_number(&self) -> LexResult<()> {
        let follows = match self.peek_byte() {
            None => false,
            Some(b) if b < 0x80 => is_ascii_id_start(b) || b.is_ascii_digit() || b == BACKSLASH,
            Some(_) => self.char_at(self.pos).is_some_and(is_id_start),
        };
        if follows {
            return Err(self.error(diagnostic_codes::IDENTIFIER_AFTER_NUMBER, self.pos, self.pos + 1, &[]));
        }
        Ok(())
    }

    // =========================================================================
    // Strings and templates
    // =========================================================================

    /// Decode one escape sequence; `self.pos` is just past the backslash.
    /// Returns whether the escape was a legacy octal (or `\8`, `\9`) escape.
    fn lex_escape(&mut self, out: &mut String, in_template: bool) -> Result<bool, EscapeError> {
        let Some(b) = self.peek_byte() else {
            return Err(EscapeError::Eof);
        };
        match b {
            b'n' => out.push('\n'),
            b't' => out.push('\t'),
            b'r' => out.push('\r'),
            b'b' => out.push('\u{8}'),
            b'f' => out.push('\u{C}'),
            b'v' => out.push('\u{B}'),
            CARRIAGE_RETURN => {
                self.pos += 1;
                if self.peek_byte() == Some(LINE_FEED) {
                    self.pos += 1;
                }
                return Ok(false);
            }
            LINE_FEED => {}
            b'x' => {
                self.pos += 1;
                let hi = self.peek_byte().and_then(hex_value);
                let lo = self.byte_at(self.pos + 1).and_then(hex_value);
                let (Some(hi), Some(lo)) = (hi, lo) else {
                    return Err(EscapeError::Malformed("hexadecimal"));
                };
                self.pos += 2;
                out.push(char::from_u32(hi * 16 + lo).unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(false);
            }
            b'u' => {
                self.pos += 1;
                let code = self.lex_unicode_escape()?;
                self.push_code_point(out, code);
                return Ok(false);
            }
            b'0' if !self.byte_at(self.pos + 1).is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            b'0'..=b'7' => {
                if in_template {
                    return Err(EscapeError::Malformed("octal"));
                }
                let max_len = if b <= b'3' { 3 } else { 2 };
                let mut value = 0u32;
                let mut len = 0;
                while len < max_len {
                    match self.peek_byte().and_then(|d| digit_value(d, 8)) {
                        Some(d) => {
                            value = value * 8 + d;
                            self.pos += 1;
                            len += 1;
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
                return Ok(true);
            }
            b'8' | b'9' => {
                if in_template {
                    return Err(EscapeError::Malformed("octal"));
                }
                out.push(char::from(b));
                self.pos += 1;
                return Ok(true);
            }
            _ => {
                let c = self.char_at(self.pos).ok_or(EscapeError::Eof)?;
                self.pos += c.len_utf8();
                if !is_line_terminator(c) {
                    out.push(c);
                }
                return Ok(false);
            }
        }
        self.pos += 1;
        Ok(false)
    }

    /// Append a code point from a `\u` escape, pairing a high surrogate with
    /// an immediately following `\uDC00`-`\uDFFF` escape.
    fn push_code_point(&mut self, out: &mut String, code: u32) {
        if (0xD800..0xDC00).contains(&code)
            && self.peek_byte() == Some(BACKSLASH)
            && self.byte_at(self.pos + 1) == Some(b'u')
        {
            let saved = self.pos;
            self.pos += 2;
            match self.lex_unicode_escape() {
                Ok(low) if (0xDC00..0xE000).contains(&low) => {
                    let combined = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    out.push(char::from_u32(combined).unwrap_or(char::REPLACEMENT_CHARACTER));
                    return;
                }
                _ => self.pos = saved,
            }
        }
        out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
    }

    fn lex_string(&mut self, start: usize, quote: u8, mode: LexMode, interner: &mut Interner) -> LexResult<Token> {
        self.pos = start + 1;
        let mut flags = TokenFlags::empty();
        let mut cooked = String::new();
        loop {
            let Some(b) = self.peek_byte() else {
                return Err(self.error(diagnostic_codes::UNTERMINATED_STRING, start, self.pos, &[]));
            };
            match b {
                b if b == quote => {
                    self.pos += 1;
                    break;
                }
                BACKSLASH => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    match self.lex_escape(&mut cooked, false) {
                        Ok(true) => flags |= TokenFlags::OCTAL_ESCAPE,
                        Ok(false) => {}
                        Err(EscapeError::Eof) => {
                            return Err(self.error(diagnostic_codes::UNTERMINATED_STRING, start, self.pos, &[]));
                        }
                        Err(EscapeError::Malformed(what)) => {
                            return Err(self.error(
                                diagnostic_codes::MALFORMED_ESCAPE,
                                escape_start,
                                self.pos,
                                &[what],
                            ));
                        }
                    }
                }
                LINE_FEED | CARRIAGE_RETURN => {
                    return Err(self.error(diagnostic_codes::UNTERMINATED_STRING, start, self.pos, &[]));
                }
                _ => {
                    let run_start = self.pos;
                    while self
                        .peek_byte()
                        .is_some_and(|c| c != quote && c != BACKSLASH && c != LINE_FEED && c != CARRIAGE_RETURN)
                    {
                        self.pos += 1;
                    }
                    cooked.push_str(&self.source[run_start..self.pos]);
                }
            }
        }
        let mut token = self.make(TokenKind::String, start, mode);
        token.flags = flags;
        token.value = TokenValue::String(interner.intern_owned(cooked));
        Ok(token)
    }

    /// Lex a template chunk; `self.pos` is just past the opening backtick or
    /// the `}` closing a substitution.
    fn lex_template(&mut self, start: usize, tail: bool, mode: LexMode, interner: &mut Interner) -> LexResult<Token> {
        let mut cooked = String::new();
        let mut cooked_valid = true;
        let mut raw = String::new();
        let kind = loop {
            let Some(b) = self.peek_byte() else {
                return Err(self.error(diagnostic_codes::UNTERMINATED_TEMPLATE, start, self.pos, &[]));
            };
            match b {
                b'`' => {
                    self.pos += 1;
                    break TokenKind::NoSubsTemplate;
                }
                b'$' if self.byte_at(self.pos + 1) == Some(b'{') => {
                    self.pos += 2;
                    break TokenKind::TemplateHead;
                }
                BACKSLASH => {
                    let escape_start = self.pos;
                    self.pos += 1;
                    match self.lex_escape(&mut cooked, true) {
                        Ok(_) => {}
                        Err(EscapeError::Eof) => {
                            return Err(self.error(diagnostic_codes::UNTERMINATED_TEMPLATE, start, self.pos, &[]));
                        }
                        Err(EscapeError::Malformed(_)) => cooked_valid = false,
                    }
                    let text = &self.source[escape_start..self.pos];
                    if text.contains('\r') {
                        raw.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                    } else {
                        raw.push_str(text);
                    }
                }
                CARRIAGE_RETURN => {
                    self.pos += 1;
                    if self.peek_byte() == Some(LINE_FEED) {
                        self.pos += 1;
                    }
                    cooked.push('\n');
                    raw.push('\n');
                }
                _ => {
                    let run_start = self.pos;
                    while self
                        .peek_byte()
                        .is_some_and(|c| !matches!(c, b'`' | b'$' | BACKSLASH | CARRIAGE_RETURN))
                    {
                        self.pos += 1;
                    }
                    if self.pos == run_start {
                        // A `$` not followed by `{`.
                        self.pos += 1;
                    }
                    let text = &self.source[run_start..self.pos];
                    cooked.push_str(text);
                    raw.push_str(text);
                }
            }
        };
        let mut token = self.make(kind, start, mode);
        if tail {
            token.flags |= TokenFlags::TEMPLATE_TAIL;
        }
        token.value = TokenValue::Template {
            cooked: cooked_valid.then(|| interner.intern_owned(cooked)),
            raw: interner.intern_owned(raw),
        };
        Ok(token)
    }

    // =========================================================================
    // Regular expressions
    // =========================================================================

    fn lex_regexp(&mut self, start: usize, mode: LexMode, interner: &mut Interner) -> LexResult<Token> {
        self.pos = start + 1;
        let mut in_class = false;
        let unterminated = |lexer: &Self| {
            lexer.error(diagnostic_codes::UNTERMINATED_REGEXP, start, lexer.pos, &[])
        };
        loop {
            let Some(c) = self.char_at(self.pos) else {
                return Err(unterminated(self));
            };
            if is_line_terminator(c) {
                return Err(unterminated(self));
            }
            self.pos += c.len_utf8();
            match c {
                '\\' => match self.char_at(self.pos) {
                    Some(escaped) if !is_line_terminator(escaped) => self.pos += escaped.len_utf8(),
                    _ => return Err(unterminated(self)),
                },
                '[' => in_class = true,
                ']' => in_class = false,
                '/' if !in_class => break,
                _ => {}
            }
        }
        let pattern_end = self.pos - 1;

        let flags_start = self.pos;
        while let Some(c) = self.char_at(self.pos) {
            if !is_id_continue(c) {
                break;
            }
            let seen = &self.source[flags_start..self.pos];
            if !REGEXP_FLAGS.contains(c) || seen.contains(c) {
                let flag = c.to_string();
                return Err(self.error(
                    diagnostic_codes::BAD_REGEXP_FLAG,
                    self.pos,
                    self.pos + c.len_utf8(),
                    &[&flag],
                ));
            }
            self.pos += c.len_utf8();
        }

        let pattern = interner.intern(&self.source[start + 1..pattern_end]);
        let flags = interner.intern(&self.source[flags_start..self.pos]);
        let mut token = self.make(TokenKind::RegExp, start, mode);
        token.value = TokenValue::RegExp { pattern, flags };
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(source);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.lex(LexMode::Operator, &mut interner).expect("lexes");
            if token.kind == TokenKind::Eof {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex_all(source).into_iter().map(|t| t.kind).collect()
    }

    fn lex_error(source: &str, mode: LexMode) -> Diagnostic {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(source);
        loop {
            match lexer.lex(mode, &mut interner) {
                Ok(token) if token.kind == TokenKind::Eof => panic!("expected a lex error for {source:?}"),
                Ok(_) => {}
                Err(diag) => return diag,
            }
        }
    }

    #[test]
    fn test_punctuators_longest_match() {
        assert_eq!(
            kinds(">>>= ??= ?. ... ** **= => !== &&="),
            vec![
                TokenKind::UrshAssign,
                TokenKind::CoalesceAssign,
                TokenKind::OptionalChain,
                TokenKind::TripleDot,
                TokenKind::Pow,
                TokenKind::PowAssign,
                TokenKind::Arrow,
                TokenKind::StrictNe,
                TokenKind::AndAssign,
            ]
        );
    }

    #[test]
    fn test_optional_chain_before_digit_is_hook() {
        assert_eq!(
            kinds("a?.5:b"),
            vec![TokenKind::Name, TokenKind::Hook, TokenKind::Number, TokenKind::Colon, TokenKind::Name]
        );
    }

    #[test]
    fn test_numbers() {
        let tokens = lex_all("0x1F 0o17 0b101 1_000 .5 1e3 017 089 10n");
        let values: Vec<_> = tokens.iter().map(|t| t.value).collect();
        assert_eq!(values[0], TokenValue::Number(31.0));
        assert_eq!(values[1], TokenValue::Number(15.0));
        assert_eq!(values[2], TokenValue::Number(5.0));
        assert_eq!(values[3], TokenValue::Number(1000.0));
        assert_eq!(values[4], TokenValue::Number(0.5));
        assert_eq!(values[5], TokenValue::Number(1000.0));
        assert_eq!(values[6], TokenValue::Number(15.0));
        assert!(tokens[6].flags.contains(TokenFlags::LEGACY_OCTAL));
        assert_eq!(values[7], TokenValue::Number(89.0));
        assert_eq!(tokens[8].kind, TokenKind::BigInt);
    }

    #[test]
    fn test_number_errors() {
        assert_eq!(lex_error("1__0", LexMode::Operand).code, diagnostic_codes::NUMERIC_SEPARATOR);
        assert_eq!(lex_error("1_", LexMode::Operand).code, diagnostic_codes::NUMERIC_SEPARATOR);
        assert_eq!(lex_error("0x", LexMode::Operand).code, diagnostic_codes::MISSING_DIGITS);
        assert_eq!(lex_error("3in x", LexMode::Operand).code, diagnostic_codes::IDENTIFIER_AFTER_NUMBER);
        assert_eq!(lex_error("1e+", LexMode::Operand).code, diagnostic_codes::MISSING_DIGITS);
    }

    #[test]
    fn test_string_escapes() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(r#""a\n\x41B\u{43}\101""#);
        let token = lexer.lex(LexMode::Operand, &mut interner).expect("lexes");
        let atom = token.string_atom().expect("string");
        assert_eq!(interner.resolve(atom), "a\nABCA");
        assert!(token.flags.contains(TokenFlags::OCTAL_ESCAPE));
    }

    #[test]
    fn test_string_surrogate_pair() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new(r"'\uD83D\uDE00'");
        let token = lexer.lex(LexMode::Operand, &mut interner).expect("lexes");
        assert_eq!(interner.resolve(token.string_atom().expect("string")), "\u{1F600}");
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(lex_error("'abc\n'", LexMode::Operand).code, diagnostic_codes::UNTERMINATED_STRING);
    }

    #[test]
    fn test_escaped_keyword_is_name() {
        let tokens = lex_all(r"\u0069f if");
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert!(tokens[0].has_escape());
        assert_eq!(tokens[1].kind, TokenKind::If);
        assert_eq!(tokens[0].name(), tokens[1].name());
    }

    #[test]
    fn test_regexp_only_in_operand_mode() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("/[/]a/gi");
        let token = lexer.lex(LexMode::Operand, &mut interner).expect("lexes");
        assert_eq!(token.kind, TokenKind::RegExp);
        let TokenValue::RegExp { pattern, flags } = token.value else {
            panic!("expected regexp payload");
        };
        assert_eq!(interner.resolve(pattern), "[/]a");
        assert_eq!(interner.resolve(flags), "gi");

        lexer.seek(0);
        let token = lexer.lex(LexMode::Operator, &mut interner).expect("lexes");
        assert_eq!(token.kind, TokenKind::Div);
    }

    #[test]
    fn test_regexp_bad_flag() {
        let diag = lex_error("/a/gg", LexMode::Operand);
        assert_eq!(diag.code, diagnostic_codes::BAD_REGEXP_FLAG);
        assert_eq!(diag.args, vec!["g".to_string()]);
    }

    #[test]
    fn test_template_chunks() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("`a${x}b\\u{`");
        let head = lexer.lex(LexMode::Operand, &mut interner).expect("lexes");
        assert_eq!(head.kind, TokenKind::TemplateHead);
        let name = lexer.lex(LexMode::Operand, &mut interner).expect("lexes");
        assert_eq!(name.kind, TokenKind::Name);
        let tail = lexer.lex(LexMode::TemplateTail, &mut interner).expect("lexes");
        assert_eq!(tail.kind, TokenKind::NoSubsTemplate);
        assert!(tail.flags.contains(TokenFlags::TEMPLATE_TAIL));
        let TokenValue::Template { cooked, raw } = tail.value else {
            panic!("expected template payload");
        };
        assert_eq!(cooked, None);
        assert_eq!(interner.resolve(raw), "b\\u{");
    }

    #[test]
    fn test_newline_flag_and_comments() {
        let tokens = lex_all("a /* x\n */ b // c\n c /* d */ d");
        assert!(!tokens[0].newline_before());
        assert!(tokens[1].newline_before());
        assert!(tokens[2].newline_before());
        assert!(!tokens[3].newline_before());
    }

    #[test]
    fn test_hashbang_and_source_map_url() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("#!/usr/bin/env node\nx\n//# sourceMappingURL=out.js.map\n");
        let token = lexer.lex(LexMode::Operand, &mut interner).expect("lexes");
        assert_eq!(token.kind, TokenKind::Name);
        let eof = lexer.lex(LexMode::Operator, &mut interner).expect("lexes");
        assert_eq!(eof.kind, TokenKind::Eof);
        assert_eq!(lexer.source_map_url(), Some("out.js.map"));
    }

    #[test]
    fn test_private_name() {
        let mut interner = Interner::new();
        let mut lexer = Lexer::new("#secret");
        let token = lexer.lex(LexMode::Operand, &mut interner).expect("lexes");
        assert_eq!(token.kind, TokenKind::PrivateName);
        assert_eq!(interner.resolve(token.name().expect("name")), "secret");
        assert_eq!(token.span, Span::new(0, 7));
    }

    #[test]
    fn test_unterminated_comment() {
        assert_eq!(lex_error("a /* b", LexMode::Operand).code, diagnostic_codes::UNTERMINATED_COMMENT);
    }
}
