//! Character classification utilities.

// ASCII code points the lexer dispatches on.
pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const BACKSLASH: u8 = b'\\';
pub const BACKTICK: u8 = b'`';
pub const DOLLAR: u8 = b'$';
pub const UNDERSCORE: u8 = b'_';

pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\u{2029}';
pub const BYTE_ORDER_MARK: char = '\u{FEFF}';

/// LineTerminator code points.
#[inline]
pub fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | LINE_SEPARATOR | PARAGRAPH_SEPARATOR)
}

/// WhiteSpace code points (line terminators excluded).
#[inline]
pub fn is_white_space(c: char) -> bool {
    matches!(
        c,
        '\t' | '\x0B'
            | '\x0C'
            | ' '
            | '\u{00A0}'
            | BYTE_ORDER_MARK
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

#[inline]
pub fn is_ascii_id_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == DOLLAR || b == UNDERSCORE
}

#[inline]
pub fn is_ascii_id_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == DOLLAR || b == UNDERSCORE
}

/// IdentifierStart, approximated by the Unicode alphabetic property.
#[inline]
pub fn is_id_start(c: char) -> bool {
    c == '$' || c == '_' || c.is_alphabetic()
}

/// IdentifierPart, approximated by the Unicode alphanumeric property plus
/// the zero-width joiners.
#[inline]
pub fn is_id_continue(c: char) -> bool {
    c == '$' || c == '_' || c == '\u{200C}' || c == '\u{200D}' || c.is_alphanumeric()
}

/// Value of a hex digit, if `b` is one.
#[inline]
pub fn hex_value(b: u8) -> Option<u32> {
    match b {
        b'0'..=b'9' => Some(u32::from(b - b'0')),
        b'a'..=b'f' => Some(u32::from(b - b'a' + 10)),
        b'A'..=b'F' => Some(u32::from(b - b'A' + 10)),
        _ => None,
    }
}

/// Digit value of `b` in `radix` (2, 8, 10 or 16).
#[inline]
pub fn digit_value(b: u8, radix: u32) -> Option<u32> {
    hex_value(b).filter(|&v| v < radix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(is_line_terminator('\u{2028}'));
        assert!(!is_white_space('\n'));
        assert!(is_white_space('\u{FEFF}'));
        assert!(is_id_start('é'));
        assert!(!is_id_start('1'));
        assert!(is_id_continue('\u{200D}'));
        assert_eq!(digit_value(b'7', 8), Some(7));
        assert_eq!(digit_value(b'8', 8), None);
        assert_eq!(hex_value(b'F'), Some(15));
    }
}
