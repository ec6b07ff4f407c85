//! Token stream behaviour: lookahead, mode-sensitive relexing, checkpoints.

use jsfront_common::{Interner, Span, atoms};
use jsfront_scanner::{LexMode, TokenFlags, TokenKind, TokenStream, TokenValue};

fn stream(source: &str) -> TokenStream<'_> {
    TokenStream::new(source, Interner::new())
}

#[test]
fn test_peek_does_not_consume() {
    let mut ts = stream("x = 1");
    let peeked = ts.peek_token(LexMode::Operand).expect("lexes");
    let got = ts.get_token(LexMode::Operand).expect("lexes");
    assert_eq!(peeked, got);
    assert_eq!(got.kind, TokenKind::Name);
    assert!(ts.match_token(TokenKind::Assign, LexMode::Operator).expect("lexes"));
    assert!(!ts.match_token(TokenKind::Semi, LexMode::Operand).expect("lexes"));
    assert_eq!(ts.get_token(LexMode::Operand).expect("lexes").kind, TokenKind::Number);
    assert_eq!(ts.get_token(LexMode::Operator).expect("lexes").kind, TokenKind::Eof);
}

#[test]
fn test_slash_peeked_as_operator_relexed_as_regexp() {
    let mut ts = stream("/a/g");
    let div = ts.peek_token(LexMode::Operator).expect("lexes");
    assert_eq!(div.kind, TokenKind::Div);
    let regexp = ts.get_token(LexMode::Operand).expect("lexes");
    assert_eq!(regexp.kind, TokenKind::RegExp);
    assert_eq!(regexp.span, Span::new(0, 4));
    assert_eq!(ts.get_token(LexMode::Operator).expect("lexes").kind, TokenKind::Eof);
}

#[test]
fn test_regexp_peeked_as_operand_relexed_as_division() {
    let mut ts = stream("a\n/b/g");
    assert_eq!(ts.get_token(LexMode::Operand).expect("lexes").kind, TokenKind::Name);
    let regexp = ts.peek_token(LexMode::Operand).expect("lexes");
    assert_eq!(regexp.kind, TokenKind::RegExp);
    let div = ts.get_token(LexMode::Operator).expect("lexes");
    assert_eq!(div.kind, TokenKind::Div);
    assert!(div.newline_before(), "relexing keeps the newline flag");
    assert_eq!(ts.get_token(LexMode::Operand).expect("lexes").kind, TokenKind::Name);
}

#[test]
fn test_right_curly_relexed_as_template_tail() {
    let mut ts = stream("`a${b}c`");
    assert_eq!(ts.get_token(LexMode::Operand).expect("lexes").kind, TokenKind::TemplateHead);
    assert_eq!(ts.get_token(LexMode::Operand).expect("lexes").kind, TokenKind::Name);
    let curly = ts.peek_token(LexMode::Operator).expect("lexes");
    assert_eq!(curly.kind, TokenKind::RightCurly);
    let tail = ts.get_token(LexMode::TemplateTail).expect("lexes");
    assert_eq!(tail.kind, TokenKind::NoSubsTemplate);
    assert!(tail.flags.contains(TokenFlags::TEMPLATE_TAIL));
    let TokenValue::Template { cooked, .. } = tail.value else {
        panic!("expected template payload");
    };
    assert_eq!(cooked.map(|atom| ts.resolve(atom).to_string()), Some("c".to_string()));
}

#[test]
fn test_position_and_seek_replay_tokens() {
    let mut ts = stream("let x = y / 2;");
    ts.get_token(LexMode::Operand).expect("lexes");
    let saved = ts.position();
    let first: Vec<_> = (0..5)
        .map(|i| {
            let mode = if i % 2 == 0 { LexMode::Operand } else { LexMode::Operator };
            ts.get_token(mode).expect("lexes").kind
        })
        .collect();
    ts.seek(&saved);
    let second: Vec<_> = (0..5)
        .map(|i| {
            let mode = if i % 2 == 0 { LexMode::Operand } else { LexMode::Operator };
            ts.get_token(mode).expect("lexes").kind
        })
        .collect();
    assert_eq!(first, second);
    assert_eq!(first[3], TokenKind::Div);
}

#[test]
fn test_advance_to_synthesizes_right_curly() {
    let source = "function f() { return 1; } g";
    let mut ts = stream(source);
    let end = source.find('}').expect("has brace") as u32 + 1;
    ts.advance_to(end);
    let current = ts.current();
    assert_eq!(current.kind, TokenKind::RightCurly);
    assert!(current.flags.contains(TokenFlags::SYNTHETIC));
    assert_eq!(current.span.end, end);
    let next = ts.get_token(LexMode::Operand).expect("lexes");
    assert_eq!(ts.text(next.span), "g");
}

#[test]
fn test_contextual_keywords_require_literal_spelling() {
    let mut ts = stream(r"let l\u0065t");
    assert!(ts.match_contextual(atoms::LET, LexMode::Operand).expect("lexes"));
    assert!(!ts.match_contextual(atoms::LET, LexMode::Operand).expect("lexes"));
    let escaped = ts.get_token(LexMode::Operand).expect("lexes");
    assert_eq!(escaped.name(), Some(atoms::LET));
}

#[test]
fn test_peek_same_line() {
    let mut ts = stream("a\nb c");
    ts.get_token(LexMode::Operand).expect("lexes");
    assert!(ts.peek_token_same_line(LexMode::Operator).expect("lexes").is_none());
    ts.get_token(LexMode::Operand).expect("lexes");
    assert!(ts.peek_token_same_line(LexMode::Operator).expect("lexes").is_some());
}
