//! Tests for constant folding of the finished tree.

use jsfront_common::ParseOptions;
use jsfront_parser::{NodeIndex, ParseNodeKind, ParseOutput, parse_script};

fn fold(source: &str) -> ParseOutput {
    let options = ParseOptions {
        fold_constants: true,
        ..ParseOptions::default()
    };
    parse_script(source, &options).unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

fn statements(output: &ParseOutput) -> Vec<NodeIndex> {
    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    output.arena.list_children(body).to_vec()
}

/// Expression of the only top-level statement.
fn folded_expression(source: &str) -> (ParseOutput, NodeIndex) {
    let output = fold(source);
    let statement = statements(&output)[0];
    assert_eq!(output.arena.kind(statement), Some(ParseNodeKind::ExpressionStatement));
    let expr = output.arena.get_unary(statement).expect("expression");
    (output, expr)
}

fn folded_number(source: &str) -> Option<f64> {
    let (output, expr) = folded_expression(source);
    output.arena.get_number(expr)
}

fn folded_string(source: &str) -> Option<String> {
    let (output, expr) = folded_expression(source);
    let atom = output.arena.get_string(expr)?;
    Some(output.resolve(atom).to_string())
}

fn folded_kind(source: &str) -> Option<ParseNodeKind> {
    let (output, expr) = folded_expression(source);
    output.arena.kind(expr)
}

#[test]
fn test_arithmetic() {
    assert_eq!(folded_number("1 + 2 * 3;"), Some(7.0));
    assert_eq!(folded_number("10 - 2 - 3;"), Some(5.0));
    assert_eq!(folded_number("2 ** 3 ** 2;"), Some(512.0));
    assert_eq!(folded_number("7 % 4;"), Some(3.0));
    assert_eq!(folded_number("1 << 4 | 1;"), Some(17.0));
    assert_eq!(folded_number("-1 >>> 28;"), Some(15.0));
    assert_eq!(folded_number("(1 + 2) * 4;"), Some(12.0));
}

#[test]
fn test_string_concatenation() {
    assert_eq!(folded_string("'a' + 'b' + 'c';"), Some("abc".to_string()));
    // Mixed operands are left alone.
    assert_eq!(folded_kind("'a' + 1;"), Some(ParseNodeKind::Add));
}

#[test]
fn test_constant_prefix_of_chain() {
    let (output, expr) = folded_expression("1 + 2 + x;");
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Add));
    let kids = output.arena.list_children(expr);
    assert_eq!(kids.len(), 2);
    assert_eq!(output.arena.get_number(kids[0]), Some(3.0));
    assert_eq!(output.arena.kind(kids[1]), Some(ParseNodeKind::Name));

    // Nothing after a non-constant operand is folded.
    let (output, expr) = folded_expression("x + 1 + 2;");
    assert_eq!(output.arena.list_children(expr).len(), 3);
}

#[test]
fn test_logical_operators() {
    assert_eq!(folded_kind("0 || '' || y;"), Some(ParseNodeKind::Name));
    assert_eq!(folded_kind("1 && 2 && z;"), Some(ParseNodeKind::Name));
    assert_eq!(folded_kind("null ?? x;"), Some(ParseNodeKind::Name));
    assert_eq!(folded_number("0 ?? x;"), Some(0.0));
    assert_eq!(folded_number("5 || x;"), Some(5.0));
    assert_eq!(folded_kind("x || 1;"), Some(ParseNodeKind::Or));

    let (output, expr) = folded_expression("0 || x || y;");
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Or));
    assert_eq!(output.arena.list_children(expr).len(), 2);
}

#[test]
fn test_unary_operators() {
    assert_eq!(folded_string("typeof 1;"), Some("number".to_string()));
    assert_eq!(folded_string("typeof null;"), Some("object".to_string()));
    assert_eq!(folded_kind("!0;"), Some(ParseNodeKind::True));
    assert_eq!(folded_kind("!'x';"), Some(ParseNodeKind::False));
    assert_eq!(folded_number("-(5);"), Some(-5.0));
    assert_eq!(folded_number("~5;"), Some(-6.0));
    assert_eq!(folded_kind("void 0;"), Some(ParseNodeKind::RawUndefined));
    assert_eq!(folded_kind("-x;"), Some(ParseNodeKind::Neg));
}

#[test]
fn test_conditional() {
    let (output, expr) = folded_expression("true ? a : b;");
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Name));
    assert_eq!(output.arena.get_name(expr).map(|name| output.resolve(name)), Some("a"));
    let (output, expr) = folded_expression("0 ? a : b;");
    assert_eq!(output.arena.get_name(expr).map(|name| output.resolve(name)), Some("b"));
}

#[test]
fn test_if_with_constant_test() {
    let output = fold("if (1) a(); else b();");
    assert_eq!(output.arena.kind(statements(&output)[0]), Some(ParseNodeKind::ExpressionStatement));

    let output = fold("if (0) a();");
    assert_eq!(output.arena.kind(statements(&output)[0]), Some(ParseNodeKind::EmptyStatement));

    let output = fold("if (x) a();");
    assert_eq!(output.arena.kind(statements(&output)[0]), Some(ParseNodeKind::If));
}

#[test]
fn test_if_keeps_hoisted_declarations() {
    let output = fold("if (0) { var v = 1; }");
    assert_eq!(output.arena.kind(statements(&output)[0]), Some(ParseNodeKind::If));
    let output = fold("if (1) a(); else { function g() {} }");
    assert_eq!(output.arena.kind(statements(&output)[0]), Some(ParseNodeKind::If));
    // A nested function's own vars do not leak.
    let output = fold("if (0) (function () { var inner; });");
    assert_eq!(output.arena.kind(statements(&output)[0]), Some(ParseNodeKind::EmptyStatement));
}

#[test]
fn test_element_access_with_identifier_key() {
    let (output, expr) = folded_expression("o['foo'];");
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Dot));
    let (name, object) = output.arena.get_name_kid(expr).expect("dot node");
    assert_eq!(output.resolve(name), "foo");
    assert_eq!(output.arena.kind(object), Some(ParseNodeKind::Name));

    assert_eq!(folded_kind("o['not-ident'];"), Some(ParseNodeKind::Elem));
    assert_eq!(folded_kind("o[0];"), Some(ParseNodeKind::Elem));
}

#[test]
fn test_folded_string_is_not_a_directive() {
    // Folding runs after the prologue was read.
    let output = fold("'use ' + 'strict'; with (o) {}");
    let kids = statements(&output);
    let expr = output.arena.get_unary(kids[0]).expect("expression");
    assert_eq!(output.arena.get_string(expr).map(|atom| output.resolve(atom)), Some("use strict"));
    assert_eq!(output.arena.kind(kids[1]), Some(ParseNodeKind::With));
}

#[test]
fn test_folding_is_off_by_default() {
    let output = parse_script("1 + 2;", &ParseOptions::default()).expect("parses");
    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    let statement = output.arena.list_children(body)[0];
    let expr = output.arena.get_unary(statement).expect("expression");
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Add));
}
