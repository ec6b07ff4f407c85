//! Tests for lazy parsing: syntax-parsed inner functions, their summaries,
//! and delazification agreeing with an eager parse.

use std::collections::BTreeMap;

use jsfront_common::ParseOptions;
use jsfront_parser::{FunctionFlags, NodeFlags, ParseNodeKind, ParseOutput, delazify_function, parse_script};

const NESTED: &str = r"
function outer(p) {
  var a = 1, b = 2;
  let c = 3;
  function inner(q) {
    var d = q;
    return () => a + c + d;
  }
  return inner(p) + b;
}
";

fn parse_with(source: &str, options: &ParseOptions) -> ParseOutput {
    parse_script(source, options).unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

fn closed_over_of(output: &ParseOutput, name: &str) -> Vec<String> {
    let id = output
        .find_function(name)
        .unwrap_or_else(|| panic!("function {name} not found"));
    output.closed_over_bindings(id)
}

#[test]
fn test_eager_parse_marks_closed_over_bindings() {
    let output = parse_with(NESTED, &ParseOptions::eager());
    assert!(output.summaries.is_empty());
    assert_eq!(closed_over_of(&output, "outer"), vec!["a", "c"]);
    assert_eq!(closed_over_of(&output, "inner"), vec!["d"]);
    for funbox in &output.function_boxes {
        assert!(!funbox.has_flag(FunctionFlags::IS_LAZY));
    }
}

#[test]
fn test_uninvoked_function_is_syntax_parsed() {
    let output = parse_with(NESTED, &ParseOptions::default());
    let outer = output.find_function("outer").expect("function outer");
    let funbox = output.function_box(outer);
    assert!(funbox.has_flag(FunctionFlags::IS_LAZY));
    assert_eq!(funbox.length, 1);

    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    let statement = output.arena.list_children(body)[0];
    assert_eq!(output.arena.kind(statement), Some(ParseNodeKind::Function));
    assert!(output.arena.flags(statement).contains(NodeFlags::LAZY));
    let (_, lazy_body) = output.arena.get_function(statement).expect("function node");
    assert!(output.arena.get(lazy_body).is_none());
}

#[test]
fn test_summary_records_nested_functions() {
    let output = parse_with(NESTED, &ParseOptions::default());
    assert_eq!(output.summaries.len(), 1);
    let outer = output.lazy_summary(output.find_function("outer").expect("function outer")).expect("summary");
    assert!(!outer.strict());
    assert_eq!(outer.inner_functions.len(), 1);
    let inner = &outer.inner_functions[0];
    assert_eq!(inner.name.map(|name| output.resolve(name)), Some("inner"));
    assert_eq!(inner.inner_functions.len(), 1);
    assert!(inner.inner_functions[0].kind.is_arrow());
    assert!(outer.extent.start < inner.extent.start);
    assert!(inner.extent.end < outer.extent.end);
    assert_eq!(&NESTED[outer.extent.to_string_start as usize..][..8], "function");
}

#[test]
fn test_lazy_summary_agrees_with_eager_parse() {
    let eager = parse_with(NESTED, &ParseOptions::eager());
    let lazy = parse_with(NESTED, &ParseOptions::default());
    assert_eq!(closed_over_of(&lazy, "outer"), closed_over_of(&eager, "outer"));
}

#[test]
fn test_delazified_function_agrees_with_eager_parse() {
    let options = ParseOptions::default();
    let lazy = parse_with(NESTED, &options);
    let outer = lazy.find_function("outer").expect("function outer");
    let summary = lazy.lazy_summary(outer).expect("summary").clone();

    let full = delazify_function(NESTED, &summary, lazy.interner, &options).expect("delazify");
    assert_eq!(full.arena.kind(full.root), Some(ParseNodeKind::Function));
    let outer = full.find_function("outer").expect("function outer");
    let funbox = full.function_box(outer);
    assert!(!funbox.has_flag(FunctionFlags::IS_LAZY));
    assert_eq!(funbox.extent, summary.extent);
    assert_eq!(full.closed_over_bindings(outer), vec!["a", "c"]);

    // One level down is lazy again, answering from the nested summary.
    let inner = full.find_function("inner").expect("function inner");
    assert!(full.function_box(inner).has_flag(FunctionFlags::IS_LAZY));
    assert_eq!(full.closed_over_bindings(inner), vec!["d"]);
}

#[test]
fn test_free_names_reach_enclosing_scope() {
    let source = "var top = 0, other = 1; function f() { return top; }";
    for options in [ParseOptions::eager(), ParseOptions::default()] {
        let output = parse_with(source, &options);
        let table = output.root_bindings().expect("global table");
        let closed: Vec<&str> = table.closed_over().map(|atom| output.resolve(atom)).collect();
        assert_eq!(closed, vec!["top"]);
    }
}

#[test]
fn test_invoked_functions_are_parsed_fully() {
    let output = parse_with("(function iife() { var x = 1; return x; })(); !function bang() {}();", &ParseOptions::default());
    for name in ["iife", "bang"] {
        let id = output.find_function(name).expect("function");
        assert!(!output.function_box(id).has_flag(FunctionFlags::IS_LAZY), "{name} is lazy");
    }
    assert!(output.summaries.is_empty());
}

#[test]
fn test_syntax_parse_errors_are_reported() {
    let err = parse_script("function f() { return 1 +; }", &ParseOptions::default()).expect_err("syntax error");
    let eager = parse_script("function f() { return 1 +; }", &ParseOptions::eager()).expect_err("syntax error");
    assert_eq!(err.code(), eager.code());
    assert_eq!(err.diagnostic.start, eager.diagnostic.start);
}

#[test]
fn test_lazy_function_flags_survive() {
    let output = parse_with(
        "function f() { 'use strict'; return arguments.length; } function g() { eval('x'); }",
        &ParseOptions::default(),
    );
    let f = output.function_box(output.find_function("f").expect("function f"));
    assert!(f.has_flag(FunctionFlags::IS_LAZY));
    assert!(f.strict());
    assert!(f.has_flag(FunctionFlags::USES_ARGUMENTS));
    let g = output.function_box(output.find_function("g").expect("function g"));
    assert!(g.has_flag(FunctionFlags::HAS_DIRECT_EVAL));
    assert!(g.all_bindings_closed_over());
}

// =============================================================================
// Eager, lazy and delazified parses agree
// =============================================================================

/// Sources whose closed-over sets depend on more than plain nesting.
const AGREEMENT_CASES: &[(&str, &str)] = &[
    ("direct eval", "function o() { var u = 1; eval(''); }"),
    ("eval in arrow", "function o() { var u; return () => eval('u'); }"),
    ("with", "function o() { var u = 1; with ({}) { (function () { u; }); } }"),
    ("catch", "function o() { try {} catch (e) { return () => e; } }"),
    (
        "block let",
        "var fs = []; function o() { for (let i = 0; i < 3; i++) { let j = i; fs.push(() => i + j); } }",
    ),
    (
        "parameter expressions",
        "function o(a, b = () => a) { var c = b; return function inner() { return c; }; }",
    ),
    ("annex B", "function o() { { function b() {} } return () => b; }"),
    ("named lambda", "var g = function h(n) { return n ? h(n - 1) : () => n; };"),
    (
        "class field",
        "function o() { var k = 1; return class { x = k; m() { return k; } }; }",
    ),
    ("generator", "function* gen() { var a = 1; yield () => a; }"),
    ("async", "async function af(x) { await x; return () => x; }"),
];

/// Closed-over names of every function the parse can answer for, keyed by
/// where the function starts. Functions inside a lazy function have no
/// tables of their own and are left out.
fn closed_over_by_start(output: &ParseOutput) -> BTreeMap<u32, Vec<String>> {
    output
        .function_boxes
        .iter()
        .filter(|funbox| funbox.has_flag(FunctionFlags::IS_LAZY) || funbox.function_bindings.is_some())
        .map(|funbox| (funbox.extent.to_string_start, output.closed_over_bindings(funbox.id)))
        .collect()
}

fn root_closed_over(output: &ParseOutput) -> Vec<String> {
    let table = output.root_bindings().expect("global table");
    let mut names: Vec<String> = table.closed_over().map(|atom| output.resolve(atom).to_string()).collect();
    names.sort();
    names
}

fn assert_agrees(label: &str, expected: &BTreeMap<u32, Vec<String>>, output: &ParseOutput) {
    for (start, names) in closed_over_by_start(output) {
        assert_eq!(expected.get(&start), Some(&names), "{label}: function at {start}");
    }
}

/// Delazify every lazy function of `output`, and the lazy functions those
/// parses leave, checking each against the eager parse.
fn assert_delazified_agree(label: &str, source: &str, expected: &BTreeMap<u32, Vec<String>>, output: &ParseOutput) {
    let options = ParseOptions::default();
    for funbox in &output.function_boxes {
        if !funbox.has_flag(FunctionFlags::IS_LAZY) {
            continue;
        }
        let summary = output.lazy_summary(funbox.id).expect("lazy function has a summary");
        let full = delazify_function(source, summary, output.interner.clone(), &options)
            .unwrap_or_else(|err| panic!("{label}: delazify failed: {err}"));
        assert_agrees(label, expected, &full);
        assert_delazified_agree(label, source, expected, &full);
    }
}

#[test]
fn test_eager_lazy_and_delazified_parses_agree() {
    for &(label, source) in AGREEMENT_CASES {
        let eager = parse_with(source, &ParseOptions::eager());
        let lazy = parse_with(source, &ParseOptions::default());
        let expected = closed_over_by_start(&eager);

        assert_eq!(root_closed_over(&lazy), root_closed_over(&eager), "{label}: global table");
        assert_agrees(label, &expected, &lazy);
        assert_delazified_agree(label, source, &expected, &lazy);
    }
}

#[test]
fn test_dynamic_scope_access_closes_over_implicit_bindings() {
    for options in [ParseOptions::eager(), ParseOptions::default()] {
        let output = parse_with("function o() { var u = 1; eval(''); }", &options);
        assert_eq!(closed_over_of(&output, "o"), vec![".this", "arguments", "u"]);

        let output = parse_with("function o() { var u = 1; with ({}) { (function () { u; }); } }", &options);
        assert_eq!(closed_over_of(&output, "o"), vec![".this", "arguments", "u"]);
    }
}
