//! Tests for expression parsing: operator precedence, assignment targets,
//! arrows and the early errors raised inside expressions.

use jsfront_common::ParseOptions;
use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_parser::{NodeIndex, ParseErrorKind, ParseNodeKind, ParseOutput, parse_module, parse_script};

fn parse(source: &str) -> ParseOutput {
    parse_script(source, &ParseOptions::default()).unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

fn error_code(source: &str) -> u32 {
    match parse_script(source, &ParseOptions::default()) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(err) => err.code(),
    }
}

/// Expression of the first top-level statement.
fn first_expression(output: &ParseOutput) -> NodeIndex {
    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    let statement = output.arena.list_children(body)[0];
    assert_eq!(output.arena.kind(statement), Some(ParseNodeKind::ExpressionStatement));
    output.arena.get_unary(statement).expect("expression")
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    let output = parse("a + b * c;");
    let expr = first_expression(&output);
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Add));
    let kids = output.arena.list_children(expr);
    assert_eq!(kids.len(), 2);
    assert_eq!(output.arena.kind(kids[0]), Some(ParseNodeKind::Name));
    assert_eq!(output.arena.kind(kids[1]), Some(ParseNodeKind::Mul));
}

#[test]
fn test_left_associative_chain_is_one_list() {
    let output = parse("a - b - c - d;");
    let expr = first_expression(&output);
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Sub));
    assert_eq!(output.arena.list_children(expr).len(), 4);
}

#[test]
fn test_parenthesized_operand_starts_new_list() {
    let output = parse("(a - b) - c;");
    let expr = first_expression(&output);
    let kids = output.arena.list_children(expr);
    assert_eq!(kids.len(), 2);
    assert_eq!(output.arena.kind(kids[0]), Some(ParseNodeKind::Sub));
}

#[test]
fn test_exponent_is_right_associative() {
    let output = parse("2 ** 3 ** 2;");
    let expr = first_expression(&output);
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Pow));
    let kids = output.arena.list_children(expr);
    assert_eq!(kids.len(), 2);
    assert_eq!(output.arena.get_number(kids[0]), Some(2.0));
    assert_eq!(output.arena.kind(kids[1]), Some(ParseNodeKind::Pow));
}

#[test]
fn test_unary_left_of_exponent_is_rejected() {
    assert_eq!(error_code("-a ** 2;"), diagnostic_codes::BAD_POW_LEFTSIDE);
    assert_eq!(error_code("typeof a ** 2;"), diagnostic_codes::BAD_POW_LEFTSIDE);
    parse("(-a) ** 2;");
    parse("-(a ** 2);");
}

#[test]
fn test_coalesce_mixed_with_logical_needs_parentheses() {
    assert_eq!(error_code("a ?? b || c;"), diagnostic_codes::BAD_COALESCE_MIXING);
    assert_eq!(error_code("a && b ?? c;"), diagnostic_codes::BAD_COALESCE_MIXING);
    parse("(a ?? b) || c;");
    parse("a ?? (b && c);");
    parse("a ?? b ?? c;");
}

#[test]
fn test_invalid_assignment_targets() {
    assert_eq!(error_code("1 = 2;"), diagnostic_codes::BAD_LEFTSIDE_OF_ASS);
    assert_eq!(error_code("a + b = c;"), diagnostic_codes::BAD_LEFTSIDE_OF_ASS);
    assert_eq!(error_code("[a, b] += c;"), diagnostic_codes::BAD_LEFTSIDE_OF_ASS);
    parse("a.b = c; a[b] = c; [a, b] = c; ({ a, b } = c);");
}

#[test]
fn test_call_assignment_target_is_sloppy_only() {
    parse("f() = 1;");
    assert_eq!(error_code("'use strict'; f() = 1;"), diagnostic_codes::BAD_LEFTSIDE_OF_ASS);
}

#[test]
fn test_increment_operand() {
    assert_eq!(error_code("++1;"), diagnostic_codes::BAD_INCOP_OPERAND);
    parse("++a; a++; --a.b; a[0]--;");
}

#[test]
fn test_strict_assignment_to_eval_and_arguments() {
    parse("eval = 1; arguments = 2;");
    assert_eq!(error_code("'use strict'; eval = 1;"), diagnostic_codes::BAD_STRICT_ASSIGN);
    assert_eq!(error_code("'use strict'; arguments++;"), diagnostic_codes::BAD_STRICT_ASSIGN);
}

#[test]
fn test_strict_delete_of_name() {
    parse("delete x;");
    assert_eq!(error_code("'use strict'; delete x;"), diagnostic_codes::DEPRECATED_DELETE_OPERAND);
    parse("'use strict'; delete x.y;");
}

#[test]
fn test_arrow_function_box() {
    let output = parse("(a, b) => a + b;");
    let expr = first_expression(&output);
    assert_eq!(output.arena.kind(expr), Some(ParseNodeKind::Function));
    let (funbox, _) = output.arena.get_function(expr).expect("function node");
    let funbox = output.function_box(funbox);
    assert!(funbox.is_arrow());
    assert_eq!(funbox.length, 2);
}

#[test]
fn test_arrow_forms() {
    parse("x => x; () => {}; (x, ...rest) => rest; ({ a }, [b]) => a + b;");
    parse("async x => x; async (x) => await x; async () => {};");
}

#[test]
fn test_arrow_rejects_duplicate_parameters() {
    assert_eq!(error_code("(a, a) => 1;"), diagnostic_codes::BAD_DUP_ARGS);
}

#[test]
fn test_line_break_before_arrow() {
    assert_eq!(error_code("x\n=> 1;"), diagnostic_codes::LINE_BREAK_BEFORE_ARROW);
}

#[test]
fn test_object_literal_forms() {
    parse("({ a, b: 1, [c]: 2, get d() { return 1; }, set d(v) {}, m() {}, *g() {}, async h() {}, ...e });");
}

#[test]
fn test_accessor_arity() {
    assert_eq!(error_code("({ get x(a) {} });"), diagnostic_codes::BAD_GETTER_ARITY);
    assert_eq!(error_code("({ set x() {} });"), diagnostic_codes::BAD_SETTER_ARITY);
}

#[test]
fn test_duplicate_proto_is_allowed_only_in_patterns() {
    assert_eq!(
        error_code("({ __proto__: a, __proto__: b });"),
        diagnostic_codes::DUPLICATE_PROTO_PROPERTY
    );
    parse("({ __proto__: a, __proto__: b } = c);");
}

#[test]
fn test_shorthand_initializer_only_in_patterns() {
    assert_eq!(error_code("({ a = 1 });"), diagnostic_codes::BAD_SHORTHAND_INIT);
    parse("({ a = 1 } = {});");
}

#[test]
fn test_optional_chains() {
    parse("a?.b; a?.[b]; a?.(b); a?.b.c(d)?.e;");
    assert_eq!(error_code("a?.b`t`;"), diagnostic_codes::BAD_OPTIONAL_TEMPLATE);
    assert_eq!(error_code("new a?.b();"), diagnostic_codes::BAD_NEW_OPTIONAL);
}

#[test]
fn test_templates_and_regexps() {
    parse("tag`a${b}c`; `x${y}z`; /ab+c/gi.test(s);");
}

#[test]
fn test_new_target_needs_a_function() {
    assert_eq!(error_code("new.target;"), diagnostic_codes::BAD_NEWTARGET);
    parse("function f() { return new.target; }");
}

#[test]
fn test_super_property_needs_a_method() {
    assert_eq!(error_code("super.x;"), diagnostic_codes::BAD_SUPERPROP);
    parse("({ m() { return super.x; } });");
}

#[test]
fn test_import_meta_needs_a_module() {
    assert_eq!(error_code("import.meta;"), diagnostic_codes::BAD_IMPORT_META);
    assert!(parse_module("import.meta;", &ParseOptions::default()).is_ok());
}

#[test]
fn test_await_outside_async_function() {
    assert_eq!(error_code("await x;"), diagnostic_codes::AWAIT_OUTSIDE_ASYNC);
    parse("var await = 1;");
}

#[test]
fn test_yield_in_generator_parameters() {
    assert_eq!(error_code("function* g(a = yield) {}"), diagnostic_codes::YIELD_IN_PARAMETER);
}

#[test]
fn test_class_member_errors() {
    assert_eq!(
        error_code("class A { constructor() {} constructor() {} }"),
        diagnostic_codes::DUPLICATE_CONSTRUCTOR
    );
    assert_eq!(error_code("class A { static prototype() {} }"), diagnostic_codes::CLASS_STATIC_PROTOTYPE);
    assert_eq!(error_code("class A { constructor() { super(); } }"), diagnostic_codes::BAD_SUPERCALL);
    parse("class A extends B { constructor() { super(); } static s() { return super.s; } }");
}

#[test]
fn test_private_names() {
    parse("class A { #x = 1; m() { return this.#x; } static #s() {} }");
    assert_eq!(error_code("class A { #x; #x; }"), diagnostic_codes::DUPLICATE_PRIVATE);
    assert_eq!(
        error_code("class A { m() { return this.#y; } }"),
        diagnostic_codes::UNDECLARED_PRIVATE
    );
}

#[test]
fn test_arguments_in_field_initializer() {
    assert_eq!(
        error_code("class A { x = arguments; }"),
        diagnostic_codes::BAD_ARGUMENTS_IN_INITIALIZER
    );
}

#[test]
fn test_deep_nesting_reports_too_much_recursion() {
    let source = format!("{}1{};", "(".repeat(200), ")".repeat(200));
    let options = ParseOptions {
        max_recursion_depth: 64,
        ..ParseOptions::default()
    };
    let err = parse_script(&source, &options).expect_err("nesting is over the limit");
    assert_eq!(err.kind, ParseErrorKind::TooMuchRecursion);
    assert_eq!(err.code(), diagnostic_codes::OVER_RECURSED);
}
