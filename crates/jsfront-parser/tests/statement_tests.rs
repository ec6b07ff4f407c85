//! Tests for statement parsing: control flow, labels, declarations in
//! statement position, automatic semicolon insertion and extra warnings.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{DiagnosticCategory, ParseOptions};
use jsfront_parser::{ParseNodeKind, ParseOutput, parse_script};

fn parse(source: &str) -> ParseOutput {
    parse_script(source, &ParseOptions::default()).unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

fn error_code(source: &str) -> u32 {
    match parse_script(source, &ParseOptions::default()) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(err) => err.code(),
    }
}

/// Codes of the warnings collected with extra warnings on.
fn warning_codes(source: &str) -> Vec<u32> {
    let options = ParseOptions {
        extra_warnings_option: true,
        ..ParseOptions::eager()
    };
    let output = parse_script(source, &options).unwrap_or_else(|err| panic!("{source:?} failed: {err}"));
    output.warnings.iter().map(|warning| warning.code).collect()
}

fn top_level_kinds(output: &ParseOutput) -> Vec<ParseNodeKind> {
    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    output
        .arena
        .list_children(body)
        .iter()
        .filter_map(|&statement| output.arena.kind(statement))
        .collect()
}

#[test]
fn test_statement_kinds() {
    let output = parse(
        r"
var a = 1;
if (a) b(); else c();
while (a) a--;
do { a++; } while (a < 3)
for (;;) break;
switch (a) { case 1: break; default: }
try { a(); } catch (e) {} finally {}
throw a;
",
    );
    assert_eq!(
        top_level_kinds(&output),
        vec![
            ParseNodeKind::VarStmt,
            ParseNodeKind::If,
            ParseNodeKind::While,
            ParseNodeKind::DoWhile,
            ParseNodeKind::For,
            ParseNodeKind::Switch,
            ParseNodeKind::Try,
            ParseNodeKind::Throw,
        ]
    );
}

#[test]
fn test_lexical_for_head_gets_its_own_scope() {
    let output = parse("for (let i = 0; i < 3; i++) {}\nfor (var j in o) {}\nfor (const k of xs) {}");
    assert_eq!(
        top_level_kinds(&output),
        vec![ParseNodeKind::LexicalScope, ParseNodeKind::For, ParseNodeKind::LexicalScope]
    );
}

#[test]
fn test_break_and_continue_targets() {
    assert_eq!(error_code("break;"), diagnostic_codes::BAD_BREAK);
    assert_eq!(error_code("continue;"), diagnostic_codes::BAD_CONTINUE);
    assert_eq!(error_code("switch (x) { case 1: continue; }"), diagnostic_codes::BAD_CONTINUE);
    assert_eq!(error_code("while (x) { break missing; }"), diagnostic_codes::LABEL_NOT_FOUND);
    parse("while (x) { continue; } switch (x) { case 1: break; }");
}

#[test]
fn test_labels() {
    parse("outer: for (;;) { inner: for (;;) { continue outer; } }");
    parse("block: { break block; }");
    assert_eq!(error_code("a: { continue a; }"), diagnostic_codes::BAD_CONTINUE_LABEL);
}

#[test]
fn test_duplicate_label_nested() {
    let source = r"
target:
target:
while (true) {}
";
    assert_eq!(error_code(source), diagnostic_codes::DUPLICATE_LABEL);
}

#[test]
fn test_duplicate_label_sequential_allowed() {
    let source = r"
target:
while (true) {}

target:
while (true) {}
";
    parse(source);
}

#[test]
fn test_labelled_functions() {
    parse("l: function f() {}");
    assert_eq!(error_code("l: function* g() {}"), diagnostic_codes::FUNCTION_LABEL);
    assert_eq!(error_code("'use strict'; l: function f() {}"), diagnostic_codes::FUNCTION_LABEL);
}

#[test]
fn test_lexical_declaration_in_statement_position() {
    assert_eq!(error_code("if (x) let y = 1;"), diagnostic_codes::LEXICAL_DECL_NOT_IN_BLOCK);
    assert_eq!(error_code("while (x) const y = 1;"), diagnostic_codes::LEXICAL_DECL_NOT_IN_BLOCK);
    assert_eq!(error_code("if (x) class C {}"), diagnostic_codes::LEXICAL_DECL_NOT_IN_BLOCK);
    // `let` followed by a newline is an identifier expression.
    parse("if (x) let\ny = 1;");
}

#[test]
fn test_function_declaration_in_if() {
    parse("if (x) function f() {} else function g() {}");
    assert_eq!(
        error_code("'use strict'; if (x) function f() {}"),
        diagnostic_codes::STRICT_FUNCTION_STATEMENT
    );
}

#[test]
fn test_declaration_errors() {
    assert_eq!(error_code("const x;"), diagnostic_codes::BAD_CONST_DECL);
    assert_eq!(error_code("var [a];"), diagnostic_codes::BAD_DESTRUCT_DECL);
    assert_eq!(error_code("let let = 1;"), diagnostic_codes::LEXICAL_DECL_DEFINES_LET);
    parse("var [a, , b = 1, ...c] = d, { e, f: [g], ...h } = i;");
}

#[test]
fn test_for_head_errors() {
    assert_eq!(error_code("for (let x = 0 in o);"), diagnostic_codes::FOR_IN_DECL_INIT);
    assert_eq!(error_code("for (var x = 0 of o);"), diagnostic_codes::FOR_IN_DECL_INIT);
    assert_eq!(error_code("for (let.x of o);"), diagnostic_codes::LET_STARTING_FOROF);
    assert_eq!(error_code("for (a + b in o);"), diagnostic_codes::BAD_FOR_LEFTSIDE);
    assert_eq!(
        error_code("async function f() { for await (x in o); }"),
        diagnostic_codes::FOR_AWAIT_NOT_OF
    );
    // Web-compatible sloppy initializer.
    parse("for (var x = 0 in o);");
    parse("async function f() { for await (const x of o); }");
}

#[test]
fn test_try_needs_catch_or_finally() {
    assert_eq!(error_code("try {}"), diagnostic_codes::CATCH_OR_FINALLY);
    parse("try {} catch {} try {} finally {} try {} catch ([a, b]) {}");
}

#[test]
fn test_switch_with_two_defaults() {
    assert_eq!(
        error_code("switch (x) { default: break; default: }"),
        diagnostic_codes::TOO_MANY_DEFAULTS
    );
}

#[test]
fn test_throw_needs_expression_on_same_line() {
    assert_eq!(error_code("throw\nx;"), diagnostic_codes::NEWLINE_AFTER_THROW);
}

#[test]
fn test_return_outside_function() {
    assert_eq!(error_code("return 1;"), diagnostic_codes::BAD_RETURN);
    parse("function f() { return 1; }");
}

#[test]
fn test_with_statement() {
    parse("with (o) { x; }");
    assert_eq!(error_code("'use strict'; with (o) {}"), diagnostic_codes::STRICT_CODE_WITH);
}

#[test]
fn test_automatic_semicolon_insertion() {
    let output = parse("a = 1\nb = 2\n{ c }\nd");
    assert_eq!(top_level_kinds(&output).len(), 4);
    parse("do x; while (y) z");
    assert_eq!(error_code("var a = 1 var b = 2;"), diagnostic_codes::SEMI_BEFORE_STMNT);
}

#[test]
fn test_unnamed_declarations() {
    assert_eq!(error_code("function () {}"), diagnostic_codes::UNNAMED_FUNCTION_STMT);
    assert_eq!(error_code("class {}"), diagnostic_codes::UNNAMED_CLASS_STMT);
}

#[test]
fn test_import_and_export_only_in_modules() {
    assert_eq!(error_code("import x from 'm';"), diagnostic_codes::IMPORT_DECL_AT_TOP_LEVEL);
    assert_eq!(error_code("export var x;"), diagnostic_codes::EXPORT_DECL_AT_TOP_LEVEL);
    // Dynamic import is an expression.
    parse("import('m');");
}

#[test]
fn test_extra_warning_for_assignment_in_condition() {
    assert_eq!(warning_codes("if (a = b) {}"), vec![diagnostic_codes::EQUAL_AS_ASSIGN]);
    assert!(warning_codes("if ((a = b)) {}").is_empty());
    assert!(warning_codes("if (a == b) {}").is_empty());
}

#[test]
fn test_extra_warning_for_unreachable_code() {
    let codes = warning_codes("function f() { return; a(); b(); }");
    assert_eq!(codes, vec![diagnostic_codes::STMT_AFTER_RETURN]);
    // Hoisted function declarations after a return are reachable.
    assert!(warning_codes("function f() { return g(); function g() {} }").is_empty());
}

#[test]
fn test_extra_warning_for_useless_expression() {
    assert_eq!(warning_codes("1;"), vec![diagnostic_codes::USELESS_EXPR]);
    assert!(warning_codes("1 + a;").is_empty());
}

#[test]
fn test_extra_warnings_are_off_by_default() {
    let output = parse("if (a = b) {} 1;");
    assert!(output.warnings.is_empty());
}

#[test]
fn test_strict_option_reports_sloppy_problems_as_warnings() {
    let options = ParseOptions {
        strict_option: true,
        ..ParseOptions::default()
    };
    let output = parse_script("delete x;", &options).expect("sloppy code parses");
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].code, diagnostic_codes::DEPRECATED_DELETE_OPERAND);
    assert_eq!(output.warnings[0].category, DiagnosticCategory::StrictWarning);
}
