//! Tests for directive prologues: `"use strict"` and the reparse it forces,
//! and `"use asm"` with the pluggable validator.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{DiagnosticCategory, ParseOptions, Span};
use jsfront_parser::{
    AsmJsOutcome, AsmJsValidator, FunctionBox, FunctionFlags, NodeFlags, ParseOutput, parse_script,
    parse_script_with_validator,
};

fn parse(source: &str) -> ParseOutput {
    parse_script(source, &ParseOptions::default()).unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

fn error_code(source: &str) -> u32 {
    match parse_script(source, &ParseOptions::default()) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(err) => err.code(),
    }
}

struct AcceptingValidator;

impl AsmJsValidator for AcceptingValidator {
    fn validate(&mut self, _funbox: &FunctionBox, body: &str, _span: Span) -> AsmJsOutcome {
        assert!(body.contains("use asm"));
        AsmJsOutcome::Valid
    }
}

#[test]
fn test_script_prologue_makes_code_strict() {
    assert_eq!(error_code("'use strict'; with (o) {}"), diagnostic_codes::STRICT_CODE_WITH);
    assert_eq!(error_code("\"use strict\"; with (o) {}"), diagnostic_codes::STRICT_CODE_WITH);
    // Not first in the prologue is still fine.
    assert_eq!(error_code("'a'; 'use strict'; with (o) {}"), diagnostic_codes::STRICT_CODE_WITH);
}

#[test]
fn test_directive_must_lead_the_body() {
    parse("x; 'use strict'; with (o) {}");
    parse("('use strict'); with (o) {}");
    parse("'use strict' + 1; with (o) {}");
}

#[test]
fn test_escaped_directive_is_not_a_directive() {
    parse("'use\\x20strict'; with (o) {}");
    parse("'use\\u0020strict'; with (o) {}");
}

#[test]
fn test_directive_statements_are_flagged() {
    let output = parse("'use strict'; 'other'; x;");
    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    let statements = output.arena.list_children(body);
    assert!(output.arena.flags(statements[0]).contains(NodeFlags::DIRECTIVE));
    assert!(output.arena.flags(statements[1]).contains(NodeFlags::DIRECTIVE));
    assert!(!output.arena.flags(statements[2]).contains(NodeFlags::DIRECTIVE));
}

#[test]
fn test_function_use_strict_sets_flags() {
    let output = parse("function f() { 'use strict'; return 1; } function g() { return 2; }");
    let f = output.function_box(output.find_function("f").expect("function f"));
    assert!(f.strict());
    assert!(f.has_flag(FunctionFlags::HAS_USE_STRICT));
    let g = output.function_box(output.find_function("g").expect("function g"));
    assert!(!g.strict());
}

#[test]
fn test_strict_function_reparses_parameters() {
    // The parameters were read as sloppy code before the directive was seen.
    assert_eq!(error_code("function f(a, a) { 'use strict'; }"), diagnostic_codes::BAD_DUP_ARGS);
    assert_eq!(error_code("function eval() { 'use strict'; }"), diagnostic_codes::BAD_STRICT_ASSIGN);
    assert_eq!(error_code("function f(interface) { 'use strict'; }"), diagnostic_codes::RESERVED_ID);
}

#[test]
fn test_strictness_is_inherited_by_nested_functions() {
    let output = parse("function f() { 'use strict'; function g() { return 1; } }");
    let g = output.function_box(output.find_function("g").expect("function g"));
    assert!(g.strict());
    assert!(!g.has_flag(FunctionFlags::HAS_USE_STRICT));
    assert_eq!(
        error_code("'use strict'; function f() { with (o) {} }"),
        diagnostic_codes::STRICT_CODE_WITH
    );
}

#[test]
fn test_use_strict_with_non_simple_parameters() {
    assert_eq!(
        error_code("function f(a = 1) { 'use strict'; }"),
        diagnostic_codes::STRICT_NON_SIMPLE_PARAMS
    );
    assert_eq!(
        error_code("function f(...rest) { 'use strict'; }"),
        diagnostic_codes::STRICT_NON_SIMPLE_PARAMS
    );
    assert_eq!(
        error_code("function f({ a }) { 'use strict'; }"),
        diagnostic_codes::STRICT_NON_SIMPLE_PARAMS
    );
    // Already strict code is still rejected.
    assert_eq!(
        error_code("'use strict'; function f(a = 1) { 'use strict'; }"),
        diagnostic_codes::STRICT_NON_SIMPLE_PARAMS
    );
}

#[test]
fn test_octal_escape_before_use_strict() {
    assert_eq!(error_code("'\\07'; 'use strict';"), diagnostic_codes::DEPRECATED_OCTAL);
    assert_eq!(
        error_code("function f() { '\\07'; 'use strict'; }"),
        diagnostic_codes::DEPRECATED_OCTAL
    );
    parse("'\\07'; x;");
}

#[test]
fn test_octal_literals_in_strict_code() {
    assert_eq!(error_code("'use strict'; 010;"), diagnostic_codes::DEPRECATED_OCTAL);
    assert_eq!(error_code("'use strict'; '\\07';"), diagnostic_codes::DEPRECATED_OCTAL);
    parse("010; 0o10; '\\0';");
}

#[test]
fn test_octal_literal_is_a_strict_warning_under_strict_option() {
    let options = ParseOptions {
        strict_option: true,
        ..ParseOptions::default()
    };
    let output = parse_script("var x = 010;", &options).expect("sloppy code parses");
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].code, diagnostic_codes::DEPRECATED_OCTAL);
    assert_eq!(output.warnings[0].category, DiagnosticCategory::StrictWarning);
}

#[test]
fn test_use_asm_outside_function_warns() {
    let output = parse("'use asm'; var x = 1;");
    assert_eq!(output.warnings.len(), 1);
    assert_eq!(output.warnings[0].code, diagnostic_codes::USE_ASM_DIRECTIVE_FAIL);
    assert_eq!(output.warnings[0].category, DiagnosticCategory::Warning);
}

#[test]
fn test_rejected_asm_module_is_parsed_as_ordinary_code() {
    for options in [ParseOptions::default(), ParseOptions::eager()] {
        let output = parse_script("function m() { 'use asm'; function f() { return 1; } return f; }", &options)
            .expect("asm module parses");
        let codes: Vec<u32> = output.warnings.iter().map(|warning| warning.code).collect();
        assert_eq!(codes, vec![diagnostic_codes::USE_ASM_TYPE_FAIL]);
        let m = output.function_box(output.find_function("m").expect("function m"));
        assert!(!m.has_flag(FunctionFlags::USE_ASM));
        assert!(!m.has_flag(FunctionFlags::IS_LAZY));
    }
}

#[test]
fn test_accepted_asm_module_keeps_its_flag() {
    let source = "function m() { 'use asm'; function f() { return 1; } return f; }";
    let output = parse_script_with_validator(
        source,
        &ParseOptions::default(),
        Box::new(AcceptingValidator),
    )
    .expect("asm module parses");
    assert!(output.warnings.is_empty());
    let m = output.function_box(output.find_function("m").expect("function m"));
    assert!(m.has_flag(FunctionFlags::USE_ASM));
}

#[test]
fn test_asm_js_disabled_ignores_directive() {
    let options = ParseOptions {
        asm_js_enabled: false,
        ..ParseOptions::default()
    };
    let output = parse_script("function m() { 'use asm'; return 1; }", &options).expect("parses");
    assert!(output.warnings.is_empty());
    let m = output.function_box(output.find_function("m").expect("function m"));
    assert!(!m.has_flag(FunctionFlags::USE_ASM));
}
