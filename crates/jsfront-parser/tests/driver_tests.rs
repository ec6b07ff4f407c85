//! Tests for the parse entry points: eval code, modules, standalone
//! functions, comprehension lambdas and source map URLs.

use jsfront_common::ParseOptions;
use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_parser::{
    EvalContext, FunctionFlavor, ParseNodeKind, ParseOutput, ScopeBindings, parse_comprehension_lambda, parse_eval,
    parse_module, parse_script, parse_standalone_function,
};

fn eval_error_code(source: &str, context: EvalContext) -> u32 {
    match parse_eval(source, &ParseOptions::default(), context) {
        Ok(_) => panic!("expected eval of {source:?} to fail"),
        Err(err) => err.code(),
    }
}

fn module_error_code(source: &str) -> u32 {
    match parse_module(source, &ParseOptions::default()) {
        Ok(_) => panic!("expected module {source:?} to fail"),
        Err(err) => err.code(),
    }
}

fn binding_names<'a>(output: &'a ParseOutput, bindings: &[jsfront_parser::BindingName]) -> Vec<&'a str> {
    bindings.iter().map(|binding| output.resolve(binding.name)).collect()
}

// =============================================================================
// Eval
// =============================================================================

#[test]
fn test_eval_gets_eval_table() {
    let output = parse_eval("var x; let y; function f() {}", &ParseOptions::default(), EvalContext::default())
        .expect("eval parses");
    let Some(ScopeBindings::Eval(table)) = output.root_bindings() else {
        panic!("eval code has an eval table");
    };
    assert_eq!(binding_names(&output, table.functions()), vec!["f"]);
    assert_eq!(binding_names(&output, table.vars()), vec!["x"]);
    assert_eq!(binding_names(&output, table.lets()), vec!["y"]);
}

#[test]
fn test_eval_context_permissions() {
    assert_eq!(eval_error_code("return 1;", EvalContext::default()), diagnostic_codes::BAD_RETURN);
    assert_eq!(eval_error_code("new.target;", EvalContext::default()), diagnostic_codes::BAD_NEWTARGET);
    assert_eq!(eval_error_code("super.x;", EvalContext::default()), diagnostic_codes::BAD_SUPERPROP);

    let in_method = EvalContext {
        in_function: true,
        allow_new_target: true,
        allow_super_property: true,
        ..EvalContext::default()
    };
    assert!(parse_eval("new.target; super.x;", &ParseOptions::default(), in_method).is_ok());
}

#[test]
fn test_strict_eval() {
    let strict = EvalContext {
        strict: true,
        ..EvalContext::default()
    };
    assert_eq!(eval_error_code("with (o) {}", strict), diagnostic_codes::STRICT_CODE_WITH);
    assert!(parse_eval("with (o) {}", &ParseOptions::default(), EvalContext::default()).is_ok());
}

// =============================================================================
// Modules
// =============================================================================

#[test]
fn test_module_import_table() {
    let output = parse_module(
        "import a, { b as c } from 'm'; import * as ns from 'n'; var v; export { c, v };",
        &ParseOptions::default(),
    )
    .expect("module parses");
    assert_eq!(output.arena.kind(output.root), Some(ParseNodeKind::Module));
    let Some(ScopeBindings::Module(table)) = output.root_bindings() else {
        panic!("module has a module table");
    };
    assert_eq!(binding_names(&output, table.imports()), vec!["a", "c", "ns"]);
    assert_eq!(binding_names(&output, table.vars()), vec!["v"]);
}

#[test]
fn test_module_code_is_strict() {
    assert_eq!(module_error_code("with (o) {}"), diagnostic_codes::STRICT_CODE_WITH);
}

#[test]
fn test_export_needs_a_local_binding() {
    assert_eq!(module_error_code("export { missing };"), diagnostic_codes::MISSING_EXPORT_BINDING);
    // Declared after the export clause is fine.
    assert!(parse_module("export { later }; let later = 1;", &ParseOptions::default()).is_ok());
    // Re-exports name no local binding.
    assert!(parse_module("export { elsewhere } from 'm';", &ParseOptions::default()).is_ok());
}

#[test]
fn test_duplicate_export_names() {
    assert_eq!(module_error_code("export var x; export { x };"), diagnostic_codes::DUPLICATE_EXPORT_NAME);
    assert_eq!(
        module_error_code("export default 1; export default 2;"),
        diagnostic_codes::DUPLICATE_EXPORT_NAME
    );
    assert!(parse_module("var x; export { x, x as y };", &ParseOptions::default()).is_ok());
}

#[test]
fn test_import_redeclaration() {
    assert_eq!(module_error_code("import a from 'm'; var a;"), diagnostic_codes::REDECLARED_VAR);
}

// =============================================================================
// Standalone functions
// =============================================================================

#[test]
fn test_standalone_function() {
    let output = parse_standalone_function("a, b", "return a + b;", FunctionFlavor::Normal, &ParseOptions::default())
        .expect("function parses");
    assert_eq!(output.arena.kind(output.root), Some(ParseNodeKind::Function));
    let (funbox, _) = output.arena.get_function(output.root).expect("function node");
    let funbox = output.function_box(funbox);
    assert_eq!(funbox.name.map(|name| output.resolve(name)), Some("anonymous"));
    assert_eq!(funbox.length, 2);
    assert!(!funbox.is_generator());
}

#[test]
fn test_standalone_function_flavors() {
    let options = ParseOptions::default();
    let generator = parse_standalone_function("", "yield 1;", FunctionFlavor::Generator, &options).expect("parses");
    let (funbox, _) = generator.arena.get_function(generator.root).expect("function node");
    assert!(generator.function_box(funbox).is_generator());

    let async_fn = parse_standalone_function("x", "await x;", FunctionFlavor::Async, &options).expect("parses");
    let (funbox, _) = async_fn.arena.get_function(async_fn.root).expect("function node");
    assert!(async_fn.function_box(funbox).is_async());

    assert!(parse_standalone_function("", "yield 1; await 2;", FunctionFlavor::AsyncGenerator, &options).is_ok());
}

#[test]
fn test_standalone_parameters_cannot_close_early() {
    let err = parse_standalone_function("a) {}; (function(b", "", FunctionFlavor::Normal, &ParseOptions::default())
        .expect_err("injected parameters");
    assert_eq!(err.code(), diagnostic_codes::MISSING_FORMAL);
}

#[test]
fn test_standalone_body_cannot_close_early() {
    let result = parse_standalone_function("", "}); (function() {", FunctionFlavor::Normal, &ParseOptions::default());
    assert!(result.is_err());
}

#[test]
fn test_standalone_parameters_may_end_in_comment() {
    let output = parse_standalone_function("a // trailing", "return a;", FunctionFlavor::Normal, &ParseOptions::default())
        .expect("line comment ends at the inserted newline");
    let (funbox, _) = output.arena.get_function(output.root).expect("function node");
    assert_eq!(output.function_box(funbox).length, 1);
}

// =============================================================================
// Comprehensions
// =============================================================================

#[test]
fn test_comprehension_lambda() {
    let output = parse_comprehension_lambda("(for (x of xs) if (x) x * 2)", &ParseOptions::default())
        .expect("comprehension parses");
    assert_eq!(output.arena.kind(output.root), Some(ParseNodeKind::GenExp));
    assert_eq!(output.function_boxes.len(), 1);
    assert!(output.function_boxes[0].is_generator());
}

#[test]
fn test_comprehensions_can_be_disabled() {
    let options = ParseOptions {
        allow_comprehensions: false,
        ..ParseOptions::default()
    };
    let err = parse_comprehension_lambda("(for (x of xs) x)", &options).expect_err("disabled");
    assert_eq!(err.code(), diagnostic_codes::COMPREHENSIONS_DISABLED);
    let err = parse_script("[for (x of xs) x];", &options).expect_err("disabled");
    assert_eq!(err.code(), diagnostic_codes::COMPREHENSIONS_DISABLED);
}

// =============================================================================
// Source map URLs
// =============================================================================

#[test]
fn test_source_map_url_from_comment() {
    let output = parse_script("x;\n//# sourceMappingURL=out.js.map\n", &ParseOptions::default()).expect("parses");
    assert_eq!(output.source_map_url.as_deref(), Some("out.js.map"));
    assert!(output.warnings.is_empty());

    let output = parse_script("x;\n//@ sourceMappingURL=old.map", &ParseOptions::default()).expect("parses");
    assert_eq!(output.source_map_url.as_deref(), Some("old.map"));
}

#[test]
fn test_source_map_option_overrides_comment() {
    let options = ParseOptions {
        source_map_url: Some("embedder.map".to_string()),
        ..ParseOptions::default()
    };
    let output = parse_script("x;\n//# sourceMappingURL=out.js.map", &options).expect("parses");
    assert_eq!(output.source_map_url.as_deref(), Some("embedder.map"));
    let codes: Vec<u32> = output.warnings.iter().map(|warning| warning.code).collect();
    assert_eq!(codes, vec![diagnostic_codes::SOURCE_MAP_URL_OVERRIDE]);

    let output = parse_script("x;", &options).expect("parses");
    assert_eq!(output.source_map_url.as_deref(), Some("embedder.map"));
    assert!(output.warnings.is_empty());
}
