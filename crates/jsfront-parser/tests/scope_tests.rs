//! Tests for declaration tracking: redeclaration errors, the binding tables
//! of finished scopes and closed-over analysis.

use jsfront_common::ParseOptions;
use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_parser::scope::bindings::BindingName;
use jsfront_parser::{ParseNodeKind, ParseOutput, ScopeBindings, parse_module, parse_script};

fn parse_with(source: &str, options: &ParseOptions) -> ParseOutput {
    parse_script(source, options).unwrap_or_else(|err| panic!("{source:?} failed: {err}"))
}

fn parse(source: &str) -> ParseOutput {
    parse_with(source, &ParseOptions::default())
}

fn error_code(source: &str) -> u32 {
    match parse_script(source, &ParseOptions::default()) {
        Ok(_) => panic!("expected {source:?} to fail"),
        Err(err) => err.code(),
    }
}

fn module_error_code(source: &str) -> u32 {
    match parse_module(source, &ParseOptions::default()) {
        Ok(_) => panic!("expected module {source:?} to fail"),
        Err(err) => err.code(),
    }
}

fn names<'a>(output: &'a ParseOutput, bindings: &[BindingName]) -> Vec<&'a str> {
    bindings.iter().map(|binding| output.resolve(binding.name)).collect()
}

fn closed_over<'a>(output: &'a ParseOutput, bindings: &ScopeBindings) -> Vec<&'a str> {
    let mut names: Vec<&str> = bindings.closed_over().map(|atom| output.resolve(atom)).collect();
    names.sort_unstable();
    names
}

#[test]
fn test_global_table_groups_by_kind() {
    let output = parse("var a; let b; const c = 1; function f() {} class D {} var e;");
    let Some(ScopeBindings::Global(table)) = output.root_bindings() else {
        panic!("script has a global table");
    };
    assert_eq!(names(&output, table.functions()), vec!["f"]);
    assert_eq!(names(&output, table.vars()), vec!["a", "e"]);
    assert_eq!(names(&output, table.lets()), vec!["b", "D"]);
    assert_eq!(names(&output, table.consts()), vec!["c"]);
}

#[test]
fn test_lexical_redeclarations() {
    assert_eq!(error_code("let a; let a;"), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(error_code("let a; var a;"), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(error_code("var a; const a = 1;"), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(error_code("{ var a; let a; }"), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(error_code("class C {} function C() {}"), diagnostic_codes::REDECLARED_VAR);
}

#[test]
fn test_redeclaration_points_at_previous_declaration() {
    let err = parse_script("let a;\nlet a;", &ParseOptions::default()).expect_err("redeclared");
    assert_eq!(err.code(), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(err.diagnostic.start, 11);
    let related = &err.diagnostic.related_information;
    assert_eq!(related.len(), 1);
    assert_eq!(related[0].start, 4);
}

#[test]
fn test_var_redeclarations_are_allowed() {
    parse("var a; var a; function f() {} var f; function g() {} function g() {}");
    parse("{ let a; } var a;");
    parse("let a; { let a; }");
}

#[test]
fn test_repeated_body_level_functions() {
    // Sloppy code keeps the second declaration.
    parse("function f() {} function f() {}");
    parse("function outer() { function f() {} function f() {} }");
    assert_eq!(
        error_code("'use strict'; function f() {} function f() {}"),
        diagnostic_codes::REDECLARED_VAR
    );
    assert_eq!(
        error_code("function outer() { 'use strict'; function f() {} function f() {} }"),
        diagnostic_codes::REDECLARED_VAR
    );
    assert_eq!(
        module_error_code("function f() {} function f() {}"),
        diagnostic_codes::REDECLARED_VAR
    );
    // A var and a function of the same name still share the binding.
    parse("'use strict'; var f; function f() {}");
    assert_eq!(
        error_code("'use strict'; { function f() {} function f() {} }"),
        diagnostic_codes::REDECLARED_VAR
    );
    parse("{ function f() {} function f() {} }");
}

#[test]
fn test_catch_parameter_redeclarations() {
    parse("try {} catch (e) { var e; }");
    assert_eq!(error_code("try {} catch (e) { let e; }"), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(
        error_code("try {} catch (e) { for (var e of []); }"),
        diagnostic_codes::REDECLARED_VAR
    );
    assert_eq!(error_code("try {} catch ([e]) { var e; }"), diagnostic_codes::REDECLARED_VAR);
}

#[test]
fn test_parameter_redeclarations() {
    parse("function f(a) { var a; }");
    assert_eq!(error_code("function f(a) { let a; }"), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(error_code("function f(a = 1) { let a; }"), diagnostic_codes::REDECLARED_VAR);
    assert_eq!(error_code("function f({ a } = {}) { let a; }"), diagnostic_codes::REDECLARED_VAR);
    // The function's own name is not a parameter.
    parse("(function g(a = 1) { let g; });");
}

#[test]
fn test_duplicate_parameters() {
    parse("function f(a, a) {}");
    assert_eq!(error_code("'use strict'; function f(a, a) {}"), diagnostic_codes::BAD_DUP_ARGS);
    assert_eq!(error_code("function f(a, [a]) {}"), diagnostic_codes::BAD_DUP_ARGS);
    assert_eq!(error_code("function f(a, a = 1) {}"), diagnostic_codes::BAD_DUP_ARGS);
    assert_eq!(error_code("({ m(a, a) {} });"), diagnostic_codes::BAD_DUP_ARGS);
}

#[test]
fn test_function_table_layout() {
    let output = parse_with("function f(a, b, ...c) { var d; let e; const g = 1; }", &ParseOptions::eager());
    let id = output.find_function("f").expect("function f");
    let funbox = output.function_box(id);
    assert_eq!(funbox.length, 2);
    let table = funbox.function_bindings.expect("function table");
    let ScopeBindings::Function(table) = output.bindings(table) else {
        panic!("function scope has a function table");
    };
    assert_eq!(names(&output, table.positional_formals()), vec!["a", "b"]);
    assert_eq!(names(&output, table.non_positional_formals()), vec!["c"]);
    assert_eq!(names(&output, table.vars()), vec!["d"]);
    assert_eq!(names(&output, table.lets()), vec!["e"]);
    assert_eq!(names(&output, table.consts()), vec!["g"]);
}

#[test]
fn test_parameter_expressions_split_off_body_var_scope() {
    let output = parse_with("function f(a = 1) { var b; }", &ParseOptions::eager());
    let funbox = output.function_box(output.find_function("f").expect("function f"));
    let var_table = funbox.var_bindings.expect("separate var table");
    let ScopeBindings::FunctionBodyVar(table) = output.bindings(var_table) else {
        panic!("body var scope has a var table");
    };
    assert_eq!(names(&output, table.vars()), vec!["b"]);
}

#[test]
fn test_named_lambda_scope() {
    let output = parse_with("(function named() { return named; });", &ParseOptions::eager());
    let funbox = output.function_box(output.find_function("named").expect("function named"));
    let table = funbox.named_lambda_bindings.expect("named lambda table");
    assert!(matches!(output.bindings(table), ScopeBindings::NamedLambda(_)));
    assert_eq!(names(&output, output.bindings(table).names()), vec!["named"]);
}

#[test]
fn test_block_scope_node_carries_table() {
    let output = parse("{ let x; const y = 1; }");
    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    let block = output.arena.list_children(body)[0];
    assert_eq!(output.arena.kind(block), Some(ParseNodeKind::LexicalScope));
    let (table, _) = output.arena.get_scope(block).expect("block scope");
    let table = output.bindings(table.expect("block table"));
    assert_eq!(names(&output, table.names()), vec!["x", "y"]);
}

#[test]
fn test_closed_over_globals() {
    for options in [ParseOptions::eager(), ParseOptions::default()] {
        let output = parse_with("var used = 1, unused = 2; function f() { return used; }", &options);
        let table = output.root_bindings().expect("global table");
        assert_eq!(closed_over(&output, table), vec!["used"]);
    }
}

#[test]
fn test_closed_over_block_bindings() {
    let output = parse("{ let inner = 1, plain = 2; (() => inner); plain; }");
    let (_, body) = output.arena.get_scope(output.root).expect("script scope");
    let block = output.arena.list_children(body)[0];
    let (table, _) = output.arena.get_scope(block).expect("block scope");
    let table = output.bindings(table.expect("block table"));
    assert_eq!(closed_over(&output, table), vec!["inner"]);
}

#[test]
fn test_use_in_same_function_is_not_closed_over() {
    let output = parse_with("function f() { var a = 1; { let b = a; } return a; }", &ParseOptions::eager());
    let id = output.find_function("f").expect("function f");
    assert!(output.closed_over_bindings(id).is_empty());
}

#[test]
fn test_direct_eval_closes_over_everything() {
    let output = parse_with("function f(p) { var a; let b; eval('a'); }", &ParseOptions::eager());
    let id = output.find_function("f").expect("function f");
    let closed = output.closed_over_bindings(id);
    for name in ["a", "b", "p"] {
        assert!(closed.iter().any(|closed| closed == name), "{name} should be closed over: {closed:?}");
    }
}

#[test]
fn test_shadowing_binding_consumes_inner_use() {
    let source = "function f() { var x; function g() { var x; return x; } }";
    let output = parse_with(source, &ParseOptions::eager());
    let f = output.find_function("f").expect("function f");
    let g = output.find_function("g").expect("function g");
    assert!(output.closed_over_bindings(f).is_empty());
    assert!(output.closed_over_bindings(g).is_empty());
}
