//! Human and JSON views of a parse result for `--dump`.

use jsfront_parser::{BindingName, LazyFunctionSummary, NodeData, NodeFlags, NodeIndex, ParseOutput, ScopeBindings};
use serde_json::{Value, json};
use std::fmt::Write;

/// Indented pre-order listing of the node tree.
pub fn dump_ast(output: &ParseOutput) -> String {
    let mut out = String::new();
    let mut stack: Vec<(NodeIndex, usize)> = vec![(output.root, 0)];
    while let Some((index, depth)) = stack.pop() {
        let Some(node) = output.arena.get(index) else {
            continue;
        };
        let _ = write!(out, "{:indent$}{:?} {}..{}", "", node.kind, node.span.start, node.span.end, indent = depth * 2);
        match &node.data {
            NodeData::Name(name) | NodeData::NameKid { name, .. } => {
                let _ = write!(out, " {}", output.resolve(*name));
            }
            NodeData::String(atom) => {
                let _ = write!(out, " {:?}", output.resolve(*atom));
            }
            NodeData::BigInt(atom) => {
                let _ = write!(out, " {}n", output.resolve(*atom));
            }
            NodeData::Number(value) => {
                let _ = write!(out, " {value}");
            }
            NodeData::Function { funbox, .. } => {
                let funbox = output.function_box(*funbox);
                let name = funbox.name.map_or("<anonymous>", |name| output.resolve(name));
                let _ = write!(out, " {name}");
            }
            _ => {}
        }
        if node.flags.contains(NodeFlags::LAZY) {
            out.push_str(" (lazy)");
        }
        out.push('\n');

        let mut kids = output.arena.children(index);
        kids.reverse();
        stack.extend(kids.into_iter().map(|kid| (kid, depth + 1)));
    }
    out
}

fn scope_kind(bindings: &ScopeBindings) -> &'static str {
    match bindings {
        ScopeBindings::Global(_) => "global",
        ScopeBindings::Eval(_) => "eval",
        ScopeBindings::Module(_) => "module",
        ScopeBindings::Function(_) => "function",
        ScopeBindings::FunctionBodyVar(_) => "function-body-var",
        ScopeBindings::Lexical(_) => "lexical",
        ScopeBindings::NamedLambda(_) => "named-lambda",
    }
}

fn binding_names(output: &ParseOutput, names: &[BindingName]) -> Value {
    Value::Array(
        names
            .iter()
            .map(|binding| {
                json!({
                    "name": output.resolve(binding.name),
                    "closedOver": binding.closed_over,
                })
            })
            .collect(),
    )
}

/// Every binding table, in the order the scopes were closed.
pub fn dump_bindings(output: &ParseOutput) -> Value {
    let scopes = output
        .scope_bindings
        .iter()
        .enumerate()
        .map(|(id, bindings)| {
            json!({
                "id": id,
                "kind": scope_kind(bindings),
                "names": binding_names(output, bindings.names()),
            })
        })
        .collect();
    let functions = output
        .function_boxes
        .iter()
        .map(|funbox| {
            json!({
                "name": funbox.name.map(|name| output.resolve(name)),
                "kind": format!("{:?}", funbox.kind),
                "length": funbox.length,
                "lazy": funbox.lazy_summary.is_some(),
                "functionBindings": funbox.function_bindings.map(|id| id.0),
                "varBindings": funbox.var_bindings.map(|id| id.0),
                "closedOver": output.closed_over_bindings(funbox.id),
            })
        })
        .collect();
    json!({ "scopes": Value::Array(scopes), "functions": Value::Array(functions) })
}

fn summary_json(output: &ParseOutput, summary: &LazyFunctionSummary) -> Value {
    json!({
        "name": summary.name.map(|name| output.resolve(name)),
        "kind": format!("{:?}", summary.kind),
        "strict": summary.strict(),
        "length": summary.length,
        "extent": summary.extent,
        "closedOver": summary
            .closed_over_names()
            .map(|name| output.resolve(name))
            .collect::<Vec<_>>(),
        "freeNames": summary
            .free_names
            .iter()
            .map(|name| output.resolve(*name))
            .collect::<Vec<_>>(),
        "innerFunctions": summary
            .inner_functions
            .iter()
            .map(|inner| summary_json(output, inner))
            .collect::<Vec<_>>(),
    })
}

/// Summaries kept for syntax-parsed functions.
pub fn dump_lazy(output: &ParseOutput) -> Value {
    Value::Array(output.summaries.iter().map(|summary| summary_json(output, summary)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsfront_common::ParseOptions;
    use jsfront_parser::parse_script;

    #[test]
    fn test_ast_dump_indents_children() {
        let output = parse_script("x = 1;", &ParseOptions::default()).expect("parses");
        let dump = dump_ast(&output);
        let lines: Vec<&str> = dump.lines().collect();
        assert!(lines[0].starts_with("LexicalScope "), "{dump}");
        let name = lines.iter().find(|line| line.trim_start().starts_with("Name ")).expect("name node");
        assert!(name.ends_with(" x"), "{dump}");
        assert!(name.starts_with("      "), "{dump}");
    }

    #[test]
    fn test_lazy_functions_are_marked() {
        let output = parse_script("function f() { return 1; }", &ParseOptions::default()).expect("parses");
        let dump = dump_ast(&output);
        assert!(dump.lines().any(|line| line.trim_start().starts_with("Function ") && line.ends_with(" f (lazy)")), "{dump}");
        let lazy = dump_lazy(&output);
        assert_eq!(lazy[0]["name"], "f");
        assert_eq!(lazy[0]["strict"], false);
    }

    #[test]
    fn test_bindings_dump() {
        let output = parse_script("var a; function f() { return a; }", &ParseOptions::eager()).expect("parses");
        let dump = dump_bindings(&output);
        let global = dump["scopes"]
            .as_array()
            .and_then(|scopes| scopes.iter().find(|scope| scope["kind"] == "global"))
            .expect("global scope");
        let names: Vec<&str> = global["names"]
            .as_array()
            .expect("names")
            .iter()
            .filter_map(|binding| binding["name"].as_str())
            .collect();
        assert_eq!(names, vec!["f", "a"]);
        assert_eq!(dump["functions"][0]["name"], "f");
    }
}
