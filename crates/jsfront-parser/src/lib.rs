//! Recursive-descent JavaScript parser for jsfront.
//!
//! This crate provides the syntactic analysis phase:
//! - `parser` - The grammar, generic over a `ParseHandler`
//! - `handler` - Full (tree-building) and syntax-only parse handlers
//! - `scope` - Declared names, binding tables and the used-name tracker
//! - `function_box` / `lazy` - Per-function metadata and lazy summaries
//! - `driver` - Script, module, eval and standalone-function entry points
//! - `fold` - Constant folding over the finished tree

pub mod error;
pub use error::{ParseError, ParseErrorKind};

pub mod function_box;
pub use function_box::{AsyncKind, FunctionBox, FunctionBoxId, FunctionFlags, FunctionSyntaxKind, GeneratorKind};

pub mod lazy;
pub use lazy::LazyFunctionSummary;

// asm.js validation hook
pub mod asm;
pub use asm::{AsmJsOutcome, AsmJsValidator, RejectingAsmJsValidator};

pub mod handler;
pub use handler::{FullParseHandler, ParseHandler, SyntaxNode, SyntaxParseHandler};

pub mod scope;
pub use scope::bindings::{BindingName, ScopeBindings, ScopeBindingsId};
pub use scope::declaration_kind::DeclarationKind;

pub mod parser;
pub use parser::{Node, NodeArena, NodeData, NodeFlags, NodeIndex, NodeList, ParseNodeKind};

pub mod driver;
pub use driver::{
    EvalContext, FunctionFlavor, ParseOutput, delazify_function, parse_comprehension_lambda, parse_eval,
    parse_module, parse_script, parse_script_with_validator, parse_standalone_function,
};

pub mod fold;
