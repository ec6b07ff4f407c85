//! Parser module - recursive descent over the JavaScript grammar.
//!
//! The grammar is one `impl Parser` split across files:
//! - `state` - shared parser state, tokens, diagnostics, checkpoints
//! - `state_expressions` - assignment, binary, unary and member expressions
//! - `state_primary` - literals, array/object literals, templates, comprehensions
//! - `state_statements` - statements and statement lists
//! - `state_declarations` - `var`/`let`/`const` and binding patterns
//! - `state_functions` - function definitions, parameters, lazy parsing
//! - `state_classes` - class bodies and private names
//! - `state_modules` - `import` and `export`
//! - `directives` - directive prologues

pub mod base;
pub use base::{NodeIndex, NodeList};

pub mod node;
pub use node::{Node, NodeArena, NodeData, NodeFlags, ParseNodeKind};

mod node_access;
mod node_arena;

pub(crate) mod possible_error;

pub mod state;
pub use state::{Parser, ParserState};

mod directives;
mod state_classes;
mod state_declarations;
mod state_expressions;
mod state_functions;
mod state_modules;
mod state_primary;
mod state_statements;

pub(crate) use state_classes::PrivateNameScope;
pub(crate) use state_functions::FunctionHeader;
