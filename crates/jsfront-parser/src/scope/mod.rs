//! Name analysis done while parsing.
//!
//! Scopes and contexts mirror the nesting of the source as the parser walks
//! it. Declarations are checked against the open scopes as they are seen,
//! references are recorded in the used-name tracker, and each scope is
//! finalized into a binding table when the parser leaves it.

pub mod bindings;
pub mod declaration_kind;
pub mod parse_context;
pub mod parse_scope;
pub mod used_names;

pub(crate) mod tracker;
