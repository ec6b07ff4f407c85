//! Parse handlers.
//!
//! The grammar code is written once against `ParseHandler`. The full handler
//! materializes every node into a `NodeArena`; the syntax handler builds
//! nothing and hands back a small classification of each expression, which
//! is all the early-error checks need.

use jsfront_common::{Atom, Interner, Span};

use crate::function_box::FunctionBoxId;
use crate::lazy::{LazyCursorMark, LazyFunctionSummary};
use crate::parser::node::{NodeFlags, ParseNodeKind};
use crate::scope::bindings::ScopeBindingsId;

mod full;
mod syntax;

pub use full::FullParseHandler;
pub use syntax::{SyntaxNode, SyntaxParseHandler};

/// Saved handler state for a parser checkpoint.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandlerMark {
    pub nodes: usize,
    pub lazy: LazyCursorMark,
}

pub trait ParseHandler {
    type Node: Copy + PartialEq + std::fmt::Debug;

    /// True for the handler that builds no tree.
    const SYNTAX_ONLY: bool;

    fn null(&self) -> Self::Node;

    fn is_null(&self, node: Self::Node) -> bool {
        node == self.null()
    }

    // =========================================================================
    // Leaves
    // =========================================================================

    fn new_name(&mut self, name: Atom, span: Span) -> Self::Node;
    fn new_private_name(&mut self, name: Atom, span: Span) -> Self::Node;
    /// Payload-free node: `this`, `null`, booleans, `debugger`, elisions...
    fn new_leaf(&mut self, kind: ParseNodeKind, span: Span) -> Self::Node;
    fn new_number(&mut self, value: f64, span: Span) -> Self::Node;
    fn new_bigint(&mut self, digits: Atom, span: Span) -> Self::Node;
    fn new_string(&mut self, value: Atom, span: Span) -> Self::Node;
    fn new_template_string(&mut self, cooked: Option<Atom>, raw: Atom, span: Span) -> Self::Node;
    fn new_regexp(&mut self, pattern: Atom, flags: Atom, span: Span) -> Self::Node;

    // =========================================================================
    // Interior nodes
    // =========================================================================

    fn new_unary(&mut self, kind: ParseNodeKind, span: Span, kid: Self::Node) -> Self::Node;
    fn new_binary(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        left: Self::Node,
        right: Self::Node,
    ) -> Self::Node;
    fn new_ternary(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        first: Self::Node,
        second: Self::Node,
        third: Self::Node,
    ) -> Self::Node;
    fn new_list(&mut self, kind: ParseNodeKind, span: Span) -> Self::Node;
    fn add_list_child(&mut self, list: Self::Node, kid: Self::Node);
    /// Combine the operands of binary operator `kind`. A left operand that
    /// is an unparenthesized chain of the same left-associative operator is
    /// extended in place.
    fn append_or_create_list(&mut self, kind: ParseNodeKind, left: Self::Node, right: Self::Node) -> Self::Node;
    /// `a.b`, `label: stmt`, `break label`.
    fn new_name_kid(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        name: Atom,
        kid: Self::Node,
    ) -> Self::Node;
    fn new_function(&mut self, funbox: FunctionBoxId, span: Span) -> Self::Node;
    fn set_function_body(&mut self, function: Self::Node, body: Self::Node);
    fn new_scope(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        bindings: Option<ScopeBindingsId>,
        body: Self::Node,
    ) -> Self::Node;

    fn set_span(&mut self, node: Self::Node, span: Span);
    fn add_flags(&mut self, node: Self::Node, flags: NodeFlags);
    /// Mark `node` as wrapped in parentheses.
    fn parenthesize(&mut self, node: Self::Node) -> Self::Node;

    // =========================================================================
    // Queries
    // =========================================================================

    /// The name of a (possibly parenthesized) identifier reference.
    fn is_name(&self, node: Self::Node) -> Option<Atom>;
    fn is_parenthesized_name(&self, node: Self::Node) -> bool;
    fn is_unparenthesized_destructuring_pattern(&self, node: Self::Node) -> bool;
    fn is_parenthesized_destructuring_pattern(&self, node: Self::Node) -> bool;
    /// `a.b`, `a[b]` or `a.#b`, outside an optional chain.
    fn is_property_access(&self, node: Self::Node) -> bool;
    /// `a[b]`, outside an optional chain.
    fn is_element_access(&self, node: Self::Node) -> bool;
    fn is_private_member(&self, node: Self::Node) -> bool;
    fn is_optional_chain(&self, node: Self::Node) -> bool;
    fn is_function_call(&self, node: Self::Node) -> bool;
    fn is_unparenthesized_assignment(&self, node: Self::Node) -> bool;
    fn is_unparenthesized_unary(&self, node: Self::Node) -> bool;
    fn is_super_base(&self, node: Self::Node) -> bool;
    /// Directive candidate: an expression statement holding nothing but an
    /// unparenthesized string literal.
    fn is_string_expr_statement(&self, node: Self::Node) -> Option<(Atom, Span)>;

    // =========================================================================
    // Lazy functions
    // =========================================================================

    /// Whether closed-over bindings come from a summary rather than from
    /// the used-name tracker.
    fn can_skip_lazy_closed_over_bindings(&self) -> bool;
    fn next_lazy_closed_over_binding(&mut self) -> Option<Atom>;
    /// Summary of the inner function starting at `start`, when a previous
    /// syntax parse recorded one.
    fn next_lazy_inner_function(&mut self, start: u32) -> Option<LazyFunctionSummary>;

    fn mark(&self) -> HandlerMark;
    fn rewind(&mut self, mark: HandlerMark);

    /// Constant-fold a finished top-level statement in place.
    fn fold_constants(&mut self, _node: Self::Node, _interner: &mut Interner) {}
}
