//! Handler that materializes the syntax tree.

use jsfront_common::{Atom, Interner, Span};

use super::{HandlerMark, ParseHandler};
use crate::function_box::FunctionBoxId;
use crate::lazy::{LazyCursor, LazyFunctionSummary};
use crate::parser::base::NodeIndex;
use crate::parser::node::{Node, NodeArena, NodeData, NodeFlags, ParseNodeKind};
use crate::scope::bindings::ScopeBindingsId;

#[derive(Debug, Default)]
pub struct FullParseHandler {
    pub arena: NodeArena,
    /// Set while delazifying: closed-over names and inner-function
    /// summaries recorded by the earlier syntax parse.
    lazy: Option<LazyCursor>,
}

impl FullParseHandler {
    pub fn new(arena: NodeArena) -> Self {
        FullParseHandler { arena, lazy: None }
    }

    /// Handler for a source of `len` bytes, with the arena presized.
    pub fn for_source_len(len: usize) -> Self {
        FullParseHandler::new(NodeArena::for_source_len(len))
    }

    /// Handler for the full parse of a function summarized by `summary`.
    pub fn delazifying(arena: NodeArena, summary: &LazyFunctionSummary) -> Self {
        FullParseHandler {
            arena,
            lazy: Some(LazyCursor::new(summary)),
        }
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    fn kind_of(&self, node: NodeIndex) -> Option<ParseNodeKind> {
        self.arena.kind(node)
    }

    fn parenthesized(&self, node: NodeIndex) -> bool {
        self.arena.flags(node).contains(NodeFlags::PARENTHESIZED)
    }
}

impl ParseHandler for FullParseHandler {
    type Node = NodeIndex;

    const SYNTAX_ONLY: bool = false;

    #[inline]
    fn null(&self) -> NodeIndex {
        NodeIndex::NONE
    }

    fn new_name(&mut self, name: Atom, span: Span) -> NodeIndex {
        self.arena.add_name(ParseNodeKind::Name, span, name)
    }

    fn new_private_name(&mut self, name: Atom, span: Span) -> NodeIndex {
        self.arena.add_name(ParseNodeKind::PrivateName, span, name)
    }

    fn new_leaf(&mut self, kind: ParseNodeKind, span: Span) -> NodeIndex {
        self.arena.add_nullary(kind, span)
    }

    fn new_number(&mut self, value: f64, span: Span) -> NodeIndex {
        self.arena.add_number(span, value)
    }

    fn new_bigint(&mut self, digits: Atom, span: Span) -> NodeIndex {
        self.arena
            .add(Node::new(ParseNodeKind::BigInt, span, NodeData::BigInt(digits)))
    }

    fn new_string(&mut self, value: Atom, span: Span) -> NodeIndex {
        self.arena.add_string(ParseNodeKind::String, span, value)
    }

    fn new_template_string(&mut self, cooked: Option<Atom>, raw: Atom, span: Span) -> NodeIndex {
        self.arena.add(Node::new(
            ParseNodeKind::TemplateString,
            span,
            NodeData::Template { cooked, raw },
        ))
    }

    fn new_regexp(&mut self, pattern: Atom, flags: Atom, span: Span) -> NodeIndex {
        self.arena.add(Node::new(
            ParseNodeKind::RegExp,
            span,
            NodeData::RegExp { pattern, flags },
        ))
    }

    fn new_unary(&mut self, kind: ParseNodeKind, span: Span, kid: NodeIndex) -> NodeIndex {
        self.arena.add_unary(kind, span, kid)
    }

    fn new_binary(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        left: NodeIndex,
        right: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_binary(kind, span, left, right)
    }

    fn new_ternary(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        first: NodeIndex,
        second: NodeIndex,
        third: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_ternary(kind, span, first, second, third)
    }

    fn new_list(&mut self, kind: ParseNodeKind, span: Span) -> NodeIndex {
        self.arena.add_list(kind, span)
    }

    fn add_list_child(&mut self, list: NodeIndex, kid: NodeIndex) {
        if kid.is_some() {
            self.arena.push_child(list, kid);
        }
    }

    fn append_or_create_list(&mut self, kind: ParseNodeKind, left: NodeIndex, right: NodeIndex) -> NodeIndex {
        if kind != ParseNodeKind::Pow && self.kind_of(left) == Some(kind) && !self.parenthesized(left) {
            self.arena.push_child(left, right);
            return left;
        }
        let span = self.arena.span(left).to(self.arena.span(right));
        self.arena.add_list_with(kind, span, vec![left, right])
    }

    fn new_name_kid(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        name: Atom,
        kid: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_name_kid(kind, span, name, kid)
    }

    fn new_function(&mut self, funbox: FunctionBoxId, span: Span) -> NodeIndex {
        self.arena.add_function(span, funbox, NodeIndex::NONE)
    }

    fn set_function_body(&mut self, function: NodeIndex, body: NodeIndex) {
        self.arena.set_function_body(function, body);
    }

    fn new_scope(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        bindings: Option<ScopeBindingsId>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.arena.add_scope(kind, span, bindings, body)
    }

    fn set_span(&mut self, node: NodeIndex, span: Span) {
        self.arena.set_span(node, span);
    }

    fn add_flags(&mut self, node: NodeIndex, flags: NodeFlags) {
        self.arena.add_flags(node, flags);
    }

    fn parenthesize(&mut self, node: NodeIndex) -> NodeIndex {
        self.arena.add_flags(node, NodeFlags::PARENTHESIZED);
        node
    }

    fn is_name(&self, node: NodeIndex) -> Option<Atom> {
        match self.kind_of(node)? {
            ParseNodeKind::Name => self.arena.get_name(node),
            _ => None,
        }
    }

    fn is_parenthesized_name(&self, node: NodeIndex) -> bool {
        self.is_name(node).is_some() && self.parenthesized(node)
    }

    fn is_unparenthesized_destructuring_pattern(&self, node: NodeIndex) -> bool {
        matches!(
            self.kind_of(node),
            Some(ParseNodeKind::Array | ParseNodeKind::Object)
        ) && !self.parenthesized(node)
    }

    fn is_parenthesized_destructuring_pattern(&self, node: NodeIndex) -> bool {
        matches!(
            self.kind_of(node),
            Some(ParseNodeKind::Array | ParseNodeKind::Object)
        ) && self.parenthesized(node)
    }

    fn is_property_access(&self, node: NodeIndex) -> bool {
        self.kind_of(node).is_some_and(ParseNodeKind::is_property_access)
    }

    fn is_element_access(&self, node: NodeIndex) -> bool {
        self.kind_of(node) == Some(ParseNodeKind::Elem)
    }

    fn is_private_member(&self, node: NodeIndex) -> bool {
        match self.kind_of(node) {
            Some(ParseNodeKind::PrivateMember) => true,
            Some(ParseNodeKind::OptionalChain) => self
                .arena
                .get_unary(node)
                .is_some_and(|kid| self.kind_of(kid) == Some(ParseNodeKind::OptionalPrivateMember)),
            _ => false,
        }
    }

    fn is_optional_chain(&self, node: NodeIndex) -> bool {
        self.kind_of(node) == Some(ParseNodeKind::OptionalChain)
    }

    fn is_function_call(&self, node: NodeIndex) -> bool {
        matches!(
            self.kind_of(node),
            Some(ParseNodeKind::Call | ParseNodeKind::SuperCall)
        )
    }

    fn is_unparenthesized_assignment(&self, node: NodeIndex) -> bool {
        self.kind_of(node).is_some_and(ParseNodeKind::is_assignment) && !self.parenthesized(node)
    }

    fn is_unparenthesized_unary(&self, node: NodeIndex) -> bool {
        matches!(
            self.kind_of(node),
            Some(
                ParseNodeKind::TypeOfName
                    | ParseNodeKind::TypeOfExpr
                    | ParseNodeKind::Void
                    | ParseNodeKind::Not
                    | ParseNodeKind::BitNot
                    | ParseNodeKind::Pos
                    | ParseNodeKind::Neg
                    | ParseNodeKind::DeleteName
                    | ParseNodeKind::DeleteProp
                    | ParseNodeKind::DeleteElem
                    | ParseNodeKind::DeleteOptionalChain
                    | ParseNodeKind::DeleteExpr
                    | ParseNodeKind::Await
            )
        ) && !self.parenthesized(node)
    }

    fn is_super_base(&self, node: NodeIndex) -> bool {
        self.kind_of(node) == Some(ParseNodeKind::SuperBase)
    }

    fn is_string_expr_statement(&self, node: NodeIndex) -> Option<(Atom, Span)> {
        if self.kind_of(node)? != ParseNodeKind::ExpressionStatement {
            return None;
        }
        let kid = self.arena.get_unary(node)?;
        if self.kind_of(kid)? != ParseNodeKind::String || self.parenthesized(kid) {
            return None;
        }
        Some((self.arena.get_string(kid)?, self.arena.span(kid)))
    }

    fn can_skip_lazy_closed_over_bindings(&self) -> bool {
        self.lazy.is_some()
    }

    fn next_lazy_closed_over_binding(&mut self) -> Option<Atom> {
        self.lazy.as_mut()?.next_closed_over_binding()
    }

    fn next_lazy_inner_function(&mut self, start: u32) -> Option<LazyFunctionSummary> {
        self.lazy.as_mut()?.next_inner_function(start)
    }

    fn mark(&self) -> HandlerMark {
        HandlerMark {
            nodes: self.arena.len(),
            lazy: self.lazy.as_ref().map(LazyCursor::mark).unwrap_or_default(),
        }
    }

    fn rewind(&mut self, mark: HandlerMark) {
        self.arena.truncate(mark.nodes);
        if let Some(cursor) = self.lazy.as_mut() {
            cursor.reset(mark.lazy);
        }
    }

    fn fold_constants(&mut self, node: NodeIndex, interner: &mut Interner) {
        crate::fold::fold(&mut self.arena, node, interner);
    }
}
