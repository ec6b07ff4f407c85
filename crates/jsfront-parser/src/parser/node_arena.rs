//! NodeArena creation methods (add_* methods).
//!
//! This module contains all node creation and mutation methods for the
//! NodeArena. Accessors live in `node_access.rs`.

use jsfront_common::limits::{BYTES_PER_NODE_ESTIMATE, MAX_NODE_PREALLOC};
use jsfront_common::{Atom, Span};

use super::base::{NodeIndex, NodeList};
use super::node::*;
use crate::function_box::FunctionBoxId;
use crate::scope::bindings::ScopeBindingsId;

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena::default()
    }

    /// Create an arena with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> NodeArena {
        NodeArena {
            nodes: Vec::with_capacity(capacity.min(MAX_NODE_PREALLOC)),
        }
    }

    /// Create an arena sized for a source text of `len` bytes.
    pub fn for_source_len(len: usize) -> NodeArena {
        NodeArena::with_capacity(len / BYTES_PER_NODE_ESTIMATE)
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Drop every node allocated after `len`; used when a speculative parse
    /// is rewound.
    pub fn truncate(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // =========================================================================
    // Node creation
    // =========================================================================

    /// Append a node and return its index.
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        self.nodes.push(node);
        index
    }

    pub fn add_nullary(&mut self, kind: ParseNodeKind, span: Span) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::Nullary))
    }

    pub fn add_unary(&mut self, kind: ParseNodeKind, span: Span, kid: NodeIndex) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::Unary(kid)))
    }

    pub fn add_binary(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        left: NodeIndex,
        right: NodeIndex,
    ) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::Binary { left, right }))
    }

    pub fn add_ternary(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        first: NodeIndex,
        second: NodeIndex,
        third: NodeIndex,
    ) -> NodeIndex {
        self.add(Node::new(
            kind,
            span,
            NodeData::Ternary {
                first,
                second,
                third,
            },
        ))
    }

    pub fn add_list(&mut self, kind: ParseNodeKind, span: Span) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::List(NodeList::new())))
    }

    pub fn add_list_with(&mut self, kind: ParseNodeKind, span: Span, nodes: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::List(NodeList { nodes })))
    }

    pub fn add_name(&mut self, kind: ParseNodeKind, span: Span, name: Atom) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::Name(name)))
    }

    pub fn add_name_kid(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        name: Atom,
        kid: NodeIndex,
    ) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::NameKid { name, kid }))
    }

    pub fn add_number(&mut self, span: Span, value: f64) -> NodeIndex {
        self.add(Node::new(ParseNodeKind::Number, span, NodeData::Number(value)))
    }

    pub fn add_string(&mut self, kind: ParseNodeKind, span: Span, value: Atom) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::String(value)))
    }

    pub fn add_function(&mut self, span: Span, funbox: FunctionBoxId, body: NodeIndex) -> NodeIndex {
        self.add(Node::new(
            ParseNodeKind::Function,
            span,
            NodeData::Function { funbox, body },
        ))
    }

    pub fn add_scope(
        &mut self,
        kind: ParseNodeKind,
        span: Span,
        bindings: Option<ScopeBindingsId>,
        body: NodeIndex,
    ) -> NodeIndex {
        self.add(Node::new(kind, span, NodeData::Scope { bindings, body }))
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Append `kid` to the list node `list`, widening its span.
    pub fn push_child(&mut self, list: NodeIndex, kid: NodeIndex) {
        let kid_span = self.get(kid).map(|node| node.span);
        if let Some(node) = self.get_mut(list) {
            if let NodeData::List(children) = &mut node.data {
                children.nodes.push(kid);
                if let Some(span) = kid_span {
                    node.span = node.span.to(span);
                }
            }
        }
    }

    pub fn set_span(&mut self, index: NodeIndex, span: Span) {
        if let Some(node) = self.get_mut(index) {
            node.span = span;
        }
    }

    pub fn set_end(&mut self, index: NodeIndex, end: u32) {
        if let Some(node) = self.get_mut(index) {
            node.span.end = end;
        }
    }

    pub fn add_flags(&mut self, index: NodeIndex, flags: NodeFlags) {
        if let Some(node) = self.get_mut(index) {
            node.flags |= flags;
        }
    }

    pub fn set_kind(&mut self, index: NodeIndex, kind: ParseNodeKind) {
        if let Some(node) = self.get_mut(index) {
            node.kind = kind;
        }
    }

    /// Overwrite the node at `index` in place, keeping its position in the
    /// tree. Used by the constant folder.
    pub fn replace(&mut self, index: NodeIndex, node: Node) {
        if let Some(slot) = self.get_mut(index) {
            *slot = node;
        }
    }

    /// Point a function node at its parsed `ParamsBody`.
    pub fn set_function_body(&mut self, function: NodeIndex, params_body: NodeIndex) {
        if let Some(node) = self.get_mut(function) {
            if let NodeData::Function { body, .. } = &mut node.data {
                *body = params_body;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_child_widens_span() {
        let mut arena = NodeArena::new();
        let list = arena.add_list(ParseNodeKind::StatementList, Span::new(0, 1));
        let kid = arena.add_nullary(ParseNodeKind::EmptyStatement, Span::new(4, 5));
        arena.push_child(list, kid);
        let node = arena.get(list).expect("list node");
        assert_eq!(node.span, Span::new(0, 5));
        assert_eq!(arena.list_children(list), &[kid]);
    }

    #[test]
    fn test_truncate_rewinds_allocation() {
        let mut arena = NodeArena::for_source_len(60);
        arena.add_nullary(ParseNodeKind::Null, Span::new(0, 4));
        let mark = arena.len();
        arena.add_nullary(ParseNodeKind::True, Span::new(5, 9));
        arena.truncate(mark);
        assert_eq!(arena.len(), 1);
        assert!(arena.get(NodeIndex(1)).is_none());
    }
}
