//! NodeArena access methods.
//!
//! Typed accessors return `None` when the node does not have the requested
//! payload shape, so callers can chain them with `?`.

use jsfront_common::{Atom, Span};

use super::base::NodeIndex;
use super::node::*;
use crate::function_box::FunctionBoxId;
use crate::scope::bindings::ScopeBindingsId;

impl NodeArena {
    /// Get a node by index
    #[inline]
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Get a mutable node by index
    #[inline]
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    #[inline]
    pub fn kind(&self, index: NodeIndex) -> Option<ParseNodeKind> {
        self.get(index).map(|node| node.kind)
    }

    #[inline]
    pub fn span(&self, index: NodeIndex) -> Span {
        self.get(index).map_or_else(Span::default, |node| node.span)
    }

    #[inline]
    pub fn flags(&self, index: NodeIndex) -> NodeFlags {
        self.get(index).map_or_else(NodeFlags::empty, |node| node.flags)
    }

    pub fn is_kind(&self, index: NodeIndex, kind: ParseNodeKind) -> bool {
        self.kind(index) == Some(kind)
    }

    /// Children of a list node; empty for any other shape.
    pub fn list_children(&self, index: NodeIndex) -> &[NodeIndex] {
        match self.get(index).map(|node| &node.data) {
            Some(NodeData::List(list)) => &list.nodes,
            _ => &[],
        }
    }

    pub fn get_unary(&self, index: NodeIndex) -> Option<NodeIndex> {
        match self.get(index)?.data {
            NodeData::Unary(kid) => Some(kid),
            _ => None,
        }
    }

    pub fn get_binary(&self, index: NodeIndex) -> Option<(NodeIndex, NodeIndex)> {
        match self.get(index)?.data {
            NodeData::Binary { left, right } => Some((left, right)),
            _ => None,
        }
    }

    pub fn get_ternary(&self, index: NodeIndex) -> Option<(NodeIndex, NodeIndex, NodeIndex)> {
        match self.get(index)?.data {
            NodeData::Ternary {
                first,
                second,
                third,
            } => Some((first, second, third)),
            _ => None,
        }
    }

    /// Atom of a `Name`, `PrivateName` or name-carrying node.
    pub fn get_name(&self, index: NodeIndex) -> Option<Atom> {
        match self.get(index)?.data {
            NodeData::Name(name) | NodeData::NameKid { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn get_name_kid(&self, index: NodeIndex) -> Option<(Atom, NodeIndex)> {
        match self.get(index)?.data {
            NodeData::NameKid { name, kid } => Some((name, kid)),
            _ => None,
        }
    }

    pub fn get_number(&self, index: NodeIndex) -> Option<f64> {
        match self.get(index)?.data {
            NodeData::Number(value) => Some(value),
            _ => None,
        }
    }

    /// Value of a string literal (or a no-substitution template).
    pub fn get_string(&self, index: NodeIndex) -> Option<Atom> {
        let node = self.get(index)?;
        match node.data {
            NodeData::String(value) => Some(value),
            NodeData::Template {
                cooked: Some(cooked),
                ..
            } if node.kind == ParseNodeKind::TemplateString => Some(cooked),
            _ => None,
        }
    }

    pub fn get_function(&self, index: NodeIndex) -> Option<(FunctionBoxId, NodeIndex)> {
        match self.get(index)?.data {
            NodeData::Function { funbox, body } => Some((funbox, body)),
            _ => None,
        }
    }

    pub fn get_scope(&self, index: NodeIndex) -> Option<(Option<ScopeBindingsId>, NodeIndex)> {
        match self.get(index)?.data {
            NodeData::Scope { bindings, body } => Some((bindings, body)),
            _ => None,
        }
    }

    /// Every direct child of a node, in source order.
    pub fn children(&self, index: NodeIndex) -> Vec<NodeIndex> {
        let Some(node) = self.get(index) else {
            return Vec::new();
        };
        let kids = match &node.data {
            NodeData::Unary(kid) | NodeData::NameKid { kid, .. } => vec![*kid],
            NodeData::Binary { left, right } => vec![*left, *right],
            NodeData::Ternary {
                first,
                second,
                third,
            } => vec![*first, *second, *third],
            NodeData::List(list) => list.nodes.clone(),
            NodeData::Function { body, .. } => vec![*body],
            NodeData::Scope { body, .. } => vec![*body],
            _ => Vec::new(),
        };
        kids.into_iter().filter(|kid| kid.is_some()).collect()
    }

    /// Whether `index` or any node below it has kind `kind`. Does not look
    /// inside nested functions.
    pub fn contains_kind(&self, index: NodeIndex, kind: ParseNodeKind) -> bool {
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            if node.kind == kind {
                return true;
            }
            if node.kind != ParseNodeKind::Function {
                stack.extend(self.children(current));
            }
        }
        false
    }

    /// Pre-order walk over the subtree rooted at `index`.
    pub fn walk(&self, index: NodeIndex, visit: &mut impl FnMut(NodeIndex, &Node)) {
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            visit(current, node);
            let mut kids = self.children(current);
            kids.reverse();
            stack.extend(kids);
        }
    }
}
