//! Handler for syntax-only parsing.
//!
//! No tree is built. Every "node" is a `SyntaxNode` saying just enough about
//! the expression for assignment-target, destructuring and directive checks.

use jsfront_common::{Atom, Span};

use super::{HandlerMark, ParseHandler};
use crate::function_box::FunctionBoxId;
use crate::lazy::LazyFunctionSummary;
use crate::parser::node::{NodeFlags, ParseNodeKind};
use crate::scope::bindings::ScopeBindingsId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxNode {
    Null,
    Generic,
    Name(Atom),
    ParenthesizedName(Atom),
    UnparenthesizedString,
    StringExprStatement,
    Array,
    Object,
    ParenthesizedArray,
    ParenthesizedObject,
    UnparenthesizedAssignment,
    UnparenthesizedUnary,
    UnparenthesizedComma,
    DottedProperty,
    Element,
    PrivateMember,
    OptionalChain,
    FunctionCall,
    SuperBase,
    Function,
}

#[derive(Debug, Default)]
pub struct SyntaxParseHandler {
    /// Most recent string literal, for directive detection.
    last_string: Option<(Atom, Span)>,
}

impl ParseHandler for SyntaxParseHandler {
    type Node = SyntaxNode;

    const SYNTAX_ONLY: bool = true;

    #[inline]
    fn null(&self) -> SyntaxNode {
        SyntaxNode::Null
    }

    fn new_name(&mut self, name: Atom, _span: Span) -> SyntaxNode {
        SyntaxNode::Name(name)
    }

    fn new_private_name(&mut self, _name: Atom, _span: Span) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn new_leaf(&mut self, kind: ParseNodeKind, _span: Span) -> SyntaxNode {
        match kind {
            ParseNodeKind::SuperBase => SyntaxNode::SuperBase,
            _ => SyntaxNode::Generic,
        }
    }

    fn new_number(&mut self, _value: f64, _span: Span) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn new_bigint(&mut self, _digits: Atom, _span: Span) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn new_string(&mut self, value: Atom, span: Span) -> SyntaxNode {
        self.last_string = Some((value, span));
        SyntaxNode::UnparenthesizedString
    }

    fn new_template_string(&mut self, _cooked: Option<Atom>, _raw: Atom, _span: Span) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn new_regexp(&mut self, _pattern: Atom, _flags: Atom, _span: Span) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn new_unary(&mut self, kind: ParseNodeKind, _span: Span, kid: SyntaxNode) -> SyntaxNode {
        match kind {
            ParseNodeKind::ExpressionStatement if kid == SyntaxNode::UnparenthesizedString => {
                SyntaxNode::StringExprStatement
            }
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
            | ParseNodeKind::Await => SyntaxNode::UnparenthesizedUnary,
            ParseNodeKind::OptionalChain => SyntaxNode::OptionalChain,
            _ => SyntaxNode::Generic,
        }
    }

    fn new_binary(
        &mut self,
        kind: ParseNodeKind,
        _span: Span,
        _left: SyntaxNode,
        _right: SyntaxNode,
    ) -> SyntaxNode {
        match kind {
            kind if kind.is_assignment() => SyntaxNode::UnparenthesizedAssignment,
            ParseNodeKind::Elem => SyntaxNode::Element,
            ParseNodeKind::PrivateMember => SyntaxNode::PrivateMember,
            ParseNodeKind::Call | ParseNodeKind::SuperCall => SyntaxNode::FunctionCall,
            _ => SyntaxNode::Generic,
        }
    }

    fn new_ternary(
        &mut self,
        _kind: ParseNodeKind,
        _span: Span,
        _first: SyntaxNode,
        _second: SyntaxNode,
        _third: SyntaxNode,
    ) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn new_list(&mut self, kind: ParseNodeKind, _span: Span) -> SyntaxNode {
        match kind {
            ParseNodeKind::Array => SyntaxNode::Array,
            ParseNodeKind::Object => SyntaxNode::Object,
            ParseNodeKind::Comma => SyntaxNode::UnparenthesizedComma,
            _ => SyntaxNode::Generic,
        }
    }

    fn add_list_child(&mut self, _list: SyntaxNode, _kid: SyntaxNode) {}

    fn append_or_create_list(&mut self, _kind: ParseNodeKind, _left: SyntaxNode, _right: SyntaxNode) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn new_name_kid(
        &mut self,
        kind: ParseNodeKind,
        _span: Span,
        _name: Atom,
        _kid: SyntaxNode,
    ) -> SyntaxNode {
        match kind {
            ParseNodeKind::Dot => SyntaxNode::DottedProperty,
            _ => SyntaxNode::Generic,
        }
    }

    fn new_function(&mut self, _funbox: FunctionBoxId, _span: Span) -> SyntaxNode {
        SyntaxNode::Function
    }

    fn set_function_body(&mut self, _function: SyntaxNode, _body: SyntaxNode) {}

    fn new_scope(
        &mut self,
        _kind: ParseNodeKind,
        _span: Span,
        _bindings: Option<ScopeBindingsId>,
        _body: SyntaxNode,
    ) -> SyntaxNode {
        SyntaxNode::Generic
    }

    fn set_span(&mut self, _node: SyntaxNode, _span: Span) {}

    fn add_flags(&mut self, _node: SyntaxNode, _flags: NodeFlags) {}

    fn parenthesize(&mut self, node: SyntaxNode) -> SyntaxNode {
        match node {
            SyntaxNode::Name(name) => SyntaxNode::ParenthesizedName(name),
            SyntaxNode::Array => SyntaxNode::ParenthesizedArray,
            SyntaxNode::Object => SyntaxNode::ParenthesizedObject,
            SyntaxNode::UnparenthesizedString
            | SyntaxNode::UnparenthesizedAssignment
            | SyntaxNode::UnparenthesizedUnary
            | SyntaxNode::UnparenthesizedComma => SyntaxNode::Generic,
            other => other,
        }
    }

    fn is_name(&self, node: SyntaxNode) -> Option<Atom> {
        match node {
            SyntaxNode::Name(name) | SyntaxNode::ParenthesizedName(name) => Some(name),
            _ => None,
        }
    }

    fn is_parenthesized_name(&self, node: SyntaxNode) -> bool {
        matches!(node, SyntaxNode::ParenthesizedName(_))
    }

    fn is_unparenthesized_destructuring_pattern(&self, node: SyntaxNode) -> bool {
        matches!(node, SyntaxNode::Array | SyntaxNode::Object)
    }

    fn is_parenthesized_destructuring_pattern(&self, node: SyntaxNode) -> bool {
        matches!(
            node,
            SyntaxNode::ParenthesizedArray | SyntaxNode::ParenthesizedObject
        )
    }

    fn is_property_access(&self, node: SyntaxNode) -> bool {
        matches!(
            node,
            SyntaxNode::DottedProperty | SyntaxNode::Element | SyntaxNode::PrivateMember
        )
    }

    fn is_element_access(&self, node: SyntaxNode) -> bool {
        node == SyntaxNode::Element
    }

    fn is_private_member(&self, node: SyntaxNode) -> bool {
        node == SyntaxNode::PrivateMember
    }

    fn is_optional_chain(&self, node: SyntaxNode) -> bool {
        node == SyntaxNode::OptionalChain
    }

    fn is_function_call(&self, node: SyntaxNode) -> bool {
        node == SyntaxNode::FunctionCall
    }

    fn is_unparenthesized_assignment(&self, node: SyntaxNode) -> bool {
        node == SyntaxNode::UnparenthesizedAssignment
    }

    fn is_unparenthesized_unary(&self, node: SyntaxNode) -> bool {
        node == SyntaxNode::UnparenthesizedUnary
    }

    fn is_super_base(&self, node: SyntaxNode) -> bool {
        node == SyntaxNode::SuperBase
    }

    fn is_string_expr_statement(&self, node: SyntaxNode) -> Option<(Atom, Span)> {
        if node == SyntaxNode::StringExprStatement {
            self.last_string
        } else {
            None
        }
    }

    fn can_skip_lazy_closed_over_bindings(&self) -> bool {
        false
    }

    fn next_lazy_closed_over_binding(&mut self) -> Option<Atom> {
        None
    }

    fn next_lazy_inner_function(&mut self, _start: u32) -> Option<LazyFunctionSummary> {
        None
    }

    fn mark(&self) -> HandlerMark {
        HandlerMark::default()
    }

    fn rewind(&mut self, _mark: HandlerMark) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parenthesize_classifications() {
        let mut handler = SyntaxParseHandler::default();
        let name = handler.new_name(Atom(60), Span::new(0, 1));
        assert_eq!(handler.parenthesize(name), SyntaxNode::ParenthesizedName(Atom(60)));
        let array = handler.new_list(ParseNodeKind::Array, Span::new(0, 2));
        let wrapped = handler.parenthesize(array);
        assert!(handler.is_parenthesized_destructuring_pattern(wrapped));
        assert!(!handler.is_unparenthesized_destructuring_pattern(wrapped));
        let dot = handler.new_name_kid(ParseNodeKind::Dot, Span::new(0, 3), Atom(61), name);
        let dot = handler.parenthesize(dot);
        assert!(handler.is_property_access(dot));
    }

    #[test]
    fn test_string_statement_reports_last_string() {
        let mut handler = SyntaxParseHandler::default();
        let string = handler.new_string(Atom(15), Span::new(0, 12));
        let stmt = handler.new_unary(ParseNodeKind::ExpressionStatement, Span::new(0, 13), string);
        assert_eq!(handler.is_string_expr_statement(stmt), Some((Atom(15), Span::new(0, 12))));
        let paren = handler.parenthesize(string);
        let stmt = handler.new_unary(ParseNodeKind::ExpressionStatement, Span::new(0, 15), paren);
        assert_eq!(handler.is_string_expr_statement(stmt), None);
    }
}
