//! Parser state - declarations and binding patterns
//!
//! `var`, `let` and `const` declarator lists, and the binding patterns
//! shared by declarations, parameters and catch clauses.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Span, atoms};
use jsfront_scanner::{LexMode, Token, TokenKind};

use super::node::ParseNodeKind;
use super::state::{InHandling, Parser};
use super::state_primary::PropertyType;
use crate::error::PResult;
use crate::handler::ParseHandler;
use crate::scope::declaration_kind::DeclarationKind;

/// A parsed binding target.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BindingTarget<N> {
    pub node: N,
    /// The pattern contains default values or computed keys, which are
    /// evaluated code.
    pub has_exprs: bool,
}

/// What the head of a `for` statement turned out to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ForHeadKind {
    /// `for (init; cond; update)`, or not in a `for` head at all.
    Classic,
    In,
    Of,
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    // =========================================================================
    // Declarator lists
    // =========================================================================

    /// Declarators following `var`, `let` or `const`. `kind` is the list's
    /// node kind. In a `for` head the list stops after a first declarator
    /// followed by `in` or `of`.
    pub(crate) fn declaration_list(
        &mut self,
        kind: ParseNodeKind,
        start: u32,
        in_handling: InHandling,
        for_head: bool,
    ) -> PResult<(H::Node, ForHeadKind)> {
        let declaration = match kind {
            ParseNodeKind::VarStmt => DeclarationKind::Var,
            ParseNodeKind::ConstDecl => DeclarationKind::Const,
            _ => DeclarationKind::Let,
        };
        let list = self.handler.new_list(kind, Span::at(start));
        let mut first = true;
        loop {
            let (declarator, head) = self.declarator(kind, declaration, in_handling, for_head && first)?;
            self.handler.add_list_child(list, declarator);
            if head != ForHeadKind::Classic {
                let span = self.span_from(start);
                self.handler.set_span(list, span);
                return Ok((list, head));
            }
            first = false;
            if !self.match_token(TokenKind::Comma, LexMode::Operator)? {
                break;
            }
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok((list, ForHeadKind::Classic))
    }

    fn declarator(
        &mut self,
        list_kind: ParseNodeKind,
        declaration: DeclarationKind,
        in_handling: InHandling,
        first_in_for_head: bool,
    ) -> PResult<(H::Node, ForHeadKind)> {
        let token = self.get_token(LexMode::Operand)?;
        let start = token.span.start;
        let is_pattern = matches!(token.kind, TokenKind::LeftBracket | TokenKind::LeftCurly);
        let target = if is_pattern {
            self.binding_pattern(declaration, token)?.node
        } else {
            let name = self.binding_identifier(token)?;
            let mut kind = declaration;
            // `catch (e) { for (var e of xs); }` is an error, unlike the
            // other var redeclarations of a catch parameter.
            if first_in_for_head
                && declaration == DeclarationKind::Var
                && self.peek_token(LexMode::Operator)?.is_contextual(atoms::OF)
            {
                kind = DeclarationKind::ForOfVar;
            }
            self.note_declared_name(name, kind, token.span)?;
            self.handler.new_name(name, token.span)
        };

        if first_in_for_head {
            let next = self.peek_token(LexMode::Operator)?;
            if next.kind == TokenKind::In {
                return Ok((target, ForHeadKind::In));
            }
            if next.is_contextual(atoms::OF) {
                return Ok((target, ForHeadKind::Of));
            }
        }

        let assign = self.peek_token(LexMode::Operator)?;
        if assign.kind == TokenKind::Assign {
            self.get_token(LexMode::Operator)?;
            let init = self.assign_expr_no_error(in_handling)?;
            let span = self.span_from(start);
            let node = self.handler.new_binary(ParseNodeKind::Assign, span, target, init);
            if first_in_for_head {
                let next = self.peek_token(LexMode::Operator)?;
                if next.kind == TokenKind::In {
                    // Sloppy `for (var x = init in obj)` survives for web
                    // compatibility.
                    if list_kind == ParseNodeKind::VarStmt && !is_pattern && !self.strict() {
                        return Ok((node, ForHeadKind::In));
                    }
                    return self.error_at(diagnostic_codes::FOR_IN_DECL_INIT, span, &["in"]);
                }
                if next.is_contextual(atoms::OF) {
                    return self.error_at(diagnostic_codes::FOR_IN_DECL_INIT, span, &["of"]);
                }
            }
            return Ok((node, ForHeadKind::Classic));
        }

        if declaration == DeclarationKind::Const {
            return self.error_at(diagnostic_codes::BAD_CONST_DECL, assign.span, &[]);
        }
        if is_pattern {
            return self.error_at(diagnostic_codes::BAD_DESTRUCT_DECL, assign.span, &[]);
        }
        Ok((target, ForHeadKind::Classic))
    }

    // =========================================================================
    // Binding targets
    // =========================================================================

    /// Identifier or pattern starting at `token`, declared as `kind`.
    pub(crate) fn binding_target(&mut self, kind: DeclarationKind, token: Token) -> PResult<BindingTarget<H::Node>> {
        match token.kind {
            TokenKind::LeftBracket | TokenKind::LeftCurly => self.binding_pattern(kind, token),
            _ => Ok(BindingTarget {
                node: self.bound_name(kind, token)?,
                has_exprs: false,
            }),
        }
    }

    fn bound_name(&mut self, kind: DeclarationKind, token: Token) -> PResult<H::Node> {
        let name = self.binding_identifier(token)?;
        self.note_declared_name(name, kind, token.span)?;
        Ok(self.handler.new_name(name, token.span))
    }

    /// Array or object binding pattern; `open` is its `[` or `{`.
    pub(crate) fn binding_pattern(&mut self, kind: DeclarationKind, open: Token) -> PResult<BindingTarget<H::Node>> {
        self.enter_recursion()?;
        let result = if open.kind == TokenKind::LeftBracket {
            self.array_binding_pattern(kind, open)
        } else {
            self.object_binding_pattern(kind, open)
        };
        self.leave_recursion();
        result
    }

    fn array_binding_pattern(&mut self, kind: DeclarationKind, open: Token) -> PResult<BindingTarget<H::Node>> {
        let start = open.span.start;
        let list = self.handler.new_list(ParseNodeKind::Array, open.span);
        let mut has_exprs = false;
        loop {
            let token = self.get_token(LexMode::Operand)?;
            match token.kind {
                TokenKind::RightBracket => break,
                TokenKind::Comma => {
                    let elision = self.handler.new_leaf(ParseNodeKind::Elision, token.span);
                    self.handler.add_list_child(list, elision);
                    continue;
                }
                TokenKind::TripleDot => {
                    let target_token = self.get_token(LexMode::Operand)?;
                    let target = self.binding_target(kind, target_token)?;
                    has_exprs |= target.has_exprs;
                    let span = self.span_from(token.span.start);
                    let rest = self.handler.new_unary(ParseNodeKind::Spread, span, target.node);
                    self.handler.add_list_child(list, rest);
                    let close = self.get_token(LexMode::Operator)?;
                    if close.kind != TokenKind::RightBracket {
                        return self.error_at(diagnostic_codes::BAD_REST_TARGET, close.span, &[]);
                    }
                    break;
                }
                _ => {
                    let element = self.binding_element(kind, token)?;
                    has_exprs |= element.has_exprs;
                    self.handler.add_list_child(list, element.node);
                    let separator = self.get_token(LexMode::Operator)?;
                    match separator.kind {
                        TokenKind::Comma => {}
                        TokenKind::RightBracket => break,
                        _ => return self.error_unexpected("',' or ']' in array pattern", separator),
                    }
                }
            }
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(BindingTarget { node: list, has_exprs })
    }

    fn object_binding_pattern(&mut self, kind: DeclarationKind, open: Token) -> PResult<BindingTarget<H::Node>> {
        let start = open.span.start;
        let list = self.handler.new_list(ParseNodeKind::Object, open.span);
        let mut has_exprs = false;
        loop {
            let token = self.peek_token(LexMode::Operand)?;
            if token.kind == TokenKind::RightCurly {
                self.get_token(LexMode::Operand)?;
                break;
            }
            if token.kind == TokenKind::TripleDot {
                self.get_token(LexMode::Operand)?;
                let name_token = self.get_token(LexMode::Operand)?;
                let name = self.bound_name(kind, name_token)?;
                let span = self.span_from(token.span.start);
                let rest = self.handler.new_unary(ParseNodeKind::Spread, span, name);
                self.handler.add_list_child(list, rest);
                let close = self.get_token(LexMode::Operator)?;
                if close.kind != TokenKind::RightCurly {
                    return self.error_at(diagnostic_codes::BAD_REST_TARGET, close.span, &[]);
                }
                break;
            }

            let head = self.property_head(false)?;
            has_exprs |= head.computed;
            let property = match head.kind {
                PropertyType::Normal => {
                    self.get_token(LexMode::Operator)?;
                    let value_token = self.get_token(LexMode::Operand)?;
                    let value = self.binding_element(kind, value_token)?;
                    has_exprs |= value.has_exprs;
                    let span = self.span_from(head.start);
                    self.handler
                        .new_binary(ParseNodeKind::PropertyDefinition, span, head.key, value.node)
                }
                PropertyType::Shorthand => {
                    let name = self.bound_name(kind, head.key_token)?;
                    let span = self.span_from(head.start);
                    self.handler.new_binary(ParseNodeKind::Shorthand, span, head.key, name)
                }
                PropertyType::CoverInitializedName => {
                    let name = self.bound_name(kind, head.key_token)?;
                    self.get_token(LexMode::Operator)?;
                    let init = self.assign_expr_no_error(InHandling::InAllowed)?;
                    has_exprs = true;
                    let span = self.span_from(head.start);
                    let assign = self.handler.new_binary(ParseNodeKind::Assign, span, name, init);
                    self.handler.new_binary(ParseNodeKind::Shorthand, span, head.key, assign)
                }
                _ => {
                    let span = self.span_from(head.start);
                    return self.error_at(diagnostic_codes::BAD_DESTRUCT_TARGET, span, &[]);
                }
            };
            self.handler.add_list_child(list, property);

            let separator = self.get_token(LexMode::Operator)?;
            match separator.kind {
                TokenKind::Comma => {}
                TokenKind::RightCurly => break,
                _ => return self.error_unexpected("',' or '}' in object pattern", separator),
            }
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(BindingTarget { node: list, has_exprs })
    }

    /// Target with an optional default value.
    fn binding_element(&mut self, kind: DeclarationKind, token: Token) -> PResult<BindingTarget<H::Node>> {
        let start = token.span.start;
        let target = self.binding_target(kind, token)?;
        if !self.match_token(TokenKind::Assign, LexMode::Operator)? {
            return Ok(target);
        }
        let init = self.assign_expr_no_error(InHandling::InAllowed)?;
        let span = self.span_from(start);
        Ok(BindingTarget {
            node: self.handler.new_binary(ParseNodeKind::Assign, span, target.node, init),
            has_exprs: true,
        })
    }
}
