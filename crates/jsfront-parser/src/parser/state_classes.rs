//! Parser state - classes
//!
//! Class bodies are strict code. Members are methods (parsed as functions
//! whose kind says constructor, derived constructor, method or accessor),
//! fields whose initializers are synthesized functions, and static blocks.
//! Private names are collected per class body and resolved when the body
//! ends; unresolved uses move out to the enclosing class.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Atom, Span, atoms};
use jsfront_scanner::{LexMode, TokenKind};
use rustc_hash::FxHashMap;
use tracing::trace;

use super::node::{NodeFlags, ParseNodeKind};
use super::state::{InHandling, InvokedPrediction, Parser, TripledotHandling};
use super::state_functions::FunctionHeader;
use super::state_primary::{PropertyHead, PropertyType};
use crate::error::{PResult, ParseFailure};
use crate::function_box::{AsyncKind, FunctionSyntaxKind, GeneratorKind};
use crate::handler::ParseHandler;
use crate::scope::declaration_kind::DeclarationKind;
use crate::scope::parse_context::StatementKind;
use crate::scope::parse_scope::ScopeKind;

/// Where a class appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ClassContext {
    Statement,
    Expression,
    /// `export default class ...`: the name is optional.
    DefaultExport,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PrivateNameKind {
    Field,
    Method,
    Getter,
    Setter,
    GetterSetter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PrivateNameInfo {
    kind: PrivateNameKind,
    is_static: bool,
}

/// Private names of one class body.
#[derive(Clone, Debug, Default)]
pub(crate) struct PrivateNameScope {
    declared: FxHashMap<Atom, PrivateNameInfo>,
    /// Uses not yet matched with a declaration.
    unresolved: Vec<(Atom, Span)>,
}

impl PrivateNameScope {
    /// Record a declaration. A getter and a setter of the same staticness
    /// may share a name; anything else is a duplicate.
    fn declare(&mut self, name: Atom, kind: PrivateNameKind, is_static: bool) -> bool {
        match self.declared.get_mut(&name) {
            None => {
                self.declared.insert(name, PrivateNameInfo { kind, is_static });
                true
            }
            Some(info) => {
                let pair = matches!(
                    (info.kind, kind),
                    (PrivateNameKind::Getter, PrivateNameKind::Setter) | (PrivateNameKind::Setter, PrivateNameKind::Getter)
                );
                if pair && info.is_static == is_static {
                    info.kind = PrivateNameKind::GetterSetter;
                    true
                } else {
                    false
                }
            }
        }
    }
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    // =========================================================================
    // Private names
    // =========================================================================

    /// Record a `#name` reference; it must be declared by an enclosing
    /// class body by the time that body ends.
    pub(crate) fn note_private_name_use(&mut self, name: Atom, span: Span) -> PResult<()> {
        match self.state.private_scopes.last_mut() {
            Some(scope) => {
                scope.unresolved.push((name, span));
                Ok(())
            }
            None => {
                let text = self.resolve(name).to_string();
                self.error_at(diagnostic_codes::UNDECLARED_PRIVATE, span, &[&format!("#{text}")])
            }
        }
    }

    fn declare_private_name(&mut self, head: &PropertyHead<H::Node>, kind: PrivateNameKind, is_static: bool) -> PResult<()> {
        let Some(name) = head.name else {
            return Ok(());
        };
        if name == atoms::CONSTRUCTOR {
            return self.error_at(diagnostic_codes::BAD_CLASS_MEMBER, head.key_span, &[]);
        }
        let declared = self
            .state
            .private_scopes
            .last_mut()
            .is_some_and(|scope| scope.declare(name, kind, is_static));
        if !declared {
            let text = self.resolve(name).to_string();
            return self.error_at(diagnostic_codes::DUPLICATE_PRIVATE, head.key_span, &[&format!("#{text}")]);
        }
        Ok(())
    }

    /// Resolve the uses of the innermost class body's private names.
    fn finish_private_names(&mut self) -> PResult<()> {
        let Some(scope) = self.state.private_scopes.pop() else {
            return Ok(());
        };
        for (name, span) in scope.unresolved {
            if scope.declared.contains_key(&name) {
                continue;
            }
            match self.state.private_scopes.last_mut() {
                Some(outer) => outer.unresolved.push((name, span)),
                None => {
                    let text = self.resolve(name).to_string();
                    return self.error_at(diagnostic_codes::UNDECLARED_PRIVATE, span, &[&format!("#{text}")]);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Class definitions
    // =========================================================================

    /// `class` (already consumed) through the closing `}` of its body.
    pub(crate) fn class_definition(&mut self, context: ClassContext, start: u32) -> PResult<H::Node> {
        let was_strict = self.strict();
        self.ctx_mut().directives.strict = true;
        let result = self.class_definition_strict(context, start);
        self.ctx_mut().directives.strict = was_strict;
        result
    }

    fn class_definition_strict(&mut self, context: ClassContext, start: u32) -> PResult<H::Node> {
        let next = self.peek_token(LexMode::Operand)?;
        let name = if next.kind == TokenKind::Name {
            let token = self.get_token(LexMode::Operand)?;
            Some((self.binding_identifier(token)?, token.span))
        } else {
            match context {
                ClassContext::Statement => {
                    return self.error_at(diagnostic_codes::UNNAMED_CLASS_STMT, next.span, &[]);
                }
                ClassContext::DefaultExport => Some((atoms::STAR_DEFAULT, Span::at(next.span.start))),
                ClassContext::Expression => None,
            }
        };
        trace!(start, named = name.is_some(), "class");

        let outer_name = match (context, name) {
            (ClassContext::Expression, _) | (_, None) => self.handler.null(),
            (_, Some((name, span))) => {
                self.note_declared_name(name, DeclarationKind::Class, span)?;
                self.handler.new_name(name, span)
            }
        };

        // The class's own binding of its name, visible to the heritage and
        // the body.
        self.push_scope(ScopeKind::Lexical);
        let inner_name = match name {
            Some((name, span)) => {
                self.note_declared_name(name, DeclarationKind::Const, span)?;
                self.handler.new_name(name, span)
            }
            None => self.handler.null(),
        };
        self.ctx_mut().push_statement(StatementKind::Class, None);

        let heritage = if self.match_token(TokenKind::Extends, LexMode::Operand)? {
            self.member_expr(
                true,
                TripledotHandling::TripledotProhibited,
                None,
                InvokedPrediction::PredictUninvoked,
            )?
        } else {
            self.handler.null()
        };
        let derived = !self.handler.is_null(heritage);

        let open = self.must_match_token(TokenKind::LeftCurly, LexMode::Operand, "'{' before class body")?;
        self.state.private_scopes.push(PrivateNameScope::default());
        let members = self.class_body(open.span.start, derived)?;
        self.finish_private_names()?;

        self.ctx_mut().pop_statement();
        let bindings = self.finish_lexical_scope();
        let span = self.span_from(start);
        let body = self.handler.new_scope(ParseNodeKind::LexicalScope, span, bindings, members);
        let names = if self.handler.is_null(outer_name) && self.handler.is_null(inner_name) {
            self.handler.null()
        } else {
            self.handler
                .new_binary(ParseNodeKind::ClassNames, span, outer_name, inner_name)
        };
        Ok(self.handler.new_ternary(ParseNodeKind::Class, span, names, heritage, body))
    }

    /// Members after the `{` through the closing `}`.
    fn class_body(&mut self, start: u32, derived: bool) -> PResult<H::Node> {
        let list = self.handler.new_list(ParseNodeKind::ClassMemberList, Span::at(start));
        let mut seen_constructor = false;
        loop {
            let token = self.peek_token(LexMode::Operand)?;
            match token.kind {
                TokenKind::RightCurly => {
                    self.get_token(LexMode::Operand)?;
                    break;
                }
                TokenKind::Semi => {
                    self.get_token(LexMode::Operand)?;
                    continue;
                }
                _ => {}
            }

            let mut is_static = false;
            if token.is_contextual(atoms::STATIC) && !token.has_escape() {
                self.get_token(LexMode::Operand)?;
                let next = self.peek_token(LexMode::Operand)?;
                if next.kind == TokenKind::LeftCurly {
                    let block = self.static_block(token.span.start)?;
                    self.handler.add_list_child(list, block);
                    continue;
                }
                if matches!(
                    next.kind,
                    TokenKind::LeftParen | TokenKind::Assign | TokenKind::Semi | TokenKind::RightCurly
                ) {
                    // A member named `static`.
                    self.unget_token();
                } else {
                    is_static = true;
                }
            }

            let member = self.class_member(token.span.start, is_static, derived, &mut seen_constructor)?;
            self.handler.add_list_child(list, member);
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    fn class_member(
        &mut self,
        start: u32,
        is_static: bool,
        derived: bool,
        seen_constructor: &mut bool,
    ) -> PResult<H::Node> {
        let mut head = self.property_head(true)?;
        head.start = start;
        let plain_name = if head.computed || head.private { None } else { head.name };

        if is_static && plain_name == Some(atoms::PROTOTYPE) {
            return self.error_at(diagnostic_codes::CLASS_STATIC_PROTOTYPE, head.key_span, &[]);
        }

        if head.kind == PropertyType::Field {
            return self.class_field(&head, is_static);
        }
        if !head.kind.is_method() {
            return self.error_at(diagnostic_codes::BAD_CLASS_MEMBER, head.key_span, &[]);
        }

        let mut kind = head.kind.function_kind();
        if !is_static && plain_name == Some(atoms::CONSTRUCTOR) {
            if head.kind != PropertyType::Method {
                let what = match head.kind {
                    PropertyType::Getter => "getter",
                    PropertyType::Setter => "setter",
                    PropertyType::AsyncMethod => "async method",
                    _ => "generator",
                };
                return self.error_at(diagnostic_codes::BAD_METHOD_DEF, head.key_span, &[what]);
            }
            if *seen_constructor {
                return self.error_at(diagnostic_codes::DUPLICATE_CONSTRUCTOR, head.key_span, &[]);
            }
            *seen_constructor = true;
            kind = if derived {
                FunctionSyntaxKind::DerivedClassConstructor
            } else {
                FunctionSyntaxKind::ClassConstructor
            };
        }

        if head.private {
            let private_kind = match head.kind {
                PropertyType::Getter => PrivateNameKind::Getter,
                PropertyType::Setter => PrivateNameKind::Setter,
                _ => PrivateNameKind::Method,
            };
            self.declare_private_name(&head, private_kind, is_static)?;
        }

        let function = self.method_definition(&head, kind)?;
        let span = self.span_from(start);
        let node = self.handler.new_binary(ParseNodeKind::ClassMethod, span, head.key, function);
        let mut flags = NodeFlags::METHOD;
        if is_static {
            flags |= NodeFlags::STATIC;
        }
        match head.kind {
            PropertyType::Getter => flags |= NodeFlags::GETTER,
            PropertyType::Setter => flags |= NodeFlags::SETTER,
            _ => {}
        }
        self.handler.add_flags(node, flags);
        Ok(node)
    }

    /// Field declaration; its initializer becomes a function of its own.
    fn class_field(&mut self, head: &PropertyHead<H::Node>, is_static: bool) -> PResult<H::Node> {
        if H::SYNTAX_ONLY {
            return Err(ParseFailure::AbortSyntaxParse);
        }
        let plain_name = if head.computed || head.private { None } else { head.name };
        if plain_name == Some(atoms::CONSTRUCTOR) {
            return self.error_at(diagnostic_codes::BAD_METHOD_DEF, head.key_span, &["field"]);
        }
        if head.private {
            self.declare_private_name(head, PrivateNameKind::Field, is_static)?;
        }

        let initializer = if self.match_token(TokenKind::Assign, LexMode::Operator)? {
            let header = FunctionHeader {
                name: None,
                kind: FunctionSyntaxKind::FieldInitializer,
                generator: GeneratorKind::NotGenerator,
                async_kind: AsyncKind::SyncFunction,
                to_string_start: self.current_token().span.end,
                in_handling: InHandling::InAllowed,
            };
            self.synthesized_function(header, |parser| parser.assign_expr_no_error(InHandling::InAllowed))?
        } else {
            self.handler.null()
        };
        self.match_or_insert_semicolon()?;

        let span = self.span_from(head.start);
        let node = self.handler.new_binary(ParseNodeKind::ClassField, span, head.key, initializer);
        if is_static {
            self.handler.add_flags(node, NodeFlags::STATIC);
        }
        Ok(node)
    }

    /// `static { ... }`; `static` is consumed and `{` is next.
    fn static_block(&mut self, start: u32) -> PResult<H::Node> {
        if H::SYNTAX_ONLY {
            return Err(ParseFailure::AbortSyntaxParse);
        }
        self.get_token(LexMode::Operand)?;
        let header = FunctionHeader {
            name: None,
            kind: FunctionSyntaxKind::StaticClassBlock,
            generator: GeneratorKind::NotGenerator,
            async_kind: AsyncKind::SyncFunction,
            to_string_start: start,
            in_handling: InHandling::InAllowed,
        };
        let function = self.synthesized_function(header, |parser| {
            let body_start = parser.prev_end();
            let list = parser
                .handler
                .new_list(ParseNodeKind::StatementList, Span::at(body_start));
            parser.statement_list_items(list, &[TokenKind::RightCurly], false)?;
            parser.must_match_token(TokenKind::RightCurly, LexMode::Operand, "'}' after static block")?;
            Ok(list)
        })?;
        let span = self.span_from(start);
        let node = self.handler.new_unary(ParseNodeKind::StaticClassBlock, span, function);
        self.handler.add_flags(node, NodeFlags::STATIC);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_accessor_pair_shares_name() {
        let mut scope = PrivateNameScope::default();
        let name = Atom(900);
        assert!(scope.declare(name, PrivateNameKind::Getter, false));
        assert!(scope.declare(name, PrivateNameKind::Setter, false));
        assert!(!scope.declare(name, PrivateNameKind::Getter, false));
    }

    #[test]
    fn test_private_accessor_pair_needs_same_staticness() {
        let mut scope = PrivateNameScope::default();
        let name = Atom(901);
        assert!(scope.declare(name, PrivateNameKind::Getter, true));
        assert!(!scope.declare(name, PrivateNameKind::Setter, false));
        assert!(!scope.declare(Atom(901), PrivateNameKind::Field, true));
    }
}
