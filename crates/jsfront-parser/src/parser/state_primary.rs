//! Parser state - primary expressions
//!
//! Identifiers, literals, parenthesized expressions (and the arrow-parameter
//! cover grammar they share), array and object literals, templates and the
//! legacy comprehension forms.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Atom, Span, atoms};
use jsfront_scanner::{LexMode, Token, TokenFlags, TokenKind, TokenValue};

use super::node::{NodeFlags, ParseNodeKind};
use super::possible_error::PossibleError;
use super::state::{InHandling, InvokedPrediction, Parser, TripledotHandling};
use crate::error::{PResult, ParseFailure};
use crate::function_box::{AsyncKind, FunctionFlags, FunctionSyntaxKind, GeneratorKind};
use crate::handler::ParseHandler;
use crate::parser::FunctionHeader;
use crate::parser::state_classes::ClassContext;
use crate::scope::declaration_kind::DeclarationKind;
use crate::scope::parse_context::ContextFlags;
use crate::scope::parse_scope::ScopeKind;

/// What follows a property name in an object literal or class body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PropertyType {
    /// `key: value`
    Normal,
    /// `{ name }`
    Shorthand,
    /// `{ name = value }`, only valid in a destructuring pattern.
    CoverInitializedName,
    Getter,
    Setter,
    Method,
    GeneratorMethod,
    AsyncMethod,
    AsyncGeneratorMethod,
    /// Class field.
    Field,
}

impl PropertyType {
    pub(crate) fn is_method(self) -> bool {
        matches!(
            self,
            PropertyType::Getter
                | PropertyType::Setter
                | PropertyType::Method
                | PropertyType::GeneratorMethod
                | PropertyType::AsyncMethod
                | PropertyType::AsyncGeneratorMethod
        )
    }

    pub(crate) fn generator_kind(self) -> GeneratorKind {
        match self {
            PropertyType::GeneratorMethod | PropertyType::AsyncGeneratorMethod => GeneratorKind::Generator,
            _ => GeneratorKind::NotGenerator,
        }
    }

    pub(crate) fn async_kind(self) -> AsyncKind {
        match self {
            PropertyType::AsyncMethod | PropertyType::AsyncGeneratorMethod => AsyncKind::AsyncFunction,
            _ => AsyncKind::SyncFunction,
        }
    }

    pub(crate) fn function_kind(self) -> FunctionSyntaxKind {
        match self {
            PropertyType::Getter => FunctionSyntaxKind::Getter,
            PropertyType::Setter => FunctionSyntaxKind::Setter,
            _ => FunctionSyntaxKind::Method,
        }
    }
}

/// A parsed property name and the kind of member it introduces.
#[derive(Clone, Copy, Debug)]
pub(crate) struct PropertyHead<N> {
    pub key: N,
    /// Static name of an identifier, string or private-name key.
    pub name: Option<Atom>,
    pub key_token: Token,
    pub key_span: Span,
    pub computed: bool,
    pub private: bool,
    pub kind: PropertyType,
    /// Start of the member, including `get`/`set`/`async`/`*` prefixes.
    pub start: u32,
}

/// Which legacy comprehension is being parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ComprehensionKind {
    Array,
    Generator,
}

fn is_property_name_start(kind: TokenKind) -> bool {
    kind.is_identifier_name()
        || matches!(
            kind,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::BigInt
                | TokenKind::LeftBracket
                | TokenKind::PrivateName
        )
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    pub(crate) fn primary_expr(
        &mut self,
        tripledot: TripledotHandling,
        possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let token = self.get_token(LexMode::Operand)?;
        let span = token.span;
        match token.kind {
            TokenKind::Function => self.function_expr(span.start, AsyncKind::SyncFunction, invoked),
            TokenKind::Class => self.class_definition(ClassContext::Expression, span.start),
            TokenKind::LeftBracket => self.array_literal(token, possible_error),
            TokenKind::LeftCurly => self.object_literal(token, possible_error),
            TokenKind::LeftParen => self.paren_expr(token, possible_error),
            TokenKind::TemplateHead | TokenKind::NoSubsTemplate => {
                self.unget_token();
                self.template_literal(false)
            }
            TokenKind::Name => {
                if token.is_contextual(atoms::ASYNC) {
                    let next = self.peek_token_same_line(LexMode::Operand)?;
                    if next.is_some_and(|next| next.kind == TokenKind::Function) {
                        self.get_token(LexMode::Operand)?;
                        return self.function_expr(span.start, AsyncKind::AsyncFunction, invoked);
                    }
                }
                let name = self.check_identifier(token)?;
                self.name_reference(name, span)
            }
            TokenKind::PrivateName => {
                // `#x in obj`
                if H::SYNTAX_ONLY {
                    return Err(ParseFailure::AbortSyntaxParse);
                }
                let next = self.peek_token(LexMode::Operator)?;
                let Some(name) = token.name().filter(|_| next.kind == TokenKind::In) else {
                    return self.error_unexpected("'in' after private name", next);
                };
                self.note_private_name_use(name, span)?;
                Ok(self.handler.new_private_name(name, span))
            }
            TokenKind::String => self.string_literal(token),
            TokenKind::Number => {
                if token.flags.contains(TokenFlags::LEGACY_OCTAL) {
                    self.strict_report(diagnostic_codes::DEPRECATED_OCTAL, span, &[])?;
                }
                Ok(self.handler.new_number(token.number().unwrap_or(f64::NAN), span))
            }
            TokenKind::BigInt => match token.value {
                TokenValue::BigInt(digits) => Ok(self.handler.new_bigint(digits, span)),
                _ => self.error_unexpected("expression", token),
            },
            TokenKind::RegExp => match token.value {
                TokenValue::RegExp { pattern, flags } => Ok(self.handler.new_regexp(pattern, flags, span)),
                _ => self.error_unexpected("expression", token),
            },
            TokenKind::True => Ok(self.handler.new_leaf(ParseNodeKind::True, span)),
            TokenKind::False => Ok(self.handler.new_leaf(ParseNodeKind::False, span)),
            TokenKind::Null => Ok(self.handler.new_leaf(ParseNodeKind::Null, span)),
            TokenKind::This => {
                self.note_this_use();
                Ok(self.handler.new_leaf(ParseNodeKind::This, span))
            }
            TokenKind::TripleDot if tripledot == TripledotHandling::TripledotAllowed => self.cover_rest_parameter(token),
            _ => self.error_unexpected("expression", token),
        }
    }

    // =========================================================================
    // Identifiers
    // =========================================================================

    /// Validate `token` as an identifier that is not a reserved word in the
    /// current context.
    pub(crate) fn check_identifier(&self, token: Token) -> PResult<Atom> {
        let ctx = self.ctx();
        self.check_identifier_with(
            token,
            ctx.yield_is_keyword(),
            ctx.await_is_keyword() || self.state.module_goal,
        )
    }

    /// Like `check_identifier`, with `yield`/`await` reservation given
    /// explicitly: a function expression's name follows the function's own
    /// generator and async kinds.
    pub(crate) fn check_identifier_with(
        &self,
        token: Token,
        yield_is_keyword: bool,
        await_is_keyword: bool,
    ) -> PResult<Atom> {
        let Some(name) = token.name().filter(|_| token.kind == TokenKind::Name) else {
            return self.error_unexpected("identifier", token);
        };
        let text = self.resolve(name);
        if token.has_escape() && TokenKind::keyword(text).is_some() {
            return self.error_at(diagnostic_codes::BAD_ESCAPED_KEYWORD, token.span, &[]);
        }
        let reserved = if name == atoms::YIELD {
            yield_is_keyword || self.strict()
        } else if name == atoms::AWAIT {
            await_is_keyword
        } else {
            self.strict() && TokenKind::is_strict_reserved_word(text)
        };
        if reserved {
            return self.error_at(diagnostic_codes::RESERVED_ID, token.span, &[text]);
        }
        Ok(name)
    }

    /// Identifier that a declaration binds. `eval` and `arguments` cannot
    /// be bound in strict code.
    pub(crate) fn binding_identifier(&mut self, token: Token) -> PResult<Atom> {
        let name = self.check_identifier(token)?;
        if self.is_arguments_or_eval(name) {
            let text = self.resolve(name).to_string();
            self.strict_report(diagnostic_codes::BAD_STRICT_ASSIGN, token.span, &[&text])?;
        }
        Ok(name)
    }

    /// Name node for a reference to `name`, recording the use.
    pub(crate) fn name_reference(&mut self, name: Atom, span: Span) -> PResult<H::Node> {
        if name == atoms::ARGUMENTS {
            if self.has_ctx_flag(ContextFlags::IN_CLASS_INITIALIZER) {
                return self.error_at(diagnostic_codes::BAD_ARGUMENTS_IN_INITIALIZER, span, &[]);
            }
            if let Some(id) = self.nearest_non_arrow_function() {
                self.state.function_box_mut(id).set_flag(FunctionFlags::USES_ARGUMENTS);
            }
        }
        self.note_used_name(name);
        Ok(self.handler.new_name(name, span))
    }

    pub(crate) fn note_this_use(&mut self) {
        self.note_used_name(atoms::DOT_THIS);
        if let Some(id) = self.nearest_non_arrow_function() {
            self.state.function_box_mut(id).set_flag(FunctionFlags::USES_THIS);
        }
    }

    // =========================================================================
    // Literals
    // =========================================================================

    pub(crate) fn string_literal(&mut self, token: Token) -> PResult<H::Node> {
        if token.flags.contains(TokenFlags::OCTAL_ESCAPE) {
            if self.strict() {
                return self.error_at(diagnostic_codes::DEPRECATED_OCTAL, token.span, &[]);
            }
            // A later "use strict" in the same prologue turns this into an
            // error.
            if self.state.prologue_octal.is_none() {
                self.state.prologue_octal = Some(token.span);
            }
        }
        let value = token.string_atom().unwrap_or(Atom::NONE);
        Ok(self.handler.new_string(value, token.span))
    }

    /// Template literal starting at the next token. Tagged templates keep
    /// chunks with malformed escapes (their cooked value is undefined).
    pub(crate) fn template_literal(&mut self, tagged: bool) -> PResult<H::Node> {
        let first = self.get_token(LexMode::Operand)?;
        let start = first.span.start;
        let kind = if tagged {
            ParseNodeKind::CallSiteObj
        } else {
            ParseNodeKind::TemplateStringList
        };
        let list = self.handler.new_list(kind, first.span);
        let mut chunk = first;
        loop {
            let node = self.template_chunk(chunk, tagged)?;
            self.handler.add_list_child(list, node);
            if chunk.kind == TokenKind::NoSubsTemplate {
                break;
            }
            let substitution = self.expr(InHandling::InAllowed)?;
            self.handler.add_list_child(list, substitution);
            chunk = self.get_token(LexMode::TemplateTail)?;
            if !matches!(chunk.kind, TokenKind::TemplateHead | TokenKind::NoSubsTemplate) {
                return self.error_unexpected("'}' after template substitution", chunk);
            }
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    fn template_chunk(&mut self, token: Token, tagged: bool) -> PResult<H::Node> {
        let TokenValue::Template { cooked, raw } = token.value else {
            return self.error_unexpected("template literal", token);
        };
        if cooked.is_none() && !tagged {
            return self.error_at(diagnostic_codes::MALFORMED_TEMPLATE_ESCAPE, token.span, &[]);
        }
        Ok(self.handler.new_template_string(cooked, raw, token.span))
    }

    // =========================================================================
    // Parentheses and the arrow-parameter cover grammar
    // =========================================================================

    fn paren_expr(&mut self, open: Token, possible_error: Option<&mut PossibleError>) -> PResult<H::Node> {
        let start = open.span.start;
        let next = self.peek_token(LexMode::Operand)?;
        if next.kind == TokenKind::RightParen {
            // `()` only begins arrow parameters; the arrow is reparsed.
            self.expect_arrow_after_paren()?;
            self.get_token(LexMode::Operand)?;
            let span = self.span_from(start);
            return Ok(self.handler.new_leaf(ParseNodeKind::Null, span));
        }
        if next.kind == TokenKind::For {
            let genexp = self.legacy_generator_expr(next.span.start)?;
            self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after generator expression")?;
            return Ok(self.handler.parenthesize(genexp));
        }
        let expr = self.expr_with(
            InHandling::InAllowed,
            TripledotHandling::TripledotAllowed,
            possible_error,
            InvokedPrediction::PredictInvoked,
        )?;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after expression")?;
        Ok(self.handler.parenthesize(expr))
    }

    /// `...rest` inside parentheses: legal only as the last parameter of an
    /// arrow, which is reparsed from the start.
    fn cover_rest_parameter(&mut self, tripledot: Token) -> PResult<H::Node> {
        let target = self.get_token(LexMode::Operand)?;
        let mut ignored = PossibleError::new();
        match target.kind {
            TokenKind::LeftBracket => {
                self.array_literal(target, Some(&mut ignored))?;
            }
            TokenKind::LeftCurly => {
                self.object_literal(target, Some(&mut ignored))?;
            }
            _ => {
                self.check_identifier(target)?;
            }
        }
        let close = self.peek_token(LexMode::Operator)?;
        if close.kind != TokenKind::RightParen {
            return self.error_at(diagnostic_codes::PARAMETER_AFTER_REST, close.span, &[]);
        }
        self.expect_arrow_after_paren()?;
        let span = self.span_from(tripledot.span.start);
        Ok(self.handler.new_leaf(ParseNodeKind::Null, span))
    }

    // =========================================================================
    // Array literals
    // =========================================================================

    pub(crate) fn array_literal(
        &mut self,
        open: Token,
        mut possible_error: Option<&mut PossibleError>,
    ) -> PResult<H::Node> {
        let start = open.span.start;
        if self.peek_token(LexMode::Operand)?.kind == TokenKind::For {
            return self.array_comprehension(start);
        }

        let list = self.handler.new_list(ParseNodeKind::Array, open.span);
        loop {
            let token = self.peek_token(LexMode::Operand)?;
            match token.kind {
                TokenKind::RightBracket => {
                    self.get_token(LexMode::Operand)?;
                    break;
                }
                TokenKind::Comma => {
                    self.get_token(LexMode::Operand)?;
                    let elision = self.handler.new_leaf(ParseNodeKind::Elision, token.span);
                    self.handler.add_list_child(list, elision);
                    continue;
                }
                _ => {}
            }

            let element_start = token.span.start;
            let spread = self.match_token(TokenKind::TripleDot, LexMode::Operand)?;
            let target_start = self.peek_start()?;
            let mut inner = PossibleError::new();
            let element = self.assign_expr(
                InHandling::InAllowed,
                TripledotHandling::TripledotProhibited,
                Some(&mut inner),
                InvokedPrediction::PredictUninvoked,
            )?;
            let target_span = Span::new(target_start, self.prev_end());
            if spread {
                self.check_destructuring_assignment_target(
                    element,
                    target_span,
                    &mut inner,
                    possible_error.as_deref_mut(),
                    false,
                )?;
                let span = self.span_from(element_start);
                let spread_node = self.handler.new_unary(ParseNodeKind::Spread, span, element);
                self.handler.add_list_child(list, spread_node);
            } else {
                self.check_destructuring_assignment_element(
                    element,
                    target_span,
                    &mut inner,
                    possible_error.as_deref_mut(),
                )?;
                self.handler.add_list_child(list, element);
            }

            let separator = self.get_token(LexMode::Operator)?;
            match separator.kind {
                TokenKind::Comma => {
                    // A rest element must be the last one in a pattern.
                    if spread {
                        if let Some(possible_error) = possible_error.as_deref_mut() {
                            possible_error
                                .set_pending_destructuring_error_at(separator.span, diagnostic_codes::BAD_REST_TARGET);
                        }
                    }
                    if self.peek_token(LexMode::Operand)?.kind == TokenKind::RightBracket {
                        self.handler.add_flags(list, NodeFlags::TRAILING_COMMA);
                    }
                }
                TokenKind::RightBracket => break,
                _ => return self.error_unexpected("',' or ']' after array element", separator),
            }
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    // =========================================================================
    // Object literals
    // =========================================================================

    pub(crate) fn object_literal(
        &mut self,
        open: Token,
        mut possible_error: Option<&mut PossibleError>,
    ) -> PResult<H::Node> {
        let start = open.span.start;
        let list = self.handler.new_list(ParseNodeKind::Object, open.span);
        let mut seen_proto = false;
        loop {
            let token = self.peek_token(LexMode::Operand)?;
            if token.kind == TokenKind::RightCurly {
                self.get_token(LexMode::Operand)?;
                break;
            }

            let rest = token.kind == TokenKind::TripleDot;
            if rest {
                self.get_token(LexMode::Operand)?;
                let target_start = self.peek_start()?;
                let mut inner = PossibleError::new();
                let target = self.assign_expr(
                    InHandling::InAllowed,
                    TripledotHandling::TripledotProhibited,
                    Some(&mut inner),
                    InvokedPrediction::PredictUninvoked,
                )?;
                let target_span = Span::new(target_start, self.prev_end());
                self.check_destructuring_assignment_target(
                    target,
                    target_span,
                    &mut inner,
                    possible_error.as_deref_mut(),
                    true,
                )?;
                let span = self.span_from(token.span.start);
                let spread = self.handler.new_unary(ParseNodeKind::Spread, span, target);
                self.handler.add_list_child(list, spread);
            } else {
                let member = self.object_member(possible_error.as_deref_mut(), &mut seen_proto)?;
                self.handler.add_list_child(list, member);
            }

            let separator = self.get_token(LexMode::Operator)?;
            match separator.kind {
                TokenKind::Comma => {
                    if rest {
                        if let Some(possible_error) = possible_error.as_deref_mut() {
                            possible_error
                                .set_pending_destructuring_error_at(separator.span, diagnostic_codes::BAD_REST_TARGET);
                        }
                    }
                }
                TokenKind::RightCurly => break,
                _ => return self.error_unexpected("'}' after property list", separator),
            }
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    fn object_member(
        &mut self,
        possible_error: Option<&mut PossibleError>,
        seen_proto: &mut bool,
    ) -> PResult<H::Node> {
        let head = self.property_head(false)?;
        let start = head.start;
        match head.kind {
            PropertyType::Normal => {
                self.get_token(LexMode::Operator)?;
                let value_start = self.peek_start()?;
                let mut inner = PossibleError::new();
                let value = self.assign_expr(
                    InHandling::InAllowed,
                    TripledotHandling::TripledotProhibited,
                    Some(&mut inner),
                    InvokedPrediction::PredictUninvoked,
                )?;
                let value_span = Span::new(value_start, self.prev_end());
                let is_proto = !head.computed && head.name == Some(atoms::PROTO);
                let mut possible_error = possible_error;
                self.check_destructuring_assignment_element(value, value_span, &mut inner, possible_error.as_deref_mut())?;
                let span = self.span_from(start);
                if is_proto {
                    // Duplicate `__proto__` is fine in a destructuring pattern.
                    if *seen_proto {
                        match possible_error {
                            Some(possible_error) => possible_error
                                .set_pending_expression_error_at(head.key_span, diagnostic_codes::DUPLICATE_PROTO_PROPERTY),
                            None => {
                                return self.error_at(diagnostic_codes::DUPLICATE_PROTO_PROPERTY, head.key_span, &[]);
                            }
                        }
                    }
                    *seen_proto = true;
                    return Ok(self.handler.new_unary(ParseNodeKind::MutateProto, span, value));
                }
                Ok(self
                    .handler
                    .new_binary(ParseNodeKind::PropertyDefinition, span, head.key, value))
            }
            PropertyType::Shorthand => {
                let name = self.check_identifier(head.key_token)?;
                let value = self.name_reference(name, head.key_span)?;
                if let Some(possible_error) = possible_error {
                    self.check_destructuring_assignment_name(value, head.key_span, possible_error);
                }
                let span = self.span_from(start);
                Ok(self.handler.new_binary(ParseNodeKind::Shorthand, span, head.key, value))
            }
            PropertyType::CoverInitializedName => {
                let name = self.check_identifier(head.key_token)?;
                let target = self.name_reference(name, head.key_span)?;
                self.get_token(LexMode::Operator)?;
                let init = self.assign_expr_no_error(InHandling::InAllowed)?;
                let span = self.span_from(start);
                let Some(possible_error) = possible_error else {
                    return self.error_at(diagnostic_codes::BAD_SHORTHAND_INIT, span, &[]);
                };
                possible_error.set_pending_expression_error_at(span, diagnostic_codes::BAD_SHORTHAND_INIT);
                self.check_destructuring_assignment_name(target, head.key_span, possible_error);
                let assign = self.handler.new_binary(ParseNodeKind::Assign, span, target, init);
                Ok(self.handler.new_binary(ParseNodeKind::Shorthand, span, head.key, assign))
            }
            PropertyType::Field => self.error_at(diagnostic_codes::COLON_AFTER_ID, head.key_span, &[]),
            kind => {
                let function = self.method_definition(&head, kind.function_kind())?;
                let span = self.span_from(start);
                if let Some(possible_error) = possible_error {
                    possible_error.set_pending_destructuring_error_at(span, diagnostic_codes::BAD_DESTRUCT_TARGET);
                }
                let node = self
                    .handler
                    .new_binary(ParseNodeKind::PropertyDefinition, span, head.key, function);
                let flags = match kind {
                    PropertyType::Getter => NodeFlags::GETTER,
                    PropertyType::Setter => NodeFlags::SETTER,
                    _ => NodeFlags::METHOD,
                };
                self.handler.add_flags(node, flags);
                Ok(node)
            }
        }
    }

    /// Property name with its `get`/`set`/`async`/`*` prefixes, and what
    /// kind of member follows. Shared by object literals and class bodies.
    pub(crate) fn property_head(&mut self, in_class: bool) -> PResult<PropertyHead<H::Node>> {
        let mut token = self.get_token(LexMode::Operand)?;
        let start = token.span.start;
        let mut is_async = false;
        let mut is_generator = false;
        let mut accessor = None;

        if token.is_contextual(atoms::ASYNC) {
            let next = self.peek_token_same_line(LexMode::Operand)?;
            if next.is_some_and(|next| next.kind == TokenKind::Mul || is_property_name_start(next.kind)) {
                is_async = true;
                token = self.get_token(LexMode::Operand)?;
            }
        }
        if token.kind == TokenKind::Mul {
            is_generator = true;
            token = self.get_token(LexMode::Operand)?;
        }
        if !is_async && !is_generator && (token.is_contextual(atoms::GET) || token.is_contextual(atoms::SET)) {
            let next = self.peek_token(LexMode::Operand)?;
            if is_property_name_start(next.kind) {
                accessor = Some(if token.is_contextual(atoms::GET) {
                    PropertyType::Getter
                } else {
                    PropertyType::Setter
                });
                token = self.get_token(LexMode::Operand)?;
            }
        }

        let key_token = token;
        let (key, name, computed, private) = self.property_key(token, in_class)?;
        let key_span = Span::new(key_token.span.start, self.prev_end());
        let kind = match (accessor, is_async, is_generator) {
            (Some(accessor), _, _) => accessor,
            (None, true, true) => PropertyType::AsyncGeneratorMethod,
            (None, true, false) => PropertyType::AsyncMethod,
            (None, false, true) => PropertyType::GeneratorMethod,
            (None, false, false) => {
                let next = self.peek_token(LexMode::Operator)?;
                let identifier_key = key_token.kind.is_identifier_name();
                match next.kind {
                    TokenKind::LeftParen => PropertyType::Method,
                    _ if in_class => PropertyType::Field,
                    TokenKind::Colon => PropertyType::Normal,
                    TokenKind::Comma | TokenKind::RightCurly if identifier_key => PropertyType::Shorthand,
                    TokenKind::Assign if identifier_key => PropertyType::CoverInitializedName,
                    _ => return self.error_at(diagnostic_codes::COLON_AFTER_ID, next.span, &[]),
                }
            }
        };
        Ok(PropertyHead {
            key,
            name,
            key_token,
            key_span,
            computed,
            private,
            kind,
            start,
        })
    }

    /// Returns the key node, its static name, and whether it is computed or
    /// private.
    fn property_key(&mut self, token: Token, in_class: bool) -> PResult<(H::Node, Option<Atom>, bool, bool)> {
        let span = token.span;
        match token.kind {
            TokenKind::Number => {
                let node = self.handler.new_number(token.number().unwrap_or(f64::NAN), span);
                Ok((node, None, false, false))
            }
            TokenKind::BigInt => match token.value {
                TokenValue::BigInt(digits) => Ok((self.handler.new_bigint(digits, span), None, false, false)),
                _ => self.error_at(diagnostic_codes::BAD_PROP_ID, span, &[]),
            },
            TokenKind::String => {
                let node = self.string_literal(token)?;
                Ok((node, token.string_atom(), false, false))
            }
            TokenKind::LeftBracket => {
                let expr = self.assign_expr_no_error(InHandling::InAllowed)?;
                self.must_match_token(TokenKind::RightBracket, LexMode::Operator, "']' after computed property name")?;
                let span = self.span_from(span.start);
                Ok((self.handler.new_unary(ParseNodeKind::ComputedName, span, expr), None, true, false))
            }
            TokenKind::PrivateName if in_class => {
                if H::SYNTAX_ONLY {
                    return Err(ParseFailure::AbortSyntaxParse);
                }
                let name = token.name().unwrap_or(Atom::NONE);
                Ok((self.handler.new_private_name(name, span), Some(name), false, true))
            }
            kind if kind.is_identifier_name() => {
                let name = token.name().unwrap_or(Atom::NONE);
                Ok((self.handler.new_name(name, span), Some(name), false, false))
            }
            _ => self.error_at(diagnostic_codes::BAD_PROP_ID, span, &[]),
        }
    }

    // =========================================================================
    // Function expressions
    // =========================================================================

    /// `function` (already consumed) through the end of the body.
    pub(crate) fn function_expr(
        &mut self,
        to_string_start: u32,
        async_kind: AsyncKind,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let generator = if self.match_token(TokenKind::Mul, LexMode::Operand)? {
            GeneratorKind::Generator
        } else {
            GeneratorKind::NotGenerator
        };
        let next = self.peek_token(LexMode::Operand)?;
        let name = if next.kind == TokenKind::Name {
            let token = self.get_token(LexMode::Operand)?;
            // The name of a function expression is bound inside it, so the
            // function's own kind decides whether it is reserved.
            let name = self.check_identifier_with(
                token,
                generator == GeneratorKind::Generator,
                async_kind == AsyncKind::AsyncFunction || self.state.module_goal,
            )?;
            if self.is_arguments_or_eval(name) {
                let text = self.resolve(name).to_string();
                self.strict_report(diagnostic_codes::BAD_STRICT_ASSIGN, token.span, &[&text])?;
            }
            Some(name)
        } else {
            None
        };
        let header = FunctionHeader {
            name,
            kind: FunctionSyntaxKind::Expression,
            generator,
            async_kind,
            to_string_start,
            in_handling: InHandling::InAllowed,
        };
        self.function_definition(header, invoked)
    }

    // =========================================================================
    // Legacy comprehensions
    // =========================================================================

    fn check_comprehensions_allowed(&mut self, start: u32) -> PResult<()> {
        if !self.state.options.allow_comprehensions {
            return self.error_at(diagnostic_codes::COMPREHENSIONS_DISABLED, Span::at(start), &[]);
        }
        if H::SYNTAX_ONLY {
            return Err(ParseFailure::AbortSyntaxParse);
        }
        Ok(())
    }

    /// `[for (x of xs) if (p(x)) f(x)]`; `start` is the `[`.
    fn array_comprehension(&mut self, start: u32) -> PResult<H::Node> {
        self.check_comprehensions_allowed(start)?;
        let body = self.comprehension_for(ComprehensionKind::Array)?;
        self.must_match_token(TokenKind::RightBracket, LexMode::Operator, "']' after array comprehension")?;
        let span = self.span_from(start);
        Ok(self.handler.new_unary(ParseNodeKind::ArrayComp, span, body))
    }

    /// `for (x of xs) x` inside parentheses, as a generator lambda.
    pub(crate) fn legacy_generator_expr(&mut self, start: u32) -> PResult<H::Node> {
        self.check_comprehensions_allowed(start)?;
        let function = self.comprehension_lambda(start, |parser| {
            parser.comprehension_for(ComprehensionKind::Generator)
        })?;
        let span = self.span_from(start);
        Ok(self.handler.new_unary(ParseNodeKind::GenExp, span, function))
    }

    fn comprehension_for(&mut self, kind: ComprehensionKind) -> PResult<H::Node> {
        let for_token = self.must_match_token(TokenKind::For, LexMode::Operand, "'for' in comprehension")?;
        let start = for_token.span.start;
        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' after 'for'")?;

        self.push_scope(ScopeKind::Lexical);
        let target_token = self.get_token(LexMode::Operand)?;
        let target = self.binding_target(DeclarationKind::Let, target_token)?;
        if !self.match_contextual(atoms::OF, LexMode::Operator)? {
            let token = self.get_token(LexMode::Operator)?;
            return self.error_unexpected("'of' after comprehension binding", token);
        }
        let iterable = self.assign_expr_no_error(InHandling::InAllowed)?;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after comprehension head")?;
        let head_span = self.span_from(target_token.span.start);
        let head = self
            .handler
            .new_binary(ParseNodeKind::ForOf, head_span, target.node, iterable);

        let tail = self.comprehension_tail(kind)?;
        let span = self.span_from(start);
        let node = self.handler.new_binary(ParseNodeKind::ComprehensionFor, span, head, tail);
        let bindings = self.finish_lexical_scope();
        Ok(self.handler.new_scope(ParseNodeKind::LexicalScope, span, bindings, node))
    }

    fn comprehension_tail(&mut self, kind: ComprehensionKind) -> PResult<H::Node> {
        let next = self.peek_token(LexMode::Operand)?;
        match next.kind {
            TokenKind::For => self.comprehension_for(kind),
            TokenKind::If => {
                self.get_token(LexMode::Operand)?;
                self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' after 'if'")?;
                let condition = self.expr(InHandling::InAllowed)?;
                self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after condition")?;
                let tail = self.comprehension_tail(kind)?;
                let span = self.span_from(next.span.start);
                Ok(self
                    .handler
                    .new_binary(ParseNodeKind::ComprehensionIf, span, condition, tail))
            }
            _ => {
                let body = self.assign_expr_no_error(InHandling::InAllowed)?;
                if kind == ComprehensionKind::Array {
                    return Ok(body);
                }
                let span = self.span_from(next.span.start);
                Ok(self.handler.new_unary(ParseNodeKind::Yield, span, body))
            }
        }
    }
}
