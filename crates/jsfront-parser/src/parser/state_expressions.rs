//! Parser state - expression parsing methods

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Atom, Span, atoms};
use jsfront_scanner::{LexMode, Token, TokenKind};
use smallvec::SmallVec;

use super::node::{NodeFlags, ParseNodeKind};
use super::possible_error::PossibleError;
use super::state::{InHandling, InvokedPrediction, Parser, TripledotHandling};
use crate::error::{PResult, ParseFailure};
use crate::function_box::{AsyncKind, FunctionFlags, FunctionSyntaxKind, GeneratorKind};
use crate::handler::ParseHandler;
use crate::parser::FunctionHeader;
use crate::scope::parse_context::ContextFlags;

/// Left operand and operator waiting on the binary-expression stack.
type PendingOperand<N> = (N, ParseNodeKind, u8);

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    /// Start offset of the next token.
    pub(crate) fn peek_start(&mut self) -> PResult<u32> {
        Ok(self.peek_token(LexMode::Operand)?.span.start)
    }

    // =========================================================================
    // Comma and assignment expressions
    // =========================================================================

    /// Expression with every destructuring ambiguity resolved as a plain
    /// expression.
    pub(crate) fn expr(&mut self, in_handling: InHandling) -> PResult<H::Node> {
        self.expr_with(
            in_handling,
            TripledotHandling::TripledotProhibited,
            None,
            InvokedPrediction::PredictUninvoked,
        )
    }

    pub(crate) fn expr_with(
        &mut self,
        in_handling: InHandling,
        tripledot: TripledotHandling,
        mut possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let start = self.peek_start()?;
        let first = self.assign_expr(in_handling, tripledot, possible_error.as_deref_mut(), invoked)?;
        if !self.match_token(TokenKind::Comma, LexMode::Operator)? {
            return Ok(first);
        }

        let span = self.span_from(start);
        let list = self.handler.new_list(ParseNodeKind::Comma, span);
        self.handler.add_list_child(list, first);
        loop {
            // `(a, b,) => ...`
            if tripledot == TripledotHandling::TripledotAllowed
                && self.peek_token(LexMode::Operand)?.kind == TokenKind::RightParen
            {
                self.expect_arrow_after_paren()?;
                break;
            }
            let mut inner = PossibleError::new();
            let item = self.assign_expr(
                in_handling,
                tripledot,
                Some(&mut inner),
                InvokedPrediction::PredictUninvoked,
            )?;
            match possible_error.as_deref_mut() {
                Some(outer) => inner.transfer_errors_to(outer),
                None => self.check_for_expression_error(&mut inner)?,
            }
            self.handler.add_list_child(list, item);
            if !self.match_token(TokenKind::Comma, LexMode::Operator)? {
                break;
            }
        }
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    /// The next token is a `)` only legal at the end of arrow parameters:
    /// check that `=>` follows it, consuming neither.
    pub(crate) fn expect_arrow_after_paren(&mut self) -> PResult<()> {
        let paren = self.get_token(LexMode::Operand)?;
        let next = self.peek_token(LexMode::Operator)?;
        if paren.kind != TokenKind::RightParen || next.kind != TokenKind::Arrow {
            return self.error_unexpected("expression", paren);
        }
        self.unget_token();
        Ok(())
    }

    pub(crate) fn assign_expr(
        &mut self,
        in_handling: InHandling,
        tripledot: TripledotHandling,
        possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        self.enter_recursion()?;
        let result = self.assign_expr_inner(in_handling, tripledot, possible_error, invoked);
        self.leave_recursion();
        result
    }

    /// Assignment expression that resolves its own destructuring
    /// ambiguities.
    pub(crate) fn assign_expr_no_error(&mut self, in_handling: InHandling) -> PResult<H::Node> {
        self.assign_expr(
            in_handling,
            TripledotHandling::TripledotProhibited,
            None,
            InvokedPrediction::PredictUninvoked,
        )
    }

    fn assign_expr_inner(
        &mut self,
        in_handling: InHandling,
        tripledot: TripledotHandling,
        mut possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let first = self.peek_token(LexMode::Operand)?;
        let start = first.span.start;
        if first.is_contextual(atoms::YIELD) && self.ctx().yield_is_keyword() {
            return self.yield_expr(in_handling);
        }

        // Arrow functions are only recognized at the `=>`; everything before
        // it was parsed as an expression and is parsed again as parameters.
        let checkpoint = matches!(first.kind, TokenKind::Name | TokenKind::LeftParen).then(|| self.checkpoint());

        let mut inner = PossibleError::new();
        let lhs = self.cond_expr(in_handling, tripledot, Some(&mut inner), invoked)?;

        let next = self.peek_token(LexMode::Operator)?;
        let async_arrow_param = first.is_contextual(atoms::ASYNC)
            && next.kind == TokenKind::Name
            && !next.newline_before()
            && self.handler.is_name(lhs) == Some(atoms::ASYNC)
            && !self.handler.is_parenthesized_name(lhs);
        if next.kind == TokenKind::Arrow || async_arrow_param {
            if next.kind == TokenKind::Arrow && next.newline_before() {
                return self.error_at(diagnostic_codes::LINE_BREAK_BEFORE_ARROW, next.span, &[]);
            }
            let Some(checkpoint) = checkpoint else {
                return self.error_unexpected("expression", next);
            };
            self.restore(&checkpoint);
            return self.arrow_function(in_handling);
        }

        let kind = next.kind;
        if !kind.is_assignment() {
            match possible_error {
                Some(outer) => inner.transfer_errors_to(outer),
                None => self.check_for_expression_error(&mut inner)?,
            }
            return Ok(lhs);
        }

        let target_span = Span::new(start, self.prev_end());
        let logical = matches!(
            kind,
            TokenKind::AndAssign | TokenKind::OrAssign | TokenKind::CoalesceAssign
        );
        if self.handler.is_unparenthesized_destructuring_pattern(lhs) {
            if kind != TokenKind::Assign {
                return self.error_at(diagnostic_codes::BAD_LEFTSIDE_OF_ASS, target_span, &[]);
            }
            self.check_for_destructuring_error_or_warning(&mut inner)?;
        } else if let Some(name) = self.handler.is_name(lhs) {
            if self.is_arguments_or_eval(name) {
                let text = self.resolve(name).to_string();
                self.strict_report(diagnostic_codes::BAD_STRICT_ASSIGN, target_span, &[&text])?;
            }
            self.check_for_expression_error(&mut inner)?;
        } else if self.handler.is_property_access(lhs) {
            self.check_for_expression_error(&mut inner)?;
        } else if self.handler.is_function_call(lhs) && !logical {
            // Legacy web compatibility: `f() = 1` fails only when evaluated.
            self.strict_report(diagnostic_codes::BAD_LEFTSIDE_OF_ASS, target_span, &[])?;
            if let Some(outer) = possible_error.as_deref_mut() {
                outer.set_pending_destructuring_error_at(target_span, diagnostic_codes::BAD_DESTRUCT_TARGET);
            }
            self.check_for_expression_error(&mut inner)?;
        } else {
            return self.error_at(diagnostic_codes::BAD_LEFTSIDE_OF_ASS, target_span, &[]);
        }

        self.get_token(LexMode::Operator)?;
        let rhs = self.assign_expr(
            in_handling,
            TripledotHandling::TripledotProhibited,
            None,
            InvokedPrediction::PredictUninvoked,
        )?;
        let pnk = ParseNodeKind::from_assignment_op(kind).unwrap_or(ParseNodeKind::Assign);
        let span = self.span_from(start);
        Ok(self.handler.new_binary(pnk, span, lhs, rhs))
    }

    /// Parse an arrow function from its first token (the parameters or
    /// `async`), after the cover expression was rewound.
    fn arrow_function(&mut self, in_handling: InHandling) -> PResult<H::Node> {
        let first = self.get_token(LexMode::Operand)?;
        let mut async_kind = AsyncKind::SyncFunction;
        if first.is_contextual(atoms::ASYNC) {
            let next = self.peek_token(LexMode::Operand)?;
            if !next.newline_before() && matches!(next.kind, TokenKind::Name | TokenKind::LeftParen) {
                async_kind = AsyncKind::AsyncFunction;
            }
        }
        if async_kind == AsyncKind::SyncFunction {
            self.unget_token();
        }
        let header = FunctionHeader {
            name: None,
            kind: FunctionSyntaxKind::Arrow,
            generator: GeneratorKind::NotGenerator,
            async_kind,
            to_string_start: first.span.start,
            in_handling,
        };
        self.function_definition(header, InvokedPrediction::PredictUninvoked)
    }

    fn yield_expr(&mut self, in_handling: InHandling) -> PResult<H::Node> {
        let token = self.get_token(LexMode::Operand)?;
        let start = token.span.start;
        if self.ctx().in_formal_parameters() {
            return self.error_at(diagnostic_codes::YIELD_IN_PARAMETER, token.span, &[]);
        }

        let mut kind = ParseNodeKind::Yield;
        let operand = match self.peek_token_same_line(LexMode::Operand)? {
            None => self.handler.null(),
            Some(next) => match next.kind {
                TokenKind::Eof
                | TokenKind::Semi
                | TokenKind::RightCurly
                | TokenKind::RightBracket
                | TokenKind::RightParen
                | TokenKind::Colon
                | TokenKind::Comma
                | TokenKind::In => self.handler.null(),
                _ => {
                    if next.kind == TokenKind::Mul {
                        self.get_token(LexMode::Operand)?;
                        kind = ParseNodeKind::YieldStar;
                    }
                    self.assign_expr(
                        in_handling,
                        TripledotHandling::TripledotProhibited,
                        None,
                        InvokedPrediction::PredictUninvoked,
                    )?
                }
            },
        };
        let span = self.span_from(start);
        Ok(self.handler.new_unary(kind, span, operand))
    }

    // =========================================================================
    // Conditional and binary expressions
    // =========================================================================

    fn cond_expr(
        &mut self,
        in_handling: InHandling,
        tripledot: TripledotHandling,
        mut possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let start = self.peek_start()?;
        let condition = self.or_expr(in_handling, tripledot, possible_error.as_deref_mut(), invoked)?;
        if !self.match_token(TokenKind::Hook, LexMode::Operator)? {
            return Ok(condition);
        }
        if let Some(possible_error) = possible_error {
            self.check_for_expression_error(possible_error)?;
        }
        let then_expr = self.assign_expr_no_error(InHandling::InAllowed)?;
        self.must_match_token(TokenKind::Colon, LexMode::Operator, "':' in conditional expression")?;
        let else_expr = self.assign_expr_no_error(in_handling)?;
        let span = self.span_from(start);
        Ok(self
            .handler
            .new_ternary(ParseNodeKind::Conditional, span, condition, then_expr, else_expr))
    }

    /// Binary operators by operator precedence, with an explicit stack.
    /// `**` is right-associative and rejects a unary left operand.
    fn or_expr(
        &mut self,
        in_handling: InHandling,
        tripledot: TripledotHandling,
        mut possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let mut stack: SmallVec<[PendingOperand<H::Node>; 8]> = SmallVec::new();
        let mut saw_coalesce = false;
        let mut saw_logical = false;

        let mut operand_start = self.peek_start()?;
        let mut operand = self.unary_expr(tripledot, possible_error.as_deref_mut(), invoked)?;
        loop {
            let token = self.get_token(LexMode::Operator)?;
            let op = match token.kind {
                TokenKind::In if in_handling == InHandling::InProhibited => None,
                kind => ParseNodeKind::from_binary_op(kind).zip(kind.binary_precedence()),
            };
            let Some((kind, prec)) = op else {
                self.unget_token();
                break;
            };
            if let Some(possible_error) = possible_error.take() {
                self.check_for_expression_error(possible_error)?;
            }

            if kind == ParseNodeKind::Pow && self.handler.is_unparenthesized_unary(operand) {
                let span = Span::new(operand_start, token.span.start);
                return self.error_at(diagnostic_codes::BAD_POW_LEFTSIDE, span, &[]);
            }
            match kind {
                ParseNodeKind::Coalesce => saw_coalesce = true,
                ParseNodeKind::Or | ParseNodeKind::And => saw_logical = true,
                _ => {}
            }

            while let Some(&(left, top_kind, top_prec)) = stack.last() {
                if !(top_prec > prec || (top_prec == prec && kind != ParseNodeKind::Pow)) {
                    break;
                }
                stack.pop();
                operand = self.handler.append_or_create_list(top_kind, left, operand);
            }
            // `a ?? b || c` needs parentheses; checked per unparenthesized
            // operator chain.
            if saw_coalesce && saw_logical {
                return self.error_at(diagnostic_codes::BAD_COALESCE_MIXING, token.span, &[]);
            }
            stack.push((operand, kind, prec));

            operand_start = self.peek_start()?;
            operand = self.unary_expr(
                TripledotHandling::TripledotProhibited,
                None,
                InvokedPrediction::PredictUninvoked,
            )?;
        }
        while let Some((left, kind, _)) = stack.pop() {
            operand = self.handler.append_or_create_list(kind, left, operand);
        }
        Ok(operand)
    }

    // =========================================================================
    // Unary expressions
    // =========================================================================

    pub(crate) fn unary_expr(
        &mut self,
        tripledot: TripledotHandling,
        possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        self.enter_recursion()?;
        let result = self.unary_expr_inner(tripledot, possible_error, invoked);
        self.leave_recursion();
        result
    }

    fn unary_operand(&mut self, invoked: InvokedPrediction) -> PResult<H::Node> {
        self.unary_expr(TripledotHandling::TripledotProhibited, None, invoked)
    }

    fn unary_expr_inner(
        &mut self,
        tripledot: TripledotHandling,
        possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let token = self.get_token(LexMode::Operand)?;
        let start = token.span.start;

        let simple = match token.kind {
            TokenKind::Void => Some(ParseNodeKind::Void),
            TokenKind::Not => Some(ParseNodeKind::Not),
            TokenKind::BitNot => Some(ParseNodeKind::BitNot),
            TokenKind::Add => Some(ParseNodeKind::Pos),
            TokenKind::Sub => Some(ParseNodeKind::Neg),
            _ => None,
        };
        if let Some(kind) = simple {
            // `!function(){}()` is the classic immediately-invoked idiom.
            let prediction = if kind == ParseNodeKind::Not {
                InvokedPrediction::PredictInvoked
            } else {
                InvokedPrediction::PredictUninvoked
            };
            let operand = self.unary_operand(prediction)?;
            let span = self.span_from(start);
            return Ok(self.handler.new_unary(kind, span, operand));
        }

        match token.kind {
            TokenKind::TypeOf => {
                let operand = self.unary_operand(InvokedPrediction::PredictUninvoked)?;
                let kind = if self.handler.is_name(operand).is_some() {
                    ParseNodeKind::TypeOfName
                } else {
                    ParseNodeKind::TypeOfExpr
                };
                let span = self.span_from(start);
                Ok(self.handler.new_unary(kind, span, operand))
            }
            TokenKind::Inc | TokenKind::Dec => {
                let operand_start = self.peek_start()?;
                let operand = self.member_expr(
                    true,
                    TripledotHandling::TripledotProhibited,
                    None,
                    InvokedPrediction::PredictUninvoked,
                )?;
                let operand_span = Span::new(operand_start, self.prev_end());
                self.check_increment_operand(operand, operand_span)?;
                let kind = if token.kind == TokenKind::Inc {
                    ParseNodeKind::PreIncrement
                } else {
                    ParseNodeKind::PreDecrement
                };
                let span = self.span_from(start);
                Ok(self.handler.new_unary(kind, span, operand))
            }
            TokenKind::Delete => self.delete_expr(token),
            TokenKind::Name if token.is_contextual(atoms::AWAIT) && self.ctx().await_is_keyword() => {
                self.await_expr(token)
            }
            _ => {
                self.unget_token();
                let expr = self.member_expr(true, tripledot, possible_error, invoked)?;
                let Some(next) = self.peek_token_same_line(LexMode::Operator)? else {
                    return Ok(expr);
                };
                let kind = match next.kind {
                    TokenKind::Inc => ParseNodeKind::PostIncrement,
                    TokenKind::Dec => ParseNodeKind::PostDecrement,
                    _ => return Ok(expr),
                };
                self.get_token(LexMode::Operator)?;
                self.check_increment_operand(expr, Span::new(start, next.span.start))?;
                let span = self.span_from(start);
                Ok(self.handler.new_unary(kind, span, expr))
            }
        }
    }

    fn check_increment_operand(&mut self, operand: H::Node, span: Span) -> PResult<()> {
        if let Some(name) = self.handler.is_name(operand) {
            if self.is_arguments_or_eval(name) {
                let text = self.resolve(name).to_string();
                self.strict_report(diagnostic_codes::BAD_STRICT_ASSIGN, span, &[&text])?;
            }
            return Ok(());
        }
        if self.handler.is_property_access(operand) {
            return Ok(());
        }
        if self.handler.is_function_call(operand) {
            return self.strict_report(diagnostic_codes::BAD_INCOP_OPERAND, span, &[]);
        }
        self.error_at(diagnostic_codes::BAD_INCOP_OPERAND, span, &[])
    }

    fn delete_expr(&mut self, token: Token) -> PResult<H::Node> {
        let start = token.span.start;
        let operand = self.unary_operand(InvokedPrediction::PredictUninvoked)?;
        let span = self.span_from(start);
        let kind = if self.handler.is_name(operand).is_some() {
            self.strict_report(diagnostic_codes::DEPRECATED_DELETE_OPERAND, span, &[])?;
            // The name is looked up dynamically.
            self.ctx_mut().flags |= ContextFlags::BINDINGS_ACCESSED_DYNAMICALLY;
            ParseNodeKind::DeleteName
        } else if self.handler.is_private_member(operand) {
            return self.error_at(diagnostic_codes::PRIVATE_DELETE, span, &[]);
        } else if self.handler.is_element_access(operand) {
            ParseNodeKind::DeleteElem
        } else if self.handler.is_property_access(operand) {
            ParseNodeKind::DeleteProp
        } else if self.handler.is_optional_chain(operand) {
            ParseNodeKind::DeleteOptionalChain
        } else {
            ParseNodeKind::DeleteExpr
        };
        Ok(self.handler.new_unary(kind, span, operand))
    }

    fn await_expr(&mut self, token: Token) -> PResult<H::Node> {
        if self.ctx().in_formal_parameters() {
            return self.error_at(diagnostic_codes::AWAIT_IN_PARAMETER, token.span, &[]);
        }
        let allowed = match self.current_function_box() {
            Some(id) => self.state.function_box(id).is_async(),
            None => self.ctx().is_module(),
        };
        if !allowed {
            return self.error_at(diagnostic_codes::AWAIT_OUTSIDE_ASYNC, token.span, &[]);
        }
        let operand = self.unary_operand(InvokedPrediction::PredictUninvoked)?;
        let span = self.span_from(token.span.start);
        Ok(self.handler.new_unary(ParseNodeKind::Await, span, operand))
    }

    // =========================================================================
    // Member and call expressions
    // =========================================================================

    /// Member expression with its suffixes. Calls are only parsed when
    /// `allow_call` is set: the callee of `new` stops at the first `(`.
    pub(crate) fn member_expr(
        &mut self,
        allow_call: bool,
        tripledot: TripledotHandling,
        possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        self.enter_recursion()?;
        let result = self.member_expr_inner(allow_call, tripledot, possible_error, invoked);
        self.leave_recursion();
        result
    }

    fn member_expr_inner(
        &mut self,
        allow_call: bool,
        tripledot: TripledotHandling,
        mut possible_error: Option<&mut PossibleError>,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let token = self.get_token(LexMode::Operand)?;
        let start = token.span.start;
        let mut lhs = match token.kind {
            TokenKind::New => self.new_expr(token)?,
            TokenKind::Super => self.super_base(token, allow_call)?,
            TokenKind::Import => self.import_expr(token)?,
            _ => {
                self.unget_token();
                self.primary_expr(tripledot, possible_error.as_deref_mut(), invoked)?
            }
        };

        let mut in_optional_chain = false;
        let mut callee_property: Option<Atom> = None;
        loop {
            let token = self.get_token(LexMode::Operator)?;
            let is_suffix = match token.kind {
                TokenKind::Dot
                | TokenKind::OptionalChain
                | TokenKind::LeftBracket
                | TokenKind::TemplateHead
                | TokenKind::NoSubsTemplate => true,
                TokenKind::LeftParen => allow_call,
                _ => false,
            };
            if !is_suffix {
                self.unget_token();
                break;
            }
            // Anything with a suffix is no longer a destructuring pattern.
            if let Some(possible_error) = possible_error.take() {
                self.check_for_expression_error(possible_error)?;
            }

            let is_super = self.handler.is_super_base(lhs);
            let property = match token.kind {
                TokenKind::Dot => {
                    let name = self.get_token(LexMode::Operator)?;
                    let (node, property) = self.dot_suffix(lhs, name, start, false)?;
                    lhs = node;
                    property
                }
                TokenKind::OptionalChain => {
                    if !allow_call {
                        return self.error_at(diagnostic_codes::BAD_NEW_OPTIONAL, token.span, &[]);
                    }
                    if is_super {
                        return self.error_unexpected("property access", token);
                    }
                    in_optional_chain = true;
                    let next = self.get_token(LexMode::Operand)?;
                    match next.kind {
                        TokenKind::LeftBracket => {
                            lhs = self.element_suffix(lhs, start, true, false)?;
                            None
                        }
                        TokenKind::LeftParen => {
                            lhs = self.call_suffix(lhs, start, true, false, None)?;
                            None
                        }
                        TokenKind::TemplateHead | TokenKind::NoSubsTemplate => {
                            return self.error_at(diagnostic_codes::BAD_OPTIONAL_TEMPLATE, next.span, &[]);
                        }
                        _ => {
                            let (node, property) = self.dot_suffix(lhs, next, start, true)?;
                            lhs = node;
                            property
                        }
                    }
                }
                TokenKind::LeftBracket => {
                    lhs = self.element_suffix(lhs, start, in_optional_chain, is_super)?;
                    None
                }
                TokenKind::LeftParen => {
                    lhs = self.call_suffix(lhs, start, in_optional_chain, is_super, callee_property)?;
                    None
                }
                _ => {
                    if in_optional_chain {
                        return self.error_at(diagnostic_codes::BAD_OPTIONAL_TEMPLATE, token.span, &[]);
                    }
                    self.unget_token();
                    let template = self.template_literal(true)?;
                    let span = self.span_from(start);
                    lhs = self
                        .handler
                        .new_binary(ParseNodeKind::TaggedTemplate, span, lhs, template);
                    None
                }
            };
            callee_property = property;
        }

        if in_optional_chain {
            let span = self.span_from(start);
            lhs = self.handler.new_unary(ParseNodeKind::OptionalChain, span, lhs);
        }
        Ok(lhs)
    }

    /// `lhs.name` or `lhs.#name`; `name` is the token after the dot.
    /// Returns the node and the property name when it is an identifier.
    fn dot_suffix(
        &mut self,
        lhs: H::Node,
        name: Token,
        start: u32,
        optional: bool,
    ) -> PResult<(H::Node, Option<Atom>)> {
        if name.kind == TokenKind::PrivateName {
            if self.handler.is_super_base(lhs) {
                return self.error_unexpected("property name", name);
            }
            let node = self.private_member(lhs, name, start, optional)?;
            return Ok((node, None));
        }
        let Some(atom) = name.name().filter(|_| name.kind.is_identifier_name()) else {
            return self.error_unexpected("property name", name);
        };
        if self.handler.is_super_base(lhs) {
            self.note_super_property();
        }
        let kind = if optional {
            ParseNodeKind::OptionalDot
        } else {
            ParseNodeKind::Dot
        };
        let span = self.span_from(start);
        Ok((self.handler.new_name_kid(kind, span, atom, lhs), Some(atom)))
    }

    fn private_member(&mut self, lhs: H::Node, name: Token, start: u32, optional: bool) -> PResult<H::Node> {
        if H::SYNTAX_ONLY {
            return Err(ParseFailure::AbortSyntaxParse);
        }
        let Some(atom) = name.name() else {
            return self.error_unexpected("private name", name);
        };
        self.note_private_name_use(atom, name.span)?;
        let private = self.handler.new_private_name(atom, name.span);
        let kind = if optional {
            ParseNodeKind::OptionalPrivateMember
        } else {
            ParseNodeKind::PrivateMember
        };
        let span = self.span_from(start);
        Ok(self.handler.new_binary(kind, span, lhs, private))
    }

    fn element_suffix(&mut self, lhs: H::Node, start: u32, optional: bool, is_super: bool) -> PResult<H::Node> {
        let key = self.expr(InHandling::InAllowed)?;
        self.must_match_token(TokenKind::RightBracket, LexMode::Operator, "']' in index expression")?;
        if is_super {
            self.note_super_property();
        }
        let kind = if optional {
            ParseNodeKind::OptionalElem
        } else {
            ParseNodeKind::Elem
        };
        let span = self.span_from(start);
        Ok(self.handler.new_binary(kind, span, lhs, key))
    }

    fn call_suffix(
        &mut self,
        callee: H::Node,
        start: u32,
        optional: bool,
        is_super: bool,
        callee_property: Option<Atom>,
    ) -> PResult<H::Node> {
        if self.state.options.self_hosting_mode && self.handler.is_property_access(callee) {
            let span = self.span_from(start);
            return self.error_at(diagnostic_codes::SELFHOSTED_METHOD_CALL, span, &[]);
        }
        let args = self.arguments()?;
        let kind = if is_super {
            ParseNodeKind::SuperCall
        } else if optional {
            ParseNodeKind::OptionalCall
        } else {
            if self.handler.is_name(callee) == Some(atoms::EVAL) && !self.handler.is_parenthesized_name(callee) {
                self.note_direct_eval();
            }
            ParseNodeKind::Call
        };
        if callee_property == Some(atoms::APPLY) {
            self.ctx_mut().flags |= ContextFlags::USES_APPLY;
        }
        let span = self.span_from(start);
        Ok(self.handler.new_binary(kind, span, callee, args))
    }

    /// A direct `eval` can see and create any binding of the code around it.
    fn note_direct_eval(&mut self) {
        self.ctx_mut().flags |= ContextFlags::BINDINGS_ACCESSED_DYNAMICALLY;
        self.set_function_flag(FunctionFlags::HAS_DIRECT_EVAL | FunctionFlags::BINDINGS_ACCESSED_DYNAMICALLY);
    }

    fn note_super_property(&mut self) {
        self.note_used_name(atoms::DOT_THIS);
        if let Some(id) = self.nearest_non_arrow_function() {
            self.state.function_box_mut(id).set_flag(FunctionFlags::USES_SUPER_PROPERTY);
        }
    }

    /// Arguments of a call, after its `(`.
    pub(crate) fn arguments(&mut self) -> PResult<H::Node> {
        let open = self.current_token();
        let start = open.span.start;
        let list = self.handler.new_list(ParseNodeKind::Arguments, open.span);

        if self.match_token(TokenKind::RightParen, LexMode::Operand)? {
            let span = self.span_from(start);
            self.handler.set_span(list, span);
            return Ok(list);
        }
        // `f(for (x of y) x)`
        if self.state.options.allow_comprehensions && self.peek_token(LexMode::Operand)?.kind == TokenKind::For {
            let genexp_start = self.peek_start()?;
            let genexp = self.legacy_generator_expr(genexp_start)?;
            self.handler.add_list_child(list, genexp);
            self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after argument list")?;
            let span = self.span_from(start);
            self.handler.set_span(list, span);
            return Ok(list);
        }

        loop {
            let arg_start = self.peek_start()?;
            let spread = self.match_token(TokenKind::TripleDot, LexMode::Operand)?;
            let mut arg = self.assign_expr_no_error(InHandling::InAllowed)?;
            if spread {
                let span = self.span_from(arg_start);
                arg = self.handler.new_unary(ParseNodeKind::Spread, span, arg);
            }
            self.handler.add_list_child(list, arg);
            if !self.match_token(TokenKind::Comma, LexMode::Operator)? {
                break;
            }
            if self.match_token(TokenKind::RightParen, LexMode::Operand)? {
                self.handler.add_flags(list, NodeFlags::TRAILING_COMMA);
                let span = self.span_from(start);
                self.handler.set_span(list, span);
                return Ok(list);
            }
        }
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after argument list")?;
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    // =========================================================================
    // new, super, import
    // =========================================================================

    fn new_expr(&mut self, new_token: Token) -> PResult<H::Node> {
        let start = new_token.span.start;
        if self.match_token(TokenKind::Dot, LexMode::Operator)? {
            let name = self.get_token(LexMode::Operator)?;
            if !name.is_contextual(atoms::TARGET) {
                return self.error_unexpected("'target'", name);
            }
            let span = self.span_from(start);
            if !self.has_ctx_flag(ContextFlags::ALLOW_NEW_TARGET) {
                return self.error_at(diagnostic_codes::BAD_NEWTARGET, span, &[]);
            }
            if let Some(id) = self.nearest_non_arrow_function() {
                self.state.function_box_mut(id).set_flag(FunctionFlags::USES_NEW_TARGET);
            }
            return Ok(self.handler.new_leaf(ParseNodeKind::NewTarget, span));
        }

        let callee = self.member_expr(
            false,
            TripledotHandling::TripledotProhibited,
            None,
            InvokedPrediction::PredictUninvoked,
        )?;
        let args = if self.match_token(TokenKind::LeftParen, LexMode::Operator)? {
            self.arguments()?
        } else {
            let at = Span::at(self.prev_end());
            self.handler.new_list(ParseNodeKind::Arguments, at)
        };
        let span = self.span_from(start);
        Ok(self.handler.new_binary(ParseNodeKind::New, span, callee, args))
    }

    fn super_base(&mut self, token: Token, allow_call: bool) -> PResult<H::Node> {
        let next = self.peek_token(LexMode::Operator)?;
        match next.kind {
            TokenKind::LeftParen if allow_call => {
                if !self.has_ctx_flag(ContextFlags::ALLOW_SUPER_CALL) {
                    return self.error_at(diagnostic_codes::BAD_SUPERCALL, token.span, &[]);
                }
                // `super()` initializes `this`.
                self.note_used_name(atoms::DOT_THIS);
            }
            TokenKind::Dot | TokenKind::LeftBracket => {
                if !self.has_ctx_flag(ContextFlags::ALLOW_SUPER_PROPERTY) {
                    return self.error_at(diagnostic_codes::BAD_SUPERPROP, token.span, &[]);
                }
            }
            _ => return self.error_at(diagnostic_codes::BAD_SUPERPROP, token.span, &[]),
        }
        Ok(self.handler.new_leaf(ParseNodeKind::SuperBase, token.span))
    }

    /// `import.meta` or `import(specifier)`.
    fn import_expr(&mut self, token: Token) -> PResult<H::Node> {
        let start = token.span.start;
        if self.match_token(TokenKind::Dot, LexMode::Operator)? {
            let name = self.get_token(LexMode::Operator)?;
            if !name.is_contextual(atoms::META) {
                return self.error_unexpected("'meta'", name);
            }
            let span = self.span_from(start);
            if !self.state.module_goal {
                return self.error_at(diagnostic_codes::BAD_IMPORT_META, span, &[]);
            }
            return Ok(self.handler.new_leaf(ParseNodeKind::ImportMeta, span));
        }

        self.must_match_token(TokenKind::LeftParen, LexMode::Operator, "'(' or '.' after import")?;
        let specifier = self.assign_expr_no_error(InHandling::InAllowed)?;
        let close = self.get_token(LexMode::Operator)?;
        if close.kind != TokenKind::RightParen {
            let span = self.span_from(start);
            return self.error_at(diagnostic_codes::BAD_IMPORT_CALL, span, &[]);
        }
        let span = self.span_from(start);
        Ok(self.handler.new_unary(ParseNodeKind::CallImport, span, specifier))
    }
}
