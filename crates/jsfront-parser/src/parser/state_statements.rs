//! Parser state - statement parsing methods

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Atom, Span, atoms};
use jsfront_scanner::{LexMode, Token, TokenKind};

use super::node::{NodeFlags, ParseNodeKind};
use super::possible_error::PossibleError;
use super::state::{InHandling, InvokedPrediction, Parser, TripledotHandling};
use super::state_classes::ClassContext;
use super::state_declarations::ForHeadKind;
use crate::error::PResult;
use crate::function_box::{AsyncKind, FunctionFlags, FunctionSyntaxKind};
use crate::handler::ParseHandler;
use crate::scope::declaration_kind::DeclarationKind;
use crate::scope::parse_context::{ContextFlags, StatementKind};
use crate::scope::parse_scope::ScopeKind;

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    // =========================================================================
    // Statement lists
    // =========================================================================

    /// Append statements to `list` until one of `ends` is next.
    /// `after_return` is whether the statement before them was a `return`.
    pub(crate) fn statement_list_items(
        &mut self,
        list: H::Node,
        ends: &[TokenKind],
        mut after_return: bool,
    ) -> PResult<()> {
        let mut warned_unreachable = false;
        loop {
            let next = self.peek_token(LexMode::Operand)?;
            if ends.contains(&next.kind) {
                return Ok(());
            }
            if after_return && !warned_unreachable && next.kind != TokenKind::Function {
                self.extra_warning_at(diagnostic_codes::STMT_AFTER_RETURN, next.span, &[]);
                warned_unreachable = true;
            }
            let statement = self.statement_list_item()?;
            self.handler.add_list_child(list, statement);
            after_return = next.kind == TokenKind::Return;
        }
    }

    /// A statement or a declaration.
    pub(crate) fn statement_list_item(&mut self) -> PResult<H::Node> {
        let token = self.peek_token(LexMode::Operand)?;
        let start = token.span.start;
        match token.kind {
            TokenKind::Function => {
                self.get_token(LexMode::Operand)?;
                self.function_stmt(start, AsyncKind::SyncFunction, false)
            }
            TokenKind::Class => {
                self.check_self_hosted_lexical(token, "class")?;
                self.get_token(LexMode::Operand)?;
                self.class_definition(ClassContext::Statement, start)
            }
            TokenKind::Const => {
                self.check_self_hosted_lexical(token, "const")?;
                self.get_token(LexMode::Operand)?;
                self.lexical_declaration(ParseNodeKind::ConstDecl, start)
            }
            TokenKind::Import if self.next_is_import_declaration()? => {
                if !self.at_module_top_level() {
                    return self.error_at(diagnostic_codes::IMPORT_DECL_AT_TOP_LEVEL, token.span, &[]);
                }
                self.import_declaration()
            }
            TokenKind::Export => {
                if !self.at_module_top_level() {
                    return self.error_at(diagnostic_codes::EXPORT_DECL_AT_TOP_LEVEL, token.span, &[]);
                }
                self.export_declaration()
            }
            TokenKind::Name if token.is_contextual(atoms::LET) && !token.has_escape() => {
                self.get_token(LexMode::Operand)?;
                if self.next_starts_let_declaration()? {
                    self.check_self_hosted_lexical(token, "let")?;
                    return self.lexical_declaration(ParseNodeKind::LetDecl, start);
                }
                self.unget_token();
                self.statement()
            }
            TokenKind::Name if token.is_contextual(atoms::ASYNC) && !token.has_escape() => {
                self.get_token(LexMode::Operand)?;
                let next = self.peek_token_same_line(LexMode::Operand)?;
                if next.is_some_and(|next| next.kind == TokenKind::Function) {
                    self.get_token(LexMode::Operand)?;
                    return self.function_stmt(start, AsyncKind::AsyncFunction, false);
                }
                self.unget_token();
                self.statement()
            }
            _ => self.statement(),
        }
    }

    /// After `let`: whether it starts a declaration rather than naming a
    /// variable.
    fn next_starts_let_declaration(&mut self) -> PResult<bool> {
        let next = self.peek_token(LexMode::Operand)?;
        Ok(matches!(
            next.kind,
            TokenKind::LeftBracket | TokenKind::LeftCurly | TokenKind::Name
        ))
    }

    /// `import` not followed by `(` or `.`.
    fn next_is_import_declaration(&mut self) -> PResult<bool> {
        self.get_token(LexMode::Operand)?;
        let next = self.peek_token(LexMode::Operator)?;
        self.unget_token();
        Ok(!matches!(next.kind, TokenKind::LeftParen | TokenKind::Dot))
    }

    fn at_module_top_level(&self) -> bool {
        self.ctx().is_module() && self.at_body_level()
    }

    fn check_self_hosted_lexical(&self, token: Token, what: &str) -> PResult<()> {
        if self.state.options.self_hosting_mode && !self.ctx().is_function() && self.at_body_level() {
            return self.error_at(diagnostic_codes::SELFHOSTED_TOP_LEVEL_LEXICAL, token.span, &[what]);
        }
        Ok(())
    }

    fn lexical_declaration(&mut self, kind: ParseNodeKind, start: u32) -> PResult<H::Node> {
        let (node, _) = self.declaration_list(kind, start, InHandling::InAllowed, false)?;
        self.match_or_insert_semicolon()?;
        let span = self.span_from(start);
        self.handler.set_span(node, span);
        Ok(node)
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub(crate) fn statement(&mut self) -> PResult<H::Node> {
        self.enter_recursion()?;
        let result = self.statement_inner();
        self.leave_recursion();
        result
    }

    fn statement_inner(&mut self) -> PResult<H::Node> {
        let token = self.peek_token(LexMode::Operand)?;
        let start = token.span.start;
        match token.kind {
            TokenKind::LeftCurly => {
                self.get_token(LexMode::Operand)?;
                self.block(StatementKind::Block, None)
            }
            TokenKind::Var => {
                self.get_token(LexMode::Operand)?;
                let (node, _) = self.declaration_list(ParseNodeKind::VarStmt, start, InHandling::InAllowed, false)?;
                self.match_or_insert_semicolon()?;
                let span = self.span_from(start);
                self.handler.set_span(node, span);
                Ok(node)
            }
            TokenKind::Semi => {
                self.get_token(LexMode::Operand)?;
                Ok(self.handler.new_leaf(ParseNodeKind::EmptyStatement, token.span))
            }
            TokenKind::If => self.if_statement(),
            TokenKind::Do => self.do_while_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::For => self.for_statement(),
            TokenKind::Continue => self.continue_statement(),
            TokenKind::Break => self.break_statement(),
            TokenKind::Return => self.return_statement(),
            TokenKind::With => self.with_statement(),
            TokenKind::Switch => self.switch_statement(),
            TokenKind::Throw => self.throw_statement(),
            TokenKind::Try => self.try_statement(),
            TokenKind::Debugger => {
                self.get_token(LexMode::Operand)?;
                self.set_function_flag(FunctionFlags::HAS_DEBUGGER_STATEMENT);
                self.match_or_insert_semicolon()?;
                let span = self.span_from(start);
                Ok(self.handler.new_leaf(ParseNodeKind::Debugger, span))
            }
            TokenKind::Function => {
                if self.strict() {
                    return self.error_at(diagnostic_codes::STRICT_FUNCTION_STATEMENT, token.span, &[]);
                }
                self.error_unexpected("statement", token)
            }
            TokenKind::Class => self.error_at(diagnostic_codes::LEXICAL_DECL_NOT_IN_BLOCK, token.span, &["class"]),
            TokenKind::Const => self.error_at(diagnostic_codes::LEXICAL_DECL_NOT_IN_BLOCK, token.span, &["const"]),
            TokenKind::Name => self.name_statement(token),
            _ => self.expression_statement(),
        }
    }

    /// Statement starting with an identifier: a label, a misplaced lexical
    /// declaration, or an expression.
    fn name_statement(&mut self, token: Token) -> PResult<H::Node> {
        self.get_token(LexMode::Operand)?;
        let next = self.peek_token(LexMode::Operator)?;
        if next.kind == TokenKind::Colon {
            return self.labeled_statement(token);
        }
        if !token.has_escape() {
            if token.is_contextual(atoms::LET) {
                let same_line = !next.newline_before();
                if next.kind == TokenKind::LeftBracket || (same_line && matches!(next.kind, TokenKind::Name | TokenKind::LeftCurly)) {
                    return self.error_at(diagnostic_codes::LEXICAL_DECL_NOT_IN_BLOCK, token.span, &["let"]);
                }
            } else if token.is_contextual(atoms::ASYNC) {
                let function = self.peek_token_same_line(LexMode::Operand)?;
                if function.is_some_and(|function| function.kind == TokenKind::Function) {
                    return self.error_at(diagnostic_codes::LEXICAL_DECL_NOT_IN_BLOCK, token.span, &["async function"]);
                }
            }
        }
        self.unget_token();
        self.expression_statement()
    }

    fn expression_statement(&mut self) -> PResult<H::Node> {
        let first = self.peek_token(LexMode::Operand)?;
        let start = first.span.start;
        let expr = self.expr_with(
            InHandling::InAllowed,
            TripledotHandling::TripledotProhibited,
            None,
            InvokedPrediction::PredictUninvoked,
        )?;
        if self.prev_end() == first.span.end
            && matches!(
                first.kind,
                TokenKind::Number | TokenKind::True | TokenKind::False | TokenKind::Null
            )
        {
            self.extra_warning_at(diagnostic_codes::USELESS_EXPR, first.span, &[]);
        }
        self.match_or_insert_semicolon()?;
        let span = self.span_from(start);
        Ok(self.handler.new_unary(ParseNodeKind::ExpressionStatement, span, expr))
    }

    /// Block body after its `{`, in a new lexical scope. `catch_scope` is
    /// the scope of the catch clause whose body this is.
    fn block(&mut self, kind: StatementKind, catch_scope: Option<usize>) -> PResult<H::Node> {
        let start = self.current_token().span.start;
        self.push_scope(ScopeKind::Lexical);
        if let Some(catch_scope) = catch_scope {
            self.add_catch_parameters(catch_scope);
        }
        self.ctx_mut().push_statement(kind, None);
        let list = self.handler.new_list(ParseNodeKind::StatementList, Span::at(start));
        self.statement_list_items(list, &[TokenKind::RightCurly], false)?;
        self.must_match_token(TokenKind::RightCurly, LexMode::Operand, "'}' after block")?;
        self.ctx_mut().pop_statement();
        if let Some(catch_scope) = catch_scope {
            self.remove_catch_parameters(catch_scope);
        }
        let bindings = self.finish_lexical_scope();
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(self.handler.new_scope(ParseNodeKind::LexicalScope, span, bindings, list))
    }

    /// `( expr )` of `if`, `while` and `do`-`while`.
    fn condition(&mut self) -> PResult<H::Node> {
        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' before condition")?;
        let expr = self.expr(InHandling::InAllowed)?;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after condition")?;
        if self.handler.is_unparenthesized_assignment(expr) {
            let span = self.current_token().span;
            self.extra_warning_at(diagnostic_codes::EQUAL_AS_ASSIGN, span, &[]);
        }
        Ok(expr)
    }

    fn if_statement(&mut self) -> PResult<H::Node> {
        let start = self.get_token(LexMode::Operand)?.span.start;
        let condition = self.condition()?;
        self.ctx_mut().push_statement(StatementKind::If, None);
        let consequent = self.if_body()?;
        let alternate = if self.match_token(TokenKind::Else, LexMode::Operand)? {
            self.if_body()?
        } else {
            self.handler.null()
        };
        self.ctx_mut().pop_statement();
        let span = self.span_from(start);
        Ok(self
            .handler
            .new_ternary(ParseNodeKind::If, span, condition, consequent, alternate))
    }

    /// Branch of an `if`. Sloppy code may declare a plain function there,
    /// as if it were wrapped in a block.
    fn if_body(&mut self) -> PResult<H::Node> {
        let token = self.peek_token(LexMode::Operand)?;
        if token.kind != TokenKind::Function {
            return self.statement();
        }
        if self.strict() {
            return self.error_at(diagnostic_codes::STRICT_FUNCTION_STATEMENT, token.span, &[]);
        }
        self.get_token(LexMode::Operand)?;
        if self.peek_token(LexMode::Operand)?.kind == TokenKind::Mul {
            return self.error_at(diagnostic_codes::FUNCTION_LABEL, token.span, &["generator"]);
        }
        self.push_scope(ScopeKind::Lexical);
        let function = self.function_stmt(token.span.start, AsyncKind::SyncFunction, false)?;
        let bindings = self.finish_lexical_scope();
        let span = self.span_from(token.span.start);
        let list = self.handler.new_list(ParseNodeKind::StatementList, span);
        self.handler.add_list_child(list, function);
        Ok(self.handler.new_scope(ParseNodeKind::LexicalScope, span, bindings, list))
    }

    fn do_while_statement(&mut self) -> PResult<H::Node> {
        let start = self.get_token(LexMode::Operand)?.span.start;
        self.ctx_mut().push_statement(StatementKind::DoLoop, None);
        let body = self.statement()?;
        self.ctx_mut().pop_statement();
        self.must_match_token(TokenKind::While, LexMode::Operand, "'while' after do-loop body")?;
        let condition = self.condition()?;
        // `do x; while (c) y` needs no semicolon after the `)`.
        self.match_token(TokenKind::Semi, LexMode::Operand)?;
        let span = self.span_from(start);
        Ok(self.handler.new_binary(ParseNodeKind::DoWhile, span, body, condition))
    }

    fn while_statement(&mut self) -> PResult<H::Node> {
        let start = self.get_token(LexMode::Operand)?.span.start;
        let condition = self.condition()?;
        self.ctx_mut().push_statement(StatementKind::WhileLoop, None);
        let body = self.statement()?;
        self.ctx_mut().pop_statement();
        let span = self.span_from(start);
        Ok(self.handler.new_binary(ParseNodeKind::While, span, condition, body))
    }

    // =========================================================================
    // for, for-in, for-of
    // =========================================================================

    fn for_statement(&mut self) -> PResult<H::Node> {
        let for_token = self.get_token(LexMode::Operand)?;
        let start = for_token.span.start;
        let mut is_await = false;
        let next = self.peek_token(LexMode::Operand)?;
        if next.is_contextual(atoms::AWAIT) && !next.has_escape() {
            if !self.ctx().await_is_keyword() {
                return self.error_unexpected("'('", next);
            }
            self.get_token(LexMode::Operand)?;
            is_await = true;
        }
        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' after 'for'")?;

        self.push_scope(ScopeKind::Lexical);
        let (init, head_kind, lexical) = self.for_head_init()?;

        let head = match head_kind {
            ForHeadKind::In | ForHeadKind::Of => {
                let keyword = self.get_token(LexMode::Operator)?;
                if is_await && head_kind == ForHeadKind::In {
                    return self.error_at(diagnostic_codes::FOR_AWAIT_NOT_OF, keyword.span, &[]);
                }
                let iterated = if head_kind == ForHeadKind::In {
                    self.expr(InHandling::InAllowed)?
                } else {
                    self.assign_expr_no_error(InHandling::InAllowed)?
                };
                let kind = if head_kind == ForHeadKind::In {
                    ParseNodeKind::ForIn
                } else {
                    ParseNodeKind::ForOf
                };
                let span = self.span_from(start);
                self.handler.new_binary(kind, span, init, iterated)
            }
            ForHeadKind::Classic => {
                if is_await {
                    let span = self.current_token().span;
                    return self.error_at(diagnostic_codes::FOR_AWAIT_NOT_OF, span, &[]);
                }
                self.must_match_token(TokenKind::Semi, LexMode::Operator, "';' after for-loop init")?;
                let condition = self.optional_expr(TokenKind::Semi)?;
                self.must_match_token(TokenKind::Semi, LexMode::Operator, "';' after for-loop condition")?;
                let update = self.optional_expr(TokenKind::RightParen)?;
                let span = self.span_from(start);
                self.handler
                    .new_ternary(ParseNodeKind::ForHead, span, init, condition, update)
            }
        };
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after for-loop head")?;

        let loop_kind = match head_kind {
            ForHeadKind::Classic => StatementKind::ForLoop,
            ForHeadKind::In => StatementKind::ForInLoop,
            ForHeadKind::Of => StatementKind::ForOfLoop,
        };
        self.ctx_mut().push_statement(loop_kind, None);
        let body = self.statement()?;
        self.ctx_mut().pop_statement();

        let bindings = self.finish_lexical_scope();
        let span = self.span_from(start);
        let node = self.handler.new_binary(ParseNodeKind::For, span, head, body);
        if is_await {
            self.handler.add_flags(node, NodeFlags::AWAIT);
        }
        if lexical {
            return Ok(self.handler.new_scope(ParseNodeKind::LexicalScope, span, bindings, node));
        }
        Ok(node)
    }

    /// Expression up to `end`, or nothing if `end` is next.
    fn optional_expr(&mut self, end: TokenKind) -> PResult<H::Node> {
        if self.peek_token(LexMode::Operand)?.kind == end {
            return Ok(self.handler.null());
        }
        self.expr(InHandling::InAllowed)
    }

    /// The part of a `for` head before `;`, `in` or `of`. Returns whether it
    /// declared lexical bindings.
    fn for_head_init(&mut self) -> PResult<(H::Node, ForHeadKind, bool)> {
        let token = self.peek_token(LexMode::Operand)?;
        let start = token.span.start;
        match token.kind {
            TokenKind::Semi => return Ok((self.handler.null(), ForHeadKind::Classic, false)),
            TokenKind::Var => {
                self.get_token(LexMode::Operand)?;
                let (node, kind) = self.declaration_list(ParseNodeKind::VarStmt, start, InHandling::InProhibited, true)?;
                return Ok((node, kind, false));
            }
            TokenKind::Const => {
                self.get_token(LexMode::Operand)?;
                let (node, kind) = self.declaration_list(ParseNodeKind::ConstDecl, start, InHandling::InProhibited, true)?;
                return Ok((node, kind, true));
            }
            TokenKind::Name if token.is_contextual(atoms::LET) && !token.has_escape() => {
                self.get_token(LexMode::Operand)?;
                if self.next_starts_let_declaration()? {
                    let (node, kind) = self.declaration_list(ParseNodeKind::LetDecl, start, InHandling::InProhibited, true)?;
                    return Ok((node, kind, true));
                }
                self.unget_token();
            }
            _ => {}
        }

        let starts_with_let = token.is_contextual(atoms::LET) && !token.has_escape();
        let mut possible_error = PossibleError::new();
        let init = self.expr_with(
            InHandling::InProhibited,
            TripledotHandling::TripledotProhibited,
            Some(&mut possible_error),
            InvokedPrediction::PredictUninvoked,
        )?;
        let next = self.peek_token(LexMode::Operator)?;
        let head_kind = if next.kind == TokenKind::In {
            ForHeadKind::In
        } else if next.is_contextual(atoms::OF) {
            ForHeadKind::Of
        } else {
            self.check_for_expression_error(&mut possible_error)?;
            return Ok((init, ForHeadKind::Classic, false));
        };

        let span = self.span_from(start);
        if head_kind == ForHeadKind::Of && starts_with_let {
            return self.error_at(diagnostic_codes::LET_STARTING_FOROF, span, &[]);
        }
        self.check_for_head_target(init, span, &mut possible_error)?;
        Ok((init, head_kind, false))
    }

    /// The expression before `in`/`of` is assigned to on every iteration.
    fn check_for_head_target(&mut self, target: H::Node, span: Span, possible_error: &mut PossibleError) -> PResult<()> {
        if self.handler.is_unparenthesized_destructuring_pattern(target) {
            return self.check_for_destructuring_error_or_warning(possible_error);
        }
        if let Some(name) = self.handler.is_name(target) {
            if self.is_arguments_or_eval(name) {
                let text = self.resolve(name).to_string();
                self.strict_report(diagnostic_codes::BAD_STRICT_ASSIGN, span, &[&text])?;
            }
            return self.check_for_expression_error(possible_error);
        }
        if self.handler.is_property_access(target) {
            return self.check_for_expression_error(possible_error);
        }
        if self.handler.is_function_call(target) {
            self.strict_report(diagnostic_codes::BAD_FOR_LEFTSIDE, span, &[])?;
            return self.check_for_expression_error(possible_error);
        }
        self.error_at(diagnostic_codes::BAD_FOR_LEFTSIDE, span, &[])
    }

    // =========================================================================
    // Jumps
    // =========================================================================

    /// Label after `break`/`continue`, on the same line.
    fn jump_label(&mut self) -> PResult<Option<(Atom, Token)>> {
        match self.peek_token_same_line(LexMode::Operand)? {
            Some(token) if token.kind == TokenKind::Name => {
                self.get_token(LexMode::Operand)?;
                let name = self.check_identifier(token)?;
                Ok(Some((name, token)))
            }
            _ => Ok(None),
        }
    }

    fn continue_statement(&mut self) -> PResult<H::Node> {
        let keyword = self.get_token(LexMode::Operand)?;
        let label = self.jump_label()?;
        match label {
            Some((name, token)) => {
                if !self.ctx().has_label(name) {
                    return self.error_at(diagnostic_codes::LABEL_NOT_FOUND, token.span, &[]);
                }
                if !self.ctx().label_denotes_loop(name) {
                    let text = self.resolve(name).to_string();
                    return self.error_at(diagnostic_codes::BAD_CONTINUE_LABEL, token.span, &[&text]);
                }
            }
            None if !self.ctx().in_loop() => {
                return self.error_at(diagnostic_codes::BAD_CONTINUE, keyword.span, &[]);
            }
            None => {}
        }
        self.match_or_insert_semicolon()?;
        let span = self.span_from(keyword.span.start);
        let name = label.map_or(Atom::NONE, |(name, _)| name);
        let null = self.handler.null();
        Ok(self.handler.new_name_kid(ParseNodeKind::Continue, span, name, null))
    }

    fn break_statement(&mut self) -> PResult<H::Node> {
        let keyword = self.get_token(LexMode::Operand)?;
        let label = self.jump_label()?;
        match label {
            Some((name, token)) if !self.ctx().has_label(name) => {
                return self.error_at(diagnostic_codes::LABEL_NOT_FOUND, token.span, &[]);
            }
            None if !self.ctx().in_breakable() => {
                return self.error_at(diagnostic_codes::BAD_BREAK, keyword.span, &[]);
            }
            _ => {}
        }
        self.match_or_insert_semicolon()?;
        let span = self.span_from(keyword.span.start);
        let name = label.map_or(Atom::NONE, |(name, _)| name);
        let null = self.handler.null();
        Ok(self.handler.new_name_kid(ParseNodeKind::Break, span, name, null))
    }

    fn return_statement(&mut self) -> PResult<H::Node> {
        let keyword = self.get_token(LexMode::Operand)?;
        let in_function_body = self.ctx().is_function()
            && self.current_function_box().is_some_and(|id| {
                !matches!(
                    self.state.function_box(id).kind,
                    FunctionSyntaxKind::FieldInitializer | FunctionSyntaxKind::StaticClassBlock
                )
            });
        if !in_function_body {
            return self.error_at(diagnostic_codes::BAD_RETURN, keyword.span, &[]);
        }
        self.ctx_mut().flags |= ContextFlags::USES_RETURN;

        let value = match self.peek_token_same_line(LexMode::Operand)? {
            Some(next) if !matches!(next.kind, TokenKind::Semi | TokenKind::RightCurly | TokenKind::Eof) => {
                self.expr(InHandling::InAllowed)?
            }
            _ => self.handler.null(),
        };
        self.match_or_insert_semicolon()?;
        let span = self.span_from(keyword.span.start);
        Ok(self.handler.new_unary(ParseNodeKind::Return, span, value))
    }

    fn throw_statement(&mut self) -> PResult<H::Node> {
        let keyword = self.get_token(LexMode::Operand)?;
        if self.peek_token_same_line(LexMode::Operand)?.is_none() {
            return self.error_at(diagnostic_codes::NEWLINE_AFTER_THROW, keyword.span, &[]);
        }
        let value = self.expr(InHandling::InAllowed)?;
        self.match_or_insert_semicolon()?;
        let span = self.span_from(keyword.span.start);
        Ok(self.handler.new_unary(ParseNodeKind::Throw, span, value))
    }

    // =========================================================================
    // with, switch, try, labels
    // =========================================================================

    fn with_statement(&mut self) -> PResult<H::Node> {
        let keyword = self.get_token(LexMode::Operand)?;
        if self.strict() {
            return self.error_at(diagnostic_codes::STRICT_CODE_WITH, keyword.span, &[]);
        }
        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' after 'with'")?;
        let object = self.expr(InHandling::InAllowed)?;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after 'with' object")?;
        self.ctx_mut().push_statement(StatementKind::With, None);
        let body = self.statement()?;
        self.ctx_mut().pop_statement();

        self.ctx_mut().flags |= ContextFlags::BINDINGS_ACCESSED_DYNAMICALLY;
        self.set_function_flag(FunctionFlags::BINDINGS_ACCESSED_DYNAMICALLY);
        let span = self.span_from(keyword.span.start);
        Ok(self.handler.new_binary(ParseNodeKind::With, span, object, body))
    }

    fn switch_statement(&mut self) -> PResult<H::Node> {
        let start = self.get_token(LexMode::Operand)?.span.start;
        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' after 'switch'")?;
        let discriminant = self.expr(InHandling::InAllowed)?;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after switch discriminant")?;
        let open = self.must_match_token(TokenKind::LeftCurly, LexMode::Operand, "'{' before switch body")?;

        self.push_scope(ScopeKind::Lexical);
        self.ctx_mut().push_statement(StatementKind::Switch, None);
        let cases = self.handler.new_list(ParseNodeKind::StatementList, open.span);
        let mut seen_default = false;
        loop {
            let token = self.get_token(LexMode::Operand)?;
            let test = match token.kind {
                TokenKind::RightCurly => break,
                TokenKind::Case => self.expr(InHandling::InAllowed)?,
                TokenKind::Default => {
                    if seen_default {
                        return self.error_at(diagnostic_codes::TOO_MANY_DEFAULTS, token.span, &[]);
                    }
                    seen_default = true;
                    self.handler.null()
                }
                _ => return self.error_unexpected("'case', 'default' or '}' in switch body", token),
            };
            self.must_match_token(TokenKind::Colon, LexMode::Operator, "':' after case label")?;
            let body_start = self.prev_end();
            let body = self.handler.new_list(ParseNodeKind::StatementList, Span::at(body_start));
            self.statement_list_items(
                body,
                &[TokenKind::Case, TokenKind::Default, TokenKind::RightCurly],
                false,
            )?;
            let body_span = self.span_from(body_start);
            self.handler.set_span(body, body_span);
            let span = self.span_from(token.span.start);
            let case = self.handler.new_binary(ParseNodeKind::Case, span, test, body);
            self.handler.add_list_child(cases, case);
        }
        self.ctx_mut().pop_statement();
        let bindings = self.finish_lexical_scope();

        let body_span = self.span_from(open.span.start);
        self.handler.set_span(cases, body_span);
        let scope = self
            .handler
            .new_scope(ParseNodeKind::LexicalScope, body_span, bindings, cases);
        let span = self.span_from(start);
        Ok(self.handler.new_binary(ParseNodeKind::Switch, span, discriminant, scope))
    }

    fn try_statement(&mut self) -> PResult<H::Node> {
        let start = self.get_token(LexMode::Operand)?.span.start;
        self.must_match_token(TokenKind::LeftCurly, LexMode::Operand, "'{' before try block")?;
        let block = self.block(StatementKind::Try, None)?;

        let catch = if self.match_token(TokenKind::Catch, LexMode::Operand)? {
            self.catch_clause()?
        } else {
            self.handler.null()
        };
        let finally = if self.match_token(TokenKind::Finally, LexMode::Operand)? {
            self.must_match_token(TokenKind::LeftCurly, LexMode::Operand, "'{' before finally block")?;
            self.block(StatementKind::Finally, None)?
        } else {
            self.handler.null()
        };
        if self.handler.is_null(catch) && self.handler.is_null(finally) {
            let next = self.peek_token(LexMode::Operand)?;
            return self.error_at(diagnostic_codes::CATCH_OR_FINALLY, next.span, &[]);
        }
        let span = self.span_from(start);
        Ok(self.handler.new_ternary(ParseNodeKind::Try, span, block, catch, finally))
    }

    /// `catch` (already consumed) with an optional parameter.
    fn catch_clause(&mut self) -> PResult<H::Node> {
        let start = self.current_token().span.start;
        if self.match_token(TokenKind::LeftCurly, LexMode::Operand)? {
            let body = self.block(StatementKind::Catch, None)?;
            let span = self.span_from(start);
            let null = self.handler.null();
            return Ok(self.handler.new_binary(ParseNodeKind::Catch, span, null, body));
        }

        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' after 'catch'")?;
        let catch_scope = self.push_scope(ScopeKind::Lexical);
        let token = self.get_token(LexMode::Operand)?;
        let kind = match token.kind {
            TokenKind::LeftBracket | TokenKind::LeftCurly => DeclarationKind::CatchParameter,
            _ => DeclarationKind::SimpleCatchParameter,
        };
        let param = self.binding_target(kind, token)?.node;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after catch parameter")?;
        self.must_match_token(TokenKind::LeftCurly, LexMode::Operand, "'{' before catch block")?;
        let body = self.block(StatementKind::Catch, Some(catch_scope))?;
        let bindings = self.finish_lexical_scope();
        let span = self.span_from(start);
        let catch = self.handler.new_binary(ParseNodeKind::Catch, span, param, body);
        Ok(self.handler.new_scope(ParseNodeKind::LexicalScope, span, bindings, catch))
    }

    /// `label:` (label token already consumed) and its body.
    fn labeled_statement(&mut self, label_token: Token) -> PResult<H::Node> {
        let start = label_token.span.start;
        let label = self.check_identifier(label_token)?;
        if self.ctx().has_label(label) {
            return self.error_at(diagnostic_codes::DUPLICATE_LABEL, label_token.span, &[]);
        }
        self.get_token(LexMode::Operator)?;

        self.ctx_mut().push_statement(StatementKind::Label, Some(label));
        let next = self.peek_token(LexMode::Operand)?;
        let body = if next.kind == TokenKind::Function {
            if self.strict() {
                return self.error_at(diagnostic_codes::FUNCTION_LABEL, next.span, &["function"]);
            }
            self.get_token(LexMode::Operand)?;
            if self.peek_token(LexMode::Operand)?.kind == TokenKind::Mul {
                return self.error_at(diagnostic_codes::FUNCTION_LABEL, next.span, &["generator"]);
            }
            self.function_stmt(next.span.start, AsyncKind::SyncFunction, false)?
        } else {
            self.statement()?
        };
        self.ctx_mut().pop_statement();

        let span = self.span_from(start);
        Ok(self.handler.new_name_kid(ParseNodeKind::Label, span, label, body))
    }
}
