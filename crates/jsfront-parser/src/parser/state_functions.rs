//! Parser state - function definitions
//!
//! Every function form goes through `function_definition`. It skips a
//! function summarized by an earlier syntax parse, tries a syntax-only parse
//! of inner functions when that is likely to pay off, and starts the function
//! over when its directive prologue changes how it must be parsed.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::limits::MAX_DIRECTIVE_REPARSES;
use jsfront_common::{Atom, Diagnostic, Span, atoms};
use jsfront_scanner::{LexMode, TokenKind};
use tracing::{debug, trace};

use super::node::{NodeFlags, ParseNodeKind};
use super::state::{InHandling, InvokedPrediction, Parser};
use super::state_primary::PropertyHead;
use crate::asm::AsmJsOutcome;
use crate::error::{PResult, ParseFailure};
use crate::function_box::{AsyncKind, FunctionBox, FunctionBoxId, FunctionFlags, FunctionSyntaxKind, GeneratorKind};
use crate::handler::{ParseHandler, SyntaxParseHandler};
use crate::lazy::{EnclosingFlags, LazyFunctionSummary};
use crate::scope::declaration_kind::DeclarationKind;
use crate::scope::parse_context::{ContextFlags, ContextKind, Directives, ParseContext};
use crate::scope::parse_scope::ScopeKind;

/// Everything known about a function before its parameters are parsed.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FunctionHeader {
    pub name: Option<Atom>,
    pub kind: FunctionSyntaxKind,
    pub generator: GeneratorKind,
    pub async_kind: AsyncKind,
    /// Start of `function`, `async`, the method name or arrow parameters.
    pub to_string_start: u32,
    /// Whether `in` is an operator in an arrow's concise body.
    pub in_handling: InHandling,
}

impl FunctionHeader {
    pub(crate) fn from_summary(summary: &LazyFunctionSummary) -> Self {
        FunctionHeader {
            name: summary.name,
            kind: summary.kind,
            generator: summary.generator_kind,
            async_kind: summary.async_kind,
            to_string_start: summary.extent.to_string_start,
            in_handling: InHandling::InAllowed,
        }
    }
}

/// Facts collected while parsing a parameter list.
#[derive(Clone, Copy, Debug, Default)]
struct FormalsInfo {
    count: u32,
    length: u32,
    simple: bool,
    has_rest: bool,
    has_exprs: bool,
    duplicate: Option<Span>,
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse a function from its parameters to the end of its body.
    pub(crate) fn function_definition(
        &mut self,
        header: FunctionHeader,
        invoked: InvokedPrediction,
    ) -> PResult<H::Node> {
        let start = self.peek_start()?;
        if let Some(summary) = self.handler.next_lazy_inner_function(start) {
            return Ok(self.skip_lazy_inner_function(&header, summary));
        }

        let mut directives = Directives::new(self.strict());
        let mut reparses = 0;
        loop {
            let checkpoint = self.checkpoint();
            let next_directives = match self.try_function(&header, directives, invoked) {
                Ok((funbox, node)) => match self.check_asm_js(funbox) {
                    None => return Ok(node),
                    Some(next) => next,
                },
                Err(ParseFailure::Reparse) => match self.state.pending_directives.take() {
                    Some(next) => next,
                    None => return Err(ParseFailure::Reparse),
                },
                Err(failure) => return Err(failure),
            };
            reparses += 1;
            if reparses > MAX_DIRECTIVE_REPARSES {
                return self.error_at(diagnostic_codes::OVER_RECURSED, Span::at(start), &[]);
            }
            debug!(start, strict = next_directives.strict, "reparsing function with new directives");
            self.restore(&checkpoint);
            directives = next_directives;
        }
    }

    /// `function` (already consumed) in statement position.
    pub(crate) fn function_stmt(
        &mut self,
        to_string_start: u32,
        async_kind: AsyncKind,
        default_export: bool,
    ) -> PResult<H::Node> {
        let generator = if self.match_token(TokenKind::Mul, LexMode::Operand)? {
            GeneratorKind::Generator
        } else {
            GeneratorKind::NotGenerator
        };

        let next = self.peek_token(LexMode::Operand)?;
        let (name, name_span) = if next.kind == TokenKind::Name {
            let token = self.get_token(LexMode::Operand)?;
            (self.binding_identifier(token)?, token.span)
        } else if default_export {
            (atoms::STAR_DEFAULT, Span::at(next.span.start))
        } else {
            return self.error_at(diagnostic_codes::UNNAMED_FUNCTION_STMT, next.span, &[]);
        };

        let is_sync = generator == GeneratorKind::NotGenerator && async_kind == AsyncKind::SyncFunction;
        let declaration = if self.at_body_level() {
            if self.ctx().is_module() {
                DeclarationKind::ModuleBodyLevelFunction
            } else {
                DeclarationKind::BodyLevelFunction
            }
        } else if self.strict() || !is_sync {
            DeclarationKind::LexicalFunction
        } else {
            DeclarationKind::SloppyLexicalFunction
        };
        self.note_declared_name(name, declaration, name_span)?;

        let funbox = FunctionBoxId(self.state.function_boxes.len() as u32);
        let header = FunctionHeader {
            name: Some(name),
            kind: FunctionSyntaxKind::Statement,
            generator,
            async_kind,
            to_string_start,
            in_handling: InHandling::InAllowed,
        };
        let node = self.function_definition(header, InvokedPrediction::PredictUninvoked)?;
        match declaration {
            DeclarationKind::SloppyLexicalFunction => self.add_possible_annex_b_function(funbox),
            DeclarationKind::BodyLevelFunction | DeclarationKind::ModuleBodyLevelFunction => {
                self.handler.add_flags(node, NodeFlags::HOISTED);
            }
            _ => {}
        }
        Ok(node)
    }

    /// Object literal or class method whose name `head` describes.
    pub(crate) fn method_definition(
        &mut self,
        head: &PropertyHead<H::Node>,
        kind: FunctionSyntaxKind,
    ) -> PResult<H::Node> {
        let header = FunctionHeader {
            name: head.name,
            kind,
            generator: head.kind.generator_kind(),
            async_kind: head.kind.async_kind(),
            to_string_start: head.start,
            in_handling: InHandling::InAllowed,
        };
        self.function_definition(header, InvokedPrediction::PredictUninvoked)
    }

    /// A function with no parameter list whose body `body` parses: class
    /// field initializers, static blocks and comprehension lambdas.
    pub(crate) fn synthesized_function(
        &mut self,
        header: FunctionHeader,
        body: impl FnOnce(&mut Self) -> PResult<H::Node>,
    ) -> PResult<H::Node> {
        let start = self.peek_start()?;
        let funbox = self.new_function_box(&header, start);
        let directives = Directives::new(self.strict());
        self.enter_function(funbox, &header, directives)?;
        let body = body(self)?;
        let end = self.prev_end();
        self.leave_function(funbox, end)?;
        let span = Span::new(header.to_string_start, end);
        let node = self.handler.new_function(funbox, span);
        self.handler.set_function_body(node, body);
        Ok(node)
    }

    pub(crate) fn comprehension_lambda(
        &mut self,
        start: u32,
        body: impl FnOnce(&mut Self) -> PResult<H::Node>,
    ) -> PResult<H::Node> {
        let header = FunctionHeader {
            name: None,
            kind: FunctionSyntaxKind::ComprehensionLambda,
            generator: GeneratorKind::Generator,
            async_kind: AsyncKind::SyncFunction,
            to_string_start: start,
            in_handling: InHandling::InAllowed,
        };
        self.synthesized_function(header, body)
    }

    // =========================================================================
    // Lazy parsing
    // =========================================================================

    fn should_try_syntax_parse(&self, header: &FunctionHeader, invoked: InvokedPrediction) -> bool {
        let options = &self.state.options;
        options.lazy_inner_functions
            && !options.self_hosting_mode
            && invoked == InvokedPrediction::PredictUninvoked
            && !self.state.delazify_pending
            && !header.kind.is_constructor()
            && !matches!(
                header.kind,
                FunctionSyntaxKind::FieldInitializer
                    | FunctionSyntaxKind::StaticClassBlock
                    | FunctionSyntaxKind::ComprehensionLambda
            )
    }

    fn try_function(
        &mut self,
        header: &FunctionHeader,
        directives: Directives,
        invoked: InvokedPrediction,
    ) -> PResult<(FunctionBoxId, H::Node)> {
        if !H::SYNTAX_ONLY && self.should_try_syntax_parse(header, invoked) {
            let checkpoint = self.checkpoint();
            match self.syntax_parse_inner_function(header, directives) {
                Ok(result) => return Ok(result),
                Err(ParseFailure::AbortSyntaxParse) => {
                    debug!(start = header.to_string_start, "syntax parse aborted, parsing fully");
                    self.restore(&checkpoint);
                }
                Err(failure) => return Err(failure),
            }
        }
        self.inner_function(header, directives)
    }

    /// Parse the function with a syntax-only parser sharing this parser's
    /// state, keeping only its summary.
    fn syntax_parse_inner_function(
        &mut self,
        header: &FunctionHeader,
        directives: Directives,
    ) -> PResult<(FunctionBoxId, H::Node)> {
        let (funbox, _) = {
            let mut syntax = Parser::new(&mut *self.state, SyntaxParseHandler::default());
            syntax.inner_function(header, directives)?
        };
        // The syntax parser left the summary with the enclosing context.
        let Some(summary) = self.ctx_mut().inner_functions.pop() else {
            return Err(ParseFailure::AbortSyntaxParse);
        };
        let span = summary.extent.span();
        let index = self.state.summaries.len();
        self.state.summaries.push(summary);
        let fb = self.state.function_box_mut(funbox);
        fb.lazy_summary = Some(index);
        fb.set_flag(FunctionFlags::IS_LAZY);
        trace!(funbox = funbox.0, "function syntax parsed");

        let node = self.handler.new_function(funbox, span);
        self.handler.add_flags(node, NodeFlags::LAZY);
        Ok((funbox, node))
    }

    /// Jump over a function an earlier syntax parse summarized, replaying
    /// its free names so enclosing bindings still see the uses.
    fn skip_lazy_inner_function(&mut self, header: &FunctionHeader, summary: LazyFunctionSummary) -> H::Node {
        let funbox = self.new_function_box(header, summary.extent.start);
        {
            let fb = self.state.function_box_mut(funbox);
            fb.flags = summary.flags | FunctionFlags::IS_LAZY;
            fb.length = summary.length;
            fb.extent = summary.extent;
        }

        let script_id = self.state.used_names.next_script_id();
        let scope_id = self.state.used_names.next_scope_id();
        for &name in &summary.free_names {
            self.state.used_names.note_use(name, script_id, scope_id);
            self.ctx_mut().note_free_name(name);
        }
        self.propagate_transitive_flags(summary.flags);

        trace!(start = summary.extent.start, end = summary.extent.end, "skipping lazy function");
        self.state.ts.advance_to(summary.extent.end);

        let span = summary.extent.span();
        let index = self.state.summaries.len();
        self.state.summaries.push(summary);
        self.state.function_box_mut(funbox).lazy_summary = Some(index);

        let node = self.handler.new_function(funbox, span);
        self.handler.add_flags(node, NodeFlags::LAZY);
        node
    }

    /// Run the asm.js validator over a function that opted in. Returns the
    /// directives to reparse it with when validation failed.
    fn check_asm_js(&mut self, funbox: FunctionBoxId) -> Option<Directives> {
        let state = &mut *self.state;
        let fb = &state.function_boxes[funbox.0 as usize];
        if !fb.has_flag(FunctionFlags::USE_ASM) {
            return None;
        }
        let span = Span::new(fb.extent.start, fb.extent.end);
        let body = state.ts.text(span);
        match state.asm_validator.validate(fb, body, span) {
            AsmJsOutcome::Valid => None,
            AsmJsOutcome::Invalid(message) => {
                debug!(start = span.start, %message, "asm.js validation failed");
                state.deferred_warnings.push(Diagnostic::warning(
                    diagnostic_codes::USE_ASM_TYPE_FAIL,
                    span.start,
                    span.len(),
                    &[&message],
                ));
                Some(Directives {
                    strict: fb.strict(),
                    asm_js: true,
                })
            }
        }
    }

    // =========================================================================
    // Function contexts
    // =========================================================================

    fn new_function_box(&mut self, header: &FunctionHeader, start: u32) -> FunctionBoxId {
        let id = FunctionBoxId(self.state.function_boxes.len() as u32);
        let enclosing = self.state.contexts.last().and_then(|ctx| ctx.function_box);
        let mut funbox = FunctionBox::new(
            id,
            header.name,
            header.kind,
            header.generator,
            header.async_kind,
            enclosing,
            header.to_string_start,
        );
        funbox.extent.start = start;
        self.state.function_boxes.push(funbox);
        id
    }

    /// Push the context and scopes of a function.
    fn enter_function(&mut self, funbox: FunctionBoxId, header: &FunctionHeader, directives: Directives) -> PResult<()> {
        let outer = self.ctx().flags;
        let kind = header.kind;
        let mut flags = ContextFlags::empty();
        if kind.is_arrow() || kind == FunctionSyntaxKind::ComprehensionLambda {
            flags |= outer
                & (ContextFlags::ALLOW_NEW_TARGET
                    | ContextFlags::ALLOW_SUPER_PROPERTY
                    | ContextFlags::ALLOW_SUPER_CALL
                    | ContextFlags::ALLOW_ARGUMENTS
                    | ContextFlags::IN_CLASS_INITIALIZER);
            // Arrow parameters see the enclosing `yield` and `await`; the
            // body drops `yield` again once the parameters are done.
            if kind.is_arrow() {
                flags |= outer & (ContextFlags::YIELD_IS_KEYWORD | ContextFlags::AWAIT_IS_KEYWORD);
            }
        } else {
            flags |= ContextFlags::ALLOW_NEW_TARGET;
            if kind.is_method_like() {
                flags |= ContextFlags::ALLOW_SUPER_PROPERTY;
            }
            if kind == FunctionSyntaxKind::DerivedClassConstructor {
                flags |= ContextFlags::ALLOW_SUPER_CALL;
            }
            if matches!(kind, FunctionSyntaxKind::FieldInitializer | FunctionSyntaxKind::StaticClassBlock) {
                flags |= ContextFlags::IN_CLASS_INITIALIZER;
            } else {
                flags |= ContextFlags::ALLOW_ARGUMENTS;
            }
        }
        if header.generator == GeneratorKind::Generator {
            flags |= ContextFlags::YIELD_IS_KEYWORD;
        }
        if header.async_kind == AsyncKind::AsyncFunction || self.state.module_goal {
            flags |= ContextFlags::AWAIT_IS_KEYWORD;
        }
        if std::mem::take(&mut self.state.delazify_pending) {
            flags |= ContextFlags::DELAZIFYING;
        }

        if directives.strict {
            self.state.function_box_mut(funbox).set_flag(FunctionFlags::STRICT);
        }
        let script_id = self.state.used_names.next_script_id();
        let scope_base = self.state.scopes.len();
        self.state.contexts.push(ParseContext::new(
            ContextKind::Function,
            script_id,
            Some(funbox),
            directives,
            flags,
            scope_base,
        ));
        trace!(funbox = funbox.0, ?kind, script_id, "enter function");

        if kind == FunctionSyntaxKind::Expression {
            if let Some(name) = header.name {
                let scope = self.push_scope(ScopeKind::NamedLambda);
                self.state.scopes[scope].add_declared_name(name, DeclarationKind::Const, header.to_string_start);
                self.ctx_mut().named_lambda_scope = Some(scope);
            }
        }
        let function_scope = self.push_scope(ScopeKind::Function);
        let ctx = self.ctx_mut();
        ctx.function_scope = Some(function_scope);
        ctx.var_scope = function_scope;
        Ok(())
    }

    /// Close the function whose context is innermost and pop that context.
    fn leave_function(&mut self, funbox: FunctionBoxId, end: u32) -> PResult<()> {
        let (strict, ctx_flags, script_id) = {
            let ctx = self.ctx();
            (ctx.strict(), ctx.flags, ctx.script_id)
        };
        {
            let fb = self.state.function_box_mut(funbox);
            fb.extent.end = end;
            fb.extent.to_string_end = end;
            if strict {
                fb.set_flag(FunctionFlags::STRICT);
            }
            if ctx_flags.contains(ContextFlags::BINDINGS_ACCESSED_DYNAMICALLY) {
                fb.set_flag(FunctionFlags::BINDINGS_ACCESSED_DYNAMICALLY);
            }
            let wrapper = FunctionFlags::USES_ARGUMENTS | FunctionFlags::USES_THIS;
            if ctx_flags.contains(ContextFlags::USES_APPLY)
                && !ctx_flags.contains(ContextFlags::USES_RETURN)
                && fb.flags.contains(wrapper)
            {
                fb.set_flag(FunctionFlags::IS_LIKELY_CONSTRUCTOR_WRAPPER);
            }
        }
        if strict {
            self.check_strict_function_name(funbox)?;
        }

        self.declare_function_specials(funbox);
        self.finish_function_scopes(funbox);

        let free_names: Vec<Atom> = self
            .ctx()
            .free_names
            .iter()
            .copied()
            .filter(|name| self.state.used_names.is_used_in_script(*name, script_id))
            .collect();

        let summary = if H::SYNTAX_ONLY {
            Some(self.build_summary(funbox, free_names.clone()))
        } else {
            None
        };

        self.state.contexts.pop();
        trace!(funbox = funbox.0, free = free_names.len(), "leave function");

        let outer = self.ctx_mut();
        for name in free_names {
            outer.note_free_name(name);
        }
        if let Some(summary) = summary {
            outer.inner_functions.push(summary);
        }
        let flags = self.state.function_box(funbox).flags;
        self.propagate_transitive_flags(flags);
        Ok(())
    }

    /// Flags a nested function passes on to the function or script around
    /// it.
    fn propagate_transitive_flags(&mut self, flags: FunctionFlags) {
        let transitive = flags & FunctionFlags::TRANSITIVE;
        if transitive.is_empty() {
            return;
        }
        match self.current_function_box() {
            Some(outer) => self.state.function_box_mut(outer).set_flag(transitive),
            None => {
                if transitive.intersects(FunctionFlags::HAS_DIRECT_EVAL | FunctionFlags::BINDINGS_ACCESSED_DYNAMICALLY) {
                    self.ctx_mut().flags |= ContextFlags::BINDINGS_ACCESSED_DYNAMICALLY;
                }
            }
        }
    }

    /// Summary of the function whose context is innermost, taking the
    /// closed-over names and inner summaries the syntax parse collected.
    fn build_summary(&mut self, funbox: FunctionBoxId, free_names: Vec<Atom>) -> LazyFunctionSummary {
        let mut enclosing = EnclosingFlags::empty();
        if let Some(outer) = self.state.contexts.iter().rev().nth(1) {
            let pairs = [
                (ContextFlags::ALLOW_NEW_TARGET, EnclosingFlags::ALLOW_NEW_TARGET),
                (ContextFlags::ALLOW_SUPER_PROPERTY, EnclosingFlags::ALLOW_SUPER_PROPERTY),
                (ContextFlags::ALLOW_SUPER_CALL, EnclosingFlags::ALLOW_SUPER_CALL),
                (ContextFlags::ALLOW_ARGUMENTS, EnclosingFlags::ALLOW_ARGUMENTS),
                (ContextFlags::YIELD_IS_KEYWORD, EnclosingFlags::YIELD_IS_KEYWORD),
                (ContextFlags::AWAIT_IS_KEYWORD, EnclosingFlags::AWAIT_IS_KEYWORD),
            ];
            for (context_flag, enclosing_flag) in pairs {
                if outer.has(context_flag) {
                    enclosing |= enclosing_flag;
                }
            }
        }
        if self.state.module_goal {
            enclosing |= EnclosingFlags::IN_MODULE;
        }
        let fb = self.state.function_box(funbox);
        let (name, kind, generator_kind, async_kind, extent, flags, length) = (
            fb.name,
            fb.kind,
            fb.generator_kind,
            fb.async_kind,
            fb.extent,
            fb.flags,
            fb.length,
        );
        let ctx = self.ctx_mut();
        LazyFunctionSummary {
            name,
            kind,
            generator_kind,
            async_kind,
            extent,
            flags,
            enclosing,
            length,
            closed_over_bindings: std::mem::take(&mut ctx.closed_over_bindings_for_lazy),
            free_names,
            inner_functions: std::mem::take(&mut ctx.inner_functions),
        }
    }

    /// A function that turned out strict cannot be named `eval`,
    /// `arguments` or a strict reserved word.
    fn check_strict_function_name(&self, funbox: FunctionBoxId) -> PResult<()> {
        let fb = self.state.function_box(funbox);
        let Some(name) = fb.name else {
            return Ok(());
        };
        if !matches!(fb.kind, FunctionSyntaxKind::Statement | FunctionSyntaxKind::Expression) {
            return Ok(());
        }
        let span = Span::at(fb.extent.to_string_start);
        let text = self.resolve(name);
        if self.is_arguments_or_eval(name) {
            return self.error_at(diagnostic_codes::BAD_STRICT_ASSIGN, span, &[text]);
        }
        if TokenKind::is_strict_reserved_word(text) {
            return self.error_at(diagnostic_codes::RESERVED_ID, span, &[text]);
        }
        Ok(())
    }

    // =========================================================================
    // Parameters and body
    // =========================================================================

    /// Parse the function in full, from parameters to the end of the body.
    fn inner_function(&mut self, header: &FunctionHeader, directives: Directives) -> PResult<(FunctionBoxId, H::Node)> {
        let start = self.peek_start()?;
        let funbox = self.new_function_box(header, start);
        self.enter_function(funbox, header, directives)?;
        let body = self.function_formals_and_body(funbox, header)?;
        let end = self.prev_end();
        self.leave_function(funbox, end)?;
        let span = Span::new(header.to_string_start, end);
        let node = self.handler.new_function(funbox, span);
        self.handler.set_function_body(node, body);
        Ok((funbox, node))
    }

    /// `ParamsBody` list: each parameter, then the body.
    fn function_formals_and_body(&mut self, funbox: FunctionBoxId, header: &FunctionHeader) -> PResult<H::Node> {
        let start = self.peek_start()?;
        let list = self.handler.new_list(ParseNodeKind::ParamsBody, Span::at(start));

        self.ctx_mut().flags |= ContextFlags::IN_FORMAL_PARAMETERS;
        let info = self.function_formals(list, header)?;
        let ctx = self.ctx_mut();
        ctx.flags.remove(ContextFlags::IN_FORMAL_PARAMETERS);
        if header.kind.is_arrow() {
            ctx.flags.remove(ContextFlags::YIELD_IS_KEYWORD);
        }
        self.record_formals(funbox, header, &info)?;

        if info.has_exprs {
            let body_scope = self.push_scope(ScopeKind::FunctionBodyVar);
            self.ctx_mut().var_scope = body_scope;
        }

        let body = if header.kind.is_arrow() {
            self.arrow_body(header)?
        } else {
            self.must_match_token(TokenKind::LeftCurly, LexMode::Operand, "'{' before function body")?;
            self.function_body()?
        };
        self.handler.add_list_child(list, body);
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    /// Statements of a function body through the closing `}`.
    pub(crate) fn function_body(&mut self) -> PResult<H::Node> {
        let body = self.statement_list_with_directives(TokenKind::RightCurly)?;
        self.must_match_token(TokenKind::RightCurly, LexMode::Operand, "'}' after function body")?;
        Ok(body)
    }

    fn arrow_body(&mut self, header: &FunctionHeader) -> PResult<H::Node> {
        self.must_match_token(TokenKind::Arrow, LexMode::Operator, "'=>' after arrow parameters")?;
        if self.match_token(TokenKind::LeftCurly, LexMode::Operand)? {
            return self.function_body();
        }
        // Concise body: `return expr`.
        let start = self.peek_start()?;
        let expr = self.assign_expr_no_error(header.in_handling)?;
        let span = self.span_from(start);
        let ret = self.handler.new_unary(ParseNodeKind::Return, span, expr);
        let list = self.handler.new_list(ParseNodeKind::StatementList, span);
        self.handler.add_list_child(list, ret);
        Ok(list)
    }

    fn function_formals(&mut self, list: H::Node, header: &FunctionHeader) -> PResult<FormalsInfo> {
        let mut info = FormalsInfo {
            simple: true,
            ..FormalsInfo::default()
        };

        if header.kind.is_arrow() && self.peek_token(LexMode::Operand)?.kind != TokenKind::LeftParen {
            // `x => ...`
            let token = self.get_token(LexMode::Operand)?;
            let name = self.binding_identifier(token)?;
            self.note_positional_formal(name, token.span, true)?;
            let param = self.handler.new_name(name, token.span);
            self.handler.add_list_child(list, param);
            info.count = 1;
            info.length = 1;
            return Ok(info);
        }

        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' before formal parameters")?;
        // Taken before any nested function in a default value can see it.
        let standalone_params_end = self.state.standalone_params_end.take();
        let disallow_duplicates = header.kind.disallows_duplicate_params();
        let mut seen_default = false;
        loop {
            let mut token = self.get_token(LexMode::Operand)?;
            if token.kind == TokenKind::RightParen {
                break;
            }
            let param_start = token.span.start;
            let rest = token.kind == TokenKind::TripleDot;
            if rest {
                info.has_rest = true;
                info.simple = false;
                token = self.get_token(LexMode::Operand)?;
            }

            let mut param = match token.kind {
                TokenKind::LeftBracket | TokenKind::LeftCurly => {
                    info.simple = false;
                    self.note_destructured_positional_formal();
                    let target = self.binding_pattern(DeclarationKind::FormalParameter, token)?;
                    info.has_exprs |= target.has_exprs;
                    target.node
                }
                _ => {
                    let name = self.binding_identifier(token)?;
                    if self.note_positional_formal(name, token.span, disallow_duplicates)? && info.duplicate.is_none() {
                        info.duplicate = Some(token.span);
                    }
                    self.handler.new_name(name, token.span)
                }
            };

            let assign = self.peek_token(LexMode::Operator)?;
            if assign.kind == TokenKind::Assign {
                if rest {
                    return self.error_at(diagnostic_codes::REST_WITH_DEFAULT, assign.span, &[]);
                }
                self.get_token(LexMode::Operator)?;
                info.simple = false;
                info.has_exprs = true;
                seen_default = true;
                let init = self.assign_expr_no_error(InHandling::InAllowed)?;
                let span = self.span_from(param_start);
                param = self.handler.new_binary(ParseNodeKind::Assign, span, param, init);
            }
            if rest {
                let span = self.span_from(param_start);
                param = self.handler.new_unary(ParseNodeKind::Spread, span, param);
            }
            info.count += 1;
            if !seen_default && !rest {
                info.length += 1;
            }
            self.handler.add_list_child(list, param);

            let separator = self.get_token(LexMode::Operator)?;
            match separator.kind {
                TokenKind::RightParen => break,
                TokenKind::Comma if rest => {
                    return self.error_at(diagnostic_codes::PARAMETER_AFTER_REST, separator.span, &[]);
                }
                TokenKind::Comma => {}
                _ => return self.error_unexpected("',' or ')' after formal parameter", separator),
            }
        }

        if let Some(end) = standalone_params_end {
            // The caller's parameter text must close exactly where it ends.
            let close = self.current_token();
            if close.span.start != end {
                return self.error_at(diagnostic_codes::MISSING_FORMAL, close.span, &[]);
            }
        }
        Ok(info)
    }

    fn record_formals(&mut self, funbox: FunctionBoxId, header: &FunctionHeader, info: &FormalsInfo) -> PResult<()> {
        let span = Span::at(self.prev_end());
        if !info.simple {
            if let Some(duplicate) = info.duplicate {
                return self.error_at(diagnostic_codes::BAD_DUP_ARGS, duplicate, &[]);
            }
        }
        match header.kind {
            FunctionSyntaxKind::Getter if info.count != 0 => {
                return self.error_at(diagnostic_codes::BAD_GETTER_ARITY, span, &[]);
            }
            FunctionSyntaxKind::Setter if info.has_rest => {
                return self.error_at(diagnostic_codes::ACCESSOR_REST, span, &[]);
            }
            FunctionSyntaxKind::Setter if info.count != 1 => {
                return self.error_at(diagnostic_codes::BAD_SETTER_ARITY, span, &[]);
            }
            _ => {}
        }

        let fb = self.state.function_box_mut(funbox);
        fb.length = info.length;
        if !info.simple {
            fb.flags.remove(FunctionFlags::HAS_SIMPLE_PARAMETER_LIST);
        }
        if info.has_rest {
            fb.set_flag(FunctionFlags::HAS_REST);
        }
        if info.has_exprs {
            fb.set_flag(FunctionFlags::HAS_PARAMETER_EXPRS);
        }
        if info.duplicate.is_some() {
            fb.set_flag(FunctionFlags::HAS_DUPLICATE_PARAMETERS);
        }
        Ok(())
    }

    /// Wording for the kind of parameter list that rules out `"use strict"`.
    pub(crate) fn non_simple_parameter_description(&self, funbox: FunctionBoxId) -> &'static str {
        let fb = self.state.function_box(funbox);
        if fb.has_flag(FunctionFlags::HAS_REST) {
            "rest"
        } else if fb.has_flag(FunctionFlags::HAS_PARAMETER_EXPRS) {
            "default"
        } else {
            "destructuring"
        }
    }
}
