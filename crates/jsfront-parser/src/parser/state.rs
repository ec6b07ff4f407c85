//! Parser state and the generic parser shell.
//!
//! `ParserState` owns everything that outlives one handler: the token stream,
//! the scope and context stacks, function boxes, the used-name tracker and
//! the collected warnings. A `Parser` borrows the state mutably together with
//! one `ParseHandler`, so the full parser can lend the very same state to a
//! syntax-only parser for a speculative attempt and take it back afterwards.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Atom, Diagnostic, DiagnosticCategory, Interner, LineMap, ParseOptions, Span, atoms};
use jsfront_scanner::{LexMode, Token, TokenKind, TokenStream, TokenStreamPosition};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::asm::{AsmJsValidator, RejectingAsmJsValidator};
use crate::error::{PResult, ParseError, ParseFailure};
use crate::function_box::{FunctionBox, FunctionBoxId, FunctionFlags};
use crate::handler::{HandlerMark, ParseHandler};
use crate::lazy::LazyFunctionSummary;
use crate::parser::PrivateNameScope;
use crate::scope::bindings::{ScopeBindings, ScopeBindingsId};
use crate::scope::parse_context::{ContextFlags, Directives, ParseContext};
use crate::scope::parse_scope::ParseScope;
use crate::scope::used_names::{RewindToken, UsedNameTracker};

// =============================================================================
// Grammar parameters
// =============================================================================

/// Whether `in` is a binary operator in this expression (it is not in the
/// head of a `for` statement).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InHandling {
    InAllowed,
    InProhibited,
}

/// Whether `...` may start a primary expression: only directly inside
/// parentheses that might turn out to be arrow parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TripledotHandling {
    TripledotAllowed,
    TripledotProhibited,
}

/// Whether a function expression is about to be called, in which case a
/// syntax-only attempt would be wasted work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum InvokedPrediction {
    PredictUninvoked,
    PredictInvoked,
}

// =============================================================================
// ParserState
// =============================================================================

pub struct ParserState<'s> {
    pub(crate) ts: TokenStream<'s>,
    pub(crate) options: ParseOptions,
    pub(crate) line_map: LineMap,
    pub(crate) used_names: UsedNameTracker,
    pub(crate) scopes: Vec<ParseScope>,
    pub(crate) contexts: Vec<ParseContext>,
    pub(crate) function_boxes: Vec<FunctionBox>,
    pub(crate) scope_bindings: Vec<ScopeBindings>,
    /// Summaries of functions syntax parsed by the full parser.
    pub(crate) summaries: Vec<LazyFunctionSummary>,
    pub(crate) warnings: Vec<Diagnostic>,
    /// Warnings that survive a checkpoint restore (asm.js rejections).
    pub(crate) deferred_warnings: Vec<Diagnostic>,
    pub(crate) depth: u32,
    pub(crate) asm_validator: Box<dyn AsmJsValidator>,
    /// Directives discovered by a body that asked for a reparse.
    pub(crate) pending_directives: Option<Directives>,
    /// One entry per class body being parsed, innermost last.
    pub(crate) private_scopes: Vec<PrivateNameScope>,
    /// Module code: every name exported so far.
    pub(crate) exported_names: FxHashSet<Atom>,
    /// Module code: `export { x }` clauses whose local binding is checked
    /// once the module body is complete.
    pub(crate) local_exports: Vec<(Atom, Span)>,
    /// Parsing module code: `await` is reserved everywhere.
    pub(crate) module_goal: bool,
    /// Standalone function source: offset where the parameter list supplied
    /// by the caller must end.
    pub(crate) standalone_params_end: Option<u32>,
    /// First string with an octal escape in the directive prologue being
    /// parsed; an error once a later `"use strict"` makes the code strict.
    pub(crate) prologue_octal: Option<Span>,
    /// The next function entered is the one being delazified.
    pub(crate) delazify_pending: bool,
    /// Module-level names declared while an `export` declaration is parsed.
    pub(crate) export_capture: Option<Vec<Atom>>,
}

impl<'s> ParserState<'s> {
    pub fn new(source: &'s str, options: ParseOptions) -> Self {
        ParserState::with_interner(source, Interner::new(), options)
    }

    pub fn with_interner(source: &'s str, interner: Interner, options: ParseOptions) -> Self {
        ParserState {
            ts: TokenStream::new(source, interner),
            options,
            line_map: LineMap::build(source),
            used_names: UsedNameTracker::new(),
            scopes: Vec::new(),
            contexts: Vec::new(),
            function_boxes: Vec::new(),
            scope_bindings: Vec::new(),
            summaries: Vec::new(),
            warnings: Vec::new(),
            deferred_warnings: Vec::new(),
            depth: 0,
            asm_validator: Box::new(RejectingAsmJsValidator),
            pending_directives: None,
            private_scopes: Vec::new(),
            exported_names: FxHashSet::default(),
            local_exports: Vec::new(),
            module_goal: false,
            standalone_params_end: None,
            prologue_octal: None,
            delazify_pending: false,
            export_capture: None,
        }
    }

    pub fn set_asm_validator(&mut self, validator: Box<dyn AsmJsValidator>) {
        self.asm_validator = validator;
    }

    #[inline]
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    #[inline]
    pub fn interner(&self) -> &Interner {
        self.ts.interner()
    }

    pub fn function_box(&self, id: FunctionBoxId) -> &FunctionBox {
        &self.function_boxes[id.0 as usize]
    }

    pub fn function_box_mut(&mut self, id: FunctionBoxId) -> &mut FunctionBox {
        &mut self.function_boxes[id.0 as usize]
    }

    pub(crate) fn add_scope_bindings(&mut self, bindings: ScopeBindings) -> ScopeBindingsId {
        let id = ScopeBindingsId(self.scope_bindings.len() as u32);
        self.scope_bindings.push(bindings);
        id
    }

    /// "line N, column M" text for related-information messages.
    pub(crate) fn describe_position(&self, offset: u32) -> (String, String) {
        let location = self.line_map.location(offset);
        (location.line.to_string(), location.column.to_string())
    }
}

// =============================================================================
// Checkpoints
// =============================================================================

/// Everything a speculative parse can change, captured so it can be undone.
#[derive(Clone, Debug)]
pub(crate) struct Checkpoint {
    position: TokenStreamPosition,
    rewind: RewindToken,
    function_boxes: usize,
    scope_bindings: usize,
    summaries: usize,
    scopes: usize,
    contexts: usize,
    inner_functions: usize,
    free_names: usize,
    closed_over: usize,
    warnings: usize,
    private_scopes: usize,
    depth: u32,
    handler: HandlerMark,
}

// =============================================================================
// Parser
// =============================================================================

pub struct Parser<'p, 's, H: ParseHandler> {
    pub(crate) state: &'p mut ParserState<'s>,
    pub(crate) handler: H,
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    pub fn new(state: &'p mut ParserState<'s>, handler: H) -> Self {
        Parser { state, handler }
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    // =========================================================================
    // Context access
    // =========================================================================

    #[inline]
    pub(crate) fn ctx(&self) -> &ParseContext {
        self.state
            .contexts
            .last()
            .unwrap_or_else(|| unreachable!("parser used without a parse context"))
    }

    #[inline]
    pub(crate) fn ctx_mut(&mut self) -> &mut ParseContext {
        self.state
            .contexts
            .last_mut()
            .unwrap_or_else(|| unreachable!("parser used without a parse context"))
    }

    #[inline]
    pub(crate) fn strict(&self) -> bool {
        self.ctx().strict()
    }

    #[inline]
    pub(crate) fn has_ctx_flag(&self, flag: ContextFlags) -> bool {
        self.ctx().has(flag)
    }

    pub(crate) fn current_function_box(&self) -> Option<FunctionBoxId> {
        self.ctx().function_box
    }

    /// The innermost function that is not an arrow: the one whose `this`,
    /// `arguments` and `new.target` arrows see.
    pub(crate) fn nearest_non_arrow_function(&self) -> Option<FunctionBoxId> {
        self.state
            .contexts
            .iter()
            .rev()
            .filter_map(|ctx| ctx.function_box)
            .find(|id| !self.state.function_box(*id).is_arrow())
    }

    pub(crate) fn set_function_flag(&mut self, flag: FunctionFlags) {
        if let Some(id) = self.current_function_box() {
            self.state.function_box_mut(id).set_flag(flag);
        }
    }

    pub(crate) fn innermost_scope_index(&self) -> usize {
        self.state.scopes.len().saturating_sub(1)
    }

    pub(crate) fn innermost_scope(&self) -> &ParseScope {
        &self.state.scopes[self.innermost_scope_index()]
    }

    pub(crate) fn innermost_scope_mut(&mut self) -> &mut ParseScope {
        let index = self.innermost_scope_index();
        &mut self.state.scopes[index]
    }

    /// Whether the innermost scope is the one holding this context's vars.
    pub(crate) fn at_body_level(&self) -> bool {
        self.innermost_scope_index() == self.ctx().var_scope
    }

    pub(crate) fn resolve(&self, atom: Atom) -> &str {
        self.state.ts.resolve(atom)
    }

    /// Source text covered by `span`.
    pub(crate) fn text_at(&self, span: Span) -> &'s str {
        self.state.ts.text(span)
    }

    /// Whether every binding created now must be treated as closed over:
    /// inside generators and async functions, and wherever `with` or a
    /// direct `eval` can reach the scope.
    pub(crate) fn all_bindings_closed_over(&self) -> bool {
        self.has_ctx_flag(ContextFlags::BINDINGS_ACCESSED_DYNAMICALLY)
            || self
                .current_function_box()
                .is_some_and(|id| self.state.function_box(id).all_bindings_closed_over())
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    #[inline]
    pub(crate) fn get_token(&mut self, mode: LexMode) -> PResult<Token> {
        Ok(self.state.ts.get_token(mode)?)
    }

    #[inline]
    pub(crate) fn peek_token(&mut self, mode: LexMode) -> PResult<Token> {
        Ok(self.state.ts.peek_token(mode)?)
    }

    #[inline]
    pub(crate) fn peek_token_same_line(&mut self, mode: LexMode) -> PResult<Option<Token>> {
        Ok(self.state.ts.peek_token_same_line(mode)?)
    }

    #[inline]
    pub(crate) fn unget_token(&mut self) {
        self.state.ts.unget_token();
    }

    #[inline]
    pub(crate) fn match_token(&mut self, kind: TokenKind, mode: LexMode) -> PResult<bool> {
        Ok(self.state.ts.match_token(kind, mode)?)
    }

    #[inline]
    pub(crate) fn match_contextual(&mut self, atom: Atom, mode: LexMode) -> PResult<bool> {
        Ok(self.state.ts.match_contextual(atom, mode)?)
    }

    #[inline]
    pub(crate) fn current_token(&self) -> Token {
        self.state.ts.current()
    }

    /// Offset just past the most recently consumed token.
    #[inline]
    pub(crate) fn prev_end(&self) -> u32 {
        self.state.ts.current().span.end
    }

    /// Span from `start` to the end of the most recently consumed token.
    #[inline]
    pub(crate) fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Consume a token of kind `kind` or report "expected `what`".
    pub(crate) fn must_match_token(&mut self, kind: TokenKind, mode: LexMode, what: &str) -> PResult<Token> {
        let token = self.get_token(mode)?;
        if token.kind != kind {
            return self.error_unexpected(what, token);
        }
        Ok(token)
    }

    /// Consume a statement-ending `;`, or accept its automatic insertion.
    pub(crate) fn match_or_insert_semicolon(&mut self) -> PResult<()> {
        let Some(token) = self.peek_token_same_line(LexMode::Operand)? else {
            return Ok(());
        };
        match token.kind {
            TokenKind::Semi => {
                self.get_token(LexMode::Operand)?;
                Ok(())
            }
            TokenKind::Eof | TokenKind::RightCurly => Ok(()),
            _ => {
                // `await x` outside an async function reads as the name
                // `await` followed by junk.
                let current = self.current_token();
                if current.is_contextual(atoms::AWAIT) && !self.ctx().await_is_keyword() {
                    return self.error_at(diagnostic_codes::AWAIT_OUTSIDE_ASYNC, current.span, &[]);
                }
                self.get_token(LexMode::Operand)?;
                self.error_at(diagnostic_codes::SEMI_BEFORE_STMNT, token.span, &[])
            }
        }
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub(crate) fn error_at<T>(&self, code: u32, span: Span, args: &[&str]) -> PResult<T> {
        Err(ParseFailure::Error(ParseError::syntax(Diagnostic::error(
            code,
            span.start,
            span.len(),
            args,
        ))))
    }

    pub(crate) fn error_unexpected<T>(&self, expected: &str, token: Token) -> PResult<T> {
        if token.kind == TokenKind::Name && token.has_escape() {
            let text = token.name().map_or("", |atom| self.resolve(atom));
            if TokenKind::keyword(text).is_some() {
                return self.error_at(diagnostic_codes::BAD_ESCAPED_KEYWORD, token.span, &[]);
            }
        }
        self.error_at(
            diagnostic_codes::UNEXPECTED_TOKEN,
            token.span,
            &[expected, token.kind.description()],
        )
    }

    /// Report a problem that is an error only in strict mode code.
    pub(crate) fn strict_report(&mut self, code: u32, span: Span, args: &[&str]) -> PResult<()> {
        if self.strict() {
            return self.error_at(code, span, args);
        }
        if self.state.options.extra_warnings_option || self.state.options.strict_option {
            self.state.warnings.push(Diagnostic::new(
                DiagnosticCategory::StrictWarning,
                code,
                span.start,
                span.len(),
                args,
            ));
        }
        Ok(())
    }

    pub(crate) fn warning_at(&mut self, code: u32, span: Span, args: &[&str]) {
        self.state
            .warnings
            .push(Diagnostic::warning(code, span.start, span.len(), args));
    }

    /// Warning only collected when extra warnings are enabled.
    pub(crate) fn extra_warning_at(&mut self, code: u32, span: Span, args: &[&str]) {
        if self.state.options.extra_warnings_option {
            self.state.warnings.push(Diagnostic::new(
                DiagnosticCategory::ExtraWarning,
                code,
                span.start,
                span.len(),
                args,
            ));
        }
    }

    // =========================================================================
    // Recursion guard
    // =========================================================================

    pub(crate) fn enter_recursion(&mut self) -> PResult<()> {
        self.state.depth += 1;
        if self.state.depth > self.state.options.max_recursion_depth {
            let pos = self.prev_end();
            return Err(ParseError::too_much_recursion(pos).into());
        }
        Ok(())
    }

    #[inline]
    pub(crate) fn leave_recursion(&mut self) {
        self.state.depth = self.state.depth.saturating_sub(1);
    }

    // =========================================================================
    // Checkpoints
    // =========================================================================

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        let ctx = self.ctx();
        Checkpoint {
            position: self.state.ts.position(),
            rewind: self.state.used_names.get_rewind_token(),
            function_boxes: self.state.function_boxes.len(),
            scope_bindings: self.state.scope_bindings.len(),
            summaries: self.state.summaries.len(),
            scopes: self.state.scopes.len(),
            contexts: self.state.contexts.len(),
            inner_functions: ctx.inner_functions.len(),
            free_names: ctx.free_names_len(),
            closed_over: ctx.closed_over_bindings_for_lazy.len(),
            warnings: self.state.warnings.len(),
            private_scopes: self.state.private_scopes.len(),
            depth: self.state.depth,
            handler: self.handler.mark(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: &Checkpoint) {
        trace!(offset = checkpoint.position.offset(), "restoring parser checkpoint");
        self.state.ts.seek(&checkpoint.position);
        self.state.used_names.rewind(checkpoint.rewind);
        self.state.function_boxes.truncate(checkpoint.function_boxes);
        self.state.scope_bindings.truncate(checkpoint.scope_bindings);
        self.state.summaries.truncate(checkpoint.summaries);
        self.state.scopes.truncate(checkpoint.scopes);
        self.state.contexts.truncate(checkpoint.contexts);
        self.state.warnings.truncate(checkpoint.warnings);
        self.state.private_scopes.truncate(checkpoint.private_scopes);
        self.state.depth = checkpoint.depth;
        self.state.pending_directives = None;
        let ctx = self.ctx_mut();
        ctx.inner_functions.truncate(checkpoint.inner_functions);
        ctx.truncate_free_names(checkpoint.free_names);
        ctx.closed_over_bindings_for_lazy.truncate(checkpoint.closed_over);
        self.handler.rewind(checkpoint.handler);
    }

    // =========================================================================
    // Names
    // =========================================================================

    /// Record a reference to `name` in the innermost scope.
    pub(crate) fn note_used_name(&mut self, name: Atom) {
        let script_id = self.ctx().script_id;
        let scope_id = self.innermost_scope().id;
        self.state.used_names.note_use(name, script_id, scope_id);
        self.ctx_mut().note_free_name(name);
    }

    pub(crate) fn is_arguments_or_eval(&self, name: Atom) -> bool {
        name == atoms::ARGUMENTS || name == atoms::EVAL
    }
}
