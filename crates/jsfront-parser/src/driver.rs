//! Parse entry points.
//!
//! Each entry point sets up a `ParserState`, pushes the outermost context and
//! scope for its kind of code, runs the full parser and turns the state into
//! a `ParseOutput`. Inner functions are syntax parsed when lazy parsing is
//! enabled; `delazify_function` later parses one of them fully on its own.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Atom, Diagnostic, Interner, ParseOptions, Span};
use jsfront_scanner::{LexMode, TokenKind};
use serde::Serialize;
use tracing::debug;

use crate::asm::AsmJsValidator;
use crate::error::{PResult, ParseError, ParseFailure};
use crate::function_box::{AsyncKind, FunctionBox, FunctionBoxId, FunctionFlags, FunctionSyntaxKind, GeneratorKind};
use crate::handler::{FullParseHandler, ParseHandler};
use crate::lazy::{EnclosingFlags, LazyFunctionSummary};
use crate::parser::base::NodeIndex;
use crate::parser::node::{NodeArena, NodeData, ParseNodeKind};
use crate::parser::state::{InHandling, InvokedPrediction, Parser, ParserState};
use crate::parser::FunctionHeader;
use crate::scope::bindings::{ScopeBindings, ScopeBindingsId};
use crate::scope::parse_context::{ContextFlags, ContextKind, Directives, ParseContext};
use crate::scope::parse_scope::ScopeKind;

// =============================================================================
// Inputs
// =============================================================================

/// What the code calling `eval` allows inside the evaluated source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EvalContext {
    pub strict: bool,
    pub in_function: bool,
    pub allow_new_target: bool,
    pub allow_super_property: bool,
    pub allow_arguments: bool,
}

/// The kind of function a `Function`-style constructor creates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FunctionFlavor {
    #[default]
    Normal,
    Generator,
    Async,
    AsyncGenerator,
}

impl FunctionFlavor {
    fn prefix(self) -> &'static str {
        match self {
            FunctionFlavor::Normal => "function",
            FunctionFlavor::Generator => "function*",
            FunctionFlavor::Async => "async function",
            FunctionFlavor::AsyncGenerator => "async function*",
        }
    }

    fn generator_kind(self) -> GeneratorKind {
        match self {
            FunctionFlavor::Generator | FunctionFlavor::AsyncGenerator => GeneratorKind::Generator,
            _ => GeneratorKind::NotGenerator,
        }
    }

    fn async_kind(self) -> AsyncKind {
        match self {
            FunctionFlavor::Async | FunctionFlavor::AsyncGenerator => AsyncKind::AsyncFunction,
            _ => AsyncKind::SyncFunction,
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Everything one parse produced.
#[derive(Debug, Serialize)]
pub struct ParseOutput {
    pub arena: NodeArena,
    /// Script, module or eval scope node; the function node for standalone
    /// and delazified functions.
    pub root: NodeIndex,
    pub function_boxes: Vec<FunctionBox>,
    pub scope_bindings: Vec<ScopeBindings>,
    #[serde(skip)]
    pub interner: Interner,
    pub warnings: Vec<Diagnostic>,
    /// Summaries of lazily parsed functions, indexed by
    /// `FunctionBox::lazy_summary`.
    pub summaries: Vec<LazyFunctionSummary>,
    /// The embedder's source map URL, or the one from a
    /// `//# sourceMappingURL=` comment.
    pub source_map_url: Option<String>,
}

impl ParseOutput {
    pub fn resolve(&self, atom: Atom) -> &str {
        self.interner.resolve(atom)
    }

    pub fn function_box(&self, id: FunctionBoxId) -> &FunctionBox {
        &self.function_boxes[id.0 as usize]
    }

    pub fn bindings(&self, id: ScopeBindingsId) -> &ScopeBindings {
        &self.scope_bindings[id.0 as usize]
    }

    /// Binding table of the script, module or eval scope.
    pub fn root_bindings(&self) -> Option<&ScopeBindings> {
        let (bindings, _) = self.arena.get_scope(self.root)?;
        bindings.map(|id| self.bindings(id))
    }

    /// First function, in source order, named `name`.
    pub fn find_function(&self, name: &str) -> Option<FunctionBoxId> {
        let atom = self.interner.lookup(name)?;
        self.function_boxes
            .iter()
            .filter(|funbox| funbox.name == Some(atom))
            .min_by_key(|funbox| funbox.extent.to_string_start)
            .map(|funbox| funbox.id)
    }

    pub fn lazy_summary(&self, id: FunctionBoxId) -> Option<&LazyFunctionSummary> {
        let index = self.function_box(id).lazy_summary?;
        self.summaries.get(index)
    }

    /// Names closed over in the scopes of function `id` (not of the
    /// functions nested in it), sorted. A lazy function answers from its
    /// summary.
    pub fn closed_over_bindings(&self, id: FunctionBoxId) -> Vec<String> {
        let funbox = self.function_box(id);
        let mut names: Vec<Atom> = Vec::new();
        if funbox.has_flag(FunctionFlags::IS_LAZY) {
            if let Some(summary) = self.lazy_summary(id) {
                names.extend(summary.closed_over_names());
            }
        } else {
            for table in [funbox.function_bindings, funbox.var_bindings, funbox.named_lambda_bindings]
                .into_iter()
                .flatten()
            {
                names.extend(self.bindings(table).closed_over());
            }
            if let Some(body) = self.function_body(id) {
                self.collect_block_closed_over(body, &mut names);
            }
        }
        let mut names: Vec<String> = names.into_iter().map(|atom| self.resolve(atom).to_string()).collect();
        names.sort();
        names.dedup();
        names
    }

    fn function_body(&self, id: FunctionBoxId) -> Option<NodeIndex> {
        self.arena.nodes.iter().find_map(|node| match node.data {
            NodeData::Function { funbox, body } if funbox == id && body.is_some() => Some(body),
            _ => None,
        })
    }

    /// Closed-over names of the block scopes below `index`, stopping at
    /// nested functions.
    fn collect_block_closed_over(&self, index: NodeIndex, names: &mut Vec<Atom>) {
        let mut stack = vec![index];
        while let Some(current) = stack.pop() {
            let Some(node) = self.arena.get(current) else {
                continue;
            };
            if node.kind == ParseNodeKind::Function {
                continue;
            }
            if let NodeData::Scope { bindings: Some(id), .. } = node.data {
                names.extend(self.bindings(id).closed_over());
            }
            stack.extend(self.arena.children(current));
        }
    }
}

// =============================================================================
// Entry points
// =============================================================================

pub fn parse_script(source: &str, options: &ParseOptions) -> Result<ParseOutput, ParseError> {
    let state = ParserState::new(source, options.clone());
    run_script(state)
}

/// `parse_script` with an embedder-supplied asm.js validator.
pub fn parse_script_with_validator(
    source: &str,
    options: &ParseOptions,
    validator: Box<dyn AsmJsValidator>,
) -> Result<ParseOutput, ParseError> {
    let mut state = ParserState::new(source, options.clone());
    state.set_asm_validator(validator);
    run_script(state)
}

fn run_script(mut state: ParserState<'_>) -> Result<ParseOutput, ParseError> {
    debug!(len = state.ts.source_len(), "parse script");
    let handler = FullParseHandler::for_source_len(state.ts.source_len() as usize);
    let mut parser = Parser::new(&mut state, handler);
    parser.enter_top_level(ContextKind::Global, ScopeKind::Global, Directives::default(), ContextFlags::empty());
    let root = parser.top_level_body(ParseNodeKind::LexicalScope);
    let arena = parser.into_handler().into_arena();
    finish(state, arena, root)
}

pub fn parse_module(source: &str, options: &ParseOptions) -> Result<ParseOutput, ParseError> {
    debug!(len = source.len(), "parse module");
    let mut state = ParserState::new(source, options.clone());
    state.module_goal = true;
    let handler = FullParseHandler::for_source_len(source.len());
    let mut parser = Parser::new(&mut state, handler);
    parser.enter_top_level(
        ContextKind::Module,
        ScopeKind::Module,
        Directives::new(true),
        ContextFlags::AWAIT_IS_KEYWORD,
    );
    let root = parser.top_level_body(ParseNodeKind::Module);
    let arena = parser.into_handler().into_arena();
    finish(state, arena, root)
}

pub fn parse_eval(source: &str, options: &ParseOptions, context: EvalContext) -> Result<ParseOutput, ParseError> {
    debug!(len = source.len(), strict = context.strict, "parse eval");
    let mut flags = ContextFlags::empty();
    if context.allow_new_target {
        flags |= ContextFlags::ALLOW_NEW_TARGET;
    }
    if context.allow_super_property {
        flags |= ContextFlags::ALLOW_SUPER_PROPERTY;
    }
    if context.allow_arguments || context.in_function {
        flags |= ContextFlags::ALLOW_ARGUMENTS;
    }
    let mut state = ParserState::new(source, options.clone());
    let handler = FullParseHandler::for_source_len(source.len());
    let mut parser = Parser::new(&mut state, handler);
    parser.enter_top_level(ContextKind::Eval, ScopeKind::Eval, Directives::new(context.strict), flags);
    let root = parser.top_level_body(ParseNodeKind::LexicalScope);
    let arena = parser.into_handler().into_arena();
    finish(state, arena, root)
}

/// Parse the function a `Function`-style constructor builds from parameter
/// and body text.
pub fn parse_standalone_function(
    params: &str,
    body: &str,
    flavor: FunctionFlavor,
    options: &ParseOptions,
) -> Result<ParseOutput, ParseError> {
    let head = format!("({} anonymous(", flavor.prefix());
    // The parameter list must close exactly at the `)` added here.
    let params_end = (head.len() + params.len() + 1) as u32;
    let source = format!("{head}{params}\n) {{\n{body}\n}})");
    debug!(len = source.len(), ?flavor, "parse standalone function");

    let mut state = ParserState::new(&source, options.clone());
    state.standalone_params_end = Some(params_end);
    let handler = FullParseHandler::for_source_len(source.len());
    let mut parser = Parser::new(&mut state, handler);
    parser.enter_top_level(ContextKind::Global, ScopeKind::Global, Directives::default(), ContextFlags::empty());
    let root = parser.standalone_function(flavor);
    let arena = parser.into_handler().into_arena();
    finish(state, arena, root)
}

/// Parse a standalone legacy generator comprehension `(for (x of y) expr)`.
pub fn parse_comprehension_lambda(source: &str, options: &ParseOptions) -> Result<ParseOutput, ParseError> {
    debug!(len = source.len(), "parse comprehension lambda");
    let mut state = ParserState::new(source, options.clone());
    let handler = FullParseHandler::for_source_len(source.len());
    let mut parser = Parser::new(&mut state, handler);
    parser.enter_top_level(ContextKind::Global, ScopeKind::Global, Directives::default(), ContextFlags::empty());
    let root = parser.standalone_comprehension();
    let arena = parser.into_handler().into_arena();
    finish(state, arena, root)
}

/// Fully parse a function an earlier parse of `source` summarized. Atoms in
/// the summary belong to `interner`, the one that earlier parse returned.
pub fn delazify_function(
    source: &str,
    summary: &LazyFunctionSummary,
    interner: Interner,
    options: &ParseOptions,
) -> Result<ParseOutput, ParseError> {
    debug!(
        start = summary.extent.start,
        end = summary.extent.end,
        "delazify function"
    );
    let mut state = ParserState::with_interner(source, interner, options.clone());
    state.module_goal = summary.enclosing.contains(EnclosingFlags::IN_MODULE);
    let extent_len = summary.extent.end.saturating_sub(summary.extent.to_string_start) as usize;
    let handler = FullParseHandler::delazifying(NodeArena::for_source_len(extent_len), summary);
    let mut parser = Parser::new(&mut state, handler);
    parser.enter_top_level(
        ContextKind::Global,
        ScopeKind::Global,
        Directives::new(summary.strict()),
        enclosing_context_flags(summary.enclosing),
    );
    let root = parser.delazified_function(summary);
    let arena = parser.into_handler().into_arena();
    finish(state, arena, root)
}

fn enclosing_context_flags(enclosing: EnclosingFlags) -> ContextFlags {
    let pairs = [
        (EnclosingFlags::ALLOW_NEW_TARGET, ContextFlags::ALLOW_NEW_TARGET),
        (EnclosingFlags::ALLOW_SUPER_PROPERTY, ContextFlags::ALLOW_SUPER_PROPERTY),
        (EnclosingFlags::ALLOW_SUPER_CALL, ContextFlags::ALLOW_SUPER_CALL),
        (EnclosingFlags::ALLOW_ARGUMENTS, ContextFlags::ALLOW_ARGUMENTS),
        (EnclosingFlags::YIELD_IS_KEYWORD, ContextFlags::YIELD_IS_KEYWORD),
        (EnclosingFlags::AWAIT_IS_KEYWORD, ContextFlags::AWAIT_IS_KEYWORD),
    ];
    pairs
        .into_iter()
        .filter(|(enclosing_flag, _)| enclosing.contains(*enclosing_flag))
        .fold(ContextFlags::empty(), |flags, (_, context_flag)| flags | context_flag)
}

// =============================================================================
// Finishing
// =============================================================================

/// Turn the parser state into a `ParseOutput`, or the failure into the
/// error reported to the caller.
fn finish(mut state: ParserState<'_>, arena: NodeArena, root: PResult<NodeIndex>) -> Result<ParseOutput, ParseError> {
    let root = match root {
        Ok(root) => root,
        Err(ParseFailure::Error(error)) => {
            debug!(code = error.code(), start = error.diagnostic.start, "parse failed");
            return Err(error);
        }
        // Neither signal may escape its function definition; reaching here
        // means a construct was parsed outside of one.
        Err(ParseFailure::AbortSyntaxParse | ParseFailure::Reparse) => {
            let current = state.ts.current();
            return Err(ParseError::syntax(Diagnostic::error(
                diagnostic_codes::UNEXPECTED_TOKEN_NO_EXPECT,
                current.span.start,
                current.span.len(),
                &[current.kind.description()],
            )));
        }
    };

    let mut warnings = std::mem::take(&mut state.warnings);
    warnings.append(&mut state.deferred_warnings);
    let comment_url = state.ts.source_map_url().map(str::to_string);
    let source_map_url = match (state.options.source_map_url.clone(), comment_url) {
        (Some(option_url), Some(comment_url)) => {
            warnings.push(Diagnostic::warning(
                diagnostic_codes::SOURCE_MAP_URL_OVERRIDE,
                0,
                0,
                &[&comment_url],
            ));
            Some(option_url)
        }
        (option_url, comment_url) => option_url.or(comment_url),
    };
    warnings.sort_by_key(|warning| warning.start);

    debug!(
        nodes = arena.len(),
        functions = state.function_boxes.len(),
        lazy = state.summaries.len(),
        warnings = warnings.len(),
        "parse finished"
    );
    let ParserState {
        ts,
        function_boxes,
        scope_bindings,
        summaries,
        ..
    } = state;
    Ok(ParseOutput {
        arena,
        root,
        function_boxes,
        scope_bindings,
        interner: ts.into_interner(),
        warnings,
        summaries,
        source_map_url,
    })
}

// =============================================================================
// Top-level grammar
// =============================================================================

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    /// Push the outermost context and its scope.
    fn enter_top_level(&mut self, kind: ContextKind, scope: ScopeKind, directives: Directives, flags: ContextFlags) {
        let script_id = self.state.used_names.next_script_id();
        let scope_base = self.state.scopes.len();
        self.state
            .contexts
            .push(ParseContext::new(kind, script_id, None, directives, flags, scope_base));
        self.push_scope(scope);
    }

    /// Pop the outermost scope and context, returning the scope's table.
    fn leave_top_level(&mut self) -> Option<ScopeBindingsId> {
        let bindings = self.finish_top_level_scope();
        self.state.contexts.pop();
        bindings
    }

    /// Script, module or eval body through the end of the source.
    fn top_level_body(&mut self, kind: ParseNodeKind) -> PResult<H::Node> {
        let body = self.statement_list_with_directives(TokenKind::Eof)?;
        self.must_match_token(TokenKind::Eof, LexMode::Operand, "end of script")?;
        if self.ctx().is_module() {
            self.check_local_exports()?;
        }
        if self.state.options.fold_constants {
            self.handler.fold_constants(body, self.state.ts.interner_mut());
        }
        let bindings = self.leave_top_level();
        let span = Span::new(0, self.state.ts.source_len());
        Ok(self.handler.new_scope(kind, span, bindings, body))
    }

    /// `(function anonymous(params\n) {\nbody\n})`.
    fn standalone_function(&mut self, flavor: FunctionFlavor) -> PResult<H::Node> {
        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'('")?;
        let keyword = self.get_token(LexMode::Operand)?;
        let to_string_start = keyword.span.start;
        if flavor.async_kind() == AsyncKind::AsyncFunction {
            self.must_match_token(TokenKind::Function, LexMode::Operand, "'function' after 'async'")?;
        }
        if flavor.generator_kind() == GeneratorKind::Generator {
            self.must_match_token(TokenKind::Mul, LexMode::Operand, "'*'")?;
        }
        let name = self.must_match_token(TokenKind::Name, LexMode::Operand, "function name")?;
        let header = FunctionHeader {
            name: name.name(),
            kind: FunctionSyntaxKind::Statement,
            generator: flavor.generator_kind(),
            async_kind: flavor.async_kind(),
            to_string_start,
            in_handling: InHandling::InAllowed,
        };
        let function = self.function_definition(header, InvokedPrediction::PredictInvoked)?;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after function body")?;
        self.must_match_token(TokenKind::Eof, LexMode::Operand, "end of function source")?;
        self.leave_top_level();
        Ok(function)
    }

    fn standalone_comprehension(&mut self) -> PResult<H::Node> {
        self.must_match_token(TokenKind::LeftParen, LexMode::Operand, "'(' before comprehension")?;
        let start = self.peek_start()?;
        let genexp = self.legacy_generator_expr(start)?;
        self.must_match_token(TokenKind::RightParen, LexMode::Operator, "')' after comprehension")?;
        self.must_match_token(TokenKind::Eof, LexMode::Operand, "end of comprehension source")?;
        self.leave_top_level();
        Ok(genexp)
    }

    fn delazified_function(&mut self, summary: &LazyFunctionSummary) -> PResult<H::Node> {
        self.state.ts.advance_to(summary.extent.start);
        self.state.delazify_pending = true;
        let header = FunctionHeader::from_summary(summary);
        let function = self.function_definition(header, InvokedPrediction::PredictInvoked)?;
        self.leave_top_level();
        Ok(function)
    }
}
