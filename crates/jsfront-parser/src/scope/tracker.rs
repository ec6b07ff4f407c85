//! Declaration bookkeeping on the scope stack.
//!
//! Every declaration is checked against the open scopes when it is parsed.
//! `var`-like declarations walk from the innermost scope out to the var
//! scope, recording themselves in every block they cross so a later
//! lexical declaration in one of those blocks sees the conflict. When a
//! scope closes, its sloppy block functions get their hoisted var if no
//! early error would have occurred, the used-name tracker says which of its
//! bindings are closed over, and (full parses only) the scope is flattened
//! into a binding table.

use jsfront_common::atoms;
use jsfront_common::diagnostics::{diagnostic_codes, diagnostic_messages, format_message};
use jsfront_common::{Atom, Diagnostic, Span};
use tracing::trace;

use super::bindings::{
    BindingName, BindingRuns, FunctionBindings, GlobalBindings, LexicalBindings, ModuleBindings,
    ScopeBindings, ScopeBindingsId, VarBindings,
};
use super::declaration_kind::DeclarationKind;
use super::parse_context::ContextFlags;
use super::parse_scope::{DeclaredNameInfo, ParseScope, ScopeKind};
use crate::error::{PResult, ParseError, ParseFailure};
use crate::function_box::{FunctionBoxId, FunctionFlags};
use crate::handler::ParseHandler;
use crate::parser::state::Parser;

/// Position of a declaration with no source location.
pub(crate) const NPOS: u32 = u32::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DryRun {
    No,
    /// Report a conflict without declaring, looking at the innermost scope
    /// only.
    InnermostScopeOnly,
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    // =========================================================================
    // Scope stack
    // =========================================================================

    pub(crate) fn push_scope(&mut self, kind: ScopeKind) -> usize {
        let id = self.state.used_names.next_scope_id();
        trace!(id, ?kind, "push scope");
        self.state.scopes.push(ParseScope::new(id, kind));
        self.state.scopes.len() - 1
    }

    /// Innermost declaration of `name` in scope `from` or a scope around it,
    /// without leaving the current function or script.
    pub(crate) fn lookup_declared(&self, name: Atom, from: usize) -> Option<&DeclaredNameInfo> {
        let base = self.ctx().scope_base;
        self.state
            .scopes
            .get(base..=from)?
            .iter()
            .rev()
            .find_map(|scope| scope.lookup(name))
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Record a declaration of `name` and report redeclaration errors.
    pub(crate) fn note_declared_name(&mut self, name: Atom, kind: DeclarationKind, span: Span) -> PResult<()> {
        trace!(name = name.0, ?kind, "declare");
        match kind {
            DeclarationKind::Var | DeclarationKind::ForOfVar | DeclarationKind::BodyLevelFunction => {
                if let Some((prev_kind, prev_pos)) = self.try_declare_var(name, kind, span.start, DryRun::No) {
                    return self.report_redeclaration(name, prev_kind, span, prev_pos);
                }
            }
            DeclarationKind::ModuleBodyLevelFunction => {
                let var_scope = self.ctx().var_scope;
                if let Some(info) = self.state.scopes[var_scope].lookup(name).copied() {
                    return self.report_redeclaration(name, info.kind, span, info.pos);
                }
                let scope = &mut self.state.scopes[var_scope];
                scope.add_declared_name(name, kind, span.start);
                if let Some(info) = scope.lookup_mut(name) {
                    info.closed_over = true;
                }
            }
            DeclarationKind::FormalParameter => {
                let Some(function_scope) = self.ctx().function_scope else {
                    return self.error_at(diagnostic_codes::BAD_DUP_ARGS, span, &[]);
                };
                if self.state.scopes[function_scope].lookup(name).is_some() {
                    return self.error_at(diagnostic_codes::BAD_DUP_ARGS, span, &[]);
                }
                self.state.scopes[function_scope].add_declared_name(name, kind, span.start);
            }
            DeclarationKind::SloppyLexicalFunction => {
                // Sloppy block functions may redeclare each other.
                let scope = self.innermost_scope();
                match scope.lookup(name).copied() {
                    Some(info) if info.kind == DeclarationKind::SloppyLexicalFunction => {}
                    Some(info) => return self.report_redeclaration(name, info.kind, span, info.pos),
                    None => self.innermost_scope_mut().add_declared_name(name, kind, span.start),
                }
            }
            DeclarationKind::Let | DeclarationKind::Const | DeclarationKind::Class => {
                if name == atoms::LET {
                    return self.error_at(diagnostic_codes::LEXICAL_DECL_DEFINES_LET, span, &[]);
                }
                // Body lexicals may not shadow a parameter, even across the
                // extra var scope parameter expressions introduce.
                if self.function_extra_body_var_scope_innermost() {
                    let shadowed = self
                        .ctx()
                        .function_scope
                        .and_then(|function_scope| self.lookup_declared(name, function_scope))
                        .copied();
                    if let Some(info) = shadowed.filter(|info| info.kind.is_parameter()) {
                        return self.report_redeclaration(name, info.kind, span, info.pos);
                    }
                }
                self.declare_in_innermost_scope(name, kind, span)?;
            }
            DeclarationKind::LexicalFunction
            | DeclarationKind::Import
            | DeclarationKind::SimpleCatchParameter
            | DeclarationKind::CatchParameter => {
                self.declare_in_innermost_scope(name, kind, span)?;
            }
            DeclarationKind::CoverArrowParameter => {}
            DeclarationKind::PositionalFormalParameter | DeclarationKind::VarForAnnexBLexicalFunction => {
                unreachable!("{kind:?} is declared through its own entry point")
            }
        }
        if self.state.export_capture.is_some() && self.ctx().is_module() && self.at_body_level() {
            if let Some(capture) = self.state.export_capture.as_mut() {
                capture.push(name);
            }
        }
        Ok(())
    }

    fn declare_in_innermost_scope(&mut self, name: Atom, kind: DeclarationKind, span: Span) -> PResult<()> {
        if let Some(info) = self.innermost_scope().lookup(name).copied() {
            return self.report_redeclaration(name, info.kind, span, info.pos);
        }
        self.innermost_scope_mut().add_declared_name(name, kind, span.start);
        Ok(())
    }

    fn function_extra_body_var_scope_innermost(&self) -> bool {
        let ctx = self.ctx();
        ctx.is_function()
            && ctx.function_scope != Some(ctx.var_scope)
            && self.innermost_scope_index() == ctx.var_scope
    }

    /// Declare a var-like name in every scope from the innermost one out to
    /// the var scope. Returns the kind and position of a conflicting
    /// declaration instead when there is one.
    fn try_declare_var(
        &mut self,
        name: Atom,
        kind: DeclarationKind,
        pos: u32,
        dry_run: DryRun,
    ) -> Option<(DeclarationKind, u32)> {
        let innermost = self.innermost_scope_index();
        let var_scope = self.ctx().var_scope;
        let strict = self.strict();
        for index in (var_scope..=innermost).rev() {
            let scope = &mut self.state.scopes[index];
            match scope.lookup_mut(name) {
                Some(info) => {
                    let declared = info.kind;
                    if strict
                        && declared == DeclarationKind::BodyLevelFunction
                        && kind == DeclarationKind::BodyLevelFunction
                    {
                        // Only sloppy code lets the second function win.
                        return Some((declared, info.pos));
                    }
                    if declared.is_var() {
                        // A var redeclared as a function is recorded as the
                        // function.
                        if dry_run == DryRun::No && kind == DeclarationKind::BodyLevelFunction {
                            info.alter_kind(kind);
                        }
                    } else if !declared.is_parameter() {
                        let catch_parameter_allowance =
                            declared == DeclarationKind::SimpleCatchParameter && kind != DeclarationKind::ForOfVar;
                        let block_function_allowance = declared == DeclarationKind::SloppyLexicalFunction
                            && kind == DeclarationKind::VarForAnnexBLexicalFunction
                            && index == innermost;
                        if !catch_parameter_allowance && !block_function_allowance {
                            return Some((declared, info.pos));
                        }
                    } else if kind == DeclarationKind::VarForAnnexBLexicalFunction {
                        return Some((declared, info.pos));
                    }
                }
                None => {
                    if dry_run == DryRun::No {
                        scope.add_declared_name(name, kind, pos);
                    }
                }
            }
            if dry_run == DryRun::InnermostScopeOnly {
                break;
            }
        }
        None
    }

    fn report_redeclaration<T>(&self, name: Atom, prev_kind: DeclarationKind, span: Span, prev_pos: u32) -> PResult<T> {
        let name_text = self.resolve(name);
        let mut diagnostic = Diagnostic::error(
            diagnostic_codes::REDECLARED_VAR,
            span.start,
            span.len(),
            &[prev_kind.description(), name_text],
        );
        if prev_pos != NPOS {
            let (line, column) = self.state.describe_position(prev_pos);
            diagnostic = diagnostic.with_related(
                prev_pos,
                name_text.len() as u32,
                format_message(diagnostic_messages::PREV_DECLARATION, &[&line, &column]),
            );
        }
        Err(ParseFailure::Error(ParseError::syntax(diagnostic)))
    }

    /// Declare the simple parameter at the next position. Returns whether
    /// the name duplicates an earlier parameter.
    pub(crate) fn note_positional_formal(
        &mut self,
        name: Atom,
        span: Span,
        disallow_duplicates: bool,
    ) -> PResult<bool> {
        let Some(function_scope) = self.ctx().function_scope else {
            return self.error_at(diagnostic_codes::MISSING_FORMAL, span, &[]);
        };
        let duplicated = self.state.scopes[function_scope].lookup(name).is_some();
        if duplicated {
            if disallow_duplicates {
                return self.error_at(diagnostic_codes::BAD_DUP_ARGS, span, &[]);
            }
            // The body may still turn out to be strict; that reparse lands
            // here again with `strict` set.
            if self.strict() {
                return self.error_at(diagnostic_codes::BAD_DUP_ARGS, span, &[]);
            }
        } else {
            self.state.scopes[function_scope].add_declared_name(
                name,
                DeclarationKind::PositionalFormalParameter,
                span.start,
            );
        }
        self.ctx_mut().positional_formals.push(name);
        Ok(duplicated)
    }

    /// Reserve a positional slot for a destructuring parameter.
    pub(crate) fn note_destructured_positional_formal(&mut self) {
        self.ctx_mut().positional_formals.push(Atom::NONE);
    }

    // =========================================================================
    // Catch parameters
    // =========================================================================

    /// Copy the catch parameters into the catch body's scope so the body
    /// cannot redeclare them lexically.
    pub(crate) fn add_catch_parameters(&mut self, catch_scope: usize) {
        let params: Vec<(Atom, DeclaredNameInfo)> = self.state.scopes[catch_scope]
            .declared
            .iter()
            .map(|(name, info)| (*name, *info))
            .collect();
        let body = self.innermost_scope_mut();
        for (name, info) in params {
            body.add_declared_name(name, info.kind, info.pos);
        }
    }

    /// Remove the copies again; the parameters are bound by the catch scope.
    pub(crate) fn remove_catch_parameters(&mut self, catch_scope: usize) {
        let names: Vec<Atom> = self.state.scopes[catch_scope].declared.keys().copied().collect();
        let body = self.innermost_scope_mut();
        for name in names {
            let is_copy = body.lookup(name).is_some_and(|info| {
                matches!(
                    info.kind,
                    DeclarationKind::SimpleCatchParameter | DeclarationKind::CatchParameter
                )
            });
            if is_copy {
                body.remove_declared_name(name);
            }
        }
    }

    // =========================================================================
    // Sloppy block functions
    // =========================================================================

    pub(crate) fn add_possible_annex_b_function(&mut self, funbox: FunctionBoxId) {
        self.innermost_scope_mut().add_possible_annex_b_function_box(funbox);
    }

    /// Whether a var named after `funbox` could be declared from the
    /// innermost scope without an early error.
    fn annex_b_applies_in_innermost_scope(&mut self, name: Atom) -> bool {
        let mut redeclared = self
            .try_declare_var(
                name,
                DeclarationKind::VarForAnnexBLexicalFunction,
                NPOS,
                DryRun::InnermostScopeOnly,
            )
            .is_some();
        if !redeclared {
            // With parameter expressions the parameters sit outside the var
            // scope, so the walk above never sees them.
            let ctx = self.ctx();
            if let Some(function_scope) = ctx.function_scope.filter(|scope| *scope != ctx.var_scope) {
                redeclared = self.state.scopes[function_scope]
                    .lookup(name)
                    .is_some_and(|info| info.kind.is_parameter());
            }
        }
        !redeclared
    }

    /// On leaving scope `index`: pass still-eligible sloppy block functions
    /// outward, or, at the var scope, give them their var.
    fn propagate_and_mark_annex_b_functions(&mut self, index: usize) {
        if self.strict() {
            return;
        }
        let candidates = std::mem::take(&mut self.state.scopes[index].possible_annex_b_function_boxes);
        if candidates.is_empty() {
            return;
        }
        let at_var_scope = index == self.ctx().var_scope;
        for funbox in candidates {
            let Some(name) = self.state.function_box(funbox).name else {
                continue;
            };
            if !self.annex_b_applies_in_innermost_scope(name) {
                continue;
            }
            if at_var_scope {
                let pos = self.state.function_box(funbox).extent.to_string_start;
                let conflict = self.try_declare_var(name, DeclarationKind::VarForAnnexBLexicalFunction, pos, DryRun::No);
                debug_assert!(conflict.is_none());
                self.state.function_box_mut(funbox).set_flag(FunctionFlags::IS_ANNEX_B);
                trace!(name = name.0, "annex B var hoisted");
            } else if index > 0 {
                self.state.scopes[index - 1].add_possible_annex_b_function_box(funbox);
            }
        }
    }

    // =========================================================================
    // Closed-over analysis
    // =========================================================================

    /// Consume the uses of scope `index`'s bindings and mark the bindings
    /// used from nested functions as closed over. Syntax parses record the
    /// closed-over names for the summary; a delazifying parse reads them
    /// back instead of recomputing them.
    fn propagate_free_names_and_mark_closed_over(&mut self, index: usize) {
        if self.has_ctx_flag(ContextFlags::DELAZIFYING) && self.handler.can_skip_lazy_closed_over_bindings() {
            while let Some(name) = self.handler.next_lazy_closed_over_binding() {
                if let Some(info) = self.state.scopes[index].lookup_mut(name) {
                    info.closed_over = true;
                }
            }
            return;
        }
        let script_id = self.ctx().script_id;
        let all_closed_over = self.all_bindings_closed_over();
        let scope = &self.state.scopes[index];
        let scope_id = scope.id;
        let names = scope.binding_names(scope.is_var_holding());
        for name in names {
            let used = self.state.used_names.note_bound_in_scope(name, script_id, scope_id);
            let Some(info) = self.state.scopes[index].lookup_mut(name) else {
                continue;
            };
            if used {
                info.closed_over = true;
            }
            // The summary lists exactly what the binding table would.
            if H::SYNTAX_ONLY && is_closed_over(info, all_closed_over) {
                self.ctx_mut().closed_over_bindings_for_lazy.push(Some(name));
            }
        }
        if H::SYNTAX_ONLY {
            self.ctx_mut().closed_over_bindings_for_lazy.push(None);
        }
    }

    /// Run the scope-exit analyses on the innermost scope and pop it.
    fn exit_scope(&mut self) -> ParseScope {
        let index = self.innermost_scope_index();
        self.propagate_and_mark_annex_b_functions(index);
        self.propagate_free_names_and_mark_closed_over(index);
        let scope = self
            .state
            .scopes
            .pop()
            .unwrap_or_else(|| unreachable!("scope stack underflow"));
        trace!(id = scope.id, declared = scope.declared.len(), "pop scope");
        scope
    }

    // =========================================================================
    // Finalization
    // =========================================================================

    /// Close a block-like scope. Returns its binding table in full parses.
    pub(crate) fn finish_lexical_scope(&mut self) -> Option<ScopeBindingsId> {
        let all_closed_over = self.all_bindings_closed_over();
        let scope = self.exit_scope();
        if H::SYNTAX_ONLY {
            return None;
        }
        let bindings = lexical_bindings(&scope, all_closed_over);
        let table = match scope.kind {
            ScopeKind::NamedLambda => ScopeBindings::NamedLambda(bindings),
            _ => ScopeBindings::Lexical(bindings),
        };
        Some(self.state.add_scope_bindings(table))
    }

    /// Close the script, eval or module scope.
    pub(crate) fn finish_top_level_scope(&mut self) -> Option<ScopeBindingsId> {
        let all_closed_over = self.all_bindings_closed_over();
        let scope = self.exit_scope();
        if H::SYNTAX_ONLY {
            return None;
        }
        let table = match scope.kind {
            ScopeKind::Module => ScopeBindings::Module(module_bindings(&scope, all_closed_over)),
            ScopeKind::Eval => ScopeBindings::Eval(global_bindings(&scope, all_closed_over)),
            _ => ScopeBindings::Global(global_bindings(&scope, all_closed_over)),
        };
        Some(self.state.add_scope_bindings(table))
    }

    /// Declare the implicit bindings of the function whose context is
    /// innermost: `arguments`, `.this` and `.generator`.
    pub(crate) fn declare_function_specials(&mut self, funbox: FunctionBoxId) {
        let ctx = self.ctx();
        let script_id = ctx.script_id;
        let var_scope = ctx.var_scope;
        let Some(function_scope) = ctx.function_scope else {
            return;
        };
        let dynamic = ctx.has(ContextFlags::BINDINGS_ACCESSED_DYNAMICALLY)
            || self.state.function_box(funbox).has_flag(FunctionFlags::BINDINGS_ACCESSED_DYNAMICALLY);
        let (is_arrow, is_generator_or_async, is_constructor) = {
            let funbox = self.state.function_box(funbox);
            (
                funbox.is_arrow(),
                funbox.is_generator() || funbox.is_async(),
                funbox.kind.is_constructor(),
            )
        };
        if is_arrow {
            return;
        }

        let mut try_declare_arguments = self.state.used_names.is_used_in_script(atoms::ARGUMENTS, script_id) || dynamic;
        let mut needs_arguments_object = false;
        let body_declares_var = self.state.scopes[var_scope]
            .lookup(atoms::ARGUMENTS)
            .is_some_and(|info| info.kind == DeclarationKind::Var);
        if body_declares_var {
            if function_scope != var_scope {
                try_declare_arguments = true;
            } else {
                needs_arguments_object = true;
            }
        }
        if try_declare_arguments && self.state.scopes[function_scope].lookup(atoms::ARGUMENTS).is_none() {
            self.state.scopes[function_scope].add_declared_name(atoms::ARGUMENTS, DeclarationKind::Var, NPOS);
            needs_arguments_object = true;
        }
        if needs_arguments_object {
            self.state.function_box_mut(funbox).set_flag(FunctionFlags::NEEDS_ARGUMENTS_OBJECT);
        }

        if self.state.used_names.is_used_in_script(atoms::DOT_THIS, script_id) || dynamic || is_constructor {
            let scope = &mut self.state.scopes[function_scope];
            if scope.lookup(atoms::DOT_THIS).is_none() {
                scope.add_declared_name(atoms::DOT_THIS, DeclarationKind::Var, NPOS);
            }
        }

        if is_generator_or_async {
            let scope = &mut self.state.scopes[function_scope];
            if scope.lookup(atoms::DOT_GENERATOR).is_none() {
                scope.add_declared_name(atoms::DOT_GENERATOR, DeclarationKind::Var, NPOS);
                if let Some(info) = scope.lookup_mut(atoms::DOT_GENERATOR) {
                    info.closed_over = true;
                }
            }
        }
    }

    /// Close the scopes of the function whose context is innermost: the
    /// body var scope (if split off), the parameter scope and the named
    /// lambda scope, recording their tables on `funbox`.
    pub(crate) fn finish_function_scopes(&mut self, funbox: FunctionBoxId) {
        let ctx = self.ctx();
        let Some(function_scope) = ctx.function_scope else {
            return;
        };
        let var_scope = ctx.var_scope;
        let has_named_lambda = ctx.named_lambda_scope.is_some();
        let all_closed_over = self.all_bindings_closed_over();

        if var_scope != function_scope {
            let scope = self.exit_scope();
            if !H::SYNTAX_ONLY {
                let id = self
                    .state
                    .add_scope_bindings(ScopeBindings::FunctionBodyVar(var_bindings(&scope, all_closed_over)));
                self.state.function_box_mut(funbox).var_bindings = Some(id);
            }
        }

        let holds_body = var_scope == function_scope;
        let scope = self.exit_scope();
        if !H::SYNTAX_ONLY {
            let table = function_bindings(&scope, &self.ctx().positional_formals, holds_body, all_closed_over);
            let id = self.state.add_scope_bindings(ScopeBindings::Function(table));
            self.state.function_box_mut(funbox).function_bindings = Some(id);
        }

        if has_named_lambda {
            let id = self.finish_lexical_scope();
            self.state.function_box_mut(funbox).named_lambda_bindings = id;
        }
    }
}

// =============================================================================
// Table builders
// =============================================================================

fn is_closed_over(info: &DeclaredNameInfo, all_closed_over: bool) -> bool {
    all_closed_over || info.closed_over || info.kind == DeclarationKind::ModuleBodyLevelFunction
}

fn binding(name: Atom, info: &DeclaredNameInfo, all_closed_over: bool) -> BindingName {
    BindingName::new(name, is_closed_over(info, all_closed_over))
}

fn lexical_bindings(scope: &ParseScope, all_closed_over: bool) -> LexicalBindings {
    let mut runs = BindingRuns::default();
    for (name, info) in &scope.declared {
        let run = match info.kind {
            kind if kind.is_var() || kind.is_parameter() => continue,
            DeclarationKind::Const => 1,
            _ => 0,
        };
        runs.push(run, binding(*name, info, all_closed_over));
    }
    let (names, starts) = runs.flatten();
    LexicalBindings {
        names,
        const_start: starts[0],
    }
}

fn global_bindings(scope: &ParseScope, all_closed_over: bool) -> GlobalBindings {
    let mut runs = BindingRuns::default();
    for (name, info) in &scope.declared {
        let run = match info.kind {
            DeclarationKind::BodyLevelFunction => 0,
            kind if kind.is_var() => 1,
            DeclarationKind::Const => 3,
            _ => 2,
        };
        runs.push(run, binding(*name, info, all_closed_over));
    }
    let (names, starts) = runs.flatten();
    GlobalBindings {
        names,
        var_start: starts[0],
        let_start: starts[1],
        const_start: starts[2],
    }
}

fn module_bindings(scope: &ParseScope, all_closed_over: bool) -> ModuleBindings {
    let mut runs = BindingRuns::default();
    for (name, info) in &scope.declared {
        let run = match info.kind {
            DeclarationKind::Import => 0,
            DeclarationKind::ModuleBodyLevelFunction => 1,
            kind if kind.is_var() => 1,
            DeclarationKind::Const => 3,
            _ => 2,
        };
        runs.push(run, binding(*name, info, all_closed_over));
    }
    let (names, starts) = runs.flatten();
    ModuleBindings {
        names,
        var_start: starts[0],
        let_start: starts[1],
        const_start: starts[2],
    }
}

fn var_bindings(scope: &ParseScope, all_closed_over: bool) -> VarBindings {
    let mut runs = BindingRuns::default();
    for (name, info) in &scope.declared {
        let run = match info.kind {
            kind if kind.is_var() => 0,
            DeclarationKind::Const => 2,
            _ => 1,
        };
        runs.push(run, binding(*name, info, all_closed_over));
    }
    let (names, starts) = runs.flatten();
    VarBindings {
        names,
        let_start: starts[0],
        const_start: starts[1],
    }
}

/// `positional` lists the simple parameters in order, `Atom::NONE` for
/// destructuring ones. A name repeated later in the list leaves its
/// earlier slots unnamed.
fn function_bindings(
    scope: &ParseScope,
    positional: &[Atom],
    holds_body: bool,
    all_closed_over: bool,
) -> FunctionBindings {
    let mut runs = BindingRuns::default();
    for (i, name) in positional.iter().enumerate() {
        let shadowed = name.is_none() || positional[i + 1..].contains(name);
        let named = match scope.lookup(*name) {
            Some(info) if !shadowed => binding(*name, info, all_closed_over),
            _ => BindingName::new(Atom::NONE, false),
        };
        runs.push(0, named);
    }
    for (name, info) in &scope.declared {
        let run = match info.kind {
            DeclarationKind::PositionalFormalParameter => continue,
            kind if kind.is_parameter() => 1,
            kind if kind.is_var() => 2,
            _ if !holds_body => continue,
            DeclarationKind::Const => 4,
            _ => 3,
        };
        runs.push(run, binding(*name, info, all_closed_over));
    }
    let (names, starts) = runs.flatten();
    FunctionBindings {
        names,
        non_positional_formal_start: starts[0],
        var_start: starts[1],
        let_start: starts[2],
        const_start: starts[3],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: Atom = Atom(200);
    const B: Atom = Atom(201);

    #[test]
    fn test_duplicate_positional_keeps_last_slot() {
        let mut scope = ParseScope::new(1, ScopeKind::Function);
        scope.add_declared_name(A, DeclarationKind::PositionalFormalParameter, 11);
        scope.add_declared_name(B, DeclarationKind::Var, 20);
        let table = function_bindings(&scope, &[A, A], true, false);
        assert_eq!(table.positional_formals()[0].name, Atom::NONE);
        assert_eq!(table.positional_formals()[1].name, A);
        assert_eq!(table.vars()[0].name, B);
    }

    #[test]
    fn test_lexical_table_skips_hoisted_vars() {
        let mut scope = ParseScope::new(2, ScopeKind::Lexical);
        scope.add_declared_name(A, DeclarationKind::Var, 0);
        scope.add_declared_name(B, DeclarationKind::Const, 5);
        let table = lexical_bindings(&scope, false);
        assert!(table.lets().is_empty());
        assert_eq!(table.consts().len(), 1);
    }
}
