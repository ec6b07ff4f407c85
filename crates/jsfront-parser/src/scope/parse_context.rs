//! Per-function (or per-script) parse state.

use bitflags::bitflags;
use jsfront_common::Atom;
use rustc_hash::FxHashSet;

use crate::function_box::FunctionBoxId;
use crate::lazy::LazyFunctionSummary;

/// Directives in effect for a function or script body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directives {
    pub strict: bool,
    pub asm_js: bool,
}

impl Directives {
    pub fn new(strict: bool) -> Self {
        Directives {
            strict,
            asm_js: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextKind {
    Global,
    Module,
    Eval,
    Function,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ContextFlags: u16 {
        const YIELD_IS_KEYWORD = 1 << 0;
        const AWAIT_IS_KEYWORD = 1 << 1;
        const ALLOW_NEW_TARGET = 1 << 2;
        const ALLOW_SUPER_PROPERTY = 1 << 3;
        const ALLOW_SUPER_CALL = 1 << 4;
        const ALLOW_ARGUMENTS = 1 << 5;
        /// Closed-over bindings come from the summary being delazified.
        const DELAZIFYING = 1 << 6;
        /// Contains `with` or direct `eval` (scripts and eval code).
        const BINDINGS_ACCESSED_DYNAMICALLY = 1 << 7;
        /// Parsing the parameter list; `yield`/`await` expressions are
        /// rejected.
        const IN_FORMAL_PARAMETERS = 1 << 8;
        /// Class field initializer or static block: `arguments` is an error.
        const IN_CLASS_INITIALIZER = 1 << 9;
        /// The body calls some `f.apply(...)`.
        const USES_APPLY = 1 << 10;
        /// The body contains a `return` statement.
        const USES_RETURN = 1 << 11;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    Label,
    Block,
    If,
    Switch,
    With,
    Catch,
    Try,
    Finally,
    ForLoop,
    ForInLoop,
    ForOfLoop,
    DoLoop,
    WhileLoop,
    Class,
}

impl StatementKind {
    pub fn is_loop(self) -> bool {
        matches!(
            self,
            StatementKind::ForLoop
                | StatementKind::ForInLoop
                | StatementKind::ForOfLoop
                | StatementKind::DoLoop
                | StatementKind::WhileLoop
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseStatement {
    pub kind: StatementKind,
    /// Label name for `StatementKind::Label`.
    pub label: Option<Atom>,
}

pub struct ParseContext {
    pub kind: ContextKind,
    pub script_id: u32,
    pub function_box: Option<FunctionBoxId>,
    pub directives: Directives,
    pub flags: ContextFlags,
    /// Index of the scope holding `var`s in `ParserState::scopes`.
    pub var_scope: usize,
    /// Index of the parameter scope, for functions.
    pub function_scope: Option<usize>,
    pub named_lambda_scope: Option<usize>,
    /// Number of scopes below this context's first scope.
    pub scope_base: usize,
    pub statements: Vec<ParseStatement>,
    pub positional_formals: Vec<Atom>,
    /// Syntax mode: summaries of nested functions, in source order.
    pub inner_functions: Vec<LazyFunctionSummary>,
    /// Syntax mode: closed-over names per exited scope.
    pub closed_over_bindings_for_lazy: Vec<Option<Atom>>,
    /// Names referenced in this function or its nested functions.
    pub free_names: Vec<Atom>,
    free_name_set: FxHashSet<Atom>,
}

impl ParseContext {
    pub fn new(
        kind: ContextKind,
        script_id: u32,
        function_box: Option<FunctionBoxId>,
        directives: Directives,
        flags: ContextFlags,
        scope_base: usize,
    ) -> Self {
        ParseContext {
            kind,
            script_id,
            function_box,
            directives,
            flags,
            var_scope: scope_base,
            function_scope: None,
            named_lambda_scope: None,
            scope_base,
            statements: Vec::new(),
            positional_formals: Vec::new(),
            inner_functions: Vec::new(),
            closed_over_bindings_for_lazy: Vec::new(),
            free_names: Vec::new(),
            free_name_set: FxHashSet::default(),
        }
    }

    #[inline]
    pub fn strict(&self) -> bool {
        self.directives.strict
    }

    #[inline]
    pub fn has(&self, flag: ContextFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_function(&self) -> bool {
        self.kind == ContextKind::Function
    }

    pub fn is_module(&self) -> bool {
        self.kind == ContextKind::Module
    }

    pub fn yield_is_keyword(&self) -> bool {
        self.has(ContextFlags::YIELD_IS_KEYWORD)
    }

    pub fn await_is_keyword(&self) -> bool {
        self.has(ContextFlags::AWAIT_IS_KEYWORD)
    }

    pub fn in_formal_parameters(&self) -> bool {
        self.has(ContextFlags::IN_FORMAL_PARAMETERS)
    }

    /// Record a referenced name once.
    pub fn note_free_name(&mut self, name: Atom) {
        if self.free_name_set.insert(name) {
            self.free_names.push(name);
        }
    }

    pub fn free_names_len(&self) -> usize {
        self.free_names.len()
    }

    pub fn truncate_free_names(&mut self, len: usize) {
        for name in self.free_names.drain(len..) {
            self.free_name_set.remove(&name);
        }
    }

    // =========================================================================
    // Statement stack
    // =========================================================================

    pub fn push_statement(&mut self, kind: StatementKind, label: Option<Atom>) {
        self.statements.push(ParseStatement { kind, label });
    }

    pub fn pop_statement(&mut self) {
        self.statements.pop();
    }

    pub fn innermost_statement(&self) -> Option<&ParseStatement> {
        self.statements.last()
    }

    pub fn find_innermost_statement(
        &self,
        predicate: impl Fn(&ParseStatement) -> bool,
    ) -> Option<&ParseStatement> {
        self.statements.iter().rev().find(|stmt| predicate(stmt))
    }

    pub fn has_label(&self, label: Atom) -> bool {
        self.statements
            .iter()
            .any(|stmt| stmt.kind == StatementKind::Label && stmt.label == Some(label))
    }

    /// Whether the statement labelled `label` is a loop (labels directly
    /// stacked on a loop all denote it).
    pub fn label_denotes_loop(&self, label: Atom) -> bool {
        let Some(index) = self
            .statements
            .iter()
            .rposition(|stmt| stmt.kind == StatementKind::Label && stmt.label == Some(label))
        else {
            return false;
        };
        self.statements[index + 1..]
            .iter()
            .find(|stmt| stmt.kind != StatementKind::Label)
            .is_some_and(|stmt| stmt.kind.is_loop())
    }

    pub fn in_loop(&self) -> bool {
        self.statements.iter().any(|stmt| stmt.kind.is_loop())
    }

    pub fn in_breakable(&self) -> bool {
        self.statements
            .iter()
            .any(|stmt| stmt.kind.is_loop() || stmt.kind == StatementKind::Switch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_denotes_loop_through_nested_labels() {
        let mut ctx = ParseContext::new(
            ContextKind::Global,
            1,
            None,
            Directives::default(),
            ContextFlags::empty(),
            0,
        );
        ctx.push_statement(StatementKind::Label, Some(Atom(70)));
        ctx.push_statement(StatementKind::Label, Some(Atom(71)));
        ctx.push_statement(StatementKind::WhileLoop, None);
        assert!(ctx.label_denotes_loop(Atom(70)));
        assert!(ctx.label_denotes_loop(Atom(71)));
        assert!(!ctx.label_denotes_loop(Atom(72)));
        ctx.pop_statement();
        ctx.push_statement(StatementKind::Block, None);
        assert!(!ctx.label_denotes_loop(Atom(70)));
        assert!(ctx.has_label(Atom(70)));
    }
}
