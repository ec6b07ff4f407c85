//! Finalized binding tables handed to the code generator.
//!
//! Every table stores its names in one flat vector; each category is a
//! contiguous run whose start index is recorded, so slot numbers can be
//! computed directly from the boundaries.

use jsfront_common::Atom;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeBindingsId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BindingName {
    pub name: Atom,
    pub closed_over: bool,
}

impl BindingName {
    pub fn new(name: Atom, closed_over: bool) -> Self {
        BindingName { name, closed_over }
    }
}

/// Parameters and body bindings of a function.
///
/// A positional formal whose name is shadowed by a later duplicate keeps its
/// slot with `Atom::NONE`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FunctionBindings {
    pub names: Vec<BindingName>,
    pub non_positional_formal_start: u32,
    pub var_start: u32,
    pub let_start: u32,
    pub const_start: u32,
}

impl FunctionBindings {
    pub fn positional_formals(&self) -> &[BindingName] {
        &self.names[..self.non_positional_formal_start as usize]
    }

    pub fn non_positional_formals(&self) -> &[BindingName] {
        &self.names[self.non_positional_formal_start as usize..self.var_start as usize]
    }

    pub fn vars(&self) -> &[BindingName] {
        &self.names[self.var_start as usize..self.let_start as usize]
    }

    pub fn lets(&self) -> &[BindingName] {
        &self.names[self.let_start as usize..self.const_start as usize]
    }

    pub fn consts(&self) -> &[BindingName] {
        &self.names[self.const_start as usize..]
    }
}

/// Body bindings of a function whose parameters have expressions: the
/// body gets its own var scope, which also holds the body-level lexicals.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VarBindings {
    pub names: Vec<BindingName>,
    pub let_start: u32,
    pub const_start: u32,
}

impl VarBindings {
    pub fn vars(&self) -> &[BindingName] {
        &self.names[..self.let_start as usize]
    }

    pub fn lets(&self) -> &[BindingName] {
        &self.names[self.let_start as usize..self.const_start as usize]
    }

    pub fn consts(&self) -> &[BindingName] {
        &self.names[self.const_start as usize..]
    }
}

/// Block-level bindings. Block functions, classes and catch parameters are
/// in the `let` run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LexicalBindings {
    pub names: Vec<BindingName>,
    pub const_start: u32,
}

impl LexicalBindings {
    pub fn lets(&self) -> &[BindingName] {
        &self.names[..self.const_start as usize]
    }

    pub fn consts(&self) -> &[BindingName] {
        &self.names[self.const_start as usize..]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ModuleBindings {
    pub names: Vec<BindingName>,
    pub var_start: u32,
    pub let_start: u32,
    pub const_start: u32,
}

impl ModuleBindings {
    pub fn imports(&self) -> &[BindingName] {
        &self.names[..self.var_start as usize]
    }

    pub fn vars(&self) -> &[BindingName] {
        &self.names[self.var_start as usize..self.let_start as usize]
    }

    pub fn lets(&self) -> &[BindingName] {
        &self.names[self.let_start as usize..self.const_start as usize]
    }

    pub fn consts(&self) -> &[BindingName] {
        &self.names[self.const_start as usize..]
    }
}

/// Script (and eval) top-level bindings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct GlobalBindings {
    pub names: Vec<BindingName>,
    pub var_start: u32,
    pub let_start: u32,
    pub const_start: u32,
}

impl GlobalBindings {
    pub fn functions(&self) -> &[BindingName] {
        &self.names[..self.var_start as usize]
    }

    pub fn vars(&self) -> &[BindingName] {
        &self.names[self.var_start as usize..self.let_start as usize]
    }

    pub fn lets(&self) -> &[BindingName] {
        &self.names[self.let_start as usize..self.const_start as usize]
    }

    pub fn consts(&self) -> &[BindingName] {
        &self.names[self.const_start as usize..]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ScopeBindings {
    Global(GlobalBindings),
    Eval(GlobalBindings),
    Module(ModuleBindings),
    Function(FunctionBindings),
    FunctionBodyVar(VarBindings),
    Lexical(LexicalBindings),
    NamedLambda(LexicalBindings),
}

impl ScopeBindings {
    /// Every binding in the table, in slot order.
    pub fn names(&self) -> &[BindingName] {
        match self {
            ScopeBindings::Global(b) | ScopeBindings::Eval(b) => &b.names,
            ScopeBindings::Module(b) => &b.names,
            ScopeBindings::Function(b) => &b.names,
            ScopeBindings::FunctionBodyVar(b) => &b.names,
            ScopeBindings::Lexical(b) | ScopeBindings::NamedLambda(b) => &b.names,
        }
    }

    pub fn closed_over(&self) -> impl Iterator<Item = Atom> + '_ {
        self.names()
            .iter()
            .filter(|binding| binding.closed_over && !binding.name.is_none())
            .map(|binding| binding.name)
    }

    pub fn contains(&self, name: Atom) -> bool {
        self.names().iter().any(|binding| binding.name == name)
    }
}

/// Accumulates names per category, then flattens them with boundaries.
#[derive(Debug, Default)]
pub(crate) struct BindingRuns {
    runs: [Vec<BindingName>; 5],
}

impl BindingRuns {
    pub(crate) fn push(&mut self, run: usize, binding: BindingName) {
        self.runs[run].push(binding);
    }

    /// Flat names and the start index of runs `1..5`.
    pub(crate) fn flatten(self) -> (Vec<BindingName>, [u32; 4]) {
        let mut names = Vec::with_capacity(self.runs.iter().map(Vec::len).sum());
        let mut starts = [0u32; 4];
        for (i, run) in self.runs.into_iter().enumerate() {
            if i > 0 {
                starts[i - 1] = names.len() as u32;
            }
            names.extend(run);
        }
        (names, starts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_flatten_to_boundaries() {
        let mut runs = BindingRuns::default();
        runs.push(0, BindingName::new(Atom(50), false));
        runs.push(2, BindingName::new(Atom(51), true));
        runs.push(2, BindingName::new(Atom(52), false));
        runs.push(4, BindingName::new(Atom(53), false));
        let (names, starts) = runs.flatten();
        let bindings = FunctionBindings {
            names,
            non_positional_formal_start: starts[0],
            var_start: starts[1],
            let_start: starts[2],
            const_start: starts[3],
        };
        assert_eq!(bindings.positional_formals().len(), 1);
        assert!(bindings.non_positional_formals().is_empty());
        assert_eq!(bindings.vars().len(), 2);
        assert!(bindings.lets().is_empty());
        assert_eq!(bindings.consts()[0].name, Atom(53));
        let table = ScopeBindings::Function(bindings);
        assert_eq!(table.closed_over().collect::<Vec<_>>(), vec![Atom(51)]);
    }
}
