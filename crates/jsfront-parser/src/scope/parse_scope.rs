//! Scopes live during parsing.

use indexmap::IndexMap;
use jsfront_common::Atom;
use rustc_hash::FxBuildHasher;
use serde::Serialize;
use smallvec::SmallVec;

use super::declaration_kind::DeclarationKind;
use crate::function_box::FunctionBoxId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ScopeKind {
    Global,
    Module,
    Eval,
    /// Parameters (and the body when there are no parameter expressions).
    Function,
    /// Function body split from the parameters by parameter expressions.
    FunctionBodyVar,
    /// Block, catch, class body, `for` head or `switch` body.
    Lexical,
    /// Binding of a named function expression's own name.
    NamedLambda,
}

/// What a scope knows about one declared name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DeclaredNameInfo {
    pub kind: DeclarationKind,
    /// Offset of the first declaration.
    pub pos: u32,
    pub closed_over: bool,
}

impl DeclaredNameInfo {
    pub fn new(kind: DeclarationKind, pos: u32) -> Self {
        DeclaredNameInfo {
            kind,
            pos,
            closed_over: false,
        }
    }

    pub fn alter_kind(&mut self, kind: DeclarationKind) {
        self.kind = kind;
    }
}

pub type DeclaredNameMap = IndexMap<Atom, DeclaredNameInfo, FxBuildHasher>;

#[derive(Clone, Debug)]
pub struct ParseScope {
    /// Used-name tracker scope id.
    pub id: u32,
    pub kind: ScopeKind,
    pub declared: DeclaredNameMap,
    /// Sloppy block functions that may still get a hoisted var.
    pub possible_annex_b_function_boxes: SmallVec<[FunctionBoxId; 2]>,
}

impl ParseScope {
    pub fn new(id: u32, kind: ScopeKind) -> Self {
        ParseScope {
            id,
            kind,
            declared: DeclaredNameMap::default(),
            possible_annex_b_function_boxes: SmallVec::new(),
        }
    }

    pub fn lookup(&self, name: Atom) -> Option<&DeclaredNameInfo> {
        self.declared.get(&name)
    }

    pub fn lookup_mut(&mut self, name: Atom) -> Option<&mut DeclaredNameInfo> {
        self.declared.get_mut(&name)
    }

    pub fn add_declared_name(&mut self, name: Atom, kind: DeclarationKind, pos: u32) {
        self.declared.insert(name, DeclaredNameInfo::new(kind, pos));
    }

    pub fn remove_declared_name(&mut self, name: Atom) {
        self.declared.shift_remove(&name);
    }

    pub fn add_possible_annex_b_function_box(&mut self, funbox: FunctionBoxId) {
        if !self.possible_annex_b_function_boxes.contains(&funbox) {
            self.possible_annex_b_function_boxes.push(funbox);
        }
    }

    /// Names the closed-over analysis visits when this scope closes: every
    /// binding of a var-holding scope, only lexical bindings otherwise.
    pub fn binding_names(&self, is_var_scope: bool) -> Vec<Atom> {
        self.declared
            .iter()
            .filter(|(_, info)| is_var_scope || !info.kind.is_var())
            .map(|(name, _)| *name)
            .collect()
    }

    pub fn is_var_holding(&self) -> bool {
        !matches!(self.kind, ScopeKind::Lexical | ScopeKind::NamedLambda)
    }
}
