//! Declaration kinds and the binding categories they map to.

use serde::Serialize;

/// How a name was introduced. Governs redeclaration legality and which
/// category of the finalized binding table the name lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    /// Simple parameter at a fixed position: `function f(a, b)`.
    PositionalFormalParameter,
    /// Parameter bound by a destructuring pattern or after a rest element.
    FormalParameter,
    /// Placeholder used to validate a rest pattern in a parenthesized arrow
    /// head. Declares nothing.
    CoverArrowParameter,
    Var,
    /// `var` introduced by the head of a `for (var x of ...)`.
    ForOfVar,
    Let,
    Const,
    Class,
    Import,
    BodyLevelFunction,
    ModuleBodyLevelFunction,
    /// Function declared in a block in strict code (or a generator/async
    /// function declared in a block in any code).
    LexicalFunction,
    /// Plain function declared in a block in sloppy code; candidate for the
    /// legacy var hoisting.
    SloppyLexicalFunction,
    /// The var synthesized for a hoisted sloppy block function.
    VarForAnnexBLexicalFunction,
    /// `catch (e)`
    SimpleCatchParameter,
    /// `catch ({ e })`
    CatchParameter,
}

/// Category of a finalized binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum BindingKind {
    Import,
    FormalParameter,
    Var,
    Let,
    Const,
}

impl DeclarationKind {
    pub fn is_var(self) -> bool {
        matches!(
            self,
            DeclarationKind::Var
                | DeclarationKind::ForOfVar
                | DeclarationKind::BodyLevelFunction
                | DeclarationKind::VarForAnnexBLexicalFunction
        )
    }

    pub fn is_parameter(self) -> bool {
        matches!(
            self,
            DeclarationKind::PositionalFormalParameter
                | DeclarationKind::FormalParameter
                | DeclarationKind::CoverArrowParameter
        )
    }

    pub fn is_lexical(self) -> bool {
        !self.is_var() && !self.is_parameter() && self != DeclarationKind::ModuleBodyLevelFunction
    }

    pub fn is_function(self) -> bool {
        matches!(
            self,
            DeclarationKind::BodyLevelFunction
                | DeclarationKind::ModuleBodyLevelFunction
                | DeclarationKind::LexicalFunction
                | DeclarationKind::SloppyLexicalFunction
        )
    }

    pub fn binding_kind(self) -> BindingKind {
        match self {
            DeclarationKind::PositionalFormalParameter
            | DeclarationKind::FormalParameter
            | DeclarationKind::CoverArrowParameter => BindingKind::FormalParameter,
            DeclarationKind::Var
            | DeclarationKind::ForOfVar
            | DeclarationKind::BodyLevelFunction
            | DeclarationKind::ModuleBodyLevelFunction
            | DeclarationKind::VarForAnnexBLexicalFunction => BindingKind::Var,
            DeclarationKind::Let
            | DeclarationKind::Class
            | DeclarationKind::LexicalFunction
            | DeclarationKind::SloppyLexicalFunction
            | DeclarationKind::SimpleCatchParameter
            | DeclarationKind::CatchParameter => BindingKind::Let,
            DeclarationKind::Const => BindingKind::Const,
            DeclarationKind::Import => BindingKind::Import,
        }
    }

    /// Word used in "redeclaration of <kind> <name>" diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            DeclarationKind::PositionalFormalParameter
            | DeclarationKind::FormalParameter
            | DeclarationKind::CoverArrowParameter => "formal parameter",
            DeclarationKind::Var
            | DeclarationKind::ForOfVar
            | DeclarationKind::VarForAnnexBLexicalFunction => "var",
            DeclarationKind::Let => "let",
            DeclarationKind::Const => "const",
            DeclarationKind::Class => "class",
            DeclarationKind::Import => "import",
            DeclarationKind::BodyLevelFunction
            | DeclarationKind::ModuleBodyLevelFunction
            | DeclarationKind::LexicalFunction
            | DeclarationKind::SloppyLexicalFunction => "function",
            DeclarationKind::SimpleCatchParameter | DeclarationKind::CatchParameter => {
                "catch parameter"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_partition_kinds() {
        let all = [
            DeclarationKind::PositionalFormalParameter,
            DeclarationKind::FormalParameter,
            DeclarationKind::CoverArrowParameter,
            DeclarationKind::Var,
            DeclarationKind::ForOfVar,
            DeclarationKind::Let,
            DeclarationKind::Const,
            DeclarationKind::Class,
            DeclarationKind::Import,
            DeclarationKind::BodyLevelFunction,
            DeclarationKind::LexicalFunction,
            DeclarationKind::SloppyLexicalFunction,
            DeclarationKind::VarForAnnexBLexicalFunction,
            DeclarationKind::SimpleCatchParameter,
            DeclarationKind::CatchParameter,
        ];
        for kind in all {
            let families = [kind.is_var(), kind.is_parameter(), kind.is_lexical()];
            assert_eq!(families.iter().filter(|f| **f).count(), 1, "{kind:?}");
        }
        assert!(!DeclarationKind::ModuleBodyLevelFunction.is_lexical());
        assert_eq!(DeclarationKind::SloppyLexicalFunction.binding_kind(), BindingKind::Let);
    }
}
