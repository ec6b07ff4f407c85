//! Per-function metadata collected while a function is parsed.

use bitflags::bitflags;
use jsfront_common::{Atom, Span};
use serde::Serialize;

use crate::scope::bindings::ScopeBindingsId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct FunctionBoxId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum FunctionSyntaxKind {
    Statement,
    Expression,
    Arrow,
    Method,
    ClassConstructor,
    DerivedClassConstructor,
    Getter,
    Setter,
    FieldInitializer,
    StaticClassBlock,
    ComprehensionLambda,
}

impl FunctionSyntaxKind {
    pub fn is_arrow(self) -> bool {
        self == FunctionSyntaxKind::Arrow
    }

    pub fn is_method_like(self) -> bool {
        matches!(
            self,
            FunctionSyntaxKind::Method
                | FunctionSyntaxKind::ClassConstructor
                | FunctionSyntaxKind::DerivedClassConstructor
                | FunctionSyntaxKind::Getter
                | FunctionSyntaxKind::Setter
                | FunctionSyntaxKind::FieldInitializer
                | FunctionSyntaxKind::StaticClassBlock
        )
    }

    pub fn is_constructor(self) -> bool {
        matches!(
            self,
            FunctionSyntaxKind::ClassConstructor | FunctionSyntaxKind::DerivedClassConstructor
        )
    }

    /// Arrows, methods and accessors reject duplicate parameters even in
    /// sloppy code.
    pub fn disallows_duplicate_params(self) -> bool {
        self.is_arrow() || self.is_method_like()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum GeneratorKind {
    #[default]
    NotGenerator,
    Generator,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum AsyncKind {
    #[default]
    SyncFunction,
    AsyncFunction,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FunctionFlags: u32 {
        const STRICT = 1 << 0;
        /// The body's directive prologue contains `"use strict"`.
        const HAS_USE_STRICT = 1 << 1;
        const USE_ASM = 1 << 2;
        const HAS_SIMPLE_PARAMETER_LIST = 1 << 3;
        const HAS_PARAMETER_EXPRS = 1 << 4;
        const HAS_DUPLICATE_PARAMETERS = 1 << 5;
        const HAS_REST = 1 << 6;
        const USES_ARGUMENTS = 1 << 7;
        const USES_THIS = 1 << 8;
        const HAS_DIRECT_EVAL = 1 << 9;
        const HAS_DEBUGGER_STATEMENT = 1 << 10;
        const USES_SUPER_PROPERTY = 1 << 11;
        const USES_NEW_TARGET = 1 << 12;
        /// A sloppy block function that got its hoisted var.
        const IS_ANNEX_B = 1 << 13;
        /// `function(){ return f.apply(this, arguments); }` style wrapper.
        const IS_LIKELY_CONSTRUCTOR_WRAPPER = 1 << 14;
        /// Contains `with` or direct `eval`, here or in a nested function.
        const BINDINGS_ACCESSED_DYNAMICALLY = 1 << 15;
        /// Parsed by the syntax-only parser; its body is summarized.
        const IS_LAZY = 1 << 16;
        /// Has its own `arguments` binding.
        const NEEDS_ARGUMENTS_OBJECT = 1 << 17;
    }
}

impl FunctionFlags {
    /// Flags that flow from a nested function to the functions around it.
    pub const TRANSITIVE: FunctionFlags = FunctionFlags::HAS_DIRECT_EVAL
        .union(FunctionFlags::HAS_DEBUGGER_STATEMENT)
        .union(FunctionFlags::BINDINGS_ACCESSED_DYNAMICALLY);
}

impl Serialize for FunctionFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

/// Source extent of a function.
///
/// `start..end` covers the parameters through the closing brace (or the end
/// of an arrow's concise body) and is what the skipper jumps over.
/// `to_string_start..to_string_end` is the text `Function.prototype.toString`
/// reports, starting at `function`, `async`, the method name or the arrow's
/// parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceExtent {
    pub start: u32,
    pub end: u32,
    pub to_string_start: u32,
    pub to_string_end: u32,
}

impl SourceExtent {
    pub fn span(&self) -> Span {
        Span::new(self.to_string_start, self.to_string_end)
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct FunctionBox {
    pub id: FunctionBoxId,
    /// Explicit name, `None` for anonymous functions.
    pub name: Option<Atom>,
    pub kind: FunctionSyntaxKind,
    pub generator_kind: GeneratorKind,
    pub async_kind: AsyncKind,
    pub flags: FunctionFlags,
    /// Formal parameter count before the first default or rest parameter.
    pub length: u32,
    pub extent: SourceExtent,
    pub enclosing: Option<FunctionBoxId>,
    pub function_bindings: Option<ScopeBindingsId>,
    pub var_bindings: Option<ScopeBindingsId>,
    pub named_lambda_bindings: Option<ScopeBindingsId>,
    /// Index into `ParseOutput::summaries` when the body was syntax parsed.
    pub lazy_summary: Option<usize>,
}

impl FunctionBox {
    pub fn new(
        id: FunctionBoxId,
        name: Option<Atom>,
        kind: FunctionSyntaxKind,
        generator_kind: GeneratorKind,
        async_kind: AsyncKind,
        enclosing: Option<FunctionBoxId>,
        to_string_start: u32,
    ) -> Self {
        FunctionBox {
            id,
            name,
            kind,
            generator_kind,
            async_kind,
            flags: FunctionFlags::HAS_SIMPLE_PARAMETER_LIST,
            length: 0,
            extent: SourceExtent {
                to_string_start,
                ..SourceExtent::default()
            },
            enclosing,
            function_bindings: None,
            var_bindings: None,
            named_lambda_bindings: None,
            lazy_summary: None,
        }
    }

    #[inline]
    pub fn is_generator(&self) -> bool {
        self.generator_kind == GeneratorKind::Generator
    }

    #[inline]
    pub fn is_async(&self) -> bool {
        self.async_kind == AsyncKind::AsyncFunction
    }

    #[inline]
    pub fn is_arrow(&self) -> bool {
        self.kind.is_arrow()
    }

    #[inline]
    pub fn strict(&self) -> bool {
        self.flags.contains(FunctionFlags::STRICT)
    }

    #[inline]
    pub fn has_flag(&self, flag: FunctionFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn set_flag(&mut self, flag: FunctionFlags) {
        self.flags |= flag;
    }

    pub fn has_simple_parameter_list(&self) -> bool {
        self.flags.contains(FunctionFlags::HAS_SIMPLE_PARAMETER_LIST)
    }

    /// Every binding of generators and async functions lives across
    /// suspensions, and dynamic scope access can reach any binding.
    pub fn all_bindings_closed_over(&self) -> bool {
        self.is_generator()
            || self.is_async()
            || self.flags.contains(FunctionFlags::BINDINGS_ACCESSED_DYNAMICALLY)
    }
}
