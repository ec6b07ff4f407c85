//! Syntax tree node definitions.
//!
//! A node is a `ParseNodeKind`, a source span, a few flags and a `NodeData`
//! payload. The payload shape (arity) is fixed per kind:
//!
//! - Statements that hold a sequence (`StatementList`, declaration lists,
//!   `Switch` cases, argument lists, array/object literals, binary operator
//!   chains) use `NodeData::List`.
//! - `If`, `ForHead`, `Try`, `Conditional` and `Class` use `NodeData::Ternary`;
//!   `ForIn`, `ForOf` and `For` are binary.
//! - Property access `a.b`, labelled statements and `break`/`continue` with a
//!   label use `NodeData::NameKid`.
//! - Functions point at their `FunctionBox`; lexical scopes and module bodies
//!   point at their finalized binding table.

use bitflags::bitflags;
use jsfront_common::{Atom, Span};
use jsfront_scanner::TokenKind;
use serde::Serialize;

use super::base::{NodeIndex, NodeList};
use crate::function_box::FunctionBoxId;
use crate::scope::bindings::ScopeBindingsId;

// =============================================================================
// Node kinds
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ParseNodeKind {
    // Statements
    StatementList,
    EmptyStatement,
    ExpressionStatement,
    If,
    While,
    DoWhile,
    For,
    /// `init; cond; update` head of a C-style `for`.
    ForHead,
    ForIn,
    ForOf,
    Switch,
    Case,
    Try,
    Catch,
    Break,
    Continue,
    Return,
    Throw,
    With,
    Label,
    Debugger,
    VarStmt,
    LetDecl,
    ConstDecl,
    LexicalScope,

    // Modules
    Module,
    Import,
    ImportSpecList,
    ImportSpec,
    ImportNamespaceSpec,
    ExportStmt,
    ExportFrom,
    ExportDefault,
    ExportSpecList,
    ExportSpec,
    ExportNamespaceSpec,
    ExportBatchSpec,

    // Functions and classes
    Function,
    ParamsBody,
    Class,
    ClassNames,
    ClassMemberList,
    ClassMethod,
    ClassField,
    StaticClassBlock,

    // Leaves
    Name,
    PrivateName,
    Number,
    BigInt,
    String,
    TemplateString,
    RegExp,
    True,
    False,
    Null,
    RawUndefined,
    This,

    // Literals with children
    TemplateStringList,
    TaggedTemplate,
    CallSiteObj,
    Array,
    Object,
    PropertyDefinition,
    Shorthand,
    MutateProto,
    ComputedName,
    Spread,
    Elision,

    // Member, call and new
    Dot,
    Elem,
    PrivateMember,
    OptionalChain,
    OptionalDot,
    OptionalElem,
    OptionalPrivateMember,
    OptionalCall,
    Call,
    Arguments,
    SuperCall,
    SuperBase,
    New,
    NewTarget,
    ImportMeta,
    CallImport,

    // Unary
    TypeOfName,
    TypeOfExpr,
    Void,
    Not,
    BitNot,
    Pos,
    Neg,
    DeleteName,
    DeleteProp,
    DeleteElem,
    DeleteOptionalChain,
    DeleteExpr,
    PreIncrement,
    PostIncrement,
    PreDecrement,
    PostDecrement,
    Await,
    Yield,
    YieldStar,

    // Binary operator chains, precedence-table order
    Coalesce,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    StrictEq,
    Eq,
    StrictNe,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    InstanceOf,
    In,
    Lsh,
    Rsh,
    Ursh,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Comma,

    Conditional,

    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    CoalesceAssign,
    OrAssign,
    AndAssign,
    BitOrAssign,
    BitXorAssign,
    BitAndAssign,
    LshAssign,
    RshAssign,
    UrshAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,

    // Legacy comprehensions
    ArrayComp,
    GenExp,
    ComprehensionFor,
    ComprehensionIf,
}

impl ParseNodeKind {
    /// Node kind of a binary operator token.
    pub fn from_binary_op(kind: TokenKind) -> Option<ParseNodeKind> {
        use ParseNodeKind as P;
        let pnk = match kind {
            TokenKind::Coalesce => P::Coalesce,
            TokenKind::Or => P::Or,
            TokenKind::And => P::And,
            TokenKind::BitOr => P::BitOr,
            TokenKind::BitXor => P::BitXor,
            TokenKind::BitAnd => P::BitAnd,
            TokenKind::StrictEq => P::StrictEq,
            TokenKind::Eq => P::Eq,
            TokenKind::StrictNe => P::StrictNe,
            TokenKind::Ne => P::Ne,
            TokenKind::Lt => P::Lt,
            TokenKind::Le => P::Le,
            TokenKind::Gt => P::Gt,
            TokenKind::Ge => P::Ge,
            TokenKind::InstanceOf => P::InstanceOf,
            TokenKind::In => P::In,
            TokenKind::Lsh => P::Lsh,
            TokenKind::Rsh => P::Rsh,
            TokenKind::Ursh => P::Ursh,
            TokenKind::Add => P::Add,
            TokenKind::Sub => P::Sub,
            TokenKind::Mul => P::Mul,
            TokenKind::Div => P::Div,
            TokenKind::Mod => P::Mod,
            TokenKind::Pow => P::Pow,
            _ => return None,
        };
        Some(pnk)
    }

    /// Node kind of an assignment operator token.
    pub fn from_assignment_op(kind: TokenKind) -> Option<ParseNodeKind> {
        use ParseNodeKind as P;
        let pnk = match kind {
            TokenKind::Assign => P::Assign,
            TokenKind::AddAssign => P::AddAssign,
            TokenKind::SubAssign => P::SubAssign,
            TokenKind::CoalesceAssign => P::CoalesceAssign,
            TokenKind::OrAssign => P::OrAssign,
            TokenKind::AndAssign => P::AndAssign,
            TokenKind::BitOrAssign => P::BitOrAssign,
            TokenKind::BitXorAssign => P::BitXorAssign,
            TokenKind::BitAndAssign => P::BitAndAssign,
            TokenKind::LshAssign => P::LshAssign,
            TokenKind::RshAssign => P::RshAssign,
            TokenKind::UrshAssign => P::UrshAssign,
            TokenKind::MulAssign => P::MulAssign,
            TokenKind::DivAssign => P::DivAssign,
            TokenKind::ModAssign => P::ModAssign,
            TokenKind::PowAssign => P::PowAssign,
            _ => return None,
        };
        Some(pnk)
    }

    pub fn is_assignment(self) -> bool {
        (self as u16) >= (ParseNodeKind::Assign as u16) && (self as u16) <= (ParseNodeKind::PowAssign as u16)
    }

    /// Binary operator list kinds (excluding `Comma`).
    pub fn is_binary_operator(self) -> bool {
        (self as u16) >= (ParseNodeKind::Coalesce as u16) && (self as u16) <= (ParseNodeKind::Pow as u16)
    }

    pub fn is_loop(self) -> bool {
        matches!(self, ParseNodeKind::While | ParseNodeKind::DoWhile | ParseNodeKind::For)
    }

    pub fn is_property_access(self) -> bool {
        matches!(self, ParseNodeKind::Dot | ParseNodeKind::Elem | ParseNodeKind::PrivateMember)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            ParseNodeKind::Number
                | ParseNodeKind::BigInt
                | ParseNodeKind::String
                | ParseNodeKind::TemplateString
                | ParseNodeKind::True
                | ParseNodeKind::False
                | ParseNodeKind::Null
                | ParseNodeKind::RawUndefined
        )
    }
}

// =============================================================================
// Nodes
// =============================================================================

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u16 {
        /// Expression was written inside parentheses.
        const PARENTHESIZED = 1 << 0;
        /// Expression statement belongs to a directive prologue.
        const DIRECTIVE = 1 << 1;
        /// Class member is `static`.
        const STATIC = 1 << 2;
        /// Property or class member is a getter.
        const GETTER = 1 << 3;
        /// Property or class member is a setter.
        const SETTER = 1 << 4;
        /// Object literal property written as a method.
        const METHOD = 1 << 5;
        /// `for await (... of ...)`.
        const AWAIT = 1 << 6;
        /// Function node whose body was skipped (lazy).
        const LAZY = 1 << 7;
        /// Array/object literal or call argument list with a trailing comma.
        const TRAILING_COMMA = 1 << 8;
        /// Statement hoisted to the enclosing scope (function declaration).
        const HOISTED = 1 << 9;
    }
}

impl Serialize for NodeFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

/// Node payload.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum NodeData {
    Nullary,
    Unary(NodeIndex),
    Binary {
        left: NodeIndex,
        right: NodeIndex,
    },
    Ternary {
        first: NodeIndex,
        second: NodeIndex,
        third: NodeIndex,
    },
    List(NodeList),
    Name(Atom),
    /// A name together with a child: `a.b` (kid `a`), `label: stmt`.
    NameKid {
        name: Atom,
        kid: NodeIndex,
    },
    Number(f64),
    BigInt(Atom),
    String(Atom),
    Template {
        cooked: Option<Atom>,
        raw: Atom,
    },
    RegExp {
        pattern: Atom,
        flags: Atom,
    },
    Function {
        funbox: FunctionBoxId,
        /// `ParamsBody` list, or `NONE` for a lazily skipped body.
        body: NodeIndex,
    },
    Scope {
        bindings: Option<ScopeBindingsId>,
        body: NodeIndex,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Node {
    pub kind: ParseNodeKind,
    pub span: Span,
    pub flags: NodeFlags,
    pub data: NodeData,
}

impl Node {
    pub fn new(kind: ParseNodeKind, span: Span, data: NodeData) -> Self {
        Node {
            kind,
            span,
            flags: NodeFlags::empty(),
            data,
        }
    }

    #[inline]
    pub fn is_parenthesized(&self) -> bool {
        self.flags.contains(NodeFlags::PARENTHESIZED)
    }
}

// =============================================================================
// Arena
// =============================================================================

/// Owner of every node produced by one top-level parse.
///
/// Creation methods live in `node_arena.rs`, accessors in `node_access.rs`.
#[derive(Clone, Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}
