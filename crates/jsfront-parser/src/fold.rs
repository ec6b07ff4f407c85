//! Constant folding.
//!
//! Rewrites a finished subtree in place. Only expressions whose operands are
//! literals are folded, and only where the result is exactly what evaluation
//! would produce. A folded node keeps its index, so parents need no update.

use jsfront_common::{Atom, Interner, Span};
use jsfront_scanner::char_codes::{is_id_continue, is_id_start};

use crate::parser::base::NodeIndex;
use crate::parser::node::{Node, NodeArena, NodeData, NodeFlags, ParseNodeKind};

/// Fold every constant expression below `root`.
pub fn fold(arena: &mut NodeArena, root: NodeIndex, interner: &mut Interner) {
    let mut folder = Folder { arena, interner };
    folder.fold_node(root);
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Constant {
    Number(f64),
    String(Atom),
    Bool(bool),
    Null,
    Undefined,
}

impl Constant {
    fn truthy(self, interner: &Interner) -> bool {
        match self {
            Constant::Number(value) => value != 0.0 && !value.is_nan(),
            Constant::String(atom) => !interner.resolve(atom).is_empty(),
            Constant::Bool(value) => value,
            Constant::Null | Constant::Undefined => false,
        }
    }

    fn is_nullish(self) -> bool {
        matches!(self, Constant::Null | Constant::Undefined)
    }

    fn type_name(self) -> &'static str {
        match self {
            Constant::Number(_) => "number",
            Constant::String(_) => "string",
            Constant::Bool(_) => "boolean",
            Constant::Null => "object",
            Constant::Undefined => "undefined",
        }
    }
}

fn to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let wrapped = value.trunc() % 4_294_967_296.0;
    wrapped as i64 as u32 as i32
}

fn to_uint32(value: f64) -> u32 {
    to_int32(value) as u32
}

fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Numeric result of `left <op> right`, for the operators folded on numbers.
fn fold_numbers(kind: ParseNodeKind, left: f64, right: f64) -> Option<f64> {
    let shift = to_uint32(right) & 31;
    let value = match kind {
        ParseNodeKind::Add => left + right,
        ParseNodeKind::Sub => left - right,
        ParseNodeKind::Mul => left * right,
        ParseNodeKind::Div => left / right,
        ParseNodeKind::Mod => left % right,
        ParseNodeKind::Pow => pow(left, right),
        ParseNodeKind::Lsh => f64::from(to_int32(left).wrapping_shl(shift)),
        ParseNodeKind::Rsh => f64::from(to_int32(left) >> shift),
        ParseNodeKind::Ursh => f64::from(to_uint32(left) >> shift),
        ParseNodeKind::BitAnd => f64::from(to_int32(left) & to_int32(right)),
        ParseNodeKind::BitOr => f64::from(to_int32(left) | to_int32(right)),
        ParseNodeKind::BitXor => f64::from(to_int32(left) ^ to_int32(right)),
        _ => return None,
    };
    Some(value)
}

/// Whether `text` can follow a `.` as a property name.
fn is_identifier_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_id_start(first) => chars.all(is_id_continue),
        _ => false,
    }
}

struct Folder<'a> {
    arena: &'a mut NodeArena,
    interner: &'a mut Interner,
}

impl Folder<'_> {
    fn fold_node(&mut self, index: NodeIndex) {
        let Some(node) = self.arena.get(index) else {
            return;
        };
        if node.flags.contains(NodeFlags::DIRECTIVE) {
            return;
        }
        for kid in self.arena.children(index) {
            self.fold_node(kid);
        }

        let Some(kind) = self.arena.kind(index) else {
            return;
        };
        match kind {
            ParseNodeKind::Add
            | ParseNodeKind::Sub
            | ParseNodeKind::Mul
            | ParseNodeKind::Div
            | ParseNodeKind::Mod
            | ParseNodeKind::Pow
            | ParseNodeKind::Lsh
            | ParseNodeKind::Rsh
            | ParseNodeKind::Ursh
            | ParseNodeKind::BitAnd
            | ParseNodeKind::BitOr
            | ParseNodeKind::BitXor => self.fold_arithmetic(index, kind),
            ParseNodeKind::Or | ParseNodeKind::And | ParseNodeKind::Coalesce => self.fold_logical(index, kind),
            ParseNodeKind::Not
            | ParseNodeKind::Neg
            | ParseNodeKind::Pos
            | ParseNodeKind::BitNot
            | ParseNodeKind::TypeOfExpr
            | ParseNodeKind::Void => self.fold_unary(index, kind),
            ParseNodeKind::Conditional => self.fold_conditional(index),
            ParseNodeKind::If => self.fold_if(index),
            ParseNodeKind::Elem => self.fold_element(index),
            _ => {}
        }
    }

    fn constant(&self, index: NodeIndex) -> Option<Constant> {
        let node = self.arena.get(index)?;
        match (node.kind, &node.data) {
            (ParseNodeKind::Number, NodeData::Number(value)) => Some(Constant::Number(*value)),
            (ParseNodeKind::String, NodeData::String(atom)) => Some(Constant::String(*atom)),
            (ParseNodeKind::True, _) => Some(Constant::Bool(true)),
            (ParseNodeKind::False, _) => Some(Constant::Bool(false)),
            (ParseNodeKind::Null, _) => Some(Constant::Null),
            (ParseNodeKind::RawUndefined, _) => Some(Constant::Undefined),
            _ => None,
        }
    }

    /// Overwrite `index` with `replacement`, keeping its parentheses.
    fn replace(&mut self, index: NodeIndex, mut replacement: Node) {
        let parenthesized = self.arena.flags(index) & NodeFlags::PARENTHESIZED;
        replacement.flags |= parenthesized;
        self.arena.replace(index, replacement);
    }

    fn replace_with_constant(&mut self, index: NodeIndex, value: Constant) {
        let span = self.arena.span(index);
        let node = constant_node(value, span);
        self.replace(index, node);
    }

    /// Overwrite `index` with a copy of the node at `with`.
    fn replace_with_node(&mut self, index: NodeIndex, with: NodeIndex) {
        let Some(node) = self.arena.get(with).cloned() else {
            return;
        };
        self.replace(index, node);
    }

    fn combine(&mut self, kind: ParseNodeKind, left: Constant, right: Constant) -> Option<Constant> {
        match (left, right) {
            (Constant::Number(l), Constant::Number(r)) => fold_numbers(kind, l, r).map(Constant::Number),
            (Constant::String(l), Constant::String(r)) if kind == ParseNodeKind::Add => {
                let text = format!("{}{}", self.interner.resolve(l), self.interner.resolve(r));
                Some(Constant::String(self.interner.intern_owned(text)))
            }
            _ => None,
        }
    }

    /// Fold the longest constant prefix of a left-associative chain.
    fn fold_arithmetic(&mut self, index: NodeIndex, kind: ParseNodeKind) {
        let kids = self.arena.list_children(index).to_vec();
        let Some(mut acc) = kids.first().and_then(|kid| self.constant(*kid)) else {
            return;
        };
        let mut folded = 1;
        for kid in &kids[1..] {
            let Some(next) = self.constant(*kid) else {
                break;
            };
            let Some(value) = self.combine(kind, acc, next) else {
                break;
            };
            acc = value;
            folded += 1;
        }
        if folded == kids.len() {
            self.replace_with_constant(index, acc);
            return;
        }
        if folded < 2 {
            return;
        }
        let prefix_span = self.arena.span(kids[0]).to(self.arena.span(kids[folded - 1]));
        let prefix = constant_node(acc, prefix_span);
        let prefix = self.arena.add(prefix);
        let mut rest = vec![prefix];
        rest.extend_from_slice(&kids[folded..]);
        if let Some(node) = self.arena.get_mut(index) {
            if let NodeData::List(list) = &mut node.data {
                list.nodes = rest;
            }
        }
    }

    /// `||`, `&&` and `??` with constant left operands.
    fn fold_logical(&mut self, index: NodeIndex, kind: ParseNodeKind) {
        let kids = self.arena.list_children(index).to_vec();
        if kids.len() < 2 {
            return;
        }
        let mut start = 0;
        while start < kids.len() - 1 {
            let Some(value) = self.constant(kids[start]) else {
                break;
            };
            let short_circuits = match kind {
                ParseNodeKind::Or => value.truthy(self.interner),
                ParseNodeKind::And => !value.truthy(self.interner),
                _ => !value.is_nullish(),
            };
            if short_circuits {
                self.replace_with_node(index, kids[start]);
                return;
            }
            start += 1;
        }
        if start == 0 {
            return;
        }
        if start == kids.len() - 1 {
            self.replace_with_node(index, kids[start]);
            return;
        }
        if let Some(node) = self.arena.get_mut(index) {
            if let NodeData::List(list) = &mut node.data {
                list.nodes = kids[start..].to_vec();
            }
        }
    }

    fn fold_unary(&mut self, index: NodeIndex, kind: ParseNodeKind) {
        let Some(operand) = self.arena.get_unary(index) else {
            return;
        };
        let Some(value) = self.constant(operand) else {
            return;
        };
        let result = match (kind, value) {
            (ParseNodeKind::Not, value) => Constant::Bool(!value.truthy(self.interner)),
            (ParseNodeKind::Neg, Constant::Number(n)) => Constant::Number(-n),
            (ParseNodeKind::Pos, Constant::Number(n)) => Constant::Number(n),
            (ParseNodeKind::BitNot, Constant::Number(n)) => Constant::Number(f64::from(!to_int32(n))),
            (ParseNodeKind::TypeOfExpr, value) => Constant::String(self.interner.intern(value.type_name())),
            (ParseNodeKind::Void, _) => Constant::Undefined,
            _ => return,
        };
        self.replace_with_constant(index, result);
    }

    fn fold_conditional(&mut self, index: NodeIndex) {
        let Some((condition, then_expr, else_expr)) = self.arena.get_ternary(index) else {
            return;
        };
        let Some(value) = self.constant(condition) else {
            return;
        };
        let chosen = if value.truthy(self.interner) { then_expr } else { else_expr };
        self.replace_with_node(index, chosen);
    }

    fn fold_if(&mut self, index: NodeIndex) {
        let Some((condition, then_branch, else_branch)) = self.arena.get_ternary(index) else {
            return;
        };
        let Some(value) = self.constant(condition) else {
            return;
        };
        let (kept, dropped) = if value.truthy(self.interner) {
            (then_branch, else_branch)
        } else {
            (else_branch, then_branch)
        };
        if dropped.is_some() && self.has_hoisted_declaration(dropped, true) {
            return;
        }
        if kept.is_some() {
            self.replace_with_node(index, kept);
        } else {
            let span = self.arena.span(index);
            self.arena.replace(index, empty_statement(span));
        }
    }

    /// Whether removing `index` would remove a `var` or a function
    /// declaration visible outside it.
    fn has_hoisted_declaration(&self, index: NodeIndex, statement_position: bool) -> bool {
        let Some(node) = self.arena.get(index) else {
            return false;
        };
        match node.kind {
            ParseNodeKind::VarStmt => return true,
            ParseNodeKind::Function => return statement_position || node.flags.contains(NodeFlags::HOISTED),
            ParseNodeKind::Class => return false,
            _ => {}
        }
        let kids_are_statements = matches!(
            node.kind,
            ParseNodeKind::StatementList
                | ParseNodeKind::LexicalScope
                | ParseNodeKind::If
                | ParseNodeKind::Label
                | ParseNodeKind::While
                | ParseNodeKind::DoWhile
                | ParseNodeKind::For
                | ParseNodeKind::Case
                | ParseNodeKind::With
        );
        self.arena
            .children(index)
            .into_iter()
            .any(|kid| self.has_hoisted_declaration(kid, kids_are_statements))
    }

    /// `a["name"]` to `a.name`.
    fn fold_element(&mut self, index: NodeIndex) {
        let Some((object, key)) = self.arena.get_binary(index) else {
            return;
        };
        let Some(Constant::String(atom)) = self.constant(key) else {
            return;
        };
        if !is_identifier_name(self.interner.resolve(atom)) {
            return;
        }
        let Some(node) = self.arena.get(index) else {
            return;
        };
        let dot = Node {
            kind: ParseNodeKind::Dot,
            span: node.span,
            flags: node.flags,
            data: NodeData::NameKid { name: atom, kid: object },
        };
        self.arena.replace(index, dot);
    }
}

fn constant_node(value: Constant, span: Span) -> Node {
    let (kind, data) = match value {
        Constant::Number(value) => (ParseNodeKind::Number, NodeData::Number(value)),
        Constant::String(atom) => (ParseNodeKind::String, NodeData::String(atom)),
        Constant::Bool(true) => (ParseNodeKind::True, NodeData::Nullary),
        Constant::Bool(false) => (ParseNodeKind::False, NodeData::Nullary),
        Constant::Null => (ParseNodeKind::Null, NodeData::Nullary),
        Constant::Undefined => (ParseNodeKind::RawUndefined, NodeData::Nullary),
    };
    Node::new(kind, span, data)
}

fn empty_statement(span: Span) -> Node {
    Node::new(ParseNodeKind::EmptyStatement, span, NodeData::Nullary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int32_conversions() {
        assert_eq!(to_int32(4_294_967_297.0), 1);
        assert_eq!(to_int32(-1.0), -1);
        assert_eq!(to_int32(f64::NAN), 0);
        assert_eq!(to_uint32(-1.0), u32::MAX);
        assert_eq!(fold_numbers(ParseNodeKind::Ursh, -1.0, 0.0), Some(4_294_967_295.0));
        assert_eq!(fold_numbers(ParseNodeKind::Lsh, 1.0, 33.0), Some(2.0));
    }

    #[test]
    fn test_pow_edge_cases() {
        assert!(pow(1.0, f64::NAN).is_nan());
        assert!(pow(-1.0, f64::INFINITY).is_nan());
        assert_eq!(pow(2.0, 10.0), 1024.0);
    }

    #[test]
    fn test_identifier_name_check() {
        assert!(is_identifier_name("foo"));
        assert!(is_identifier_name("$_x1"));
        assert!(is_identifier_name("class"));
        assert!(!is_identifier_name("0"));
        assert!(!is_identifier_name("a-b"));
        assert!(!is_identifier_name(""));
    }
}
