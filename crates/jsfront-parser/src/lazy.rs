//! Lazy function summaries.
//!
//! A syntax-parsed function keeps just enough to be skipped by a later full
//! parse of its enclosing function, or to be parsed fully on its own later
//! (`driver::delazify_function`).

use bitflags::bitflags;
use jsfront_common::Atom;
use serde::Serialize;

use crate::function_box::{AsyncKind, FunctionFlags, FunctionSyntaxKind, GeneratorKind, SourceExtent};

bitflags! {
    /// Facts about the context a lazy function was found in. A delazifying
    /// parse has no enclosing context, so it recreates these from here.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EnclosingFlags: u8 {
        const ALLOW_NEW_TARGET = 1 << 0;
        const ALLOW_SUPER_PROPERTY = 1 << 1;
        const ALLOW_SUPER_CALL = 1 << 2;
        const ALLOW_ARGUMENTS = 1 << 3;
        /// Arrow parameters inherit `yield` as a keyword.
        const YIELD_IS_KEYWORD = 1 << 4;
        /// Arrow parameters inherit `await` as a keyword.
        const AWAIT_IS_KEYWORD = 1 << 5;
        const IN_MODULE = 1 << 6;
    }
}

impl Serialize for EnclosingFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LazyFunctionSummary {
    pub name: Option<Atom>,
    pub kind: FunctionSyntaxKind,
    pub generator_kind: GeneratorKind,
    pub async_kind: AsyncKind,
    pub extent: SourceExtent,
    pub flags: FunctionFlags,
    pub enclosing: EnclosingFlags,
    pub length: u32,
    /// Names closed over in each scope of the function, in scope-exit
    /// order; every scope's run ends with `None`.
    pub closed_over_bindings: Vec<Option<Atom>>,
    /// Names used inside the function and not bound by it, in first-use
    /// order.
    pub free_names: Vec<Atom>,
    /// Summaries of the directly nested functions, in source order.
    pub inner_functions: Vec<LazyFunctionSummary>,
}

impl LazyFunctionSummary {
    /// Every closed-over name, without scope separators.
    pub fn closed_over_names(&self) -> impl Iterator<Item = Atom> + '_ {
        self.closed_over_bindings.iter().filter_map(|name| *name)
    }

    pub fn strict(&self) -> bool {
        self.flags.contains(FunctionFlags::STRICT)
    }
}

/// Read position into a summary being delazified: the closed-over names of
/// the function's own scopes and the summaries of its inner functions, both
/// consumed in source order.
#[derive(Clone, Debug, Default)]
pub struct LazyCursor {
    closed_over_bindings: Vec<Option<Atom>>,
    closed_over_pos: usize,
    inner_functions: Vec<LazyFunctionSummary>,
    inner_pos: usize,
}

/// Saved `LazyCursor` read positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LazyCursorMark {
    closed_over_pos: usize,
    inner_pos: usize,
}

impl LazyCursor {
    pub fn new(summary: &LazyFunctionSummary) -> Self {
        LazyCursor {
            closed_over_bindings: summary.closed_over_bindings.clone(),
            closed_over_pos: 0,
            inner_functions: summary.inner_functions.clone(),
            inner_pos: 0,
        }
    }

    /// Next closed-over name of the current scope; `None` ends the scope.
    pub fn next_closed_over_binding(&mut self) -> Option<Atom> {
        let next = self
            .closed_over_bindings
            .get(self.closed_over_pos)
            .copied()
            .flatten();
        self.closed_over_pos += 1;
        next
    }

    /// Summary of the next inner function if it starts at `start`.
    pub fn next_inner_function(&mut self, start: u32) -> Option<LazyFunctionSummary> {
        let summary = self.inner_functions.get(self.inner_pos)?;
        if summary.extent.start != start {
            return None;
        }
        self.inner_pos += 1;
        Some(summary.clone())
    }

    pub fn mark(&self) -> LazyCursorMark {
        LazyCursorMark {
            closed_over_pos: self.closed_over_pos,
            inner_pos: self.inner_pos,
        }
    }

    pub fn reset(&mut self, mark: LazyCursorMark) {
        self.closed_over_pos = mark.closed_over_pos;
        self.inner_pos = mark.inner_pos;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_at(start: u32) -> LazyFunctionSummary {
        LazyFunctionSummary {
            name: None,
            kind: FunctionSyntaxKind::Expression,
            generator_kind: GeneratorKind::NotGenerator,
            async_kind: AsyncKind::SyncFunction,
            extent: SourceExtent {
                start,
                end: start + 10,
                to_string_start: start,
                to_string_end: start + 10,
            },
            flags: FunctionFlags::empty(),
            enclosing: EnclosingFlags::empty(),
            length: 0,
            closed_over_bindings: vec![Some(Atom(60)), None, None],
            free_names: Vec::new(),
            inner_functions: Vec::new(),
        }
    }

    #[test]
    fn test_cursor_reads_scope_runs() {
        let mut outer = summary_at(0);
        outer.inner_functions = vec![summary_at(20), summary_at(40)];
        let mut cursor = LazyCursor::new(&outer);
        assert_eq!(cursor.next_closed_over_binding(), Some(Atom(60)));
        assert_eq!(cursor.next_closed_over_binding(), None);
        let mark = cursor.mark();
        assert_eq!(cursor.next_closed_over_binding(), None);
        cursor.reset(mark);
        assert!(cursor.next_inner_function(40).is_none());
        assert!(cursor.next_inner_function(20).is_some());
        assert!(cursor.next_inner_function(40).is_some());
        assert!(cursor.next_inner_function(60).is_none());
    }
}
