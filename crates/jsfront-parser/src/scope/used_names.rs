//! Used-name tracker.
//!
//! Records, for every referenced identifier, the (script, scope) pairs in
//! which it was used. When a scope closes, binding a name consumes the uses
//! at or below that scope and reports whether any of them came from a nested
//! script, which makes the binding closed over.
//!
//! Script and scope ids are handed out in increasing order, so "at or below
//! scope X" is simply "scope id >= X" for every use still on the list.

use jsfront_common::Atom;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Use {
    script_id: u32,
    scope_id: u32,
}

#[derive(Clone, Debug, Default)]
struct UsedNameInfo {
    uses: SmallVec<[Use; 2]>,
}

impl UsedNameInfo {
    fn note_use(&mut self, script_id: u32, scope_id: u32) {
        // Only the outermost use per scope chain matters; an inner use
        // following an outer one in the same chain is subsumed.
        if self.uses.last().is_none_or(|last| last.scope_id < scope_id) {
            self.uses.push(Use { script_id, scope_id });
        }
    }

    fn note_bound_in_scope(&mut self, script_id: u32, scope_id: u32) -> bool {
        let mut closed_over = false;
        while let Some(last) = self.uses.last() {
            if last.scope_id < scope_id {
                break;
            }
            if last.script_id > script_id {
                closed_over = true;
            }
            self.uses.pop();
        }
        closed_over
    }

    fn is_used_in_script(&self, script_id: u32) -> bool {
        self.uses.last().is_some_and(|last| last.script_id >= script_id)
    }

    fn rewind(&mut self, token: RewindToken) {
        while self
            .uses
            .last()
            .is_some_and(|last| last.scope_id >= token.scope_id)
        {
            self.uses.pop();
        }
    }
}

/// Counter snapshot restoring the tracker to an earlier state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewindToken {
    script_id: u32,
    scope_id: u32,
}

#[derive(Clone, Debug, Default)]
pub struct UsedNameTracker {
    map: FxHashMap<Atom, UsedNameInfo>,
    script_counter: u32,
    scope_counter: u32,
}

impl UsedNameTracker {
    pub fn new() -> Self {
        UsedNameTracker::default()
    }

    pub fn next_script_id(&mut self) -> u32 {
        self.script_counter += 1;
        self.script_counter
    }

    pub fn next_scope_id(&mut self) -> u32 {
        self.scope_counter += 1;
        self.scope_counter
    }

    pub fn note_use(&mut self, name: Atom, script_id: u32, scope_id: u32) {
        self.map.entry(name).or_default().note_use(script_id, scope_id);
    }

    /// Consume the uses of `name` at or below `scope_id`. Returns true when
    /// one of them belongs to a script nested inside `script_id`.
    pub fn note_bound_in_scope(&mut self, name: Atom, script_id: u32, scope_id: u32) -> bool {
        let closed_over = self
            .map
            .get_mut(&name)
            .is_some_and(|info| info.note_bound_in_scope(script_id, scope_id));
        if closed_over {
            trace!(name = name.0, scope_id, "binding closed over");
        }
        closed_over
    }

    /// Whether `name` has an unbound use in `script_id` or a script nested
    /// inside it.
    pub fn is_used_in_script(&self, name: Atom, script_id: u32) -> bool {
        self.map
            .get(&name)
            .is_some_and(|info| info.is_used_in_script(script_id))
    }

    pub fn get_rewind_token(&self) -> RewindToken {
        RewindToken {
            script_id: self.script_counter,
            scope_id: self.scope_counter,
        }
    }

    /// Forget every use recorded after `token` was taken.
    pub fn rewind(&mut self, token: RewindToken) {
        let next = RewindToken {
            script_id: token.script_id + 1,
            scope_id: token.scope_id + 1,
        };
        for info in self.map.values_mut() {
            info.rewind(next);
        }
        self.script_counter = token.script_id;
        self.scope_counter = token.scope_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X: Atom = Atom(100);

    #[test]
    fn test_use_in_same_script_is_not_closed_over() {
        let mut tracker = UsedNameTracker::new();
        let script = tracker.next_script_id();
        let outer = tracker.next_scope_id();
        let inner = tracker.next_scope_id();
        tracker.note_use(X, script, inner);
        assert!(tracker.is_used_in_script(X, script));
        assert!(!tracker.note_bound_in_scope(X, script, outer));
        assert!(!tracker.is_used_in_script(X, script));
    }

    #[test]
    fn test_use_in_nested_script_is_closed_over() {
        let mut tracker = UsedNameTracker::new();
        let outer_script = tracker.next_script_id();
        let outer_scope = tracker.next_scope_id();
        let inner_script = tracker.next_script_id();
        let inner_scope = tracker.next_scope_id();
        tracker.note_use(X, inner_script, inner_scope);
        assert!(!tracker.note_bound_in_scope(X, inner_script, inner_scope + 1));
        assert!(tracker.note_bound_in_scope(X, outer_script, outer_scope));
    }

    #[test]
    fn test_binding_in_sibling_scope_does_not_see_consumed_use() {
        let mut tracker = UsedNameTracker::new();
        let script = tracker.next_script_id();
        let _outer = tracker.next_scope_id();
        let inner_script = tracker.next_script_id();
        let first = tracker.next_scope_id();
        tracker.note_use(X, inner_script, first);
        assert!(tracker.note_bound_in_scope(X, script, first));
        let second = tracker.next_scope_id();
        assert!(!tracker.note_bound_in_scope(X, script, second));
    }

    #[test]
    fn test_rewind_discards_speculative_uses() {
        let mut tracker = UsedNameTracker::new();
        let script = tracker.next_script_id();
        let scope = tracker.next_scope_id();
        let token = tracker.get_rewind_token();
        let inner_script = tracker.next_script_id();
        let inner_scope = tracker.next_scope_id();
        tracker.note_use(X, inner_script, inner_scope);
        tracker.rewind(token);
        assert!(!tracker.is_used_in_script(X, script));
        assert!(!tracker.note_bound_in_scope(X, script, scope));
        assert_eq!(tracker.next_script_id(), inner_script);
    }
}
