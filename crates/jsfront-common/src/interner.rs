//! String Interner for identifier deduplication.
//!
//! Identifiers, property names and string literals are interned into a
//! per-parse pool and passed around as u32 indices (Atoms). Atoms are never
//! mutated once created, so nodes of the syntax tree can share them freely.
//!
//! Comparisons become integer comparisons (atom_a == atom_b) instead of string
//! comparisons. Contextual keywords (`let`, `yield`, `async`, ...) and the
//! directive strings are pre-interned at fixed indices so the parser can
//! compare against the constants in [`atoms`].

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::sync::Arc;

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

macro_rules! define_well_known_atoms {
    ($($name:ident = $idx:literal => $text:literal,)*) => {
        /// Atoms pre-interned by every [`Interner`] at fixed indices.
        pub mod atoms {
            use super::Atom;
            $(
                #[doc = concat!("`", $text, "`")]
                pub const $name: Atom = Atom($idx);
            )*
        }

        const WELL_KNOWN_ATOMS: &[(u32, &str)] = &[$(($idx, $text),)*];
    };
}

define_well_known_atoms! {
    LET = 1 => "let",
    STATIC = 2 => "static",
    YIELD = 3 => "yield",
    AWAIT = 4 => "await",
    ASYNC = 5 => "async",
    OF = 6 => "of",
    GET = 7 => "get",
    SET = 8 => "set",
    TARGET = 9 => "target",
    META = 10 => "meta",
    FROM = 11 => "from",
    AS = 12 => "as",
    ARGUMENTS = 13 => "arguments",
    EVAL = 14 => "eval",
    USE_STRICT = 15 => "use strict",
    USE_ASM = 16 => "use asm",
    CONSTRUCTOR = 17 => "constructor",
    PROTOTYPE = 18 => "prototype",
    PROTO = 19 => "__proto__",
    IMPLEMENTS = 20 => "implements",
    INTERFACE = 21 => "interface",
    PACKAGE = 22 => "package",
    PRIVATE = 23 => "private",
    PROTECTED = 24 => "protected",
    PUBLIC = 25 => "public",
    STAR_DEFAULT = 26 => "*default*",
    STAR = 27 => "*",
    THIS = 28 => "this",
    UNDEFINED = 29 => "undefined",
    NAN = 30 => "NaN",
    INFINITY = 31 => "Infinity",
    ANONYMOUS = 32 => "anonymous",
    DOT_GENERATOR = 33 => ".generator",
    NUMBER = 34 => "number",
    STRING = 35 => "string",
    OBJECT = 36 => "object",
    BOOLEAN = 37 => "boolean",
    FUNCTION = 38 => "function",
    SYMBOL = 39 => "symbol",
    BIGINT = 40 => "bigint",
    DEFAULT = 41 => "default",
    LENGTH = 42 => "length",
    NAME = 43 => "name",
    NEW = 44 => "new",
    DOT_THIS = 45 => ".this",
    APPLY = 46 => "apply",
    CALL = 47 => "call",
}

/// String interner that deduplicates strings and returns Atom handles.
///
/// # Example
/// ```
/// use jsfront_common::interner::{Interner, atoms};
/// let mut interner = Interner::new();
/// let a1 = interner.intern("hello");
/// let a2 = interner.intern("hello");
/// assert_eq!(a1, a2); // Same atom for same string
/// assert_eq!(interner.resolve(a1), "hello");
/// assert_eq!(interner.intern("let"), atoms::LET);
/// ```
#[derive(Clone, Debug)]
pub struct Interner {
    /// Map from string to atom index
    map: FxHashMap<Arc<str>, Atom>,
    /// Vector of all interned strings (index 0 is empty string)
    strings: Vec<Arc<str>>,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create a new interner with the empty string at index 0 and the
    /// well-known atoms at their fixed indices.
    pub fn new() -> Self {
        let mut interner = Interner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(1024),
        };
        // Index 0 is reserved for empty/none
        let empty: Arc<str> = Arc::from("");
        interner.strings.push(empty.clone());
        interner.map.insert(empty, Atom::NONE);
        for &(idx, text) in WELL_KNOWN_ATOMS {
            let atom = interner.intern(text);
            debug_assert_eq!(atom.0, idx, "well-known atom table out of order");
        }
        interner
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&mut self, s: &str) -> Atom {
        if let Some(&atom) = self.map.get(s) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Intern an owned String, avoiding a second allocation if it is new.
    #[inline]
    pub fn intern_owned(&mut self, s: String) -> Atom {
        if let Some(&atom) = self.map.get(s.as_str()) {
            return atom;
        }
        let atom = Atom(self.strings.len() as u32);
        let owned: Arc<str> = Arc::from(s.into_boxed_str());
        self.strings.push(owned.clone());
        self.map.insert(owned, atom);
        atom
    }

    /// Look up an already-interned string without interning it.
    #[inline]
    pub fn lookup(&self, s: &str) -> Option<Atom> {
        self.map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> &str {
        self.strings
            .get(atom.0 as usize)
            .map(|s| s.as_ref())
            .unwrap_or("")
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<&str> {
        self.strings.get(atom.0 as usize).map(|s| s.as_ref())
    }

    /// Get a shared handle to an interned string.
    pub fn resolve_arc(&self, atom: Atom) -> Option<Arc<str>> {
        self.strings.get(atom.0 as usize).cloned()
    }

    /// Get the number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the interner holds nothing beyond the pre-interned atoms.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.len() <= WELL_KNOWN_ATOMS.len() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_atoms_resolve() {
        let interner = Interner::new();
        for &(idx, text) in WELL_KNOWN_ATOMS {
            assert_eq!(interner.resolve(Atom(idx)), text);
        }
        assert_eq!(interner.resolve(atoms::USE_STRICT), "use strict");
        assert!(interner.is_empty());
    }

    #[test]
    fn test_intern_dedup() {
        let mut interner = Interner::new();
        let a = interner.intern("foo");
        let b = interner.intern_owned("foo".to_string());
        assert_eq!(a, b);
        assert!(!interner.is_empty());
        assert_eq!(interner.lookup("foo"), Some(a));
        assert_eq!(interner.lookup("bar"), None);
    }
}
