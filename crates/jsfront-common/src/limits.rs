//! Centralized limits and thresholds for the parser.
//!
//! Recursive descent uses the native stack, so every grammar production that
//! can nest (expressions, statements, function bodies) counts depth against
//! these limits and reports "too much recursion" instead of overflowing.

/// Maximum grammar recursion depth for one top-level parse.
///
/// Each nested expression, statement or function body adds a frame. At this
/// depth the parser bails out with a fatal `TooMuchRecursion` error.
///
/// ```javascript
/// // Deeply nested parenthesized expressions:
/// ((((((((((((((((((((((((1 + 2) + 3) /* ... thousands of levels ... */))))));
///
/// // Deeply nested array literals / blocks / function expressions:
/// [[[[[[[[[[[[[[[[[[ /* ... */ ]]]]]]]]]]]]]]]]]];
/// ```
pub const MAX_PARSER_RECURSION_DEPTH: u32 = 1_000;

/// Reduced recursion limit for tests that exercise the limit itself.
pub const TEST_PARSER_RECURSION_DEPTH: u32 = 64;

/// Maximum number of directive-driven reparses of a single function.
///
/// Each reparse strictly adds a directive (`"use strict"`, `"use asm"`), so
/// the loop is bounded by the number of directives; this is a backstop.
pub const MAX_DIRECTIVE_REPARSES: u32 = 4;

/// Maximum pre-allocation of arena nodes derived from source length.
pub const MAX_NODE_PREALLOC: usize = 5_000_000;

/// Approximate number of source bytes per syntax node, used to size arenas.
pub const BYTES_PER_NODE_ESTIMATE: usize = 6;
