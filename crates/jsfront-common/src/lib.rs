//! Common types and utilities for the jsfront JavaScript parser.
//!
//! This crate provides foundational types used across all jsfront crates:
//! - String interning (`Atom`, `Interner`) and the well-known atom table
//! - Source spans (`Span`) and line maps for diagnostics
//! - Diagnostics (codes, message templates, categories)
//! - Parse options
//! - Parser limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner, atoms};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position/line tracking for diagnostics
pub mod position;
pub use position::{LineMap, Location};

// Diagnostics
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory};

// Parse options
pub mod options;
pub use options::ParseOptions;

// Centralized limits and thresholds
pub mod limits;
