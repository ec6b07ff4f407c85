//! Diagnostic types and message lookup for the parser.
//!
//! Message templates live in `data.rs`. A diagnostic carries the source
//! offset, the message identifier (code), the substitution arguments and the
//! already-formatted text.

use serde::Serialize;

mod data;
pub use data::{DIAGNOSTIC_MESSAGES, diagnostic_codes, diagnostic_messages};

// =============================================================================
// Diagnostic Types
// =============================================================================

/// Diagnostic category.
///
/// `ExtraWarning` diagnostics are only produced when the extra-warnings option
/// is enabled. Strict-mode-conditional reports become `Error` in strict code
/// and `StrictWarning` otherwise (when reported at all).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DiagnosticCategory {
    Error,
    Warning,
    ExtraWarning,
    StrictWarning,
}

/// Related information for a diagnostic (e.g. "previously declared here").
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DiagnosticRelatedInformation {
    pub start: u32,
    pub length: u32,
    pub message_text: String,
}

/// A parse diagnostic.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: u32,
    pub start: u32,
    pub length: u32,
    /// Substitution arguments for the message template.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    pub message_text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub related_information: Vec<DiagnosticRelatedInformation>,
}

impl Diagnostic {
    /// Create a diagnostic for `code`, formatting its template with `args`.
    #[must_use]
    pub fn new(category: DiagnosticCategory, code: u32, start: u32, length: u32, args: &[&str]) -> Self {
        let message_text = get_message_template(code)
            .map(|template| format_message(template, args))
            .unwrap_or_else(|| format!("unknown diagnostic {code}"));
        Self {
            category,
            code,
            start,
            length,
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
            message_text,
            related_information: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[must_use]
    pub fn error(code: u32, start: u32, length: u32, args: &[&str]) -> Self {
        Self::new(DiagnosticCategory::Error, code, start, length, args)
    }

    /// Create a new warning diagnostic.
    #[must_use]
    pub fn warning(code: u32, start: u32, length: u32, args: &[&str]) -> Self {
        Self::new(DiagnosticCategory::Warning, code, start, length, args)
    }

    /// Add related information to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, start: u32, length: u32, message: String) -> Self {
        self.related_information.push(DiagnosticRelatedInformation {
            start,
            length,
            message_text: message,
        });
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A diagnostic message definition with code, category, and message template.
#[derive(Clone, Copy, Debug)]
pub struct DiagnosticMessage {
    pub code: u32,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

/// Look up a diagnostic message definition by code.
#[must_use]
pub fn get_diagnostic_message(code: u32) -> Option<&'static DiagnosticMessage> {
    DIAGNOSTIC_MESSAGES.iter().find(|m| m.code == code)
}

/// Get the message template for a diagnostic code.
#[must_use]
pub fn get_message_template(code: u32) -> Option<&'static str> {
    get_diagnostic_message(code).map(|m| m.message)
}

/// Get the default category for a diagnostic code.
#[must_use]
pub fn get_default_category(code: u32) -> Option<DiagnosticCategory> {
    get_diagnostic_message(code).map(|m| m.category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_message() {
        assert_eq!(
            format_message("redeclaration of {0} {1}", &["let", "x"]),
            "redeclaration of let x"
        );
    }

    #[test]
    fn test_diagnostic_codes_are_unique() {
        let mut codes: Vec<u32> = DIAGNOSTIC_MESSAGES.iter().map(|m| m.code).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len());
    }

    #[test]
    fn test_diagnostic_new_formats_template() {
        let diag = Diagnostic::error(diagnostic_codes::RESERVED_ID, 3, 5, &["yield"]);
        assert_eq!(diag.message_text, "yield is a reserved identifier");
        assert_eq!(diag.args, vec!["yield".to_string()]);
        assert!(diag.is_error());
        assert_eq!(
            get_default_category(diagnostic_codes::EQUAL_AS_ASSIGN),
            Some(DiagnosticCategory::ExtraWarning)
        );
    }
}
