//! Parse options.

use serde::{Deserialize, Serialize};

use crate::limits::MAX_PARSER_RECURSION_DEPTH;

/// Configuration record recognised by every parse entry point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Report strict-mode-only problems in sloppy code as warnings.
    pub strict_option: bool,
    /// Collect extra warnings (assignment in condition, unreachable code, ...).
    pub extra_warnings_option: bool,
    /// Parsing self-hosted builtin code: direct method calls and top-level
    /// lexical declarations are rejected, and nothing is parsed lazily.
    pub self_hosting_mode: bool,
    /// Source map URL supplied by the embedder. Wins over a
    /// `//# sourceMappingURL=` comment in the source.
    pub source_map_url: Option<String>,
    /// Syntax-parse inner functions and keep lazy summaries for them.
    pub lazy_inner_functions: bool,
    /// Run the constant folder over the finished tree.
    pub fold_constants: bool,
    /// Accept legacy array/generator comprehensions.
    pub allow_comprehensions: bool,
    /// Hand `"use asm"` functions to the asm.js validator.
    pub asm_js_enabled: bool,
    /// Maximum grammar recursion depth before reporting "too much recursion".
    pub max_recursion_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            strict_option: false,
            extra_warnings_option: false,
            self_hosting_mode: false,
            source_map_url: None,
            lazy_inner_functions: true,
            fold_constants: false,
            allow_comprehensions: true,
            asm_js_enabled: true,
            max_recursion_depth: MAX_PARSER_RECURSION_DEPTH,
        }
    }
}

impl ParseOptions {
    /// Options with lazy parsing disabled: every function is fully parsed.
    pub fn eager() -> Self {
        ParseOptions {
            lazy_inner_functions: false,
            ..ParseOptions::default()
        }
    }

    /// Options from a JSON object; missing keys take their default.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_json_defaults_missing_keys() {
        let options = ParseOptions::from_json(r#"{"strictOption": true, "sourceMapUrl": "a.map"}"#)
            .expect("valid options");
        assert!(options.strict_option);
        assert!(options.lazy_inner_functions);
        assert_eq!(options.source_map_url.as_deref(), Some("a.map"));
        assert_eq!(options.max_recursion_depth, MAX_PARSER_RECURSION_DEPTH);
    }
}
