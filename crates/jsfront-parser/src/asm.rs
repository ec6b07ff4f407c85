//! asm.js validation hook.
//!
//! The parser only recognises the `"use asm"` directive. Whether the module
//! is valid asm.js is decided by a pluggable validator; when it rejects the
//! function, the parser warns and reparses the function as ordinary code.

use jsfront_common::Span;

use crate::function_box::FunctionBox;

/// Outcome of validating one `"use asm"` function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AsmJsOutcome {
    Valid,
    /// Not valid asm.js; the message is reported in an asm.js type warning.
    Invalid(String),
}

pub trait AsmJsValidator {
    /// Validate the function whose body text is `body`.
    fn validate(&mut self, funbox: &FunctionBox, body: &str, span: Span) -> AsmJsOutcome;
}

/// Validator used when the embedder supplies none: nothing is asm.js.
#[derive(Clone, Copy, Debug, Default)]
pub struct RejectingAsmJsValidator;

impl AsmJsValidator for RejectingAsmJsValidator {
    fn validate(&mut self, _funbox: &FunctionBox, _body: &str, _span: Span) -> AsmJsOutcome {
        AsmJsOutcome::Invalid("asm.js compilation is not available".to_string())
    }
}
