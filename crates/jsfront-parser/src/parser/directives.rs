//! Parser state - directive prologues
//!
//! A directive is a statement consisting of nothing but a string literal at
//! the start of a script, module, eval or function body. Only the exact
//! source text `"use strict"` or `"use asm"` (either quote, no escapes)
//! counts.

use jsfront_common::Span;
use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_scanner::{LexMode, TokenKind};
use tracing::debug;

use super::node::{NodeFlags, ParseNodeKind};
use super::state::Parser;
use crate::error::{PResult, ParseFailure};
use crate::function_box::FunctionFlags;
use crate::handler::ParseHandler;
use crate::scope::parse_context::Directives;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Directive {
    UseStrict,
    UseAsm,
    Other,
}

/// Classify a directive by its raw source text, quotes included.
fn classify(raw: &str) -> Directive {
    let bytes = raw.as_bytes();
    if bytes.len() < 2 || bytes[0] != bytes[bytes.len() - 1] {
        return Directive::Other;
    }
    match &raw[1..raw.len() - 1] {
        "use strict" => Directive::UseStrict,
        "use asm" => Directive::UseAsm,
        _ => Directive::Other,
    }
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    /// Statements up to (not including) `end`, honoring the directive
    /// prologue at their start.
    pub(crate) fn statement_list_with_directives(&mut self, end: TokenKind) -> PResult<H::Node> {
        let start = self.peek_start()?;
        let list = self.handler.new_list(ParseNodeKind::StatementList, Span::at(start));
        let saved_octal = self.state.prologue_octal.take();

        let mut in_prologue = true;
        let mut after_return = false;
        while in_prologue {
            let next = self.peek_token(LexMode::Operand)?;
            if next.kind == end {
                break;
            }
            let statement = self.statement_list_item()?;
            self.handler.add_list_child(list, statement);
            after_return = next.kind == TokenKind::Return;
            match self.handler.is_string_expr_statement(statement) {
                Some((_, span)) => {
                    self.handler.add_flags(statement, NodeFlags::DIRECTIVE);
                    self.directive(span)?;
                }
                None => in_prologue = false,
            }
        }
        self.state.prologue_octal = saved_octal;

        self.statement_list_items(list, &[end], after_return)?;
        let span = self.span_from(start);
        self.handler.set_span(list, span);
        Ok(list)
    }

    fn directive(&mut self, span: Span) -> PResult<()> {
        match classify(self.text_at(span)) {
            Directive::UseStrict => self.use_strict_directive(span),
            Directive::UseAsm => self.use_asm_directive(span),
            Directive::Other => Ok(()),
        }
    }

    fn use_strict_directive(&mut self, span: Span) -> PResult<()> {
        let Some(funbox) = self.current_function_box().filter(|_| self.ctx().is_function()) else {
            // Script, module or eval code: nothing parsed so far depends on
            // strictness except the prologue's own strings.
            if let Some(octal) = self.state.prologue_octal {
                return self.error_at(diagnostic_codes::DEPRECATED_OCTAL, octal, &[]);
            }
            self.ctx_mut().directives.strict = true;
            return Ok(());
        };

        if !self.state.function_box(funbox).has_simple_parameter_list() {
            let description = self.non_simple_parameter_description(funbox);
            return self.error_at(diagnostic_codes::STRICT_NON_SIMPLE_PARAMS, span, &[description]);
        }
        if let Some(octal) = self.state.prologue_octal {
            return self.error_at(diagnostic_codes::DEPRECATED_OCTAL, octal, &[]);
        }
        self.state.function_box_mut(funbox).set_flag(FunctionFlags::HAS_USE_STRICT);
        if self.strict() {
            return Ok(());
        }
        // Parameters and the function name were checked as sloppy code.
        debug!(start = span.start, "\"use strict\" in sloppy function, reparsing");
        let asm_js = self.ctx().directives.asm_js;
        self.state.pending_directives = Some(Directives { strict: true, asm_js });
        Err(ParseFailure::Reparse)
    }

    fn use_asm_directive(&mut self, span: Span) -> PResult<()> {
        let in_function = self.ctx().is_function();
        if !in_function {
            self.warning_at(diagnostic_codes::USE_ASM_DIRECTIVE_FAIL, span, &[]);
            return Ok(());
        }
        if !self.state.options.asm_js_enabled {
            return Ok(());
        }
        if H::SYNTAX_ONLY {
            return Err(ParseFailure::AbortSyntaxParse);
        }
        // Directives carry asm_js once validation failed; the body is then
        // ordinary code.
        if !self.ctx().directives.asm_js {
            self.set_function_flag(FunctionFlags::USE_ASM);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_requires_exact_text() {
        assert_eq!(classify("\"use strict\""), Directive::UseStrict);
        assert_eq!(classify("'use strict'"), Directive::UseStrict);
        assert_eq!(classify("'use asm'"), Directive::UseAsm);
        assert_eq!(classify("\"use\\x20strict\""), Directive::Other);
        assert_eq!(classify("'use strict\""), Directive::Other);
        assert_eq!(classify("\"use  strict\""), Directive::Other);
        assert_eq!(classify("'"), Directive::Other);
    }
}
