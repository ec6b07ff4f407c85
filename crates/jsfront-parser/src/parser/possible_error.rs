//! Deferred errors for the expression/destructuring ambiguity.
//!
//! `[a, b = f()]` is an array literal or a destructuring target depending on
//! whether `=` follows it, and `{a = 1}` is only legal as a pattern. While an
//! expression that might become a pattern is parsed, problems that are only
//! problems for one interpretation are parked here. Whoever learns which
//! interpretation applies resolves the record one way, which raises the
//! parked error for that interpretation and forgets the other.

use jsfront_common::Span;
use jsfront_common::diagnostics::diagnostic_codes;

use super::state::Parser;
use crate::error::PResult;
use crate::handler::ParseHandler;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ErrorState {
    #[default]
    None,
    Pending { code: u32, span: Span },
    Resolved,
}

impl ErrorState {
    fn is_pending(self) -> bool {
        matches!(self, ErrorState::Pending { .. })
    }

    fn set_pending(&mut self, code: u32, span: Span) {
        // The first error wins; resolved slots stay resolved.
        if *self == ErrorState::None {
            *self = ErrorState::Pending { code, span };
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PossibleError {
    expression: ErrorState,
    destructuring: ErrorState,
    destructuring_warning: ErrorState,
}

impl PossibleError {
    pub(crate) fn new() -> Self {
        PossibleError::default()
    }

    /// Error if the construct turns out to be a plain expression.
    pub(crate) fn set_pending_expression_error_at(&mut self, span: Span, code: u32) {
        self.expression.set_pending(code, span);
    }

    /// Error if the construct turns out to be a destructuring pattern.
    pub(crate) fn set_pending_destructuring_error_at(&mut self, span: Span, code: u32) {
        self.destructuring.set_pending(code, span);
    }

    /// Strict-mode error if the construct turns out to be a pattern.
    pub(crate) fn set_pending_destructuring_warning_at(&mut self, span: Span, code: u32) {
        self.destructuring_warning.set_pending(code, span);
    }

    pub(crate) fn has_pending_destructuring_error(&self) -> bool {
        self.destructuring.is_pending()
    }

    /// Hand pending errors to `other` where it has none of its own.
    pub(crate) fn transfer_errors_to(&self, other: &mut PossibleError) {
        if self.destructuring.is_pending() && !other.destructuring.is_pending() {
            other.destructuring = self.destructuring;
        }
        if self.destructuring_warning.is_pending() && !other.destructuring_warning.is_pending() {
            other.destructuring_warning = self.destructuring_warning;
        }
        if self.expression.is_pending() && !other.expression.is_pending() {
            other.expression = self.expression;
        }
    }
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    /// Resolve as a plain expression.
    pub(crate) fn check_for_expression_error(&mut self, possible_error: &mut PossibleError) -> PResult<()> {
        possible_error.destructuring = ErrorState::Resolved;
        possible_error.destructuring_warning = ErrorState::Resolved;
        if let ErrorState::Pending { code, span } = possible_error.expression {
            return self.error_at(code, span, &[]);
        }
        possible_error.expression = ErrorState::Resolved;
        Ok(())
    }

    /// Resolve as a destructuring pattern.
    pub(crate) fn check_for_destructuring_error_or_warning(
        &mut self,
        possible_error: &mut PossibleError,
    ) -> PResult<()> {
        possible_error.expression = ErrorState::Resolved;
        if let ErrorState::Pending { code, span } = possible_error.destructuring {
            return self.error_at(code, span, &[]);
        }
        possible_error.destructuring = ErrorState::Resolved;
        if let ErrorState::Pending { code, span } = possible_error.destructuring_warning {
            let name = self.text_at(span).to_string();
            self.strict_report(code, span, &[&name])?;
        }
        possible_error.destructuring_warning = ErrorState::Resolved;
        Ok(())
    }

    // =========================================================================
    // Destructuring assignment targets
    // =========================================================================

    /// `eval` and `arguments` are not assignable in strict code.
    pub(crate) fn check_destructuring_assignment_name(
        &mut self,
        name_node: H::Node,
        span: Span,
        possible_error: &mut PossibleError,
    ) {
        if possible_error.has_pending_destructuring_error() {
            return;
        }
        let Some(name) = self.handler.is_name(name_node) else {
            return;
        };
        if self.is_arguments_or_eval(name) {
            if self.strict() {
                possible_error.set_pending_destructuring_error_at(span, diagnostic_codes::BAD_STRICT_ASSIGN);
            } else {
                possible_error
                    .set_pending_destructuring_warning_at(span, diagnostic_codes::BAD_STRICT_ASSIGN);
            }
        }
    }

    /// Validate `expr` as the target of one element of a destructuring
    /// assignment. `possible_error` is `None` when the enclosing literal is
    /// known not to be a pattern.
    pub(crate) fn check_destructuring_assignment_target(
        &mut self,
        expr: H::Node,
        span: Span,
        expr_error: &mut PossibleError,
        possible_error: Option<&mut PossibleError>,
        forbid_pattern: bool,
    ) -> PResult<()> {
        let Some(possible_error) = possible_error else {
            return self.check_for_expression_error(expr_error);
        };
        if self.handler.is_property_access(expr) {
            return self.check_for_expression_error(expr_error);
        }
        expr_error.transfer_errors_to(possible_error);
        if possible_error.has_pending_destructuring_error() {
            return Ok(());
        }
        if self.handler.is_name(expr).is_some() {
            self.check_destructuring_assignment_name(expr, span, possible_error);
            return Ok(());
        }
        if self.handler.is_unparenthesized_destructuring_pattern(expr) {
            if forbid_pattern {
                possible_error.set_pending_destructuring_error_at(span, diagnostic_codes::BAD_DESTRUCT_TARGET);
            }
            return Ok(());
        }
        let code = if self.handler.is_parenthesized_destructuring_pattern(expr) && !forbid_pattern {
            diagnostic_codes::BAD_DESTRUCT_PARENS
        } else {
            diagnostic_codes::BAD_DESTRUCT_TARGET
        };
        possible_error.set_pending_destructuring_error_at(span, code);
        Ok(())
    }

    /// Like `check_destructuring_assignment_target`, but an element with an
    /// initializer (`[a = 1] = ...`) was already checked by the assignment
    /// parser.
    pub(crate) fn check_destructuring_assignment_element(
        &mut self,
        expr: H::Node,
        span: Span,
        expr_error: &mut PossibleError,
        possible_error: Option<&mut PossibleError>,
    ) -> PResult<()> {
        if self.handler.is_unparenthesized_assignment(expr) {
            return match possible_error {
                Some(possible_error) => {
                    expr_error.transfer_errors_to(possible_error);
                    Ok(())
                }
                None => self.check_for_expression_error(expr_error),
            };
        }
        self.check_destructuring_assignment_target(expr, span, expr_error, possible_error, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_pending_error_wins() {
        let mut error = PossibleError::new();
        error.set_pending_expression_error_at(Span::new(1, 2), diagnostic_codes::COLON_AFTER_ID);
        error.set_pending_expression_error_at(Span::new(5, 6), diagnostic_codes::BAD_PROP_ID);
        assert_eq!(
            error.expression,
            ErrorState::Pending {
                code: diagnostic_codes::COLON_AFTER_ID,
                span: Span::new(1, 2)
            }
        );
    }

    #[test]
    fn test_transfer_keeps_existing_errors() {
        let mut inner = PossibleError::new();
        inner.set_pending_destructuring_error_at(Span::new(3, 4), diagnostic_codes::BAD_DESTRUCT_TARGET);
        inner.set_pending_expression_error_at(Span::new(7, 8), diagnostic_codes::COLON_AFTER_ID);
        let mut outer = PossibleError::new();
        outer.set_pending_destructuring_error_at(Span::new(0, 1), diagnostic_codes::BAD_REST_TARGET);
        inner.transfer_errors_to(&mut outer);
        assert!(outer.expression.is_pending());
        assert_eq!(
            outer.destructuring,
            ErrorState::Pending {
                code: diagnostic_codes::BAD_REST_TARGET,
                span: Span::new(0, 1)
            }
        );
    }
}
