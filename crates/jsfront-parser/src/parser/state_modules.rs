//! Parser state - import and export declarations
//!
//! Only reachable at the top level of module code. Every exported name must
//! be unique, and `export { x }` without `from` must name a binding the
//! module declares somewhere; that is checked once the body is complete.

use jsfront_common::diagnostics::diagnostic_codes;
use jsfront_common::{Atom, Span, atoms};
use jsfront_scanner::{LexMode, Token, TokenKind};
use tracing::trace;

use super::node::ParseNodeKind;
use super::state::{InHandling, Parser};
use super::state_classes::ClassContext;
use crate::error::{PResult, ParseFailure};
use crate::function_box::AsyncKind;
use crate::handler::ParseHandler;
use crate::scope::declaration_kind::DeclarationKind;

/// A name in an import or export clause: an identifier name or a string.
#[derive(Clone, Copy, Debug)]
struct ModuleExportName {
    atom: Atom,
    token: Token,
    is_string: bool,
}

impl<'p, 's, H: ParseHandler> Parser<'p, 's, H> {
    // =========================================================================
    // Shared pieces
    // =========================================================================

    fn module_export_name(&mut self) -> PResult<ModuleExportName> {
        let token = self.get_token(LexMode::Operand)?;
        if token.kind == TokenKind::String {
            let atom = token.string_atom().unwrap_or(Atom::NONE);
            return Ok(ModuleExportName { atom, token, is_string: true });
        }
        match token.name().filter(|_| token.kind.is_identifier_name()) {
            Some(atom) => Ok(ModuleExportName { atom, token, is_string: false }),
            None => self.error_unexpected("identifier or string", token),
        }
    }

    fn module_name_node(&mut self, name: &ModuleExportName) -> H::Node {
        if name.is_string {
            self.handler.new_string(name.atom, name.token.span)
        } else {
            self.handler.new_name(name.atom, name.token.span)
        }
    }

    /// `from "specifier"`.
    fn from_clause(&mut self) -> PResult<H::Node> {
        if !self.match_contextual(atoms::FROM, LexMode::Operator)? {
            let token = self.peek_token(LexMode::Operator)?;
            return self.error_unexpected("'from'", token);
        }
        let token = self.must_match_token(TokenKind::String, LexMode::Operand, "module specifier string")?;
        let atom = token.string_atom().unwrap_or(Atom::NONE);
        Ok(self.handler.new_string(atom, token.span))
    }

    fn note_exported_name(&mut self, name: Atom, span: Span) -> PResult<()> {
        if !self.state.exported_names.insert(name) {
            let text = self.resolve(name).to_string();
            return self.error_at(diagnostic_codes::DUPLICATE_EXPORT_NAME, span, &[&text]);
        }
        trace!(name = name.0, "export");
        Ok(())
    }

    /// Every `export { x }` must name a binding of the module scope.
    /// Called with the module scope innermost, after its whole body.
    pub(crate) fn check_local_exports(&mut self) -> PResult<()> {
        let exports = std::mem::take(&mut self.state.local_exports);
        for (name, span) in exports {
            if self.innermost_scope().lookup(name).is_none() {
                let text = self.resolve(name).to_string();
                return self.error_at(diagnostic_codes::MISSING_EXPORT_BINDING, span, &[&text]);
            }
        }
        Ok(())
    }

    // =========================================================================
    // import
    // =========================================================================

    pub(crate) fn import_declaration(&mut self) -> PResult<H::Node> {
        if H::SYNTAX_ONLY {
            return Err(ParseFailure::AbortSyntaxParse);
        }
        let keyword = self.get_token(LexMode::Operand)?;
        let start = keyword.span.start;
        let specs = self.handler.new_list(ParseNodeKind::ImportSpecList, Span::at(start));

        let next = self.peek_token(LexMode::Operand)?;
        if next.kind == TokenKind::String {
            // `import "specifier";`
            let token = self.get_token(LexMode::Operand)?;
            let atom = token.string_atom().unwrap_or(Atom::NONE);
            let specifier = self.handler.new_string(atom, token.span);
            self.match_or_insert_semicolon()?;
            let span = self.span_from(start);
            return Ok(self.handler.new_binary(ParseNodeKind::Import, span, specs, specifier));
        }

        let mut need_more = true;
        if next.kind == TokenKind::Name {
            // Default import.
            let token = self.get_token(LexMode::Operand)?;
            let local = self.import_binding(token)?;
            let imported = self.handler.new_name(atoms::DEFAULT, token.span);
            let spec = self.handler.new_binary(ParseNodeKind::ImportSpec, token.span, imported, local);
            self.handler.add_list_child(specs, spec);
            need_more = self.match_token(TokenKind::Comma, LexMode::Operator)?;
        }

        if need_more {
            let token = self.get_token(LexMode::Operand)?;
            match token.kind {
                TokenKind::Mul => {
                    if !self.match_contextual(atoms::AS, LexMode::Operator)? {
                        let next = self.peek_token(LexMode::Operator)?;
                        return self.error_unexpected("'as' after '*'", next);
                    }
                    let name_token = self.get_token(LexMode::Operand)?;
                    let local = self.import_binding(name_token)?;
                    let span = self.span_from(token.span.start);
                    let spec = self.handler.new_unary(ParseNodeKind::ImportNamespaceSpec, span, local);
                    self.handler.add_list_child(specs, spec);
                }
                TokenKind::LeftCurly => self.named_imports(specs)?,
                _ => return self.error_unexpected("import specifier", token),
            }
        }

        let specifier = self.from_clause()?;
        self.match_or_insert_semicolon()?;
        let span = self.span_from(start);
        self.handler.set_span(specs, span);
        Ok(self.handler.new_binary(ParseNodeKind::Import, span, specs, specifier))
    }

    /// `{ a, b as c, "d" as e }` after the `{`.
    fn named_imports(&mut self, specs: H::Node) -> PResult<()> {
        loop {
            if self.match_token(TokenKind::RightCurly, LexMode::Operand)? {
                return Ok(());
            }
            let imported = self.module_export_name()?;
            let local = if self.match_contextual(atoms::AS, LexMode::Operator)? {
                let token = self.get_token(LexMode::Operand)?;
                self.import_binding(token)?
            } else {
                if imported.is_string {
                    let next = self.peek_token(LexMode::Operator)?;
                    return self.error_unexpected("'as' after string import name", next);
                }
                if imported.token.kind != TokenKind::Name {
                    let text = self.resolve(imported.atom).to_string();
                    return self.error_at(diagnostic_codes::AS_AFTER_RESERVED_WORD, imported.token.span, &[&text]);
                }
                self.import_binding(imported.token)?
            };
            let imported_node = self.module_name_node(&imported);
            let span = self.span_from(imported.token.span.start);
            let spec = self.handler.new_binary(ParseNodeKind::ImportSpec, span, imported_node, local);
            self.handler.add_list_child(specs, spec);

            let separator = self.get_token(LexMode::Operator)?;
            match separator.kind {
                TokenKind::Comma => {}
                TokenKind::RightCurly => return Ok(()),
                _ => return self.error_unexpected("',' or '}' after import specifier", separator),
            }
        }
    }

    fn import_binding(&mut self, token: Token) -> PResult<H::Node> {
        let name = self.binding_identifier(token)?;
        self.note_declared_name(name, DeclarationKind::Import, token.span)?;
        Ok(self.handler.new_name(name, token.span))
    }

    // =========================================================================
    // export
    // =========================================================================

    pub(crate) fn export_declaration(&mut self) -> PResult<H::Node> {
        if H::SYNTAX_ONLY {
            return Err(ParseFailure::AbortSyntaxParse);
        }
        let keyword = self.get_token(LexMode::Operand)?;
        let start = keyword.span.start;
        let token = self.peek_token(LexMode::Operand)?;
        match token.kind {
            TokenKind::Mul => self.export_batch(start),
            TokenKind::LeftCurly => self.export_clause(start),
            TokenKind::Default => self.export_default(start),
            TokenKind::Var | TokenKind::Const | TokenKind::Function | TokenKind::Class => self.export_declared(start),
            TokenKind::Name if (token.is_contextual(atoms::LET) || token.is_contextual(atoms::ASYNC)) && !token.has_escape() => {
                self.export_declared(start)
            }
            _ => self.error_unexpected("declaration or export clause after 'export'", token),
        }
    }

    /// `export * from "m"` and `export * as ns from "m"`.
    fn export_batch(&mut self, start: u32) -> PResult<H::Node> {
        let star = self.get_token(LexMode::Operand)?;
        let specs = self.handler.new_list(ParseNodeKind::ExportSpecList, star.span);
        let spec = if self.match_contextual(atoms::AS, LexMode::Operator)? {
            let exported = self.module_export_name()?;
            self.note_exported_name(exported.atom, exported.token.span)?;
            let name = self.module_name_node(&exported);
            let span = self.span_from(star.span.start);
            self.handler.new_unary(ParseNodeKind::ExportNamespaceSpec, span, name)
        } else {
            self.handler.new_leaf(ParseNodeKind::ExportBatchSpec, star.span)
        };
        self.handler.add_list_child(specs, spec);
        let specifier = self.from_clause()?;
        self.match_or_insert_semicolon()?;
        let span = self.span_from(start);
        Ok(self.handler.new_binary(ParseNodeKind::ExportFrom, span, specs, specifier))
    }

    /// `export { a, b as c }`, optionally re-exported `from` a module.
    fn export_clause(&mut self, start: u32) -> PResult<H::Node> {
        let open = self.get_token(LexMode::Operand)?;
        let specs = self.handler.new_list(ParseNodeKind::ExportSpecList, open.span);
        let mut locals: Vec<ModuleExportName> = Vec::new();
        loop {
            if self.match_token(TokenKind::RightCurly, LexMode::Operand)? {
                break;
            }
            let local = self.module_export_name()?;
            let exported = if self.match_contextual(atoms::AS, LexMode::Operator)? {
                self.module_export_name()?
            } else {
                local
            };
            self.note_exported_name(exported.atom, exported.token.span)?;
            let local_node = self.module_name_node(&local);
            let exported_node = self.module_name_node(&exported);
            let span = self.span_from(local.token.span.start);
            let spec = self.handler.new_binary(ParseNodeKind::ExportSpec, span, local_node, exported_node);
            self.handler.add_list_child(specs, spec);
            locals.push(local);

            let separator = self.get_token(LexMode::Operator)?;
            match separator.kind {
                TokenKind::Comma => {}
                TokenKind::RightCurly => break,
                _ => return self.error_unexpected("',' or '}' after export specifier", separator),
            }
        }
        let list_span = self.span_from(open.span.start);
        self.handler.set_span(specs, list_span);

        if self.peek_token(LexMode::Operator)?.is_contextual(atoms::FROM) {
            let specifier = self.from_clause()?;
            self.match_or_insert_semicolon()?;
            let span = self.span_from(start);
            return Ok(self.handler.new_binary(ParseNodeKind::ExportFrom, span, specs, specifier));
        }

        // Without `from`, each local name is a reference to a binding.
        for local in locals {
            if local.is_string {
                return self.error_unexpected("identifier", local.token);
            }
            self.check_identifier(local.token)?;
            self.note_used_name(local.atom);
            self.state.local_exports.push((local.atom, local.token.span));
        }
        self.match_or_insert_semicolon()?;
        let span = self.span_from(start);
        Ok(self.handler.new_unary(ParseNodeKind::ExportStmt, span, specs))
    }

    /// `export` followed by a declaration: every name it binds is exported.
    fn export_declared(&mut self, start: u32) -> PResult<H::Node> {
        self.state.export_capture = Some(Vec::new());
        let declaration = self.statement_list_item();
        let names = self.state.export_capture.take().unwrap_or_default();
        let declaration = declaration?;

        let end = self.prev_end();
        for name in names {
            self.note_exported_name(name, Span::new(start, end))?;
        }
        let span = self.span_from(start);
        Ok(self.handler.new_unary(ParseNodeKind::ExportStmt, span, declaration))
    }

    /// `export default` function, class or expression.
    fn export_default(&mut self, start: u32) -> PResult<H::Node> {
        let keyword = self.get_token(LexMode::Operand)?;
        self.note_exported_name(atoms::DEFAULT, keyword.span)?;

        let token = self.peek_token(LexMode::Operand)?;
        let declaration_start = token.span.start;
        let async_function = if token.is_contextual(atoms::ASYNC) && !token.has_escape() {
            self.get_token(LexMode::Operand)?;
            let next = self.peek_token_same_line(LexMode::Operand)?;
            self.unget_token();
            next.is_some_and(|next| next.kind == TokenKind::Function)
        } else {
            false
        };

        let (declaration, binding) = if token.kind == TokenKind::Function {
            self.get_token(LexMode::Operand)?;
            let function = self.function_stmt(declaration_start, AsyncKind::SyncFunction, true)?;
            (function, self.handler.null())
        } else if async_function {
            self.get_token(LexMode::Operand)?;
            self.get_token(LexMode::Operand)?;
            let function = self.function_stmt(declaration_start, AsyncKind::AsyncFunction, true)?;
            (function, self.handler.null())
        } else if token.kind == TokenKind::Class {
            self.get_token(LexMode::Operand)?;
            let class = self.class_definition(ClassContext::DefaultExport, declaration_start)?;
            (class, self.handler.null())
        } else {
            let expr = self.assign_expr_no_error(InHandling::InAllowed)?;
            self.match_or_insert_semicolon()?;
            let span = Span::at(declaration_start);
            self.note_declared_name(atoms::STAR_DEFAULT, DeclarationKind::Const, span)?;
            let binding = self.handler.new_name(atoms::STAR_DEFAULT, span);
            (expr, binding)
        };
        let span = self.span_from(start);
        Ok(self
            .handler
            .new_binary(ParseNodeKind::ExportDefault, span, declaration, binding))
    }
}
