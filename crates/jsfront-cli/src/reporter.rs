use colored::Colorize;
use jsfront_common::diagnostics::DiagnosticRelatedInformation;
use jsfront_common::{Diagnostic, DiagnosticCategory, LineMap};

/// Renders diagnostics for one source file.
pub struct Reporter<'a> {
    color: bool,
    file: &'a str,
    source: &'a str,
    line_map: LineMap,
}

impl<'a> Reporter<'a> {
    pub fn new(file: &'a str, source: &'a str, color: bool) -> Self {
        Reporter {
            color,
            file,
            source,
            line_map: LineMap::build(source),
        }
    }

    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for (index, diagnostic) in diagnostics.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.push_str(&self.format_diagnostic(diagnostic));
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut output = self.format_location(diagnostic.start);
        output.push_str(" - ");
        output.push_str(&self.format_category(diagnostic.category));
        output.push(' ');
        output.push_str(&self.format_code(diagnostic.code));
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if let Some(snippet) = self.format_snippet(diagnostic.start, diagnostic.length) {
            output.push_str(&snippet);
        }

        for related in &diagnostic.related_information {
            output.push('\n');
            output.push_str(&self.format_related(related));
        }
        output
    }

    /// Source line under the diagnostic with the span underlined.
    fn format_snippet(&self, start: u32, length: u32) -> Option<String> {
        let location = self.line_map.location(start);
        let line_text = self.source.lines().nth(location.line as usize - 1)?;

        let column = location.column as usize - 1;
        let mut underline = String::new();
        for (offset, ch) in line_text.chars().enumerate() {
            if offset >= column {
                break;
            }
            underline.push_str(if ch == '\t' { "    " } else { " " });
        }
        let width = (length as usize).clamp(1, line_text.len().saturating_sub(column).max(1));
        let tildes = "~".repeat(width);

        let mut snippet = String::new();
        snippet.push('\n');
        snippet.push_str(&format!("  {:>3}   {}", location.line, line_text));
        snippet.push('\n');
        let tildes = if self.color { tildes.red().to_string() } else { tildes };
        snippet.push_str(&format!("        {underline}{tildes}"));
        Some(snippet)
    }

    fn format_related(&self, related: &DiagnosticRelatedInformation) -> String {
        let prefix = if self.color {
            "  Related".dimmed().to_string()
        } else {
            "  Related".to_string()
        };
        format!("{}: {} - {}", prefix, self.format_location(related.start), related.message_text)
    }

    fn format_location(&self, offset: u32) -> String {
        let location = self.line_map.location(offset);
        format!("{}:{}:{}", self.file, location.line, location.column)
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::ExtraWarning => "extra warning",
            DiagnosticCategory::StrictWarning => "strict warning",
        };
        if !self.color {
            return label.to_string();
        }
        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            _ => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, code: u32) -> String {
        let label = format!("JS{code}");
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsfront_common::diagnostics::diagnostic_codes;

    #[test]
    fn test_plain_diagnostic_layout() {
        let source = "var a;\nwith (o) {}\n";
        let reporter = Reporter::new("app.js", source, false);
        let diagnostic = Diagnostic::error(diagnostic_codes::STRICT_CODE_WITH, 7, 4, &[]);
        let text = reporter.format_diagnostic(&diagnostic);
        let first_line = text.lines().next().unwrap_or_default();
        assert!(first_line.starts_with("app.js:2:1 - error JS"), "{text}");
        assert!(text.contains("    2   with (o) {}"), "{text}");
        assert!(text.ends_with("        ~~~~"), "{text}");
    }

    #[test]
    fn test_related_information_is_listed() {
        let source = "let a;\nlet a;";
        let reporter = Reporter::new("dup.js", source, false);
        let mut diagnostic = Diagnostic::error(diagnostic_codes::REDECLARED_VAR, 11, 1, &["let", "a"]);
        diagnostic.related_information.push(DiagnosticRelatedInformation {
            start: 4,
            length: 1,
            message_text: "previously declared here".to_string(),
        });
        let text = reporter.render(&[diagnostic]);
        assert!(text.contains("  Related: dup.js:1:5 - previously declared here"), "{text}");
    }
}
