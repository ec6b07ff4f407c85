use clap::{Parser, ValueEnum};
use jsfront_common::ParseOptions;
use std::path::PathBuf;

/// CLI arguments for the jsfront binary.
#[derive(Parser, Debug)]
#[command(
    name = "jsfront",
    version,
    about = "Parse JavaScript and report syntax errors, bindings and lazy summaries"
)]
pub struct CliArgs {
    /// Source file to parse.
    pub file: PathBuf,

    /// JSON file with parse options; the flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// How the source is parsed.
    #[arg(long, value_enum, default_value_t = Goal::Script, ignore_case = true)]
    pub goal: Goal,

    /// Parameter list when parsing with `--goal function`.
    #[arg(long, default_value = "")]
    pub params: String,

    /// Function flavor when parsing with `--goal function`.
    #[arg(long, value_enum, default_value_t = Flavor::Normal)]
    pub flavor: Flavor,

    /// Treat eval code as strict.
    #[arg(long = "strictEval", alias = "strict-eval")]
    pub strict_eval: bool,

    /// Report strict-mode-only problems in sloppy code as warnings.
    #[arg(long = "strictWarnings", alias = "strict-warnings")]
    pub strict_warnings: bool,

    /// Report extra warnings (assignment in a condition, unreachable code, ...).
    #[arg(long = "extraWarnings", alias = "extra-warnings")]
    pub extra_warnings: bool,

    /// Parse every function fully instead of syntax-parsing inner functions.
    #[arg(long = "noLazy", alias = "no-lazy")]
    pub no_lazy: bool,

    /// Fold constant expressions in the finished tree.
    #[arg(long)]
    pub fold: bool,

    /// Reject legacy array and generator comprehensions.
    #[arg(long = "noComprehensions", alias = "no-comprehensions")]
    pub no_comprehensions: bool,

    /// Ignore `"use asm"` directives.
    #[arg(long = "noAsm", alias = "no-asm")]
    pub no_asm: bool,

    /// Parse as self-hosted builtin code.
    #[arg(long = "selfHosting", alias = "self-hosting")]
    pub self_hosting: bool,

    /// Source map URL supplied by the embedder.
    #[arg(long = "sourceMapUrl", alias = "source-map-url")]
    pub source_map_url: Option<String>,

    /// Print a view of the parse result.
    #[arg(long, value_enum)]
    pub dump: Option<Dump>,

    /// Disable colored diagnostics.
    #[arg(long = "noColor", alias = "no-color")]
    pub no_color: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Goal {
    Script,
    Module,
    Eval,
    Function,
    Comprehension,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Flavor {
    Normal,
    Generator,
    Async,
    AsyncGenerator,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Dump {
    /// Indented node tree.
    Ast,
    /// Binding tables of every scope.
    Bindings,
    /// Summaries of lazily parsed functions.
    Lazy,
}

impl CliArgs {
    /// `base` with every option switched by a flag applied on top.
    pub fn apply_to(&self, mut options: ParseOptions) -> ParseOptions {
        options.strict_option |= self.strict_warnings;
        options.extra_warnings_option |= self.extra_warnings;
        options.self_hosting_mode |= self.self_hosting;
        options.fold_constants |= self.fold;
        if self.no_lazy {
            options.lazy_inner_functions = false;
        }
        if self.no_comprehensions {
            options.allow_comprehensions = false;
        }
        if self.no_asm {
            options.asm_js_enabled = false;
        }
        if let Some(url) = &self.source_map_url {
            options.source_map_url = Some(url.clone());
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CliArgs::try_parse_from(["jsfront", "app.js"]).expect("args parse");
        assert_eq!(args.file, PathBuf::from("app.js"));
        assert_eq!(args.goal, Goal::Script);
        assert_eq!(args.dump, None);
        let options = args.apply_to(ParseOptions::default());
        assert!(options.lazy_inner_functions);
        assert!(!options.fold_constants);
        assert!(options.asm_js_enabled);
    }

    #[test]
    fn test_option_mapping() {
        let args = CliArgs::try_parse_from([
            "jsfront",
            "--goal",
            "MODULE",
            "--no-lazy",
            "--fold",
            "--extraWarnings",
            "--sourceMapUrl",
            "out.map",
            "--dump",
            "bindings",
            "lib.mjs",
        ])
        .expect("args parse");
        assert_eq!(args.goal, Goal::Module);
        assert_eq!(args.dump, Some(Dump::Bindings));
        let options = args.apply_to(ParseOptions::default());
        assert!(!options.lazy_inner_functions);
        assert!(options.fold_constants);
        assert!(options.extra_warnings_option);
        assert_eq!(options.source_map_url.as_deref(), Some("out.map"));
    }

    #[test]
    fn test_function_flavor() {
        let args = CliArgs::try_parse_from([
            "jsfront",
            "--goal",
            "function",
            "--params",
            "a, b",
            "--flavor",
            "async-generator",
            "body.js",
        ])
        .expect("args parse");
        assert_eq!(args.flavor, Flavor::AsyncGenerator);
        assert_eq!(args.params, "a, b");
    }

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::try_parse_from(["jsfront", "--no-lazy", "app.js"]).expect("args parse");
        let base = ParseOptions {
            fold_constants: true,
            source_map_url: Some("config.map".to_string()),
            ..ParseOptions::default()
        };
        let options = args.apply_to(base);
        assert!(options.fold_constants);
        assert!(!options.lazy_inner_functions);
        assert_eq!(options.source_map_url.as_deref(), Some("config.map"));
    }

    #[test]
    fn test_file_is_required() {
        assert!(CliArgs::try_parse_from(["jsfront"]).is_err());
    }
}
