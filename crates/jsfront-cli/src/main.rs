#![allow(clippy::print_stderr)]

mod args;
mod dump;
mod reporter;
mod tracing_config;

use anyhow::{Context, Result};
use clap::Parser;
use jsfront_common::{Diagnostic, ParseOptions};
use jsfront_parser::{
    EvalContext, FunctionFlavor, ParseError, ParseOutput, parse_comprehension_lambda, parse_eval, parse_module,
    parse_script, parse_standalone_function,
};
use std::io::IsTerminal;

use args::{CliArgs, Dump, Flavor, Goal};
use reporter::Reporter;

const EXIT_SUCCESS: i32 = 0;
const EXIT_SYNTAX_ERROR: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if JSFRONT_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let source = std::fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let file_name = args.file.display().to_string();

    let options = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            ParseOptions::from_json(&text).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ParseOptions::default(),
    };
    let options = args.apply_to(options);

    let result = run_parse(&args, &source, &options);
    tracing::debug!(file = %file_name, ok = result.is_ok(), "parse finished");

    let color = !args.no_color && std::io::stderr().is_terminal();
    let reporter = Reporter::new(&file_name, &source, color);

    let output = match result {
        Ok(output) => output,
        Err(err) => {
            eprintln!("{}", reporter.format_diagnostic(&err.diagnostic));
            std::process::exit(EXIT_SYNTAX_ERROR);
        }
    };

    report_warnings(&reporter, &output.warnings);
    if let Some(dump) = args.dump {
        print_dump(dump, &output)?;
    }
    std::process::exit(EXIT_SUCCESS);
}

fn run_parse(args: &CliArgs, source: &str, options: &ParseOptions) -> Result<ParseOutput, ParseError> {
    match args.goal {
        Goal::Script => parse_script(source, options),
        Goal::Module => parse_module(source, options),
        Goal::Eval => {
            let context = EvalContext {
                strict: args.strict_eval,
                ..EvalContext::default()
            };
            parse_eval(source, options, context)
        }
        Goal::Function => {
            let flavor = match args.flavor {
                Flavor::Normal => FunctionFlavor::Normal,
                Flavor::Generator => FunctionFlavor::Generator,
                Flavor::Async => FunctionFlavor::Async,
                Flavor::AsyncGenerator => FunctionFlavor::AsyncGenerator,
            };
            parse_standalone_function(&args.params, source, flavor, options)
        }
        Goal::Comprehension => parse_comprehension_lambda(source, options),
    }
}

fn report_warnings(reporter: &Reporter<'_>, warnings: &[Diagnostic]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("{}", reporter.render(warnings));
}

fn print_dump(dump: Dump, output: &ParseOutput) -> Result<()> {
    let text = match dump {
        Dump::Ast => dump::dump_ast(output),
        Dump::Bindings => {
            serde_json::to_string_pretty(&dump::dump_bindings(output)).context("failed to serialize bindings")?
        }
        Dump::Lazy => {
            serde_json::to_string_pretty(&dump::dump_lazy(output)).context("failed to serialize lazy summaries")?
        }
    };
    println!("{}", text.trim_end());
    Ok(())
}
