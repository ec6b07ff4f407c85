//! Tracing subscriber setup for the `jsfront` binary.
//!
//! Nothing is installed unless `JSFRONT_LOG` or `RUST_LOG` is set, so a
//! plain run pays no logging cost.
//!
//! # Environment variables
//!
//! | Variable             | Values               | Default |
//! |----------------------|----------------------|---------|
//! | `JSFRONT_LOG`        | an `EnvFilter` spec  | unset   |
//! | `RUST_LOG`           | fallback for the above | unset |
//! | `JSFRONT_LOG_FORMAT` | `text`, `tree`, `json` | `text` |
//!
//! ```bash
//! JSFRONT_LOG=jsfront_parser=debug JSFRONT_LOG_FORMAT=tree jsfront app.js
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    fn parse(value: Option<&str>) -> LogFormat {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("tree") => LogFormat::Tree,
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }

    fn from_env() -> LogFormat {
        LogFormat::parse(std::env::var("JSFRONT_LOG_FORMAT").ok().as_deref())
    }
}

fn build_filter() -> EnvFilter {
    match std::env::var("JSFRONT_LOG") {
        Ok(spec) => EnvFilter::builder().parse_lossy(spec),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber if logging was requested.
pub fn init_tracing() {
    if std::env::var_os("JSFRONT_LOG").is_none() && std::env::var_os("RUST_LOG").is_none() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            tracing_subscriber::registry().with(filter).with(layer).init();
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse(None), LogFormat::Text);
        assert_eq!(LogFormat::parse(Some("tree")), LogFormat::Tree);
        assert_eq!(LogFormat::parse(Some("JSON")), LogFormat::Json);
        assert_eq!(LogFormat::parse(Some("bogus")), LogFormat::Text);
    }
}
