//! Tracing setup for the jsdown binary.
//!
//! The pipeline opens one `debug` span per stage:
//!
//! - `build_tree` (`jsdown_tree::build`), with `source_len`, closes with the
//!   node count
//! - `initialise` and `transpile` (`jsdown_tree::program`), with `nodes` and
//!   the enabled transforms
//!
//! At `trace`, `jsdown_tree::pass` logs every node a pass visits and
//! `jsdown_common::positioned_text` logs every edit. The `tree` format nests
//! those events under their stage.
//!
//! ```bash
//! JSDOWN_LOG=debug JSDOWN_LOG_FORMAT=tree jsdown ast.json input.js
//! JSDOWN_LOG="jsdown_tree::pass=trace,jsdown_common=trace" jsdown ast.json input.js
//! ```
//!
//! Nothing is installed unless `JSDOWN_LOG` or `RUST_LOG` is set. Output goes
//! to stderr; stdout carries the printed tree or source.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_VAR: &str = "JSDOWN_LOG";
const FORMAT_VAR: &str = "JSDOWN_LOG_FORMAT";

/// How events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Flat `tracing-subscriber` lines.
    Text,
    /// Stage spans as an indented hierarchy (`tracing-tree`).
    Tree,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    /// Parse a `JSDOWN_LOG_FORMAT` value. Unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `JSDOWN_LOG` wins over `RUST_LOG`; both take `RUST_LOG` directives.
/// `None` when neither is set.
fn filter_from_env() -> Option<EnvFilter> {
    match std::env::var(LOG_VAR) {
        Ok(directives) => Some(EnvFilter::builder().parse_lossy(directives)),
        Err(_) if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() => {
            Some(EnvFilter::from_default_env())
        }
        Err(_) => None,
    }
}

/// Install the global subscriber for the format named in `JSDOWN_LOG_FORMAT`.
pub fn init_tracing() {
    let Some(filter) = filter_from_env() else {
        return;
    };
    let format = LogFormat::parse(&std::env::var(FORMAT_VAR).unwrap_or_default());

    let registry = Registry::default().with(filter);
    match format {
        LogFormat::Tree => registry
            .with(
                tracing_tree::HierarchicalLayer::new(2)
                    .with_indent_lines(true)
                    .with_deferred_spans(true)
                    .with_targets(true),
            )
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
