//! Tracing configuration for debugging driver runs.
//!
//! Supports three output formats controlled by `TSB_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`
//! - `json`: One JSON object per span/event
//!
//! ```bash
//! TSB_LOG=debug TSB_LOG_FORMAT=tree tsb src/app.ts --dest out
//! TSB_LOG="tsb::cli::driver=trace" tsb --task build.json
//! ```
//!
//! The subscriber is only initialised when `TSB_LOG` (or `RUST_LOG`) is set.
//!
//! What gets traced:
//!
//! - `info`: one `run` span per driver run (input count, destination) and
//!   one event per compiled task group
//! - `debug`: resolution results, one event per compiler phase (diagnostic
//!   and output counts, error flag), aborts, and each source read, file
//!   write, deletion and created directory
//! - `trace`: reference resolution steps and every output destination

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Tree,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("TSB_LOG_FORMAT")
            .unwrap_or_default()
            .to_lowercase()
            .as_str()
        {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

/// `TSB_LOG` takes precedence over `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("TSB_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber, writing to stderr.
///
/// Does nothing when neither `TSB_LOG` nor `RUST_LOG` is set.
pub fn init_tracing() {
    let has_tsb_log = std::env::var("TSB_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_tsb_log && !has_rust_log {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).init();
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
