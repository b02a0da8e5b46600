//! Logging infrastructure for nbfix
//!
//! Diagnostics go through `tracing` to stderr; the operator-facing report is printed
//! separately by the CLI, so logs never interleave with `--json` output on stdout.

use tracing::{Level, span};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "nbfix=warn,nbfix_engine=warn,nbfix_config=warn,warn";

/// Filter used with `--verbose` when `RUST_LOG` is unset
const VERBOSE_FILTER: &str = "nbfix=debug,nbfix_engine=debug,nbfix_config=debug,info";

/// Pick the env filter: `RUST_LOG` wins, otherwise the verbosity default.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }))
        .unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Initialize the tracing subscriber.
///
/// Verbose mode adds targets and span-close timings; the default is a compact single line.
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false);

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter(true))
            .with(layer.with_span_events(fmt::format::FmtSpan::CLOSE).compact())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter(false))
            .with(layer.compact())
            .try_init()?;
    }

    Ok(())
}

/// Span wrapping one repair transaction
#[must_use]
pub fn repair_span(path: &str, mode: &str) -> tracing::Span {
    span!(Level::INFO, "repair", path = %path, mode = %mode)
}
