//! Tracing initialization
//!
//! Provides standardized tracing setup for the Compass binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Map a `-v` count to a default level for the given crate.
fn default_directive(crate_name: &str, verbosity: u8) -> String {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    format!("{}={}", crate_name.replace('-', "_"), level)
}

/// Initialize tracing/logging
///
/// Sets up logging to stderr (stdout carries the rendered results) with:
/// - Environment-based filtering via RUST_LOG
/// - A default level for `crate_name` derived from `verbosity`
///   (0 = warn, 1 = info, 2 = debug, 3+ = trace)
///
/// Set `LOG_FORMAT=json` for structured JSON output.
/// Default is human-readable text output without ANSI colors.
///
/// # Example
///
/// ```rust,ignore
/// compass_common::init_tracing("compass", cli.verbose)?;
/// ```
pub fn init_tracing(crate_name: &str, verbosity: u8) -> anyhow::Result<()> {
    let directive = default_directive(crate_name, verbosity);
    let filter = EnvFilter::from_default_env().add_directive(directive.parse()?);

    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);

    if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // The subscriber itself can only be installed once per process,
    // so only the directive mapping is tested here.

    #[test]
    fn test_default_directive_levels() {
        assert_eq!(default_directive("compass", 0), "compass=warn");
        assert_eq!(default_directive("compass", 1), "compass=info");
        assert_eq!(default_directive("compass", 2), "compass=debug");
        assert_eq!(default_directive("compass", 7), "compass=trace");
    }

    #[test]
    fn test_default_directive_normalizes_crate_name() {
        assert_eq!(default_directive("compass-common", 1), "compass_common=info");
    }
}
