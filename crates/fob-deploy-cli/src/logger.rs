//! Logging setup for the `fob-deploy` binary.
//!
//! Log lines go to stderr so that stdout stays clean for the identifier,
//! mode or JSON document a command prints.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global tracing subscriber.
///
/// The filter is chosen in this order:
/// 1. `--verbose`: debug for the fob-deploy crates
/// 2. `--quiet`: errors only
/// 3. `RUST_LOG`
/// 4. info for the fob-deploy crates
///
/// Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(verbose, quiet), no_color);
}

/// Install the global subscriber with an explicit filter.
///
/// # Arguments
///
/// * `filter` - Directives to apply, e.g. `EnvFilter::new("fob_deploy=trace")`
/// * `no_color` - Disable ANSI escapes in log lines
///
/// # Examples
///
/// ```no_run
/// use fob_deploy_cli::logger::init_logger_with_filter;
/// use tracing_subscriber::EnvFilter;
///
/// init_logger_with_filter(EnvFilter::new("fob_deploy=trace"), true);
/// ```
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("fob_deploy=debug,fob_deploy_cli=debug")
    } else if quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("fob_deploy=info,fob_deploy_cli=info"))
    }
}
