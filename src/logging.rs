// src/logging.rs
// =============================================================================
// Sets up tracing output for the CLI.
//
// The core modules emit tracing events (listings, downloads, config
// creation) but never print. Here we decide what reaches the terminal:
// - RUST_LOG, if set, wins (e.g. RUST_LOG=kata=debug)
// - otherwise: warnings only, -v for info, -vv for debug
//
// Logs go to stderr so they never mix with command output on stdout
// (e.g. `kata debug explore --json`).
// =============================================================================

use tracing_subscriber::EnvFilter;

/// Base level for a given number of -v flags
fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Builds the filter, keeping the HTTP stack quiet unless RUST_LOG asks for it
fn build_env_filter(verbosity: u8) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut directives = vec![level_for(verbosity).to_string()];
    for noisy in ["hyper", "reqwest", "rustls", "h2"] {
        directives.push(format!("{noisy}=warn"));
    }

    let filter_str = directives.join(",");
    EnvFilter::try_new(&filter_str)
        .map_err(|e| anyhow::anyhow!("Invalid tracing filter '{}': {}", filter_str, e))
}

/// Installs the global subscriber; call once, at startup
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbosity)?)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}
