//! Diagnostic logging setup
//!
//! Diagnostics go to stderr through `tracing`. The change history of user data
//! is kept separately in the audit log.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

/// Level implied by the number of `-v` flags, falling back to `configured`
pub fn level_for_verbosity(verbose: u8, configured: &str) -> String {
    match verbose {
        0 => configured.to_string(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber once
///
/// `RUST_LOG` wins when set; otherwise only this crate logs, at `level`.
pub fn init_tracing(level: &str) {
    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("spendwise={}", level)));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    });
}
