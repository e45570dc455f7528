pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static INIT_TRACING: Once = Once::new();

/// Installs the global tracing subscriber. Diagnostics go to stderr so they
/// never interleave with shell output on stdout.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let filter =
            EnvFilter::from_default_env().add_directive("renobudget=info".parse().unwrap());

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}
