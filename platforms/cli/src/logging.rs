//! Diagnostics for the command-line runner, controlled by `RUST_LOG` and written to stderr so
//! they never mix with the tape printed on stdout.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber. Defaults to `warn`, or `debug` for the engine when
/// `verbose` is set and `RUST_LOG` is not.
pub fn init(verbose: bool) {
    let fallback = if verbose { "warn,tmsim=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
