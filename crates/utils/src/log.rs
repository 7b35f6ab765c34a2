use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Installs the global fmt subscriber. `RUST_LOG` wins over `default_directive`.
///
/// Calling this twice is harmless; the second install is ignored.
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .try_init();
}
