use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset. wgpu is chatty at info level.
pub const DEFAULT_FILTER: &str = "survive_and_poop=info,wgpu_core=warn,wgpu_hal=warn";

/// Install the global tracing subscriber.
///
/// Returns an error if a subscriber was already installed (e.g. when called
/// twice from tests); callers are free to ignore that.
pub fn init() -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .try_init()
}
