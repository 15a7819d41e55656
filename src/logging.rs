//! Logger bootstrap for the headless runner and tests.

use env_logger::{Builder, Env};
use log::LevelFilter;

/// Initializes the global logger.
///
/// `RUST_LOG` wins when set. Otherwise `verbose` selects `debug` for this
/// crate (transition and terrain binding messages) and `info` for everything
/// else; without it only `info` and above are shown.
pub fn init(verbose: bool) {
    let default_filter = if verbose {
        format!("{},{}={}", LevelFilter::Info, env!("CARGO_CRATE_NAME"), LevelFilter::Debug)
    } else {
        LevelFilter::Info.to_string()
    };

    let env = Env::default().default_filter_or(default_filter);
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // `try_init` only fails if a logger was already set. Ignore that case so
    // tests can call `init` multiple times without panicking.
    let _ = builder.try_init();
}
