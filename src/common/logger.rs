use std::sync::Once;

use env_logger::Builder;
use log::LevelFilter;

static INIT: Once = Once::new();

/// Installs the process logger. Only the first call has any effect.
pub fn initialize_logger(debug: bool) {
    // Use call_once_force to recover if an earlier initialization attempt panicked.
    INIT.call_once_force(|_| {
        let crate_level = if debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };

        let mut builder = Builder::new();

        builder
            .filter_level(LevelFilter::Info)
            .filter_module("chainhash", crate_level)
            .filter_module("rustyline", LevelFilter::Warn)
            .format_timestamp_millis()
            .parse_default_env();

        // Avoid panicking if the logger was already initialized elsewhere.
        let _ = builder.try_init();
    });
}
