use env_logger::Env;

/// Log warnings by default, debug output with `--verbose`.
/// `RUST_LOG` takes precedence over both.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };

    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}
