use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout stays clean for the JSON output.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--debug`.
pub fn init_tracing(debug: bool) {
	let default_level = if debug { "debug" } else { "info" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(debug)
		.compact()
		.try_init();
}
