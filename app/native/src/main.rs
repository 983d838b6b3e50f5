//! pixellwp command-line entry point.

use tracing_subscriber::EnvFilter;

/// Log directive used when `RUST_LOG` is not set.
const DEFAULT_LOG_DIRECTIVE: &str = "pixellwp=info,pixellwp_lib=info";

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_DIRECTIVE));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    if let Err(err) = pixellwp_lib::cli::run() {
        eprintln!("pixellwp: {err}");
        std::process::exit(1);
    }
}
