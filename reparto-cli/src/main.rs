//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() {
    init_logging();
    match reparto_cli::run() {
        Ok(()) => {}
        Err(reparto_cli::CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("reparto: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
    if let Err(err) = installed {
        eprintln!("reparto: logging disabled: {err}");
    }
}
