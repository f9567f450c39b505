//! kvconf - inspect and validate JSON key-value configs

use clap::Parser;
use kvconf::cli::Cli;
use kvconf::utils::DisplayUtils;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.debug);

    info!("Starting kvconf");

    if let Err(e) = cli.execute() {
        error!("Error: {}", e);
        DisplayUtils::new(cli.no_color).print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "kvconf=debug" } else { "kvconf=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
