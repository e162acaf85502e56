use clap::Parser;
use eventide_app::cli::Cli;
use eventide_app::commands::run;
use eventide_core::config::load_config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    tracing::debug!(command = ?cli.command, "Starting eventide");

    let stdout = std::io::stdout();
    run(&cli, &config, &mut stdout.lock())?;

    Ok(())
}
