use anyhow::Context;
use cflux_kernel::config::load_app_config;
use cflux_logger::Logger;
use cflux_shell::cli::Cli;
use cflux_shell::Session;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config =
        load_app_config(cli.config.as_deref()).context("Critical: Configuration is malformed")?;

    let _log = Logger::from_config(env!("CARGO_BIN_NAME"), &config.logging)?;

    let registry =
        cflux_shipments::init(&config.registry).context("Failed to open the shipment registry")?;

    let session = Session::new(registry, config.registry.snapshot.clone());
    session.run(std::io::stdin().lock(), std::io::stdout().lock())
}
