use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "cargoflux")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Shipment registry operator shell. Reads commands from stdin.")]
pub struct Cli {
    /// Configuration file. Defaults to `cargoflux.{toml,json,yaml}` in the working directory.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
