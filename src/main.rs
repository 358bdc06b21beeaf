//! Bridge entry point: parse the CLI surface, assemble configuration, load
//! the packet catalog, and run the relay until interrupted.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use packet_bridge::config::ProxyConfig;
use packet_bridge::protocol::registry::PacketRegistry;
use packet_bridge::transport::relay;
use packet_bridge::utils::logging;

#[derive(Parser, Debug)]
#[command(
    name = "packet-bridge",
    version,
    about = "Version-aware packet interception bridge for binary game protocols"
)]
struct Cli {
    /// Address to listen on [default: 0.0.0.0]
    #[arg(short = 'a', long)]
    listen_host: Option<String>,

    /// Port to listen on [default: 25565]
    #[arg(short = 'p', long)]
    listen_port: Option<u16>,

    /// Path to the packet catalog CSV [default: data/packets.csv]
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// TOML configuration file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to connect to
    connect_host: String,

    /// Port to connect to
    connect_port: u16,
}

fn build_config(cli: &Cli) -> packet_bridge::Result<ProxyConfig> {
    let mut config = match &cli.config {
        Some(path) => ProxyConfig::from_file(path)?,
        None => ProxyConfig::default(),
    };
    config.apply_env();

    if let Some(host) = &cli.listen_host {
        config.listen.host = host.clone();
    }
    if let Some(port) = cli.listen_port {
        config.listen.port = port;
    }
    if let Some(path) = &cli.catalog {
        config.catalog.path = path.clone();
    }
    config.connect.host = cli.connect_host.clone();
    config.connect.port = cli.connect_port;

    config.validate_strict()?;
    Ok(config)
}

async fn run(cli: Cli) -> packet_bridge::Result<()> {
    let config = build_config(&cli)?;
    logging::init(&config.logging)?;

    let registry = Arc::new(PacketRegistry::load_file(&config.catalog.path)?);
    relay::run(&config, registry).await
}

#[tokio::main]
async fn main() -> ExitCode {
    // Missing positional arguments make clap print usage and exit before
    // the listener ever starts.
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("packet-bridge: {e}");
            ExitCode::FAILURE
        }
    }
}
