//! Environment server binary
//!
//! Run with: cargo run -p vista_server -- --root ./site

use std::path::PathBuf;

use clap::Parser;

use vista_server::{serve, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "vista-server", version)]
#[command(about = "Serve Vista environments over HTTP")]
struct Cli {
    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site root containing environments/
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Listening port
    #[arg(short, long)]
    port: Option<u16>,

    /// Interface to listen on
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref()).map_err(|e| {
        log::error!("{}", e);
        e
    })?;
    if let Some(root) = cli.root {
        config.root = root;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }
    config.print_summary();

    serve(&config).await.map_err(|e| {
        log::error!("Server stopped: {}", e);
        e.into()
    })
}
