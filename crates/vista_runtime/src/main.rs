//! Vista - 360° depth environment viewer
//!
//! Opens a window showing an environment sphere. Environments come from a
//! local site root or an environment server.
//!
//! Run with: cargo run -p vista_runtime -- --source ./site
//!       or: cargo run --bin vista -- --url "https://host:4443/environments.html?env=cave"

mod app;
mod bindings;
mod presenter;
mod sphere_renderer;

use std::path::PathBuf;

use clap::Parser;

use vista_asset::{AssetSource, EnvironmentLoader};
use vista_viewer::{LaunchRequest, ViewerConfig};
use vista_xr::{SimulatedBackend, XrSystem};

use crate::app::ViewerApp;

#[derive(Parser, Debug)]
#[command(name = "vista", version)]
#[command(about = "360° depth environment viewer")]
struct Cli {
    /// Config file (defaults to ./vista.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Site root directory or server URL
    #[arg(short, long)]
    source: Option<String>,

    /// Environment to open first
    #[arg(short, long)]
    env: Option<String>,

    /// Viewer link, e.g. https://host:4443/environments.html?env=cave
    #[arg(long, conflicts_with = "source")]
    url: Option<String>,

    /// Drive the immersive paths with a scripted in-process XR backend
    #[arg(long)]
    simulate_xr: bool,

    /// Do not watch a local site root for new environments
    #[arg(long)]
    no_watch: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    run(cli).map_err(|e| {
        log::error!("{}", e);
        e
    })
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ViewerConfig::load(cli.config.as_deref())?;
    apply_cli(&mut config, &cli)?;
    config.validate()?;
    config.print_summary();

    let source = AssetSource::parse(&config.source.location)?;
    let loader = EnvironmentLoader::new(source)?;

    let mut xr = XrSystem::new();
    let simulated = if cli.simulate_xr {
        let (backend, handle) = SimulatedBackend::new();
        xr.register_backend(Box::new(backend));
        Some(handle)
    } else {
        None
    };
    xr.initialize()?;

    ViewerApp::new(config, loader, xr, simulated).run()
}

/// Command line flags take precedence over file and environment settings.
fn apply_cli(config: &mut ViewerConfig, cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(url) = &cli.url {
        LaunchRequest::from_url(url)?.apply(config);
    }
    if let Some(source) = &cli.source {
        config.source.location = source.clone();
    }
    if let Some(env) = &cli.env {
        config.source.environment = Some(env.clone());
    }
    if cli.no_watch {
        config.source.watch = false;
    }
    Ok(())
}
