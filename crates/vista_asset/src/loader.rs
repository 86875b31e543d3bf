//! Background environment loading
//!
//! Loads run on a small tokio runtime owned by the loader. Completions are
//! queued on a channel and collected by the render thread with
//! [`EnvironmentLoader::poll`]. Every request carries the [`Generation`] it
//! was issued under so the receiver can discard superseded results.

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use vista_core::{Generation, ViewerError};

use crate::decode::{decode_image, ColorImage, Environment};
use crate::error::{AssetError, AssetResult};
use crate::listing::EnvironmentListing;
use crate::source::{environment_path, AssetSource, COLOR_FILE, DEPTH_FILE};

/// Result of one environment request
#[derive(Debug)]
pub struct LoadCompletion {
    /// Generation the request was issued under
    pub generation: Generation,
    /// Requested environment
    pub name: String,
    /// Loaded environment, or why the color image failed
    pub result: Result<Environment, ViewerError>,
}

/// Loads environments from an [`AssetSource`] off the calling thread
pub struct EnvironmentLoader {
    source: AssetSource,
    client: reqwest::Client,
    runtime: tokio::runtime::Runtime,
    tx: Sender<LoadCompletion>,
    rx: Receiver<LoadCompletion>,
}

impl EnvironmentLoader {
    /// Create a loader for `source`
    pub fn new(source: AssetSource) -> AssetResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("vista-loader")
            .enable_all()
            .build()
            .map_err(|e| AssetError::Runtime(format!("Failed to create runtime: {}", e)))?;
        let client = reqwest::Client::builder().build()?;
        let (tx, rx) = crossbeam_channel::unbounded();

        log::info!("Environment loader reading from {:?}", source);
        Ok(Self {
            source,
            client,
            runtime,
            tx,
            rx,
        })
    }

    /// Source in use
    pub fn source(&self) -> &AssetSource {
        &self.source
    }

    /// Fetch the listing, blocking the caller.
    pub fn list_environments(&self) -> AssetResult<EnvironmentListing> {
        self.runtime.block_on(self.source.list(&self.client))
    }

    /// Start loading `name`. The completion arrives through [`poll`](Self::poll).
    pub fn request(&self, name: &str, generation: Generation) {
        let source = self.source.clone();
        let client = self.client.clone();
        let tx = self.tx.clone();
        let name = name.to_string();

        log::info!("Loading environment '{}' ({})", name, generation);
        self.runtime.spawn(async move {
            let result = load_environment(&source, &client, &name).await;
            if tx
                .send(LoadCompletion {
                    generation,
                    name,
                    result,
                })
                .is_err()
            {
                log::debug!("Loader dropped before completion was delivered");
            }
        });
    }

    /// Collect finished loads without blocking
    pub fn poll(&self) -> Vec<LoadCompletion> {
        self.rx.try_iter().collect()
    }

    /// Wait for the next finished load
    pub fn wait(&self, timeout: Duration) -> Option<LoadCompletion> {
        self.rx.recv_timeout(timeout).ok()
    }

    /// Load `name` on the calling thread
    pub fn load_blocking(&self, name: &str) -> Result<Environment, ViewerError> {
        self.runtime
            .block_on(load_environment(&self.source, &self.client, name))
    }
}

/// Fetch and decode both images of an environment.
///
/// A color failure fails the load; a depth failure only drops the depth map.
pub async fn load_environment(
    source: &AssetSource,
    client: &reqwest::Client,
    name: &str,
) -> Result<Environment, ViewerError> {
    let color_path = environment_path(name, COLOR_FILE).map_err(|e| required(source, name, e))?;
    let depth_path = environment_path(name, DEPTH_FILE).map_err(|e| required(source, name, e))?;

    let (color_bytes, depth_bytes) = tokio::join!(
        source.fetch(client, &color_path),
        source.fetch(client, &depth_path)
    );

    let color = color_bytes
        .and_then(|bytes| ColorImage::decode(&bytes, &color_path))
        .map_err(|e| required(source, &color_path, e))?;

    let depth = match depth_bytes.and_then(|bytes| decode_image(&bytes, &depth_path)) {
        Ok(image) => Some(image),
        Err(e) => {
            log::warn!(
                "Depth map not available for environment \"{}\" ({}). Proceeding without depth deformation.",
                name,
                e
            );
            None
        }
    };

    log::info!(
        "Loaded environment '{}' ({}x{}, depth: {})",
        name,
        color.width,
        color.height,
        depth.is_some()
    );
    Ok(Environment {
        name: name.to_string(),
        color,
        depth,
    })
}

fn required(source: &AssetSource, path: &str, e: AssetError) -> ViewerError {
    ViewerError::RequiredAsset {
        path: source.describe(path),
        reason: e.to_string(),
    }
}
