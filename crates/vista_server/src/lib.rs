//! # vista_server - Environment Server
//!
//! Publishes a site root over plain HTTP in the layout the viewer reads:
//! a directory listing, the environment images, the port a host
//! application links to, and the site's own static pages. TLS, when wanted,
//! belongs to a fronting proxy.
//!
//! ## Example
//!
//! ```ignore
//! use vista_server::{serve, ServerConfig};
//!
//! let config = ServerConfig::load(None)?;
//! serve(&config).await?;
//! ```

pub mod config;
pub mod error;
pub mod host;
pub mod routes;

pub use config::{ServerConfig, DEFAULT_PORT};
pub use error::{ServerError, ServerResult};
pub use host::{menu_url, parse_completion, viewer_url, GetUrlResponse, LINK_SCHEME};
pub use routes::{router, ServerState, INDEX_PAGE};

/// Listen and serve until the task is cancelled
pub async fn serve(config: &ServerConfig) -> ServerResult<()> {
    let addr = config.socket_addr()?;
    let environments = config.environments_dir();
    if !environments.exists() {
        std::fs::create_dir_all(&environments)?;
        log::info!("Created {:?}", environments);
    }

    let app = router(ServerState::new(config));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Serving environments on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
