//! Server configuration
//!
//! Defaults, then an optional TOML file, then `VISTA_SERVER_BIND`,
//! `VISTA_SERVER_PORT` and `VISTA_SERVER_ROOT`, then command line flags.
//!
//! ```toml
//! bind = "0.0.0.0"
//! port = 4443
//! root = "/srv/vista"
//! ```

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vista_asset::ENVIRONMENTS_DIR;

use crate::error::{ServerError, ServerResult};

/// Port the viewer and host links assume by default
pub const DEFAULT_PORT: u16 = 4443;

/// Environment server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to listen on
    pub bind: String,
    /// Listening port, also reported by `POST /get_url`
    pub port: u16,
    /// Site root containing `environments/`
    pub root: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            root: PathBuf::from("."),
        }
    }
}

impl ServerConfig {
    /// Load defaults, an optional file and the process environment
    pub fn load(path: Option<&Path>) -> ServerResult<Self> {
        let mut config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `VISTA_SERVER_*` overrides looked up through `lookup`
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("VISTA_SERVER_BIND").filter(|s| !s.is_empty()) {
            self.bind = bind;
        }
        if let Some(port) = lookup("VISTA_SERVER_PORT") {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => log::warn!("Ignoring invalid VISTA_SERVER_PORT: {}", port),
            }
        }
        if let Some(root) = lookup("VISTA_SERVER_ROOT").filter(|s| !s.is_empty()) {
            self.root = PathBuf::from(root);
        }
    }

    /// Address to listen on
    pub fn socket_addr(&self) -> ServerResult<SocketAddr> {
        let ip: IpAddr = self
            .bind
            .parse()
            .map_err(|_| ServerError::Invalid(format!("bind must be an IP address, got {:?}", self.bind)))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Directory holding one sub-directory per environment
    pub fn environments_dir(&self) -> PathBuf {
        self.root.join(ENVIRONMENTS_DIR)
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("=== Server Configuration ===");
        log::info!("  Listen: {}:{}", self.bind, self.port);
        log::info!("  Root: {:?}", self.root);
        log::info!("============================");
    }
}
