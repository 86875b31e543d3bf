//! Viewer configuration
//!
//! # Configuration Sources (in priority order)
//!
//! 1. Command line flags (applied by the frontend)
//! 2. Environment variables: `VISTA_SOURCE`, `VISTA_ENV`, `VISTA_MIN_DISTANCE`,
//!    `VISTA_DEPTH_RANGE`, `VISTA_RESOLUTION`, `VISTA_WATCH`
//! 3. Config file: explicit path, or `vista.toml` in the working directory
//! 4. Defaults
//!
//! # Example Config File
//!
//! ```toml
//! [source]
//! location = "https://192.168.1.20:4443"
//! environment = "cave"
//!
//! [mesh]
//! min_distance = 2.0
//! depth_range = 3.0
//! resolution_index = 2
//!
//! [input]
//! pointer_sensitivity = [0.1, 0.1]
//!
//! [window]
//! width = 1600
//! height = 900
//! fov_degrees = 75.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vista_input::{PINCH_THRESHOLD, POINTER_SENSITIVITY, ROTATION_STEP_DEGREES, SNAP_DEADZONE};
use vista_mesh::MeshSettings;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "vista.toml";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where environments are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Site root directory or server URL
    pub location: String,
    /// Environment to open first (defaults to the first listed)
    pub environment: Option<String>,
    /// Re-list environments when a local root changes
    pub watch: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: ".".to_string(),
            environment: None,
            watch: true,
        }
    }
}

/// Input tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Degrees per pixel, horizontal and vertical
    pub pointer_sensitivity: [f32; 2],
    /// Degrees per keyboard or thumbstick step
    pub rotation_step: f32,
    /// Thumbstick centering threshold
    pub snap_deadzone: f32,
    /// Fingertip distance that counts as a pinch, in meters
    pub pinch_threshold: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            pointer_sensitivity: [POINTER_SENSITIVITY, POINTER_SENSITIVITY],
            rotation_step: ROTATION_STEP_DEGREES,
            snap_deadzone: SNAP_DEADZONE,
            pinch_threshold: PINCH_THRESHOLD,
        }
    }
}

/// Window and camera
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Vertical field of view
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Vista".to_string(),
            width: 1280,
            height: 720,
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub source: SourceConfig,
    pub mesh: MeshSettings,
    pub input: InputConfig,
    pub window: WindowConfig,
    /// File this config was read from
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl ViewerConfig {
    /// Load from defaults, a config file and the process environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::load_from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;
        config.config_path = Some(path.to_path_buf());
        log::info!("Loaded viewer config from {:?}", path);
        Ok(config)
    }

    /// Parse TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `VISTA_*` overrides looked up through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(source) = lookup("VISTA_SOURCE").filter(|s| !s.is_empty()) {
            log::info!("Source from env: {}", source);
            self.source.location = source;
        }
        if let Some(env) = lookup("VISTA_ENV").filter(|s| !s.is_empty()) {
            self.source.environment = Some(env);
        }
        if let Some(watch) = lookup("VISTA_WATCH") {
            self.source.watch = watch == "1" || watch == "true";
        }
        if let Some(value) = lookup("VISTA_MIN_DISTANCE").and_then(|v| v.parse().ok()) {
            self.mesh.min_distance = value;
        }
        if let Some(value) = lookup("VISTA_DEPTH_RANGE").and_then(|v| v.parse().ok()) {
            self.mesh.depth_range = value;
        }
        if let Some(value) = lookup("VISTA_RESOLUTION").and_then(|v| v.parse().ok()) {
            self.mesh.resolution_index = value;
        }
    }

    /// Reject values the viewer cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mesh
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid("window size must be non-zero".into()));
        }
        if !(self.window.fov_degrees > 0.0 && self.window.fov_degrees < 180.0) {
            return Err(ConfigError::Invalid(format!(
                "fov_degrees must be in (0, 180), got {}",
                self.window.fov_degrees
            )));
        }
        if !(self.input.snap_deadzone >= 0.0 && self.input.snap_deadzone < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_deadzone must be in [0, 1), got {}",
                self.input.snap_deadzone
            )));
        }
        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        log::info!("=== Viewer Configuration ===");
        if let Some(path) = &self.config_path {
            log::info!("  Config file: {:?}", path);
        }
        log::info!("  Source: {}", self.source.location);
        log::info!(
            "  Environment: {}",
            self.source.environment.as_deref().unwrap_or("(first listed)")
        );
        log::info!(
            "  Mesh: min {} range {} resolution #{} ({})",
            self.mesh.min_distance,
            self.mesh.depth_range,
            self.mesh.resolution_index,
            self.mesh.resolution()
        );
        log::info!(
            "  Window: {}x{} fov {}",
            self.window.width,
            self.window.height,
            self.window.fov_degrees
        );
        log::info!("============================");
    }
}
