//! # vista_asset - Environment Assets
//!
//! An environment is a directory under `environments/` holding a required
//! `skybox.png` and an optional `depth.png`. This crate:
//! - Resolves where environments come from ([`AssetSource`]: a local site
//!   root or an HTTP server)
//! - Lists them ([`EnvironmentListing`])
//! - Loads them off the render thread ([`EnvironmentLoader`]), degrading a
//!   missing depth map to "no depth"
//! - Saves new ones ([`EnvironmentStore`])
//! - Watches a local root for changes ([`EnvironmentWatcher`])

pub mod decode;
pub mod error;
pub mod listing;
pub mod loader;
pub mod source;
pub mod store;
#[cfg(feature = "file-watcher")]
pub mod watcher;

pub use decode::{ColorImage, Environment};
pub use error::{AssetError, AssetResult};
pub use listing::{list_environment_dirs, EnvironmentListing};
pub use loader::{EnvironmentLoader, LoadCompletion};
pub use source::{
    environment_path, is_valid_name, AssetSource, COLOR_FILE, DEPTH_FILE, ENVIRONMENTS_DIR,
    LISTING_PATH,
};
pub use store::{sanitize_name, CompletionRecord, EnvironmentStore};
#[cfg(feature = "file-watcher")]
pub use watcher::EnvironmentWatcher;
