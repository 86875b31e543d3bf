//! Where environments come from

use std::path::{Path, PathBuf};

use url::Url;

use crate::error::{AssetError, AssetResult};
use crate::listing::{list_environment_dirs, EnvironmentListing};

/// Directory holding one sub-directory per environment
pub const ENVIRONMENTS_DIR: &str = "environments";
/// Required color image
pub const COLOR_FILE: &str = "skybox.png";
/// Optional depth image
pub const DEPTH_FILE: &str = "depth.png";
/// Listing endpoint, relative to an HTTP source
pub const LISTING_PATH: &str = "list_environments";

/// Site root that environments are read from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetSource {
    /// Local directory containing `environments/`
    Directory(PathBuf),
    /// Server exposing `list_environments` and `environments/...`
    Http(Url),
}

impl AssetSource {
    /// Interpret `http://` and `https://` strings as servers, anything else as
    /// a local directory.
    pub fn parse(source: &str) -> AssetResult<Self> {
        let trimmed = source.trim();
        if trimmed.is_empty() {
            return Err(AssetError::InvalidSource(source.to_string()));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            let mut url = Url::parse(trimmed)?;
            // Relative joins must append to the path, not replace its last segment.
            if !url.path().ends_with('/') {
                let path = format!("{}/", url.path());
                url.set_path(&path);
            }
            url.set_query(None);
            url.set_fragment(None);
            Ok(Self::Http(url))
        } else {
            Ok(Self::Directory(PathBuf::from(trimmed)))
        }
    }

    /// Local site root, if this is a directory source
    pub fn root(&self) -> Option<&Path> {
        match self {
            Self::Directory(root) => Some(root),
            Self::Http(_) => None,
        }
    }

    /// Human-readable location of a relative asset path
    pub fn describe(&self, relative: &str) -> String {
        match self {
            Self::Directory(root) => root.join(relative).display().to_string(),
            Self::Http(base) => base
                .join(relative)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| format!("{}{}", base, relative)),
        }
    }

    /// Read an asset's bytes.
    pub async fn fetch(&self, client: &reqwest::Client, relative: &str) -> AssetResult<Vec<u8>> {
        match self {
            Self::Directory(root) => {
                let path = root.join(relative);
                match tokio::fs::read(&path).await {
                    Ok(bytes) => Ok(bytes),
                    Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                        Err(AssetError::NotFound(path.display().to_string()))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Self::Http(base) => {
                let url = base.join(relative)?;
                log::debug!("GET {}", url);
                let response = client.get(url.clone()).send().await?;
                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(AssetError::NotFound(url.to_string()));
                }
                if !status.is_success() {
                    return Err(AssetError::Status {
                        url: url.to_string(),
                        status: status.as_u16(),
                    });
                }
                Ok(response.bytes().await?.to_vec())
            }
        }
    }

    /// Fetch the environment listing.
    pub async fn list(&self, client: &reqwest::Client) -> AssetResult<EnvironmentListing> {
        match self {
            Self::Directory(root) => Ok(EnvironmentListing::new(list_environment_dirs(
                &root.join(ENVIRONMENTS_DIR),
            )?)),
            Self::Http(_) => {
                let bytes = self.fetch(client, LISTING_PATH).await?;
                Ok(serde_json::from_slice(&bytes)?)
            }
        }
    }
}

/// Relative path of `file` inside environment `name`.
///
/// Names that could escape the environments directory are rejected.
pub fn environment_path(name: &str, file: &str) -> AssetResult<String> {
    if !is_valid_name(name) {
        return Err(AssetError::InvalidName(name.to_string()));
    }
    Ok(format!("{}/{}/{}", ENVIRONMENTS_DIR, name, file))
}

/// Whether `name` is a single, non-special path component.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_http() {
        let source = AssetSource::parse("https://10.0.0.2:4443").unwrap();
        let AssetSource::Http(url) = &source else {
            panic!("expected http source");
        };
        assert_eq!(url.as_str(), "https://10.0.0.2:4443/");
        assert_eq!(
            source.describe("environments/cave/skybox.png"),
            "https://10.0.0.2:4443/environments/cave/skybox.png"
        );
    }

    #[test]
    fn test_parse_http_subpath_keeps_prefix() {
        let source = AssetSource::parse("http://host/viewer?x=1").unwrap();
        assert_eq!(
            source.describe("list_environments"),
            "http://host/viewer/list_environments"
        );
    }

    #[test]
    fn test_parse_directory() {
        let source = AssetSource::parse("./site").unwrap();
        assert_eq!(source.root(), Some(Path::new("./site")));
        assert!(AssetSource::parse("  ").is_err());
    }

    #[test]
    fn test_environment_path() {
        assert_eq!(
            environment_path("beach", COLOR_FILE).unwrap(),
            "environments/beach/skybox.png"
        );
        assert!(environment_path("..", COLOR_FILE).is_err());
        assert!(environment_path("a/b", COLOR_FILE).is_err());
        assert!(environment_path("", DEPTH_FILE).is_err());
    }
}
