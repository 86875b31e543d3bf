//! Saving environments to disk
//!
//! Used by the bake tool when a generation job hands over a finished
//! texture (and optionally a depth map). Names are sanitized and made unique
//! so a save never overwrites an existing environment.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};

use crate::error::{AssetError, AssetResult};
use crate::listing::list_environment_dirs;
use crate::source::{COLOR_FILE, DEPTH_FILE};

/// Longest sanitized name kept before truncation.
pub const MAX_NAME_LEN: usize = 25;

/// Replace characters that are not allowed in directory names, trim trailing
/// spaces and dots, and shorten long names.
///
/// Names left empty become the current unix timestamp.
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '\\' | '/' | '*' | '?' | ':' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_end_matches([' ', '.']);

    if trimmed.is_empty() {
        return unix_timestamp();
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        let short: String = trimmed.chars().take(MAX_NAME_LEN).collect();
        return format!("{}...", short);
    }
    trimmed.to_string()
}

fn unix_timestamp() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
        .to_string()
}

/// Payload a host application receives when a save completes.
///
/// Both fields are lists; consumers join them into single strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    #[serde(deserialize_with = "one_or_many")]
    pub env_name: Vec<String>,
    #[serde(deserialize_with = "one_or_many")]
    pub env_port: Vec<String>,
}

impl CompletionRecord {
    /// Record for a saved environment served on `port`
    pub fn new(name: &str, port: u16) -> Self {
        Self {
            env_name: vec![name.to_string()],
            env_port: vec![port.to_string()],
        }
    }

    /// Joined environment name
    pub fn name(&self) -> String {
        self.env_name.concat()
    }

    /// Joined port
    pub fn port(&self) -> String {
        self.env_port.concat()
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

/// Environment directory on disk
pub struct EnvironmentStore {
    root: PathBuf,
}

impl EnvironmentStore {
    /// Store rooted at an `environments/` directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the environments
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sorted environment names
    pub fn list(&self) -> AssetResult<Vec<String>> {
        list_environment_dirs(&self.root)
    }

    /// `base`, or `base 2`, `base 3`, ... whichever is not taken yet.
    pub fn unique_name(&self, base: &str) -> AssetResult<String> {
        let existing = self.existing_entries()?;
        let mut candidate = base.to_string();
        let mut counter = 2;
        while existing.iter().any(|e| e == &candidate) {
            candidate = format!("{} {}", base, counter);
            counter += 1;
        }
        Ok(candidate)
    }

    /// Save one environment. Returns the name it was saved under.
    pub fn save(
        &self,
        name: &str,
        color: &DynamicImage,
        depth: Option<&DynamicImage>,
    ) -> AssetResult<String> {
        let mut saved = self.save_batch(name, std::slice::from_ref(color), depth.map(std::slice::from_ref))?;
        saved.pop().ok_or_else(|| AssetError::InvalidName(name.to_string()))
    }

    /// Save a batch of environments sharing one base name.
    ///
    /// `depths`, when given, must have one entry per color image.
    pub fn save_batch(
        &self,
        name: &str,
        colors: &[DynamicImage],
        depths: Option<&[DynamicImage]>,
    ) -> AssetResult<Vec<String>> {
        if let Some(depths) = depths {
            if !depths.is_empty() && depths.len() != colors.len() {
                return Err(AssetError::BatchMismatch {
                    colors: colors.len(),
                    depths: depths.len(),
                });
            }
        }

        std::fs::create_dir_all(&self.root)?;

        let mut name = sanitize_name(name);
        let mut saved = Vec::with_capacity(colors.len());
        for (index, color) in colors.iter().enumerate() {
            name = self.unique_name(&name)?;
            let dir = self.root.join(&name);
            std::fs::create_dir(&dir)?;

            write_png(color, &dir.join(COLOR_FILE))?;
            if let Some(depth) = depths.and_then(|d| d.get(index)) {
                write_png(depth, &dir.join(DEPTH_FILE))?;
            }
            log::info!("Saved environment '{}' to {:?}", name, dir);
            saved.push(name.clone());
        }
        Ok(saved)
    }

    fn existing_entries(&self) -> AssetResult<Vec<String>> {
        if !self.root.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            if let Ok(name) = entry?.file_name().into_string() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

fn write_png(image: &DynamicImage, path: &Path) -> AssetResult<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| AssetError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_replaces_reserved() {
        assert_eq!(sanitize_name(r#"a/b\c*d?e:f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_sanitize_trims_trailing() {
        assert_eq!(sanitize_name("sunset. . "), "sunset");
        assert_eq!(sanitize_name(" lead"), " lead");
    }

    #[test]
    fn test_sanitize_truncates() {
        let long = "abcdefghijklmnopqrstuvwxyz0123";
        assert_eq!(sanitize_name(long), "abcdefghijklmnopqrstuvwxy...");
        assert_eq!(sanitize_name(&long[..25]), &long[..25]);
    }

    #[test]
    fn test_sanitize_empty_is_timestamp() {
        let name = sanitize_name("");
        assert!(!name.is_empty());
        assert!(name.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_completion_record_accepts_strings_and_lists() {
        let from_list: CompletionRecord =
            serde_json::from_str(r#"{"env_name":["ca","ve"],"env_port":["4443"]}"#).unwrap();
        assert_eq!(from_list.name(), "cave");
        assert_eq!(from_list.port(), "4443");

        let from_str: CompletionRecord =
            serde_json::from_str(r#"{"env_name":"cave","env_port":"4443"}"#).unwrap();
        assert_eq!(from_str, CompletionRecord::new("cave", 4443));
    }
}
