//! Environment listing

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AssetResult;

/// Body of `GET /list_environments`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentListing {
    pub environments: Vec<String>,
}

impl EnvironmentListing {
    /// Create a listing
    pub fn new(environments: Vec<String>) -> Self {
        Self { environments }
    }

    /// First listed environment
    pub fn first(&self) -> Option<&str> {
        self.environments.first().map(String::as_str)
    }

    /// Whether `name` is listed
    pub fn contains(&self, name: &str) -> bool {
        self.environments.iter().any(|e| e == name)
    }

    /// Number of environments
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Environment to open: the requested one, or the first listed.
    pub fn select<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        match requested.filter(|r| !r.is_empty()) {
            Some(name) => {
                if !self.contains(name) {
                    log::warn!("Requested environment '{}' is not listed", name);
                }
                Some(name)
            }
            None => self.first(),
        }
    }

    /// Neighbor of `current` in the listing, wrapping around.
    pub fn step(&self, current: Option<&str>, offset: isize) -> Option<&str> {
        if self.environments.is_empty() {
            return None;
        }
        let len = self.environments.len() as isize;
        let index = current
            .and_then(|c| self.environments.iter().position(|e| e == c))
            .map(|i| (i as isize + offset).rem_euclid(len))
            .unwrap_or(0);
        self.environments.get(index as usize).map(String::as_str)
    }
}

/// Sorted names of the sub-directories of `path`.
///
/// A missing directory lists as empty.
pub fn list_environment_dirs(path: &Path) -> AssetResult<Vec<String>> {
    if !path.is_dir() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => log::warn!("Skipping non UTF-8 environment directory {:?}", raw),
        }
    }
    names.sort();
    Ok(names)
}
