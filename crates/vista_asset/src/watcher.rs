//! Environments directory watcher

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecursiveMode, Watcher};

use crate::error::{AssetError, AssetResult};

/// Reports when the set of environments under a directory may have changed.
///
/// Bursts of file system events (a save writes a directory and two images)
/// are collapsed: [`poll`](Self::poll) reports a change once the directory
/// has been quiet for the debounce duration.
pub struct EnvironmentWatcher {
    _watcher: notify::RecommendedWatcher,
    rx: crossbeam_channel::Receiver<notify::Result<Event>>,
    /// Time of the newest unreported event
    pending_since: Option<Instant>,
    /// Debounce duration
    debounce: Duration,
    root: PathBuf,
}

impl EnvironmentWatcher {
    /// Watch `root` (the `environments/` directory), creating it if needed
    pub fn new(root: impl AsRef<Path>) -> AssetResult<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.exists() {
            std::fs::create_dir_all(&root)?;
        }

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })
        .map_err(|e| AssetError::Watch(format!("Failed to create file watcher: {}", e)))?;

        watcher
            .watch(&root, RecursiveMode::Recursive)
            .map_err(|e| AssetError::Watch(format!("Failed to watch {:?}: {}", root, e)))?;

        log::info!("Watching environments directory: {:?}", root);
        Ok(Self {
            _watcher: watcher,
            rx,
            pending_since: None,
            debounce: Duration::from_millis(250),
            root,
        })
    }

    /// Set the quiet period required before a change is reported
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Watched directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the directory changed and has since settled.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    fn poll_at(&mut self, now: Instant) -> bool {
        while let Ok(result) = self.rx.try_recv() {
            match result {
                Ok(event) => {
                    if matches!(
                        event.kind,
                        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_)
                    ) {
                        self.pending_since = Some(now);
                    }
                }
                Err(e) => log::warn!("Watch error on {:?}: {}", self.root, e),
            }
        }

        match self.pending_since {
            Some(since) if now.duration_since(since) >= self.debounce => {
                self.pending_since = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_directory_reports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = EnvironmentWatcher::new(dir.path()).unwrap();
        assert!(!watcher.poll());
    }

    #[test]
    fn test_creates_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("environments");
        let watcher = EnvironmentWatcher::new(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(watcher.root(), root.as_path());
    }

    #[test]
    fn test_change_reported_after_settling() {
        let dir = tempfile::tempdir().unwrap();
        let mut watcher = EnvironmentWatcher::new(dir.path())
            .unwrap()
            .with_debounce(Duration::from_millis(10));

        std::fs::create_dir(dir.path().join("new-env")).unwrap();

        let deadline = Instant::now() + Duration::from_secs(5);
        let mut changed = false;
        while Instant::now() < deadline {
            if watcher.poll() {
                changed = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
        assert!(changed);
    }
}
