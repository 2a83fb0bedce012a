//! Manifest file watcher for live reloads

use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Watches the manifest file for edits, with debouncing
pub struct ManifestWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    rx: Receiver<Result<Vec<DebouncedEvent>, notify::Error>>,
    manifest: PathBuf,
}

impl ManifestWatcher {
    /// Create a watcher for the given manifest path.
    ///
    /// The parent directory is watched rather than the file itself;
    /// editors that replace files on save would otherwise detach the
    /// watch.
    pub fn new(manifest: &Path) -> anyhow::Result<Self> {
        let (tx, rx) = channel();

        let mut debouncer = new_debouncer(Duration::from_millis(500), move |res| {
            let _ = tx.send(res);
        })?;

        let watch_root = manifest.parent().unwrap_or(Path::new("."));
        debouncer
            .watcher()
            .watch(watch_root, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _debouncer: debouncer,
            rx,
            manifest: manifest.to_path_buf(),
        })
    }

    /// Check whether the manifest changed since the last poll
    /// (non-blocking).
    pub fn poll(&self) -> bool {
        match self.rx.try_recv() {
            Ok(Ok(events)) => events.iter().any(|e| self.concerns_manifest(&e.path)),
            _ => false,
        }
    }

    fn concerns_manifest(&self, path: &Path) -> bool {
        path == self.manifest
            || (path.file_name().is_some() && path.file_name() == self.manifest.file_name())
    }
}
