//! Recursive filesystem watcher for preview sessions.
//!
//! Every directory under the watch root is registered individually at setup
//! time; directories created later are not picked up (known limitation).
//! In project mode the build itself touches files inside the watched tree,
//! so those paths are filtered out before they can re-trigger a rebuild.

use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use walkdir::WalkDir;

/// The artifact file name produced by every build.
pub const ARTIFACT_NAME: &str = "main.wasm";

/// A single filesystem change, consumed immediately by the reload trigger.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

/// Coarse change classification, for logging only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    /// Metadata-only and other kinds; still triggers a reload.
    Other,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Created => write!(f, "created"),
            ChangeKind::Modified => write!(f, "modified"),
            ChangeKind::Removed => write!(f, "removed"),
            ChangeKind::Other => write!(f, "changed"),
        }
    }
}

/// Per-mode suppression of self-triggered build events.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    /// Exact paths to drop (normalized)
    ignored_files: Vec<PathBuf>,
    /// Directory whose whole subtree is dropped (normalized), if any
    ignored_dir: Option<PathBuf>,
}

impl WatchFilter {
    /// Component mode: every event triggers a reload.
    pub fn none() -> Self {
        Self {
            ignored_files: Vec::new(),
            ignored_dir: None,
        }
    }

    /// Project mode: drop the artifact, the module descriptor and lockfile
    /// the toolchain rewrites, and anything under the cache directory.
    pub fn project(source_root: &Path, cache_root: &Path) -> Self {
        Self {
            ignored_files: vec![
                source_root.join(ARTIFACT_NAME).clean(),
                source_root.join("go.mod").clean(),
                source_root.join("go.sum").clean(),
            ],
            ignored_dir: Some(cache_root.to_path_buf().clean()),
        }
    }

    /// Check whether an event for `path` should be suppressed.
    pub fn should_ignore(&self, path: &Path) -> bool {
        let path = path.to_path_buf().clean();
        if self.ignored_files.iter().any(|ignored| path == *ignored) {
            return true;
        }
        match &self.ignored_dir {
            Some(dir) => path.starts_with(dir),
            None => false,
        }
    }
}

/// Recursive watcher over a preview source tree.
///
/// Change events are forwarded through a channel; the channel closing means
/// the watcher was torn down and the session must end.
pub struct PreviewWatcher {
    /// Underlying notify watcher; dropping it stops the event stream
    _watcher: RecommendedWatcher,
    /// Root directory being watched
    root: PathBuf,
}

impl PreviewWatcher {
    /// Watch `root` recursively.
    ///
    /// Registers a non-recursive watch on the root and every directory below
    /// it. Errors during setup (bad root, watch registration failure) abort
    /// session start; errors reported later by the backend are logged and
    /// watching continues.
    pub fn new(root: PathBuf, filter: WatchFilter) -> Result<(Self, mpsc::Receiver<ChangeEvent>)> {
        let metadata = std::fs::metadata(&root)
            .map_err(|_| CliError::FileNotFound(root.clone()))?;
        if !metadata.is_dir() {
            return Err(CliError::NotADirectory(root));
        }

        let (tx, rx) = mpsc::channel(100);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    let kind = match event.kind {
                        notify::EventKind::Create(_) => ChangeKind::Created,
                        notify::EventKind::Modify(_) => ChangeKind::Modified,
                        notify::EventKind::Remove(_) => ChangeKind::Removed,
                        _ => ChangeKind::Other,
                    };
                    for path in event.paths {
                        if filter.should_ignore(&path) {
                            continue;
                        }
                        // Receiver gone means the session is tearing down.
                        let _ = tx.blocking_send(ChangeEvent { path, kind });
                    }
                }
                Err(err) => {
                    tracing::warn!("watcher error: {err}");
                }
            }
        })?;

        for entry in WalkDir::new(&root) {
            let entry = entry.map_err(|err| match err.into_io_error() {
                Some(io) => CliError::Io(io),
                None => CliError::FileNotFound(root.clone()),
            })?;
            if entry.file_type().is_dir() {
                watcher.watch(entry.path(), RecursiveMode::NonRecursive)?;
            }
        }

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
