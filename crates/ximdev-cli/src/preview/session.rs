//! Preview session orchestration.
//!
//! One session per process invocation. The session owns the server task,
//! the watcher, and the reload gate, and runs the lifecycle
//! `Starting -> Watching -> (Reloading <-> Watching)* -> Terminated`.
//! Termination is always failure-driven: the watcher stream closing or the
//! server dying ends the session, nothing else does.

use crate::error::{CliError, Result};
use crate::preview::cache::BuildCache;
use crate::preview::reload::Reloader;
use crate::preview::server::PreviewServer;
use crate::preview::watcher::{PreviewWatcher, WatchFilter};
use crate::ui;
use std::path::PathBuf;

/// Default hidden state directory, relative to the invocation cwd.
pub const DEFAULT_CACHE_DIR: &str = ".xim";

/// What a session previews.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Single component, staged into an isolated workspace
    Component { var_name: String },
    /// Whole project, built in place
    Project,
}

/// A live-reload preview session. Immutable after construction.
pub struct Session {
    mode: Mode,
    source: PathBuf,
    address: String,
    cache: BuildCache,
}

impl Session {
    /// Component-mode session.
    pub fn component(
        address: String,
        source: PathBuf,
        var_name: String,
        cache_root: PathBuf,
    ) -> Self {
        Self {
            mode: Mode::Component { var_name },
            source,
            address,
            cache: BuildCache::new(cache_root),
        }
    }

    /// Project-mode session.
    pub fn project(address: String, source: PathBuf, cache_root: PathBuf) -> Self {
        Self {
            mode: Mode::Project,
            source,
            address,
            cache: BuildCache::new(cache_root),
        }
    }

    /// Run the session until a fatal condition.
    ///
    /// `Ok` is never returned in steady state; the only exits are the
    /// start-up failures and the two fatal signals.
    pub async fn run(self) -> Result<()> {
        let artifact = match self.mode {
            Mode::Component { .. } => self.cache.component_artifact(),
            Mode::Project => self.cache.project_artifact(),
        };

        // Server first; a bind failure surfaces through the join handle
        // in the event loop below, same as a later runtime error.
        let server = PreviewServer::new(self.address.clone(), artifact);
        let mut server_task = tokio::spawn(server.start());

        let filter = match self.mode {
            Mode::Component { .. } => WatchFilter::none(),
            Mode::Project => WatchFilter::project(&self.source, self.cache.root()),
        };
        let (watcher, mut changes) = PreviewWatcher::new(self.source.clone(), filter)?;
        ui::info(&format!(
            "Watching for changes in {}",
            watcher.root().display()
        ));

        let rebuild = {
            let mode = self.mode.clone();
            let source = self.source.clone();
            let cache = self.cache.clone();
            move || match &mode {
                Mode::Component { var_name } => cache.rebuild_component(&source, var_name),
                Mode::Project => cache.rebuild_project(&source),
            }
        };

        // Initial build, blocking from the session's point of view. The
        // event loop must not start until this has completed; a failure
        // here is fatal, unlike every later rebuild.
        ui::info("Performing initial build...");
        let initial = rebuild.clone();
        tokio::task::spawn_blocking(initial)
            .await
            .map_err(|err| CliError::Io(std::io::Error::other(err)))??;
        ui::success("Initial build complete, refresh your browser anytime");

        let reloader = Reloader::new(move || match rebuild() {
            Ok(()) => ui::success("Rebuild complete"),
            Err(err) => ui::error(&format!("Rebuild failed: {err}")),
        });

        loop {
            tokio::select! {
                change = changes.recv() => match change {
                    Some(event) => {
                        tracing::debug!("{} {}", event.path.display(), event.kind);
                        reloader.trigger();
                    }
                    None => return Err(CliError::WatcherClosed),
                },
                result = &mut server_task => {
                    return Err(match result {
                        Ok(Err(err)) => err,
                        Ok(Ok(())) => CliError::Server("server stopped unexpectedly".into()),
                        Err(join_err) => CliError::Server(join_err.to_string()),
                    });
                }
            }
        }
    }
}
