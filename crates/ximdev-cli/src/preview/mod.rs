//! Live-reload preview engine.
//!
//! The rebuild pipeline, bottom up:
//! - [`reload`] - debounced single-flight execution of the rebuild action
//! - [`watcher`] - recursive filesystem watching with per-mode filtering
//! - [`cache`] - staged build workspaces and atomic artifact placement
//! - [`server`] - embedded bootstrap assets overlaid with the live artifact
//! - [`session`] - composition and the process-level failure contract

pub mod cache;
pub mod copy;
pub mod reload;
pub mod server;
pub mod session;
pub mod templates;
pub mod toolchain;
pub mod watcher;

pub use cache::BuildCache;
pub use reload::{ReloadGate, Reloader};
pub use server::PreviewServer;
pub use session::{Mode, Session, DEFAULT_CACHE_DIR};
pub use watcher::{ChangeEvent, ChangeKind, PreviewWatcher, WatchFilter, ARTIFACT_NAME};
