//! Isolated build workspace and artifact placement.
//!
//! Component mode stages a disposable, independently buildable snapshot of
//! the component under the cache root on every rebuild. Project mode builds
//! in place and publishes the artifact into a side directory so the project
//! tree never holds a file that would re-trigger the watcher.
//!
//! The serving path is only ever replaced whole (build output in the staged
//! workspace, rename in the serve directory), so a request never observes a
//! partially written artifact.

use crate::error::{CliError, Result};
use crate::preview::copy::copy_dir;
use crate::preview::templates;
use crate::preview::toolchain::Toolchain;
use crate::preview::watcher::ARTIFACT_NAME;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-session build cache rooted at a hidden state directory.
#[derive(Debug, Clone)]
pub struct BuildCache {
    cache_root: PathBuf,
    toolchain: Toolchain,
}

impl BuildCache {
    pub fn new(cache_root: PathBuf) -> Self {
        Self {
            cache_root,
            toolchain: Toolchain::new(),
        }
    }

    /// Hidden state directory this cache lives under.
    pub fn root(&self) -> &Path {
        &self.cache_root
    }

    /// Staged component workspace root.
    pub fn workspace_dir(&self) -> PathBuf {
        self.cache_root.join("preview_cache")
    }

    /// Artifact location after a component-mode build.
    pub fn component_artifact(&self) -> PathBuf {
        self.workspace_dir().join(ARTIFACT_NAME)
    }

    /// Serving directory for project-mode artifacts.
    pub fn serve_dir(&self) -> PathBuf {
        self.cache_root.join("serve")
    }

    /// Artifact location after a project-mode build.
    pub fn project_artifact(&self) -> PathBuf {
        self.serve_dir().join(ARTIFACT_NAME)
    }

    /// Full component rebuild: stage, generate, compile.
    ///
    /// On success the artifact sits at [`component_artifact`], where the
    /// server resolves it lazily per request.
    ///
    /// [`component_artifact`]: BuildCache::component_artifact
    pub fn rebuild_component(&self, source: &Path, var_name: &str) -> Result<()> {
        let source = validate_dir(source)?;
        let version = self.toolchain.version()?;
        self.stage_component(&source, var_name, &version)?;
        tracing::info!("building component workspace");
        self.toolchain.build(&self.workspace_dir())
    }

    /// Replace the staged workspace with a fresh snapshot of the component.
    ///
    /// The previous snapshot for this component name is removed first, so a
    /// workspace that exists is always a complete copy, never a partial
    /// overlay of old and new sources.
    fn stage_component(&self, source: &Path, var_name: &str, go_version: &str) -> Result<()> {
        let source = validate_dir(source)?;
        let package_name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CliError::NotADirectory(source.clone()))?
            .to_string();

        let workspace = self.workspace_dir();
        let staged = workspace.join(&package_name);
        if staged.exists() {
            fs::remove_dir_all(&staged)?;
        }
        fs::create_dir_all(&staged)?;
        copy_dir(&source, &staged)?;

        // Entry point and descriptor live at the workspace root, next to the
        // copied subtree.
        fs::write(
            workspace.join("main.go"),
            templates::render_entry(&package_name, var_name),
        )?;
        fs::write(
            workspace.join("go.mod"),
            templates::render_descriptor(go_version),
        )?;
        Ok(())
    }

    /// Full project rebuild: compile in place, publish, clean up.
    pub fn rebuild_project(&self, source: &Path) -> Result<()> {
        let source = validate_dir(source)?;
        if !source.join("main.go").is_file() {
            return Err(CliError::InvalidProject(source));
        }

        tracing::info!("building project {}", source.display());
        let built_artifact = source.join(ARTIFACT_NAME);
        let result = self
            .toolchain
            .build(&source)
            .and_then(|_| self.publish_artifact(&built_artifact));

        // The project tree must not keep the artifact around, successful
        // build or not; leftover copies would re-trigger spurious watches
        // on the next change.
        if built_artifact.exists() {
            if let Err(err) = fs::remove_file(&built_artifact) {
                tracing::warn!("could not remove {}: {err}", built_artifact.display());
            }
        }

        result
    }

    /// Move a freshly built artifact into the serving slot.
    ///
    /// Copies to a temporary name in the serve directory first and renames
    /// onto the slot, so a concurrent request reads either the old artifact
    /// or the new one, never a torn write.
    fn publish_artifact(&self, built: &Path) -> Result<()> {
        let serve_dir = self.serve_dir();
        fs::create_dir_all(&serve_dir)?;
        let staging = serve_dir.join(format!("{ARTIFACT_NAME}.tmp"));
        fs::copy(built, &staging)?;
        fs::rename(&staging, self.project_artifact())?;
        Ok(())
    }
}

/// Validate that `path` exists and is a directory.
fn validate_dir(path: &Path) -> Result<PathBuf> {
    let metadata = fs::metadata(path).map_err(|_| CliError::FileNotFound(path.to_path_buf()))?;
    if !metadata.is_dir() {
        return Err(CliError::NotADirectory(path.to_path_buf()));
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component_fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let component = dir.path().join("counter");
        std::fs::create_dir_all(component.join("sub")).unwrap();
        std::fs::write(component.join("counter.go"), "package counter\n").unwrap();
        std::fs::write(component.join("sub/state.go"), "package sub\n").unwrap();
        dir
    }

    #[test]
    fn test_fixed_cache_layout() {
        let cache = BuildCache::new(PathBuf::from(".xim"));
        assert_eq!(cache.workspace_dir(), PathBuf::from(".xim/preview_cache"));
        assert_eq!(
            cache.component_artifact(),
            PathBuf::from(".xim/preview_cache/main.wasm")
        );
        assert_eq!(
            cache.project_artifact(),
            PathBuf::from(".xim/serve/main.wasm")
        );
    }

    #[test]
    fn test_stage_component_builds_complete_workspace() {
        let fixture = component_fixture();
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(cache_dir.path().join(".xim"));

        cache
            .stage_component(&fixture.path().join("counter"), "Counter", "1.22")
            .unwrap();

        let workspace = cache.workspace_dir();
        assert_eq!(
            std::fs::read_to_string(workspace.join("counter/counter.go")).unwrap(),
            "package counter\n"
        );
        assert!(workspace.join("counter/sub/state.go").is_file());

        let entry = std::fs::read_to_string(workspace.join("main.go")).unwrap();
        assert!(entry.contains("counter.Counter"));
        assert!(!entry.contains("{{"));

        let descriptor = std::fs::read_to_string(workspace.join("go.mod")).unwrap();
        assert!(descriptor.contains("go 1.22"));
    }

    #[test]
    fn test_stage_component_replaces_previous_snapshot() {
        let fixture = component_fixture();
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(cache_dir.path().join(".xim"));
        let component = fixture.path().join("counter");

        cache.stage_component(&component, "Counter", "1.22").unwrap();

        // A file removed from the source must not survive restaging.
        std::fs::remove_file(component.join("sub/state.go")).unwrap();
        cache.stage_component(&component, "Counter", "1.22").unwrap();

        assert!(!cache
            .workspace_dir()
            .join("counter/sub/state.go")
            .exists());
        assert!(cache.workspace_dir().join("counter/counter.go").is_file());
    }

    #[test]
    fn test_stage_component_rejects_bad_source() {
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(cache_dir.path().join(".xim"));

        let missing = cache.stage_component(Path::new("/nonexistent/counter"), "C", "1.22");
        assert!(matches!(missing, Err(CliError::FileNotFound(_))));

        let file = tempfile::NamedTempFile::new().unwrap();
        let not_dir = cache.stage_component(file.path(), "C", "1.22");
        assert!(matches!(not_dir, Err(CliError::NotADirectory(_))));
    }

    #[test]
    fn test_rebuild_project_requires_entry_file() {
        let project = tempfile::tempdir().unwrap();
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(cache_dir.path().join(".xim"));

        let result = cache.rebuild_project(project.path());
        assert!(matches!(result, Err(CliError::InvalidProject(_))));
    }

    #[test]
    fn test_publish_artifact_places_complete_copy() {
        let cache_dir = tempfile::tempdir().unwrap();
        let cache = BuildCache::new(cache_dir.path().join(".xim"));

        let built = cache_dir.path().join("main.wasm");
        std::fs::write(&built, b"\0asm-bytes").unwrap();

        cache.publish_artifact(&built).unwrap();

        assert_eq!(
            std::fs::read(cache.project_artifact()).unwrap(),
            b"\0asm-bytes"
        );
        assert!(!cache.serve_dir().join("main.wasm.tmp").exists());
    }
}
