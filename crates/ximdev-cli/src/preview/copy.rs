//! Recursive directory copy used to stage component workspaces.

use crate::error::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Copy the contents of `src` into `dst`, preserving structure.
///
/// The source root itself is not part of the copied prefix: `src/a/b.go`
/// lands at `dst/a/b.go`. `dst` must already exist.
pub fn copy_dir(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src).min_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .expect("walkdir yields paths under its root");
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn collect_files(root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.path().strip_prefix(root).unwrap().to_path_buf())
            .collect();
        files.sort();
        files
    }

    #[test]
    fn test_copy_preserves_structure_and_content() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        std::fs::write(src.path().join("counter.go"), "package counter\n").unwrap();
        std::fs::create_dir_all(src.path().join("sub/deep")).unwrap();
        std::fs::write(src.path().join("sub/deep/state.go"), "package deep\n").unwrap();
        std::fs::write(src.path().join("sub/empty.go"), "").unwrap();

        copy_dir(src.path(), dst.path()).unwrap();

        assert_eq!(collect_files(src.path()), collect_files(dst.path()));
        assert_eq!(
            std::fs::read(dst.path().join("sub/deep/state.go")).unwrap(),
            b"package deep\n"
        );
        assert_eq!(
            std::fs::read(dst.path().join("sub/empty.go")).unwrap(),
            b""
        );
    }

    #[test]
    fn test_copy_creates_empty_directories() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        std::fs::create_dir_all(src.path().join("assets/icons")).unwrap();

        copy_dir(src.path(), dst.path()).unwrap();
        assert!(dst.path().join("assets/icons").is_dir());
    }

    #[test]
    fn test_copy_adds_no_extraneous_files() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();

        std::fs::write(src.path().join("only.go"), "package only\n").unwrap();
        copy_dir(src.path(), dst.path()).unwrap();

        assert_eq!(collect_files(dst.path()), vec![PathBuf::from("only.go")]);
    }

    #[test]
    fn test_copy_missing_source_fails() {
        let dst = tempfile::tempdir().unwrap();
        let result = copy_dir(Path::new("/nonexistent/ximdev-src"), dst.path());
        assert!(result.is_err());
    }
}
