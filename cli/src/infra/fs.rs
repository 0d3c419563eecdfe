//! Filesystem infrastructure: implements the `LocalFs` port.

use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::application::ports::LocalFs;

/// Production filesystem implementation of `LocalFs`.
pub struct StdFs;

impl LocalFs for StdFs {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading file {}", path.display()))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path.display()))
    }

    fn copy_file(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::copy(from, to)
            .with_context(|| format!("copying {} to {}", from.display(), to.display()))?;
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> Result<()> {
        copy_tree(from, to)
    }

    fn set_executable_all(&self, dir: &Path) -> Result<()> {
        for entry in
            std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?
        {
            let path = entry?.path();
            if path.is_file() {
                set_mode(&path, 0o755)?;
            }
        }
        Ok(())
    }
}

/// Recursively copy `from` into `to`. Existing files are overwritten;
/// files only present in `to` are kept. Symlinks are followed, so a linked
/// directory is copied as its contents.
///
/// # Errors
///
/// Returns an error if `from` is not a directory or any entry fails to copy.
pub fn copy_tree(from: &Path, to: &Path) -> Result<()> {
    anyhow::ensure!(from.is_dir(), "{} is not a directory", from.display());
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry.with_context(|| format!("walking {}", from.display()))?;
        let rel = entry.path().strip_prefix(from)?;
        let target = to.join(rel);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("creating directory {}", target.display()))?;
        } else {
            std::fs::copy(entry.path(), &target).with_context(|| {
                format!("copying {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    Ok(())
}

fn set_mode(path: &Path, _mode: u32) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(_mode))
            .with_context(|| format!("setting permissions on {}", path.display()))?;
    }
    Ok(())
}
