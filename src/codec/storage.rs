//! Storage collaborator for project files.
//!
//! Saving is split into `stage` + `commit` so a write that fails halfway only
//! ever touches the staged scratch file, never the project file itself.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

pub trait Storage {
    type Staged: Write;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Open a scratch file that will replace `path` on `commit`.
    fn stage(&self, path: &Path) -> io::Result<Self::Staged>;

    /// Replace `path` with the staged contents in a single step.
    fn commit(&self, staged: Self::Staged, path: &Path) -> io::Result<()>;
}

/// Local file system. Staged files are temp files in the target's directory
/// (so the final rename never crosses file systems) and are deleted if
/// dropped without a commit.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    type Staged = NamedTempFile;

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn stage(&self, path: &Path) -> io::Result<NamedTempFile> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        tempfile::Builder::new()
            .prefix(".pik-")
            .suffix(".tmp")
            .tempfile_in(dir)
    }

    fn commit(&self, staged: NamedTempFile, path: &Path) -> io::Result<()> {
        staged.as_file().sync_all()?;
        staged.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}
