//! Real filesystem access.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::SandboxFs;

/// [`SandboxFs`] backed by the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskFs;

impl SandboxFs for DiskFs {
  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }

  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    fs::read(path)
  }

  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
  }

  fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    // Symlinks are followed so linked formulas are copied by content
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
      let entry = entry.map_err(io::Error::from)?;
      if !entry.file_type().is_file() {
        continue;
      }
      if let Ok(relative) = entry.path().strip_prefix(root) {
        files.push(relative.to_path_buf());
      }
    }

    Ok(files)
  }
}
