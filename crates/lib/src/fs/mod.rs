//! Filesystem access used while assembling a sandbox.
//!
//! The sandbox builder only talks to the filesystem through [`SandboxFs`], so the
//! merge and precedence rules can run against [`MemoryFs`] in tests while
//! [`DiskFs`] is the thin adapter that touches real disk.

mod disk;
mod memory;

use std::io;
use std::path::{Path, PathBuf};

pub use disk::DiskFs;
pub use memory::MemoryFs;

/// The filesystem operations the sandbox builder needs.
pub trait SandboxFs {
  /// Whether `path` exists and is a directory.
  fn is_dir(&self, path: &Path) -> bool;

  /// Whether `path` exists and is a regular file.
  fn is_file(&self, path: &Path) -> bool;

  /// Create `path` and any missing parents. Succeeds if it already exists.
  fn create_dir_all(&self, path: &Path) -> io::Result<()>;

  fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

  /// Write `contents` to `path`, replacing any existing file. The parent must exist.
  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

  /// Every regular file beneath `root`, relative to `root`, in sorted order.
  fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>>;
}

impl<T: SandboxFs + ?Sized> SandboxFs for &T {
  fn is_dir(&self, path: &Path) -> bool {
    (**self).is_dir(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    (**self).is_file(path)
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    (**self).create_dir_all(path)
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    (**self).read(path)
  }

  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
    (**self).write(path, contents)
  }

  fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
    (**self).list_files(root)
  }
}
