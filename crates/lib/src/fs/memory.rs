//! In-memory filesystem for tests.
//!
//! Paths are stored as given and never resolved, so `..` is refused rather
//! than interpreted.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Component, Path, PathBuf};

use super::SandboxFs;

/// In-memory [`SandboxFs`] for exercising sandbox assembly without touching disk.
#[derive(Debug, Default)]
pub struct MemoryFs {
  tree: RefCell<Tree>,
}

#[derive(Debug, Default)]
struct Tree {
  dirs: BTreeSet<PathBuf>,
  files: BTreeMap<PathBuf, Vec<u8>>,
}

impl Tree {
  fn add_dirs(&mut self, path: &Path) {
    for ancestor in path.ancestors() {
      if ancestor.as_os_str().is_empty() {
        continue;
      }
      self.dirs.insert(ancestor.to_path_buf());
    }
  }
}

impl MemoryFs {
  pub fn new() -> Self {
    Self::default()
  }

  /// Seed a file, creating its parent directories.
  pub fn add_file(&self, path: impl AsRef<Path>, contents: impl AsRef<[u8]>) {
    let path = path.as_ref();
    let mut tree = self.tree.borrow_mut();
    if let Some(parent) = path.parent() {
      tree.add_dirs(parent);
    }
    tree.files.insert(path.to_path_buf(), contents.as_ref().to_vec());
  }

  /// Seed an empty directory.
  pub fn add_dir(&self, path: impl AsRef<Path>) {
    self.tree.borrow_mut().add_dirs(path.as_ref());
  }

  /// Contents of `path` as UTF-8, if it is a file.
  pub fn read_string(&self, path: impl AsRef<Path>) -> Option<String> {
    let tree = self.tree.borrow();
    let bytes = tree.files.get(path.as_ref())?;
    String::from_utf8(bytes.clone()).ok()
  }
}

fn not_found(path: &Path) -> io::Error {
  io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
}

fn has_parent_dir(path: &Path) -> bool {
  path.components().any(|c| matches!(c, Component::ParentDir))
}

/// Whether `path` ends in a file name. `a/`, `a/.` and `a/..` name directories.
fn names_file(path: &Path) -> bool {
  let text = path.to_string_lossy();
  path.file_name().is_some() && !matches!(text.rsplit('/').next(), None | Some("" | "." | ".."))
}

impl SandboxFs for MemoryFs {
  fn is_dir(&self, path: &Path) -> bool {
    self.tree.borrow().dirs.contains(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.tree.borrow().files.contains_key(path)
  }

  fn create_dir_all(&self, path: &Path) -> io::Result<()> {
    if has_parent_dir(path) {
      return Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} contains '..'", path.display()),
      ));
    }
    let mut tree = self.tree.borrow_mut();
    if let Some(file) = path.ancestors().find(|a| tree.files.contains_key(*a)) {
      return Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} is a file", file.display()),
      ));
    }
    tree.add_dirs(path);
    Ok(())
  }

  fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
    self.tree.borrow().files.get(path).cloned().ok_or_else(|| not_found(path))
  }

  fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
    if has_parent_dir(path) || !names_file(path) {
      return Err(io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("{} does not name a file", path.display()),
      ));
    }
    let mut tree = self.tree.borrow_mut();
    if tree.dirs.contains(path) {
      return Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("{} is a directory", path.display()),
      ));
    }
    match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() && !tree.dirs.contains(parent) => {
        return Err(not_found(parent));
      }
      _ => {}
    }
    tree.files.insert(path.to_path_buf(), contents.to_vec());
    Ok(())
  }

  fn list_files(&self, root: &Path) -> io::Result<Vec<PathBuf>> {
    let tree = self.tree.borrow();
    if !tree.dirs.contains(root) {
      return Err(not_found(root));
    }
    // BTreeMap iteration is already sorted component-wise
    Ok(
      tree
        .files
        .keys()
        .filter_map(|path| path.strip_prefix(root).ok())
        .map(Path::to_path_buf)
        .collect(),
    )
  }
}
