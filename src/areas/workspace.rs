use crate::METADATA_DIR;
use crate::errors::{Error, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// A user-supplied path resolved against the repository root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspacePath {
    /// Regular file, as a `/`-separated path relative to the root
    File(String),
    /// Directory, as a `/`-separated path relative to the root (empty for the root itself)
    Directory(String),
}

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Resolve `path` (absolute, or relative to the repository root)
    ///
    /// Rejects paths that don't exist, lie outside the root or inside the
    /// metadata root, are symbolic links, or are neither files nor directories.
    pub fn resolve(&self, path: &Path) -> Result<WorkspacePath> {
        let joined = self.absolute_path(path);
        let shown = path.display().to_string();

        let metadata = match std::fs::symlink_metadata(&joined) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::invalid_path(shown, "path does not exist"));
            }
            Err(e) => return Err(e.into()),
        };
        if metadata.file_type().is_symlink() {
            return Err(Error::invalid_path(shown, "symbolic links are not supported"));
        }

        let canonical = joined.canonicalize()?;
        let relative = self.relative_path(&canonical)?;
        if relative.split('/').next() == Some(METADATA_DIR) {
            return Err(Error::invalid_path(shown, "path is inside the repository metadata"));
        }

        if metadata.is_file() {
            Ok(WorkspacePath::File(relative))
        } else if metadata.is_dir() {
            Ok(WorkspacePath::Directory(relative))
        } else {
            Err(Error::invalid_path(shown, "not a regular file or directory"))
        }
    }

    pub fn read_file(&self, file_path: &str) -> Result<Vec<u8>> {
        Ok(std::fs::read(self.absolute_path(file_path))?)
    }

    /// Every regular file beneath `dir_path`, sorted by path, with its content
    ///
    /// The metadata root and symbolic links are skipped.
    pub fn list_files(&self, dir_path: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let walker = WalkDir::new(self.absolute_path(dir_path))
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != METADATA_DIR);

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = self.relative_path(entry.path())?;
            let content = std::fs::read(entry.path())?;
            files.push((relative, content));
        }

        Ok(files)
    }

    /// `/`-separated form of `path` relative to the root
    fn relative_path(&self, path: &Path) -> Result<String> {
        let shown = || path.display().to_string();

        let relative = path
            .strip_prefix(&self.path)
            .map_err(|_| Error::invalid_path(shown(), "path is outside the repository"))?;

        relative
            .components()
            .map(|component| match component {
                Component::Normal(name) => name
                    .to_str()
                    .ok_or_else(|| Error::invalid_path(shown(), "path is not valid UTF-8")),
                _ => Err(Error::invalid_path(shown(), "path is not normalized")),
            })
            .collect::<Result<Vec<_>>>()
            .map(|segments| segments.join("/"))
    }

    pub fn absolute_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }
}
