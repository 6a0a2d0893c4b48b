use crate::areas::repository::Repository;
use crate::areas::workspace::WorkspacePath;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bytes::Bytes;
use std::path::Path;

/// What staging a workspace path did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Added {
    /// A single file, staged as this blob
    File(ObjectId),
    /// A directory, with the number of files staged beneath it
    Directory(usize),
}

impl Repository {
    /// Stage `content` at `path` (relative, `/`-separated)
    pub fn add_file(&self, path: &str, content: impl Into<Bytes>) -> Result<ObjectId> {
        let mut index = self.index()?;

        index.add_file(self.database(), path, content)
    }

    /// Stage a batch of files, saving the index once
    pub fn add_many<P, C>(&self, files: impl IntoIterator<Item = (P, C)>) -> Result<usize>
    where
        P: AsRef<str>,
        C: Into<Bytes>,
    {
        let mut index = self.index()?;

        index.add_many(self.database(), files)
    }

    /// Stage a file or every file beneath a directory of the workspace
    pub fn add_path(&self, path: &Path) -> Result<Added> {
        self.ensure_initialized()?;

        match self.workspace().resolve(path)? {
            WorkspacePath::File(relative) => {
                let content = self.workspace().read_file(&relative)?;
                self.add_file(&relative, content).map(Added::File)
            }
            WorkspacePath::Directory(relative) => {
                let files = self.workspace().list_files(&relative)?;
                self.add_many(files).map(Added::Directory)
            }
        }
    }
}
