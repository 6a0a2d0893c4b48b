//! Staging index
//!
//! The index maps repository-relative paths (`/`-separated) to the blob IDs
//! staged for the next commit. It is persisted as a pretty-printed JSON object
//! with sorted keys:
//!
//! ```text
//! {
//!   "a.txt": "b6fc4c620b67d95f953a5c1c1230aaab5db5a1b0"
//! }
//! ```
//!
//! Saving writes a temp file next to the index and renames it over the old
//! one, so a reader never observes a half-written index.
//!
//! A path is never staged both as a file and as a directory: staging `a/b`
//! discards a staged file `a`, and staging `a` discards everything under `a/`.

use crate::METADATA_DIR;
use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Characters that cannot appear in a staged path
const FORBIDDEN_PATH_CHARS: [char; 4] = ['\0', '\n', '\t', '\\'];

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.sprig/index`)
    path: Box<Path>,
    entries: BTreeMap<String, ObjectId>,
}

impl Index {
    /// Load the index from disk
    ///
    /// Fails with [`Error::RepositoryNotInitialized`] when the metadata root
    /// holding the index does not exist. A missing or empty index file is an
    /// empty index. Unparseable content or a key that is not a valid staged
    /// path fails with [`Error::CorruptIndex`].
    pub fn load(path: Box<Path>) -> Result<Self> {
        let metadata_root = path.parent().unwrap_or(Path::new(""));
        if !metadata_root.is_dir() {
            return Err(Error::RepositoryNotInitialized(metadata_root.to_path_buf()));
        }

        let content = match std::fs::read(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        let entries: BTreeMap<String, ObjectId> = if content.iter().all(u8::is_ascii_whitespace) {
            BTreeMap::new()
        } else {
            serde_json::from_slice(&content).map_err(|e| Error::CorruptIndex(e.to_string()))?
        };
        for file_path in entries.keys() {
            validate_path(file_path).map_err(|e| Error::CorruptIndex(e.to_string()))?;
        }

        Ok(Index { path, entries })
    }

    /// An index that replaces whatever is on disk once saved
    pub fn empty(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the full mapping, replacing any prior content
    pub fn save(&self) -> Result<()> {
        let index_dir = self.path.parent().unwrap_or(Path::new("."));

        let mut content = serde_json::to_vec_pretty(&self.entries)
            .map_err(|e| Error::CorruptIndex(e.to_string()))?;
        content.push(b'\n');

        let mut temp_file = tempfile::Builder::new()
            .prefix("index.")
            .suffix(".tmp")
            .tempfile_in(index_dir)?;
        temp_file.write_all(&content)?;
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        debug!(entries = self.entries.len(), "saved index");

        Ok(())
    }

    /// Stage a single file and persist the index
    pub fn add_file(
        &mut self,
        database: &Database,
        path: &str,
        content: impl Into<Bytes>,
    ) -> Result<ObjectId> {
        let oid = self.stage(database, path, content.into())?;
        self.save()?;

        Ok(oid)
    }

    /// Stage a batch of files, persisting the index once at the end
    ///
    /// Every path is validated before anything is stored, so an invalid path
    /// leaves both the database and the index untouched.
    pub fn add_many<P, C>(&mut self, database: &Database, files: impl IntoIterator<Item = (P, C)>) -> Result<usize>
    where
        P: AsRef<str>,
        C: Into<Bytes>,
    {
        let files = files.into_iter().collect::<Vec<_>>();
        for (path, _) in &files {
            validate_path(path.as_ref())?;
        }

        let count = files.len();
        for (path, content) in files {
            self.stage(database, path.as_ref(), content.into())?;
        }
        self.save()?;

        Ok(count)
    }

    fn stage(&mut self, database: &Database, path: &str, content: Bytes) -> Result<ObjectId> {
        validate_path(path)?;

        let oid = database.store(&Blob::new(content))?;
        self.insert(path, oid.clone());

        Ok(oid)
    }

    /// Record `path -> oid`, discarding entries it conflicts with
    fn insert(&mut self, path: &str, oid: ObjectId) {
        // a staged file can't also be a parent directory of the new path
        for (position, _) in path.match_indices('/') {
            self.entries.remove(&path[..position]);
        }

        // nor can the new path be a directory of staged files
        let dir_prefix = format!("{path}/");
        self.entries.retain(|staged, _| !staged.starts_with(&dir_prefix));

        self.entries.insert(path.to_string(), oid);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &BTreeMap<String, ObjectId> {
        &self.entries
    }

    pub fn entry(&self, path: &str) -> Option<&ObjectId> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Check that `path` can be staged and later represented in a tree
pub fn validate_path(path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "path is empty"));
    }
    if path.starts_with('/') {
        return Err(Error::invalid_path(path, "path must be relative to the repository root"));
    }
    if let Some(c) = path.chars().find(|c| FORBIDDEN_PATH_CHARS.contains(c)) {
        return Err(Error::invalid_path(path, format!("path contains {c:?}")));
    }

    for segment in path.split('/') {
        match segment {
            "" => return Err(Error::invalid_path(path, "path has an empty segment")),
            "." | ".." => {
                return Err(Error::invalid_path(path, "path must not contain '.' or '..'"));
            }
            METADATA_DIR => {
                return Err(Error::invalid_path(path, "path is inside the repository metadata"));
            }
            _ => {}
        }
    }

    Ok(())
}
