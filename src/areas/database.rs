//! Content-addressed object database
//!
//! Objects live under `objects/<2 hex>/<38 hex>`. Storing is idempotent: an
//! object whose file already exists is not written again, since the same ID
//! always means the same bytes.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, ObjectBox};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn object_path(&self, object_id: &ObjectId) -> PathBuf {
        self.path.join(object_id.to_path())
    }

    pub fn contains(&self, object_id: &ObjectId) -> bool {
        self.object_path(object_id).is_file()
    }

    /// Persist an object and return its ID
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let object_id = object.object_id();
        let object_path = self.object_path(&object_id);

        // write the object to disk unless it already exists
        if object_path.exists() {
            debug!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        self.write_object(&object_path, object.serialize()?)?;
        debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    pub fn load(&self, object_id: &ObjectId) -> Result<ObjectBox> {
        let object_content = self.read_object(object_id)?;

        ObjectBox::deserialize(&object_content).map_err(|e| match e {
            Error::CorruptObject(reason) => Error::corrupt_object(format!("{object_id}: {reason}")),
            other => other,
        })
    }

    /// Load an object that must be a commit
    pub fn load_commit(&self, object_id: &ObjectId) -> Result<Commit> {
        match self.load(object_id)? {
            ObjectBox::Commit(commit) => Ok(*commit),
            other => Err(Error::corrupt_object(format!(
                "{object_id} is a {}, expected a commit",
                other.object_type()
            ))),
        }
    }

    /// Load an object that must be a tree
    pub fn load_tree(&self, object_id: &ObjectId) -> Result<Tree> {
        match self.load(object_id)? {
            ObjectBox::Tree(tree) => Ok(*tree),
            other => Err(Error::corrupt_object(format!(
                "{object_id} is a {}, expected a tree",
                other.object_type()
            ))),
        }
    }

    fn read_object(&self, object_id: &ObjectId) -> Result<Bytes> {
        match std::fs::read(self.object_path(object_id)) {
            Ok(object_content) => Ok(object_content.into()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::ObjectNotFound(object_id.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_object(&self, object_path: &Path, object_content: Bytes) -> Result<()> {
        let object_dir = object_path.parent().ok_or_else(|| {
            Error::invalid_path(object_path.display().to_string(), "object path has no parent")
        })?;
        std::fs::create_dir_all(object_dir)?;

        // write to a temp file in the same directory, then rename it into place
        let mut temp_file = tempfile::Builder::new()
            .prefix("tmp-obj-")
            .tempfile_in(object_dir)?;
        temp_file.write_all(&object_content)?;
        temp_file.persist(object_path).map_err(|e| e.error)?;

        Ok(())
    }
}
