use crate::areas::repository::Repository;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::path::Path;

impl Repository {
    /// Hash a file as a blob, storing it when `write` is set
    ///
    /// Hashing alone works outside a repository; writing needs the metadata root.
    pub fn hash_object(&self, object_path: &Path, write: bool) -> Result<ObjectId> {
        let content = std::fs::read(self.path().join(object_path))?;
        let blob = Blob::new(content);

        if !write {
            return Ok(blob.object_id());
        }

        self.ensure_initialized()?;
        self.database().store(&blob)
    }
}
