use crate::areas::repository::Repository;
use crate::artifacts::objects::object::ObjectBox;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

impl Repository {
    /// Load any object by its hex ID
    pub fn cat_file(&self, object_id: &str) -> Result<ObjectBox> {
        self.ensure_initialized()?;
        let object_id = ObjectId::try_parse(object_id.to_string())?;

        self.database().load(&object_id)
    }
}
