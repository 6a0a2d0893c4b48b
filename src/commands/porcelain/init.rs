use crate::DEFAULT_BRANCH;
use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{Error, Result};
use std::fs;
use tracing::info;

impl Repository {
    /// Create the metadata root with an empty object store, `HEAD` pointing at
    /// the default branch and an empty index
    ///
    /// The default branch has no ref file until its first commit.
    pub fn init(&self) -> Result<()> {
        if self.metadata_path().exists() {
            return Err(Error::AlreadyInitialized(self.metadata_path()));
        }

        fs::create_dir_all(self.database().objects_path())?;
        fs::create_dir_all(self.refs().heads_path())?;

        let default_branch = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        self.refs().set_head(&default_branch)?;

        Index::empty(self.index_path().into_boxed_path()).save()?;

        info!(path = %self.path().display(), "initialized repository");

        Ok(())
    }
}
