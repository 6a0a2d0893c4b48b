use crate::METADATA_DIR;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::Workspace;
use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};

/// A repository rooted at a workspace directory
///
/// Every operation goes through an explicit `Repository` value; nothing about
/// the repository location is kept in process-wide state.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    /// Open the repository rooted at `path`, which must be an existing directory
    ///
    /// The metadata root does not have to exist yet: `init` creates it, and
    /// every other operation reports [`Error::RepositoryNotInitialized`].
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().canonicalize()?;
        let metadata = path.join(METADATA_DIR);

        let database = Database::new(metadata.join("objects").into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let refs = Refs::new(metadata.into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            database,
            workspace,
            refs,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.path.join(METADATA_DIR)
    }

    pub fn index_path(&self) -> PathBuf {
        self.metadata_path().join("index")
    }

    pub fn is_initialized(&self) -> bool {
        self.metadata_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(Error::RepositoryNotInitialized(self.metadata_path()))
        }
    }

    /// Load the staging index from disk
    pub fn index(&self) -> Result<Index> {
        Index::load(self.index_path().into_boxed_path())
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }
}
