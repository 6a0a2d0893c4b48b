//! References (HEAD and branches)
//!
//! - `HEAD` is always symbolic: `ref: refs/heads/<branch>\n`
//! - `refs/heads/<branch>` holds the branch's latest commit ID followed by a
//!   newline, and only exists once the branch has a commit

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

#[derive(Debug)]
pub struct Refs {
    /// Path to the metadata root (typically `.sprig`)
    path: Box<Path>,
}

impl Refs {
    pub fn new(path: Box<Path>) -> Self {
        Refs { path }
    }

    /// Branch that `HEAD` points at
    ///
    /// Fails with [`Error::CorruptRef`] when `HEAD` is missing or holds
    /// anything other than a symbolic ref to a valid branch name.
    pub fn current_branch(&self) -> Result<BranchName> {
        let content = match std::fs::read_to_string(self.head_path()) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::corrupt_ref(HEAD_REF_NAME, "HEAD is missing"));
            }
            Err(e) => return Err(e.into()),
        };

        match BranchName::try_parse_sym_ref(content.trim_end()) {
            Ok(Some(branch)) => Ok(branch),
            Ok(None) => Err(Error::corrupt_ref(
                HEAD_REF_NAME,
                format!("expected 'ref: refs/heads/<branch>', found '{}'", content.trim_end()),
            )),
            Err(e) => Err(Error::corrupt_ref(HEAD_REF_NAME, e.to_string())),
        }
    }

    /// Point `HEAD` at `branch`
    pub fn set_head(&self, branch: &BranchName) -> Result<()> {
        self.update_ref_file(&self.head_path(), &format!("{}\n", branch.to_sym_ref()))
    }

    /// Latest commit on `branch`, `None` if it has no commits yet
    pub fn branch_commit(&self, branch: &BranchName) -> Result<Option<ObjectId>> {
        let content = match std::fs::read_to_string(self.branch_path(branch)) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        ObjectId::try_parse(content.trim().to_string())
            .map(Some)
            .map_err(|e| Error::corrupt_ref(format!("refs/heads/{branch}"), e.to_string()))
    }

    /// Create or move `branch` to `oid`
    pub fn set_branch_commit(&self, branch: &BranchName, oid: &ObjectId) -> Result<()> {
        self.update_ref_file(&self.branch_path(branch), &format!("{oid}\n"))?;
        debug!(%branch, %oid, "updated branch ref");

        Ok(())
    }

    fn update_ref_file(&self, path: &Path, content: &str) -> Result<()> {
        // branch names may contain '/', so parent directories may be missing
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.refs_path().join("heads")
    }

    pub fn branch_path(&self, branch: &BranchName) -> PathBuf {
        self.heads_path().join(branch.as_ref())
    }
}
