use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Author, Commit};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree_builder::TreeBuilder;
use crate::errors::Result;
use tracing::{debug, info};

/// Result of a commit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// A new commit was recorded and the current branch moved to it
    Committed(ObjectId),
    /// Nothing is staged, or the staged tree matches the branch's latest commit
    NoChanges,
}

impl Repository {
    /// Record the staged snapshot on the current branch
    ///
    /// The branch ref is only moved, and the index only cleared, once the
    /// commit object is stored. A failure before that leaves at most orphan
    /// tree objects behind.
    pub fn commit(&self, message: &str, author: Author) -> Result<CommitOutcome> {
        let mut index = self.index()?;

        let Some(tree_oid) = TreeBuilder::new(self.database()).create_tree(index.entries())? else {
            debug!("nothing staged");
            return Ok(CommitOutcome::NoChanges);
        };

        let branch = self.refs().current_branch()?;
        let parent = self.refs().branch_commit(&branch)?;

        if let Some(parent_oid) = &parent {
            let parent_commit = self.database().load_commit(parent_oid)?;
            if parent_commit.tree_oid() == &tree_oid {
                debug!(tree = %tree_oid, "staged tree matches the latest commit");
                return Ok(CommitOutcome::NoChanges);
            }
        }

        let commit = Commit::new(parent, tree_oid, author, message.to_string());
        let commit_oid = self.database().store(&commit)?;
        self.refs().set_branch_commit(&branch, &commit_oid)?;

        index.clear();
        index.save()?;

        info!(%branch, oid = %commit_oid, "created commit");

        Ok(CommitOutcome::Committed(commit_oid))
    }
}
