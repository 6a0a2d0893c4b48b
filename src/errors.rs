//! Error taxonomy for repository operations.
//!
//! A commit that finds nothing to record is not an error: see
//! [`CommitOutcome`](crate::commands::porcelain::commit::CommitOutcome).

use crate::artifacts::objects::object_id::ObjectId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not a sprig repository (or the metadata root is missing): {}", .0.display())]
    RepositoryNotInitialized(PathBuf),

    #[error("repository already exists at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("object {0} does not exist")]
    ObjectNotFound(ObjectId),

    #[error("corrupt object: {0}")]
    CorruptObject(String),

    #[error("corrupt ref {name}: {reason}")]
    CorruptRef { name: String, reason: String },

    #[error("corrupt index: {0}")]
    CorruptIndex(String),

    #[error("invalid object id '{0}'")]
    InvalidObjectId(String),

    #[error("invalid branch name '{0}'")]
    InvalidBranchName(String),

    #[error("invalid author name {0:?}: names cannot contain newlines or NUL")]
    InvalidAuthor(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn corrupt_object(reason: impl Into<String>) -> Self {
        Error::CorruptObject(reason.into())
    }

    pub fn corrupt_ref(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::CorruptRef {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
