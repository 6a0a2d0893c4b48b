//! Repository operations
//!
//! Operations are implemented as methods on
//! [`Repository`](crate::areas::repository::Repository), grouped in two
//! categories:
//!
//! - `plumbing`: direct object access (cat-file, hash-object)
//! - `porcelain`: the user-facing workflow (init, add, commit)

pub mod plumbing;
pub mod porcelain;
