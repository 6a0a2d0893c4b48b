//! On-disk areas of a repository
//!
//! - `database`: content-addressed object store
//! - `index`: staging area mapping paths to blob IDs
//! - `refs`: HEAD and branch references
//! - `repository`: ties the areas together around a workspace root
//! - `workspace`: resolving and walking files in the working directory

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod workspace;
