//! Plumbing commands
//!
//! - `cat-file`: load an object by ID
//! - `hash-object`: compute a file's blob ID, optionally storing it

pub mod cat_file;
pub mod hash_object;
