//! Object model
//!
//! Every piece of stored content is an object identified by the SHA-1 of
//! `<type> <size>\0<content>`. There are three kinds:
//!
//! - **Blob**: file content (raw bytes)
//! - **Tree**: directory listing (mode, type, object ID and name per entry)
//! - **Commit**: snapshot pointer (tree, optional parent, author, committer, message)
//!
//! On disk, the same header-plus-content bytes are stored zlib-compressed.

pub mod blob;
pub mod commit;
pub mod entry_mode;
pub mod object;
pub mod object_id;
pub mod object_type;
pub mod tree;
pub mod tree_builder;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
