//! Porcelain commands
//!
//! - `init`: create the metadata root
//! - `add`: stage files and directories
//! - `commit`: record the staged snapshot on the current branch

pub mod add;
pub mod commit;
pub mod init;
