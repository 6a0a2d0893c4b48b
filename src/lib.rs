//! sprig: a minimal content-addressable version-control engine
//!
//! - `areas`: on-disk areas of a repository (object database, index, refs, workspace)
//! - `artifacts`: object model, tree building and branch names
//! - `commands`: repository operations, split into porcelain and plumbing
//! - `errors`: error taxonomy shared by every operation
//! - `logging`: tracing subscriber setup for the binary

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
pub mod logging;

/// Name of the repository metadata root directory
pub const METADATA_DIR: &str = ".sprig";

/// Branch that `HEAD` points at after `init`
pub const DEFAULT_BRANCH: &str = "main";
