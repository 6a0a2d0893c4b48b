//! Version-control data structures
//!
//! - `branch`: branch names and symbolic ref parsing
//! - `objects`: object types (blob, tree, commit) and tree building

pub mod branch;
pub mod objects;
