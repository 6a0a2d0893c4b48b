//! Branch names and the symbolic refs that point at them

pub mod branch_name;

/// Names matching this pattern are not valid branch names
pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";

/// `HEAD` content naming the active branch
pub const SYMREF_REGEX: &str = r"^ref: refs/heads/(.+)$";
