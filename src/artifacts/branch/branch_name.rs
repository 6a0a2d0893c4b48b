use crate::artifacts::branch::{INVALID_BRANCH_NAME_REGEX, SYMREF_REGEX};
use crate::errors::{Error, Result};
use regex::Regex;

const REF_PREFIX: &str = "refs/heads/";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::InvalidBranchName(name));
        }

        let re = Regex::new(INVALID_BRANCH_NAME_REGEX)
            .map_err(|e| Error::InvalidBranchName(format!("{name} ({e})")))?;

        if re.is_match(&name) {
            Err(Error::InvalidBranchName(name))
        } else {
            Ok(Self(name))
        }
    }

    /// Parse the branch out of symbolic ref content (`ref: refs/heads/<name>`)
    ///
    /// Returns `None` when the content is not a symbolic ref to a branch.
    pub fn try_parse_sym_ref(content: &str) -> Result<Option<Self>> {
        let re = Regex::new(SYMREF_REGEX)
            .map_err(|e| Error::InvalidBranchName(format!("{content} ({e})")))?;

        match re.captures(content) {
            Some(captures) => Self::try_parse(captures[1].to_string()).map(Some),
            None => Ok(None),
        }
    }

    /// Symbolic ref content pointing at this branch
    pub fn to_sym_ref(&self) -> String {
        format!("ref: {REF_PREFIX}{}", self.0)
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
