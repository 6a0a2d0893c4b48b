//! Tree entry modes
//!
//! Blobs carry no mode of their own; the mode lives in the referencing tree entry.

use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EntryMode {
    #[default]
    Regular,
    Directory,
}

impl EntryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryMode::Regular => "100644",
            EntryMode::Directory => "40000",
        }
    }

    /// Type of the object an entry with this mode points at
    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryMode::Regular => ObjectType::Blob,
            EntryMode::Directory => ObjectType::Tree,
        }
    }

    pub fn is_tree(&self) -> bool {
        matches!(self, EntryMode::Directory)
    }
}

impl TryFrom<&str> for EntryMode {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "100644" => Ok(EntryMode::Regular),
            "40000" => Ok(EntryMode::Directory),
            _ => Err(Error::corrupt_object(format!("invalid entry mode '{value}'"))),
        }
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
