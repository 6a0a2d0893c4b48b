//! Tree object
//!
//! Trees represent directory snapshots. Each entry names a blob (file) or
//! another tree (subdirectory).
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry is one line: `<mode> <type> <object-id>\t<name>\n`
//!
//! Entries are always encoded sorted by name, so the object ID of a tree only
//! depends on its set of entries. A decoded tree keeps the order it was read
//! in, but encoding it again re-sorts.

use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use derive_new::new;

#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub oid: ObjectId,
    pub name: String,
}

impl TreeEntry {
    pub fn object_type(&self) -> ObjectType {
        self.mode.object_type()
    }

    pub fn is_tree(&self) -> bool {
        self.mode.is_tree()
    }

    fn to_line(&self) -> String {
        format!(
            "{} {} {}\t{}",
            self.mode,
            self.object_type(),
            self.oid,
            self.name
        )
    }

    fn parse_line(line: &str) -> Result<Self> {
        let (meta, name) = line
            .split_once('\t')
            .ok_or_else(|| Error::corrupt_object(format!("malformed tree entry '{line}'")))?;

        let mut parts = meta.split(' ');
        let (Some(mode), Some(object_type), Some(oid), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::corrupt_object(format!(
                "malformed tree entry '{line}'"
            )));
        };

        let mode = EntryMode::try_from(mode)?;
        if ObjectType::try_from(object_type)? != mode.object_type() {
            return Err(Error::corrupt_object(format!(
                "tree entry '{name}' has mode {mode} but type {object_type}"
            )));
        }
        let oid = ObjectId::try_parse(oid.to_string()).map_err(|e| {
            Error::corrupt_object(format!("tree entry '{name}' has {e}"))
        })?;

        if name.is_empty() {
            return Err(Error::corrupt_object("tree entry with an empty name"));
        }

        Ok(TreeEntry::new(mode, oid, name.to_string()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: Vec<TreeEntry>,
}

impl Tree {
    /// Build a tree from entries, sorted by name
    pub fn new(mut entries: Vec<TreeEntry>) -> Self {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Tree { entries }
    }

    /// Entries in their stored order
    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.iter()
    }

    pub fn entry(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn sorted_entries(&self) -> Vec<&TreeEntry> {
        let mut entries = self.entries.iter().collect::<Vec<_>>();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

impl Unpackable for Tree {
    fn deserialize(content: Bytes) -> Result<Self> {
        let content = std::str::from_utf8(&content)
            .map_err(|_| Error::corrupt_object("tree content is not valid UTF-8"))?;

        let entries = content
            .split_terminator('\n')
            .map(TreeEntry::parse_line)
            .collect::<Result<Vec<_>>>()?;

        Ok(Tree { entries })
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn content(&self) -> Bytes {
        self.sorted_entries()
            .into_iter()
            .fold(String::new(), |mut acc, entry| {
                acc.push_str(&entry.to_line());
                acc.push('\n');
                acc
            })
            .into()
    }

    fn display(&self) -> String {
        self.sorted_entries()
            .into_iter()
            .map(TreeEntry::to_line)
            .collect::<Vec<String>>()
            .join("\n")
    }
}
