//! Tree building from the staging index
//!
//! Converts a flat `path -> blob id` mapping into nested tree objects. Paths are
//! grouped by their first segment; a group made of that bare segment becomes a
//! blob entry, any other group becomes a subtree built from the path suffixes.
//! Subtrees are stored before their parent (children's IDs must be known to
//! hash the parent), so the whole hierarchy is in the database once the root
//! ID is returned.

use crate::areas::database::Database;
use crate::artifacts::objects::entry_mode::EntryMode;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeEntry};
use crate::errors::{Error, Result};
use std::collections::BTreeMap;
use tracing::trace;

/// Staged paths sharing a first segment
enum Group<'m> {
    File(&'m ObjectId),
    Directory(Vec<(&'m str, &'m ObjectId)>),
}

pub struct TreeBuilder<'d> {
    database: &'d Database,
}

impl<'d> TreeBuilder<'d> {
    pub fn new(database: &'d Database) -> Self {
        TreeBuilder { database }
    }

    /// Build and store the tree hierarchy for `mapping`
    ///
    /// Returns `None` for an empty mapping (nothing to commit). The result
    /// only depends on the set of `(path, id)` pairs, never on iteration order.
    pub fn create_tree<'m, I>(&self, mapping: I) -> Result<Option<ObjectId>>
    where
        I: IntoIterator<Item = (&'m String, &'m ObjectId)>,
    {
        let paths = mapping
            .into_iter()
            .map(|(path, oid)| (path.as_str(), oid))
            .collect::<Vec<_>>();

        if paths.is_empty() {
            return Ok(None);
        }

        self.build_level("", paths).map(Some)
    }

    fn build_level<'m>(&self, prefix: &str, paths: Vec<(&'m str, &'m ObjectId)>) -> Result<ObjectId> {
        let mut groups: BTreeMap<&'m str, Group<'m>> = BTreeMap::new();

        for (path, oid) in paths {
            let (name, rest) = match path.split_once('/') {
                Some((name, rest)) => (name, Some(rest)),
                None => (path, None),
            };
            if name.is_empty() || rest.is_some_and(str::is_empty) {
                return Err(Error::invalid_path(
                    format!("{prefix}{path}"),
                    "empty path segment",
                ));
            }

            match (groups.get_mut(name), rest) {
                (None, None) => {
                    groups.insert(name, Group::File(oid));
                }
                (None, Some(rest)) => {
                    groups.insert(name, Group::Directory(vec![(rest, oid)]));
                }
                (Some(Group::Directory(children)), Some(rest)) => children.push((rest, oid)),
                (Some(Group::File(existing)), None) if *existing == oid => {}
                (Some(Group::File(_)), None) => {
                    return Err(Error::invalid_path(
                        format!("{prefix}{path}"),
                        "staged more than once with different content",
                    ));
                }
                (Some(_), _) => {
                    return Err(Error::invalid_path(
                        format!("{prefix}{name}"),
                        "staged both as a file and as a directory",
                    ));
                }
            }
        }

        let entries = groups
            .into_iter()
            .map(|(name, group)| match group {
                Group::File(oid) => Ok(TreeEntry::new(
                    EntryMode::Regular,
                    oid.clone(),
                    name.to_string(),
                )),
                Group::Directory(children) => {
                    let subtree_oid = self.build_level(&format!("{prefix}{name}/"), children)?;
                    Ok(TreeEntry::new(
                        EntryMode::Directory,
                        subtree_oid,
                        name.to_string(),
                    ))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        let tree = Tree::new(entries);
        trace!(prefix, entries = tree.len(), "storing tree");

        self.database.store(&tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::object::Object;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::{fixture, rstest};
    use std::collections::HashMap;

    fn temp_database() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let database = Database::new(dir.path().join("objects").into_boxed_path());
        (dir, database)
    }

    #[fixture]
    fn database() -> (tempfile::TempDir, Database) {
        temp_database()
    }

    fn blob_id(content: &str) -> ObjectId {
        Blob::new(content.to_string()).object_id()
    }

    fn mapping(pairs: &[(&str, &str)]) -> BTreeMap<String, ObjectId> {
        pairs
            .iter()
            .map(|(path, content)| (path.to_string(), blob_id(content)))
            .collect()
    }

    #[rstest]
    fn empty_mapping_has_no_tree(database: (tempfile::TempDir, Database)) {
        let (_dir, database) = database;

        let root = TreeBuilder::new(&database)
            .create_tree(&BTreeMap::<String, ObjectId>::new())
            .unwrap();

        assert_eq!(root, None);
        assert!(!database.objects_path().exists());
    }

    #[rstest]
    fn nested_paths_become_subtrees(database: (tempfile::TempDir, Database)) {
        let (_dir, database) = database;
        let mapping = mapping(&[("a/y.txt", "2"), ("a/x.txt", "1"), ("README", "r")]);

        let root = TreeBuilder::new(&database)
            .create_tree(&mapping)
            .unwrap()
            .unwrap();

        let root = database.load_tree(&root).unwrap();
        let names = root.entries().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["README", "a"]);

        let a = root.entry("a").unwrap();
        assert!(a.is_tree());
        let subtree = database.load_tree(&a.oid).unwrap();
        let names = subtree.entries().map(|e| e.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["x.txt", "y.txt"]);
        assert_eq!(subtree.entry("x.txt").unwrap().oid, blob_id("1"));
    }

    #[rstest]
    fn deep_paths_store_every_level(database: (tempfile::TempDir, Database)) {
        let (_dir, database) = database;
        let mapping = mapping(&[("a/b/c/d.txt", "deep")]);

        let root = TreeBuilder::new(&database)
            .create_tree(&mapping)
            .unwrap()
            .unwrap();

        let mut tree = database.load_tree(&root).unwrap();
        for name in ["a", "b", "c"] {
            let entry = tree.entry(name).unwrap().clone();
            assert!(entry.is_tree());
            tree = database.load_tree(&entry.oid).unwrap();
        }
        assert_eq!(tree.entry("d.txt").unwrap().oid, blob_id("deep"));
    }

    #[rstest]
    fn file_and_directory_with_the_same_name_conflict(database: (tempfile::TempDir, Database)) {
        let (_dir, database) = database;
        let mapping = mapping(&[("a", "file"), ("a/b", "nested")]);

        let err = TreeBuilder::new(&database)
            .create_tree(&mapping)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[rstest]
    #[case("a//b")]
    #[case("a/")]
    #[case("/a")]
    fn empty_segments_are_rejected(database: (tempfile::TempDir, Database), #[case] path: &str) {
        let (_dir, database) = database;
        let mapping = mapping(&[(path, "x")]);

        let err = TreeBuilder::new(&database)
            .create_tree(&mapping)
            .unwrap_err();

        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    proptest! {
        #[test]
        fn hash_does_not_depend_on_insertion_order(
            files in prop::collection::btree_map("[a-c]{1,2}(/[a-c]{1,2}){0,2}\\.txt", "[a-z]{0,8}", 1..12),
            seed in any::<u64>()
        ) {
            let (_dir, database) = temp_database();
            let builder = TreeBuilder::new(&database);

            let sorted = files
                .iter()
                .map(|(path, content)| (path.clone(), blob_id(content)))
                .collect::<Vec<_>>();
            let mut shuffled = sorted.clone();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();

            let forward = builder.create_tree(sorted.iter().map(|(p, o)| (p, o))).unwrap();
            let hashed: HashMap<String, ObjectId> = shuffled.into_iter().collect();
            let backward = builder.create_tree(&hashed).unwrap();

            prop_assert_eq!(forward, backward);
        }
    }
}
