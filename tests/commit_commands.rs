use pretty_assertions::assert_eq;
use chrono::DateTime;
use sprig::artifacts::branch::branch_name::BranchName;
use sprig::artifacts::objects::commit::Author;
use sprig::artifacts::objects::entry_mode::EntryMode;
use sprig::artifacts::objects::object::Object;
use sprig::artifacts::objects::object_id::ObjectId;
use sprig::artifacts::objects::object_type::ObjectType;
use sprig::commands::porcelain::commit::CommitOutcome;
use sprig::errors::Error;

mod common;

fn main_branch() -> BranchName {
    BranchName::try_parse("main".to_string()).unwrap()
}

fn committed(outcome: CommitOutcome) -> ObjectId {
    match outcome {
        CommitOutcome::Committed(oid) => oid,
        CommitOutcome::NoChanges => panic!("expected a commit"),
    }
}

#[test]
fn first_commit_is_a_root_commit() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;
    repository.add_file("a.txt", "hello")?;

    let h1 = committed(repository.commit("first", common::fixed_author("Author"))?);

    assert_eq!(
        common::read_metadata(&repository, "refs/heads/main")?,
        format!("{h1}\n")
    );
    assert_eq!(
        common::read_metadata(&repository, "HEAD")?,
        "ref: refs/heads/main\n"
    );
    assert!(repository.index()?.is_empty());

    let commit = repository.database().load_commit(&h1)?;
    assert_eq!(commit.parent(), None);
    assert_eq!(commit.message(), "first");
    assert_eq!(commit.author().name(), "Author");
    assert_eq!(commit.committer(), commit.author());

    let tree = repository.database().load_tree(commit.tree_oid())?;
    assert_eq!(tree.len(), 1);
    let entry = tree.entry("a.txt").expect("a.txt is in the tree");
    assert_eq!(entry.mode, EntryMode::Regular);
    assert_eq!(entry.oid, ObjectId::hash_bytes(b"blob 5\0hello"));

    Ok(())
}

#[test]
fn recommitting_the_same_snapshot_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;
    repository.add_file("a.txt", "hello")?;
    let h1 = committed(repository.commit("first", common::fixed_author("Author"))?);
    let objects_after_first = common::object_files(&repository);

    repository.add_file("a.txt", "hello")?;
    let outcome = repository.commit("second", common::fixed_author("Author"))?;

    assert_eq!(outcome, CommitOutcome::NoChanges);
    assert_eq!(repository.refs().branch_commit(&main_branch())?, Some(h1));
    assert_eq!(common::object_files(&repository), objects_after_first);
    assert_eq!(
        common::read_metadata(&repository, "HEAD")?,
        "ref: refs/heads/main\n"
    );

    Ok(())
}

#[test]
fn committing_an_empty_index_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;

    let outcome = repository.commit("nothing", common::fixed_author("Author"))?;

    assert_eq!(outcome, CommitOutcome::NoChanges);
    assert!(!repository.refs().heads_path().join("main").exists());
    assert!(common::object_files(&repository).is_empty());

    Ok(())
}

#[test]
fn commits_chain_through_their_parent() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;

    repository.add_file("a.txt", "one")?;
    let h1 = committed(repository.commit("first", common::fixed_author("Author"))?);

    repository.add_file("a.txt", "two")?;
    let h2 = committed(repository.commit("second\n\nwith a body", common::fixed_author("Author"))?);

    assert_ne!(h1, h2);
    assert_eq!(
        repository.refs().branch_commit(&main_branch())?,
        Some(h2.clone())
    );

    let second = repository.database().load_commit(&h2)?;
    assert_eq!(second.parent(), Some(&h1));
    assert_eq!(second.short_message(), "second");
    assert_eq!(second.message(), "second\n\nwith a body");

    Ok(())
}

#[test]
fn index_is_the_whole_next_snapshot() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;
    repository.add_many(vec![("a.txt", "a"), ("b.txt", "b")])?;
    committed(repository.commit("both", common::fixed_author("Author"))?);

    // only b.txt is staged now, so the next snapshot drops a.txt
    repository.add_file("b.txt", "b")?;
    let h2 = committed(repository.commit("only b", common::fixed_author("Author"))?);

    let commit = repository.database().load_commit(&h2)?;
    let tree = repository.database().load_tree(commit.tree_oid())?;
    assert_eq!(
        tree.entries()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>(),
        vec!["b.txt"]
    );

    Ok(())
}

#[test]
fn nested_directories_become_subtrees() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;
    repository.add_many(vec![("a/x.txt", "1"), ("a/y.txt", "2")])?;

    let oid = committed(repository.commit("nested", common::fixed_author("Author"))?);

    let commit = repository.database().load_commit(&oid)?;
    let root = repository.database().load_tree(commit.tree_oid())?;
    assert_eq!(root.len(), 1);
    let a = root.entry("a").expect("a is in the root tree");
    assert_eq!(a.object_type(), ObjectType::Tree);

    let subtree = repository.database().load_tree(&a.oid)?;
    assert_eq!(
        subtree
            .entries()
            .map(|entry| entry.name.as_str())
            .collect::<Vec<_>>(),
        vec!["x.txt", "y.txt"]
    );
    assert_eq!(subtree.object_type(), ObjectType::Tree);

    Ok(())
}

#[test]
fn corrupt_parent_aborts_before_any_mutation() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;
    repository.add_file("a.txt", "hello")?;
    let h1 = committed(repository.commit("first", common::fixed_author("Author"))?);

    // overwrite the commit object with something that doesn't decompress
    let commit_path = repository.database().object_path(&h1);
    std::fs::write(&commit_path, b"definitely not zlib")?;

    repository.add_file("a.txt", "changed")?;
    let index_before = repository.index()?.entries().clone();

    let err = repository
        .commit("second", common::fixed_author("Author"))
        .unwrap_err();

    assert!(matches!(err, Error::CorruptObject(_)));
    assert_eq!(
        repository.refs().branch_commit(&main_branch())?,
        Some(h1)
    );
    assert_eq!(repository.index()?.entries(), &index_before);

    Ok(())
}

#[test]
fn corrupt_head_is_reported() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;
    repository.add_file("a.txt", "hello")?;
    std::fs::write(repository.refs().head_path(), "garbage\n")?;

    let err = repository
        .commit("first", common::fixed_author("Author"))
        .unwrap_err();

    assert!(matches!(err, Error::CorruptRef { .. }));
    assert!(!repository.index()?.is_empty());

    Ok(())
}

#[test]
fn commit_id_is_stable_for_fixed_inputs() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir_a, first) = common::init_repository()?;
    let (_dir_b, second) = common::init_repository()?;

    first.add_file("a.txt", "hello")?;
    second.add_file("a.txt", "hello")?;

    assert_eq!(
        first.commit("first", common::fixed_author("Author"))?,
        second.commit("first", common::fixed_author("Author"))?
    );

    Ok(())
}

#[test]
fn multi_line_author_never_reaches_the_branch() -> Result<(), Box<dyn std::error::Error>> {
    let (_dir, repository) = common::init_repository()?;
    let timestamp = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00")?;

    let err = Author::new_with_timestamp("Ada\nLovelace".to_string(), timestamp).unwrap_err();
    assert!(matches!(err, Error::InvalidAuthor(_)));

    // the branch keeps accepting commits after the rejected author
    repository.add_file("a.txt", "one")?;
    let h1 = committed(repository.commit("first", common::fixed_author("Ada Lovelace"))?);
    repository.add_file("a.txt", "two")?;
    let h2 = committed(repository.commit("second", common::fixed_author("Ada Lovelace"))?);

    let second = repository.database().load_commit(&h2)?;
    assert_eq!(second.parent(), Some(&h1));
    assert_eq!(second.author().name(), "Ada Lovelace");

    Ok(())
}
