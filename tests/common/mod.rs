#![allow(dead_code)]

use assert_fs::TempDir;
use chrono::DateTime;
use sprig::areas::repository::Repository;
use sprig::artifacts::objects::commit::Author;
use std::path::{Path, PathBuf};

pub fn init_repository() -> Result<(TempDir, Repository), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let repository = Repository::new(dir.path())?;
    repository.init()?;

    Ok((dir, repository))
}

pub fn fixed_author(name: &str) -> Author {
    let timestamp = DateTime::parse_from_rfc3339("2024-05-01T12:00:00+02:00")
        .expect("valid timestamp");

    Author::new_with_timestamp(name.to_string(), timestamp).expect("valid author name")
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, content)
}

pub fn read_metadata(repository: &Repository, relative: &str) -> std::io::Result<String> {
    std::fs::read_to_string(repository.metadata_path().join(relative))
}

/// Every object file currently in the database, sorted
pub fn object_files(repository: &Repository) -> Vec<PathBuf> {
    let mut files = walkdir::WalkDir::new(repository.database().objects_path())
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect::<Vec<_>>();
    files.sort();

    files
}
