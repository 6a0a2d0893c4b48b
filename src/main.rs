use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use is_terminal::IsTerminal;
use sprig::areas::repository::Repository;
use sprig::artifacts::objects::commit::Author;
use sprig::artifacts::objects::object::{Object, ObjectBox};
use sprig::commands::porcelain::add::Added;
use sprig::commands::porcelain::commit::CommitOutcome;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sprig",
    version,
    about = "A minimal content-addressable version-control engine",
    long_about = "sprig stores immutable snapshots of files and directories, tracks a \
    staging area, and links snapshots into a linear commit history per branch.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[arg(
        short = 'C',
        global = true,
        value_name = "DIR",
        help = "Run as if sprig was started in <DIR>"
    )]
    directory: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<PathBuf>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command stages files, or every file beneath a directory, for the next commit."
    )]
    Add {
        #[arg(required = true, help = "Files or directories to stage")]
        paths: Vec<PathBuf>,
    },
    #[command(
        name = "commit",
        about = "Record the staged snapshot on the current branch",
        long_about = "This command creates a new commit from the staged files. \
        Nothing is recorded when the staged snapshot matches the latest commit."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
        #[arg(long, help = "The author name (defaults to SPRIG_AUTHOR_NAME)")]
        author: Option<String>,
    },
    #[command(
        name = "cat-file",
        about = "Print the content of an object",
        long_about = "This command prints the content of an object in the repository. \
        It requires the ID of the object to be specified."
    )]
    CatFile {
        #[arg(short = 'p', long, help = "The object ID to print")]
        oid: String,
    },
    #[command(
        name = "hash-object",
        about = "Hash a file and optionally write it to the object database",
        long_about = "This command computes the blob ID of a file and can write it to the object database."
    )]
    HashObject {
        #[arg(short, long, help = "Write the object to the object database")]
        write: bool,
        #[arg(index = 1)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    sprig::logging::init_logging().context("failed to initialize logging")?;

    let pwd = match cli.directory {
        Some(directory) => directory,
        None => std::env::current_dir()?,
    };
    let mut stdout = std::io::stdout();
    if !stdout.is_terminal() {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Init { path } => {
            let path = path.map(|path| pwd.join(path)).unwrap_or(pwd);
            std::fs::create_dir_all(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;

            let repository = Repository::new(&path)?;
            repository.init()?;

            writeln!(
                stdout,
                "Initialized empty sprig repository in {}",
                repository.path().display()
            )?;
        }
        Commands::Add { paths } => {
            let repository = Repository::new(&pwd)?;

            for path in paths {
                match repository.add_path(&path)? {
                    Added::File(_) => {
                        writeln!(stdout, "{}", format!("Added {}", path.display()).green())?
                    }
                    Added::Directory(count) => writeln!(
                        stdout,
                        "{}",
                        format!("Added {count} files from directory {}", path.display()).green()
                    )?,
                }
            }
        }
        Commands::Commit { message, author } => {
            let repository = Repository::new(&pwd)?;
            let author = Author::load_from_env(author)?;

            match repository.commit(&message, author)? {
                CommitOutcome::Committed(oid) => {
                    let branch = repository.refs().current_branch()?;
                    let commit = repository.database().load_commit(&oid)?;
                    let root_marker = match commit.parent() {
                        Some(_) => "",
                        None => "(root-commit) ",
                    };

                    writeln!(
                        stdout,
                        "[{branch} {root_marker}{}] {}",
                        oid.to_short_oid(),
                        commit.short_message()
                    )?;
                }
                CommitOutcome::NoChanges => {
                    writeln!(stdout, "{}", "No changes to commit (up to date)".yellow())?
                }
            }
        }
        Commands::CatFile { oid } => {
            let repository = Repository::new(&pwd)?;
            match repository.cat_file(&oid)? {
                ObjectBox::Blob(blob) => stdout.write_all(blob.data())?,
                object => writeln!(stdout, "{}", object.display())?,
            }
        }
        Commands::HashObject { write, file } => {
            let repository = Repository::new(&pwd)?;
            let oid = repository.hash_object(&file, write)?;

            writeln!(stdout, "{oid}")?;
        }
    }

    Ok(())
}
