//! Commit object
//!
//! Commits record a snapshot of the staged tree together with a pointer to the
//! previous commit on the same branch. History is strictly linear: a commit
//! has zero parents (root commit) or exactly one.
//!
//! ## Format
//!
//! ```text
//! commit <size>\0
//! tree <tree-sha>
//! parent <parent-sha>
//! author <name> <timestamp> <timezone>
//! committer <name> <timestamp> <timezone>
//!
//! <commit message>
//! ```

use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, Timelike};

/// Environment variable naming the commit author
pub const AUTHOR_NAME_ENV: &str = "SPRIG_AUTHOR_NAME";
/// Environment variable pinning the commit timestamp
pub const AUTHOR_DATE_ENV: &str = "SPRIG_AUTHOR_DATE";
/// Author used when neither a flag nor the environment names one
pub const DEFAULT_AUTHOR_NAME: &str = "Sprig User";

/// Author or committer information
///
/// Timestamps are kept at whole-second precision, which is what the encoding
/// stores.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Author {
    name: String,
    timestamp: DateTime<FixedOffset>,
}

impl Author {
    /// Create a new author stamped with the current local time
    pub fn new(name: String) -> Result<Self> {
        let now = chrono::Local::now().fixed_offset();

        Self::new_with_timestamp(name, now)
    }

    /// Names end up on a single header line, so line breaks and NUL are refused
    pub fn new_with_timestamp(name: String, timestamp: DateTime<FixedOffset>) -> Result<Self> {
        if name.contains(['\n', '\r', '\0']) {
            return Err(Error::InvalidAuthor(name));
        }
        let timestamp = timestamp.with_nanosecond(0).unwrap_or(timestamp);

        Ok(Author { name, timestamp })
    }

    /// Resolve the author from an explicit name, then the environment
    ///
    /// The name falls back to `SPRIG_AUTHOR_NAME` and then to
    /// [`DEFAULT_AUTHOR_NAME`]. `SPRIG_AUTHOR_DATE` (RFC 2822 or
    /// `%Y-%m-%d %H:%M:%S %z`) pins the timestamp; otherwise it is the current
    /// time. An unparseable date is ignored.
    pub fn load_from_env(name: Option<String>) -> Result<Self> {
        let name = name
            .or_else(|| std::env::var(AUTHOR_NAME_ENV).ok())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_AUTHOR_NAME.to_string());

        let timestamp = std::env::var(AUTHOR_DATE_ENV).ok().and_then(|date_str| {
            DateTime::parse_from_rfc2822(&date_str)
                .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
                .ok()
        });

        match timestamp {
            Some(ts) => Author::new_with_timestamp(name, ts),
            None => Author::new(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// `name timestamp timezone`, as stored in the commit
    pub fn display(&self) -> String {
        format!(
            "{} {} {}",
            self.name,
            self.timestamp.timestamp(),
            self.timestamp.format("%z")
        )
    }
}

impl TryFrom<&str> for Author {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        // Split from the right: the name may itself contain spaces
        let mut parts = value.rsplitn(3, ' ');
        let (Some(timezone), Some(timestamp), Some(name)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(Error::corrupt_object(format!(
                "invalid author line '{value}'"
            )));
        };

        let timestamp = timestamp
            .parse::<i64>()
            .map_err(|_| Error::corrupt_object(format!("invalid timestamp '{timestamp}'")))?;
        let offset = parse_offset(timezone)
            .ok_or_else(|| Error::corrupt_object(format!("invalid timezone '{timezone}'")))?;
        let datetime = DateTime::from_timestamp(timestamp, 0)
            .ok_or_else(|| Error::corrupt_object(format!("timestamp {timestamp} out of range")))?
            .with_timezone(&offset);

        Ok(Author {
            name: name.to_string(),
            timestamp: datetime,
        })
    }
}

/// Parse a `+hhmm` / `-hhmm` offset
fn parse_offset(timezone: &str) -> Option<FixedOffset> {
    let (sign, digits) = match timezone.split_at_checked(1)? {
        ("+", digits) => (1, digits),
        ("-", digits) => (-1, digits),
        _ => return None,
    };
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours = digits[..2].parse::<i32>().ok()?;
    let minutes = digits[2..].parse::<i32>().ok()?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Commit {
    /// Previous commit on the branch, `None` for a root commit
    parent: Option<ObjectId>,
    tree_oid: ObjectId,
    author: Author,
    committer: Author,
    message: String,
}

impl Commit {
    /// Create a new commit; the author also acts as committer
    pub fn new(parent: Option<ObjectId>, tree_oid: ObjectId, author: Author, message: String) -> Self {
        Commit {
            parent,
            tree_oid,
            committer: author.clone(),
            author,
            message,
        }
    }

    /// First line of the commit message
    pub fn short_message(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> &ObjectId {
        &self.tree_oid
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn author(&self) -> &Author {
        &self.author
    }

    pub fn committer(&self) -> &Author {
        &self.committer
    }

    fn header_value<'l>(line: Option<&'l str>, key: &str) -> Result<&'l str> {
        line.and_then(|line| line.strip_prefix(key))
            .and_then(|line| line.strip_prefix(' '))
            .ok_or_else(|| Error::corrupt_object(format!("commit is missing its {key} line")))
    }

    fn parse_oid(value: &str, key: &str) -> Result<ObjectId> {
        ObjectId::try_parse(value.to_string())
            .map_err(|e| Error::corrupt_object(format!("commit {key} line has {e}")))
    }
}

impl Unpackable for Commit {
    fn deserialize(content: Bytes) -> Result<Self> {
        let content = String::from_utf8(content.to_vec())
            .map_err(|_| Error::corrupt_object("commit content is not valid UTF-8"))?;

        // headers end at the first blank line, everything after is the message
        let (headers, message) = content
            .split_once("\n\n")
            .unwrap_or((content.as_str(), ""));
        let mut lines = headers.lines().peekable();

        let tree_oid = Self::parse_oid(Self::header_value(lines.next(), "tree")?, "tree")?;

        let mut parent = None;
        while let Some(line) = lines.next_if(|line| line.starts_with("parent ")) {
            if parent.is_some() {
                return Err(Error::corrupt_object(
                    "commit has more than one parent",
                ));
            }
            parent = Some(Self::parse_oid(Self::header_value(Some(line), "parent")?, "parent")?);
        }

        let author = Author::try_from(Self::header_value(lines.next(), "author")?)?;
        let committer = Author::try_from(Self::header_value(lines.next(), "committer")?)?;

        if let Some(line) = lines.next() {
            return Err(Error::corrupt_object(format!(
                "unexpected commit header '{line}'"
            )));
        }

        Ok(Commit {
            parent,
            tree_oid,
            author,
            committer,
            message: message.to_string(),
        })
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn content(&self) -> Bytes {
        self.display().into()
    }

    fn display(&self) -> String {
        let mut lines = vec![format!("tree {}", self.tree_oid)];
        if let Some(parent) = &self.parent {
            lines.push(format!("parent {parent}"));
        }
        lines.push(format!("author {}", self.author.display()));
        lines.push(format!("committer {}", self.committer.display()));
        lines.push(String::new());
        lines.push(self.message.to_string());

        lines.join("\n")
    }
}
