//! Commit object
//!
//! Commits are immutable snapshots of the tracked files at one point in time.
//! They contain:
//! - A timestamp
//! - Parent commit ID(s): none for the root, one for a regular commit, two for a merge
//! - The tracked files, mapping each filename to a blob ID
//! - A commit message
//!
//! ## Format
//!
//! The canonical serialization is both what gets hashed and what gets stored
//! (compressed) on disk:
//! ```text
//! commit <size>\0
//! date <unix-seconds> <+hhmm>
//! parent <parent-sha>
//! parent <secondary-parent-sha>
//! file <blob-sha> <name>
//!
//! <commit message>
//! ```
//!
//! A commit value is built in one step from its final fields and its ID is computed
//! right there, so no partially initialized commit is ever hashed.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset, TimeZone};
use std::collections::BTreeMap;
use std::io::BufRead;

/// Message of the commit created by `init`
pub const ROOT_COMMIT_MESSAGE: &str = "initial commit";

/// Environment variable overriding the timestamp of new commits
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";

/// Filename to blob ID, ordered by filename
pub type TrackedFiles = BTreeMap<String, ObjectId>;

/// How a commit is attached to the graph
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parents {
    /// The single initial commit of a repository
    Root,
    Regular {
        parent: ObjectId,
    },
    Merge {
        parent: ObjectId,
        secondary_parent: ObjectId,
    },
}

impl Parents {
    /// The primary parent, followed by `log`
    pub fn primary(&self) -> Option<&ObjectId> {
        match self {
            Parents::Root => None,
            Parents::Regular { parent } | Parents::Merge { parent, .. } => Some(parent),
        }
    }

    pub fn secondary(&self) -> Option<&ObjectId> {
        match self {
            Parents::Merge {
                secondary_parent, ..
            } => Some(secondary_parent),
            Parents::Root | Parents::Regular { .. } => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.primary().into_iter().chain(self.secondary())
    }

    fn from_list(mut parents: Vec<ObjectId>) -> anyhow::Result<Self> {
        match parents.len() {
            0 => Ok(Parents::Root),
            1 => Ok(Parents::Regular {
                parent: parents.remove(0),
            }),
            2 => {
                let secondary_parent = parents.remove(1);
                let parent = parents.remove(0);
                Ok(Parents::Merge {
                    parent,
                    secondary_parent,
                })
            }
            count => Err(anyhow::anyhow!(
                "Invalid commit object: {count} parents recorded"
            )),
        }
    }
}

/// Slim representation of a commit
///
/// Contains only what graph traversals need, so they can run against an
/// in-memory graph as easily as against the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlimCommit {
    pub oid: ObjectId,
    pub parents: Parents,
}

/// Commit object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    oid: ObjectId,
    message: String,
    timestamp: DateTime<FixedOffset>,
    parents: Parents,
    tracked_files: TrackedFiles,
}

impl Commit {
    /// The root commit every repository starts from: fixed message, epoch timestamp,
    /// nothing tracked. Two repositories always share the same root ID.
    pub fn root() -> Self {
        let epoch = DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset();
        Self::build(
            ROOT_COMMIT_MESSAGE.to_string(),
            epoch,
            Parents::Root,
            TrackedFiles::new(),
        )
    }

    /// Create a regular commit on top of `parent`
    pub fn new(
        message: String,
        parent: ObjectId,
        tracked_files: TrackedFiles,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        Self::build(message, timestamp, Parents::Regular { parent }, tracked_files)
    }

    /// Create a merge commit joining two distinct parents
    pub fn new_merge(
        message: String,
        parent: ObjectId,
        secondary_parent: ObjectId,
        tracked_files: TrackedFiles,
        timestamp: DateTime<FixedOffset>,
    ) -> anyhow::Result<Self> {
        if parent == secondary_parent {
            anyhow::bail!("a merge commit needs two distinct parents, got {parent} twice");
        }

        Ok(Self::build(
            message,
            timestamp,
            Parents::Merge {
                parent,
                secondary_parent,
            },
            tracked_files,
        ))
    }

    fn build(
        message: String,
        timestamp: DateTime<FixedOffset>,
        parents: Parents,
        tracked_files: TrackedFiles,
    ) -> Self {
        let content = Self::canonical_bytes(&message, &timestamp, &parents, &tracked_files);
        let oid = ObjectId::from_content(&content);

        Commit {
            oid,
            message,
            timestamp,
            parents,
            tracked_files,
        }
    }

    fn canonical_bytes(
        message: &str,
        timestamp: &DateTime<FixedOffset>,
        parents: &Parents,
        tracked_files: &TrackedFiles,
    ) -> Bytes {
        let mut object_content = vec![format!(
            "date {} {}",
            timestamp.timestamp(),
            timestamp.format("%z")
        )];
        for parent in parents.iter() {
            object_content.push(format!("parent {}", parent.as_ref()));
        }
        for (name, oid) in tracked_files {
            object_content.push(format!("file {} {}", oid.as_ref(), name));
        }
        object_content.push(String::new());
        object_content.push(message.to_string());

        let object_content = object_content.join("\n");

        let mut commit_bytes = Vec::with_capacity(object_content.len() + 16);
        let header = format!("{} {}\0", ObjectType::Commit.as_str(), object_content.len());
        commit_bytes.extend_from_slice(header.as_bytes());
        commit_bytes.extend_from_slice(object_content.as_bytes());

        Bytes::from(commit_bytes)
    }

    pub fn oid(&self) -> &ObjectId {
        &self.oid
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Format timestamp in human-readable form
    ///
    /// # Returns
    ///
    /// String like "Thu Jan 1 00:00:00 1970 +0000"
    pub fn readable_timestamp(&self) -> String {
        self.timestamp
            .format("%a %b %-d %H:%M:%S %Y %z")
            .to_string()
    }

    pub fn parents(&self) -> &Parents {
        &self.parents
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parents.primary()
    }

    pub fn is_merge(&self) -> bool {
        matches!(self.parents, Parents::Merge { .. })
    }

    pub fn tracked_files(&self) -> &TrackedFiles {
        &self.tracked_files
    }

    pub fn tracked_oid(&self, name: &str) -> Option<&ObjectId> {
        self.tracked_files.get(name)
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.tracked_files.contains_key(name)
    }

    pub fn to_slim(&self) -> SlimCommit {
        SlimCommit {
            oid: self.oid.clone(),
            parents: self.parents.clone(),
        }
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        Ok(Self::canonical_bytes(
            &self.message,
            &self.timestamp,
            &self.parents,
            &self.tracked_files,
        ))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        let content = String::from_utf8(content)?;
        let mut lines = content.split('\n');

        let date_line = lines
            .next()
            .context("Invalid commit object: missing date line")?;
        let timestamp = parse_timestamp(
            date_line
                .strip_prefix("date ")
                .context("Invalid commit object: invalid date line")?,
        )?;

        let mut parents = Vec::new();
        let mut tracked_files = TrackedFiles::new();

        // headers run until the blank separator line
        for line in lines.by_ref() {
            if line.is_empty() {
                break;
            }

            if let Some(parent_oid) = line.strip_prefix("parent ") {
                parents.push(ObjectId::try_parse(parent_oid.to_string())?);
            } else if let Some(entry) = line.strip_prefix("file ") {
                let (oid, name) = entry
                    .split_once(' ')
                    .context("Invalid commit object: invalid file line")?;
                tracked_files.insert(name.to_string(), ObjectId::try_parse(oid.to_string())?);
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        let message = lines.collect::<Vec<&str>>().join("\n");
        let parents = Parents::from_list(parents)?;

        Ok(Self::build(message, timestamp, parents, tracked_files))
    }
}

impl Object for Commit {
    fn object_type(&self) -> ObjectType {
        ObjectType::Commit
    }

    fn object_id(&self) -> anyhow::Result<ObjectId> {
        Ok(self.oid.clone())
    }
}

/// Timestamp for a new commit: `GITLET_COMMIT_DATE` when set, otherwise now
///
/// The variable accepts RFC 2822 or `%Y-%m-%d %H:%M:%S %z`.
pub fn timestamp_from_env() -> anyhow::Result<DateTime<FixedOffset>> {
    match std::env::var(COMMIT_DATE_ENV) {
        Ok(date_str) => chrono::DateTime::parse_from_rfc2822(&date_str)
            .or_else(|_| chrono::DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
            .with_context(|| format!("{COMMIT_DATE_ENV} is not a valid date: {date_str}")),
        Err(_) => Ok(chrono::Local::now().fixed_offset()),
    }
}

// Format: "<unix-seconds> <+hhmm>"
fn parse_timestamp(value: &str) -> anyhow::Result<DateTime<FixedOffset>> {
    let (seconds, timezone) = value
        .split_once(' ')
        .context("Invalid commit object: invalid date format")?;
    let seconds = seconds
        .parse::<i64>()
        .map_err(|_| anyhow::anyhow!("Invalid timestamp"))?;

    let offset = parse_offset(timezone)?;
    offset
        .timestamp_opt(seconds, 0)
        .single()
        .ok_or_else(|| anyhow::anyhow!("Invalid timestamp"))
}

fn parse_offset(timezone: &str) -> anyhow::Result<FixedOffset> {
    let invalid = || anyhow::anyhow!("Invalid timezone: {timezone}");

    if timezone.len() != 5 || !timezone.is_ascii() {
        return Err(invalid());
    }
    let (sign, digits) = timezone.split_at(1);
    let sign = match sign {
        "+" => 1,
        "-" => -1,
        _ => return Err(invalid()),
    };
    let hours = digits[..2].parse::<i32>().map_err(|_| invalid())?;
    let minutes = digits[2..].parse::<i32>().map_err(|_| invalid())?;

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_type::ObjectType;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::io::Cursor;

    #[fixture]
    fn timestamp() -> DateTime<FixedOffset> {
        DateTime::parse_from_str("2023-01-01 12:00:00 +0200", "%Y-%m-%d %H:%M:%S %z").unwrap()
    }

    #[fixture]
    fn tracked() -> TrackedFiles {
        TrackedFiles::from([
            ("a.txt".to_string(), ObjectId::from_content(b"a")),
            ("b file.txt".to_string(), ObjectId::from_content(b"b")),
        ])
    }

    fn reparse(commit: &Commit) -> anyhow::Result<Commit> {
        let mut reader = Cursor::new(commit.serialize()?);
        assert_eq!(
            ObjectType::parse_object_type(&mut reader)?,
            ObjectType::Commit
        );
        Commit::deserialize(reader)
    }

    #[test]
    fn root_commit_is_reproducible() {
        let root = Commit::root();

        assert_eq!(root, Commit::root());
        assert_eq!(root.parents(), &Parents::Root);
        assert_eq!(root.timestamp().timestamp(), 0);
        assert_eq!(root.readable_timestamp(), "Thu Jan 1 00:00:00 1970 +0000");
        assert!(root.tracked_files().is_empty());
    }

    #[rstest]
    fn identical_fields_give_identical_ids(
        timestamp: DateTime<FixedOffset>,
        tracked: TrackedFiles,
    ) {
        let root = Commit::root();
        let first = Commit::new(
            "message".to_string(),
            root.oid().clone(),
            tracked.clone(),
            timestamp,
        );
        let second = Commit::new("message".to_string(), root.oid().clone(), tracked, timestamp);

        assert_eq!(first.oid(), second.oid());
    }

    #[rstest]
    fn any_field_change_changes_the_id(timestamp: DateTime<FixedOffset>, tracked: TrackedFiles) {
        let root = Commit::root();
        let base = Commit::new(
            "message".to_string(),
            root.oid().clone(),
            tracked.clone(),
            timestamp,
        );

        let other_message = Commit::new(
            "other".to_string(),
            root.oid().clone(),
            tracked.clone(),
            timestamp,
        );
        let other_time = Commit::new(
            "message".to_string(),
            root.oid().clone(),
            tracked.clone(),
            timestamp + chrono::Duration::seconds(1),
        );
        let other_files = Commit::new(
            "message".to_string(),
            root.oid().clone(),
            TrackedFiles::new(),
            timestamp,
        );

        assert_ne!(base.oid(), other_message.oid());
        assert_ne!(base.oid(), other_time.oid());
        assert_ne!(base.oid(), other_files.oid());
    }

    #[rstest]
    fn regular_commit_survives_serialization(
        timestamp: DateTime<FixedOffset>,
        tracked: TrackedFiles,
    ) -> anyhow::Result<()> {
        let commit = Commit::new(
            "multi\nline message".to_string(),
            Commit::root().oid().clone(),
            tracked,
            timestamp,
        );

        let parsed = reparse(&commit)?;

        assert_eq!(parsed, commit);
        assert_eq!(parsed.timestamp().offset(), timestamp.offset());
        Ok(())
    }

    #[rstest]
    fn merge_commit_keeps_both_parents(
        timestamp: DateTime<FixedOffset>,
        tracked: TrackedFiles,
    ) -> anyhow::Result<()> {
        let root = Commit::root();
        let side = Commit::new(
            "side".to_string(),
            root.oid().clone(),
            TrackedFiles::new(),
            timestamp,
        );
        let merge = Commit::new_merge(
            "Merged side into master.".to_string(),
            root.oid().clone(),
            side.oid().clone(),
            tracked,
            timestamp,
        )?;

        let parsed = reparse(&merge)?;

        assert!(parsed.is_merge());
        assert_eq!(parsed.parent(), Some(root.oid()));
        assert_eq!(parsed.parents().secondary(), Some(side.oid()));
        assert_eq!(parsed.oid(), merge.oid());
        Ok(())
    }

    #[rstest]
    fn merge_commit_rejects_identical_parents(timestamp: DateTime<FixedOffset>) {
        let root = Commit::root();

        let result = Commit::new_merge(
            "bad".to_string(),
            root.oid().clone(),
            root.oid().clone(),
            TrackedFiles::new(),
            timestamp,
        );

        assert!(result.is_err());
    }

    #[test]
    fn negative_offsets_are_parsed() -> anyhow::Result<()> {
        let parsed = parse_timestamp("1510286405 -0800")?;

        assert_eq!(parsed.offset().local_minus_utc(), -8 * 3600);
        assert_eq!(parsed.timestamp(), 1510286405);
        Ok(())
    }
}
