//! Three-way file reconciliation
//!
//! Every filename tracked by the split point, the head commit or the target commit
//! is classified by comparing its three versions. A side "changed" a file when its
//! version differs from the split point's, absence included.

use crate::areas::database::Database;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::conflict::render_conflict;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, TrackedFiles};
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};

/// Outcome for one filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'c> {
    /// The head version stands (including "absent in head")
    KeepHead,
    /// Only the target changed the file
    TakeTarget(&'c ObjectId),
    /// Only the target deleted the file, or only the head did and the file
    /// must also leave the working tree
    Delete,
    /// Both sides changed the file differently
    Conflict {
        head: Option<&'c ObjectId>,
        target: Option<&'c ObjectId>,
    },
}

impl<'c> Resolution<'c> {
    pub fn classify(
        split: Option<&'c ObjectId>,
        head: Option<&'c ObjectId>,
        target: Option<&'c ObjectId>,
    ) -> Self {
        if head == target {
            // unchanged on both sides, changed the same way, or deleted on both
            return Resolution::KeepHead;
        }

        match (split == head, split == target) {
            (true, _) => match target {
                Some(target) => Resolution::TakeTarget(target),
                None => Resolution::Delete,
            },
            (false, true) => match head {
                Some(_) => Resolution::KeepHead,
                None => Resolution::Delete,
            },
            (false, false) => Resolution::Conflict { head, target },
        }
    }
}

/// Result of reconciling two commits against their split point
#[derive(Debug)]
pub struct MergeResult {
    /// Tracked files of the merge commit
    pub tracked_files: TrackedFiles,
    /// Working tree changes bringing the head checkout to the merged state
    pub migration: Migration,
    /// Conflicted files and their marker content, not yet in the store
    pub conflicts: BTreeMap<String, Blob>,
}

impl MergeResult {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Persist the conflict blobs the migration and tracked files refer to
    pub fn store_conflicts(&self, database: &Database) -> anyhow::Result<()> {
        for blob in self.conflicts.values() {
            database.store_blob(blob)?;
        }

        Ok(())
    }
}

pub struct ThreeWayMerge<'r> {
    database: &'r Database,
    split: &'r Commit,
    head: &'r Commit,
    target: &'r Commit,
}

impl<'r> ThreeWayMerge<'r> {
    pub fn new(database: &'r Database, split: &'r Commit, head: &'r Commit, target: &'r Commit) -> Self {
        Self {
            database,
            split,
            head,
            target,
        }
    }

    /// Reconcile every file
    ///
    /// Nothing is written: conflicted versions are only hashed, and reach the store
    /// through `MergeResult::store_conflicts` once the merge is known to go ahead.
    pub fn resolve(&self) -> anyhow::Result<MergeResult> {
        let mut tracked_files = self.head.tracked_files().clone();
        let mut migration = Migration::default();
        let mut conflicts = BTreeMap::new();

        for name in self.filenames() {
            let split = self.split.tracked_oid(name);
            let head = self.head.tracked_oid(name);
            let target = self.target.tracked_oid(name);

            match Resolution::classify(split, head, target) {
                Resolution::KeepHead => {}
                Resolution::TakeTarget(target) => {
                    tracked_files.insert(name.clone(), target.clone());
                    migration.record_write(name.clone(), target.clone());
                }
                Resolution::Delete => {
                    tracked_files.remove(name);
                    migration.record_delete(name.clone());
                }
                Resolution::Conflict { head, target } => {
                    let content = render_conflict(&self.side_content(head)?, &self.side_content(target)?);
                    let blob = Blob::new(content);
                    let conflict_oid = blob.object_id()?;
                    tracing::debug!(file = %name, %conflict_oid, "merge conflict");

                    tracked_files.insert(name.clone(), conflict_oid.clone());
                    migration.record_write(name.clone(), conflict_oid);
                    conflicts.insert(name.clone(), blob);
                }
            }
        }

        Ok(MergeResult {
            tracked_files,
            migration,
            conflicts,
        })
    }

    fn filenames(&self) -> BTreeSet<&'r String> {
        self.split
            .tracked_files()
            .keys()
            .chain(self.head.tracked_files().keys())
            .chain(self.target.tracked_files().keys())
            .collect()
    }

    fn side_content(&self, oid: Option<&ObjectId>) -> anyhow::Result<Bytes> {
        match oid {
            Some(oid) => Ok(self.database.load_blob(oid)?.into_content()),
            None => Ok(Bytes::new()),
        }
    }
}
