//! Staging area
//!
//! Two maps from filename to blob ID: files staged for addition and files marked
//! for removal. A filename is never in both. The next commit starts from its
//! parent's tracked files and folds both maps into them, after which the index is
//! cleared as a whole.

use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::objects::object_id::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Pending additions and modifications
    staged: BTreeMap<String, ObjectId>,
    /// Pending removals, with the blob ID the head commit tracked
    removed: BTreeMap<String, ObjectId>,
}

impl Index {
    /// Stage `name` with content `oid`
    ///
    /// Staging the exact content the head commit already tracks is not a change,
    /// so it only drops a previous staging entry. In every case a pending removal
    /// of `name` is cancelled.
    pub fn stage_add(&mut self, name: &str, oid: ObjectId, head_oid: Option<&ObjectId>) {
        self.removed.remove(name);

        if head_oid == Some(&oid) {
            self.staged.remove(name);
        } else {
            self.staged.insert(name.to_string(), oid);
        }
    }

    /// Mark `name` for removal in the next commit
    pub fn stage_remove(&mut self, name: &str, oid: ObjectId) {
        self.staged.remove(name);
        self.removed.insert(name.to_string(), oid);
    }

    /// Drop a staging entry, returning the blob ID it held
    pub fn unstage(&mut self, name: &str) -> Option<ObjectId> {
        self.staged.remove(name)
    }

    pub fn is_staged(&self, name: &str) -> bool {
        self.staged.contains_key(name)
    }

    pub fn staged_oid(&self, name: &str) -> Option<&ObjectId> {
        self.staged.get(name)
    }

    pub fn is_marked_for_removal(&self, name: &str) -> bool {
        self.removed.contains_key(name)
    }

    pub fn staged(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.staged.iter()
    }

    pub fn removed(&self) -> impl Iterator<Item = &String> {
        self.removed.keys()
    }

    pub fn clear(&mut self) {
        self.staged.clear();
        self.removed.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty() && self.removed.is_empty()
    }

    /// Fold the pending changes into a copy of the parent's tracked files
    pub fn apply_to(&self, mut tracked_files: TrackedFiles) -> TrackedFiles {
        for (name, oid) in &self.staged {
            tracked_files.insert(name.clone(), oid.clone());
        }
        for name in self.removed.keys() {
            tracked_files.remove(name);
        }

        tracked_files
    }
}
