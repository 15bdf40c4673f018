//! Branch pointers and the head branch
//!
//! A branch is a name pointing at a commit. Exactly one branch is the head: new
//! commits advance it and `log`, `status` and `merge` start from it.
//!
//! Refs live inside the repository snapshot and are persisted together with the
//! staging index, so they never touch the disk on their own.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, NotFound, StateConflict};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refs {
    /// Name of the checked-out branch
    head: BranchName,
    /// Every branch, ordered by name
    branches: BTreeMap<BranchName, ObjectId>,
}

impl Refs {
    pub fn head(&self) -> &BranchName {
        &self.head
    }

    /// Commit the head branch points at
    pub fn head_oid(&self) -> anyhow::Result<&ObjectId> {
        self.branches.get(&self.head).ok_or_else(|| {
            anyhow::anyhow!("head branch {} does not point at any commit", self.head)
        })
    }

    /// Make `branch` the head branch; it must already exist
    pub fn set_head(&mut self, branch: &BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(branch) {
            return Err(GitletError::from(NotFound::NoSuchBranch(branch.to_string())).into());
        }

        self.head = branch.clone();
        Ok(())
    }

    pub fn get(&self, branch: &str) -> Option<&ObjectId> {
        self.branches.get(branch)
    }

    pub fn contains(&self, branch: &str) -> bool {
        self.branches.contains_key(branch)
    }

    /// Point `branch` at `oid`, creating the branch if needed
    pub fn set_pointer(&mut self, branch: BranchName, oid: ObjectId) {
        tracing::debug!(%branch, %oid, "moving branch pointer");
        self.branches.insert(branch, oid);
    }

    /// Advance the head branch to `oid`
    pub fn update_head(&mut self, oid: ObjectId) {
        self.set_pointer(self.head.clone(), oid);
    }

    /// Create a new branch
    ///
    /// # Errors
    ///
    /// `StateConflict::BranchExists` when the name is taken
    pub fn add(&mut self, branch: BranchName, oid: ObjectId) -> anyhow::Result<()> {
        if self.branches.contains_key(&branch) {
            return Err(GitletError::from(StateConflict::BranchExists(branch.to_string())).into());
        }

        self.set_pointer(branch, oid);
        Ok(())
    }

    /// Delete a branch pointer; the commits it pointed at stay in the store
    ///
    /// # Errors
    ///
    /// `NotFound::BranchDoesNotExist` when there is no such branch
    pub fn remove(&mut self, branch: &str) -> anyhow::Result<ObjectId> {
        self.branches.remove(branch).ok_or_else(|| {
            GitletError::from(NotFound::BranchDoesNotExist(branch.to_string())).into()
        })
    }

    pub fn branches(&self) -> impl Iterator<Item = (&BranchName, &ObjectId)> {
        self.branches.iter()
    }

    pub fn is_head(&self, branch: &str) -> bool {
        self.head.as_ref() == branch
    }
}
