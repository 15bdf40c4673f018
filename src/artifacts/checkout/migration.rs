//! Working tree migrations
//!
//! Checking out a branch, resetting to a commit and merging all move the working
//! tree from one set of tracked files to another. The changes are planned first:
//! the plan is checked for untracked files it would clobber, and only a clean plan
//! is applied. A rejected plan leaves the working tree untouched.

use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, StateConflict};
use std::collections::BTreeMap;

/// File system action planned for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Write the blob's content to the file
    Write(ObjectId),
    /// Remove the file
    Delete,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Migration {
    actions: BTreeMap<String, Action>,
}

impl Migration {
    /// Plan the move from `current` to `target`
    ///
    /// Every file of `target` is rewritten, so locally edited copies of tracked
    /// files are replaced too. Files only `current` tracks are deleted.
    pub fn between(current: &TrackedFiles, target: &TrackedFiles) -> Self {
        let mut migration = Self::default();

        for (name, oid) in target {
            migration.record_write(name.clone(), oid.clone());
        }
        for name in current.keys().filter(|name| !target.contains_key(*name)) {
            migration.record_delete(name.clone());
        }

        migration
    }

    pub fn record_write(&mut self, name: String, oid: ObjectId) {
        self.actions.insert(name, Action::Write(oid));
    }

    pub fn record_delete(&mut self, name: String) {
        self.actions.insert(name, Action::Delete);
    }

    pub fn actions(&self) -> &BTreeMap<String, Action> {
        &self.actions
    }

    /// Untracked working files the plan would overwrite or delete
    ///
    /// A file is untracked when it is not staged for addition and the head commit
    /// either does not track it or it is staged for removal.
    pub fn untracked_in_the_way(
        &self,
        workspace: &Workspace,
        head_files: &TrackedFiles,
        index: &Index,
    ) -> Vec<String> {
        self.actions
            .keys()
            .filter(|name| {
                let tracked =
                    head_files.contains_key(*name) && !index.is_marked_for_removal(name);
                !tracked && !index.is_staged(name)
            })
            .filter(|name| workspace.exists(name))
            .cloned()
            .collect()
    }

    /// Refuse the plan when it would clobber untracked files
    pub fn ensure_no_untracked_in_the_way(
        &self,
        workspace: &Workspace,
        head_files: &TrackedFiles,
        index: &Index,
    ) -> anyhow::Result<()> {
        let untracked = self.untracked_in_the_way(workspace, head_files, index);

        if !untracked.is_empty() {
            tracing::debug!(?untracked, "untracked files would be overwritten");
            return Err(GitletError::from(StateConflict::UntrackedFileInTheWay(untracked)).into());
        }

        Ok(())
    }

    /// Deletions first, then writes
    pub fn apply(&self, database: &Database, workspace: &Workspace) -> anyhow::Result<()> {
        for name in self.deletions() {
            workspace.remove_file(name)?;
        }

        for (name, oid) in self.writes() {
            let blob = database.load_blob(oid)?;
            workspace.write_file(name, blob.content())?;
        }

        tracing::debug!(actions = self.actions.len(), "applied working tree migration");
        Ok(())
    }

    fn deletions(&self) -> impl Iterator<Item = &String> {
        self.actions
            .iter()
            .filter(|(_, action)| **action == Action::Delete)
            .map(|(name, _)| name)
    }

    fn writes(&self) -> impl Iterator<Item = (&String, &ObjectId)> {
        self.actions.iter().filter_map(|(name, action)| match action {
            Action::Write(oid) => Some((name, oid)),
            Action::Delete => None,
        })
    }
}
