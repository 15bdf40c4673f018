use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};

pub type ChangeSet = BTreeMap<String, WorkspaceChangeType>;
pub type FileSet = BTreeSet<String>;

/// Everything `status` reports, each section sorted by name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) head: BranchName,
    pub(crate) branches: Vec<BranchName>,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

impl StatusInfo {
    /// No staged changes and no tracked file differing from its working copy
    pub fn is_clean(&self) -> bool {
        self.staged_files.is_empty()
            && self.removed_files.is_empty()
            && self.workspace_changeset.is_empty()
    }
}

#[derive(new)]
pub struct Status<'r> {
    repository: &'r Repository,
}

impl<'r> Status<'r> {
    pub fn initialize(&self) -> anyhow::Result<StatusInfo> {
        let head_commit = self.repository.head_commit()?;
        let head_files = head_commit.tracked_files();
        let index = self.repository.index();
        let inspector = Inspector::new(self.repository.workspace(), head_files, index);

        let mut workspace_changeset = ChangeSet::new();
        for (name, staged_oid) in index.staged() {
            if let Some(change) = inspector.check_staged_against_workspace(name, staged_oid)? {
                workspace_changeset.insert(name.clone(), change);
            }
        }
        for (name, head_oid) in head_files {
            if let Some(change) = inspector.check_head_against_workspace(name, head_oid)? {
                workspace_changeset.insert(name.clone(), change);
            }
        }

        let untracked_files = self
            .repository
            .workspace()
            .list_files()?
            .into_iter()
            .filter(|name| inspector.is_untracked(name))
            .collect::<FileSet>();

        Ok(StatusInfo {
            head: self.repository.refs().head().clone(),
            branches: self
                .repository
                .refs()
                .branches()
                .map(|(name, _)| name.clone())
                .collect(),
            staged_files: index.staged().map(|(name, _)| name.clone()).collect(),
            removed_files: index.removed().cloned().collect(),
            workspace_changeset,
            untracked_files,
        })
    }
}
