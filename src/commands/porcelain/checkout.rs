use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::Commit;
use crate::errors::{GitletError, NotFound, StateConflict, UsageError};

impl Repository {
    /// Dispatch on the operand shape:
    ///
    /// * `checkout -- <file>`: restore `file` from the head commit
    /// * `checkout <commit> -- <file>`: restore `file` from `commit` (ids may be abbreviated)
    /// * `checkout <branch>`: switch to `branch`
    pub fn checkout(&mut self, target: Option<&str>, file: Option<&str>) -> anyhow::Result<()> {
        match (target, file) {
            (None, Some(file)) => self.checkout_file(None, file),
            (Some(commit), Some(file)) => self.checkout_file(Some(commit), file),
            (Some(branch), None) => self.checkout_branch(branch),
            (None, None) => Err(GitletError::from(UsageError::IncorrectOperands).into()),
        }
    }

    /// Overwrite the working copy of `file` with its version in a commit
    ///
    /// The staging index is left alone, and so is the persisted state.
    pub fn checkout_file(&mut self, commit: Option<&str>, file: &str) -> anyhow::Result<()> {
        let name = Workspace::normalize_name(file)?;

        let commit = match commit {
            Some(prefix) => {
                let commit_oid = self.database().resolve_commit_prefix(prefix)?;
                self.database().load_commit(&commit_oid)?
            }
            None => self.head_commit()?,
        };

        let blob_oid = commit
            .tracked_oid(&name)
            .ok_or_else(|| GitletError::from(NotFound::FileInCommit(name.clone())))?;
        let blob = self.database().load_blob(blob_oid)?;

        self.workspace().write_file(&name, blob.content())
    }

    pub fn checkout_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        let target_oid = self
            .refs()
            .get(branch)
            .cloned()
            .ok_or_else(|| GitletError::from(NotFound::NoSuchBranch(branch.to_string())))?;
        if self.refs().is_head(branch) {
            return Err(GitletError::from(StateConflict::CheckoutCurrentBranch).into());
        }

        let target = self.database().load_commit(&target_oid)?;
        self.check_out_commit(&target)?;

        let branch = BranchName::try_parse(branch.to_string())?;
        self.refs_mut().set_head(&branch)?;

        self.save()
    }

    /// Make the working tree match `target` and clear the staging index
    ///
    /// Fails before touching any file when an untracked file would be overwritten.
    pub(crate) fn check_out_commit(&mut self, target: &Commit) -> anyhow::Result<()> {
        let head = self.head_commit()?;

        let migration = Migration::between(head.tracked_files(), target.tracked_files());
        migration.ensure_no_untracked_in_the_way(
            self.workspace(),
            head.tracked_files(),
            self.index(),
        )?;
        migration.apply(self.database(), self.workspace())?;

        self.index_mut().clear();
        tracing::debug!(from = %head.oid(), to = %target.oid(), "checked out commit");

        Ok(())
    }
}
