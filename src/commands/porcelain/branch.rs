use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{GitletError, StateConflict};

impl Repository {
    /// Create a branch pointing at the head commit; the head branch stays the same
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let branch_name = BranchName::try_parse(branch_name.to_string())?;
        let head_oid = self.refs().head_oid()?.clone();

        self.refs_mut().add(branch_name, head_oid)?;

        self.save()
    }

    /// Delete a branch pointer; its commits stay in the store
    pub fn rm_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        if self.refs().is_head(branch_name) {
            return Err(GitletError::from(StateConflict::RemoveCurrentBranch).into());
        }

        self.refs_mut().remove(branch_name)?;

        self.save()
    }
}
