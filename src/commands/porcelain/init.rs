use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::errors::{GitletError, StateConflict};
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(GitletError::from(StateConflict::AlreadyInitialized).into());
        }

        fs::create_dir_all(self.gitlet_path()).context("Failed to create .gitlet directory")?;
        self.database()
            .create_layout()
            .context("Failed to create the object store")?;

        let root = Commit::root();
        let root_oid = self.database().store_commit(&root)?;

        let default_branch = BranchName::default();
        self.refs_mut().set_pointer(default_branch.clone(), root_oid);
        self.refs_mut().set_head(&default_branch)?;

        self.save()?;
        tracing::info!(path = %self.path().display(), "initialized repository");

        Ok(())
    }
}
