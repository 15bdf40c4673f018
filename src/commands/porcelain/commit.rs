use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, timestamp_from_env};
use crate::errors::{GitletError, StateConflict, UsageError};

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        if message.is_empty() {
            return Err(GitletError::from(UsageError::EmptyCommitMessage).into());
        }
        if self.index().is_empty() {
            return Err(GitletError::from(StateConflict::NothingToCommit).into());
        }

        let parent = self.head_commit()?;
        let tracked_files = self.index().apply_to(parent.tracked_files().clone());
        let timestamp = timestamp_from_env()?;

        let commit = Commit::new(
            message.to_string(),
            parent.oid().clone(),
            tracked_files,
            timestamp,
        );
        let commit_id = self.database().store_commit(&commit)?;

        self.refs_mut().update_head(commit_id);
        self.index_mut().clear();

        self.save()
    }
}
