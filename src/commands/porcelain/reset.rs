use crate::areas::repository::Repository;

impl Repository {
    /// Check out every file of a commit and move the head branch to it
    pub fn reset(&mut self, commit: &str) -> anyhow::Result<()> {
        let commit_oid = self.database().resolve_commit_prefix(commit)?;
        let target = self.database().load_commit(&commit_oid)?;

        self.check_out_commit(&target)?;
        self.refs_mut().update_head(commit_oid);

        self.save()
    }
}
