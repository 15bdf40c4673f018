use crate::areas::repository::Repository;
use crate::artifacts::merge::split_point::SplitPointFinder;
use crate::artifacts::merge::three_way::ThreeWayMerge;
use crate::artifacts::objects::commit::{Commit, timestamp_from_env};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{GitletError, NotFound, StateConflict};
use std::io::Write;

impl Repository {
    /// Merge the branch `branch_name` into the head branch
    ///
    /// Depending on where the histories split this reports that nothing needs to
    /// happen, fast-forwards the head branch, or records a merge commit (possibly
    /// with conflict markers in some files).
    pub fn merge(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let target_oid = self
            .refs()
            .get(branch_name)
            .cloned()
            .ok_or_else(|| {
                GitletError::from(NotFound::BranchDoesNotExist(branch_name.to_string()))
            })?;
        if !self.status_report().initialize()?.is_clean() {
            return Err(GitletError::from(StateConflict::UncommittedChanges).into());
        }
        if self.refs().is_head(branch_name) {
            return Err(GitletError::from(StateConflict::MergeWithItself).into());
        }

        let head = self.head_commit()?;
        let target = self.database().load_commit(&target_oid)?;
        let split_oid = self.find_split_point(head.oid(), target.oid())?;

        if &split_oid == target.oid() {
            writeln!(
                self.writer(),
                "Given branch is an ancestor of the current branch."
            )?;
            return Ok(());
        }

        if &split_oid == head.oid() {
            self.check_out_commit(&target)?;
            self.refs_mut().update_head(target_oid);
            self.save()?;

            writeln!(self.writer(), "Current branch fast-forwarded.")?;
            return Ok(());
        }

        let split = self.database().load_commit(&split_oid)?;
        self.merge_commits(branch_name, &split, &head, &target)
    }

    fn merge_commits(
        &mut self,
        branch_name: &str,
        split: &Commit,
        head: &Commit,
        target: &Commit,
    ) -> anyhow::Result<()> {
        let result = ThreeWayMerge::new(self.database(), split, head, target).resolve()?;

        result.migration.ensure_no_untracked_in_the_way(
            self.workspace(),
            head.tracked_files(),
            self.index(),
        )?;
        result.store_conflicts(self.database())?;
        result.migration.apply(self.database(), self.workspace())?;

        let message = format!("Merged {} into {}.", branch_name, self.refs().head());
        let merge_commit = Commit::new_merge(
            message,
            head.oid().clone(),
            target.oid().clone(),
            result.tracked_files.clone(),
            timestamp_from_env()?,
        )?;
        let merge_oid = self.database().store_commit(&merge_commit)?;

        self.refs_mut().update_head(merge_oid);
        self.index_mut().clear();
        self.save()?;

        tracing::info!(
            branch = branch_name,
            conflicts = result.conflicts.len(),
            "merged branch"
        );
        if result.has_conflicts() {
            writeln!(self.writer(), "Encountered a merge conflict.")?;
        }

        Ok(())
    }

    fn find_split_point(&self, head: &ObjectId, target: &ObjectId) -> anyhow::Result<ObjectId> {
        let finder = SplitPointFinder::new(|commit_oid: &ObjectId| {
            Ok(self.database().load_commit(commit_oid)?.to_slim())
        });

        finder
            .find_split_point(head, target)?
            .ok_or_else(|| anyhow::anyhow!("commits {head} and {target} share no history"))
    }
}
