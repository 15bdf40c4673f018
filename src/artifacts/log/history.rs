use crate::areas::database::Database;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;

/// Walk along primary parents, newest first, ending with the root commit
///
/// Commits are loaded one at a time as the iterator advances. A commit that
/// cannot be loaded is yielded as an error and ends the walk.
pub struct FirstParentHistory<'d> {
    database: &'d Database,
    next_oid: Option<ObjectId>,
}

impl<'d> FirstParentHistory<'d> {
    pub fn new(database: &'d Database, start: Option<ObjectId>) -> Self {
        Self {
            database,
            next_oid: start,
        }
    }
}

impl Iterator for FirstParentHistory<'_> {
    type Item = anyhow::Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.next_oid.take()?;

        match self.database.load_commit(&commit_oid) {
            Ok(commit) => {
                // move to the primary parent for the next iteration
                self.next_oid = commit.parent().cloned();
                Some(Ok(commit))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

/// Every stored commit, in directory order
pub struct AllCommits<'d> {
    database: &'d Database,
    commit_ids: Box<dyn Iterator<Item = anyhow::Result<ObjectId>> + 'd>,
}

impl<'d> AllCommits<'d> {
    pub fn new(
        database: &'d Database,
        commit_ids: Box<dyn Iterator<Item = anyhow::Result<ObjectId>> + 'd>,
    ) -> Self {
        Self {
            database,
            commit_ids,
        }
    }
}

impl Iterator for AllCommits<'_> {
    type Item = anyhow::Result<Commit>;

    fn next(&mut self) -> Option<Self::Item> {
        let commit_oid = self.commit_ids.next()?;

        Some(commit_oid.and_then(|commit_oid| self.database.load_commit(&commit_oid)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::commit::TrackedFiles;
    use assert_fs::TempDir;
    use chrono::DateTime;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_parent_history_skips_secondary_parents() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let database = Database::new(dir.path().join(".gitlet").into_boxed_path());
        database.create_layout()?;
        let timestamp = DateTime::parse_from_rfc3339("2023-01-01T12:00:00+00:00")?;

        let root = Commit::root();
        let main = Commit::new(
            "main".to_string(),
            root.oid().clone(),
            TrackedFiles::new(),
            timestamp,
        );
        let side = Commit::new(
            "side".to_string(),
            root.oid().clone(),
            TrackedFiles::new(),
            timestamp,
        );
        let merge = Commit::new_merge(
            "Merged side into master.".to_string(),
            main.oid().clone(),
            side.oid().clone(),
            TrackedFiles::new(),
            timestamp,
        )?;
        for commit in [&root, &main, &side, &merge] {
            database.store_commit(commit)?;
        }

        let messages = database
            .first_parent_history(merge.oid().clone())
            .map(|commit| commit.map(|commit| commit.message().to_string()))
            .collect::<anyhow::Result<Vec<_>>>()?;

        assert_eq!(
            messages,
            vec!["Merged side into master.", "main", "initial commit"]
        );
        Ok(())
    }

    #[test]
    fn missing_commit_ends_the_walk_with_an_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let database = Database::new(dir.path().join(".gitlet").into_boxed_path());
        database.create_layout()?;

        let mut history = database.first_parent_history(ObjectId::from_content(b"missing"));

        assert!(matches!(history.next(), Some(Err(_))));
        assert!(history.next().is_none());
        Ok(())
    }
}
