use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::errors::{GitletError, StateConflict};

impl Repository {
    pub fn rm(&mut self, file: &str) -> anyhow::Result<()> {
        let name = Workspace::normalize_name(file)?;
        let head_commit = self.head_commit()?;

        let staged = self.index_mut().unstage(&name).is_some();

        match head_commit.tracked_oid(&name) {
            Some(tracked_oid) => {
                self.index_mut().stage_remove(&name, tracked_oid.clone());
                self.workspace().remove_file(&name)?;
            }
            None if staged => {}
            None => {
                return Err(GitletError::from(StateConflict::NoReasonToRemove(name)).into());
            }
        }

        self.save()
    }
}
