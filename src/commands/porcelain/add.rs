use crate::areas::repository::Repository;
use crate::areas::workspace::Workspace;
use crate::errors::{GitletError, NotFound};

impl Repository {
    pub fn add(&mut self, file: &str) -> anyhow::Result<()> {
        let name = Workspace::normalize_name(file)?;

        if !self.workspace().exists(&name) {
            return Err(GitletError::from(NotFound::File(name)).into());
        }

        let blob = self.workspace().parse_blob(&name)?;
        let blob_id = self.database().store_blob(&blob)?;

        let head_commit = self.head_commit()?;
        self.index_mut()
            .stage_add(&name, blob_id, head_commit.tracked_oid(&name));

        self.save()
    }
}
