use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::TrackedFiles;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;

/// Compares working copies against the head commit and the staging index
#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
    head_files: &'r TrackedFiles,
    index: &'r Index,
}

impl<'r> Inspector<'r> {
    /// Not staged for addition, and either unknown to the head commit or staged
    /// for removal
    pub fn is_untracked(&self, name: &str) -> bool {
        let tracked =
            self.head_files.contains_key(name) && !self.index.is_marked_for_removal(name);

        !tracked && !self.index.is_staged(name)
    }

    fn is_content_changed(&self, name: &str, oid: &ObjectId) -> anyhow::Result<bool> {
        let blob = self.workspace.parse_blob(name)?;

        Ok(&blob.object_id()? != oid)
    }

    /// Compare a staged file with its working copy
    pub fn check_staged_against_workspace(
        &self,
        name: &str,
        staged_oid: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if !self.workspace.exists(name) {
            if self.index.is_marked_for_removal(name) {
                return Ok(None);
            }
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        if self.is_content_changed(name, staged_oid)? {
            Ok(Some(WorkspaceChangeType::Modified))
        } else {
            Ok(None)
        }
    }

    /// Compare a file tracked by the head commit (and not staged) with its working copy
    pub fn check_head_against_workspace(
        &self,
        name: &str,
        head_oid: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        if self.index.is_staged(name) || self.index.is_marked_for_removal(name) {
            return Ok(None);
        }

        if !self.workspace.exists(name) {
            return Ok(Some(WorkspaceChangeType::Deleted));
        }

        if self.is_content_changed(name, head_oid)? {
            Ok(Some(WorkspaceChangeType::Modified))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;

    fn oid(content: &str) -> ObjectId {
        ObjectId::from_content(content.as_bytes())
    }

    #[test]
    fn classifies_working_copies_against_head_and_index() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child("same.txt").write_str("same")?;
        dir.child("edited.txt").write_str("edited")?;
        dir.child("staged.txt").write_str("staged, then edited")?;

        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        let head_files = TrackedFiles::from([
            ("same.txt".to_string(), oid("same")),
            ("edited.txt".to_string(), oid("original")),
            ("missing.txt".to_string(), oid("missing")),
        ]);
        let mut index = Index::default();
        index.stage_add("staged.txt", oid("staged"), None);
        let inspector = Inspector::new(&workspace, &head_files, &index);

        assert_eq!(
            inspector.check_head_against_workspace("same.txt", &oid("same"))?,
            None
        );
        assert_eq!(
            inspector.check_head_against_workspace("edited.txt", &oid("original"))?,
            Some(WorkspaceChangeType::Modified)
        );
        assert_eq!(
            inspector.check_head_against_workspace("missing.txt", &oid("missing"))?,
            Some(WorkspaceChangeType::Deleted)
        );
        assert_eq!(
            inspector.check_staged_against_workspace("staged.txt", &oid("staged"))?,
            Some(WorkspaceChangeType::Modified)
        );
        Ok(())
    }

    #[test]
    fn removed_then_recreated_file_is_untracked() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        dir.child("a.txt").write_str("back")?;

        let workspace = Workspace::new(dir.path().to_path_buf().into_boxed_path());
        let head_files = TrackedFiles::from([("a.txt".to_string(), oid("a"))]);
        let mut index = Index::default();
        index.stage_remove("a.txt", oid("a"));
        index.stage_add("new.txt", oid("new"), None);
        let inspector = Inspector::new(&workspace, &head_files, &index);

        assert!(inspector.is_untracked("a.txt"));
        assert!(inspector.is_untracked("stray.txt"));
        assert!(!inspector.is_untracked("new.txt"));
        assert_eq!(
            inspector.check_head_against_workspace("a.txt", &oid("a"))?,
            None
        );
        Ok(())
    }
}
