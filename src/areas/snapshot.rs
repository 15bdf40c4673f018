//! Persisted repository state
//!
//! The mutable half of a repository (branches, head branch, staging index) is a
//! single JSON document. It is read once when a command starts and replaced in one
//! rename when the command succeeds, so a failed command never leaves a partial
//! update behind.

use crate::areas::index::Index;
use crate::areas::refs::Refs;
use anyhow::Context;
use fake::rand;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Name of the snapshot file inside `.gitlet`
pub const SNAPSHOT_FILE: &str = "repository";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(flatten)]
    pub refs: Refs,
    #[serde(flatten)]
    pub index: Index,
}

impl Snapshot {
    /// Read the snapshot at `path`, or an empty one when none was written yet
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read(path)
            .with_context(|| format!("Unable to read repository state {}", path.display()))?;

        serde_json::from_slice(&content)
            .with_context(|| format!("Corrupted repository state {}", path.display()))
    }

    /// Atomically replace the snapshot at `path`
    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_vec_pretty(self).context("Unable to serialize repository state")?;

        let state_dir = path
            .parent()
            .context(format!("Invalid repository state path {}", path.display()))?;
        let temp_path = state_dir.join(format!("tmp-state-{}", rand::random::<u32>()));

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .with_context(|| format!("Unable to open {}", temp_path.display()))?;
        file.write_all(&content)
            .with_context(|| format!("Unable to write {}", temp_path.display()))?;
        file.sync_all()
            .with_context(|| format!("Unable to flush {}", temp_path.display()))?;

        std::fs::rename(&temp_path, path)
            .with_context(|| format!("Unable to replace repository state {}", path.display()))?;

        tracing::debug!(path = %path.display(), "saved repository state");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::branch::branch_name::BranchName;
    use crate::artifacts::objects::object_id::ObjectId;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_reads_as_empty_state() -> anyhow::Result<()> {
        let dir = TempDir::new()?;

        let snapshot = Snapshot::read(&dir.path().join(SNAPSHOT_FILE))?;

        assert_eq!(snapshot, Snapshot::default());
        assert_eq!(snapshot.refs.head().as_ref(), "master");
        Ok(())
    }

    #[test]
    fn written_state_reads_back() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(SNAPSHOT_FILE);

        let mut snapshot = Snapshot::default();
        snapshot.refs.set_pointer(
            BranchName::try_parse("master".to_string())?,
            ObjectId::from_content(b"root"),
        );
        snapshot
            .index
            .stage_add("a.txt", ObjectId::from_content(b"a"), None);
        snapshot
            .index
            .stage_remove("b.txt", ObjectId::from_content(b"b"));
        snapshot.write(&path)?;

        assert_eq!(Snapshot::read(&path)?, snapshot);
        // no temp files left behind
        assert_eq!(std::fs::read_dir(dir.path())?.count(), 1);
        Ok(())
    }

    #[test]
    fn state_is_a_flat_json_document() -> anyhow::Result<()> {
        let mut snapshot = Snapshot::default();
        snapshot.refs.set_pointer(
            BranchName::try_parse("master".to_string())?,
            ObjectId::from_content(b"root"),
        );

        let json = serde_json::to_value(&snapshot)?;

        assert_eq!(json["head"], "master");
        assert_eq!(
            json["branches"]["master"],
            ObjectId::from_content(b"root").to_string()
        );
        assert!(json["staged"].as_object().is_some_and(|staged| staged.is_empty()));
        assert!(json["removed"].as_object().is_some_and(|removed| removed.is_empty()));
        Ok(())
    }

    #[test]
    fn corrupted_state_is_an_error() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join(SNAPSHOT_FILE);
        std::fs::write(&path, "not json")?;

        assert!(Snapshot::read(&path).is_err());
        Ok(())
    }
}
