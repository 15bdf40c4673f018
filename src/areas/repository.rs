use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::snapshot::{SNAPSHOT_FILE, Snapshot};
use crate::areas::workspace::{GITLET_DIR, Workspace};
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::status::status_info::Status;
use crate::errors::{GitletError, UsageError};
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

/// A working directory together with its `.gitlet` repository
///
/// Loading reads the persisted state once; commands mutate it in memory and end
/// with a single `save`. A command that fails before saving leaves the state on
/// disk untouched.
pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    database: Database,
    workspace: Workspace,
    snapshot: Snapshot,
}

impl Repository {
    /// Open the repository rooted at `path`
    ///
    /// An uninitialized directory yields an empty state, which only `init` accepts.
    pub fn load(path: &Path, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = path.canonicalize()?;

        let database = Database::new(path.join(GITLET_DIR).into_boxed_path());
        let workspace = Workspace::new(path.clone().into_boxed_path());
        let snapshot = Snapshot::read(&path.join(GITLET_DIR).join(SNAPSHOT_FILE))?;

        tracing::debug!(path = %path.display(), "loaded repository");

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            database,
            workspace,
            snapshot,
        })
    }

    /// Persist branches, head and staging index in one atomic replace
    pub fn save(&self) -> anyhow::Result<()> {
        self.snapshot.write(&self.snapshot_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn gitlet_path(&self) -> PathBuf {
        self.path.join(GITLET_DIR)
    }

    fn snapshot_path(&self) -> PathBuf {
        self.gitlet_path().join(SNAPSHOT_FILE)
    }

    pub fn is_initialized(&self) -> bool {
        self.gitlet_path().is_dir()
    }

    pub fn ensure_initialized(&self) -> anyhow::Result<()> {
        if !self.is_initialized() {
            return Err(GitletError::from(UsageError::NotInitialized).into());
        }

        Ok(())
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.snapshot.refs
    }

    pub fn refs_mut(&mut self) -> &mut Refs {
        &mut self.snapshot.refs
    }

    pub fn index(&self) -> &Index {
        &self.snapshot.index
    }

    pub fn index_mut(&mut self) -> &mut Index {
        &mut self.snapshot.index
    }

    pub fn status_report(&'_ self) -> Status<'_> {
        Status::new(self)
    }

    /// The commit the head branch points at
    pub fn head_commit(&self) -> anyhow::Result<Commit> {
        let head_oid = self.refs().head_oid()?;

        self.database.load_commit(head_oid)
    }
}
