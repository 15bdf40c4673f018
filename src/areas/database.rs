use crate::artifacts::log::history::{AllCommits, FirstParentHistory};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::errors::{GitletError, NotFound};
use anyhow::Context;
use bytes::Bytes;
use fake::rand;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Content-addressed object store
///
/// Blobs and commits live in two separate directories, so an ID can never name
/// objects of both kinds. Objects are written once and never touched again.
#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn namespace_path(&self, object_type: ObjectType) -> PathBuf {
        self.path.join(object_type.namespace())
    }

    /// Create the namespace directories
    pub fn create_layout(&self) -> anyhow::Result<()> {
        for object_type in [ObjectType::Blob, ObjectType::Commit] {
            let namespace_path = self.namespace_path(object_type);
            std::fs::create_dir_all(&namespace_path).with_context(|| {
                format!(
                    "Unable to create object directory {}",
                    namespace_path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn store_blob(&self, blob: &Blob) -> anyhow::Result<ObjectId> {
        self.store(blob)
    }

    pub fn store_commit(&self, commit: &Commit) -> anyhow::Result<ObjectId> {
        self.store(commit)
    }

    /// Persist an object under its content hash
    ///
    /// Storing content that is already present only costs the hash computation.
    pub fn store(&self, object: &impl Object) -> anyhow::Result<ObjectId> {
        let object_type = object.object_type();
        let object_id = object.object_id()?;
        let object_path = self.object_path(object_type, &object_id);

        if object_path.exists() {
            tracing::trace!(%object_id, %object_type, "object already stored");
            return Ok(object_id);
        }

        let object_content = object.serialize()?;
        let object_content = if object_type.is_compressed() {
            Self::compress(object_content)?
        } else {
            object_content
        };

        self.write_object(object_path, object_content)?;
        tracing::debug!(%object_id, %object_type, "stored object");

        Ok(object_id)
    }

    pub fn load_blob(&self, object_id: &ObjectId) -> anyhow::Result<Blob> {
        let content = self.read_object(ObjectType::Blob, object_id)?;

        Blob::deserialize(Cursor::new(content))
    }

    /// Load a commit, checking that its content still hashes to its name
    pub fn load_commit(&self, object_id: &ObjectId) -> anyhow::Result<Commit> {
        let content = self.read_object(ObjectType::Commit, object_id)?;
        let mut reader = Cursor::new(Self::decompress(content)?);

        let object_type = ObjectType::parse_object_type(&mut reader)?;
        if object_type != ObjectType::Commit {
            anyhow::bail!("Object {} is a {}, not a commit", object_id, object_type);
        }

        let commit = Commit::deserialize(reader)
            .with_context(|| format!("Corrupted commit object {}", object_id))?;
        if commit.oid() != object_id {
            anyhow::bail!(
                "Corrupted commit object {}: content hashes to {}",
                object_id,
                commit.oid()
            );
        }

        Ok(commit)
    }

    pub fn contains(&self, object_type: ObjectType, object_id: &ObjectId) -> bool {
        self.object_path(object_type, object_id).is_file()
    }

    /// Every stored commit ID, read lazily from the commit directory
    pub fn commit_ids(&self) -> anyhow::Result<impl Iterator<Item = anyhow::Result<ObjectId>>> {
        let commits_path = self.namespace_path(ObjectType::Commit);
        let entries = std::fs::read_dir(&commits_path).with_context(|| {
            format!(
                "Unable to read commit directory {}",
                commits_path.display()
            )
        })?;

        Ok(entries.filter_map(|entry| match entry {
            Ok(entry) => {
                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy();

                // skip leftovers of interrupted writes
                if file_name.len() != OBJECT_ID_LENGTH {
                    return None;
                }
                Some(ObjectId::try_parse(file_name.to_string()))
            }
            Err(err) => Some(Err(err.into())),
        }))
    }

    /// Every stored commit, in no particular order
    pub fn all_commits(&self) -> anyhow::Result<AllCommits<'_>> {
        Ok(AllCommits::new(self, Box::new(self.commit_ids()?)))
    }

    /// Commits reachable from `start` along primary parents, ending at the root
    pub fn first_parent_history(&self, start: ObjectId) -> FirstParentHistory<'_> {
        FirstParentHistory::new(self, Some(start))
    }

    /// Resolve a full or abbreviated commit ID
    ///
    /// Succeeds only when exactly one stored commit starts with `prefix`.
    ///
    /// # Errors
    ///
    /// * `NotFound::Commit` - no commit matches, or the prefix is not hexadecimal
    /// * `GitletError::AmbiguousPrefix` - several commits match
    pub fn resolve_commit_prefix(&self, prefix: &str) -> anyhow::Result<ObjectId> {
        let not_found = || GitletError::from(NotFound::Commit(prefix.to_string()));

        if prefix.is_empty()
            || prefix.len() > OBJECT_ID_LENGTH
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(not_found().into());
        }

        if prefix.len() == OBJECT_ID_LENGTH {
            let object_id = ObjectId::try_parse(prefix.to_string())?;
            return if self.contains(ObjectType::Commit, &object_id) {
                Ok(object_id)
            } else {
                Err(not_found().into())
            };
        }

        let mut matches = self
            .commit_ids()?
            .filter(|object_id| match object_id {
                Ok(object_id) => object_id.starts_with(prefix),
                Err(_) => true,
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        match matches.len() {
            0 => Err(not_found().into()),
            1 => Ok(matches.remove(0)),
            _ => {
                matches.sort();
                Err(GitletError::AmbiguousPrefix {
                    prefix: prefix.to_string(),
                    candidates: matches,
                }
                .into())
            }
        }
    }

    fn object_path(&self, object_type: ObjectType, object_id: &ObjectId) -> PathBuf {
        self.namespace_path(object_type).join(object_id.as_ref())
    }

    fn read_object(&self, object_type: ObjectType, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        let object_path = self.object_path(object_type, object_id);

        match std::fs::read(&object_path) {
            Ok(content) => Ok(content.into()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(GitletError::from(NotFound::Object(object_id.clone())).into())
            }
            Err(err) => Err(err).with_context(|| {
                format!("Unable to read object file {}", object_path.display())
            }),
        }
    }

    fn write_object(&self, object_path: PathBuf, object_content: Bytes) -> anyhow::Result<()> {
        let object_dir = object_path
            .parent()
            .context(format!("Invalid object path {}", object_path.display()))?;
        let temp_object_path = object_dir.join(Self::generate_temp_name());

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .context(format!(
                "Unable to open object file {}",
                temp_object_path.display()
            ))?;

        file.write_all(&object_content).context(format!(
            "Unable to write object file {}",
            temp_object_path.display()
        ))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, &object_path).context(format!(
            "Unable to rename object file to {}",
            object_path.display()
        ))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
