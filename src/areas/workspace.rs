use crate::artifacts::objects::blob::Blob;
use anyhow::Context;
use bytes::Bytes;
use std::io::Write;
use crate::errors::{GitletError, UsageError};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding the repository itself, never part of the working tree
pub const GITLET_DIR: &str = ".gitlet";

const IGNORED_PATHS: [&str; 3] = [GITLET_DIR, ".", ".."];

/// The working directory
///
/// Files are addressed by their path relative to the root, with `/` separators.
#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    /// Every regular file below the root, sorted by name
    pub fn list_files(&self) -> anyhow::Result<Vec<String>> {
        let mut files = WalkDir::new(&self.path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.path(), &self.path))
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| self.relative_name(entry.path()))
            .collect::<Vec<_>>();
        files.sort();

        Ok(files)
    }

    fn is_ignored(path: &Path, root: &Path) -> bool {
        let Ok(relative) = path.strip_prefix(root) else {
            return false;
        };

        relative.components().any(|component| {
            if let std::path::Component::Normal(name) = component {
                let name_str = name.to_string_lossy();
                IGNORED_PATHS.contains(&name_str.as_ref())
            } else {
                false
            }
        })
    }

    fn relative_name(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path.as_ref()).ok()?;

        Some(
            relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
        )
    }

    /// Normalize a user-supplied filename: `./a.txt` and `a.txt` name the same file
    ///
    /// Names leaving the working tree (`..`, absolute paths) or pointing into the
    /// repository directory are rejected.
    pub fn normalize_name(name: &str) -> anyhow::Result<String> {
        let invalid = || GitletError::from(UsageError::InvalidFileName(name.to_string()));

        let mut parts = Vec::new();
        for component in Path::new(name).components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => parts.push(part.to_string_lossy()),
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(invalid().into());
                }
            }
        }

        if parts.is_empty() || parts[0] == GITLET_DIR {
            return Err(invalid().into());
        }

        Ok(parts.join("/"))
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.file_path(name).is_file()
    }

    pub fn read_file(&self, name: &str) -> anyhow::Result<Bytes> {
        let file_path = self.file_path(name);

        let content = std::fs::read(&file_path)
            .with_context(|| format!("Unable to read file {}", file_path.display()))?;

        Ok(content.into())
    }

    pub fn parse_blob(&self, name: &str) -> anyhow::Result<Blob> {
        Ok(Blob::new(self.read_file(name)?))
    }

    /// Write `content` to `name`, creating parent directories as needed
    pub fn write_file(&self, name: &str, content: &[u8]) -> anyhow::Result<()> {
        let file_path = self.file_path(name);

        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&file_path)
            .with_context(|| format!("Failed to open file: {:?}", file_path))?;

        file.write_all(content)
            .with_context(|| format!("Failed to write to file: {:?}", file_path))?;

        Ok(())
    }

    /// Delete `name` if it exists, then any directories left empty above it
    pub fn remove_file(&self, name: &str) -> anyhow::Result<()> {
        let file_path = self.file_path(name);

        if file_path.is_file() {
            std::fs::remove_file(&file_path)
                .with_context(|| format!("Failed to remove file: {:?}", file_path))?;
        }

        let mut dir = file_path.parent();
        while let Some(dir_path) = dir {
            if dir_path == self.path.as_ref() || !dir_path.starts_with(&self.path) {
                break;
            }
            // stop at the first directory that still has content
            if std::fs::remove_dir(dir_path).is_err() {
                break;
            }
            dir = dir_path.parent();
        }

        Ok(())
    }
}
