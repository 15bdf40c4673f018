//! Core repository components
//!
//! - `database`: Content-addressed store for blobs and commits
//! - `index`: Staging area (pending additions and removals)
//! - `refs`: Branch pointers and the head branch
//! - `repository`: High-level repository operations and coordination
//! - `snapshot`: Persisted mutable state (refs + index)
//! - `workspace`: Working directory file system operations

pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod snapshot;
pub mod workspace;
