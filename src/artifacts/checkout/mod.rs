//! Moving the working tree between commits
//!
//! Checkouts are planned as a `Migration` and checked for untracked files in the
//! way before anything on disk changes.

pub mod migration;
