//! gitlet: a small local version-control system
//!
//! - `areas`: object store, refs, staging index, working directory and the
//!   repository that ties them together
//! - `artifacts`: objects, history traversal, merge engine, status inspection
//! - `commands`: one module per user command
//! - `errors`: the failures a user can provoke

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
