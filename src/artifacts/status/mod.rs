//! Working tree status inspection
//!
//! - `file_change`: how a working copy differs from what gitlet recorded
//! - `inspector`: per-file comparisons against the head commit and the index
//! - `status_info`: the collected report printed by `status`

pub mod file_change;
pub mod inspector;
pub mod status_info;
