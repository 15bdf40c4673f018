//! Merge engine
//!
//! - `split_point`: where the two histories diverged
//! - `three_way`: per-file reconciliation against the split point
//! - `conflict`: marker rendering for files changed on both sides

pub mod conflict;
pub mod split_point;
pub mod three_way;
