//! Commit history traversal
//!
//! - `history`: lazy walks over the commit graph (first-parent chain, every stored commit)

pub mod history;
