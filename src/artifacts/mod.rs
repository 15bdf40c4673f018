//! Data structures and algorithms
//!
//! - `branch`: Branch names
//! - `checkout`: Planning and applying working tree changes
//! - `core`: Shared utilities (pager wrapper)
//! - `log`: Commit history traversal
//! - `merge`: Split point search and three-way reconciliation
//! - `objects`: Object types (blob, commit)
//! - `status`: Working tree status inspection

pub mod branch;
pub mod checkout;
pub mod core;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
