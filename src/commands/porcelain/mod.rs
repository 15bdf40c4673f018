//! User-facing commands
//!
//! Each module adds one command to `Repository`. Mutating commands finish with a
//! single `save`; read-only ones (`log`, `global-log`, `find`, `status`,
//! `checkout -- <file>`) never persist anything.

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod find;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
