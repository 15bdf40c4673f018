//! Command implementations

pub mod porcelain;
