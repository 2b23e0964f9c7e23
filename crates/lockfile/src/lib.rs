//! Lockfile management for reproducible generation runs

pub mod lockfile;
pub mod manager;
pub mod types;

pub use lockfile::Lockfile;
pub use manager::LockfileManager;
pub use types::{hash_string, FileChecksum, SourceEntry};
