//! Configuration management for descgen

pub mod config;
pub mod generation;
pub mod source;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use config::Config;
pub use generation::GenerationConfig;
pub use source::*;
