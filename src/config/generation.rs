//! Generation run settings

use serde::{Deserialize, Serialize};

/// Generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Whether to stop at the first file that cannot be introspected
    pub fail_fast: bool,
}
