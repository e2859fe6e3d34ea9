//! Configuration for opening the report store.

use serde::{Deserialize, Serialize};

/// Configuration for opening the fleet store.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Storage backend configuration.
    pub storage: StorageConfig,
}

/// Storage backend selection.
///
/// Defaults to a file-backed store at `fleet.db`. The in-memory backend is
/// useful for tests and throwaway deployments; its contents are lost on
/// shutdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum StorageConfig {
    InMemory,
    File(FileStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::File(FileStorageConfig::default())
    }
}

/// File-backed storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileStorageConfig {
    /// Path to the JSON-lines data file. Created on first insert if absent.
    pub path: String,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            path: "fleet.db".to_string(),
        }
    }
}
