use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::converter::ConverterConfig;
use crate::retention::RetentionConfig;
use crate::storage::StorageLayout;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
}

impl Config {
    /// The storage layout described by this configuration.
    pub fn layout(&self) -> StorageLayout {
        StorageLayout::new(&self.storage.root)
    }
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_root")]
    pub root: PathBuf,

    /// Maximum accepted input file size, in bytes.
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_storage_root(),
            max_input_bytes: default_max_input_bytes(),
        }
    }
}

fn default_storage_root() -> PathBuf {
    PathBuf::from("storage")
}

fn default_max_input_bytes() -> u64 {
    crate::validate::DEFAULT_MAX_INPUT_BYTES
}
