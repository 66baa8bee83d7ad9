//! Board configuration loaded with figment.
//!
//! Sources are merged in precedence order (later sources override earlier ones):
//! 1. Built-in defaults
//! 2. Global files in `~/.vibeflow/` (`config.toml`, `config.yaml`, `config.yml`, `config.json`)
//! 3. Project files in `./.vibeflow/` with the same names
//! 4. `VIBEFLOW_*` environment variables, e.g. `VIBEFLOW_DATA_DIR`

use crate::error::Result;
use crate::seed::{seed_sample_board, should_seed};
use crate::storage::{FileStorage, Persistence, DEFAULT_STORAGE_KEY};
use crate::store::BoardStore;
use figment::{
    providers::{Env, Format, Json, Serialized, Toml, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Directory name used for both the global and the project configuration
pub const CONFIG_DIR_NAME: &str = ".vibeflow";

/// Prefix of environment variables read as configuration
pub const ENV_PREFIX: &str = "VIBEFLOW_";

const CONFIG_FILE_NAMES: [&str; 4] = ["config.toml", "config.yaml", "config.yml", "config.json"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Directory holding the snapshot files
    pub data_dir: PathBuf,
    /// Storage key of the board snapshot
    pub storage_key: String,
    /// Fill an empty board with sample content when it is opened
    pub seed_on_first_run: bool,
    /// Name recorded on activity entries
    pub actor: Option<String>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(CONFIG_DIR_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            seed_on_first_run: false,
            actor: None,
        }
    }
}

impl BoardConfig {
    /// Load configuration from every source
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment())
    }

    /// Extract configuration from a prepared figment
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract()?;
        debug!(
            data_dir = %config.data_dir.display(),
            storage_key = %config.storage_key,
            "loaded board configuration"
        );
        Ok(config)
    }

    /// Build the figment with all sources in precedence order
    pub fn figment() -> Figment {
        let global = dirs::home_dir().map(|home| home.join(CONFIG_DIR_NAME));
        let project = PathBuf::from(CONFIG_DIR_NAME);
        Self::figment_for(global.as_deref(), &project)
    }

    /// Build the figment reading configuration files from explicit directories
    pub fn figment_for(global_dir: Option<&Path>, project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        for dir in global_dir.into_iter().chain(std::iter::once(project_dir)) {
            for path in discover_files(dir) {
                trace!(path = %path.display(), "merging config file");
                figment = match path.extension().and_then(|e| e.to_str()) {
                    Some("toml") => figment.merge(Toml::file(&path)),
                    Some("json") => figment.merge(Json::file(&path)),
                    _ => figment.merge(Yaml::file(&path)),
                };
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// Path of the snapshot file this configuration points at
    pub fn snapshot_path(&self) -> PathBuf {
        FileStorage::new(&self.data_dir).path_for(&self.storage_key)
    }

    /// File-backed persistence for the configured data directory and key
    pub fn persistence(&self) -> Persistence {
        Persistence::new(FileStorage::new(&self.data_dir), self.storage_key.clone())
    }

    /// Open the configured board, seeding it when enabled and the board is empty
    pub fn open_store(&self) -> BoardStore {
        let mut store = BoardStore::open(self.persistence());
        if let Some(actor) = &self.actor {
            store = store.with_actor(actor.clone());
        }
        if self.seed_on_first_run && should_seed(store.state()) {
            seed_sample_board(&mut store);
        }
        store
    }
}

/// Existing config files in `dir`, in merge order
fn discover_files(dir: &Path) -> Vec<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .collect()
}
