use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Load environment variables from .env files.
///
/// Priority order (highest to lowest):
/// 1. Variables already set in the environment
/// 2. Current directory .env
/// 3. ~/.docketload/.env
///
/// Runs before tracing is initialised (clap reads `DB_*` at parse time), so
/// it returns the files it loaded instead of logging them.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded_from = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded_from.push(path);
    }

    if let Some(env_file) = config_dir().map(|dir| dir.join(".env")) {
        // dotenvy doesn't overwrite existing vars
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded_from.push(env_file);
        }
    }

    loaded_from
}

/// Get the docketload config directory path (~/.docketload)
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".docketload"))
}

// ============================================================================
// TOML Configuration
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct DocketloadConfig {
    #[serde(default)]
    pub inputs: InputsConfig,

    #[serde(default)]
    pub load: LoadConfig,
}

/// Source locations. Per-table paths win over `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct InputsConfig {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default)]
    pub cases: Option<PathBuf>,

    #[serde(default)]
    pub billable_hours: Option<PathBuf>,

    #[serde(default)]
    pub tasks: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoadConfig {
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            show_progress: default_show_progress(),
        }
    }
}

fn default_show_progress() -> bool {
    true
}

impl DocketloadConfig {
    /// Load config from TOML files
    ///
    /// Priority order (highest to lowest):
    /// 1. ./docketload.toml (project-specific)
    /// 2. ~/.docketload/config.toml (user defaults)
    /// 3. Built-in defaults
    pub fn load() -> Self {
        let mut config = DocketloadConfig::default();

        if let Some(global) = config_dir().map(|d| d.join("config.toml")) {
            if let Some(global) = Self::read_file(&global) {
                config = global;
            }
        }

        if let Some(local) = Self::read_file(Path::new("docketload.toml")) {
            config = Self::merge(config, local);
        }

        config
    }

    fn read_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<DocketloadConfig>(&contents) {
                Ok(config) => {
                    debug!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge two configs (right overrides left, field by field for inputs)
    fn merge(mut base: Self, overlay: Self) -> Self {
        let inputs = overlay.inputs;
        base.inputs.data_dir = inputs.data_dir.or(base.inputs.data_dir);
        base.inputs.cases = inputs.cases.or(base.inputs.cases);
        base.inputs.billable_hours = inputs.billable_hours.or(base.inputs.billable_hours);
        base.inputs.tasks = inputs.tasks.or(base.inputs.tasks);
        base.load = overlay.load;
        base
    }
}
