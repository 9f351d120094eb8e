use crate::error::{Result, SpendsortError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

pub const DEFAULT_USER: &str = "default";

/// Optional user settings read from `spendsort.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub default_user: Option<String>,
}

impl Settings {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SpendsortError::Config(format!("Failed to parse settings: {}", e)))
    }
}

pub struct Config {
    pub db_path: PathBuf,
    pub config_path: Option<PathBuf>,
    pub settings: Settings,
}

impl Config {
    pub fn new(db_override: Option<PathBuf>) -> Result<Self> {
        let db_path = if let Some(path) = db_override {
            path
        } else if let Ok(env_path) = std::env::var("SPENDSORT_DB") {
            PathBuf::from(env_path)
        } else {
            let xdg = BaseDirectories::with_prefix("spendsort").map_err(|e| {
                SpendsortError::Config(format!("Failed to initialize XDG directories: {}", e))
            })?;
            xdg.place_data_file("spendsort.db").map_err(|e| {
                SpendsortError::Config(format!("Failed to create data directory: {}", e))
            })?
        };

        let config_path = BaseDirectories::with_prefix("spendsort")
            .ok()
            .and_then(|xdg| xdg.find_config_file("spendsort.toml"));

        let settings = match &config_path {
            Some(path) => Settings::from_file(path)?,
            None => Settings::default(),
        };

        Ok(Self {
            db_path,
            config_path,
            settings,
        })
    }

    pub fn ensure_db_directory(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// The user whose data commands act on.
    pub fn resolve_user(&self, cli_user: Option<&str>) -> Result<String> {
        let env_user = std::env::var("SPENDSORT_USER").ok();
        pick_user(cli_user, env_user.as_deref(), &self.settings)
    }
}

/// `--user`, then `SPENDSORT_USER`, then the settings file, then [`DEFAULT_USER`].
pub fn pick_user(cli_user: Option<&str>, env_user: Option<&str>, settings: &Settings) -> Result<String> {
    let user = cli_user
        .or(env_user)
        .or(settings.default_user.as_deref())
        .unwrap_or(DEFAULT_USER)
        .trim();

    if user.is_empty() {
        return Err(SpendsortError::Config("user name must not be empty".to_string()));
    }
    Ok(user.to_string())
}
