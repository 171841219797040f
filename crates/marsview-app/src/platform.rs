//! Resolution of the directories the viewer reads and writes.

use std::path::{Path, PathBuf};

use marsview_config::Config;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("could not determine OS configuration directory")]
    NoConfigDir,

    #[error("failed to create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

const APP_NAME: &str = "marsview";

/// Where `config.ron` and the debug log live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    pub config_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl AppDirs {
    /// Use `config_override` when given, else the OS config directory. Logs go
    /// to the OS local data directory, or beside the config when there is none.
    pub fn resolve(config_override: Option<&Path>) -> Result<Self, PlatformError> {
        let config_dir = match config_override {
            Some(dir) => dir.to_path_buf(),
            None => Config::default_dir().map_err(|_| PlatformError::NoConfigDir)?,
        };
        let log_dir = match (config_override, dirs::data_local_dir()) {
            (None, Some(data)) => data.join(APP_NAME).join("logs"),
            _ => config_dir.join("logs"),
        };
        Ok(Self {
            config_dir,
            log_dir,
        })
    }

    pub fn create(&self) -> Result<(), PlatformError> {
        for dir in [&self.config_dir, &self.log_dir] {
            std::fs::create_dir_all(dir).map_err(|source| PlatformError::Io {
                path: dir.clone(),
                source,
            })?;
        }
        Ok(())
    }
}
