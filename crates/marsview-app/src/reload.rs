//! Re-reads `config.ron` when the window regains focus.

use std::path::PathBuf;

use marsview_config::Config;
use tracing::{info, warn};

/// Tracks the last config read from disk, before CLI overrides.
pub struct ConfigWatch {
    dir: PathBuf,
    on_disk: Config,
}

impl ConfigWatch {
    pub fn new(dir: PathBuf, on_disk: Config) -> Self {
        Self { dir, on_disk }
    }

    /// Returns the new file contents if they differ from the last read.
    ///
    /// A file that fails to read or parse is logged and ignored; the
    /// running config stays in effect.
    pub fn poll(&mut self) -> Option<Config> {
        match self.on_disk.reload(&self.dir) {
            Ok(Some(config)) => {
                info!("Config file changed: {}", self.dir.display());
                self.on_disk = config.clone();
                Some(config)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Ignoring config reload from {}: {e}", self.dir.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_returns_changed_config_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        let mut watch = ConfigWatch::new(dir.path().to_path_buf(), config.clone());
        assert!(watch.poll().is_none());

        let mut edited = config;
        edited.camera.zoom_scale = 0.05;
        edited.save(dir.path()).unwrap();
        assert_eq!(watch.poll().unwrap().camera.zoom_scale, 0.05);
        assert!(watch.poll().is_none());
    }

    #[test]
    fn test_poll_ignores_broken_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.ron"), "{{not valid}}").unwrap();
        let mut watch = ConfigWatch::new(dir.path().to_path_buf(), Config::default());
        assert!(watch.poll().is_none());
    }
}
