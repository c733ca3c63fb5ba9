use std::{fs, path::Path};

use datebook_lib::{Result, fs::config_dir};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::theme::Theme;

pub mod theme;

const FILE_NAME: &str = "gui.toml";

/// The front end's own settings, serialized to TOML.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuiConfig {
    pub theme: Theme,
}

impl GuiConfig {
    /// Load `gui.toml`, falling back to the defaults when it can't be read.
    pub fn load() -> Self {
        match config_dir() {
            Ok(dir) => Self::load_from(&dir.join(FILE_NAME)),
            Err(e) => {
                warn!("No configuration directory, using default GUI settings: {e}");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            fs::read_to_string(path)
                .ok()
                .and_then(|contents| toml::from_str(&contents).ok())
                .unwrap_or_else(|| {
                    warn!("Ignoring unreadable {}", path.display());
                    Self::default()
                })
        } else {
            let cfg = Self::default();
            if let Err(e) = cfg.save_to(path) {
                warn!("Failed to write {}: {e}", path.display());
            }
            cfg
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_dir()?.join(FILE_NAME))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    pub fn theme(&self) -> iced::Theme {
        (&self.theme).into()
    }
}

#[cfg(test)]
mod test {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_writes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        assert_eq!(GuiConfig::load_from(&path), GuiConfig::default());
        assert!(path.exists());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        let cfg = GuiConfig { theme: Theme::Dark };
        cfg.save_to(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "theme = \"dark\"\n");
        assert_eq!(GuiConfig::load_from(&path), cfg);
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "theme = \"sepia\"\n").unwrap();

        assert_eq!(GuiConfig::load_from(&path), GuiConfig::default());
    }
}
