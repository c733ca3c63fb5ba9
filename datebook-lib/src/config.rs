use std::{fs, path::Path, str::FromStr};

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::{Error, Result, fs::config_dir};

pub use crate::meeting::IdStrategy;

const FILE_NAME: &str = "core.toml";
const DEFAULT_ENDPOINT: &str = "http://localhost:8888/calendar";

/// Settings shared by every front end, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// The collection resource meetings are read from and written to.
    pub endpoint: Url,
    /// IANA name of the zone display strings and calendar days are in. Falls back to the
    /// system zone when unset.
    pub timezone: Option<String>,
    pub id_strategy: IdStrategy,
}

impl CoreConfig {
    /// Load `core.toml` from the configuration directory, writing the defaults out first if
    /// it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Ok(toml::from_str(&contents).unwrap_or_else(|e| {
                warn!("Ignoring unreadable {}: {e}", path.display());
                Self::default()
            }))
        } else {
            let cfg = Self::default();
            cfg.save_to(path)?;
            Ok(cfg)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;

        Ok(())
    }

    /// The zone configured by the user, otherwise the system's, otherwise UTC.
    pub fn time_zone(&self) -> Result<Tz> {
        if let Some(name) = &self.timezone {
            return Tz::from_str(name).map_err(|_| Error::TimeZone(name.clone()));
        }

        Ok(iana_time_zone::get_timezone()
            .ok()
            .and_then(|name| Tz::from_str(&name).ok())
            .unwrap_or_else(|| {
                warn!("Couldn't determine the system time zone, using UTC");
                Tz::UTC
            }))
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self {
            timezone: Some("UTC".into()),
            ..Self::default()
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint must be a valid URL"),
            timezone: None,
            id_strategy: IdStrategy::default(),
        }
    }
}
