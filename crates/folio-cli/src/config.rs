//! CLI configuration from `~/.config/folio/config.toml`.
//!
//! Every key is optional; a missing file means all defaults.
//!
//! ```toml
//! [store]
//! path = "/home/me/.local/share/folio/folio.db"
//!
//! [history]
//! limit = 100
//!
//! [render]
//! default_mode = "two_column"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_compose::SessionConfig;
use folio_compose::history::DEFAULT_HISTORY_LIMIT;
use folio_types::LayoutMode;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub history: HistoryConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite database file. Defaults under the XDG data dir.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub limit: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Mode for `folio render` when `--mode` is omitted. `None` uses the
    /// document's own layout mode.
    pub default_mode: Option<LayoutMode>,
}

/// Default config file location (~/.config/folio/config.toml).
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("folio").join("config.toml"))
}

fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("folio")
        .join("folio.db")
}

impl Config {
    /// Load from `explicit`, or the default location if none was given.
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => match config_file_path() {
                Some(p) if p.exists() => p,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn db_path(&self) -> PathBuf {
        self.store.path.clone().unwrap_or_else(default_db_path)
    }

    pub fn session(&self) -> SessionConfig {
        SessionConfig {
            history_limit: self.history.limit,
        }
    }
}
